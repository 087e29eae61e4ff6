use crate::contracts::{erc20_balance_of, erc20_decimals};
use crate::gateway::ChainGateway;
use dashboard_lib_common::utils::{format_units, MAX_DECIMALS};
use serde::Serialize;
use web3::types::{Address, H160, U256};

/// Pseudo token address standing for the chain's native currency
pub const NATIVE_TOKEN_ADDRESS: Address = H160([0xee; 20]);
pub const DEFAULT_DECIMALS: u8 = 18;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenBalance {
    pub raw_value: U256,
    pub decimals: u8,
    pub formatted_value: String,
}

impl Default for TokenBalance {
    fn default() -> Self {
        TokenBalance {
            raw_value: U256::zero(),
            decimals: DEFAULT_DECIMALS,
            formatted_value: "0".to_string(),
        }
    }
}

impl TokenBalance {
    pub fn new(raw_value: U256, decimals: u8) -> Self {
        let formatted_value = format_units(raw_value, decimals).unwrap_or_else(|err| {
            log::warn!("Cannot format balance {}: {}", raw_value, err);
            raw_value.to_string()
        });
        TokenBalance {
            raw_value,
            decimals,
            formatted_value,
        }
    }
}

pub fn is_native_token(token: Address) -> bool {
    token == NATIVE_TOKEN_ADDRESS
}

/// Decimal precision of the token, None when the contract does not answer
pub async fn read_decimals(gateway: &ChainGateway, token: Address) -> Option<u8> {
    if is_native_token(token) {
        return Some(DEFAULT_DECIMALS);
    }
    let decimals = gateway.read_contract(erc20_decimals(token)).await.first_uint()?;
    if decimals > U256::from(MAX_DECIMALS) {
        log::warn!(
            "Token {:#x} reports unsupported decimals {}",
            token,
            decimals
        );
        return None;
    }
    Some(decimals.as_u32() as u8)
}

/// Decimal precision of the token, 18 when it cannot be read
pub async fn resolve_decimals(gateway: &ChainGateway, token: Address) -> u8 {
    read_decimals(gateway, token)
        .await
        .unwrap_or(DEFAULT_DECIMALS)
}

async fn read_balance(gateway: &ChainGateway, token: Address, owner: Address) -> Option<TokenBalance> {
    if is_native_token(token) {
        return match gateway.native_balance(owner).await {
            Ok(balance) => Some(TokenBalance::new(balance, DEFAULT_DECIMALS)),
            Err(err) => {
                log::warn!("Failed to read native balance of {:#x}: {}", owner, err);
                None
            }
        };
    }
    let decimals = read_decimals(gateway, token).await?;
    let raw_value = gateway
        .read_contract(erc20_balance_of(token, owner))
        .await
        .first_uint()?;
    Some(TokenBalance::new(raw_value, decimals))
}

/// Balance of `owner` in `token`. Degrades to zero balance with 18 decimals on any read failure.
pub async fn resolve_balance(gateway: &ChainGateway, token: Address, owner: Address) -> TokenBalance {
    log::debug!(
        "Resolving balance of {:#x} for token {:#x}",
        owner,
        token
    );
    read_balance(gateway, token, owner)
        .await
        .unwrap_or_default()
}
