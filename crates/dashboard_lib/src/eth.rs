use crate::contracts::erc20_allowance;
use crate::err_custom_create;
use crate::error::*;
use crate::gateway::ChainGateway;
use secp256k1::{PublicKey, SecretKey};
use serde::Serialize;
use sha3::Digest;
use sha3::Keccak256;
use web3::types::{Address, U256};

/// Allowance snapshot taken right before a spending action, never reused afterwards
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllowanceCheck {
    pub owner: Address,
    pub spender: Address,
    pub required_amount: U256,
    pub current_allowance: U256,
}

impl AllowanceCheck {
    pub fn is_sufficient(&self) -> bool {
        self.current_allowance >= self.required_amount
    }
}

pub fn get_eth_addr_from_secret(secret_key: &SecretKey) -> Address {
    Address::from_slice(
        &Keccak256::digest(
            &PublicKey::from_secret_key(&secp256k1::Secp256k1::new(), secret_key)
                .serialize_uncompressed()[1..65],
        )
        .as_slice()[12..],
    )
}

pub async fn check_allowance(
    gateway: &ChainGateway,
    owner: Address,
    token: Address,
    spender: Address,
    required_amount: U256,
) -> Result<AllowanceCheck, DashboardError> {
    log::debug!("Checking allowance for spender {:#x}...", spender);
    let res = gateway
        .read_contract(erc20_allowance(token, owner, spender))
        .await;
    let current_allowance = res.first_uint().ok_or(err_custom_create!(
        "Invalid response from ERC20 allowance check, token {:#x}",
        token
    ))?;
    let check = AllowanceCheck {
        owner,
        spender,
        required_amount,
        current_allowance,
    };
    log::debug!(
        "Check allowance: owner: {:#x}, token: {:#x}, spender: {:#x}, allowance: {}, required: {}",
        owner,
        token,
        spender,
        current_allowance,
        required_amount
    );
    Ok(check)
}
