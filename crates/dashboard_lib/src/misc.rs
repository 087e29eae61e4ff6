use std::str::FromStr;

use crate::error::*;
use crate::eth::get_eth_addr_from_secret;
use crate::{err_custom_create, err_from};
use secp256k1::SecretKey;
use web3::types::Address;

pub const PRIVATE_KEY_ENV_VAR: &str = "DASHBOARD_PRIVATE_KEY";

pub fn load_private_keys(str: &str) -> Result<(Vec<SecretKey>, Vec<Address>), DashboardError> {
    let mut keys = Vec::new();
    let mut addrs = Vec::new();
    if str.is_empty() {
        return Ok((keys, addrs));
    }
    for key in str.split(',') {
        //do not disclose the private key in error message
        let secret = SecretKey::from_str(key.trim().trim_start_matches("0x"))
            .map_err(|_| err_custom_create!("Failed to parse private key"))?;
        let public_addr = get_eth_addr_from_secret(&secret);
        keys.push(secret);
        addrs.push(public_addr);
    }
    Ok((keys, addrs))
}

/// The wallet account: first key found in `DASHBOARD_PRIVATE_KEY`
pub fn load_wallet_key_from_env() -> Result<(SecretKey, Address), DashboardError> {
    let env_value = std::env::var(PRIVATE_KEY_ENV_VAR).map_err(|_| {
        err_custom_create!("{} not set, cannot connect wallet", PRIVATE_KEY_ENV_VAR)
    })?;
    let (keys, addrs) = load_private_keys(&env_value)?;
    match (keys.first(), addrs.first()) {
        (Some(key), Some(addr)) => Ok((*key, *addr)),
        _ => Err(err_custom_create!("{} is empty", PRIVATE_KEY_ENV_VAR)),
    }
}

pub fn parse_address(str: &str) -> Result<Address, DashboardError> {
    Address::from_str(str.trim()).map_err(err_from!())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_private_keys() {
        let (keys, addrs) = load_private_keys(
            "0x0000000000000000000000000000000000000000000000000000000000000001,\
             0000000000000000000000000000000000000000000000000000000000000002",
        )
        .unwrap();
        assert_eq!(keys.len(), 2);
        assert_eq!(
            format!("{:#x}", addrs[0]),
            "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf"
        );

        let (keys, _) = load_private_keys("").unwrap();
        assert!(keys.is_empty());

        let err = load_private_keys("not-a-key").unwrap_err();
        assert!(!err.to_string().contains("not-a-key"));
    }

    #[test]
    fn test_parse_address() {
        assert!(parse_address("0x5FbDB2315678afecb367f032d93F642f64180aa3").is_ok());
        assert!(parse_address("0x5FbD").is_err());
    }
}
