use serde::Deserialize;
use std::collections::btree_map::BTreeMap as Map;
use std::path::Path;
use std::time::Duration;

use crate::error::*;
use crate::gateway::GatewaySettings;
use crate::{err_custom_create, err_from};
use dashboard_lib_common::utils::parse_units;
use tokio::fs;
use web3::types::{Address, U256};

pub const ENVIRONMENT_ENV_VAR: &str = "DASHBOARD_ENV";
pub const DEFAULT_ENVIRONMENT: &str = "development";

const DEFAULT_CONFIG: &str = include_str!("../config-dashboard.toml");

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct Engine {
    /// Seconds between refreshes of on-chain views
    pub view_poll_interval: u64,
    /// Seconds between refreshes of the portfolio overview
    pub portfolio_poll_interval: u64,
    /// Milliseconds between receipt lookups
    pub receipt_poll_interval: u64,
    /// Seconds to wait for a receipt before giving up
    pub transaction_timeout: u64,
    /// Percent added on top of estimated gas
    pub gas_safety_margin: u64,
}

impl Engine {
    pub fn gateway_settings(&self) -> GatewaySettings {
        GatewaySettings {
            receipt_poll_interval: Duration::from_millis(self.receipt_poll_interval),
            transaction_timeout: Duration::from_secs(self.transaction_timeout),
        }
    }

    pub fn view_poll_interval(&self) -> Duration {
        Duration::from_secs(self.view_poll_interval)
    }

    pub fn portfolio_poll_interval(&self) -> Duration {
        Duration::from_secs(self.portfolio_poll_interval)
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct Contracts {
    /// Platform token spent by staking, equity, sponsorship and subscriptions
    pub token: Address,
    pub staking: Address,
    pub equity: Address,
    pub sponsor: Address,
    pub vesting: Address,
    pub pricing: Address,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct Environment {
    pub api_url: String,
    pub rpc_endpoint: String,
    pub chain_id: u64,
    pub currency_symbol: String,
    /// Gwei
    pub priority_fee: String,
    /// Gwei
    pub max_fee_per_gas: String,
    pub contracts: Contracts,
    pub pricing_tiers: Vec<u64>,
    /// Token amounts (human units) needed for levels 1..=n
    pub level_thresholds: Vec<String>,
    pub block_explorer_url: Option<String>,
}

impl Environment {
    pub fn priority_fee_wei(&self) -> Result<U256, DashboardError> {
        parse_units(&self.priority_fee, 9).map_err(err_from!())
    }

    pub fn max_fee_per_gas_wei(&self) -> Result<U256, DashboardError> {
        parse_units(&self.max_fee_per_gas, 9).map_err(err_from!())
    }

    pub fn level_thresholds_raw(&self, decimals: u8) -> Result<Vec<U256>, DashboardError> {
        self.level_thresholds
            .iter()
            .map(|threshold| parse_units(threshold, decimals).map_err(err_from!()))
            .collect()
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    pub engine: Engine,
    pub environment: Map<String, Environment>,
}

impl Config {
    pub fn load_from_str(str: &str) -> Result<Self, DashboardError> {
        match toml::from_str(str) {
            Ok(config) => Ok(config),
            Err(e) => Err(err_custom_create!("Failed to parse toml {}: {}", str, e)),
        }
    }

    pub async fn load<P: AsRef<Path> + std::fmt::Display>(path: P) -> Result<Self, DashboardError> {
        let content = fs::read_to_string(&path).await.map_err(err_from!())?;
        match toml::from_str(&content) {
            Ok(config) => Ok(config),
            Err(e) => Err(err_custom_create!("Failed to parse toml {}: {}", path, e)),
        }
    }

    /// Config compiled into the binary
    pub fn default_config() -> Result<Self, DashboardError> {
        Self::load_from_str(DEFAULT_CONFIG)
    }

    pub fn environment(&self, name: &str) -> Result<&Environment, DashboardError> {
        self.environment
            .get(name)
            .ok_or(err_custom_create!("Environment {} not found in config", name))
    }

    /// Environment named by `DASHBOARD_ENV`, development when unset
    pub fn select_environment(&self) -> Result<(String, &Environment), DashboardError> {
        let name = std::env::var(ENVIRONMENT_ENV_VAR).unwrap_or(DEFAULT_ENVIRONMENT.to_string());
        let environment = self.environment(&name)?;
        Ok((name, environment))
    }

    pub fn change_rpc_endpoint(
        &mut self,
        environment: &str,
        rpc_endpoint: String,
    ) -> Result<(), DashboardError> {
        self.environment
            .get_mut(environment)
            .ok_or(err_custom_create!("Environment {} not found", environment))?
            .rpc_endpoint = rpc_endpoint;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default_config().unwrap();
        for name in ["development", "beta", "production"] {
            let env = config.environment(name).unwrap();
            assert!(env.api_url.starts_with("http"));
            assert!(env.priority_fee_wei().is_ok());
            assert!(env.level_thresholds_raw(18).unwrap().len() > 1);
        }
        assert!(config.environment("staging").is_err());
        assert_eq!(
            config.engine.gateway_settings().receipt_poll_interval,
            Duration::from_millis(2000)
        );
    }

    #[test]
    fn test_gas_values_in_gwei() {
        let config = Config::default_config().unwrap();
        let env = config.environment("development").unwrap();
        assert_eq!(
            env.priority_fee_wei().unwrap(),
            U256::from(1_500_000_000u64)
        );
    }

    #[test]
    fn test_invalid_config() {
        let res = Config::load_from_str("[engine]\nview-poll-interval = \"soon\"");
        assert!(res.is_err());
    }
}
