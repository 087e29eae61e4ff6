use dashboard_lib::balance::NATIVE_TOKEN_ADDRESS;
use dashboard_lib::config::Contracts;
use dashboard_lib::controller::ActionError;
use dashboard_lib::error::DashboardError;
use dashboard_lib::err_custom_create;
use rustc_hex::FromHexError;
use serde::Serialize;
use std::str::FromStr;
use web3::types::Address;

pub mod account;
pub mod balance;
pub mod equity;
pub mod pricing;
pub mod sponsor;
pub mod staking;
pub mod trading;
pub mod vesting;
pub mod watch;

pub fn check_token_name(n: &str, contracts: &Contracts) -> Result<Address, FromHexError> {
    match n {
        "token" => Ok(contracts.token),
        "native" => Ok(NATIVE_TOKEN_ADDRESS),
        _ => Address::from_str(n),
    }
}

pub fn print_json<T: Serialize>(value: &T) -> Result<(), DashboardError> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).map_err(|err| err_custom_create!(
            "Something went wrong when serializing to json {err}"
        ))?
    );
    Ok(())
}

/// Button style actions report through toasts, the cli only needs the exit status
pub fn action_failed(err: ActionError) -> DashboardError {
    err_custom_create!("{}", err)
}
