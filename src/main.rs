mod actions;
mod options;

use crate::actions::account::{login, logout, run_api_keys, show_portfolio};
use crate::actions::balance::show_balance;
use crate::actions::equity::run_equity;
use crate::actions::pricing::run_pricing;
use crate::actions::sponsor::run_sponsor;
use crate::actions::staking::run_staking;
use crate::actions::trading::{show_token_pairs, simulate_trade};
use crate::actions::vesting::run_vesting;
use crate::actions::watch::watch;
use crate::options::{DashboardCommands, DashboardOptions};

use dashboard_lib::api::{ApiClient, AuthContext};
use dashboard_lib::{
    config, err_custom_create,
    error::DashboardError,
    misc::load_wallet_key_from_env,
    runtime::start_dashboard,
};
use dashboard_lib_common::DashboardEvent;
use std::env;
use std::path::Path;
use std::sync::Arc;
use structopt::StructOpt;
use tokio::sync::mpsc::Receiver;

async fn print_toasts(mut receiver: Receiver<DashboardEvent>) {
    while let Some(event) = receiver.recv().await {
        if let Some(toast) = event.toast() {
            println!("[{:?}] {}", toast.level, toast.message);
        }
    }
}

async fn load_config(cli: &DashboardOptions) -> Result<config::Config, DashboardError> {
    if let Some(path) = &cli.config {
        return config::Config::load(path.display().to_string()).await;
    }
    if Path::new("config-dashboard.toml").exists() {
        log::info!("Using config-dashboard.toml from working directory");
        return config::Config::load("config-dashboard.toml").await;
    }
    config::Config::default_config()
}

async fn main_internal() -> Result<(), DashboardError> {
    dotenv::dotenv().ok();
    env::set_var(
        "RUST_LOG",
        env::var("RUST_LOG").unwrap_or("info,web3=warn".to_string()),
    );

    env_logger::init();
    let cli: DashboardOptions = DashboardOptions::from_args();
    log::debug!("{:?}", cli);

    let mut config = load_config(&cli).await?;
    let environment_name = match &cli.environment {
        Some(name) => {
            config.environment(name)?;
            name.clone()
        }
        None => config.select_environment()?.0,
    };
    log::info!("Using environment {}", environment_name);

    let auth = Arc::new(AuthContext::load(cli.session_file.clone()).await?);

    // commands talking only to the backend do not need a wallet
    let api = ApiClient::new(&config.environment(&environment_name)?.api_url, auth.clone());
    match cli.commands {
        DashboardCommands::Logout => return logout(&api).await,
        DashboardCommands::Portfolio => return show_portfolio(&api).await,
        DashboardCommands::ApiKeys { command } => return run_api_keys(&api, command).await,
        DashboardCommands::TokenPairs => return show_token_pairs(&api).await,
        DashboardCommands::Simulate { simulate_options } => {
            return simulate_trade(&api, simulate_options).await
        }
        _ => {}
    }

    if let DashboardCommands::Watch { watch_options } = &cli.commands {
        if let Some(interval) = watch_options.interval {
            config.engine.view_poll_interval = interval;
        }
    }

    let (secret_key, address) = load_wallet_key_from_env()?;
    log::info!("Wallet account {:#x}", address);

    let (sender, receiver) = tokio::sync::mpsc::channel(100);
    let runtime = start_dashboard(secret_key, config, &environment_name, auth, Some(sender)).await?;

    if let DashboardCommands::Watch { watch_options } = cli.commands {
        return watch(&runtime, watch_options, receiver).await;
    }
    let toast_printer = tokio::spawn(print_toasts(receiver));

    let action = async {
        match cli.commands {
            DashboardCommands::Balance { balance_options } => {
                show_balance(&runtime, balance_options).await
            }
            DashboardCommands::Staking { command } => run_staking(&runtime, command).await,
            DashboardCommands::Sponsor { command } => run_sponsor(&runtime, command).await,
            DashboardCommands::Equity { command } => run_equity(&runtime, command).await,
            DashboardCommands::Vesting { command } => run_vesting(&runtime, command).await,
            DashboardCommands::Pricing { command } => run_pricing(&runtime, command).await,
            DashboardCommands::Login => login(&runtime).await,
            DashboardCommands::Logout
            | DashboardCommands::Portfolio
            | DashboardCommands::ApiKeys { .. }
            | DashboardCommands::TokenPairs
            | DashboardCommands::Simulate { .. }
            | DashboardCommands::Watch { .. } => Ok(()),
        }
    };
    // receipt waits can be long, let the user give up on them
    let res = tokio::select! {
        res = action => res,
        _ = tokio::signal::ctrl_c() => {
            log::warn!("Cancelled, submitted transactions may still be mined");
            Err(err_custom_create!("Cancelled by user"))
        }
    };

    // closes the event channel so the printer drains and exits
    drop(runtime);
    if let Err(err) = toast_printer.await {
        log::error!("Toast printer failed: {}", err);
    }
    res
}

#[tokio::main]
async fn main() -> Result<(), DashboardError> {
    match main_internal().await {
        Ok(_) => Ok(()),
        Err(e) => {
            eprintln!("Error: {}", e);
            Err(e)
        }
    }
}
