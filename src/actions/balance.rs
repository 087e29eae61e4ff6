use super::{check_token_name, print_json};
use crate::options::BalanceOptions;
use dashboard_lib::balance::resolve_balance;
use dashboard_lib::error::DashboardError;
use dashboard_lib::err_from;
use dashboard_lib::runtime::DashboardRuntime;

pub async fn show_balance(
    runtime: &DashboardRuntime,
    balance_options: BalanceOptions,
) -> Result<(), DashboardError> {
    let token = check_token_name(&balance_options.token, &runtime.environment.contracts)
        .map_err(err_from!())?;
    let owner = balance_options
        .address
        .unwrap_or(runtime.context.gateway.account());
    log::debug!("Getting balance of {:#x} for token {:#x}", owner, token);
    let balance = resolve_balance(&runtime.context.gateway, token, owner).await;
    print_json(&balance)
}
