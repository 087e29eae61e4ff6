use super::print_json;
use crate::options::SimulateOptions;
use dashboard_lib::api::{ApiClient, SimulateTradeRequest};
use dashboard_lib::err_custom_create;
use dashboard_lib::error::DashboardError;

pub async fn show_token_pairs(api: &ApiClient) -> Result<(), DashboardError> {
    print_json(&api.token_pairs().await?)
}

pub async fn simulate_trade(
    api: &ApiClient,
    simulate_options: SimulateOptions,
) -> Result<(), DashboardError> {
    let pairs = api.token_pairs().await?;
    if !pairs.iter().any(|p| p.symbol == simulate_options.pair) {
        return Err(err_custom_create!(
            "Unknown token pair {}",
            simulate_options.pair
        ));
    }
    let simulation = api
        .simulate_trade(&SimulateTradeRequest {
            pair: simulate_options.pair,
            side: simulate_options.side,
            amount: simulate_options.amount,
            limit_price: simulate_options.limit_price,
        })
        .await?;
    print_json(&simulation)
}
