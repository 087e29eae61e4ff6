use super::{action_failed, print_json};
use crate::options::PricingCommands;
use chrono::Utc;
use dashboard_lib::error::DashboardError;
use dashboard_lib::runtime::DashboardRuntime;

pub async fn run_pricing(
    runtime: &DashboardRuntime,
    command: PricingCommands,
) -> Result<(), DashboardError> {
    let pricing = &runtime.pricing;
    if let PricingCommands::Subscribe { tier } = command {
        pricing.subscribe(tier).await.map_err(action_failed)?;
    }
    let view = match pricing.view() {
        Some(view) => view,
        None => pricing.refresh().await,
    };
    if view.is_subscribed(Utc::now()) {
        log::info!("Subscription active");
    }
    print_json(&view)
}
