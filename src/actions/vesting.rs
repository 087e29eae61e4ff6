use super::{action_failed, print_json};
use crate::options::VestingCommands;
use dashboard_lib::error::DashboardError;
use dashboard_lib::runtime::DashboardRuntime;

pub async fn run_vesting(
    runtime: &DashboardRuntime,
    command: VestingCommands,
) -> Result<(), DashboardError> {
    let claim = &runtime.claim;
    if let VestingCommands::Claim = command {
        claim.claim().await.map_err(action_failed)?;
    }
    let view = match claim.view() {
        Some(view) => view,
        None => claim.refresh().await,
    };
    if let Some(end) = view.end() {
        log::info!("Vesting ends at {}", end);
    }
    print_json(&view)
}
