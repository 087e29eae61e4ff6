use super::{action_failed, print_json};
use crate::options::EquityCommands;
use dashboard_lib::error::DashboardError;
use dashboard_lib::runtime::DashboardRuntime;

pub async fn run_equity(
    runtime: &DashboardRuntime,
    command: EquityCommands,
) -> Result<(), DashboardError> {
    let equity = &runtime.equity;
    match command {
        EquityCommands::Show => {}
        EquityCommands::Increase { amount } => {
            equity.increase_equity(&amount).await.map_err(action_failed)?;
        }
        EquityCommands::Decrease { amount } => {
            equity.decrease_equity(&amount).await.map_err(action_failed)?;
        }
    }
    let view = match equity.view() {
        Some(view) => view,
        None => equity.refresh().await,
    };
    let level = &view.level;
    log::info!(
        "Level {}: {} of {} needed for the next level ({}%)",
        level.level,
        level.format_amount(level.total_amount),
        level.format_amount(level.total_amount + level.amount_needed_for_next_level),
        level.progress_percent
    );
    print_json(&view)
}
