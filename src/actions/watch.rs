use super::print_json;
use crate::options::WatchOptions;
use dashboard_lib::error::DashboardError;
use dashboard_lib::runtime::DashboardRuntime;
use dashboard_lib_common::{DashboardEvent, DashboardEventContent};
use tokio::sync::mpsc::Receiver;

fn print_view(runtime: &DashboardRuntime, view: &str) -> Result<(), DashboardError> {
    match view {
        "staking" => runtime.staking.view().map(|v| print_json(&v)),
        "sponsor" => runtime.sponsor.view().map(|v| print_json(&v)),
        "equity" => runtime.equity.view().map(|v| print_json(&v)),
        "vesting" => runtime.claim.view().map(|v| print_json(&v)),
        "pricing" => runtime.pricing.view().map(|v| print_json(&v)),
        _ => None,
    }
    .unwrap_or(Ok(()))
}

async fn refresh_portfolio(runtime: &DashboardRuntime) {
    match runtime.api.portfolio_overview().await {
        Ok(overview) => {
            if let Err(err) = print_json(&overview) {
                log::error!("{}", err);
            }
        }
        Err(err) => log::warn!("Portfolio refresh failed: {}", err),
    }
}

/// Keeps every view fresh and prints it on each refresh, until Ctrl-C
pub async fn watch(
    runtime: &DashboardRuntime,
    watch_options: WatchOptions,
    mut events: Receiver<DashboardEvent>,
) -> Result<(), DashboardError> {
    if watch_options.with_portfolio && runtime.api.auth().token().is_none() {
        log::warn!("Not logged in, portfolio overview will not be refreshed");
    }
    let with_portfolio = watch_options.with_portfolio && runtime.api.auth().token().is_some();

    let pollers = runtime.start_pollers();
    log::info!(
        "Watching {} views of {:#x}, press Ctrl-C to stop",
        pollers.len(),
        runtime.context.gateway.account()
    );
    let mut portfolio_ticker =
        tokio::time::interval(runtime.config.engine.portfolio_poll_interval());

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                log::info!("Stopping watch");
                break;
            }
            _ = portfolio_ticker.tick(), if with_portfolio => {
                refresh_portfolio(runtime).await;
            }
            event = events.recv() => {
                let Some(event) = event else {
                    break;
                };
                match &event.content {
                    DashboardEventContent::ViewRefreshed { view } => print_view(runtime, view)?,
                    DashboardEventContent::Toast(toast) => {
                        println!("[{:?}] {}", toast.level, toast.message)
                    }
                    _ => {}
                }
            }
        }
    }
    drop(pollers);
    Ok(())
}
