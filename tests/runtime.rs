use dashboard_lib::api::AuthContext;
use dashboard_lib::controller::Refresh;
use dashboard_lib::runtime::DashboardRuntime;
use dashboard_lib_common::DashboardEventContent;
use dashboard_lib_test::{create_mock_wallet, create_test_config, test_contracts};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_runtime_wires_environment_contracts() -> anyhow::Result<()> {
    let wallet = create_mock_wallet(42);
    let runtime = DashboardRuntime::from_provider(
        create_test_config(),
        "development",
        wallet.clone(),
        Arc::new(AuthContext::new(None)),
        None,
    )?;

    assert_eq!(runtime.environment_name, "development");
    assert_eq!(runtime.context.contracts.token, test_contracts().token);
    let view = runtime.staking.refresh().await;
    assert_eq!(view.wallet_balance.formatted_value, "42");
    Ok(())
}

#[tokio::test]
async fn test_unknown_environment() -> anyhow::Result<()> {
    let res = DashboardRuntime::from_provider(
        create_test_config(),
        "mainnet-fork",
        create_mock_wallet(0),
        Arc::new(AuthContext::new(None)),
        None,
    );
    assert!(res.is_err());
    Ok(())
}

#[tokio::test]
async fn test_pollers_refresh_every_view() -> anyhow::Result<()> {
    let (sender, mut receiver) = tokio::sync::mpsc::channel(100);
    let runtime = DashboardRuntime::from_provider(
        create_test_config(),
        "development",
        create_mock_wallet(1),
        Arc::new(AuthContext::new(None)),
        Some(sender),
    )?;

    let pollers = runtime.start_pollers();
    assert_eq!(pollers.len(), 5);
    assert!(pollers.iter().all(|p| p.is_running()));

    let mut views = Vec::new();
    while views.len() < 5 {
        let event = tokio::time::timeout(Duration::from_secs(5), receiver.recv())
            .await?
            .expect("channel open");
        if let DashboardEventContent::ViewRefreshed { view } = event.content {
            views.push(view);
        }
    }
    views.sort();
    assert_eq!(views, vec!["equity", "pricing", "sponsor", "staking", "vesting"]);

    drop(pollers);
    assert!(runtime.staking.view().is_some());
    assert!(runtime.claim.view().is_some());
    Ok(())
}

#[tokio::test]
async fn test_refresh_with_failing_reads_keeps_defaults() -> anyhow::Result<()> {
    let wallet = create_mock_wallet(9);
    let runtime = DashboardRuntime::from_provider(
        create_test_config(),
        "development",
        wallet.clone(),
        Arc::new(AuthContext::new(None)),
        None,
    )?;

    wallet.fail_reads("balanceOf");
    runtime.staking.refresh_view().await;

    let view = runtime.staking.view().expect("view set even when reads fail");
    assert_eq!(view.wallet_balance.formatted_value, "0");
    Ok(())
}
