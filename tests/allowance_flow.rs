use dashboard_lib::balance::NATIVE_TOKEN_ADDRESS;
use dashboard_lib::contracts::staking_stake;
use dashboard_lib::error::ErrorBag;
use dashboard_lib::error_message::normalize_error;
use dashboard_lib::flow::{FlowOutcome, SpendAmount, SpendRequest};
use dashboard_lib::gateway::{ContractCall, TxStatus};
use dashboard_lib_common::{DashboardEventContent, TxKind};
use dashboard_lib_test::{
    create_mock_wallet, create_test_context, drain_events, test_account, test_contracts, tokens,
};
use web3::types::U256;

fn stake_request(amount: &str) -> SpendRequest<impl FnOnce(U256) -> ContractCall> {
    let contracts = test_contracts();
    let staking = contracts.staking;
    SpendRequest {
        action_name: "stake".to_string(),
        token: contracts.token,
        spender: staking,
        amount: SpendAmount::Human(amount.to_string()),
        action: move |amount| staking_stake(staking, amount),
    }
}

#[tokio::test]
async fn test_approves_unlimited_before_stake() -> anyhow::Result<()> {
    let wallet = create_mock_wallet(100);
    let (ctx, mut events) = create_test_context(wallet.clone());
    let contracts = test_contracts();

    let outcome = ctx.flow().execute(stake_request("50")).await?;

    match &outcome {
        FlowOutcome::Completed { approval, action } => {
            assert_eq!(approval.as_ref().map(|a| a.status), Some(TxStatus::Success));
            assert_eq!(action.status, TxStatus::Success);
        }
        other => panic!("Unexpected outcome {other:?}"),
    }

    let sent = wallet.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].function, "approve");
    assert_eq!(sent[0].address, contracts.token);
    assert_eq!(
        sent[0].args[0].clone().into_address(),
        Some(contracts.staking)
    );
    assert_eq!(sent[0].uint_arg(1), Some(U256::MAX));
    assert_eq!(sent[1].function, "stake");
    assert_eq!(sent[1].uint_arg(0), Some(tokens(50)));
    assert_eq!(
        wallet.allowance(contracts.token, test_account(), contracts.staking),
        U256::MAX
    );

    let kinds: Vec<(TxKind, bool)> = drain_events(&mut events)
        .into_iter()
        .filter_map(|event| match event.content {
            DashboardEventContent::TransactionSubmitted { kind, .. } => Some((kind, false)),
            DashboardEventContent::TransactionConfirmed { kind, .. } => Some((kind, true)),
            _ => None,
        })
        .collect();
    assert_eq!(
        kinds,
        vec![
            (TxKind::Approve, false),
            (TxKind::Approve, true),
            (TxKind::Action, false),
            (TxKind::Action, true),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_insufficient_balance_sends_nothing() -> anyhow::Result<()> {
    let wallet = create_mock_wallet(100);
    let (ctx, _events) = create_test_context(wallet.clone());

    let outcome = ctx.flow().execute(stake_request("150")).await?;

    match outcome {
        FlowOutcome::InsufficientBalance {
            requested,
            available,
        } => {
            assert_eq!(requested, tokens(150));
            assert_eq!(available.raw_value, tokens(100));
            assert_eq!(available.formatted_value, "100");
        }
        other => panic!("Unexpected outcome {other:?}"),
    }
    assert!(wallet.sent().is_empty());
    assert_eq!(wallet.read_count("allowance"), 0);
    Ok(())
}

#[tokio::test]
async fn test_sufficient_allowance_skips_approve() -> anyhow::Result<()> {
    let wallet = create_mock_wallet(100);
    let contracts = test_contracts();
    wallet.set_allowance(contracts.token, test_account(), contracts.staking, tokens(50));
    let (ctx, _events) = create_test_context(wallet.clone());

    let outcome = ctx.flow().execute(stake_request("50")).await?;

    assert!(outcome.is_completed());
    assert_eq!(wallet.sent_functions(), vec!["stake".to_string()]);
    assert_eq!(wallet.read_count("allowance"), 1);
    Ok(())
}

#[tokio::test]
async fn test_fractional_amount_is_exact() -> anyhow::Result<()> {
    let wallet = create_mock_wallet(1);
    let (ctx, _events) = create_test_context(wallet.clone());

    ctx.flow().execute(stake_request("0.000000000000000001")).await?;

    assert_eq!(wallet.sent()[1].uint_arg(0), Some(U256::one()));
    Ok(())
}

#[tokio::test]
async fn test_failed_approval_stops_flow() -> anyhow::Result<()> {
    let wallet = create_mock_wallet(100);
    wallet.revert_sends("approve");
    let (ctx, _events) = create_test_context(wallet.clone());

    let outcome = ctx.flow().execute(stake_request("10")).await?;

    match outcome {
        FlowOutcome::ApprovalFailed { approval } => assert_eq!(approval.status, TxStatus::Failed),
        other => panic!("Unexpected outcome {other:?}"),
    }
    assert_eq!(wallet.sent_functions(), vec!["approve".to_string()]);
    Ok(())
}

#[tokio::test]
async fn test_reverted_action_keeps_approval() -> anyhow::Result<()> {
    let wallet = create_mock_wallet(100);
    wallet.revert_sends("stake");
    let (ctx, _events) = create_test_context(wallet.clone());

    let outcome = ctx.flow().execute(stake_request("10")).await?;

    match outcome {
        FlowOutcome::ActionFailed { approval, action } => {
            assert!(approval.map(|a| a.is_success()).unwrap_or(false));
            assert_eq!(action.status, TxStatus::Failed);
        }
        other => panic!("Unexpected outcome {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_rejected_signature_is_an_error() -> anyhow::Result<()> {
    let wallet = create_mock_wallet(100);
    wallet.fail_sends("approve");
    let (ctx, _events) = create_test_context(wallet.clone());

    let err = ctx
        .flow()
        .execute(stake_request("10"))
        .await
        .expect_err("approve was rejected");

    assert_eq!(normalize_error(&err), "User rejected the request");
    assert_eq!(wallet.sent_functions(), vec!["approve".to_string()]);
    Ok(())
}

#[tokio::test]
async fn test_allowance_read_failure_aborts() -> anyhow::Result<()> {
    let wallet = create_mock_wallet(100);
    wallet.fail_reads("allowance");
    let (ctx, _events) = create_test_context(wallet.clone());

    let res = ctx.flow().execute(stake_request("10")).await;

    assert!(res.is_err());
    assert!(wallet.sent().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_invalid_amount_is_conversion_error() -> anyhow::Result<()> {
    let wallet = create_mock_wallet(100);
    let (ctx, _events) = create_test_context(wallet.clone());

    for input in ["", "abc", "0", "1.2.3", "0.0000000000000000001"] {
        let err = ctx
            .flow()
            .execute(stake_request(input))
            .await
            .expect_err("amount must be rejected");
        assert!(
            matches!(err.inner, ErrorBag::ConversionError(_)),
            "{input}: {err}"
        );
    }
    assert!(wallet.sent().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_native_token_skips_allowance() -> anyhow::Result<()> {
    let wallet = create_mock_wallet(0);
    wallet.set_native_balance(test_account(), tokens(2));
    let (ctx, _events) = create_test_context(wallet.clone());
    let staking = test_contracts().staking;

    let outcome = ctx
        .flow()
        .execute(SpendRequest {
            action_name: "stake native".to_string(),
            token: NATIVE_TOKEN_ADDRESS,
            spender: staking,
            amount: SpendAmount::Human("1.5".to_string()),
            action: move |amount| staking_stake(staking, amount).with_value(amount),
        })
        .await?;

    assert!(outcome.is_completed());
    assert_eq!(wallet.read_count("allowance"), 0);
    assert_eq!(wallet.read_count("decimals"), 0);
    let sent = wallet.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].value, U256::from(15) * U256::exp10(17));
    Ok(())
}

#[tokio::test]
async fn test_raw_amount_is_used_as_is() -> anyhow::Result<()> {
    let wallet = create_mock_wallet(100);
    let (ctx, _events) = create_test_context(wallet.clone());
    let staking = test_contracts().staking;

    ctx.flow()
        .execute(SpendRequest {
            action_name: "stake".to_string(),
            token: test_contracts().token,
            spender: staking,
            amount: SpendAmount::Raw(U256::from(12345)),
            action: move |amount| staking_stake(staking, amount),
        })
        .await?;

    assert_eq!(wallet.sent()[1].uint_arg(0), Some(U256::from(12345)));
    Ok(())
}
