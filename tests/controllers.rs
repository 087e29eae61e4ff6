use dashboard_lib::controller::{
    ActionError, ActionState, ClaimController, EquityController, PricingController,
    SponsorController, StakingController,
};
use dashboard_lib_common::{DashboardEvent, DashboardEventContent, Toast, ToastLevel};
use dashboard_lib_test::{
    create_mock_wallet, create_test_context, drain_events, test_account, test_address,
    test_contracts, tokens, MockWalletProvider,
};
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::sync::mpsc::Receiver;
use web3::ethabi::Token;
use web3::types::U256;

fn toasts(events: &mut Receiver<DashboardEvent>) -> Vec<Toast> {
    drain_events(events)
        .iter()
        .filter_map(|event| event.toast().cloned())
        .collect()
}

fn refreshed_views(events: &[DashboardEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|event| match &event.content {
            DashboardEventContent::ViewRefreshed { view } => Some(view.clone()),
            _ => None,
        })
        .collect()
}

/// Staking contract that pulls the staked tokens from the wallet
fn wire_staking(wallet: &MockWalletProvider) {
    let contracts = test_contracts();
    wallet.on_success("stake", move |chain, account, call| {
        let amount = call.uint_arg(0).unwrap_or_default();
        let balance = chain.balance(contracts.token, account);
        chain.set_balance(contracts.token, account, balance - amount);
        let staked = chain.uint(contracts.staking, "stakedBalanceOf");
        chain.set_uint(contracts.staking, "stakedBalanceOf", staked + amount);
    });
}

#[tokio::test]
async fn test_stake_toasts_and_refreshes() -> anyhow::Result<()> {
    let wallet = create_mock_wallet(100);
    wire_staking(&wallet);
    let (ctx, mut events) = create_test_context(wallet.clone());
    let staking = StakingController::new(ctx);

    let outcome = staking.stake("40").await?;
    assert!(outcome.is_success());

    let view = staking.view().expect("view refreshed after stake");
    assert_eq!(view.wallet_balance.raw_value, tokens(60));
    assert_eq!(view.staked_balance.formatted_value, "40");
    assert_eq!(view.pending_rewards.raw_value, U256::zero());

    let events = drain_events(&mut events);
    assert_eq!(refreshed_views(&events), vec!["staking".to_string()]);
    let toasts: Vec<Toast> = events.iter().filter_map(|e| e.toast().cloned()).collect();
    assert_eq!(toasts, vec![Toast::success("Stake successful")]);
    assert_eq!(
        staking.stake_guard().state(),
        ActionState::Done { success: true }
    );
    Ok(())
}

#[tokio::test]
async fn test_stake_insufficient_balance_toast() -> anyhow::Result<()> {
    let wallet = create_mock_wallet(100);
    let (ctx, mut events) = create_test_context(wallet.clone());
    let staking = StakingController::new(ctx);

    let err = staking.stake("150").await.expect_err("balance too low");

    assert_eq!(err, ActionError::InsufficientBalance);
    assert_eq!(
        toasts(&mut events),
        vec![Toast::error("Insufficient token balance!")]
    );
    assert!(wallet.sent().is_empty());
    assert_eq!(
        staking.stake_guard().state(),
        ActionState::Done { success: false }
    );
    Ok(())
}

#[tokio::test]
async fn test_invalid_amount_touches_nothing() -> anyhow::Result<()> {
    let wallet = create_mock_wallet(100);
    let (ctx, mut events) = create_test_context(wallet.clone());
    let staking = StakingController::new(ctx);

    for input in ["", "ten", "-1", "0"] {
        let err = staking.stake(input).await.expect_err("invalid amount");
        assert!(matches!(err, ActionError::InvalidInput(_)), "{input}");
    }
    assert!(wallet.calls().is_empty());
    assert!(drain_events(&mut events).is_empty());
    assert_eq!(staking.stake_guard().state(), ActionState::Idle);
    Ok(())
}

#[tokio::test]
async fn test_second_stake_refused_while_in_flight() -> anyhow::Result<()> {
    let wallet = create_mock_wallet(100);
    wallet.set_receipt_delay(3);
    let (ctx, _events) = create_test_context(wallet.clone());
    let staking = StakingController::new(ctx);

    let (first, second) = tokio::join!(staking.stake("10"), staking.stake("10"));

    assert!(first.is_ok());
    assert_eq!(
        second.expect_err("refused"),
        ActionError::InFlight("stake".to_string())
    );
    assert_eq!(
        wallet.sent_functions(),
        vec!["approve".to_string(), "stake".to_string()]
    );
    assert!(!staking.stake_guard().is_in_flight());

    // released, so a later click goes through
    staking.stake("10").await?;
    assert_eq!(wallet.sent_functions().len(), 3);
    Ok(())
}

#[tokio::test]
async fn test_rejected_wallet_request_toast() -> anyhow::Result<()> {
    let wallet = create_mock_wallet(100);
    wallet.fail_sends("approve");
    let (ctx, mut events) = create_test_context(wallet.clone());
    let staking = StakingController::new(ctx);

    let err = staking.stake("10").await.expect_err("rejected");

    assert_eq!(
        err,
        ActionError::Failed("User rejected the request".to_string())
    );
    let toasts = toasts(&mut events);
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].level, ToastLevel::Error);
    assert_eq!(toasts[0].message, "User rejected the request");
    Ok(())
}

#[tokio::test]
async fn test_unstake_and_claim_reward() -> anyhow::Result<()> {
    let wallet = create_mock_wallet(100);
    let (ctx, mut events) = create_test_context(wallet.clone());
    let staking = StakingController::new(ctx);

    staking.unstake("12.5").await?;
    staking.claim_reward().await?;

    let sent = wallet.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].function, "unstake");
    assert_eq!(sent[0].uint_arg(0), Some(U256::from(125) * U256::exp10(17)));
    assert_eq!(sent[1].function, "claimReward");
    assert_eq!(
        toasts(&mut events),
        vec![
            Toast::success("Unstake successful"),
            Toast::success("Claim reward successful")
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_unstake_needs_token_decimals() -> anyhow::Result<()> {
    let wallet = create_mock_wallet(0);
    wallet.add_token(test_contracts().token, 6);
    let (ctx, mut events) = create_test_context(wallet.clone());
    let staking = StakingController::new(ctx);

    staking.unstake("1").await?;
    assert_eq!(wallet.sent()[0].uint_arg(0), Some(U256::from(1_000_000)));
    drain_events(&mut events);

    wallet.fail_reads("decimals");
    let err = staking.unstake("1").await.expect_err("decimals unknown");

    assert_eq!(err, ActionError::Failed("Cannot read token decimals".to_string()));
    assert_eq!(wallet.sent().len(), 1);
    assert_eq!(
        toasts(&mut events),
        vec![Toast::error("Cannot read token decimals")]
    );
    Ok(())
}

#[tokio::test]
async fn test_reverted_claim_reward() -> anyhow::Result<()> {
    let wallet = create_mock_wallet(100);
    wallet.revert_sends("claimReward");
    let (ctx, mut events) = create_test_context(wallet.clone());
    let staking = StakingController::new(ctx);

    let err = staking.claim_reward().await.expect_err("reverted");

    assert!(matches!(err, ActionError::Failed(ref msg) if msg.starts_with("Claim reward failed")));
    assert_eq!(toasts(&mut events)[0].level, ToastLevel::Error);
    Ok(())
}

#[tokio::test]
async fn test_vesting_nothing_to_claim() -> anyhow::Result<()> {
    let wallet = create_mock_wallet(0);
    let (ctx, mut events) = create_test_context(wallet.clone());
    let claim = ClaimController::new(ctx);

    let err = claim.claim().await.expect_err("nothing vested");

    assert_eq!(err, ActionError::NothingToClaim);
    assert_eq!(toasts(&mut events), vec![Toast::info("Nothing to claim yet")]);
    assert!(wallet.sent().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_vesting_view_and_claim() -> anyhow::Result<()> {
    let wallet = create_mock_wallet(0);
    let vesting = test_contracts().vesting;
    wallet.script_read(
        vesting,
        "getVestingSchedule",
        vec![
            Token::Uint(tokens(1000)),
            Token::Uint(tokens(250)),
            Token::Uint(U256::from(1_700_000_000u64)),
            Token::Uint(U256::from(86400)),
        ],
    );
    wallet.set_uint(vesting, "getClaimableAmount", tokens(50));
    let (ctx, _events) = create_test_context(wallet.clone());
    let claim = ClaimController::new(ctx);

    let view = claim.refresh().await;
    assert_eq!(view.total.formatted_value, "1000");
    assert_eq!(view.released.formatted_value, "250");
    assert_eq!(view.claimable.formatted_value, "50");
    assert_eq!(view.start.map(|s| s.timestamp()), Some(1_700_000_000));
    assert_eq!(view.end().map(|e| e.timestamp()), Some(1_700_086_400));

    claim.claim().await?;
    assert_eq!(wallet.sent_functions(), vec!["claim".to_string()]);
    Ok(())
}

#[tokio::test]
async fn test_vesting_view_without_schedule() -> anyhow::Result<()> {
    let wallet = create_mock_wallet(0);
    let (ctx, _events) = create_test_context(wallet.clone());
    let claim = ClaimController::new(ctx);

    let view = claim.refresh().await;

    assert_eq!(view.total.raw_value, U256::zero());
    assert_eq!(view.start, None);
    assert_eq!(view.end(), None);
    Ok(())
}

#[tokio::test]
async fn test_pricing_subscribe_pays_tier_price() -> anyhow::Result<()> {
    let wallet = create_mock_wallet(100);
    let pricing = test_contracts().pricing;
    wallet.set_uint(pricing, "tierPrice", tokens(10));
    let (ctx, mut events) = create_test_context(wallet.clone());
    let controller = PricingController::new(ctx, &[1, 2]);

    controller.subscribe(2).await?;

    let sent = wallet.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].function, "approve");
    assert_eq!(sent[1].function, "subscribe");
    assert_eq!(sent[1].uint_arg(0), Some(U256::from(2)));
    assert!(toasts(&mut events).contains(&Toast::success("Subscription successful")));

    let view = controller.view().expect("refreshed");
    assert_eq!(view.tiers.len(), 2);
    assert_eq!(view.tiers[0].price.formatted_value, "10");
    Ok(())
}

#[tokio::test]
async fn test_pricing_unknown_or_unavailable_tier() -> anyhow::Result<()> {
    let wallet = create_mock_wallet(100);
    let (ctx, _events) = create_test_context(wallet.clone());
    let controller = PricingController::new(ctx, &[1]);

    assert!(matches!(
        controller.subscribe(7).await,
        Err(ActionError::InvalidInput(_))
    ));
    // no price scripted, reads as zero
    assert!(matches!(
        controller.subscribe(1).await,
        Err(ActionError::InvalidInput(_))
    ));
    assert!(wallet.sent().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_sponsor_and_withdraw() -> anyhow::Result<()> {
    let wallet = create_mock_wallet(100);
    let sponsor_addr = test_contracts().sponsor;
    let beneficiary = test_address(200);
    wallet.on_success("sponsor", move |chain, _account, call| {
        chain.set_uint(sponsor_addr, "sponsorshipOf", call.uint_arg(1).unwrap_or_default());
    });
    let (ctx, _events) = create_test_context(wallet.clone());
    let sponsor = SponsorController::new(ctx);

    sponsor.sponsor(beneficiary, "25").await?;

    let sent = wallet.sent();
    assert_eq!(sent[1].function, "sponsor");
    assert_eq!(sent[1].args[0].clone().into_address(), Some(beneficiary));
    assert_eq!(sent[1].uint_arg(1), Some(tokens(25)));
    let view = sponsor.view().expect("refreshed");
    assert_eq!(view.sponsored_by_me.len(), 1);
    assert_eq!(view.sponsored_by_me[0].beneficiary, beneficiary);
    assert_eq!(view.sponsored_by_me[0].amount.formatted_value, "25");

    sponsor.withdraw_sponsorship(beneficiary).await?;
    assert_eq!(
        wallet.sent_functions().last().map(String::as_str),
        Some("withdrawSponsorship")
    );
    Ok(())
}

#[tokio::test]
async fn test_sponsor_rejects_self_and_empty_withdraw() -> anyhow::Result<()> {
    let wallet = create_mock_wallet(100);
    let (ctx, _events) = create_test_context(wallet.clone());
    let sponsor = SponsorController::new(ctx);

    assert!(matches!(
        sponsor.sponsor(test_account(), "1").await,
        Err(ActionError::InvalidInput(_))
    ));
    assert_eq!(
        sponsor.withdraw_sponsorship(test_address(200)).await,
        Err(ActionError::NothingToClaim)
    );
    assert!(wallet.sent().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_equity_level_view() -> anyhow::Result<()> {
    let wallet = create_mock_wallet(10);
    let contracts = test_contracts();
    wallet.set_uint(contracts.equity, "equityOf", tokens(300));
    wallet.set_uint(contracts.sponsor, "sponsoredAmountOf", tokens(250));
    let (ctx, _events) = create_test_context(wallet.clone());
    let equity = EquityController::new(ctx, vec!["1000".to_string(), "100".to_string()]);

    let view = equity.refresh().await;

    assert_eq!(view.level.level, 1);
    assert_eq!(view.level.total_amount, tokens(550));
    assert_eq!(view.level.amount_needed_for_next_level, tokens(450));
    assert_eq!(view.level.progress_percent, Decimal::new(5500, 2));
    assert!(!view.level.is_max_level());
    Ok(())
}

#[tokio::test]
async fn test_equity_increase_and_decrease() -> anyhow::Result<()> {
    let wallet = create_mock_wallet(100);
    let equity_addr = test_contracts().equity;
    wallet.set_uint(equity_addr, "equityOf", tokens(5));
    let (ctx, _events) = create_test_context(wallet.clone());
    let equity = EquityController::new(ctx, vec!["100".to_string()]);

    equity.increase_equity("20").await?;
    assert_eq!(
        wallet.sent_functions(),
        vec!["approve".to_string(), "increaseEquity".to_string()]
    );

    assert!(matches!(
        equity.decrease_equity("6").await,
        Err(ActionError::InvalidInput(_))
    ));
    equity.decrease_equity("5").await?;
    assert_eq!(
        wallet.sent_functions().last().map(String::as_str),
        Some("decreaseEquity")
    );
    Ok(())
}

#[tokio::test]
async fn test_controllers_share_wallet() -> anyhow::Result<()> {
    let wallet: Arc<MockWalletProvider> = create_mock_wallet(100);
    let (ctx, _events) = create_test_context(wallet.clone());
    let staking = StakingController::new(ctx.clone());
    let equity = EquityController::new(ctx, vec![]);

    staking.stake("10").await?;
    // unlimited approval was for staking only
    equity.increase_equity("10").await?;

    assert_eq!(
        wallet.sent_functions(),
        vec![
            "approve".to_string(),
            "stake".to_string(),
            "approve".to_string(),
            "increaseEquity".to_string(),
        ]
    );
    Ok(())
}
