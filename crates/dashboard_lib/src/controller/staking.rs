use super::{report_flow, report_tx, validate_input, ActionError, ActionGuard, DashboardContext, Refresh};
use crate::balance::{resolve_balance, TokenBalance};
use crate::contracts::{
    staking_claim_reward, staking_pending_reward, staking_stake, staking_staked_balance_of,
    staking_unstake,
};
use crate::flow::{SpendAmount, SpendRequest};
use crate::gateway::TransactionOutcome;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use parking_lot::RwLock;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StakingView {
    pub wallet_balance: TokenBalance,
    pub staked_balance: TokenBalance,
    pub pending_rewards: TokenBalance,
}

pub struct StakingController {
    ctx: DashboardContext,
    view: RwLock<Option<StakingView>>,
    stake_guard: ActionGuard,
    unstake_guard: ActionGuard,
    claim_guard: ActionGuard,
}

impl StakingController {
    pub fn new(ctx: DashboardContext) -> Self {
        Self {
            ctx,
            view: RwLock::new(None),
            stake_guard: ActionGuard::new("stake"),
            unstake_guard: ActionGuard::new("unstake"),
            claim_guard: ActionGuard::new("claim reward"),
        }
    }

    /// Last loaded snapshot, None before the first refresh
    pub fn view(&self) -> Option<StakingView> {
        self.view.read().clone()
    }

    pub fn stake_guard(&self) -> &ActionGuard {
        &self.stake_guard
    }

    pub async fn refresh(&self) -> StakingView {
        let account = self.ctx.gateway.account();
        let staking = self.ctx.contracts.staking;
        let wallet_balance = resolve_balance(&self.ctx.gateway, self.ctx.contracts.token, account).await;
        let decimals = wallet_balance.decimals;
        let view = StakingView {
            staked_balance: self
                .ctx
                .read_amount(staking_staked_balance_of(staking, account), decimals)
                .await,
            pending_rewards: self
                .ctx
                .read_amount(staking_pending_reward(staking, account), decimals)
                .await,
            wallet_balance,
        };
        *self.view.write() = Some(view.clone());
        self.ctx.notifier.view_refreshed("staking").await;
        view
    }

    pub async fn stake(&self, amount: &str) -> Result<TransactionOutcome, ActionError> {
        validate_input(amount)?;
        let mut ticket = self.stake_guard.try_begin()?;
        self.ctx.notifier.action_started("stake").await;

        let staking = self.ctx.contracts.staking;
        let res = self
            .ctx
            .flow()
            .execute(SpendRequest {
                action_name: "stake".to_string(),
                token: self.ctx.contracts.token,
                spender: staking,
                amount: SpendAmount::Human(amount.to_string()),
                action: move |amount| staking_stake(staking, amount),
            })
            .await;
        let outcome = report_flow(&self.ctx.notifier, "Stake", res).await?;
        ticket.succeeded();
        drop(ticket);
        self.refresh().await;
        Ok(outcome)
    }

    pub async fn unstake(&self, amount: &str) -> Result<TransactionOutcome, ActionError> {
        validate_input(amount)?;
        let mut ticket = self.unstake_guard.try_begin()?;
        let amount = self.ctx.parse_plain_amount(amount).await?;
        self.ctx.notifier.action_started("unstake").await;

        let res = self
            .ctx
            .flow()
            .submit_and_wait("unstake", staking_unstake(self.ctx.contracts.staking, amount))
            .await;
        let outcome = report_tx(&self.ctx.notifier, "Unstake", res).await?;
        ticket.succeeded();
        drop(ticket);
        self.refresh().await;
        Ok(outcome)
    }

    pub async fn claim_reward(&self) -> Result<TransactionOutcome, ActionError> {
        let mut ticket = self.claim_guard.try_begin()?;
        self.ctx.notifier.action_started("claim reward").await;

        let res = self
            .ctx
            .flow()
            .submit_and_wait("claim reward", staking_claim_reward(self.ctx.contracts.staking))
            .await;
        let outcome = report_tx(&self.ctx.notifier, "Claim reward", res).await?;
        ticket.succeeded();
        drop(ticket);
        self.refresh().await;
        Ok(outcome)
    }
}

impl Refresh for StakingController {
    fn view_name(&self) -> &'static str {
        "staking"
    }

    fn refresh_view(&self) -> BoxFuture<'_, ()> {
        async move {
            self.refresh().await;
        }
        .boxed()
    }
}
