use super::{report_flow, report_tx, validate_input, ActionError, ActionGuard, DashboardContext, Refresh};
use crate::balance::{resolve_balance, TokenBalance};
use crate::contracts::{equity_decrease, equity_increase, equity_of, sponsored_amount_of};
use crate::flow::{SpendAmount, SpendRequest};
use crate::gateway::TransactionOutcome;
use crate::level::{compute_level_info, UserLevelInfo};
use dashboard_lib_common::utils::parse_units;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use parking_lot::RwLock;
use serde::Serialize;
use web3::types::U256;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EquityView {
    pub wallet_balance: TokenBalance,
    pub level: UserLevelInfo,
}

pub struct EquityController {
    ctx: DashboardContext,
    level_thresholds: Vec<String>,
    view: RwLock<Option<EquityView>>,
    increase_guard: ActionGuard,
    decrease_guard: ActionGuard,
}

impl EquityController {
    pub fn new(ctx: DashboardContext, level_thresholds: Vec<String>) -> Self {
        Self {
            ctx,
            level_thresholds,
            view: RwLock::new(None),
            increase_guard: ActionGuard::new("increase equity"),
            decrease_guard: ActionGuard::new("decrease equity"),
        }
    }

    pub fn view(&self) -> Option<EquityView> {
        self.view.read().clone()
    }

    fn thresholds(&self, decimals: u8) -> Vec<U256> {
        self.level_thresholds
            .iter()
            .filter_map(|threshold| match parse_units(threshold, decimals) {
                Ok(raw) => Some(raw),
                Err(err) => {
                    log::warn!("Ignoring level threshold {}: {}", threshold, err);
                    None
                }
            })
            .collect()
    }

    pub async fn refresh(&self) -> EquityView {
        let account = self.ctx.gateway.account();
        let wallet_balance = resolve_balance(&self.ctx.gateway, self.ctx.contracts.token, account).await;
        let decimals = wallet_balance.decimals;
        let equity = self
            .ctx
            .read_uint(equity_of(self.ctx.contracts.equity, account))
            .await;
        let sponsored = self
            .ctx
            .read_uint(sponsored_amount_of(self.ctx.contracts.sponsor, account))
            .await;
        let view = EquityView {
            level: compute_level_info(equity, sponsored, &self.thresholds(decimals), decimals),
            wallet_balance,
        };
        *self.view.write() = Some(view.clone());
        self.ctx.notifier.view_refreshed("equity").await;
        view
    }

    pub async fn increase_equity(&self, amount: &str) -> Result<TransactionOutcome, ActionError> {
        validate_input(amount)?;
        let mut ticket = self.increase_guard.try_begin()?;
        self.ctx.notifier.action_started("increase equity").await;

        let equity = self.ctx.contracts.equity;
        let res = self
            .ctx
            .flow()
            .execute(SpendRequest {
                action_name: "increase equity".to_string(),
                token: self.ctx.contracts.token,
                spender: equity,
                amount: SpendAmount::Human(amount.to_string()),
                action: move |amount| equity_increase(equity, amount),
            })
            .await;
        let outcome = report_flow(&self.ctx.notifier, "Equity increase", res).await?;
        ticket.succeeded();
        drop(ticket);
        self.refresh().await;
        Ok(outcome)
    }

    pub async fn decrease_equity(&self, amount: &str) -> Result<TransactionOutcome, ActionError> {
        validate_input(amount)?;
        let mut ticket = self.decrease_guard.try_begin()?;
        let amount = self.ctx.parse_plain_amount(amount).await?;
        let current = self
            .ctx
            .read_uint(equity_of(self.ctx.contracts.equity, self.ctx.gateway.account()))
            .await;
        if current < amount {
            return Err(ActionError::InvalidInput(
                "Amount exceeds current equity".to_string(),
            ));
        }
        self.ctx.notifier.action_started("decrease equity").await;

        let res = self
            .ctx
            .flow()
            .submit_and_wait("decrease equity", equity_decrease(self.ctx.contracts.equity, amount))
            .await;
        let outcome = report_tx(&self.ctx.notifier, "Equity decrease", res).await?;
        ticket.succeeded();
        drop(ticket);
        self.refresh().await;
        Ok(outcome)
    }
}

impl Refresh for EquityController {
    fn view_name(&self) -> &'static str {
        "equity"
    }

    fn refresh_view(&self) -> BoxFuture<'_, ()> {
        async move {
            self.refresh().await;
        }
        .boxed()
    }
}
