use super::{report_tx, ActionError, ActionGuard, DashboardContext, Refresh};
use crate::balance::{resolve_decimals, TokenBalance};
use crate::contracts::{vesting_claim, vesting_claimable_amount, vesting_schedule};
use crate::gateway::TransactionOutcome;
use chrono::{DateTime, Utc};
use dashboard_lib_common::utils::datetime_from_u256_timestamp;
use dashboard_lib_common::Toast;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use parking_lot::RwLock;
use serde::Serialize;
use web3::types::U256;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VestingView {
    pub total: TokenBalance,
    pub released: TokenBalance,
    pub claimable: TokenBalance,
    pub start: Option<DateTime<Utc>>,
    pub duration_secs: u64,
}

impl VestingView {
    /// None without a schedule or when the end does not fit a date
    pub fn end(&self) -> Option<DateTime<Utc>> {
        let duration =
            chrono::Duration::from_std(std::time::Duration::from_secs(self.duration_secs)).ok()?;
        self.start?.checked_add_signed(duration)
    }
}

pub struct ClaimController {
    ctx: DashboardContext,
    view: RwLock<Option<VestingView>>,
    claim_guard: ActionGuard,
}

impl ClaimController {
    pub fn new(ctx: DashboardContext) -> Self {
        Self {
            ctx,
            view: RwLock::new(None),
            claim_guard: ActionGuard::new("claim vesting"),
        }
    }

    pub fn view(&self) -> Option<VestingView> {
        self.view.read().clone()
    }

    pub async fn refresh(&self) -> VestingView {
        let account = self.ctx.gateway.account();
        let vesting = self.ctx.contracts.vesting;
        let decimals = resolve_decimals(&self.ctx.gateway, self.ctx.contracts.token).await;
        let schedule = self
            .ctx
            .gateway
            .read_contract(vesting_schedule(vesting, account))
            .await;
        let claimable = self
            .ctx
            .read_amount(vesting_claimable_amount(vesting, account), decimals)
            .await;
        let uint_at = |idx| schedule.uint(idx).unwrap_or_default();
        let duration = uint_at(3);
        let view = VestingView {
            total: TokenBalance::new(uint_at(0), decimals),
            released: TokenBalance::new(uint_at(1), decimals),
            start: Some(uint_at(2))
                .filter(|start| !start.is_zero())
                .and_then(datetime_from_u256_timestamp),
            duration_secs: if duration > U256::from(u32::MAX) {
                u32::MAX as u64
            } else {
                duration.as_u64()
            },
            claimable,
        };
        *self.view.write() = Some(view.clone());
        self.ctx.notifier.view_refreshed("vesting").await;
        view
    }

    pub async fn claim(&self) -> Result<TransactionOutcome, ActionError> {
        let mut ticket = self.claim_guard.try_begin()?;
        let vesting = self.ctx.contracts.vesting;
        let claimable = self
            .ctx
            .read_uint(vesting_claimable_amount(vesting, self.ctx.gateway.account()))
            .await;
        if claimable.is_zero() {
            self.ctx.notifier.toast(Toast::info("Nothing to claim yet")).await;
            return Err(ActionError::NothingToClaim);
        }
        self.ctx.notifier.action_started("claim vesting").await;

        let res = self
            .ctx
            .flow()
            .submit_and_wait("claim vesting", vesting_claim(vesting))
            .await;
        let outcome = report_tx(&self.ctx.notifier, "Claim", res).await?;
        ticket.succeeded();
        drop(ticket);
        self.refresh().await;
        Ok(outcome)
    }
}

impl Refresh for ClaimController {
    fn view_name(&self) -> &'static str {
        "vesting"
    }

    fn refresh_view(&self) -> BoxFuture<'_, ()> {
        async move {
            self.refresh().await;
        }
        .boxed()
    }
}
