use super::{report_flow, report_tx, validate_input, ActionError, ActionGuard, DashboardContext, Refresh};
use crate::balance::{resolve_balance, TokenBalance};
use crate::contracts::{sponsor_lock, sponsor_withdraw, sponsored_amount_of, sponsorship_of};
use crate::flow::{SpendAmount, SpendRequest};
use crate::gateway::TransactionOutcome;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use parking_lot::RwLock;
use serde::Serialize;
use web3::types::Address;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sponsorship {
    pub beneficiary: Address,
    pub amount: TokenBalance,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SponsorView {
    pub wallet_balance: TokenBalance,
    /// Locked by other users for this account
    pub sponsored_to_me: TokenBalance,
    /// Locked by this account for the tracked beneficiaries
    pub sponsored_by_me: Vec<Sponsorship>,
}

pub struct SponsorController {
    ctx: DashboardContext,
    beneficiaries: RwLock<Vec<Address>>,
    view: RwLock<Option<SponsorView>>,
    sponsor_guard: ActionGuard,
    withdraw_guard: ActionGuard,
}

impl SponsorController {
    pub fn new(ctx: DashboardContext) -> Self {
        Self {
            ctx,
            beneficiaries: RwLock::new(Vec::new()),
            view: RwLock::new(None),
            sponsor_guard: ActionGuard::new("sponsor"),
            withdraw_guard: ActionGuard::new("withdraw sponsorship"),
        }
    }

    pub fn view(&self) -> Option<SponsorView> {
        self.view.read().clone()
    }

    /// Include the beneficiary in the sponsored-by-me part of the view
    pub fn track(&self, beneficiary: Address) {
        let mut beneficiaries = self.beneficiaries.write();
        if !beneficiaries.contains(&beneficiary) {
            beneficiaries.push(beneficiary);
        }
    }

    pub async fn refresh(&self) -> SponsorView {
        let account = self.ctx.gateway.account();
        let sponsor = self.ctx.contracts.sponsor;
        let wallet_balance = resolve_balance(&self.ctx.gateway, self.ctx.contracts.token, account).await;
        let decimals = wallet_balance.decimals;
        let sponsored_to_me = self
            .ctx
            .read_amount(sponsored_amount_of(sponsor, account), decimals)
            .await;

        let beneficiaries = self.beneficiaries.read().clone();
        let mut sponsored_by_me = Vec::with_capacity(beneficiaries.len());
        for beneficiary in beneficiaries {
            sponsored_by_me.push(Sponsorship {
                beneficiary,
                amount: self
                    .ctx
                    .read_amount(sponsorship_of(sponsor, account, beneficiary), decimals)
                    .await,
            });
        }

        let view = SponsorView {
            wallet_balance,
            sponsored_to_me,
            sponsored_by_me,
        };
        *self.view.write() = Some(view.clone());
        self.ctx.notifier.view_refreshed("sponsor").await;
        view
    }

    pub async fn sponsor(
        &self,
        beneficiary: Address,
        amount: &str,
    ) -> Result<TransactionOutcome, ActionError> {
        validate_input(amount)?;
        if beneficiary == self.ctx.gateway.account() || beneficiary.is_zero() {
            return Err(ActionError::InvalidInput(format!(
                "Cannot sponsor {beneficiary:#x}"
            )));
        }
        let mut ticket = self.sponsor_guard.try_begin()?;
        self.ctx.notifier.action_started("sponsor").await;

        let sponsor = self.ctx.contracts.sponsor;
        let res = self
            .ctx
            .flow()
            .execute(SpendRequest {
                action_name: "sponsor".to_string(),
                token: self.ctx.contracts.token,
                spender: sponsor,
                amount: SpendAmount::Human(amount.to_string()),
                action: move |amount| sponsor_lock(sponsor, beneficiary, amount),
            })
            .await;
        let outcome = report_flow(&self.ctx.notifier, "Sponsorship", res).await?;
        ticket.succeeded();
        drop(ticket);
        self.track(beneficiary);
        self.refresh().await;
        Ok(outcome)
    }

    pub async fn withdraw_sponsorship(
        &self,
        beneficiary: Address,
    ) -> Result<TransactionOutcome, ActionError> {
        let mut ticket = self.withdraw_guard.try_begin()?;
        let sponsor = self.ctx.contracts.sponsor;
        let locked = self
            .ctx
            .read_uint(sponsorship_of(sponsor, self.ctx.gateway.account(), beneficiary))
            .await;
        if locked.is_zero() {
            return Err(ActionError::NothingToClaim);
        }
        self.ctx.notifier.action_started("withdraw sponsorship").await;

        let res = self
            .ctx
            .flow()
            .submit_and_wait("withdraw sponsorship", sponsor_withdraw(sponsor, beneficiary))
            .await;
        let outcome = report_tx(&self.ctx.notifier, "Withdrawal", res).await?;
        ticket.succeeded();
        drop(ticket);
        self.refresh().await;
        Ok(outcome)
    }
}

impl Refresh for SponsorController {
    fn view_name(&self) -> &'static str {
        "sponsor"
    }

    fn refresh_view(&self) -> BoxFuture<'_, ()> {
        async move {
            self.refresh().await;
        }
        .boxed()
    }
}
