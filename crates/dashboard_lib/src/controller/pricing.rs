use super::{report_flow, ActionError, ActionGuard, DashboardContext, Refresh};
use crate::balance::{resolve_balance, TokenBalance};
use crate::contracts::{pricing_subscribe, pricing_subscription_expiry, pricing_tier_price};
use crate::flow::{SpendAmount, SpendRequest};
use crate::gateway::TransactionOutcome;
use chrono::{DateTime, Utc};
use dashboard_lib_common::utils::datetime_from_u256_timestamp;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingTier {
    pub tier_id: u64,
    pub price: TokenBalance,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingView {
    pub wallet_balance: TokenBalance,
    pub tiers: Vec<PricingTier>,
    /// None when the account never subscribed
    pub subscription_expiry: Option<DateTime<Utc>>,
}

impl PricingView {
    pub fn is_subscribed(&self, now: DateTime<Utc>) -> bool {
        self.subscription_expiry.map(|exp| exp > now).unwrap_or(false)
    }
}

pub struct PricingController {
    ctx: DashboardContext,
    // one button per tier
    subscribe_guards: BTreeMap<u64, ActionGuard>,
    view: RwLock<Option<PricingView>>,
}

impl PricingController {
    pub fn new(ctx: DashboardContext, tier_ids: &[u64]) -> Self {
        Self {
            ctx,
            subscribe_guards: tier_ids
                .iter()
                .map(|tier_id| (*tier_id, ActionGuard::new("subscribe")))
                .collect(),
            view: RwLock::new(None),
        }
    }

    pub fn view(&self) -> Option<PricingView> {
        self.view.read().clone()
    }

    pub async fn tiers(&self, decimals: u8) -> Vec<PricingTier> {
        let mut tiers = Vec::with_capacity(self.subscribe_guards.len());
        for tier_id in self.subscribe_guards.keys() {
            let price = self
                .ctx
                .read_amount(pricing_tier_price(self.ctx.contracts.pricing, *tier_id), decimals)
                .await;
            tiers.push(PricingTier {
                tier_id: *tier_id,
                price,
            });
        }
        tiers
    }

    pub async fn refresh(&self) -> PricingView {
        let account = self.ctx.gateway.account();
        let wallet_balance = resolve_balance(&self.ctx.gateway, self.ctx.contracts.token, account).await;
        let tiers = self.tiers(wallet_balance.decimals).await;
        let expiry = self
            .ctx
            .read_uint(pricing_subscription_expiry(self.ctx.contracts.pricing, account))
            .await;
        let view = PricingView {
            wallet_balance,
            tiers,
            subscription_expiry: Some(expiry)
                .filter(|expiry| !expiry.is_zero())
                .and_then(datetime_from_u256_timestamp),
        };
        *self.view.write() = Some(view.clone());
        self.ctx.notifier.view_refreshed("pricing").await;
        view
    }

    /// Pay the current tier price, read right before subscribing
    pub async fn subscribe(&self, tier_id: u64) -> Result<TransactionOutcome, ActionError> {
        let guard = self
            .subscribe_guards
            .get(&tier_id)
            .ok_or_else(|| ActionError::InvalidInput(format!("Unknown pricing tier {tier_id}")))?;
        let mut ticket = guard.try_begin()?;

        let pricing = self.ctx.contracts.pricing;
        let price = self.ctx.read_uint(pricing_tier_price(pricing, tier_id)).await;
        if price.is_zero() {
            return Err(ActionError::InvalidInput(format!(
                "Pricing tier {tier_id} is not available"
            )));
        }
        self.ctx.notifier.action_started("subscribe").await;

        let res = self
            .ctx
            .flow()
            .execute(SpendRequest {
                action_name: format!("subscribe tier {tier_id}"),
                token: self.ctx.contracts.token,
                spender: pricing,
                amount: SpendAmount::Raw(price),
                action: move |_| pricing_subscribe(pricing, tier_id),
            })
            .await;
        let outcome = report_flow(&self.ctx.notifier, "Subscription", res).await?;
        ticket.succeeded();
        drop(ticket);
        self.refresh().await;
        Ok(outcome)
    }
}

impl Refresh for PricingController {
    fn view_name(&self) -> &'static str {
        "pricing"
    }

    fn refresh_view(&self) -> BoxFuture<'_, ()> {
        async move {
            self.refresh().await;
        }
        .boxed()
    }
}
