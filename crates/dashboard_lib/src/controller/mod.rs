mod claim;
mod equity;
mod guard;
mod poller;
mod pricing;
mod sponsor;
mod staking;

pub use claim::{ClaimController, VestingView};
pub use equity::{EquityController, EquityView};
pub use guard::{ActionError, ActionGuard, ActionState, ActionTicket};
pub use poller::{Poller, Refresh};
pub use pricing::{PricingController, PricingTier, PricingView};
pub use sponsor::{SponsorController, SponsorView};
pub use staking::{StakingController, StakingView};

use crate::balance::{read_decimals, TokenBalance};
use crate::config::Contracts;
use crate::error::*;
use crate::error_message::normalize_error;
use crate::flow::{AllowanceGatedFlow, FlowOutcome};
use crate::gateway::{ChainGateway, ContractCall, TransactionOutcome};
use crate::notifier::Notifier;
use dashboard_lib_common::utils::{parse_spend_amount, validate_amount_input};
use dashboard_lib_common::Toast;
use web3::types::U256;

/// Everything a page needs to talk to the chain, passed explicitly to each controller
#[derive(Clone)]
pub struct DashboardContext {
    pub gateway: ChainGateway,
    pub notifier: Notifier,
    pub contracts: Contracts,
}

impl DashboardContext {
    pub fn new(gateway: ChainGateway, notifier: Notifier, contracts: Contracts) -> Self {
        Self {
            gateway,
            notifier,
            contracts,
        }
    }

    pub fn flow(&self) -> AllowanceGatedFlow {
        AllowanceGatedFlow::new(self.gateway.clone(), self.notifier.clone())
    }

    /// Uint read that degrades to zero, the way balances do
    pub(crate) async fn read_uint(&self, call: ContractCall) -> U256 {
        self.gateway
            .read_contract(call)
            .await
            .first_uint()
            .unwrap_or_default()
    }

    pub(crate) async fn read_amount(&self, call: ContractCall, decimals: u8) -> TokenBalance {
        TokenBalance::new(self.read_uint(call).await, decimals)
    }

    /// Amount typed for an action that spends nothing, scaled with the platform token decimals.
    /// Unlike views, a write never falls back to 18 decimals.
    pub(crate) async fn parse_plain_amount(&self, input: &str) -> Result<U256, ActionError> {
        validate_input(input)?;
        let Some(decimals) = read_decimals(&self.gateway, self.contracts.token).await else {
            log::error!("Cannot read decimals of token {:#x}", self.contracts.token);
            let err = ActionError::Failed("Cannot read token decimals".to_string());
            self.notifier.toast(Toast::error(err.to_string())).await;
            return Err(err);
        };
        parse_spend_amount(input, decimals).map_err(|err| ActionError::InvalidInput(err.msg))
    }
}

pub(crate) fn validate_input(input: &str) -> Result<(), ActionError> {
    validate_amount_input(input).map_err(|err| ActionError::InvalidInput(err.msg))
}

fn action_error(err: &DashboardError) -> ActionError {
    match &err.inner {
        ErrorBag::ConversionError(conversion) => ActionError::InvalidInput(conversion.msg.clone()),
        _ => ActionError::Failed(normalize_error(err)),
    }
}

/// Toast the result of a gated flow, returns the primary transaction when it succeeded
pub(crate) async fn report_flow(
    notifier: &Notifier,
    label: &str,
    res: Result<FlowOutcome, DashboardError>,
) -> Result<TransactionOutcome, ActionError> {
    let err = match res {
        Ok(FlowOutcome::Completed { action, .. }) => {
            notifier
                .toast(Toast::success(format!("{label} successful")))
                .await;
            return Ok(action);
        }
        Ok(FlowOutcome::InsufficientBalance { .. }) => ActionError::InsufficientBalance,
        Ok(FlowOutcome::ApprovalFailed { approval }) => {
            ActionError::Failed(format!("Approval failed ({:#x})", approval.hash))
        }
        Ok(FlowOutcome::ActionFailed { action, .. }) => {
            ActionError::Failed(format!("{label} failed ({:#x})", action.hash))
        }
        Err(err) => {
            log::error!("{} failed: {}", label, err);
            action_error(&err)
        }
    };
    notifier.toast(Toast::error(err.to_string())).await;
    Err(err)
}

/// Toast the result of a single transaction
pub(crate) async fn report_tx(
    notifier: &Notifier,
    label: &str,
    res: Result<TransactionOutcome, DashboardError>,
) -> Result<TransactionOutcome, ActionError> {
    let err = match res {
        Ok(outcome) if outcome.is_success() => {
            notifier
                .toast(Toast::success(format!("{label} successful")))
                .await;
            return Ok(outcome);
        }
        Ok(outcome) => ActionError::Failed(format!("{label} failed ({:#x})", outcome.hash)),
        Err(err) => {
            log::error!("{} failed: {}", label, err);
            action_error(&err)
        }
    };
    notifier.toast(Toast::error(err.to_string())).await;
    Err(err)
}
