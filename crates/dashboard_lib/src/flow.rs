use crate::balance::{is_native_token, resolve_balance, TokenBalance};
use crate::contracts::erc20_approve;
use crate::error::*;
use crate::eth::check_allowance;
use crate::gateway::{ChainGateway, ContractCall, TransactionOutcome};
use crate::notifier::Notifier;
use crate::{err_create, err_from};
use dashboard_lib_common::utils::{parse_spend_amount, ConversionError};
use dashboard_lib_common::TxKind;
use serde::Serialize;
use web3::types::{Address, U256};

#[derive(Debug, Clone, PartialEq)]
pub enum SpendAmount {
    /// Decimal string as typed by the user, scaled with the token decimals
    Human(String),
    /// Already in base units
    Raw(U256),
}

pub struct SpendRequest<F>
where
    F: FnOnce(U256) -> ContractCall,
{
    pub action_name: String,
    pub token: Address,
    pub spender: Address,
    pub amount: SpendAmount,
    /// Builds the primary call from the exact amount in base units
    pub action: F,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FlowOutcome {
    Completed {
        approval: Option<TransactionOutcome>,
        action: TransactionOutcome,
    },
    InsufficientBalance {
        requested: U256,
        available: TokenBalance,
    },
    ApprovalFailed {
        approval: TransactionOutcome,
    },
    ActionFailed {
        approval: Option<TransactionOutcome>,
        action: TransactionOutcome,
    },
}

impl FlowOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, FlowOutcome::Completed { .. })
    }
}

/// Spends tokens only after the allowance for the spender has been confirmed on chain.
///
/// Steps are strictly sequential: balance, allowance, optional unlimited approval
/// (waited for), primary action (waited for). Nothing is retried.
#[derive(Clone)]
pub struct AllowanceGatedFlow {
    gateway: ChainGateway,
    notifier: Notifier,
}

impl AllowanceGatedFlow {
    pub fn new(gateway: ChainGateway, notifier: Notifier) -> Self {
        Self { gateway, notifier }
    }

    pub fn gateway(&self) -> &ChainGateway {
        &self.gateway
    }

    pub async fn execute<F>(&self, request: SpendRequest<F>) -> Result<FlowOutcome, DashboardError>
    where
        F: FnOnce(U256) -> ContractCall,
    {
        let owner = self.gateway.account();
        let balance = resolve_balance(&self.gateway, request.token, owner).await;

        let amount = match &request.amount {
            SpendAmount::Human(input) => {
                parse_spend_amount(input, balance.decimals).map_err(err_from!())?
            }
            SpendAmount::Raw(amount) if amount.is_zero() => {
                return Err(err_create!(ConversionError::from(
                    "Amount has to be greater than zero".to_string()
                )));
            }
            SpendAmount::Raw(amount) => *amount,
        };

        if balance.raw_value < amount {
            log::info!(
                "{}: balance {} too low for amount {}",
                request.action_name,
                balance.raw_value,
                amount
            );
            return Ok(FlowOutcome::InsufficientBalance {
                requested: amount,
                available: balance,
            });
        }

        let approval = if is_native_token(request.token) {
            None
        } else {
            let allowance =
                check_allowance(&self.gateway, owner, request.token, request.spender, amount)
                    .await?;
            if allowance.is_sufficient() {
                log::debug!("{}: allowance sufficient, skipping approval", request.action_name);
                None
            } else {
                log::info!(
                    "{}: allowance {} lower than {}, requesting approval",
                    request.action_name,
                    allowance.current_allowance,
                    amount
                );
                let approve_call = erc20_approve(request.token, request.spender, U256::MAX);
                let approval = self
                    .submit_and_wait_kind(&request.action_name, TxKind::Approve, approve_call)
                    .await?;
                if !approval.is_success() {
                    log::warn!("{}: approval failed, action not submitted", request.action_name);
                    return Ok(FlowOutcome::ApprovalFailed { approval });
                }
                Some(approval)
            }
        };

        let action_call = (request.action)(amount);
        let action = self
            .submit_and_wait_kind(&request.action_name, TxKind::Action, action_call)
            .await?;
        if action.is_success() {
            Ok(FlowOutcome::Completed { approval, action })
        } else {
            Ok(FlowOutcome::ActionFailed { approval, action })
        }
    }

    /// Submit a call that spends nothing and wait for its receipt
    pub async fn submit_and_wait(
        &self,
        action_name: &str,
        call: ContractCall,
    ) -> Result<TransactionOutcome, DashboardError> {
        self.submit_and_wait_kind(action_name, TxKind::Action, call)
            .await
    }

    async fn submit_and_wait_kind(
        &self,
        action_name: &str,
        kind: TxKind,
        call: ContractCall,
    ) -> Result<TransactionOutcome, DashboardError> {
        let handle = self.gateway.write_contract(call).await?;
        self.notifier
            .tx_submitted(action_name, kind, handle.hash)
            .await;
        let outcome = self.gateway.wait_for_receipt(&handle).await?;
        self.notifier
            .tx_confirmed(action_name, kind, outcome.hash, outcome.is_success())
            .await;
        Ok(outcome)
    }
}
