use crate::contracts::ContractAbi;
use crate::error::*;
use crate::{err_create, err_custom_create};
use futures_util::future::BoxFuture;
use serde::Serialize;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::{Duration, Instant};
use web3::ethabi::Token;
use web3::types::{Address, H256, U256};

pub const READ_CODE_OK: u16 = 200;
pub const READ_CODE_FAILED: u16 = 500;

/// Single contract function invocation, used both for reads and writes
#[derive(Debug, Clone, PartialEq)]
pub struct ContractCall {
    pub address: Address,
    pub abi: ContractAbi,
    pub function: String,
    pub args: Vec<Token>,
    pub value: U256,
}

impl ContractCall {
    pub fn new(address: Address, abi: ContractAbi, function: &str, args: Vec<Token>) -> Self {
        Self {
            address,
            abi,
            function: function.to_string(),
            args,
            value: U256::zero(),
        }
    }

    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }

    /// Amount argument of the call, if the call carries one
    pub fn uint_arg(&self, index: usize) -> Option<U256> {
        self.args.get(index).and_then(|t| t.clone().into_uint())
    }
}

impl Display for ContractCall {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}.{} at {:#x}",
            self.abi.name(),
            self.function,
            self.address
        )
    }
}

/// Receipt data the dashboard cares about
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TxReceipt {
    pub tx_hash: H256,
    pub block_number: Option<u64>,
    pub status: Option<u64>,
    pub gas_used: Option<U256>,
}

/// Connected wallet together with the chain RPC behind it
pub trait WalletProvider: Send + Sync {
    /// Address of the connected account
    fn account(&self) -> Address;

    /// Read only contract call, returns decoded outputs
    fn call(&self, call: ContractCall) -> BoxFuture<'_, Result<Vec<Token>, DashboardError>>;

    /// Sign and submit a state changing call, returns transaction hash
    fn send(&self, call: ContractCall) -> BoxFuture<'_, Result<H256, DashboardError>>;

    /// Receipt of a submitted transaction, None while not yet mined
    fn receipt(&self, tx_hash: H256) -> BoxFuture<'_, Result<Option<TxReceipt>, DashboardError>>;

    fn native_balance(&self, address: Address) -> BoxFuture<'_, Result<U256, DashboardError>>;

    /// Sign arbitrary message with the account key (personal sign)
    fn sign_message(&self, message: Vec<u8>) -> BoxFuture<'_, Result<Vec<u8>, DashboardError>>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReadResponse {
    pub code: u16,
    pub data: Option<Vec<Token>>,
}

impl ReadResponse {
    pub fn ok(data: Vec<Token>) -> Self {
        Self {
            code: READ_CODE_OK,
            data: Some(data),
        }
    }

    pub fn failed() -> Self {
        Self {
            code: READ_CODE_FAILED,
            data: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.code == READ_CODE_OK
    }

    pub fn uint(&self, index: usize) -> Option<U256> {
        self.data
            .as_ref()
            .and_then(|data| data.get(index))
            .and_then(|token| token.clone().into_uint())
    }

    pub fn first_uint(&self) -> Option<U256> {
        self.uint(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TxStatus {
    Pending,
    Success,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionOutcome {
    pub hash: H256,
    pub status: TxStatus,
}

impl TransactionOutcome {
    pub fn is_success(&self) -> bool {
        self.status == TxStatus::Success
    }
}

/// Handle of a submitted transaction, awaited with [`ChainGateway::wait_for_receipt`]
#[derive(Debug, Clone, PartialEq)]
pub struct TxHandle {
    pub hash: H256,
    pub description: String,
}

impl TxHandle {
    pub fn pending(&self) -> TransactionOutcome {
        TransactionOutcome {
            hash: self.hash,
            status: TxStatus::Pending,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GatewaySettings {
    pub receipt_poll_interval: Duration,
    pub transaction_timeout: Duration,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        GatewaySettings {
            receipt_poll_interval: Duration::from_secs(2),
            transaction_timeout: Duration::from_secs(300),
        }
    }
}

#[derive(Clone)]
pub struct ChainGateway {
    provider: Arc<dyn WalletProvider>,
    settings: GatewaySettings,
}

impl ChainGateway {
    pub fn new(provider: Arc<dyn WalletProvider>, settings: GatewaySettings) -> Self {
        Self { provider, settings }
    }

    pub fn account(&self) -> Address {
        self.provider.account()
    }

    pub fn provider(&self) -> Arc<dyn WalletProvider> {
        self.provider.clone()
    }

    /// Never fails, any error is reported as code 500 without data
    pub async fn read_contract(&self, call: ContractCall) -> ReadResponse {
        let description = call.to_string();
        match self.provider.call(call).await {
            Ok(data) => ReadResponse::ok(data),
            Err(err) => {
                log::warn!("Read {} failed: {}", description, err);
                ReadResponse::failed()
            }
        }
    }

    pub async fn write_contract(&self, call: ContractCall) -> Result<TxHandle, DashboardError> {
        let description = call.to_string();
        log::debug!("Submitting transaction {}", description);
        let hash = self.provider.send(call).await?;
        log::info!("Transaction {} submitted: {:#x}", description, hash);
        Ok(TxHandle { hash, description })
    }

    /// Polls for the receipt until it is found or the transaction timeout is reached
    pub async fn wait_for_receipt(
        &self,
        handle: &TxHandle,
    ) -> Result<TransactionOutcome, DashboardError> {
        let started = Instant::now();
        loop {
            if let Some(receipt) = self.provider.receipt(handle.hash).await? {
                let status = match receipt.status {
                    Some(1) => TxStatus::Success,
                    _ => TxStatus::Failed,
                };
                log::info!(
                    "Transaction {} ({:#x}) confirmed in block {:?} with status {:?}",
                    handle.description,
                    handle.hash,
                    receipt.block_number,
                    status
                );
                return Ok(TransactionOutcome {
                    hash: handle.hash,
                    status,
                });
            }
            if started.elapsed() >= self.settings.transaction_timeout {
                log::warn!(
                    "No receipt for {} ({:#x}) after {:?}",
                    handle.description,
                    handle.hash,
                    self.settings.transaction_timeout
                );
                return Err(err_create!(self.settings.transaction_timeout));
            }
            tokio::time::sleep(self.settings.receipt_poll_interval).await;
        }
    }

    pub async fn native_balance(&self, address: Address) -> Result<U256, DashboardError> {
        self.provider.native_balance(address).await
    }

    pub async fn sign_message(&self, message: &[u8]) -> Result<Vec<u8>, DashboardError> {
        let signature = self.provider.sign_message(message.to_vec()).await?;
        if signature.is_empty() {
            return Err(err_custom_create!("Wallet returned empty signature"));
        }
        Ok(signature)
    }
}
