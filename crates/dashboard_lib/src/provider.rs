use crate::config::{Engine, Environment};
use crate::contracts::{contract_decode, contract_encode};
use crate::error::*;
use crate::gateway::{ContractCall, TxReceipt, WalletProvider};
use crate::signer::Signer;
use crate::{err_create, err_custom_create, err_from};
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use std::sync::Arc;
use web3::ethabi::Token;
use web3::transports::Http;
use web3::types::{
    Address, BlockNumber, Bytes, CallRequest, TransactionParameters, H256, U256, U64,
};
use web3::Web3;

#[derive(Debug, Clone)]
pub struct FeeSettings {
    pub chain_id: u64,
    pub priority_fee: U256,
    pub max_fee_per_gas: U256,
    /// Percent added to the estimated gas
    pub gas_safety_margin: u64,
}

impl FeeSettings {
    pub fn from_config(engine: &Engine, environment: &Environment) -> Result<Self, DashboardError> {
        Ok(FeeSettings {
            chain_id: environment.chain_id,
            priority_fee: environment.priority_fee_wei()?,
            max_fee_per_gas: environment.max_fee_per_gas_wei()?,
            gas_safety_margin: engine.gas_safety_margin,
        })
    }

    pub fn gas_limit(&self, gas_estimation: U256) -> U256 {
        gas_estimation + gas_estimation * U256::from(self.gas_safety_margin) / U256::from(100)
    }
}

/// Wallet backed by a local key and a JSON-RPC endpoint
pub struct Web3WalletProvider {
    web3: Web3<Http>,
    account: Address,
    signer: Arc<dyn Signer>,
    fees: FeeSettings,
}

impl Web3WalletProvider {
    pub async fn connect(
        rpc_endpoint: &str,
        account: Address,
        signer: Arc<dyn Signer>,
        fees: FeeSettings,
    ) -> Result<Self, DashboardError> {
        let transport = Http::new(rpc_endpoint).map_err(err_from!())?;
        signer
            .check_if_sign_possible(account)
            .await
            .map_err(|err| err_custom_create!("Cannot sign for {:#x}: {}", account, err))?;
        log::debug!("Connected wallet {:#x} to {}", account, rpc_endpoint);
        Ok(Self {
            web3: Web3::new(transport),
            account,
            signer,
            fees,
        })
    }

    fn call_request(&self, call: &ContractCall) -> Result<CallRequest, DashboardError> {
        let data = contract_encode(call).map_err(err_from!())?;
        Ok(CallRequest {
            from: Some(self.account),
            to: Some(call.address),
            value: Some(call.value),
            data: Some(Bytes(data)),
            ..Default::default()
        })
    }

    async fn estimate_gas(&self, call: &ContractCall) -> Result<U256, DashboardError> {
        let call_request = CallRequest {
            transaction_type: Some(U64::from(2)),
            max_fee_per_gas: Some(self.fees.max_fee_per_gas),
            max_priority_fee_per_gas: Some(self.fees.priority_fee),
            ..self.call_request(call)?
        };
        match self.web3.eth().estimate_gas(call_request, None).await {
            Ok(gas_est) => Ok(gas_est),
            Err(e) => {
                if e.to_string().contains("gas required exceeds allowance") {
                    log::error!("Gas estimation failed - probably insufficient funds: {}", e);
                    return Err(err_custom_create!(
                        "Gas estimation failed - probably insufficient funds"
                    ));
                }
                // keep the rpc error so the revert reason reaches the user
                Err(err_create!(e))
            }
        }
    }

    async fn send_inner(&self, call: ContractCall) -> Result<H256, DashboardError> {
        let gas_est = self.estimate_gas(&call).await?;
        let gas_limit = self.fees.gas_limit(gas_est);
        log::debug!("Gas estimation for {}: {}, using limit {}", call, gas_est, gas_limit);

        let nonce = self
            .web3
            .eth()
            .transaction_count(self.account, Some(BlockNumber::Pending))
            .await
            .map_err(err_from!())?;

        let tx_object = TransactionParameters {
            nonce: Some(nonce),
            to: Some(call.address),
            gas: gas_limit,
            gas_price: None,
            value: call.value,
            data: Bytes(contract_encode(&call).map_err(err_from!())?),
            chain_id: Some(self.fees.chain_id),
            transaction_type: Some(U64::from(2)),
            access_list: None,
            max_fee_per_gas: Some(self.fees.max_fee_per_gas),
            max_priority_fee_per_gas: Some(self.fees.priority_fee),
        };
        let signed = self
            .signer
            .sign(self.account, tx_object)
            .await
            .map_err(|err| err_custom_create!("Signing transaction failed: {}", err))?;
        let tx_hash = self
            .web3
            .eth()
            .send_raw_transaction(signed.raw_transaction)
            .await
            .map_err(err_from!())?;
        if tx_hash != signed.transaction_hash {
            log::warn!(
                "Node returned hash {:#x}, expected {:#x}",
                tx_hash,
                signed.transaction_hash
            );
        }
        Ok(tx_hash)
    }
}

impl WalletProvider for Web3WalletProvider {
    fn account(&self) -> Address {
        self.account
    }

    fn call(&self, call: ContractCall) -> BoxFuture<'_, Result<Vec<Token>, DashboardError>> {
        async move {
            let call_request = self.call_request(&call)?;
            let res = self
                .web3
                .eth()
                .call(call_request, None)
                .await
                .map_err(err_from!())?;
            contract_decode(&call, &res.0).map_err(err_from!())
        }
        .boxed()
    }

    fn send(&self, call: ContractCall) -> BoxFuture<'_, Result<H256, DashboardError>> {
        self.send_inner(call).boxed()
    }

    fn receipt(&self, tx_hash: H256) -> BoxFuture<'_, Result<Option<TxReceipt>, DashboardError>> {
        async move {
            let receipt = self
                .web3
                .eth()
                .transaction_receipt(tx_hash)
                .await
                .map_err(err_from!())?;
            Ok(receipt.map(|receipt| TxReceipt {
                tx_hash: receipt.transaction_hash,
                block_number: receipt.block_number.map(|b| b.as_u64()),
                status: receipt.status.map(|s| s.as_u64()),
                gas_used: receipt.gas_used,
            }))
        }
        .boxed()
    }

    fn native_balance(&self, address: Address) -> BoxFuture<'_, Result<U256, DashboardError>> {
        async move {
            self.web3
                .eth()
                .balance(address, None)
                .await
                .map_err(err_from!())
        }
        .boxed()
    }

    fn sign_message(&self, message: Vec<u8>) -> BoxFuture<'_, Result<Vec<u8>, DashboardError>> {
        async move {
            self.signer
                .sign_message(self.account, message)
                .await
                .map_err(|err| err_custom_create!("Signing message failed: {}", err))
        }
        .boxed()
    }
}
