use dashboard_lib::error::*;
use dashboard_lib::gateway::{ContractCall, TxReceipt, WalletProvider};
use dashboard_lib::err_custom_create;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use parking_lot::Mutex;
use sha3::{Digest, Keccak256};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use web3::ethabi::Token;
use web3::types::{Address, H256, U256};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Read,
    Write,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub kind: CallKind,
    pub call: ContractCall,
}

/// On-chain state of the in-memory chain
#[derive(Debug, Default)]
pub struct MockChain {
    pub decimals: BTreeMap<Address, u8>,
    pub balances: BTreeMap<(Address, Address), U256>,
    pub allowances: BTreeMap<(Address, Address, Address), U256>,
    pub native_balances: BTreeMap<Address, U256>,
    /// Outputs of any other read, by contract and function name
    pub scripted: BTreeMap<(Address, String), Vec<Token>>,
}

impl MockChain {
    pub fn balance(&self, token: Address, owner: Address) -> U256 {
        self.balances
            .get(&(token, owner))
            .copied()
            .unwrap_or_default()
    }

    pub fn set_balance(&mut self, token: Address, owner: Address, amount: U256) {
        self.balances.insert((token, owner), amount);
    }

    pub fn set_uint(&mut self, contract: Address, function: &str, value: U256) {
        self.scripted
            .insert((contract, function.to_string()), vec![Token::Uint(value)]);
    }

    pub fn uint(&self, contract: Address, function: &str) -> U256 {
        self.scripted
            .get(&(contract, function.to_string()))
            .and_then(|tokens| tokens.first())
            .and_then(|token| token.clone().into_uint())
            .unwrap_or_default()
    }

    fn read(&self, call: &ContractCall) -> Option<Vec<Token>> {
        let addr_arg = |idx: usize| call.args.get(idx).and_then(|t| t.clone().into_address());
        match call.function.as_str() {
            "decimals" if self.decimals.contains_key(&call.address) => {
                Some(vec![Token::Uint(U256::from(self.decimals[&call.address]))])
            }
            "balanceOf" if self.decimals.contains_key(&call.address) => {
                let owner = addr_arg(0)?;
                Some(vec![Token::Uint(self.balance(call.address, owner))])
            }
            "allowance" if self.decimals.contains_key(&call.address) => {
                let owner = addr_arg(0)?;
                let spender = addr_arg(1)?;
                let allowance = self
                    .allowances
                    .get(&(call.address, owner, spender))
                    .copied()
                    .unwrap_or_default();
                Some(vec![Token::Uint(allowance)])
            }
            _ => self
                .scripted
                .get(&(call.address, call.function.clone()))
                .cloned(),
        }
    }
}

type Effect = Arc<dyn Fn(&mut MockChain, Address, &ContractCall) + Send + Sync>;

struct PendingReceipt {
    receipt: TxReceipt,
    polls_left: u32,
}

#[derive(Default)]
struct MockState {
    chain: MockChain,
    effects: BTreeMap<String, Vec<Effect>>,
    failing_reads: BTreeSet<String>,
    failing_sends: BTreeSet<String>,
    reverting_sends: BTreeSet<String>,
    calls: Vec<RecordedCall>,
    receipts: BTreeMap<H256, PendingReceipt>,
    receipt_delay: u32,
    never_confirm: bool,
    native_balance_fails: bool,
    nonce: u64,
}

/// Wallet provider over an in-memory chain.
///
/// ERC20 reads of registered tokens are answered from balances/allowances,
/// `approve` updates the allowance, everything else is scripted per test.
pub struct MockWalletProvider {
    account: Address,
    state: Mutex<MockState>,
}

impl MockWalletProvider {
    pub fn new(account: Address) -> Self {
        Self {
            account,
            state: Mutex::new(MockState::default()),
        }
    }

    pub fn with_chain<R>(&self, f: impl FnOnce(&mut MockChain) -> R) -> R {
        f(&mut self.state.lock().chain)
    }

    pub fn add_token(&self, token: Address, decimals: u8) {
        self.with_chain(|chain| chain.decimals.insert(token, decimals));
    }

    pub fn set_balance(&self, token: Address, owner: Address, amount: U256) {
        self.with_chain(|chain| chain.set_balance(token, owner, amount));
    }

    pub fn balance(&self, token: Address, owner: Address) -> U256 {
        self.with_chain(|chain| chain.balance(token, owner))
    }

    pub fn set_allowance(&self, token: Address, owner: Address, spender: Address, amount: U256) {
        self.with_chain(|chain| chain.allowances.insert((token, owner, spender), amount));
    }

    pub fn allowance(&self, token: Address, owner: Address, spender: Address) -> U256 {
        self.with_chain(|chain| {
            chain
                .allowances
                .get(&(token, owner, spender))
                .copied()
                .unwrap_or_default()
        })
    }

    pub fn set_native_balance(&self, owner: Address, amount: U256) {
        self.with_chain(|chain| chain.native_balances.insert(owner, amount));
    }

    pub fn set_uint(&self, contract: Address, function: &str, value: U256) {
        self.with_chain(|chain| chain.set_uint(contract, function, value));
    }

    pub fn script_read(&self, contract: Address, function: &str, output: Vec<Token>) {
        self.with_chain(|chain| chain.scripted.insert((contract, function.to_string()), output));
    }

    pub fn fail_reads(&self, function: &str) {
        self.state.lock().failing_reads.insert(function.to_string());
    }

    pub fn fail_native_balance(&self) {
        self.state.lock().native_balance_fails = true;
    }

    /// Sending fails before a hash is produced (wallet rejection)
    pub fn fail_sends(&self, function: &str) {
        self.state.lock().failing_sends.insert(function.to_string());
    }

    /// Transaction is mined with status 0
    pub fn revert_sends(&self, function: &str) {
        self.state.lock().reverting_sends.insert(function.to_string());
    }

    /// Applied to the chain when a transaction calling `function` succeeds
    pub fn on_success(
        &self,
        function: &str,
        effect: impl Fn(&mut MockChain, Address, &ContractCall) + Send + Sync + 'static,
    ) {
        self.state
            .lock()
            .effects
            .entry(function.to_string())
            .or_default()
            .push(Arc::new(effect));
    }

    /// Number of empty receipt lookups before the receipt shows up
    pub fn set_receipt_delay(&self, polls: u32) {
        self.state.lock().receipt_delay = polls;
    }

    pub fn never_confirm(&self) {
        self.state.lock().never_confirm = true;
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().calls.clone()
    }

    /// Submitted transactions in order
    pub fn sent(&self) -> Vec<ContractCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.kind == CallKind::Write)
            .map(|c| c.call)
            .collect()
    }

    pub fn sent_functions(&self) -> Vec<String> {
        self.sent().into_iter().map(|c| c.function).collect()
    }

    pub fn read_count(&self, function: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.kind == CallKind::Read && c.call.function == function)
            .count()
    }

    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    fn submit(&self, call: ContractCall) -> Result<H256, DashboardError> {
        let mut state = self.state.lock();
        state.calls.push(RecordedCall {
            kind: CallKind::Write,
            call: call.clone(),
        });
        if state.failing_sends.contains(&call.function) {
            return Err(err_custom_create!(
                "User rejected the request. Details: {} was not signed",
                call.function
            ));
        }
        state.nonce += 1;
        let tx_hash = H256::from_low_u64_be(state.nonce);
        let success = !state.reverting_sends.contains(&call.function);
        if success {
            if call.function == "approve" {
                if let (Some(spender), Some(amount)) = (
                    call.args.first().and_then(|t| t.clone().into_address()),
                    call.uint_arg(1),
                ) {
                    state
                        .chain
                        .allowances
                        .insert((call.address, self.account, spender), amount);
                }
            }
            let effects = state.effects.get(&call.function).cloned().unwrap_or_default();
            for effect in effects {
                effect(&mut state.chain, self.account, &call);
            }
        }
        let polls_left = state.receipt_delay;
        let block_number = 100 + state.nonce;
        state.receipts.insert(
            tx_hash,
            PendingReceipt {
                receipt: TxReceipt {
                    tx_hash,
                    block_number: Some(block_number),
                    status: Some(if success { 1 } else { 0 }),
                    gas_used: Some(U256::from(50000)),
                },
                polls_left,
            },
        );
        Ok(tx_hash)
    }

    fn lookup_receipt(&self, tx_hash: H256) -> Option<TxReceipt> {
        let mut state = self.state.lock();
        if state.never_confirm {
            return None;
        }
        let pending = state.receipts.get_mut(&tx_hash)?;
        if pending.polls_left > 0 {
            pending.polls_left -= 1;
            return None;
        }
        Some(pending.receipt.clone())
    }
}

impl WalletProvider for MockWalletProvider {
    fn account(&self) -> Address {
        self.account
    }

    fn call(&self, call: ContractCall) -> BoxFuture<'_, Result<Vec<Token>, DashboardError>> {
        async move {
            let mut state = self.state.lock();
            state.calls.push(RecordedCall {
                kind: CallKind::Read,
                call: call.clone(),
            });
            if state.failing_reads.contains(&call.function) {
                return Err(err_custom_create!("connection refused"));
            }
            state
                .chain
                .read(&call)
                .ok_or(err_custom_create!("execution reverted: {}", call))
        }
        .boxed()
    }

    fn send(&self, call: ContractCall) -> BoxFuture<'_, Result<H256, DashboardError>> {
        async move { self.submit(call) }.boxed()
    }

    fn receipt(&self, tx_hash: H256) -> BoxFuture<'_, Result<Option<TxReceipt>, DashboardError>> {
        async move { Ok(self.lookup_receipt(tx_hash)) }.boxed()
    }

    fn native_balance(&self, address: Address) -> BoxFuture<'_, Result<U256, DashboardError>> {
        async move {
            let state = self.state.lock();
            if state.native_balance_fails {
                return Err(err_custom_create!("connection refused"));
            }
            Ok(state
                .chain
                .native_balances
                .get(&address)
                .copied()
                .unwrap_or_default())
        }
        .boxed()
    }

    fn sign_message(&self, message: Vec<u8>) -> BoxFuture<'_, Result<Vec<u8>, DashboardError>> {
        async move {
            let mut signature = Keccak256::digest(&message).to_vec();
            signature.extend_from_slice(&Keccak256::digest(self.account.as_bytes()));
            signature.push(27);
            Ok(signature)
        }
        .boxed()
    }
}
