use crate::mock_wallet::MockWalletProvider;
use dashboard_lib::config::{Config, Contracts};
use dashboard_lib::controller::DashboardContext;
use dashboard_lib::gateway::{ChainGateway, GatewaySettings};
use dashboard_lib::notifier::Notifier;
use dashboard_lib_common::DashboardEvent;
use std::sync::Arc;
use std::time::Duration;
use web3::types::{Address, U256};

pub const TEST_DECIMALS: u8 = 18;

/// Deterministic address, distinct for every `n`
pub fn test_address(n: u64) -> Address {
    Address::from_low_u64_be(0x1000 + n)
}

pub fn test_contracts() -> Contracts {
    Contracts {
        token: test_address(1),
        staking: test_address(2),
        equity: test_address(3),
        sponsor: test_address(4),
        vesting: test_address(5),
        pricing: test_address(6),
    }
}

pub fn test_account() -> Address {
    test_address(100)
}

/// Whole tokens in base units
pub fn tokens(amount: u64) -> U256 {
    U256::from(amount) * U256::exp10(TEST_DECIMALS as usize)
}

pub fn fast_gateway_settings() -> GatewaySettings {
    GatewaySettings {
        receipt_poll_interval: Duration::from_millis(5),
        transaction_timeout: Duration::from_millis(500),
    }
}

/// Default config with the development environment pointed at the test contracts
pub fn create_test_config() -> Config {
    let mut config = Config::default_config().unwrap();
    let env = config.environment.get_mut("development").unwrap();
    env.contracts = test_contracts();
    config.engine.receipt_poll_interval = 5;
    config.engine.transaction_timeout = 1;
    config
}

/// Mock wallet with the platform token registered and `balance` tokens in the test account
pub fn create_mock_wallet(balance: u64) -> Arc<MockWalletProvider> {
    let wallet = Arc::new(MockWalletProvider::new(test_account()));
    let contracts = test_contracts();
    wallet.add_token(contracts.token, TEST_DECIMALS);
    wallet.set_balance(contracts.token, test_account(), tokens(balance));
    wallet
}

pub fn create_test_context(
    wallet: Arc<MockWalletProvider>,
) -> (DashboardContext, tokio::sync::mpsc::Receiver<DashboardEvent>) {
    let (notifier, receiver) = Notifier::channel(1000);
    let gateway = ChainGateway::new(wallet, fast_gateway_settings());
    (
        DashboardContext::new(gateway, notifier, test_contracts()),
        receiver,
    )
}

/// Events received so far, without waiting for more
pub fn drain_events(receiver: &mut tokio::sync::mpsc::Receiver<DashboardEvent>) -> Vec<DashboardEvent> {
    let mut events = Vec::new();
    while let Ok(event) = receiver.try_recv() {
        events.push(event);
    }
    events
}
