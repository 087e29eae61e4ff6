mod config_setup;
mod mock_wallet;

pub use config_setup::{
    create_mock_wallet, create_test_config, create_test_context, drain_events,
    fast_gateway_settings, test_account, test_address, test_contracts, tokens, TEST_DECIMALS,
};
pub use mock_wallet::{CallKind, MockChain, MockWalletProvider, RecordedCall};
