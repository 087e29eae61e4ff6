use crate::api::{ApiClient, AuthContext};
use crate::config::{Config, Environment};
use crate::controller::{
    ClaimController, DashboardContext, EquityController, Poller, PricingController,
    SponsorController, StakingController,
};
use crate::error::*;
use crate::eth::get_eth_addr_from_secret;
use crate::gateway::{ChainGateway, WalletProvider};
use crate::notifier::Notifier;
use crate::provider::{FeeSettings, Web3WalletProvider};
use crate::signer::PrivateKeySigner;
use dashboard_lib_common::DashboardEvent;
use secp256k1::SecretKey;
use std::sync::Arc;

/// All pages of the dashboard wired to one wallet and one environment
pub struct DashboardRuntime {
    pub config: Config,
    pub environment_name: String,
    pub environment: Environment,
    pub context: DashboardContext,
    pub api: ApiClient,
    pub staking: Arc<StakingController>,
    pub sponsor: Arc<SponsorController>,
    pub equity: Arc<EquityController>,
    pub claim: Arc<ClaimController>,
    pub pricing: Arc<PricingController>,
}

impl DashboardRuntime {
    pub fn from_provider(
        config: Config,
        environment_name: &str,
        provider: Arc<dyn WalletProvider>,
        auth: Arc<AuthContext>,
        event_sender: Option<tokio::sync::mpsc::Sender<DashboardEvent>>,
    ) -> Result<Self, DashboardError> {
        let environment = config.environment(environment_name)?.clone();
        let gateway = ChainGateway::new(provider, config.engine.gateway_settings());
        let context = DashboardContext::new(
            gateway,
            Notifier::new(event_sender),
            environment.contracts.clone(),
        );
        log::debug!(
            "Dashboard runtime for environment {} and account {:#x}",
            environment_name,
            context.gateway.account()
        );

        Ok(DashboardRuntime {
            api: ApiClient::new(&environment.api_url, auth),
            staking: Arc::new(StakingController::new(context.clone())),
            sponsor: Arc::new(SponsorController::new(context.clone())),
            equity: Arc::new(EquityController::new(
                context.clone(),
                environment.level_thresholds.clone(),
            )),
            claim: Arc::new(ClaimController::new(context.clone())),
            pricing: Arc::new(PricingController::new(
                context.clone(),
                &environment.pricing_tiers,
            )),
            context,
            environment_name: environment_name.to_string(),
            environment,
            config,
        })
    }

    /// One poller per page, all stopped when the returned vector is dropped
    pub fn start_pollers(&self) -> Vec<Poller> {
        let interval = self.config.engine.view_poll_interval();
        vec![
            Poller::start(self.staking.clone(), interval),
            Poller::start(self.sponsor.clone(), interval),
            Poller::start(self.equity.clone(), interval),
            Poller::start(self.claim.clone(), interval),
            Poller::start(self.pricing.clone(), interval),
        ]
    }
}

pub async fn start_dashboard(
    secret_key: SecretKey,
    config: Config,
    environment_name: &str,
    auth: Arc<AuthContext>,
    event_sender: Option<tokio::sync::mpsc::Sender<DashboardEvent>>,
) -> Result<DashboardRuntime, DashboardError> {
    let environment = config.environment(environment_name)?;
    let fees = FeeSettings::from_config(&config.engine, environment)?;
    let account = get_eth_addr_from_secret(&secret_key);
    let signer = Arc::new(PrivateKeySigner::new(vec![secret_key]));
    let provider =
        Web3WalletProvider::connect(&environment.rpc_endpoint, account, signer, fees).await?;
    log::info!(
        "Connected wallet {:#x} to {} ({})",
        account,
        environment_name,
        environment.rpc_endpoint
    );
    DashboardRuntime::from_provider(
        config,
        environment_name,
        Arc::new(provider),
        auth,
        event_sender,
    )
}
