use std::{fmt::Debug, path::PathBuf};

use dashboard_lib::api::TradeSide;
use structopt::StructOpt;
use web3::types::Address;

fn parse_trade_side(side: &str) -> Result<TradeSide, String> {
    match side.to_lowercase().as_str() {
        "buy" => Ok(TradeSide::Buy),
        "sell" => Ok(TradeSide::Sell),
        _ => Err(format!("Unknown trade side {side}, use buy or sell")),
    }
}

#[derive(StructOpt)]
#[structopt(about = "Token balance options")]
pub struct BalanceOptions {
    #[structopt(
        short = "t",
        long = "token",
        help = "Token address, \"token\" for the platform token or \"native\" for the chain currency",
        default_value = "token"
    )]
    pub token: String,

    #[structopt(short = "a", long = "address", help = "Account to check, wallet account by default")]
    pub address: Option<Address>,
}

#[derive(StructOpt)]
pub enum StakingCommands {
    #[structopt(about = "Show wallet, staked and reward balances")]
    Show,
    #[structopt(about = "Stake tokens, approving the staking contract first when needed")]
    Stake {
        #[structopt(help = "Amount in tokens, i.e. 12.5")]
        amount: String,
    },
    #[structopt(about = "Unstake tokens")]
    Unstake {
        #[structopt(help = "Amount in tokens, i.e. 12.5")]
        amount: String,
    },
    #[structopt(about = "Claim pending staking rewards")]
    ClaimReward,
}

#[derive(StructOpt)]
pub enum SponsorCommands {
    #[structopt(about = "Show sponsorships")]
    Show {
        #[structopt(long = "beneficiary", help = "Beneficiaries to include in the view")]
        beneficiaries: Vec<Address>,
    },
    #[structopt(about = "Lock tokens to raise the level of another account")]
    Sponsor {
        beneficiary: Address,
        #[structopt(help = "Amount in tokens, i.e. 12.5")]
        amount: String,
    },
    #[structopt(about = "Withdraw tokens locked for a beneficiary")]
    Withdraw { beneficiary: Address },
}

#[derive(StructOpt)]
pub enum EquityCommands {
    #[structopt(about = "Show equity and level progress")]
    Show,
    #[structopt(about = "Increase equity, approving the equity contract first when needed")]
    Increase { amount: String },
    #[structopt(about = "Decrease equity")]
    Decrease { amount: String },
}

#[derive(StructOpt)]
pub enum VestingCommands {
    #[structopt(about = "Show vesting schedule")]
    Show,
    #[structopt(about = "Claim vested tokens")]
    Claim,
}

#[derive(StructOpt)]
pub enum PricingCommands {
    #[structopt(about = "Show tier prices and subscription")]
    Show,
    #[structopt(about = "Subscribe to a pricing tier")]
    Subscribe {
        #[structopt(help = "Tier id")]
        tier: u64,
    },
}

#[derive(StructOpt)]
pub enum ApiKeyCommands {
    List,
    Create {
        name: String,
        #[structopt(long = "permission", help = "Permission granted to the key, can be repeated")]
        permissions: Vec<String>,
    },
    Delete {
        id: String,
    },
}

#[derive(StructOpt)]
#[structopt(about = "Trade simulation options")]
pub struct SimulateOptions {
    #[structopt(help = "Token pair symbol, i.e. ETH/USDT")]
    pub pair: String,

    #[structopt(parse(try_from_str = parse_trade_side), help = "buy or sell")]
    pub side: TradeSide,

    #[structopt(help = "Amount of the base token")]
    pub amount: String,

    #[structopt(long = "limit-price")]
    pub limit_price: Option<String>,
}

#[derive(StructOpt)]
#[structopt(about = "Watch options")]
pub struct WatchOptions {
    #[structopt(long = "interval", help = "Seconds between refreshes, engine setting by default")]
    pub interval: Option<u64>,

    #[structopt(long = "with-portfolio", help = "Refresh portfolio overview as well (requires login)")]
    pub with_portfolio: bool,
}

#[derive(StructOpt)]
pub enum DashboardCommands {
    #[structopt(about = "Show token balance")]
    Balance {
        #[structopt(flatten)]
        balance_options: BalanceOptions,
    },
    Staking {
        #[structopt(subcommand)]
        command: StakingCommands,
    },
    Sponsor {
        #[structopt(subcommand)]
        command: SponsorCommands,
    },
    Equity {
        #[structopt(subcommand)]
        command: EquityCommands,
    },
    Vesting {
        #[structopt(subcommand)]
        command: VestingCommands,
    },
    Pricing {
        #[structopt(subcommand)]
        command: PricingCommands,
    },
    #[structopt(about = "Sign in to the backend with the wallet")]
    Login,
    Logout,
    #[structopt(about = "Show portfolio overview")]
    Portfolio,
    ApiKeys {
        #[structopt(subcommand)]
        command: ApiKeyCommands,
    },
    #[structopt(about = "List tradable token pairs")]
    TokenPairs,
    #[structopt(about = "Simulate a trade")]
    Simulate {
        #[structopt(flatten)]
        simulate_options: SimulateOptions,
    },
    #[structopt(about = "Refresh all views periodically until Ctrl-C")]
    Watch {
        #[structopt(flatten)]
        watch_options: WatchOptions,
    },
}

#[derive(StructOpt)]
#[structopt(about = "Staking dashboard client")]
pub struct DashboardOptions {
    #[structopt(long = "config", help = "Config file, embedded config when not given")]
    pub config: Option<PathBuf>,

    #[structopt(
        short = "e",
        long = "environment",
        help = "Environment from the config, overrides DASHBOARD_ENV"
    )]
    pub environment: Option<String>,

    #[structopt(
        long = "session-file",
        help = "File keeping the backend session",
        default_value = "./dashboard-session.json"
    )]
    pub session_file: PathBuf,

    #[structopt(subcommand)]
    pub commands: DashboardCommands,
}

impl Debug for DashboardOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardOptions")
            .field("config", &self.config)
            .field("environment", &self.environment)
            .field("session_file", &self.session_file)
            .finish()
    }
}
