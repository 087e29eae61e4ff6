use lazy_static::lazy_static;

use crate::err_custom_create;
use crate::error::DashboardError;
use crate::gateway::ContractCall;
use web3::ethabi::{Contract, Token};
use web3::types::{Address, U256};

lazy_static! {
    pub static ref ERC20_CONTRACT_TEMPLATE: Contract =
        prepare_contract_template(include_bytes!("../contracts/ierc20.json")).unwrap();
    pub static ref STAKING_CONTRACT_TEMPLATE: Contract =
        prepare_contract_template(include_bytes!("../contracts/staking.json")).unwrap();
    pub static ref EQUITY_CONTRACT_TEMPLATE: Contract =
        prepare_contract_template(include_bytes!("../contracts/equity.json")).unwrap();
    pub static ref SPONSOR_CONTRACT_TEMPLATE: Contract =
        prepare_contract_template(include_bytes!("../contracts/sponsor.json")).unwrap();
    pub static ref VESTING_CONTRACT_TEMPLATE: Contract =
        prepare_contract_template(include_bytes!("../contracts/vesting.json")).unwrap();
    pub static ref PRICING_CONTRACT_TEMPLATE: Contract =
        prepare_contract_template(include_bytes!("../contracts/pricing.json")).unwrap();
}

/// Interface descriptions known to the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContractAbi {
    Erc20,
    Staking,
    Equity,
    Sponsor,
    Vesting,
    Pricing,
}

impl ContractAbi {
    pub fn contract(&self) -> &'static Contract {
        match self {
            ContractAbi::Erc20 => &*ERC20_CONTRACT_TEMPLATE,
            ContractAbi::Staking => &*STAKING_CONTRACT_TEMPLATE,
            ContractAbi::Equity => &*EQUITY_CONTRACT_TEMPLATE,
            ContractAbi::Sponsor => &*SPONSOR_CONTRACT_TEMPLATE,
            ContractAbi::Vesting => &*VESTING_CONTRACT_TEMPLATE,
            ContractAbi::Pricing => &*PRICING_CONTRACT_TEMPLATE,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ContractAbi::Erc20 => "ERC20",
            ContractAbi::Staking => "STAKING",
            ContractAbi::Equity => "EQUITY",
            ContractAbi::Sponsor => "SPONSOR",
            ContractAbi::Vesting => "VESTING",
            ContractAbi::Pricing => "PRICING",
        }
    }
}

pub fn prepare_contract_template(json_abi: &[u8]) -> Result<Contract, DashboardError> {
    Contract::load(json_abi).map_err(|err| err_custom_create!("Failed to create contract {err}"))
}

pub fn contract_encode(call: &ContractCall) -> Result<Vec<u8>, web3::ethabi::Error> {
    call.abi
        .contract()
        .function(&call.function)
        .and_then(|function| function.encode_input(&call.args))
}

pub fn contract_decode(call: &ContractCall, data: &[u8]) -> Result<Vec<Token>, web3::ethabi::Error> {
    call.abi
        .contract()
        .function(&call.function)
        .and_then(|function| function.decode_output(data))
}

pub fn erc20_decimals(token: Address) -> ContractCall {
    ContractCall::new(token, ContractAbi::Erc20, "decimals", vec![])
}

pub fn erc20_balance_of(token: Address, account: Address) -> ContractCall {
    ContractCall::new(
        token,
        ContractAbi::Erc20,
        "balanceOf",
        vec![Token::Address(account)],
    )
}

pub fn erc20_allowance(token: Address, owner: Address, spender: Address) -> ContractCall {
    ContractCall::new(
        token,
        ContractAbi::Erc20,
        "allowance",
        vec![Token::Address(owner), Token::Address(spender)],
    )
}

pub fn erc20_approve(token: Address, spender: Address, amount: U256) -> ContractCall {
    ContractCall::new(
        token,
        ContractAbi::Erc20,
        "approve",
        vec![Token::Address(spender), Token::Uint(amount)],
    )
}

pub fn staking_stake(staking: Address, amount: U256) -> ContractCall {
    ContractCall::new(staking, ContractAbi::Staking, "stake", vec![Token::Uint(amount)])
}

pub fn staking_unstake(staking: Address, amount: U256) -> ContractCall {
    ContractCall::new(
        staking,
        ContractAbi::Staking,
        "unstake",
        vec![Token::Uint(amount)],
    )
}

pub fn staking_claim_reward(staking: Address) -> ContractCall {
    ContractCall::new(staking, ContractAbi::Staking, "claimReward", vec![])
}

pub fn staking_staked_balance_of(staking: Address, account: Address) -> ContractCall {
    ContractCall::new(
        staking,
        ContractAbi::Staking,
        "stakedBalanceOf",
        vec![Token::Address(account)],
    )
}

pub fn staking_pending_reward(staking: Address, account: Address) -> ContractCall {
    ContractCall::new(
        staking,
        ContractAbi::Staking,
        "pendingReward",
        vec![Token::Address(account)],
    )
}

pub fn equity_increase(equity: Address, amount: U256) -> ContractCall {
    ContractCall::new(
        equity,
        ContractAbi::Equity,
        "increaseEquity",
        vec![Token::Uint(amount)],
    )
}

pub fn equity_decrease(equity: Address, amount: U256) -> ContractCall {
    ContractCall::new(
        equity,
        ContractAbi::Equity,
        "decreaseEquity",
        vec![Token::Uint(amount)],
    )
}

pub fn equity_of(equity: Address, account: Address) -> ContractCall {
    ContractCall::new(
        equity,
        ContractAbi::Equity,
        "equityOf",
        vec![Token::Address(account)],
    )
}

pub fn sponsor_lock(sponsor: Address, beneficiary: Address, amount: U256) -> ContractCall {
    ContractCall::new(
        sponsor,
        ContractAbi::Sponsor,
        "sponsor",
        vec![Token::Address(beneficiary), Token::Uint(amount)],
    )
}

pub fn sponsor_withdraw(sponsor: Address, beneficiary: Address) -> ContractCall {
    ContractCall::new(
        sponsor,
        ContractAbi::Sponsor,
        "withdrawSponsorship",
        vec![Token::Address(beneficiary)],
    )
}

pub fn sponsored_amount_of(sponsor: Address, beneficiary: Address) -> ContractCall {
    ContractCall::new(
        sponsor,
        ContractAbi::Sponsor,
        "sponsoredAmountOf",
        vec![Token::Address(beneficiary)],
    )
}

pub fn sponsorship_of(sponsor: Address, from: Address, beneficiary: Address) -> ContractCall {
    ContractCall::new(
        sponsor,
        ContractAbi::Sponsor,
        "sponsorshipOf",
        vec![Token::Address(from), Token::Address(beneficiary)],
    )
}

pub fn vesting_claim(vesting: Address) -> ContractCall {
    ContractCall::new(vesting, ContractAbi::Vesting, "claim", vec![])
}

pub fn vesting_claimable_amount(vesting: Address, beneficiary: Address) -> ContractCall {
    ContractCall::new(
        vesting,
        ContractAbi::Vesting,
        "getClaimableAmount",
        vec![Token::Address(beneficiary)],
    )
}

pub fn vesting_schedule(vesting: Address, beneficiary: Address) -> ContractCall {
    ContractCall::new(
        vesting,
        ContractAbi::Vesting,
        "getVestingSchedule",
        vec![Token::Address(beneficiary)],
    )
}

pub fn pricing_subscribe(pricing: Address, tier_id: u64) -> ContractCall {
    ContractCall::new(
        pricing,
        ContractAbi::Pricing,
        "subscribe",
        vec![Token::Uint(U256::from(tier_id))],
    )
}

pub fn pricing_tier_price(pricing: Address, tier_id: u64) -> ContractCall {
    ContractCall::new(
        pricing,
        ContractAbi::Pricing,
        "tierPrice",
        vec![Token::Uint(U256::from(tier_id))],
    )
}

pub fn pricing_subscription_expiry(pricing: Address, account: Address) -> ContractCall {
    ContractCall::new(
        pricing,
        ContractAbi::Pricing,
        "subscriptionExpiry",
        vec![Token::Address(account)],
    )
}
