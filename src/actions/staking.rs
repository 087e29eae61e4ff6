use super::{action_failed, print_json};
use crate::options::StakingCommands;
use dashboard_lib::error::DashboardError;
use dashboard_lib::runtime::DashboardRuntime;

pub async fn run_staking(
    runtime: &DashboardRuntime,
    command: StakingCommands,
) -> Result<(), DashboardError> {
    let staking = &runtime.staking;
    match command {
        StakingCommands::Show => {}
        StakingCommands::Stake { amount } => {
            staking.stake(&amount).await.map_err(action_failed)?;
        }
        StakingCommands::Unstake { amount } => {
            staking.unstake(&amount).await.map_err(action_failed)?;
        }
        StakingCommands::ClaimReward => {
            staking.claim_reward().await.map_err(action_failed)?;
        }
    }
    let view = match staking.view() {
        Some(view) => view,
        None => staking.refresh().await,
    };
    print_json(&view)
}
