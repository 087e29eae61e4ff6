use super::{action_failed, print_json};
use crate::options::SponsorCommands;
use dashboard_lib::error::DashboardError;
use dashboard_lib::runtime::DashboardRuntime;

pub async fn run_sponsor(
    runtime: &DashboardRuntime,
    command: SponsorCommands,
) -> Result<(), DashboardError> {
    let sponsor = &runtime.sponsor;
    match command {
        SponsorCommands::Show { beneficiaries } => {
            for beneficiary in beneficiaries {
                sponsor.track(beneficiary);
            }
        }
        SponsorCommands::Sponsor {
            beneficiary,
            amount,
        } => {
            sponsor
                .sponsor(beneficiary, &amount)
                .await
                .map_err(action_failed)?;
        }
        SponsorCommands::Withdraw { beneficiary } => {
            sponsor.track(beneficiary);
            sponsor
                .withdraw_sponsorship(beneficiary)
                .await
                .map_err(action_failed)?;
        }
    }
    let view = match sponsor.view() {
        Some(view) => view,
        None => sponsor.refresh().await,
    };
    print_json(&view)
}
