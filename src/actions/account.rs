use super::print_json;
use crate::options::ApiKeyCommands;
use dashboard_lib::api::{ApiClient, CreateApiKeyRequest};
use dashboard_lib::error::DashboardError;
use dashboard_lib::runtime::DashboardRuntime;
use serde_json::json;

pub async fn login(runtime: &DashboardRuntime) -> Result<(), DashboardError> {
    let session = runtime
        .api
        .login_with_wallet(&runtime.context.gateway)
        .await?;
    print_json(&json!({
        "address": session.address,
        "created": session.created,
    }))
}

pub async fn logout(api: &ApiClient) -> Result<(), DashboardError> {
    let session = api.auth().session();
    api.logout().await?;
    match session {
        Some(session) => log::info!("Logged out {:#x}", session.address),
        None => log::info!("No active session"),
    }
    Ok(())
}

pub async fn show_portfolio(api: &ApiClient) -> Result<(), DashboardError> {
    let overview = api.portfolio_overview().await?;
    print_json(&overview)
}

pub async fn run_api_keys(api: &ApiClient, command: ApiKeyCommands) -> Result<(), DashboardError> {
    match command {
        ApiKeyCommands::List => print_json(&api.list_api_keys().await?),
        ApiKeyCommands::Create { name, permissions } => {
            let key = api
                .create_api_key(&CreateApiKeyRequest { name, permissions })
                .await?;
            log::warn!("Store the key now, it will not be shown again");
            print_json(&key)
        }
        ApiKeyCommands::Delete { id } => {
            api.delete_api_key(&id).await?;
            log::info!("Api key {} deleted", id);
            Ok(())
        }
    }
}
