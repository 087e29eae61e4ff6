use crate::error::*;
use crate::gateway::ChainGateway;
use crate::{err_create, err_custom_create, err_from};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use web3::types::Address;

pub const API_CODE_OK: i64 = 200;

/// Envelope shared by all backend endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub code: i64,
    #[serde(default)]
    pub message: String,
    pub body: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn into_result(self) -> Result<Option<T>, DashboardError> {
        if self.code == API_CODE_OK {
            Ok(self.body)
        } else {
            Err(err_custom_create!(
                "Api error {}: {}",
                self.code,
                if self.message.is_empty() {
                    "no message"
                } else {
                    self.message.as_str()
                }
            ))
        }
    }

    pub fn into_body(self) -> Result<T, DashboardError> {
        self.into_result()?
            .ok_or(err_custom_create!("Api response without body"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    pub address: Address,
    pub created: DateTime<Utc>,
}

/// Bearer token of the logged in user, optionally persisted to a session file
#[derive(Debug, Default)]
pub struct AuthContext {
    session: RwLock<Option<Session>>,
    session_file: Option<PathBuf>,
}

impl AuthContext {
    pub fn new(session_file: Option<PathBuf>) -> Self {
        Self {
            session: RwLock::new(None),
            session_file,
        }
    }

    /// Restore the session saved by a previous login, missing file means logged out
    pub async fn load(session_file: PathBuf) -> Result<Self, DashboardError> {
        let session = match tokio::fs::read_to_string(&session_file).await {
            Ok(content) => Some(serde_json::from_str::<Session>(&content).map_err(err_from!())?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
            Err(err) => return Err(err_create!(err)),
        };
        Ok(Self {
            session: RwLock::new(session),
            session_file: Some(session_file),
        })
    }

    pub fn token(&self) -> Option<String> {
        self.session.read().as_ref().map(|s| s.token.clone())
    }

    pub fn session(&self) -> Option<Session> {
        self.session.read().clone()
    }

    pub async fn set_session(&self, session: Session) -> Result<(), DashboardError> {
        if let Some(path) = &self.session_file {
            let content = serde_json::to_string_pretty(&session).map_err(err_from!())?;
            tokio::fs::write(path, content).await.map_err(err_from!())?;
        }
        *self.session.write() = Some(session);
        Ok(())
    }

    pub async fn clear(&self) -> Result<(), DashboardError> {
        *self.session.write() = None;
        if let Some(path) = &self.session_file {
            match tokio::fs::remove_file(path).await {
                Ok(()) => {}
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                Err(err) => return Err(err_create!(err)),
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub address: Address,
    pub signature: String,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioAsset {
    pub symbol: String,
    pub amount: String,
    #[serde(default)]
    pub value_usd: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioOverview {
    pub total_value_usd: String,
    #[serde(default)]
    pub pnl_24h: String,
    #[serde(default)]
    pub assets: Vec<PortfolioAsset>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApiKey {
    pub id: String,
    pub name: String,
    /// Full secret is returned only once, on creation
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateApiKeyRequest {
    pub name: String,
    pub permissions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub symbol: String,
    pub base: String,
    pub quote: String,
    #[serde(default)]
    pub last_price: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    Buy,
    Sell,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulateTradeRequest {
    pub pair: String,
    pub side: TradeSide,
    pub amount: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit_price: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TradeSimulation {
    pub pair: String,
    pub side: TradeSide,
    pub amount: String,
    pub expected_price: String,
    pub expected_total: String,
    #[serde(default)]
    pub fee: String,
    #[serde(default)]
    pub price_impact_percent: Option<String>,
}

/// Client of the backend REST API. Every request passes through [`ApiClient::request`],
/// which attaches the bearer token of the current session.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    auth: Arc<AuthContext>,
}

impl ApiClient {
    pub fn new(base_url: &str, auth: Arc<AuthContext>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
        }
    }

    pub fn auth(&self) -> &Arc<AuthContext> {
        &self.auth
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let builder = self.client.request(method, url);
        match self.auth.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<ApiResponse<T>, DashboardError> {
        let resp = builder.send().await.map_err(err_from!())?;
        let status = resp.status();
        let text = resp.text().await.map_err(err_from!())?;
        match serde_json::from_str::<ApiResponse<T>>(&text) {
            Ok(envelope) => Ok(envelope),
            Err(err) if status.is_success() => Err(err_create!(err)),
            Err(_) => Err(err_custom_create!(
                "Http error {}: {}",
                status.as_u16(),
                text.chars().take(200).collect::<String>()
            )),
        }
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<Session, DashboardError> {
        let response: LoginResponse = self
            .execute(self.request(Method::POST, "/auth/login").json(request))
            .await?
            .into_body()?;
        let session = Session {
            token: response.token,
            address: request.address,
            created: Utc::now(),
        };
        self.auth.set_session(session.clone()).await?;
        log::info!("Logged in as {:#x}", request.address);
        Ok(session)
    }

    /// Sign a one time login message with the wallet and exchange it for a bearer token
    pub async fn login_with_wallet(&self, gateway: &ChainGateway) -> Result<Session, DashboardError> {
        let address = gateway.account();
        let message = login_message(address, &uuid::Uuid::new_v4().to_string(), Utc::now());
        let signature = gateway.sign_message(message.as_bytes()).await?;
        self.login(&LoginRequest {
            address,
            signature: format!("0x{}", hex::encode(signature)),
            message,
        })
        .await
    }

    pub async fn logout(&self) -> Result<(), DashboardError> {
        self.auth.clear().await
    }

    pub async fn portfolio_overview(&self) -> Result<PortfolioOverview, DashboardError> {
        self.execute(self.request(Method::GET, "/portfolio/overview"))
            .await?
            .into_body()
    }

    pub async fn list_api_keys(&self) -> Result<Vec<ApiKey>, DashboardError> {
        Ok(self
            .execute(self.request(Method::GET, "/api-keys"))
            .await?
            .into_result()?
            .unwrap_or_default())
    }

    pub async fn create_api_key(
        &self,
        request: &CreateApiKeyRequest,
    ) -> Result<ApiKey, DashboardError> {
        self.execute(self.request(Method::POST, "/api-keys").json(request))
            .await?
            .into_body()
    }

    pub async fn delete_api_key(&self, id: &str) -> Result<(), DashboardError> {
        self.execute::<serde_json::Value>(self.request(Method::DELETE, &format!("/api-keys/{id}")))
            .await?
            .into_result()?;
        Ok(())
    }

    pub async fn token_pairs(&self) -> Result<Vec<TokenPair>, DashboardError> {
        Ok(self
            .execute(self.request(Method::GET, "/token-pairs"))
            .await?
            .into_result()?
            .unwrap_or_default())
    }

    pub async fn simulate_trade(
        &self,
        request: &SimulateTradeRequest,
    ) -> Result<TradeSimulation, DashboardError> {
        self.execute(self.request(Method::POST, "/trade/simulate").json(request))
            .await?
            .into_body()
    }
}

pub fn login_message(address: Address, nonce: &str, issued_at: DateTime<Utc>) -> String {
    format!(
        "Sign in to the dashboard\nAddress: {:#x}\nNonce: {}\nIssued at: {}",
        address,
        nonce,
        issued_at.to_rfc3339()
    )
}
