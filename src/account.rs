use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use uuid::Uuid;

use crate::config;
use crate::error::AppResult;

/// Entitlement payload served by the account/session service for the
/// signed-in account.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountEntitlement {
    pub account_id: Uuid,
    pub status: String,
    pub tier: String,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

/// key: account-boundary -> session entitlement lookup
#[async_trait]
pub trait AccountService: Send + Sync {
    async fn fetch_entitlement(&self) -> AppResult<AccountEntitlement>;
}

/// HTTP client for the hosted account service.
pub struct HttpAccountService {
    base: String,
    token: Option<String>,
    client: Client,
}

impl HttpAccountService {
    pub fn from_env() -> Self {
        Self::new(
            config::ACCOUNT_SERVICE_ENDPOINT.clone(),
            config::ACCOUNT_SERVICE_TOKEN.clone(),
        )
    }

    pub fn new(base: impl Into<String>, token: Option<String>) -> Self {
        Self {
            base: base.into().trim_end_matches('/').to_string(),
            token,
            client: Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("client build"),
        }
    }
}

#[async_trait]
impl AccountService for HttpAccountService {
    async fn fetch_entitlement(&self) -> AppResult<AccountEntitlement> {
        let url = format!("{}/v1/session/entitlement", self.base);
        let mut req = self.client.get(&url);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        let resp = req.send().await?.error_for_status()?;
        Ok(resp.json().await?)
    }
}
