//! Ward backend HTTP client.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::types::{
    DataEnvelope, EnvironmentalRow, FallIncident, LoginRequest, RefreshRequest, TokenResponse,
};

/// In-memory bearer token pair.
#[derive(Debug, Clone, Default)]
struct Tokens {
    access: Option<String>,
    refresh: Option<String>,
}

/// Client for the ward monitoring backend.
///
/// Cloning is cheap; clones share the HTTP connection pool and tokens.
#[derive(Clone)]
pub struct WardClient {
    http: Client,
    config: ApiConfig,
    tokens: Arc<RwLock<Tokens>>,
    reachable: Arc<AtomicBool>,
}

impl WardClient {
    /// Create a client for the given configuration.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ApiError::Http)?;

        Ok(Self {
            http,
            config,
            tokens: Arc::new(RwLock::new(Tokens::default())),
            reachable: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Create a client and verify the backend answers.
    pub async fn connect(config: ApiConfig) -> Result<Self, ApiError> {
        let client = Self::new(config)?;

        if client.health_check().await? {
            info!("Connected to ward backend at {}", client.config.base_url);
        } else {
            warn!(
                "Ward backend at {} answered health check with an error status",
                client.config.base_url
            );
        }

        Ok(client)
    }

    /// Check whether the last request reached the backend.
    pub fn is_reachable(&self) -> bool {
        self.reachable.load(Ordering::SeqCst)
    }

    /// Probe the backend with a lightweight list request.
    pub async fn health_check(&self) -> Result<bool, ApiError> {
        let url = self.config.environmental_url();
        debug!("Health check: {}", url);

        match self.send_authorized(|http| http.get(&url)).await {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(ApiError::Unauthorized) => Ok(true),
            Err(e) => Err(e),
        }
    }

    /// Install a token pair obtained elsewhere.
    pub async fn set_tokens(&self, access: Option<String>, refresh: Option<String>) {
        let mut tokens = self.tokens.write().await;
        tokens.access = access;
        tokens.refresh = refresh;
    }

    /// Check whether an access token is present.
    pub async fn is_authenticated(&self) -> bool {
        self.tokens.read().await.access.is_some()
    }

    /// Log in and keep the returned tokens.
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenResponse, ApiError> {
        let url = self.config.login_url();
        debug!("Login: {} as {}", url, username);

        let response = self
            .http
            .post(&url)
            .json(&LoginRequest { username, password })
            .send()
            .await
            .map_err(|e| self.mark_unreachable(e))?;
        self.reachable.store(true, Ordering::SeqCst);

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }
        let response = ensure_success(response).await?;
        let tokens: TokenResponse = response.json().await.map_err(ApiError::Http)?;

        if tokens.token.is_some() {
            let mut stored = self.tokens.write().await;
            stored.access = tokens.token.clone();
            if tokens.refresh_token.is_some() {
                stored.refresh = tokens.refresh_token.clone();
            }
            info!("Logged in to ward backend as {}", username);
        } else {
            warn!("Login response carried no token");
        }

        Ok(tokens)
    }

    /// Log out on the server and drop local tokens.
    ///
    /// Server-side failures are logged; local tokens are cleared regardless.
    pub async fn logout(&self) {
        let url = self.config.logout_url();
        if let Err(e) = self.send_authorized(|http| http.post(&url)).await {
            warn!("Logout request failed: {}", e);
        }
        self.set_tokens(None, None).await;
    }

    /// Fetch the raw fall incident rows.
    pub async fn fall_incidents(&self) -> Result<Vec<FallIncident>, ApiError> {
        let envelope: DataEnvelope<FallIncident> =
            self.get_json(&self.config.fall_incidents_url()).await?;
        Ok(envelope.data)
    }

    /// Fetch the raw environmental rows.
    pub async fn environmental_readings(&self) -> Result<Vec<EnvironmentalRow>, ApiError> {
        let envelope: DataEnvelope<EnvironmentalRow> =
            self.get_json(&self.config.environmental_url()).await?;
        Ok(envelope.data)
    }

    /// Mark a fall incident as confirmed by staff.
    pub async fn confirm_fall_incident(&self, incident_id: i64) -> Result<(), ApiError> {
        let url = self.config.confirm_url(incident_id);
        debug!("Confirm fall incident: {}", url);

        let response = self.send_authorized(|http| http.post(&url)).await?;
        ensure_success(response).await?;
        info!(incident_id, "Fall incident confirmed");
        Ok(())
    }

    /// Mark an alert as read.
    ///
    /// Returns `false` when the server could not record it; the failure is
    /// only logged.
    pub async fn mark_as_read(&self, alert_id: i64) -> bool {
        let url = self.config.read_url(alert_id);
        let result = match self.send_authorized(|http| http.post(&url)).await {
            Ok(response) => ensure_success(response).await.map(|_| ()),
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => true,
            Err(e) => {
                warn!(alert_id, "Failed to mark alert as read: {}", e);
                false
            }
        }
    }

    /// Exchange the refresh token for a new access token.
    ///
    /// Returns `true` when a new access token was stored.
    pub async fn refresh(&self) -> bool {
        let stored_refresh = self.tokens.read().await.refresh.clone();
        let refresh_token = match stored_refresh {
            Some(token) => token,
            None => {
                debug!("No refresh token available");
                return false;
            }
        };

        let url = self.config.refresh_url();
        let response = match self
            .http
            .post(&url)
            .json(&RefreshRequest {
                refresh_token: &refresh_token,
            })
            .send()
            .await
        {
            Ok(resp) if resp.status().is_success() => resp,
            Ok(resp) => {
                warn!("Token refresh rejected: HTTP {}", resp.status());
                return false;
            }
            Err(e) => {
                warn!("Token refresh failed: {}", e);
                return false;
            }
        };

        match response.json::<TokenResponse>().await {
            Ok(TokenResponse {
                token: Some(token),
                refresh_token,
            }) => {
                let mut stored = self.tokens.write().await;
                stored.access = Some(token);
                if refresh_token.is_some() {
                    stored.refresh = refresh_token;
                }
                debug!("Access token refreshed");
                true
            }
            Ok(_) => {
                warn!("Token refresh response carried no token");
                false
            }
            Err(e) => {
                warn!("Token refresh response unreadable: {}", e);
                false
            }
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Get the underlying HTTP client.
    pub fn http_client(&self) -> &Client {
        &self.http
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        debug!("GET {}", url);
        let response = self.send_authorized(|http| http.get(url)).await?;
        let response = ensure_success(response).await?;
        response.json().await.map_err(ApiError::Http)
    }

    /// Send a request with the bearer token, refreshing and retrying once on 401.
    async fn send_authorized<F>(&self, build: F) -> Result<Response, ApiError>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        let response = self.send_once(&build).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        debug!("Got 401, attempting token refresh");
        if !self.refresh().await {
            return Err(ApiError::Unauthorized);
        }

        let retried = self.send_once(&build).await?;
        if retried.status() == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }
        Ok(retried)
    }

    async fn send_once<F>(&self, build: &F) -> Result<Response, ApiError>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        let mut request = build(&self.http);
        if let Some(token) = self.tokens.read().await.access.clone() {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| self.mark_unreachable(e))?;
        self.reachable.store(true, Ordering::SeqCst);
        Ok(response)
    }

    fn mark_unreachable(&self, err: reqwest::Error) -> ApiError {
        self.reachable.store(false, Ordering::SeqCst);
        ApiError::Http(err)
    }
}

async fn ensure_success(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Status {
        status: status.as_u16(),
        body,
    })
}

impl std::fmt::Debug for WardClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WardClient")
            .field("config", &self.config)
            .field("reachable", &self.is_reachable())
            .finish()
    }
}
