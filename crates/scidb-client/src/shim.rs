//! HTTP client for the array engine's web shim.
//!
//! A query runs inside a short-lived session:
//! `login` (only when authenticating, token cached), `new_session`,
//! `execute_query`, `read_lines`, and finally `release_session`, which is
//! attempted even when an earlier step failed.

use std::time::Instant;

use async_trait::async_trait;
use md_parser::MetadataRow;
use reqwest::Client;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::afl::eo_all_query;
use crate::config::ShimConfig;
use crate::csv::parse_metadata_csv;
use crate::error::{TransportError, TransportResult};
use crate::source::MetadataSource;

/// Client for the shim's HTTP API.
pub struct ShimClient {
    client: Client,
    config: ShimConfig,
    base_url: String,
    token: Mutex<Option<String>>,
}

impl ShimClient {
    /// Build a client. Invalid certificates are only accepted when the shim
    /// runs on the local host.
    pub fn new(config: ShimConfig) -> TransportResult<Self> {
        config.validate().map_err(TransportError::Config)?;

        let accept_invalid = config.ssl && config.is_local();
        if accept_invalid {
            debug!(host = %config.host, "Accepting self-signed certificates for local shim");
        }

        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.read_timeout())
            .danger_accept_invalid_certs(accept_invalid)
            .build()
            .map_err(|e| TransportError::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url(),
            config,
            token: Mutex::new(None),
        })
    }

    pub fn config(&self) -> &ShimConfig {
        &self.config
    }

    async fn get(&self, endpoint: &'static str, params: &[(&str, &str)]) -> TransportResult<String> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(endpoint, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::from_reqwest(endpoint, e))?;

        if !status.is_success() {
            return Err(TransportError::Status {
                endpoint,
                status: status.as_u16(),
                body: body.trim().to_string(),
            });
        }
        Ok(body)
    }

    /// The session token, logging in on first use. `None` without auth.
    async fn token(&self) -> TransportResult<Option<String>> {
        if !self.config.auth {
            return Ok(None);
        }

        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            return Ok(Some(token.clone()));
        }

        let body = self
            .get(
                "login",
                &[
                    ("username", self.config.user.as_str()),
                    ("password", self.config.password.as_str()),
                ],
            )
            .await?;
        let token = non_empty("login", body)?;
        info!(user = %self.config.user, "Logged in to shim");
        *cached = Some(token.clone());
        Ok(Some(token))
    }

    async fn new_session(&self, auth: Option<&str>) -> TransportResult<String> {
        let mut params = Vec::new();
        if let Some(token) = auth {
            params.push(("auth", token));
        }
        let body = self.get("new_session", &params).await?;
        non_empty("new_session", body)
    }

    async fn execute_in_session(
        &self,
        session: &str,
        afl: &str,
        auth: Option<&str>,
    ) -> TransportResult<String> {
        let mut params = vec![
            ("id", session),
            ("query", afl),
            ("release", "0"),
            ("save", "csv"),
            ("stream", "1"),
        ];
        if let Some(token) = auth {
            params.push(("auth", token));
        }
        self.get("execute_query", &params).await?;

        let mut params = vec![("id", session), ("n", "0")];
        if let Some(token) = auth {
            params.push(("auth", token));
        }
        self.get("read_lines", &params).await
    }

    async fn release_session(&self, session: &str, auth: Option<&str>) -> TransportResult<()> {
        let mut params = vec![("id", session)];
        if let Some(token) = auth {
            params.push(("auth", token));
        }
        self.get("release_session", &params).await.map(|_| ())
    }

    /// Run an AFL query and return the raw CSV body.
    #[instrument(skip(self), fields(host = %self.config.host))]
    pub async fn execute(&self, afl: &str) -> TransportResult<String> {
        let start = Instant::now();
        let token = self.token().await?;
        let auth = token.as_deref();

        let session = match self.new_session(auth).await {
            Ok(session) => session,
            Err(e) => {
                self.forget_token_on(&e).await;
                return Err(e);
            }
        };
        debug!(session = %session, "Opened shim session");

        let result = self.execute_in_session(&session, afl, auth).await;

        if let Err(e) = self.release_session(&session, auth).await {
            warn!(session = %session, error = %e, "Failed to release shim session");
        }

        match &result {
            Ok(body) => debug!(
                bytes = body.len(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Query completed"
            ),
            Err(e) => self.forget_token_on(e).await,
        }
        result
    }

    async fn forget_token_on(&self, err: &TransportError) {
        if err.is_auth_failure() {
            warn!("Shim rejected token, logging in again on next request");
            *self.token.lock().await = None;
        }
    }
}

fn non_empty(endpoint: &'static str, body: String) -> TransportResult<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Err(TransportError::InvalidResponse {
            endpoint,
            message: "empty response".to_string(),
        });
    }
    Ok(trimmed.to_string())
}

#[async_trait]
impl MetadataSource for ShimClient {
    #[instrument(skip(self), fields(count = names.len()))]
    async fn fetch_metadata(&self, names: &[String]) -> TransportResult<Vec<MetadataRow>> {
        let afl = eo_all_query(names)?;
        let body = self.execute(&afl).await?;
        let rows = parse_metadata_csv(&body);
        debug!(rows = rows.len(), "Fetched metadata rows");
        Ok(rows)
    }
}
