//! Credential gate backed by the cluster's REST API.
//!
//! A check is two sequential calls:
//!
//! 1. `POST /v1/session/login` with the caller's username and password.
//!    Its status alone decides the verdict.
//! 2. `GET /v1/cluster/settings` with the bearer token from step 1, to
//!    confirm the token is usable. Best effort: the outcome is logged and
//!    then dropped.
//!
//! Certificates are not validated by default because clusters ship with
//! self-signed certificates. Set `accept_invalid_certs: false` in the gate
//! config where clusters carry trusted certificates.

use async_trait::async_trait;
use reqwest::{Client as ReqwestClient, StatusCode};
use serde::{Deserialize, Serialize};
use std::net::Ipv6Addr;
use std::time::Duration;
use tracing::{error, info, instrument, warn};

use super::errors::GateError;
use crate::domain::models::{AccessCredentials, AccessVerdict, GateConfig};
use crate::domain::ports::CredentialGate;
use crate::infrastructure::logging::SecretScrubber;

const LOGIN_PATH: &str = "/v1/session/login";
const SETTINGS_PATH: &str = "/v1/cluster/settings";

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    bearer_token: Option<String>,
}

/// Result of a successful (HTTP 200) login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginSession {
    /// `None` when the body could not be read or had no token.
    pub bearer_token: Option<String>,
}

/// `CredentialGate` that logs in to the cluster named in the credentials.
///
/// Holds no per-cluster state: every check logs in again.
pub struct ClusterGate {
    http_client: ReqwestClient,
    scheme: String,
    port: u16,
    scrubber: SecretScrubber,
}

impl ClusterGate {
    pub fn new(config: &GateConfig) -> Result<Self, GateError> {
        let http_client = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        if config.accept_invalid_certs {
            warn!("cluster certificate validation is disabled for the credential gate");
        }

        Ok(Self {
            http_client,
            scheme: config.scheme.clone(),
            port: config.port,
            scrubber: SecretScrubber::new(),
        })
    }

    /// Base URL of the cluster REST API, e.g. `https://10.0.0.7:8000`.
    pub fn api_root(&self, cluster: &str) -> String {
        let host = if cluster.parse::<Ipv6Addr>().is_ok() {
            format!("[{cluster}]")
        } else {
            cluster.to_string()
        };
        format!("{}://{}:{}", self.scheme, host, self.port)
    }

    /// Step 1: log in. `Ok` only for HTTP 200.
    pub async fn login(&self, api_root: &str, credentials: &AccessCredentials) -> Result<LoginSession, GateError> {
        let response = self
            .http_client
            .post(format!("{api_root}{LOGIN_PATH}"))
            .header("content-type", "application/json")
            .json(&LoginRequest {
                username: &credentials.username,
                password: &credentials.password,
            })
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(GateError::Status(status));
        }

        let bearer_token = match response.json::<LoginResponse>().await {
            Ok(body) => body.bearer_token,
            Err(e) => {
                warn!(error = %e, "could not decode login response");
                None
            }
        };

        Ok(LoginSession { bearer_token })
    }

    /// Step 2: confirm the bearer token against the settings endpoint.
    pub async fn verify_session(&self, api_root: &str, bearer_token: &str) -> Result<StatusCode, GateError> {
        let response = self
            .http_client
            .get(format!("{api_root}{SETTINGS_PATH}"))
            .header("content-type", "application/json")
            .bearer_auth(bearer_token)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(status)
        } else {
            Err(GateError::Status(status))
        }
    }
}

#[async_trait]
impl CredentialGate for ClusterGate {
    #[instrument(skip(self, credentials), fields(cluster = %credentials.cluster))]
    async fn check(&self, credentials: &AccessCredentials) -> AccessVerdict {
        let api_root = self.api_root(&credentials.cluster);

        let session = match self.login(&api_root, credentials).await {
            Ok(session) => session,
            Err(e) => {
                let verdict = e.verdict();
                warn!(
                    error = %self.scrubber.scrub_message(&e.to_string()),
                    %verdict,
                    "cluster login failed"
                );
                return verdict;
            }
        };

        // The verdict is already decided; the follow-up only feeds diagnostics.
        let follow_up = match session.bearer_token.as_deref() {
            Some(token) => self.verify_session(&api_root, token).await,
            None => Err(GateError::MissingToken),
        };
        match follow_up {
            Ok(status) => info!(status = status.as_u16(), "cluster session verified"),
            Err(e) => error!(
                error = %self.scrubber.scrub_message(&e.to_string()),
                "cluster session verification failed"
            ),
        }

        AccessVerdict::Authorized
    }
}
