//! OAuth access-token lifecycle for the Sheets adapter.
//!
//! Tokens are loaded from a local authorized-user token file and refreshed
//! against the Google token endpoint when a refresh token and client
//! credentials are available. The interactive consent flow is out of scope;
//! operators seed the token file out of band.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::domain::ports::RemoteStoreError;

const GOOGLE_TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";

/// Validity assumed for a static token with no expiry metadata before the
/// file is consulted again.
const STATIC_TOKEN_TTL: Duration = Duration::from_secs(300);

/// Safety margin subtracted from reported token lifetimes.
const EXPIRY_MARGIN: Duration = Duration::from_secs(30);

/// Shape of the authorized-user token file on disk.
#[derive(Debug, Deserialize)]
struct StoredToken {
    #[serde(alias = "access_token")]
    token: Option<String>,
    refresh_token: Option<String>,
    client_id: Option<String>,
    client_secret: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: String,
    expires_in: Option<u64>,
}

struct CachedToken {
    secret: String,
    expires_at: Instant,
}

/// Loads and refreshes the bearer token used against the spreadsheet API.
pub struct TokenProvider {
    http: reqwest::Client,
    token_file: PathBuf,
    client_id: Option<String>,
    client_secret: Option<String>,
    endpoint: String,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenProvider {
    /// Build a provider reading `token_file`, refreshing with the given
    /// client credentials when the file carries a refresh token.
    pub fn new(
        http: reqwest::Client,
        token_file: impl Into<PathBuf>,
        client_id: Option<String>,
        client_secret: Option<String>,
    ) -> Self {
        Self {
            http,
            token_file: token_file.into(),
            client_id,
            client_secret,
            endpoint: GOOGLE_TOKEN_ENDPOINT.to_owned(),
            cached: Mutex::new(None),
        }
    }

    /// Return a bearer token, refreshing or re-reading the token file as
    /// needed.
    pub async fn bearer(&self) -> Result<String, RemoteStoreError> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.expires_at > Instant::now() {
                return Ok(token.secret.clone());
            }
        }

        let stored = self.load_file()?;
        let token = match self.refresh(&stored).await {
            Ok(Some(token)) => token,
            Ok(None) => {
                // No refresh material; fall back to the static token as-is.
                let secret = stored.token.ok_or_else(|| {
                    RemoteStoreError::Token(format!(
                        "token file {} has neither an access token nor a refresh token",
                        self.token_file.display()
                    ))
                })?;
                CachedToken {
                    secret,
                    expires_at: Instant::now() + STATIC_TOKEN_TTL,
                }
            }
            Err(err) => {
                warn!(error = %err, "token refresh failed, falling back to stored token");
                let secret = stored.token.ok_or(err)?;
                CachedToken {
                    secret,
                    expires_at: Instant::now() + STATIC_TOKEN_TTL,
                }
            }
        };

        let secret = token.secret.clone();
        *cached = Some(token);
        Ok(secret)
    }

    fn load_file(&self) -> Result<StoredToken, RemoteStoreError> {
        let raw = std::fs::read_to_string(&self.token_file).map_err(|err| {
            RemoteStoreError::Token(format!(
                "failed to read token file {}: {err}",
                self.token_file.display()
            ))
        })?;
        serde_json::from_str(&raw).map_err(|err| {
            RemoteStoreError::Token(format!(
                "failed to parse token file {}: {err}",
                self.token_file.display()
            ))
        })
    }

    /// Exchange the refresh token for a fresh access token.
    ///
    /// Returns `Ok(None)` when the stored token carries no refresh material
    /// or no client credentials are configured.
    async fn refresh(&self, stored: &StoredToken) -> Result<Option<CachedToken>, RemoteStoreError> {
        let Some(refresh_token) = stored.refresh_token.as_deref() else {
            return Ok(None);
        };
        let client_id = self.client_id.as_deref().or(stored.client_id.as_deref());
        let client_secret = self
            .client_secret
            .as_deref()
            .or(stored.client_secret.as_deref());
        let (Some(client_id), Some(client_secret)) = (client_id, client_secret) else {
            return Ok(None);
        };

        let response = self
            .http
            .post(&self.endpoint)
            .form(&[
                ("client_id", client_id),
                ("client_secret", client_secret),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .map_err(|err| RemoteStoreError::Token(format!("token endpoint: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteStoreError::Token(format!(
                "token endpoint returned {status}: {body}"
            )));
        }

        let refreshed: RefreshResponse = response
            .json()
            .await
            .map_err(|err| RemoteStoreError::Token(format!("token response: {err}")))?;
        let lifetime = Duration::from_secs(refreshed.expires_in.unwrap_or(3600));
        debug!(lifetime_secs = lifetime.as_secs(), "access token refreshed");
        Ok(Some(CachedToken {
            secret: refreshed.access_token,
            expires_at: Instant::now() + lifetime.saturating_sub(EXPIRY_MARGIN),
        }))
    }
}
