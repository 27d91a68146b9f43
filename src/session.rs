use std::fmt;
use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, HeaderValue};
use tracing::info;

use crate::endpoints::token::request_token;
use crate::errors::Error;
use crate::request::{ApiResponse, RequestDispatcher, RequestOptions};
use crate::token::{Clock, TokenGuard, TokenState};

/// API key pair supplied at construction. Never changes afterwards.
#[derive(Clone)]
pub struct Credentials {
    api_key_id: String,
    api_key_secret: String,
}

impl Credentials {
    pub fn new(api_key_id: impl Into<String>, api_key_secret: impl Into<String>) -> Self {
        Self {
            api_key_id: api_key_id.into(),
            api_key_secret: api_key_secret.into(),
        }
    }

    pub fn api_key_id(&self) -> &str {
        &self.api_key_id
    }

    pub(crate) fn api_key_secret(&self) -> &str {
        &self.api_key_secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key_id", &self.api_key_id)
            .field("api_key_secret", &"[REDACTED]")
            .finish()
    }
}

/// Owns the credentials and the bearer token shared by every call made
/// through one client.
pub struct Session {
    dispatcher: RequestDispatcher,
    credentials: Credentials,
    guard: TokenGuard,
    telemetry_context: String,
}

impl Session {
    pub fn new(
        dispatcher: RequestDispatcher,
        credentials: Credentials,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let telemetry_context = format!("session.{}", credentials.api_key_id);
        Self {
            dispatcher,
            credentials,
            guard: TokenGuard::new(clock),
            telemetry_context,
        }
    }

    pub fn dispatcher(&self) -> &RequestDispatcher {
        &self.dispatcher
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub async fn token_state(&self) -> TokenState {
        self.guard.state().await
    }

    /// Unauthenticated passthrough to the dispatcher.
    pub async fn send_request(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<ApiResponse, Error> {
        self.dispatcher.send_request(path, options).await
    }

    /// Sends `options` with the current bearer token, fetching a new one first
    /// when there is none or it has expired.
    pub async fn send_authenticated_request(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<ApiResponse, Error> {
        let token = self
            .guard
            .ensure_fresh(
                || async {
                    let token = request_token(&self.dispatcher, &self.credentials).await;
                    if let Ok(token) = &token {
                        info!(
                            api_key_id = %self.credentials.api_key_id,
                            expires_at = token.expires_at,
                            "token acquired"
                        );
                    }
                    token
                },
                &self.telemetry_context,
            )
            .await?;

        let mut options = options;
        if !options.headers.contains_key(AUTHORIZATION) {
            options.headers.insert(AUTHORIZATION, bearer(token.value())?);
        }
        self.dispatcher.send_request(path, options).await
    }
}

pub(crate) fn bearer(token: &str) -> Result<HeaderValue, Error> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
        .map_err(|e| Error::InvalidHeader(format!("authorization: {}", e)))?;
    value.set_sensitive(true);
    Ok(value)
}
