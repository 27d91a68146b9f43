use std::fmt;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Bearer token as returned by `GET /token/{api_key_id}`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub token: String,
    /// Expiry in seconds since the Unix epoch.
    pub expires_at: i64,
}

impl Token {
    pub fn expires_at(&self) -> Option<Timestamp> {
        Timestamp::from_second(self.expires_at).ok()
    }
}

// Hide token value in Debug output
impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenState {
    NoToken,
    TokenValid,
    TokenExpired,
}

/// Token value and expiry held by the session. Always replaced as a whole.
#[derive(Clone)]
pub struct TokenEnvelope {
    value: String,
    expires_at: i64,
}

impl TokenEnvelope {
    pub fn new(value: String, expires_at: i64) -> Self {
        Self { value, expires_at }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn expires_at(&self) -> i64 {
        self.expires_at
    }

    /// Valid strictly before the expiry second.
    pub fn is_valid_at(&self, now_secs: i64) -> bool {
        now_secs < self.expires_at
    }

    pub fn state(envelope: Option<&Self>, now_secs: i64) -> TokenState {
        match envelope {
            None => TokenState::NoToken,
            Some(env) if env.is_valid_at(now_secs) => TokenState::TokenValid,
            Some(_) => TokenState::TokenExpired,
        }
    }
}

impl From<Token> for TokenEnvelope {
    fn from(token: Token) -> Self {
        Self::new(token.token, token.expires_at)
    }
}

impl fmt::Debug for TokenEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenEnvelope")
            .field("value", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
