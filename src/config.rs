//! read client configuration from a file, the environment or AWS Secrets Manager

use std::fmt;
use std::path::Path;

use aws_config::BehaviorVersion;
use serde::Deserialize;

use crate::errors::Error;

pub const DEFAULT_HOST: &str = "https://api.helloworks.com";
pub const BASE_PATH: &str = "/v3";
pub const USER_AGENT: &str = concat!("HelloWorks-Rust-SDK/", env!("CARGO_PKG_VERSION"));

pub enum ConfigLocation {
    File(String),
    Env,
    Secret,
}

#[derive(Clone, Deserialize)]
pub struct Config {
    pub api_key_id: String,
    pub api_key_secret: String,
    #[serde(default)]
    pub host: Option<String>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key_id", &self.api_key_id)
            .field("api_key_secret", &"[REDACTED]")
            .field("host", &self.host)
            .finish()
    }
}

impl Config {
    pub fn from_values(
        api_key_id: impl Into<String>,
        api_key_secret: impl Into<String>,
        host: Option<String>,
    ) -> Self {
        Self {
            api_key_id: api_key_id.into(),
            api_key_secret: api_key_secret.into(),
            host,
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path)?;
        serde_json::from_str(&contents)
            .map_err(|e| Error::Config(format!("Invalid config file: {e}")))
    }

    /// Reads `HW_API_KEY_ID`, `HW_API_KEY_SECRET` and the optional `HW_HOST`.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Config {
            api_key_id: lookup("HW_API_KEY_ID")
                .ok_or_else(|| Error::Config("Missing HW_API_KEY_ID env var".to_string()))?,
            api_key_secret: lookup("HW_API_KEY_SECRET")
                .ok_or_else(|| Error::Config("Missing HW_API_KEY_SECRET env var".to_string()))?,
            host: lookup("HW_HOST").filter(|h| !h.is_empty()),
        })
    }

    pub async fn load(loc: ConfigLocation) -> Result<Self, Error> {
        match loc {
            ConfigLocation::File(path) => Self::from_file(path),
            ConfigLocation::Env => Self::from_env(),
            ConfigLocation::Secret => read_config_from_secret().await,
        }
    }

    /// The host every request is sent to, without a trailing slash.
    pub fn resolved_host(&self) -> Result<String, Error> {
        let host = self
            .host
            .as_deref()
            .unwrap_or(DEFAULT_HOST)
            .trim_end_matches('/');
        let host = if host.contains("://") {
            host.to_string()
        } else {
            format!("https://{}", host)
        };
        let url = reqwest::Url::parse(&host)
            .map_err(|e| Error::Config(format!("Invalid host URL '{}': {}", host, e)))?;
        if url.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "Invalid host URL '{}': not an absolute base URL",
                host
            )));
        }
        Ok(host)
    }
}

async fn read_config_from_secret() -> Result<Config, Error> {
    let secret_arn = std::env::var("HW_CONFIG_SECRET_ARN")
        .map_err(|_| Error::Config("Missing HW_CONFIG_SECRET_ARN env var".to_string()))?;
    let client = aws_sdk_secretsmanager::Client::new(
        &aws_config::load_defaults(BehaviorVersion::latest()).await,
    );
    let resp = client
        .get_secret_value()
        .secret_id(secret_arn)
        .send()
        .await
        .map_err(|e| Error::Config(format!("Failed to get secret: {}", e)))?;
    let secret = resp
        .secret_string()
        .ok_or_else(|| Error::Config("Failed to get secret string, returned None".to_string()))?;
    serde_json::from_str(secret).map_err(|e| Error::Config(format!("Invalid secret payload: {e}")))
}
