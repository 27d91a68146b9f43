use std::sync::Arc;

use reqwest::Client;
use tracing::info;

use crate::{
    HelloWorksClient,
    config::Config,
    endpoints::{TokenApi, WorkflowInstancesApi},
    errors::Error,
    request::{ApiResponse, RequestDispatcher, RequestOptions},
    session::{Credentials, Session},
    token::{Clock, SystemClock, TokenState},
};

impl HelloWorksClient {
    /// Create a new HelloWorksClient
    /// # Arguments
    /// * `config` - Explicit configuration (`Config`), typically loaded via `Config::from_file` or `Config::from_env`.
    /// # ENV Vars (when using `Config::from_env`)
    /// * `HW_API_KEY_ID` - API key id
    /// * `HW_API_KEY_SECRET` - API key secret
    /// * `HW_HOST` - Optional API host, defaults to `https://api.helloworks.com`
    pub fn new(config: Config) -> Result<Self, Error> {
        Self::with_parts(config, Client::new(), Arc::new(SystemClock))
    }

    /// Same as [`HelloWorksClient::new`] but with a caller supplied HTTP client
    /// (for timeouts, proxies) and clock.
    pub fn with_parts(
        config: Config,
        http_client: Client,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, Error> {
        let host = config.resolved_host()?;
        if config.api_key_id.is_empty() {
            return Err(Error::Config("api_key_id must not be empty".to_string()));
        }
        let credentials = Credentials::new(config.api_key_id, config.api_key_secret);
        info!(host = %host, api_key_id = %credentials.api_key_id(), "client created");

        let dispatcher = RequestDispatcher::new(http_client, host);
        let session = Arc::new(Session::new(dispatcher, credentials, clock));
        Ok(HelloWorksClient {
            token: TokenApi::new(Arc::clone(&session)),
            workflow_instances: WorkflowInstancesApi::new(Arc::clone(&session)),
            session,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub async fn token_state(&self) -> TokenState {
        self.session.token_state().await
    }

    pub async fn send_request(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<ApiResponse, Error> {
        self.session.send_request(path, options).await
    }

    pub async fn send_authenticated_request(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<ApiResponse, Error> {
        self.session.send_authenticated_request(path, options).await
    }
}
