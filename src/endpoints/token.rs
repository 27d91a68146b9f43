use std::sync::Arc;

use reqwest::header::AUTHORIZATION;

use crate::errors::Error;
use crate::request::{RequestDispatcher, RequestOptions};
use crate::session::{Credentials, Session, bearer};
use crate::token::Token;

const BASE_PATH: &str = "/token";

/// Exchanges an API key pair for a bearer token. Failures are reported as
/// [`Error::Auth`].
pub(crate) async fn request_token(
    dispatcher: &RequestDispatcher,
    credentials: &Credentials,
) -> Result<Token, Error> {
    let path = format!(
        "{}/{}",
        BASE_PATH,
        urlencoding::encode(credentials.api_key_id())
    );
    let mut options = RequestOptions::default();
    options
        .headers
        .insert(AUTHORIZATION, bearer(credentials.api_key_secret())?);

    let resp = dispatcher
        .send_request(&path, options)
        .await
        .map_err(Error::into_auth)?;
    resp.data().await
}

#[derive(Clone)]
pub struct TokenApi {
    session: Arc<Session>,
}

impl TokenApi {
    pub(crate) fn new(session: Arc<Session>) -> Self {
        Self { session }
    }

    /// Fetches a token for an arbitrary key pair without touching the
    /// session's cached token.
    pub async fn get_token(&self, api_key_id: &str, api_key_secret: &str) -> Result<Token, Error> {
        let credentials = Credentials::new(api_key_id, api_key_secret);
        request_token(self.session.dispatcher(), &credentials).await
    }
}
