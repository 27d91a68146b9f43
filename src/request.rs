use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use reqwest::multipart::Form;
use reqwest::{Client, Method, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::{BASE_PATH, USER_AGENT as LIBRARY_USER_AGENT};
use crate::errors::Error;

/// Body attached to an outbound request.
#[derive(Debug, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Bytes(Vec<u8>),
    Json(serde_json::Value),
    Multipart(Form),
}

/// Per-call request descriptor. Defaults to a bodiless GET.
#[derive(Debug)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: RequestBody,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: HeaderMap::new(),
            body: RequestBody::Empty,
        }
    }
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn header(mut self, name: HeaderName, value: &str) -> Result<Self, Error> {
        let value = HeaderValue::from_str(value)
            .map_err(|e| Error::InvalidHeader(format!("{}: {}", name, e)))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }
}

#[derive(Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

/// Error body returned by the API for JSON failures.
#[derive(Deserialize)]
pub(crate) struct ErrorEnvelope {
    error: String,
}

/// Successful response. The caller picks how to read the body.
#[derive(Debug)]
pub struct ApiResponse {
    inner: Response,
}

impl ApiResponse {
    pub fn status(&self) -> StatusCode {
        self.inner.status()
    }

    pub fn headers(&self) -> &HeaderMap {
        self.inner.headers()
    }

    /// Decodes the whole body as `T`.
    pub async fn json<T: DeserializeOwned>(self) -> Result<T, Error> {
        let body = self.inner.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Decodes a `{ "data": ... }` envelope and returns the inner payload.
    pub async fn data<T: DeserializeOwned>(self) -> Result<T, Error> {
        let envelope: DataEnvelope<T> = self.json().await?;
        Ok(envelope.data)
    }

    pub async fn bytes(self) -> Result<Vec<u8>, Error> {
        Ok(self.inner.bytes().await?.to_vec())
    }
}

/// Sends raw calls against `{host}/v3` and classifies the responses.
#[derive(Clone, Debug)]
pub struct RequestDispatcher {
    http_client: Client,
    host: String,
}

impl RequestDispatcher {
    pub fn new(http_client: Client, host: impl Into<String>) -> Self {
        Self {
            http_client,
            host: host.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}{}", self.host, BASE_PATH, path)
    }

    pub async fn send_request(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<ApiResponse, Error> {
        let RequestOptions {
            method,
            mut headers,
            body,
        } = options;
        headers.insert(USER_AGENT, HeaderValue::from_static(LIBRARY_USER_AGENT));

        let url = self.url_for(path);
        debug!(method = %method, path, "dispatching request");

        let mut builder = self.http_client.request(method.clone(), &url);
        builder = match body {
            RequestBody::Empty => builder,
            RequestBody::Bytes(bytes) => builder.body(bytes),
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(form) => builder.multipart(form),
        };
        // Applied after the body so caller headers win over ones the body sets.
        let resp = builder.headers(headers).send().await?;

        let status = resp.status();
        if status.is_success() {
            debug!(method = %method, path, status = status.as_u16(), "request ok");
            return Ok(ApiResponse { inner: resp });
        }

        let message = failure_message(resp).await?;
        warn!(
            method = %method,
            path,
            status = status.as_u16(),
            message = %message,
            "request failed"
        );
        Err(Error::Api { status, message })
    }
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("application/json"))
}

async fn failure_message(resp: Response) -> Result<String, Error> {
    let status = resp.status();
    if is_json(resp.headers()) {
        let body = resp.bytes().await?;
        let envelope: ErrorEnvelope = serde_json::from_slice(&body)?;
        Ok(envelope.error)
    } else {
        Ok(status
            .canonical_reason()
            .unwrap_or("Unknown Status")
            .to_string())
    }
}
