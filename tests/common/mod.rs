#![allow(dead_code)]

pub mod time;

use std::sync::Arc;

use helloworks::{Config, HelloWorksClient};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub use time::{ManualClock, START};

pub fn client(server: &MockServer, clock: Arc<ManualClock>) -> HelloWorksClient {
    let cfg = Config::from_values("k1", "s1", Some(server.uri()));
    HelloWorksClient::with_parts(cfg, reqwest::Client::new(), clock).expect("client")
}

/// Token endpoint for key `k1` / secret `s1`, expected to be hit `times` times.
pub async fn mount_token(server: &MockServer, token: &str, expires_at: i64, times: u64) {
    Mock::given(method("GET"))
        .and(path("/v3/token/k1"))
        .and(header("Authorization", "Bearer s1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "token": token, "expires_at": expires_at }
        })))
        .expect(times)
        .mount(server)
        .await;
}
