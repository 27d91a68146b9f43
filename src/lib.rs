//! Async client for the HelloWorks workflow API.
//!
//! Authenticated calls fetch and cache a bearer token from the API key pair,
//! refreshing it once it expires.

mod client;
mod config;
pub mod endpoints;
mod errors;
pub mod request;
pub mod session;
pub mod telemetry;
pub mod token;
pub mod types;

pub use client::HelloWorksClient;
pub use config::{BASE_PATH, Config, ConfigLocation, DEFAULT_HOST, USER_AGENT};
pub use errors::Error;
pub use request::{ApiResponse, RequestBody, RequestOptions};
pub use types::{ContactMethod, CreateInstance, Participant, Step, WorkflowInstance};
