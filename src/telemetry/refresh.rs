use tracing::{Level, event};
use uuid::Uuid;

use crate::errors::Error;
use crate::token::TokenState;

#[derive(Clone, Debug)]
pub enum RefreshOutcome {
    Success,
    Failed,
}

/// Structured events for a single token refresh attempt.
#[derive(Clone, Debug)]
pub struct RefreshTelemetry {
    attempt_id: Uuid,
    context: String,
}

impl RefreshTelemetry {
    pub fn new(context: impl Into<String>) -> Self {
        Self {
            attempt_id: Uuid::new_v4(),
            context: context.into(),
        }
    }

    pub fn attempt_id(&self) -> Uuid {
        self.attempt_id
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn emit_start(&self, from: TokenState) {
        event!(
            Level::INFO,
            attempt_id = %self.attempt_id,
            context = %self.context,
            from = ?from,
            "refresh.start"
        );
    }

    pub fn emit_success(&self, outcome: RefreshOutcome, expires_at: i64) {
        event!(
            Level::INFO,
            attempt_id = %self.attempt_id,
            context = %self.context,
            expires_at,
            outcome = ?outcome,
            "refresh.success"
        );
    }

    pub fn emit_failure(&self, error: &Error) {
        event!(
            Level::ERROR,
            attempt_id = %self.attempt_id,
            context = %self.context,
            status = ?error.status(),
            outcome = ?RefreshOutcome::Failed,
            error = %error,
            "refresh.failure"
        );
    }
}
