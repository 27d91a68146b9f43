use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::errors::Error;
use crate::telemetry::refresh::{RefreshOutcome, RefreshTelemetry};

use super::{Clock, Token, TokenEnvelope, TokenState};

/// Convenience result alias for guard operations.
pub type TokenGuardResult<T> = Result<T, Error>;

/// Holds the session token and makes sure at most one refresh runs at a time.
pub struct TokenGuard {
    envelope: RwLock<Option<TokenEnvelope>>,
    /// Guards the refresh and remembers how the last one failed, if it did.
    refresh_lock: Mutex<Option<Error>>,
    /// Bumped every time a refresh finishes, successfully or not.
    generation: AtomicU64,
    clock: Arc<dyn Clock>,
}

impl TokenGuard {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            envelope: RwLock::new(None),
            refresh_lock: Mutex::new(None),
            generation: AtomicU64::new(0),
            clock,
        }
    }

    pub async fn state(&self) -> TokenState {
        let envelope = self.envelope.read().await;
        TokenEnvelope::state(envelope.as_ref(), self.clock.now_secs())
    }

    pub async fn current(&self) -> Option<TokenEnvelope> {
        self.envelope.read().await.clone()
    }

    /// Returns a valid token, running `refresh_cb` first if there is none or
    /// it has expired. Callers arriving while a refresh is running wait for it
    /// and share its outcome, including a failure. A failure is not kept for
    /// callers that arrive after the refresh finished.
    pub async fn ensure_fresh<F, Fut>(
        &self,
        refresh_cb: F,
        context: &str,
    ) -> TokenGuardResult<TokenEnvelope>
    where
        F: FnOnce() -> Fut + Send,
        Fut: std::future::Future<Output = TokenGuardResult<Token>> + Send,
    {
        let seen = self.generation.load(Ordering::SeqCst);
        if let Some(envelope) = self.valid_envelope().await {
            return Ok(envelope);
        }

        let mut last_failure = self.refresh_lock.lock().await;
        if self.generation.load(Ordering::SeqCst) != seen {
            // A refresh finished while we waited for the lock.
            if let Some(err) = last_failure.as_ref() {
                debug!(error = %err, "sharing failed refresh with waiting caller");
                return Err(err.clone());
            }
            if let Some(envelope) = self.current().await {
                debug!("token refreshed by concurrent caller");
                return Ok(envelope);
            }
        }
        if let Some(envelope) = self.valid_envelope().await {
            return Ok(envelope);
        }

        let telemetry = RefreshTelemetry::new(context);
        telemetry.emit_start(self.state().await);
        let outcome = refresh_cb().await;
        let result = match outcome {
            Ok(token) => {
                let fresh = TokenEnvelope::from(token);
                {
                    let mut writer = self.envelope.write().await;
                    *writer = Some(fresh.clone());
                }
                if !fresh.is_valid_at(self.clock.now_secs()) {
                    debug!(
                        expires_at = fresh.expires_at(),
                        "refreshed token is already expired"
                    );
                }
                telemetry.emit_success(RefreshOutcome::Success, fresh.expires_at());
                *last_failure = None;
                Ok(fresh)
            }
            Err(err) => {
                telemetry.emit_failure(&err);
                *last_failure = Some(err.clone());
                Err(err)
            }
        };
        self.generation.fetch_add(1, Ordering::SeqCst);
        result
    }

    async fn valid_envelope(&self) -> Option<TokenEnvelope> {
        let envelope = self.envelope.read().await;
        envelope
            .as_ref()
            .filter(|env| env.is_valid_at(self.clock.now_secs()))
            .cloned()
    }
}
