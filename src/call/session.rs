//! Call session collaborator
//!
//! The realtime voice session (audio transport, turn-taking, speech) is owned
//! by an external SDK. This module defines the seam the controller talks to:
//! [`CallSession`] for start/stop and [`SessionListener`] for the two
//! lifecycle notifications.

use crate::error::SessionError;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;

/// Observer for session lifecycle notifications
///
/// Callbacks may fire on any thread at any time after registration.
pub trait SessionListener: Send + Sync {
    /// The call ended (remote hang-up, timeout, or transport close)
    fn on_call_ended(&self);

    /// The session reported an error
    fn on_error(&self, error: SessionError);
}

/// A realtime voice session supplied by an external collaborator
#[async_trait]
pub trait CallSession: Send + Sync {
    /// Establish a realtime call using a backend-issued access token
    async fn start_call(&self, access_token: &str) -> Result<(), SessionError>;

    /// End the current call without waiting for confirmation
    ///
    /// Must be a no-op when no call is active or a start is still pending.
    fn stop_call(&self);

    /// Register the listener that receives lifecycle notifications
    fn subscribe(&self, listener: Arc<dyn SessionListener>);
}

#[derive(Default)]
struct SimulatedInner {
    /// Id of the open call, if any
    active_call: Option<Uuid>,
    listener: Option<Arc<dyn SessionListener>>,
}

/// In-process session used when no vendor SDK is linked
///
/// Accepts any non-empty token, keeps the call open for `call_duration`
/// (forever when `None`) and then reports `call_ended`. Remote events can be
/// injected with [`SimulatedSession::hang_up`] and
/// [`SimulatedSession::report_error`].
#[derive(Clone, Default)]
pub struct SimulatedSession {
    inner: Arc<Mutex<SimulatedInner>>,
    call_duration: Option<Duration>,
}

impl SimulatedSession {
    /// Create a session that stays open until stopped
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session whose agent hangs up after `duration`
    pub fn with_call_duration(duration: Duration) -> Self {
        Self {
            inner: Arc::default(),
            call_duration: Some(duration),
        }
    }

    /// Build from the configured duration in seconds (0 = until stopped)
    pub fn from_secs(secs: u64) -> Self {
        if secs == 0 {
            Self::new()
        } else {
            Self::with_call_duration(Duration::from_secs(secs))
        }
    }

    /// Check if a call is currently open
    pub fn is_active(&self) -> bool {
        self.inner.lock().active_call.is_some()
    }

    /// Simulate the remote agent ending the call
    pub fn hang_up(&self) {
        let listener = {
            let mut inner = self.inner.lock();
            if let Some(id) = inner.active_call.take() {
                info!("[SESSION] Remote hang-up for call {}", id);
            }
            inner.listener.clone()
        };
        if let Some(listener) = listener {
            listener.on_call_ended();
        }
    }

    /// Simulate a session error; the open call (if any) is dropped
    pub fn report_error(&self, message: impl Into<String>) {
        let listener = {
            let mut inner = self.inner.lock();
            inner.active_call = None;
            inner.listener.clone()
        };
        if let Some(listener) = listener {
            listener.on_error(SessionError::Remote(message.into()));
        }
    }

    fn schedule_hang_up(&self, call_id: Uuid, duration: Duration) {
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            let listener = {
                let mut guard = inner.lock();
                // The call may have been stopped or replaced in the meantime
                if guard.active_call != Some(call_id) {
                    return;
                }
                guard.active_call = None;
                guard.listener.clone()
            };
            info!("[SESSION] Call {} reached its duration, ending", call_id);
            if let Some(listener) = listener {
                listener.on_call_ended();
            }
        });
    }
}

#[async_trait]
impl CallSession for SimulatedSession {
    async fn start_call(&self, access_token: &str) -> Result<(), SessionError> {
        if access_token.trim().is_empty() {
            return Err(SessionError::StartRejected("empty access token".to_string()));
        }

        let call_id = Uuid::new_v4();
        {
            let mut inner = self.inner.lock();
            if let Some(existing) = inner.active_call {
                return Err(SessionError::StartRejected(format!(
                    "call {} is already active",
                    existing
                )));
            }
            inner.active_call = Some(call_id);
        }
        info!("[SESSION] Call {} started", call_id);

        if let Some(duration) = self.call_duration {
            self.schedule_hang_up(call_id, duration);
        }
        Ok(())
    }

    fn stop_call(&self) {
        match self.inner.lock().active_call.take() {
            Some(id) => info!("[SESSION] Call {} stopped", id),
            None => warn!("[SESSION] stop_call with no active call, ignoring"),
        }
    }

    fn subscribe(&self, listener: Arc<dyn SessionListener>) {
        self.inner.lock().listener = Some(listener);
    }
}
