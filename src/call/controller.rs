//! Call toggle controller
//!
//! Owns the single [`CallState`] and mediates between the UI toggle, the
//! token endpoint and the call session.
//!
//! State only changes on the thread that owns the controller. The
//! fetch-then-start sequence runs on the tokio runtime and reports its
//! outcome as a [`ControllerEvent`]; session callbacks are forwarded onto the
//! same channel. [`CallController::poll_events`] applies them.
//!
//! Known race: a second toggle before the token request resolves sees
//! `Active` and takes the stop branch. `stop_call` then runs against a
//! session that has not started yet, and the pending start may still open
//! a call afterwards. This is logged when it happens.
//!
//! Start outcomes carry no attempt id. After a stop and a fresh toggle, a
//! late outcome from the earlier attempt is applied to the newer one: a
//! stale `Started` is logged as the new call starting, and a stale
//! `StartFailed` resets a call that did start back to `Idle` while its
//! session stays open.

use crate::call::session::{CallSession, SessionListener};
use crate::call::state::CallState;
use crate::call::token::TokenSource;
use crate::error::{CallError, SessionError};
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::{debug, error, info, warn};

/// Outcomes and notifications delivered back to the controller
#[derive(Clone, Debug)]
pub enum ControllerEvent {
    /// Token fetched and `start_call` resolved
    Started,
    /// Token fetch or `start_call` failed
    StartFailed(CallError),
    /// The session reported `call_ended`
    CallEnded,
    /// The session reported an error
    SessionError(SessionError),
}

/// Forwards session callbacks onto the controller's event channel
struct ChannelListener {
    tx: Sender<ControllerEvent>,
}

impl SessionListener for ChannelListener {
    fn on_call_ended(&self) {
        let _ = self.tx.send(ControllerEvent::CallEnded);
    }

    fn on_error(&self, error: SessionError) {
        let _ = self.tx.send(ControllerEvent::SessionError(error));
    }
}

/// The call toggle state machine
pub struct CallController {
    state: CallState,
    tokens: Arc<dyn TokenSource>,
    session: Arc<dyn CallSession>,
    runtime: Handle,
    event_tx: Sender<ControllerEvent>,
    event_rx: Receiver<ControllerEvent>,
    last_failure: Option<String>,
}

impl CallController {
    /// Create a controller and register it as the session's listener
    pub fn new(
        tokens: Arc<dyn TokenSource>,
        session: Arc<dyn CallSession>,
        runtime: Handle,
    ) -> Self {
        let (event_tx, event_rx) = unbounded();

        session.subscribe(Arc::new(ChannelListener {
            tx: event_tx.clone(),
        }));

        Self {
            state: CallState::Idle,
            tokens,
            session,
            runtime,
            event_tx,
            event_rx,
            last_failure: None,
        }
    }

    /// Current call state
    pub fn state(&self) -> CallState {
        self.state
    }

    /// Check if a call is active
    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    /// Message of the most recent failure, cleared when a new call starts
    pub fn last_failure(&self) -> Option<&str> {
        self.last_failure.as_deref()
    }

    /// Handle a press of the call button
    pub fn on_toggle(&mut self) {
        match self.state {
            CallState::Active => {
                info!("[CALL] Stopping call");
                self.session.stop_call();
                self.state = CallState::Idle;
            }
            CallState::Idle => {
                self.state = CallState::Active;
                self.last_failure = None;
                info!("[CALL] Starting call");
                self.spawn_start();
            }
        }
    }

    /// The session reported that the call ended
    pub fn on_session_ended(&mut self) {
        info!("[CALL] Call ended");
        self.state = CallState::Idle;
    }

    /// The session reported an error
    pub fn on_session_error(&mut self, err: SessionError) {
        error!("[CALL] Session error: {}", err);
        self.last_failure = Some(err.to_string());
        self.state = CallState::Idle;
    }

    /// Apply every pending event, returns how many were applied
    pub fn poll_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.event_rx.try_recv() {
            self.apply(event);
            applied += 1;
        }
        applied
    }

    /// Wait up to `timeout` for one event and apply it
    pub fn process_next_event(&mut self, timeout: Duration) -> Option<ControllerEvent> {
        match self.event_rx.recv_timeout(timeout) {
            Ok(event) => {
                self.apply(event.clone());
                Some(event)
            }
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => {
                warn!("[CALL] Event channel disconnected");
                None
            }
        }
    }

    fn apply(&mut self, event: ControllerEvent) {
        debug!("[CALL] Event {:?} in state {}", event, self.state);
        match event {
            ControllerEvent::Started => {
                if self.state.is_idle() {
                    warn!("[CALL] Session started after the call was stopped; it is still open");
                } else {
                    info!("[CALL] Call started");
                }
            }
            ControllerEvent::StartFailed(err) => {
                error!("[CALL] Failed to start call: {}", err);
                self.last_failure = Some(err.to_string());
                self.state = CallState::Idle;
            }
            ControllerEvent::CallEnded => self.on_session_ended(),
            ControllerEvent::SessionError(err) => self.on_session_error(err),
        }
    }

    fn spawn_start(&self) {
        let tokens = Arc::clone(&self.tokens);
        let session = Arc::clone(&self.session);
        let tx = self.event_tx.clone();

        self.runtime.spawn(async move {
            let event = match start_call(tokens.as_ref(), session.as_ref()).await {
                Ok(()) => ControllerEvent::Started,
                Err(err) => ControllerEvent::StartFailed(err),
            };
            let _ = tx.send(event);
        });
    }
}

/// Fetch a token and hand it to the session
async fn start_call(tokens: &dyn TokenSource, session: &dyn CallSession) -> crate::Result<()> {
    let token = tokens.fetch_token().await?;
    debug!("[CALL] Access token received");
    session.start_call(&token).await?;
    Ok(())
}
