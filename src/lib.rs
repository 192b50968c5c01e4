//! Helpdesk call - desktop call toggle for an AI IT helpdesk agent
//!
//! A single window with one button. Pressing it fetches a short-lived access
//! token from the helpdesk backend and starts a realtime voice session;
//! pressing it again, or the session ending, returns to idle.

pub mod call;
pub mod config;
pub mod error;
pub mod testconfig;
pub mod ui;

pub use error::{CallError, ConfigError, Result, SessionError, TokenError};

pub use call::{
    CallController, CallSession, CallState, ControllerEvent, HttpTokenSource, SessionListener,
    SimulatedSession, TokenSource,
};
pub use config::{load_config, AppConfig, ConfigSource};
