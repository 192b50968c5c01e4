//! GUI implementation with egui/eframe
//!
//! One window: a heading, the call button and its status line.

mod app;
pub mod components;
mod theme;

pub use app::{HelpdeskApp, APP_TITLE};
pub use components::{CallButton, CallCard, CallStatus};
pub use theme::Theme;
