//! UI components module

pub mod call_button;

pub use call_button::{CallButton, CallCard, CallStatus};
