//! Call state and the text rendered for it
//!
//! The UI is a pure function of [`CallState`]: one button label, one status
//! line and one style per state.

/// Whether a call is believed to be open from the UI's point of view
///
/// There is no separate "starting" state. The toggle flips to `Active`
/// optimistically before the token request resolves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CallState {
    /// No call open, the button starts one
    #[default]
    Idle,
    /// A call is open (or being opened), the button stops it
    Active,
}

/// Visual style of the call button
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonStyle {
    /// Resting style, inviting a new call
    Idle,
    /// Highlighted style while a call is open
    Active,
}

impl CallState {
    /// Check if a call is active
    pub fn is_active(&self) -> bool {
        matches!(self, CallState::Active)
    }

    /// Check if idle
    pub fn is_idle(&self) -> bool {
        matches!(self, CallState::Idle)
    }

    /// Text on the call button
    pub fn button_label(&self) -> &'static str {
        match self {
            CallState::Idle => "Start IT Support Call 🎙️",
            CallState::Active => "Stop Call ⏹️",
        }
    }

    /// Status line under the button
    pub fn status_text(&self) -> &'static str {
        match self {
            CallState::Idle => "Click to speak with an IT Technician",
            CallState::Active => "Agent is listening...",
        }
    }

    /// Button style for this state
    pub fn button_style(&self) -> ButtonStyle {
        match self {
            CallState::Idle => ButtonStyle::Idle,
            CallState::Active => ButtonStyle::Active,
        }
    }
}

impl std::fmt::Display for CallState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CallState::Idle => write!(f, "Idle"),
            CallState::Active => write!(f, "Active"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_idle() {
        assert_eq!(CallState::default(), CallState::Idle);
        assert!(CallState::default().is_idle());
    }

    #[test]
    fn test_rendering_differs_per_state() {
        assert_ne!(CallState::Idle.button_label(), CallState::Active.button_label());
        assert_ne!(CallState::Idle.status_text(), CallState::Active.status_text());
        assert_eq!(CallState::Idle.button_style(), ButtonStyle::Idle);
        assert_eq!(CallState::Active.button_style(), ButtonStyle::Active);
    }

    #[test]
    fn test_active_status_text() {
        assert_eq!(CallState::Active.status_text(), "Agent is listening...");
        assert_eq!(CallState::Active.button_label(), "Stop Call ⏹️");
    }
}
