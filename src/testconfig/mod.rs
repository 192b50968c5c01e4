//! Scripted UI scenarios
//!
//! A scenario is a TOML file of timed actions with optional assertions,
//! run against the live window to exercise the call toggle end to end.

mod runner;

pub use runner::{AssertionContext, AssertionResult, TestCommand, TestRunner};

use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// A scenario loaded from a TOML file
#[derive(Debug, Clone, Deserialize)]
pub struct TestConfig {
    /// Scenario metadata
    pub test: TestMetadata,
    /// Timed actions, ordered by `time_ms`
    pub actions: Vec<TestAction>,
}

/// Metadata about the scenario
#[derive(Debug, Clone, Deserialize)]
pub struct TestMetadata {
    /// Name of the scenario
    pub name: String,
    /// What the scenario validates
    #[serde(default)]
    pub description: String,
}

/// A single action with timing
#[derive(Debug, Clone, Deserialize)]
pub struct TestAction {
    /// Milliseconds after scenario start to execute this action
    pub time_ms: u64,
    /// The action to perform
    pub action: ActionType,
    /// Optional assertion checked right after the action
    #[serde(default)]
    pub assert: Option<Assertion>,
}

/// Actions a scenario can perform
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionType {
    /// Press the call button
    ClickCall,
    /// The remote agent hangs up
    EndCall,
    /// The session reports an error
    SessionError {
        /// Error message delivered to the listener
        #[serde(default = "default_session_error")]
        message: String,
    },
    /// Log a message
    Log {
        /// Message to log
        message: String,
    },
    /// Exit the application
    Exit {
        /// Exit code (0 for success)
        #[serde(default)]
        code: i32,
    },
}

fn default_session_error() -> String {
    "scripted session error".to_string()
}

/// Assertions on the call state
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Assertion {
    /// No call is active
    IsIdle,
    /// A call is active
    IsActive,
    /// A failure has been recorded since the last call started
    HasFailure,
    /// The status line shows exactly this text
    StatusText {
        /// Expected status line
        text: String,
    },
}

impl TestConfig {
    /// Load a scenario from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, TestConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| TestConfigError::IoError {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| match e {
            TestConfigError::ParseError { error, .. } => TestConfigError::ParseError {
                path: path.display().to_string(),
                error,
            },
            other => other,
        })
    }

    /// Parse and validate a scenario from TOML text
    pub fn parse(content: &str) -> Result<Self, TestConfigError> {
        let config: TestConfig =
            toml::from_str(content).map_err(|e| TestConfigError::ParseError {
                path: "<inline>".to_string(),
                error: e.to_string(),
            })?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), TestConfigError> {
        if self.actions.is_empty() {
            return Err(TestConfigError::ValidationError(
                "Test configuration must have at least one action".to_string(),
            ));
        }

        let mut last_time = 0;
        for action in &self.actions {
            if action.time_ms < last_time {
                return Err(TestConfigError::ValidationError(format!(
                    "Actions must be ordered by time. Found action at {}ms after action at {}ms",
                    action.time_ms, last_time
                )));
            }
            last_time = action.time_ms;
        }

        let has_exit = self
            .actions
            .iter()
            .any(|a| matches!(a.action, ActionType::Exit { .. }));
        if !has_exit {
            return Err(TestConfigError::ValidationError(
                "Test configuration must have an Exit action".to_string(),
            ));
        }

        Ok(())
    }
}

impl TestAction {
    /// Delay from scenario start for this action
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.time_ms)
    }
}

/// Errors that can occur when loading or validating scenarios
#[derive(Debug, Clone, thiserror::Error)]
pub enum TestConfigError {
    /// IO error reading the file
    #[error("Failed to read test config '{path}': {error}")]
    IoError { path: String, error: String },
    /// Error parsing the TOML
    #[error("Failed to parse test config '{path}': {error}")]
    ParseError { path: String, error: String },
    /// The scenario is malformed
    #[error("Invalid test config: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_actions() {
        let config = TestConfig::parse(
            r#"
            [test]
            name = "Start and stop"

            [[actions]]
            time_ms = 100
            action = { type = "click_call" }
            assert = { type = "is_active" }

            [[actions]]
            time_ms = 1500
            action = { type = "end_call" }
            assert = { type = "status_text", text = "Click to speak with an IT Technician" }

            [[actions]]
            time_ms = 2000
            action = { type = "exit", code = 0 }
            "#,
        )
        .unwrap();

        assert_eq!(config.test.name, "Start and stop");
        assert_eq!(config.actions.len(), 3);
        assert!(matches!(config.actions[0].action, ActionType::ClickCall));
        assert!(matches!(config.actions[0].assert, Some(Assertion::IsActive)));
        assert!(matches!(config.actions[1].action, ActionType::EndCall));
        assert!(matches!(
            config.actions[1].assert,
            Some(Assertion::StatusText { .. })
        ));
        assert!(matches!(config.actions[2].action, ActionType::Exit { code: 0 }));
    }

    #[test]
    fn test_session_error_default_message() {
        let config = TestConfig::parse(
            r#"
            [test]
            name = "Error"

            [[actions]]
            time_ms = 0
            action = { type = "session_error" }

            [[actions]]
            time_ms = 10
            action = { type = "exit" }
            "#,
        )
        .unwrap();

        match &config.actions[0].action {
            ActionType::SessionError { message } => {
                assert_eq!(message, "scripted session error")
            }
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn test_rejects_unordered_actions() {
        let result = TestConfig::parse(
            r#"
            [test]
            name = "Unordered"

            [[actions]]
            time_ms = 500
            action = { type = "click_call" }

            [[actions]]
            time_ms = 100
            action = { type = "exit" }
            "#,
        );
        assert!(matches!(result, Err(TestConfigError::ValidationError(_))));
    }

    #[test]
    fn test_rejects_missing_exit() {
        let result = TestConfig::parse(
            r#"
            [test]
            name = "No exit"

            [[actions]]
            time_ms = 0
            action = { type = "click_call" }
            "#,
        );
        assert!(matches!(result, Err(TestConfigError::ValidationError(_))));
    }

    #[test]
    fn test_bundled_scenarios_load() {
        for name in ["start_stop.toml", "remote_events.toml"] {
            let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(name);
            let config = TestConfig::load(&path).unwrap();
            assert!(!config.actions.is_empty(), "{} has no actions", name);
        }
    }

    #[test]
    fn test_load_missing_file() {
        let result = TestConfig::load("does/not/exist.toml");
        assert!(matches!(result, Err(TestConfigError::IoError { .. })));
    }

    #[test]
    fn test_rejects_unknown_action() {
        let result = TestConfig::parse(
            r#"
            [test]
            name = "Unknown"

            [[actions]]
            time_ms = 0
            action = { type = "click_record" }
            "#,
        );
        assert!(matches!(result, Err(TestConfigError::ParseError { .. })));
    }
}
