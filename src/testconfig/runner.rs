//! Scenario runner
//!
//! Schedules a scenario's actions by elapsed time and records assertion
//! outcomes.

use super::{ActionType, Assertion, TestConfig};
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

/// Commands the runner hands to the app
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestCommand {
    /// Press the call button
    ClickCall,
    /// Remote hang-up
    EndCall,
    /// Session error with message
    SessionError(String),
    /// Log only
    Log(String),
    /// Exit the application
    Exit { code: i32 },
}

/// Result of an assertion check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssertionResult {
    /// Assertion passed
    Passed,
    /// Assertion failed with reason
    Failed(String),
}

/// Snapshot of what the app shows, passed from the app to the runner
pub struct AssertionContext<'a> {
    pub is_active: bool,
    pub status_text: &'a str,
    pub last_failure: Option<&'a str>,
}

/// Runner that schedules and executes scenario actions
pub struct TestRunner {
    config: TestConfig,
    start_time: Option<Instant>,
    current_action_index: usize,
    completed: bool,
    test_passed: bool,
}

impl TestRunner {
    /// Create a runner for a scenario
    pub fn new(config: TestConfig) -> Self {
        info!("[TEST] Loaded scenario: {}", config.test.name);
        if !config.test.description.is_empty() {
            info!("[TEST] Description: {}", config.test.description);
        }

        Self {
            config,
            start_time: None,
            current_action_index: 0,
            completed: false,
            test_passed: true,
        }
    }

    /// Start the clock (call on the first frame)
    pub fn start(&mut self) {
        if self.start_time.is_none() {
            self.start_time = Some(Instant::now());
            info!("[TEST] Scenario started: {}", self.config.test.name);
        }
    }

    /// Check if every action has been handed out
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Check if every assertion so far passed
    pub fn test_passed(&self) -> bool {
        self.test_passed
    }

    /// Elapsed time since start
    pub fn elapsed(&self) -> Duration {
        self.start_time
            .map(|t| t.elapsed())
            .unwrap_or(Duration::ZERO)
    }

    /// Next due command, if any
    pub fn poll(&mut self) -> Option<(TestCommand, Option<Assertion>)> {
        let start_time = self.start_time?;
        self.poll_at(start_time.elapsed())
    }

    /// Next command due at `elapsed`, if any
    pub fn poll_at(&mut self, elapsed: Duration) -> Option<(TestCommand, Option<Assertion>)> {
        if self.completed {
            return None;
        }

        let action = self.config.actions.get(self.current_action_index)?;
        if elapsed < action.delay() {
            return None;
        }

        debug!(
            "[TEST] Executing action at {}ms: {:?}",
            action.time_ms, action.action
        );
        let command = to_command(&action.action);
        let assertion = action.assert.clone();

        self.current_action_index += 1;
        if self.current_action_index >= self.config.actions.len() {
            self.completed = true;
        }

        Some((command, assertion))
    }

    /// Check an assertion against what the app currently shows
    pub fn check_assertion(
        &mut self,
        assertion: &Assertion,
        context: &AssertionContext<'_>,
    ) -> AssertionResult {
        let result = match assertion {
            Assertion::IsIdle => {
                if !context.is_active {
                    AssertionResult::Passed
                } else {
                    AssertionResult::Failed("Expected state to be Idle".to_string())
                }
            }
            Assertion::IsActive => {
                if context.is_active {
                    AssertionResult::Passed
                } else {
                    AssertionResult::Failed("Expected state to be Active".to_string())
                }
            }
            Assertion::HasFailure => {
                if context.last_failure.is_some() {
                    AssertionResult::Passed
                } else {
                    AssertionResult::Failed("Expected a recorded failure".to_string())
                }
            }
            Assertion::StatusText { text } => {
                if context.status_text == text {
                    AssertionResult::Passed
                } else {
                    AssertionResult::Failed(format!(
                        "Expected status '{}', got '{}'",
                        text, context.status_text
                    ))
                }
            }
        };

        match &result {
            AssertionResult::Passed => info!("[TEST] PASS: Assertion {:?}", assertion),
            AssertionResult::Failed(reason) => {
                error!("[TEST] FAIL: Assertion {:?} - {}", assertion, reason);
                self.test_passed = false;
            }
        }

        result
    }

    /// One-line summary of the run
    pub fn summary(&self) -> String {
        let status = if self.test_passed { "PASSED" } else { "FAILED" };
        format!(
            "[TEST] Scenario '{}' {}: Executed {} actions in {:?}",
            self.config.test.name,
            status,
            self.current_action_index,
            self.elapsed()
        )
    }
}

fn to_command(action: &ActionType) -> TestCommand {
    match action {
        ActionType::ClickCall => TestCommand::ClickCall,
        ActionType::EndCall => TestCommand::EndCall,
        ActionType::SessionError { message } => TestCommand::SessionError(message.clone()),
        ActionType::Log { message } => TestCommand::Log(message.clone()),
        ActionType::Exit { code } => TestCommand::Exit { code: *code },
    }
}
