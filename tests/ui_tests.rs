//! UI automation tests using egui_kittest and AccessKit
//!
//! These tests drive the real `HelpdeskApp` frame function, click the call
//! button through the accessibility tree and check the rendered labels.

use async_trait::async_trait;
use egui_kittest::kittest::Queryable;
use egui_kittest::Harness;
use helpdesk_call::testconfig::TestConfig;
use helpdesk_call::ui::{CallCard, HelpdeskApp, Theme, APP_TITLE};
use helpdesk_call::{CallController, CallState, SimulatedSession, TokenError, TokenSource};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::runtime::Runtime;

const IDLE_LABEL: &str = "Start IT Support Call 🎙️";
const ACTIVE_LABEL: &str = "Stop Call ⏹️";
const IDLE_STATUS: &str = "Click to speak with an IT Technician";
const ACTIVE_STATUS: &str = "Agent is listening...";

struct FixedTokens(Result<String, TokenError>);

#[async_trait]
impl TokenSource for FixedTokens {
    async fn fetch_token(&self) -> Result<String, TokenError> {
        self.0.clone()
    }
}

/// App plus the runtime and session it depends on
struct TestApp {
    _runtime: Runtime,
    session: SimulatedSession,
    app: HelpdeskApp,
}

impl TestApp {
    fn new(tokens: Result<String, TokenError>) -> Self {
        Self::with_scenario(tokens, None)
    }

    fn with_scenario(tokens: Result<String, TokenError>, scenario: Option<TestConfig>) -> Self {
        let runtime = Runtime::new().unwrap();
        let session = SimulatedSession::new();
        let controller = CallController::new(
            Arc::new(FixedTokens(tokens)),
            Arc::new(session.clone()),
            runtime.handle().clone(),
        );
        let app = HelpdeskApp::with_theme(controller, Theme::dark(), Some(session.clone()), scenario);
        Self {
            _runtime: runtime,
            session,
            app,
        }
    }
}

fn harness(app: TestApp) -> Harness<'static, TestApp> {
    Harness::builder()
        .with_size(egui::Vec2::new(520.0, 420.0))
        .build_state(|ctx, app: &mut TestApp| app.app.show(ctx), app)
}

/// Run frames until `done` holds or the deadline passes
fn run_until(harness: &mut Harness<'static, TestApp>, done: impl Fn(&TestApp) -> bool) {
    let deadline = Instant::now() + Duration::from_secs(3);
    while !done(harness.state()) && Instant::now() < deadline {
        harness.run();
        std::thread::sleep(Duration::from_millis(10));
    }
}

/// Test that the idle window shows the title, button and status
#[test]
fn test_idle_window_renders() {
    let mut harness = harness(TestApp::new(Ok("abc".to_string())));
    harness.run();

    let _title = harness.get_by_label(APP_TITLE);
    let _button = harness.get_by_label(IDLE_LABEL);
    let _status = harness.get_by_label(IDLE_STATUS);
    assert_eq!(harness.state().app.controller().state(), CallState::Idle);
}

/// Test that clicking the button starts a call
#[test]
fn test_click_starts_call() {
    let mut harness = harness(TestApp::new(Ok("abc".to_string())));
    harness.run();

    harness.get_by_label(IDLE_LABEL).click();
    harness.run();

    assert_eq!(harness.state().app.controller().state(), CallState::Active);

    run_until(&mut harness, |t| t.session.is_active());
    assert!(harness.state().session.is_active());

    let _button = harness.get_by_label(ACTIVE_LABEL);
    let _status = harness.get_by_label(ACTIVE_STATUS);
}

/// Test that clicking again stops the call
#[test]
fn test_second_click_stops_call() {
    let mut harness = harness(TestApp::new(Ok("abc".to_string())));
    harness.run();

    harness.get_by_label(IDLE_LABEL).click();
    harness.run();
    run_until(&mut harness, |t| t.session.is_active());

    harness.get_by_label(ACTIVE_LABEL).click();
    harness.run();

    assert_eq!(harness.state().app.controller().state(), CallState::Idle);
    assert!(!harness.state().session.is_active());
    let _button = harness.get_by_label(IDLE_LABEL);
}

/// Test that a failed token request puts the window back to idle
#[test]
fn test_token_failure_returns_to_idle() {
    let mut harness = harness(TestApp::new(Err(TokenError::Status { status: 500 })));
    harness.run();

    harness.get_by_label(IDLE_LABEL).click();
    harness.run();

    run_until(&mut harness, |t| t.app.controller().last_failure().is_some());
    harness.run();

    assert_eq!(harness.state().app.controller().state(), CallState::Idle);
    assert!(!harness.state().session.is_active());
    let _status = harness.get_by_label(IDLE_STATUS);
}

/// Test that a remote hang-up resets the window
#[test]
fn test_remote_hang_up_resets_window() {
    let mut harness = harness(TestApp::new(Ok("abc".to_string())));
    harness.run();

    harness.get_by_label(IDLE_LABEL).click();
    harness.run();
    run_until(&mut harness, |t| t.session.is_active());

    harness.state().session.hang_up();
    harness.run();

    assert_eq!(harness.state().app.controller().state(), CallState::Idle);
    let _button = harness.get_by_label(IDLE_LABEL);
}

/// Test that a scripted scenario runs to completion with a passing result
#[test]
fn test_scripted_scenario_passes() {
    let scenario = TestConfig::parse(
        r#"
        [test]
        name = "Call, remote hang-up"

        [[actions]]
        time_ms = 0
        action = { type = "click_call" }
        assert = { type = "is_active" }

        [[actions]]
        time_ms = 200
        action = { type = "end_call" }
        assert = { type = "status_text", text = "Click to speak with an IT Technician" }

        [[actions]]
        time_ms = 250
        action = { type = "exit", code = 0 }
        "#,
    )
    .unwrap();

    let mut harness = harness(TestApp::with_scenario(Ok("abc".to_string()), Some(scenario)));
    run_until(&mut harness, |t| t.app.finished().is_some());

    assert_eq!(harness.state().app.finished(), Some(0));
}

/// Test that a failing assertion turns the exit code into a failure
#[test]
fn test_scripted_scenario_failure_sets_exit_code() {
    let scenario = TestConfig::parse(
        r#"
        [test]
        name = "Wrong expectation"

        [[actions]]
        time_ms = 0
        action = { type = "log", message = "no call placed" }
        assert = { type = "is_active" }

        [[actions]]
        time_ms = 50
        action = { type = "exit", code = 0 }
        "#,
    )
    .unwrap();

    let mut harness = harness(TestApp::with_scenario(Ok("abc".to_string()), Some(scenario)));
    run_until(&mut harness, |t| t.app.finished().is_some());

    assert_eq!(harness.state().app.finished(), Some(1));
}

/// Test the card component on its own for both states
#[test]
fn test_call_card_labels_follow_state() {
    for state in [CallState::Idle, CallState::Active] {
        let theme = Theme::dark();
        let mut harness = Harness::builder()
            .with_size(egui::Vec2::new(400.0, 200.0))
            .build_state(
                move |ctx, clicks: &mut usize| {
                    egui::CentralPanel::default().show(ctx, |ui| {
                        if CallCard::new(state, &theme).show(ui).clicked() {
                            *clicks += 1;
                        }
                    });
                },
                0usize,
            );
        harness.run();

        harness.get_by_label(state.button_label()).click();
        harness.run();

        let _status = harness.get_by_label(state.status_text());
        assert_eq!(*harness.state(), 1);
    }
}
