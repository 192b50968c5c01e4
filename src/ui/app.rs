//! Main application struct and eframe integration

use crate::call::{CallController, SimulatedSession};
use crate::testconfig::{AssertionContext, AssertionResult, TestCommand, TestConfig, TestRunner};
use crate::ui::components::CallCard;
use crate::ui::theme::Theme;
use egui::{CentralPanel, RichText};
use std::time::Duration;
use tracing::{info, warn};

/// Window title and heading
pub const APP_TITLE: &str = "IT Helpdesk Voice AI";

/// Main helpdesk call application
pub struct HelpdeskApp {
    /// Whether the app has been initialized
    initialized: bool,
    /// Call state machine
    controller: CallController,
    /// UI theme
    theme: Theme,
    /// Simulated session handle, used by scenarios to inject remote events
    simulated: Option<SimulatedSession>,
    /// Scenario runner (if running a scripted scenario)
    test_runner: Option<TestRunner>,
    /// Exit code requested by the scenario
    pending_exit: Option<i32>,
    /// Final exit code once the scenario completed
    finished: Option<i32>,
}

impl HelpdeskApp {
    /// Create the application from the eframe creation context
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        controller: CallController,
        simulated: Option<SimulatedSession>,
        test_config: Option<TestConfig>,
    ) -> Self {
        let theme = Theme::dark();
        theme.apply(&cc.egui_ctx);
        Self::with_theme(controller, theme, simulated, test_config)
    }

    /// Create the application without an eframe context
    pub fn with_theme(
        controller: CallController,
        theme: Theme,
        simulated: Option<SimulatedSession>,
        test_config: Option<TestConfig>,
    ) -> Self {
        Self {
            initialized: false,
            controller,
            theme,
            simulated,
            test_runner: test_config.map(TestRunner::new),
            pending_exit: None,
            finished: None,
        }
    }

    /// The call controller
    pub fn controller(&self) -> &CallController {
        &self.controller
    }

    /// Exit code of a completed scenario
    pub fn finished(&self) -> Option<i32> {
        self.finished
    }

    fn initialize(&mut self) {
        if self.initialized {
            return;
        }
        self.initialized = true;

        if let Some(ref mut runner) = self.test_runner {
            runner.start();
        }

        info!("Helpdesk call UI initialized");
    }

    /// Process scenario commands that are due
    fn process_test_commands(&mut self) {
        let mut pending_commands = Vec::new();
        if let Some(ref mut runner) = self.test_runner {
            while let Some(cmd) = runner.poll() {
                pending_commands.push(cmd);
            }
        }

        for (command, assertion) in pending_commands {
            match command {
                TestCommand::ClickCall => {
                    info!("[TEST] Executing: ClickCall");
                    self.controller.on_toggle();
                }
                TestCommand::EndCall => {
                    info!("[TEST] Executing: EndCall");
                    match &self.simulated {
                        Some(session) => session.hang_up(),
                        None => warn!("[TEST] EndCall needs the simulated session, skipping"),
                    }
                }
                TestCommand::SessionError(message) => {
                    info!("[TEST] Executing: SessionError");
                    match &self.simulated {
                        Some(session) => session.report_error(message),
                        None => warn!("[TEST] SessionError needs the simulated session, skipping"),
                    }
                }
                TestCommand::Log(message) => info!("[TEST] Log: {}", message),
                TestCommand::Exit { code } => {
                    info!("[TEST] Executing: Exit with code {}", code);
                    self.pending_exit = Some(code);
                }
            }

            // Remote events arrive through the controller's channel
            self.controller.poll_events();

            if let Some(ref assertion) = assertion {
                let state = self.controller.state();
                let context = AssertionContext {
                    is_active: state.is_active(),
                    status_text: state.status_text(),
                    last_failure: self.controller.last_failure(),
                };

                if let Some(ref mut runner) = self.test_runner {
                    let result = runner.check_assertion(assertion, &context);
                    if matches!(result, AssertionResult::Failed(_)) && self.pending_exit == Some(0) {
                        self.pending_exit = Some(1);
                    }
                }
            }
        }

        if let Some(ref runner) = self.test_runner {
            if runner.is_completed() && self.finished.is_none() {
                if let Some(code) = self.pending_exit.take() {
                    info!("{}", runner.summary());
                    let final_code = if runner.test_passed() { code } else { 1 };
                    info!("[TEST] Exiting with code {}", final_code);
                    self.finished = Some(final_code);
                }
            }
        }
    }

    /// Poll events, run the scenario and render one frame
    pub fn show(&mut self, ctx: &egui::Context) {
        self.initialize();
        self.controller.poll_events();
        self.process_test_commands();

        let state = self.controller.state();

        CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(60.0);

                ui.label(
                    RichText::new(APP_TITLE)
                        .size(32.0)
                        .strong()
                        .color(self.theme.text_primary),
                );

                ui.add_space(self.theme.spacing_lg);

                let response = CallCard::new(state, &self.theme).show(ui);
                if response.clicked() {
                    self.controller.on_toggle();
                }

                // Space toggles unless a widget has focus
                let space_pressed = ui.input(|i| i.key_pressed(egui::Key::Space));
                let any_widget_focused = ui.memory(|m| m.focused().is_some());
                if space_pressed && !any_widget_focused {
                    self.controller.on_toggle();
                }
            });
        });

        // Keep polling while something can still change the state
        if self.test_runner.is_some() {
            ctx.request_repaint();
        } else if self.controller.is_active() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}

impl eframe::App for HelpdeskApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.show(ctx);

        if let Some(code) = self.finished {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            std::process::exit(code);
        }
    }
}
