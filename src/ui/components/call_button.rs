//! Call button component
//!
//! The button and the status line under it. Both are derived from the
//! [`CallState`] alone; clicks are returned to the caller, which owns the
//! controller.

use crate::call::{ButtonStyle, CallState};
use crate::ui::theme::Theme;
use egui::{Color32, RichText};

/// Button that starts or stops the helpdesk call
pub struct CallButton<'a> {
    state: CallState,
    theme: &'a Theme,
}

impl<'a> CallButton<'a> {
    /// Create a call button for the given state
    pub fn new(state: CallState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    /// Fill color for the current style
    pub fn fill(&self) -> Color32 {
        match self.state.button_style() {
            ButtonStyle::Idle => self.theme.primary,
            ButtonStyle::Active => self.theme.active,
        }
    }

    /// Show the button and return its response
    pub fn show(self, ui: &mut egui::Ui) -> egui::Response {
        let label = self.state.button_label();
        let button = egui::Button::new(
            RichText::new(label)
                .size(18.0)
                .strong()
                .color(Color32::WHITE),
        )
        .fill(self.fill())
        .rounding(self.theme.button_rounding)
        .min_size(egui::vec2(260.0, 52.0));

        let response = ui.add(button);
        response.widget_info(|| egui::WidgetInfo::labeled(egui::WidgetType::Button, true, label));

        let hint = match self.state {
            CallState::Idle => "Click or press Space to call the helpdesk",
            CallState::Active => "Click or press Space to hang up",
        };
        response.on_hover_text(hint)
    }
}

/// Status line shown under the call button
pub struct CallStatus<'a> {
    state: CallState,
    theme: &'a Theme,
}

impl<'a> CallStatus<'a> {
    /// Create a status line for the given state
    pub fn new(state: CallState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    /// Show the status text
    pub fn show(self, ui: &mut egui::Ui) -> egui::Response {
        let color = match self.state.button_style() {
            ButtonStyle::Idle => self.theme.text_muted,
            ButtonStyle::Active => self.theme.active,
        };
        ui.label(RichText::new(self.state.status_text()).size(14.0).color(color))
    }
}

/// Button and status line stacked and centered
pub struct CallCard<'a> {
    state: CallState,
    theme: &'a Theme,
}

impl<'a> CallCard<'a> {
    /// Create a call card
    pub fn new(state: CallState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    /// Show the card and return the button's response
    pub fn show(self, ui: &mut egui::Ui) -> egui::Response {
        egui::Frame::none()
            .fill(self.theme.bg_card)
            .rounding(self.theme.card_rounding)
            .inner_margin(self.theme.spacing_lg)
            .show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    let response = CallButton::new(self.state, self.theme).show(ui);
                    ui.add_space(self.theme.spacing);
                    CallStatus::new(self.state, self.theme).show(ui);
                    response
                })
                .inner
            })
            .inner
    }
}
