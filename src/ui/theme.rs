//! Theme and styling for the helpdesk call window

use egui::{Color32, FontFamily, FontId, Rounding, Stroke, Vec2, Visuals};

/// Application theme configuration
#[derive(Clone, Debug)]
pub struct Theme {
    /// Idle call button color
    pub primary: Color32,
    /// Active call button and status color
    pub active: Color32,

    /// Background colors
    pub bg_primary: Color32,
    pub bg_card: Color32,
    pub bg_tertiary: Color32,

    /// Text colors
    pub text_primary: Color32,
    pub text_muted: Color32,

    /// Border radius for buttons
    pub button_rounding: Rounding,
    /// Border radius for the card
    pub card_rounding: Rounding,

    /// Standard spacing
    pub spacing: f32,
    /// Large spacing
    pub spacing_lg: f32,
    /// Small spacing
    pub spacing_sm: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Create a dark theme
    pub fn dark() -> Self {
        Self {
            primary: Color32::from_rgb(37, 99, 235), // Blue
            active: Color32::from_rgb(220, 38, 38),  // Red

            bg_primary: Color32::from_rgb(17, 24, 39),
            bg_card: Color32::from_rgb(31, 41, 55),
            bg_tertiary: Color32::from_rgb(55, 65, 81),

            text_primary: Color32::from_rgb(249, 250, 251),
            text_muted: Color32::from_rgb(156, 163, 175),

            button_rounding: Rounding::same(24.0),
            card_rounding: Rounding::same(12.0),

            spacing: 16.0,
            spacing_lg: 32.0,
            spacing_sm: 8.0,
        }
    }

    /// Apply this theme to egui
    pub fn apply(&self, ctx: &egui::Context) {
        let mut visuals = Visuals::dark();

        visuals.panel_fill = self.bg_primary;
        visuals.window_fill = self.bg_card;
        visuals.extreme_bg_color = self.bg_tertiary;

        visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, self.text_muted);
        visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, self.text_primary);
        visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, self.text_primary);
        visuals.widgets.active.fg_stroke = Stroke::new(1.0, self.text_primary);

        visuals.window_rounding = self.card_rounding;

        ctx.set_visuals(visuals);

        let mut style = (*ctx.style()).clone();
        style.spacing.item_spacing = Vec2::splat(self.spacing_sm);
        style.spacing.button_padding = Vec2::new(self.spacing_lg, self.spacing);

        style.text_styles.insert(
            egui::TextStyle::Heading,
            FontId::new(28.0, FontFamily::Proportional),
        );
        style.text_styles.insert(
            egui::TextStyle::Button,
            FontId::new(18.0, FontFamily::Proportional),
        );

        ctx.set_style(style);
    }
}
