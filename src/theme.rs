use eframe::egui::{self, Color32, CornerRadius, FontId, Frame, Margin, Stroke, TextStyle};

/// Terminal-style palette for the chat window.
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color32,
    pub surface: Color32,
    pub surface_raised: Color32,
    pub accent: Color32,
    pub prompt: Color32,
    pub success: Color32,
    pub warning: Color32,
    pub danger: Color32,
    pub text_primary: Color32,
    pub text_muted: Color32,
    pub thought: Color32,
    pub inline_code_bg: Color32,
    pub diff_added_tint: Color32,
    pub diff_removed_tint: Color32,
    pub status_new: Color32,
    pub status_updated: Color32,
    pub spacing_4: f32,
    pub spacing_8: f32,
    pub spacing_12: f32,
    pub radius_6: u8,
    pub radius_10: u8,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color32::from_rgb(0x0B, 0x0D, 0x10),
            surface: Color32::from_rgb(0x13, 0x16, 0x1B),
            surface_raised: Color32::from_rgb(0x1B, 0x20, 0x27),
            accent: Color32::from_rgb(0x7C, 0xC4, 0xFA),
            prompt: Color32::from_rgb(0x4A, 0xDE, 0x80),
            success: Color32::from_rgb(0x22, 0xC5, 0x5E),
            warning: Color32::from_rgb(0xF5, 0x9E, 0x0B),
            danger: Color32::from_rgb(0xEF, 0x44, 0x44),
            text_primary: Color32::from_rgb(0xE4, 0xE7, 0xEB),
            text_muted: Color32::from_rgb(0x8B, 0x94, 0x9E),
            thought: Color32::from_rgb(0xA5, 0xB4, 0xC4),
            inline_code_bg: Color32::from_rgb(0x24, 0x2A, 0x33),
            diff_added_tint: Color32::from_rgba_premultiplied(34, 197, 94, 38),
            diff_removed_tint: Color32::from_rgba_premultiplied(239, 68, 68, 38),
            status_new: Color32::from_rgb(0x22, 0xC5, 0x5E),
            status_updated: Color32::from_rgb(0x3B, 0x82, 0xF6),
            spacing_4: 4.0,
            spacing_8: 8.0,
            spacing_12: 12.0,
            radius_6: 6,
            radius_10: 10,
        }
    }
}

impl Theme {
    pub fn apply_visuals(&self, ctx: &egui::Context) {
        let mut visuals = egui::Visuals::dark();
        visuals.panel_fill = self.background;
        visuals.window_fill = self.surface;
        visuals.extreme_bg_color = self.surface_raised;
        visuals.override_text_color = Some(self.text_primary);
        visuals.hyperlink_color = self.accent;
        visuals.selection.bg_fill = self.status_updated;
        visuals.window_stroke = Stroke::new(1.0, self.surface_raised);
        visuals.window_corner_radius = CornerRadius::same(self.radius_10);
        visuals.widgets.inactive.bg_fill = self.surface_raised;
        visuals.widgets.inactive.bg_stroke = Stroke::NONE;
        visuals.widgets.hovered.bg_stroke = Stroke::NONE;
        visuals.widgets.active.bg_stroke = Stroke::NONE;

        let mut style = (*ctx.style()).clone();
        style.visuals = visuals;
        style.spacing.item_spacing = egui::vec2(8.0, 6.0);
        style.spacing.button_padding = egui::vec2(10.0, 6.0);
        style.text_styles.insert(TextStyle::Heading, FontId::monospace(18.0));
        style.text_styles.insert(TextStyle::Body, FontId::monospace(14.0));
        style.text_styles.insert(TextStyle::Button, FontId::monospace(14.0));
        style.text_styles.insert(TextStyle::Monospace, FontId::monospace(13.0));
        style.text_styles.insert(TextStyle::Small, FontId::monospace(12.0));
        ctx.set_style(style);
    }

    pub fn card_frame(&self) -> Frame {
        Frame::new()
            .fill(self.surface)
            .inner_margin(Margin::same(self.spacing_12 as i8))
            .corner_radius(CornerRadius::same(self.radius_10))
            .stroke(Stroke::new(1.0, self.surface_raised))
    }

    pub fn code_frame(&self) -> Frame {
        Frame::new()
            .fill(self.surface_raised)
            .inner_margin(Margin::same(self.spacing_8 as i8))
            .corner_radius(CornerRadius::same(self.radius_6))
    }

    pub fn composer_frame(&self) -> Frame {
        Frame::new()
            .fill(self.surface)
            .inner_margin(Margin::symmetric(self.spacing_12 as i8, 8))
            .corner_radius(CornerRadius::same(self.radius_10))
            .stroke(Stroke::NONE)
    }

    pub fn status_color(&self, is_new: bool) -> Color32 {
        if is_new {
            self.status_new
        } else {
            self.status_updated
        }
    }
}
