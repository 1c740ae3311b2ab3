use eframe::egui::{self, Color32, CornerRadius, FontId, Frame, Margin, RichText, Stroke, TextStyle};

#[derive(Debug, Clone)]
pub struct Theme {
    pub surface_0: Color32,
    pub surface_1: Color32,
    pub surface_2: Color32,
    pub surface_3: Color32,
    pub accent_primary: Color32,
    pub accent_muted: Color32,
    pub success: Color32,
    pub warning: Color32,
    pub text_primary: Color32,
    pub text_muted: Color32,
    pub text_on_accent: Color32,
    pub border_subtle: Color32,
    pub spacing_4: f32,
    pub spacing_8: f32,
    pub spacing_12: f32,
    pub spacing_16: f32,
    pub spacing_24: f32,
    pub radius_8: u8,
    pub radius_12: u8,
    pub button_height: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            surface_0: Color32::from_rgb(0x0F, 0x17, 0x2A),
            surface_1: Color32::from_rgb(0x11, 0x18, 0x27),
            surface_2: Color32::from_rgb(0x1E, 0x29, 0x3B),
            surface_3: Color32::from_rgb(0x33, 0x41, 0x55),
            accent_primary: Color32::from_rgb(0xF9, 0x73, 0x16),
            accent_muted: Color32::from_rgb(0xC2, 0x41, 0x0C),
            success: Color32::from_rgb(0x22, 0xC5, 0x5E),
            warning: Color32::from_rgb(0xEA, 0xB3, 0x08),
            text_primary: Color32::from_rgb(0xF1, 0xF5, 0xF9),
            text_muted: Color32::from_rgb(0x94, 0xA3, 0xB8),
            text_on_accent: Color32::from_rgb(0xFF, 0xFF, 0xFF),
            border_subtle: Color32::from_rgba_premultiplied(255, 255, 255, 13),
            spacing_4: 4.0,
            spacing_8: Self::P8,
            spacing_12: 12.0,
            spacing_16: Self::P16,
            spacing_24: Self::P24,
            radius_8: Self::R8,
            radius_12: Self::R12,
            button_height: 40.0,
        }
    }
}

impl Theme {
    pub const R8: u8 = 8;
    pub const R12: u8 = 12;
    pub const P8: f32 = 8.0;
    pub const P16: f32 = 16.0;
    pub const P24: f32 = 24.0;

    pub fn countdown_style() -> TextStyle {
        TextStyle::Name("countdown".into())
    }

    pub fn apply_visuals(&self, ctx: &egui::Context) {
        let mut visuals = egui::Visuals::dark();
        visuals.panel_fill = self.surface_0;
        visuals.override_text_color = Some(self.text_primary);
        visuals.widgets.noninteractive.bg_fill = self.surface_2;
        visuals.widgets.noninteractive.weak_bg_fill = self.surface_2;
        visuals.widgets.noninteractive.bg_stroke = Stroke::NONE;
        visuals.widgets.inactive.bg_fill = self.surface_2;
        visuals.widgets.inactive.weak_bg_fill = self.surface_2;
        visuals.widgets.inactive.bg_stroke = Stroke::NONE;
        visuals.widgets.hovered.bg_fill = self.surface_3;
        visuals.widgets.hovered.weak_bg_fill = self.surface_3;
        visuals.widgets.hovered.bg_stroke = Stroke::NONE;
        visuals.widgets.active.bg_fill = self.accent_muted;
        visuals.widgets.active.bg_stroke = Stroke::NONE;
        visuals.selection.bg_fill = self.accent_muted;
        visuals.hyperlink_color = self.accent_primary;
        visuals.window_fill = self.surface_1;
        visuals.window_stroke = Stroke::new(1.0, self.border_subtle);
        visuals.window_corner_radius = CornerRadius::same(self.radius_12);

        let mut style = (*ctx.style()).clone();
        style.visuals = visuals;
        style.spacing.item_spacing = egui::vec2(10.0, 10.0);
        style.spacing.button_padding = egui::vec2(14.0, 8.0);
        style.text_styles.insert(TextStyle::Heading, FontId::proportional(22.0));
        style.text_styles.insert(TextStyle::Body, FontId::proportional(15.0));
        style.text_styles.insert(TextStyle::Button, FontId::proportional(15.0));
        style.text_styles.insert(TextStyle::Monospace, FontId::monospace(13.0));
        style.text_styles.insert(TextStyle::Small, FontId::proportional(12.0));
        style
            .text_styles
            .insert(Self::countdown_style(), FontId::monospace(72.0));
        ctx.set_style(style);
    }

    pub fn panel_frame(&self, fill: Color32, inner_padding: i8) -> Frame {
        Frame::new()
            .fill(fill)
            .inner_margin(Margin::same(inner_padding))
            .corner_radius(CornerRadius::same(self.radius_12))
            .stroke(Stroke::NONE)
    }

    pub fn card_frame(&self) -> Frame {
        self.panel_frame(self.surface_1, self.spacing_16 as i8)
            .stroke(Stroke::new(1.0, self.border_subtle))
    }

    /// Card for the exercise the coach recommends or is running.
    pub fn highlight_frame(&self) -> Frame {
        self.panel_frame(self.surface_2, self.spacing_16 as i8)
            .stroke(Stroke::new(1.5, self.accent_primary))
    }

    pub fn primary_button(&self, label: &str) -> egui::Button<'static> {
        egui::Button::new(RichText::new(label).strong().color(self.text_on_accent))
            .fill(self.accent_primary)
            .min_size(egui::vec2(0.0, self.button_height))
            .corner_radius(CornerRadius::same(self.radius_8))
    }

    pub fn subtle_button(&self, label: &str) -> egui::Button<'static> {
        egui::Button::new(RichText::new(label).color(self.text_primary))
            .fill(self.surface_2)
            .stroke(Stroke::new(1.0, self.border_subtle))
            .min_size(egui::vec2(0.0, self.button_height))
            .corner_radius(CornerRadius::same(self.radius_8))
    }

    pub fn toggle_button(&self, label: &str, active: bool) -> egui::Button<'static> {
        if active {
            self.primary_button(label)
        } else {
            self.subtle_button(label)
        }
    }

    pub fn badge(&self, text: &str, color: Color32) -> RichText {
        RichText::new(text).small().strong().color(color)
    }
}
