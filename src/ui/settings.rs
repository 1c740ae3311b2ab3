use crate::theme::Theme;
use crate::ui::UiAction;
use eframe::egui::{self, RichText};
use std::path::Path;

/// Editable settings state owned by the app between frames.
#[derive(Debug, Default)]
pub struct SettingsDraft {
    pub api_key: String,
    pub status: Option<String>,
}

pub fn render(
    ui: &mut egui::Ui,
    theme: &Theme,
    draft: &mut SettingsDraft,
    commentary_configured: bool,
    store_path: &Path,
    actions: &mut Vec<UiAction>,
) {
    ui.heading("Einstellungen");
    ui.add_space(theme.spacing_8);

    theme.card_frame().show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.label(RichText::new("Gemini API-Schlüssel").strong());
        let (status, color) = if commentary_configured {
            ("KI-Coach aktiv", theme.success)
        } else {
            ("Kein Schlüssel: Standardansagen", theme.text_muted)
        };
        ui.label(theme.badge(status, color));
        ui.add_space(theme.spacing_4);

        let response = ui.add(
            egui::TextEdit::singleline(&mut draft.api_key)
                .password(true)
                .desired_width(f32::INFINITY)
                .hint_text("API-Schlüssel einfügen"),
        );
        let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

        ui.horizontal(|ui| {
            if ui.add(theme.primary_button("Speichern")).clicked() || submitted {
                actions.push(UiAction::SaveApiKey);
            }
            if ui
                .add_enabled(commentary_configured, theme.subtle_button("Entfernen"))
                .clicked()
            {
                actions.push(UiAction::ClearApiKey);
            }
        });

        if let Some(status) = &draft.status {
            ui.label(RichText::new(status).small().color(theme.text_muted));
        }
    });

    ui.add_space(theme.spacing_12);
    ui.label(
        RichText::new(format!("Daten: {}", store_path.display()))
            .small()
            .color(theme.text_muted),
    );
}
