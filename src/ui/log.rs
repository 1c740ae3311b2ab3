use crate::coach::narration::format_log_timestamp;
use crate::session::LogEntry;
use crate::theme::Theme;
use eframe::egui::{self, RichText};

pub fn render(ui: &mut egui::Ui, theme: &Theme, logs: &[LogEntry]) {
    ui.heading("Verlauf");
    ui.add_space(theme.spacing_8);

    if logs.is_empty() {
        ui.label(RichText::new("Keine Einträge.").color(theme.text_muted));
        return;
    }

    egui::ScrollArea::vertical()
        .id_salt("workout_log")
        .show(ui, |ui| {
            for entry in logs {
                theme.card_frame().show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.horizontal(|ui| {
                        ui.vertical(|ui| {
                            ui.label(RichText::new(&entry.exercise_name).strong());
                            ui.label(
                                RichText::new(format_log_timestamp(entry.timestamp))
                                    .small()
                                    .color(theme.text_muted),
                            );
                        });
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            ui.label(theme.badge(&format!("{}s", entry.duration), theme.success));
                        });
                    });
                });
                ui.add_space(theme.spacing_4);
            }
        });
}
