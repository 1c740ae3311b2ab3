use crate::plan::{Phase, PhaseProgress};
use crate::theme::Theme;
use crate::ui::UiAction;
use eframe::egui::{self, RichText};

pub fn render(
    ui: &mut egui::Ui,
    theme: &Theme,
    phase: &Phase,
    progress: PhaseProgress,
    welcome: &str,
    actions: &mut Vec<UiAction>,
) {
    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() * 0.2);
        ui.label(
            RichText::new("Calisthenics Coach")
                .size(34.0)
                .strong()
                .color(theme.text_primary),
        );
        ui.add_space(theme.spacing_8);
        ui.label(theme.badge(&phase.name, theme.accent_primary));
        ui.label(
            RichText::new(format!(
                "Woche {} von {}",
                progress.current_week, progress.total_weeks
            ))
            .color(theme.text_muted),
        );
        ui.add_space(theme.spacing_16);
        ui.label(RichText::new(welcome).color(theme.text_primary).size(16.0));
        ui.add_space(theme.spacing_24);

        if ui
            .add(theme.primary_button("Heutiges Training starten").min_size(egui::vec2(260.0, 52.0)))
            .clicked()
        {
            actions.push(UiAction::StartSession);
        }
    });
}
