use crate::coach::command::cheat_sheet;
use crate::theme::Theme;
use crate::ui::UiAction;
use eframe::egui::{self, RichText};

/// Voice command cheat sheet, shown as a floating window.
pub fn render(ctx: &egui::Context, theme: &Theme, actions: &mut Vec<UiAction>) {
    let mut open = true;
    egui::Window::new("Sprachbefehle")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-theme.spacing_16, 56.0))
        .open(&mut open)
        .show(ctx, |ui| {
            egui::Grid::new("cheat_sheet")
                .num_columns(2)
                .spacing(egui::vec2(theme.spacing_16, theme.spacing_8))
                .show(ui, |ui| {
                    for (phrase, effect) in cheat_sheet() {
                        ui.label(RichText::new(*phrase).strong().color(theme.accent_primary));
                        ui.label(RichText::new(*effect).color(theme.text_muted));
                        ui.end_row();
                    }
                });
        });
    if !open {
        actions.push(UiAction::ToggleHelp);
    }
}
