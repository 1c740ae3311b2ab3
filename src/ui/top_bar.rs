use crate::coach::{SessionController, View};
use crate::theme::Theme;
use crate::ui::UiAction;
use eframe::egui::{self, RichText};

pub fn render(
    ui: &mut egui::Ui,
    theme: &Theme,
    controller: &SessionController,
    show_help: bool,
    actions: &mut Vec<UiAction>,
) {
    let view = controller.view();
    ui.horizontal(|ui| {
        let title = if view == View::Log {
            "Log"
        } else {
            controller.phase().short_name()
        };
        ui.label(RichText::new(title).strong().size(18.0));
        ui.separator();
        ui.label(
            RichText::new(format!("🏆 {}", controller.progress().streak))
                .color(theme.warning)
                .strong(),
        );

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let mic_label = if controller.is_listening() {
                "🎤 Hört zu"
            } else {
                "🎤 Aus"
            };
            let mic = ui
                .add_enabled(
                    controller.voice_available(),
                    theme.toggle_button(mic_label, controller.is_listening()),
                )
                .on_disabled_hover_text("Keine Spracherkennung konfiguriert");
            if mic.clicked() {
                actions.push(UiAction::ToggleListening);
            }

            if ui
                .add(theme.toggle_button("⚙", view == View::Settings))
                .clicked()
            {
                let target = if view == View::Settings {
                    View::Home
                } else {
                    View::Settings
                };
                actions.push(UiAction::ShowView(target));
            }

            if ui.add(theme.toggle_button("📜", view == View::Log)).clicked() {
                let target = if view == View::Log { View::Home } else { View::Log };
                actions.push(UiAction::ShowView(target));
            }

            if ui.add(theme.toggle_button("?", show_help)).clicked() {
                actions.push(UiAction::ToggleHelp);
            }
        });
    });
}
