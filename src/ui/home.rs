use crate::coach::narration::format_time;
use crate::coach::{SessionController, SessionPhase};
use crate::plan::Exercise;
use crate::theme::Theme;
use crate::ui::UiAction;
use eframe::egui::{self, RichText};

pub fn render(
    ui: &mut egui::Ui,
    theme: &Theme,
    controller: &SessionController,
    actions: &mut Vec<UiAction>,
) {
    coach_card(ui, theme, controller, actions);
    ui.add_space(theme.spacing_12);

    match controller.active_exercise() {
        Some(exercise) => active_card(ui, theme, controller, exercise, actions),
        None => exercise_list(ui, theme, controller, actions),
    }
}

fn coach_card(
    ui: &mut egui::Ui,
    theme: &Theme,
    controller: &SessionController,
    actions: &mut Vec<UiAction>,
) {
    theme.card_frame().show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.label(theme.badge("COACH", theme.accent_primary));
        ui.add_space(theme.spacing_4);
        let color = if controller.state() == SessionPhase::Briefing {
            theme.text_muted
        } else {
            theme.text_primary
        };
        ui.label(RichText::new(controller.coach_message()).size(17.0).color(color));

        if controller.state() == SessionPhase::Idle {
            ui.add_space(theme.spacing_8);
            if ui.add(theme.primary_button("Nächste Übung vorschlagen")).clicked() {
                actions.push(UiAction::RequestNext);
            }
        }
    });
}

fn active_card(
    ui: &mut egui::Ui,
    theme: &Theme,
    controller: &SessionController,
    exercise: &Exercise,
    actions: &mut Vec<UiAction>,
) {
    theme.highlight_frame().show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.vertical_centered(|ui| {
            ui.label(RichText::new(&exercise.name).heading().strong());
            ui.label(RichText::new(&exercise.description).color(theme.text_muted));
            ui.label(theme.badge(&exercise.target, theme.accent_primary));
            ui.add_space(theme.spacing_8);

            let countdown_color = if controller.is_running() {
                theme.success
            } else {
                theme.text_primary
            };
            ui.label(
                RichText::new(format_time(controller.remaining_secs()))
                    .text_style(Theme::countdown_style())
                    .color(countdown_color),
            );
            ui.add_space(theme.spacing_8);

            ui.horizontal(|ui| {
                let toggle_label = if controller.is_running() {
                    "⏸ Pause"
                } else {
                    "▶ Start"
                };
                if ui
                    .add_enabled(
                        controller.remaining_secs() > 0,
                        theme.primary_button(toggle_label).min_size(egui::vec2(140.0, 48.0)),
                    )
                    .clicked()
                {
                    actions.push(UiAction::ToggleTimer);
                }
                if ui
                    .add(theme.subtle_button("✔ Fertig").min_size(egui::vec2(140.0, 48.0)))
                    .clicked()
                {
                    actions.push(UiAction::FinishExercise);
                }
            });
        });
    });
}

fn exercise_list(
    ui: &mut egui::Ui,
    theme: &Theme,
    controller: &SessionController,
    actions: &mut Vec<UiAction>,
) {
    let recommended = controller.recommended_index();
    ui.label(
        RichText::new(format!("Übungen · {}", controller.phase().name))
            .strong()
            .color(theme.text_muted),
    );

    egui::ScrollArea::vertical()
        .id_salt("exercise_list")
        .show(ui, |ui| {
            for (index, exercise) in controller.phase().exercises.iter().enumerate() {
                let frame = if index == recommended {
                    theme.highlight_frame()
                } else {
                    theme.card_frame()
                };
                frame.show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.horizontal(|ui| {
                        ui.vertical(|ui| {
                            ui.horizontal(|ui| {
                                ui.label(RichText::new(&exercise.name).strong());
                                if index == recommended {
                                    ui.label(theme.badge("NEXT", theme.accent_primary));
                                }
                            });
                            ui.label(
                                RichText::new(format!(
                                    "{} · {} Sek.",
                                    exercise.target, exercise.duration_secs
                                ))
                                .small()
                                .color(theme.text_muted),
                            );
                            if ui.link("▶ Video ansehen").clicked() {
                                actions.push(UiAction::OpenVideo(exercise.video_url.clone()));
                            }
                        });
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.add(theme.toggle_button("▶", index == recommended)).clicked() {
                                actions.push(UiAction::SelectExercise(index));
                            }
                        });
                    });
                });
                ui.add_space(theme.spacing_4);
            }
        });
}
