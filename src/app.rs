use crate::coach::{SessionController, View};
use crate::event::AppEvent;
use crate::plan::phase_progress;
use crate::theme::Theme;
use crate::ui::settings::SettingsDraft;
use crate::ui::{self, UiAction};
use chrono::Local;
use eframe::egui::{self, RichText, ScrollArea};
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, TryRecvError};
use tracing::{info, warn};

pub struct CoachApp {
    rx: Receiver<AppEvent>,
    controller: SessionController,
    theme: Theme,
    show_help: bool,
    settings: SettingsDraft,
    command_buffer: String,
    store_path: PathBuf,
    visuals_applied: bool,
}

impl CoachApp {
    pub fn new(
        rx: Receiver<AppEvent>,
        controller: SessionController,
        store_path: PathBuf,
        warnings: Vec<String>,
    ) -> Self {
        let mut app = Self {
            rx,
            controller,
            theme: Theme::default(),
            show_help: false,
            settings: SettingsDraft::default(),
            command_buffer: String::new(),
            store_path,
            visuals_applied: false,
        };

        for warning in warnings {
            warn!("{warning}");
            app.controller.log_diagnostic(warning);
        }

        app
    }

    fn drain_events(&mut self) {
        loop {
            match self.rx.try_recv() {
                Ok(event) => self.apply_event(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.controller.log_diagnostic("event channel disconnected");
                    break;
                }
            }
        }
    }

    fn apply_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Tick => self.controller.tick(),
            AppEvent::Utterance(text) => {
                self.controller.dispatch_utterance(&text);
            }
            AppEvent::RecognizerEnded => self.controller.on_recognizer_ended(),
            AppEvent::RecognizerRetry => self.controller.on_recognizer_retry(),
            AppEvent::RecognizerError(message) => self.controller.on_recognizer_error(&message),
            AppEvent::CommentaryReady { request_id, result } => {
                self.controller.apply_commentary(request_id, result)
            }
        }
    }

    fn apply_action(&mut self, action: UiAction) {
        match action {
            UiAction::StartSession => self.controller.start_session(),
            UiAction::RequestNext => self.controller.request_next(),
            UiAction::SelectExercise(index) => self.controller.select_exercise(index),
            UiAction::ToggleTimer => self.controller.toggle_timer(),
            UiAction::FinishExercise => self.controller.finish_exercise(),
            UiAction::ShowView(view) => self.controller.show_view(view),
            UiAction::ToggleListening => self.controller.toggle_listening(),
            UiAction::ToggleHelp => self.show_help = !self.show_help,
            UiAction::OpenVideo(url) => {
                if let Err(err) = open::that(&url) {
                    warn!(url = %url, error = %err, "failed to open video link");
                    self.controller
                        .log_diagnostic(format!("failed to open {url}: {err}"));
                }
            }
            UiAction::SaveApiKey => {
                let api_key = self.settings.api_key.trim().to_string();
                self.save_api_key(&api_key);
            }
            UiAction::ClearApiKey => self.save_api_key(""),
            UiAction::SubmitUtterance(text) => {
                if self.controller.dispatch_utterance(&text).is_none() {
                    self.controller
                        .log_diagnostic(format!("no voice command in \"{text}\""));
                }
            }
        }
    }

    fn save_api_key(&mut self, api_key: &str) {
        match self.controller.set_api_key(api_key) {
            Ok(()) => {
                self.settings.api_key.clear();
                self.settings.status = Some(if api_key.is_empty() {
                    "Schlüssel entfernt.".to_string()
                } else {
                    "Gespeichert.".to_string()
                });
                info!("api key updated");
            }
            Err(err) => {
                self.settings.status = Some(format!("Speichern fehlgeschlagen: {err}"));
                self.controller
                    .log_diagnostic(format!("failed to persist api key: {err}"));
            }
        }
    }

    fn render_top_bar(&mut self, ctx: &egui::Context, actions: &mut Vec<UiAction>) {
        let frame = self.theme.panel_frame(self.theme.surface_1, self.theme.spacing_12 as i8);
        egui::TopBottomPanel::top("top_bar")
            .frame(frame)
            .show(ctx, |ui| {
                ui::top_bar::render(ui, &self.theme, &self.controller, self.show_help, actions);
            });
    }

    fn render_bottom_panel(&mut self, ctx: &egui::Context, actions: &mut Vec<UiAction>) {
        egui::TopBottomPanel::bottom("command_panel").show(ctx, |ui| {
            egui::CollapsingHeader::new("Diagnose")
                .default_open(false)
                .show(ui, |ui| {
                    ScrollArea::vertical()
                        .id_salt("diagnostics_log")
                        .max_height(90.0)
                        .stick_to_bottom(true)
                        .show(ui, |ui| {
                            for entry in self.controller.diagnostics() {
                                ui.label(RichText::new(entry).small().monospace());
                            }
                        });
                });

            let mut submit = false;
            ui.horizontal(|ui| {
                let response = ui.add(
                    egui::TextEdit::singleline(&mut self.command_buffer)
                        .desired_width(ui.available_width() - 90.0)
                        .hint_text("Befehl tippen, z.B. \"weiter\""),
                );
                if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    submit = true;
                }
                submit |= ui
                    .add_enabled(
                        !self.command_buffer.trim().is_empty(),
                        egui::Button::new("Senden"),
                    )
                    .clicked();
            });

            if submit {
                let text = self.command_buffer.trim().to_string();
                self.command_buffer.clear();
                if !text.is_empty() {
                    actions.push(UiAction::SubmitUtterance(text));
                }
            }
        });
    }

    fn render_center_panel(&mut self, ctx: &egui::Context, actions: &mut Vec<UiAction>) {
        let frame = self.theme.panel_frame(self.theme.surface_0, self.theme.spacing_24 as i8);
        egui::CentralPanel::default().frame(frame).show(ctx, |ui| {
            if !self.controller.session_started() {
                let progress = phase_progress(self.controller.phase(), Local::now());
                let welcome = self.controller.welcome_message();
                ui::start::render(ui, &self.theme, self.controller.phase(), progress, &welcome, actions);
                return;
            }

            match self.controller.view() {
                View::Home => ui::home::render(ui, &self.theme, &self.controller, actions),
                View::Log => ui::log::render(ui, &self.theme, &self.controller.progress().logs),
                View::Settings => ui::settings::render(
                    ui,
                    &self.theme,
                    &mut self.settings,
                    self.controller.commentary_configured(),
                    &self.store_path,
                    actions,
                ),
            }
        });
    }
}

impl eframe::App for CoachApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.visuals_applied {
            self.theme.apply_visuals(ctx);
            self.visuals_applied = true;
        }

        self.drain_events();

        let mut actions = Vec::new();
        if self.controller.session_started() {
            self.render_top_bar(ctx, &mut actions);
            self.render_bottom_panel(ctx, &mut actions);
        }
        self.render_center_panel(ctx, &mut actions);
        if self.show_help {
            ui::help::render(ctx, &self.theme, &mut actions);
        }

        for action in actions {
            self.apply_action(action);
        }
    }
}
