mod app;
mod coach;
mod commentary;
mod config;
mod error;
mod event;
mod plan;
mod session;
mod theme;
mod ui;
mod voice;

use anyhow::Context as _;
use app::CoachApp;
use coach::{IntervalTicker, Services, SessionController, SystemClock, ThreadCueRng};
use commentary::SpawnedCommentary;
use config::CoachConfig;
use eframe::egui;
use event::EventSender;
use session::store::ProgressStore;
use std::sync::mpsc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use voice::{
    CommandNarrator, CommandRecognizer, Narrator, Recognizer, SilentNarrator, UnavailableRecognizer,
};

const TICK_PERIOD: Duration = Duration::from_secs(1);

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("coach=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(warnings: &mut Vec<String>) -> CoachConfig {
    let mut config = match CoachConfig::config_path() {
        Some(path) => CoachConfig::load_from(&path).unwrap_or_else(|err| {
            warnings.push(format!("{err}; using default settings"));
            CoachConfig::default()
        }),
        None => CoachConfig::default(),
    };
    config.apply_env(|key| std::env::var(key).ok());
    config
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let mut warnings = Vec::new();
    let config = load_config(&mut warnings);
    let data_dir = config.data_dir();
    info!(data_dir = %data_dir.display(), locale = %config.voice.locale, "starting coach");

    let (tx, rx) = mpsc::channel();
    let events = EventSender::new(tx);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("coach-runtime")
        .build()
        .context("failed to build tokio runtime")?;

    let (store, store_warnings) = ProgressStore::open(&data_dir);
    warnings.extend(store_warnings);
    let (progress, progress_warnings) = store.load_progress();
    warnings.extend(progress_warnings);
    let store_path = store.path().to_path_buf();

    let mut api_key = store.api_key();
    if api_key.trim().is_empty() {
        if let Some(env_key) = config.env_api_key.clone() {
            info!("using commentary key from environment");
            api_key = env_key;
        }
    }

    let phase = plan::current_phase(chrono::Utc::now(), plan::catalog()).clone();
    let phase_progress = plan::phase_progress(&phase, chrono::Local::now());
    info!(
        phase = phase.id,
        week = phase_progress.current_week,
        total_weeks = phase_progress.total_weeks,
        streak = progress.streak,
        "plan resolved"
    );

    let narrator: Box<dyn Narrator> = if config.voice.narrator_command.trim().is_empty() {
        warn!("no text-to-speech command configured, narration disabled");
        Box::new(SilentNarrator)
    } else {
        Box::new(CommandNarrator::new(runtime.handle().clone(), &config.voice))
    };
    let recognizer: Box<dyn Recognizer> = if config.voice.recognizer_command.trim().is_empty() {
        info!("no speech recognizer configured, voice commands disabled");
        Box::new(UnavailableRecognizer)
    } else {
        Box::new(CommandRecognizer::new(
            runtime.handle().clone(),
            events.clone(),
            &config.voice,
        ))
    };
    info!(
        timeout_secs = config.commentary_timeout().as_secs(),
        model = %config.commentary.model,
        "commentary provider configured"
    );

    let services = Services {
        narrator,
        recognizer,
        ticker: Box::new(IntervalTicker::new(
            runtime.handle().clone(),
            events.clone(),
            TICK_PERIOD,
        )),
        commentary: Box::new(SpawnedCommentary::new(
            runtime.handle().clone(),
            events.clone(),
            config.commentary.clone(),
            &api_key,
        )),
        sink: Box::new(store),
        clock: Box::new(SystemClock),
        rng: Box::new(ThreadCueRng),
    };
    let controller =
        SessionController::new(phase, progress, services, config.voice.recognizer_retry());
    let app = CoachApp::new(rx, controller, store_path, warnings);
    let _runtime = runtime;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Calisthenics Coach")
            .with_inner_size([480.0, 860.0])
            .with_min_inner_size([380.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Calisthenics Coach",
        native_options,
        Box::new(move |creation_context| {
            events.attach_context(creation_context.egui_ctx.clone());
            Ok(Box::new(app))
        }),
    )
    .map_err(|err| anyhow::anyhow!("failed to run window: {err}"))?;

    Ok(())
}
