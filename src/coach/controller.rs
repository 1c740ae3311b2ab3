use crate::coach::command::{parse_command, VoiceCommand};
use crate::coach::narration::{self, BriefingContext};
use crate::coach::selector::next_exercise_index;
use crate::coach::{Clock, CueRng, Ticker};
use crate::commentary::{CommentaryDispatch, CommentaryRequest};
use crate::error::{CommentaryError, StoreError};
use crate::plan::{Exercise, Phase};
use crate::session::store::ProgressSink;
use crate::session::{LogEntry, Progress};
use crate::voice::{Narrator, Recognizer};
use std::time::Duration;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Home,
    Log,
    Settings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Briefing,
    ActivePaused,
    ActiveRunning,
}

pub struct Services {
    pub narrator: Box<dyn Narrator>,
    pub recognizer: Box<dyn Recognizer>,
    pub ticker: Box<dyn Ticker>,
    pub commentary: Box<dyn CommentaryDispatch>,
    pub sink: Box<dyn ProgressSink>,
    pub clock: Box<dyn Clock>,
    pub rng: Box<dyn CueRng>,
}

struct PendingCommentary {
    request_id: u64,
    fallback: String,
}

/// Single owner of the interaction state and the workout history. Every
/// event is applied to completion before the next one.
pub struct SessionController {
    phase: Phase,
    progress: Progress,
    active: Option<usize>,
    remaining: u32,
    running: bool,
    listening: bool,
    retry_pending: bool,
    retry_delay: Duration,
    coach_message: String,
    view: View,
    session_started: bool,
    pending: Option<PendingCommentary>,
    next_request_id: u64,
    diagnostics: Vec<String>,
    services: Services,
}

impl SessionController {
    pub fn new(phase: Phase, progress: Progress, services: Services, retry_delay: Duration) -> Self {
        let now = services.clock.now().timestamp_millis();
        let coach_message = narration::welcome(progress.last_workout, now);
        Self {
            phase,
            progress,
            active: None,
            remaining: 0,
            running: false,
            listening: false,
            retry_pending: false,
            retry_delay,
            coach_message,
            view: View::Home,
            session_started: false,
            pending: None,
            next_request_id: 0,
            diagnostics: Vec::new(),
            services,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn active_exercise(&self) -> Option<&Exercise> {
        self.active.and_then(|index| self.phase.exercises.get(index))
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn voice_available(&self) -> bool {
        self.services.recognizer.is_available()
    }

    pub fn commentary_configured(&self) -> bool {
        self.services.commentary.is_configured()
    }

    pub fn coach_message(&self) -> &str {
        &self.coach_message
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn session_started(&self) -> bool {
        self.session_started
    }

    pub fn diagnostics(&self) -> &[String] {
        &self.diagnostics
    }

    pub fn state(&self) -> SessionPhase {
        match self.active {
            None => SessionPhase::Idle,
            Some(_) if self.pending.is_some() => SessionPhase::Briefing,
            Some(_) if self.running => SessionPhase::ActiveRunning,
            Some(_) => SessionPhase::ActivePaused,
        }
    }

    pub fn recommended_index(&self) -> usize {
        next_exercise_index(&self.progress.logs, &self.phase)
    }

    pub fn welcome_message(&self) -> String {
        narration::welcome(self.progress.last_workout, self.now_millis())
    }

    pub fn log_diagnostic(&mut self, message: impl Into<String>) {
        let stamp = self.services.clock.now().format("%H:%M:%S");
        self.diagnostics.push(format!("[{stamp}] {}", message.into()));
    }

    fn now_millis(&self) -> i64 {
        self.services.clock.now().timestamp_millis()
    }

    fn announce(&mut self, text: &str) {
        self.services.narrator.speak(text);
    }

    fn say(&mut self, text: String) {
        self.services.narrator.speak(&text);
        self.coach_message = text;
    }

    /// Narrates `fallback` directly, or asks the commentary provider first and
    /// shows an interim message until the answer arrives.
    fn solicit(&mut self, fallback: String, context: String) {
        if !self.services.commentary.is_configured() {
            self.say(fallback);
            return;
        }

        self.next_request_id += 1;
        let request_id = self.next_request_id;
        self.pending = Some(PendingCommentary {
            request_id,
            fallback,
        });
        self.coach_message = narration::THINKING_MESSAGE.to_string();
        self.services
            .commentary
            .request(request_id, CommentaryRequest::coach(context));
    }

    /// Abandons an outstanding commentary request and speaks the canned text
    /// instead, so whatever is narrated next follows it.
    fn drop_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            debug!(request_id = pending.request_id, "commentary superseded");
            self.say(pending.fallback);
        }
    }

    fn halt_timer(&mut self) {
        self.services.ticker.stop();
        self.running = false;
    }

    pub fn start_session(&mut self) {
        let opening = !self.session_started;
        self.session_started = true;
        info!(phase = self.phase.id, "session started");

        if self.active.is_none() {
            let index = self.recommended_index();
            self.brief(index, opening);
        }

        if !self.listening && self.voice_available() {
            self.start_listening(false);
        }
    }

    /// Selects the recommended exercise. Only meaningful while idle.
    pub fn request_next(&mut self) {
        if self.active.is_some() {
            debug!("request_next ignored, an exercise is active");
            return;
        }
        let index = self.recommended_index();
        self.brief(index, false);
    }

    /// Jumps to a caller-chosen exercise of the current phase.
    pub fn select_exercise(&mut self, index: usize) {
        let Some(exercise) = self.phase.exercises.get(index).cloned() else {
            warn!(index, "select_exercise: no such exercise in phase {}", self.phase.id);
            return;
        };

        self.halt_timer();
        self.drop_pending();
        self.activate(index, &exercise);

        let fallback = narration::briefing(BriefingContext {
            session_opening: false,
            latest_log: None,
            new_cycle: false,
            exercise: &exercise,
            now_millis: self.now_millis(),
        });
        let context =
            narration::briefing_context_for_commentary(&fallback, &exercise, self.progress.streak);
        self.solicit(fallback, context);
    }

    fn brief(&mut self, index: usize, session_opening: bool) {
        let Some(exercise) = self.phase.exercises.get(index).cloned() else {
            return;
        };

        let latest = self.progress.latest();
        let new_cycle = index == 0 && latest.is_some_and(|entry| entry.phase_id == self.phase.id);
        let fallback = narration::briefing(BriefingContext {
            session_opening,
            latest_log: latest.map(|entry| entry.timestamp),
            new_cycle,
            exercise: &exercise,
            now_millis: self.now_millis(),
        });

        self.halt_timer();
        self.drop_pending();
        self.activate(index, &exercise);

        let context =
            narration::briefing_context_for_commentary(&fallback, &exercise, self.progress.streak);
        self.solicit(fallback, context);
    }

    fn activate(&mut self, index: usize, exercise: &Exercise) {
        self.active = Some(index);
        self.remaining = exercise.duration_secs;
        self.running = false;
        self.view = View::Home;
        info!(exercise = %exercise.name, duration = exercise.duration_secs, "exercise selected");
    }

    pub fn toggle_timer(&mut self) {
        if self.active.is_none() {
            return;
        }
        self.drop_pending();

        if self.running {
            self.halt_timer();
            self.announce(narration::PAUSE_CUE);
        } else {
            if self.remaining == 0 {
                return;
            }
            self.running = true;
            self.services.ticker.start();
            self.announce(narration::START_CUE);
        }
    }

    pub fn tick(&mut self) {
        if !self.running {
            return;
        }
        let Some(exercise) = self.active_exercise().cloned() else {
            self.halt_timer();
            return;
        };
        if self.remaining == 0 {
            self.complete(true);
            return;
        }

        self.remaining -= 1;
        debug!(remaining = self.remaining, "tick");

        if self.remaining == exercise.duration_secs / 2 && !exercise.voice_cues.is_empty() {
            let pick = self.services.rng.pick(exercise.voice_cues.len());
            let cue = exercise.voice_cues[pick.min(exercise.voice_cues.len() - 1)].clone();
            self.say(cue);
        }
        if self.remaining == 3 {
            self.announce(narration::COUNTDOWN_CUE);
        }
        if self.remaining == 0 {
            self.complete(true);
        }
    }

    /// Manual "Fertig". Shares the completion path with timer expiry.
    pub fn finish_exercise(&mut self) {
        self.complete(false);
    }

    fn complete(&mut self, timer_expired: bool) {
        let Some(exercise) = self.active_exercise().cloned() else {
            return;
        };

        self.halt_timer();
        self.drop_pending();

        let now = self.now_millis();
        let id = match self.progress.latest() {
            Some(latest) if latest.id >= now => latest.id + 1,
            _ => now,
        };
        let entry = LogEntry {
            id,
            timestamp: now,
            exercise_name: exercise.name.clone(),
            duration: exercise.duration_secs,
            phase_id: self.phase.id,
        };

        let mut next = self.progress.clone();
        next.record(entry, now);
        if let Err(err) = self.services.sink.save_progress(&next) {
            error!(error = %err, "failed to persist progress");
            self.log_diagnostic(format!("failed to persist progress: {err}"));
        }
        self.progress = next;
        self.active = None;
        self.remaining = 0;
        info!(
            exercise = %exercise.name,
            streak = self.progress.streak,
            timer_expired,
            "exercise finished"
        );

        let fallback = narration::completion(timer_expired);
        let context = narration::completion_context_for_commentary(
            &fallback,
            &exercise.name,
            exercise.duration_secs,
            self.progress.streak,
        );
        self.solicit(fallback, context);
    }

    pub fn show_view(&mut self, view: View) {
        self.view = view;
    }

    /// Applies one recognized phrase. Returns the command that matched, even
    /// when its guard turned it into a no-op.
    pub fn dispatch_utterance(&mut self, utterance: &str) -> Option<VoiceCommand> {
        let Some(command) = parse_command(utterance) else {
            debug!(utterance, "no voice command matched");
            return None;
        };
        debug!(utterance, ?command, "voice command");

        match command {
            VoiceCommand::Start => {
                if self.active.is_some() && !self.running {
                    self.toggle_timer();
                }
            }
            VoiceCommand::Pause => {
                if self.running {
                    self.toggle_timer();
                }
            }
            VoiceCommand::Finish => self.finish_exercise(),
            VoiceCommand::Next => {
                if self.active.is_some() {
                    self.finish_exercise();
                } else {
                    self.request_next();
                }
            }
            VoiceCommand::ShowLog => {
                self.show_view(View::Log);
                self.announce(narration::SHOW_LOG_CUE);
            }
            VoiceCommand::ShowHome => {
                self.show_view(View::Home);
                self.announce(narration::SHOW_HOME_CUE);
            }
        }
        Some(command)
    }

    pub fn apply_commentary(&mut self, request_id: u64, result: Result<String, CommentaryError>) {
        let Some(pending) = self.pending.take() else {
            debug!(request_id, "commentary arrived with nothing pending");
            return;
        };
        if pending.request_id != request_id {
            debug!(request_id, expected = pending.request_id, "stale commentary ignored");
            self.pending = Some(pending);
            return;
        }

        let text = match result {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => {
                warn!(request_id, "commentary was blank, using fallback");
                pending.fallback
            }
            Err(err) => {
                warn!(request_id, error = %err, "commentary unavailable, using fallback");
                self.log_diagnostic(format!("commentary fallback: {err}"));
                pending.fallback
            }
        };
        self.say(text);
    }

    pub fn toggle_listening(&mut self) {
        if self.listening {
            self.stop_listening();
        } else {
            self.start_listening(true);
        }
    }

    fn start_listening(&mut self, announce: bool) {
        if !self.voice_available() {
            self.listening = false;
            self.log_diagnostic("speech recognition unavailable, voice commands disabled");
            return;
        }

        match self.services.recognizer.start() {
            Ok(()) => {
                self.listening = true;
                self.retry_pending = false;
                if announce {
                    self.announce(narration::LISTENING_CUE);
                }
            }
            Err(err) => {
                self.listening = false;
                warn!(error = %err, "failed to start speech recognition");
                self.log_diagnostic(format!("failed to start speech recognition: {err}"));
            }
        }
    }

    fn stop_listening(&mut self) {
        self.listening = false;
        self.retry_pending = false;
        self.services.recognizer.stop();
    }

    /// The recognizer stopped on its own; keep it alive while listening is wanted.
    pub fn on_recognizer_ended(&mut self) {
        if !self.listening {
            return;
        }
        match self.services.recognizer.start() {
            Ok(()) => debug!("speech recognition restarted"),
            Err(err) => {
                let delay_ms = u64::try_from(self.retry_delay.as_millis()).unwrap_or(u64::MAX);
                warn!(error = %err, delay_ms, "restart failed, retrying once");
                self.retry_pending = true;
                self.services.recognizer.schedule_retry(self.retry_delay);
            }
        }
    }

    pub fn on_recognizer_retry(&mut self) {
        if !self.listening || !self.retry_pending {
            return;
        }
        self.retry_pending = false;
        match self.services.recognizer.start() {
            Ok(()) => info!("speech recognition restarted after retry"),
            Err(err) => {
                self.listening = false;
                warn!(error = %err, "speech recognition gave up");
                self.log_diagnostic(format!("speech recognition stopped: {err}"));
            }
        }
    }

    pub fn on_recognizer_error(&mut self, message: &str) {
        warn!(message, "speech recognition error");
        self.log_diagnostic(format!("speech recognition error: {message}"));
    }

    pub fn set_api_key(&mut self, api_key: &str) -> Result<(), StoreError> {
        self.services.sink.save_api_key(api_key)?;
        self.services.commentary.set_api_key(api_key);
        info!(configured = self.services.commentary.is_configured(), "commentary key updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Services, SessionController, SessionPhase, View};
    use crate::coach::narration::{COUNTDOWN_CUE, LISTENING_CUE, PAUSE_CUE, START_CUE, THINKING_MESSAGE};
    use crate::coach::{Clock, CueRng, Ticker, VoiceCommand};
    use crate::commentary::{CommentaryDispatch, CommentaryRequest};
    use crate::error::{CommentaryError, StoreError, VoiceError};
    use crate::plan::fixtures::{exercise, phase};
    use crate::plan::Phase;
    use crate::session::store::ProgressSink;
    use crate::session::{LogEntry, Progress};
    use crate::voice::{Narrator, Recognizer};
    use chrono::{DateTime, Duration as ChronoDuration, Local, TimeZone};
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;
    use std::time::Duration;

    #[derive(Default)]
    struct Record {
        spoken: Vec<String>,
        ticker_starts: usize,
        ticker_stops: usize,
        ticker_live: bool,
        recognizer_starts: usize,
        recognizer_stops: usize,
        recognizer_results: VecDeque<bool>,
        retries: Vec<Duration>,
        requests: Vec<(u64, CommentaryRequest)>,
        saved: Vec<Progress>,
        api_keys: Vec<String>,
        fail_saves: bool,
        now: Option<DateTime<Local>>,
        cue_pick: usize,
    }

    type Shared = Rc<RefCell<Record>>;

    struct FakeNarrator(Shared);
    impl Narrator for FakeNarrator {
        fn speak(&mut self, text: &str) {
            self.0.borrow_mut().spoken.push(text.to_string());
        }
    }

    struct FakeRecognizer {
        record: Shared,
        available: bool,
    }
    impl Recognizer for FakeRecognizer {
        fn is_available(&self) -> bool {
            self.available
        }
        fn start(&mut self) -> Result<(), VoiceError> {
            let mut record = self.record.borrow_mut();
            record.recognizer_starts += 1;
            if record.recognizer_results.pop_front().unwrap_or(true) {
                Ok(())
            } else {
                Err(VoiceError::Unavailable)
            }
        }
        fn stop(&mut self) {
            self.record.borrow_mut().recognizer_stops += 1;
        }
        fn schedule_retry(&mut self, delay: Duration) {
            self.record.borrow_mut().retries.push(delay);
        }
    }

    struct FakeTicker(Shared);
    impl Ticker for FakeTicker {
        fn start(&mut self) {
            let mut record = self.0.borrow_mut();
            assert!(!record.ticker_live, "ticker started twice");
            record.ticker_starts += 1;
            record.ticker_live = true;
        }
        fn stop(&mut self) {
            let mut record = self.0.borrow_mut();
            record.ticker_stops += 1;
            record.ticker_live = false;
        }
    }

    struct FakeCommentary {
        record: Shared,
        configured: bool,
    }
    impl CommentaryDispatch for FakeCommentary {
        fn is_configured(&self) -> bool {
            self.configured
        }
        fn request(&mut self, request_id: u64, request: CommentaryRequest) {
            self.record.borrow_mut().requests.push((request_id, request));
        }
        fn set_api_key(&mut self, api_key: &str) {
            self.configured = !api_key.trim().is_empty();
        }
    }

    struct FakeSink(Shared);
    impl ProgressSink for FakeSink {
        fn save_progress(&mut self, progress: &Progress) -> Result<(), StoreError> {
            let mut record = self.0.borrow_mut();
            if record.fail_saves {
                return Err(StoreError::Io {
                    path: "progress.json".into(),
                    source: std::io::Error::other("disk full"),
                });
            }
            record.saved.push(progress.clone());
            Ok(())
        }
        fn save_api_key(&mut self, api_key: &str) -> Result<(), StoreError> {
            self.0.borrow_mut().api_keys.push(api_key.to_string());
            Ok(())
        }
    }

    struct FakeClock(Shared);
    impl Clock for FakeClock {
        fn now(&self) -> DateTime<Local> {
            self.0
                .borrow()
                .now
                .unwrap_or_else(|| Local.with_ymd_and_hms(2026, 2, 10, 18, 0, 0).unwrap())
        }
    }

    struct FakeRng(Shared);
    impl CueRng for FakeRng {
        fn pick(&mut self, _len: usize) -> usize {
            self.0.borrow().cue_pick
        }
    }

    struct Harness {
        record: Shared,
        controller: SessionController,
    }

    impl Harness {
        fn spoken(&self) -> Vec<String> {
            self.record.borrow().spoken.clone()
        }
        fn last_spoken(&self) -> String {
            self.record.borrow().spoken.last().cloned().unwrap_or_default()
        }
        fn advance(&self, duration: ChronoDuration) {
            let now = FakeClock(self.record.clone()).now() + duration;
            self.record.borrow_mut().now = Some(now);
        }
        fn tick_n(&mut self, n: u32) {
            for _ in 0..n {
                self.controller.tick();
            }
        }
    }

    fn test_phase() -> Phase {
        let mut phase = phase(1, (2026, 1, 5), (2026, 4, 6), &["1. Hang", "2. Frog", "3. Hold"]);
        phase.exercises[1] = exercise("2. Frog", 10, &["Balance halten", "Blick nach vorne"]);
        phase
    }

    fn harness_with(progress: Progress, voice: bool, commentary: bool) -> Harness {
        harness_for(test_phase(), progress, voice, commentary)
    }

    fn harness_for(phase: Phase, progress: Progress, voice: bool, commentary: bool) -> Harness {
        let record: Shared = Rc::new(RefCell::new(Record::default()));
        let services = Services {
            narrator: Box::new(FakeNarrator(record.clone())),
            recognizer: Box::new(FakeRecognizer {
                record: record.clone(),
                available: voice,
            }),
            ticker: Box::new(FakeTicker(record.clone())),
            commentary: Box::new(FakeCommentary {
                record: record.clone(),
                configured: commentary,
            }),
            sink: Box::new(FakeSink(record.clone())),
            clock: Box::new(FakeClock(record.clone())),
            rng: Box::new(FakeRng(record.clone())),
        };
        let controller =
            SessionController::new(phase, progress, services, Duration::from_millis(500));
        Harness { record, controller }
    }

    fn harness() -> Harness {
        harness_with(Progress::default(), true, false)
    }

    #[test]
    fn fresh_install_scenario() {
        let mut h = harness();
        assert_eq!(h.controller.state(), SessionPhase::Idle);
        assert_eq!(h.controller.coach_message(), "Dein Start in den Trainingsplan.");

        h.controller.start_session();
        assert!(h.controller.session_started());
        assert!(h.controller.is_listening());
        assert_eq!(h.controller.state(), SessionPhase::ActivePaused);
        assert_eq!(h.controller.active_exercise().map(|e| e.name.as_str()), Some("1. Hang"));
        assert_eq!(h.controller.remaining_secs(), 10);
        assert_eq!(
            h.last_spoken(),
            "Lass uns beginnen. Nächste Übung: 1. Hang. Ziel: 10 Sek.."
        );

        h.controller.finish_exercise();
        let progress = h.controller.progress();
        assert_eq!(progress.streak, 1);
        assert_eq!(progress.logs.len(), 1);
        assert_eq!(progress.logs[0].exercise_name, "1. Hang");
        assert_eq!(progress.logs[0].duration, 10);
        assert_eq!(progress.logs[0].phase_id, 1);
        assert_eq!(h.record.borrow().saved.len(), 1);
        assert_eq!(h.controller.state(), SessionPhase::Idle);

        h.advance(ChronoDuration::minutes(2));
        h.controller.start_session();
        assert_eq!(h.controller.active_exercise().map(|e| e.name.as_str()), Some("2. Frog"));
        assert!(h.last_spoken().starts_with("Weiter geht's. Nächste Übung: 2. Frog."));
    }

    #[test]
    fn countdown_runs_to_completion_exactly_once() {
        let mut h = harness();
        h.record.borrow_mut().cue_pick = 1;
        h.controller.select_exercise(1);
        h.controller.toggle_timer();
        assert_eq!(h.controller.state(), SessionPhase::ActiveRunning);
        assert_eq!(h.last_spoken(), START_CUE);

        h.tick_n(4);
        assert_eq!(h.controller.remaining_secs(), 6);
        assert!(!h.spoken().iter().any(|s| s == "Blick nach vorne"));

        h.tick_n(1);
        assert_eq!(h.controller.remaining_secs(), 5);
        assert_eq!(h.last_spoken(), "Blick nach vorne");
        assert_eq!(h.controller.coach_message(), "Blick nach vorne");

        h.tick_n(2);
        assert_eq!(h.last_spoken(), COUNTDOWN_CUE);

        h.tick_n(3);
        assert_eq!(h.controller.state(), SessionPhase::Idle);
        assert_eq!(h.controller.progress().streak, 1);
        assert_eq!(h.controller.progress().logs.len(), 1);
        assert!(h.last_spoken().starts_with("Zeit um! Gut gemacht."));
        assert!(!h.record.borrow().ticker_live);

        h.tick_n(5);
        assert_eq!(h.controller.progress().logs.len(), 1);
        assert_eq!(h.spoken().iter().filter(|s| s.as_str() == COUNTDOWN_CUE).count(), 1);
    }

    #[test]
    fn short_countdowns_cue_once_and_log_once() {
        // (duration, tick of the halfway cue, countdown phrases)
        let cases = [(1u32, 1u32, 0usize), (2, 1, 0), (3, 2, 0), (7, 4, 1)];

        for (duration, cue_tick, countdowns) in cases {
            let mut hold = phase(1, (2026, 1, 5), (2026, 4, 6), &["Hold"]);
            hold.exercises[0] = exercise("Hold", duration, &["Atmen"]);
            let mut h = harness_for(hold, Progress::default(), false, false);
            h.controller.select_exercise(0);
            h.controller.toggle_timer();

            let mut cue_at = None;
            for tick in 1..=duration {
                let before = h.spoken().len();
                h.controller.tick();
                if cue_at.is_none() && h.spoken()[before..].iter().any(|s| s == "Atmen") {
                    cue_at = Some(tick);
                }
            }
            h.tick_n(3);

            let spoken = h.spoken();
            assert_eq!(cue_at, Some(cue_tick), "cue tick for D={duration}");
            assert_eq!(
                spoken.iter().filter(|s| s.as_str() == "Atmen").count(),
                1,
                "cue count for D={duration}"
            );
            assert_eq!(
                spoken.iter().filter(|s| s.as_str() == COUNTDOWN_CUE).count(),
                countdowns,
                "countdown count for D={duration}"
            );
            assert_eq!(h.controller.progress().logs.len(), 1, "log entries for D={duration}");
            assert_eq!(h.controller.progress().logs[0].duration, duration);
            assert_eq!(h.record.borrow().saved.len(), 1, "saves for D={duration}");
            assert_eq!(h.controller.state(), SessionPhase::Idle);
            assert!(h.last_spoken().starts_with("Zeit um! Gut gemacht."));
        }
    }

    #[test]
    fn pausing_stops_the_countdown() {
        let mut h = harness();
        h.controller.select_exercise(1);
        h.controller.toggle_timer();
        h.tick_n(2);
        h.controller.toggle_timer();
        assert_eq!(h.last_spoken(), PAUSE_CUE);
        assert_eq!(h.controller.state(), SessionPhase::ActivePaused);

        h.tick_n(5);
        assert_eq!(h.controller.remaining_secs(), 8);

        for _ in 0..3 {
            h.controller.toggle_timer();
            h.controller.toggle_timer();
        }
        assert_eq!(h.controller.remaining_secs(), 8);

        h.controller.toggle_timer();
        h.tick_n(8);
        assert_eq!(h.controller.state(), SessionPhase::Idle);
        assert_eq!(h.controller.progress().logs.len(), 1);
        assert!(!h.record.borrow().ticker_live);
    }

    #[test]
    fn each_finish_logs_once() {
        let mut h = harness();
        h.controller.select_exercise(0);
        h.controller.finish_exercise();
        h.controller.finish_exercise();
        assert_eq!(h.controller.progress().streak, 1);

        h.controller.select_exercise(2);
        h.controller.finish_exercise();
        let progress = h.controller.progress();
        assert_eq!(progress.streak, 2);
        assert_eq!(progress.logs.len(), 2);
        assert_eq!(progress.logs[0].exercise_name, "3. Hold");
        assert!(progress.logs[0].id > progress.logs[1].id);
    }

    #[test]
    fn logged_duration_is_the_configured_duration() {
        let mut h = harness();
        h.controller.select_exercise(1);
        h.controller.toggle_timer();
        h.tick_n(2);
        h.controller.finish_exercise();
        assert_eq!(h.controller.progress().logs[0].duration, 10);
        assert_eq!(h.last_spoken(), "Gespeichert. Sag 'Weiter' für die nächste Übung.");
    }

    #[test]
    fn persistence_failure_still_commits_in_memory() {
        let mut h = harness();
        h.record.borrow_mut().fail_saves = true;
        h.controller.select_exercise(0);
        h.controller.finish_exercise();
        assert_eq!(h.controller.progress().streak, 1);
        assert!(h
            .controller
            .diagnostics()
            .iter()
            .any(|line| line.contains("failed to persist progress")));
    }

    #[test]
    fn toggle_without_exercise_is_ignored() {
        let mut h = harness();
        h.controller.toggle_timer();
        assert!(!h.controller.is_running());
        assert_eq!(h.record.borrow().ticker_starts, 0);
        assert!(h.spoken().is_empty());
    }

    #[test]
    fn voice_next_depends_on_active_exercise() {
        let mut h = harness();
        assert_eq!(
            h.controller.dispatch_utterance("bitte weiter jetzt"),
            Some(VoiceCommand::Next)
        );
        assert_eq!(h.controller.state(), SessionPhase::ActivePaused);
        assert_eq!(h.controller.progress().streak, 0);

        h.controller.dispatch_utterance("bitte weiter jetzt");
        assert_eq!(h.controller.state(), SessionPhase::Idle);
        assert_eq!(h.controller.progress().streak, 1);
    }

    #[test]
    fn voice_pause_only_while_running() {
        let mut h = harness();
        h.controller.select_exercise(0);
        h.controller.dispatch_utterance("los");
        assert!(h.controller.is_running());

        h.controller.dispatch_utterance("stoppe das");
        assert!(!h.controller.is_running());
        let spoken_before = h.spoken().len();

        h.controller.dispatch_utterance("stoppe das");
        assert!(!h.controller.is_running());
        assert_eq!(h.spoken().len(), spoken_before);
    }

    #[test]
    fn voice_start_is_guarded() {
        let mut h = harness();
        assert_eq!(h.controller.dispatch_utterance("Start"), Some(VoiceCommand::Start));
        assert_eq!(h.controller.state(), SessionPhase::Idle);
        assert!(h.spoken().is_empty());

        h.controller.select_exercise(0);
        h.controller.dispatch_utterance("start");
        h.controller.dispatch_utterance("start");
        assert_eq!(h.record.borrow().ticker_starts, 1);
    }

    #[test]
    fn voice_fertig_without_exercise_is_a_no_op() {
        let mut h = harness();
        h.controller.dispatch_utterance("fertig");
        assert_eq!(h.controller.progress().streak, 0);
        assert!(h.record.borrow().saved.is_empty());
    }

    #[test]
    fn voice_switches_views() {
        let mut h = harness();
        h.controller.dispatch_utterance("zeig mir den Verlauf");
        assert_eq!(h.controller.view(), View::Log);
        assert_eq!(h.last_spoken(), "Hier ist dein Verlauf.");

        h.controller.dispatch_utterance("zurück");
        assert_eq!(h.controller.view(), View::Home);
        assert_eq!(h.last_spoken(), "Zurück zum Training.");

        assert_eq!(h.controller.dispatch_utterance("wie spät ist es"), None);
    }

    #[test]
    fn commentary_failure_falls_back_to_canned_text() {
        let mut h = harness_with(Progress::default(), false, true);
        h.controller.request_next();
        assert_eq!(h.controller.state(), SessionPhase::Briefing);
        assert_eq!(h.controller.coach_message(), THINKING_MESSAGE);
        assert!(h.spoken().is_empty());

        let request_id = h.record.borrow().requests[0].0;
        h.controller
            .apply_commentary(request_id, Err(CommentaryError::Timeout(8)));
        assert_eq!(h.controller.state(), SessionPhase::ActivePaused);
        assert_eq!(
            h.controller.coach_message(),
            "Nächste Übung: 1. Hang. Ziel: 10 Sek.."
        );
        assert_eq!(h.last_spoken(), h.controller.coach_message());
    }

    #[test]
    fn commentary_text_supersedes_canned_text() {
        let mut h = harness_with(Progress::default(), false, true);
        h.controller.request_next();
        let request_id = h.record.borrow().requests[0].0;
        h.controller
            .apply_commentary(request_id, Ok("  Auf geht's, Hang!  ".to_string()));
        assert_eq!(h.controller.coach_message(), "Auf geht's, Hang!");
        assert_eq!(h.last_spoken(), "Auf geht's, Hang!");
    }

    #[test]
    fn blank_commentary_uses_fallback() {
        let mut h = harness_with(Progress::default(), false, true);
        h.controller.request_next();
        let request_id = h.record.borrow().requests[0].0;
        h.controller.apply_commentary(request_id, Ok("   ".to_string()));
        assert!(h.controller.coach_message().starts_with("Nächste Übung"));
    }

    #[test]
    fn stale_commentary_is_ignored() {
        let mut h = harness_with(Progress::default(), false, true);
        h.controller.request_next();
        let first = h.record.borrow().requests[0].0;
        h.controller.toggle_timer();
        assert!(h.controller.coach_message().starts_with("Nächste Übung"));

        h.controller.apply_commentary(first, Ok("late".to_string()));
        assert_ne!(h.controller.coach_message(), "late");
        assert_eq!(h.last_spoken(), START_CUE);
    }

    #[test]
    fn superseded_briefing_is_still_spoken() {
        let mut h = harness_with(Progress::default(), false, true);
        h.controller.request_next();
        assert!(h.spoken().is_empty());

        h.controller.toggle_timer();
        assert_eq!(
            h.spoken(),
            vec![
                "Nächste Übung: 1. Hang. Ziel: 10 Sek..".to_string(),
                START_CUE.to_string()
            ]
        );
    }

    #[test]
    fn completion_requests_commentary_when_configured() {
        let mut h = harness_with(Progress::default(), false, true);
        h.controller.select_exercise(0);
        h.controller.finish_exercise();
        let record = h.record.borrow();
        let (_, request) = record.requests.last().expect("completion request");
        assert!(request.context.contains("1. Hang"));
        assert_eq!(h.controller.progress().streak, 1);
    }

    #[test]
    fn recognizer_end_restarts_while_listening() {
        let mut h = harness();
        h.controller.toggle_listening();
        assert!(h.controller.is_listening());
        assert_eq!(h.last_spoken(), LISTENING_CUE);

        h.controller.on_recognizer_ended();
        assert_eq!(h.record.borrow().recognizer_starts, 2);
        assert!(h.controller.is_listening());
    }

    #[test]
    fn recognizer_retries_once_then_gives_up() {
        let mut h = harness();
        h.controller.toggle_listening();
        h.record.borrow_mut().recognizer_results = VecDeque::from([false, false]);

        h.controller.on_recognizer_ended();
        assert_eq!(h.record.borrow().retries, vec![Duration::from_millis(500)]);
        assert!(h.controller.is_listening());

        h.controller.on_recognizer_retry();
        assert!(!h.controller.is_listening());
        assert_eq!(h.record.borrow().recognizer_starts, 3);

        h.controller.on_recognizer_retry();
        assert_eq!(h.record.borrow().recognizer_starts, 3);
    }

    #[test]
    fn recognizer_retry_can_recover() {
        let mut h = harness();
        h.controller.toggle_listening();
        h.record.borrow_mut().recognizer_results = VecDeque::from([false, true]);
        h.controller.on_recognizer_ended();
        h.controller.on_recognizer_retry();
        assert!(h.controller.is_listening());
    }

    #[test]
    fn recognizer_end_after_stop_is_ignored() {
        let mut h = harness();
        h.controller.toggle_listening();
        h.controller.toggle_listening();
        assert!(!h.controller.is_listening());
        assert_eq!(h.record.borrow().recognizer_stops, 1);

        h.controller.on_recognizer_ended();
        assert_eq!(h.record.borrow().recognizer_starts, 1);
    }

    #[test]
    fn missing_recognizer_keeps_manual_controls() {
        let mut h = harness_with(Progress::default(), false, false);
        h.controller.start_session();
        assert!(!h.controller.is_listening());
        assert_eq!(h.controller.state(), SessionPhase::ActivePaused);

        h.controller.toggle_listening();
        assert!(!h.controller.is_listening());
        assert_eq!(h.record.borrow().recognizer_starts, 0);
    }

    #[test]
    fn returning_after_a_break_is_greeted() {
        let now = Local.with_ymd_and_hms(2026, 2, 10, 18, 0, 0).unwrap();
        let last = (now - ChronoDuration::days(4)).timestamp_millis();
        let progress = Progress {
            last_workout: Some(last),
            streak: 4,
            logs: vec![LogEntry {
                id: last,
                timestamp: last,
                exercise_name: "3. Hold".to_string(),
                duration: 10,
                phase_id: 1,
            }],
        };
        let mut h = harness_with(progress, false, false);
        assert_eq!(h.controller.coach_message(), "Letztes Training: vor 4 Tagen");

        h.controller.start_session();
        assert_eq!(
            h.last_spoken(),
            "Willkommen zurück nach 4 Tagen. Neuer Zirkel-Durchgang. Nächste Übung: 1. Hang. Ziel: 10 Sek.."
        );
    }

    #[test]
    fn select_exercise_rejects_unknown_index() {
        let mut h = harness();
        h.controller.select_exercise(9);
        assert_eq!(h.controller.state(), SessionPhase::Idle);
    }

    #[test]
    fn select_exercise_while_running_stops_the_timer() {
        let mut h = harness();
        h.controller.select_exercise(0);
        h.controller.toggle_timer();
        h.controller.select_exercise(1);
        assert!(!h.controller.is_running());
        assert!(!h.record.borrow().ticker_live);
        assert_eq!(h.controller.remaining_secs(), 10);
    }

    #[test]
    fn api_key_updates_store_and_provider() {
        let mut h = harness();
        assert!(!h.controller.commentary_configured());
        h.controller.set_api_key("key-123").expect("key should save");
        assert!(h.controller.commentary_configured());
        assert_eq!(h.record.borrow().api_keys, vec!["key-123".to_string()]);
    }
}
