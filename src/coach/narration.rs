use crate::plan::Exercise;
use chrono::{Local, TimeZone};

const DAY_MILLIS: i64 = 24 * 60 * 60 * 1000;

pub const START_CUE: &str = "Los.";
pub const PAUSE_CUE: &str = "Pause.";
pub const COUNTDOWN_CUE: &str = "3.. 2.. 1..";
pub const LISTENING_CUE: &str = "Ich höre zu.";
pub const SHOW_LOG_CUE: &str = "Hier ist dein Verlauf.";
pub const SHOW_HOME_CUE: &str = "Zurück zum Training.";
pub const THINKING_MESSAGE: &str = "Coach denkt nach...";

/// Whole days between two epoch-millis instants, rounded.
pub fn days_between(a: i64, b: i64) -> i64 {
    ((a - b).abs() as f64 / DAY_MILLIS as f64).round() as i64
}

pub fn welcome(last_workout: Option<i64>, now_millis: i64) -> String {
    match last_workout {
        Some(last) => format!(
            "Letztes Training: vor {} Tagen",
            days_between(now_millis, last)
        ),
        None => "Dein Start in den Trainingsplan.".to_string(),
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BriefingContext<'a> {
    /// First briefing of this session; enables the inactivity greeting.
    pub session_opening: bool,
    /// Timestamp of the newest log entry, if any.
    pub latest_log: Option<i64>,
    /// The selector wrapped to 0 within the phase of the newest log entry.
    pub new_cycle: bool,
    pub exercise: &'a Exercise,
    pub now_millis: i64,
}

pub fn briefing(ctx: BriefingContext<'_>) -> String {
    let mut text = String::new();

    if ctx.session_opening {
        match ctx.latest_log {
            Some(last) => {
                let days = days_between(ctx.now_millis, last);
                if days > 2 {
                    text.push_str(&format!("Willkommen zurück nach {days} Tagen. "));
                } else if days == 0 {
                    text.push_str("Zweite Runde heute. ");
                }
            }
            None => text.push_str("Lass uns beginnen. "),
        }
    }

    if ctx.new_cycle {
        text.push_str("Neuer Zirkel-Durchgang. ");
    } else if ctx.latest_log.is_some() {
        text.push_str("Weiter geht's. ");
    }

    text.push_str(&format!(
        "Nächste Übung: {}. {}.",
        ctx.exercise.name, ctx.exercise.target
    ));
    text
}

pub fn completion(timer_expired: bool) -> String {
    let saved = "Gespeichert. Sag 'Weiter' für die nächste Übung.";
    if timer_expired {
        format!("Zeit um! Gut gemacht. {saved}")
    } else {
        saved.to_string()
    }
}

pub fn briefing_context_for_commentary(fallback: &str, exercise: &Exercise, streak: u32) -> String {
    format!(
        "Der Sportler startet gleich die Übung \"{}\" ({}). Beschreibung: {} \
         Bisher abgeschlossene Übungen: {streak}. Standardansage: \"{fallback}\"",
        exercise.name, exercise.target, exercise.description
    )
}

pub fn completion_context_for_commentary(
    fallback: &str,
    exercise_name: &str,
    duration_secs: u32,
    streak: u32,
) -> String {
    format!(
        "Der Sportler hat die Übung \"{exercise_name}\" ({duration_secs} Sekunden) abgeschlossen. \
         Abgeschlossene Übungen insgesamt: {streak}. Standardansage: \"{fallback}\""
    )
}

/// "45" below a minute, "1:05" above.
pub fn format_time(seconds: u32) -> String {
    if seconds < 60 {
        return seconds.to_string();
    }
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// "dd.mm., HH:MM" in local time.
pub fn format_log_timestamp(millis: i64) -> String {
    match Local.timestamp_millis_opt(millis).single() {
        Some(instant) => instant.format("%d.%m., %H:%M").to_string(),
        None => "--.--., --:--".to_string(),
    }
}
