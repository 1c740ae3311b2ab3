use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};

pub mod catalog;

pub use catalog::catalog;

const WEEK_MILLIS: i64 = 7 * 24 * 60 * 60 * 1000;

#[derive(Debug, Clone, PartialEq)]
pub struct Exercise {
    pub id: String,
    pub name: String,
    pub duration_secs: u32,
    pub target: String,
    pub description: String,
    pub voice_cues: Vec<String>,
    pub video_url: String,
}

/// A dated block of the program. `end_date` is exclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct Phase {
    pub id: u32,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub description: String,
    pub exercises: Vec<Exercise>,
}

impl Phase {
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start_date <= day && day < self.end_date
    }

    pub fn exercise_index(&self, name: &str) -> Option<usize> {
        self.exercises.iter().position(|exercise| exercise.name == name)
    }

    /// "Phase 1" for "Phase 1: Basics & Fundament".
    pub fn short_name(&self) -> &str {
        self.name.split(':').next().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseProgress {
    pub current_week: i64,
    pub total_weeks: i64,
}

/// First phase whose range contains `today`, else the first phase of the catalog.
///
/// Callers must pass a non-empty catalog.
pub fn resolve_phase(today: NaiveDate, phases: &[Phase]) -> &Phase {
    phases
        .iter()
        .find(|phase| phase.contains(today))
        .unwrap_or(&phases[0])
}

/// Phase for the calendar day of `now` in UTC, so every timezone switches
/// phases at the same instant.
pub fn current_phase<Tz: TimeZone>(now: DateTime<Tz>, phases: &[Phase]) -> &Phase {
    resolve_phase(now.with_timezone(&Utc).date_naive(), phases)
}

pub fn phase_progress(phase: &Phase, now: DateTime<Local>) -> PhaseProgress {
    let start = utc_midnight_millis(phase.start_date);
    let end = utc_midnight_millis(phase.end_date);
    let elapsed = now.timestamp_millis() - start;

    PhaseProgress {
        current_week: ceil_div(elapsed, WEEK_MILLIS).max(1),
        total_weeks: ceil_div(end - start, WEEK_MILLIS).max(1),
    }
}

fn utc_midnight_millis(day: NaiveDate) -> i64 {
    day.and_hms_opt(0, 0, 0)
        .unwrap_or_default()
        .and_utc()
        .timestamp_millis()
}

fn ceil_div(value: i64, divisor: i64) -> i64 {
    let quotient = value / divisor;
    if value % divisor > 0 {
        quotient + 1
    } else {
        quotient
    }
}
