use serde::{Deserialize, Serialize};

pub mod store;

/// One finished exercise. The name is a copy, so entries survive catalog edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: i64,
    pub timestamp: i64,
    pub exercise_name: String,
    pub duration: u32,
    pub phase_id: u32,
}

/// Workout history, logs newest-first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Progress {
    pub last_workout: Option<i64>,
    pub streak: u32,
    pub logs: Vec<LogEntry>,
}

impl Progress {
    pub fn latest(&self) -> Option<&LogEntry> {
        self.logs.first()
    }

    pub fn record(&mut self, entry: LogEntry, now_millis: i64) {
        self.logs.insert(0, entry);
        self.streak = self.streak.saturating_add(1);
        self.last_workout = Some(now_millis);
    }
}
