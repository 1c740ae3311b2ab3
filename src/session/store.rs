use crate::error::StoreError;
use crate::session::{LogEntry, Progress};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const LAST_WORKOUT_KEY: &str = "lastWorkout";
pub const STREAK_KEY: &str = "streak";
pub const WORKOUT_LOGS_KEY: &str = "workoutLogs";
pub const API_KEY_KEY: &str = "geminiApiKey";

const STORE_FILE: &str = "progress.json";

/// Where the controller commits finished work.
pub trait ProgressSink {
    fn save_progress(&mut self, progress: &Progress) -> Result<(), StoreError>;
    fn save_api_key(&mut self, api_key: &str) -> Result<(), StoreError>;
}

/// String-valued key-value document persisted as a single JSON file.
#[derive(Debug, Clone)]
pub struct ProgressStore {
    path: PathBuf,
    document: BTreeMap<String, String>,
}

impl ProgressStore {
    /// Opens the store in `dir`. Unreadable or malformed files yield an empty
    /// document plus a warning; the next save replaces them.
    pub fn open(dir: &Path) -> (Self, Vec<String>) {
        let path = dir.join(STORE_FILE);
        let mut warnings = Vec::new();

        let document = match fs::read(&path) {
            Ok(data) => match serde_json::from_slice::<BTreeMap<String, String>>(&data) {
                Ok(document) => document,
                Err(err) => {
                    warnings.push(format!("failed to parse {}: {err}", path.display()));
                    BTreeMap::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                warnings.push(format!("failed to read {}: {err}", path.display()));
                BTreeMap::new()
            }
        };

        (Self { path, document }, warnings)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn value(&self, key: &str) -> Option<&str> {
        self.document
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }

    pub fn load_progress(&self) -> (Progress, Vec<String>) {
        let mut progress = Progress::default();
        let mut warnings = Vec::new();

        if let Some(raw) = self.value(LAST_WORKOUT_KEY) {
            match raw.trim().parse::<i64>() {
                Ok(value) => progress.last_workout = Some(value),
                Err(err) => warnings.push(format!("ignoring {LAST_WORKOUT_KEY}={raw:?}: {err}")),
            }
        }

        if let Some(raw) = self.value(STREAK_KEY) {
            match raw.trim().parse::<u32>() {
                Ok(value) => progress.streak = value,
                Err(err) => warnings.push(format!("ignoring {STREAK_KEY}={raw:?}: {err}")),
            }
        }

        if let Some(raw) = self.value(WORKOUT_LOGS_KEY) {
            match serde_json::from_str::<Vec<LogEntry>>(raw) {
                Ok(logs) => progress.logs = logs,
                Err(err) => warnings.push(format!("ignoring malformed {WORKOUT_LOGS_KEY}: {err}")),
            }
        }

        for warning in &warnings {
            warn!(path = %self.path.display(), "{warning}");
        }

        (progress, warnings)
    }

    pub fn api_key(&self) -> String {
        self.value(API_KEY_KEY).unwrap_or_default().to_string()
    }

    fn write(&self) -> Result<(), StoreError> {
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir).map_err(io_error(dir))?;

        let tmp_path = self.path.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(&self.document)?;
        fs::write(&tmp_path, bytes).map_err(io_error(&tmp_path))?;

        match fs::rename(&tmp_path, &self.path) {
            Ok(()) => {}
            Err(rename_err) => {
                if self.path.exists() {
                    fs::remove_file(&self.path).map_err(io_error(&self.path))?;
                    fs::rename(&tmp_path, &self.path).map_err(io_error(&self.path))?;
                } else {
                    return Err(StoreError::Io {
                        path: self.path.clone(),
                        source: rename_err,
                    });
                }
            }
        }

        debug!(path = %self.path.display(), "progress store written");
        Ok(())
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> StoreError {
    let path = path.to_path_buf();
    move |source| StoreError::Io { path, source }
}

impl ProgressSink for ProgressStore {
    fn save_progress(&mut self, progress: &Progress) -> Result<(), StoreError> {
        let logs = serde_json::to_string(&progress.logs)?;
        let mut next = self.document.clone();
        match progress.last_workout {
            Some(timestamp) => next.insert(LAST_WORKOUT_KEY.to_string(), timestamp.to_string()),
            None => next.remove(LAST_WORKOUT_KEY),
        };
        next.insert(STREAK_KEY.to_string(), progress.streak.to_string());
        next.insert(WORKOUT_LOGS_KEY.to_string(), logs);

        let previous = std::mem::replace(&mut self.document, next);
        if let Err(err) = self.write() {
            self.document = previous;
            return Err(err);
        }
        Ok(())
    }

    fn save_api_key(&mut self, api_key: &str) -> Result<(), StoreError> {
        let previous = self.document.clone();
        let api_key = api_key.trim();
        if api_key.is_empty() {
            self.document.remove(API_KEY_KEY);
        } else {
            self.document
                .insert(API_KEY_KEY.to_string(), api_key.to_string());
        }

        if let Err(err) = self.write() {
            self.document = previous;
            return Err(err);
        }
        Ok(())
    }
}
