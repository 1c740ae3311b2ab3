use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DATA_DIR_ENV: &str = "COACH_DATA_DIR";
pub const RECOGNIZER_ENV: &str = "COACH_RECOGNIZER";
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceConfig {
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default = "default_speech_rate")]
    pub speech_rate: f32,
    /// Text-to-speech program; the utterance is appended as the last argument.
    #[serde(default = "default_narrator_command")]
    pub narrator_command: String,
    #[serde(default = "default_narrator_args")]
    pub narrator_args: Vec<String>,
    /// Speech-to-text program printing one recognized phrase per stdout line.
    /// Empty disables voice input.
    #[serde(default)]
    pub recognizer_command: String,
    #[serde(default)]
    pub recognizer_args: Vec<String>,
    #[serde(default = "default_recognizer_retry_ms")]
    pub recognizer_retry_ms: u64,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            locale: default_locale(),
            speech_rate: default_speech_rate(),
            narrator_command: default_narrator_command(),
            narrator_args: default_narrator_args(),
            recognizer_command: String::new(),
            recognizer_args: Vec::new(),
            recognizer_retry_ms: default_recognizer_retry_ms(),
        }
    }
}

impl VoiceConfig {
    pub fn recognizer_retry(&self) -> Duration {
        Duration::from_millis(self.recognizer_retry_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentaryConfig {
    #[serde(default = "default_gemini_model")]
    pub model: String,
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,
    #[serde(default = "default_commentary_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for CommentaryConfig {
    fn default() -> Self {
        Self {
            model: default_gemini_model(),
            base_url: default_gemini_base_url(),
            timeout_secs: default_commentary_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CoachConfig {
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    #[serde(default)]
    pub voice: VoiceConfig,
    #[serde(default)]
    pub commentary: CommentaryConfig,
    /// Fallback credential, used only when the progress store holds none.
    #[serde(skip)]
    pub env_api_key: Option<String>,
}

fn default_locale() -> String {
    "de-DE".to_string()
}

fn default_speech_rate() -> f32 {
    1.1
}

fn default_narrator_command() -> String {
    "espeak-ng".to_string()
}

fn default_narrator_args() -> Vec<String> {
    vec!["-v".to_string(), "de".to_string()]
}

fn default_recognizer_retry_ms() -> u64 {
    1000
}

fn default_gemini_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta/models".to_string()
}

fn default_commentary_timeout_secs() -> u64 {
    8
}

impl CoachConfig {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("coach").join("config.toml"))
    }

    /// Reads `path`; a missing file means defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        toml::from_str(&text).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup(DATA_DIR_ENV).filter(|value| !value.trim().is_empty()) {
            self.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(command) = lookup(RECOGNIZER_ENV).filter(|value| !value.trim().is_empty()) {
            self.voice.recognizer_command = command;
        }
        self.env_api_key = lookup(API_KEY_ENV).filter(|value| !value.trim().is_empty());
    }

    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("coach")
        })
    }

    pub fn commentary_timeout(&self) -> Duration {
        Duration::from_secs(self.commentary.timeout_secs)
    }
}
