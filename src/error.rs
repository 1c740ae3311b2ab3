use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode progress document: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum VoiceError {
    #[error("speech recognition is not available")]
    Unavailable,
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum CommentaryError {
    #[error("no API key configured")]
    MissingApiKey,
    #[error("commentary request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("commentary service returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("failed to parse commentary response: {0}")]
    Parse(String),
    #[error("commentary response contained no text")]
    Empty,
    #[error("commentary request timed out after {0}s")]
    Timeout(u64),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
