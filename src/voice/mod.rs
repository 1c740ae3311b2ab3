use crate::error::VoiceError;
use std::time::Duration;

pub mod narrator;
pub mod recognizer;

pub use narrator::CommandNarrator;
pub use recognizer::CommandRecognizer;

/// Fire-and-forget speech output. A new utterance supersedes the previous one.
pub trait Narrator {
    fn speak(&mut self, text: &str);
}

/// Continuous speech input. Recognized phrases and "ended" notifications
/// arrive as app events; the controller owns the intent to keep listening.
pub trait Recognizer {
    fn is_available(&self) -> bool;
    fn start(&mut self) -> Result<(), VoiceError>;
    fn stop(&mut self);
    /// Arrange for an `AppEvent::RecognizerRetry` after `delay`.
    fn schedule_retry(&mut self, delay: Duration);
}

pub struct SilentNarrator;

impl Narrator for SilentNarrator {
    fn speak(&mut self, text: &str) {
        tracing::debug!(text, "narration skipped");
    }
}

pub struct UnavailableRecognizer;

impl Recognizer for UnavailableRecognizer {
    fn is_available(&self) -> bool {
        false
    }

    fn start(&mut self) -> Result<(), VoiceError> {
        Err(VoiceError::Unavailable)
    }

    fn stop(&mut self) {}

    fn schedule_retry(&mut self, _delay: Duration) {}
}
