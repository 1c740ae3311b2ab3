use crate::config::VoiceConfig;
use crate::voice::Narrator;
use std::path::Path;
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::process::Command;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

const ESPEAK_BASE_WPM: f32 = 175.0;

/// Speaks through an external text-to-speech program. Only the most recent
/// utterance is ever audible: the previous child is killed when its task is
/// aborted.
pub struct CommandNarrator {
    runtime_handle: Handle,
    command: String,
    args: Vec<String>,
    current: Option<JoinHandle<()>>,
    disabled: Arc<AtomicBool>,
}

impl CommandNarrator {
    pub fn new(runtime_handle: Handle, config: &VoiceConfig) -> Self {
        Self {
            runtime_handle,
            command: config.narrator_command.clone(),
            args: narrator_args(config),
            current: None,
            disabled: Arc::new(AtomicBool::new(config.narrator_command.trim().is_empty())),
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled.load(Ordering::SeqCst)
    }
}

fn is_espeak(command: &str) -> bool {
    Path::new(command)
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with("espeak"))
}

fn narrator_args(config: &VoiceConfig) -> Vec<String> {
    let mut args = config.narrator_args.clone();
    if is_espeak(&config.narrator_command) && !args.iter().any(|arg| arg == "-s") {
        let words_per_minute = (ESPEAK_BASE_WPM * config.speech_rate).round() as u32;
        args.push("-s".to_string());
        args.push(words_per_minute.to_string());
    }
    args
}

impl Narrator for CommandNarrator {
    fn speak(&mut self, text: &str) {
        if let Some(previous) = self.current.take() {
            previous.abort();
        }
        if self.is_disabled() || text.trim().is_empty() {
            return;
        }

        let mut command = Command::new(&self.command);
        command
            .args(&self.args)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        let program = self.command.clone();
        let disabled = Arc::clone(&self.disabled);
        debug!(text, "narrating");
        self.current = Some(self.runtime_handle.spawn(async move {
            match command.spawn() {
                Ok(mut child) => {
                    let _ = child.wait().await;
                }
                Err(err) => {
                    if !disabled.swap(true, Ordering::SeqCst) {
                        warn!(command = %program, error = %err, "text-to-speech unavailable, narration disabled");
                    }
                }
            }
        }));
    }
}

impl Drop for CommandNarrator {
    fn drop(&mut self) {
        if let Some(current) = self.current.take() {
            current.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{narrator_args, CommandNarrator};
    use crate::config::VoiceConfig;
    use crate::voice::Narrator;
    use std::time::Duration;
    use tokio::runtime::Handle;

    #[test]
    fn espeak_gets_a_rate_argument() {
        let config = VoiceConfig::default();
        assert_eq!(narrator_args(&config), vec!["-v", "de", "-s", "193"]);
    }

    #[test]
    fn other_programs_keep_their_arguments() {
        let config = VoiceConfig {
            narrator_command: "/usr/bin/say".to_string(),
            narrator_args: vec!["-v".to_string(), "Anna".to_string()],
            ..VoiceConfig::default()
        };
        assert_eq!(narrator_args(&config), vec!["-v", "Anna"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn missing_program_disables_narration() {
        let config = VoiceConfig {
            narrator_command: "coach-test-no-such-tts-binary".to_string(),
            ..VoiceConfig::default()
        };
        let mut narrator = CommandNarrator::new(Handle::current(), &config);
        assert!(!narrator.is_disabled());

        narrator.speak("Los.");
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(narrator.is_disabled());

        narrator.speak("Pause.");
    }
}
