use crate::config::VoiceConfig;
use crate::error::VoiceError;
use crate::event::{AppEvent, EventSender};
use crate::voice::Recognizer;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Runs an external speech-to-text program and forwards every non-empty
/// stdout line as a recognized utterance.
pub struct CommandRecognizer {
    runtime_handle: Handle,
    events: EventSender,
    command: String,
    args: Vec<String>,
    session: Option<JoinHandle<()>>,
    retry: Option<JoinHandle<()>>,
}

impl CommandRecognizer {
    pub fn new(runtime_handle: Handle, events: EventSender, config: &VoiceConfig) -> Self {
        Self {
            runtime_handle,
            events,
            command: config.recognizer_command.trim().to_string(),
            args: config.recognizer_args.clone(),
            session: None,
            retry: None,
        }
    }

}

impl Recognizer for CommandRecognizer {
    fn is_available(&self) -> bool {
        !self.command.is_empty()
    }

    fn start(&mut self) -> Result<(), VoiceError> {
        if !self.is_available() {
            return Err(VoiceError::Unavailable);
        }
        // A finished session may still be sending its end event; replace it.
        if let Some(previous) = self.session.take() {
            previous.abort();
        }

        let _runtime = self.runtime_handle.enter();
        let mut child = Command::new(&self.command)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| VoiceError::Spawn {
                command: self.command.clone(),
                source,
            })?;
        let Some(stdout) = child.stdout.take() else {
            return Err(VoiceError::Unavailable);
        };

        let events = self.events.clone();
        self.session = Some(self.runtime_handle.spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        let phrase = line.trim();
                        if phrase.is_empty() {
                            continue;
                        }
                        debug!(phrase, "recognized");
                        if !events.send(AppEvent::Utterance(phrase.to_string())) {
                            return;
                        }
                    }
                    Ok(None) => break,
                    Err(err) => {
                        let _ = events.send(AppEvent::RecognizerError(err.to_string()));
                        break;
                    }
                }
            }
            let _ = child.wait().await;
            let _ = events.send(AppEvent::RecognizerEnded);
        }));

        info!(command = %self.command, "speech recognizer started");
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(retry) = self.retry.take() {
            retry.abort();
        }
        if let Some(session) = self.session.take() {
            session.abort();
            info!("speech recognizer stopped");
        }
    }

    fn schedule_retry(&mut self, delay: Duration) {
        if let Some(retry) = self.retry.take() {
            retry.abort();
        }
        let events = self.events.clone();
        self.retry = Some(self.runtime_handle.spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(AppEvent::RecognizerRetry);
        }));
    }
}

impl Drop for CommandRecognizer {
    fn drop(&mut self) {
        self.stop();
    }
}
