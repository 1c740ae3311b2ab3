use crate::error::CommentaryError;
use eframe::egui;
use std::sync::{mpsc, Arc, OnceLock};

#[derive(Debug)]
pub enum AppEvent {
    Tick,
    Utterance(String),
    RecognizerEnded,
    RecognizerRetry,
    RecognizerError(String),
    CommentaryReady {
        request_id: u64,
        result: Result<String, CommentaryError>,
    },
}

/// Sender half used by background tasks. Wakes the UI thread on every send so
/// events are applied even while the window is idle.
#[derive(Clone)]
pub struct EventSender {
    tx: mpsc::Sender<AppEvent>,
    repaint: Arc<OnceLock<egui::Context>>,
}

impl EventSender {
    pub fn new(tx: mpsc::Sender<AppEvent>) -> Self {
        Self {
            tx,
            repaint: Arc::new(OnceLock::new()),
        }
    }

    pub fn attach_context(&self, ctx: egui::Context) {
        let _ = self.repaint.set(ctx);
    }

    /// Returns false once the UI side has gone away.
    pub fn send(&self, event: AppEvent) -> bool {
        let delivered = self.tx.send(event).is_ok();
        if let Some(ctx) = self.repaint.get() {
            ctx.request_repaint();
        }
        delivered
    }
}
