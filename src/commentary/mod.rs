use crate::config::CommentaryConfig;
use crate::error::CommentaryError;
use crate::event::{AppEvent, EventSender};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::debug;

pub mod gemini;

pub use gemini::GeminiCommentary;

pub const COACH_ROLE: &str = "ein motivierender, knapper Calisthenics-Coach";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentaryRequest {
    pub context: String,
    pub role: String,
}

impl CommentaryRequest {
    pub fn coach(context: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            role: COACH_ROLE.to_string(),
        }
    }
}

#[async_trait]
pub trait CommentaryProvider: Send + Sync {
    async fn comment(&self, request: &CommentaryRequest) -> Result<String, CommentaryError>;
}

/// Controller-facing seam: requests are fire-and-forget and answered with
/// `AppEvent::CommentaryReady` carrying the same id.
pub trait CommentaryDispatch {
    fn is_configured(&self) -> bool;
    fn request(&mut self, request_id: u64, request: CommentaryRequest);
    fn set_api_key(&mut self, api_key: &str);
}

pub struct SpawnedCommentary {
    runtime_handle: Handle,
    events: EventSender,
    config: CommentaryConfig,
    provider: Option<Arc<dyn CommentaryProvider>>,
}

impl SpawnedCommentary {
    pub fn new(
        runtime_handle: Handle,
        events: EventSender,
        config: CommentaryConfig,
        api_key: &str,
    ) -> Self {
        let mut dispatch = Self {
            runtime_handle,
            events,
            config,
            provider: None,
        };
        dispatch.set_api_key(api_key);
        dispatch
    }

    pub fn with_provider(
        runtime_handle: Handle,
        events: EventSender,
        config: CommentaryConfig,
        provider: Arc<dyn CommentaryProvider>,
    ) -> Self {
        Self {
            runtime_handle,
            events,
            config,
            provider: Some(provider),
        }
    }
}

impl CommentaryDispatch for SpawnedCommentary {
    fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    fn request(&mut self, request_id: u64, request: CommentaryRequest) {
        let Some(provider) = self.provider.clone() else {
            let _ = self.events.send(AppEvent::CommentaryReady {
                request_id,
                result: Err(CommentaryError::MissingApiKey),
            });
            return;
        };

        let events = self.events.clone();
        let timeout_secs = self.config.timeout_secs;
        self.runtime_handle.spawn(async move {
            let result = match tokio::time::timeout(
                Duration::from_secs(timeout_secs),
                provider.comment(&request),
            )
            .await
            {
                Ok(result) => result,
                Err(_) => Err(CommentaryError::Timeout(timeout_secs)),
            };
            debug!(request_id, ok = result.is_ok(), "commentary finished");
            let _ = events.send(AppEvent::CommentaryReady { request_id, result });
        });
    }

    fn set_api_key(&mut self, api_key: &str) {
        let api_key = api_key.trim();
        self.provider = if api_key.is_empty() {
            None
        } else {
            Some(Arc::new(GeminiCommentary::new(
                api_key,
                self.config.model.clone(),
                self.config.base_url.clone(),
            )))
        };
    }
}
