use crate::commentary::{CommentaryProvider, CommentaryRequest};
use crate::error::CommentaryError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

/// Coach commentary from the Gemini `generateContent` REST endpoint.
#[derive(Clone)]
pub struct GeminiCommentary {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiCommentary {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{model}:generateContent?key={api_key}",
            self.base_url.trim_end_matches('/'),
            model = self.model,
            api_key = self.api_key
        )
    }
}

#[async_trait]
impl CommentaryProvider for GeminiCommentary {
    async fn comment(&self, request: &CommentaryRequest) -> Result<String, CommentaryError> {
        if self.api_key.trim().is_empty() {
            return Err(CommentaryError::MissingApiKey);
        }

        let body = build_request(request);
        let response = self.client.post(self.endpoint()).json(&body).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error body".to_string());
            return Err(map_http_error(status, &body_text));
        }

        let bytes = response.bytes().await?;
        let parsed: GenerateContentResponse = serde_json::from_slice(&bytes)
            .map_err(|err| CommentaryError::Parse(err.to_string()))?;
        extract_text_response(parsed)
    }
}

fn build_request(request: &CommentaryRequest) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            role: Some("user".to_string()),
            parts: vec![Part {
                text: request.context.clone(),
            }],
        }],
        system_instruction: Some(Content {
            role: None,
            parts: vec![Part {
                text: format!(
                    "Du bist {}. Antworte auf Deutsch in höchstens zwei kurzen, gesprochenen Sätzen ohne Emojis oder Formatierung.",
                    request.role
                ),
            }],
        }),
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
}

#[derive(Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

fn extract_text_response(response: GenerateContentResponse) -> Result<String, CommentaryError> {
    response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().find_map(|part| part.text))
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .ok_or(CommentaryError::Empty)
}

fn map_http_error(status: StatusCode, body: &str) -> CommentaryError {
    let message = serde_json::from_str::<ErrorWrapper>(body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let message = wrapper.error.message.unwrap_or_else(|| body.to_string());
            if status_text.is_empty() {
                message
            } else {
                format!("{status_text}: {message}")
            }
        })
        .unwrap_or_else(|_| body.to_string());

    CommentaryError::Status {
        status: status.as_u16(),
        message,
    }
}
