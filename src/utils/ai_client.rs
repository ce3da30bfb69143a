use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::config::AiSettings;
use crate::utils::database::{HistoryKind, HistoryRecord};

/// Fixed timeout applied to every completion request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub const CHAT_PERSONA: &str = "You are Dogbot, a friendly and playful dog who lives in a Discord \
server. Answer helpfully and concisely, with the occasional woof.";

pub const CAMPAIGN_PERSONA: &str = "You are the Dungeon Master of an ongoing tabletop adventure \
in this Discord channel. Continue the story from the players' actions, describe outcomes vividly, \
and end each reply by asking what the party does next.";

#[derive(Error, Debug)]
pub enum AiError {
    #[error("AI_API_KEY is not configured")]
    MissingApiKey,

    #[error("Request to AI backend failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("AI backend returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("AI backend returned no choices")]
    EmptyResponse,
}

pub type AiResult<T> = Result<T, AiError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

/// Client for an OpenAI-compatible chat completion endpoint.
#[derive(Debug, Clone)]
pub struct AiClient {
    http: reqwest::Client,
    settings: AiSettings,
}

impl AiClient {
    pub fn new(settings: AiSettings) -> AiResult<Self> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { http, settings })
    }

    pub fn model(&self) -> &str {
        &self.settings.model
    }

    /// Sends the conversation and returns the assistant's reply text.
    pub async fn complete(&self, messages: &[ChatMessage]) -> AiResult<String> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .ok_or(AiError::MissingApiKey)?;

        let body = CompletionRequest {
            model: &self.settings.model,
            messages,
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        };

        info!(
            "Sending completion request with {} messages to model '{}'",
            messages.len(),
            self.settings.model
        );

        let response = self
            .http
            .post(&self.settings.api_url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("AI backend returned {}: {}", status, body);
            return Err(AiError::Status { status, body });
        }

        let parsed: CompletionResponse = response.json().await?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(AiError::EmptyResponse)?;

        debug!("Received {} characters from AI backend", content.len());
        Ok(content)
    }

    /// One-shot question without stored context.
    pub async fn ask(&self, question: &str) -> AiResult<String> {
        self.complete(&[ChatMessage::system(CHAT_PERSONA), ChatMessage::user(question)])
            .await
    }

    /// Continues a conversation, replaying previous exchanges as context.
    pub async fn converse(
        &self,
        kind: HistoryKind,
        history: &[HistoryRecord],
        message: &str,
    ) -> AiResult<String> {
        self.complete(&build_conversation(kind, history, message))
            .await
    }
}

/// Builds the message list: persona, then each stored exchange, then the new message.
pub fn build_conversation(
    kind: HistoryKind,
    history: &[HistoryRecord],
    message: &str,
) -> Vec<ChatMessage> {
    let persona = match kind {
        HistoryKind::Chat => CHAT_PERSONA,
        HistoryKind::Campaign => CAMPAIGN_PERSONA,
    };

    let mut messages = Vec::with_capacity(history.len() * 2 + 2);
    messages.push(ChatMessage::system(persona));
    for record in history {
        messages.push(ChatMessage::user(record.message.clone()));
        messages.push(ChatMessage::assistant(record.response.clone()));
    }
    messages.push(ChatMessage::user(message));
    messages
}
