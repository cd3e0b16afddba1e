//! Access to the hosted text-generation service.
//!
//! The service is stateless from our point of view: a conversation turn carries
//! the system instruction and the whole prior history on every call.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::Notify;

use crate::config::ModelConfig;
use crate::error::{Result, SiteError};
use crate::message::{Message, Role};

/// The two operations the site needs from the AI service.
#[async_trait]
pub trait AiGateway: Send + Sync {
    /// One-shot completion of `prompt`.
    async fn generate_text(&self, prompt: &str) -> Result<String>;

    /// Next reply of a conversation steered by `system_instruction`.
    async fn converse(
        &self,
        system_instruction: &str,
        history: &[Message],
        message: &str,
    ) -> Result<String>;
}

fn coalesce_error(status: reqwest::StatusCode, body: &str) -> SiteError {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return SiteError::Service(format!("gemini rate limit exceeded: {body}"));
    }
    SiteError::Service(format!("gemini request failed with {status}: {body}"))
}

#[derive(Clone)]
pub struct GeminiGateway {
    http: reqwest::Client,
    model: String,
    api_key: String,
    endpoint: String,
}

impl std::fmt::Debug for GeminiGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiGateway")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl GeminiGateway {
    /// Fails when no API key is configured, so a missing credential stops start-up
    /// instead of surfacing on the first visitor request.
    pub fn from_config(cfg: &ModelConfig) -> Result<Self> {
        let api_key = cfg
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| SiteError::Config("missing Gemini API key (set API_KEY)".into()))?;
        Ok(Self {
            http: reqwest::Client::builder()
                .timeout(cfg.timeout())
                .build()
                .map_err(|err| SiteError::Config(format!("http client error: {err}")))?,
            model: cfg.model.clone(),
            api_key,
            endpoint: cfg.endpoint.trim_end_matches('/').to_string(),
        })
    }

    fn to_contents(history: &[Message], message: &str) -> Vec<GeminiContent> {
        history
            .iter()
            .map(|turn| GeminiContent {
                role: match turn.role {
                    Role::User => "user",
                    Role::Bot => "model",
                }
                .to_string(),
                parts: vec![GeminiPart {
                    text: turn.text.clone(),
                }],
            })
            .chain(std::iter::once(GeminiContent {
                role: "user".to_string(),
                parts: vec![GeminiPart {
                    text: message.to_string(),
                }],
            }))
            .collect()
    }

    async fn generate(&self, payload: serde_json::Value) -> Result<String> {
        tracing::debug!(model = %self.model, "sending generateContent request");
        let resp = self
            .http
            .post(format!(
                "{}/models/{}:generateContent",
                self.endpoint, self.model
            ))
            .header("x-goog-api-key", &self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|err| {
                SiteError::Network(format!("Gemini request error: {}", err.without_url()))
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(%status, "gemini returned an error status");
            return Err(coalesce_error(status, &body));
        }

        let body = resp
            .text()
            .await
            .map_err(|err| {
                SiteError::Network(format!("Gemini response read error: {}", err.without_url()))
            })?;
        let parsed: GeminiResponse = serde_json::from_str(&body)
            .map_err(|err| SiteError::Service(format!("Gemini response parse error: {err}")))?;

        let content: String = parsed
            .candidates
            .first()
            .map(|cand| {
                cand.content
                    .parts
                    .iter()
                    .map(|part| part.text.as_str())
                    .collect()
            })
            .unwrap_or_default();

        if content.is_empty() {
            return Err(SiteError::Service("Gemini returned no text".into()));
        }
        Ok(content)
    }
}

#[async_trait]
impl AiGateway for GeminiGateway {
    async fn generate_text(&self, prompt: &str) -> Result<String> {
        let payload = json!({
            "contents": Self::to_contents(&[], prompt),
        });
        self.generate(payload).await
    }

    async fn converse(
        &self,
        system_instruction: &str,
        history: &[Message],
        message: &str,
    ) -> Result<String> {
        let payload = json!({
            "systemInstruction": { "parts": [{ "text": system_instruction }] },
            "contents": Self::to_contents(history, message),
        });
        self.generate(payload).await
    }
}

/// Scripted outcome for one [`StubGateway`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum StubReply {
    Text(String),
    NetworkFailure(String),
    ServiceFailure(String),
}

impl StubReply {
    pub fn text(text: impl Into<String>) -> Self {
        StubReply::Text(text.into())
    }
}

/// What a [`StubGateway`] was asked to do.
#[derive(Debug, Clone, PartialEq)]
pub enum StubCall {
    Generate {
        prompt: String,
    },
    Converse {
        system_instruction: String,
        history: Vec<Message>,
        message: String,
    },
}

/// A deterministic gateway used for tests and demos.
pub struct StubGateway {
    replies: Mutex<VecDeque<StubReply>>,
    calls: Mutex<Vec<StubCall>>,
    gate: Option<Arc<Notify>>,
}

impl StubGateway {
    pub fn new(replies: Vec<StubReply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
            gate: None,
        })
    }

    /// Every call waits for one `notify_one` on `gate` before answering.
    pub fn gated(replies: Vec<StubReply>, gate: Arc<Notify>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
            gate: Some(gate),
        })
    }

    pub fn calls(&self) -> Vec<StubCall> {
        self.calls.lock().expect("stub gateway poisoned").clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("stub gateway poisoned").len()
    }

    async fn answer(&self, call: StubCall) -> Result<String> {
        self.calls.lock().expect("stub gateway poisoned").push(call);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        let reply = self
            .replies
            .lock()
            .expect("stub gateway poisoned")
            .pop_front()
            .ok_or_else(|| SiteError::Service("StubGateway ran out of scripted replies".into()))?;
        match reply {
            StubReply::Text(text) => Ok(text),
            StubReply::NetworkFailure(reason) => Err(SiteError::Network(reason)),
            StubReply::ServiceFailure(reason) => Err(SiteError::Service(reason)),
        }
    }
}

#[async_trait]
impl AiGateway for StubGateway {
    async fn generate_text(&self, prompt: &str) -> Result<String> {
        self.answer(StubCall::Generate {
            prompt: prompt.to_string(),
        })
        .await
    }

    async fn converse(
        &self,
        system_instruction: &str,
        history: &[Message],
        message: &str,
    ) -> Result<String> {
        self.answer(StubCall::Converse {
            system_instruction: system_instruction.to_string(),
            history: history.to_vec(),
            message: message.to_string(),
        })
        .await
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    role: String,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiCandidateContent,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}
