//! # AI Request Handler
//!
//! Builds one chat-completion request (persona + per-command instructions +
//! the user's prompt), issues it once and interprets the reply. Every
//! outcome, including transport failures, comes back as display text.

use super::http::{HttpClient, HttpRequest, HttpResponse};
use crate::config::QtermConfig;
use crate::error::{QtermError, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::rc::Rc;

pub const PERSONA: &str = "You are a Quantum Optics Professor teaching through a terminal interface.
- Format responses for 80-column monospace
- Use Unicode math symbols (ħ, ψ, â⁺, etc.)
- Wrap LaTeX equations in $$ (e.g., $$\\hbar\\omega$$)
- Include technical depth with clear explanations
- Break complex concepts into steps";

pub const NO_CHOICES: &str = "AI Response Error: No choices in response";
pub const NO_CONTENT: &str = "No response content from AI";

/// Interpreted result of one completion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AiResponse {
    Success(String),
    Failure(String),
}

impl AiResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, AiResponse::Success(_))
    }

    pub fn into_text(self) -> String {
        match self {
            AiResponse::Success(text) | AiResponse::Failure(text) => text,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    choices: Option<Vec<Choice>>,
    #[serde(default)]
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

pub struct AiClient {
    http: Rc<dyn HttpClient>,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    temperature: f32,
    max_tokens: u32,
}

impl AiClient {
    pub fn new(http: Rc<dyn HttpClient>, config: &QtermConfig) -> Self {
        Self {
            http,
            endpoint: config.ai_endpoint.clone(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    /// Asks the completion service and returns display text.
    pub async fn complete(&self, prompt: &str, extra_instructions: &str) -> String {
        self.ask(prompt, extra_instructions).await.into_text()
    }

    pub async fn ask(&self, prompt: &str, extra_instructions: &str) -> AiResponse {
        match self.try_complete(prompt, extra_instructions).await {
            Ok(text) => AiResponse::Success(text),
            Err(err) => {
                tracing::warn!(error = %err, "completion request failed");
                AiResponse::Failure(describe(&err))
            }
        }
    }

    async fn try_complete(&self, prompt: &str, extra_instructions: &str) -> Result<String> {
        let request = self.build_request(prompt, extra_instructions)?;
        tracing::info!(endpoint = %self.endpoint, model = %self.model, "sending completion request");

        let response = self.http.send(request).await?;
        interpret(response)
    }

    fn build_request(&self, prompt: &str, extra_instructions: &str) -> Result<HttpRequest> {
        let url = Url::parse(&self.endpoint)
            .map_err(|e| QtermError::Config(format!("invalid ai_endpoint: {}", e)))?;
        let system = format!("{}\n{}", PERSONA, extra_instructions);
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        Ok(HttpRequest::PostJson {
            url,
            bearer: self.api_key.clone(),
            body: serde_json::to_value(&body)?,
        })
    }
}

fn interpret(response: HttpResponse) -> Result<String> {
    let parsed: std::result::Result<ChatReply, _> = serde_json::from_str(&response.body);

    if !response.is_success() {
        let message = parsed
            .ok()
            .and_then(|reply| reply.error)
            .and_then(|e| e.message)
            .filter(|m| !m.is_empty())
            .unwrap_or(response.status_text);
        return Err(QtermError::Upstream {
            status: response.status,
            message,
        });
    }

    let reply = parsed.map_err(|e| QtermError::MalformedResponse(e.to_string()))?;
    let Some(first) = reply.choices.and_then(|c| c.into_iter().next()) else {
        return Err(QtermError::MalformedResponse(NO_CHOICES.to_string()));
    };

    Ok(first
        .message
        .and_then(|m| m.content)
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| NO_CONTENT.to_string()))
}

fn describe(err: &QtermError) -> String {
    match err {
        QtermError::Upstream { message, .. } => format!("AI Error: {}", message),
        QtermError::MalformedResponse(msg) if msg == NO_CHOICES => NO_CHOICES.to_string(),
        other => format!("AI Service Error: {}", other),
    }
}
