use crate::context::Message;
use crate::context::config::Settings;
use crate::error::DockError;
use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde_json::Value;
use std::env;
use std::thread;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.openai.com";

#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
}

/// Boundary to the chat-completion service. Implementations either return
/// the assistant text or fail after exhausting their retry budget; callers
/// treat both the completion call and every summarization call as this
/// one seam.
pub trait ChatCompletion {
    fn complete(&self, request: &CompletionRequest) -> Result<String>;
}

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub delay: Duration,
}

/// Outcome of a single remote attempt: finished, or worth retrying.
pub enum CallOutcome<T> {
    Done(T),
    Transient(String),
}

/// The one retrying-call helper every remote call site goes through.
/// Fixed inter-attempt delay, bounded attempts; a hard `Err` from the
/// attempt aborts immediately, `Transient` outcomes are retried until the
/// budget runs out and then escalate to `DockError::RemoteExhausted`.
pub fn call_with_retry<T>(
    policy: &RetryPolicy,
    label: &str,
    mut attempt_fn: impl FnMut() -> Result<CallOutcome<T>>,
) -> Result<T> {
    let mut last_reason = String::new();
    for attempt in 1..=policy.max_attempts {
        match attempt_fn()? {
            CallOutcome::Done(value) => return Ok(value),
            CallOutcome::Transient(reason) => {
                last_reason = reason;
                if attempt < policy.max_attempts && !policy.delay.is_zero() {
                    thread::sleep(policy.delay);
                }
            }
        }
    }

    Err(DockError::RemoteExhausted {
        attempts: policy.max_attempts,
        reason: format!("{label}: {last_reason}"),
    }
    .into())
}

pub struct OpenAiClient {
    api_key: String,
    base_url: String,
    http: Client,
    retry: RetryPolicy,
}

impl OpenAiClient {
    /// Build from `OPENAI_API_KEY` (required) and `OPENAI_BASE_URL`
    /// (optional, for compatible gateways).
    pub fn from_env(settings: &Settings) -> Result<Self> {
        let api_key = env::var("OPENAI_API_KEY")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| DockError::Config("OPENAI_API_KEY is not set".to_string()))?;
        let base_url = env::var("OPENAI_BASE_URL")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let http = Client::builder()
            .timeout(Duration::from_secs(settings.request.timeout_secs))
            .build()?;

        Ok(Self {
            api_key,
            base_url,
            http,
            retry: RetryPolicy {
                max_attempts: settings.retry.max_retries,
                delay: Duration::from_secs(settings.retry.retry_delay_secs),
            },
        })
    }
}

fn extract_completion_text(json: &Value) -> Option<String> {
    let choices = json.get("choices").and_then(Value::as_array)?;
    let first = choices.first()?;
    let content = first.get("message")?.get("content")?;
    match content {
        Value::String(s) => Some(s.to_string()),
        Value::Array(parts) => {
            let mut chunks = Vec::new();
            for part in parts {
                if let Some(text) = part.get("text").and_then(Value::as_str) {
                    chunks.push(text.to_string());
                }
            }
            if chunks.is_empty() {
                None
            } else {
                Some(chunks.join("\n"))
            }
        }
        _ => None,
    }
}

impl ChatCompletion for OpenAiClient {
    fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let url = format!(
            "{}/v1/chat/completions",
            self.base_url.trim_end_matches('/')
        );
        let mut payload = serde_json::json!({
            "model": request.model,
            "messages": request.messages,
        });
        if let Some(temperature) = request.temperature {
            payload["temperature"] = serde_json::json!(temperature);
        }
        if let Some(max_tokens) = request.max_tokens {
            payload["max_tokens"] = serde_json::json!(max_tokens);
        }

        call_with_retry(&self.retry, "chat completion", || {
            let response = match self
                .http
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(&payload)
                .send()
            {
                Ok(response) => response,
                Err(err) => return Ok(CallOutcome::Transient(err.to_string())),
            };

            let status = response.status();
            if status.as_u16() == 429 || status.is_server_error() {
                return Ok(CallOutcome::Transient(format!("status {status}")));
            }
            if !status.is_success() {
                anyhow::bail!("chat completion failed with status {status}");
            }

            let json: Value = response.json().context("invalid JSON from chat completion")?;
            let text = extract_completion_text(&json)
                .context("chat completion response missing text content")?;
            Ok(CallOutcome::Done(text))
        })
    }
}
