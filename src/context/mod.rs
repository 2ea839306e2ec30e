pub mod assemble;
pub mod audit;
pub mod config;
pub mod engine;
pub mod full;
pub mod history;
pub mod incremental;
pub mod ingest;
pub mod ledger;
pub mod paths;
pub mod select;
pub mod slug;
pub mod store;
pub mod tokens;

use crate::openai::client::{ChatCompletion, CompletionRequest};
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// The closed role set. Anything else found in a persisted record is
/// dropped at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn parse(raw: &str) -> Option<Role> {
        match raw.trim() {
            "system" => Some(Role::System),
            "user" => Some(Role::User),
            "assistant" => Some(Role::Assistant),
            _ => None,
        }
    }

}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Summarization front-end over the completion boundary. Every
/// summarization call site in the pipeline goes through here, so they all
/// share the client's retry budget and the same deterministic settings.
pub struct Summarizer<'a> {
    pub client: &'a dyn ChatCompletion,
    pub model: &'a str,
}

impl Summarizer<'_> {
    /// One single-message summarization call at temperature 0.
    pub fn summarize(&self, prompt: String) -> Result<String> {
        self.client.complete(&CompletionRequest {
            model: self.model.to_string(),
            messages: vec![Message::user(prompt)],
            temperature: Some(0.0),
            max_tokens: None,
        })
    }

    /// Summarize a whole message set: the instruction goes first, the
    /// selected messages follow unchanged.
    pub fn summarize_messages(&self, instruction: &str, selected: &[Message]) -> Result<String> {
        let mut messages = Vec::with_capacity(selected.len() + 1);
        messages.push(Message::user(instruction));
        messages.extend(selected.iter().cloned());
        self.client.complete(&CompletionRequest {
            model: self.model.to_string(),
            messages,
            temperature: Some(0.0),
            max_tokens: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::Role;

    #[test]
    fn role_parse_accepts_only_the_closed_set() {
        assert_eq!(Role::parse("user"), Some(Role::User));
        assert_eq!(Role::parse(" assistant "), Some(Role::Assistant));
        assert_eq!(Role::parse("system"), Some(Role::System));
        assert_eq!(Role::parse("tool"), None);
        assert_eq!(Role::parse(""), None);
    }

    #[test]
    fn role_serializes_lowercase() {
        let json = serde_json::to_string(&super::Message::user("hi")).expect("serialize");
        assert_eq!(json, "{\"role\":\"user\",\"content\":\"hi\"}");
    }
}
