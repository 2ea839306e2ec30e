use crate::context::config::Profile;
use crate::context::paths::DockPaths;
use crate::context::slug::{MAX_SLUG_CHARS, slugify};
use crate::context::{Message, Role};
use anyhow::{Context, Result};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// One persisted turn. Append-only: written once after a successful
/// completion, read back by the history loader on the next invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationRecord {
    pub project: String,
    pub mode: String,
    pub model: String,
    pub created: String,
    pub system: String,
    pub temperature: Option<f64>,
    pub messages: Vec<Message>,
}

/// Persist the completed turn: the system prompt (when configured), the
/// user prompt, and the assistant reply, under
/// `<conversations-root>/<category>/<local-timestamp>__<slug>.json`.
pub fn save_turn(
    paths: &DockPaths,
    category: &str,
    profile: &Profile,
    user_prompt: &str,
    response: &str,
) -> Result<PathBuf> {
    let folder = paths.category_dir(category);
    fs::create_dir_all(&folder)
        .with_context(|| format!("failed to create {}", folder.display()))?;

    let mut messages = Vec::with_capacity(3);
    if let Some(system_prompt) = profile.system_prompt.as_deref()
        && !system_prompt.trim().is_empty()
    {
        messages.push(Message::system(system_prompt));
    }
    messages.push(Message::user(user_prompt));
    messages.push(Message::assistant(response));

    let system = messages
        .iter()
        .find(|m| m.role == Role::System)
        .map(|m| m.content.clone())
        .unwrap_or_default();

    let now = Local::now();
    let record = ConversationRecord {
        project: env!("CARGO_PKG_NAME").to_string(),
        mode: category.to_string(),
        model: profile.model.clone(),
        created: now.to_rfc3339(),
        system,
        temperature: profile.temperature,
        messages,
    };

    let stamp = now.format("%Y-%m-%d_%H-%M");
    let slug = slugify(user_prompt, MAX_SLUG_CHARS);
    let filename = if slug.is_empty() {
        format!("{stamp}.json")
    } else {
        format!("{stamp}__{slug}.json")
    };
    let path = folder.join(filename);

    let data = serde_json::to_string_pretty(&record)?;
    fs::write(&path, format!("{data}\n"))
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}
