use crate::context::paths::DockPaths;
use crate::context::{Message, Role};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Deserialize)]
struct StoredRecord {
    #[serde(default, alias = "conversation")]
    messages: Vec<StoredMessage>,
}

#[derive(Debug, Deserialize)]
struct StoredMessage {
    #[serde(default)]
    role: String,
    #[serde(default)]
    content: String,
}

/// Flattened `user`/`assistant` history for a category, oldest record
/// first (ordered by file modification time), messages in stored order
/// within each record. System messages are per-turn directives, not
/// reusable context, and are dropped along with unrecognized roles and
/// empty contents. Unreadable records are skipped with a warning; the
/// category directory is created on first use.
pub fn load_history(paths: &DockPaths, category: &str) -> Result<Vec<Message>> {
    let dir = paths.category_dir(category);
    fs::create_dir_all(&dir).with_context(|| format!("failed to create {}", dir.display()))?;

    let mut files: Vec<(SystemTime, PathBuf)> = Vec::new();
    let read_dir =
        fs::read_dir(&dir).with_context(|| format!("failed to read {}", dir.display()))?;
    for entry in read_dir {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let modified = entry
            .metadata()
            .and_then(|meta| meta.modified())
            .unwrap_or(UNIX_EPOCH);
        files.push((modified, path));
    }
    // record filenames are timestamped, so the path tiebreak stays
    // chronological when mtimes collide
    files.sort();

    let mut all = Vec::new();
    for (_, path) in files {
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) => {
                eprintln!(
                    "warning: skipping unreadable conversation record {}: {err}",
                    path.display()
                );
                continue;
            }
        };
        let record = match serde_json::from_str::<StoredRecord>(&raw) {
            Ok(record) => record,
            Err(err) => {
                eprintln!(
                    "warning: skipping corrupt conversation record {}: {err}",
                    path.display()
                );
                continue;
            }
        };

        for msg in record.messages {
            if msg.content.is_empty() {
                continue;
            }
            match Role::parse(&msg.role) {
                Some(Role::User) => all.push(Message::user(msg.content)),
                Some(Role::Assistant) => all.push(Message::assistant(msg.content)),
                Some(Role::System) | None => {}
            }
        }
    }

    Ok(all)
}
