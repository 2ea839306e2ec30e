use crate::context::config::{Profile, Settings};
use crate::context::ingest::{FileReference, ingest_files};
use crate::context::paths::DockPaths;
use crate::context::{Message, Summarizer, full, incremental};
use anyhow::Result;

/// Compose the final message list for one turn, in fixed order: history
/// first (incremental ledger or full-summary strategy, per the profile),
/// file context second, and exactly one final `user` message carrying the
/// live prompt. The live prompt is never summarized or truncated; models
/// weight recency, so long-term context leads and the immediate ask comes
/// last.
pub fn assemble(
    summarizer: &Summarizer,
    paths: &DockPaths,
    settings: &Settings,
    profile: &Profile,
    category: &str,
    user_prompt: &str,
    files: &[FileReference],
) -> Result<Vec<Message>> {
    let mut messages = Vec::new();

    if profile.include_history {
        if profile.incremental_history {
            messages.extend(incremental::prepare_incremental_history(
                summarizer, paths, category, profile,
            )?);
        } else {
            let out = full::prepare_full_history(summarizer, paths, category, profile, settings)?;
            messages.extend(out.selected);
            if let Some(summary) = out.summary {
                messages.push(Message::user(summary));
            }
        }
    }

    messages.extend(ingest_files(summarizer, files, profile.summarize_txt_files)?);

    messages.push(Message::user(user_prompt));
    Ok(messages)
}
