use crate::context::config::Profile;
use crate::context::ledger::{LedgerEntry, LedgerStore};
use crate::context::paths::DockPaths;
use crate::context::select::{SelectionPolicy, select};
use crate::context::{Message, Summarizer, audit, history};
use anyhow::Result;

const STEP_SUMMARY_PROMPT: &str =
    "Summarize the following message for use as shared context in a conversation:\n\n";

/// Advance the category's summary ledger by at most one entry, then apply
/// the selection policy over ledger entries (not raw messages) and return
/// them as `user` messages.
///
/// Exactly one historical message is summarized per invocation, the one at
/// index `ledger.len()`; a caught-up ledger issues no remote call at all,
/// which also makes repeat invocations idempotent. The ledger file is only
/// rewritten after a summary is in hand, so a failed remote call leaves it
/// exactly as it was.
pub fn prepare_incremental_history(
    summarizer: &Summarizer,
    paths: &DockPaths,
    category: &str,
    profile: &Profile,
) -> Result<Vec<Message>> {
    let store = LedgerStore::for_category(paths, category);
    let mut entries = store.load()?;
    let all = history::load_history(paths, category)?;

    let next_index = entries.len();
    if next_index < all.len() {
        let message = &all[next_index];
        let summary = if !profile.summarize_code_fragments && message.content.contains("```") {
            // code fragments pass through verbatim when their
            // summarization is disabled
            message.content.clone()
        } else {
            summarizer.summarize(format!("{STEP_SUMMARY_PROMPT}{}", message.content))?
        };

        let step = next_index as u64 + 1;
        entries = store.append(LedgerEntry { step, summary })?;
        audit::append_event(
            paths,
            "ledger",
            "ok",
            &format!("category={category} advanced to step {step}"),
        )?;
    }

    let selected = select(&entries, &SelectionPolicy::from(profile));
    Ok(selected
        .into_iter()
        .map(|entry| Message::user(entry.summary))
        .collect())
}
