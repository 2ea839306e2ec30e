use crate::context::config::{Profile, Settings};
use crate::context::paths::DockPaths;
use crate::context::select::{SelectionPolicy, select};
use crate::context::{Message, Summarizer, history, tokens};
use crate::error::DockError;
use anyhow::Result;

const COMBINED_SUMMARY_PROMPT: &str =
    "You will receive a set of messages from a previous conversation. Summarize their \
     content clearly and concisely so that it can be reused as context for a new task.";

/// Stateless alternative to the incremental ledger: the selected history
/// plus, usually, one combined summary of it.
#[derive(Debug, Clone)]
pub struct FullHistory {
    pub selected: Vec<Message>,
    pub summary: Option<String>,
}

/// Load, select, and summarize the category's history in one remote call.
///
/// Lightweight-tier targets (configured prefix) skip summarization and
/// consume the selected raw history directly. Everything else passes the
/// token-budget gate first: a selection over `max_tokens_summary_input`
/// aborts the invocation instead of silently truncating, because dropped
/// context produces misleading completions.
pub fn prepare_full_history(
    summarizer: &Summarizer,
    paths: &DockPaths,
    category: &str,
    profile: &Profile,
    settings: &Settings,
) -> Result<FullHistory> {
    let all = history::load_history(paths, category)?;
    let selected = select(&all, &SelectionPolicy::from(profile));

    if profile
        .model
        .starts_with(&settings.summarizer.light_model_prefix)
    {
        return Ok(FullHistory {
            selected,
            summary: None,
        });
    }

    let token_count = tokens::count_message_tokens(&selected, summarizer.model)?;
    if token_count > profile.max_tokens_summary_input {
        return Err(DockError::HistoryBudget {
            tokens: token_count,
            limit: profile.max_tokens_summary_input,
        }
        .into());
    }

    let summary = summarizer.summarize_messages(COMBINED_SUMMARY_PROMPT, &selected)?;
    Ok(FullHistory {
        selected,
        summary: Some(summary),
    })
}

#[cfg(test)]
mod tests {
    use super::prepare_full_history;
    use crate::context::config::{Profile, Settings};
    use crate::context::paths::DockPaths;
    use crate::context::Summarizer;
    use crate::error::DockError;
    use crate::openai::testing::StubClient;
    use std::fs;
    use tempfile::tempdir;

    fn seed_history(paths: &DockPaths, category: &str, contents: &[String]) {
        let dir = paths.category_dir(category);
        fs::create_dir_all(&dir).expect("mkdir");
        let messages: Vec<serde_json::Value> = contents
            .iter()
            .map(|content| serde_json::json!({"role": "user", "content": content}))
            .collect();
        let record = serde_json::json!({ "messages": messages });
        fs::write(
            dir.join("2024-01-01_09-00__seed.json"),
            serde_json::to_string(&record).expect("serialize"),
        )
        .expect("write record");
    }

    fn summarizer(client: &StubClient) -> Summarizer<'_> {
        Summarizer {
            client,
            model: "gpt-3.5-turbo",
        }
    }

    #[test]
    fn light_tier_models_skip_summarization() {
        let tmp = tempdir().expect("tempdir");
        let paths = DockPaths::rooted(tmp.path());
        seed_history(&paths, "general", &["hi".to_string(), "there".to_string()]);

        let profile = Profile {
            model: "gpt-3.5-turbo".to_string(),
            ..Profile::default()
        };
        let client = StubClient::untouchable();

        let out = prepare_full_history(
            &summarizer(&client),
            &paths,
            "general",
            &profile,
            &Settings::default(),
        )
        .expect("prepare");

        assert_eq!(out.selected.len(), 2);
        assert!(out.summary.is_none());
        assert_eq!(client.call_count(), 0);
    }

    #[test]
    fn over_budget_history_aborts_before_any_remote_call() {
        let tmp = tempdir().expect("tempdir");
        let paths = DockPaths::rooted(tmp.path());
        let long = "a sentence with enough words to cost several tokens ".repeat(20);
        seed_history(&paths, "general", &[long.clone(), long]);

        let profile = Profile {
            max_tokens_summary_input: 10,
            ..Profile::default()
        };
        let client = StubClient::untouchable();

        let err = prepare_full_history(
            &summarizer(&client),
            &paths,
            "general",
            &profile,
            &Settings::default(),
        )
        .unwrap_err();

        assert_eq!(client.call_count(), 0);
        match err.downcast_ref::<DockError>() {
            Some(DockError::HistoryBudget { tokens, limit }) => {
                assert!(*tokens > 10);
                assert_eq!(*limit, 10);
            }
            other => panic!("expected HistoryBudget, got {other:?}"),
        }
    }

    #[test]
    fn selected_history_and_summary_are_returned_together() {
        let tmp = tempdir().expect("tempdir");
        let paths = DockPaths::rooted(tmp.path());
        let contents: Vec<String> = (0..20).map(|i| format!("m{i}")).collect();
        seed_history(&paths, "general", &contents);

        let profile = Profile::default();
        let client = StubClient::with_responses(vec![Ok("the combined summary".to_string())]);

        let out = prepare_full_history(
            &summarizer(&client),
            &paths,
            "general",
            &profile,
            &Settings::default(),
        )
        .expect("prepare");

        // 20 > max_turns=12, so first 3 + last 5
        assert_eq!(out.selected.len(), 8);
        assert_eq!(out.selected[0].content, "m0");
        assert_eq!(out.selected[7].content, "m19");
        assert_eq!(out.summary.as_deref(), Some("the combined summary"));

        // the remote call leads with the fixed instruction, history after
        let request = client.request(0);
        assert!(request.messages[0].content.starts_with("You will receive"));
        assert_eq!(request.messages.len(), 9);
        assert_eq!(request.temperature, Some(0.0));
    }

    #[test]
    fn full_summary_flag_feeds_the_whole_history_to_the_call() {
        let tmp = tempdir().expect("tempdir");
        let paths = DockPaths::rooted(tmp.path());
        let contents: Vec<String> = (0..20).map(|i| format!("m{i}")).collect();
        seed_history(&paths, "general", &contents);

        let profile = Profile {
            full_summary: true,
            ..Profile::default()
        };
        let client = StubClient::with_responses(vec![Ok("summary".to_string())]);

        let out = prepare_full_history(
            &summarizer(&client),
            &paths,
            "general",
            &profile,
            &Settings::default(),
        )
        .expect("prepare");
        assert_eq!(out.selected.len(), 20);
    }
}
