use crate::context::assemble::assemble;
use crate::context::config::{Profile, Settings};
use crate::context::ingest::FileReference;
use crate::context::paths::DockPaths;
use crate::context::{Message, Summarizer, audit, store};
use crate::openai::client::{ChatCompletion, CompletionRequest};
use anyhow::Result;
use std::path::PathBuf;

#[derive(Debug)]
pub struct TurnOutcome {
    pub response: String,
    pub record_path: PathBuf,
}

/// One complete turn: assemble context, call the completion service, and
/// persist the exchange. The profile's system prompt is a per-turn
/// directive: it is prepended to the outgoing call and stored with the
/// turn, but the assembler never sees it and the loader never returns it.
pub fn run_turn(
    client: &dyn ChatCompletion,
    paths: &DockPaths,
    settings: &Settings,
    profile: &Profile,
    user_prompt: &str,
    files: &[FileReference],
) -> Result<TurnOutcome> {
    let category = profile.category().to_string();
    let summarizer = Summarizer {
        client,
        model: &settings.summarizer.summary_model,
    };

    let assembled = assemble(
        &summarizer,
        paths,
        settings,
        profile,
        &category,
        user_prompt,
        files,
    )?;

    let mut call_messages = Vec::with_capacity(assembled.len() + 1);
    if let Some(system_prompt) = profile.system_prompt.as_deref()
        && !system_prompt.trim().is_empty()
    {
        call_messages.push(Message::system(system_prompt));
    }
    call_messages.extend(assembled);

    let response = client.complete(&CompletionRequest {
        model: profile.model.clone(),
        messages: call_messages,
        temperature: profile.temperature,
        max_tokens: profile.max_response_tokens,
    })?;

    let record_path = store::save_turn(paths, &category, profile, user_prompt, &response)?;
    audit::append_event(
        paths,
        "turn",
        "ok",
        &format!("category={category} record={}", record_path.display()),
    )?;

    Ok(TurnOutcome {
        response,
        record_path,
    })
}
