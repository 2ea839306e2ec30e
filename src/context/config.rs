use crate::context::paths::DockPaths;
use crate::error::DockError;
use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrySettings {
    pub max_retries: usize,
    pub retry_delay_secs: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay_secs: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizerSettings {
    /// Model every summarization call (and token count) runs against.
    pub summary_model: String,
    /// Models with this prefix consume raw history directly and skip the
    /// full-summary call entirely.
    pub light_model_prefix: String,
}

impl Default for SummarizerSettings {
    fn default() -> Self {
        Self {
            summary_model: "gpt-3.5-turbo".to_string(),
            light_model_prefix: "gpt-3.5".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestSettings {
    pub timeout_secs: u64,
}

impl Default for RequestSettings {
    fn default() -> Self {
        Self { timeout_secs: 90 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    pub retry: RetrySettings,
    pub summarizer: SummarizerSettings,
    pub request: RequestSettings,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct PartialSettings {
    retry: Option<RetrySettings>,
    summarizer: Option<SummarizerSettings>,
    request: Option<RequestSettings>,
}

/// Per-profile knobs: target model, sampling, and the whole history/file
/// context policy. Profiles are read from `profiles.json5`; omitted fields
/// fall back to these defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub model: String,
    /// Conversation category override; defaults to the model name.
    pub mode: Option<String>,
    pub temperature: Option<f64>,
    pub max_response_tokens: Option<u32>,
    pub system_prompt: Option<String>,
    pub include_history: bool,
    pub keep_first_n: usize,
    pub keep_last_n: usize,
    pub max_turns: usize,
    pub max_tokens_summary_input: usize,
    pub summarize_txt_files: bool,
    pub summarize_code_fragments: bool,
    pub incremental_history: bool,
    pub full_summary: bool,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            model: "gpt-4.1-mini".to_string(),
            mode: None,
            temperature: None,
            max_response_tokens: None,
            system_prompt: None,
            include_history: true,
            keep_first_n: 3,
            keep_last_n: 5,
            max_turns: 12,
            max_tokens_summary_input: 3000,
            summarize_txt_files: false,
            summarize_code_fragments: true,
            incremental_history: true,
            full_summary: false,
        }
    }
}

impl Profile {
    pub fn category(&self) -> &str {
        self.mode.as_deref().unwrap_or(&self.model)
    }
}

fn env_or_u64(var: &str, fallback: u64) -> u64 {
    match env::var(var) {
        Ok(v) => v.trim().parse::<u64>().ok().unwrap_or(fallback),
        Err(_) => fallback,
    }
}

fn env_or_usize(var: &str, fallback: usize) -> usize {
    match env::var(var) {
        Ok(v) => v.trim().parse::<usize>().ok().unwrap_or(fallback),
        Err(_) => fallback,
    }
}

fn env_or_string(var: &str, fallback: &str) -> String {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => fallback.to_string(),
    }
}

fn validate(cfg: &Settings) -> Result<()> {
    if cfg.retry.max_retries == 0 {
        return Err(anyhow!("invalid retry budget: must be >= 1 attempt"));
    }
    if cfg.request.timeout_secs == 0 {
        return Err(anyhow!("invalid request timeout: must be >= 1 second"));
    }
    if cfg.summarizer.summary_model.trim().is_empty() {
        return Err(anyhow!("invalid summary model: cannot be empty"));
    }
    if cfg.summarizer.light_model_prefix.trim().is_empty() {
        // an empty prefix would match every model and disable summaries
        return Err(anyhow!("invalid light model prefix: cannot be empty"));
    }
    Ok(())
}

fn validate_profile(profile: &Profile) -> Result<()> {
    if profile.model.trim().is_empty() {
        return Err(anyhow!("invalid profile: model cannot be empty"));
    }
    if profile.max_turns == 0 {
        return Err(anyhow!("invalid profile: max_turns must be >= 1"));
    }
    if profile.max_tokens_summary_input == 0 {
        return Err(anyhow!(
            "invalid profile: max_tokens_summary_input must be >= 1"
        ));
    }
    if let Some(t) = profile.temperature
        && !(0.0..=2.0).contains(&t)
    {
        return Err(anyhow!(
            "invalid profile: temperature {t} outside 0.0..=2.0"
        ));
    }
    Ok(())
}

fn merge_file_settings(base: &mut Settings, path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }

    let raw = fs::read_to_string(path)?;
    let parsed: PartialSettings = toml::from_str(&raw)
        .map_err(|err| anyhow!("failed to parse settings {}: {err}", path.display()))?;
    if let Some(retry) = parsed.retry {
        base.retry = retry;
    }
    if let Some(summarizer) = parsed.summarizer {
        base.summarizer = summarizer;
    }
    if let Some(request) = parsed.request {
        base.request = request;
    }
    Ok(())
}

pub fn load_settings(paths: &DockPaths) -> Result<Settings> {
    let mut cfg = Settings::default();
    merge_file_settings(&mut cfg, &paths.config_file)?;

    cfg.retry.max_retries = env_or_usize("PROMPTDOCK_MAX_RETRIES", cfg.retry.max_retries);
    cfg.retry.retry_delay_secs =
        env_or_u64("PROMPTDOCK_RETRY_DELAY_SECS", cfg.retry.retry_delay_secs);
    cfg.request.timeout_secs =
        env_or_u64("PROMPTDOCK_REQUEST_TIMEOUT_SECS", cfg.request.timeout_secs);
    cfg.summarizer.summary_model = env_or_string(
        "PROMPTDOCK_SUMMARY_MODEL",
        &cfg.summarizer.summary_model,
    );
    cfg.summarizer.light_model_prefix = env_or_string(
        "PROMPTDOCK_LIGHT_MODEL_PREFIX",
        &cfg.summarizer.light_model_prefix,
    );

    validate(&cfg)?;
    Ok(cfg)
}

/// Resolve a named profile. No profiles file means the built-in defaults
/// for any name; a file that exists but does not define the name is a
/// configuration error.
pub fn load_profile(paths: &DockPaths, name: &str) -> Result<Profile> {
    if !paths.profiles_file.exists() {
        let profile = Profile::default();
        validate_profile(&profile)?;
        return Ok(profile);
    }

    let raw = fs::read_to_string(&paths.profiles_file)
        .with_context(|| format!("failed to read {}", paths.profiles_file.display()))?;
    let table: BTreeMap<String, Profile> = json5::from_str(&raw).map_err(|err| {
        anyhow!(
            "failed to parse profiles {}: {err}",
            paths.profiles_file.display()
        )
    })?;

    let profile = table.get(name).cloned().ok_or_else(|| {
        DockError::Config(format!(
            "profile `{name}` is not defined in {}",
            paths.profiles_file.display()
        ))
    })?;
    validate_profile(&profile)?;
    Ok(profile)
}
