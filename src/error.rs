use thiserror::Error;

/// Failures that abort the current turn. Corrupt history records are not
/// represented here: the loader skips them with a warning instead.
#[derive(Debug, Error)]
pub enum DockError {
    #[error("configuration invalid or incomplete: {0}")]
    Config(String),
    #[error("remote call failed after {attempts} attempts: {reason}")]
    RemoteExhausted { attempts: usize, reason: String },
    #[error(
        "conversation history too large to summarize ({tokens} tokens, limit {limit}); \
         summarize manually or enable full_summary for this profile"
    )]
    HistoryBudget { tokens: usize, limit: usize },
    #[error("uploaded file missing: {0}")]
    MissingFile(String),
}
