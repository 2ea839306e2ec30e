use crate::context::config::Profile;

/// First-N + last-M truncation bounds on forwarded history.
#[derive(Debug, Clone, Copy)]
pub struct SelectionPolicy {
    pub keep_first_n: usize,
    pub keep_last_n: usize,
    pub max_turns: usize,
    pub full_summary: bool,
}

impl From<&Profile> for SelectionPolicy {
    fn from(profile: &Profile) -> Self {
        Self {
            keep_first_n: profile.keep_first_n,
            keep_last_n: profile.keep_last_n,
            max_turns: profile.max_turns,
            full_summary: profile.full_summary,
        }
    }
}

/// Deterministic history truncation. Sequences within `max_turns` (and all
/// sequences in full-summary mode) pass through unchanged; longer ones are
/// cut to the first `keep_first_n` plus the last `keep_last_n` elements.
///
/// When `keep_first_n + keep_last_n >= sequence.len()` the two windows
/// overlap and the overlapping elements appear twice in the output. That
/// duplication is deliberate historical behavior; do not dedupe here.
pub fn select<T: Clone>(sequence: &[T], policy: &SelectionPolicy) -> Vec<T> {
    if policy.full_summary || sequence.len() <= policy.max_turns {
        return sequence.to_vec();
    }

    let last_start = sequence.len().saturating_sub(policy.keep_last_n);
    sequence
        .iter()
        .take(policy.keep_first_n)
        .chain(sequence[last_start..].iter())
        .cloned()
        .collect()
}
