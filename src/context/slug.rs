pub const MAX_SLUG_CHARS: usize = 50;

/// Reduce free text to a filename-safe slug: ASCII alphanumerics
/// lowercased, everything else collapsed to single hyphens, capped at
/// `max_chars`.
pub fn slugify(input: &str, max_chars: usize) -> String {
    let mut out = String::with_capacity(input.len());
    let mut prev_dash = false;
    for ch in input.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
            prev_dash = false;
        } else if !prev_dash && !out.is_empty() {
            out.push('-');
            prev_dash = true;
        }
    }

    let capped: String = out.trim_matches('-').chars().take(max_chars).collect();
    capped.trim_end_matches('-').to_string()
}
