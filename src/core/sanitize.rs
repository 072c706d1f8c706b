// src/core/sanitize.rs
use crate::config::consts::JUNK_PREFIX;

pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Drop the anti-JSON-hijacking marker some page versions prepend to their
/// data block. Leading whitespace is dropped; the marker must come first.
pub fn strip_junk_prefix(raw: &str) -> &str {
    let trimmed = raw.trim_start();
    trimmed.strip_prefix(JUNK_PREFIX).unwrap_or(trimmed)
}

/// Keep ASCII digits only. "45s" → "45", " 09" → "09".
pub fn digits_only(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Maximal runs of ASCII digits, in order. "9:42 /km" → ["9", "42"].
pub fn digit_runs(s: &str) -> Vec<&str> {
    let mut runs = Vec::new();
    let mut start: Option<usize> = None;
    for (i, b) in s.bytes().enumerate() {
        match (b.is_ascii_digit(), start) {
            (true, None) => start = Some(i),
            (false, Some(st)) => { runs.push(&s[st..i]); start = None; }
            _ => {}
        }
    }
    if let Some(st) = start { runs.push(&s[st..]); }
    runs
}
