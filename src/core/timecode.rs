//! core/timecode.rs
//! `mm:ss` start-time strings <-> whole seconds.
//!
//! - Both parts must be plain unsigned integers.
//! - Seconds may exceed 59 ("1:75" is 135s); the total is `minutes*60 + seconds`.
//! - Nothing is clamped or guessed: anything else is rejected.

/// Parse a `minutes:seconds` string into total seconds.
///
/// Returns `None` for any malformed input; the caller attaches the track index
/// and raw string when turning that into an error.
pub fn parse_time(raw: &str) -> Option<u64> {
    let (minutes, seconds) = raw.trim().split_once(':')?;
    let minutes = parse_component(minutes)?;
    let seconds = parse_component(seconds)?;

    minutes.checked_mul(60)?.checked_add(seconds)
}

/// Render whole seconds as `m:ss`.
/// Ex: 95 -> "1:35", 5 -> "0:05"
pub fn format_time(total_seconds: u64) -> String {
    format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
}

fn parse_component(s: &str) -> Option<u64> {
    let s = s.trim();
    // `u64::from_str` would accept a leading '+'.
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse::<u64>().ok()
}
