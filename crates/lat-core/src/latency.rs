//! Latency extraction — pulls the `Time Taken in ms= N` value out of a message.

/// Literal text that precedes the latency value in access-log messages.
pub const LATENCY_MARKER: &str = "Time Taken in ms= ";

/// Return the latency reported in `message`, in milliseconds.
///
/// The first marker occurrence that is immediately followed by at least one
/// ASCII digit wins; later occurrences are ignored. A marker followed by
/// anything else is skipped. Values too large for `u64` are treated as absent.
pub fn extract_latency(message: &str) -> Option<u64> {
    message
        .match_indices(LATENCY_MARKER)
        .map(|(at, _)| &message[at + LATENCY_MARKER.len()..])
        .map(leading_digits)
        .find(|digits| !digits.is_empty())
        .and_then(|digits| digits.parse().ok())
}

fn leading_digits(s: &str) -> &str {
    let end = s
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len());
    &s[..end]
}
