//! Response sanitizer
//!
//! Recovers the JSON span from a model completion. Models like to wrap their
//! answer in markdown fences or surround it with prose; this strips both.
//! Malformed JSON inside the span is left alone for the validator to report.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Fence opener or closer, with an optional info string (```json, ```JSON5, ```).
static FENCE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"```[A-Za-z0-9_+.-]*").unwrap());

/// Extract a best-effort JSON candidate from raw provider text.
///
/// 1. Remove fence markers anywhere in the text
/// 2. Drop everything before the first `{` or `[`
/// 3. Drop everything after the last `}` or `]`
/// 4. Trim
///
/// Returns an empty string when no opening and closing delimiter pair exists.
pub fn sanitize(raw: &str) -> String {
    let unfenced = FENCE_RE.replace_all(raw, "");

    let Some(start) = unfenced.find(['{', '[']) else {
        debug!(raw_len = raw.len(), "no JSON opener in response");
        return String::new();
    };
    let Some(end) = unfenced.rfind(['}', ']']) else {
        debug!(raw_len = raw.len(), "no JSON closer in response");
        return String::new();
    };
    if end < start {
        return String::new();
    }

    // Both delimiters are ASCII, so the byte offsets are char boundaries.
    let candidate = unfenced[start..=end].trim().to_string();
    debug!(
        raw_len = raw.len(),
        candidate_len = candidate.len(),
        "sanitized response"
    );
    candidate
}
