//! Numeric response parsing for the rc interface.
//!
//! Responses arrive intermixed with prompt characters (`"> "`), stray
//! whitespace and `\r\n` terminators, and are occasionally truncated.

use std::sync::LazyLock;

use regex::Regex;

static LEADING_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[>\s]*(\d+)").expect("leading number pattern is valid")
});

/// Extract the leading run of digits after any prompt noise.
///
/// Returns `None` when there is no digit run, or when it does not fit a `u64`.
pub fn parse_leading_number(line: &str) -> Option<u64> {
    let line = line.trim_end_matches(['\r', '\n']);
    LEADING_NUMBER
        .captures(line)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}
