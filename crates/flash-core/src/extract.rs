//! Pattern-based field extraction from free-form request text.
//!
//! `extract` pulls a best-effort time expression and location phrase out of
//! whatever the user typed. It is pure and deterministic: same input, same
//! output, no I/O. A non-match is an empty string, never an error; absence
//! semantics (`Option`) belong to the [`Draft`](crate::draft::Draft), not
//! to this function.

use std::sync::LazyLock;

use regex::Regex;

/// Time expressions, first match wins:
/// relative-day + clock time ("today 5pm", "tomorrow at 9:30am"),
/// bare clock time with meridiem ("5pm", "9:30 AM"), or bare HH:MM.
static TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:today|tomorrow)(?:\s+at)?\s+\d{1,2}(?::\d{2})?\s?(?:am|pm)?|\b\d{1,2}(?::\d{2})?\s?(?:am|pm)\b|\b\d{1,2}:\d{2}\b",
    )
    .expect("time pattern is valid")
});

/// Location phrase: everything after a marker word (`at`, `in`, `@`) up to,
/// but excluding, the next sentence terminator or newline. With no
/// terminator the capture deliberately runs to end of string, so
/// "at Student Center around 5pm" yields the whole tail including the time
/// mention. Review screens rely on that over-capture; do not narrow the
/// pattern.
static LOCATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:at|in|@)\s+([^.,;!?\n]*)").expect("location pattern is valid")
});

/// Candidate field values pulled from raw text.
///
/// Empty strings mean "no match"; values are trimmed of surrounding
/// whitespace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extracted {
    pub when: String,
    pub where_: String,
}

/// Extract `when`/`where` candidates from `text`.
///
/// Matching is case-insensitive and left-to-right; the first time mention
/// and the first marker word win. No attempt is made to disambiguate
/// multiple mentions.
#[must_use]
pub fn extract(text: &str) -> Extracted {
    let when = TIME
        .find(text)
        .map_or_else(String::new, |m| m.as_str().trim().to_string());

    let where_ = LOCATION
        .captures(text)
        .and_then(|c| c.get(1))
        .map_or_else(String::new, |m| m.as_str().trim().to_string());

    Extracted { when, where_ }
}
