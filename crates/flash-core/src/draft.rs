//! The in-progress request draft and its auto-fill bookkeeping.
//!
//! A [`Draft`] is the single source of truth for one request being
//! composed. `when`/`where` are the only fields with auto-vs-manual
//! provenance, tracked by [`DirtyFlags`]: once the user has typed a value
//! into one of them, extraction passes must leave it alone until the user
//! clears it again.

use serde::{Deserialize, Serialize};

use crate::classify::Category;
use crate::extract::Extracted;

/// The accumulating structured representation of one in-progress request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Draft {
    pub description: String,
    /// Always derived from `description` by the classifier; never edited
    /// directly by the user. `Other` while the description is empty.
    pub category: Category,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub when: Option<String>,
    #[serde(rename = "where", skip_serializing_if = "Option::is_none")]
    pub where_: Option<String>,
}

impl Draft {
    /// Structurally empty: nothing worth persisting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.description.is_empty()
            && self.category == Category::Other
            && self.when.is_none()
            && self.where_.is_none()
    }

    /// Merge one extraction result into the draft.
    ///
    /// Fields the user has not touched take the fresh value, including an
    /// empty one, which clears a stale auto-fill when the source text no
    /// longer yields a match. Dirty fields keep the user's value and the
    /// extraction result is discarded.
    pub fn apply_extraction(&mut self, extracted: &Extracted, dirty: DirtyFlags) {
        if !dirty.when {
            self.when = non_empty(&extracted.when);
        }
        if !dirty.where_ {
            self.where_ = non_empty(&extracted.where_);
        }
    }

    /// Record a direct user edit of `when`.
    ///
    /// A non-empty value marks the field dirty; clearing it re-enables
    /// auto-fill on the next extraction pass. The value is stored as typed
    /// (untrimmed); trimming happens at validation time.
    pub fn set_when(&mut self, value: &str, dirty: &mut DirtyFlags) {
        dirty.when = !value.is_empty();
        self.when = raw_value(value);
    }

    /// Record a direct user edit of `where`. Same rules as [`Self::set_when`].
    pub fn set_where(&mut self, value: &str, dirty: &mut DirtyFlags) {
        dirty.where_ = !value.is_empty();
        self.where_ = raw_value(value);
    }
}

fn raw_value(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Per-field auto-fill suppression. `true` means the current value was set
/// or confirmed by the user and extraction must not replace it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DirtyFlags {
    pub when: bool,
    pub where_: bool,
}
