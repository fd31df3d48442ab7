//! Category detection for request descriptions.
//!
//! The wizard treats the classifier as a black box behind the [`Classify`]
//! trait: text in, one label from the closed [`Category`] set out. The
//! bundled [`KeywordClassifier`] is a plain keyword-table scan; callers are
//! expected never to classify empty/whitespace text (they substitute
//! [`Category::Other`] themselves).

use std::fmt;

use serde::{Deserialize, Serialize};

/// The closed label set for requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Electronics,
    Books,
    Health,
    Clothing,
    Food,
    #[default]
    Other,
}

impl Category {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Electronics => "Electronics",
            Self::Books => "Books",
            Self::Health => "Health",
            Self::Clothing => "Clothing",
            Self::Food => "Food",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps a raw description to a [`Category`].
pub trait Classify {
    fn classify(&self, text: &str) -> Category;
}

/// Keyword table, checked in order; the first category with a hit wins.
const KEYWORDS: &[(Category, &[&str])] = &[
    (
        Category::Electronics,
        &["charger", "laptop", "macbook", "cable", "adapter", "phone", "calculator", "headphones"],
    ),
    (
        Category::Books,
        &["textbook", "book", "notes", "notebook", "novel"],
    ),
    (
        Category::Health,
        &["ibuprofen", "advil", "tylenol", "medicine", "painkiller", "bandage", "band-aid"],
    ),
    (
        Category::Clothing,
        &["jacket", "hoodie", "coat", "umbrella", "gloves", "scarf"],
    ),
    (
        Category::Food,
        &["food", "snack", "coffee", "pizza", "water", "drink"],
    ),
];

/// Case-insensitive substring classifier over a fixed keyword table.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordClassifier;

impl Classify for KeywordClassifier {
    fn classify(&self, text: &str) -> Category {
        let haystack = text.to_lowercase();
        for (category, keywords) in KEYWORDS {
            if keywords.iter().any(|kw| haystack.contains(kw)) {
                return *category;
            }
        }
        Category::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_known_keywords() {
        let c = KeywordClassifier;
        assert_eq!(c.classify("MacBook Pro charger at Clough Commons"), Category::Electronics);
        assert_eq!(c.classify("Need a calculus textbook tomorrow"), Category::Books);
        assert_eq!(c.classify("Looking for ibuprofen, headache"), Category::Health);
        assert_eq!(c.classify("Winter jacket, size M"), Category::Clothing);
        assert_eq!(c.classify("anyone have coffee"), Category::Food);
    }

    #[test]
    fn unknown_text_is_other() {
        assert_eq!(KeywordClassifier.classify("something unusual"), Category::Other);
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(KeywordClassifier.classify("CHARGER please"), Category::Electronics);
    }

    #[test]
    fn category_serde_round_trip() {
        let raw = serde_json::to_string(&Category::Electronics).expect("serialize");
        assert_eq!(raw, "\"electronics\"");
        let back: Category = serde_json::from_str(&raw).expect("deserialize");
        assert_eq!(back, Category::Electronics);
    }

    #[test]
    fn default_is_other() {
        assert_eq!(Category::default(), Category::Other);
    }
}
