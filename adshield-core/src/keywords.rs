//! Coarse keyword matching for URLs and field names

use serde::{Deserialize, Serialize};

/// Keywords the capture script has always used to flag ad traffic.
pub const DEFAULT_AD_KEYWORDS: &[&str] = &[
    "splash",
    "startup",
    "launch",
    "ad",
    "ads",
    "banner",
    "promotion",
    "marketing",
    "commercial",
    "advertise",
    "popup",
    "interstitial",
    "preload",
];

/// A set of lower-case keyword substrings.
///
/// Matching is plain substring containment after lower-casing the candidate,
/// so `"header"` matches `"ad"`. False positives are expected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct KeywordSet {
    keywords: Vec<String>,
}

impl KeywordSet {
    /// Build a set, lower-casing every keyword and dropping empty or duplicate ones.
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for keyword in keywords {
            let keyword = keyword.as_ref().trim().to_lowercase();
            if !keyword.is_empty() && !normalized.contains(&keyword) {
                normalized.push(keyword);
            }
        }
        Self {
            keywords: normalized,
        }
    }

    /// Check whether any keyword occurs in `text`, ignoring case
    pub fn matches(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.keywords.iter().any(|kw| lower.contains(kw.as_str()))
    }

    /// First keyword found in `text`, if any
    pub fn first_match(&self, text: &str) -> Option<&str> {
        let lower = text.to_lowercase();
        self.keywords
            .iter()
            .find(|kw| lower.contains(kw.as_str()))
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(String::as_str)
    }
}

impl Default for KeywordSet {
    fn default() -> Self {
        Self::new(DEFAULT_AD_KEYWORDS)
    }
}

impl From<Vec<String>> for KeywordSet {
    fn from(keywords: Vec<String>) -> Self {
        Self::new(keywords)
    }
}

impl From<KeywordSet> for Vec<String> {
    fn from(set: KeywordSet) -> Self {
        set.keywords
    }
}
