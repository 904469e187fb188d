//! Locale tags and their fallback chains.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A BCP 47-style locale tag such as `en`, `de-CH` or `zh-Hant-TW`.
///
/// Underscores are accepted as separators (`en_US`) and normalized to
/// hyphens. The empty tag (also spelled `root`) is the root locale, the last
/// stop of every fallback chain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Locale(String);

impl Locale {
    pub fn new(tag: impl AsRef<str>) -> Self {
        let tag = tag.as_ref().trim();
        if tag.eq_ignore_ascii_case("root") {
            return Self::root();
        }
        Locale(tag.replace('_', "-"))
    }

    pub fn root() -> Self {
        Locale(String::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn tag(&self) -> &str {
        &self.0
    }

    /// The primary language subtag, e.g. `de` for `de-CH`.
    pub fn language(&self) -> &str {
        self.0.split('-').next().unwrap_or_default()
    }

    /// The locale with its last subtag removed; `None` for the root locale.
    pub fn parent(&self) -> Option<Locale> {
        if self.is_root() {
            return None;
        }
        Some(match self.0.rfind('-') {
            Some(idx) => Locale(self.0[..idx].to_string()),
            None => Locale::root(),
        })
    }

    /// This locale followed by each parent, ending with the root locale.
    pub fn fallback_chain(&self) -> Vec<Locale> {
        let mut chain = vec![self.clone()];
        let mut current = self.clone();
        while let Some(parent) = current.parent() {
            chain.push(parent.clone());
            current = parent;
        }
        chain
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            write!(f, "root")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl FromStr for Locale {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Locale::new(s))
    }
}

impl From<&str> for Locale {
    fn from(tag: &str) -> Self {
        Locale::new(tag)
    }
}

impl From<String> for Locale {
    fn from(tag: String) -> Self {
        Locale::new(tag)
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_separators_and_root() {
        assert_eq!(Locale::new("en_US").tag(), "en-US");
        assert!(Locale::new("root").is_root());
        assert!(Locale::new("").is_root());
        assert_eq!(Locale::root().to_string(), "root");
    }

    #[test]
    fn fallback_chain_ends_at_root() {
        let chain = Locale::new("zh-Hant-TW").fallback_chain();
        let tags: Vec<&str> = chain.iter().map(Locale::tag).collect();
        assert_eq!(tags, vec!["zh-Hant-TW", "zh-Hant", "zh", ""]);
        assert_eq!(Locale::root().fallback_chain(), vec![Locale::root()]);
    }

    #[test]
    fn language_subtag() {
        assert_eq!(Locale::new("de-CH").language(), "de");
        assert_eq!(Locale::root().language(), "");
    }
}
