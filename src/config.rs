//! Resolver configuration: the six delimiter strings and the recursion limit.
//!
//! Configuration is immutable once handed to a [`crate::NestMessageSource`] and is
//! shared read-only by every resolution call. It can be built in code or
//! loaded from YAML/JSON:
//!
//! ```yaml
//! delimiters:
//!   prefix: "#{"
//!   suffix: "}"
//! max-depth: 16
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::LoadError;

/// Default maximum depth of nested message-code lookups.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// The delimiter strings recognised by the scanner.
///
/// Delimiters must be non-empty. Overlapping delimiters are accepted but make
/// scanning order-dependent: the scanner checks escaper, quoter, prefix,
/// suffix, separator and argument marker in that priority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Delimiters {
    /// Opens an expression. Default `$(`.
    pub prefix: String,
    /// Closes an expression. Default `)`.
    pub suffix: String,
    /// Separates the code and parameters of an expression. Default `,`.
    pub separator: String,
    /// Introduces a positional argument reference. Default `$`.
    pub arg_marker: String,
    /// Makes the following character literal. Default `\`.
    pub escaper: String,
    /// Opens and closes a quoted literal. Default `"`.
    pub quoter: String,
}

impl Default for Delimiters {
    fn default() -> Self {
        Self {
            prefix: "$(".into(),
            suffix: ")".into(),
            separator: ",".into(),
            arg_marker: "$".into(),
            escaper: "\\".into(),
            quoter: "\"".into(),
        }
    }
}

impl Delimiters {
    /// Returns `(name, value)` pairs in a stable order, for validation and display.
    pub fn named(&self) -> [(&'static str, &str); 6] {
        [
            ("prefix", &self.prefix),
            ("suffix", &self.suffix),
            ("separator", &self.separator),
            ("arg-marker", &self.arg_marker),
            ("escaper", &self.escaper),
            ("quoter", &self.quoter),
        ]
    }
}

/// Full configuration for a message source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ResolverConfig {
    pub delimiters: Delimiters,
    /// Maximum chain length of nested message-code lookups.
    pub max_depth: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            delimiters: Delimiters::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ResolverConfig {
    /// Creates a configuration with custom delimiters and the default depth limit.
    pub fn with_delimiters(delimiters: Delimiters) -> Self {
        Self {
            delimiters,
            ..Self::default()
        }
    }

    /// Sets the recursion limit.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Parses and validates a YAML document.
    pub fn from_yaml_str(text: &str) -> Result<Self, LoadError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates a JSON document.
    pub fn from_json_str(text: &str) -> Result<Self, LoadError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration file; `.json` files are read as JSON, anything else as YAML.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
        if crate::catalog::is_json(path) {
            Self::from_json_str(&text)
        } else {
            Self::from_yaml_str(&text)
        }
    }

    /// Rejects empty delimiters and a zero recursion limit.
    pub fn validate(&self) -> Result<(), LoadError> {
        if let Some((name, _)) = self
            .delimiters
            .named()
            .into_iter()
            .find(|(_, value)| value.is_empty())
        {
            return Err(LoadError::InvalidConfig {
                message: format!("delimiter `{name}` must not be empty"),
            });
        }
        if self.max_depth == 0 {
            return Err(LoadError::InvalidConfig {
                message: "max-depth must be at least 1".into(),
            });
        }
        Ok(())
    }
}
