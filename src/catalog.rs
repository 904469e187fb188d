//! Message catalogs: where raw templates come from.
//!
//! The resolver never reads templates itself; it asks a [`MessageCatalog`]
//! for the raw template of a code in a locale. [`MapCatalog`] is the bundled
//! in-memory implementation, loadable from YAML or JSON files.
//!
//! A catalog document maps locales to `code → template` tables, with `root`
//! naming the bundle every locale falls back to:
//!
//! ```yaml
//! root:
//!   greeting: "Hello, {0}!"
//! de:
//!   greeting: "Hallo, {0}!"
//! ```

mod locale;

pub use locale::Locale;

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, trace};
use walkdir::WalkDir;

use crate::errors::LoadError;
use crate::value::Value;

/// Base file name of catalog bundles inside a catalog directory.
pub const BUNDLE_BASENAME: &str = "messages";

// ============================================================================
// CATALOG TRAIT
// ============================================================================

/// Source of raw message templates.
pub trait MessageCatalog {
    /// Returns the template for `code` in `locale`, or `None` when there is none.
    ///
    /// Implementations may pre-format the template with `args`; the result is
    /// scanned for nested expressions afterwards.
    fn lookup(&self, code: &str, args: &[Value], locale: &Locale) -> Option<String>;

    /// Like [`lookup`](Self::lookup), falling back to `default` with its `{n}`
    /// placeholders substituted.
    fn lookup_or_default(&self, code: &str, args: &[Value], default: &str, locale: &Locale) -> String {
        self.lookup(code, args, locale)
            .unwrap_or_else(|| interpolate(default, args))
    }
}

impl<C: MessageCatalog + ?Sized> MessageCatalog for &C {
    fn lookup(&self, code: &str, args: &[Value], locale: &Locale) -> Option<String> {
        (**self).lookup(code, args, locale)
    }
}

impl<C: MessageCatalog + ?Sized> MessageCatalog for Box<C> {
    fn lookup(&self, code: &str, args: &[Value], locale: &Locale) -> Option<String> {
        (**self).lookup(code, args, locale)
    }
}

impl<C: MessageCatalog + ?Sized> MessageCatalog for Arc<C> {
    fn lookup(&self, code: &str, args: &[Value], locale: &Locale) -> Option<String> {
        (**self).lookup(code, args, locale)
    }
}

/// Adapts a lookup closure into a catalog.
pub struct FnCatalog<F>(pub F);

impl<F> MessageCatalog for FnCatalog<F>
where
    F: Fn(&str, &[Value], &Locale) -> Option<String>,
{
    fn lookup(&self, code: &str, args: &[Value], locale: &Locale) -> Option<String> {
        (self.0)(code, args, locale)
    }
}

// ============================================================================
// MAP CATALOG
// ============================================================================

/// In-memory catalog of per-locale message tables.
#[derive(Debug, Clone, Default)]
pub struct MapCatalog {
    bundles: BTreeMap<Locale, BTreeMap<String, String>>,
}

impl MapCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a message, returning the template it replaced.
    pub fn insert(
        &mut self,
        locale: impl Into<Locale>,
        code: impl Into<String>,
        template: impl Into<String>,
    ) -> Option<String> {
        self.bundles
            .entry(locale.into())
            .or_default()
            .insert(code.into(), template.into())
    }

    pub fn with_message(
        mut self,
        locale: impl Into<Locale>,
        code: impl Into<String>,
        template: impl Into<String>,
    ) -> Self {
        self.insert(locale, code, template);
        self
    }

    pub fn with_root_message(self, code: impl Into<String>, template: impl Into<String>) -> Self {
        self.with_message(Locale::root(), code, template)
    }

    /// Copies every message of `other` into this catalog, replacing duplicates.
    pub fn merge(&mut self, other: MapCatalog) {
        for (locale, messages) in other.bundles {
            self.bundles.entry(locale).or_default().extend(messages);
        }
    }

    /// The raw template for `code`, searching the locale's fallback chain.
    /// Returns the locale that supplied it alongside.
    pub fn raw_template(&self, code: &str, locale: &Locale) -> Option<(&Locale, &str)> {
        locale.fallback_chain().into_iter().find_map(|candidate| {
            let (found, messages) = self.bundles.get_key_value(&candidate)?;
            messages.get(code).map(|t| (found, t.as_str()))
        })
    }

    /// Locales with at least one bundle, in sorted order.
    pub fn locales(&self) -> impl Iterator<Item = &Locale> {
        self.bundles.keys()
    }

    /// Every code visible from `locale`, including inherited ones, sorted.
    pub fn codes(&self, locale: &Locale) -> Vec<&str> {
        let mut codes: Vec<&str> = locale
            .fallback_chain()
            .iter()
            .filter_map(|l| self.bundles.get(l))
            .flat_map(|messages| messages.keys().map(String::as_str))
            .collect();
        codes.sort_unstable();
        codes.dedup();
        codes
    }

    /// Total number of messages across all locales.
    pub fn len(&self) -> usize {
        self.bundles.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ------------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------------

    /// Parses a `locale → {code → template}` YAML document.
    pub fn from_yaml_str(text: &str) -> Result<Self, LoadError> {
        let document: BTreeMap<String, BTreeMap<String, String>> = serde_yaml::from_str(text)?;
        Ok(Self::from_document(document))
    }

    /// Parses a `locale → {code → template}` JSON document.
    pub fn from_json_str(text: &str) -> Result<Self, LoadError> {
        let document: BTreeMap<String, BTreeMap<String, String>> = serde_json::from_str(text)?;
        Ok(Self::from_document(document))
    }

    /// Loads a catalog file (by extension) or a bundle directory.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        if path.is_dir() {
            return Self::load_dir(path);
        }
        let text = std::fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
        let catalog = if is_json(path) {
            Self::from_json_str(&text)?
        } else {
            Self::from_yaml_str(&text)?
        };
        info!(
            path = %path.display(),
            locales = catalog.bundles.len(),
            messages = catalog.len(),
            "loaded message catalog"
        );
        Ok(catalog)
    }

    /// Loads every `messages.*` and `messages_<locale>.*` bundle below `dir`.
    ///
    /// Each bundle is a flat `code → template` table in YAML (`.yaml`,
    /// `.yml`) or JSON (`.json`). Files are read in sorted path order, so a
    /// later bundle for the same locale overrides duplicate codes.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, LoadError> {
        let dir = dir.as_ref();
        let mut bundles = Vec::new();
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.map_err(|e| LoadError::InvalidCatalog {
                path: dir.to_path_buf(),
                message: format!("failed to walk directory: {e}"),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            match bundle_locale(entry.path()) {
                Some(locale) => bundles.push((entry.path().to_path_buf(), locale)),
                None => trace!(path = %entry.path().display(), "skipping non-bundle file"),
            }
        }

        let mut catalog = MapCatalog::new();
        for (path, locale) in bundles {
            let messages = read_bundle(&path)?;
            debug!(path = %path.display(), %locale, count = messages.len(), "loaded bundle");
            catalog.bundles.entry(locale).or_default().extend(messages);
        }
        info!(
            dir = %dir.display(),
            locales = catalog.bundles.len(),
            messages = catalog.len(),
            "loaded message catalog"
        );
        Ok(catalog)
    }

    fn from_document(document: BTreeMap<String, BTreeMap<String, String>>) -> Self {
        let mut catalog = MapCatalog::new();
        for (tag, messages) in document {
            catalog
                .bundles
                .entry(Locale::new(tag))
                .or_default()
                .extend(messages);
        }
        catalog
    }
}

impl MessageCatalog for MapCatalog {
    fn lookup(&self, code: &str, args: &[Value], locale: &Locale) -> Option<String> {
        match self.raw_template(code, locale) {
            Some((found, template)) => {
                if found != locale {
                    debug!(code, requested = %locale, found = %found, "message resolved from fallback locale");
                }
                Some(interpolate(template, args))
            }
            None => {
                debug!(code, %locale, "message not in catalog");
                None
            }
        }
    }
}

// ============================================================================
// HELPERS
// ============================================================================

/// Replaces `{n}` placeholders with the natural string form of `args[n]`.
///
/// Placeholders whose index is out of range or not a plain decimal number
/// are left untouched. This is positional substitution only; no locale-aware
/// number or date formatting happens here.
pub fn interpolate(template: &str, args: &[Value]) -> String {
    if args.is_empty() || !template.contains('{') {
        return template.to_string();
    }
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let placeholder = after.find('}').and_then(|close| {
            let digits = &after[..close];
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            let index: usize = digits.parse().ok()?;
            args.get(index).map(|value| (value, close))
        });
        match placeholder {
            Some((value, close)) => {
                let _ = write!(out, "{value}");
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

pub(crate) fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn is_bundle_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| matches!(ext.to_ascii_lowercase().as_str(), "yaml" | "yml" | "json"))
}

/// `messages.yaml` → root, `messages_de_CH.yaml` → `de-CH`, anything else → `None`.
fn bundle_locale(path: &Path) -> Option<Locale> {
    if !is_bundle_extension(path) {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    if stem == BUNDLE_BASENAME {
        return Some(Locale::root());
    }
    let tag = stem.strip_prefix(BUNDLE_BASENAME)?.strip_prefix('_')?;
    (!tag.is_empty()).then(|| Locale::new(tag))
}

fn read_bundle(path: &Path) -> Result<BTreeMap<String, String>, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
    let messages = if is_json(path) {
        serde_json::from_str(&text)?
    } else {
        serde_yaml::from_str(&text)?
    };
    Ok(messages)
}
