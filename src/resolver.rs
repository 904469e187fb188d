//! Nested template resolution.
//!
//! A template is scanned once, left to right, with an explicit token stack
//! tracking every open expression. When an expression closes, its message
//! code is looked up and the referenced template is resolved through a
//! re-entrant call to the [`Expander`]; that cross-message recursion is the
//! only true call recursion, and it is bounded by
//! [`ResolverConfig::max_depth`](crate::config::ResolverConfig::max_depth).
//!
//! Template syntax with the default delimiters:
//!
//! ```text
//! text        := (any char | escaped-char | quoted-text | expression)*
//! escaped-char:= "\", any-char
//! quoted-text := '"', (escaped-char | any-char-not-quote)*, '"'
//! expression  := "$(", code, (",", param)*, ")"
//! param       := text | ("$", digits)
//! ```

mod params;
mod scanner;
pub(crate) mod token;

use crate::catalog::Locale;
use crate::config::ResolverConfig;
use crate::errors::{NestError, SourceContext};
use crate::value::Value;

use scanner::Scanner;

/// Immutable state threaded through every call of one resolution.
#[derive(Debug, Clone, Copy)]
pub struct ResolutionContext<'a> {
    /// Locale used for every nested catalog lookup.
    pub locale: &'a Locale,
    /// Positional arguments that `$n` references index into.
    pub args: &'a [Value],
    /// Number of nested message lookups above this one.
    pub depth: usize,
}

impl<'a> ResolutionContext<'a> {
    /// Context for a top-level call.
    pub fn new(locale: &'a Locale, args: &'a [Value]) -> Self {
        Self {
            locale,
            args,
            depth: 0,
        }
    }

    /// Context for a nested lookup that receives `args` as its arguments.
    pub fn nested<'b>(&self, args: &'b [Value]) -> ResolutionContext<'b>
    where
        'a: 'b,
    {
        ResolutionContext {
            locale: self.locale,
            args,
            depth: self.depth + 1,
        }
    }
}

/// The re-entrant half of resolution: message code to fully resolved text.
pub trait Expander {
    /// Delimiters and limits used while scanning.
    fn config(&self) -> &ResolverConfig;

    /// Looks up `code` for `ctx.locale` and resolves its template with `ctx`.
    ///
    /// Returns `Ok(None)` when the catalog has no message under `code`; the
    /// caller reports that against the expression that referenced it.
    fn expand(&self, code: &str, ctx: &ResolutionContext<'_>) -> Result<Option<String>, NestError>;
}

/// Resolves every expression in `source.content` and returns the expanded text.
pub fn resolve<E: Expander + ?Sized>(
    expander: &E,
    source: &SourceContext,
    ctx: &ResolutionContext<'_>,
) -> Result<String, NestError> {
    Scanner::new(expander, source, ctx).run()
}
