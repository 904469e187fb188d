//! The message source: catalog lookup followed by nested resolution.

use miette::SourceSpan;
use tracing::trace_span;

use crate::catalog::{interpolate, Locale, MessageCatalog};
use crate::config::ResolverConfig;
use crate::errors::{ErrorReporting, LoadError, NestError, SourceContext};
use crate::resolver::{self, Expander, ResolutionContext};
use crate::value::Value;

/// A message request: candidate codes tried in order, arguments and an
/// optional default message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageResolvable {
    pub codes: Vec<String>,
    pub arguments: Vec<Value>,
    pub default_message: Option<String>,
}

impl MessageResolvable {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            codes: vec![code.into()],
            ..Self::default()
        }
    }

    pub fn with_codes<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            codes: codes.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.arguments.push(value.into());
        self
    }

    pub fn args<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.arguments.extend(values.into_iter().map(Into::into));
        self
    }

    pub fn default_message(mut self, message: impl Into<String>) -> Self {
        self.default_message = Some(message.into());
        self
    }
}

/// Wraps a [`MessageCatalog`] so that every message it returns has its
/// nested expressions resolved.
///
/// The source holds no per-call state and can be shared across threads when
/// the catalog can.
#[derive(Debug, Clone)]
pub struct NestMessageSource<C> {
    catalog: C,
    config: ResolverConfig,
}

impl<C: MessageCatalog> NestMessageSource<C> {
    /// Creates a source with the default delimiters.
    pub fn new(catalog: C) -> Self {
        Self {
            catalog,
            config: ResolverConfig::default(),
        }
    }

    /// Creates a source with a custom configuration, rejecting empty
    /// delimiters and a zero depth limit.
    pub fn with_config(catalog: C, config: ResolverConfig) -> Result<Self, LoadError> {
        config.validate()?;
        Ok(Self { catalog, config })
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Looks up `code` and resolves its template with `args`.
    pub fn get_message(
        &self,
        code: &str,
        args: &[Value],
        locale: &Locale,
    ) -> Result<String, NestError> {
        let _span = trace_span!("get_message", code, %locale).entered();
        let ctx = ResolutionContext::new(locale, args);
        self.lookup_and_resolve(code, &ctx)?
            .ok_or_else(|| CodeSite::new(code).not_found(locale))
    }

    /// Like [`get_message`](Self::get_message), resolving `default` when the
    /// catalog has no message under `code`.
    pub fn get_message_or(
        &self,
        code: &str,
        args: &[Value],
        default: &str,
        locale: &Locale,
    ) -> Result<String, NestError> {
        let _span = trace_span!("get_message_or", code, %locale).entered();
        let ctx = ResolutionContext::new(locale, args);
        let template = self.catalog.lookup_or_default(code, args, default, locale);
        resolver::resolve(self, &SourceContext::for_code(code, template), &ctx)
    }

    /// Tries each code of `resolvable` in order, then its default message.
    pub fn get_resolvable(
        &self,
        resolvable: &MessageResolvable,
        locale: &Locale,
    ) -> Result<String, NestError> {
        let _span = trace_span!("get_resolvable", codes = ?resolvable.codes, %locale).entered();
        let ctx = ResolutionContext::new(locale, &resolvable.arguments);
        for code in &resolvable.codes {
            if let Some(text) = self.lookup_and_resolve(code, &ctx)? {
                return Ok(text);
            }
        }
        if let Some(default) = &resolvable.default_message {
            let template = interpolate(default, &resolvable.arguments);
            return resolver::resolve(self, &SourceContext::inline(template), &ctx);
        }
        let last = resolvable.codes.last().map(String::as_str).unwrap_or_default();
        Err(CodeSite::new(last).not_found(locale))
    }

    /// Resolves a raw template that did not come from the catalog.
    pub fn resolve_template(
        &self,
        template: &str,
        args: &[Value],
        locale: &Locale,
    ) -> Result<String, NestError> {
        let ctx = ResolutionContext::new(locale, args);
        resolver::resolve(self, &SourceContext::inline(template), &ctx)
    }

    fn lookup_and_resolve(
        &self,
        code: &str,
        ctx: &ResolutionContext<'_>,
    ) -> Result<Option<String>, NestError> {
        let Some(template) = self.catalog.lookup(code, ctx.args, ctx.locale) else {
            return Ok(None);
        };
        resolver::resolve(self, &SourceContext::for_code(code, template), ctx).map(Some)
    }
}

impl<C: MessageCatalog> Expander for NestMessageSource<C> {
    fn config(&self) -> &ResolverConfig {
        &self.config
    }

    fn expand(&self, code: &str, ctx: &ResolutionContext<'_>) -> Result<Option<String>, NestError> {
        self.lookup_and_resolve(code, ctx)
    }
}

/// Error site for a code requested directly rather than from a template.
struct CodeSite {
    source: SourceContext,
}

impl CodeSite {
    fn new(code: &str) -> Self {
        Self {
            source: SourceContext::for_code(code, code),
        }
    }

    fn not_found(&self, locale: &Locale) -> NestError {
        let span = SourceSpan::from(0..self.source.content.len());
        self.message_not_found(&self.source.content, &locale.to_string(), span)
    }
}

impl ErrorReporting for CodeSite {
    fn source_context(&self) -> &SourceContext {
        &self.source
    }
}
