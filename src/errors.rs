//! nestmsg Error Handling
//!
//! Resolution failures are reported as a single [`NestError`] carrying the
//! failing template, the offset where scanning stopped and a classified
//! [`ErrorKind`]. Errors are always terminal for the resolution call that
//! raised them; no partial output is ever returned.
//!
//! Loading catalogs and configuration files fails with [`LoadError`] instead,
//! since those failures have no template to point into.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceSpan};
use thiserror::Error;

// ============================================================================
// SOURCE CONTEXT - Error reporting infrastructure
// ============================================================================

/// The template being scanned when an error occurred, with a display name.
#[derive(Debug, Clone)]
pub struct SourceContext {
    pub name: String,
    pub content: String,
}

impl SourceContext {
    /// Source context for the template registered under `code`.
    pub fn for_code(code: &str, content: impl Into<String>) -> Self {
        Self {
            name: format!("message `{code}`"),
            content: content.into(),
        }
    }

    /// Source context for a template supplied directly by the caller.
    pub fn inline(content: impl Into<String>) -> Self {
        Self {
            name: "template".to_string(),
            content: content.into(),
        }
    }

    /// Convert to NamedSource for use with miette error reporting
    pub fn to_named_source(&self) -> Arc<NamedSource<String>> {
        Arc::new(NamedSource::new(self.name.clone(), self.content.clone()))
    }
}

// ============================================================================
// ERROR TYPES
// ============================================================================

/// The single resolution error type.
#[derive(Debug)]
pub struct NestError {
    /// What went wrong
    pub kind: ErrorKind,
    /// Where it happened
    pub source_info: SourceInfo,
    /// How to help
    pub diagnostic_info: DiagnosticInfo,
}

/// Every way a resolution call can fail.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ErrorKind {
    #[error("template cannot end with the escaper")]
    UnterminatedEscape,
    #[error("quote is not closed")]
    UnterminatedQuote,
    #[error("prefix and suffix do not match ({open} expression(s) left open)")]
    UnbalancedDelimiters { open: usize },
    #[error("expression has no message code")]
    EmptyExpression,
    #[error("first parameter must be a literal message code, found {found}")]
    CodeMustBeLiteral { found: &'static str },
    #[error("argument marker must be followed by an integer, found `{text}`")]
    InvalidArgumentIndex { text: String },
    #[error("argument {index} does not exist ({len} argument(s) supplied)")]
    ArgumentIndexOutOfRange { index: usize, len: usize },
    #[error("cannot append to an already resolved value")]
    AppendToValueToken,
    #[error("no message found under code `{code}` for locale `{locale}`")]
    MessageNotFound { code: String, locale: String },
    #[error("message `{code}` exceeds the nesting limit of {limit} lookups")]
    RecursionLimit { code: String, limit: usize },
}

/// Context-specific source information
#[derive(Debug, Clone)]
pub struct SourceInfo {
    pub source: Arc<NamedSource<String>>,
    pub primary_span: SourceSpan,
}

/// Diagnostic enhancement data
#[derive(Debug, Clone)]
pub struct DiagnosticInfo {
    pub help: Option<String>,
    pub error_code: String,
}

impl ErrorKind {
    /// Get error code suffix for diagnostic codes
    pub const fn code_suffix(&self) -> &'static str {
        match self {
            Self::UnterminatedEscape => "unterminated_escape",
            Self::UnterminatedQuote => "unterminated_quote",
            Self::UnbalancedDelimiters { .. } => "unbalanced_delimiters",
            Self::EmptyExpression => "empty_expression",
            Self::CodeMustBeLiteral { .. } => "code_must_be_literal",
            Self::InvalidArgumentIndex { .. } => "invalid_argument_index",
            Self::ArgumentIndexOutOfRange { .. } => "argument_index_out_of_range",
            Self::AppendToValueToken => "append_to_value_token",
            Self::MessageNotFound { .. } => "message_not_found",
            Self::RecursionLimit { .. } => "recursion_limit",
        }
    }

    /// Stage that raised the error, used as the middle segment of the diagnostic code.
    pub const fn phase(&self) -> &'static str {
        match self {
            Self::MessageNotFound { .. } | Self::RecursionLimit { .. } => "lookup",
            _ => "scan",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::UnterminatedEscape => "escaper at end of input",
            Self::UnterminatedQuote => "quote opened here",
            Self::UnbalancedDelimiters { .. } => "expression opened here",
            Self::EmptyExpression => "empty expression",
            Self::CodeMustBeLiteral { .. } => "expected a literal code",
            Self::InvalidArgumentIndex { .. } => "invalid argument index",
            Self::ArgumentIndexOutOfRange { .. } => "argument out of range",
            Self::AppendToValueToken => "unexpected text",
            Self::MessageNotFound { .. } => "unknown message code",
            Self::RecursionLimit { .. } => "nesting limit reached",
        }
    }

    fn default_help(&self) -> Option<String> {
        match self {
            Self::UnterminatedEscape => Some("escape the escaper itself to write it literally".into()),
            Self::CodeMustBeLiteral { .. } => {
                Some("write the message code directly; only parameters may be substituted".into())
            }
            Self::RecursionLimit { .. } => {
                Some("a message probably references itself, directly or transitively".into())
            }
            Self::AppendToValueToken => {
                Some("This is an internal scanner error. Please report this as a bug.".into())
            }
            _ => None,
        }
    }
}

impl NestError {
    /// Byte offset into the template where the error was raised.
    pub fn offset(&self) -> usize {
        self.source_info.primary_span.offset()
    }

    /// The full template that was being scanned.
    pub fn template(&self) -> &str {
        self.source_info.source.inner()
    }

    /// Display name of the template (`message `code`` or `template`).
    pub fn source_name(&self) -> &str {
        self.source_info.source.name()
    }
}

impl std::error::Error for NestError {}

impl fmt::Display for NestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at offset {} in \"{}\"",
            self.kind,
            self.offset(),
            self.template()
        )
    }
}

impl Diagnostic for NestError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(&self.diagnostic_info.error_code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diagnostic_info
            .help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn fmt::Display + 'a>)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let labels = vec![LabeledSpan::new_with_span(
            Some(self.kind.label().to_string()),
            self.source_info.primary_span,
        )];
        Some(Box::new(labels.into_iter()))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&*self.source_info.source)
    }
}

/// Context-aware error creation
pub trait ErrorReporting {
    /// The template errors raised by this context point into.
    fn source_context(&self) -> &SourceContext;

    /// Create an error of `kind` at `span`
    fn report(&self, kind: ErrorKind, span: SourceSpan) -> NestError {
        let error_code = format!("nestmsg::{}::{}", kind.phase(), kind.code_suffix());
        NestError {
            source_info: SourceInfo {
                source: self.source_context().to_named_source(),
                primary_span: span,
            },
            diagnostic_info: DiagnosticInfo {
                help: kind.default_help(),
                error_code,
            },
            kind,
        }
    }

    fn message_not_found(&self, code: &str, locale: &str, span: SourceSpan) -> NestError {
        self.report(
            ErrorKind::MessageNotFound {
                code: code.into(),
                locale: locale.into(),
            },
            span,
        )
    }
}

// ============================================================================
// LOAD ERRORS - catalog and configuration files
// ============================================================================

/// Failure while loading a catalog or configuration file.
#[derive(Debug, Error, Diagnostic)]
pub enum LoadError {
    #[error("failed to read `{}`", .path.display())]
    #[diagnostic(code(nestmsg::load::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid YAML: {0}")]
    #[diagnostic(code(nestmsg::load::yaml))]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid JSON: {0}")]
    #[diagnostic(code(nestmsg::load::json))]
    Json(#[from] serde_json::Error),
    #[error("invalid configuration: {message}")]
    #[diagnostic(code(nestmsg::load::config))]
    InvalidConfig { message: String },
    #[error("invalid catalog `{}`: {message}", .path.display())]
    #[diagnostic(code(nestmsg::load::catalog))]
    InvalidCatalog { path: PathBuf, message: String },
}

impl LoadError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

// ============================================================================
// ERROR FORMATTING UTILITIES
// ============================================================================

/// Prints a diagnostic with full miette rendering to stderr.
pub fn print_error(error: impl Diagnostic + Send + Sync + 'static) {
    use miette::Report;
    let report = Report::new(error);
    eprintln!("{report:?}");
}
