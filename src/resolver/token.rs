//! Tokens on the parse stack.

use std::fmt::Write as _;
use std::mem;

use crate::errors::ErrorKind;
use crate::value::Value;

/// Where a value token came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Origin {
    /// A `$n` argument reference.
    Argument,
    /// The resolved text of a nested expression.
    Expression,
    /// A parameter that mixed literal text with resolved values.
    Composite,
    /// An empty parameter, as in `$(code,,x)`.
    Omitted,
}

impl Origin {
    pub(crate) fn describe(self) -> &'static str {
        match self {
            Origin::Argument => "an argument reference",
            Origin::Expression => "a nested expression",
            Origin::Composite => "a composite parameter",
            Origin::Omitted => "an empty parameter",
        }
    }
}

/// A single entry of the parse stack.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    /// Accumulated literal text; the only appendable token.
    Text(String),
    /// An already resolved value.
    Value { value: Value, origin: Origin },
    /// Start of an expression.
    PrefixMarker,
    /// Start of a parameter.
    SeparatorMarker,
}

impl Token {
    pub(crate) fn empty() -> Self {
        Token::Text(String::new())
    }

    pub(crate) fn value(value: Value, origin: Origin) -> Self {
        Token::Value { value, origin }
    }

    pub(crate) fn append(&mut self, ch: char) -> Result<(), ErrorKind> {
        match self {
            Token::Text(text) => {
                text.push(ch);
                Ok(())
            }
            _ => Err(ErrorKind::AppendToValueToken),
        }
    }

    pub(crate) fn is_empty_text(&self) -> bool {
        matches!(self, Token::Text(text) if text.is_empty())
    }

    /// Finalizes the token into a parameter value, coercing literal text.
    pub(crate) fn into_value(self) -> Value {
        match self {
            Token::Text(text) => Value::coerce_literal(&text),
            Token::Value { value, .. } => value,
            Token::PrefixMarker | Token::SeparatorMarker => Value::Nil,
        }
    }

    /// Appends the token's printable form; markers print nothing.
    pub(crate) fn render_into(&self, out: &mut String) {
        match self {
            Token::Text(text) => out.push_str(text),
            Token::Value { value, .. } => {
                let _ = write!(out, "{value}");
            }
            Token::PrefixMarker | Token::SeparatorMarker => {}
        }
    }

    pub(crate) fn into_text(self) -> String {
        match self {
            Token::Text(text) => text,
            other => {
                let mut out = String::new();
                other.render_into(&mut out);
                out
            }
        }
    }
}

/// Last-in-first-out stack of open accumulation contexts.
///
/// The bottom token is the top-level output; it is pushed on creation so the
/// stack is never empty while scanning.
#[derive(Debug)]
pub(crate) struct TokenStack {
    tokens: Vec<Token>,
}

impl TokenStack {
    pub(crate) fn new() -> Self {
        Self {
            tokens: vec![Token::empty()],
        }
    }

    pub(crate) fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub(crate) fn pop(&mut self) -> Option<Token> {
        self.tokens.pop()
    }

    pub(crate) fn top(&self) -> Option<&Token> {
        self.tokens.last()
    }

    pub(crate) fn append(&mut self, ch: char) -> Result<(), ErrorKind> {
        match self.tokens.last_mut() {
            Some(token) => token.append(ch),
            None => {
                self.tokens.push(Token::Text(ch.to_string()));
                Ok(())
            }
        }
    }

    /// Pops the tokens of the current parameter, removing its separator marker.
    pub(crate) fn pop_parameter(&mut self) -> Vec<Token> {
        self.pop_region(&Token::SeparatorMarker)
    }

    /// Pops the collapsed parameters of the innermost expression, removing its prefix marker.
    pub(crate) fn pop_expression(&mut self) -> Vec<Token> {
        self.pop_region(&Token::PrefixMarker)
    }

    /// Tokens above the nearest `marker`, in left-to-right order. Markers
    /// match by variant, never by content.
    fn pop_region(&mut self, marker: &Token) -> Vec<Token> {
        let mut region = Vec::new();
        while let Some(token) = self.tokens.pop() {
            if mem::discriminant(&token) == mem::discriminant(marker) {
                break;
            }
            region.push(token);
        }
        region.reverse();
        region
    }

    /// Concatenates every token bottom to top.
    pub(crate) fn render(&self) -> String {
        render_all(&self.tokens)
    }
}

pub(crate) fn render_all(tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        token.render_into(&mut out);
    }
    out
}
