//! The single-pass template scanner.
//!
//! At each offset the scanner checks, in priority order: escaper, open
//! quote, open argument reference, prefix, and then (only inside an
//! expression) suffix, quoter, separator and argument marker. Anything else
//! is appended to the token on top of the stack.

use miette::SourceSpan;

use super::token::{Origin, Token, TokenStack};
use super::{Expander, ResolutionContext};
use crate::config::Delimiters;
use crate::errors::{ErrorKind, ErrorReporting, NestError, SourceContext};

pub(super) struct Scanner<'a, E: ?Sized> {
    pub(super) expander: &'a E,
    pub(super) source: &'a SourceContext,
    pub(super) ctx: &'a ResolutionContext<'a>,
    pub(super) stack: TokenStack,
    delimiters: &'a Delimiters,
    offset: usize,
    /// Offsets of the prefixes opened but not yet closed; its length is the nesting depth.
    open: Vec<usize>,
    /// Offset of the open quote, if any.
    quote_start: Option<usize>,
    /// Offset of the argument marker being read, if any.
    arg_start: Option<usize>,
}

impl<'a, E: Expander + ?Sized> Scanner<'a, E> {
    pub(super) fn new(
        expander: &'a E,
        source: &'a SourceContext,
        ctx: &'a ResolutionContext<'a>,
    ) -> Self {
        Self {
            expander,
            source,
            ctx,
            stack: TokenStack::new(),
            delimiters: &expander.config().delimiters,
            offset: 0,
            open: Vec::new(),
            quote_start: None,
            arg_start: None,
        }
    }

    pub(super) fn run(mut self) -> Result<String, NestError> {
        while self.offset < self.template().len() {
            self.step()?;
        }
        if let Some(start) = self.quote_start {
            let end = start + self.delimiters.quoter.len();
            return Err(self.report(ErrorKind::UnterminatedQuote, (start..end).into()));
        }
        if let Some(&start) = self.open.last() {
            let end = start + self.delimiters.prefix.len();
            return Err(self.report(
                ErrorKind::UnbalancedDelimiters {
                    open: self.open.len(),
                },
                (start..end).into(),
            ));
        }
        Ok(self.stack.render())
    }

    fn step(&mut self) -> Result<(), NestError> {
        let d = self.delimiters;

        if self.at(&d.escaper) {
            let start = self.offset;
            self.offset += d.escaper.len();
            if self.offset >= self.template().len() {
                return Err(self.report(ErrorKind::UnterminatedEscape, (start..self.offset).into()));
            }
            return self.append_current();
        }

        if self.quote_start.is_some() {
            if self.at(&d.quoter) {
                self.offset += d.quoter.len();
                self.quote_start = None;
                return Ok(());
            }
            return self.append_current();
        }

        if let Some(start) = self.arg_start {
            // The terminating suffix or separator is left for the next step.
            if self.at(&d.suffix) || self.at(&d.separator) {
                self.arg_start = None;
                return self.close_argument(start);
            }
            return self.append_current();
        }

        if self.at(&d.prefix) {
            self.stack.push(Token::PrefixMarker);
            self.stack.push(Token::SeparatorMarker);
            self.stack.push(Token::empty());
            self.open.push(self.offset);
            self.offset += d.prefix.len();
            return Ok(());
        }

        if self.open.is_empty() {
            return self.append_current();
        }

        if self.at(&d.suffix) {
            self.offset += d.suffix.len();
            let start = self.open.pop().unwrap_or_default();
            self.resolve_expression((start..self.offset).into())?;
            self.stack.push(Token::empty());
            return Ok(());
        }

        if self.at(&d.quoter) {
            self.quote_start = Some(self.offset);
            self.offset += d.quoter.len();
            return Ok(());
        }

        if self.at(&d.separator) {
            self.offset += d.separator.len();
            self.close_parameter();
            self.stack.push(Token::SeparatorMarker);
            self.stack.push(Token::empty());
            return Ok(());
        }

        if self.at(&d.arg_marker) && self.stack.top().is_some_and(Token::is_empty_text) {
            self.arg_start = Some(self.offset);
            self.offset += d.arg_marker.len();
            return Ok(());
        }

        self.append_current()
    }

    /// Replaces the digits collected after an argument marker with the referenced argument.
    fn close_argument(&mut self, start: usize) -> Result<(), NestError> {
        let span: SourceSpan = (start..self.offset).into();
        let text = self.stack.pop().map(Token::into_text).unwrap_or_default();
        let index = text
            .trim()
            .parse::<usize>()
            .map_err(|_| self.report(ErrorKind::InvalidArgumentIndex { text: text.clone() }, span))?;
        let value = self.ctx.args.get(index).cloned().ok_or_else(|| {
            self.report(
                ErrorKind::ArgumentIndexOutOfRange {
                    index,
                    len: self.ctx.args.len(),
                },
                span,
            )
        })?;
        self.stack.push(Token::value(value, Origin::Argument));
        Ok(())
    }

    fn append_current(&mut self) -> Result<(), NestError> {
        let start = self.offset;
        let Some(ch) = self.template()[start..].chars().next() else {
            return Ok(());
        };
        self.offset += ch.len_utf8();
        self.stack
            .append(ch)
            .map_err(|kind| self.report(kind, (start..self.offset).into()))
    }

    fn at(&self, delimiter: &str) -> bool {
        self.template()[self.offset..].starts_with(delimiter)
    }

    fn template(&self) -> &'a str {
        &self.source.content
    }
}

impl<E: ?Sized> ErrorReporting for Scanner<'_, E> {
    fn source_context(&self) -> &SourceContext {
        self.source
    }
}
