//! Collapsing parameters and closing expressions.

use miette::SourceSpan;

use super::scanner::Scanner;
use super::token::{render_all, Origin, Token};
use super::Expander;
use crate::errors::{ErrorKind, ErrorReporting, NestError};
use crate::value::Value;

impl<E: Expander + ?Sized> Scanner<'_, E> {
    /// Collapses the tokens of the current parameter into a single token.
    ///
    /// An empty parameter becomes an explicit `Nil`; a parameter mixing text
    /// with resolved values is concatenated in scan order. A lone text token
    /// is kept as text so the expression can still read a literal code from it;
    /// it is coerced when the expression closes.
    pub(super) fn close_parameter(&mut self) {
        let mut tokens = self.stack.pop_parameter();
        let collapsed = if tokens.len() > 1 {
            Token::value(Value::String(render_all(&tokens)), Origin::Composite)
        } else {
            match tokens.pop() {
                Some(token) if !token.is_empty_text() => token,
                _ => Token::value(Value::Nil, Origin::Omitted),
            }
        };
        self.stack.push(collapsed);
    }

    /// Closes the innermost expression and pushes its resolved text.
    pub(super) fn resolve_expression(&mut self, span: SourceSpan) -> Result<(), NestError> {
        self.close_parameter();
        let mut params = self.stack.pop_expression().into_iter();

        let code = match params.next() {
            Some(Token::Text(text)) => text.trim().to_string(),
            Some(Token::Value { origin, .. }) if origin != Origin::Omitted => {
                return Err(self.report(
                    ErrorKind::CodeMustBeLiteral {
                        found: origin.describe(),
                    },
                    span,
                ));
            }
            _ => String::new(),
        };
        if code.is_empty() {
            return Err(self.report(ErrorKind::EmptyExpression, span));
        }

        let args: Vec<Value> = params.map(Token::into_value).collect();
        let limit = self.expander.config().max_depth;
        if self.ctx.depth >= limit {
            return Err(self.report(ErrorKind::RecursionLimit { code, limit }, span));
        }

        let nested = self.ctx.nested(&args);
        match self.expander.expand(&code, &nested)? {
            Some(text) => {
                self.stack
                    .push(Token::value(Value::String(text), Origin::Expression));
                Ok(())
            }
            None => Err(self.message_not_found(&code, &self.ctx.locale.to_string(), span)),
        }
    }
}
