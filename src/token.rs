use crate::errors::{EvalError, Result};
use crate::ops::Op;

/// Prefix marking a reference to a data column.
pub const VAR_SIGIL: char = '$';

#[derive(Debug, Clone, PartialEq)]
pub enum Token<'a> {
    Op(Op),
    /// Field name with the sigil stripped.
    Var(&'a str),
    Literal(f64),
}

impl<'a> Token<'a> {
    /// Classify one whitespace-free token.
    ///
    /// Operators win over everything, then the sigil, then float parsing.
    pub fn classify(raw: &'a str, position: usize) -> Result<Token<'a>> {
        if let Some(op) = Op::from_mnemonic(raw) {
            return Ok(Token::Op(op));
        }
        if let Some(name) = raw.strip_prefix(VAR_SIGIL) {
            return Ok(Token::Var(name));
        }
        raw.parse::<f64>()
            .map(Token::Literal)
            .map_err(|_| EvalError::MalformedToken {
                token: raw.to_string(),
                position,
            })
    }
}

/// Split an expression into `(position, token)` pairs.
pub fn split(expr: &str) -> impl Iterator<Item = (usize, &str)> {
    expr.split_whitespace().enumerate()
}
