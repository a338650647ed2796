use std::sync::Arc;

use crate::context::{Context, MissingFieldPolicy};
use crate::errors::{EvalError, Result};
use crate::token::{self, Token};
use crate::value::Value;

/// =========================
/// RPN calculator over named data
/// =========================

/// Postfix calculator whose `$name` tokens resolve against a bound [`Context`].
///
/// The bound context persists across calls until [`Evaluator::load_data`]
/// replaces it. The stack is cleared at the start of every
/// [`Evaluator::calculate`], so values left behind by a malformed expression
/// never leak into the next one.
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    ctx: Arc<Context>,
    stack: Vec<Value>,
    policy: MissingFieldPolicy,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_missing_fields(mut self, policy: MissingFieldPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn missing_fields(&self) -> MissingFieldPolicy {
        self.policy
    }

    /// Replace the bound data context.
    pub fn load_data(&mut self, ctx: impl Into<Arc<Context>>) {
        self.ctx = ctx.into();
        tracing::debug!(fields = self.ctx.len(), "loaded data context");
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Empty the evaluation stack.
    pub fn reset(&mut self) {
        self.stack.clear();
    }

    /// Values currently on the stack.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Evaluate `expr` and return the value on top of the stack.
    pub fn calculate(&mut self, expr: &str) -> Result<Value> {
        self.reset();
        for (position, raw) in token::split(expr) {
            match Token::classify(raw, position)? {
                Token::Op(op) => op.apply(&mut self.stack)?,
                Token::Var(name) => {
                    let v = self.ctx.resolve(name, self.policy)?;
                    self.stack.push(v);
                }
                Token::Literal(x) => self.stack.push(Value::Scalar(x)),
            }
            tracing::trace!(token = raw, depth = self.stack.len());
        }
        let top = self.stack.last().cloned().ok_or(EvalError::EmptyResult)?;
        if self.stack.len() > 1 {
            tracing::debug!(expr, leftover = self.stack.len() - 1, "unconsumed values on stack");
        }
        Ok(top)
    }
}
