use std::fmt;

use crate::errors::{EvalError, Result};
use crate::value::Value;

/// The fixed instruction set of the calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Add,
    Sub,
    Mul,
    Div,
    Sqr,
}

impl Op {
    pub const ALL: [Op; 5] = [Op::Add, Op::Sub, Op::Mul, Op::Div, Op::Sqr];

    pub fn mnemonic(self) -> &'static str {
        match self {
            Op::Add => "ADD",
            Op::Sub => "SUB",
            Op::Mul => "MUL",
            Op::Div => "DIV",
            Op::Sqr => "SQR",
        }
    }

    /// Exact, case-sensitive lookup.
    pub fn from_mnemonic(s: &str) -> Option<Op> {
        Op::ALL.into_iter().find(|op| op.mnemonic() == s)
    }

    pub fn arity(self) -> usize {
        match self {
            Op::Sqr => 1,
            Op::Add | Op::Sub | Op::Mul | Op::Div => 2,
        }
    }

    /// Pop the operands off `stack`, compute, push the result.
    ///
    /// Binary operators compute `f(a, b)` where `a` is the former top of the
    /// stack and `b` the value below it, so `x y SUB` yields `y - x`.
    /// On error the stack is left untouched.
    pub(crate) fn apply(self, stack: &mut Vec<Value>) -> Result<()> {
        let found = stack.len();
        let needed = self.arity();
        if found < needed {
            return Err(EvalError::StackUnderflow { op: self, needed, found });
        }

        let result = match self {
            Op::Sqr => match stack.pop() {
                Some(a) => a.map(f64::sqrt),
                None => return Err(EvalError::StackUnderflow { op: self, needed, found }),
            },
            Op::Add => self.binary(stack, |a, b| a + b)?,
            Op::Sub => self.binary(stack, |a, b| a - b)?,
            Op::Mul => self.binary(stack, |a, b| a * b)?,
            Op::Div => self.binary(stack, |a, b| a / b)?,
        };
        stack.push(result);
        Ok(())
    }

    fn binary(self, stack: &mut Vec<Value>, f: fn(f64, f64) -> f64) -> Result<Value> {
        let found = stack.len();
        let underflow = || EvalError::StackUnderflow { op: self, needed: 2, found };
        let (left, right) = match stack.as_slice() {
            [.., b, a] => (a.len(), b.len()),
            _ => return Err(underflow()),
        };
        let mismatch = || EvalError::ShapeMismatch {
            op: self,
            left: left.unwrap_or(1),
            right: right.unwrap_or(1),
        };
        if let (Some(l), Some(r)) = (left, right) {
            if l != r {
                return Err(mismatch());
            }
        }
        match (stack.pop(), stack.pop()) {
            (Some(a), Some(b)) => a.broadcast(b, f).ok_or_else(mismatch),
            _ => Err(underflow()),
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}
