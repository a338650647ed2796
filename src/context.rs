use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::errors::{EvalError, Result};
use crate::value::Value;

/// What a `$name` lookup does when `name` is not bound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingFieldPolicy {
    /// Fail with `EvalError::MissingField`.
    #[default]
    Strict,
    /// Substitute a scalar zero.
    Zero,
}

/// Named data columns an expression can reference.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    fields: HashMap<String, Value>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name`, replacing any previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub(crate) fn resolve(&self, name: &str, policy: MissingFieldPolicy) -> Result<Value> {
        match (self.fields.get(name), policy) {
            (Some(v), _) => Ok(v.clone()),
            (None, MissingFieldPolicy::Strict) => Err(EvalError::MissingField(name.to_string())),
            (None, MissingFieldPolicy::Zero) => {
                tracing::warn!(field = name, "missing field, substituting 0");
                Ok(Value::Scalar(0.0))
            }
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Context
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
