use serde::Serialize;

/// A stack value: either a single number or one sample per log row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Scalar(f64),
    Series(Vec<f64>),
}

impl Value {
    /// Number of samples, `None` for a scalar.
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::Scalar(_) => None,
            Value::Series(v) => Some(v.len()),
        }
    }

    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Value::Scalar(x) => Some(*x),
            Value::Series(_) => None,
        }
    }

    pub fn as_series(&self) -> Option<&[f64]> {
        match self {
            Value::Scalar(_) => None,
            Value::Series(v) => Some(v),
        }
    }

    /// Apply `f` to every sample.
    pub fn map(self, f: impl Fn(f64) -> f64) -> Value {
        match self {
            Value::Scalar(x) => Value::Scalar(f(x)),
            Value::Series(mut v) => {
                v.iter_mut().for_each(|x| *x = f(*x));
                Value::Series(v)
            }
        }
    }

    /// Element-wise `f(self, rhs)` with scalar broadcasting.
    ///
    /// Returns `None` when both sides are series of different lengths.
    pub fn broadcast(self, rhs: Value, f: impl Fn(f64, f64) -> f64) -> Option<Value> {
        let out = match (self, rhs) {
            (Value::Scalar(a), Value::Scalar(b)) => Value::Scalar(f(a, b)),
            (Value::Scalar(a), Value::Series(b)) => {
                Value::Series(b.into_iter().map(|b| f(a, b)).collect())
            }
            (Value::Series(a), Value::Scalar(b)) => {
                Value::Series(a.into_iter().map(|a| f(a, b)).collect())
            }
            (Value::Series(a), Value::Series(b)) => {
                if a.len() != b.len() {
                    return None;
                }
                Value::Series(a.into_iter().zip(b).map(|(a, b)| f(a, b)).collect())
            }
        };
        Some(out)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Scalar(x)
    }
}

impl From<Vec<f64>> for Value {
    fn from(v: Vec<f64>) -> Self {
        Value::Series(v)
    }
}

impl From<&[f64]> for Value {
    fn from(v: &[f64]) -> Self {
        Value::Series(v.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn scalar_broadcasts_over_series() {
        let out = Value::Scalar(2.0).broadcast(vec![1.0, 2.0, 3.0].into(), |a, b| a * b);
        assert_eq!(out, Some(Value::Series(vec![2.0, 4.0, 6.0])));

        let out = Value::from(vec![1.0, 2.0]).broadcast(Value::Scalar(1.0), |a, b| a - b);
        assert_eq!(out, Some(Value::Series(vec![0.0, 1.0])));
    }

    #[test]
    fn unequal_series_do_not_broadcast() {
        let out = Value::from(vec![1.0, 2.0]).broadcast(vec![1.0].into(), |a, b| a + b);
        assert_eq!(out, None);
    }

    #[test]
    fn serializes_untagged() {
        assert_eq!(serde_json::to_value(Value::Scalar(1.5)).unwrap(), json!(1.5));
        assert_eq!(
            serde_json::to_value(Value::Series(vec![1.0, 2.0])).unwrap(),
            json!([1.0, 2.0])
        );
    }
}
