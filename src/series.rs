//! Post-processing applied to evaluator output before it is plotted.

use std::num::NonZeroUsize;

use crate::value::Value;

/// Number of leading samples averaged to form the normalization baseline.
pub const NORMALIZE_WINDOW: usize = 10;

/// Block-average consecutive windows of `factor` samples.
///
/// A trailing remainder shorter than one window is dropped. Scalars pass
/// through unchanged.
pub fn decimate(value: Value, factor: NonZeroUsize) -> Value {
    let factor = factor.get();
    match value {
        Value::Series(v) if factor > 1 => Value::Series(
            v.chunks_exact(factor)
                .map(|w| w.iter().sum::<f64>() / factor as f64)
                .collect(),
        ),
        other => other,
    }
}

/// Divide by the mean of the first [`NORMALIZE_WINDOW`] samples.
pub fn normalize(value: Value) -> Value {
    let baseline = match &value {
        Value::Scalar(x) => *x,
        Value::Series(v) if v.is_empty() => return value,
        Value::Series(v) => {
            let head = &v[..v.len().min(NORMALIZE_WINDOW)];
            head.iter().sum::<f64>() / head.len() as f64
        }
    };
    value.map(|x| x / baseline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn nz(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn decimate_drops_remainder() {
        let v = Value::from(vec![1.0, 3.0, 5.0, 7.0, 100.0]);
        assert_eq!(decimate(v, nz(2)), Value::Series(vec![2.0, 6.0]));
    }

    #[test]
    fn decimate_identity_and_scalar() {
        let v = Value::from(vec![1.0, 2.0, 3.0]);
        assert_eq!(decimate(v.clone(), nz(1)), v);
        assert_eq!(decimate(Value::Scalar(4.0), nz(3)), Value::Scalar(4.0));
        assert_eq!(decimate(Value::from(vec![1.0]), nz(3)), Value::Series(vec![]));
    }

    #[test]
    fn normalize_uses_first_ten() {
        let mut samples = vec![2.0; 10];
        samples.push(100.0);
        let out = normalize(samples.into());
        let out = out.as_series().unwrap();
        assert_eq!(out[0], 1.0);
        assert_eq!(out[10], 50.0);
    }

    #[test]
    fn normalize_short_and_scalar() {
        assert_eq!(normalize(vec![1.0, 3.0].into()), Value::Series(vec![0.5, 1.5]));
        assert_eq!(normalize(Value::Scalar(7.0)), Value::Scalar(1.0));
        assert_eq!(normalize(Value::Series(vec![])), Value::Series(vec![]));
    }

    proptest! {
        #[test]
        fn decimated_length(len in 0usize..200, factor in 1usize..20) {
            let out = decimate(vec![1.0; len].into(), nz(factor));
            prop_assert_eq!(out.len(), Some(len / factor));
        }
    }
}
