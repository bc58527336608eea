//! Shared helpers used by every adaptive scaler: the generic exponential
//! moving average update, bias correction, and safe norms.

use crate::dtypes::{elem, Dtype};
use crate::error::{check_len, Result, TransformError};

/// Generic EMA update of an order-`order` moment:
/// `(1 - decay) * x^order + decay * moment`.
///
/// `order` is typically 1 (mean) or 2 (uncentered variance) but any positive
/// order is supported. Preserves the length and element type of its inputs.
pub fn update_moment<E: Dtype>(
    x: &[E],
    moment: &[E],
    decay: f64,
    order: i32,
) -> Result<Vec<E>> {
    check_len(x.len(), moment.len())?;
    if order < 1 {
        return Err(TransformError::InvalidOption {
            name: "order",
            value: order as f64,
        });
    }
    let decay = elem::<E>(decay);
    let mix = E::one() - decay;
    Ok(x.iter()
        .zip(moment.iter())
        .map(|(&g, &m)| mix * g.powi(order) + decay * m)
        .collect())
}

/// Divides a zero-initialized EMA by `1 - decay^count` to offset its
/// downward bias during early steps.
///
/// The caller guarantees `count >= 1`, so the divisor is never an exact zero
/// for `decay < 1`. As `decay -> 1` with small `count` the divisor shrinks
/// toward zero and amplifies the corrected moment; this is the published
/// behavior, not a defect.
pub fn bias_correction<E: Dtype>(moment: &[E], decay: f64, count: u64) -> Vec<E> {
    debug_assert!(count >= 1, "bias correction requires count >= 1");
    let correction = elem::<E>(1.0 - decay.powf(count as f64));
    moment.iter().map(|&m| m / correction).collect()
}

/// Global L2 norm: the buffer treated as one flat vector.
pub fn global_norm<E: Dtype>(x: &[E]) -> E {
    x.iter().fold(E::zero(), |acc, &v| acc + v * v).sqrt()
}

/// L2 norm clamped from below by `min_norm`. Never returns less than
/// `min_norm` and never divides by anything, so downstream ratios of safe
/// norms cannot divide by an exact zero when `min_norm > 0`.
pub fn safe_norm<E: Dtype>(x: &[E], min_norm: f64) -> E {
    global_norm(x).max(elem(min_norm))
}
