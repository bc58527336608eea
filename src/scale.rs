//! Fixed and schedule-driven scaling.

use crate::dtypes::{elem, Dtype};

/// Multiplies every element by a fixed step size.
///
/// Composing an adaptive scaler with `scale(update, -learning_rate)` turns a
/// raw direction into a descent update. Stateless; any finite `step`,
/// including zero and negative values, is legal.
pub fn scale<E: Dtype>(x: &[E], step: f64) -> Vec<E> {
    let step = elem::<E>(step);
    x.iter().map(|&v| v * step).collect()
}

/// Multiplies by an externally computed step-dependent scalar.
///
/// `schedule_fn` is the caller's pure `steps completed -> scalar` function
/// (e.g. a warmup or cosine decay); it is invoked exactly once per call.
/// Schedule implementations themselves live outside this crate.
pub fn scale_by_schedule<E: Dtype, F>(x: &[E], count: u64, schedule_fn: F) -> Vec<E>
where
    F: FnOnce(u64) -> f64,
{
    scale(x, schedule_fn(count))
}
