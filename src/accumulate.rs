//! Micro-batch gradient accumulation: emit the accumulated gradient every
//! k-th step and a zero update in between, simulating a k-times larger
//! batch without touching the rest of the chain.

use crate::dtypes::Dtype;
use crate::error::{check_len, Result, TransformError};
use crate::options::{self, Options};

/// Configuration of hyperparameters for [apply_every].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApplyEveryConfig {
    /// Emit the accumulated gradient every `k` steps. Defaults to `1`
    /// (every step, the identity behavior).
    pub k: u64,
}

impl Default for ApplyEveryConfig {
    fn default() -> Self {
        Self { k: 1 }
    }
}

impl ApplyEveryConfig {
    pub const OPTION_KEYS: &'static [&'static str] = &["k"];

    /// Builds a config from a closed option mapping. `k` must be an integer
    /// value >= 1.
    pub fn from_options(opts: &Options) -> Result<Self> {
        options::check_known(opts, Self::OPTION_KEYS)?;
        let value = options::get(opts, "k", 1.0);
        if !value.is_finite() || value < 1.0 || value.fract() != 0.0 {
            return Err(TransformError::InvalidOption { name: "k", value });
        }
        Ok(Self { k: value as u64 })
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.k >= 1 {
            Ok(())
        } else {
            Err(TransformError::InvalidOption {
                name: "k",
                value: self.k as f64,
            })
        }
    }
}

/// Accumulates gradients and releases them every `k`-th step:
///
/// ```text
/// acc' = acc + x
/// out  = (count + 1) % k == 0 ? acc' : 0
/// ```
///
/// On emitting steps the returned accumulator is reset to zero; in between,
/// a zero buffer is emitted and `acc'` is carried. Returns `(out, acc)`.
pub fn apply_every<E: Dtype>(
    x: &[E],
    acc: &[E],
    count: u64,
    cfg: &ApplyEveryConfig,
) -> Result<(Vec<E>, Vec<E>)> {
    cfg.validate()?;
    check_len(x.len(), acc.len())?;

    let acc_next: Vec<E> = x.iter().zip(acc.iter()).map(|(&g, &a)| g + a).collect();
    let zeros = vec![E::zero(); x.len()];
    if (count + 1) % cfg.k == 0 {
        Ok((acc_next, zeros))
    } else {
        Ok((zeros, acc_next))
    }
}
