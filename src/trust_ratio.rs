//! Layer-wise trust-ratio scaling, the LAMB/LARS building block
//! ([You et al., 2019](https://arxiv.org/abs/1904.00962)).

use crate::dtypes::{elem, Dtype};
use crate::error::{check_len, Result};
use crate::moments::global_norm;
use crate::options::{self, Options};

/// Configuration of hyperparameters for [scale_by_trust_ratio].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrustRatioConfig {
    /// Lower clamp applied to both norms before the ratio is taken.
    /// Defaults to `0` (no clamping).
    pub min_norm: f64,
}

impl Default for TrustRatioConfig {
    fn default() -> Self {
        Self { min_norm: 0.0 }
    }
}

impl TrustRatioConfig {
    pub const OPTION_KEYS: &'static [&'static str] = &["min_norm"];

    /// Builds a config from a closed option mapping.
    pub fn from_options(opts: &Options) -> Result<Self> {
        options::check_known(opts, Self::OPTION_KEYS)?;
        let d = Self::default();
        let cfg = Self {
            min_norm: options::get(opts, "min_norm", d.min_norm),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        options::require_non_negative("min_norm", self.min_norm)
    }
}

/// Rescales `x` by the ratio of its norm to `g`'s norm:
///
/// ```text
/// trust_ratio = safe_norm(x, min_norm) / safe_norm(g, min_norm)
/// out         = x * trust_ratio
/// ```
///
/// If either raw norm is exactly zero the ratio is forced to 1, so the call
/// degrades to a no-op instead of producing NaN. A zero `x` therefore maps
/// to a zero output whatever `g` contains.
pub fn scale_by_trust_ratio<E: Dtype>(
    x: &[E],
    g: &[E],
    cfg: &TrustRatioConfig,
) -> Result<Vec<E>> {
    cfg.validate()?;
    check_len(x.len(), g.len())?;

    let x_norm = global_norm(x);
    let g_norm = global_norm(g);
    let trust_ratio = if x_norm == E::zero() || g_norm == E::zero() {
        E::one()
    } else {
        let min_norm = elem::<E>(cfg.min_norm);
        x_norm.max(min_norm) / g_norm.max(min_norm)
    };
    Ok(x.iter().map(|&v| v * trust_ratio).collect())
}
