//! Gradient clipping: elementwise bound and global-norm bound.

use crate::dtypes::{elem, Dtype};
use crate::error::Result;
use crate::moments::global_norm;
use crate::options::{self, Options};

/// Configuration of hyperparameters for [clip].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipConfig {
    /// Elementwise bound: every element is clamped to `[-delta, delta]`.
    /// Defaults to `2.0`.
    pub delta: f64,
}

impl Default for ClipConfig {
    fn default() -> Self {
        Self { delta: 2.0 }
    }
}

impl ClipConfig {
    pub const OPTION_KEYS: &'static [&'static str] = &["delta"];

    /// Builds a config from a closed option mapping.
    pub fn from_options(opts: &Options) -> Result<Self> {
        options::check_known(opts, Self::OPTION_KEYS)?;
        let d = Self::default();
        let cfg = Self {
            delta: options::get(opts, "delta", d.delta),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        options::require_positive("delta", self.delta)
    }
}

/// Clamps every element to `[-delta, delta]`. Elements already within the
/// bound pass through unchanged.
pub fn clip<E: Dtype>(x: &[E], cfg: &ClipConfig) -> Result<Vec<E>> {
    cfg.validate()?;
    let delta = elem::<E>(cfg.delta);
    Ok(x.iter().map(|&v| v.max(-delta).min(delta)).collect())
}

/// Configuration of hyperparameters for [clip_by_global_norm].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobalNormConfig {
    /// Maximum allowed global L2 norm. Defaults to `1.0`.
    pub max_norm: f64,
}

impl Default for GlobalNormConfig {
    fn default() -> Self {
        Self { max_norm: 1.0 }
    }
}

impl GlobalNormConfig {
    pub const OPTION_KEYS: &'static [&'static str] = &["max_norm"];

    /// Builds a config from a closed option mapping.
    pub fn from_options(opts: &Options) -> Result<Self> {
        options::check_known(opts, Self::OPTION_KEYS)?;
        let d = Self::default();
        let cfg = Self {
            max_norm: options::get(opts, "max_norm", d.max_norm),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        options::require_positive("max_norm", self.max_norm)
    }
}

/// Rescales the whole buffer so its global L2 norm does not exceed
/// `max_norm`:
///
/// ```text
/// g_norm = sqrt(sum(x²))
/// out    = g_norm < max_norm ? x : x / g_norm * max_norm
/// ```
///
/// Inputs already within the bound are returned unchanged, not rescaled.
/// A zero buffer has zero norm and always passes through, so the division
/// never sees an exact zero.
pub fn clip_by_global_norm<E: Dtype>(x: &[E], cfg: &GlobalNormConfig) -> Result<Vec<E>> {
    cfg.validate()?;
    let g_norm = global_norm(x);
    let max_norm = elem::<E>(cfg.max_norm);
    if g_norm < max_norm {
        Ok(x.to_vec())
    } else {
        Ok(x.iter().map(|&v| v / g_norm * max_norm).collect())
    }
}
