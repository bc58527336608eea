//! Additive weight decay as a transform: the L2-regularization term folded
//! into the gradient before any momentum updates.

use crate::dtypes::{elem, Dtype};
use crate::error::{check_len, Result};
use crate::options::{self, Options};

/// Configuration of hyperparameters for [add_decayed_weights].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecayConfig {
    /// Weight decay coefficient. Defaults to `0` (identity transform).
    pub weight_decay: f64,
}

impl Default for DecayConfig {
    fn default() -> Self {
        Self { weight_decay: 0.0 }
    }
}

impl DecayConfig {
    pub const OPTION_KEYS: &'static [&'static str] = &["weight_decay"];

    /// Builds a config from a closed option mapping.
    pub fn from_options(opts: &Options) -> Result<Self> {
        options::check_known(opts, Self::OPTION_KEYS)?;
        let d = Self::default();
        let cfg = Self {
            weight_decay: options::get(opts, "weight_decay", d.weight_decay),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        options::require_non_negative("weight_decay", self.weight_decay)
    }
}

/// Adds the decayed parameters to the gradient:
/// `out = x + weight_decay * p`. Equivalent to L2 regularization when placed
/// before a moment scaler in the chain; placing it after instead yields the
/// decoupled (AdamW-style) variant.
pub fn add_decayed_weights<E: Dtype>(
    x: &[E],
    params: &[E],
    cfg: &DecayConfig,
) -> Result<Vec<E>> {
    cfg.validate()?;
    check_len(x.len(), params.len())?;

    let wd = elem::<E>(cfg.weight_decay);
    Ok(x.iter()
        .zip(params.iter())
        .map(|(&g, &p)| g + wd * p)
        .collect())
}
