//! Momentum trace: EMA-style accumulation with optional Nesterov lookahead.

use crate::dtypes::{elem, Dtype};
use crate::error::{check_len, Result};
use crate::options::{self, Options};

/// Configuration of hyperparameters for [trace].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceConfig {
    /// Decay applied to the carried trace. Defaults to `0.9`.
    pub decay: f64,

    /// Whether to apply Nesterov lookahead. Defaults to `false`. This is a
    /// static configuration choice, never a per-element decision.
    pub nesterov: bool,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            decay: 0.9,
            nesterov: false,
        }
    }
}

impl TraceConfig {
    pub const OPTION_KEYS: &'static [&'static str] = &["decay", "nesterov"];

    /// Builds a config from a closed option mapping. `nesterov` is encoded
    /// as a scalar: any non-zero value enables it.
    pub fn from_options(opts: &Options) -> Result<Self> {
        options::check_known(opts, Self::OPTION_KEYS)?;
        let d = Self::default();
        let cfg = Self {
            decay: options::get(opts, "decay", d.decay),
            nesterov: options::get(opts, "nesterov", 0.0) != 0.0,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        options::require_unit_closed("decay", self.decay)
    }
}

/// Accumulates a momentum trace
/// ([Sutskever et al., 2013](https://proceedings.mlr.press/v28/sutskever13.html)):
///
/// ```text
/// new_trace = x + decay * trace
/// out       = nesterov ? x + decay * new_trace : new_trace
/// ```
///
/// The trace is undamped (the incoming gradient is not scaled by
/// `1 - decay`), matching classic SGD momentum rather than an EMA. Returns
/// `(out, new_trace)`.
pub fn trace<E: Dtype>(x: &[E], trace: &[E], cfg: &TraceConfig) -> Result<(Vec<E>, Vec<E>)> {
    cfg.validate()?;
    check_len(x.len(), trace.len())?;

    let decay = elem::<E>(cfg.decay);
    let new_trace: Vec<E> = x
        .iter()
        .zip(trace.iter())
        .map(|(&g, &t)| g + decay * t)
        .collect();
    let out = if cfg.nesterov {
        x.iter()
            .zip(new_trace.iter())
            .map(|(&g, &t)| g + decay * t)
            .collect()
    } else {
        new_trace.clone()
    };
    Ok((out, new_trace))
}
