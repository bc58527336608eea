//! Rectified Adam.
//!
//! RAdam (Liu et al., 2019) addresses Adam's variance problem in early
//! training: the adaptive denominator is statistically unreliable while the
//! second moment has seen only a handful of samples. The tractability proxy
//! ro_t approximates the effective sample count of the variance estimate;
//! while it sits below the threshold the transform emits the bias-corrected
//! first moment alone, and once it crosses, the rectified adaptive step.

use crate::dtypes::{elem, Dtype};
use crate::error::{check_len, Result};
use crate::moments::{bias_correction, update_moment};
use crate::options::{self, Options};

/// Configuration of hyperparameters for [scale_by_radam].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RAdamConfig {
    /// Decay rates for the 1st and 2nd moment. Defaults to `[0.9, 0.999]`.
    pub betas: [f64; 2],

    /// Added to the denominator, outside the square root. Defaults to `1e-8`.
    pub eps: f64,

    /// Added to the square root argument, inside it. Defaults to `0`.
    pub eps_root: f64,

    /// Rectification threshold on `ro`. Defaults to `5.0`, the value from
    /// the paper.
    pub threshold: f64,
}

impl Default for RAdamConfig {
    fn default() -> Self {
        Self {
            betas: [0.9, 0.999],
            eps: 1e-8,
            eps_root: 0.0,
            threshold: 5.0,
        }
    }
}

impl RAdamConfig {
    pub const OPTION_KEYS: &'static [&'static str] =
        &["b1", "b2", "eps", "eps_root", "threshold"];

    /// Builds a config from a closed option mapping.
    pub fn from_options(opts: &Options) -> Result<Self> {
        options::check_known(opts, Self::OPTION_KEYS)?;
        let d = Self::default();
        let cfg = Self {
            betas: [
                options::get(opts, "b1", d.betas[0]),
                options::get(opts, "b2", d.betas[1]),
            ],
            eps: options::get(opts, "eps", d.eps),
            eps_root: options::get(opts, "eps_root", d.eps_root),
            threshold: options::get(opts, "threshold", d.threshold),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        options::require_unit_open("b1", self.betas[0])?;
        options::require_unit_open("b2", self.betas[1])?;
        options::require_non_negative("eps", self.eps)?;
        options::require_non_negative("eps_root", self.eps_root)?;
        options::require_positive("threshold", self.threshold)
    }
}

/// Rescales by RAdam's rectified bias-corrected moments
/// ([Liu et al., 2019](https://arxiv.org/abs/1908.03265)).
///
/// With `t = count + 1` and `b2t = b2^t`:
///
/// ```text
/// ro_inf = 2/(1 - b2) - 1
/// ro     = ro_inf - 2*t*b2t / (1 - b2t)
/// ```
///
/// If `ro >= threshold` the variance estimate is tractable and the adaptive
/// step is emitted with the rectifier
/// `r = sqrt((ro-4)(ro-2)ro_inf / ((ro_inf-4)(ro_inf-2)ro))`:
///
/// ```text
/// out = r * mu_hat / (sqrt(nu_hat + eps_root) + eps)
/// ```
///
/// otherwise `out = mu_hat`, with no adaptive denominator at all. The branch
/// is scalar-global per call, never per element. Returns `(out, mu', nu')`.
pub fn scale_by_radam<E: Dtype>(
    x: &[E],
    mu: &[E],
    nu: &[E],
    count: u64,
    cfg: &RAdamConfig,
) -> Result<(Vec<E>, Vec<E>, Vec<E>)> {
    cfg.validate()?;
    check_len(x.len(), mu.len())?;
    check_len(x.len(), nu.len())?;

    let [b1, b2] = cfg.betas;
    let t = count + 1;
    let ro_inf = 2.0 / (1.0 - b2) - 1.0;
    let b2t = b2.powf(t as f64);
    let ro = ro_inf - 2.0 * t as f64 * b2t / (1.0 - b2t);

    let mu_next = update_moment(x, mu, b1, 1)?;
    let nu_next = update_moment(x, nu, b2, 2)?;
    let mu_hat = bias_correction(&mu_next, b1, t);

    let out = if ro >= cfg.threshold {
        let nu_hat = bias_correction(&nu_next, b2, t);
        let r = elem::<E>(
            ((ro - 4.0) * (ro - 2.0) * ro_inf / ((ro_inf - 4.0) * (ro_inf - 2.0) * ro)).sqrt(),
        );
        let eps = elem::<E>(cfg.eps);
        let eps_root = elem::<E>(cfg.eps_root);
        mu_hat
            .iter()
            .zip(nu_hat.iter())
            .map(|(&m, &v)| r * m / ((v + eps_root).sqrt() + eps))
            .collect()
    } else {
        mu_hat
    };
    Ok((out, mu_next, nu_next))
}
