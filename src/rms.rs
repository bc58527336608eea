//! RMS-family scalers: the decayed second-moment scaler, its centered
//! (stddev) variant, and the undecayed sum-of-squares accumulator.

use crate::dtypes::{elem, Dtype};
use crate::error::{check_len, Result};
use crate::moments::update_moment;
use crate::options::{self, Options};

/// Configuration of hyperparameters for [scale_by_rms].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RmsConfig {
    /// Decay rate of the squared-gradient average. Defaults to `0.9`.
    pub decay: f64,

    /// Added inside the reciprocal square root. Defaults to `1e-8`.
    pub eps: f64,
}

impl Default for RmsConfig {
    fn default() -> Self {
        Self {
            decay: 0.9,
            eps: 1e-8,
        }
    }
}

impl RmsConfig {
    pub const OPTION_KEYS: &'static [&'static str] = &["decay", "eps"];

    /// Builds a config from a closed option mapping.
    pub fn from_options(opts: &Options) -> Result<Self> {
        options::check_known(opts, Self::OPTION_KEYS)?;
        let d = Self::default();
        let cfg = Self {
            decay: options::get(opts, "decay", d.decay),
            eps: options::get(opts, "eps", d.eps),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        options::require_unit_closed("decay", self.decay)?;
        options::require_non_negative("eps", self.eps)
    }
}

/// Rescales by the root of a decayed squared-gradient average
/// ([Hinton, 2012](http://www.cs.toronto.edu/%7Etijmen/csc321/slides/lecture_slides_lec6.pdf)):
///
/// ```text
/// nu' = (1 - decay) * x² + decay * nu
/// out = x * rsqrt(nu' + eps)
/// ```
///
/// Unlike [crate::scale_by_adam] there is no bias correction; the asymmetry
/// is intentional and matches the reference algorithm. Returns `(out, nu')`.
pub fn scale_by_rms<E: Dtype>(x: &[E], nu: &[E], cfg: &RmsConfig) -> Result<(Vec<E>, Vec<E>)> {
    cfg.validate()?;
    check_len(x.len(), nu.len())?;

    let nu_next = update_moment(x, nu, cfg.decay, 2)?;
    let eps = elem::<E>(cfg.eps);
    let out = x
        .iter()
        .zip(nu_next.iter())
        .map(|(&g, &v)| g * (v + eps).sqrt().recip())
        .collect();
    Ok((out, nu_next))
}

/// Configuration of hyperparameters for [scale_by_stddev].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StddevConfig {
    /// Decay rate shared by both moment averages. Defaults to `0.9`.
    pub decay: f64,

    /// Added inside the reciprocal square root. Defaults to `1e-8`.
    pub eps: f64,
}

impl Default for StddevConfig {
    fn default() -> Self {
        Self {
            decay: 0.9,
            eps: 1e-8,
        }
    }
}

impl StddevConfig {
    pub const OPTION_KEYS: &'static [&'static str] = &["decay", "eps"];

    /// Builds a config from a closed option mapping.
    pub fn from_options(opts: &Options) -> Result<Self> {
        options::check_known(opts, Self::OPTION_KEYS)?;
        let d = Self::default();
        let cfg = Self {
            decay: options::get(opts, "decay", d.decay),
            eps: options::get(opts, "eps", d.eps),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        options::require_unit_closed("decay", self.decay)?;
        options::require_non_negative("eps", self.eps)
    }
}

/// Rescales by an estimate of the gradient's standard deviation, the
/// centered variant of [scale_by_rms]:
///
/// ```text
/// mu' = (1 - decay) * x  + decay * mu
/// nu' = (1 - decay) * x² + decay * nu
/// out = x * rsqrt(nu' - mu'² + eps)
/// ```
///
/// Near zero variance `nu' - mu'²` can come out as a small negative number
/// from floating-point cancellation. The reference value is reproduced
/// rather than clamped, so the root argument relies on `eps` staying above
/// the cancellation error. Returns `(out, mu', nu')`.
pub fn scale_by_stddev<E: Dtype>(
    x: &[E],
    mu: &[E],
    nu: &[E],
    cfg: &StddevConfig,
) -> Result<(Vec<E>, Vec<E>, Vec<E>)> {
    cfg.validate()?;
    check_len(x.len(), mu.len())?;
    check_len(x.len(), nu.len())?;

    let mu_next = update_moment(x, mu, cfg.decay, 1)?;
    let nu_next = update_moment(x, nu, cfg.decay, 2)?;
    let eps = elem::<E>(cfg.eps);
    let out = x
        .iter()
        .zip(mu_next.iter().zip(nu_next.iter()))
        .map(|(&g, (&m, &v))| g * (v - m * m + eps).sqrt().recip())
        .collect();
    Ok((out, mu_next, nu_next))
}

/// Configuration of hyperparameters for [scale_by_rss].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RssConfig {
    /// Added inside the reciprocal square root. Defaults to `1e-7`.
    pub eps: f64,
}

impl Default for RssConfig {
    fn default() -> Self {
        Self { eps: 1e-7 }
    }
}

impl RssConfig {
    pub const OPTION_KEYS: &'static [&'static str] = &["eps"];

    /// Builds a config from a closed option mapping.
    pub fn from_options(opts: &Options) -> Result<Self> {
        options::check_known(opts, Self::OPTION_KEYS)?;
        let d = Self::default();
        let cfg = Self {
            eps: options::get(opts, "eps", d.eps),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        options::require_non_negative("eps", self.eps)
    }
}

/// Rescales by the running, undecayed sum of squared gradients (the AdaGrad
/// accumulator, [Duchi et al., 2011](https://jmlr.org/papers/v12/duchi11a.html)):
///
/// ```text
/// ss'   = x² + sum_of_squares
/// scale = ss' > 0 ? rsqrt(ss' + eps) : 0
/// out   = scale * x
/// ```
///
/// The elementwise zero guard makes a parameter whose accumulator is still
/// exactly zero produce a zero update, never NaN. Returns `(out, ss')`.
pub fn scale_by_rss<E: Dtype>(
    x: &[E],
    sum_of_squares: &[E],
    cfg: &RssConfig,
) -> Result<(Vec<E>, Vec<E>)> {
    cfg.validate()?;
    check_len(x.len(), sum_of_squares.len())?;

    let ss_next: Vec<E> = x
        .iter()
        .zip(sum_of_squares.iter())
        .map(|(&g, &s)| g * g + s)
        .collect();
    let eps = elem::<E>(cfg.eps);
    let out = x
        .iter()
        .zip(ss_next.iter())
        .map(|(&g, &s)| {
            let inv = if s > E::zero() {
                (s + eps).sqrt().recip()
            } else {
                E::zero()
            };
            inv * g
        })
        .collect();
    Ok((out, ss_next))
}
