//! Adam and AdaBelief moment scalers.
//!
//! Both maintain two exponential moving averages per parameter:
//!
//!   mu (1st moment): average of gradients (direction)
//!   nu (2nd moment): average of squared gradients (Adam) or of squared
//!                    prediction errors (AdaBelief)
//!
//! and rescale the bias-corrected first moment by the bias-corrected second.

use crate::dtypes::{elem, Dtype};
use crate::error::{check_len, Result};
use crate::moments::{bias_correction, update_moment};
use crate::options::{self, Options};

/// Configuration of hyperparameters for [scale_by_adam].
///
/// Changing all default parameters:
/// ```rust
/// # use gradkit::AdamConfig;
/// AdamConfig {
///     betas: [0.1, 0.2],
///     eps: 1e-6,
///     eps_root: 1e-12,
/// };
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdamConfig {
    /// Decay rates for the 1st and 2nd moment. Defaults to `[0.9, 0.999]`.
    pub betas: [f64; 2],

    /// Added to the denominator, outside the square root. Defaults to `1e-8`.
    pub eps: f64,

    /// Added to the square root argument, inside it. Defaults to `0`.
    ///
    /// `eps` stabilizes the division and `eps_root` stabilizes the root —
    /// they are not interchangeable.
    pub eps_root: f64,
}

impl Default for AdamConfig {
    fn default() -> Self {
        Self {
            betas: [0.9, 0.999],
            eps: 1e-8,
            eps_root: 0.0,
        }
    }
}

impl AdamConfig {
    pub const OPTION_KEYS: &'static [&'static str] = &["b1", "b2", "eps", "eps_root"];

    /// Builds a config from a closed option mapping. Unknown keys fail with
    /// [crate::TransformError::UnknownOption]; omitted keys take defaults.
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
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        options::require_unit_open("b1", self.betas[0])?;
        options::require_unit_open("b2", self.betas[1])?;
        options::require_non_negative("eps", self.eps)?;
        options::require_non_negative("eps_root", self.eps_root)
    }
}

/// Rescales by Adam's bias-corrected moments
/// ([Kingma & Ba, 2014](https://arxiv.org/abs/1412.6980)).
///
/// With `t = count + 1`:
///
/// ```text
/// mu'    = (1 - b1) * x  + b1 * mu
/// nu'    = (1 - b2) * x² + b2 * nu
/// mu_hat = mu' / (1 - b1^t)
/// nu_hat = nu' / (1 - b2^t)
/// out    = mu_hat / (sqrt(nu_hat + eps_root) + eps)
/// ```
///
/// `count` is the number of steps already completed; state buffers are
/// caller-owned and must be zero-initialized before the first call. Returns
/// `(out, mu', nu')` for the caller to thread into the next step.
pub fn scale_by_adam<E: Dtype>(
    x: &[E],
    mu: &[E],
    nu: &[E],
    count: u64,
    cfg: &AdamConfig,
) -> Result<(Vec<E>, Vec<E>, Vec<E>)> {
    cfg.validate()?;
    check_len(x.len(), mu.len())?;
    check_len(x.len(), nu.len())?;

    let t = count + 1;
    let mu_next = update_moment(x, mu, cfg.betas[0], 1)?;
    let nu_next = update_moment(x, nu, cfg.betas[1], 2)?;
    let mu_hat = bias_correction(&mu_next, cfg.betas[0], t);
    let nu_hat = bias_correction(&nu_next, cfg.betas[1], t);

    let eps = elem::<E>(cfg.eps);
    let eps_root = elem::<E>(cfg.eps_root);
    let out = mu_hat
        .iter()
        .zip(nu_hat.iter())
        .map(|(&m, &v)| m / ((v + eps_root).sqrt() + eps))
        .collect();
    Ok((out, mu_next, nu_next))
}

/// Configuration of hyperparameters for [scale_by_belief].
///
/// The defaults swap the roles of `eps` and `eps_root` relative to
/// [AdamConfig]: AdaBelief's variance estimate can reach an exact zero on
/// the first step, so the stabilizer sits inside the root.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeliefConfig {
    /// Decay rates for the 1st and 2nd moment. Defaults to `[0.9, 0.999]`.
    pub betas: [f64; 2],

    /// Added to the denominator, outside the square root. Defaults to `0`.
    pub eps: f64,

    /// Added to the square root argument, inside it. Defaults to `1e-16`.
    pub eps_root: f64,
}

impl Default for BeliefConfig {
    fn default() -> Self {
        Self {
            betas: [0.9, 0.999],
            eps: 0.0,
            eps_root: 1e-16,
        }
    }
}

impl BeliefConfig {
    pub const OPTION_KEYS: &'static [&'static str] = &["b1", "b2", "eps", "eps_root"];

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
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        options::require_unit_open("b1", self.betas[0])?;
        options::require_unit_open("b2", self.betas[1])?;
        options::require_non_negative("eps", self.eps)?;
        options::require_non_negative("eps_root", self.eps_root)
    }
}

/// Rescales by AdaBelief's belief in the gradient
/// ([Zhuang et al., 2020](https://arxiv.org/abs/2010.07468)).
///
/// Identical to [scale_by_adam] except the second moment tracks the squared
/// prediction error `x - mu'` instead of the squared gradient:
///
/// ```text
/// mu' = (1 - b1) * x + b1 * mu
/// nu' = (1 - b2) * (x - mu')² + b2 * nu
/// ```
///
/// Returns `(out, mu', nu')`.
pub fn scale_by_belief<E: Dtype>(
    x: &[E],
    mu: &[E],
    nu: &[E],
    count: u64,
    cfg: &BeliefConfig,
) -> Result<(Vec<E>, Vec<E>, Vec<E>)> {
    cfg.validate()?;
    check_len(x.len(), mu.len())?;
    check_len(x.len(), nu.len())?;

    let t = count + 1;
    let mu_next = update_moment(x, mu, cfg.betas[0], 1)?;
    let pred_error: Vec<E> = x
        .iter()
        .zip(mu_next.iter())
        .map(|(&g, &m)| g - m)
        .collect();
    let nu_next = update_moment(&pred_error, nu, cfg.betas[1], 2)?;
    let mu_hat = bias_correction(&mu_next, cfg.betas[0], t);
    let nu_hat = bias_correction(&nu_next, cfg.betas[1], t);

    let eps = elem::<E>(cfg.eps);
    let eps_root = elem::<E>(cfg.eps_root);
    let out = mu_hat
        .iter()
        .zip(nu_hat.iter())
        .map(|(&m, &v)| m / ((v + eps_root).sqrt() + eps))
        .collect();
    Ok((out, mu_next, nu_next))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::AssertClose;
    use crate::TransformError;

    #[test]
    fn test_adam_first_step_closed_form() {
        // From a zero state, one step must match the closed form exactly.
        let g = [1.0, -2.0];
        let zeros = [0.0, 0.0];
        let cfg = AdamConfig::default();
        let (out, mu, nu) = scale_by_adam(&g, &zeros, &zeros, 0, &cfg).unwrap();

        let expected_mu: Vec<f64> = g.iter().map(|&gi| (1.0 - 0.9) * gi).collect();
        let expected_nu: Vec<f64> = g.iter().map(|&gi| (1.0 - 0.999) * gi * gi).collect();
        let expected_out: Vec<f64> = g
            .iter()
            .map(|&gi| {
                let mu_hat = (1.0 - 0.9) * gi / (1.0 - 0.9f64.powf(1.0));
                let nu_hat = (1.0 - 0.999) * gi * gi / (1.0 - 0.999f64.powf(1.0));
                mu_hat / (nu_hat.sqrt() + 1e-8)
            })
            .collect();

        mu.assert_close(&expected_mu, 1e-12);
        nu.assert_close(&expected_nu, 1e-12);
        out.assert_close(&expected_out, 1e-12);
    }

    #[test]
    fn test_adam_threads_state_across_steps() {
        let g = [0.5, -1.0, 2.0];
        let mut mu = vec![0.0; 3];
        let mut nu = vec![0.0; 3];
        let cfg = AdamConfig::default();
        for count in 0..4 {
            let (out, mu_next, nu_next) = scale_by_adam(&g, &mu, &nu, count, &cfg).unwrap();
            assert!(out.iter().all(|v: &f64| v.is_finite()));
            mu = mu_next;
            nu = nu_next;
        }
        // A constant gradient drives the bias-corrected direction toward
        // sign(g), so updates approach g / |g|.
        let expected_mu: Vec<f64> = g.iter().map(|&gi| (1.0 - 0.9f64.powf(4.0)) * gi).collect();
        mu.assert_close(&expected_mu, 1e-12);
    }

    #[test]
    fn test_adam_eps_root_inside_sqrt() {
        // With nu_hat == 0 and eps == 0 only eps_root keeps the division
        // finite: out = mu_hat / sqrt(eps_root).
        let cfg = AdamConfig {
            betas: [0.0, 0.999],
            eps: 0.0,
            eps_root: 1e-4,
        };
        let (out, _, _) = scale_by_adam(&[1.0], &[0.0], &[0.0], 0, &cfg).unwrap();
        let nu_hat = (1.0 - 0.999) * 1.0 / (1.0 - 0.999f64.powf(1.0));
        out.assert_close(&[1.0 / (nu_hat + 1e-4).sqrt()], 1e-12);
    }

    #[test]
    fn test_adam_determinism() {
        let g = [0.25, -0.75];
        let mu = [0.125, 0.0625];
        let nu = [0.5, 0.25];
        let cfg = AdamConfig::default();
        let a = scale_by_adam(&g, &mu, &nu, 3, &cfg).unwrap();
        let b = scale_by_adam(&g, &mu, &nu, 3, &cfg).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_adam_from_options() {
        let mut opts = Options::new();
        opts.insert("b1".into(), 0.5);
        let cfg = AdamConfig::from_options(&opts).unwrap();
        assert_eq!(cfg.betas, [0.5, 0.999]);
        assert_eq!(cfg.eps, 1e-8);

        opts.insert("momentum".into(), 0.9);
        assert_eq!(
            AdamConfig::from_options(&opts),
            Err(TransformError::UnknownOption("momentum".into()))
        );
    }

    #[test]
    fn test_adam_rejects_invalid_beta() {
        let cfg = AdamConfig {
            betas: [1.0, 0.999],
            ..Default::default()
        };
        let err = scale_by_adam(&[1.0], &[0.0], &[0.0], 0, &cfg).unwrap_err();
        assert_eq!(
            err,
            TransformError::InvalidOption {
                name: "b1",
                value: 1.0
            }
        );
    }

    #[test]
    fn test_adam_shape_mismatch_fails_before_compute() {
        let err = scale_by_adam(&[1.0, 2.0], &[0.0], &[0.0, 0.0], 0, &AdamConfig::default())
            .unwrap_err();
        assert_eq!(
            err,
            TransformError::ShapeMismatch {
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_belief_default_epsilons_swapped() {
        let cfg = BeliefConfig::default();
        assert_eq!(cfg.eps, 0.0);
        assert_eq!(cfg.eps_root, 1e-16);
    }

    #[test]
    fn test_belief_first_step_closed_form() {
        let g = [2.0, -0.5];
        let zeros = [0.0, 0.0];
        let cfg = BeliefConfig::default();
        let (out, mu, nu) = scale_by_belief(&g, &zeros, &zeros, 0, &cfg).unwrap();

        let expected: Vec<(f64, f64, f64)> = g
            .iter()
            .map(|&gi| {
                let mu_p = (1.0 - 0.9) * gi;
                let err = gi - mu_p;
                let nu_p = (1.0 - 0.999) * err * err;
                let mu_hat = mu_p / (1.0 - 0.9f64.powf(1.0));
                let nu_hat = nu_p / (1.0 - 0.999f64.powf(1.0));
                (mu_hat / (nu_hat + 1e-16).sqrt(), mu_p, nu_p)
            })
            .collect();

        let expected_out: Vec<f64> = expected.iter().map(|e| e.0).collect();
        let expected_mu: Vec<f64> = expected.iter().map(|e| e.1).collect();
        let expected_nu: Vec<f64> = expected.iter().map(|e| e.2).collect();
        out.assert_close(&expected_out, 1e-9);
        mu.assert_close(&expected_mu, 1e-12);
        nu.assert_close(&expected_nu, 1e-12);
    }

    #[test]
    fn test_belief_zero_gradient_stays_finite() {
        // Zero gradient, zero state: the variance estimate is exactly zero
        // and only eps_root keeps the division finite.
        let zeros = [0.0, 0.0, 0.0];
        let (out, _, _) =
            scale_by_belief(&zeros, &zeros, &zeros, 0, &BeliefConfig::default()).unwrap();
        out.assert_close(&[0.0, 0.0, 0.0], 1e-12);
    }
}
