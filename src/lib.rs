//! # gradkit
//!
//! Composable, stateless gradient transformations for assembling
//! gradient-based optimizers, written entirely in rust!
//!
//! Every transform is a pure function: it consumes a gradient-like buffer
//! (and, for adaptive methods, auxiliary state buffers plus a step count)
//! and returns a transformed buffer together with the updated state.
//! Optimizers such as Adam, RAdam, AdaBelief or LAMB-style trust-ratio
//! scaling fall out of chaining these functions per step and threading the
//! returned state back in; there is no optimizer object and no hidden
//! state anywhere in the crate.
//!
//! # Transforms
//!
//! | Transform | State | Reference |
//! | --- | --- | --- |
//! | [scale()] | none | fixed step size |
//! | [scale_by_schedule] | none | external `step -> scalar` function |
//! | [scale_by_adam] | mu, nu | Kingma & Ba, 2014 |
//! | [scale_by_belief] | mu, nu | Zhuang et al., 2020 |
//! | [scale_by_radam] | mu, nu | Liu et al., 2019 |
//! | [scale_by_rms] | nu | Hinton, 2012 |
//! | [scale_by_stddev] | mu, nu | centered RMS |
//! | [scale_by_rss] | sum of squares | Duchi et al., 2011 |
//! | [scale_by_trust_ratio] | none | You et al., 2019 |
//! | [trace()] | trace | classic/Nesterov momentum |
//! | [clip()], [clip_by_global_norm] | none | gradient clipping |
//! | [centralize()] | none | Yong et al., 2020 |
//! | [add_decayed_weights] | none | L2 weight decay |
//! | [apply_every] | accumulator | micro-batch accumulation |
//!
//! # Composing an optimizer step
//!
//! The caller owns all state (moments, step count) and threads it across
//! steps. A clipped Adam step looks like:
//!
//! ```rust
//! use gradkit::prelude::*;
//!
//! let grad = [0.8f64, -2.5, 0.1];
//! let mut mu = vec![0.0; 3];
//! let mut nu = vec![0.0; 3];
//! let mut count = 0;
//!
//! for _ in 0..10 {
//!     let g = clip_by_global_norm(&grad, &GlobalNormConfig { max_norm: 1.0 })?;
//!     let (g, mu_next, nu_next) = scale_by_adam(&g, &mu, &nu, count, &AdamConfig::default())?;
//!     let update = scale(&g, -1e-3);
//!     // apply `update` to the parameters, then thread the state forward
//!     # assert!(update.iter().all(|v| v.is_finite()));
//!     mu = mu_next;
//!     nu = nu_next;
//!     count += 1;
//! }
//! # Ok::<(), gradkit::TransformError>(())
//! ```
//!
//! # Options
//!
//! Each configurable transform has a `*Config` struct with documented
//! defaults, and a `from_options` constructor over a closed
//! `name -> scalar` mapping for callers that configure optimizers from
//! parsed input. Unknown keys and out-of-range values are configuration
//! errors, raised before any numeric work:
//!
//! ```rust
//! use gradkit::{AdamConfig, Options, TransformError};
//!
//! let mut opts = Options::new();
//! opts.insert("b1".into(), 0.95);
//! let cfg = AdamConfig::from_options(&opts).unwrap();
//! assert_eq!(cfg.betas, [0.95, 0.999]);
//!
//! opts.insert("lr".into(), 1e-3);
//! assert_eq!(
//!     AdamConfig::from_options(&opts),
//!     Err(TransformError::UnknownOption("lr".into())),
//! );
//! ```
//!
//! No legitimate input sequence yields NaN or Inf through any adaptive
//! scaler: zero norms, zero accumulators and zero gradients all resolve to
//! well-defined outputs.

pub mod accumulate;
pub mod adam;
pub mod centralize;
pub mod clip;
pub mod dtypes;
pub mod error;
pub mod moments;
pub mod options;
pub mod radam;
pub mod rms;
pub mod scale;
pub mod trace;
pub mod trust_ratio;
pub mod weight_decay;

pub use accumulate::{apply_every, ApplyEveryConfig};
pub use adam::{scale_by_adam, scale_by_belief, AdamConfig, BeliefConfig};
pub use centralize::centralize;
pub use clip::{clip, clip_by_global_norm, ClipConfig, GlobalNormConfig};
pub use dtypes::Dtype;
pub use error::{Result, TransformError};
pub use moments::{bias_correction, global_norm, safe_norm, update_moment};
pub use options::Options;
pub use radam::{scale_by_radam, RAdamConfig};
pub use rms::{scale_by_rms, scale_by_rss, scale_by_stddev, RmsConfig, RssConfig, StddevConfig};
pub use scale::{scale, scale_by_schedule};
pub use trace::{trace, TraceConfig};
pub use trust_ratio::{scale_by_trust_ratio, TrustRatioConfig};
pub use weight_decay::{add_decayed_weights, DecayConfig};

/// Contains all public exports.
pub mod prelude {
    pub use crate::accumulate::{apply_every, ApplyEveryConfig};
    pub use crate::adam::{scale_by_adam, scale_by_belief, AdamConfig, BeliefConfig};
    pub use crate::centralize::centralize;
    pub use crate::clip::{clip, clip_by_global_norm, ClipConfig, GlobalNormConfig};
    pub use crate::dtypes::Dtype;
    pub use crate::error::{Result, TransformError};
    pub use crate::moments::{bias_correction, global_norm, safe_norm, update_moment};
    pub use crate::options::Options;
    pub use crate::radam::{scale_by_radam, RAdamConfig};
    pub use crate::rms::{
        scale_by_rms, scale_by_rss, scale_by_stddev, RmsConfig, RssConfig, StddevConfig,
    };
    pub use crate::scale::{scale, scale_by_schedule};
    pub use crate::trace::{trace, TraceConfig};
    pub use crate::trust_ratio::{scale_by_trust_ratio, TrustRatioConfig};
    pub use crate::weight_decay::{add_decayed_weights, DecayConfig};
}
