//! Closed option mappings.
//!
//! Every config struct in this crate can be built from a plain
//! `name -> scalar` mapping via its `from_options` constructor. Each function
//! declares its own closed key set: unrecognized keys are a configuration
//! error, omitted keys take the documented defaults. Values are validated
//! eagerly, before any numeric work.

use std::collections::BTreeMap;

use crate::error::{Result, TransformError};

/// A fixed mapping of option name to scalar value.
pub type Options = BTreeMap<String, f64>;

/// Rejects any key outside `allowed`.
pub(crate) fn check_known(opts: &Options, allowed: &[&str]) -> Result<()> {
    for key in opts.keys() {
        if !allowed.contains(&key.as_str()) {
            return Err(TransformError::UnknownOption(key.clone()));
        }
    }
    Ok(())
}

/// Reads `key` from the mapping, falling back to `default`.
pub(crate) fn get(opts: &Options, key: &str, default: f64) -> f64 {
    opts.get(key).copied().unwrap_or(default)
}

/// Requires `value` in `[0, 1)`. Decays that feed bias correction must stay
/// strictly below 1, otherwise `1 - decay^t` is an exact zero.
pub(crate) fn require_unit_open(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && (0.0..1.0).contains(&value) {
        Ok(())
    } else {
        Err(TransformError::InvalidOption { name, value })
    }
}

/// Requires `value` in `[0, 1]`.
pub(crate) fn require_unit_closed(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(TransformError::InvalidOption { name, value })
    }
}

/// Requires a finite `value >= 0`.
pub(crate) fn require_non_negative(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(TransformError::InvalidOption { name, value })
    }
}

/// Requires a finite `value > 0`.
pub(crate) fn require_positive(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(TransformError::InvalidOption { name, value })
    }
}
