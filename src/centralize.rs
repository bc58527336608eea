//! Gradient centralization
//! ([Yong et al., 2020](https://arxiv.org/abs/2004.01461)).

use crate::dtypes::Dtype;

/// Subtracts the mean: `out = x - mean(x)`. Stateless; the output of any
/// non-empty input has mean zero up to rounding. An empty buffer maps to an
/// empty buffer.
pub fn centralize<E: Dtype>(x: &[E]) -> Vec<E> {
    if x.is_empty() {
        return Vec::new();
    }
    let n = E::from_usize(x.len()).unwrap();
    let mean = x.iter().fold(E::zero(), |acc, &v| acc + v) / n;
    x.iter().map(|&v| v - mean).collect()
}
