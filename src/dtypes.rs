//! Element type traits. Contains [Dtype], the bound every transform is
//! generic over.

/// Represents a floating point element of a gradient buffer. The transforms
/// divide and take roots, so unlike a general tensor element this is
/// restricted to float types.
pub trait Dtype:
    'static
    + Copy
    + Clone
    + Default
    + std::fmt::Debug
    + std::fmt::Display
    + PartialEq
    + PartialOrd
    + Send
    + Sync
    + std::marker::Unpin
    + num_traits::Float
    + num_traits::FromPrimitive
    + num_traits::ToPrimitive
{
}
impl Dtype for f32 {}
impl Dtype for f64 {}

/// Converts an `f64` hyperparameter into the element type at the kernel
/// boundary. Lossy for `f32` in the usual float-narrowing sense.
pub(crate) fn elem<E: Dtype>(x: f64) -> E {
    E::from_f64(x).unwrap()
}
