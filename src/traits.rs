use core::fmt::Debug;
use num_traits::{Float, Num, NumCast, One, Zero};

/// Trait for types that can be used as state and table elements.
///
/// Blanket-implemented for all types satisfying the bounds.
pub trait Scalar: Copy + PartialEq + Debug + Zero + One + Num {}

impl<T: Copy + PartialEq + Debug + Zero + One + Num> Scalar for T {}

/// Trait for floating-point elements.
///
/// Required by everything that needs `sqrt`, `abs`, `powf` or finiteness
/// checks, which is every algorithm in this crate. Covers `f32` and `f64`.
pub trait FloatScalar: Scalar + Float {}

impl<T: Scalar + Float> FloatScalar for T {}

/// Convert an `f64` constant (Butcher coefficient, default factor) into `T`.
///
/// Every `FloatScalar` can represent an `f64` approximately, so the NaN
/// fallback is never hit for `f32` / `f64`.
#[inline]
pub(crate) fn cast<T: FloatScalar>(value: f64) -> T {
    <T as NumCast>::from(value).unwrap_or_else(T::nan)
}

/// Widen a value to `f64` for error reporting.
#[inline]
pub(crate) fn to_f64<T: FloatScalar>(value: T) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}
