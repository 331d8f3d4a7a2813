//! Table interpolation: piecewise linear, natural cubic spline and
//! N-dimensional multi-linear.
//!
//! Interpolators are built from strictly increasing independent values. The
//! bracketing interval of a query is found by binary search or by hunting
//! from the previous interval ([`LookupScheme`]); hunting is faster for
//! queries that move slowly through the table, e.g. along a trajectory.
//!
//! Queries outside the table either extrapolate the boundary segment or
//! return the boundary value ([`BoundaryHandling`]).
//!
//! # Example
//!
//! ```
//! use astronum::interpolators::{
//!     BoundaryHandling, LinearInterpolator, LookupScheme, OneDimensionalInterpolator,
//! };
//!
//! let interpolator = LinearInterpolator::new(
//!     vec![0.0_f64, 1.0, 3.0],
//!     vec![0.0, 1.0, 3.0],
//!     LookupScheme::Hunting,
//!     BoundaryHandling::Extrapolate,
//! )
//! .unwrap();
//! assert_eq!(interpolator.interpolate(2.0), 2.0);
//! ```

mod linear;
mod lookup;
mod multi_linear;
mod spline;


pub use linear::LinearInterpolator;
pub use lookup::{IntervalLookup, LookupScheme};
pub use multi_linear::MultiLinearInterpolator;
pub use spline::CubicSplineInterpolator;

use crate::traits::FloatScalar;

/// Errors from interpolator construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InterpError {
    /// Not enough data points for the interpolation method.
    #[error("not enough data points for interpolation")]
    TooFewPoints,
    /// The independent values are not strictly increasing.
    #[error("independent values must be strictly increasing")]
    NotSorted,
    /// Independent and dependent data have different lengths.
    #[error("independent and dependent values must have matching lengths")]
    LengthMismatch,
    /// The grid has no dimensions.
    #[error("interpolation grid must have at least one dimension")]
    DimensionMismatch,
}

/// Behaviour for queries outside the independent-value range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BoundaryHandling {
    /// Extend the boundary segment.
    #[default]
    Extrapolate,
    /// Return the value at the nearest boundary.
    UseBoundaryValue,
}

/// Interpolator over a single independent variable.
pub trait OneDimensionalInterpolator<T, V> {
    /// Value at `target`.
    fn interpolate(&self, target: T) -> V;

    /// Independent values of the table.
    fn independent_values(&self) -> &[T];
}

/// Check that `xs` is strictly increasing (NaN fails).
fn validate_sorted<T: FloatScalar>(xs: &[T]) -> Result<(), InterpError> {
    if xs.windows(2).all(|w| w[0] < w[1]) {
        Ok(())
    } else {
        Err(InterpError::NotSorted)
    }
}

/// Clamp `target` into `[xs[0], xs[n - 1]]` when boundary values are used.
fn apply_boundary<T: FloatScalar>(xs: &[T], target: T, boundary: BoundaryHandling) -> T {
    match boundary {
        BoundaryHandling::Extrapolate => target,
        BoundaryHandling::UseBoundaryValue => {
            let first = xs[0];
            let last = xs[xs.len() - 1];
            if target < first {
                first
            } else if target > last {
                last
            } else {
                target
            }
        }
    }
}
