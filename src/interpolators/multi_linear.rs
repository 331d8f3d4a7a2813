use alloc::vec::Vec;
use core::ops::{Add, Mul};

use crate::traits::FloatScalar;

use super::lookup::{IntervalLookup, LookupScheme};
use super::{apply_boundary, validate_sorted, BoundaryHandling, InterpError};

/// Multi-linear interpolator on a rectangular grid of `D` dimensions.
///
/// Values are stored flat in row-major order: the last dimension varies
/// fastest, so the value at grid index `(i_0, .., i_{D-1})` is
/// `values[Σ i_k · stride_k]`. A query blends the `2^D` corners of the
/// bracketing cell one dimension at a time, each dimension with its own
/// lookup scheme.
///
/// ```
/// use astronum::interpolators::{BoundaryHandling, LookupScheme, MultiLinearInterpolator};
///
/// // z = x + 10 y on a 2 × 3 grid
/// let x = vec![0.0_f64, 1.0];
/// let y = vec![0.0, 1.0, 2.0];
/// let values = vec![0.0, 10.0, 20.0, 1.0, 11.0, 21.0];
/// let interpolator = MultiLinearInterpolator::new(
///     [x, y],
///     values,
///     [LookupScheme::BinarySearch, LookupScheme::Hunting],
///     BoundaryHandling::Extrapolate,
/// )
/// .unwrap();
/// assert!((interpolator.interpolate([0.5, 1.5]) - 15.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct MultiLinearInterpolator<T, V, const D: usize> {
    independent_values: [Vec<T>; D],
    values: Vec<V>,
    strides: [usize; D],
    lookups: [IntervalLookup; D],
    boundary_handling: BoundaryHandling,
}

impl<T, V, const D: usize> MultiLinearInterpolator<T, V, D>
where
    T: FloatScalar,
    V: Clone + Add<Output = V> + Mul<T, Output = V>,
{
    /// Build from `D` strictly increasing axes and the row-major grid values.
    ///
    /// # Errors
    ///
    /// [`InterpError::DimensionMismatch`] if `D == 0`,
    /// [`InterpError::TooFewPoints`] if an axis has fewer than 2 points,
    /// [`InterpError::NotSorted`], or [`InterpError::LengthMismatch`] if
    /// `values.len()` differs from the product of the axis lengths.
    pub fn new(
        independent_values: [Vec<T>; D],
        values: Vec<V>,
        lookup_schemes: [LookupScheme; D],
        boundary_handling: BoundaryHandling,
    ) -> Result<Self, InterpError> {
        if D == 0 {
            return Err(InterpError::DimensionMismatch);
        }
        for axis in &independent_values {
            if axis.len() < 2 {
                return Err(InterpError::TooFewPoints);
            }
            validate_sorted(axis)?;
        }

        let mut strides = [1usize; D];
        for k in (1..D).rev() {
            strides[k - 1] = strides[k] * independent_values[k].len();
        }
        let grid_size: usize = independent_values.iter().map(Vec::len).product();
        if grid_size != values.len() {
            return Err(InterpError::LengthMismatch);
        }

        Ok(Self {
            independent_values,
            values,
            strides,
            lookups: lookup_schemes.map(IntervalLookup::new),
            boundary_handling,
        })
    }

    /// Grid axes.
    pub fn independent_values(&self) -> &[Vec<T>; D] {
        &self.independent_values
    }

    /// Value at `target`.
    pub fn interpolate(&self, target: [T; D]) -> V {
        let mut lower = [0usize; D];
        let mut fractions = [T::zero(); D];
        for k in 0..D {
            let axis = &self.independent_values[k];
            let x = apply_boundary(axis, target[k], self.boundary_handling);
            let i = self.lookups[k].find(axis, x);
            lower[k] = i;
            fractions[k] = (x - axis[i]) / (axis[i + 1] - axis[i]);
        }
        self.blend(0, 0, &lower, &fractions)
    }

    /// Blend dimension `dimension` onwards, the earlier dimensions fixed by
    /// `offset`.
    fn blend(&self, dimension: usize, offset: usize, lower: &[usize; D], fractions: &[T; D]) -> V {
        if dimension == D {
            return self.values[offset].clone();
        }
        let base = offset + lower[dimension] * self.strides[dimension];
        let below = self.blend(dimension + 1, base, lower, fractions);
        let above = self.blend(dimension + 1, base + self.strides[dimension], lower, fractions);
        let mu = fractions[dimension];
        below * (T::one() - mu) + above * mu
    }
}
