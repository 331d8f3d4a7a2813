use alloc::vec::Vec;
use core::ops::{Add, Mul};

use crate::traits::FloatScalar;

use super::lookup::{IntervalLookup, LookupScheme};
use super::{apply_boundary, validate_sorted, BoundaryHandling, InterpError, OneDimensionalInterpolator};

/// Piecewise linear interpolator.
///
/// Dependent values may be scalars or any vector type supporting addition and
/// scaling (e.g. [`StateVector`](crate::StateVector) for tabulated
/// ephemerides). Between `x1` and `x2` the result is
/// `y1 (1 - μ) + y2 μ` with `μ = (x - x1) / (x2 - x1)`.
///
/// ```
/// use astronum::interpolators::{
///     BoundaryHandling, LinearInterpolator, LookupScheme, OneDimensionalInterpolator,
/// };
/// use astronum::StateVector;
///
/// let interpolator = LinearInterpolator::new(
///     vec![0.0_f64, 10.0],
///     vec![StateVector::from_array([0.0, 1.0]), StateVector::from_array([5.0, 3.0])],
///     LookupScheme::BinarySearch,
///     BoundaryHandling::Extrapolate,
/// )
/// .unwrap();
/// assert_eq!(interpolator.interpolate(5.0), StateVector::from_array([2.5, 2.0]));
/// ```
#[derive(Debug, Clone)]
pub struct LinearInterpolator<T, V> {
    independent_values: Vec<T>,
    dependent_values: Vec<V>,
    lookup: IntervalLookup,
    boundary_handling: BoundaryHandling,
}

impl<T, V> LinearInterpolator<T, V>
where
    T: FloatScalar,
    V: Clone + Add<Output = V> + Mul<T, Output = V>,
{
    /// Build from strictly increasing `independent_values` and matching
    /// `dependent_values`.
    ///
    /// # Errors
    ///
    /// [`InterpError::LengthMismatch`], [`InterpError::TooFewPoints`] (fewer
    /// than 2 points) or [`InterpError::NotSorted`].
    pub fn new(
        independent_values: Vec<T>,
        dependent_values: Vec<V>,
        lookup_scheme: LookupScheme,
        boundary_handling: BoundaryHandling,
    ) -> Result<Self, InterpError> {
        if independent_values.len() != dependent_values.len() {
            return Err(InterpError::LengthMismatch);
        }
        if independent_values.len() < 2 {
            return Err(InterpError::TooFewPoints);
        }
        validate_sorted(&independent_values)?;
        Ok(Self {
            independent_values,
            dependent_values,
            lookup: IntervalLookup::new(lookup_scheme),
            boundary_handling,
        })
    }

    /// Dependent values of the table.
    pub fn dependent_values(&self) -> &[V] {
        &self.dependent_values
    }

    /// Slope of the segment bracketing `target`.
    ///
    /// Zero outside the table when boundary values are used.
    pub fn interpolate_derivative(&self, target: T) -> V {
        let xs = &self.independent_values;
        let i = self.lookup.find(xs, target);
        let h = xs[i + 1] - xs[i];
        let outside = target < xs[0] || target > xs[xs.len() - 1];
        let scale = if outside && self.boundary_handling == BoundaryHandling::UseBoundaryValue {
            T::zero()
        } else {
            T::one() / h
        };
        self.dependent_values[i + 1].clone() * scale + self.dependent_values[i].clone() * (-scale)
    }
}

impl<T, V> OneDimensionalInterpolator<T, V> for LinearInterpolator<T, V>
where
    T: FloatScalar,
    V: Clone + Add<Output = V> + Mul<T, Output = V>,
{
    fn interpolate(&self, target: T) -> V {
        let xs = &self.independent_values;
        let target = apply_boundary(xs, target, self.boundary_handling);
        let i = self.lookup.find(xs, target);
        let mu = (target - xs[i]) / (xs[i + 1] - xs[i]);
        self.dependent_values[i].clone() * (T::one() - mu) + self.dependent_values[i + 1].clone() * mu
    }

    fn independent_values(&self) -> &[T] {
        &self.independent_values
    }
}
