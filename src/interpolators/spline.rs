use alloc::vec;
use alloc::vec::Vec;

use crate::traits::{cast, FloatScalar};

use super::lookup::{IntervalLookup, LookupScheme};
use super::{apply_boundary, validate_sorted, BoundaryHandling, InterpError, OneDimensionalInterpolator};

/// Natural cubic spline interpolator.
///
/// The second derivative vanishes at both ends. Second derivatives at the
/// knots come from a tridiagonal system solved by forward elimination and
/// back substitution in O(n); each segment then stores `[a, b, c, d]` for
///
/// `S_i(x) = a + b·(x - x_i) + c·(x - x_i)² + d·(x - x_i)³`
///
/// Requires at least 3 points.
///
/// ```
/// use astronum::interpolators::{
///     BoundaryHandling, CubicSplineInterpolator, LookupScheme, OneDimensionalInterpolator,
/// };
///
/// let spline = CubicSplineInterpolator::new(
///     vec![0.0_f64, 1.0, 2.0, 3.0],
///     vec![0.0, 1.0, 0.0, 1.0],
///     LookupScheme::BinarySearch,
///     BoundaryHandling::Extrapolate,
/// )
/// .unwrap();
/// assert!((spline.interpolate(2.0) - 0.0).abs() < 1e-14);
/// ```
#[derive(Debug, Clone)]
pub struct CubicSplineInterpolator<T> {
    independent_values: Vec<T>,
    coefficients: Vec<[T; 4]>,
    second_derivatives: Vec<T>,
    lookup: IntervalLookup,
    boundary_handling: BoundaryHandling,
}

impl<T: FloatScalar> CubicSplineInterpolator<T> {
    /// Build from strictly increasing `independent_values` and matching
    /// `dependent_values`.
    ///
    /// # Errors
    ///
    /// [`InterpError::LengthMismatch`], [`InterpError::TooFewPoints`] (fewer
    /// than 3 points) or [`InterpError::NotSorted`].
    pub fn new(
        independent_values: Vec<T>,
        dependent_values: Vec<T>,
        lookup_scheme: LookupScheme,
        boundary_handling: BoundaryHandling,
    ) -> Result<Self, InterpError> {
        if independent_values.len() != dependent_values.len() {
            return Err(InterpError::LengthMismatch);
        }
        if independent_values.len() < 3 {
            return Err(InterpError::TooFewPoints);
        }
        validate_sorted(&independent_values)?;

        let xs = &independent_values;
        let ys = &dependent_values;
        let n = xs.len();
        let two: T = cast(2.0);
        let six: T = cast(6.0);

        // h_i = x_{i+1} - x_i, δ_i = (y_{i+1} - y_i) / h_i
        let mut h = vec![T::zero(); n - 1];
        let mut delta = vec![T::zero(); n - 1];
        for i in 0..n - 1 {
            h[i] = xs[i + 1] - xs[i];
            delta[i] = (ys[i + 1] - ys[i]) / h[i];
        }

        // Interior rows i = 1..n-2:
        //   h_{i-1} m_{i-1} + 2(h_{i-1} + h_i) m_i + h_i m_{i+1} = 6(δ_i - δ_{i-1})
        // with m_0 = m_{n-1} = 0.
        let mut m = vec![T::zero(); n];
        let mut upper = vec![T::zero(); n];
        let mut rhs = vec![T::zero(); n];
        for i in 1..n - 1 {
            let diagonal = two * (h[i - 1] + h[i]) - h[i - 1] * upper[i - 1];
            upper[i] = h[i] / diagonal;
            rhs[i] = (six * (delta[i] - delta[i - 1]) - h[i - 1] * rhs[i - 1]) / diagonal;
        }
        for i in (1..n - 1).rev() {
            m[i] = rhs[i] - upper[i] * m[i + 1];
        }

        let coefficients = (0..n - 1)
            .map(|i| {
                let a = ys[i];
                let b = delta[i] - h[i] * (two * m[i] + m[i + 1]) / six;
                let c = m[i] / two;
                let d = (m[i + 1] - m[i]) / (six * h[i]);
                [a, b, c, d]
            })
            .collect();

        Ok(Self {
            independent_values,
            coefficients,
            second_derivatives: m,
            lookup: IntervalLookup::new(lookup_scheme),
            boundary_handling,
        })
    }

    /// Second derivatives of the spline at the knots (zero at both ends).
    pub fn second_derivatives(&self) -> &[T] {
        &self.second_derivatives
    }

    /// First derivative of the spline at `target`.
    ///
    /// Zero outside the table when boundary values are used.
    pub fn interpolate_derivative(&self, target: T) -> T {
        let xs = &self.independent_values;
        let outside = target < xs[0] || target > xs[xs.len() - 1];
        if outside && self.boundary_handling == BoundaryHandling::UseBoundaryValue {
            return T::zero();
        }
        let i = self.lookup.find(xs, target);
        let dx = target - xs[i];
        let [_, b, c, d] = self.coefficients[i];
        let two: T = cast(2.0);
        let three: T = cast(3.0);
        b + dx * (two * c + three * d * dx)
    }
}

impl<T: FloatScalar> OneDimensionalInterpolator<T, T> for CubicSplineInterpolator<T> {
    fn interpolate(&self, target: T) -> T {
        let xs = &self.independent_values;
        let target = apply_boundary(xs, target, self.boundary_handling);
        let i = self.lookup.find(xs, target);
        let dx = target - xs[i];
        let [a, b, c, d] = self.coefficients[i];
        a + dx * (b + dx * (c + dx * d))
    }

    fn independent_values(&self) -> &[T] {
        &self.independent_values
    }
}
