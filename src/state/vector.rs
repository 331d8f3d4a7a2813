use core::ops::{Add, AddAssign, Div, Index, IndexMut, Mul, Neg, Sub, SubAssign};

use crate::traits::{FloatScalar, Scalar};

use super::State;

/// Fixed-size state vector (stack-allocated, `Copy`).
///
/// The usual choice for orbit propagation: position/velocity states have a
/// length known at compile time.
///
/// # Examples
///
/// ```
/// use astronum::StateVector;
///
/// let r = StateVector::from_array([7000.0_f64, 0.0, 0.0]);
/// let v = StateVector::from_array([0.0_f64, 7.5, 0.0]);
/// let s = r + v * 10.0;
/// assert_eq!(s[1], 75.0);
/// assert_eq!(s.len(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateVector<T, const N: usize> {
    data: [T; N],
}

impl<T: Scalar, const N: usize> StateVector<T, N> {
    /// Create a state vector from an array.
    #[inline]
    pub const fn from_array(data: [T; N]) -> Self {
        Self { data }
    }

    /// A state vector of zeros.
    #[inline]
    pub fn zeros() -> Self {
        Self { data: [T::zero(); N] }
    }

    /// Build a state vector from a function of the index.
    pub fn from_fn(mut f: impl FnMut(usize) -> T) -> Self {
        let mut data = [T::zero(); N];
        for (i, x) in data.iter_mut().enumerate() {
            *x = f(i);
        }
        Self { data }
    }

    /// Number of elements.
    #[inline]
    pub const fn len(&self) -> usize {
        N
    }

    /// Whether the vector has no elements (`N == 0`).
    #[inline]
    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Dot product.
    pub fn dot(&self, rhs: &Self) -> T {
        let mut sum = T::zero();
        for i in 0..N {
            sum = sum + self.data[i] * rhs.data[i];
        }
        sum
    }
}

impl<T: FloatScalar, const N: usize> StateVector<T, N> {
    /// Element-wise absolute value.
    pub fn abs(&self) -> Self {
        Self::from_fn(|i| self.data[i].abs())
    }

    /// Euclidean (L2) norm.
    pub fn norm(&self) -> T {
        self.dot(self).sqrt()
    }

    /// Largest element.
    ///
    /// Returns `-inf` for an empty vector. A NaN element propagates.
    pub fn max_element(&self) -> T {
        let mut max = T::neg_infinity();
        for &x in &self.data {
            if x.is_nan() {
                return x;
            }
            if x > max {
                max = x;
            }
        }
        max
    }
}

impl<T: FloatScalar, const N: usize> State<T> for StateVector<T, N> {
    #[inline]
    fn len(&self) -> usize {
        N
    }

    #[inline]
    fn component(&self, index: usize) -> T {
        self.data[index]
    }

    fn abs(&self) -> Self {
        StateVector::abs(self)
    }

    fn norm(&self) -> T {
        StateVector::norm(self)
    }
}

impl<T: Scalar, const N: usize> From<[T; N]> for StateVector<T, N> {
    fn from(data: [T; N]) -> Self {
        Self { data }
    }
}

impl<T, const N: usize> Index<usize> for StateVector<T, N> {
    type Output = T;

    #[inline]
    fn index(&self, i: usize) -> &T {
        &self.data[i]
    }
}

impl<T, const N: usize> IndexMut<usize> for StateVector<T, N> {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut T {
        &mut self.data[i]
    }
}

// ── Arithmetic ──────────────────────────────────────────────────────

impl<T: Scalar, const N: usize> Add for StateVector<T, N> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::from_fn(|i| self.data[i] + rhs.data[i])
    }
}

impl<T: Scalar, const N: usize> AddAssign for StateVector<T, N> {
    fn add_assign(&mut self, rhs: Self) {
        for i in 0..N {
            self.data[i] = self.data[i] + rhs.data[i];
        }
    }
}

impl<T: Scalar, const N: usize> Sub for StateVector<T, N> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::from_fn(|i| self.data[i] - rhs.data[i])
    }
}

impl<T: Scalar, const N: usize> SubAssign for StateVector<T, N> {
    fn sub_assign(&mut self, rhs: Self) {
        for i in 0..N {
            self.data[i] = self.data[i] - rhs.data[i];
        }
    }
}

impl<T: Scalar, const N: usize> Neg for StateVector<T, N> {
    type Output = Self;

    fn neg(self) -> Self {
        Self::from_fn(|i| T::zero() - self.data[i])
    }
}

impl<T: Scalar, const N: usize> Mul<T> for StateVector<T, N> {
    type Output = Self;

    fn mul(self, rhs: T) -> Self {
        Self::from_fn(|i| self.data[i] * rhs)
    }
}

impl<T: Scalar, const N: usize> Div<T> for StateVector<T, N> {
    type Output = Self;

    fn div(self, rhs: T) -> Self {
        Self::from_fn(|i| self.data[i] / rhs)
    }
}
