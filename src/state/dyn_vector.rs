use alloc::vec::Vec;
use core::ops::{Add, Div, Index, IndexMut, Mul, Neg, Sub};

use crate::traits::{FloatScalar, Scalar};

use super::State;

/// Heap-allocated state vector with a runtime length.
///
/// Dynamic counterpart of [`StateVector`](super::StateVector), for systems
/// whose dimension is only known at run time (e.g. variational equations
/// appended to a trajectory state). Arithmetic between vectors of different
/// lengths panics.
///
/// # Examples
///
/// ```
/// use astronum::DynStateVector;
///
/// let v = DynStateVector::from_vec(vec![1.0_f64, 2.0, 3.0]);
/// let w = v.clone() + v * 2.0;
/// assert_eq!(w[2], 9.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DynStateVector<T> {
    data: Vec<T>,
}

impl<T: Scalar> DynStateVector<T> {
    /// Create a state vector from an owned `Vec`.
    pub fn from_vec(data: Vec<T>) -> Self {
        Self { data }
    }

    /// Create a state vector by copying a slice.
    pub fn from_slice(data: &[T]) -> Self {
        Self {
            data: data.to_vec(),
        }
    }

    /// A zero vector of length `n`.
    pub fn zeros(n: usize) -> Self {
        Self {
            data: alloc::vec![T::zero(); n],
        }
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the vector has no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The elements as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Dot product. Panics on length mismatch.
    pub fn dot(&self, rhs: &Self) -> T {
        assert_eq!(self.len(), rhs.len(), "length mismatch: {} . {}", self.len(), rhs.len());
        self.data
            .iter()
            .zip(rhs.data.iter())
            .fold(T::zero(), |acc, (&a, &b)| acc + a * b)
    }

    fn zip_with(self, rhs: &Self, op: impl Fn(T, T) -> T, symbol: &str) -> Self {
        assert_eq!(
            self.len(),
            rhs.len(),
            "length mismatch: {} {} {}",
            self.len(),
            symbol,
            rhs.len(),
        );
        let data = self
            .data
            .iter()
            .zip(rhs.data.iter())
            .map(|(&a, &b)| op(a, b))
            .collect();
        Self { data }
    }
}

impl<T: FloatScalar> DynStateVector<T> {
    /// Element-wise absolute value.
    pub fn abs(&self) -> Self {
        Self {
            data: self.data.iter().map(|x| x.abs()).collect(),
        }
    }

    /// Euclidean (L2) norm.
    pub fn norm(&self) -> T {
        self.dot(self).sqrt()
    }
}

impl<T: FloatScalar> State<T> for DynStateVector<T> {
    #[inline]
    fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    fn component(&self, index: usize) -> T {
        self.data[index]
    }

    fn abs(&self) -> Self {
        DynStateVector::abs(self)
    }

    fn norm(&self) -> T {
        DynStateVector::norm(self)
    }
}

impl<T: Scalar> From<Vec<T>> for DynStateVector<T> {
    fn from(data: Vec<T>) -> Self {
        Self { data }
    }
}

impl<T> Index<usize> for DynStateVector<T> {
    type Output = T;

    #[inline]
    fn index(&self, i: usize) -> &T {
        &self.data[i]
    }
}

impl<T> IndexMut<usize> for DynStateVector<T> {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut T {
        &mut self.data[i]
    }
}

// ── Arithmetic ──────────────────────────────────────────────────────

impl<T: Scalar> Add for DynStateVector<T> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.zip_with(&rhs, |a, b| a + b, "+")
    }
}

impl<T: Scalar> Sub for DynStateVector<T> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self.zip_with(&rhs, |a, b| a - b, "-")
    }
}

impl<T: Scalar> Neg for DynStateVector<T> {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            data: self.data.into_iter().map(|x| T::zero() - x).collect(),
        }
    }
}

impl<T: Scalar> Mul<T> for DynStateVector<T> {
    type Output = Self;

    fn mul(mut self, rhs: T) -> Self {
        for x in self.data.iter_mut() {
            *x = *x * rhs;
        }
        self
    }
}

impl<T: Scalar> Div<T> for DynStateVector<T> {
    type Output = Self;

    fn div(mut self, rhs: T) -> Self {
        for x in self.data.iter_mut() {
            *x = *x / rhs;
        }
        self
    }
}
