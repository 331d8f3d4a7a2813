//! State vectors propagated by the integrators.
//!
//! The integrators are generic over any type implementing [`State`]: an
//! ordered, fixed-length collection of scalars with addition, subtraction,
//! scalar multiplication, element-wise absolute value and a Euclidean norm.
//!
//! | Type                 | Storage          | Length        |
//! |----------------------|------------------|---------------|
//! | [`StateVector`]      | `[T; N]`, stack  | const-generic |
//! | [`DynStateVector`]   | `Vec<T>`, heap   | runtime       |
//! | `f32`, `f64`         | scalar           | 1             |
//!
//! # Example
//!
//! ```
//! use astronum::{State, StateVector};
//!
//! let r = StateVector::from_array([3.0_f64, -4.0]);
//! assert_eq!(r.abs(), StateVector::from_array([3.0, 4.0]));
//! assert!((State::norm(&r) - 5.0).abs() < 1e-15);
//! ```

mod dyn_vector;
mod vector;


pub use dyn_vector::DynStateVector;
pub use vector::StateVector;

use core::fmt::Debug;
use core::ops::{Add, Mul, Sub};

use num_traits::Float;

use crate::traits::FloatScalar;

/// A numeric state vector that can be propagated by an integrator.
///
/// Implementors are cloned (never aliased) when the integrator keeps a
/// rollback snapshot, so `clone` must produce an independent value.
pub trait State<T: FloatScalar>:
    Clone + Debug + Add<Output = Self> + Sub<Output = Self> + Mul<T, Output = Self>
{
    /// Number of elements.
    fn len(&self) -> usize;

    /// Whether the state has no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element at `index`. Panics if out of range.
    fn component(&self, index: usize) -> T;

    /// Element-wise absolute value.
    fn abs(&self) -> Self;

    /// Euclidean (L2) norm.
    fn norm(&self) -> T;

    /// Whether every element is finite.
    fn is_finite(&self) -> bool {
        (0..self.len()).all(|i| self.component(i).is_finite())
    }
}

macro_rules! impl_state_scalar {
    ($($t:ty),*) => {
        $(
            impl State<$t> for $t {
                #[inline] fn len(&self) -> usize { 1 }
                #[inline] fn component(&self, _index: usize) -> $t { *self }
                #[inline] fn abs(&self) -> $t { Float::abs(*self) }
                #[inline] fn norm(&self) -> $t { Float::abs(*self) }
            }
        )*
    };
}

impl_state_scalar!(f32, f64);
