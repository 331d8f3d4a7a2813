use crate::traits::FloatScalar;

use super::RootFunction;

/// [`RootFunction`] built from closures for `f`, `f'` and optionally `f''`.
///
/// ```
/// use astronum::root_finders::{RootFunction, RootFunctionFromClosures};
///
/// let mut f = RootFunctionFromClosures::new(|x: f64| x * x, |x: f64| 2.0 * x);
/// assert_eq!(f.evaluate(3.0), 9.0);
/// assert_eq!(f.compute_derivative(1, 3.0), 6.0);
/// assert!(f.compute_derivative(2, 3.0).is_nan());
/// ```
pub struct RootFunctionFromClosures<F, D1, D2> {
    function: F,
    first_derivative: D1,
    second_derivative: Option<D2>,
}

impl<T, F, D1> RootFunctionFromClosures<F, D1, fn(T) -> T>
where
    F: FnMut(T) -> T,
    D1: FnMut(T) -> T,
{
    /// Function with its first derivative.
    pub fn new(function: F, first_derivative: D1) -> Self {
        Self {
            function,
            first_derivative,
            second_derivative: None,
        }
    }
}

impl<F, D1, D2> RootFunctionFromClosures<F, D1, D2> {
    /// Function with its first and second derivatives.
    pub fn with_second_derivative(function: F, first_derivative: D1, second_derivative: D2) -> Self {
        Self {
            function,
            first_derivative,
            second_derivative: Some(second_derivative),
        }
    }
}

impl<T, F, D1, D2> RootFunction<T> for RootFunctionFromClosures<F, D1, D2>
where
    T: FloatScalar,
    F: FnMut(T) -> T,
    D1: FnMut(T) -> T,
    D2: FnMut(T) -> T,
{
    fn evaluate(&mut self, x: T) -> T {
        (self.function)(x)
    }

    fn compute_derivative(&mut self, order: usize, x: T) -> T {
        match (order, self.second_derivative.as_mut()) {
            (0, _) => (self.function)(x),
            (1, _) => (self.first_derivative)(x),
            (2, Some(second)) => second(x),
            _ => T::nan(),
        }
    }

    fn maximum_derivative_order(&self) -> usize {
        if self.second_derivative.is_some() {
            2
        } else {
            1
        }
    }
}
