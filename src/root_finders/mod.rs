//! Iterative scalar root finding.
//!
//! Every finder runs the same loop ([`iterate`]): apply an [`UpdateRule`]
//! to the current iterate, then ask a [`TerminationCondition`] whether to
//! stop. The loop itself has no iteration cap; the standard termination
//! conditions carry one.
//!
//! - [`NewtonRaphson`]: `x_{n+1} = x_n - f(x_n) / f'(x_n)`
//! - [`Halley`]: cubic convergence using `f''` as well
//!
//! Neither method brackets the root. A zero derivative produces a non-finite
//! iterate, which the termination condition reports when its cap is reached.
//!
//! # Example
//!
//! Eccentric anomaly from Kepler's equation `E - e sin E = M`:
//!
//! ```
//! use astronum::root_finders::{NewtonRaphson, RootFinder, RootFunctionFromClosures};
//!
//! let (e, m) = (0.3_f64, 1.0_f64);
//! let mut kepler = RootFunctionFromClosures::new(
//!     |ea: f64| ea - e * ea.sin() - m,
//!     |ea: f64| 1.0 - e * ea.cos(),
//! );
//! let mut finder = NewtonRaphson::with_tolerance(1e-14, 50);
//! let result = finder.execute(&mut kepler, m).unwrap();
//! assert!((result.root - e * result.root.sin() - m).abs() < 1e-13);
//! ```

mod functions;
mod halley;
mod newton_raphson;
mod termination;


pub use functions::RootFunctionFromClosures;
pub use halley::{Halley, HalleyStep};
pub use newton_raphson::{NewtonRaphson, NewtonRaphsonStep};
pub use termination::{
    RootAbsoluteToleranceTerminationCondition, RootRelativeToleranceTerminationCondition,
    TerminationCondition,
};

use crate::traits::FloatScalar;

/// Errors from root finding.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum RootFinderError {
    /// The iteration cap was reached before the tolerance was met.
    #[error("root finder did not converge in {iterations} iterations (last root {last_root})")]
    MaximumIterationsExceeded {
        /// Iterations performed.
        iterations: usize,
        /// Last iterate.
        last_root: f64,
    },
    /// The iteration cap was reached with a NaN or infinite iterate.
    #[error("root finder diverged to a non-finite iterate after {iterations} iterations")]
    NonFiniteIterate {
        /// Iterations performed.
        iterations: usize,
    },
    /// The update rule needs a derivative the function does not provide.
    #[error("root function does not provide derivative of order {order}")]
    DerivativeUnavailable {
        /// Required derivative order.
        order: usize,
    },
}

/// Result of a root-finding run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootResult<T> {
    /// Final iterate.
    pub root: T,
    /// Function value at `root`.
    pub function_value: T,
    /// Iterations performed.
    pub iterations: usize,
    /// Calls to `evaluate` plus calls to `compute_derivative`.
    pub evaluations: usize,
}

/// Settings for the standard termination conditions.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RootSettings<T> {
    /// Tolerance on `|Δx / x|`.
    pub relative_tolerance: T,
    /// Tolerance on `|Δx|`.
    pub absolute_tolerance: T,
    /// Iteration cap.
    pub maximum_iterations: usize,
    /// Return an error (instead of the last iterate) when the cap is reached.
    pub report_non_convergence: bool,
}

impl Default for RootSettings<f64> {
    fn default() -> Self {
        Self {
            relative_tolerance: 1e-12,
            absolute_tolerance: 1e-12,
            maximum_iterations: 100,
            report_non_convergence: true,
        }
    }
}

impl Default for RootSettings<f32> {
    fn default() -> Self {
        Self {
            relative_tolerance: 1e-6,
            absolute_tolerance: 1e-6,
            maximum_iterations: 100,
            report_non_convergence: true,
        }
    }
}

/// A scalar function whose root is sought.
pub trait RootFunction<T> {
    /// `f(x)`.
    fn evaluate(&mut self, x: T) -> T;

    /// Derivative of order `order` at `x`.
    ///
    /// Orders above [`maximum_derivative_order`](Self::maximum_derivative_order)
    /// return NaN.
    fn compute_derivative(&mut self, order: usize, x: T) -> T;

    /// Highest derivative order `compute_derivative` supports.
    fn maximum_derivative_order(&self) -> usize {
        1
    }
}

/// One iteration `x_{n+1} = g(x_n)` of a root finder.
pub trait UpdateRule<T> {
    /// Derivative order the rule needs from the function.
    const DERIVATIVE_ORDER: usize;

    /// Next iterate from `x` and `fx = f(x)`.
    fn next_iterate<F: RootFunction<T>>(&mut self, function: &mut F, x: T, fx: T) -> T;
}

/// A configured root finder.
pub trait RootFinder<T: FloatScalar> {
    /// Search for a root of `function` starting from `initial_guess`.
    fn execute<F: RootFunction<T>>(
        &mut self,
        function: &mut F,
        initial_guess: T,
    ) -> Result<RootResult<T>, RootFinderError>;
}

struct CountingFunction<'a, F> {
    inner: &'a mut F,
    evaluations: usize,
}

impl<T, F: RootFunction<T>> RootFunction<T> for CountingFunction<'_, F> {
    fn evaluate(&mut self, x: T) -> T {
        self.evaluations += 1;
        self.inner.evaluate(x)
    }

    fn compute_derivative(&mut self, order: usize, x: T) -> T {
        self.evaluations += 1;
        self.inner.compute_derivative(order, x)
    }

    fn maximum_derivative_order(&self) -> usize {
        self.inner.maximum_derivative_order()
    }
}

/// Core root-finding loop shared by every finder.
///
/// Applies `rule` until `condition` returns `true` (or an error) and
/// returns the most recent iterate. The termination condition is called
/// with `(next, current, f(next), f(current), iteration)`, `iteration`
/// counting from 1.
///
/// # Errors
///
/// [`RootFinderError::DerivativeUnavailable`] if `function` cannot supply
/// the derivative the rule needs; otherwise whatever `condition` returns.
pub fn iterate<T, R, C, F>(
    rule: &mut R,
    condition: &mut C,
    function: &mut F,
    initial_guess: T,
) -> Result<RootResult<T>, RootFinderError>
where
    T: FloatScalar,
    R: UpdateRule<T>,
    C: TerminationCondition<T>,
    F: RootFunction<T>,
{
    if function.maximum_derivative_order() < R::DERIVATIVE_ORDER {
        return Err(RootFinderError::DerivativeUnavailable {
            order: R::DERIVATIVE_ORDER,
        });
    }

    let mut function = CountingFunction {
        inner: function,
        evaluations: 0,
    };
    let mut current_root = initial_guess;
    let mut current_value = function.evaluate(current_root);
    let mut iteration = 0usize;

    loop {
        iteration += 1;
        let next_root = rule.next_iterate(&mut function, current_root, current_value);
        let next_value = function.evaluate(next_root);

        let stop = condition.check(next_root, current_root, next_value, current_value, iteration)?;
        current_root = next_root;
        current_value = next_value;

        if stop {
            return Ok(RootResult {
                root: current_root,
                function_value: current_value,
                iterations: iteration,
                evaluations: function.evaluations,
            });
        }
    }
}
