use crate::traits::{cast, FloatScalar};

use super::{
    iterate, RootFinder, RootFinderError, RootFunction, RootRelativeToleranceTerminationCondition,
    RootResult, TerminationCondition, UpdateRule,
};

/// Halley update `x - 2 f f' / (2 f'^2 - f f'')`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HalleyStep;

impl<T: FloatScalar> UpdateRule<T> for HalleyStep {
    const DERIVATIVE_ORDER: usize = 2;

    fn next_iterate<F: RootFunction<T>>(&mut self, function: &mut F, x: T, fx: T) -> T {
        let two: T = cast(2.0);
        let first = function.compute_derivative(1, x);
        let second = function.compute_derivative(2, x);
        x - two * fx * first / (two * first * first - fx * second)
    }
}

/// Halley root finder: cubic convergence, needs `f''`.
///
/// ```
/// use astronum::root_finders::{Halley, RootFinder, RootFunctionFromClosures};
///
/// let mut f = RootFunctionFromClosures::with_second_derivative(
///     |x: f64| x * x * x - 2.0,
///     |x: f64| 3.0 * x * x,
///     |x: f64| 6.0 * x,
/// );
/// let r = Halley::with_tolerance(1e-14, 50).execute(&mut f, 1.0).unwrap();
/// assert!((r.root - 2.0_f64.cbrt()).abs() < 1e-14);
/// ```
#[derive(Debug, Clone)]
pub struct Halley<C> {
    condition: C,
}

impl<C> Halley<C> {
    /// Finder stopping on an arbitrary termination condition.
    pub fn new(condition: C) -> Self {
        Self { condition }
    }
}

impl<T: FloatScalar> Halley<RootRelativeToleranceTerminationCondition<T>> {
    /// Finder stopping when `|Δx / x| < relative_tolerance` or after
    /// `maximum_iterations` (reported as an error).
    pub fn with_tolerance(relative_tolerance: T, maximum_iterations: usize) -> Self {
        Self::new(RootRelativeToleranceTerminationCondition::new(
            relative_tolerance,
            maximum_iterations,
        ))
    }
}

impl<T, C> RootFinder<T> for Halley<C>
where
    T: FloatScalar,
    C: TerminationCondition<T>,
{
    fn execute<F: RootFunction<T>>(
        &mut self,
        function: &mut F,
        initial_guess: T,
    ) -> Result<RootResult<T>, RootFinderError> {
        iterate(&mut HalleyStep, &mut self.condition, function, initial_guess)
    }
}
