use crate::traits::FloatScalar;

use super::{
    iterate, RootFinder, RootFinderError, RootFunction, RootRelativeToleranceTerminationCondition,
    RootResult, RootSettings, TerminationCondition, UpdateRule,
};

/// Newton-Raphson update `x - f(x) / f'(x)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NewtonRaphsonStep;

impl<T: FloatScalar> UpdateRule<T> for NewtonRaphsonStep {
    const DERIVATIVE_ORDER: usize = 1;

    #[inline]
    fn next_iterate<F: RootFunction<T>>(&mut self, function: &mut F, x: T, fx: T) -> T {
        x - fx / function.compute_derivative(1, x)
    }
}

/// Newton-Raphson root finder.
///
/// Converges quadratically near a simple root from a reasonable initial
/// guess. There is no bracketing fallback: a poor guess, an inflection
/// point or a zero derivative can diverge, which ends on the termination
/// condition's iteration cap.
///
/// ```
/// use astronum::root_finders::{NewtonRaphson, RootFinder, RootFunctionFromClosures};
///
/// let mut f = RootFunctionFromClosures::new(|x: f64| x * x - 2.0, |x: f64| 2.0 * x);
/// let r = NewtonRaphson::with_tolerance(1e-12, 100).execute(&mut f, 1.5).unwrap();
/// assert!((r.root - core::f64::consts::SQRT_2).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct NewtonRaphson<C> {
    condition: C,
}

impl<C> NewtonRaphson<C> {
    /// Finder stopping on an arbitrary termination condition.
    ///
    /// ```
    /// use astronum::root_finders::{NewtonRaphson, RootFinder, RootFunctionFromClosures};
    ///
    /// // Stop on a small residual instead of a small step
    /// let mut finder = NewtonRaphson::new(
    ///     |_x: f64, _x_old: f64, fx: f64, _fx_old: f64, i: usize| fx.abs() < 1e-14 || i >= 30,
    /// );
    /// let mut f = RootFunctionFromClosures::new(|x: f64| x.cos() - x, |x: f64| -x.sin() - 1.0);
    /// let r = finder.execute(&mut f, 1.0).unwrap();
    /// assert!(r.function_value.abs() < 1e-14);
    /// ```
    pub fn new(condition: C) -> Self {
        Self { condition }
    }

    /// Termination condition in use.
    pub fn termination_condition(&self) -> &C {
        &self.condition
    }
}

impl<T: FloatScalar> NewtonRaphson<RootRelativeToleranceTerminationCondition<T>> {
    /// Finder stopping when `|Δx / x| < relative_tolerance` or after
    /// `maximum_iterations` (reported as an error).
    pub fn with_tolerance(relative_tolerance: T, maximum_iterations: usize) -> Self {
        Self::new(RootRelativeToleranceTerminationCondition::new(
            relative_tolerance,
            maximum_iterations,
        ))
    }

    /// Finder using the relative tolerance, cap and reporting of `settings`.
    pub fn from_settings(settings: &RootSettings<T>) -> Self {
        Self::new(RootRelativeToleranceTerminationCondition::from_settings(settings))
    }
}

impl<T, C> RootFinder<T> for NewtonRaphson<C>
where
    T: FloatScalar,
    C: TerminationCondition<T>,
{
    fn execute<F: RootFunction<T>>(
        &mut self,
        function: &mut F,
        initial_guess: T,
    ) -> Result<RootResult<T>, RootFinderError> {
        iterate(&mut NewtonRaphsonStep, &mut self.condition, function, initial_guess)
    }
}
