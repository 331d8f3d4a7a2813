use core::marker::PhantomData;

use crate::state::State;
use crate::traits::{cast, FloatScalar};

use super::{IntegrationStatistics, IntegratorError, NumericalIntegrator};

/// Single-step rule of a fixed-step-size integrator.
pub trait FixedStepMethod {
    /// Derivative evaluations per step.
    const STAGES: usize;

    /// Advance `y` from `t` to `t + h`.
    fn step<T: FloatScalar, S: State<T>>(
        t: T,
        y: &S,
        h: T,
        f: &mut impl FnMut(T, &S) -> S,
    ) -> S;
}

/// Explicit (forward) Euler method, first order.
#[derive(Debug, Clone, Copy, Default)]
pub struct Euler;

impl FixedStepMethod for Euler {
    const STAGES: usize = 1;

    fn step<T: FloatScalar, S: State<T>>(
        t: T,
        y: &S,
        h: T,
        f: &mut impl FnMut(T, &S) -> S,
    ) -> S {
        y.clone() + f(t, y) * h
    }
}

/// Classic fourth-order Runge-Kutta method.
#[derive(Debug, Clone, Copy, Default)]
pub struct RungeKutta4;

impl FixedStepMethod for RungeKutta4 {
    const STAGES: usize = 4;

    fn step<T: FloatScalar, S: State<T>>(
        t: T,
        y: &S,
        h: T,
        f: &mut impl FnMut(T, &S) -> S,
    ) -> S {
        let half: T = cast(0.5);
        let sixth: T = cast(1.0 / 6.0);
        let third: T = cast(1.0 / 3.0);

        let k1 = f(t, y);
        let k2 = f(t + h * half, &(y.clone() + k1.clone() * (h * half)));
        let k3 = f(t + h * half, &(y.clone() + k2.clone() * (h * half)));
        let k4 = f(t + h, &(y.clone() + k3.clone() * h));

        y.clone() + (k1 * sixth + k2 * third + k3 * third + k4 * sixth) * h
    }
}

/// Integrator that takes every step exactly as requested.
///
/// ```
/// use astronum::integrators::{NumericalIntegrator, RungeKutta4Integrator};
///
/// // x' = -x
/// let mut integrator = RungeKutta4Integrator::new(|_t: f64, x: &f64| -x, 0.0, 1.0, 0.01);
/// let x = *integrator.integrate_to(1.0, 0.01).unwrap();
/// assert!((x - (-1.0_f64).exp()).abs() < 1e-9);
/// ```
pub struct FixedStepSizeIntegrator<T, S, F, M> {
    derivative: F,
    step_size: T,
    current_independent_variable: T,
    current_state: S,
    last_independent_variable: T,
    last_state: S,
    statistics: IntegrationStatistics,
    method: PhantomData<M>,
}

/// Fixed-step explicit Euler integrator.
pub type EulerIntegrator<T, S, F> = FixedStepSizeIntegrator<T, S, F, Euler>;

/// Fixed-step classic Runge-Kutta 4 integrator.
pub type RungeKutta4Integrator<T, S, F> = FixedStepSizeIntegrator<T, S, F, RungeKutta4>;

impl<T, S, F, M> FixedStepSizeIntegrator<T, S, F, M>
where
    T: FloatScalar,
    S: State<T>,
    F: FnMut(T, &S) -> S,
    M: FixedStepMethod,
{
    /// Create an integrator starting at `(interval_start, initial_state)`.
    ///
    /// `step_size` is returned by
    /// [`next_step_size`](NumericalIntegrator::next_step_size) until a step of
    /// a different size is taken.
    pub fn new(derivative: F, interval_start: T, initial_state: S, step_size: T) -> Self {
        Self {
            derivative,
            step_size,
            current_independent_variable: interval_start,
            last_independent_variable: interval_start,
            last_state: initial_state.clone(),
            current_state: initial_state,
            statistics: IntegrationStatistics::default(),
            method: PhantomData,
        }
    }

    /// State before the last step.
    pub fn previous_state(&self) -> &S {
        &self.last_state
    }

    /// Evaluation and step counters.
    pub fn statistics(&self) -> IntegrationStatistics {
        self.statistics
    }
}

impl<T, S, F, M> NumericalIntegrator<T, S> for FixedStepSizeIntegrator<T, S, F, M>
where
    T: FloatScalar,
    S: State<T>,
    F: FnMut(T, &S) -> S,
    M: FixedStepMethod,
{
    fn next_step_size(&self) -> T {
        self.step_size
    }

    fn current_state(&self) -> &S {
        &self.current_state
    }

    fn current_independent_variable(&self) -> T {
        self.current_independent_variable
    }

    fn previous_independent_variable(&self) -> T {
        self.last_independent_variable
    }

    fn perform_integration_step(&mut self, step_size: T) -> Result<&S, IntegratorError> {
        if step_size == T::zero() || !step_size.is_finite() {
            return Err(IntegratorError::InvalidSettings(
                "step size must be finite and non-zero",
            ));
        }
        let new_state = M::step(
            self.current_independent_variable,
            &self.current_state,
            step_size,
            &mut self.derivative,
        );
        self.last_independent_variable = self.current_independent_variable;
        self.last_state = core::mem::replace(&mut self.current_state, new_state);
        self.current_independent_variable = self.current_independent_variable + step_size;
        self.step_size = step_size;
        self.statistics.function_evaluations += M::STAGES;
        self.statistics.accepted_steps += 1;
        log::trace!(
            "fixed step {:?} to t = {:?}",
            step_size,
            self.current_independent_variable
        );
        Ok(&self.current_state)
    }

    fn rollback_to_previous_state(&mut self) -> bool {
        if self.current_independent_variable == self.last_independent_variable {
            return false;
        }
        self.current_independent_variable = self.last_independent_variable;
        self.current_state = self.last_state.clone();
        true
    }

    fn modify_current_state(&mut self, new_state: S) {
        self.last_state = new_state.clone();
        self.current_state = new_state;
        self.last_independent_variable = self.current_independent_variable;
    }
}
