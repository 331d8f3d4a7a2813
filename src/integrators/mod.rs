//! Numerical integration of `dy/dt = f(t, y)`.
//!
//! # Variable step size
//!
//! [`RungeKuttaVariableStepSizeIntegrator`] advances the state with an
//! embedded Runge-Kutta pair and adapts the step size from the difference of
//! the two estimates. Rejected steps are retried transparently with a smaller
//! step. A requested step or step-size proposal below the configured minimum
//! is a fatal [`IntegratorError::MinimumStepSizeExceeded`]; only the last step
//! of [`integrate_to`](NumericalIntegrator::integrate_to), shortened to land
//! on the interval end, is exempt.
//!
//! | Scheme                                   | Stages | Order |
//! |------------------------------------------|--------|-------|
//! | [`CoefficientSet::RungeKuttaFehlberg45`] |      6 | 4(5)  |
//! | [`CoefficientSet::RungeKuttaFehlberg56`] |      8 | 5(6)  |
//! | [`CoefficientSet::RungeKuttaFehlberg78`] |     13 | 7(8)  |
//!
//! # Fixed step size
//!
//! [`EulerIntegrator`] and [`RungeKutta4Integrator`] take every step exactly
//! as requested.
//!
//! All integrators implement [`NumericalIntegrator`], which adds
//! [`integrate_to`](NumericalIntegrator::integrate_to), single-level rollback
//! and discrete state modification (staging, impulsive manoeuvres).
//!
//! # Example
//!
//! ```
//! use astronum::integrators::{
//!     CoefficientSet, NumericalIntegrator, RungeKuttaVariableStepSizeIntegrator,
//!     ErrorTolerance, VariableStepSizeSettings,
//! };
//!
//! // x' = x, x(0) = 1
//! let mut integrator = RungeKuttaVariableStepSizeIntegrator::new(
//!     CoefficientSet::RungeKuttaFehlberg45,
//!     |_t: f64, x: &f64| *x,
//!     0.0,
//!     1.0,
//!     0.01,
//!     VariableStepSizeSettings {
//!         relative_error_tolerance: ErrorTolerance::Scalar(1e-12),
//!         absolute_error_tolerance: ErrorTolerance::Scalar(1e-12),
//!         ..VariableStepSizeSettings::default()
//!     },
//! )
//! .unwrap();
//! let x = *integrator.integrate_to(1.0, 0.01).unwrap();
//! assert!((x - core::f64::consts::E).abs() < 1e-10);
//! ```

mod coefficients;
mod fixed_step;
mod variable_step;

#[cfg(test)]
mod tests;

pub use coefficients::{CoefficientSet, OrderToIntegrate, RungeKuttaCoefficients};
pub use fixed_step::{
    Euler, EulerIntegrator, FixedStepMethod, FixedStepSizeIntegrator, RungeKutta4,
    RungeKutta4Integrator,
};
pub use variable_step::{
    ErrorTolerance, RungeKuttaVariableStepSizeIntegrator, StepSizeProposal,
    VariableStepSizeSettings,
};

use crate::state::State;
use crate::traits::FloatScalar;

/// Errors from numerical integration.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum IntegratorError {
    /// A requested step size, or the step size needed to meet the error
    /// tolerances, is below the configured minimum.
    #[error("minimum step size {minimum_step_size:e} exceeded: step size {requested_step_size:e} required")]
    MinimumStepSizeExceeded {
        /// Configured minimum step size.
        minimum_step_size: f64,
        /// Step size asked for by the caller or the error control.
        requested_step_size: f64,
    },
    /// The local error estimate is NaN or infinite.
    #[error("error estimate is not finite at t = {independent_variable}")]
    NonFiniteErrorEstimate {
        /// Independent variable at the start of the failed step.
        independent_variable: f64,
    },
    /// Integrator settings are inconsistent.
    #[error("invalid integrator settings: {0}")]
    InvalidSettings(&'static str),
}

/// Counters accumulated over the lifetime of an integrator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntegrationStatistics {
    /// State-derivative evaluations.
    pub function_evaluations: usize,
    /// Accepted steps.
    pub accepted_steps: usize,
    /// Rejected (and retried) steps.
    pub rejected_steps: usize,
}

/// A stepping integrator for `dy/dt = f(t, y)` with state type `S`.
pub trait NumericalIntegrator<T: FloatScalar, S: State<T>> {
    /// Step size proposed for the next step.
    fn next_step_size(&self) -> T;

    /// Current state.
    fn current_state(&self) -> &S;

    /// Current independent variable.
    fn current_independent_variable(&self) -> T;

    /// Independent variable before the last step (the rollback target).
    fn previous_independent_variable(&self) -> T;

    /// Take one step of (at most) `step_size` and return the new state.
    ///
    /// Variable-step integrators may take a smaller step if the requested one
    /// does not meet the error tolerances.
    fn perform_integration_step(&mut self, step_size: T) -> Result<&S, IntegratorError>;

    /// Restore the state from before the last step.
    ///
    /// Returns `false` (and changes nothing) if there is no step to undo:
    /// rollback only reaches back one step.
    fn rollback_to_previous_state(&mut self) -> bool;

    /// Replace the current state without stepping.
    ///
    /// Discards the rollback snapshot: a following
    /// [`rollback_to_previous_state`](Self::rollback_to_previous_state)
    /// returns `false`.
    fn modify_current_state(&mut self, new_state: S);

    /// Integrate until the independent variable reaches `interval_end`.
    ///
    /// `initial_step_size` is used for the first step; its sign is ignored in
    /// favour of the direction towards `interval_end`. The final step is
    /// shortened to land exactly on `interval_end`.
    ///
    /// # Errors
    ///
    /// [`IntegratorError::InvalidSettings`] if `interval_end` is not finite or
    /// `initial_step_size` is zero or not finite; otherwise any error of
    /// [`perform_integration_step`](Self::perform_integration_step).
    fn integrate_to(
        &mut self,
        interval_end: T,
        initial_step_size: T,
    ) -> Result<&S, IntegratorError> {
        step_until::<T, S, Self, _>(
            self,
            interval_end,
            initial_step_size,
            |integrator, step_size, _landing| {
                integrator.perform_integration_step(step_size).map(|_| ())
            },
        )?;
        Ok(self.current_state())
    }
}

/// Drive `integrator` to `interval_end`, taking each step with `step`.
///
/// `step` receives `true` for the step shortened to land on `interval_end`.
pub(crate) fn step_until<T, S, I, G>(
    integrator: &mut I,
    interval_end: T,
    initial_step_size: T,
    mut step: G,
) -> Result<(), IntegratorError>
where
    T: FloatScalar,
    S: State<T>,
    I: NumericalIntegrator<T, S> + ?Sized,
    G: FnMut(&mut I, T, bool) -> Result<(), IntegratorError>,
{
    let zero = T::zero();
    if !interval_end.is_finite() {
        return Err(IntegratorError::InvalidSettings("interval end must be finite"));
    }
    if initial_step_size == zero || !initial_step_size.is_finite() {
        return Err(IntegratorError::InvalidSettings(
            "initial step size must be finite and non-zero",
        ));
    }
    let direction = if interval_end >= integrator.current_independent_variable() {
        T::one()
    } else {
        -T::one()
    };
    let mut step_size = initial_step_size.abs() * direction;

    loop {
        let t = integrator.current_independent_variable();
        let remaining = interval_end - t;
        if remaining * direction <= zero {
            return Ok(());
        }

        let landing = step_size.abs() >= remaining.abs();
        if landing {
            step_size = remaining;
        }

        step(integrator, step_size, landing)?;

        // A rejected-and-retried landing step stops short; keep going.
        if landing && integrator.current_independent_variable() == t + step_size {
            return Ok(());
        }
        step_size = integrator.next_step_size().abs() * direction;
    }
}
