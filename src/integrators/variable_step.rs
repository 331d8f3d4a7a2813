use alloc::vec::Vec;

use crate::state::State;
use crate::traits::{cast, to_f64, FloatScalar};

use super::coefficients::{CoefficientSet, OrderToIntegrate, RungeKuttaCoefficients};
use super::{step_until, IntegrationStatistics, IntegratorError, NumericalIntegrator};

/// Error tolerance applied to every state element, or one value per element.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorTolerance<T> {
    /// Same tolerance for every element.
    Scalar(T),
    /// One tolerance per state element.
    PerElement(Vec<T>),
}

impl<T: Copy> ErrorTolerance<T> {
    /// Tolerance for element `index`.
    #[inline]
    pub fn at(&self, index: usize) -> T {
        match self {
            ErrorTolerance::Scalar(value) => *value,
            ErrorTolerance::PerElement(values) => values[index],
        }
    }

    fn check(
        &self,
        state_len: usize,
        valid: impl Fn(T) -> bool,
        message: &'static str,
    ) -> Result<(), IntegratorError> {
        let ok = match self {
            ErrorTolerance::Scalar(value) => valid(*value),
            ErrorTolerance::PerElement(values) => {
                if values.len() != state_len {
                    return Err(IntegratorError::InvalidSettings(
                        "per-element tolerance length differs from state length",
                    ));
                }
                values.iter().all(|&v| valid(v))
            }
        };
        if ok {
            Ok(())
        } else {
            Err(IntegratorError::InvalidSettings(message))
        }
    }
}

impl<T> From<T> for ErrorTolerance<T> {
    fn from(value: T) -> Self {
        ErrorTolerance::Scalar(value)
    }
}

/// Settings for adaptive step-size control.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VariableStepSizeSettings<T> {
    /// Smallest step size the error control may propose (default: 1e-10).
    pub minimum_step_size: T,
    /// Largest step size; larger proposals are clamped (default: infinity).
    pub maximum_step_size: T,
    /// Relative error tolerance (default: 1e-12).
    pub relative_error_tolerance: ErrorTolerance<T>,
    /// Absolute error tolerance, must be positive (default: 1e-12).
    pub absolute_error_tolerance: ErrorTolerance<T>,
    /// Safety factor applied to the proposed step size (default: 0.8).
    pub safety_factor: T,
    /// Largest growth of the step size from one step to the next (default: 4.0).
    pub maximum_factor_increase: T,
    /// Largest reduction of the step size from one attempt to the next (default: 0.1).
    pub minimum_factor_decrease: T,
    /// Override of the table's propagated estimate (default: `None`, use the table's).
    pub order_to_integrate: Option<OrderToIntegrate>,
}

impl Default for VariableStepSizeSettings<f64> {
    fn default() -> Self {
        Self {
            minimum_step_size: 1e-10,
            maximum_step_size: f64::INFINITY,
            relative_error_tolerance: ErrorTolerance::Scalar(1e-12),
            absolute_error_tolerance: ErrorTolerance::Scalar(1e-12),
            safety_factor: 0.8,
            maximum_factor_increase: 4.0,
            minimum_factor_decrease: 0.1,
            order_to_integrate: None,
        }
    }
}

impl Default for VariableStepSizeSettings<f32> {
    fn default() -> Self {
        Self {
            minimum_step_size: 1e-5,
            maximum_step_size: f32::INFINITY,
            relative_error_tolerance: ErrorTolerance::Scalar(1e-6),
            absolute_error_tolerance: ErrorTolerance::Scalar(1e-6),
            safety_factor: 0.8,
            maximum_factor_increase: 4.0,
            minimum_factor_decrease: 0.1,
            order_to_integrate: None,
        }
    }
}

impl<T: FloatScalar> VariableStepSizeSettings<T> {
    fn validate(&self, state_len: usize) -> Result<(), IntegratorError> {
        let zero = T::zero();
        let one = T::one();
        if !(self.minimum_step_size > zero && self.minimum_step_size.is_finite()) {
            return Err(IntegratorError::InvalidSettings(
                "minimum step size must be positive and finite",
            ));
        }
        if self.maximum_step_size.is_nan() || self.maximum_step_size < self.minimum_step_size {
            return Err(IntegratorError::InvalidSettings(
                "maximum step size must not be below the minimum step size",
            ));
        }
        if !(self.safety_factor > zero && self.safety_factor <= one) {
            return Err(IntegratorError::InvalidSettings("safety factor must be in (0, 1]"));
        }
        if !(self.maximum_factor_increase >= one && self.maximum_factor_increase.is_finite()) {
            return Err(IntegratorError::InvalidSettings(
                "maximum factor increase must be finite and at least 1",
            ));
        }
        if !(self.minimum_factor_decrease > zero && self.minimum_factor_decrease < one) {
            return Err(IntegratorError::InvalidSettings(
                "minimum factor decrease must be in (0, 1)",
            ));
        }
        self.relative_error_tolerance.check(
            state_len,
            |v| v >= zero && v.is_finite(),
            "relative error tolerance must be non-negative and finite",
        )?;
        self.absolute_error_tolerance.check(
            state_len,
            |v| v > zero && v.is_finite(),
            "absolute error tolerance must be positive and finite",
        )
    }
}

/// Outcome of the error control for one attempted step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepSizeProposal<T> {
    /// Step size for the next attempt (same sign as the attempted step).
    pub step_size: T,
    /// Largest element of `|higher - lower| / (|higher| rtol + atol)`.
    pub maximum_error: T,
    /// Whether the attempted step meets the tolerances (`maximum_error <= 1`).
    pub accepted: bool,
}

/// Variable-step-size integrator built on an embedded Runge-Kutta pair.
///
/// Each attempted step evaluates every stage of the tableau (no first-same-as-
/// last reuse), forms the lower- and higher-order estimates, and proposes
/// the next step size as
///
/// `h_new = safety · h · (1 / e_max)^(1 / higher_order)`
///
/// with the ratio `h_new / h` limited to `[minimum_factor_decrease,
/// maximum_factor_increase]` and `|h_new|` to `maximum_step_size`. A
/// rejected step is retried from the same state with `h_new`; if `h_new`
/// falls below `minimum_step_size` the step fails with
/// [`IntegratorError::MinimumStepSizeExceeded`]. A requested step below the
/// minimum fails the same way, except the step
/// [`integrate_to`](NumericalIntegrator::integrate_to) shortens to land on
/// the interval end.
///
/// # Example
///
/// ```
/// use astronum::integrators::{
///     CoefficientSet, NumericalIntegrator, RungeKuttaVariableStepSizeIntegrator,
///     VariableStepSizeSettings,
/// };
/// use astronum::StateVector;
///
/// let mut integrator = RungeKuttaVariableStepSizeIntegrator::new(
///     CoefficientSet::RungeKuttaFehlberg56,
///     |_t, y: &StateVector<f64, 2>| StateVector::from_array([y[1], -y[0]]),
///     0.0,
///     StateVector::from_array([0.0, 1.0]),
///     0.1,
///     VariableStepSizeSettings::default(),
/// )
/// .unwrap();
///
/// let y = *integrator.perform_integration_step(0.1).unwrap();
/// assert!((y[0] - 0.1_f64.sin()).abs() < 1e-12);
/// assert!(integrator.rollback_to_previous_state());
/// assert!(!integrator.rollback_to_previous_state());
/// ```
pub struct RungeKuttaVariableStepSizeIntegrator<T, S, F> {
    coefficients: &'static RungeKuttaCoefficients,
    derivative: F,
    settings: VariableStepSizeSettings<T>,
    order_to_integrate: OrderToIntegrate,
    current_independent_variable: T,
    current_state: S,
    last_independent_variable: T,
    last_state: S,
    step_size: T,
    stage_derivatives: Vec<S>,
    statistics: IntegrationStatistics,
}

impl<T, S, F> RungeKuttaVariableStepSizeIntegrator<T, S, F>
where
    T: FloatScalar,
    S: State<T>,
    F: FnMut(T, &S) -> S,
{
    /// Create an integrator for one of the tabulated schemes.
    ///
    /// `initial_step_size` is the step size returned by
    /// [`next_step_size`](NumericalIntegrator::next_step_size) before the
    /// first step.
    ///
    /// # Errors
    ///
    /// [`IntegratorError::InvalidSettings`] if the settings are inconsistent
    /// or the initial step size is zero or not finite.
    pub fn new(
        set: CoefficientSet,
        derivative: F,
        interval_start: T,
        initial_state: S,
        initial_step_size: T,
        settings: VariableStepSizeSettings<T>,
    ) -> Result<Self, IntegratorError> {
        Self::from_coefficients(
            RungeKuttaCoefficients::get(set),
            derivative,
            interval_start,
            initial_state,
            initial_step_size,
            settings,
        )
    }

    /// Create an integrator from an arbitrary embedded-pair tableau.
    pub fn from_coefficients(
        coefficients: &'static RungeKuttaCoefficients,
        derivative: F,
        interval_start: T,
        initial_state: S,
        initial_step_size: T,
        settings: VariableStepSizeSettings<T>,
    ) -> Result<Self, IntegratorError> {
        settings.validate(initial_state.len())?;
        if initial_step_size == T::zero() || !initial_step_size.is_finite() {
            return Err(IntegratorError::InvalidSettings(
                "initial step size must be finite and non-zero",
            ));
        }
        let order_to_integrate = settings
            .order_to_integrate
            .unwrap_or(coefficients.order_to_integrate);

        Ok(Self {
            coefficients,
            derivative,
            order_to_integrate,
            current_independent_variable: interval_start,
            last_independent_variable: interval_start,
            last_state: initial_state.clone(),
            current_state: initial_state,
            step_size: initial_step_size,
            stage_derivatives: Vec::with_capacity(coefficients.stages()),
            statistics: IntegrationStatistics::default(),
            settings,
        })
    }

    /// Tableau in use.
    pub fn coefficients(&self) -> &'static RungeKuttaCoefficients {
        self.coefficients
    }

    /// Step-size control settings.
    pub fn settings(&self) -> &VariableStepSizeSettings<T> {
        &self.settings
    }

    /// Estimate that becomes the new state on acceptance.
    pub fn order_to_integrate(&self) -> OrderToIntegrate {
        self.order_to_integrate
    }

    /// State before the last step (the rollback target).
    pub fn previous_state(&self) -> &S {
        &self.last_state
    }

    /// Stage derivatives `k_i` of the most recent attempted step.
    pub fn stage_derivatives(&self) -> &[S] {
        &self.stage_derivatives
    }

    /// Evaluation and step counters.
    pub fn statistics(&self) -> IntegrationStatistics {
        self.statistics
    }

    /// Error control: compare the two estimates of a step of `step_size` and
    /// propose the next step size.
    ///
    /// # Errors
    ///
    /// [`IntegratorError::MinimumStepSizeExceeded`] if the step is rejected
    /// and the proposal is below the minimum step size;
    /// [`IntegratorError::NonFiniteErrorEstimate`] if the error is NaN or
    /// infinite.
    pub fn compute_new_step_size(
        &self,
        step_size: T,
        lower_order_estimate: &S,
        higher_order_estimate: &S,
    ) -> Result<StepSizeProposal<T>, IntegratorError> {
        let zero = T::zero();
        let one = T::one();
        let settings = &self.settings;

        if !(lower_order_estimate.is_finite() && higher_order_estimate.is_finite()) {
            return Err(IntegratorError::NonFiniteErrorEstimate {
                independent_variable: to_f64(self.current_independent_variable),
            });
        }

        let truncation_error = (higher_order_estimate.clone() - lower_order_estimate.clone()).abs();
        let magnitude = higher_order_estimate.abs();

        let mut maximum_error = zero;
        for i in 0..truncation_error.len() {
            let error = truncation_error.component(i);
            let tolerance = magnitude.component(i) * settings.relative_error_tolerance.at(i)
                + settings.absolute_error_tolerance.at(i);
            let relative_error = if error == zero { zero } else { error / tolerance };
            if relative_error.is_nan() || relative_error > maximum_error {
                maximum_error = relative_error;
            }
        }

        if !maximum_error.is_finite() {
            return Err(IntegratorError::NonFiniteErrorEstimate {
                independent_variable: to_f64(self.current_independent_variable),
            });
        }

        let factor = if maximum_error == zero {
            settings.maximum_factor_increase
        } else {
            let order: T = cast(f64::from(self.coefficients.higher_order));
            let raw = settings.safety_factor * (one / maximum_error).powf(one / order);
            raw.max(settings.minimum_factor_decrease)
                .min(settings.maximum_factor_increase)
        };

        let accepted = maximum_error <= one;
        let direction = step_size.signum();
        let mut magnitude_new = (step_size * factor).abs();
        if magnitude_new > settings.maximum_step_size {
            magnitude_new = settings.maximum_step_size;
        }
        if magnitude_new < settings.minimum_step_size {
            if accepted {
                magnitude_new = settings.minimum_step_size;
            } else {
                log::warn!(
                    "minimum step size {:?} exceeded at t = {:?}: error control requires {:?}",
                    settings.minimum_step_size,
                    self.current_independent_variable,
                    magnitude_new
                );
                return Err(IntegratorError::MinimumStepSizeExceeded {
                    minimum_step_size: to_f64(settings.minimum_step_size),
                    requested_step_size: to_f64(magnitude_new),
                });
            }
        }

        Ok(StepSizeProposal {
            step_size: magnitude_new * direction,
            maximum_error,
            accepted,
        })
    }

    /// Evaluate every stage for a step of `step_size` from the current state
    /// and return `(lower, higher)` order estimates.
    fn compute_estimates(&mut self, step_size: T) -> (S, S) {
        let table = self.coefficients;
        let t = self.current_independent_variable;

        self.stage_derivatives.clear();
        for (row, &c) in table.a.iter().zip(table.c.iter()) {
            let intermediate_state = match weighted_sum(&self.stage_derivatives, row) {
                Some(increment) => self.current_state.clone() + increment * step_size,
                None => self.current_state.clone(),
            };
            let k = (self.derivative)(t + cast::<T>(c) * step_size, &intermediate_state);
            self.stage_derivatives.push(k);
        }
        self.statistics.function_evaluations += table.stages();

        let estimate = |weights: &[f64]| match weighted_sum(&self.stage_derivatives, weights) {
            Some(increment) => self.current_state.clone() + increment * step_size,
            None => self.current_state.clone(),
        };
        (estimate(table.b[0]), estimate(table.b[1]))
    }

    /// Take one accepted step of at most `step_size`, retrying rejected
    /// attempts with the error-control proposal.
    ///
    /// With `enforce_minimum` a requested step below the minimum step size
    /// is an error; `integrate_to` waives it for the step landing on the
    /// interval end.
    fn advance(&mut self, step_size: T, enforce_minimum: bool) -> Result<(), IntegratorError> {
        if step_size == T::zero() || !step_size.is_finite() {
            return Err(IntegratorError::InvalidSettings(
                "step size must be finite and non-zero",
            ));
        }
        if enforce_minimum && step_size.abs() < self.settings.minimum_step_size {
            return Err(IntegratorError::MinimumStepSizeExceeded {
                minimum_step_size: to_f64(self.settings.minimum_step_size),
                requested_step_size: to_f64(step_size.abs()),
            });
        }
        let mut step_size = if step_size.abs() > self.settings.maximum_step_size {
            self.settings.maximum_step_size * step_size.signum()
        } else {
            step_size
        };

        loop {
            let (lower, higher) = self.compute_estimates(step_size);
            let proposal = self.compute_new_step_size(step_size, &lower, &higher)?;

            if proposal.accepted {
                let new_state = match self.order_to_integrate {
                    OrderToIntegrate::Lower => lower,
                    OrderToIntegrate::Higher => higher,
                };
                self.last_independent_variable = self.current_independent_variable;
                self.last_state = core::mem::replace(&mut self.current_state, new_state);
                self.current_independent_variable = self.current_independent_variable + step_size;
                self.step_size = proposal.step_size;
                self.statistics.accepted_steps += 1;
                log::trace!(
                    "accepted step {:?} to t = {:?} (error {:?}), next {:?}",
                    step_size,
                    self.current_independent_variable,
                    proposal.maximum_error,
                    proposal.step_size
                );
                return Ok(());
            }

            self.statistics.rejected_steps += 1;
            log::debug!(
                "rejected step {:?} at t = {:?} (error {:?}), retrying with {:?}",
                step_size,
                self.current_independent_variable,
                proposal.maximum_error,
                proposal.step_size
            );
            step_size = proposal.step_size;
        }
    }
}

/// `Σ w_j k_j` over the non-zero weights, `None` if every weight is zero.
fn weighted_sum<T: FloatScalar, S: State<T>>(stages: &[S], weights: &[f64]) -> Option<S> {
    let mut sum: Option<S> = None;
    for (k, &w) in stages.iter().zip(weights.iter()) {
        if w != 0.0 {
            let term = k.clone() * cast::<T>(w);
            sum = Some(match sum {
                Some(acc) => acc + term,
                None => term,
            });
        }
    }
    sum
}

impl<T, S, F> NumericalIntegrator<T, S> for RungeKuttaVariableStepSizeIntegrator<T, S, F>
where
    T: FloatScalar,
    S: State<T>,
    F: FnMut(T, &S) -> S,
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
        self.advance(step_size, true)?;
        Ok(&self.current_state)
    }

    fn integrate_to(
        &mut self,
        interval_end: T,
        initial_step_size: T,
    ) -> Result<&S, IntegratorError> {
        step_until::<T, S, Self, _>(
            self,
            interval_end,
            initial_step_size,
            |integrator, step_size, landing| integrator.advance(step_size, !landing),
        )?;
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
