use crate::traits::{to_f64, FloatScalar};

use super::{RootFinderError, RootSettings};

/// Decides when a root finder stops.
///
/// Any `FnMut(new_root, old_root, new_value, old_value, iteration) -> bool`
/// closure is a termination condition that never fails.
pub trait TerminationCondition<T> {
    /// `Ok(true)` to stop, `Ok(false)` to continue, `Err` to abort.
    fn check(
        &mut self,
        current_root: T,
        previous_root: T,
        current_value: T,
        previous_value: T,
        iteration: usize,
    ) -> Result<bool, RootFinderError>;
}

impl<T, F> TerminationCondition<T> for F
where
    F: FnMut(T, T, T, T, usize) -> bool,
{
    fn check(
        &mut self,
        current_root: T,
        previous_root: T,
        current_value: T,
        previous_value: T,
        iteration: usize,
    ) -> Result<bool, RootFinderError> {
        Ok(self(current_root, previous_root, current_value, previous_value, iteration))
    }
}

/// Stop when `|Δx / x| < tolerance` or after `maximum_iterations`.
///
/// If the new root is exactly zero the test falls back to `|Δx| < tolerance`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootRelativeToleranceTerminationCondition<T> {
    /// Relative tolerance on the change of the root.
    pub relative_tolerance: T,
    /// Iteration cap.
    pub maximum_iterations: usize,
    /// Return an error when the cap is reached.
    pub report_non_convergence: bool,
}

impl<T: FloatScalar> RootRelativeToleranceTerminationCondition<T> {
    /// Condition that reports non-convergence as an error.
    pub fn new(relative_tolerance: T, maximum_iterations: usize) -> Self {
        Self {
            relative_tolerance,
            maximum_iterations,
            report_non_convergence: true,
        }
    }

    /// Condition from the relative-tolerance part of `settings`.
    pub fn from_settings(settings: &RootSettings<T>) -> Self {
        Self {
            relative_tolerance: settings.relative_tolerance,
            maximum_iterations: settings.maximum_iterations,
            report_non_convergence: settings.report_non_convergence,
        }
    }
}

impl<T: FloatScalar> TerminationCondition<T> for RootRelativeToleranceTerminationCondition<T> {
    fn check(
        &mut self,
        current_root: T,
        previous_root: T,
        _current_value: T,
        _previous_value: T,
        iteration: usize,
    ) -> Result<bool, RootFinderError> {
        let change = (current_root - previous_root).abs();
        let relative_change = if current_root == T::zero() {
            change
        } else {
            change / current_root.abs()
        };
        if relative_change < self.relative_tolerance {
            return Ok(true);
        }
        maximum_iterations_reached(
            current_root,
            iteration,
            self.maximum_iterations,
            self.report_non_convergence,
        )
    }
}

/// Stop when `|Δx| < tolerance` or after `maximum_iterations`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootAbsoluteToleranceTerminationCondition<T> {
    /// Absolute tolerance on the change of the root.
    pub absolute_tolerance: T,
    /// Iteration cap.
    pub maximum_iterations: usize,
    /// Return an error when the cap is reached.
    pub report_non_convergence: bool,
}

impl<T: FloatScalar> RootAbsoluteToleranceTerminationCondition<T> {
    /// Condition that reports non-convergence as an error.
    pub fn new(absolute_tolerance: T, maximum_iterations: usize) -> Self {
        Self {
            absolute_tolerance,
            maximum_iterations,
            report_non_convergence: true,
        }
    }

    /// Condition from the absolute-tolerance part of `settings`.
    pub fn from_settings(settings: &RootSettings<T>) -> Self {
        Self {
            absolute_tolerance: settings.absolute_tolerance,
            maximum_iterations: settings.maximum_iterations,
            report_non_convergence: settings.report_non_convergence,
        }
    }
}

impl<T: FloatScalar> TerminationCondition<T> for RootAbsoluteToleranceTerminationCondition<T> {
    fn check(
        &mut self,
        current_root: T,
        previous_root: T,
        _current_value: T,
        _previous_value: T,
        iteration: usize,
    ) -> Result<bool, RootFinderError> {
        if (current_root - previous_root).abs() < self.absolute_tolerance {
            return Ok(true);
        }
        maximum_iterations_reached(
            current_root,
            iteration,
            self.maximum_iterations,
            self.report_non_convergence,
        )
    }
}

fn maximum_iterations_reached<T: FloatScalar>(
    root: T,
    iteration: usize,
    maximum_iterations: usize,
    report: bool,
) -> Result<bool, RootFinderError> {
    if iteration < maximum_iterations {
        return Ok(false);
    }
    log::warn!(
        "root finder stopped after {} iterations without converging (last root {:?})",
        iteration,
        root
    );
    if !report {
        return Ok(true);
    }
    if root.is_finite() {
        Err(RootFinderError::MaximumIterationsExceeded {
            iterations: iteration,
            last_root: to_f64(root),
        })
    } else {
        Err(RootFinderError::NonFiniteIterate {
            iterations: iteration,
        })
    }
}
