use super::*;
use crate::{DynStateVector, StateVector};
use alloc::vec;

const TAU: f64 = core::f64::consts::TAU;

fn ydot(_t: f64, y: &StateVector<f64, 2>) -> StateVector<f64, 2> {
    StateVector::from_array([y[1], -y[0]])
}

fn tolerances(tolerance: f64) -> VariableStepSizeSettings<f64> {
    VariableStepSizeSettings {
        relative_error_tolerance: ErrorTolerance::Scalar(tolerance),
        absolute_error_tolerance: ErrorTolerance::Scalar(tolerance),
        ..VariableStepSizeSettings::default()
    }
}

// ── Variable step size ──────────────────────────────────────────────

#[test]
fn single_step_error_follows_higher_order() {
    // Local error of the propagated estimate ~ h^(higher_order + 1), so halving
    // h divides it by about 2^6, 2^7 and 2^9 (pre-asymptotic drift upwards)
    for (set, h, window) in [
        (CoefficientSet::RungeKuttaFehlberg45, 0.1, 40.0..90.0),
        (CoefficientSet::RungeKuttaFehlberg56, 0.4, 110.0..220.0),
        (CoefficientSet::RungeKuttaFehlberg78, 1.0, 450.0..750.0),
    ] {
        let local_error = |h: f64| {
            let mut integrator = RungeKuttaVariableStepSizeIntegrator::new(
                set,
                |_t: f64, x: &f64| *x,
                0.0,
                1.0,
                h,
                tolerances(1e-2),
            )
            .unwrap();
            let x = *integrator.perform_integration_step(h).unwrap();
            assert_eq!(integrator.current_independent_variable(), h);
            (x - h.exp()).abs()
        };
        let ratio = local_error(h) / local_error(h / 2.0);
        assert!(window.contains(&ratio), "{set:?}: ratio = {ratio}");
    }
}

#[test]
fn zero_derivative_keeps_state() {
    for set in [
        CoefficientSet::RungeKuttaFehlberg45,
        CoefficientSet::RungeKuttaFehlberg56,
        CoefficientSet::RungeKuttaFehlberg78,
    ] {
        for h in [1e-3, 0.37, 5.0] {
            let y0 = StateVector::from_array([1.25_f64, -3.5, 7.0]);
            let mut integrator = RungeKuttaVariableStepSizeIntegrator::new(
                set,
                |_t, _y: &StateVector<f64, 3>| StateVector::zeros(),
                0.0,
                y0,
                h,
                VariableStepSizeSettings::default(),
            )
            .unwrap();
            let y = *integrator.integrate_to(20.0, h).unwrap();
            assert_eq!(y, y0);
            assert!((integrator.current_independent_variable() - 20.0).abs() < 1e-12);
            assert_eq!(integrator.statistics().rejected_steps, 0);
        }
    }
}

#[test]
fn constant_derivative_rkf78() {
    let mut integrator = RungeKuttaVariableStepSizeIntegrator::new(
        CoefficientSet::RungeKuttaFehlberg78,
        |_t: f64, _x: &f64| 1.0,
        0.0,
        0.0,
        0.1,
        tolerances(1e-12),
    )
    .unwrap();
    let x = *integrator.integrate_to(10.0, 0.1).unwrap();
    assert!((x - 10.0).abs() < 1e-10);
    assert!((integrator.current_independent_variable() - 10.0).abs() < 1e-12);

    let stats = integrator.statistics();
    let naive = 10.0 / integrator.settings().minimum_step_size;
    assert!((stats.accepted_steps as f64) < naive * 1e-6);
    assert!(stats.accepted_steps < 10);
}

#[test]
fn accepted_steps_stay_within_bounds() {
    let settings = VariableStepSizeSettings {
        minimum_step_size: 1e-6,
        maximum_step_size: 0.5,
        ..tolerances(1e-10)
    };
    let mut integrator = RungeKuttaVariableStepSizeIntegrator::new(
        CoefficientSet::RungeKuttaFehlberg45,
        ydot,
        0.0,
        StateVector::from_array([0.0, 1.0]),
        0.01,
        settings,
    )
    .unwrap();

    while integrator.current_independent_variable() < 10.0 {
        let h = integrator.next_step_size();
        assert!((1e-6..=0.5).contains(&h), "proposed {h}");
        integrator.perform_integration_step(h).unwrap();
        let used = integrator.current_independent_variable()
            - integrator.previous_independent_variable();
        assert!(used >= 1e-6 * (1.0 - 1e-9) && used <= 0.5 * (1.0 + 1e-12), "used {used}");
    }
    assert!(integrator.statistics().accepted_steps > 20);
}

#[test]
fn requested_step_below_minimum_is_rejected() {
    let settings = VariableStepSizeSettings {
        minimum_step_size: 1e-3,
        ..VariableStepSizeSettings::default()
    };
    let mut integrator = RungeKuttaVariableStepSizeIntegrator::new(
        CoefficientSet::RungeKuttaFehlberg78,
        |_t: f64, x: &f64| *x,
        0.0,
        1.0,
        0.1,
        settings,
    )
    .unwrap();

    assert_eq!(
        integrator.perform_integration_step(-1e-6).unwrap_err(),
        IntegratorError::MinimumStepSizeExceeded {
            minimum_step_size: 1e-3,
            requested_step_size: 1e-6,
        }
    );
    assert_eq!(integrator.current_independent_variable(), 0.0);
    assert_eq!(*integrator.current_state(), 1.0);
    assert_eq!(integrator.statistics().function_evaluations, 0);
    assert!(integrator.integrate_to(1.0, 1e-6).is_err());

    integrator.perform_integration_step(1e-3).unwrap();
    assert_eq!(integrator.current_independent_variable(), 1e-3);
}

#[test]
fn landing_step_may_be_below_minimum() {
    let settings = VariableStepSizeSettings {
        minimum_step_size: 0.4,
        maximum_step_size: 0.45,
        ..VariableStepSizeSettings::default()
    };
    let mut integrator = RungeKuttaVariableStepSizeIntegrator::new(
        CoefficientSet::RungeKuttaFehlberg45,
        |_t: f64, _x: &f64| 0.0,
        0.0,
        2.0,
        0.45,
        settings,
    )
    .unwrap();

    // 0.45 + 0.45 + 0.1
    assert_eq!(*integrator.integrate_to(1.0, 0.45).unwrap(), 2.0);
    assert!((integrator.current_independent_variable() - 1.0).abs() < 1e-12);
    assert_eq!(integrator.statistics().accepted_steps, 3);
    let last =
        integrator.current_independent_variable() - integrator.previous_independent_variable();
    assert!((last - 0.1).abs() < 1e-12);
}

#[test]
fn maximum_step_size_clamps_requested_step() {
    let settings = VariableStepSizeSettings {
        maximum_step_size: 0.25,
        ..VariableStepSizeSettings::default()
    };
    let mut integrator = RungeKuttaVariableStepSizeIntegrator::new(
        CoefficientSet::RungeKuttaFehlberg78,
        |_t: f64, _x: &f64| 0.0,
        0.0,
        1.0,
        1.0,
        settings,
    )
    .unwrap();
    integrator.perform_integration_step(1.0).unwrap();
    assert_eq!(integrator.current_independent_variable(), 0.25);
    assert_eq!(integrator.next_step_size(), 0.25);
}

#[test]
fn impossible_tolerance_is_fatal() {
    let settings = VariableStepSizeSettings {
        minimum_step_size: 1e-2,
        relative_error_tolerance: ErrorTolerance::Scalar(0.0),
        absolute_error_tolerance: ErrorTolerance::Scalar(1e-30),
        ..VariableStepSizeSettings::default()
    };
    let mut integrator = RungeKuttaVariableStepSizeIntegrator::new(
        CoefficientSet::RungeKuttaFehlberg45,
        ydot,
        0.0,
        StateVector::from_array([0.0, 1.0]),
        1.0,
        settings,
    )
    .unwrap();

    let err = integrator.perform_integration_step(1.0).unwrap_err();
    match err {
        IntegratorError::MinimumStepSizeExceeded {
            minimum_step_size,
            requested_step_size,
        } => {
            assert_eq!(minimum_step_size, 1e-2);
            assert!(requested_step_size < 1e-2);
        }
        other => panic!("unexpected error {other:?}"),
    }
    // Failed step leaves the state untouched
    assert_eq!(integrator.current_independent_variable(), 0.0);
    assert_eq!(integrator.current_state()[1], 1.0);
    assert_eq!(integrator.statistics().rejected_steps, 2);
}

#[test]
fn rejected_step_is_retried_smaller() {
    let mut integrator = RungeKuttaVariableStepSizeIntegrator::new(
        CoefficientSet::RungeKuttaFehlberg45,
        ydot,
        0.0,
        StateVector::from_array([0.0, 1.0]),
        2.0,
        tolerances(1e-12),
    )
    .unwrap();
    integrator.perform_integration_step(2.0).unwrap();
    let taken = integrator.current_independent_variable();
    assert!(taken > 0.0 && taken < 2.0);
    assert!(integrator.statistics().rejected_steps > 0);
    let y = integrator.current_state();
    assert!((y[0] - taken.sin()).abs() < 1e-11);
}

#[test]
fn non_finite_error_estimate() {
    let mut integrator = RungeKuttaVariableStepSizeIntegrator::new(
        CoefficientSet::RungeKuttaFehlberg45,
        |_t: f64, _x: &f64| f64::NAN,
        0.0,
        1.0,
        0.1,
        VariableStepSizeSettings::default(),
    )
    .unwrap();
    assert_eq!(
        integrator.perform_integration_step(0.1).unwrap_err(),
        IntegratorError::NonFiniteErrorEstimate {
            independent_variable: 0.0
        }
    );

    let mut diverging = RungeKuttaVariableStepSizeIntegrator::new(
        CoefficientSet::RungeKuttaFehlberg78,
        |_t: f64, y: &StateVector<f64, 2>| StateVector::from_array([f64::INFINITY, y[0]]),
        0.0,
        StateVector::from_array([0.0, 0.0]),
        0.1,
        VariableStepSizeSettings::default(),
    )
    .unwrap();
    assert!(matches!(
        diverging.perform_integration_step(0.1),
        Err(IntegratorError::NonFiniteErrorEstimate { .. })
    ));
    assert_eq!(diverging.statistics().accepted_steps, 0);
}

#[test]
fn rollback_is_single_level() {
    let y0 = StateVector::from_array([0.0, 1.0]);
    let mut integrator = RungeKuttaVariableStepSizeIntegrator::new(
        CoefficientSet::RungeKuttaFehlberg78,
        ydot,
        0.0,
        y0,
        0.1,
        tolerances(1e-12),
    )
    .unwrap();

    // Nothing to undo yet
    assert!(!integrator.rollback_to_previous_state());

    integrator.perform_integration_step(0.1).unwrap();
    integrator.perform_integration_step(0.1).unwrap();
    let mid_state = *integrator.previous_state();
    let mid_t = integrator.previous_independent_variable();

    assert!(integrator.rollback_to_previous_state());
    assert_eq!(integrator.current_independent_variable(), mid_t);
    assert_eq!(*integrator.current_state(), mid_state);

    assert!(!integrator.rollback_to_previous_state());
    assert_eq!(integrator.current_independent_variable(), mid_t);
    assert_eq!(*integrator.current_state(), mid_state);
}

#[test]
fn rollback_restores_exactly() {
    let y0 = StateVector::from_array([0.3, -0.7]);
    let mut integrator = RungeKuttaVariableStepSizeIntegrator::new(
        CoefficientSet::RungeKuttaFehlberg56,
        ydot,
        1.5,
        y0,
        0.2,
        tolerances(1e-10),
    )
    .unwrap();
    integrator.perform_integration_step(0.2).unwrap();
    assert!(integrator.rollback_to_previous_state());
    assert_eq!(integrator.current_independent_variable(), 1.5);
    assert_eq!(*integrator.current_state(), y0);
}

#[test]
fn modify_current_state_discards_rollback() {
    let mut integrator = RungeKuttaVariableStepSizeIntegrator::new(
        CoefficientSet::RungeKuttaFehlberg45,
        ydot,
        0.0,
        StateVector::from_array([0.0, 1.0]),
        0.1,
        tolerances(1e-10),
    )
    .unwrap();
    integrator.perform_integration_step(0.1).unwrap();
    let t = integrator.current_independent_variable();

    // Impulsive change of velocity
    let mut kicked = *integrator.current_state();
    kicked[1] += 0.5;
    integrator.modify_current_state(kicked);

    assert_eq!(*integrator.current_state(), kicked);
    assert_eq!(integrator.current_independent_variable(), t);
    assert!(!integrator.rollback_to_previous_state());
    assert_eq!(*integrator.current_state(), kicked);
}

#[test]
fn harmonic_oscillator_all_schemes() {
    for set in [
        CoefficientSet::RungeKuttaFehlberg45,
        CoefficientSet::RungeKuttaFehlberg56,
        CoefficientSet::RungeKuttaFehlberg78,
    ] {
        let mut integrator = RungeKuttaVariableStepSizeIntegrator::new(
            set,
            ydot,
            0.0,
            StateVector::from_array([0.0, 1.0]),
            0.1,
            tolerances(1e-12),
        )
        .unwrap();
        let y = *integrator.integrate_to(TAU, 0.1).unwrap();
        assert!(y[0].abs() < 1e-9, "{set:?}: {y:?}");
        assert!((y[1] - 1.0).abs() < 1e-9, "{set:?}: {y:?}");
        assert!((integrator.current_independent_variable() - TAU).abs() < 1e-12);
    }
}

#[test]
fn harmonic_oscillator_backward() {
    let mut integrator = RungeKuttaVariableStepSizeIntegrator::new(
        CoefficientSet::RungeKuttaFehlberg78,
        ydot,
        0.0,
        StateVector::from_array([0.0, 1.0]),
        0.1,
        tolerances(1e-12),
    )
    .unwrap();
    // Sign of the initial step is ignored
    let y = *integrator.integrate_to(-TAU, 0.1).unwrap();
    assert!(y[0].abs() < 1e-9);
    assert!((y[1] - 1.0).abs() < 1e-9);
    assert!(integrator.next_step_size() < 0.0);
}

#[test]
fn evaluations_match_stage_count() {
    for (set, stages) in [
        (CoefficientSet::RungeKuttaFehlberg45, 6),
        (CoefficientSet::RungeKuttaFehlberg56, 8),
        (CoefficientSet::RungeKuttaFehlberg78, 13),
    ] {
        let mut calls = 0usize;
        let mut integrator = RungeKuttaVariableStepSizeIntegrator::new(
            set,
            |_t: f64, x: &f64| {
                calls += 1;
                -x
            },
            0.0,
            1.0,
            0.01,
            tolerances(1e-8),
        )
        .unwrap();
        integrator.perform_integration_step(0.01).unwrap();
        assert_eq!(integrator.stage_derivatives().len(), stages);
        let stats = integrator.statistics();
        assert_eq!(stats.accepted_steps, 1);
        assert_eq!(stats.rejected_steps, 0);
        assert_eq!(stats.function_evaluations, stages);
        drop(integrator);
        assert_eq!(calls, stages);
    }
}

#[test]
fn first_stage_is_derivative_at_current_state() {
    let mut integrator = RungeKuttaVariableStepSizeIntegrator::new(
        CoefficientSet::RungeKuttaFehlberg45,
        ydot,
        0.0,
        StateVector::from_array([2.0, 3.0]),
        0.01,
        tolerances(1e-8),
    )
    .unwrap();
    integrator.perform_integration_step(0.01).unwrap();
    assert_eq!(
        integrator.stage_derivatives()[0],
        StateVector::from_array([3.0, -2.0])
    );
}

#[test]
fn lower_order_propagation() {
    let settings = VariableStepSizeSettings {
        order_to_integrate: Some(OrderToIntegrate::Lower),
        ..tolerances(1e-10)
    };
    let mut integrator = RungeKuttaVariableStepSizeIntegrator::new(
        CoefficientSet::RungeKuttaFehlberg45,
        |_t: f64, x: &f64| *x,
        0.0,
        1.0,
        0.01,
        settings,
    )
    .unwrap();
    assert_eq!(integrator.order_to_integrate(), OrderToIntegrate::Lower);
    let x = *integrator.integrate_to(1.0, 0.01).unwrap();
    assert!((x - core::f64::consts::E).abs() < 1e-6);
}

#[test]
fn step_size_proposal_bounds() {
    let integrator = RungeKuttaVariableStepSizeIntegrator::new(
        CoefficientSet::RungeKuttaFehlberg45,
        |_t: f64, x: &f64| *x,
        0.0,
        1.0,
        0.1,
        tolerances(1e-6),
    )
    .unwrap();

    // Identical estimates: maximum growth
    let p = integrator.compute_new_step_size(0.1, &1.0, &1.0).unwrap();
    assert!(p.accepted);
    assert_eq!(p.maximum_error, 0.0);
    assert!((p.step_size - 0.4).abs() < 1e-15);

    // Huge error: maximum decrease, keeps the sign
    let p = integrator.compute_new_step_size(-0.1, &1.0, &2.0).unwrap();
    assert!(!p.accepted);
    assert!((p.step_size + 0.01).abs() < 1e-15);

    // Error exactly at tolerance: accepted, shrinks by the safety factor
    let tol = 2.0 * 1e-6 + 1e-6;
    let p = integrator
        .compute_new_step_size(0.1, &(2.0 - tol), &2.0)
        .unwrap();
    assert!((p.maximum_error - 1.0).abs() < 1e-6);
    assert!((p.step_size - 0.08).abs() < 1e-6);
}

#[test]
fn per_element_tolerance() {
    let settings = VariableStepSizeSettings {
        relative_error_tolerance: ErrorTolerance::PerElement(vec![1e-12, 1e-6]),
        absolute_error_tolerance: ErrorTolerance::PerElement(vec![1e-12, 1e-6]),
        ..VariableStepSizeSettings::default()
    };
    let mut integrator = RungeKuttaVariableStepSizeIntegrator::new(
        CoefficientSet::RungeKuttaFehlberg78,
        ydot,
        0.0,
        StateVector::from_array([0.0, 1.0]),
        0.1,
        settings,
    )
    .unwrap();
    let y = *integrator.integrate_to(1.0, 0.1).unwrap();
    assert!((y[0] - 1.0_f64.sin()).abs() < 1e-9);

    let bad = VariableStepSizeSettings {
        absolute_error_tolerance: ErrorTolerance::PerElement(vec![1e-12]),
        ..VariableStepSizeSettings::default()
    };
    let err = RungeKuttaVariableStepSizeIntegrator::new(
        CoefficientSet::RungeKuttaFehlberg78,
        ydot,
        0.0,
        StateVector::from_array([0.0, 1.0]),
        0.1,
        bad,
    )
    .err();
    assert!(matches!(err, Some(IntegratorError::InvalidSettings(_))));
}

#[test]
fn invalid_settings_are_rejected() {
    let cases = [
        VariableStepSizeSettings {
            safety_factor: 1.5,
            ..VariableStepSizeSettings::default()
        },
        VariableStepSizeSettings {
            absolute_error_tolerance: ErrorTolerance::Scalar(0.0),
            ..VariableStepSizeSettings::default()
        },
        VariableStepSizeSettings {
            relative_error_tolerance: ErrorTolerance::Scalar(-1e-9),
            ..VariableStepSizeSettings::default()
        },
        VariableStepSizeSettings {
            minimum_step_size: 1.0,
            maximum_step_size: 0.5,
            ..VariableStepSizeSettings::default()
        },
        VariableStepSizeSettings {
            minimum_step_size: 0.0,
            ..VariableStepSizeSettings::default()
        },
        VariableStepSizeSettings {
            minimum_factor_decrease: 1.0,
            ..VariableStepSizeSettings::default()
        },
        VariableStepSizeSettings {
            maximum_factor_increase: 0.5,
            ..VariableStepSizeSettings::default()
        },
    ];
    for settings in cases {
        let result = RungeKuttaVariableStepSizeIntegrator::new(
            CoefficientSet::RungeKuttaFehlberg45,
            |_t: f64, x: &f64| *x,
            0.0,
            1.0,
            0.1,
            settings.clone(),
        );
        assert!(
            matches!(result, Err(IntegratorError::InvalidSettings(_))),
            "{settings:?}"
        );
    }

    let zero_step = RungeKuttaVariableStepSizeIntegrator::new(
        CoefficientSet::RungeKuttaFehlberg45,
        |_t: f64, x: &f64| *x,
        0.0,
        1.0,
        0.0,
        VariableStepSizeSettings::default(),
    );
    assert!(zero_step.is_err());
}

#[test]
fn dynamic_state() {
    let mut integrator = RungeKuttaVariableStepSizeIntegrator::new(
        CoefficientSet::RungeKuttaFehlberg56,
        |_t: f64, y: &DynStateVector<f64>| -y.clone(),
        0.0,
        DynStateVector::from_vec(vec![1.0, 2.0, 3.0]),
        0.1,
        tolerances(1e-12),
    )
    .unwrap();
    let y = integrator.integrate_to(2.0, 0.1).unwrap().clone();
    let decay = (-2.0_f64).exp();
    for (i, expected) in [1.0, 2.0, 3.0].iter().enumerate() {
        assert!((y[i] - expected * decay).abs() < 1e-10);
    }
}

#[test]
fn single_precision() {
    let mut integrator = RungeKuttaVariableStepSizeIntegrator::new(
        CoefficientSet::RungeKuttaFehlberg45,
        |_t: f32, y: &StateVector<f32, 2>| StateVector::from_array([y[1], -y[0]]),
        0.0_f32,
        StateVector::from_array([0.0_f32, 1.0]),
        0.1,
        VariableStepSizeSettings::<f32>::default(),
    )
    .unwrap();
    let y = *integrator.integrate_to(1.0, 0.1).unwrap();
    assert!((y[0] - 1.0_f32.sin()).abs() < 1e-4);
}

#[test]
fn integrate_to_rejects_zero_initial_step() {
    let mut integrator = RungeKuttaVariableStepSizeIntegrator::new(
        CoefficientSet::RungeKuttaFehlberg45,
        |_t: f64, x: &f64| *x,
        0.0,
        1.0,
        0.1,
        VariableStepSizeSettings::default(),
    )
    .unwrap();
    assert!(integrator.integrate_to(1.0, 0.0).is_err());
    // Already at the end: nothing to do
    assert_eq!(*integrator.integrate_to(0.0, 0.1).unwrap(), 1.0);
}

#[test]
fn integrate_to_rejects_non_finite_end() {
    let mut integrator = RungeKuttaVariableStepSizeIntegrator::new(
        CoefficientSet::RungeKuttaFehlberg45,
        |_t: f64, x: &f64| *x,
        0.0,
        1.0,
        0.1,
        VariableStepSizeSettings::default(),
    )
    .unwrap();
    for end in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        assert!(matches!(
            integrator.integrate_to(end, 0.1),
            Err(IntegratorError::InvalidSettings(_))
        ));
    }
    assert_eq!(integrator.statistics().accepted_steps, 0);

    let mut fixed = RungeKutta4Integrator::new(|_t: f64, x: &f64| *x, 0.0, 1.0, 0.1);
    assert!(matches!(
        fixed.integrate_to(f64::NAN, 0.1),
        Err(IntegratorError::InvalidSettings(_))
    ));
    assert_eq!(fixed.current_independent_variable(), 0.0);
}

// ── Fixed step size ─────────────────────────────────────────────────

#[test]
fn rk4_harmonic_oscillator() {
    let mut integrator =
        RungeKutta4Integrator::new(ydot, 0.0, StateVector::from_array([1.0, 0.0]), 0.001);
    let y = *integrator.integrate_to(TAU, 0.001).unwrap();
    assert!((y[0] - 1.0).abs() < 1e-8);
    assert!(y[1].abs() < 1e-8);
    assert!((integrator.current_independent_variable() - TAU).abs() < 1e-12);
}

#[test]
fn rk4_backward() {
    let mut integrator =
        RungeKutta4Integrator::new(ydot, 0.0, StateVector::from_array([1.0, 0.0]), 0.001);
    let y = *integrator.integrate_to(-TAU, 0.001).unwrap();
    assert!((y[0] - 1.0).abs() < 1e-8);
    assert!(y[1].abs() < 1e-8);
}

#[test]
fn euler_is_first_order() {
    let error = |h: f64| {
        let mut integrator = EulerIntegrator::new(|_t: f64, x: &f64| *x, 0.0, 1.0, h);
        let x = *integrator.integrate_to(1.0, h).unwrap();
        (x - core::f64::consts::E).abs()
    };
    let ratio = error(1e-3) / error(5e-4);
    assert!((ratio - 2.0).abs() < 0.05, "ratio = {ratio}");
}

#[test]
fn fixed_step_statistics_and_rollback() {
    let mut integrator = RungeKutta4Integrator::new(|_t: f64, x: &f64| -x, 0.0, 1.0, 0.5);
    integrator.perform_integration_step(0.5).unwrap();
    integrator.perform_integration_step(0.25).unwrap();
    assert_eq!(integrator.next_step_size(), 0.25);
    assert_eq!(integrator.current_independent_variable(), 0.75);

    let stats = integrator.statistics();
    assert_eq!(stats.accepted_steps, 2);
    assert_eq!(stats.function_evaluations, 8);

    let before = *integrator.previous_state();
    assert!(integrator.rollback_to_previous_state());
    assert_eq!(*integrator.current_state(), before);
    assert_eq!(integrator.current_independent_variable(), 0.5);
    assert!(!integrator.rollback_to_previous_state());

    assert!(integrator.perform_integration_step(f64::NAN).is_err());
}

#[test]
fn integrators_are_interchangeable() {
    fn run<I: NumericalIntegrator<f64, f64>>(mut integrator: I) -> f64 {
        *integrator.integrate_to(1.0, 0.01).unwrap()
    }
    let f = |_t: f64, x: &f64| *x;
    let adaptive = run(RungeKuttaVariableStepSizeIntegrator::new(
        CoefficientSet::RungeKuttaFehlberg78,
        f,
        0.0,
        1.0,
        0.01,
        tolerances(1e-12),
    )
    .unwrap());
    let fixed = run(RungeKutta4Integrator::new(f, 0.0, 1.0, 0.01));
    assert!((adaptive - fixed).abs() < 1e-8);
}
