//! # astronum
//!
//! Numerical core for astrodynamics simulation, no-std compatible (requires
//! `alloc`). Provides the machinery that orbit propagators, anomaly
//! conversions and atmosphere lookups are built on.
//!
//! ## Quick start
//!
//! ```
//! use astronum::integrators::{
//!     CoefficientSet, NumericalIntegrator, RungeKuttaVariableStepSizeIntegrator,
//!     VariableStepSizeSettings,
//! };
//! use astronum::StateVector;
//!
//! // Harmonic oscillator: x'' = -x
//! let y0 = StateVector::from_array([1.0_f64, 0.0]);
//! let mut integrator = RungeKuttaVariableStepSizeIntegrator::new(
//!     CoefficientSet::RungeKuttaFehlberg78,
//!     |_t, y: &StateVector<f64, 2>| StateVector::from_array([y[1], -y[0]]),
//!     0.0,
//!     y0,
//!     0.1,
//!     VariableStepSizeSettings::default(),
//! )
//! .unwrap();
//! let tau = 2.0 * std::f64::consts::PI;
//! let y = integrator.integrate_to(tau, 0.1).unwrap();
//! assert!((y[0] - 1.0).abs() < 1e-8);
//! ```
//!
//! ## Modules
//!
//! - [`state`]: the [`State`] abstraction consumed by the integrators, with
//!   a const-generic [`StateVector`] and a heap-allocated [`DynStateVector`].
//!   `f32` / `f64` are 1-element states.
//!
//! - [`integrators`]: the [`NumericalIntegrator`](integrators::NumericalIntegrator)
//!   trait, the Runge-Kutta-Fehlberg 4(5), 5(6) and 7(8) coefficient tables,
//!   the variable-step-size embedded Runge-Kutta integrator, and fixed-step
//!   Euler / RK4 integrators.
//!
//! - [`root_finders`]: a generic iteration loop driven by pluggable
//!   termination conditions, with Newton-Raphson and Halley update rules.
//!
//! - [`interpolators`]: linear, natural cubic spline and N-dimensional
//!   multi-linear interpolation with binary-search or hunting lookup.
//!
//! - [`traits`]: element trait hierarchy ([`Scalar`], [`FloatScalar`]).
//!
//! ## Cargo features
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `std`   | yes     | Hardware FPU via system libm |
//! | `libm`  | no      | Pure-Rust software float fallback for `no_std` |
//! | `serde` | no      | `Serialize` / `Deserialize` for settings and scheme enums |
//!
//! ## Logging
//!
//! Diagnostics go through the [`log`](https://docs.rs/log) facade: rejected
//! integration steps at `debug`, accepted steps at `trace`, minimum step-size
//! violations and unconverged root searches at `warn`. No logger is installed.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod integrators;
pub mod interpolators;
pub mod root_finders;
pub mod state;
pub mod traits;

pub use state::{DynStateVector, State, StateVector};
pub use traits::{FloatScalar, Scalar};
