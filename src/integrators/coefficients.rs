//! Butcher tableaux for the embedded Runge-Kutta-Fehlberg pairs.
//!
//! Reference: E. Fehlberg, "Classical Fifth-, Sixth-, Seventh-, and
//! Eighth-Order Runge-Kutta Formulas with Stepsize Control", NASA TR R-287,
//! 1968; and "Low-order classical Runge-Kutta formulas with stepsize control
//! and their application to some heat transfer problems", NASA TR R-315,
//! 1969.

/// Identifier of a tabulated embedded Runge-Kutta pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CoefficientSet {
    /// Runge-Kutta-Fehlberg 4(5), 6 stages.
    RungeKuttaFehlberg45,
    /// Runge-Kutta-Fehlberg 5(6), 8 stages.
    RungeKuttaFehlberg56,
    /// Runge-Kutta-Fehlberg 7(8), 13 stages.
    RungeKuttaFehlberg78,
}

/// Which of the two embedded estimates becomes the new state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OrderToIntegrate {
    /// Propagate the lower-order estimate (error estimate is local to it).
    Lower,
    /// Propagate the higher-order estimate (local extrapolation).
    Higher,
}

/// Butcher tableau of an embedded Runge-Kutta pair.
///
/// `a` is strictly lower triangular and stored row by row, row `i` holding
/// the `i` coefficients `a[i][0..i]`. `b[0]` are the lower-order weights,
/// `b[1]` the higher-order weights.
#[derive(Debug, PartialEq)]
pub struct RungeKuttaCoefficients {
    /// Stage coupling coefficients, one row per stage.
    pub a: &'static [&'static [f64]],
    /// Weights: `[lower order, higher order]`.
    pub b: [&'static [f64]; 2],
    /// Nodes (abscissae).
    pub c: &'static [f64],
    /// Order of the lower-order estimate.
    pub lower_order: u32,
    /// Order of the higher-order estimate.
    pub higher_order: u32,
    /// Estimate propagated by default.
    pub order_to_integrate: OrderToIntegrate,
}

impl RungeKuttaCoefficients {
    /// Shared table for `set`.
    ///
    /// ```
    /// use astronum::integrators::{CoefficientSet, RungeKuttaCoefficients};
    ///
    /// let rkf78 = RungeKuttaCoefficients::get(CoefficientSet::RungeKuttaFehlberg78);
    /// assert_eq!(rkf78.stages(), 13);
    /// assert_eq!(rkf78.higher_order, 8);
    /// ```
    pub fn get(set: CoefficientSet) -> &'static RungeKuttaCoefficients {
        match set {
            CoefficientSet::RungeKuttaFehlberg45 => &RUNGE_KUTTA_FEHLBERG_45,
            CoefficientSet::RungeKuttaFehlberg56 => &RUNGE_KUTTA_FEHLBERG_56,
            CoefficientSet::RungeKuttaFehlberg78 => &RUNGE_KUTTA_FEHLBERG_78,
        }
    }

    /// Number of stages.
    #[inline]
    pub fn stages(&self) -> usize {
        self.c.len()
    }

    /// Weights of the estimate selected by `order`.
    #[inline]
    pub fn weights(&self, order: OrderToIntegrate) -> &'static [f64] {
        match order {
            OrderToIntegrate::Lower => self.b[0],
            OrderToIntegrate::Higher => self.b[1],
        }
    }
}

// ── Runge-Kutta-Fehlberg 4(5) ───────────────────────────────────────

static RUNGE_KUTTA_FEHLBERG_45: RungeKuttaCoefficients = RungeKuttaCoefficients {
    a: &[
        &[],
        &[1.0 / 4.0],
        &[3.0 / 32.0, 9.0 / 32.0],
        &[1932.0 / 2197.0, -7200.0 / 2197.0, 7296.0 / 2197.0],
        &[439.0 / 216.0, -8.0, 3680.0 / 513.0, -845.0 / 4104.0],
        &[-8.0 / 27.0, 2.0, -3544.0 / 2565.0, 1859.0 / 4104.0, -11.0 / 40.0],
    ],
    b: [
        &[25.0 / 216.0, 0.0, 1408.0 / 2565.0, 2197.0 / 4104.0, -1.0 / 5.0, 0.0],
        &[16.0 / 135.0, 0.0, 6656.0 / 12825.0, 28561.0 / 56430.0, -9.0 / 50.0, 2.0 / 55.0],
    ],
    c: &[0.0, 1.0 / 4.0, 3.0 / 8.0, 12.0 / 13.0, 1.0, 1.0 / 2.0],
    lower_order: 4,
    higher_order: 5,
    order_to_integrate: OrderToIntegrate::Higher,
};

// ── Runge-Kutta-Fehlberg 5(6) ───────────────────────────────────────

static RUNGE_KUTTA_FEHLBERG_56: RungeKuttaCoefficients = RungeKuttaCoefficients {
    a: &[
        &[],
        &[1.0 / 6.0],
        &[4.0 / 75.0, 16.0 / 75.0],
        &[5.0 / 6.0, -8.0 / 3.0, 5.0 / 2.0],
        &[-8.0 / 5.0, 144.0 / 25.0, -4.0, 16.0 / 25.0],
        &[361.0 / 320.0, -18.0 / 5.0, 407.0 / 128.0, -11.0 / 80.0, 55.0 / 128.0],
        &[-11.0 / 640.0, 0.0, 11.0 / 256.0, -11.0 / 160.0, 11.0 / 256.0, 0.0],
        &[93.0 / 640.0, -18.0 / 5.0, 803.0 / 256.0, -11.0 / 160.0, 99.0 / 256.0, 0.0, 1.0],
    ],
    b: [
        &[31.0 / 384.0, 0.0, 1125.0 / 2816.0, 9.0 / 32.0, 125.0 / 768.0, 5.0 / 66.0, 0.0, 0.0],
        &[
            7.0 / 1408.0,
            0.0,
            1125.0 / 2816.0,
            9.0 / 32.0,
            125.0 / 768.0,
            0.0,
            5.0 / 66.0,
            5.0 / 66.0,
        ],
    ],
    c: &[0.0, 1.0 / 6.0, 4.0 / 15.0, 2.0 / 3.0, 4.0 / 5.0, 1.0, 0.0, 1.0],
    lower_order: 5,
    higher_order: 6,
    order_to_integrate: OrderToIntegrate::Higher,
};

// ── Runge-Kutta-Fehlberg 7(8) ───────────────────────────────────────
//
// Stages 11 and 12 only enter the 8th-order weights; the difference of the
// two estimates is (41/840)(k0 + k10 - k11 - k12).

static RUNGE_KUTTA_FEHLBERG_78: RungeKuttaCoefficients = RungeKuttaCoefficients {
    a: &[
        &[],
        &[2.0 / 27.0],
        &[1.0 / 36.0, 1.0 / 12.0],
        &[1.0 / 24.0, 0.0, 1.0 / 8.0],
        &[5.0 / 12.0, 0.0, -25.0 / 16.0, 25.0 / 16.0],
        &[1.0 / 20.0, 0.0, 0.0, 1.0 / 4.0, 1.0 / 5.0],
        &[-25.0 / 108.0, 0.0, 0.0, 125.0 / 108.0, -65.0 / 27.0, 125.0 / 54.0],
        &[31.0 / 300.0, 0.0, 0.0, 0.0, 61.0 / 225.0, -2.0 / 9.0, 13.0 / 900.0],
        &[2.0, 0.0, 0.0, -53.0 / 6.0, 704.0 / 45.0, -107.0 / 9.0, 67.0 / 90.0, 3.0],
        &[
            -91.0 / 108.0,
            0.0,
            0.0,
            23.0 / 108.0,
            -976.0 / 135.0,
            311.0 / 54.0,
            -19.0 / 60.0,
            17.0 / 6.0,
            -1.0 / 12.0,
        ],
        &[
            2383.0 / 4100.0,
            0.0,
            0.0,
            -341.0 / 164.0,
            4496.0 / 1025.0,
            -301.0 / 82.0,
            2133.0 / 4100.0,
            45.0 / 82.0,
            45.0 / 164.0,
            18.0 / 41.0,
        ],
        &[
            3.0 / 205.0,
            0.0,
            0.0,
            0.0,
            0.0,
            -6.0 / 41.0,
            -3.0 / 205.0,
            -3.0 / 41.0,
            3.0 / 41.0,
            6.0 / 41.0,
            0.0,
        ],
        &[
            -1777.0 / 4100.0,
            0.0,
            0.0,
            -341.0 / 164.0,
            4496.0 / 1025.0,
            -289.0 / 82.0,
            2193.0 / 4100.0,
            51.0 / 82.0,
            33.0 / 164.0,
            12.0 / 41.0,
            0.0,
            1.0,
        ],
    ],
    b: [
        &[
            41.0 / 840.0,
            0.0,
            0.0,
            0.0,
            0.0,
            34.0 / 105.0,
            9.0 / 35.0,
            9.0 / 35.0,
            9.0 / 280.0,
            9.0 / 280.0,
            41.0 / 840.0,
            0.0,
            0.0,
        ],
        &[
            0.0,
            0.0,
            0.0,
            0.0,
            0.0,
            34.0 / 105.0,
            9.0 / 35.0,
            9.0 / 35.0,
            9.0 / 280.0,
            9.0 / 280.0,
            0.0,
            41.0 / 840.0,
            41.0 / 840.0,
        ],
    ],
    c: &[
        0.0,
        2.0 / 27.0,
        1.0 / 9.0,
        1.0 / 6.0,
        5.0 / 12.0,
        1.0 / 2.0,
        5.0 / 6.0,
        1.0 / 6.0,
        2.0 / 3.0,
        1.0 / 3.0,
        1.0,
        0.0,
        1.0,
    ],
    lower_order: 7,
    higher_order: 8,
    order_to_integrate: OrderToIntegrate::Higher,
};
