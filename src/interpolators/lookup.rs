use core::cell::Cell;

use crate::traits::FloatScalar;

/// Algorithm used to find the interval bracketing a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LookupScheme {
    /// Bisection over the whole table, O(log n).
    #[default]
    BinarySearch,
    /// Expanding search from the previous interval, then bisection.
    /// O(1) for queries in or next to the previous interval.
    Hunting,
}

/// Finds the interval `i` with `xs[i] <= x < xs[i + 1]`.
///
/// The result is clamped to `[0, xs.len() - 2]`, so queries outside the
/// table map to the boundary interval. The hunting scheme caches the last
/// interval in a [`Cell`]; a lookup is therefore not `Sync`.
#[derive(Debug, Clone)]
pub struct IntervalLookup {
    scheme: LookupScheme,
    last_interval: Cell<usize>,
}

impl IntervalLookup {
    /// Lookup with the given scheme.
    pub fn new(scheme: LookupScheme) -> Self {
        Self {
            scheme,
            last_interval: Cell::new(0),
        }
    }

    /// Scheme in use.
    pub fn scheme(&self) -> LookupScheme {
        self.scheme
    }

    /// Lower index of the interval bracketing `x` in the sorted `xs`.
    ///
    /// `xs` must hold at least two strictly increasing values.
    pub fn find<T: FloatScalar>(&self, xs: &[T], x: T) -> usize {
        debug_assert!(xs.len() >= 2);
        let n = xs.len();
        let index = if x <= xs[0] {
            0
        } else if x >= xs[n - 1] {
            n - 2
        } else {
            match self.scheme {
                LookupScheme::BinarySearch => bisect(xs, x, 0, n - 1),
                LookupScheme::Hunting => hunt(xs, x, self.last_interval.get().min(n - 2)),
            }
        };
        self.last_interval.set(index);
        index
    }
}

/// Bisection with the invariant `xs[lo] <= x < xs[hi]`.
fn bisect<T: FloatScalar>(xs: &[T], x: T, mut lo: usize, mut hi: usize) -> usize {
    while hi - lo > 1 {
        let mid = lo + (hi - lo) / 2;
        if x < xs[mid] {
            hi = mid;
        } else {
            lo = mid;
        }
    }
    lo
}

/// Hunt outward from `guess` with doubling steps until `x` is bracketed,
/// then bisect. Requires `xs[0] < x < xs[n - 1]`.
fn hunt<T: FloatScalar>(xs: &[T], x: T, guess: usize) -> usize {
    let last = xs.len() - 1;
    let mut lo = guess;
    if xs[lo] <= x && x < xs[lo + 1] {
        return lo;
    }

    let mut hi;
    let mut step = 1;
    if x >= xs[lo] {
        // Upwards: xs[lo + 1] <= x
        hi = lo + 1;
        loop {
            lo = hi;
            hi = (lo + step).min(last);
            if x < xs[hi] {
                break;
            }
            step *= 2;
        }
    } else {
        // Downwards: x < xs[lo]
        hi = lo;
        loop {
            lo = hi.saturating_sub(step);
            if x >= xs[lo] || lo == 0 {
                break;
            }
            hi = lo;
            step *= 2;
        }
    }
    bisect(xs, x, lo, hi)
}
