//! Bilinear interpolation within a single pressure-temperature cell.
//!
//! References
//! * https://en.wikipedia.org/wiki/Bilinear_interpolation#Repeated_linear_interpolation
use ndarray::ArrayView2;
use num_traits::Float;

use crate::grid::{Axis, Bounds};

/// Fractional position of `v` between `low` and `high`.
///
/// A zero-extent bracket (`high == low`) yields `0`, so the low corner
/// is used as-is and no NaN is produced.
#[inline]
pub fn normalize<T: Float>(v: T, high: T, low: T) -> T {
    let span = high - low;
    if span == T::zero() {
        return T::zero();
    }
    (v - low) / span
}

/// Blend four corner values, first along temperature at both pressure
/// bounds, then along pressure.
///
/// Corner naming is `v_{pressure}{temperature}`, so `v_lh` is the value
/// at low pressure and high temperature.
#[inline]
pub fn interpolate<T: Float>(v_ll: T, v_lh: T, v_hl: T, v_hh: T, t_frac: T, p_frac: T) -> T {
    let a = v_ll + (v_lh - v_ll) * t_frac;
    let b = v_hl + (v_hh - v_hl) * t_frac;
    a + (b - a) * p_frac
}

/// The grid nodes enclosing a query point and its position within them.
///
/// Cells are only built from brackets found on the same axes they are
/// evaluated against; see [`FieldTable::locate`](crate::FieldTable::locate).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell<T> {
    p: Bounds,
    t: Bounds,
    p_frac: T,
    t_frac: T,
}

impl<T: Copy> Cell<T> {
    /// Pressure bracket
    pub fn p(&self) -> Bounds {
        self.p
    }

    /// Temperature bracket
    pub fn t(&self) -> Bounds {
        self.t
    }

    /// Fractional position along pressure, in `[0, 1]`
    pub fn p_frac(&self) -> T {
        self.p_frac
    }

    /// Fractional position along temperature, in `[0, 1]`
    pub fn t_frac(&self) -> T {
        self.t_frac
    }
}

impl<T: Float> Cell<T> {
    /// Locate a point given its brackets on both axes.
    ///
    /// `pb` and `tb` must come from `pressure.bounds` and `temperature.bounds`.
    pub(crate) fn new(pressure: &Axis<T>, temperature: &Axis<T>, p: T, t: T, pb: Bounds, tb: Bounds) -> Self {
        let pv = pressure.values();
        let tv = temperature.values();
        Self {
            p: pb,
            t: tb,
            p_frac: normalize(p, pv[pb.high], pv[pb.low]),
            t_frac: normalize(t, tv[tb.high], tv[tb.low]),
        }
    }

    /// Evaluate a field grid of shape (temperature, pressure) in this cell.
    #[inline]
    pub fn eval(&self, grid: ArrayView2<'_, T>) -> T {
        let (pl, ph) = (self.p.low, self.p.high);
        let (tl, th) = (self.t.low, self.t.high);
        interpolate(
            grid[[tl, pl]],
            grid[[th, pl]],
            grid[[tl, ph]],
            grid[[th, ph]],
            self.t_frac,
            self.p_frac,
        )
    }
}

#[cfg(test)]
mod test {
    use super::{interpolate, normalize, Cell};
    use crate::grid::Axis;
    use crate::testing::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(150.0, 200.0, 100.0), 0.5);
        assert_eq!(normalize(100.0, 200.0, 100.0), 0.0);
        assert_eq!(normalize(200.0, 200.0, 100.0), 1.0);
    }

    #[test]
    fn test_normalize_degenerate_is_zero() {
        assert_eq!(normalize(-5.0, 1.0, 1.0), 0.0);
        assert_eq!(normalize(1.0_f32, 1.0, 1.0), 0.0);
    }

    #[test]
    fn test_interpolate_midpoint() {
        assert_relative_eq!(interpolate(4.0, 4.2, 4.4, 4.6, 0.5, 0.5), 4.3, epsilon = 1e-12);
    }

    #[test]
    fn test_interpolate_corners() {
        let (ll, lh, hl, hh) = (1.0, 2.0, 3.0, 5.0);
        assert_eq!(interpolate(ll, lh, hl, hh, 0.0, 0.0), ll);
        assert_eq!(interpolate(ll, lh, hl, hh, 1.0, 0.0), lh);
        assert_eq!(interpolate(ll, lh, hl, hh, 0.0, 1.0), hl);
        assert_eq!(interpolate(ll, lh, hl, hh, 1.0, 1.0), hh);
    }

    /// Equal corners give that value anywhere in the cell.
    #[test]
    fn test_interpolate_constant() {
        let mut rng = rng_fixed_seed();
        let fr = randn::<f64>(&mut rng, 200);
        for w in fr.chunks(2) {
            assert_relative_eq!(interpolate(7.25, 7.25, 7.25, 7.25, w[0], w[1]), 7.25, epsilon = 1e-12);
        }
    }

    /// A degenerate pressure axis reduces to linear interpolation in temperature.
    #[test]
    fn test_interpolate_reduces_to_linear() {
        let v = interpolate(1.0, 3.0, 100.0, 100.0, 0.25, 0.0);
        assert_relative_eq!(v, 1.5, epsilon = 1e-12);
    }

    /// A bilinear function p*t + p + t is reproduced exactly inside a cell.
    #[test]
    fn test_cell_reproduces_bilinear_function() {
        let f = |p: f64, t: f64| p * t + p + t;
        let pa = Axis::new(vec![0.0, 2.0]).unwrap();
        let ta = Axis::new(vec![10.0, 30.0]).unwrap();
        // Shape (temperature, pressure)
        let grid = array![[f(0.0, 10.0), f(2.0, 10.0)], [f(0.0, 30.0), f(2.0, 30.0)]];

        let mut rng = rng_fixed_seed();
        let u = randn::<f64>(&mut rng, 100);
        for w in u.chunks(2) {
            let (p, t) = (2.0 * w[0], 10.0 + 20.0 * w[1]);
            let cell = Cell::new(&pa, &ta, p, t, pa.bounds(p).unwrap(), ta.bounds(t).unwrap());
            assert_relative_eq!(cell.eval(grid.view()), f(p, t), epsilon = 1e-9);
        }
    }
}
