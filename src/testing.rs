use itertools::Itertools;
use rand::distr::StandardUniform;
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

use crate::field::FieldKind;
use crate::table::FieldTable;

/// Fixed random seed to support repeatable testing
const SEED: [u8; 32] = [
    0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 15, 14, 13, 12, 11, 10, 9, 8, 7, 6,
    5, 4, 3, 2, 1,
];

/// Get a random number generator with a const seed for repeatable testing
pub fn rng_fixed_seed() -> StdRng {
    StdRng::from_seed(SEED)
}

/// Generate `n` random numbers using provided generator
pub fn randn<T>(rng: &mut StdRng, n: usize) -> Vec<T>
where
    StandardUniform: rand::distr::Distribution<T>,
{
    std::iter::repeat_with(|| rng.random::<T>())
        .take(n)
        .collect()
}

/// Generates a meshgrid in C ordering (x0, y0, x0, y1, ..., x0, yn, x1, y0, ...)
pub fn meshgrid(x: Vec<&Vec<f64>>) -> Vec<Vec<f64>> {
    x.into_iter()
        .multi_cartesian_product()
        .map(|xx| xx.iter().map(|y| **y).collect())
        .collect()
}

/// Compressional velocity used by the scenario table; bilinear in (p, t),
/// so interpolation reproduces it exactly.
pub fn scenario_vp(p: f64, t: f64) -> f64 {
    4.0 + 0.4 * (p - 1.0) + 0.2 * (t - 100.0) / 100.0
}

/// Value of field `k` (column offset after p and t) in the scenario table.
pub fn scenario_value(k: usize, p: f64, t: f64) -> f64 {
    match FieldKind::ALL[k] {
        FieldKind::Density => 3300.0 + 10.0 * p - 0.5 * t,
        FieldKind::Qs => 0.01 * t + p,
        FieldKind::TSol => 1500.0 + 100.0 * p,
        _ => scenario_vp(p, t) - 0.5 * k as f64,
    }
}

/// Full-width rows for P in {1, 2, 3} Pa and T in {100, 200, 300} K,
/// grouped by pressure block with increasing temperature.
pub fn scenario_rows() -> Vec<[f64; 10]> {
    let mut rows = Vec::new();
    for p in [1.0, 2.0, 3.0] {
        for t in [100.0, 200.0, 300.0] {
            let mut row = [0.0; 10];
            row[0] = p;
            row[1] = t;
            (0..8).for_each(|k| row[2 + k] = scenario_value(k, p, t));
            rows.push(row);
        }
    }
    rows
}

pub fn scenario_table() -> FieldTable<f64> {
    FieldTable::load(&scenario_rows()).unwrap()
}
