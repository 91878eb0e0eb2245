//! Continuous seismic-property fields from tabulated mineral-physics data.
//!
//! A lookup table samples seismic velocities, density, attenuation and
//! solidus temperature of one rock composition on a rectangular grid of
//! pressure and temperature. [`FieldTable`] reshapes the raw rows into one
//! 2-D grid per field once at load time; queries then bracket each point
//! on both axes and interpolate bilinearly within the enclosing cell.
//! Points outside the table are clamped to the nearest edge and the
//! clamp is reported on the result rather than treated as an error.
//!
//! The [`mixing`] module blends compositions: harmonic averaging for
//! mechanical mixtures, and linear interpolation across a composition
//! parameter.
//!
//! # Query Costs
//! | Method                        | Cost per point                          |
//! |-------------------------------|-----------------------------------------|
//! | `FieldTable::query_point`     | O(log2(np) + log2(nt))                  |
//! | `FieldTable::query_points`    | O(log2(np) + log2(nt))                  |
//! | `FieldTable::regrid`          | O(1), after O(log) bracketing per axis  |
//!
//! # Example
//! ```rust
//! use seislut::{mixing, FieldKind, FieldTable};
//!
//! // Rows of [pressure, temperature, vp, vs, vp_ani, vs_ani, vphi, density, qs, t_sol],
//! // grouped by pressure with increasing temperature in each block
//! let mut rows = Vec::new();
//! for p in [1.0e9_f64, 2.0e9] {
//!     for t in [1000.0, 1500.0, 2000.0] {
//!         let vs = 4.5 + 1.0e-10 * p - 2.0e-4 * t;
//!         rows.push([p, t, 1.8 * vs, vs, 1.8 * vs, vs, 1.4 * vs, 3300.0, 0.01, 1800.0]);
//!     }
//! }
//! let table: FieldTable<f64> = FieldTable::load(&rows).unwrap();
//!
//! // One point, with the field picked by name
//! let vs = table.query_point("Vs".parse().unwrap(), 1.5e9, 1250.0).unwrap();
//! assert!(!vs.domain.is_clipped());
//!
//! // Index-paired points
//! let out = table.query_points(FieldKind::Vs, &[1.2e9, 1.8e9], &[1100.0, 1900.0]).unwrap();
//! assert_eq!(out.len(), 2);
//!
//! // Grid product, shape (temperatures, pressures)
//! let grid = table.regrid(FieldKind::Density, &[1.0e9, 1.5e9, 2.0e9], &[1000.0, 2000.0]).unwrap();
//! assert_eq!(grid.values.dim(), (2, 3));
//! assert!(!grid.is_clipped());
//!
//! // Mechanical mixture of two compositions at the same point
//! let mixed = mixing::harmonic_mix(&[vs.value, 4.0], &[0.8, 0.2]).unwrap();
//! assert!(mixed > 4.0 && mixed < vs.value);
//! ```
// These "needless" range loops are a significant speedup
#![allow(clippy::needless_range_loop)]

pub mod bilinear;
pub mod error;
pub mod field;
pub mod grid;
pub mod mixing;
pub mod table;
pub mod utils;

pub use error::{Error, Result};
pub use field::FieldKind;
pub use grid::{Axis, Bounds, Extrap};
pub use mixing::{harmonic_mix, interp_composition, MixedSample, Mixture};
pub use table::{
    AxisName, DomainFlags, DomainWarning, FieldTable, OutOfDomain, Record, Regridded, Sample,
};

#[cfg(test)]
pub(crate) mod testing;
