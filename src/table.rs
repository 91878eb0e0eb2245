//! Per-field grids built from a flat sample table, and the point,
//! point-list and grid-product queries over them.
//!
//! ```rust
//! use seislut::{FieldKind, FieldTable};
//!
//! // (pressure, temperature, vp) rows, grouped by pressure block
//! let rows = [
//!     [1.0_f64, 100.0, 4.0],
//!     [1.0, 200.0, 4.2],
//!     [2.0, 100.0, 4.4],
//!     [2.0, 200.0, 4.6],
//! ];
//! let table: FieldTable<f64> = FieldTable::with_fields(&[FieldKind::Vp], &rows).unwrap();
//!
//! let s = table.query_point(FieldKind::Vp, 1.5, 150.0).unwrap();
//! assert!((s.value - 4.3).abs() < 1e-12);
//! assert!(!s.domain.is_clipped());
//!
//! // Outside the table, the nearest edge value comes back with a warning
//! let s = table.query_point(FieldKind::Vp, -5.0, 100.0).unwrap();
//! assert_eq!(s.value, 4.0);
//! assert!(s.domain.pressure.is_some());
//! ```
use core::fmt;

use itertools::Itertools;
use ndarray::{Array2, ArrayView2};
use num_traits::Float;
use tracing::{debug, warn};

use crate::bilinear::Cell;
use crate::error::{Error, Result};
use crate::field::FieldKind;
use crate::grid::{Axis, Bounds, Extrap};
use crate::utils::linspace;

/// Table dimension a domain warning refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AxisName {
    Pressure,
    Temperature,
}

impl fmt::Display for AxisName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AxisName::Pressure => f.write_str("pressure"),
            AxisName::Temperature => f.write_str("temperature"),
        }
    }
}

/// A query coordinate fell outside the table and was clamped to `limit`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DomainWarning<T> {
    pub axis: AxisName,
    /// `OutsideLow` or `OutsideHigh`
    pub extrap: Extrap,
    pub value: T,
    pub limit: T,
}

impl<T: Float> DomainWarning<T> {
    fn check(axis: AxisName, grid: &Axis<T>, b: Bounds, value: T) -> Option<Self> {
        b.extrap.is_clipped().then(|| Self {
            axis,
            extrap: b.extrap,
            value,
            limit: grid.values()[b.low],
        })
    }
}

/// Domain warnings for one query point, per axis.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DomainFlags<T> {
    pub pressure: Option<DomainWarning<T>>,
    pub temperature: Option<DomainWarning<T>>,
}

impl<T> DomainFlags<T> {
    /// Whether either coordinate was clamped to the table edge.
    pub fn is_clipped(&self) -> bool {
        self.pressure.is_some() || self.temperature.is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DomainWarning<T>> {
        self.pressure.iter().chain(self.temperature.iter())
    }
}

/// One interpolated value and the domain warnings raised producing it.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sample<T> {
    pub value: T,
    pub domain: DomainFlags<T>,
}

/// Every carried field at one point.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Record<T> {
    pub values: Vec<(FieldKind, T)>,
    pub domain: DomainFlags<T>,
}

impl<T: Copy> Record<T> {
    pub fn get(&self, kind: FieldKind) -> Option<T> {
        self.values.iter().find(|(k, _)| *k == kind).map(|(_, v)| *v)
    }
}

/// Per-axis result of a batch domain check; `true` means at least one
/// point lies outside the table along that axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OutOfDomain {
    pub pressure: bool,
    pub temperature: bool,
}

/// A field evaluated over a grid product, with the axes along which any
/// node was clamped to the table edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Regridded<T> {
    /// Shape `(t_new.len(), p_new.len())`
    pub values: Array2<T>,
    pub domain: OutOfDomain,
}

impl<T> Regridded<T> {
    /// Whether any node was clamped to the table edge.
    pub fn is_clipped(&self) -> bool {
        self.domain.pressure || self.domain.temperature
    }
}

/// Tabulated fields over a rectangular pressure-temperature grid.
///
/// Each field is stored as a 2-D array of shape
/// `(temperature.len(), pressure.len())`. The table is immutable once
/// built, so a shared reference can be queried from many threads.
///
/// Deserialized tables are checked for a consistent field list and grid
/// shapes before use.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(
        try_from = "FieldTableRaw<T>",
        bound(deserialize = "T: Float + serde::Deserialize<'de>")
    )
)]
pub struct FieldTable<T> {
    pressure: Axis<T>,
    temperature: Axis<T>,
    fields: Vec<FieldKind>,
    grids: Vec<Array2<T>>,
}

/// Unchecked wire form of a [`FieldTable`]. The axes validate themselves.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
#[serde(bound(deserialize = "T: Float + serde::Deserialize<'de>"))]
struct FieldTableRaw<T> {
    pressure: Axis<T>,
    temperature: Axis<T>,
    fields: Vec<FieldKind>,
    grids: Vec<Array2<T>>,
}

#[cfg(feature = "serde")]
impl<T: Float> TryFrom<FieldTableRaw<T>> for FieldTable<T> {
    type Error = Error;

    fn try_from(raw: FieldTableRaw<T>) -> Result<Self> {
        if raw.fields.is_empty() {
            return Err(Error::malformed("no fields given"));
        }
        if raw.fields.iter().duplicates().next().is_some() {
            return Err(Error::malformed("field listed more than once"));
        }
        if raw.grids.len() != raw.fields.len() {
            return Err(Error::malformed(format!(
                "{} grids for {} fields",
                raw.grids.len(),
                raw.fields.len()
            )));
        }
        let shape = (raw.temperature.len(), raw.pressure.len());
        if let Some((k, g)) = raw.grids.iter().find_position(|g| g.dim() != shape) {
            return Err(Error::malformed(format!(
                "grid for {} has shape {:?}, expected {shape:?}",
                raw.fields[k],
                g.dim()
            )));
        }
        Ok(Self {
            pressure: raw.pressure,
            temperature: raw.temperature,
            fields: raw.fields,
            grids: raw.grids,
        })
    }
}

impl<T: Float + fmt::Debug> FieldTable<T> {
    /// Build from full-width rows laid out as
    /// `[pressure, temperature, vp, vs, vp_ani, vs_ani, vphi, density, qs, t_sol]`.
    ///
    /// # Errors
    /// * See [`FieldTable::with_fields`]
    pub fn load<R: AsRef<[T]>>(rows: &[R]) -> Result<Self> {
        Self::with_fields(&FieldKind::ALL, rows)
    }

    /// Build from rows of `[pressure, temperature, fields[0], fields[1], ...]`.
    ///
    /// Rows must be grouped into one block per pressure, in increasing
    /// pressure order, each block listing every temperature in
    /// increasing order.
    ///
    /// # Errors
    /// * If `fields` is empty or names a field twice
    /// * If there are no rows, or any row has the wrong width
    /// * If any coordinate is non-finite
    /// * If the row count is not a multiple of the number of unique temperatures
    /// * If the rows do not cover the pressure-temperature grid in block order
    pub fn with_fields<R: AsRef<[T]>>(fields: &[FieldKind], rows: &[R]) -> Result<Self> {
        if fields.is_empty() {
            return Err(Error::malformed("no fields given"));
        }
        if fields.iter().duplicates().next().is_some() {
            return Err(Error::malformed("field listed more than once"));
        }
        if rows.is_empty() {
            return Err(Error::malformed("no rows"));
        }
        let width = 2 + fields.len();
        if let Some((i, r)) = rows.iter().find_position(|r| r.as_ref().len() != width) {
            return Err(Error::malformed(format!(
                "row {i} has {} columns, expected {width}",
                r.as_ref().len()
            )));
        }

        let pressure = Axis::from_samples(rows.iter().map(|r| r.as_ref()[0]))?;
        let temperature = Axis::from_samples(rows.iter().map(|r| r.as_ref()[1]))?;
        let (np, nt) = (pressure.len(), temperature.len());

        if rows.len() % nt != 0 {
            return Err(Error::malformed(format!(
                "{} rows is not a multiple of {nt} temperatures",
                rows.len()
            )));
        }
        if rows.len() != np * nt {
            return Err(Error::malformed(format!(
                "{} rows do not form a {np}x{nt} pressure-temperature grid",
                rows.len()
            )));
        }

        // Index arithmetic below relies on the block layout
        for (i, block) in rows.chunks(nt).enumerate() {
            for (j, row) in block.iter().enumerate() {
                let row = row.as_ref();
                if row[0] != pressure.values()[i] || row[1] != temperature.values()[j] {
                    return Err(Error::malformed(format!(
                        "row {} is out of pressure-block order",
                        i * nt + j
                    )));
                }
            }
        }

        let grids = (0..fields.len())
            .map(|k| Array2::from_shape_fn((nt, np), |(j, i)| rows[i * nt + j].as_ref()[2 + k]))
            .collect();

        debug!(pressures = np, temperatures = nt, fields = fields.len(), "lookup table built");

        Ok(Self {
            pressure,
            temperature,
            fields: fields.to_vec(),
            grids,
        })
    }

    #[inline]
    pub fn pressure(&self) -> &Axis<T> {
        &self.pressure
    }

    #[inline]
    pub fn temperature(&self) -> &Axis<T> {
        &self.temperature
    }

    /// Fields carried by this table, in column order.
    #[inline]
    pub fn fields(&self) -> &[FieldKind] {
        &self.fields
    }

    /// Number of samples; always `pressure().len() * temperature().len()`.
    pub fn n_samples(&self) -> usize {
        self.pressure.len() * self.temperature.len()
    }

    /// The stored grid for a field, shape `(temperature, pressure)`.
    ///
    /// # Errors
    /// * If the table was not built with `kind`
    pub fn field_grid(&self, kind: FieldKind) -> Result<ArrayView2<'_, T>> {
        self.fields
            .iter()
            .position(|k| *k == kind)
            .map(|i| self.grids[i].view())
            .ok_or(Error::MissingField(kind))
    }

    /// Case-insensitive lookup of a field grid by registry name.
    ///
    /// # Errors
    /// * If `name` is not a registered field, or the table does not carry it
    pub fn field(&self, name: &str) -> Result<ArrayView2<'_, T>> {
        self.field_grid(name.parse()?)
    }

    /// Bracket a point on both axes.
    ///
    /// # Errors
    /// * If either coordinate is non-finite
    pub fn locate(&self, p: T, t: T) -> Result<(Cell<T>, DomainFlags<T>)> {
        let pb = self.pressure.bounds(p)?;
        let tb = self.temperature.bounds(t)?;
        let cell = Cell::new(&self.pressure, &self.temperature, p, t, pb, tb);
        let domain = DomainFlags {
            pressure: DomainWarning::check(AxisName::Pressure, &self.pressure, pb, p),
            temperature: DomainWarning::check(AxisName::Temperature, &self.temperature, tb, t),
        };
        Ok((cell, domain))
    }

    /// Interpolate one field at `(p, t)`.
    ///
    /// Coordinates outside the table are clamped to the nearest edge and
    /// reported on the result; a warning is also logged.
    ///
    /// # Errors
    /// * If the table does not carry `kind`
    /// * If either coordinate is non-finite
    pub fn query_point(&self, kind: FieldKind, p: T, t: T) -> Result<Sample<T>> {
        let grid = self.field_grid(kind)?;
        let (cell, domain) = self.locate(p, t)?;
        for w in domain.iter() {
            warn!(
                field = %kind,
                axis = %w.axis,
                value = ?w.value,
                limit = ?w.limit,
                "query outside table domain, using edge value"
            );
        }
        Ok(Sample {
            value: cell.eval(grid),
            domain,
        })
    }

    /// Interpolate one field at index-paired points `(p[i], t[i])`.
    ///
    /// A single point is `query_points(kind, &[p], &[t])`, or use
    /// [`FieldTable::query_point`] directly.
    ///
    /// # Errors
    /// * If `p` and `t` differ in length
    /// * If the table does not carry `kind`
    /// * If any coordinate is non-finite
    pub fn query_points(&self, kind: FieldKind, p: &[T], t: &[T]) -> Result<Vec<Sample<T>>> {
        Error::check_len(p.len(), t.len())?;
        let grid = self.field_grid(kind)?;

        let out = p
            .iter()
            .zip(t)
            .map(|(&pi, &ti)| {
                let (cell, domain) = self.locate(pi, ti)?;
                Ok(Sample {
                    value: cell.eval(grid),
                    domain,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let clipped = out.iter().filter(|s| s.domain.is_clipped()).count();
        if clipped > 0 {
            warn!(field = %kind, clipped, total = out.len(), "points outside table domain, using edge values");
        }
        Ok(out)
    }

    /// Evaluate one field over the grid product `p_new x t_new`.
    ///
    /// The output has shape `(t_new.len(), p_new.len())`, matching the
    /// stored field grids, with element `[j, i]` at `(p_new[i], t_new[j])`.
    /// Coordinates outside the table are clamped to the nearest edge,
    /// and the clamped axes are flagged on the result.
    ///
    /// # Errors
    /// * If the table does not carry `kind`
    /// * If any coordinate is non-finite
    pub fn regrid(&self, kind: FieldKind, p_new: &[T], t_new: &[T]) -> Result<Regridded<T>> {
        let grid = self.field_grid(kind)?;

        // Each axis is bracketed once, not once per product point
        let p_brackets = p_new
            .iter()
            .map(|&p| self.pressure.bounds(p).map(|b| (p, b)))
            .collect::<Result<Vec<_>>>()?;
        let t_brackets = t_new
            .iter()
            .map(|&t| self.temperature.bounds(t).map(|b| (t, b)))
            .collect::<Result<Vec<_>>>()?;

        let domain = OutOfDomain {
            pressure: p_brackets.iter().any(|(_, b)| b.extrap.is_clipped()),
            temperature: t_brackets.iter().any(|(_, b)| b.extrap.is_clipped()),
        };
        if domain.pressure || domain.temperature {
            warn!(field = %kind, ?domain, "regrid extends outside table domain, using edge values");
        }

        let vals: Vec<T> = t_brackets
            .iter()
            .cartesian_product(p_brackets.iter())
            .map(|(&(t, tb), &(p, pb))| {
                Cell::new(&self.pressure, &self.temperature, p, t, pb, tb).eval(grid)
            })
            .collect();

        let found = vals.len();
        let values = Array2::from_shape_vec((t_new.len(), p_new.len()), vals).map_err(|_| {
            Error::InputShape {
                expected: t_new.len() * p_new.len(),
                found,
            }
        })?;
        Ok(Regridded { values, domain })
    }

    /// Regrid onto `n_p` x `n_t` evenly spaced nodes spanning the table.
    ///
    /// The nodes never leave the table, so the result is never clipped.
    ///
    /// # Errors
    /// * If the table does not carry `kind`
    /// * If either count is zero
    pub fn resample(&self, kind: FieldKind, n_p: usize, n_t: usize) -> Result<Regridded<T>> {
        if n_p == 0 || n_t == 0 {
            return Err(Error::EmptyGrid);
        }
        let p_new = linspace(self.pressure.min(), self.pressure.max(), n_p);
        let t_new = linspace(self.temperature.min(), self.temperature.max(), n_t);
        self.regrid(kind, &p_new, &t_new)
    }

    /// Interpolate every carried field at `(p, t)`, bracketing once.
    ///
    /// # Errors
    /// * If either coordinate is non-finite
    pub fn query_all(&self, p: T, t: T) -> Result<Record<T>> {
        let (cell, domain) = self.locate(p, t)?;
        for w in domain.iter() {
            warn!(
                axis = %w.axis,
                value = ?w.value,
                limit = ?w.limit,
                "query outside table domain, using edge value"
            );
        }
        let values = self
            .fields
            .iter()
            .zip(&self.grids)
            .map(|(&k, g)| (k, cell.eval(g.view())))
            .collect();
        Ok(Record { values, domain })
    }

    /// Check whether any of the points `(p[i], t[i])` fall outside the
    /// table by more than `atol` along each axis.
    ///
    /// # Errors
    /// * If `p` and `t` differ in length
    pub fn check_bounds(&self, p: &[T], t: &[T], atol: T) -> Result<OutOfDomain> {
        Error::check_len(p.len(), t.len())?;
        let outside = |axis: &Axis<T>, x: T| x < axis.min() - atol || x > axis.max() + atol;
        Ok(OutOfDomain {
            pressure: p.iter().any(|&x| outside(&self.pressure, x)),
            temperature: t.iter().any(|&x| outside(&self.temperature, x)),
        })
    }
}
