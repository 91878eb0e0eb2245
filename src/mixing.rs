//! Mechanical mixtures of compositions and interpolation across a
//! composition parameter.
//!
//! Mixing works on values already interpolated to a common
//! pressure-temperature point. Fractions are not normalized or checked
//! to sum to one.
use core::fmt;

use num_traits::Float;

use crate::error::{Error, Result};
use crate::field::FieldKind;
use crate::table::{DomainFlags, FieldTable};

/// Harmonic mean of `values` weighted by `fractions`, `1 / sum(f_i / v_i)`.
///
/// # Errors
/// * If `values` and `fractions` differ in length
/// * If any value is zero
/// * If the result is not finite, including for empty inputs
pub fn harmonic_mix<T: Float>(values: &[T], fractions: &[T]) -> Result<T> {
    Error::check_len(values.len(), fractions.len())?;
    let mut acc = T::zero();
    for (index, (&v, &f)) in values.iter().zip(fractions).enumerate() {
        if v == T::zero() {
            return Err(Error::DivisionByZero { index });
        }
        acc = acc + f / v;
    }
    let mixed = acc.recip();
    if !mixed.is_finite() {
        return Err(Error::NonFinite);
    }
    Ok(mixed)
}

/// Elementwise [`harmonic_mix`] over equal-length component arrays.
///
/// `values[c][i]` is component `c` at point `i`; `out[i]` receives the mixture.
///
/// # Errors
/// * If `values` and `fractions` differ in length
/// * If any component array differs in length from `out`
/// * If any value is zero, or any mixture is not finite
pub fn harmonic_mix_slices<T: Float>(values: &[&[T]], fractions: &[T], out: &mut [T]) -> Result<()> {
    Error::check_len(values.len(), fractions.len())?;
    for comp in values {
        Error::check_len(out.len(), comp.len())?;
    }

    let mut point = vec![T::zero(); values.len()];
    for i in 0..out.len() {
        (0..values.len()).for_each(|c| point[c] = values[c][i]);
        out[i] = harmonic_mix(&point, fractions)?;
    }
    Ok(())
}

/// Elementwise harmonic mixing, allocating a new Vec for the output.
pub fn harmonic_mix_alloc<T: Float>(values: &[&[T]], fractions: &[T]) -> Result<Vec<T>> {
    let n = values.first().map_or(0, |v| v.len());
    let mut out = vec![T::zero(); n];
    harmonic_mix_slices(values, fractions, &mut out)?;
    Ok(out)
}

/// Linear interpolation between value `a` at composition `c_a` and value
/// `b` at composition `c_b`, evaluated at composition `c`.
///
/// `c` outside `[c_a, c_b]` extrapolates without clamping.
///
/// # Errors
/// * If the result is not finite, e.g. when `c_a == c_b`
#[inline]
pub fn interp_composition<T: Float>(a: T, b: T, c_a: T, c_b: T, c: T) -> Result<T> {
    let w = (c - c_a) / (c_b - c_a);
    let v = a + (b - a) * w;
    if !v.is_finite() {
        return Err(Error::NonFinite);
    }
    Ok(v)
}

/// Elementwise [`interp_composition`] over equal-length arrays.
///
/// # Errors
/// * If `a`, `b` and `out` differ in length
/// * If any result is not finite
pub fn interp_composition_slice<T: Float>(
    a: &[T],
    b: &[T],
    c_a: T,
    c_b: T,
    c: T,
    out: &mut [T],
) -> Result<()> {
    Error::check_len(a.len(), b.len())?;
    Error::check_len(a.len(), out.len())?;
    for i in 0..out.len() {
        out[i] = interp_composition(a[i], b[i], c_a, c_b, c)?;
    }
    Ok(())
}

/// Elementwise composition interpolation, allocating a new Vec for the output.
pub fn interp_composition_alloc<T: Float>(a: &[T], b: &[T], c_a: T, c_b: T, c: T) -> Result<Vec<T>> {
    let mut out = vec![T::zero(); a.len()];
    interp_composition_slice(a, b, c_a, c_b, c, &mut out)?;
    Ok(out)
}

/// A mixed value and the domain flags raised by each component table,
/// in component order.
#[derive(Debug, Clone, PartialEq)]
pub struct MixedSample<T> {
    pub value: T,
    pub domain: Vec<DomainFlags<T>>,
}

impl<T> MixedSample<T> {
    pub fn is_clipped(&self) -> bool {
        self.domain.iter().any(DomainFlags::is_clipped)
    }
}

/// A mechanical mixture of compositions, each given by its own lookup
/// table and a volume or mass fraction.
#[derive(Debug, Clone)]
pub struct Mixture<'a, T> {
    components: Vec<(&'a FieldTable<T>, T)>,
}

impl<T> Default for Mixture<'_, T> {
    fn default() -> Self {
        Self {
            components: Vec::new(),
        }
    }
}

impl<'a, T: Float + fmt::Debug> Mixture<'a, T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a component.
    pub fn with(mut self, table: &'a FieldTable<T>, fraction: T) -> Self {
        self.components.push((table, fraction));
        self
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Query `kind` in every component at `(p, t)` and mix harmonically.
    ///
    /// # Errors
    /// * If any component table does not carry `kind`
    /// * If either coordinate is non-finite
    /// * See [`harmonic_mix`]
    pub fn query_point(&self, kind: FieldKind, p: T, t: T) -> Result<MixedSample<T>> {
        let mut values = Vec::with_capacity(self.components.len());
        let mut fractions = Vec::with_capacity(self.components.len());
        let mut domain = Vec::with_capacity(self.components.len());
        for (table, fraction) in &self.components {
            let s = table.query_point(kind, p, t)?;
            values.push(s.value);
            fractions.push(*fraction);
            domain.push(s.domain);
        }
        Ok(MixedSample {
            value: harmonic_mix(&values, &fractions)?,
            domain,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::testing::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_harmonic_mix_identity() {
        assert_relative_eq!(harmonic_mix(&[4.5], &[1.0]).unwrap(), 4.5, epsilon = 1e-12);
        assert_relative_eq!(harmonic_mix(&[4.5, 4.5], &[0.5, 0.5]).unwrap(), 4.5, epsilon = 1e-12);
    }

    #[test]
    fn test_harmonic_mix_three_components() {
        let v = harmonic_mix(&[2.0, 4.0, 8.0], &[0.5, 0.25, 0.25]).unwrap();
        // 1 / (0.25 + 0.0625 + 0.03125)
        assert_relative_eq!(v, 1.0 / 0.34375, epsilon = 1e-12);
    }

    /// Fractions are used as given, without normalization.
    #[test]
    fn test_harmonic_mix_unnormalized() {
        assert_relative_eq!(harmonic_mix(&[3.0, 3.0], &[1.0, 1.0]).unwrap(), 1.5, epsilon = 1e-12);
    }

    #[test]
    fn test_harmonic_mix_errors() {
        assert_eq!(
            harmonic_mix(&[1.0, 0.0], &[0.5, 0.5]),
            Err(Error::DivisionByZero { index: 1 })
        );
        assert_eq!(
            harmonic_mix(&[1.0, 2.0], &[1.0]),
            Err(Error::InputShape {
                expected: 2,
                found: 1
            })
        );
        assert_eq!(harmonic_mix::<f64>(&[], &[]), Err(Error::NonFinite));
        assert_eq!(harmonic_mix(&[1.0], &[0.0]), Err(Error::NonFinite));
    }

    #[test]
    fn test_harmonic_mix_slices() {
        let bas = [2.0, 4.0];
        let lhz = [4.0, 4.0];
        let out = harmonic_mix_alloc(&[&bas[..], &lhz[..]], &[0.5, 0.5]).unwrap();
        assert_relative_eq!(out[0], 1.0 / 0.375, epsilon = 1e-12);
        assert_relative_eq!(out[1], 4.0, epsilon = 1e-12);

        let short = [1.0];
        assert!(harmonic_mix_alloc(&[&bas[..], &short[..]], &[0.5, 0.5]).is_err());
    }

    #[test]
    fn test_interp_composition_endpoints() {
        assert_eq!(interp_composition(3.0, 5.0, 0.0, 1.0, 0.0).unwrap(), 3.0);
        assert_eq!(interp_composition(3.0, 5.0, 0.0, 1.0, 1.0).unwrap(), 5.0);
        assert_relative_eq!(interp_composition(3.0, 5.0, 0.0, 1.0, 0.25).unwrap(), 3.5, epsilon = 1e-12);
    }

    #[test]
    fn test_interp_composition_extrapolates() {
        assert_relative_eq!(interp_composition(3.0, 5.0, 0.0, 1.0, 2.0).unwrap(), 7.0, epsilon = 1e-12);
        assert_relative_eq!(interp_composition(3.0, 5.0, 0.0, 1.0, -1.0).unwrap(), 1.0, epsilon = 1e-12);
        // Anchors in either order
        assert_relative_eq!(interp_composition(5.0, 3.0, 1.0, 0.0, 0.25).unwrap(), 3.5, epsilon = 1e-12);
    }

    #[test]
    fn test_interp_composition_degenerate_anchors() {
        assert_eq!(interp_composition(3.0, 5.0, 0.5, 0.5, 0.7), Err(Error::NonFinite));
    }

    #[test]
    fn test_interp_composition_slice() {
        let a = [1.0, 2.0, 3.0];
        let b = [3.0, 4.0, 5.0];
        let out = interp_composition_alloc(&a, &b, 0.0, 1.0, 0.5).unwrap();
        assert_eq!(out, vec![2.0, 3.0, 4.0]);
        assert_eq!(interp_composition_alloc(&a, &b, 0.0, 1.0, 0.0).unwrap(), a.to_vec());

        let mut short = [0.0; 2];
        assert!(interp_composition_slice(&a, &b, 0.0, 1.0, 0.5, &mut short).is_err());
    }

    #[test]
    fn test_mixture_of_tables() {
        let table = scenario_table();
        let single = Mixture::new().with(&table, 1.0);
        let s = single.query_point(FieldKind::Vs, 1.5, 150.0).unwrap();
        let direct = table.query_point(FieldKind::Vs, 1.5, 150.0).unwrap();
        assert_relative_eq!(s.value, direct.value, epsilon = 1e-12);

        let even = Mixture::new().with(&table, 0.5).with(&table, 0.5);
        assert_eq!(even.len(), 2);
        let s = even.query_point(FieldKind::Vs, 1.5, 150.0).unwrap();
        assert_relative_eq!(s.value, direct.value, epsilon = 1e-12);
        assert!(!s.is_clipped());

        let s = even.query_point(FieldKind::Vs, 9.0, 150.0).unwrap();
        assert!(s.is_clipped());
        assert!(s.domain.iter().all(|d| d.pressure.is_some()));
    }

    #[test]
    fn test_empty_mixture() {
        let m: Mixture<'_, f64> = Mixture::new();
        assert!(m.is_empty());
        assert_eq!(m.query_point(FieldKind::Vp, 1.0, 100.0), Err(Error::NonFinite));
    }
}
