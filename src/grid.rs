//! Sorted coordinate axes and bracketing of query values.
//!
//! An [`Axis`] holds the strictly increasing unique coordinates along
//! one table dimension. [`Axis::bounds`] finds the pair of axis nodes
//! enclosing a query value, collapsing to a single edge node when the
//! value falls outside the sampled range.

use num_traits::Float;

use crate::error::{Error, Result};

/// Where a query value sits relative to an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Extrap {
    Inside,
    OutsideLow,
    OutsideHigh,
}

impl Extrap {
    /// Whether the value was clamped to an axis edge.
    #[inline]
    pub fn is_clipped(self) -> bool {
        !matches!(self, Extrap::Inside)
    }
}

/// Indices of the axis nodes bracketing a query value.
///
/// `low == high` for a degenerate bracket, which happens when the value
/// was clipped to an edge, or when it lands exactly on the first node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub low: usize,
    pub high: usize,
    pub extrap: Extrap,
}

impl Bounds {
    #[inline]
    fn degenerate(i: usize, extrap: Extrap) -> Self {
        Self {
            low: i,
            high: i,
            extrap,
        }
    }

    /// Whether the bracket has zero extent.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.low == self.high
    }
}

/// Strictly increasing, finite coordinate values along one dimension.
///
/// Deserialized axes are checked the same way as [`Axis::new`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(
        try_from = "AxisRaw<T>",
        bound(deserialize = "T: Float + serde::Deserialize<'de>")
    )
)]
pub struct Axis<T> {
    vals: Vec<T>,
}

/// Unchecked wire form of an [`Axis`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct AxisRaw<T> {
    vals: Vec<T>,
}

#[cfg(feature = "serde")]
impl<T: Float> TryFrom<AxisRaw<T>> for Axis<T> {
    type Error = Error;

    fn try_from(raw: AxisRaw<T>) -> Result<Self> {
        Self::new(raw.vals)
    }
}

impl<T: Float> Axis<T> {
    /// Wrap values that are already sorted and unique.
    ///
    /// # Errors
    /// * If `vals` is empty
    /// * If any value is not finite
    /// * If the values are not strictly increasing
    pub fn new(vals: Vec<T>) -> Result<Self> {
        if vals.is_empty() {
            return Err(Error::malformed("axis has no values"));
        }
        if vals.iter().any(|v| !v.is_finite()) {
            return Err(Error::malformed("axis contains non-finite values"));
        }
        if vals.windows(2).any(|w| w[1] <= w[0]) {
            return Err(Error::malformed("axis values are not strictly increasing"));
        }
        Ok(Self { vals })
    }

    /// Collect the sorted unique values of a raw coordinate column.
    ///
    /// # Errors
    /// * If the column is empty or contains non-finite values
    pub fn from_samples(samples: impl IntoIterator<Item = T>) -> Result<Self> {
        let mut vals: Vec<T> = samples.into_iter().collect();
        if vals.iter().any(|v| !v.is_finite()) {
            return Err(Error::malformed("coordinate column contains non-finite values"));
        }
        // Total order holds once non-finite values are excluded
        vals.sort_by(|a, b| a.partial_cmp(b).unwrap_or(core::cmp::Ordering::Equal));
        vals.dedup();
        Self::new(vals)
    }

    #[inline]
    pub fn values(&self) -> &[T] {
        &self.vals
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vals.len()
    }

    /// Always false for a constructed axis.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vals.is_empty()
    }

    #[inline]
    pub fn min(&self) -> T {
        self.vals[0]
    }

    #[inline]
    pub fn max(&self) -> T {
        self.vals[self.vals.len() - 1]
    }

    /// Bracket `v` between two axis nodes.
    ///
    /// * Below the first node: both bounds are the first node, flagged `OutsideLow`.
    /// * Above the last node: both bounds are the last node, flagged `OutsideHigh`.
    /// * Otherwise the node nearest `v` is found. A nearest node below `v`
    ///   becomes the low bound and its successor the high bound; a nearest
    ///   node at or above `v` becomes the high bound and its predecessor
    ///   the low bound. An exact match therefore takes the high-bound
    ///   branch. An exact match on the first node has no predecessor and
    ///   yields a degenerate bracket on that node.
    ///
    /// # Errors
    /// * If `v` is NaN or infinite
    #[inline]
    pub fn bounds(&self, v: T) -> Result<Bounds> {
        if !v.is_finite() {
            return Err(Error::NonFiniteQuery);
        }
        let n = self.vals.len();
        if v < self.min() {
            return Ok(Bounds::degenerate(0, Extrap::OutsideLow));
        }
        if v > self.max() {
            return Ok(Bounds::degenerate(n - 1, Extrap::OutsideHigh));
        }

        // First node at or above `v`; exists because `v <= max`.
        let above = self.vals.partition_point(|x| *x < v);
        if above == 0 {
            return Ok(Bounds::degenerate(0, Extrap::Inside));
        }

        // Nearest node: the lower neighbour wins ties, matching a
        // first-occurrence minimum search over distances.
        let below = above - 1;
        let nearest = if v - self.vals[below] <= self.vals[above] - v {
            below
        } else {
            above
        };

        let (low, high) = if self.vals[nearest] < v {
            (nearest, nearest + 1)
        } else {
            (nearest - 1, nearest)
        };

        tracing::trace!(low, high, "bracketed axis value");
        Ok(Bounds {
            low,
            high,
            extrap: Extrap::Inside,
        })
    }
}
