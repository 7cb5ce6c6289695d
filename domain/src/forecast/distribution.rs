//! Numeric distribution builder
//!
//! Turns a sparse percentile table into a CDF sampled on the platform grid.
//!
//! # Algorithm
//!
//! 1. Deduplicate by percentile (last write wins) and sort.
//! 2. Clamp values against the closed sides of the range.
//! 3. Raise each value to at least its predecessor.
//! 4. Fill a missing 10th/90th at the bounds and interior gaps by linear
//!    interpolation in value space.
//! 5. Interpolate linearly between the completed pairs, anchored at the
//!    bounds, and sample at every grid position.

use super::answer::{Cdf, CdfPoint, Percentile, PercentileTable};
use crate::core::error::DistributionError;
use crate::core::question::{NumericRange, QuestionKind};

/// Probability mass kept beyond an open bound.
pub const OPEN_BOUND_TAIL: f64 = 0.001;

/// Builds CDFs for one numeric or discrete question.
///
/// # Example
///
/// ```
/// use forecast_domain::{DistributionBuilder, NumericRange, Percentile, PercentileTable};
///
/// let range = NumericRange::closed(0.0, 100.0);
/// let builder = DistributionBuilder::new(range, 201);
/// let table = PercentileTable::from_pairs([(Percentile::P10, 10.0), (Percentile::P90, 90.0)]);
///
/// let (_, cdf) = builder.build(&table).unwrap();
/// assert_eq!(cdf.len(), 201);
/// assert_eq!(cdf.values()[0], 0.0);
/// assert_eq!(cdf.values()[200], 1.0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct DistributionBuilder {
    range: NumericRange,
    size: usize,
}

impl DistributionBuilder {
    pub fn new(range: NumericRange, size: usize) -> Self {
        Self { range, size }
    }

    /// Builder for a continuous question kind, `None` for binary and multiple choice
    pub fn for_kind(kind: &QuestionKind) -> Option<Self> {
        Some(Self::new(*kind.range()?, kind.cdf_size()?))
    }

    pub fn range(&self) -> &NumericRange {
        &self.range
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// x positions of the output CDF; empty below two points
    pub fn grid(&self) -> Vec<f64> {
        if self.size < 2 {
            return Vec::new();
        }
        let last = (self.size - 1) as f64;
        let span = self.range.upper - self.range.lower;
        (0..self.size)
            .map(|i| {
                if i + 1 == self.size {
                    self.range.upper
                } else if self.range.log_ratio().is_some() {
                    self.range.location_to_value(i as f64 / last)
                } else {
                    self.range.lower + span * i as f64 / last
                }
            })
            .collect()
    }

    /// Steps 1–4: complete, clamped, monotonic table with all six percentiles.
    pub fn complete_table(&self, table: &PercentileTable) -> Result<PercentileTable, DistributionError> {
        self.check_setup()?;

        let known: Vec<(Percentile, f64)> = table
            .dedup()
            .into_iter()
            .filter(|(_, v)| v.is_finite())
            .collect();
        if known.len() < 2 {
            return Err(DistributionError::InsufficientPercentiles { found: known.len() });
        }

        let mut repaired: Vec<(Percentile, f64)> = Vec::with_capacity(known.len());
        for (p, v) in known {
            let mut v = self.range.clamp(v);
            if let Some(&(_, prev)) = repaired.last()
                && v < prev
            {
                v = prev;
            }
            repaired.push((p, v));
        }

        // Endpoints; an open side may already lie beyond its bound
        if repaired[0].0 != Percentile::P10 {
            let v = self.range.lower.min(repaired[0].1);
            repaired.insert(0, (Percentile::P10, v));
        }
        if repaired[repaired.len() - 1].0 != Percentile::P90 {
            let v = self.range.upper.max(repaired[repaired.len() - 1].1);
            repaired.push((Percentile::P90, v));
        }

        let mut complete = PercentileTable::new();
        for p in Percentile::ALL {
            let value = match repaired.iter().find(|(q, _)| *q == p) {
                Some(&(_, v)) => v,
                None => interpolate_value(&repaired, p),
            };
            complete.push(p, value);
        }
        Ok(complete)
    }

    /// Build the sampled CDF; returns the completed table alongside it.
    pub fn build(&self, table: &PercentileTable) -> Result<(PercentileTable, Cdf), DistributionError> {
        let complete = self.complete_table(table)?;
        let knots = self.knots(&complete);

        let mut ys: Vec<f64> = self
            .grid()
            .iter()
            .map(|&x| interpolate_cdf(&knots, x).clamp(0.0, 1.0))
            .collect();

        let last = ys.len() - 1;
        ys[0] = if self.range.open_lower {
            ys[0].max(OPEN_BOUND_TAIL)
        } else {
            0.0
        };
        if !self.range.open_upper {
            ys[last] = 1.0;
        }
        for i in 1..ys.len() {
            if ys[i] < ys[i - 1] {
                ys[i] = ys[i - 1];
            }
        }
        if self.range.open_upper {
            let cap = 1.0 - OPEN_BOUND_TAIL;
            for y in &mut ys {
                *y = y.min(cap);
            }
        }

        let points = self
            .grid()
            .into_iter()
            .zip(ys)
            .map(|(x, y)| CdfPoint { x, y })
            .collect();
        Ok((complete, Cdf::from_points(points)))
    }

    fn check_setup(&self) -> Result<(), DistributionError> {
        if !self.range.is_valid() {
            return Err(DistributionError::InvalidBounds {
                lower: self.range.lower,
                upper: self.range.upper,
            });
        }
        if self.size < 2 {
            return Err(DistributionError::InvalidResolution(self.size));
        }
        Ok(())
    }

    /// (value, cumulative probability) knots including the bound anchors
    fn knots(&self, complete: &PercentileTable) -> Vec<(f64, f64)> {
        let lower_tail = if self.range.open_lower { OPEN_BOUND_TAIL } else { 0.0 };
        let upper_tail = if self.range.open_upper {
            1.0 - OPEN_BOUND_TAIL
        } else {
            1.0
        };

        let inner: Vec<(f64, f64)> = complete
            .entries()
            .iter()
            .map(|(p, v)| (*v, p.fraction()))
            .collect();

        let mut knots = Vec::with_capacity(inner.len() + 2);
        if inner.first().is_some_and(|&(v, _)| v > self.range.lower) {
            knots.push((self.range.lower, lower_tail));
        }
        knots.extend(inner.iter().copied());
        if inner.last().is_some_and(|&(v, _)| v < self.range.upper) {
            knots.push((self.range.upper, upper_tail));
        }
        knots
    }
}

/// Value at `p` between its nearest known neighbours
fn interpolate_value(known: &[(Percentile, f64)], p: Percentile) -> f64 {
    let below = known.iter().rev().find(|(q, _)| *q < p);
    let above = known.iter().find(|(q, _)| *q > p);
    match (below, above) {
        (Some(&(pa, va)), Some(&(pb, vb))) => {
            let t = (p.fraction() - pa.fraction()) / (pb.fraction() - pa.fraction());
            va + (vb - va) * t
        }
        (Some(&(_, v)), None) | (None, Some(&(_, v))) => v,
        (None, None) => 0.0,
    }
}

/// Piecewise-linear CDF through knots sorted by value.
///
/// Repeated values form a jump; the highest probability at the jump wins.
fn interpolate_cdf(knots: &[(f64, f64)], x: f64) -> f64 {
    let idx = knots.partition_point(|&(kx, _)| kx <= x);
    if idx == 0 {
        return knots.first().map_or(0.0, |&(_, y)| y);
    }
    let (x0, y0) = knots[idx - 1];
    match knots.get(idx) {
        Some(&(x1, y1)) => y0 + (y1 - y0) * (x - x0) / (x1 - x0),
        None => y0,
    }
}
