//! Null Model Construction
//!
//! Turns an observed cumulative distribution of event phases into a continuous,
//! invertible CDF on [0, 1]. The CDF is a plain value: sorted control points
//! joined by straight lines, always anchored at (0, 0) and (1, 1).

use crate::SUPPORT_TOLERANCE;
use crate::distribution::CumulativeDistribution;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while building or evaluating a null model
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NullModelError {
    #[error("Degenerate null model: {distinct} distinct phase point(s), need at least 2")]
    DegenerateNullModel { distinct: usize },

    #[error("Length mismatch: {phases} phases but {cumulative} cumulative values")]
    LengthMismatch { phases: usize, cumulative: usize },

    #[error("Non-finite control point at index {index}")]
    NonFiniteControlPoint { index: usize },

    #[error("Cumulative value {value} at index {index} is outside [0, 1]")]
    CumulativeOutOfRange { index: usize, value: f64 },

    #[error("Cumulative values decrease at phase {phase}")]
    NonMonotonic { phase: f64 },

    #[error("Phase {0} is outside the support [0, 1]")]
    OutOfSupport(f64),

    #[error("Invalid probability: {0} (must be between 0 and 1)")]
    InvalidProbability(f64),

    #[error("Reference coverage is empty: no reference phases fall in [0, 1]")]
    EmptyReference,

    #[error("Invalid folding period: {0}")]
    InvalidPeriod(f64),
}

/// Piecewise-linear null CDF over phase
///
/// Invariants: `phases` is strictly increasing from 0.0 to 1.0, `cumulative`
/// is non-decreasing from 0.0 to 1.0, and both have the same length (>= 2).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ControlPoints")]
pub struct NullCdf {
    phases: Vec<f64>,
    cumulative: Vec<f64>,
}

/// Unvalidated wire form of a [`NullCdf`]
#[derive(Deserialize)]
struct ControlPoints {
    phases: Vec<f64>,
    cumulative: Vec<f64>,
}

impl TryFrom<ControlPoints> for NullCdf {
    type Error = NullModelError;

    fn try_from(points: ControlPoints) -> Result<Self, Self::Error> {
        NullCdf::new(&points.phases, &points.cumulative)
    }
}

impl NullCdf {
    /// Build a null CDF from phases and their cumulative values
    ///
    /// Points are sorted by phase; tied phases keep the larger cumulative value.
    /// Points at phase 0 or 1 are replaced by the (0, 0) and (1, 1) anchors.
    pub fn new(phases: &[f64], cumulative: &[f64]) -> Result<Self, NullModelError> {
        if phases.len() != cumulative.len() {
            return Err(NullModelError::LengthMismatch {
                phases: phases.len(),
                cumulative: cumulative.len(),
            });
        }

        for (index, (&p, &c)) in phases.iter().zip(cumulative).enumerate() {
            if !p.is_finite() || !c.is_finite() {
                return Err(NullModelError::NonFiniteControlPoint { index });
            }
            if !(0.0..=1.0).contains(&p) {
                return Err(NullModelError::OutOfSupport(p));
            }
            if !(0.0..=1.0).contains(&c) {
                return Err(NullModelError::CumulativeOutOfRange { index, value: c });
            }
        }

        let mut points: Vec<(f64, f64)> = phases
            .iter()
            .copied()
            .zip(cumulative.iter().copied())
            .collect();
        points.sort_by(|a, b| a.0.total_cmp(&b.0));

        // Merge ties, keeping the larger cumulative value
        let mut merged: Vec<(f64, f64)> = Vec::with_capacity(points.len());
        for (p, c) in points {
            match merged.last_mut() {
                Some(last) if last.0 == p => last.1 = last.1.max(c),
                _ => merged.push((p, c)),
            }
        }

        if merged.len() < 2 {
            return Err(NullModelError::DegenerateNullModel {
                distinct: merged.len(),
            });
        }

        for pair in merged.windows(2) {
            if pair[1].1 < pair[0].1 {
                return Err(NullModelError::NonMonotonic { phase: pair[1].0 });
            }
        }

        let mut knots_x = Vec::with_capacity(merged.len() + 2);
        let mut knots_y = Vec::with_capacity(merged.len() + 2);
        knots_x.push(0.0);
        knots_y.push(0.0);
        for (p, c) in merged.into_iter().filter(|&(p, _)| p > 0.0 && p < 1.0) {
            knots_x.push(p);
            knots_y.push(c);
        }
        knots_x.push(1.0);
        knots_y.push(1.0);

        Ok(Self {
            phases: knots_x,
            cumulative: knots_y,
        })
    }

    /// Constant event rate: F(x) = x
    pub fn uniform() -> Self {
        Self {
            phases: vec![0.0, 1.0],
            cumulative: vec![0.0, 1.0],
        }
    }

    /// Build the null CDF from how a reference process covers the phase interval
    ///
    /// The sorted event phases, bracketed by 0 and 1, become bin edges. Reference
    /// phases (e.g. observing time stamps folded on the period) are histogrammed
    /// into those bins, and the normalised cumulative histogram gives the
    /// cumulative value at each edge. Bins are half-open except the last, which
    /// is closed; reference phases outside [0, 1] are ignored.
    pub fn from_reference_coverage(
        event_phases: &[f64],
        reference_phases: &[f64],
    ) -> Result<Self, NullModelError> {
        if event_phases.is_empty() {
            return Err(NullModelError::DegenerateNullModel { distinct: 0 });
        }

        let mut events = Vec::with_capacity(event_phases.len());
        for (index, &p) in event_phases.iter().enumerate() {
            if !p.is_finite() {
                return Err(NullModelError::NonFiniteControlPoint { index });
            }
            if !(0.0..=1.0).contains(&p) {
                return Err(NullModelError::OutOfSupport(p));
            }
            events.push(p);
        }
        events.sort_by(f64::total_cmp);

        let mut edges = Vec::with_capacity(events.len() + 2);
        edges.push(0.0);
        edges.extend_from_slice(&events);
        edges.push(1.0);

        let bins = edges.len() - 1;
        let mut counts = vec![0u64; bins];
        for &r in reference_phases {
            if !(0.0..=1.0).contains(&r) {
                continue;
            }
            let bin = (edges.partition_point(|&e| e <= r) - 1).min(bins - 1);
            counts[bin] += 1;
        }

        let total: u64 = counts.iter().sum();
        if total == 0 {
            return Err(NullModelError::EmptyReference);
        }

        let mut cumulative = Vec::with_capacity(edges.len());
        cumulative.push(0.0);
        let mut running = 0u64;
        for count in counts {
            running += count;
            cumulative.push(running as f64 / total as f64);
        }

        Self::new(&edges, &cumulative)
    }

    /// Evaluate F(x)
    ///
    /// Evaluations within [`SUPPORT_TOLERANCE`] outside [0, 1] extrapolate the
    /// edge segment and are clamped into [0, 1]; anything further out is rejected.
    pub fn evaluate(&self, x: f64) -> Result<f64, NullModelError> {
        if x.is_nan() || x < -SUPPORT_TOLERANCE || x > 1.0 + SUPPORT_TOLERANCE {
            return Err(NullModelError::OutOfSupport(x));
        }

        let seg = self.segment(x);
        let (x0, x1) = (self.phases[seg], self.phases[seg + 1]);
        let (y0, y1) = (self.cumulative[seg], self.cumulative[seg + 1]);

        let t = (x - x0) / (x1 - x0);
        let y = y0 * (1.0 - t) + y1 * t;
        Ok(y.clamp(0.0, 1.0))
    }

    /// Probability density dF/dx: the slope of the segment containing `x`
    ///
    /// At an interior knot the slope of the segment to the right is returned.
    pub fn density(&self, x: f64) -> Result<f64, NullModelError> {
        if x.is_nan() || x < -SUPPORT_TOLERANCE || x > 1.0 + SUPPORT_TOLERANCE {
            return Err(NullModelError::OutOfSupport(x));
        }

        let seg = self.segment(x);
        let dx = self.phases[seg + 1] - self.phases[seg];
        let dy = self.cumulative[seg + 1] - self.cumulative[seg];
        Ok(dy / dx)
    }

    /// Exact inverse: the smallest phase x with F(x) = p
    pub fn quantile(&self, p: f64) -> Result<f64, NullModelError> {
        if !(0.0..=1.0).contains(&p) {
            return Err(NullModelError::InvalidProbability(p));
        }

        let k = self.cumulative.partition_point(|&c| c < p);
        if k == 0 {
            return Ok(self.phases[0]);
        }

        // cumulative[k - 1] < p <= cumulative[k], so the segment is not flat
        let (x0, x1) = (self.phases[k - 1], self.phases[k]);
        let (y0, y1) = (self.cumulative[k - 1], self.cumulative[k]);
        let t = (p - y0) / (y1 - y0);
        Ok((x0 * (1.0 - t) + x1 * t).clamp(0.0, 1.0))
    }

    /// Knot phases, including the 0 and 1 anchors
    pub fn phases(&self) -> &[f64] {
        &self.phases
    }

    /// Cumulative values at each knot
    pub fn cumulative(&self) -> &[f64] {
        &self.cumulative
    }

    /// Iterate over (phase, cumulative) control points
    pub fn control_points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.phases.iter().copied().zip(self.cumulative.iter().copied())
    }

    /// Number of knots, including the anchors
    pub fn len(&self) -> usize {
        self.phases.len()
    }

    /// Always false: a valid null CDF has at least the two anchors
    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    /// Index of the segment used to evaluate `x`, clamped to the edge segments
    fn segment(&self, x: f64) -> usize {
        let idx = self.phases.partition_point(|&p| p <= x);
        idx.saturating_sub(1).min(self.phases.len() - 2)
    }
}

impl CumulativeDistribution for NullCdf {
    fn cdf(&self, x: f64) -> Result<f64, NullModelError> {
        self.evaluate(x)
    }

    fn quantile(&self, p: f64) -> Result<f64, NullModelError> {
        NullCdf::quantile(self, p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_cdf() -> NullCdf {
        NullCdf::new(&[0.0, 0.2, 0.5, 0.8, 1.0], &[0.0, 0.3, 0.6, 0.9, 1.0]).unwrap()
    }

    #[test]
    fn test_anchors() {
        let f = scenario_cdf();
        assert_eq!(f.evaluate(0.0).unwrap(), 0.0);
        assert_eq!(f.evaluate(1.0).unwrap(), 1.0);
        assert_eq!(f.len(), 5);
    }

    #[test]
    fn test_anchors_added_for_interior_points() {
        let f = NullCdf::new(&[0.25, 0.75], &[0.4, 0.6]).unwrap();
        assert_eq!(f.phases(), &[0.0, 0.25, 0.75, 1.0]);
        assert_eq!(f.cumulative(), &[0.0, 0.4, 0.6, 1.0]);
    }

    #[test]
    fn test_interpolation() {
        let f = scenario_cdf();
        assert!((f.evaluate(0.1).unwrap() - 0.15).abs() < 1e-12);
        assert!((f.evaluate(0.35).unwrap() - 0.45).abs() < 1e-12);
        assert!((f.evaluate(0.9).unwrap() - 0.95).abs() < 1e-12);
        assert_eq!(f.evaluate(0.2).unwrap(), 0.3);
    }

    #[test]
    fn test_unsorted_input() {
        let f = NullCdf::new(&[0.8, 0.2, 0.5], &[0.9, 0.3, 0.6]).unwrap();
        assert_eq!(f, scenario_cdf());
    }

    #[test]
    fn test_ties_keep_larger_cumulative() {
        let f = NullCdf::new(&[0.3, 0.3, 0.6], &[0.2, 0.4, 0.7]).unwrap();
        assert_eq!(f.phases(), &[0.0, 0.3, 0.6, 1.0]);
        assert_eq!(f.cumulative(), &[0.0, 0.4, 0.7, 1.0]);
    }

    #[test]
    fn test_degenerate() {
        assert!(matches!(
            NullCdf::new(&[0.5], &[0.5]),
            Err(NullModelError::DegenerateNullModel { distinct: 1 })
        ));
        assert!(matches!(
            NullCdf::new(&[0.5, 0.5], &[0.4, 0.5]),
            Err(NullModelError::DegenerateNullModel { distinct: 1 })
        ));
        assert!(matches!(
            NullCdf::new(&[], &[]),
            Err(NullModelError::DegenerateNullModel { distinct: 0 })
        ));
    }

    #[test]
    fn test_length_mismatch() {
        assert!(matches!(
            NullCdf::new(&[0.1, 0.2], &[0.5]),
            Err(NullModelError::LengthMismatch {
                phases: 2,
                cumulative: 1
            })
        ));
    }

    #[test]
    fn test_invalid_points() {
        assert!(matches!(
            NullCdf::new(&[0.1, f64::NAN], &[0.1, 0.2]),
            Err(NullModelError::NonFiniteControlPoint { index: 1 })
        ));
        assert!(matches!(
            NullCdf::new(&[0.1, 1.5], &[0.1, 0.2]),
            Err(NullModelError::OutOfSupport(_))
        ));
        assert!(matches!(
            NullCdf::new(&[0.1, 0.5], &[0.1, 1.2]),
            Err(NullModelError::CumulativeOutOfRange { index: 1, .. })
        ));
        assert!(matches!(
            NullCdf::new(&[0.1, 0.5], &[0.6, 0.2]),
            Err(NullModelError::NonMonotonic { .. })
        ));
    }

    #[test]
    fn test_rejects_evaluation_outside_support() {
        let f = scenario_cdf();
        assert!(matches!(f.evaluate(1.1), Err(NullModelError::OutOfSupport(_))));
        assert!(f.evaluate(-0.01).is_err());
        assert!(f.evaluate(f64::NAN).is_err());
    }

    #[test]
    fn test_rounding_extrapolation_is_clamped() {
        let f = scenario_cdf();
        assert_eq!(f.evaluate(-1e-12).unwrap(), 0.0);
        assert_eq!(f.evaluate(1.0 + 1e-12).unwrap(), 1.0);
    }

    #[test]
    fn test_density() {
        let f = scenario_cdf();
        assert!((f.density(0.1).unwrap() - 1.5).abs() < 1e-12);
        assert!((f.density(0.6).unwrap() - 1.0).abs() < 1e-12);
        assert!((f.density(0.95).unwrap() - 0.5).abs() < 1e-12);
        // Right-hand segment at a knot
        assert!((f.density(0.8).unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_quantile_inverts_evaluate() {
        let f = scenario_cdf();
        for &x in &[0.05, 0.2, 0.33, 0.5, 0.71, 0.99] {
            let p = f.evaluate(x).unwrap();
            let back = f.quantile(p).unwrap();
            assert!((back - x).abs() < 1e-12, "x={x} p={p} back={back}");
        }
        assert_eq!(f.quantile(0.0).unwrap(), 0.0);
        assert_eq!(f.quantile(1.0).unwrap(), 1.0);
    }

    #[test]
    fn test_quantile_on_flat_segment_is_leftmost() {
        let f = NullCdf::new(&[0.4, 0.6], &[0.5, 0.5]).unwrap();
        assert!((f.quantile(0.5).unwrap() - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_quantile_rejects_bad_probability() {
        let f = scenario_cdf();
        assert!(matches!(
            f.quantile(-0.1),
            Err(NullModelError::InvalidProbability(_))
        ));
    }

    #[test]
    fn test_reference_coverage_uniform() {
        // Evenly spread reference coverage reproduces F(x) ~= x at the event phases
        let reference: Vec<f64> = (0..10_000).map(|i| (i as f64 + 0.5) / 10_000.0).collect();
        let f = NullCdf::from_reference_coverage(&[0.5, 0.25], &reference).unwrap();

        assert_eq!(f.phases(), &[0.0, 0.25, 0.5, 1.0]);
        assert!((f.evaluate(0.25).unwrap() - 0.25).abs() < 1e-3);
        assert!((f.evaluate(0.5).unwrap() - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_reference_coverage_bins() {
        // Bins: [0, 0.5) holds 1 point, [0.5, 1] holds 3 (including 1.0)
        let f = NullCdf::from_reference_coverage(&[0.5], &[0.1, 0.5, 0.7, 1.0, 1.5]).unwrap();
        assert_eq!(f.cumulative(), &[0.0, 0.25, 1.0]);
    }

    #[test]
    fn test_reference_coverage_errors() {
        assert!(matches!(
            NullCdf::from_reference_coverage(&[0.5], &[]),
            Err(NullModelError::EmptyReference)
        ));
        assert!(matches!(
            NullCdf::from_reference_coverage(&[], &[0.2]),
            Err(NullModelError::DegenerateNullModel { distinct: 0 })
        ));
    }

    #[test]
    fn test_serde_round_trip_validates() {
        let f = scenario_cdf();
        let bad = ControlPoints {
            phases: vec![0.3],
            cumulative: vec![0.2],
        };
        assert!(NullCdf::try_from(bad).is_err());

        let good = ControlPoints {
            phases: f.phases().to_vec(),
            cumulative: f.cumulative().to_vec(),
        };
        assert_eq!(NullCdf::try_from(good).unwrap(), f);
    }
}
