use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::formula::config::RangeOverride;
use crate::formula::family::{FamilyParams, FormulaFamily};

/// Tolerance when counting grid points, so `(1 - 0) / 0.1` still yields 11.
const COUNT_EPSILON: f64 = 1e-9;

/// Fraction of the bound's magnitude used to widen a degenerate domain when
/// the family pad is lost to rounding.
const RELATIVE_PAD: f64 = 1e-6;

/// Sampling range. For [`FormulaFamily::Polar`] the bounds are degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Domain {
    pub fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    /// Replace bounds positionally with the values present in `range`.
    pub fn overridden(self, range: &RangeOverride) -> Self {
        Self {
            min: range.min.unwrap_or(self.min),
            max: range.max.unwrap_or(self.max),
            step: range.step.unwrap_or(self.step),
        }
    }

    /// Enforce `min < max` and `step > 0`, keeping the sample count at or
    /// below `max_samples`.
    pub fn normalized(self, family: FormulaFamily, max_samples: usize) -> Self {
        let defaults = family.default_domain();
        let mut min = if self.min.is_finite() { self.min } else { defaults.min };
        let mut max = if self.max.is_finite() { self.max } else { defaults.max };
        let mut step = self.step;

        if min > max {
            std::mem::swap(&mut min, &mut max);
        }
        if min == max {
            let pad = family.degenerate_pad();
            debug!("widening degenerate {} domain at {} by ±{}", family, min, pad);
            min -= pad;
            max += pad;
        }
        if min == max {
            // the fixed pad vanished in rounding at this magnitude
            let pad = min.abs().max(max.abs()) * RELATIVE_PAD;
            min -= pad;
            max += pad;
        }
        if !(min < max) || !(max - min).is_finite() {
            warn!(
                "{} domain [{}, {}] is not representable; using [{}, {}]",
                family, min, max, defaults.min, defaults.max
            );
            min = defaults.min;
            max = defaults.max;
        }
        if !step.is_finite() || step <= 0.0 {
            step = defaults.step;
        }

        let max_samples = max_samples.max(2);
        let span = max - min;
        if span / step + 1.0 > max_samples as f64 {
            let widened = span / (max_samples - 1) as f64;
            warn!(
                "step {} over [{}, {}] exceeds {} samples; using step {}",
                step, min, max, max_samples, widened
            );
            step = widened;
        }

        Self { min, max, step }
    }

    /// `floor((max - min) / step) + 1` grid points.
    pub fn sample_count(&self) -> usize {
        if self.step.is_nan() || self.step <= 0.0 || self.max < self.min {
            return 0;
        }
        ((self.max - self.min) / self.step + COUNT_EPSILON).floor() as usize + 1
    }

    /// Grid points `min + i·step`, computed by index so error never accumulates.
    pub fn points(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.sample_count()).map(move |i| self.min + i as f64 * self.step)
    }
}

/// A parsed formula: family parameters plus the domain to sample.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotSpec {
    pub params: FamilyParams,
    pub domain: Domain,
    /// Expression text for [`FormulaFamily::GenericExpression`].
    pub raw_expression: Option<String>,
    /// The formula string this spec came from.
    pub source: String,
}

impl PlotSpec {
    pub fn family(&self) -> FormulaFamily {
        self.params.family()
    }

    /// The spec a family gets from an empty parameter list.
    pub fn default_for(family: FormulaFamily) -> Option<Self> {
        let params = FamilyParams::from_positional(family, &[])?;
        Some(Self {
            params,
            domain: family.default_domain(),
            raw_expression: None,
            source: format!("{}:", family.name()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_count() {
        assert_eq!(Domain::new(-10.0, 10.0, 1.0).sample_count(), 21);
        assert_eq!(Domain::new(0.0, 1.0, 0.1).sample_count(), 11);
        assert_eq!(Domain::new(-4.0, 4.0, 4.0).sample_count(), 3);
        assert_eq!(Domain::new(0.0, 1.0, 5.0).sample_count(), 1);
    }

    #[test]
    fn test_points_do_not_accumulate_error() {
        let pts: Vec<f64> = Domain::new(0.0, 1.0, 0.1).points().collect();
        assert_eq!(pts.len(), 11);
        assert_eq!(pts[10], 0.0 + 10.0 * 0.1);
    }

    #[test]
    fn test_degenerate_domain_widened() {
        let d = Domain::new(3.0, 3.0, 1.0).normalized(FormulaFamily::Quadratic, 1000);
        assert_eq!((d.min, d.max), (-7.0, 13.0));
        let d = Domain::new(0.0, 0.0, 0.1).normalized(FormulaFamily::Sine, 1000);
        assert_eq!((d.min, d.max), (-1.0, 1.0));
    }

    #[test]
    fn test_degenerate_domain_at_large_magnitude() {
        let d = Domain::new(1e18, 1e18, 1.0).normalized(FormulaFamily::Linear, 100_000);
        assert!(d.min < d.max);
        assert!(d.step.is_finite() && d.step > 0.0);
        assert!(d.sample_count() <= 100_000);
    }

    #[test]
    fn test_overflowing_span_falls_back_to_defaults() {
        let d = Domain::new(-1.7e308, 1.7e308, 1.0).normalized(FormulaFamily::Linear, 100_000);
        assert_eq!((d.min, d.max), (-10.0, 10.0));
        assert_eq!(d.step, 1.0);

        let d = Domain::new(f64::MAX, f64::MAX, 1.0).normalized(FormulaFamily::Quadratic, 100_000);
        assert!(d.min < d.max && (d.max - d.min).is_finite());
        assert!(d.step.is_finite() && d.step > 0.0);
    }

    #[test]
    fn test_reversed_domain_swapped() {
        let d = Domain::new(5.0, -5.0, 1.0).normalized(FormulaFamily::Linear, 1000);
        assert_eq!((d.min, d.max), (-5.0, 5.0));
    }

    #[test]
    fn test_bad_step_replaced() {
        let d = Domain::new(-1.0, 1.0, 0.0).normalized(FormulaFamily::Linear, 1000);
        assert_eq!(d.step, 1.0);
        let d = Domain::new(-1.0, 1.0, -2.0).normalized(FormulaFamily::Sine, 1000);
        assert_eq!(d.step, 0.1);
    }

    #[test]
    fn test_step_clamped_to_max_samples() {
        let d = Domain::new(0.0, 1000.0, 0.001).normalized(FormulaFamily::Linear, 101);
        assert_eq!(d.step, 10.0);
        assert_eq!(d.sample_count(), 101);
    }

    #[test]
    fn test_default_specs_exist_for_closed_forms() {
        assert!(PlotSpec::default_for(FormulaFamily::Polar).is_some());
        assert!(PlotSpec::default_for(FormulaFamily::GenericExpression).is_none());
    }
}
