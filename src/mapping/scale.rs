use log::debug;
use serde::{Deserialize, Serialize};

/// How an axis turns data values into plotting-space values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisScale {
    #[default]
    Linear,
    /// Base-10 logarithm; only positive values are representable.
    Log,
}

impl AxisScale {
    /// Transform a data value into plotting space, or `None` when the value
    /// cannot be shown on this axis.
    pub fn to_plot(self, value: f64) -> Option<f64> {
        match self {
            AxisScale::Linear => value.is_finite().then_some(value),
            AxisScale::Log => (value.is_finite() && value > 0.0)
                .then(|| value.log10())
                .filter(|v| v.is_finite()),
        }
    }
}

/// Scale mode per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AxisScales {
    pub x: AxisScale,
    pub y: AxisScale,
}

impl AxisScales {
    pub fn new(x: AxisScale, y: AxisScale) -> Self {
        Self { x, y }
    }
}

/// Bounds of one axis in plotting space (log10 space for log axes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisExtent {
    pub min: f64,
    pub max: f64,
    /// Set when the bounds were synthesized or pushed apart rather than
    /// taken straight from the data.
    pub widened: bool,
}

impl AxisExtent {
    /// The fallback extent for an axis with no plottable values.
    pub const UNIT: AxisExtent = AxisExtent {
        min: 0.0,
        max: 1.0,
        widened: true,
    };

    /// Extent of `values`, or `None` if there are none. Values are folded in
    /// iteration order, so the result is reproducible.
    pub fn of(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        values.into_iter().fold(None, |acc, v| {
            Some(match acc {
                None => AxisExtent {
                    min: v,
                    max: v,
                    widened: false,
                },
                Some(e) => AxisExtent {
                    min: e.min.min(v),
                    max: e.max.max(v),
                    widened: false,
                },
            })
        })
    }

    /// Push coinciding bounds apart by `max(1, 10% of |value|)`.
    pub fn widen_if_degenerate(self) -> Self {
        if self.min != self.max {
            return self;
        }
        let pad = (self.min.abs() * 0.1).max(1.0);
        debug!("widening degenerate extent at {} by ±{}", self.min, pad);
        AxisExtent {
            min: self.min - pad,
            max: self.max + pad,
            widened: true,
        }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Position of `value` within the extent, 0 at `min` and 1 at `max`.
    pub fn fraction(&self, value: f64) -> f64 {
        (value - self.min) / self.span()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_rejects_non_positive() {
        assert_eq!(AxisScale::Log.to_plot(100.0), Some(2.0));
        assert_eq!(AxisScale::Log.to_plot(0.0), None);
        assert_eq!(AxisScale::Log.to_plot(-3.0), None);
        assert_eq!(AxisScale::Linear.to_plot(-3.0), Some(-3.0));
        assert_eq!(AxisScale::Linear.to_plot(f64::NAN), None);
    }

    #[test]
    fn test_extent_of_values() {
        let e = AxisExtent::of([3.0, -1.0, 2.0]).unwrap();
        assert_eq!((e.min, e.max, e.widened), (-1.0, 3.0, false));
        assert!(AxisExtent::of(std::iter::empty()).is_none());
    }

    #[test]
    fn test_widen_small_and_large() {
        let e = AxisExtent::of([0.5]).unwrap().widen_if_degenerate();
        assert_eq!((e.min, e.max, e.widened), (-0.5, 1.5, true));
        let e = AxisExtent::of([100.0]).unwrap().widen_if_degenerate();
        assert_eq!((e.min, e.max), (90.0, 110.0));
    }

    #[test]
    fn test_non_degenerate_untouched() {
        let e = AxisExtent::of([0.0, 1.0]).unwrap();
        assert_eq!(e.widen_if_degenerate(), e);
    }
}
