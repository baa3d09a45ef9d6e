use serde::{Deserialize, Serialize};

use crate::formula::FormulaFamily;

/// One finite `(x, y)` point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub x: f64,
    pub y: f64,
}

impl Sample {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// `Some` only when both coordinates are finite.
    pub fn finite(x: f64, y: f64) -> Option<Self> {
        (x.is_finite() && y.is_finite()).then_some(Self { x, y })
    }
}

/// Ordered samples of one formula.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    /// The formula string the samples came from.
    pub label: String,
    pub family: FormulaFamily,
    pub samples: Vec<Sample>,
}

impl Series {
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }
}
