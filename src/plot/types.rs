/// Plot options, grouped results and report types.
use serde::{Deserialize, Serialize};

use crate::formula::{FormulaFamily, ParseFailure, PlotSpec};
use crate::mapping::{AxisScale, AxisScales, DrawRect, Mapping};
use crate::sample::Series;

/// Default drawing rectangle (pixels).
pub const DEFAULT_DRAW_WIDTH: u32 = 800;
pub const DEFAULT_DRAW_HEIGHT: u32 = 500;
pub const DEFAULT_MARGIN: u32 = 10;

/// Color palette for multiple curves on a dark background (RGB).
pub const SERIES_COLORS: &[(u8, u8, u8)] = &[
    (137, 180, 250), // blue
    (166, 227, 161), // green
    (249, 226, 175), // yellow
    (243, 139, 168), // red
    (203, 166, 247), // mauve
    (148, 226, 213), // teal
    (250, 179, 135), // peach
    (180, 190, 254), // lavender
];

/// Drawing rectangle and axis scales shared by every group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotOptions {
    pub draw_width: u32,
    pub draw_height: u32,
    pub margin: u32,
    pub axis_scale_x: AxisScale,
    pub axis_scale_y: AxisScale,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            draw_width: DEFAULT_DRAW_WIDTH,
            draw_height: DEFAULT_DRAW_HEIGHT,
            margin: DEFAULT_MARGIN,
            axis_scale_x: AxisScale::Linear,
            axis_scale_y: AxisScale::Linear,
        }
    }
}

impl PlotOptions {
    pub fn rect(&self) -> DrawRect {
        DrawRect::new(
            f64::from(self.draw_width),
            f64::from(self.draw_height),
            f64::from(self.margin),
        )
    }

    pub fn scales(&self) -> AxisScales {
        AxisScales::new(self.axis_scale_x, self.axis_scale_y)
    }
}

/// Decoration drawn under the curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStyle {
    /// Grid lines across the inner rectangle.
    pub grid: bool,
    /// Outline of the inner rectangle.
    pub frame: bool,
}

/// Outcome of parsing one input string.
#[derive(Debug, Clone)]
pub struct ParsedFormula {
    pub source: String,
    pub result: Result<PlotSpec, ParseFailure>,
}

/// All series of one family, mapped against the family's own extents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FamilyGroup {
    pub family: FormulaFamily,
    pub series: Vec<Series>,
    pub mapping: Mapping,
}

/// A formula that was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub formula: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotReport {
    pub groups: Vec<FamilyGroup>,
    pub diagnostics: Vec<Diagnostic>,
}

impl PlotReport {
    pub fn series_count(&self) -> usize {
        self.groups.iter().map(|g| g.series.len()).sum()
    }
}
