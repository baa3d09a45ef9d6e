use serde::{Deserialize, Serialize};

use crate::mapping::error::{MappingFailure, MappingResult};
use crate::mapping::scale::{AxisExtent, AxisScale, AxisScales};
use crate::sample::Series;

/// Target rectangle in draw space. `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawRect {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
}

impl DrawRect {
    pub fn new(width: f64, height: f64, margin: f64) -> Self {
        Self {
            width,
            height,
            margin,
        }
    }

    /// Reject rectangles with no drawable interior.
    pub fn validate(&self) -> MappingResult<()> {
        let finite = self.width.is_finite() && self.height.is_finite() && self.margin.is_finite();
        if !finite || self.width <= 0.0 || self.height <= 0.0 || self.margin < 0.0 {
            return Err(MappingFailure::invalid_rect(format!(
                "{}x{} with margin {} has no area",
                self.width, self.height, self.margin
            )));
        }
        if 2.0 * self.margin >= self.width.min(self.height) {
            return Err(MappingFailure::invalid_rect(format!(
                "margin {} leaves no room inside {}x{}",
                self.margin, self.width, self.height
            )));
        }
        Ok(())
    }
}

/// A sample with its draw-space position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MappedSample {
    pub x: f64,
    pub y: f64,
    pub draw_x: f64,
    pub draw_y: f64,
}

/// Mapped series sharing one extent per axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mapping {
    pub x_extent: AxisExtent,
    pub y_extent: AxisExtent,
    /// One entry per input series, same order.
    pub series: Vec<Vec<MappedSample>>,
}

/// Maps sample series into a [`DrawRect`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    rect: DrawRect,
    scales: AxisScales,
}

impl CoordinateMapper {
    pub fn new(rect: DrawRect, scales: AxisScales) -> MappingResult<Self> {
        rect.validate()?;
        Ok(Self { rect, scales })
    }

    /// Map all `series` against one shared extent per axis. Samples that a
    /// log axis cannot show are dropped individually.
    pub fn map(&self, series: &[Series]) -> MappingResult<Mapping> {
        // (data x, data y, plot x, plot y) per surviving sample
        let projected: Vec<Vec<(f64, f64, f64, f64)>> = series
            .iter()
            .map(|s| {
                s.samples
                    .iter()
                    .filter_map(|p| {
                        let px = self.scales.x.to_plot(p.x)?;
                        let py = self.scales.y.to_plot(p.y)?;
                        Some((p.x, p.y, px, py))
                    })
                    .collect()
            })
            .collect();

        let x_extent = resolve_extent(projected.iter().flatten().map(|p| p.2), "x")?;
        let y_extent = resolve_extent(projected.iter().flatten().map(|p| p.3), "y")?;

        let inner_w = self.rect.width - 2.0 * self.rect.margin;
        let inner_h = self.rect.height - 2.0 * self.rect.margin;

        let mapped = projected
            .into_iter()
            .map(|points| {
                points
                    .into_iter()
                    .map(|(x, y, px, py)| MappedSample {
                        x,
                        y,
                        draw_x: self.rect.margin + x_extent.fraction(px) * inner_w,
                        draw_y: self.rect.height - self.rect.margin - y_extent.fraction(py) * inner_h,
                    })
                    .collect()
            })
            .collect();

        Ok(Mapping {
            x_extent,
            y_extent,
            series: mapped,
        })
    }
}

fn resolve_extent(values: impl Iterator<Item = f64>, axis: &str) -> MappingResult<AxisExtent> {
    let extent = match AxisExtent::of(values) {
        Some(extent) => extent.widen_if_degenerate(),
        None => return Ok(AxisExtent::UNIT),
    };
    if !extent.span().is_finite() || extent.span() <= 0.0 {
        return Err(MappingFailure::unrecoverable(format!(
            "{} extent [{}, {}] has no finite span",
            axis, extent.min, extent.max
        )));
    }
    Ok(extent)
}

/// Map `series` into `rect` with the given axis scales.
pub fn map(series: &[Series], rect: DrawRect, x: AxisScale, y: AxisScale) -> MappingResult<Mapping> {
    CoordinateMapper::new(rect, AxisScales::new(x, y))?.map(series)
}
