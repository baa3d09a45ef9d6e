//! Projection of sample series into a drawing rectangle.
//!
//! Each axis is transformed (linear or base-10 log), the shared extent is
//! computed over every series, degenerate extents are widened, and samples
//! are scaled into the rectangle with its margin. Draw-space `y` grows
//! downward.

pub mod error;
pub mod mapper;
pub mod scale;

pub use error::{MappingErrorKind, MappingFailure, MappingResult};
pub use mapper::{map, CoordinateMapper, DrawRect, MappedSample, Mapping};
pub use scale::{AxisExtent, AxisScale, AxisScales};
