pub mod aggregate;
pub mod cache;
pub mod export;
pub mod render;
pub mod types;

pub use aggregate::{parse_formulas, sample_and_map, PlotAggregator};
pub use cache::SeriesCache;
pub use export::{to_csv, to_json};
pub use render::{render_png, render_svg};
pub use types::{Diagnostic, FamilyGroup, ParsedFormula, PlotOptions, PlotReport, RenderStyle};
