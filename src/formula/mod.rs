//! Multi-grammar formula parsing.
//!
//! Accepted shapes, tried in order:
//!
//! - `key:p1,p2,...[:xMin,xMax,step]` for a known family key,
//! - `y=<rhs>[:xMin,xMax,step]` (exponential, logarithmic, linear, quadratic,
//!   or any other expression the evaluator accepts),
//! - `<lhs>=<rhs>[:xMin,xMax,step]`, solved for `y` as a quadratic in `x`.

pub mod coeffs;
pub mod config;
pub mod error;
pub mod family;
pub mod numeric;
pub mod parser;
pub mod spec;

pub use coeffs::{extract_quadratic_coefficients, QuadraticCoefficients};
pub use config::{ParserConfig, RangeOverride};
pub use error::{ParseErrorKind, ParseFailure};
pub use family::{FamilyParams, FormulaFamily};
pub use parser::{parse, FormulaParser};
pub use spec::{Domain, PlotSpec};
