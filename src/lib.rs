//! Turn formula strings into sampled, screen-mapped curves.
//!
//! The pipeline is `formula` (string → [`formula::PlotSpec`]), `sample`
//! (spec → [`sample::Series`]), `mapping` (series → draw-space points) and
//! `plot` (batching, grouping by family, rendering and export). `expr` is the
//! expression evaluator used by free-form formulas.

pub mod expr;
pub mod formula;
pub mod mapping;
pub mod persistence;
pub mod plot;
pub mod sample;
