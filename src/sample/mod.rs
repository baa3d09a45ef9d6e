pub mod generator;
pub mod types;

pub use generator::generate;
pub use types::{Sample, Series};
