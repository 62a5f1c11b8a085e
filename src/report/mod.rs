//! Report generation for summary results.

mod generator;

pub use generator::*;
