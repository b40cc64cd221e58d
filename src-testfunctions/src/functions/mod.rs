//! Benchmark objectives grouped by landscape
//!
//! - `unimodal`: bowl and valley shaped functions with a single minimum
//! - `multimodal`: functions with many local minima

pub mod multimodal;
pub mod unimodal;

pub use multimodal::*;
pub use unimodal::*;
