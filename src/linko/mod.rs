//! Linkograph module - structure and entropy metric.

mod entropy;
mod linkograph;

pub use entropy::*;
pub use linkograph::*;
