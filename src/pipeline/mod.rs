//! Pipeline module - entropy simulation, aggregation and link-model derivation.

mod aggregate;
mod link_model;
mod driver;

pub use aggregate::*;
pub use link_model::*;
pub use driver::*;
