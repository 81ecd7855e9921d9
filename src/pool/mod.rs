//! Pool module - model populations.

mod population;

pub use population::*;
