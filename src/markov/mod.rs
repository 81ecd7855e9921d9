//! Markov module - generating models and link-predictor fitting.

mod fit;
mod model;

pub use fit::*;
pub use model::*;
