//! Core data models for linkoscope.
//!
//! - Configuration and simulation parameters
//! - Error taxonomy
//! - Ontologies (transition and linking roles)
//! - Result matrices

mod config;
mod error;
mod ontology;
mod results;

pub use config::*;
pub use error::*;
pub use ontology::*;
pub use results::*;
