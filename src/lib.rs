//! linkoscope - distribution of graph Shannon entropy across random Markov models.
//!
//! ## Architecture
//!
//! A study builds a fixed population of independently seeded Markov models
//! from a "next" ontology, then drives every model through repeated runs at
//! each linkograph size. Each run produces one linkograph (linked by a
//! separate "link" ontology) and one entropy sample.
//!
//! ## Pipelines
//!
//! - **Entropy study**: population → (size × model × run) entropies →
//!   per-size mean and standard deviation of per-model means
//! - **Link-model derivation**: generating model → one linkograph →
//!   fitted link-predictor model
//!
//! ## Reproducibility
//!
//! Every entry point takes an explicit [`SeedSource`]. A fixed seed list
//! gives bit-identical results across invocations, in sequential and
//! parallel mode alike.

pub mod linko;
pub mod markov;
pub mod models;
pub mod pipeline;
pub mod pool;
pub mod report;

// Re-exports for convenience
pub use linko::{EntropyMetric, GraphEntropy, Linkograph};
pub use markov::{MarkovModel, ModelMethod, StochasticModel};
pub use models::{
    Config, LinkOntology, LinkoscopeError, NextOntology, Ontology, Result, ResultMatrix,
    SimulationParams, SizeStats,
};
pub use pipeline::{derive_link_model, gen_single_ontology_stats, SimulationDriver};
pub use pool::{create_population, SeedSource};
