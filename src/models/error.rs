//! Error types for linkoscope.
//!
//! Taxonomy:
//! - Bad input: configuration, ontology and seed problems caught before any
//!   simulation work starts
//! - Simulation failures: a linkograph or entropy computation failed for one
//!   (model, run) pair; the whole invocation is aborted
//! - Internal: invariant violations (bugs)

use thiserror::Error;

/// Top-level error type for linkoscope.
#[derive(Debug, Error)]
pub enum LinkoscopeError {
    // ═══════════════════════════════════════════════════════════════════
    // BAD INPUT — rejected before any simulation work
    // ═══════════════════════════════════════════════════════════════════

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Config file error: {0}")]
    Config(#[from] super::ConfigError),

    #[error("Seed mismatch: {required} seeds required, {supplied} supplied")]
    SeedMismatch { required: usize, supplied: usize },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // ═══════════════════════════════════════════════════════════════════
    // SIMULATION — fatal to the current invocation, never retried
    // ═══════════════════════════════════════════════════════════════════

    #[error("Simulation failed at size {size} (model {model}, run {run}): {reason}")]
    SimulationFailure {
        size: usize,
        model: usize,
        run: usize,
        reason: String,
    },

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Simulation cancelled after {completed} of {total} sizes")]
    Cancelled { completed: usize, total: usize },

    // ═══════════════════════════════════════════════════════════════════
    // INTERNAL — invariant broken
    // ═══════════════════════════════════════════════════════════════════

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Errors raised by a stochastic model.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("State {state} out of range for {classes} classes")]
    InvalidState { state: usize, classes: usize },

    #[error("Model has no classes")]
    NoClasses,

    #[error("Transition row {row} sums to {sum}, expected 1")]
    InvalidRow { row: usize, sum: f64 },

    #[error("Transition matrix is {rows}x{cols}, expected {classes}x{classes}")]
    ShapeMismatch {
        rows: usize,
        cols: usize,
        classes: usize,
    },

    #[error("Unknown class '{0}'")]
    UnknownClass(String),

    #[error("Cannot produce an empty linkograph")]
    EmptyLinkograph,
}

/// Errors raised by the entropy metric.
#[derive(Debug, Error)]
pub enum EntropyError {
    #[error("Graph entropy is undefined for {0} node(s); at least 2 are required")]
    TooFewNodes(usize),
}

impl LinkoscopeError {
    /// Create an IO error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Wrap a failure from one (model, run) pair of a simulation.
    pub fn simulation(
        size: usize,
        model: usize,
        run: usize,
        source: impl std::fmt::Display,
    ) -> Self {
        Self::SimulationFailure {
            size,
            model,
            run,
            reason: source.to_string(),
        }
    }

    /// Whether this error was raised before any simulation work started.
    ///
    /// The CLI exits with a distinct status for these.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::Configuration(_)
                | Self::Config(_)
                | Self::SeedMismatch { .. }
                | Self::Parse(_)
                | Self::Io { .. }
        )
    }
}

/// Result type alias for linkoscope.
pub type Result<T> = std::result::Result<T, LinkoscopeError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_input_errors() {
        assert!(LinkoscopeError::Configuration("empty ontology".into()).is_input_error());
        assert!(LinkoscopeError::SeedMismatch { required: 5, supplied: 3 }.is_input_error());
        assert!(LinkoscopeError::Parse("bad json".into()).is_input_error());
        assert!(LinkoscopeError::io(
            "reading ontology",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        )
        .is_input_error());

        let config = crate::models::ConfigError::FileRead {
            path: PathBuf::from("missing.toml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert!(LinkoscopeError::from(config).is_input_error());
    }

    #[test]
    fn test_simulation_errors_are_not_input_errors() {
        let err = LinkoscopeError::simulation(3, 1, 0, EntropyError::TooFewNodes(1));
        assert!(!err.is_input_error());
        assert!(err.to_string().contains("at least 2 are required"));

        assert!(!LinkoscopeError::Model(ModelError::EmptyLinkograph).is_input_error());
        assert!(!LinkoscopeError::Cancelled { completed: 1, total: 3 }.is_input_error());
        assert!(!LinkoscopeError::Internal("broken".into()).is_input_error());
    }
}
