//! Fitting link-predictor models from observed linkographs.
//!
//! A link predictor estimates, for each class, which class the next linked
//! node tends to belong to: every node contributes one transition per
//! forelink (its earliest `link_num` forelinks), from its own class to the
//! class of the linked node.

use crate::linko::Linkograph;
use crate::markov::model::{quantize_row, MAX_PRECISION};
use crate::markov::{MarkovModel, ModelMethod};
use crate::models::{ModelError, NextOntology};
use ndarray::{Array2, Axis};
use tracing::debug;

/// Transition counts `class(i) → class(j)` over the first `link_num` forelinks of each node.
pub fn link_counts(
    linko: &Linkograph,
    ontology: &NextOntology,
    link_num: usize,
) -> Result<Array2<f64>, ModelError> {
    let ont = ontology.inner();
    let n = ont.len();
    let mut counts = Array2::<f64>::zeros((n, n));

    let index = |class: &str| {
        ont.index_of(class)
            .ok_or_else(|| ModelError::UnknownClass(class.to_string()))
    };

    for node in linko.nodes() {
        let from = index(&node.class)?;
        for &j in node.forelinks.iter().take(link_num) {
            let to = index(&linko.nodes()[j].class)?;
            counts[[from, to]] += 1.0;
        }
    }

    Ok(counts)
}

/// Fit a link-predictor Markov model from one linkograph.
///
/// Rows without observations fall back to a uniform distribution.
/// Probabilities are rounded to `precision` decimals and still sum to 1.
pub fn fit_link_predictor(
    linko: &Linkograph,
    ontology: NextOntology,
    precision: u32,
    seed: u64,
    link_num: usize,
) -> Result<MarkovModel, ModelError> {
    let n = ontology.inner().len();
    if n == 0 {
        return Err(ModelError::NoClasses);
    }

    let counts = link_counts(linko, &ontology, link_num)?;
    let units = 10u64.pow(precision.min(MAX_PRECISION));

    let mut transitions = Array2::<f64>::zeros((n, n));
    for (i, row) in counts.axis_iter(Axis(0)).enumerate() {
        let total = row.sum();
        let probs: Vec<f64> = if total > 0.0 {
            row.iter().map(|c| c / total).collect()
        } else {
            vec![1.0 / n as f64; n]
        };
        for (j, p) in quantize_row(&probs, units).into_iter().enumerate() {
            transitions[[i, j]] = p;
        }
    }

    debug!(
        nodes = linko.len(),
        links = linko.link_count(),
        link_num,
        seed,
        "Fitted link predictor"
    );

    MarkovModel::from_transitions(
        ontology,
        transitions,
        precision,
        seed,
        ModelMethod::LinkPredictor { link_num },
    )
}
