//! Link-predictor derivation from a generating model.
//!
//! Pipeline flow:
//! generating model → one linkograph (own ontology as link rules) →
//! link-predictor Markov model

use crate::markov::{fit_link_predictor, MarkovModel, StochasticModel};
use crate::models::Result;
use crate::pool::SeedSource;
use tracing::info;

/// Digits of the wall-clock fraction used to seed a derived model.
pub const DEFAULT_TIME_SIZE: u32 = 7;

/// Links per node used when fitting the predictor.
pub const LINK_PREDICTOR_LINKS: usize = 1;

/// Fit a link-predictor model from one `size`-node linkograph of `model`.
///
/// The derived model keeps `model`'s ontology. Its seed comes from `seeds`:
/// the first fixed seed, or `trunc(frac(now) * 10^time_size)` on the wall
/// clock.
pub fn derive_link_model<M: StochasticModel>(
    size: usize,
    model: &mut M,
    precision: u32,
    time_size: u32,
    seeds: &SeedSource,
) -> Result<MarkovModel> {
    let seed = seeds.single_seed(time_size)?;

    let link = model.ontology().as_link_ontology();
    let linko = model.produce_linkograph(size, &link)?;

    let derived = fit_link_predictor(
        &linko,
        model.ontology().clone(),
        precision,
        seed,
        LINK_PREDICTOR_LINKS,
    )?;

    info!(
        size,
        links = linko.link_count(),
        seed,
        precision,
        "Derived link-predictor model"
    );

    Ok(derived)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markov::ModelMethod;
    use crate::models::{LinkoscopeError, ModelError, NextOntology, Ontology};
    use ndarray::Axis;

    fn ontology() -> NextOntology {
        NextOntology::new(Ontology::from_pairs([
            ("analyse", vec!["synthesise"]),
            ("evaluate", vec!["analyse", "synthesise"]),
            ("synthesise", vec!["evaluate"]),
        ]))
        .unwrap()
    }

    #[test]
    fn test_derived_model_keeps_ontology() {
        for seed in [1, 99, 12345] {
            let mut model = MarkovModel::from_ontology(ontology(), 2, seed).unwrap();
            let derived =
                derive_link_model(20, &mut model, 3, DEFAULT_TIME_SIZE, &SeedSource::WallClock)
                    .unwrap();
            assert_eq!(derived.ontology(), model.ontology());
            assert_eq!(derived.classes(), model.classes());
        }
    }

    #[test]
    fn test_derived_model_is_link_predictor() {
        let mut model = MarkovModel::from_ontology(ontology(), 2, 5).unwrap();
        let derived =
            derive_link_model(30, &mut model, 3, DEFAULT_TIME_SIZE, &SeedSource::Fixed(vec![77]))
                .unwrap();

        assert_eq!(derived.method(), ModelMethod::LinkPredictor { link_num: 1 });
        assert_eq!(derived.seed(), 77);
        assert_eq!(derived.precision(), 3);
        for row in derived.transitions().axis_iter(Axis(0)) {
            assert!((row.sum() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_derivation_reproducible_with_fixed_seed() {
        let seeds = SeedSource::Fixed(vec![4]);
        let mut a = MarkovModel::from_ontology(ontology(), 2, 8).unwrap();
        let mut b = MarkovModel::from_ontology(ontology(), 2, 8).unwrap();
        let da = derive_link_model(25, &mut a, 2, DEFAULT_TIME_SIZE, &seeds).unwrap();
        let db = derive_link_model(25, &mut b, 2, DEFAULT_TIME_SIZE, &seeds).unwrap();
        assert_eq!(da.transitions(), db.transitions());
    }

    #[test]
    fn test_wall_clock_seed_bounded_by_time_size() {
        let mut model = MarkovModel::from_ontology(ontology(), 2, 3).unwrap();
        let derived = derive_link_model(10, &mut model, 2, 3, &SeedSource::WallClock).unwrap();
        assert!(derived.seed() < 1000);
    }

    #[test]
    fn test_generation_failure_propagates() {
        let mut model = MarkovModel::from_ontology(ontology(), 2, 3).unwrap();
        let err = derive_link_model(0, &mut model, 2, DEFAULT_TIME_SIZE, &SeedSource::WallClock)
            .unwrap_err();
        assert!(matches!(err, LinkoscopeError::Model(ModelError::EmptyLinkograph)));
    }

    #[test]
    fn test_empty_fixed_seeds() {
        let mut model = MarkovModel::from_ontology(ontology(), 2, 3).unwrap();
        let err =
            derive_link_model(10, &mut model, 2, DEFAULT_TIME_SIZE, &SeedSource::Fixed(vec![]))
                .unwrap_err();
        assert!(matches!(err, LinkoscopeError::SeedMismatch { .. }));
    }
}
