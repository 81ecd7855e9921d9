//! Model populations and their seeds.
//!
//! Seeding is always explicit: callers pass a [`SeedSource`]. A fixed seed
//! list makes a study reproducible; the wall-clock source reproduces the
//! time-derived seeds used for exploratory runs.

use crate::markov::MarkovModel;
use crate::models::{LinkoscopeError, NextOntology, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Where model seeds come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedSource {
    /// Seeds consumed in order, one per model
    Fixed(Vec<u64>),
    /// Seeds derived from the current time
    WallClock,
}

impl SeedSource {
    /// Fixed seeds when given, wall clock otherwise.
    pub fn from_option(seeds: Option<Vec<u64>>) -> Self {
        match seeds {
            Some(s) => Self::Fixed(s),
            None => Self::WallClock,
        }
    }

    /// One seed per model.
    ///
    /// Wall-clock seeds are `now * index`; the bit pattern of the product is
    /// used so sub-second differences between invocations survive.
    pub fn population_seeds(&self, count: usize) -> Result<Vec<u64>> {
        match self {
            Self::Fixed(seeds) => {
                if seeds.len() < count {
                    return Err(LinkoscopeError::SeedMismatch {
                        required: count,
                        supplied: seeds.len(),
                    });
                }
                Ok(seeds[..count].to_vec())
            }
            Self::WallClock => {
                let now = wall_clock_secs();
                Ok((0..count).map(|i| (now * i as f64).to_bits()).collect())
            }
        }
    }

    /// A single seed.
    ///
    /// Wall-clock: the fractional part of the current time scaled by
    /// `10^digits` and truncated. Fixed: the first seed.
    pub fn single_seed(&self, digits: u32) -> Result<u64> {
        match self {
            Self::Fixed(seeds) => seeds.first().copied().ok_or(LinkoscopeError::SeedMismatch {
                required: 1,
                supplied: 0,
            }),
            Self::WallClock => Ok(fractional_seed(wall_clock_secs(), digits)),
        }
    }
}

/// Seconds since the Unix epoch, with sub-second precision.
fn wall_clock_secs() -> f64 {
    let now = Utc::now();
    now.timestamp() as f64 + f64::from(now.timestamp_subsec_nanos()) * 1e-9
}

/// `trunc(frac(secs) * 10^digits)`.
fn fractional_seed(secs: f64, digits: u32) -> u64 {
    let scale = 10f64.powi(digits.min(19) as i32);
    (secs.fract() * scale) as u64
}

/// Build `count` independently seeded models over `ontology`.
///
/// Nothing is constructed when the seed source cannot cover `count` models.
pub fn create_population(
    ontology: &NextOntology,
    count: usize,
    precision: u32,
    seeds: &SeedSource,
) -> Result<Vec<MarkovModel>> {
    ontology.inner().validate()?;
    if count == 0 {
        return Err(LinkoscopeError::Configuration(
            "population needs at least one model".to_string(),
        ));
    }

    let seeds = seeds.population_seeds(count)?;

    let models = seeds
        .into_iter()
        .map(|seed| MarkovModel::from_ontology(ontology.clone(), precision, seed))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    debug!(models = models.len(), precision, "Built model population");
    Ok(models)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markov::StochasticModel;
    use crate::models::Ontology;

    fn ontology() -> NextOntology {
        NextOntology::new(Ontology::from_pairs([
            ("a", vec!["a", "b", "c"]),
            ("b", vec!["a", "c"]),
            ("c", vec!["a", "b", "c"]),
        ]))
        .unwrap()
    }

    fn walks(models: &mut [MarkovModel]) -> Vec<Vec<usize>> {
        models.iter_mut().map(|m| m.walk(30)).collect()
    }

    #[test]
    fn test_fixed_seeds_build_distinct_models() {
        let models =
            create_population(&ontology(), 3, 2, &SeedSource::Fixed(vec![1, 2, 3])).unwrap();
        assert_eq!(models.len(), 3);
        assert_eq!(
            models.iter().map(|m| m.seed()).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert!(models.iter().all(|m| m.ontology() == &ontology()));
        assert_ne!(models[0].transitions(), models[1].transitions());
    }

    #[test]
    fn test_fixed_seeds_reproducible() {
        let seeds = SeedSource::Fixed(vec![10, 20]);
        let mut a = create_population(&ontology(), 2, 2, &seeds).unwrap();
        let mut b = create_population(&ontology(), 2, 2, &seeds).unwrap();
        assert_eq!(walks(&mut a), walks(&mut b));
    }

    #[test]
    fn test_extra_seeds_ignored() {
        let models =
            create_population(&ontology(), 2, 2, &SeedSource::Fixed(vec![4, 5, 6])).unwrap();
        assert_eq!(models.len(), 2);
    }

    #[test]
    fn test_seed_mismatch() {
        let err =
            create_population(&ontology(), 5, 2, &SeedSource::Fixed(vec![1, 2, 3])).unwrap_err();
        assert!(matches!(
            err,
            LinkoscopeError::SeedMismatch { required: 5, supplied: 3 }
        ));
    }

    #[test]
    fn test_zero_models_rejected() {
        let err = create_population(&ontology(), 0, 2, &SeedSource::WallClock).unwrap_err();
        assert!(matches!(err, LinkoscopeError::Configuration(_)));
    }

    #[test]
    fn test_wall_clock_populations_differ() {
        let mut a = create_population(&ontology(), 4, 2, &SeedSource::WallClock).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(20));
        let mut b = create_population(&ontology(), 4, 2, &SeedSource::WallClock).unwrap();

        let seeds_a: Vec<u64> = a.iter().map(|m| m.seed()).collect();
        let seeds_b: Vec<u64> = b.iter().map(|m| m.seed()).collect();
        assert_ne!(seeds_a, seeds_b);
        assert_ne!(walks(&mut a), walks(&mut b));
    }

    #[test]
    fn test_single_seed() {
        assert_eq!(SeedSource::Fixed(vec![7, 8]).single_seed(7).unwrap(), 7);
        assert!(matches!(
            SeedSource::Fixed(vec![]).single_seed(7),
            Err(LinkoscopeError::SeedMismatch { required: 1, supplied: 0 })
        ));
        assert!(SeedSource::WallClock.single_seed(7).unwrap() < 10_000_000);
    }

    #[test]
    fn test_fractional_seed() {
        assert_eq!(fractional_seed(1_700_000_000.25, 2), 25);
        assert_eq!(fractional_seed(12.5, 0), 0);
        assert_eq!(fractional_seed(3.0, 7), 0);
    }

    #[test]
    fn test_from_option() {
        assert_eq!(SeedSource::from_option(None), SeedSource::WallClock);
        assert_eq!(
            SeedSource::from_option(Some(vec![1])),
            SeedSource::Fixed(vec![1])
        );
    }
}
