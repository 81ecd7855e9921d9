//! Reduction of an entropy sample matrix to per-size statistics.
//!
//! This is a two-level (nested) statistic. Samples are first averaged over
//! runs within each model; the reported mean and standard deviation are then
//! taken over those per-model means. Run-to-run variance inside a model does
//! not enter the standard deviation, so it is NOT the flat standard
//! deviation of all `models × runs` samples.

use crate::models::{LinkoscopeError, Result, SizeStats};
use ndarray::{Array1, Array2, Axis};

/// Mean entropy of each model over its runs (one value per row).
pub fn per_model_means(samples: &Array2<f64>) -> Result<Array1<f64>> {
    let (models, runs) = samples.dim();
    if models == 0 || runs == 0 {
        return Err(LinkoscopeError::Internal(format!(
            "cannot aggregate an empty {models}x{runs} sample matrix"
        )));
    }
    samples
        .mean_axis(Axis(1))
        .ok_or_else(|| LinkoscopeError::Internal("sample matrix has no runs".to_string()))
}

/// Mean and population standard deviation (ddof = 0) of per-model means.
pub fn aggregate(size: usize, samples: &Array2<f64>) -> Result<SizeStats> {
    let means = per_model_means(samples)?;
    let mean = means
        .mean()
        .ok_or_else(|| LinkoscopeError::Internal("no per-model means".to_string()))?;
    let std = means.std(0.0);
    Ok(SizeStats { size, mean, std })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_two_level_statistic() {
        // model 0 runs: 1, 2, 3 → mean 2; model 1 runs: 4, 6, 8 → mean 6
        let samples = array![[1.0, 2.0, 3.0], [4.0, 6.0, 8.0]];
        let stats = aggregate(5, &samples).unwrap();

        assert_eq!(stats.size, 5);
        assert!((stats.mean - 4.0).abs() < 1e-12);
        assert!((stats.std - 2.0).abs() < 1e-12);

        // Flat std over the six samples is sqrt(34 / 6) ≈ 2.38
        let flat = samples.std(0.0);
        assert!((flat - (34.0f64 / 6.0).sqrt()).abs() < 1e-12);
        assert!((stats.std - flat).abs() > 0.1);
    }

    #[test]
    fn test_within_model_variance_ignored() {
        // Both models average 0.5, but with very different spreads
        let samples = array![[0.0, 1.0, 0.5], [0.5, 0.5, 0.5]];
        let stats = aggregate(3, &samples).unwrap();
        assert!((stats.mean - 0.5).abs() < 1e-12);
        assert!(stats.std.abs() < 1e-12);
    }

    #[test]
    fn test_single_model_has_zero_std() {
        let samples = array![[0.3, 0.9]];
        let stats = aggregate(2, &samples).unwrap();
        assert!((stats.mean - 0.6).abs() < 1e-12);
        assert_eq!(stats.std, 0.0);
    }

    #[test]
    fn test_per_model_means() {
        let samples = array![[1.0, 3.0], [2.0, 2.0], [0.0, 10.0]];
        assert_eq!(per_model_means(&samples).unwrap(), array![2.0, 2.0, 5.0]);
    }

    #[test]
    fn test_empty_matrix_rejected() {
        let empty = Array2::<f64>::zeros((0, 3));
        assert!(matches!(aggregate(2, &empty), Err(LinkoscopeError::Internal(_))));
        let no_runs = Array2::<f64>::zeros((2, 0));
        assert!(matches!(aggregate(2, &no_runs), Err(LinkoscopeError::Internal(_))));
    }
}
