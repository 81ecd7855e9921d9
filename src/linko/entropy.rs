//! Graph Shannon entropy of a linkograph.
//!
//! The link density `p = links / (n (n - 1) / 2)` is treated as the
//! probability of a node pair being linked; the entropy is the binary
//! Shannon entropy of `p`, in bits.

use crate::linko::Linkograph;
use crate::models::EntropyError;

/// A scalar metric over linkographs.
pub trait EntropyMetric {
    fn entropy(&self, linko: &Linkograph) -> Result<f64, EntropyError>;
}

/// Graph Shannon entropy.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphEntropy;

impl EntropyMetric for GraphEntropy {
    fn entropy(&self, linko: &Linkograph) -> Result<f64, EntropyError> {
        let possible = linko.max_links();
        if possible == 0 {
            return Err(EntropyError::TooFewNodes(linko.len()));
        }
        let p = linko.link_count() as f64 / possible as f64;
        Ok(binary_entropy(p))
    }
}

/// Shannon entropy (bits) of a Bernoulli(`p`) variable.
pub fn binary_entropy(p: f64) -> f64 {
    if p <= 0.0 || p >= 1.0 {
        return 0.0;
    }
    let q = 1.0 - p;
    -(p * p.log2() + q * q.log2())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("n{i}")).collect()
    }

    #[test]
    fn test_binary_entropy() {
        assert_eq!(binary_entropy(0.0), 0.0);
        assert_eq!(binary_entropy(1.0), 0.0);
        assert!((binary_entropy(0.5) - 1.0).abs() < 1e-12);
        assert!((binary_entropy(0.25) - binary_entropy(0.75)).abs() < 1e-12);
        assert!((binary_entropy(0.25) - 0.811_278_124_459_132_8).abs() < 1e-12);
    }

    #[test]
    fn test_half_density_is_one_bit() {
        // 4 nodes → 6 possible links, 3 present
        let linko = Linkograph::from_links(&labels(4), &[(0, 1), (1, 2), (2, 3)]);
        let h = GraphEntropy.entropy(&linko).unwrap();
        assert!((h - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_and_full_graphs() {
        let empty = Linkograph::from_links(&labels(3), &[]);
        assert_eq!(GraphEntropy.entropy(&empty).unwrap(), 0.0);

        let full = Linkograph::from_links(&labels(3), &[(0, 1), (0, 2), (1, 2)]);
        assert_eq!(GraphEntropy.entropy(&full).unwrap(), 0.0);
    }

    #[test]
    fn test_too_few_nodes() {
        let single = Linkograph::from_links(&labels(1), &[]);
        assert!(matches!(
            GraphEntropy.entropy(&single),
            Err(EntropyError::TooFewNodes(1))
        ));
    }
}
