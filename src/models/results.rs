//! Result types for entropy-distribution studies.

use crate::models::{LinkoscopeError, Result};
use ndarray::{Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

/// Aggregated entropy statistics for one linkograph size.
///
/// `std` is the spread of per-model mean entropies, not of the raw samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeStats {
    /// Linkograph size (node count)
    pub size: usize,
    /// Mean over models of each model's mean entropy
    pub mean: f64,
    /// Population standard deviation over models of each model's mean entropy
    pub std: f64,
}

/// One row per linkograph size, columns `(mean, std)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultMatrix {
    sizes: Vec<usize>,
    values: Array2<f64>,
}

impl ResultMatrix {
    pub const MEAN: usize = 0;
    pub const STD: usize = 1;

    /// Zero-filled matrix for the given sizes.
    pub fn zeros(sizes: Vec<usize>) -> Self {
        let rows = sizes.len();
        Self {
            sizes,
            values: Array2::zeros((rows, 2)),
        }
    }

    /// Store the statistics of the `index`-th size.
    pub fn set(&mut self, index: usize, stats: &SizeStats) -> Result<()> {
        if self.sizes.get(index) != Some(&stats.size) {
            return Err(LinkoscopeError::Internal(format!(
                "row {index} does not hold size {}",
                stats.size
            )));
        }
        self.values[[index, Self::MEAN]] = stats.mean;
        self.values[[index, Self::STD]] = stats.std;
        Ok(())
    }

    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    /// The raw `(sizes × 2)` matrix.
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn shape(&self) -> (usize, usize) {
        self.values.dim()
    }

    pub fn means(&self) -> ArrayView1<'_, f64> {
        self.values.index_axis(Axis(1), Self::MEAN)
    }

    pub fn stds(&self) -> ArrayView1<'_, f64> {
        self.values.index_axis(Axis(1), Self::STD)
    }

    pub fn row(&self, index: usize) -> Option<SizeStats> {
        let size = *self.sizes.get(index)?;
        Some(SizeStats {
            size,
            mean: self.values[[index, Self::MEAN]],
            std: self.values[[index, Self::STD]],
        })
    }

    /// Rows as [`SizeStats`], in size order.
    pub fn rows(&self) -> Vec<SizeStats> {
        (0..self.sizes.len()).filter_map(|i| self.row(i)).collect()
    }
}
