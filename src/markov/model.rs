//! Markov models over an ontology's classes.
//!
//! A model owns its random source; nothing is shared between models, so a
//! population can be driven from several threads without locking.

use crate::linko::Linkograph;
use crate::models::{LinkOntology, ModelError, NextOntology};
use ndarray::{Array2, ArrayView1, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Precision is capped so `10^precision` fits comfortably in an f64 mantissa.
pub const MAX_PRECISION: u32 = 15;

const ROW_TOLERANCE: f64 = 1e-9;

/// What a stochastic model must offer to the simulation driver.
pub trait StochasticModel {
    /// Number of classes (states).
    fn class_count(&self) -> usize;

    /// Current state index.
    fn state(&self) -> usize;

    /// Set the current state.
    fn assign_state(&mut self, state: usize) -> Result<(), ModelError>;

    /// Draw a state uniformly from `[0, class_count)` using the model's own RNG.
    fn draw_state(&mut self) -> usize;

    /// Produce a linkograph of `size` nodes, linked according to `ontology`.
    fn produce_linkograph(
        &mut self,
        size: usize,
        ontology: &LinkOntology,
    ) -> Result<Linkograph, ModelError>;

    /// Ontology the model was built from.
    fn ontology(&self) -> &NextOntology;

    /// Decimal places of the transition probabilities.
    fn precision(&self) -> u32;
}

/// How a model's transition matrix was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelMethod {
    /// Random transitions over the ontology's classes
    Ontology,
    /// Fitted from the links of an observed linkograph
    LinkPredictor { link_num: usize },
}

/// A first-order Markov chain over sorted class names.
#[derive(Debug, Clone)]
pub struct MarkovModel {
    classes: Vec<String>,
    transitions: Array2<f64>,
    state: usize,
    ontology: NextOntology,
    precision: u32,
    seed: u64,
    method: ModelMethod,
    rng: StdRng,
}

impl MarkovModel {
    /// Random model over the classes of `ontology`.
    ///
    /// Row `i` is a random split of `10^precision` units over the classes
    /// that class `i` relates to, so every other transition is zero. A class
    /// with no known successors spreads its row over all classes. Every
    /// probability is a multiple of `10^-precision` and rows sum to 1.
    pub fn from_ontology(
        ontology: NextOntology,
        precision: u32,
        seed: u64,
    ) -> Result<Self, ModelError> {
        let classes = ontology.inner().classes();
        let n = classes.len();
        if n == 0 {
            return Err(ModelError::NoClasses);
        }

        let precision = precision.min(MAX_PRECISION);
        let units = 10u64.pow(precision);
        let mut rng = StdRng::seed_from_u64(seed);

        let mut transitions = Array2::<f64>::zeros((n, n));
        for (class, mut row) in classes.iter().zip(transitions.axis_iter_mut(Axis(0))) {
            let targets = successors(&ontology, class, n);
            let parts = random_partition(units, targets.len(), &mut rng);
            for (target, part) in targets.into_iter().zip(parts) {
                row[target] = part as f64 / units as f64;
            }
        }

        let state = rng.gen_range(0..n);

        Ok(Self {
            classes,
            transitions,
            state,
            ontology,
            precision,
            seed,
            method: ModelMethod::Ontology,
            rng,
        })
    }

    /// Model with a given transition matrix.
    ///
    /// The matrix must be square over the ontology's classes with rows
    /// summing to 1.
    pub fn from_transitions(
        ontology: NextOntology,
        transitions: Array2<f64>,
        precision: u32,
        seed: u64,
        method: ModelMethod,
    ) -> Result<Self, ModelError> {
        let classes = ontology.inner().classes();
        let n = classes.len();
        if n == 0 {
            return Err(ModelError::NoClasses);
        }

        let (rows, cols) = transitions.dim();
        if rows != n || cols != n {
            return Err(ModelError::ShapeMismatch {
                rows,
                cols,
                classes: n,
            });
        }
        for (i, row) in transitions.axis_iter(Axis(0)).enumerate() {
            let sum = row.sum();
            if (sum - 1.0).abs() > ROW_TOLERANCE || row.iter().any(|&p| p < 0.0) {
                return Err(ModelError::InvalidRow { row: i, sum });
            }
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let state = rng.gen_range(0..n);

        Ok(Self {
            classes,
            transitions,
            state,
            ontology,
            precision: precision.min(MAX_PRECISION),
            seed,
            method,
            rng,
        })
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn transitions(&self) -> &Array2<f64> {
        &self.transitions
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn method(&self) -> ModelMethod {
        self.method
    }

    /// Move to the next state by sampling the current transition row.
    fn step(&mut self) -> usize {
        let row = self.transitions.index_axis(Axis(0), self.state);
        let r: f64 = self.rng.gen();
        self.state = sample_row(row, r);
        self.state
    }

    /// Class indices visited over `len` steps, starting at the current state.
    pub fn walk(&mut self, len: usize) -> Vec<usize> {
        let mut states = Vec::with_capacity(len);
        for _ in 0..len {
            states.push(self.state);
            self.step();
        }
        states
    }
}

impl StochasticModel for MarkovModel {
    fn class_count(&self) -> usize {
        self.classes.len()
    }

    fn state(&self) -> usize {
        self.state
    }

    fn assign_state(&mut self, state: usize) -> Result<(), ModelError> {
        if state >= self.classes.len() {
            return Err(ModelError::InvalidState {
                state,
                classes: self.classes.len(),
            });
        }
        self.state = state;
        Ok(())
    }

    fn draw_state(&mut self) -> usize {
        self.rng.gen_range(0..self.classes.len())
    }

    fn produce_linkograph(
        &mut self,
        size: usize,
        ontology: &LinkOntology,
    ) -> Result<Linkograph, ModelError> {
        if size == 0 {
            return Err(ModelError::EmptyLinkograph);
        }
        let labels: Vec<&str> = self
            .walk(size)
            .into_iter()
            .map(|s| self.classes[s].as_str())
            .collect();
        Ok(Linkograph::from_labels(&labels, ontology))
    }

    fn ontology(&self) -> &NextOntology {
        &self.ontology
    }

    fn precision(&self) -> u32 {
        self.precision
    }
}

/// Index chosen by `r ∈ [0, 1)` on the cumulative distribution of `row`.
fn sample_row(row: ArrayView1<'_, f64>, r: f64) -> usize {
    let mut cumulative = 0.0;
    let mut last_positive = 0;
    for (j, &p) in row.iter().enumerate() {
        if p <= 0.0 {
            continue;
        }
        cumulative += p;
        last_positive = j;
        if r < cumulative {
            return j;
        }
    }
    // Rounding left the cumulative sum just under r
    last_positive
}

/// Sorted, distinct class indices `class` may move to under `ontology`.
///
/// Falls back to every class when the relation list names no known class.
fn successors(ontology: &NextOntology, class: &str, n: usize) -> Vec<usize> {
    let ontology = ontology.inner();
    let mut targets: Vec<usize> = ontology
        .related(class)
        .iter()
        .filter_map(|to| ontology.index_of(to))
        .collect();
    targets.sort_unstable();
    targets.dedup();
    if targets.is_empty() {
        (0..n).collect()
    } else {
        targets
    }
}

/// Split `units` into `parts` non-negative integers using sorted uniform cut points.
fn random_partition(units: u64, parts: usize, rng: &mut impl Rng) -> Vec<u64> {
    let mut cuts: Vec<u64> = (1..parts).map(|_| rng.gen_range(0..=units)).collect();
    cuts.sort_unstable();

    let mut result = Vec::with_capacity(parts);
    let mut previous = 0;
    for cut in cuts {
        result.push(cut - previous);
        previous = cut;
    }
    result.push(units - previous);
    result
}

/// Round a probability row to multiples of `1 / units` while keeping its sum at 1.
///
/// Largest-remainder apportionment; ties go to the lower index.
pub(crate) fn quantize_row(row: &[f64], units: u64) -> Vec<f64> {
    let scaled: Vec<f64> = row.iter().map(|p| p * units as f64).collect();
    let mut whole: Vec<u64> = scaled.iter().map(|s| s.floor() as u64).collect();
    let assigned: u64 = whole.iter().sum();
    let mut remaining = units.saturating_sub(assigned);

    let mut order: Vec<usize> = (0..row.len()).collect();
    order.sort_by(|&a, &b| {
        let ra = scaled[a] - scaled[a].floor();
        let rb = scaled[b] - scaled[b].floor();
        rb.partial_cmp(&ra)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    });
    for idx in order {
        if remaining == 0 {
            break;
        }
        whole[idx] += 1;
        remaining -= 1;
    }

    whole.into_iter().map(|w| w as f64 / units as f64).collect()
}
