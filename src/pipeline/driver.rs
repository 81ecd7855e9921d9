//! Entropy-distribution simulation driver.
//!
//! Pipeline flow:
//! NextOntology → population → (size × model × run) linkographs → entropy
//! samples → per-size statistics → ResultMatrix
//!
//! The same population is reused for every size. Before each run a model's
//! state is re-drawn from its own RNG, so runs of one model start from
//! different places while staying reproducible for a fixed seed list.

use crate::linko::{EntropyMetric, GraphEntropy};
use crate::markov::StochasticModel;
use crate::models::{
    LinkOntology, LinkoscopeError, NextOntology, Result, ResultMatrix, SimulationParams,
};
use crate::pipeline::aggregate::aggregate;
use crate::pool::{create_population, SeedSource};
use indicatif::{ProgressBar, ProgressStyle};
use ndarray::Array2;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Drives model populations through repeated linkograph simulations.
pub struct SimulationDriver<E = GraphEntropy> {
    metric: E,
    parallel: bool,
    progress: bool,
    cancel: Option<Arc<AtomicBool>>,
}

impl Default for SimulationDriver<GraphEntropy> {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationDriver<GraphEntropy> {
    /// Sequential driver using graph entropy, without a progress bar.
    pub fn new() -> Self {
        Self::with_metric(GraphEntropy)
    }
}

impl<E: EntropyMetric + Sync> SimulationDriver<E> {
    pub fn with_metric(metric: E) -> Self {
        Self {
            metric,
            parallel: false,
            progress: false,
            cancel: None,
        }
    }

    /// Simulate the models of one size in parallel.
    ///
    /// Each model still runs its runs in order on its own RNG, so results
    /// match sequential mode exactly.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Show a progress bar over sizes.
    pub fn progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    /// Flag checked between sizes; once set, the run stops with `Cancelled`.
    pub fn cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Build a population from `next` and simulate it at every size.
    pub fn run(
        &self,
        next: &NextOntology,
        link: &LinkOntology,
        params: &SimulationParams,
        seeds: &SeedSource,
    ) -> Result<ResultMatrix> {
        params.validate()?;
        link.inner().validate()?;

        let mut models = create_population(next, params.model_count, params.precision, seeds)?;
        self.run_population(&mut models, link, params)
    }

    /// Simulate an existing population at every size of `params`.
    ///
    /// `params.model_count` is ignored in favour of `models.len()`.
    pub fn run_population<M: StochasticModel + Send>(
        &self,
        models: &mut [M],
        link: &LinkOntology,
        params: &SimulationParams,
    ) -> Result<ResultMatrix> {
        params.validate()?;
        if models.is_empty() {
            return Err(LinkoscopeError::Configuration(
                "population is empty".to_string(),
            ));
        }

        let sizes = params.sizes();
        let total = sizes.len();
        let mut results = ResultMatrix::zeros(sizes.clone());
        let start = Instant::now();

        info!(
            sizes = total,
            models = models.len(),
            runs = params.run_count,
            parallel = self.parallel,
            "Starting entropy simulation"
        );

        let pb = self.progress_bar(total as u64)?;

        for (index, &size) in sizes.iter().enumerate() {
            if self.is_cancelled() {
                pb.abandon_with_message("cancelled");
                return Err(LinkoscopeError::Cancelled {
                    completed: index,
                    total,
                });
            }

            let samples = self.sample_size(models, link, size, params.run_count)?;
            let stats = aggregate(size, &samples)?;
            results.set(index, &stats)?;

            info!(
                size,
                mean = format!("{:.4}", stats.mean),
                std = format!("{:.4}", stats.std),
                "Size complete"
            );

            pb.inc(1);
            pb.set_message(format!("size {size}"));
        }

        pb.finish_with_message("done");

        info!(
            sizes = total,
            runtime = format!("{:.1}s", start.elapsed().as_secs_f64()),
            "Entropy simulation complete"
        );

        Ok(results)
    }

    /// Entropy samples of every (model, run) pair at one size.
    pub fn sample_size<M: StochasticModel + Send>(
        &self,
        models: &mut [M],
        link: &LinkOntology,
        size: usize,
        runs: usize,
    ) -> Result<Array2<f64>> {
        let rows: Vec<Vec<f64>> = if self.parallel {
            models
                .par_iter_mut()
                .enumerate()
                .map(|(i, model)| self.sample_model(i, model, link, size, runs))
                .collect::<Result<_>>()?
        } else {
            models
                .iter_mut()
                .enumerate()
                .map(|(i, model)| self.sample_model(i, model, link, size, runs))
                .collect::<Result<_>>()?
        };

        let mut samples = Array2::<f64>::zeros((rows.len(), runs));
        for (i, row) in rows.into_iter().enumerate() {
            for (j, value) in row.into_iter().enumerate() {
                samples[[i, j]] = value;
            }
        }
        Ok(samples)
    }

    /// `runs` entropy samples from one model.
    fn sample_model<M: StochasticModel>(
        &self,
        model_index: usize,
        model: &mut M,
        link: &LinkOntology,
        size: usize,
        runs: usize,
    ) -> Result<Vec<f64>> {
        let mut values = Vec::with_capacity(runs);
        for run in 0..runs {
            let state = model.draw_state();
            model
                .assign_state(state)
                .map_err(|e| LinkoscopeError::simulation(size, model_index, run, e))?;

            let linko = model
                .produce_linkograph(size, link)
                .map_err(|e| LinkoscopeError::simulation(size, model_index, run, e))?;

            let entropy = self
                .metric
                .entropy(&linko)
                .map_err(|e| LinkoscopeError::simulation(size, model_index, run, e))?;
            values.push(entropy);
        }

        debug!(size, model = model_index, runs, "Model sampled");
        Ok(values)
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    fn progress_bar(&self, len: u64) -> Result<ProgressBar> {
        if !self.progress {
            return Ok(ProgressBar::hidden());
        }
        let pb = ProgressBar::new(len);
        let style = ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} ({percent}%) {msg}")
            .map_err(|e| LinkoscopeError::Internal(format!("progress template: {e}")))?
            .progress_chars("##-");
        pb.set_style(style);
        Ok(pb)
    }
}

/// Run a study with the default graph-entropy driver.
pub fn gen_single_ontology_stats(
    next: &NextOntology,
    link: &LinkOntology,
    params: &SimulationParams,
    seeds: &SeedSource,
) -> Result<ResultMatrix> {
    SimulationDriver::new().run(next, link, params, seeds)
}
