//! linkoscope CLI - graph Shannon entropy across random Markov models.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use linkoscope::markov::MarkovModel;
use linkoscope::report::{render_table, render_transitions, write_results};
use linkoscope::pipeline::DEFAULT_TIME_SIZE;
use linkoscope::{
    derive_link_model, Config, LinkOntology, LinkoscopeError, NextOntology, SeedSource,
    SimulationDriver,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "linkoscope")]
#[command(version)]
#[command(about = "Graph Shannon entropy of linkographs from random Markov models")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Mean and standard deviation of entropy per linkograph size
    Stats {
        /// Ontology file for producing the next state
        #[arg(value_name = "ONTOLOGY_NEXT")]
        ont_next: PathBuf,

        /// Ontology file for linking nodes
        #[arg(value_name = "ONTOLOGY_LINK")]
        ont_link: PathBuf,

        /// Minimum size of linkographs [default: 2]
        #[arg(short = 'm', long)]
        minimum: Option<usize>,

        /// Maximum size of linkographs, excluded [default: 100]
        #[arg(short = 'M', long)]
        maximum: Option<usize>,

        /// Step size of linkographs [default: 1]
        #[arg(short = 's', long)]
        step: Option<usize>,

        /// Number of generating models [default: 100]
        #[arg(short = 'n', long = "model-num", alias = "modelNum")]
        model_num: Option<usize>,

        /// Number of runs per model and size [default: 100]
        #[arg(short = 'r', long)]
        runs: Option<usize>,

        /// Decimal places of transition probabilities [default: 2]
        #[arg(short = 'p', long)]
        precision: Option<u32>,

        /// Model seed (repeat once per model for a reproducible study)
        #[arg(long = "seed")]
        seeds: Vec<u64>,

        /// Simulate the models of each size in parallel
        #[arg(long)]
        parallel: bool,

        /// Write results to this file (.csv for CSV, otherwise JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Hide the progress bar
        #[arg(long)]
        no_progress: bool,
    },

    /// Fit a link-predictor model from a linkograph of a random generating model
    Derive {
        /// Ontology file of the generating model
        #[arg(value_name = "ONTOLOGY")]
        ontology: PathBuf,

        /// Size of the linkograph to fit from
        #[arg(long, default_value = "100")]
        size: usize,

        /// Decimal places of the link-predictor probabilities
        #[arg(short = 'p', long, default_value = "2")]
        precision: u32,

        /// Digits of the wall-clock fraction used for seeding
        #[arg(long, default_value_t = DEFAULT_TIME_SIZE)]
        time_size: u32,

        /// Seed of the derived model (wall clock when omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Seed of the generating model (wall clock when omitted)
        #[arg(long)]
        model_seed: Option<u64>,
    },

    /// Validate configuration file
    Validate,

    /// Show example configuration
    Example,
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("warning: a global tracing subscriber was already set");
    }
}

fn print_example_config() {
    let example = r#"# linkoscope configuration file

[simulation]
minimum = 2        # smallest linkograph size
maximum = 100      # largest size, excluded
step = 1
models = 100       # generating models in the population
runs = 100         # runs per model and size
precision = 2      # decimal places of transition probabilities
parallel = false
# Fixed seeds (one per model) make a study reproducible;
# without them seeds are derived from the wall clock.
# seeds = [1, 2, 3]

[output]
# path = "output/entropy.csv"
progress = true
"#;
    println!("{example}");
}

fn load_config(path: Option<&std::path::Path>) -> Result<Config> {
    Config::load_or_default(path)
        .map_err(LinkoscopeError::from)
        .with_context(|| format!("Failed to load config from {path:?}"))
}

/// Exit status for a failed command: 2 for bad input, 1 otherwise.
fn exit_status(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<LinkoscopeError>() {
        Some(e) if e.is_input_error() => 2,
        _ => 1,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(exit_status(&err))
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Example => {
            print_example_config();
        }

        Commands::Validate => {
            let config = load_config(cli.config.as_deref())?;
            let params = config.simulation.params();
            params.validate().context("Invalid simulation parameters")?;

            if let Some(seeds) = &config.simulation.seeds {
                if seeds.len() < params.model_count {
                    warn!(
                        seeds = seeds.len(),
                        models = params.model_count,
                        "Fewer seeds than models; stats would fail"
                    );
                }
            }

            info!("Configuration is valid");
            info!(
                "  Sizes: {} ({}..{} step {})",
                params.sizes().len(),
                params.min_size,
                params.max_size,
                params.step_size
            );
            info!(
                "  Models: {} x {} runs, precision {}",
                params.model_count, params.run_count, params.precision
            );
            info!(
                "  Seeds: {}",
                if config.simulation.seeds.is_some() { "fixed" } else { "wall clock" }
            );
        }

        Commands::Stats {
            ont_next,
            ont_link,
            minimum,
            maximum,
            step,
            model_num,
            runs,
            precision,
            seeds,
            parallel,
            output,
            no_progress,
        } => {
            let mut config = load_config(cli.config.as_deref())?;

            // CLI flags override the config file
            let sim = &mut config.simulation;
            if let Some(v) = minimum {
                sim.minimum = v;
            }
            if let Some(v) = maximum {
                sim.maximum = v;
            }
            if let Some(v) = step {
                sim.step = v;
            }
            if let Some(v) = model_num {
                sim.models = v;
            }
            if let Some(v) = runs {
                sim.runs = v;
            }
            if let Some(v) = precision {
                sim.precision = v;
            }
            if !seeds.is_empty() {
                sim.seeds = Some(seeds);
            }
            sim.parallel |= parallel;
            if output.is_some() {
                config.output.path = output;
            }
            if no_progress {
                config.output.progress = false;
            }

            let next = NextOntology::from_file(&ont_next)
                .with_context(|| format!("Failed to load next ontology {ont_next:?}"))?;
            let link = LinkOntology::from_file(&ont_link)
                .with_context(|| format!("Failed to load link ontology {ont_link:?}"))?;

            let params = config.simulation.params();
            let seed_source = SeedSource::from_option(config.simulation.seeds.clone());

            let cancel = Arc::new(AtomicBool::new(false));
            let driver = SimulationDriver::new()
                .parallel(config.simulation.parallel)
                .progress(config.output.progress)
                .cancel_flag(Arc::clone(&cancel));

            let signal_flag = Arc::clone(&cancel);
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    warn!("Interrupt received, stopping after the current size");
                    signal_flag.store(true, Ordering::Relaxed);
                }
            });

            let results = tokio::task::spawn_blocking(move || {
                driver.run(&next, &link, &params, &seed_source)
            })
            .await
            .context("Simulation task failed")??;

            println!("\n=== Graph Shannon Entropy vs. Linkograph Size ===");
            print!("{}", render_table(&results));

            if let Some(path) = &config.output.path {
                write_results(path, &results)
                    .with_context(|| format!("Failed to write results to {path:?}"))?;
                println!("Output:      {path:?}");
            }
        }

        Commands::Derive {
            ontology,
            size,
            precision,
            time_size,
            seed,
            model_seed,
        } => {
            let next = NextOntology::from_file(&ontology)
                .with_context(|| format!("Failed to load ontology {ontology:?}"))?;

            let model_seed = match model_seed {
                Some(s) => s,
                None => SeedSource::WallClock.single_seed(time_size)?,
            };
            let mut model = MarkovModel::from_ontology(next, precision, model_seed)
                .context("Failed to build generating model")?;

            let seeds = SeedSource::from_option(seed.map(|s| vec![s]));
            let derived = derive_link_model(size, &mut model, precision, time_size, &seeds)?;

            println!("\n=== Generating Model (seed {}) ===", model.seed());
            print!("{}", render_transitions(&model));
            println!("\n=== Link Predictor (seed {}, {:?}) ===", derived.seed(), derived.method());
            print!("{}", render_transitions(&derived));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_exit_status_for_input_errors() {
        let err = anyhow::Error::new(LinkoscopeError::SeedMismatch {
            required: 5,
            supplied: 3,
        })
        .context("Simulation failed");
        assert_eq!(exit_status(&err), 2);

        let missing = load_config(Some(std::path::Path::new("/nonexistent/linkoscope.toml")))
            .unwrap_err();
        assert_eq!(exit_status(&missing), 2);
    }

    #[test]
    fn test_exit_status_for_other_errors() {
        let err = anyhow::Error::new(LinkoscopeError::Cancelled {
            completed: 1,
            total: 4,
        });
        assert_eq!(exit_status(&err), 1);
        assert_eq!(exit_status(&anyhow!("task panicked")), 1);
    }
}
