use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use scatterscore::config::Config;
use scatterscore::output::terminal;
use scatterscore::pipeline::{load, project, score};

/// Scatterscore: category projections and discriminative term scores.
///
/// Places vocabulary terms in a 2D space derived from a precomputed category
/// projection, and ranks terms by how strongly they separate two groups of
/// documents.
#[derive(Parser)]
#[command(name = "scatterscore", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Project terms onto two dimensions of a category projection
    Project {
        /// Corpus JSON: { "terms", "categories", "documents" }
        #[arg(long)]
        corpus: PathBuf,

        /// Projection JSON: { "categories", "values" }, one row per category
        #[arg(long)]
        projection: PathBuf,

        /// Projection dimension used as the x axis
        #[arg(long, default_value = "0")]
        x_dim: usize,

        /// Projection dimension used as the y axis
        #[arg(long, default_value = "1")]
        y_dim: usize,

        /// Terms per direction (default: SCATTERSCORE_NUM_TERMS or 5)
        #[arg(long)]
        num_terms: Option<usize>,

        /// Print the full report as JSON instead of the terminal summary
        #[arg(long)]
        json: bool,
    },

    /// Score terms by credibility-adjusted TF-IDF between two category groups
    Score {
        /// Corpus JSON: { "terms", "categories", "documents" }
        #[arg(long)]
        corpus: PathBuf,

        /// Categories in the positive group
        #[arg(long, required = true, num_args = 1..)]
        positive: Vec<String>,

        /// Categories in the negative group
        #[arg(long, required = true, num_args = 1..)]
        negative: Vec<String>,

        /// Credibility smoothing strength (default: SCATTERSCORE_ETA or 1.0)
        #[arg(long)]
        eta: Option<f64>,

        /// Use raw counts instead of log(count + 0.5)
        #[arg(long)]
        no_sublinear: bool,

        /// Bootstrap with this many resamples (experimental, slow). A bare
        /// --bootstrap uses SCATTERSCORE_NUM_BOOTSTRAPS or 1000.
        #[arg(long, num_args = 0..=1)]
        bootstrap: Option<Option<usize>>,

        /// RNG seed for bootstrap resampling
        #[arg(long)]
        seed: Option<u64>,

        /// Terms to show in each direction
        #[arg(long, default_value = "20")]
        top: usize,

        /// Print every row as JSON instead of the terminal summary
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("scatterscore=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = Config::load()?;

    match cli.command {
        Commands::Project {
            corpus,
            projection,
            x_dim,
            y_dim,
            num_terms,
            json,
        } => {
            if let Some(n) = num_terms {
                config.num_terms = n;
            }
            let corpus = Arc::new(load::load_corpus(&corpus)?);
            let projection = load::load_category_matrix(&projection)?;

            let report = project::run(
                corpus,
                projection,
                &project::ProjectOptions {
                    x_dim,
                    y_dim,
                    num_terms: config.num_terms,
                },
            )?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!(
                    "{}",
                    format!(
                        "Projection on dimensions ({}, {}), {} terms",
                        report.x_dim,
                        report.y_dim,
                        report.term_projection.len()
                    )
                    .bold()
                );
                terminal::display_axes_labels(&report.axes_labels);
                terminal::display_nearest_terms(&report.nearest_terms);
            }
        }

        Commands::Score {
            corpus,
            positive,
            negative,
            eta,
            no_sublinear,
            bootstrap,
            seed,
            top,
            json,
        } => {
            if let Some(eta) = eta {
                config.eta = eta;
            }
            if no_sublinear {
                config.use_sublinear = false;
            }
            if seed.is_some() {
                config.seed = seed;
            }
            config.validate()?;

            let bootstrap = config.bootstrap_resamples(bootstrap);
            if let Some(n) = bootstrap {
                info!(resamples = n, "Bootstrap enabled");
                println!(
                    "{} bootstrap scoring is experimental and densifies both groups {} times.",
                    "Warning:".yellow(),
                    n
                );
            }

            let corpus = load::load_corpus(&corpus)?;
            let report = score::run(
                &corpus,
                &score::ScoreOptions {
                    positive,
                    negative,
                    eta: config.eta,
                    use_sublinear: config.use_sublinear,
                    bootstrap,
                    seed: config.seed,
                },
            )?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                match &report {
                    score::ScoreReport::Point { name, rows } => {
                        terminal::display_score_table(name, rows, top)
                    }
                    score::ScoreReport::Bootstrap { rows, .. } => {
                        terminal::display_bootstrap_table(rows, top)
                    }
                }
            }
        }
    }

    Ok(())
}
