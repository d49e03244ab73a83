//! # Solr Seed CLI (`seed`)
//!
//! Populates a Solr core with the benchmark corpus.
//!
//! ## Usage
//!
//! ```bash
//! seed --config ./config/seed.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `seed run` | Provision schema, optionally reset, generate and load |
//! | `seed schema` | Declare the document fields only |
//! | `seed reset` | Delete every document in the core |
//! | `seed generate` | Write the corpus as JSON, no network |
//! | `seed count` | Print the number of documents in the core |
//! | `seed profiles` | List generation profiles |
//!
//! Logs go to stderr and honour `RUST_LOG`; the run summary goes to stdout.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use solr_seed::config::{self, SeedConfig};
use solr_seed::export;
use solr_seed::index::SolrClient;
use solr_seed::profile::{Profile, PROFILE_NAMES};
use solr_seed::progress::ProgressMode;
use solr_seed::seed;

/// Solr Seed: fills a Solr core with golden and noise documents for
/// search benchmarks.
#[derive(Parser)]
#[command(
    name = "seed",
    about = "Seed a Solr core with a benchmark corpus",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/seed.toml`, falling back to built-in defaults
    /// when that file does not exist. A path given here must exist.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override `index.base_url`.
    #[arg(long, global = true)]
    url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the whole pipeline.
    ///
    /// Declares the schema, wipes the core when the profile or `--reset`
    /// asks for it, then loads golden records followed by noise. Batch
    /// failures are reported but never change the exit status.
    Run {
        #[command(flatten)]
        corpus: CorpusArgs,

        /// Documents per update request.
        #[arg(long)]
        batch_size: Option<usize>,

        /// Delete every document before loading.
        #[arg(long, conflicts_with = "no_reset")]
        reset: bool,

        /// Keep existing documents even if the profile resets.
        #[arg(long)]
        no_reset: bool,

        /// Count documents after loading.
        #[arg(long)]
        verify: bool,

        /// Progress output on stderr. Defaults to `human` on a TTY.
        #[arg(long, value_enum)]
        progress: Option<ProgressMode>,
    },

    /// Declare the document fields. Safe to repeat.
    Schema,

    /// Delete every document in the core and commit.
    Reset,

    /// Generate the corpus and write it as JSON without contacting Solr.
    Generate {
        #[command(flatten)]
        corpus: CorpusArgs,

        /// Output file. Writes to stdout when omitted.
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Print the number of documents in the core.
    Count,

    /// List generation profiles.
    Profiles,
}

#[derive(clap::Args)]
struct CorpusArgs {
    /// Total number of documents, golden records included.
    #[arg(long)]
    total: Option<usize>,

    /// Generation profile (`classic`, `extended`).
    #[arg(long)]
    profile: Option<String>,

    /// RNG seed for a reproducible corpus.
    #[arg(long)]
    seed: Option<u64>,
}

impl CorpusArgs {
    fn apply(&self, cfg: &mut SeedConfig) {
        if let Some(total) = self.total {
            cfg.run.total_documents = total;
        }
        if let Some(profile) = &self.profile {
            cfg.run.profile = profile.clone();
        }
        if let Some(seed) = self.seed {
            cfg.run.seed = Some(seed);
        }
    }
}

const DEFAULT_CONFIG_PATH: &str = "./config/seed.toml";

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(atty::is(atty::Stream::Stderr))
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    // Commands that don't require config
    if let Commands::Profiles = cli.command {
        println!("{:<12} {:<6} DESCRIPTION", "PROFILE", "RESET");
        for name in PROFILE_NAMES {
            if let Some(profile) = Profile::by_name(name) {
                println!(
                    "{:<12} {:<6} {}",
                    profile.name, profile.reset_on_start, profile.description
                );
            }
        }
        return Ok(());
    }

    let now = chrono::Utc::now();
    let mut cfg = match &cli.config {
        Some(path) => config::load_config(path, now)?,
        None => config::load_or_default(Path::new(DEFAULT_CONFIG_PATH), now)?,
    };
    if let Some(url) = &cli.url {
        cfg.index.base_url = url.clone();
    }

    match cli.command {
        Commands::Run {
            corpus,
            batch_size,
            reset,
            no_reset,
            verify,
            progress,
        } => {
            corpus.apply(&mut cfg);
            if let Some(size) = batch_size {
                cfg.run.batch_size = size;
            }
            if reset {
                cfg.run.index_reset = Some(true);
            }
            if no_reset {
                cfg.run.index_reset = Some(false);
            }
            if verify {
                cfg.run.verify = true;
            }
            cfg.validate(now)?;

            let index = SolrClient::new(&cfg.index)?;
            let reporter = progress
                .unwrap_or_else(ProgressMode::default_for_tty)
                .reporter();
            let summary =
                seed::run_seed(&cfg, &index, reporter.as_ref(), now).await?;
            seed::print_summary(&summary);
        }
        Commands::Schema => {
            cfg.validate(now)?;
            let index = SolrClient::new(&cfg.index)?;
            seed::run_schema(&index).await;
        }
        Commands::Reset => {
            cfg.validate(now)?;
            let index = SolrClient::new(&cfg.index)?;
            seed::run_reset(&index).await?;
        }
        Commands::Generate { corpus, out } => {
            corpus.apply(&mut cfg);
            cfg.validate(now)?;
            export::run_generate(&cfg, out.as_deref(), now)?;
        }
        Commands::Count => {
            cfg.validate(now)?;
            let index = SolrClient::new(&cfg.index)?;
            seed::run_count(&index).await?;
        }
        Commands::Profiles => {
            // Handled above (before config loading)
            unreachable!()
        }
    }

    Ok(())
}
