//! Binary entrypoint for the `skillmesh` CLI.
//!
//! Every subcommand prints one pretty JSON document on stdout; `batch`
//! prints one compact JSON object per request line. Logs go to stderr.
//!
//! Exit codes: 0 = success, 1 = input or usage error, 3 = I/O error.

use std::io::Write;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use skillmesh_cli::batch;
use skillmesh_cli::commands::{self, Request, Workspace};
use skillmesh_cli::config::Config;
use skillmesh_cli::error::CliError;
use skillmesh_cli::records::RecordSource;

/// Instrumented ranking, search and indexing over candidate records.
#[derive(Parser)]
#[command(name = "skillmesh", about = "Instrumented candidate ranking algorithms")]
struct Cli {
    /// JSON file holding an array of candidates (default: built-in demo data).
    #[arg(long, global = true, conflicts_with = "synthetic")]
    records: Option<PathBuf>,

    /// Generate this many synthetic candidates instead of loading records.
    #[arg(long, global = true)]
    synthetic: Option<usize>,

    /// Seed for --synthetic.
    #[arg(long, global = true, default_value_t = 42)]
    seed: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank candidates by experience with max heap sort.
    Rank,

    /// Sort candidates with a chosen strategy and key.
    Sort {
        /// heap, merge or quick.
        #[arg(short, long, default_value = "merge")]
        strategy: String,

        /// experience, salary or name.
        #[arg(short, long, default_value = "experience")]
        by: String,
    },

    /// Find candidates whose resume mentions a keyword (case-sensitive).
    Search {
        #[arg(short, long)]
        keyword: String,
    },

    /// Build an AVL tree keyed by experience.
    Avl,

    /// Complete a skill prefix from the vocabulary.
    Autocomplete {
        #[arg(short, long, default_value = "")]
        prefix: String,
    },

    /// Build the skill co-occurrence graph.
    Network,

    /// Build the skill hash index, optionally looking up one label.
    Index {
        #[arg(short, long)]
        label: Option<String>,
    },

    /// Greedy shortlist under a salary budget.
    Shortlist {
        #[arg(short, long, allow_negative_numbers = true)]
        budget: i64,
    },

    /// Score every candidate against a demo job posting.
    Match {
        /// Job title, case-insensitive.
        #[arg(short, long)]
        job: String,
    },

    /// Run a file of JSON requests (one per line) concurrently.
    Batch {
        #[arg(short, long)]
        requests: PathBuf,
    },
}

impl Commands {
    fn into_request(self) -> Result<Request, CliError> {
        let request = match self {
            Commands::Rank => Request::Rank,
            Commands::Sort { strategy, by } => Request::Sort {
                strategy: strategy.parse()?,
                by: by.parse()?,
            },
            Commands::Search { keyword } => Request::Search { keyword },
            Commands::Avl => Request::Avl,
            Commands::Autocomplete { prefix } => Request::Autocomplete { prefix },
            Commands::Network => Request::Network,
            Commands::Index { label } => Request::Index { label },
            Commands::Shortlist { budget } => Request::Shortlist { budget },
            Commands::Match { job } => Request::Match { job },
            Commands::Batch { .. } => {
                return Err(CliError::Usage("batch is not a single request".to_string()))
            }
        };
        Ok(request)
    }
}

fn main() {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let exit_code = match run(cli) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("Error: {}", err);
            err.exit_code()
        }
    };
    process::exit(exit_code);
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = Config::from_env();
    let source = match (cli.records, cli.synthetic) {
        (Some(path), _) => RecordSource::File(path),
        (None, Some(count)) => RecordSource::Synthetic {
            count,
            seed: cli.seed,
        },
        (None, None) => RecordSource::Demo,
    };
    let workspace = Workspace::new(source.load()?);

    let mut stdout = std::io::stdout().lock();
    match cli.command {
        Commands::Batch { requests } => {
            let lines = batch::read_requests(&requests)?;
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .map_err(CliError::Runtime)?;
            let responses = runtime.block_on(batch::run(lines, Arc::new(workspace), &config));
            for response in responses {
                writeln!(stdout, "{}", response).map_err(CliError::Output)?;
            }
        }
        command => {
            let request = command.into_request()?;
            let response = commands::execute(&request, &workspace)?;
            let json = serde_json::to_string_pretty(&response)?;
            writeln!(stdout, "{}", json).map_err(CliError::Output)?;
        }
    }
    Ok(())
}
