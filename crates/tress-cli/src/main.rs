//! Tress CLI: simulation, benchmarking, and file inspection.

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

mod commands;

#[derive(Parser)]
#[command(name = "tress")]
#[command(version, about = "Tress: discrete elastic rod hair strand simulator")]
struct Cli {
    /// Logging verbosity (trace, debug, info, warn, error).
    #[arg(short, long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate strands from a HAIR file or a JSON input document.
    Simulate {
        /// Input strands (.hair or .json).
        #[arg(short, long)]
        input: String,

        /// Parameter file (.toml or .json). Overrides parameters in a JSON input.
        #[arg(short, long)]
        config: Option<String>,

        /// Output file (.hair or .json).
        #[arg(short, long)]
        output: Option<String>,

        /// Number of ticks to run instead of the configured duration.
        #[arg(short, long)]
        steps: Option<u64>,

        /// Material name from the built-in database.
        #[arg(short, long)]
        material: Option<String>,

        /// Resample every strand to this many vertices.
        #[arg(short, long)]
        resample: Option<usize>,

        /// Write a binary snapshot of the final state.
        #[arg(long)]
        snapshot: Option<String>,
    },

    /// Run benchmark suite.
    Benchmark {
        /// Which scenario to run (hanging_strand, curly_strand, strand_bundle, all).
        #[arg(short, long, default_value = "all")]
        scenario: String,

        /// Output CSV file path.
        #[arg(short, long)]
        output: Option<String>,

        /// Material name from the built-in database.
        #[arg(short, long)]
        material: Option<String>,
    },

    /// Write the strands of a benchmark scenario to a HAIR file.
    Generate {
        /// Scenario providing the strands.
        #[arg(short, long, default_value = "curly_strand")]
        scenario: String,

        /// Output HAIR file path.
        #[arg(short, long)]
        output: String,
    },

    /// Print the header and strand statistics of a HAIR file.
    Inspect {
        /// Path to a .hair file.
        path: String,
    },

    /// Print the contents of a binary state snapshot.
    Snapshot {
        /// Path to a snapshot written by `simulate --snapshot`.
        path: String,
    },

    /// Validate a HAIR file, parameter file or JSON input.
    Validate {
        /// Path to a .hair, .toml or .json file.
        path: String,
    },
}

fn parse_level(name: &str) -> Level {
    match name.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn main() {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(parse_level(&cli.log_level))
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Warning: could not install logger: {e}");
    }

    let result = match cli.command {
        Commands::Simulate {
            input,
            config,
            output,
            steps,
            material,
            resample,
            snapshot,
        } => commands::simulate(commands::SimulateArgs {
            input,
            config,
            output,
            steps,
            material,
            resample,
            snapshot,
        }),
        Commands::Benchmark {
            scenario,
            output,
            material,
        } => commands::benchmark(&scenario, output.as_deref(), material.as_deref()),
        Commands::Generate { scenario, output } => commands::generate(&scenario, &output),
        Commands::Inspect { path } => commands::inspect(&path),
        Commands::Snapshot { path } => commands::snapshot(&path),
        Commands::Validate { path } => commands::validate(&path),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
