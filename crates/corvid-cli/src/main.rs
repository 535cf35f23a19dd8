//! Corvid MIR tool
//!
//! Inspects, validates and converts serialized MIR function bodies.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod io;

use io::Format;

#[derive(Parser)]
#[command(name = "corvid-mir")]
#[command(about = "Inspect and convert Corvid MIR bodies", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a body as a readable listing
    Print {
        /// Input file
        file: PathBuf,
        /// Input format (defaults to the file extension)
        #[arg(short, long, value_enum)]
        format: Option<Format>,
    },

    /// Validate one or more bodies
    Check {
        /// Input files
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Input format (defaults to each file's extension)
        #[arg(short, long, value_enum)]
        format: Option<Format>,
        /// Report results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Convert a body between the binary and JSON encodings
    Convert {
        /// Input file
        input: PathBuf,
        /// Output file
        output: PathBuf,
        /// Input format (defaults to the input extension)
        #[arg(long, value_enum)]
        from: Option<Format>,
        /// Output format (defaults to the output extension)
        #[arg(long, value_enum)]
        to: Option<Format>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    match cli.command {
        Commands::Print { file, format } => commands::print::execute(&file, format),
        Commands::Check {
            files,
            format,
            json,
        } => {
            let all_ok = commands::check::execute(&files, format, json)?;
            if !all_ok {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Convert {
            input,
            output,
            from,
            to,
        } => commands::convert::execute(&input, &output, from, to),
    }
}
