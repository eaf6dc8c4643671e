mod commands;
mod input;
mod logging;
mod output;
mod store;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::deal::{EvaluateArgs, RecallArgs};

/// Rental property deal evaluation
#[derive(Parser)]
#[command(
    name = "rdeal",
    version,
    about = "Evaluate rental property deals",
    long_about = "Computes mortgage payment, monthly cash flow, cap rate and \
                  cash-on-cash return for a rental purchase with decimal \
                  precision, and rates the deal Strong, Decent, Borderline \
                  or Negative."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log debug detail to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a deal from flags, a JSON file, or piped JSON
    Evaluate(EvaluateArgs),
    /// Re-evaluate the inputs saved by `evaluate --save-last`
    Recall(RecallArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
    Report,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{}: {}", "warning".yellow().bold(), e);
    }

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Evaluate(args) => commands::deal::run_evaluate(args),
        Commands::Recall(args) => commands::deal::run_recall(args),
        Commands::Version => {
            println!("rdeal {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
