use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use datalog_plotter::{plot, Datalog, Evaluator, MissingFieldPolicy, PlotConfig};
use itertools::Itertools;
use tracing::Level;

/// Derive, decimate and normalize signals from tab-delimited test logs.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// More log output (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate one RPN expression against a .dat file
    Eval {
        file: PathBuf,
        /// e.g. "$SltACh1 8 MUL"
        expression: String,
        /// Substitute 0 for unknown `$fields` instead of failing
        #[arg(long)]
        lenient: bool,
    },
    /// Evaluate every configured series over <TEST_DIR>/data/*.dat
    Plot {
        test_dir: PathBuf,
        /// JSON plot settings
        #[arg(short, long)]
        config: PathBuf,
        /// Substitute 0 for unknown `$fields` instead of failing
        #[arg(long)]
        lenient: bool,
    },
    /// List the columns of a .dat file
    Columns { file: PathBuf },
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    match args.command {
        Command::Eval { file, expression, lenient } => {
            let log = Datalog::from_path(&file)?;
            let mut calc = Evaluator::new().with_missing_fields(policy(lenient));
            calc.load_data(log.into_context());
            let value = calc
                .calculate(&expression)
                .with_context(|| format!("evaluating `{expression}`"))?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        Command::Plot { test_dir, config, lenient } => {
            let mut settings = PlotConfig::from_path(&config)
                .with_context(|| format!("loading settings from {}", config.display()))?;
            if lenient {
                settings.missing_fields = MissingFieldPolicy::Zero;
            }
            let report = plot::render(&settings, &test_dir)?;
            let failed = report.failure_count();
            if failed > 0 {
                tracing::warn!(failed, "some files or series could not be plotted");
            }
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Columns { file } => {
            let log = Datalog::from_path(&file)?;
            println!("{}", log.headers().iter().join("\n"));
        }
    }
    Ok(())
}

fn policy(lenient: bool) -> MissingFieldPolicy {
    if lenient {
        MissingFieldPolicy::Zero
    } else {
        MissingFieldPolicy::Strict
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::ERROR,
        (false, 0) => Level::WARN,
        (false, 1) => Level::INFO,
        (false, 2) => Level::DEBUG,
        (false, _) => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}
