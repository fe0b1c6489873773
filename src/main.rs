//! Coroner CLI entry point.
//!
//! Provides `analyze` for classifying known evidence and `run` for launching
//! a program and classifying how it terminated.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::debug;

use coroner::config::{resolve_config, CoronerConfig, OutputFormat};
use coroner::input::AnalysisInput;
use coroner::supervisor::RunSpec;
use coroner::{analysis, render};

/// Post-mortem failure classifier for native programs.
#[derive(Parser)]
#[command(name = "coroner", version, about)]
struct Cli {
    /// Path to a coroner.toml (default: ~/.coroner/coroner.toml if present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

/// Available CLI subcommands.
#[derive(Subcommand)]
enum Command {
    /// Classify a failure from a signal, errno value and/or log file.
    Analyze {
        /// Signal number (e.g. 11 for SIGSEGV).
        #[arg(short = 's', long, allow_negative_numbers = true)]
        signal: Option<i32>,
        /// Errno value (e.g. 14 for EFAULT). 0 means not provided.
        #[arg(short = 'e', long, allow_negative_numbers = true)]
        errno: Option<i32>,
        /// Path to a log file to scan for keywords.
        #[arg(short = 'l', long)]
        log: Option<PathBuf>,
        /// Output format (overrides config).
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },
    /// Run a program to completion and classify its termination.
    Run {
        /// Log file the program writes, scanned after it exits.
        #[arg(short = 'l', long)]
        log: Option<PathBuf>,
        /// Output format (overrides config).
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
        /// Program and arguments.
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = resolve_config(cli.config.as_deref()).context("failed to load configuration")?;
    coroner::logging::init_cli(&config.logging.level);

    match cli.command {
        Command::Analyze {
            signal,
            errno,
            log,
            format,
        } => handle_analyze(&config, signal, errno, log, format),
        Command::Run {
            log,
            format,
            command,
        } => handle_run(&config, log, format, &command),
    }
}

/// Validate inputs and print a single failure report.
fn handle_analyze(
    config: &CoronerConfig,
    signal: Option<i32>,
    errno: Option<i32>,
    log: Option<PathBuf>,
    format: Option<OutputFormat>,
) -> anyhow::Result<()> {
    let input = AnalysisInput::new(signal, errno, log).context("invalid analysis input")?;
    let result = analysis::analyze(&input, &config.scan.options());

    debug!(conclusive = result.report.is_conclusive(), "analysis finished");
    emit(
        format.unwrap_or(config.output.format),
        &result,
        render::render_analysis,
    )
}

/// Supervise the program, then print its termination summary and report.
fn handle_run(
    config: &CoronerConfig,
    log: Option<PathBuf>,
    format: Option<OutputFormat>,
    command: &[String],
) -> anyhow::Result<()> {
    let (program, args) = command.split_first().context("no program given")?;
    let spec = RunSpec::new(program.clone(), args.to_vec());

    let run = analysis::supervise(&spec, log.as_deref(), &config.scan.options())
        .with_context(|| format!("failed to supervise '{program}'"))?;

    emit(
        format.unwrap_or(config.output.format),
        &run,
        render::render_run,
    )
}

/// Print `value` to stdout in the requested format.
fn emit<T: Serialize>(
    format: OutputFormat,
    value: &T,
    render_text: fn(&T) -> String,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => print!("{}", render_text(value)),
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(value).context("failed to serialize report")?;
            println!("{json}");
        }
    }
    Ok(())
}
