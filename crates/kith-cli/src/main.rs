#![forbid(unsafe_code)]

mod cmd;
mod output;
mod snapshot;

use clap::{CommandFactory, Parser, Subcommand};
use kith_core::EngineError;
use kith_core::config::resolve_config;
use output::{CliError, OutputMode, render_error, resolve_output_mode};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "kith: relationship-network analytics for your contacts",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (default: pretty on a TTY, text when piped).
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Engine config file (default: <config dir>/kith/config.toml).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        resolve_output_mode(self.format, self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Score every contact in a snapshot",
        long_about = "Infer missing relationships, compute degree, closeness, betweenness and PageRank, and rank contacts by network value.",
        after_help = "EXAMPLES:\n    # Rank all contacts\n    kith analyze contacts.json\n\n    # Top ten, without inferred edges\n    kith analyze contacts.json --top 10 --no-infer\n\n    # Emit machine-readable output\n    kith analyze contacts.json --json"
    )]
    Analyze(cmd::analyze::AnalyzeArgs),

    #[command(
        about = "Show the neighborhood of one contact",
        long_about = "Analyze the snapshot, then keep only contacts within --depth hops of the focus and every relationship among them.",
        after_help = "EXAMPLES:\n    # Two-hop neighborhood (default)\n    kith focus contacts.json ana\n\n    # Direct ties only\n    kith focus contacts.json ana --depth 1"
    )]
    Focus(cmd::focus::FocusArgs),

    #[command(
        about = "Estimate the tie between two contacts",
        long_about = "Score how likely two contacts know each other from shared company, introductions, tags and importance.",
        after_help = "EXAMPLES:\n    kith estimate contacts.json ana ben"
    )]
    Estimate(cmd::estimate::EstimateArgs),

    #[command(
        about = "Summarize a snapshot's graph",
        long_about = "Validate the snapshot and report density, components, isolated contacts and the content hash.",
        after_help = "EXAMPLES:\n    kith stats contacts.json\n\n    # Content hash only\n    kith stats contacts.json --json | jq -r .contentHash"
    )]
    Stats(cmd::stats::StatsArgs),

    #[command(
        about = "Generate shell completion scripts",
        after_help = "EXAMPLES:\n    kith completions bash > ~/.local/share/bash-completion/completions/kith"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("KITH_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "kith=debug,info"
        } else {
            "kith=info,warn"
        })
    });

    let format = env::var("KITH_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn run(cli: Cli, output: OutputMode) -> anyhow::Result<()> {
    if let Commands::Completions(args) = &cli.command {
        let mut command = Cli::command();
        return cmd::completions::run_completions(args.shell, &mut command);
    }

    let config = resolve_config(cli.config.as_deref())?;
    debug!(parallel = config.parallel, "engine config loaded");

    match cli.command {
        Commands::Analyze(args) => cmd::analyze::run_analyze(&args, config, output),
        Commands::Focus(args) => cmd::focus::run_focus(&args, config, output),
        Commands::Estimate(args) => cmd::estimate::run_estimate(&args, config, output),
        Commands::Stats(args) => cmd::stats::run_stats(&args, output),
        Commands::Completions(_) => Ok(()),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let output = cli.output_mode();
    match run(cli, output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let engine_err = err.chain().find_map(|e| e.downcast_ref::<EngineError>());
            let cli_error = engine_err.map_or_else(
                || CliError {
                    message: format!("{err:#}"),
                    hint: None,
                    error_code: None,
                },
                CliError::from,
            );
            if render_error(output, &cli_error).is_err() {
                eprintln!("error: {err:#}");
            }
            ExitCode::FAILURE
        }
    }
}
