#![forbid(unsafe_code)]

mod cmd;
mod config;
mod input;
mod output;
mod report;

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use output::{CliError, OutputMode};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "sccdag: strongly connected components and DAG path analytics",
    long_about = None
)]
struct Cli {
    /// Enable verbose (debug) logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Emit JSON output (alias for `--format json`).
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Config file; defaults to `sccdag.toml` in the working directory.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Run the full analysis pipeline",
        long_about = "Decompose the graph into strongly connected components, condense them into a DAG, \
                      order it topologically, and compute shortest and longest paths from the source component.",
        after_help = "EXAMPLES:\n    # Print the report\n    sccdag analyze graph.json\n\n    # Write the JSON report to a file\n    sccdag analyze graph.json --output report.json\n\n    # Start from vertex 3, keep the lightest parallel edge\n    sccdag analyze graph.json --source 3 --parallel-edges min"
    )]
    Analyze(cmd::analyze::AnalyzeArgs),

    #[command(
        about = "List strongly connected components",
        long_about = "Decompose the graph into strongly connected components and flag the ones that contain a cycle.",
        after_help = "EXAMPLES:\n    # List components\n    sccdag components graph.json\n\n    # Emit machine-readable output\n    sccdag components graph.json --json"
    )]
    Components(cmd::components::ComponentsArgs),
}

impl Commands {
    /// Format used when nothing else picks one: reports written to a file
    /// default to JSON.
    fn fallback_format(&self) -> Option<OutputMode> {
        match self {
            Self::Analyze(args) if args.output.is_some() => Some(OutputMode::Json),
            _ => None,
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("SCCDAG_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "sccdag=debug,info"
        } else {
            "sccdag=info,warn"
        })
    });

    let format = env::var("SCCDAG_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

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

fn run(cli: &Cli, output: &mut OutputMode) -> anyhow::Result<()> {
    let cwd = env::current_dir()?;
    if let Some(path) = config::config_path(cli.config.as_deref(), &cwd) {
        debug!(path = %path.display(), "loading config");
    }
    let config = config::load_config(cli.config.as_deref(), &cwd)?;

    *output = output::resolve_output_mode(
        cli.format,
        cli.json,
        config.output.format.or_else(|| cli.command.fallback_format()),
    );

    match &cli.command {
        Commands::Analyze(args) => cmd::analyze::run_analyze(args, &config, *output),
        Commands::Components(args) => cmd::components::run_components(args, &config, *output),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Errors before the config is read still honour the flags.
    let mut output = output::resolve_output_mode(cli.format, cli.json, None);

    match run(&cli, &mut output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            debug!(error = ?err, "command failed");
            if let Err(render_err) = output::render_error(output, &CliError::from(&err)) {
                eprintln!("error: {err:#} (while rendering: {render_err})");
            }
            ExitCode::FAILURE
        }
    }
}
