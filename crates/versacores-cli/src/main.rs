//! # VersaCores CLI
//!
//! Build orchestrator for hierarchical hardware IP cores.
//!
//! ## Startup sequence
//!
//! 1. Parse CLI arguments (clap handles `--help` / `--version` early-exit).
//! 2. Initialise the tracing subscriber (logging).
//! 3. Load configuration (file + env + defaults).
//! 4. Build the [`OutputManager`].
//! 5. Dispatch to the command handler on a current-thread tokio runtime.
//! 6. Translate any [`CliError`] into a user-facing message and exit code.
//!
//! ## Exit codes
//!
//! | Code | Meaning                         |
//! |------|---------------------------------|
//! |  0   | Success                         |
//! |  1   | Internal / system error         |
//! |  2   | Usage error                     |
//! |  3   | Resolution failure              |
//! |  4   | Configuration error             |
//! |  5   | Descriptor validation failure   |
//! |  6   | Execution failure               |

use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, info, instrument};

use crate::{
    cli::{Cli, Commands},
    config::AppConfig,
    error::{CliError, CliResult, exit},
    logging::init_logging,
    output::OutputManager,
};

mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod output;

fn main() -> ExitCode {
    // Load .env before anything else, including tracing init.
    let _ = dotenvy::dotenv();

    // ── 1. Parse arguments ────────────────────────────────────────────────
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version arrive here too; clap picks the stream.
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(exit::USAGE)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    // ── 2. Initialise tracing ─────────────────────────────────────────────
    if let Err(e) = init_logging(&cli.global) {
        eprintln!("Failed to initialise logging: {e}");
        return ExitCode::from(exit::INTERNAL);
    }

    debug!(
        verbose = cli.global.verbose,
        quiet = cli.global.quiet,
        no_color = cli.global.no_color,
        "CLI started"
    );

    // ── 3. Load configuration ─────────────────────────────────────────────
    let config = match AppConfig::load(cli.global.config.as_ref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            return handle_error(
                CliError::ConfigError {
                    message: format!("{e:#}"),
                    source: None,
                },
                &cli,
            );
        }
    };

    // ── 4. Build output manager ───────────────────────────────────────────
    let output = OutputManager::new(&cli.global, &config);

    // ── 5. Dispatch + 6. Error handling ──────────────────────────────────
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => return handle_error(CliError::from(e), &cli),
    };

    match runtime.block_on(run(&cli, &config, &output)) {
        Ok(()) => {
            info!("VersaCores completed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => handle_error(e, &cli),
    }
}

/// Dispatch to the correct command handler.
#[instrument(skip_all)]
async fn run(cli: &Cli, config: &AppConfig, output: &OutputManager) -> CliResult<()> {
    match &cli.command {
        None | Some(Commands::Build) => commands::build::execute(&cli.global, config, output).await,
        Some(Commands::Clean) => commands::clean::execute(&cli.global, config, output).await,
        Some(Commands::Graph) => commands::graph::execute(&cli.global, config, output),
        Some(Commands::Completions(args)) => commands::completions::execute(args),
        Some(Commands::Config(cmd)) => commands::config::execute(cmd, config, output),
    }
}

/// Translate a `CliError` into a user message and an appropriate exit code.
fn handle_error(err: CliError, cli: &Cli) -> ExitCode {
    err.log();

    // stderr, so the message survives a redirected stdout
    let verbose = cli.global.verbose > 0;
    let colored = !cli.global.no_color && std::io::IsTerminal::is_terminal(&std::io::stderr());
    let msg = if colored {
        err.format_colored(verbose)
    } else {
        err.format_plain(verbose)
    };
    eprint!("{msg}");

    ExitCode::from(err.exit_code())
}

// ── tests ─────────────────────────────────────────────────────────────────────
