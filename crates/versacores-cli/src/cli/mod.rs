//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "versacores",
    bin_name = "versacores",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Dependency-aware build orchestrator for hardware IP cores",
    long_about = "VersaCores loads the top core of a directory, resolves its \
                  dependency tree, and generates every core's file manifest, \
                  dependencies first.",
    after_help = "EXAMPLES:\n\
        \x20 versacores                       # build the top core in the current directory\n\
        \x20 versacores -C soc build -v\n\
        \x20 versacores graph --output-format json\n\
        \x20 VERSACORES_PATH=~/ip/lib versacores clean",
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute. Defaults to `build`.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the full flow: top, create, sources, generate.
    #[command(
        visible_alias = "b",
        about = "Build the top core and its dependencies",
        after_help = "EXAMPLES:\n\
            \x20 versacores build\n\
            \x20 versacores build -C cores/soc --output-format json"
    )]
    Build,

    /// Run every CLEAN hook, dependencies first.
    #[command(about = "Run the CLEAN hooks of the whole tree")]
    Clean,

    /// Print the resolved dependency tree without generating.
    #[command(
        visible_alias = "tree",
        about = "Show the resolved dependency tree",
        after_help = "EXAMPLES:\n\
            \x20 versacores graph\n\
            \x20 versacores graph --output-format json"
    )]
    Graph,

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 versacores completions bash > ~/.local/share/bash-completion/completions/versacores\n\
            \x20 versacores completions zsh  > ~/.zfunc/_versacores\n\
            \x20 versacores completions fish > ~/.config/fish/completions/versacores.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the VersaCores configuration.
    #[command(
        about = "Configuration inspection",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 versacores config get cores.search_paths\n\
            \x20 versacores config list\n\
            \x20 versacores config path"
    )]
    Config(ConfigCommands),
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `versacores completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `versacores config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `output.format`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the default configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
