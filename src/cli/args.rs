//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Grammar notation toolkit: check rule documents, print canonical EBNF, emit railroad diagram models
#[derive(Parser, Debug)]
#[command(name = "syndoc")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug logging (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Write output to FILE instead of stdout
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Report syntax errors of every rule in a rule document
    Check {
        /// Rule document (TOML)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Print the canonical EBNF listing of a rule document
    Ebnf {
        /// Rule document (TOML)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Only this rule
        #[arg(short, long)]
        rule: Option<String>,
        /// Prefix placed before "::=" and "  |" (overrides config)
        #[arg(long)]
        prefix: Option<String>,
    },

    /// Print the railroad diagram model (JSON) of a rule document
    Diagram {
        /// Rule document (TOML)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Only this rule
        #[arg(short, long)]
        rule: Option<String>,
        /// Single-line JSON (overrides config)
        #[arg(long)]
        compact: bool,
    },

    /// Show the syntax tree of each rule
    Tree {
        /// Rule document (TOML)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Only this rule
        #[arg(short, long)]
        rule: Option<String>,
    },

    /// Parse one notation string and print its canonical text ("-" reads stdin)
    Parse {
        /// Notation source
        notation: String,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show {
        /// Rule document whose local .syndoc.toml is included
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
    },

    /// Create config template
    Init {
        /// Create global config (default: .syndoc.toml in the current directory)
        #[arg(short, long)]
        global: bool,
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show config paths
    Path,
}
