//! Command-line argument definitions for the Marlin CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control the input path, the diagram kind, what
//! is emitted and where, configuration file selection, and logging verbosity.

use clap::{Parser, ValueEnum};

/// What the CLI writes for a parsed diagram.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Emit {
    /// The syntax tree as pretty-printed JSON
    #[default]
    Ast,
    /// Every label of the diagram, wrapped to the configured width
    Labels,
}

/// Command-line arguments for the Marlin diagram tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input diagram file
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Diagram kind tag (info, pie, packet, sankey, timeline, architecture);
    /// detected from the leading keyword when omitted
    #[arg(short, long)]
    pub kind: Option<String>,

    /// What to emit
    #[arg(short, long, value_enum, default_value_t = Emit::Ast)]
    pub emit: Emit,

    /// Path to the output file; standard output when omitted
    #[arg(short, long)]
    pub output: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
