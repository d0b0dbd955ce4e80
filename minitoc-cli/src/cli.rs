//! Command-line interface definitions for minitoc

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI structure for the minitoc application
#[derive(Parser)]
#[command(name = "minitoc")]
#[command(version)]
#[command(about = "Documentation pages with a scroll-synchronised contents panel", long_about = None)]
pub struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for minitoc
#[derive(Subcommand)]
pub enum Commands {
    /// Render Markdown into pages with heading ids and a prerendered contents panel
    Render {
        /// Markdown file or directory of Markdown files
        #[arg(value_name = "PATH")]
        input: PathBuf,

        /// Output file (single input) or directory (directory input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Path to a minitoc.toml configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// URL of the minitoc browser module to load on each page
        #[arg(long, value_name = "URL")]
        script: Option<String>,

        /// Page title (defaults to the file name)
        #[arg(short, long)]
        title: Option<String>,
    },

    /// Print the headings the contents panel would list
    Outline {
        /// Markdown file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Path to a minitoc.toml configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Write a configuration file with the default values
    InitConfig {
        /// Target file
        #[arg(value_name = "PATH", default_value = "minitoc.toml")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Load and validate a configuration file
    CheckConfig {
        /// Configuration file to check
        #[arg(value_name = "PATH", default_value = "minitoc.toml")]
        path: PathBuf,
    },
}
