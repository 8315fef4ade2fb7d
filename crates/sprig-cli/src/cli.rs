//! Command-line interface definition.
//!
//! - `sprig build` - build `src/` and `static/` into `dist/`
//! - `sprig start` - development server compiling on request
//! - `sprig serve` - serve a directory (the build output by default)
//! - `sprig new` - create a project from a template repository

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Sprig - HTML-first front-end build tool
#[derive(Parser, Debug)]
#[command(
    name = "sprig",
    version,
    about = "HTML-first front-end build tool",
    long_about = "Sprig treats HTML files as entry points: scripts and stylesheets they\n\
                  reference are compiled and linked back in, everything else is copied."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Path to a config file (defaults to ./sprig.toml when present)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the project for production
    Build(BuildArgs),

    /// Start the development server
    ///
    /// Source files are compiled on every request; nothing is written to disk.
    Start(StartArgs),

    /// Serve a directory without any processing
    Serve(ServeArgs),

    /// Create a new project from a template
    New(NewArgs),
}

#[derive(Args, Debug, Default)]
pub struct BuildArgs {
    /// Minify HTML and compiled scripts
    #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true")]
    pub minify: Option<bool>,

    /// Bundle each entry with its dependencies instead of one module at a time
    #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true")]
    pub bundle: Option<bool>,

    /// Output directory (cleared before every build)
    #[arg(short = 'd', long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Maximum number of files processed at once
    #[arg(short = 'j', long, value_name = "N")]
    pub concurrency: Option<usize>,
}

#[derive(Args, Debug, Default)]
pub struct StartArgs {
    #[arg(long)]
    pub host: Option<String>,

    #[arg(short, long)]
    pub port: Option<u16>,

    /// Bundle requested scripts instead of transforming them
    #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true")]
    pub bundle: Option<bool>,
}

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    #[arg(long)]
    pub host: Option<String>,

    #[arg(short, long)]
    pub port: Option<u16>,

    /// Directory to serve (defaults to the configured output directory)
    #[arg(long, value_name = "DIR")]
    pub dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct NewArgs {
    /// Directory to create
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// Template name (`html`, `react`, `preact`) or git repository to clone
    ///
    /// Without it, an interactive terminal is asked to pick a template and
    /// anything else gets the plain HTML template.
    #[arg(long, value_name = "NAME|REPO")]
    pub template: Option<String>,
}
