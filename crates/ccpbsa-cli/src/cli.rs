use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "CC/PBSA developers",
    version,
    about = "CC/PBSA CLI - Estimate folding and binding free energy differences between a wildtype protein and its point mutants from CONCOORD ensembles and Poisson-Boltzmann/surface-area energies.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel minimization.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full pipeline for a wildtype structure and its mutation list.
    Run(RunArgs),
    /// Generate the GXG tripeptide baseline table used by stability runs.
    Gxg(GxgArgs),
}

/// Arguments for the `run` subcommand.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path to the run configuration file in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub config: PathBuf,

    /// Override the wildtype structure file from the configuration.
    #[arg(short, long, value_name = "PATH")]
    pub structure: Option<PathBuf>,

    /// Override the mutation list file from the configuration.
    #[arg(short, long, value_name = "PATH")]
    pub mutations: Option<PathBuf>,

    /// Override the GXG baseline table from the configuration.
    #[arg(long, value_name = "PATH")]
    pub gxg_table: Option<PathBuf>,

    /// Override the directory the run workspace is created under.
    #[arg(short, long, value_name = "PATH")]
    pub output_dir: Option<PathBuf>,
}

/// Arguments for the `gxg` subcommand.
#[derive(Args, Debug)]
pub struct GxgArgs {
    /// Path to the run configuration file in TOML format. Only the flag
    /// file, auxiliary files and coefficients are used.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub config: PathBuf,

    /// Override the directory the GXG workspace is created under.
    #[arg(short, long, value_name = "PATH")]
    pub output_dir: Option<PathBuf>,
}
