use crate::core::config::flags::FlagsError;
use crate::core::energy::delta::DeltaError;
use crate::core::energy::table::TableError;
use crate::core::io::ScrapeError;
use crate::core::models::mutation::MutationError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Configuration error: {source}")]
    Config {
        #[from]
        source: FlagsError,
    },

    #[error("Invalid mutation list: {source}")]
    Mutation {
        #[from]
        source: MutationError,
    },

    #[error("Stage '{stage}' requires '{requires}' to have completed first")]
    Precondition {
        stage: &'static str,
        requires: &'static str,
    },

    #[error("Failed to launch '{tool}': {message}")]
    ToolLaunch { tool: String, message: String },

    #[error("'{tool}' exited with {status} in {dir}: {stderr_tail}", status = status.map_or("no status (killed)".to_string(), |s| format!("status {s}")), dir = dir.display())]
    ExternalTool {
        tool: String,
        status: Option<i32>,
        dir: PathBuf,
        stderr_tail: String,
    },

    #[error("Mutated structure for '{variant}' failed verification: {message}")]
    Verification { variant: String, message: String },

    #[error("Incomplete data for {what}: expected {expected}, found {found}")]
    DataIncomplete {
        what: String,
        expected: usize,
        found: usize,
    },

    #[error("Failed to parse '{path}': {source}", path = path.display())]
    Scrape {
        path: PathBuf,
        #[source]
        source: ScrapeError,
    },

    #[error("Topology file '{path}' cannot be patched: {message}", path = path.display())]
    Topology { path: PathBuf, message: String },

    #[error("Energy table error: {source}")]
    Table {
        #[from]
        source: TableError,
    },

    #[error("Free energy calculation failed: {source}")]
    Delta {
        #[from]
        source: DeltaError,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
