use ccpbsa::core::config::flags::FlagsError;
use ccpbsa::core::energy::table::TableError;
use ccpbsa::core::models::mutation::MutationError;
use ccpbsa::engine::config::SettingsError;
use ccpbsa::engine::error::EngineError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Flag file error: {0}")]
    Flags(#[from] FlagsError),

    #[error("Mutation list error: {0}")]
    Mutations(#[from] MutationError),

    #[error("Run settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error("Energy table error: {0}")]
    Table(#[from] TableError),

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
