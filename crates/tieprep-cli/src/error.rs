use std::path::PathBuf;
use thiserror::Error;
use tieprep::engine::store::StoreError;
use tieprep::engine::tying::PairingLoadError;
use tieprep::workflows::prepare::PrepareError;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Prepare(#[from] PrepareError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    PairingRules(#[from] PairingLoadError),

    #[error(transparent)]
    TieRule(#[from] crate::utils::parser::ParseError),

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
