use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Ledger directory not found: {}", path.display())]
    DirectoryNotFound { path: PathBuf },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid ledger file pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("Ledger file discovery failed: {0}")]
    Glob(#[from] glob::GlobError),

    #[error(
        "Malformed action '{mnemonic}' at {}:{line_number}: {line}",
        file.display()
    )]
    MalformedAction {
        file: PathBuf,
        line_number: usize,
        mnemonic: String,
        line: String,
    },

    #[error("Table serialization failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("Table write failed: {0}")]
    Write(#[from] std::io::Error),
}

/// Raised when a token is not one of the known action mnemonics.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown action mnemonic: {0}")]
pub struct UnknownAction(pub String);

pub type Result<T> = std::result::Result<T, LedgerError>;
