use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Everything that can stop a file from being migrated.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Invalid Swift syntax: {0}")]
    InvalidSyntax(String),
    #[error("Unsupported pattern that cannot be migrated: {0}")]
    UnsupportedPattern(String),
    #[error("Could not read file: {}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Could not write file: {}", path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl MigrationError {
    /// A short hint for the user on how to get past this error.
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::InvalidSyntax(_) => "Ensure the Swift file has valid syntax before migration",
            Self::UnsupportedPattern(_) => "This pattern requires manual migration",
            Self::FileRead { .. } => "Check file path and permissions",
            Self::FileWrite { .. } => "Check output path and write permissions",
        }
    }
}
