//! Unified error type for presentation reading and writing.
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Longan operations.
///
/// Every variant aborts the whole operation: a save never leaves a partial
/// archive behind and a load never returns a partially built presentation.
#[derive(Error, Debug)]
pub enum Error {
    /// Source path does not exist
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Archive is missing a required part or is structurally broken
    #[error("Invalid package: {0}")]
    InvalidPackage(String),

    /// Format name, main part content type or container is not handled
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A chart reached serialization without a plot type
    #[error("Chart '{chart}' has no chart type")]
    UndefinedChartType { chart: String },

    /// A part referenced a target it never registered a relationship for
    #[error("Unresolved relationship from '{part}' to '{target}'")]
    UnresolvedRelationship { part: String, target: String },

    /// The package is encrypted and no password was supplied
    #[error("Password required to open encrypted package")]
    PasswordRequired,

    /// The supplied password does not unlock the package
    #[error("Wrong password for encrypted package")]
    WrongPassword,

    /// Malformed part name
    #[error("Invalid pack URI: {0}")]
    InvalidPackUri(String),

    /// XML parsing or generation error
    #[error("XML error: {0}")]
    Xml(String),

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    Zip(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Legacy serialized codec failure
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Encryption or decryption failure unrelated to the password
    #[error("Encryption error: {0}")]
    Crypto(String),
}

impl Error {
    /// Shorthand used by the reader for structural problems.
    pub(crate) fn invalid_package(msg: impl Into<String>) -> Self {
        Error::InvalidPackage(msg.into())
    }
}

/// Result type for Longan operations.
pub type Result<T> = std::result::Result<T, Error>;
