//! Module for the error management
use thiserror::Error;

/// An error that breaks the contract between the caller and the validation core.
///
/// Invalid feed data is never reported through this type: it becomes a [crate::Notice].
#[derive(Error, Debug)]
pub enum Error {
    /// `translations.txt` references a table that is not part of the entity catalog
    #[error("'{0}' is not a table that can be translated")]
    UnknownTableName(String),
    /// A row was pushed for a file the entity catalog does not know
    #[error("'{0}' is not a GTFS file handled by the validator")]
    UnknownFile(String),
    /// The time is not given in the HH:MM:SS format
    #[error("'{0}' is not a valid time; HH:MM:SS format is expected.")]
    InvalidTime(String),
    /// The file dependency description is not a valid JSON tree
    #[error("invalid file dependency description")]
    DependencyTree(#[from] serde_json::Error),
    /// Impossible to read a file
    #[error("impossible to read '{file_name}'")]
    NamedFileIO {
        /// The file name that could not be read
        file_name: String,
        /// The inital error that caused the unability to read the file
        #[source]
        source: std::io::Error,
    },
}
