//! Error types for payq

use thiserror::Error;

/// Result type alias for payq operations
pub type Result<T> = std::result::Result<T, Error>;

/// Broad classification of an [`Error`]
///
/// Callers use this to decide how to present a failure: validation errors
/// are operator-correctable, consistency errors point at corrupted state,
/// and remote errors come from the backing store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A precondition was not met; nothing was mutated
    Validation,
    /// An invariant was found violated; nothing was mutated
    Consistency,
    /// The backing store rejected or failed a call
    RemotePersistence,
    /// Local configuration, session, or internal failure
    Other,
}

/// Errors that can occur in payq
#[derive(Error, Debug)]
pub enum Error {
    /// Operator-correctable precondition failure
    #[error("{0}")]
    Validation(String),

    /// State invariant violated (e.g. a merge group without a leader)
    #[error("inconsistent merge state: {0}")]
    Consistency(String),

    /// Backing store call failed
    #[error("remote update failed: {0}")]
    RemotePersistence(String),

    /// Batch submission where some upserts landed and some failed
    #[error("submitted {submitted} item(s), {failed} failed: {message}")]
    PartialSubmission {
        /// Upserts that succeeded and were not rolled back
        submitted: usize,
        /// Upserts that failed
        failed: usize,
        /// Message of the first failure
        message: String,
    },

    /// Item id not present in the collection
    #[error("payment item '{0}' not found")]
    ItemNotFound(String),

    /// Merge group id not present in the collection
    #[error("merge group '{0}' not found")]
    MergeGroupNotFound(String),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),

    /// Session file error
    #[error("session error: {0}")]
    Session(String),

    /// Local store file error
    #[error("store error: {0}")]
    Store(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Classify this error
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) | Self::ItemNotFound(_) | Self::MergeGroupNotFound(_) => {
                ErrorKind::Validation
            }
            Self::Consistency(_) => ErrorKind::Consistency,
            Self::RemotePersistence(_) | Self::PartialSubmission { .. } => {
                ErrorKind::RemotePersistence
            }
            Self::Config(_) | Self::Session(_) | Self::Store(_) | Self::Internal(_) => {
                ErrorKind::Other
            }
        }
    }
}
