//! Error taxonomy shared by the record store and the query engine. Storage
//! failures keep the rusqlite error as their source and carry a short phrase
//! describing what was being attempted, the same way the rest of the crate
//! reads when it wraps calls with `.storage("failed to ...")`.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Every failure a public operation can report.
#[derive(Debug, Error)]
pub enum VocabError {
    /// A caller-supplied field broke a range or format rule. Raised before
    /// any storage call, so nothing is partially applied.
    #[error("{0}")]
    Validation(String),

    /// The referenced id has no matching row.
    #[error("Vocabulary entry {0} not found")]
    NotFound(i64),

    /// The embedded database failed underneath us.
    #[error("{context}: {source}")]
    Storage {
        context: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    #[error("could not locate home directory")]
    HomeDirUnavailable,

    #[error("failed to create data directory {}: {source}", .path.display())]
    DataDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl VocabError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        VocabError::Validation(message.into())
    }

    /// True for errors caused by the caller's input rather than the store.
    pub fn is_validation(&self) -> bool {
        matches!(self, VocabError::Validation(_))
    }

    /// True when the operation referenced an id with no row, letting the UI
    /// drop a stale item instead of showing a storage failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, VocabError::NotFound(_))
    }
}

pub type Result<T, E = VocabError> = std::result::Result<T, E>;

/// Attach a description to a raw rusqlite result, turning it into a
/// [`VocabError::Storage`].
pub(crate) trait StorageContext<T> {
    fn storage(self, context: &'static str) -> Result<T>;
}

impl<T> StorageContext<T> for rusqlite::Result<T> {
    fn storage(self, context: &'static str) -> Result<T> {
        self.map_err(|source| VocabError::Storage { context, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_context_keeps_the_source() {
        let failed: rusqlite::Result<()> = Err(rusqlite::Error::QueryReturnedNoRows);
        let err = failed.storage("failed to load entry").unwrap_err();

        assert!(err.to_string().starts_with("failed to load entry: "));
        assert!(std::error::Error::source(&err).is_some());
        assert!(!err.is_validation());
    }
}
