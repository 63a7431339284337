//! Error types shared by the catalog, position store and navigator.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The verse catalog could not be loaded, or loaded empty.
    #[error("catalog unavailable: {reason}")]
    DataUnavailable {
        reason: String,
        #[source]
        source: Option<rusqlite::Error>,
    },

    /// The position store could not commit a read or write.
    #[error("could not persist position: {0}")]
    PersistenceFailure(#[from] rusqlite::Error),

    /// The external audio player could not be started.
    #[error("audio player failed: {0}")]
    Playback(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn data_unavailable(reason: impl Into<String>) -> Self {
        Error::DataUnavailable {
            reason: reason.into(),
            source: None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_unavailable_message() {
        let err = Error::data_unavailable("no verses found in all_aya");
        assert_eq!(
            err.to_string(),
            "catalog unavailable: no verses found in all_aya"
        );
    }

    #[test]
    fn test_rusqlite_error_converts_to_persistence_failure() {
        let err: Error = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, Error::PersistenceFailure(_)));
    }
}
