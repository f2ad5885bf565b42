use subway_transit::TopologyError;
use thiserror::Error;

/// Storage layer error type.
///
/// Wraps the underlying database error while keeping the full chain for
/// debugging.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    /// A database operation failed.
    #[error("database operation failed")]
    Database(#[from] rusqlite::Error),

    /// A persisted row cannot be turned back into a valid model value.
    #[error("corrupted row in {table}: {source}")]
    Corrupted {
        table: &'static str,
        #[source]
        source: TopologyError,
    },
}

pub type Result<T> = std::result::Result<T, StorageError>;
