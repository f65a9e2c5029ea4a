use thiserror::Error;

use asmbin_core::config::ConfigError;
use asmbin_core::models::{ItemKind, RecordId, Span};
use asmbin_core::store::StoreError;

#[derive(Error, Debug)]
pub enum BinIndexError {
    /// The object store could not create or check out a record.
    #[error("Object store failure: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{kind} item {rec} is not placed")]
    NotFound { kind: ItemKind, rec: RecordId },

    #[error("No existing bin contains {0}")]
    OutOfRange(Span),

    #[error("Invalid range: start {start} is after end {end}")]
    InvalidRange { start: i64, end: i64 },

    #[error("{kind} item {rec} is already placed in bin {bin}")]
    AlreadyPlaced {
        kind: ItemKind,
        rec: RecordId,
        bin: RecordId,
    },
}

pub type Result<T> = std::result::Result<T, BinIndexError>;
