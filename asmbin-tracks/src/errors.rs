use thiserror::Error;

use asmbin_binindex::BinIndexError;
use asmbin_core::store::StoreError;

#[derive(Error, Debug)]
pub enum TrackError {
    #[error(transparent)]
    BinIndex(#[from] BinIndexError),

    #[error("Object store failure: {0}")]
    Store(#[from] StoreError),

    #[error("Resolution must be a positive number of bases per sample, got {0}")]
    InvalidResolution(f64),

    #[error("{count} samples requested, at most {max} are allowed per query")]
    TooManyWindows { count: f64, max: usize },

    #[error("Invalid span: start {start} is after end {end}")]
    InvalidSpan { start: i64, end: i64 },
}

pub type Result<T> = std::result::Result<T, TrackError>;
