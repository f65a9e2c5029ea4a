//! The object-store interface consumed by the bin index.
//!
//! The index never owns its records directly. Bins, contigs and tracks are
//! created in, read from and checked out of an [`ObjectStore`]. Any backend that
//! can provide these five primitives can host an index; [`MemoryStore`] is the
//! in-process implementation used by the CLI and the tests.

pub mod memory;

use thiserror::Error;

use crate::models::{Bin, Contig, Record, RecordId, RecordKind, Track};

pub use self::memory::MemoryStore;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum StoreError {
    #[error("Object store is full: no room for record number {0}")]
    Exhausted(usize),

    #[error("No record with id {0}")]
    MissingRecord(RecordId),

    #[error("Record {id} is a {found}, expected a {expected}")]
    WrongKind {
        id: RecordId,
        expected: RecordKind,
        found: RecordKind,
    },

    #[error("Record {0} is not pinned")]
    NotPinned(RecordId),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

///
/// Durable record storage with read/write checkout and pinning.
///
/// A read checkout is a shared view. A write checkout yields the only handle that
/// may be used from then on; the store is free to copy the record behind it.
/// Pins keep a record resident while a caller holds on to its id across several
/// lookups.
///
pub trait ObjectStore {
    /// Allocate a new record and return its identity.
    fn create(&mut self, record: Record) -> StoreResult<RecordId>;

    /// Shared, read-only view of a record.
    fn checkout_read(&self, id: RecordId) -> StoreResult<&Record>;

    /// Mutable view of a record, possibly a fresh private copy.
    fn checkout_write(&mut self, id: RecordId) -> StoreResult<&mut Record>;

    fn pin(&mut self, id: RecordId) -> StoreResult<()>;

    fn unpin(&mut self, id: RecordId) -> StoreResult<()>;
}

/// Typed accessors on top of [`ObjectStore`]: they check the record kind and
/// turn a mismatch into [`StoreError::WrongKind`].
pub trait StoreExt: ObjectStore {
    fn bin(&self, id: RecordId) -> StoreResult<&Bin> {
        match self.checkout_read(id)? {
            Record::Bin(bin) => Ok(bin),
            other => Err(wrong_kind(id, RecordKind::Bin, other)),
        }
    }

    fn bin_mut(&mut self, id: RecordId) -> StoreResult<&mut Bin> {
        match self.checkout_write(id)? {
            Record::Bin(bin) => Ok(bin),
            other => Err(wrong_kind(id, RecordKind::Bin, other)),
        }
    }

    fn contig(&self, id: RecordId) -> StoreResult<&Contig> {
        match self.checkout_read(id)? {
            Record::Contig(contig) => Ok(contig),
            other => Err(wrong_kind(id, RecordKind::Contig, other)),
        }
    }

    fn contig_mut(&mut self, id: RecordId) -> StoreResult<&mut Contig> {
        match self.checkout_write(id)? {
            Record::Contig(contig) => Ok(contig),
            other => Err(wrong_kind(id, RecordKind::Contig, other)),
        }
    }

    fn track(&self, id: RecordId) -> StoreResult<&Track> {
        match self.checkout_read(id)? {
            Record::Track(track) => Ok(track),
            other => Err(wrong_kind(id, RecordKind::Track, other)),
        }
    }

    fn track_mut(&mut self, id: RecordId) -> StoreResult<&mut Track> {
        match self.checkout_write(id)? {
            Record::Track(track) => Ok(track),
            other => Err(wrong_kind(id, RecordKind::Track, other)),
        }
    }
}

impl<S: ObjectStore + ?Sized> StoreExt for S {}

fn wrong_kind(id: RecordId, expected: RecordKind, found: &Record) -> StoreError {
    StoreError::WrongKind {
        id,
        expected,
        found: found.kind(),
    }
}
