//! Core records and infrastructure for asmbin.
//!
//! This crate holds everything the contig bin index is built from, but none of the
//! indexing algorithms themselves:
//!
//! - [`models`]: the durable records (bins, contigs, tracks) and the value types
//!   that flow through the index (spans, items, range tables).
//! - [`store`]: the narrow object-store interface the index consumes, plus an
//!   in-memory reference implementation.
//! - [`config`]: tunables for bin sizes, track sampling and store capacity.
//! - [`utils`]: readers for placement files.
//!
//! ## Quick Start
//!
//! ```rust
//! use asmbin_core::models::{Bin, Record, RecordId, Span};
//! use asmbin_core::store::{MemoryStore, ObjectStore, StoreExt};
//!
//! let mut store = MemoryStore::default();
//! let id = store.create(Record::Bin(Bin::new_root(RecordId(1), 0, 1024))).unwrap();
//!
//! let bin = store.bin(id).unwrap();
//! assert_eq!(bin.local_span(), Span::new(0, 1023));
//! ```

pub mod config;
pub mod errors;
pub mod models;
pub mod store;
pub mod utils;

// re-exports
pub use self::config::Config;
pub use self::models::{Item, ItemKind, RecordId, Span};
pub use self::store::{MemoryStore, ObjectStore, StoreExt};
