//! Dynamically growing binary interval trees over assembly contigs.
//!
//! Every contig owns a tree of bins. A bin covers a span of the contig, holds the
//! items (aligned sequences, annotations) that fit inside it but inside neither of
//! its children, and keeps a running count of the sequences at or below it. The
//! tree is balanced by construction: children split their parent's span, new
//! roots double it, and nothing below the configured minimum size is split.
//!
//! Bins store everything in their own local frame. A bin may be *complemented*,
//! reversing its frame relative to its parent, so a whole subtree can be flipped
//! by touching one record. The absolute position of anything in the tree is
//! resolved by composing the frames along its ancestor chain (see [`transform`]).
//!
//! ## Quick Start
//!
//! ```rust
//! use asmbin_binindex::BinIndex;
//! use asmbin_core::models::{Item, ItemKind, RecordId, Span};
//! use asmbin_core::Config;
//!
//! let mut index = BinIndex::in_memory(Config::default()).unwrap();
//! let ctg = index.create_contig("contig_1").unwrap();
//!
//! // far past the initial root: the tree grows to fit
//! index.place(ctg, Span::new(10_000, 10_150), Item::sequence(1)).unwrap();
//!
//! let pos = index.locate(ItemKind::Sequence, RecordId(1)).unwrap();
//! assert_eq!(pos.span(), Span::new(10_000, 10_150));
//! assert_eq!(index.nseqs(ctg).unwrap(), 1);
//! ```

/// The single-slot cache of the last resolved bin.
pub mod cache;

/// Consistency checking.
///
/// See [`BinIndex::check_contig`].
pub mod check;

pub mod complement;
pub mod errors;
pub mod index;

/// Track invalidation.
///
/// See [`BinIndex::invalidate_track`] and [`TrackScope`].
pub mod invalidate;

pub mod placement;
pub mod query;
pub mod transform;
pub mod tree;

// re-exports
pub use self::cache::BinCache;
pub use self::check::Inconsistency;
pub use self::errors::{BinIndexError, Result};
pub use self::index::BinIndex;
pub use self::invalidate::TrackScope;
pub use self::placement::{ItemPosition, Placement};
pub use self::query::ContigStats;
pub use self::transform::{BinLocation, Transform};

/// Constants used throughout the crate.
pub mod consts {
    /// The command name for per-contig tree statistics.
    pub const STATS_CMD: &str = "stats";
}
