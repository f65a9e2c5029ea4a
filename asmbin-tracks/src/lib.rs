//! Multi-resolution depth tracks for asmbin contigs.
//!
//! Depth is the number of placed items covering a base. Rendering a whole contig
//! at low zoom does not need it per base, so each bin of the tree caches a
//! downsampled copy over its own span. Coarser bins build theirs from finer
//! ones, the finest from raw item overlaps, and every cached track is
//! invalidated (never deleted) when the items under it change, then recomputed
//! on the next query that needs it.
//!
//! ## Quick Start
//!
//! ```rust
//! use asmbin_binindex::BinIndex;
//! use asmbin_core::models::{Item, Span, TrackType};
//! use asmbin_core::Config;
//! use asmbin_tracks::TrackQuery;
//!
//! let mut index = BinIndex::in_memory(Config::default()).unwrap();
//! let ctg = index.create_contig("contig_1").unwrap();
//! index.place(ctg, Span::new(0, 199), Item::sequence(1)).unwrap();
//! index.place(ctg, Span::new(100, 299), Item::sequence(2)).unwrap();
//!
//! let depth = index
//!     .query_track(ctg, Span::new(0, 399), TrackType::ReadDepth, 100.0)
//!     .unwrap();
//! assert_eq!(depth, vec![1.0, 2.0, 1.0, 0.0]);
//! ```

pub mod errors;

/// Cached per-bin tracks and the contig-level query.
///
/// See [`TrackQuery`].
pub mod pyramid;

pub mod windows;

// re-exports
pub use self::errors::{Result, TrackError};
pub use self::pyramid::TrackQuery;
pub use self::windows::Windows;

/// Constants used throughout the crate.
pub mod consts {
    /// The command name for depth track output.
    pub const DEPTH_CMD: &str = "depth";
}
