//! Contig bin indexes and multi-resolution depth tracks for sequence assemblies.
//!
//! This crate gathers the asmbin crates behind features:
//!
//! - `core`: records, the object store and configuration ([`asmbin_core`])
//! - `binindex`: the growing bin tree and item placement ([`asmbin_binindex`])
//! - `tracks`: cached depth tracks on top of the tree ([`asmbin_tracks`])

#[cfg(feature = "core")]
#[doc(inline)]
pub use asmbin_core as core;

#[cfg(feature = "binindex")]
#[doc(inline)]
pub use asmbin_binindex as binindex;

#[cfg(feature = "tracks")]
#[doc(inline)]
pub use asmbin_tracks as tracks;
