//! Marking cached tracks stale when the data under them changes.

use log::debug;

use asmbin_core::models::{Parent, RecordId, Span, TrackType};
use asmbin_core::store::{ObjectStore, StoreExt};

use crate::errors::Result;
use crate::index::BinIndex;
use crate::transform::BinLocation;

/// What [`BinIndex::invalidate_track`] applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackScope {
    /// One bin, together with every ancestor whose tracks were built from it.
    Bin(RecordId),
    /// Every bin in the contig's tree.
    Contig(RecordId),
}

impl<S: ObjectStore> BinIndex<S> {
    ///
    /// Mark tracks as needing recomputation. `None` covers every track type.
    ///
    /// Cached values are kept; the next query recomputes them. Returns the number
    /// of tracks that were valid before the call, so invalidating twice in a row
    /// reports zero the second time.
    ///
    pub fn invalidate_track(
        &mut self,
        scope: TrackScope,
        track_type: Option<TrackType>,
    ) -> Result<usize> {
        let flipped = match scope {
            TrackScope::Bin(bin) => self.invalidate_upwards(bin, track_type)?,
            TrackScope::Contig(contig) => {
                let root = self.root_location(contig)?;
                self.invalidate_subtree(&root, None, track_type)?
            }
        };
        debug!(
            "invalidated {} track(s) for {:?} ({})",
            flipped,
            scope,
            track_type.map_or_else(|| "all types".to_string(), |t| t.to_string())
        );
        Ok(flipped)
    }

    ///
    /// Invalidate every bin whose covered data includes `span` (absolute), given
    /// the bin `loc` where an item with that span was added or removed: the bin
    /// itself, its ancestors, and the descendants overlapping the span.
    ///
    pub(crate) fn invalidate_span(
        &mut self,
        loc: &BinLocation,
        span: &Span,
        track_type: Option<TrackType>,
    ) -> Result<usize> {
        let mut flipped = self.invalidate_upwards(loc.bin, track_type)?;
        for child in self.child_locations(loc)? {
            flipped += self.invalidate_subtree(&child, Some(span), track_type)?;
        }
        Ok(flipped)
    }

    fn invalidate_upwards(
        &mut self,
        bin_id: RecordId,
        track_type: Option<TrackType>,
    ) -> Result<usize> {
        let mut flipped = 0;
        let mut id = bin_id;
        loop {
            let bin = self.store.bin_mut(id)?;
            flipped += bin.invalidate_tracks(track_type);
            match bin.parent {
                Parent::Bin(parent) => id = parent,
                Parent::Contig(_) => return Ok(flipped),
            }
        }
    }

    /// Invalidate `loc` and its descendants, skipping subtrees that miss `span`.
    fn invalidate_subtree(
        &mut self,
        loc: &BinLocation,
        span: Option<&Span>,
        track_type: Option<TrackType>,
    ) -> Result<usize> {
        let mut flipped = 0;
        let mut stack = vec![*loc];
        while let Some(loc) = stack.pop() {
            if span.is_some_and(|s| !loc.span().overlaps(s)) {
                continue;
            }
            flipped += self.store.bin_mut(loc.bin)?.invalidate_tracks(track_type);
            stack.extend(self.child_locations(&loc)?);
        }
        Ok(flipped)
    }
}
