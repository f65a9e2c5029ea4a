//! Placing, finding and removing items, and the aggregates that follow them.

use log::trace;

use asmbin_core::models::{Item, ItemKind, Parent, Range, RecordId, Span, TrackType};
use asmbin_core::store::{ObjectStore, StoreExt};

use crate::errors::{BinIndexError, Result};
use crate::index::BinIndex;
use crate::transform::BinLocation;

/// Where [`BinIndex::place`] put an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub contig: RecordId,
    pub bin: RecordId,
    /// Index of the range slot in the bin's range table.
    pub slot: usize,
    /// The stored range, in the bin's local coordinates.
    pub range: Range,
    /// Complement parity of the bin chain the item landed in.
    pub complemented: bool,
}

/// Absolute position of a placed item, as reported by [`BinIndex::locate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemPosition {
    pub contig: RecordId,
    pub kind: ItemKind,
    pub rec: RecordId,
    pub start: i64,
    pub end: i64,
    /// Net orientation: parity of complemented bins from the item's bin to the root.
    pub complemented: bool,
    pub bin: RecordId,
    pub slot: usize,
}

impl ItemPosition {
    pub fn span(&self) -> Span {
        Span {
            start: self.start,
            end: self.end,
        }
    }
}

pub(crate) fn item_position(loc: &BinLocation, slot: usize, range: &Range) -> ItemPosition {
    let abs = loc.transform.span_to_absolute(range.span());
    ItemPosition {
        contig: loc.contig,
        kind: range.kind,
        rec: range.rec,
        start: abs.start,
        end: abs.end,
        complemented: loc.complemented(),
        bin: loc.bin,
        slot,
    }
}

/// Track types whose values depend on items of `kind`.
pub(crate) fn affected_tracks(kind: ItemKind) -> impl Iterator<Item = TrackType> {
    TrackType::ALL.into_iter().filter(move |t| t.counts(kind))
}

impl<S: ObjectStore> BinIndex<S> {
    ///
    /// Place an item at an absolute range of a contig.
    ///
    /// The tree grows to fit. The item is stored in the smallest bin containing the
    /// range; sequence counts along the bin's ancestor chain and the contig extent
    /// are updated, and tracks covering the range are invalidated.
    ///
    pub fn place(&mut self, contig: RecordId, span: Span, item: Item) -> Result<Placement> {
        if span.is_empty() {
            return Err(BinIndexError::InvalidRange {
                start: span.start,
                end: span.end,
            });
        }
        if let Some(bin) = self.claimed_bin(item.kind, item.rec) {
            return Err(BinIndexError::AlreadyPlaced {
                kind: item.kind,
                rec: item.rec,
                bin,
            });
        }

        let loc = self.bin_for_range(contig, span, true)?;
        let local = loc.transform.span_to_local(span);
        let range = Range {
            start: local.start,
            end: local.end,
            kind: item.kind,
            rec: item.rec,
        };

        let bin = self.store.bin_mut(loc.bin)?;
        let slot = bin.ranges.insert(range);
        bin.widen_used(local);

        if item.kind.is_sequence() {
            self.bin_incr_nseq(loc.bin, 1)?;
            self.store.contig_mut(contig)?.widen_extent(span);
        }
        self.items.insert((item.kind, item.rec), loc.bin);

        for track_type in affected_tracks(item.kind) {
            self.invalidate_span(&loc, &span, Some(track_type))?;
        }

        trace!("placed {} at {} in bin {} slot {}", item, span, loc.bin, slot);
        Ok(Placement {
            contig,
            bin: loc.bin,
            slot,
            range,
            complemented: loc.complemented(),
        })
    }

    ///
    /// Find where an item is placed.
    ///
    /// The item's bin comes from the item directory; the range itself is found by a
    /// scan of that bin's range table, and its position resolved by walking up to
    /// the root.
    ///
    pub fn locate(&self, kind: ItemKind, rec: RecordId) -> Result<ItemPosition> {
        let (loc, slot, range) = self.find_range(kind, rec)?;
        Ok(item_position(&loc, slot, &range))
    }

    ///
    /// Remove a placed item. Its range slot goes on the bin's free list and
    /// sequence counts along the ancestor chain drop by one. Returns where the item
    /// was.
    ///
    pub fn unplace(&mut self, kind: ItemKind, rec: RecordId) -> Result<ItemPosition> {
        let (loc, slot, range) = self.find_range(kind, rec)?;
        let position = item_position(&loc, slot, &range);

        self.store
            .bin_mut(position.bin)?
            .ranges
            .remove(position.slot)
            .ok_or(BinIndexError::NotFound { kind, rec })?;

        if kind.is_sequence() {
            self.bin_incr_nseq(position.bin, -1)?;
        }
        self.items.remove(&(kind, rec));

        for track_type in affected_tracks(kind) {
            self.invalidate_span(&loc, &position.span(), Some(track_type))?;
        }

        trace!("removed {} {} from bin {}", kind, rec, position.bin);
        Ok(position)
    }

    ///
    /// Add `delta` to the sequence count of a bin and of every ancestor up to the
    /// root.
    ///
    pub fn bin_incr_nseq(&mut self, bin_id: RecordId, delta: i64) -> Result<()> {
        let mut id = bin_id;
        loop {
            let bin = self.store.bin_mut(id)?;
            bin.nseqs += delta;
            match bin.parent {
                Parent::Bin(parent) => id = parent,
                Parent::Contig(_) => return Ok(()),
            }
        }
    }

    fn find_range(
        &self,
        kind: ItemKind,
        rec: RecordId,
    ) -> Result<(BinLocation, usize, Range)> {
        let not_found = || BinIndexError::NotFound { kind, rec };

        let bin_id = self.claimed_bin(kind, rec).ok_or_else(not_found)?;
        let bin = self.store.bin(bin_id)?;
        let slot = bin.ranges.find(kind, rec).ok_or_else(not_found)?;
        let range = *bin.ranges.get(slot).ok_or_else(not_found)?;

        Ok((self.bin_position(bin_id)?, slot, range))
    }
}
