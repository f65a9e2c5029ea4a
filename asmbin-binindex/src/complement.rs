//! Whole-contig operations: reverse complementing and re-deriving the extent.

use log::debug;

use asmbin_core::models::{ItemKind, RecordId, Span};
use asmbin_core::store::{ObjectStore, StoreExt};

use crate::errors::Result;
use crate::index::BinIndex;

impl<S: ObjectStore> BinIndex<S> {
    ///
    /// Reverse a contig in place.
    ///
    /// Absolute coordinates are mirrored within the used extent, so `x` moves to
    /// `start + end - x` and the extent itself stays put. Only the root changes: its
    /// complemented flag is toggled and it is moved to the mirrored position. Every
    /// item's orientation flips with it, while ranges and cached tracks, being
    /// stored in local frames, are untouched.
    ///
    /// An empty contig is mirrored about the centre of its root bin.
    ///
    pub fn complement_contig(&mut self, contig: RecordId) -> Result<()> {
        let record = self.store.contig(contig)?;
        let root_id = record.root;
        let extent = record.extent;

        let root = self.store.bin_mut(root_id)?;
        let mirror = match extent {
            Some(e) => e.start + e.end,
            None => 2 * root.pos + root.size - 1,
        };
        root.pos = mirror - root.pos - root.size + 1;
        root.complemented = !root.complemented;

        let contig_rec = self.store.contig_mut(contig)?;
        contig_rec.layout_epoch += 1;
        let epoch = contig_rec.layout_epoch;
        self.cache.clear(&mut self.store)?;

        debug!(
            "complemented contig {} about {} (layout epoch {})",
            contig, mirror, epoch
        );
        Ok(())
    }

    ///
    /// Recompute the contig's extent from the sequences placed in it. Removing items
    /// never shrinks the extent on its own; this does. Returns the new extent,
    /// `None` if no sequence is left.
    ///
    pub fn refresh_extent(&mut self, contig: RecordId) -> Result<Option<Span>> {
        let root = self.root_location(contig)?;
        let extent = self
            .items_in_range(contig, root.span(), Some(ItemKind::Sequence))?
            .iter()
            .map(|p| p.span())
            .reduce(|a, b| a.union(&b));

        self.store.contig_mut(contig)?.extent = extent;
        Ok(extent)
    }
}
