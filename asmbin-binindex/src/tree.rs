//! Growth and lookup of the bin tree.

use log::debug;

use asmbin_core::models::{Bin, Parent, Record, RecordId, Span};
use asmbin_core::store::{ObjectStore, StoreExt};

use crate::errors::{BinIndexError, Result};
use crate::index::BinIndex;
use crate::transform::{BinLocation, Transform};

/// Which child slot (0 = left, 1 = right) a new child would occupy, and its span in
/// the parent's frame.
///
/// With one child present the new sibling takes whatever the existing child leaves
/// over. With none, the bin splits at its midpoint and the half containing the
/// request is chosen.
fn new_child_span(
    size: i64,
    left: Option<Span>,
    right: Option<Span>,
    request: &Span,
) -> Option<(usize, Span)> {
    let candidate = match (left, right) {
        (Some(_), Some(_)) => None,
        (Some(l), None) => Some((
            1,
            Span {
                start: l.end + 1,
                end: size - 1,
            },
        )),
        (None, Some(r)) => Some((
            0,
            Span {
                start: 0,
                end: r.start - 1,
            },
        )),
        (None, None) => {
            let half = size / 2;
            let left = Span {
                start: 0,
                end: half - 1,
            };
            let right = Span {
                start: half,
                end: size - 1,
            };
            if left.contains(request) {
                Some((0, left))
            } else {
                Some((1, right))
            }
        }
    };
    candidate.filter(|(_, span)| !span.is_empty() && span.contains(request))
}

///
/// The next root above a root at `pos` of `size` bases, if `range` sticks out of
/// it: the side the old root takes, and the new root's `pos` and `size`. The inner
/// `None` means the new root would overflow `i64` coordinates.
///
fn grow_step(pos: i64, size: i64, range: &Span) -> Option<Option<(usize, i64, i64)>> {
    let end = pos + size - 1;
    let side = if range.end > end {
        0
    } else if range.start < pos {
        1
    } else {
        return None;
    };

    let grown = size.checked_mul(2).and_then(|new_size| {
        let new_pos = if side == 0 { pos } else { pos.checked_sub(size)? };
        // last base of the new root must be representable too
        new_pos.checked_add(new_size - 1)?;
        Some((side, new_pos, new_size))
    });
    Some(grown)
}

impl<S: ObjectStore> BinIndex<S> {
    /// Location of a contig's root bin.
    pub fn root_location(&self, contig: RecordId) -> Result<BinLocation> {
        let root_id = self.store.contig(contig)?.root;
        let root = self.store.bin(root_id)?;
        Ok(BinLocation {
            bin: root_id,
            contig,
            transform: Transform::IDENTITY.enter(root),
            size: root.size,
        })
    }

    /// Locations of the existing children of a bin, left to right in its frame.
    pub fn child_locations(&self, loc: &BinLocation) -> Result<Vec<BinLocation>> {
        let bin = self.store.bin(loc.bin)?;
        bin.children()
            .map(|id| Ok(loc.child(id, self.store.bin(id)?)))
            .collect()
    }

    ///
    /// Work out where an arbitrary bin sits by walking up to the root.
    ///
    pub fn bin_position(&self, bin_id: RecordId) -> Result<BinLocation> {
        let size = self.store.bin(bin_id)?.size;
        let mut transform = Transform::IDENTITY;
        let mut id = bin_id;
        loop {
            let bin = self.store.bin(id)?;
            transform = transform.lift(bin);
            match bin.parent {
                Parent::Bin(parent) => id = parent,
                Parent::Contig(contig) => {
                    return Ok(BinLocation {
                        bin: bin_id,
                        contig,
                        transform,
                        size,
                    });
                }
            }
        }
    }

    ///
    /// Find the smallest bin whose span contains `range` (absolute coordinates).
    ///
    /// With `extend` the tree grows as needed: new roots are added above the current
    /// one until the range fits, and missing children are created on the way down.
    /// Without it only existing bins are considered, and a range outside the root
    /// yields [`BinIndexError::OutOfRange`].
    ///
    pub fn bin_for_range(
        &mut self,
        contig: RecordId,
        range: Span,
        extend: bool,
    ) -> Result<BinLocation> {
        if range.is_empty() {
            return Err(BinIndexError::InvalidRange {
                start: range.start,
                end: range.end,
            });
        }

        let epoch = self.store.contig(contig)?.layout_epoch;
        let start = match self.cache.lookup(contig, epoch, &range) {
            Some(loc) => loc,
            None => {
                if extend {
                    self.grow_to_fit(contig, &range)?;
                }
                let root = self.root_location(contig)?;
                if !root.span().contains(&range) {
                    return Err(BinIndexError::OutOfRange(range));
                }
                root
            }
        };

        let loc = self.descend(start, &range, extend)?;
        self.cache.remember(&mut self.store, epoch, loc)?;
        Ok(loc)
    }

    ///
    /// Add roots above the current one until `range` fits.
    ///
    /// Each new root is twice as wide and uncomplemented. The old root becomes its
    /// left child when growing right, its right child when growing left; absolute
    /// coordinates of everything below are unchanged either way.
    ///
    /// Fails with [`BinIndexError::OutOfRange`] before creating anything if the
    /// roots needed would not fit in `i64` coordinates.
    ///
    fn grow_to_fit(&mut self, contig: RecordId, range: &Span) -> Result<()> {
        let root = self.store.bin(self.store.contig(contig)?.root)?;
        let (mut pos, mut size) = (root.pos, root.size);
        while let Some(step) = grow_step(pos, size, range) {
            let (_, new_pos, new_size) = step.ok_or(BinIndexError::OutOfRange(*range))?;
            (pos, size) = (new_pos, new_size);
        }

        loop {
            let old_id = self.store.contig(contig)?.root;
            let old = self.store.bin(old_id)?;
            let (side, pos, size) = match grow_step(old.pos, old.size, range) {
                Some(step) => step.ok_or(BinIndexError::OutOfRange(*range))?,
                None => return Ok(()),
            };
            let old_pos = if side == 0 { 0 } else { old.size };

            let mut root = Bin::new_root(contig, pos, size);
            root.child[side] = Some(old_id);
            root.nseqs = old.nseqs;

            // create first: a failure here leaves the old tree untouched
            let new_id = self.store.create(Record::Bin(root))?;

            let old = self.store.bin_mut(old_id)?;
            old.pos = old_pos;
            old.parent = Parent::Bin(new_id);
            self.store.contig_mut(contig)?.root = new_id;

            debug!(
                "contig {}: grew {} to new root bin {} ({} bases)",
                contig,
                if side == 0 { "right" } else { "left" },
                new_id,
                size
            );
        }
    }

    fn descend(&mut self, start: BinLocation, range: &Span, extend: bool) -> Result<BinLocation> {
        let mut loc = start;
        loop {
            let local = loc.transform.span_to_local(*range);
            let bin = self.store.bin(loc.bin)?;
            let child_ids = bin.child;
            let size = bin.size;

            let mut spans = [None, None];
            let mut next = None;
            for (side, id) in child_ids.iter().enumerate() {
                if let Some(id) = id {
                    let child = self.store.bin(*id)?;
                    let span = child.span_in_parent();
                    if span.contains(&local) {
                        next = Some(loc.child(*id, child));
                        break;
                    }
                    spans[side] = Some(span);
                }
            }

            if next.is_none() && extend && size > self.config.bins.min_size {
                if let Some((side, span)) = new_child_span(size, spans[0], spans[1], &local) {
                    let id = self.create_child(loc.bin, side, span)?;
                    next = Some(loc.child(id, self.store.bin(id)?));
                }
            }

            match next {
                Some(child) => loc = child,
                None => return Ok(loc),
            }
        }
    }

    fn create_child(&mut self, parent: RecordId, side: usize, span: Span) -> Result<RecordId> {
        let id = self
            .store
            .create(Record::Bin(Bin::new_child(parent, span.start, span.len())))?;
        self.store.bin_mut(parent)?.child[side] = Some(id);
        debug!(
            "bin {}: created {} child {} at {}",
            parent,
            if side == 0 { "left" } else { "right" },
            id,
            span
        );
        Ok(id)
    }
}
