//! Read-only walks over a contig's tree.

use asmbin_core::models::{ItemKind, RecordId, Span};
use asmbin_core::store::{ObjectStore, StoreExt};

use crate::errors::Result;
use crate::index::BinIndex;
use crate::placement::{ItemPosition, item_position};
use crate::transform::BinLocation;

/// Summary of one contig's tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContigStats {
    pub name: String,
    pub extent: Option<Span>,
    /// Absolute span of the root bin.
    pub root_span: Span,
    pub nseqs: i64,
    /// Live ranges of either kind.
    pub items: usize,
    pub bins: usize,
    /// Number of levels, counting the root as one.
    pub depth: usize,
}

impl<S: ObjectStore> BinIndex<S> {
    ///
    /// Every placed item overlapping `span` (absolute), optionally restricted to one
    /// kind, ordered by start, then end, then record id.
    ///
    /// Subtrees whose span misses the query are not visited.
    ///
    pub fn items_in_range(
        &self,
        contig: RecordId,
        span: Span,
        kind: Option<ItemKind>,
    ) -> Result<Vec<ItemPosition>> {
        let mut found = Vec::new();
        self.visit_overlapping(contig, &span, |index, loc| {
            let bin = index.store.bin(loc.bin)?;
            found.extend(
                bin.ranges
                    .iter()
                    .filter(|(_, r)| kind.is_none_or(|k| r.kind == k))
                    .map(|(slot, r)| item_position(loc, slot, r))
                    .filter(|p| p.span().overlaps(&span)),
            );
            Ok(())
        })?;
        found.sort_by_key(|p| (p.start, p.end, p.rec));
        Ok(found)
    }

    pub fn contig_stats(&self, contig: RecordId) -> Result<ContigStats> {
        let record = self.store.contig(contig)?;
        let root = self.root_location(contig)?;

        let mut items = 0;
        let mut bins = 0;
        let mut depth = 0;
        let mut stack = vec![(root, 1)];
        while let Some((loc, level)) = stack.pop() {
            bins += 1;
            depth = depth.max(level);
            items += self.store.bin(loc.bin)?.ranges.len();
            stack.extend(self.child_locations(&loc)?.into_iter().map(|c| (c, level + 1)));
        }

        Ok(ContigStats {
            name: record.name.clone(),
            extent: record.extent,
            root_span: root.span(),
            nseqs: self.store.bin(root.bin)?.nseqs,
            items,
            bins,
            depth,
        })
    }

    ///
    /// Depth-first walk over the bins whose absolute span overlaps `span`, parents
    /// before children.
    ///
    pub fn visit_overlapping<F>(&self, contig: RecordId, span: &Span, mut visit: F) -> Result<()>
    where
        F: FnMut(&Self, &BinLocation) -> Result<()>,
    {
        let mut stack = vec![self.root_location(contig)?];
        while let Some(loc) = stack.pop() {
            if !loc.span().overlaps(span) {
                continue;
            }
            visit(self, &loc)?;
            // pushed right to left so the left child is visited first
            let mut children = self.child_locations(&loc)?;
            children.reverse();
            stack.extend(children);
        }
        Ok(())
    }
}
