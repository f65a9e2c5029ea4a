//! Structural consistency check for a contig's tree.

use fxhash::FxHashSet as HashSet;
use thiserror::Error;

use asmbin_core::models::{ItemKind, Parent, RangeSlot, RecordId, Span};
use asmbin_core::store::{ObjectStore, StoreExt};

use crate::errors::Result;
use crate::index::BinIndex;

/// One violated invariant found by [`BinIndex::check_contig`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Inconsistency {
    #[error("bin {bin}: parent link is {found:?}, expected {expected:?}")]
    BadParent {
        bin: RecordId,
        expected: Parent,
        found: Parent,
    },

    #[error("bin {bin}: nseqs is {found}, ranges and children give {expected}")]
    NseqsMismatch {
        bin: RecordId,
        expected: i64,
        found: i64,
    },

    #[error("bin {bin}: range in slot {slot} at {span} lies outside [0, {size})")]
    RangeOutOfBounds {
        bin: RecordId,
        slot: usize,
        span: Span,
        size: i64,
    },

    #[error("bin {bin}: range in slot {slot} at {span} is outside the used span")]
    RangeOutsideUsed { bin: RecordId, slot: usize, span: Span },

    #[error("bin {bin}: child {child} at {span} does not fit in [0, {size})")]
    ChildOutOfBounds {
        bin: RecordId,
        child: RecordId,
        span: Span,
        size: i64,
    },

    #[error("bin {bin}: children overlap at {left} and {right}")]
    ChildrenOverlap { bin: RecordId, left: Span, right: Span },

    #[error("bin {bin}: has children but its size {size} is at or below the minimum")]
    ChildrenBelowMinimum { bin: RecordId, size: i64 },

    #[error("bin {bin}: free list reaches {listed} of {free} free slots")]
    FreeListCorrupt {
        bin: RecordId,
        listed: usize,
        free: usize,
    },

    #[error("bin {bin}: live range count is {counted}, table records {recorded}")]
    RangeCountMismatch {
        bin: RecordId,
        counted: usize,
        recorded: usize,
    },

    #[error("{kind} item {rec}: directory says bin {claimed:?}, found in bin {found:?}")]
    DirectoryMismatch {
        kind: ItemKind,
        rec: RecordId,
        claimed: Option<RecordId>,
        found: Option<RecordId>,
    },
}

impl<S: ObjectStore> BinIndex<S> {
    ///
    /// Walk a contig's tree and report every broken invariant. An empty list means
    /// the tree is consistent.
    ///
    /// Records that cannot be checked out at all are an error rather than an
    /// inconsistency, since nothing below them can be examined.
    ///
    pub fn check_contig(&self, contig: RecordId) -> Result<Vec<Inconsistency>> {
        let min_size = self.config.bins.min_size;
        let mut problems = Vec::new();
        let mut visited = HashSet::default();

        let root = self.store.contig(contig)?.root;
        let mut stack = vec![(root, Parent::Contig(contig))];
        while let Some((id, expected_parent)) = stack.pop() {
            visited.insert(id);
            let bin = self.store.bin(id)?;

            if bin.parent != expected_parent {
                problems.push(Inconsistency::BadParent {
                    bin: id,
                    expected: expected_parent,
                    found: bin.parent,
                });
            }

            let mut expected_nseqs = 0;
            for (slot, range) in bin.ranges.iter() {
                let span = range.span();
                if !bin.local_span().contains(&span) {
                    problems.push(Inconsistency::RangeOutOfBounds {
                        bin: id,
                        slot,
                        span,
                        size: bin.size,
                    });
                }
                if !bin.used.is_some_and(|u| u.contains(&span)) {
                    problems.push(Inconsistency::RangeOutsideUsed { bin: id, slot, span });
                }
                if range.kind.is_sequence() {
                    expected_nseqs += 1;
                }

                let claimed = self.claimed_bin(range.kind, range.rec);
                if claimed != Some(id) {
                    problems.push(Inconsistency::DirectoryMismatch {
                        kind: range.kind,
                        rec: range.rec,
                        claimed,
                        found: Some(id),
                    });
                }
            }

            let counted = bin.ranges.iter().count();
            if counted != bin.ranges.len() {
                problems.push(Inconsistency::RangeCountMismatch {
                    bin: id,
                    counted,
                    recorded: bin.ranges.len(),
                });
            }
            let free = bin
                .ranges
                .slots()
                .iter()
                .filter(|s| matches!(s, RangeSlot::Free { .. }))
                .count();
            let listed = bin.ranges.free_slots().len();
            if listed != free {
                problems.push(Inconsistency::FreeListCorrupt {
                    bin: id,
                    listed,
                    free,
                });
            }

            if bin.has_children() && bin.size <= min_size {
                problems.push(Inconsistency::ChildrenBelowMinimum {
                    bin: id,
                    size: bin.size,
                });
            }

            let mut child_spans = Vec::with_capacity(2);
            for child_id in bin.children() {
                let child = self.store.bin(child_id)?;
                let span = child.span_in_parent();
                if !bin.local_span().contains(&span) {
                    problems.push(Inconsistency::ChildOutOfBounds {
                        bin: id,
                        child: child_id,
                        span,
                        size: bin.size,
                    });
                }
                expected_nseqs += child.nseqs;
                child_spans.push(span);
                stack.push((child_id, Parent::Bin(id)));
            }
            if let [left, right] = child_spans[..] {
                if left.overlaps(&right) {
                    problems.push(Inconsistency::ChildrenOverlap { bin: id, left, right });
                }
            }

            if bin.nseqs != expected_nseqs {
                problems.push(Inconsistency::NseqsMismatch {
                    bin: id,
                    expected: expected_nseqs,
                    found: bin.nseqs,
                });
            }
        }

        // directory entries pointing into this tree must be backed by a range
        for (&(kind, rec), &claimed) in self.items.iter() {
            if !visited.contains(&claimed) {
                continue;
            }
            if self.store.bin(claimed)?.ranges.find(kind, rec).is_none() {
                problems.push(Inconsistency::DirectoryMismatch {
                    kind,
                    rec,
                    claimed: Some(claimed),
                    found: None,
                });
            }
        }

        Ok(problems)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use asmbin_core::Config;
    use asmbin_core::models::Item;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    fn placed() -> (BinIndex, RecordId) {
        let mut config = Config::default();
        config.bins.initial_size = 1024;
        config.bins.min_size = 128;
        let mut index = BinIndex::in_memory(config).unwrap();
        let ctg = index.create_contig("ctg").unwrap();
        index.place(ctg, Span::new(10, 20), Item::sequence(1)).unwrap();
        index.place(ctg, Span::new(600, 700), Item::sequence(2)).unwrap();
        index.place(ctg, Span::new(0, 900), Item::annotation(3)).unwrap();
        index.place(ctg, Span::new(3000, 3100), Item::sequence(4)).unwrap();
        (index, ctg)
    }

    #[rstest]
    fn test_consistent_tree(placed: (BinIndex, RecordId)) {
        let (index, ctg) = placed;
        assert_eq!(index.check_contig(ctg).unwrap(), vec![]);
    }

    #[rstest]
    fn test_nseqs_mismatch(placed: (BinIndex, RecordId)) {
        let (mut index, ctg) = placed;
        let bin = index.claimed_bin(ItemKind::Sequence, RecordId(2)).unwrap();
        index.store_mut().bin_mut(bin).unwrap().nseqs += 1;

        let problems = index.check_contig(ctg).unwrap();
        // the bin itself and its parent, whose sum no longer matches
        assert_eq!(problems.len(), 2);
        assert!(problems.contains(&Inconsistency::NseqsMismatch {
            bin,
            expected: 1,
            found: 2,
        }));
    }

    #[rstest]
    fn test_range_removed_behind_directory(placed: (BinIndex, RecordId)) {
        let (mut index, ctg) = placed;
        let bin = index.claimed_bin(ItemKind::Annotation, RecordId(3)).unwrap();
        let ranges = &mut index.store_mut().bin_mut(bin).unwrap().ranges;
        let slot = ranges.find(ItemKind::Annotation, RecordId(3)).unwrap();
        ranges.remove(slot);

        let problems = index.check_contig(ctg).unwrap();
        assert_eq!(
            problems,
            vec![Inconsistency::DirectoryMismatch {
                kind: ItemKind::Annotation,
                rec: RecordId(3),
                claimed: Some(bin),
                found: None,
            }]
        );
    }

    #[rstest]
    fn test_bad_parent_link(placed: (BinIndex, RecordId)) {
        let (mut index, ctg) = placed;
        let bin = index.claimed_bin(ItemKind::Sequence, RecordId(1)).unwrap();
        let parent = match index.bin(bin).unwrap().parent {
            Parent::Bin(p) => p,
            Parent::Contig(_) => panic!("sequence 1 should not sit in the root"),
        };
        index.store_mut().bin_mut(bin).unwrap().parent = Parent::Bin(bin);

        let problems = index.check_contig(ctg).unwrap();
        assert_eq!(
            problems,
            vec![Inconsistency::BadParent {
                bin,
                expected: Parent::Bin(parent),
                found: Parent::Bin(bin),
            }]
        );
    }

    #[rstest]
    fn test_children_below_minimum(placed: (BinIndex, RecordId)) {
        let (mut index, ctg) = placed;
        let bin = index.claimed_bin(ItemKind::Sequence, RecordId(1)).unwrap();
        let parent = match index.bin(bin).unwrap().parent {
            Parent::Bin(p) => p,
            Parent::Contig(_) => panic!("sequence 1 should not sit in the root"),
        };
        // a 256 bin shrunk to the minimum while it still has a child
        index.store_mut().bin_mut(parent).unwrap().size = 128;

        let problems = index.check_contig(ctg).unwrap();
        assert!(problems.contains(&Inconsistency::ChildrenBelowMinimum {
            bin: parent,
            size: 128,
        }));
    }
}
