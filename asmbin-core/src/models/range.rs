use super::{ItemKind, RecordId, Span};

/// One item's placement inside a bin, in the bin's local coordinates.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct Range {
    /// Local start, inclusive.
    pub start: i64,
    /// Local end, inclusive.
    pub end: i64,
    pub kind: ItemKind,
    /// The placed item's record identity.
    pub rec: RecordId,
}

impl Range {
    #[inline]
    pub fn span(&self) -> Span {
        Span {
            start: self.start,
            end: self.end,
        }
    }
}

/// A slot in a [`RangeTable`]. Deleted slots are threaded into a free list
/// through `next` and handed out again before the table grows.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum RangeSlot {
    Used(Range),
    Free { next: Option<usize> },
}

/// Per-bin sparse array of placements with free-slot reuse.
///
/// Slots are never compacted, so a slot index stays valid for the lifetime of
/// the placement that owns it.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct RangeTable {
    slots: Vec<RangeSlot>,
    /// Head of the free list, `None` when no slot is free.
    rng_free: Option<usize>,
    used: usize,
}

impl RangeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a range, reusing the most recently freed slot if there is one.
    /// Returns the slot index.
    pub fn insert(&mut self, range: Range) -> usize {
        self.used += 1;
        match self.rng_free {
            Some(idx) => {
                if let RangeSlot::Free { next } = self.slots[idx] {
                    self.rng_free = next;
                }
                self.slots[idx] = RangeSlot::Used(range);
                idx
            }
            None => {
                self.slots.push(RangeSlot::Used(range));
                self.slots.len() - 1
            }
        }
    }

    /// Free a slot and return the range that lived there. Freeing an already
    /// free or out-of-bounds slot is a no-op returning `None`.
    pub fn remove(&mut self, idx: usize) -> Option<Range> {
        match self.slots.get(idx) {
            Some(RangeSlot::Used(range)) => {
                let range = *range;
                self.slots[idx] = RangeSlot::Free {
                    next: self.rng_free,
                };
                self.rng_free = Some(idx);
                self.used -= 1;
                Some(range)
            }
            _ => None,
        }
    }

    pub fn get(&self, idx: usize) -> Option<&Range> {
        match self.slots.get(idx) {
            Some(RangeSlot::Used(range)) => Some(range),
            _ => None,
        }
    }

    /// Linear scan for the live slot holding the given item.
    pub fn find(&self, kind: ItemKind, rec: RecordId) -> Option<usize> {
        self.iter()
            .find(|(_, r)| r.kind == kind && r.rec == rec)
            .map(|(idx, _)| idx)
    }

    /// Iterate live ranges together with their slot index.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Range)> + '_ {
        self.slots.iter().enumerate().filter_map(|(idx, slot)| match slot {
            RangeSlot::Used(range) => Some((idx, range)),
            RangeSlot::Free { .. } => None,
        })
    }

    /// Number of live ranges.
    pub fn len(&self) -> usize {
        self.used
    }

    pub fn is_empty(&self) -> bool {
        self.used == 0
    }

    /// Number of slots, live or free.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn free_head(&self) -> Option<usize> {
        self.rng_free
    }

    pub fn slots(&self) -> &[RangeSlot] {
        &self.slots
    }

    /// Walk the free list. Stops early (returning what it has) if the list
    /// loops or points outside the table.
    pub fn free_slots(&self) -> Vec<usize> {
        let mut out = Vec::new();
        let mut cursor = self.rng_free;
        while let Some(idx) = cursor {
            if out.len() > self.slots.len() || out.contains(&idx) {
                break;
            }
            match self.slots.get(idx) {
                Some(RangeSlot::Free { next }) => {
                    out.push(idx);
                    cursor = *next;
                }
                _ => break,
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    fn seq(start: i64, end: i64, rec: u64) -> Range {
        Range {
            start,
            end,
            kind: ItemKind::Sequence,
            rec: RecordId(rec),
        }
    }

    #[fixture]
    fn table() -> RangeTable {
        let mut table = RangeTable::new();
        table.insert(seq(0, 10, 1));
        table.insert(seq(5, 20, 2));
        table.insert(seq(30, 40, 3));
        table
    }

    #[rstest]
    fn test_insert_appends(table: RangeTable) {
        assert_eq!(table.len(), 3);
        assert_eq!(table.capacity(), 3);
        assert_eq!(table.free_head(), None);
        assert_eq!(table.get(1), Some(&seq(5, 20, 2)));
    }

    #[rstest]
    fn test_remove_then_insert_reuses_slot(mut table: RangeTable) {
        assert_eq!(table.remove(1), Some(seq(5, 20, 2)));
        assert_eq!(table.len(), 2);
        assert_eq!(table.free_head(), Some(1));

        let idx = table.insert(seq(50, 60, 4));
        assert_eq!(idx, 1);
        assert_eq!(table.capacity(), 3);
        assert_eq!(table.free_head(), None);
    }

    #[rstest]
    fn test_free_list_is_lifo(mut table: RangeTable) {
        table.remove(0);
        table.remove(2);
        assert_eq!(table.free_slots(), vec![2, 0]);

        assert_eq!(table.insert(seq(1, 2, 7)), 2);
        assert_eq!(table.insert(seq(1, 2, 8)), 0);
        assert_eq!(table.insert(seq(1, 2, 9)), 3);
    }

    #[rstest]
    fn test_double_remove_is_noop(mut table: RangeTable) {
        assert!(table.remove(0).is_some());
        assert!(table.remove(0).is_none());
        assert!(table.remove(99).is_none());
        assert_eq!(table.len(), 2);
        assert_eq!(table.free_slots(), vec![0]);
    }

    #[rstest]
    fn test_find_skips_free_slots(mut table: RangeTable) {
        assert_eq!(table.find(ItemKind::Sequence, RecordId(3)), Some(2));
        assert_eq!(table.find(ItemKind::Annotation, RecordId(3)), None);

        table.remove(2);
        assert_eq!(table.find(ItemKind::Sequence, RecordId(3)), None);
        assert_eq!(table.iter().count(), 2);
    }
}
