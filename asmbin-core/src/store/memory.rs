use std::sync::Arc;

use log::trace;

use super::{ObjectStore, StoreError, StoreResult};
use crate::config::StoreConfig;
use crate::models::{Record, RecordId};

#[derive(Debug, Clone)]
struct Slot {
    record: Arc<Record>,
    version: u64,
    pins: u32,
}

///
/// An in-memory [`ObjectStore`].
///
/// Records sit behind an `Arc`, so [`MemoryStore::snapshot`] can hand shared
/// read handles to observers. A write checkout goes through `Arc::make_mut`: if a
/// snapshot is still alive the record is cloned first and the observer keeps the
/// old version. Every write checkout bumps the record's version.
///
/// ```
/// use asmbin_core::models::{Contig, Record, RecordId};
/// use asmbin_core::store::{MemoryStore, ObjectStore, StoreExt};
///
/// let mut store = MemoryStore::default();
/// let id = store.create(Record::Contig(Contig::new("ctg1", RecordId::NONE))).unwrap();
///
/// let before = store.snapshot(id).unwrap();
/// store.contig_mut(id).unwrap().name = "ctg2".to_string();
///
/// assert_eq!(store.contig(id).unwrap().name, "ctg2");
/// assert!(matches!(&*before, Record::Contig(c) if c.name == "ctg1"));
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: Vec<Slot>,
    max_records: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that refuses to create more than `max_records` records.
    pub fn with_capacity_limit(max_records: usize) -> Self {
        MemoryStore {
            slots: Vec::new(),
            max_records: Some(max_records),
        }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        MemoryStore {
            slots: Vec::new(),
            max_records: config.max_records,
        }
    }

    /// Number of records created so far.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// A shared read handle that outlives later write checkouts.
    pub fn snapshot(&self, id: RecordId) -> StoreResult<Arc<Record>> {
        Ok(Arc::clone(&self.slot(id)?.record))
    }

    /// How many write checkouts the record has seen.
    pub fn version(&self, id: RecordId) -> StoreResult<u64> {
        Ok(self.slot(id)?.version)
    }

    pub fn pins(&self, id: RecordId) -> StoreResult<u32> {
        Ok(self.slot(id)?.pins)
    }

    fn index(id: RecordId) -> Option<usize> {
        (id.0 as usize).checked_sub(1)
    }

    fn slot(&self, id: RecordId) -> StoreResult<&Slot> {
        Self::index(id)
            .and_then(|idx| self.slots.get(idx))
            .ok_or(StoreError::MissingRecord(id))
    }

    fn slot_mut(&mut self, id: RecordId) -> StoreResult<&mut Slot> {
        Self::index(id)
            .and_then(|idx| self.slots.get_mut(idx))
            .ok_or(StoreError::MissingRecord(id))
    }
}

impl ObjectStore for MemoryStore {
    fn create(&mut self, record: Record) -> StoreResult<RecordId> {
        if let Some(max) = self.max_records {
            if self.slots.len() >= max {
                return Err(StoreError::Exhausted(self.slots.len() + 1));
            }
        }
        self.slots.push(Slot {
            record: Arc::new(record),
            version: 0,
            pins: 0,
        });
        let id = RecordId(self.slots.len() as u64);
        trace!("created {} record {}", self.slots[id.0 as usize - 1].record.kind(), id);
        Ok(id)
    }

    fn checkout_read(&self, id: RecordId) -> StoreResult<&Record> {
        Ok(&self.slot(id)?.record)
    }

    fn checkout_write(&mut self, id: RecordId) -> StoreResult<&mut Record> {
        let slot = self.slot_mut(id)?;
        slot.version += 1;
        Ok(Arc::make_mut(&mut slot.record))
    }

    fn pin(&mut self, id: RecordId) -> StoreResult<()> {
        self.slot_mut(id)?.pins += 1;
        Ok(())
    }

    fn unpin(&mut self, id: RecordId) -> StoreResult<()> {
        let slot = self.slot_mut(id)?;
        if slot.pins == 0 {
            return Err(StoreError::NotPinned(id));
        }
        slot.pins -= 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::models::{Bin, Contig, RecordKind};
    use crate::store::StoreExt;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    fn store() -> MemoryStore {
        let mut store = MemoryStore::new();
        store
            .create(Record::Contig(Contig::new("ctg", RecordId::NONE)))
            .unwrap();
        store
            .create(Record::Bin(Bin::new_root(RecordId(1), 0, 1024)))
            .unwrap();
        store
    }

    #[rstest]
    fn test_ids_start_at_one(store: MemoryStore) {
        assert_eq!(store.len(), 2);
        assert_eq!(store.contig(RecordId(1)).unwrap().name, "ctg");
        assert_eq!(store.bin(RecordId(2)).unwrap().size, 1024);
        assert_eq!(
            store.checkout_read(RecordId::NONE).unwrap_err(),
            StoreError::MissingRecord(RecordId::NONE)
        );
    }

    #[rstest]
    fn test_wrong_kind(store: MemoryStore) {
        let err = store.bin(RecordId(1)).unwrap_err();
        assert_eq!(
            err,
            StoreError::WrongKind {
                id: RecordId(1),
                expected: RecordKind::Bin,
                found: RecordKind::Contig,
            }
        );
    }

    #[rstest]
    fn test_write_checkout_bumps_version(mut store: MemoryStore) {
        assert_eq!(store.version(RecordId(2)).unwrap(), 0);
        store.bin_mut(RecordId(2)).unwrap().nseqs = 5;
        store.bin_mut(RecordId(2)).unwrap().nseqs += 1;
        assert_eq!(store.version(RecordId(2)).unwrap(), 2);
        assert_eq!(store.bin(RecordId(2)).unwrap().nseqs, 6);
    }

    #[rstest]
    fn test_snapshot_is_copy_on_write(mut store: MemoryStore) {
        let snap = store.snapshot(RecordId(2)).unwrap();
        store.bin_mut(RecordId(2)).unwrap().nseqs = 9;

        match &*snap {
            Record::Bin(bin) => assert_eq!(bin.nseqs, 0),
            _ => panic!("expected a bin"),
        }
        assert_eq!(store.bin(RecordId(2)).unwrap().nseqs, 9);
    }

    #[rstest]
    fn test_capacity_limit() {
        let mut store = MemoryStore::with_capacity_limit(1);
        store
            .create(Record::Contig(Contig::new("a", RecordId::NONE)))
            .unwrap();
        let err = store
            .create(Record::Contig(Contig::new("b", RecordId::NONE)))
            .unwrap_err();
        assert_eq!(err, StoreError::Exhausted(2));
        assert_eq!(store.len(), 1);
    }

    #[rstest]
    fn test_pin_unpin(mut store: MemoryStore) {
        store.pin(RecordId(2)).unwrap();
        store.pin(RecordId(2)).unwrap();
        assert_eq!(store.pins(RecordId(2)).unwrap(), 2);

        store.unpin(RecordId(2)).unwrap();
        store.unpin(RecordId(2)).unwrap();
        assert_eq!(
            store.unpin(RecordId(2)).unwrap_err(),
            StoreError::NotPinned(RecordId(2))
        );
    }
}
