use fxhash::FxHashMap as HashMap;
use log::debug;

use asmbin_core::Config;
use asmbin_core::models::{Bin, Contig, ItemKind, Parent, Record, RecordId};
use asmbin_core::store::{MemoryStore, ObjectStore, StoreExt};

use crate::cache::BinCache;
use crate::errors::Result;

///
/// A session over the bin trees kept in an object store.
///
/// All operations on a contig's tree go through a `BinIndex`. Mutating calls take
/// `&mut self`, which serializes access to the trees it manages.
///
/// Besides the store, the session owns two pieces of state that are not records:
/// the single-slot [`BinCache`], and the item directory mapping each placed item
/// to the bin that holds it (the back-reference an item record would carry).
///
pub struct BinIndex<S: ObjectStore = MemoryStore> {
    pub(crate) store: S,
    pub(crate) config: Config,
    pub(crate) items: HashMap<(ItemKind, RecordId), RecordId>,
    pub(crate) cache: BinCache,
}

impl BinIndex<MemoryStore> {
    /// An index over a fresh [`MemoryStore`] sized from the config.
    pub fn in_memory(config: Config) -> Result<Self> {
        let store = MemoryStore::from_config(&config.store);
        BinIndex::new(store, config)
    }
}

impl<S: ObjectStore> BinIndex<S> {
    pub fn new(store: S, config: Config) -> Result<Self> {
        config.validate()?;
        Ok(BinIndex {
            store,
            config,
            items: HashMap::default(),
            cache: BinCache::new(),
        })
    }

    ///
    /// Create an empty contig whose root bin covers `[0, initial_size - 1]`.
    ///
    pub fn create_contig(&mut self, name: &str) -> Result<RecordId> {
        let size = self.config.bins.initial_size;
        // root first: a contig record never exists without its root
        let root_id = self
            .store
            .create(Record::Bin(Bin::new_root(RecordId::NONE, 0, size)))?;
        let contig_id = self
            .store
            .create(Record::Contig(Contig::new(name, root_id)))?;
        self.store.bin_mut(root_id)?.parent = Parent::Contig(contig_id);

        debug!("created contig {} ({}) with root bin {}", name, contig_id, root_id);
        Ok(contig_id)
    }

    pub fn contig(&self, id: RecordId) -> Result<&Contig> {
        Ok(self.store.contig(id)?)
    }

    pub fn bin(&self, id: RecordId) -> Result<&Bin> {
        Ok(self.store.bin(id)?)
    }

    /// Number of sequences placed in a contig, read off the root aggregate.
    pub fn nseqs(&self, contig: RecordId) -> Result<i64> {
        let root = self.store.contig(contig)?.root;
        Ok(self.store.bin(root)?.nseqs)
    }

    /// The bin currently holding an item, if it is placed.
    pub fn claimed_bin(&self, kind: ItemKind, rec: RecordId) -> Option<RecordId> {
        self.items.get(&(kind, rec)).copied()
    }

    /// Number of placed items across all contigs.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Direct mutable access to the store. Changing bins or contigs behind the
    /// index's back can break its invariants; [`BinIndex::check_contig`] reports
    /// what went wrong.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn cache(&self) -> &BinCache {
        &self.cache
    }

    /// Release the cache pin and hand back the store.
    pub fn into_store(mut self) -> Result<S> {
        self.cache.clear(&mut self.store)?;
        Ok(self.store)
    }
}
