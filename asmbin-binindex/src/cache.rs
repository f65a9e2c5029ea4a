use log::trace;

use asmbin_core::models::{RecordId, Span};
use asmbin_core::store::{ObjectStore, StoreResult};

use crate::transform::BinLocation;

#[derive(Debug, Clone, Copy)]
struct CachedBin {
    /// Layout epoch of the contig when the location was resolved.
    epoch: u64,
    loc: BinLocation,
}

///
/// Single-slot cache of the most recently resolved bin.
///
/// A lookup whose range falls inside the cached bin starts its descent there
/// instead of at the root, which gives the same answer as a full descent: bin
/// spans nest, so every ancestor of the cached bin would have been passed on the
/// way down anyway. The cached bin stays pinned in the store until it is replaced
/// or the cache is cleared.
///
#[derive(Debug, Default)]
pub struct BinCache {
    slot: Option<CachedBin>,
    hits: u64,
    misses: u64,
}

impl BinCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached location if it belongs to `contig`, is still current and
    /// contains `range`.
    pub fn lookup(&mut self, contig: RecordId, epoch: u64, range: &Span) -> Option<BinLocation> {
        match self.slot {
            Some(cached)
                if cached.loc.contig == contig
                    && cached.epoch == epoch
                    && cached.loc.span().contains(range) =>
            {
                self.hits += 1;
                trace!("bin cache hit: bin {} for {}", cached.loc.bin, range);
                Some(cached.loc)
            }
            _ => {
                self.misses += 1;
                None
            }
        }
    }

    /// Make `loc` the cached bin, pinning it and unpinning the previous one.
    pub fn remember<S: ObjectStore + ?Sized>(
        &mut self,
        store: &mut S,
        epoch: u64,
        loc: BinLocation,
    ) -> StoreResult<()> {
        if let Some(cached) = self.slot {
            if cached.loc == loc && cached.epoch == epoch {
                return Ok(());
            }
        }
        store.pin(loc.bin)?;
        if let Some(old) = self.slot.take() {
            store.unpin(old.loc.bin)?;
        }
        self.slot = Some(CachedBin { epoch, loc });
        Ok(())
    }

    /// Forget the cached bin and release its pin.
    pub fn clear<S: ObjectStore + ?Sized>(&mut self, store: &mut S) -> StoreResult<()> {
        if let Some(old) = self.slot.take() {
            store.unpin(old.loc.bin)?;
        }
        Ok(())
    }

    pub fn cached_bin(&self) -> Option<RecordId> {
        self.slot.map(|c| c.loc.bin)
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}
