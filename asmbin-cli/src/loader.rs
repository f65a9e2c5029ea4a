use std::path::Path;

use anyhow::{Context, Result, anyhow};
use clap::ArgMatches;
use fxhash::FxHashMap as HashMap;
use log::{info, warn};

use asmbin_binindex::{BinIndex, BinIndexError};
use asmbin_core::models::{Item, ItemKind, RecordId};
use asmbin_core::utils::read_placements;
use asmbin_core::Config;

/// A bin index built from a placement file, with its contigs by name.
pub struct LoadedIndex {
    pub index: BinIndex,
    pub contigs: HashMap<String, RecordId>,
}

impl LoadedIndex {
    /// Contig names in sorted order.
    pub fn contig_names(&self) -> Vec<&String> {
        let mut names: Vec<&String> = self.contigs.keys().collect();
        names.sort();
        names
    }
}

/// The `--config` file if given, defaults otherwise.
pub fn config_from_matches(matches: &ArgMatches) -> Result<Config> {
    match matches.get_one::<String>("config") {
        Some(path) => Config::try_from(Path::new(path))
            .with_context(|| format!("Failed to load config from {}", path)),
        None => Ok(Config::default()),
    }
}

///
/// Place every record of a placement file into a fresh in-memory index.
///
/// Items without an id in the file are numbered after the largest explicit id.
/// An item placed twice is reported and skipped.
///
pub fn load_index(path: &Path, config: Config) -> Result<LoadedIndex> {
    let records = read_placements(path)?;
    let mut index = BinIndex::in_memory(config)?;
    let mut contigs: HashMap<String, RecordId> = HashMap::default();

    let mut next_id = records.iter().filter_map(|r| r.id).max().unwrap_or(0);
    let mut placed = 0;
    for record in &records {
        let contig = match contigs.get(&record.contig) {
            Some(id) => *id,
            None => {
                let id = index.create_contig(&record.contig)?;
                contigs.insert(record.contig.clone(), id);
                id
            }
        };

        let id = match record.id {
            Some(id) => id,
            None => {
                next_id = next_id.checked_add(1).ok_or_else(|| {
                    anyhow!(
                        "No item ids left for unnumbered placement at {}:{}",
                        record.contig,
                        record.span
                    )
                })?;
                next_id
            }
        };
        let item = match record.kind {
            ItemKind::Sequence => Item::sequence(id),
            ItemKind::Annotation => Item::annotation(id),
        };

        match index.place(contig, record.span, item) {
            Ok(_) => placed += 1,
            Err(e @ BinIndexError::AlreadyPlaced { .. }) => warn!("Skipping {}: {}", item, e),
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to place {} at {}:{}", item, record.contig, record.span)
                });
            }
        }
    }

    info!(
        "Loaded {} of {} placements onto {} contigs from {:?}",
        placed,
        records.len(),
        contigs.len(),
        path
    );
    Ok(LoadedIndex { index, contigs })
}
