use std::io::Write;
use std::path::Path;

use rstest::*;
use tempfile::NamedTempFile;

use asmbin_core::Config;
use asmbin_core::models::{Bin, Contig, ItemKind, Record, RecordId, Span};
use asmbin_core::store::{MemoryStore, ObjectStore, StoreError, StoreExt};
use asmbin_core::utils::read_placements;

#[fixture]
fn config_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[bins]\ninitial_size = 2048\nmin_size = 256\n\n[tracks]\nsamples = 64").unwrap();
    file
}

mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[rstest]
    fn test_config_from_file(config_file: NamedTempFile) {
        let config = Config::try_from(config_file.path()).unwrap();
        assert_eq!(config.bins.initial_size, 2048);
        assert_eq!(config.bins.min_size, 256);
        assert_eq!(config.tracks.samples, 64);
        // untouched sections keep their defaults
        assert_eq!(config.tracks.raw_bpv, 2.0);
        assert_eq!(config.store.max_records, None);
    }

    #[rstest]
    fn test_missing_config_file() {
        assert!(Config::try_from(Path::new("/definitely/not/here.toml")).is_err());
    }

    #[rstest]
    fn test_store_links_contig_and_root() {
        let mut store = MemoryStore::with_capacity_limit(2);
        let contig = store
            .create(Record::Contig(Contig::new("ctg1", RecordId::NONE)))
            .unwrap();
        let root = store
            .create(Record::Bin(Bin::new_root(contig, 0, 1024)))
            .unwrap();
        store.contig_mut(contig).unwrap().root = root;

        assert_eq!(store.contig(contig).unwrap().root, root);
        assert_eq!(store.bin(root).unwrap().local_span(), Span::new(0, 1023));
        assert!(matches!(
            store.bin(contig),
            Err(StoreError::WrongKind { .. })
        ));
        assert_eq!(
            store.create(Record::Bin(Bin::new_root(contig, 0, 1))),
            Err(StoreError::Exhausted(3))
        );
    }

    #[rstest]
    fn test_read_placements_skips_headers_and_bad_lines() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "browser position ctg1:1-100").unwrap();
        writeln!(file, "track name=reads").unwrap();
        writeln!(file, "ctg1\t0\t100").unwrap();
        writeln!(file, "ctg1\t10\t10").unwrap();
        writeln!(file, "ctg2\t5\t15\tanno\t42").unwrap();

        let records = read_placements(file.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].span, Span::new(0, 99));
        assert_eq!(records[1].kind, ItemKind::Annotation);
        assert_eq!(records[1].id, Some(42));
    }
}
