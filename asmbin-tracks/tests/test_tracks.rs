use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rstest::*;

use asmbin_binindex::{BinIndex, TrackScope};
use asmbin_core::Config;
use asmbin_core::models::{Item, ItemKind, RecordId, Span, TrackType};
use asmbin_tracks::TrackQuery;

#[fixture]
fn config() -> Config {
    let mut config = Config::default();
    config.bins.initial_size = 1024;
    config.bins.min_size = 128;
    config.tracks.samples = 16;
    config
}

/// An index with one contig holding random sequences and annotations inside
/// `[lo, hi]`. Returns the placed items.
fn random_contig(
    config: Config,
    seed: u64,
    lo: i64,
    hi: i64,
    n: u64,
) -> (BinIndex, RecordId, Vec<Item>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut index = BinIndex::in_memory(config).unwrap();
    let ctg = index.create_contig("ctg").unwrap();

    let mut items = Vec::new();
    for rec in 1..=n {
        let start = rng.random_range(lo..hi);
        let end = (start + rng.random_range(0..300)).min(hi);
        let item = if rng.random_bool(0.75) {
            Item::sequence(rec)
        } else {
            Item::annotation(rec)
        };
        index.place(ctg, Span::new(start, end), item).unwrap();
        items.push(item);
    }
    (index, ctg, items)
}

/// Per-base depth recounted from each item's current position.
fn brute_force(index: &BinIndex, items: &[Item], track_type: TrackType, span: Span) -> Vec<f64> {
    let mut depth = vec![0.0; span.len() as usize];
    for item in items.iter().filter(|i| track_type.counts(i.kind)) {
        let pos = index.locate(item.kind, item.rec).unwrap();
        if let Some(part) = pos.span().intersect(&span) {
            for x in part.start..=part.end {
                depth[(x - span.start) as usize] += 1.0;
            }
        }
    }
    depth
}

fn window_means(per_base: &[f64], width: usize) -> Vec<f64> {
    per_base
        .chunks(width)
        .map(|c| c.iter().sum::<f64>() / c.len() as f64)
        .collect()
}

fn assert_close(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len());
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert!((a - e).abs() < 1e-9, "window {}: got {}, expected {}", i, a, e);
    }
}

mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[rstest]
    #[case(Span::new(0, 999), 3.0, 334)]
    #[case(Span::new(-500, 4999), 1.0, 5500)]
    #[case(Span::new(100, 100), 64.0, 1)]
    #[case(Span::new(0, 1023), 2.5, 410)]
    #[case(Span::new(0, 1023), 64.0, 16)]
    fn test_sample_count(
        config: Config,
        #[case] span: Span,
        #[case] resolution: f64,
        #[case] expected: usize,
    ) {
        let (mut index, ctg, _) = random_contig(config, 1, 0, 2000, 50);
        let values = index
            .query_track(ctg, span, TrackType::ReadDepth, resolution)
            .unwrap();
        assert_eq!(values.len(), expected);
    }

    #[rstest]
    #[case(TrackType::ReadDepth)]
    #[case(TrackType::AnnotationDepth)]
    fn test_finest_resolution_matches_brute_force(config: Config, #[case] track_type: TrackType) {
        let (mut index, ctg, items) = random_contig(config, 42, -800, 3000, 200);
        let span = Span::new(-1000, 3100);

        let values = index.query_track(ctg, span, track_type, 1.0).unwrap();
        assert_eq!(values, brute_force(&index, &items, track_type, span));
    }

    #[rstest]
    #[case(8)]
    #[case(16)]
    #[case(32)]
    #[case(64)]
    #[case(128)]
    fn test_coarse_resolution_matches_window_means(config: Config, #[case] width: usize) {
        // everything inside the initial root, so bin tracks line up with the windows
        let (mut index, ctg, items) = random_contig(config, 7, 0, 1023, 150);
        let span = Span::new(0, 1023);

        let values = index
            .query_track(ctg, span, TrackType::ReadDepth, width as f64)
            .unwrap();
        let per_base = brute_force(&index, &items, TrackType::ReadDepth, span);
        assert_close(&values, &window_means(&per_base, width));
    }

    #[rstest]
    fn test_queries_follow_edits(config: Config) {
        let (mut index, ctg, mut items) = random_contig(config, 3, 0, 1023, 80);
        let span = Span::new(0, 1023);
        index.query_track(ctg, span, TrackType::ReadDepth, 64.0).unwrap();

        for item in items.drain(..20) {
            index.unplace(item.kind, item.rec).unwrap();
        }
        index
            .place(ctg, Span::new(200, 700), Item::sequence(1000))
            .unwrap();
        items.push(Item::sequence(1000));

        let per_base = brute_force(&index, &items, TrackType::ReadDepth, span);
        for width in [64, 16] {
            let values = index
                .query_track(ctg, span, TrackType::ReadDepth, width as f64)
                .unwrap();
            assert_close(&values, &window_means(&per_base, width));
        }
    }

    #[rstest]
    fn test_complement_reverses_depth_without_recompute(config: Config) {
        let (mut index, ctg, items) = random_contig(config, 11, 0, 1023, 100);
        // pin the extent to the root span so the mirror is x -> 1023 - x
        index.place(ctg, Span::new(0, 0), Item::sequence(500)).unwrap();
        index.place(ctg, Span::new(1023, 1023), Item::sequence(501)).unwrap();
        let span = Span::new(0, 1023);

        let before = index
            .query_track(ctg, span, TrackType::ReadDepth, 64.0)
            .unwrap();
        let root = index.contig(ctg).unwrap().root;
        let revision = index
            .bin_query_track(root, TrackType::ReadDepth)
            .unwrap()
            .revision;

        index.complement_contig(ctg).unwrap();

        let after = index
            .query_track(ctg, span, TrackType::ReadDepth, 64.0)
            .unwrap();
        let mut reversed = before.clone();
        reversed.reverse();
        assert_close(&after, &reversed);

        let track = index.bin_query_track(root, TrackType::ReadDepth).unwrap();
        assert_eq!(track.revision, revision);

        let mut all = items;
        all.extend([Item::sequence(500), Item::sequence(501)]);
        let per_base = brute_force(&index, &all, TrackType::ReadDepth, span);
        assert_close(&after, &window_means(&per_base, 64));
    }

    #[rstest]
    fn test_complemented_subtree_after_growth(config: Config) {
        let (mut index, ctg, mut items) = random_contig(config, 5, 0, 1023, 60);
        index.place(ctg, Span::new(0, 9), Item::sequence(900)).unwrap();
        index.place(ctg, Span::new(1014, 1023), Item::sequence(901)).unwrap();
        items.extend([Item::sequence(900), Item::sequence(901)]);

        index.complement_contig(ctg).unwrap();
        // grow past the reversed root and edit on both sides
        index
            .place(ctg, Span::new(1500, 1900), Item::sequence(902))
            .unwrap();
        index
            .place(ctg, Span::new(300, 340), Item::sequence(903))
            .unwrap();
        items.extend([Item::sequence(902), Item::sequence(903)]);
        assert!(index.locate(ItemKind::Sequence, RecordId(903)).unwrap().complemented);

        let span = Span::new(0, 2047);
        let per_base = brute_force(&index, &items, TrackType::ReadDepth, span);
        for width in [1, 16, 128] {
            let values = index
                .query_track(ctg, span, TrackType::ReadDepth, width as f64)
                .unwrap();
            assert_close(&values, &window_means(&per_base, width));
        }
    }

    #[rstest]
    fn test_invalidate_twice_then_one_recompute(config: Config) {
        let (mut index, ctg, _) = random_contig(config, 9, 0, 1023, 30);
        let span = Span::new(0, 1023);
        let first = index
            .query_track(ctg, span, TrackType::ReadDepth, 64.0)
            .unwrap();
        let root = index.contig(ctg).unwrap().root;

        index.invalidate_track(TrackScope::Contig(ctg), None).unwrap();
        assert_eq!(
            index.invalidate_track(TrackScope::Contig(ctg), None).unwrap(),
            0
        );

        let second = index
            .query_track(ctg, span, TrackType::ReadDepth, 64.0)
            .unwrap();
        assert_close(&second, &first);
        let track = index.bin_query_track(root, TrackType::ReadDepth).unwrap();
        assert_eq!(track.revision, 2);
    }
}
