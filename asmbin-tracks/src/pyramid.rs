//! Track queries over a bin tree, served from per-bin cached tracks.
//!
//! Each bin can cache one track per type: `n` mean values over equal windows of
//! its span, kept in the bin's local orientation. A bin track is built from
//! tracks of twice the density further down the tree, and at the bottom from
//! the raw item overlaps. A contig query takes the coarsest cached tracks that
//! are fine enough for the requested resolution, and fills the parts of the
//! span no such bin covers from raw items.

use log::debug;

use asmbin_binindex::{BinIndex, BinLocation};
use asmbin_core::models::{BinTrack, Record, RecordId, Span, Track, TrackType};
use asmbin_core::store::{ObjectStore, StoreExt};

use crate::errors::{Result, TrackError};
use crate::windows::{MAX_WINDOWS, Windows, bin_bpv, bin_samples, window_count};

///
/// Depth track queries over the contigs of a [`BinIndex`].
///
/// Queries may compute and cache tracks, hence `&mut self`.
///
pub trait TrackQuery {
    ///
    /// Mean per-base value of `track_type` over consecutive windows of
    /// `resolution` bases covering `span` (absolute). Returns exactly
    /// `ceil(span.len() / resolution)` values; the last window may be shorter.
    ///
    fn query_track(
        &mut self,
        contig: RecordId,
        span: Span,
        track_type: TrackType,
        resolution: f64,
    ) -> Result<Vec<f64>>;

    ///
    /// The cached track of one bin, recomputed first if it is absent or has been
    /// invalidated. Values run left to right in the bin's own frame.
    ///
    fn bin_query_track(&mut self, bin: RecordId, track_type: TrackType) -> Result<Track>;
}

impl<S: ObjectStore> TrackQuery for BinIndex<S> {
    fn query_track(
        &mut self,
        contig: RecordId,
        span: Span,
        track_type: TrackType,
        resolution: f64,
    ) -> Result<Vec<f64>> {
        if span.is_empty() {
            return Err(TrackError::InvalidSpan {
                start: span.start,
                end: span.end,
            });
        }
        if !(resolution.is_finite() && resolution > 0.0) {
            return Err(TrackError::InvalidResolution(resolution));
        }

        let windows = Windows::over(span, resolution).ok_or(TrackError::TooManyWindows {
            count: window_count(span, resolution),
            max: MAX_WINDOWS,
        })?;
        window_means(self, contig, &windows, resolution, track_type)
    }

    fn bin_query_track(&mut self, bin: RecordId, track_type: TrackType) -> Result<Track> {
        if let Some(cached) = self.bin(bin)?.track(track_type).copied() {
            if cached.valid {
                return Ok(self.store().track(cached.rec)?.clone());
            }
        }
        recompute(self, bin, track_type)
    }
}

///
/// Means over `windows`, using data at least as fine as `resolution` bases per
/// value.
///
fn window_means<S: ObjectStore>(
    index: &mut BinIndex<S>,
    contig: RecordId,
    windows: &Windows,
    resolution: f64,
    track_type: TrackType,
) -> Result<Vec<f64>> {
    let mut sums = vec![0.0; windows.count()];
    if resolution <= index.config().tracks.raw_bpv {
        for item in index.items_in_range(contig, windows.span(), None)? {
            if track_type.counts(item.kind) {
                windows.add_span(&mut sums, &item.span());
            }
        }
    } else {
        let root = index.root_location(contig)?;
        fill(index, &root, &[], windows, resolution, track_type, &mut sums)?;
    }
    Ok(windows.means(sums))
}

///
/// Accumulate the subtree at `loc` into `sums`.
///
/// `inherited` holds the absolute spans of counted items from the ancestors of
/// `loc`, clipped to its span: a bin's cached track includes them, and so must
/// any part of the bin computed from raw items.
///
fn fill<S: ObjectStore>(
    index: &mut BinIndex<S>,
    loc: &BinLocation,
    inherited: &[Span],
    windows: &Windows,
    resolution: f64,
    track_type: TrackType,
    sums: &mut [f64],
) -> Result<()> {
    let span = loc.span();
    if !span.overlaps(&windows.span()) {
        return Ok(());
    }

    if bin_bpv(loc.size, index.config().tracks.samples) <= resolution {
        let track = index.bin_query_track(loc.bin, track_type)?;
        add_track(&track, loc, windows, sums);
        return Ok(());
    }

    let bin = index.bin(loc.bin)?;
    let mut items: Vec<Span> = inherited
        .iter()
        .filter_map(|s| s.intersect(&span))
        .collect();
    items.extend(
        bin.ranges
            .iter()
            .filter(|(_, r)| track_type.counts(r.kind))
            .map(|(_, r)| loc.transform.span_to_absolute(r.span())),
    );

    let children = index.child_locations(loc)?;
    let mut covered: Vec<Span> = children.iter().map(|c| c.span()).collect();
    covered.sort_by_key(|s| s.start);
    for gap in gaps(span, &covered) {
        let Some(gap) = gap.intersect(&windows.span()) else {
            continue;
        };
        for item in &items {
            if let Some(part) = item.intersect(&gap) {
                windows.add_span(sums, &part);
            }
        }
    }

    for child in &children {
        fill(index, child, &items, windows, resolution, track_type, sums)?;
    }
    Ok(())
}

/// Parts of `span` not covered by any of `covered` (sorted, disjoint).
fn gaps(span: Span, covered: &[Span]) -> Vec<Span> {
    let mut out = Vec::new();
    let mut cursor = span.start;
    for c in covered {
        if c.start > cursor {
            out.push(Span {
                start: cursor,
                end: c.start - 1,
            });
        }
        cursor = cursor.max(c.end + 1);
    }
    if cursor <= span.end {
        out.push(Span {
            start: cursor,
            end: span.end,
        });
    }
    out
}

/// Spread a bin's cached values over `windows`.
fn add_track(track: &Track, loc: &BinLocation, windows: &Windows, sums: &mut [f64]) {
    let span = loc.span();
    let n = track.values.len();
    for (k, &value) in track.values.iter().enumerate() {
        if value == 0.0 {
            continue;
        }
        let local_lo = k as f64 * track.bpv;
        let local_hi = if k + 1 == n {
            loc.size as f64
        } else {
            (k + 1) as f64 * track.bpv
        };
        // local frame cells map onto absolute cells, mirrored in reversed bins
        let (lo, hi) = if loc.complemented() {
            let right = span.end as f64 + 1.0;
            (right - local_hi, right - local_lo)
        } else {
            let left = span.start as f64;
            (left + local_lo, left + local_hi)
        };
        windows.add(sums, lo, hi, value);
    }
}

fn recompute<S: ObjectStore>(
    index: &mut BinIndex<S>,
    bin_id: RecordId,
    track_type: TrackType,
) -> Result<Track> {
    let loc = index.bin_position(bin_id)?;
    let config = &index.config().tracks;
    let nele = bin_samples(loc.size, config.samples);
    let bpv = loc.size as f64 / nele as f64;
    let resolution = if bpv <= config.raw_bpv { bpv } else { bpv / 2.0 };

    let windows = Windows::new(loc.span(), bpv, nele);
    let mut values = window_means(index, loc.contig, &windows, resolution, track_type)?;
    if loc.complemented() {
        values.reverse();
    }

    let existing = index.bin(bin_id)?.track(track_type).map(|t| t.rec);
    let track = match existing {
        Some(rec) => {
            let track = index.store_mut().track_mut(rec)?;
            track.bpv = bpv;
            track.values = values;
            track.revision += 1;
            let track = track.clone();

            if let Some(entry) = index.store_mut().bin_mut(bin_id)?.track_mut(track_type) {
                entry.valid = true;
            }
            track
        }
        None => {
            let track = Track::new(track_type, bpv, values);
            let rec = index.store_mut().create(Record::Track(track.clone()))?;
            index.store_mut().bin_mut(bin_id)?.tracks.push(BinTrack {
                track_type,
                valid: true,
                rec,
            });
            track
        }
    };

    debug!(
        "bin {}: recomputed {} track, {} values at {:.2} bases each (revision {})",
        bin_id,
        track_type,
        track.len(),
        bpv,
        track.revision
    );
    Ok(track)
}
