use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use clap::ArgMatches;

use asmbin_core::models::{Span, TrackType};
use asmbin_tracks::{TrackQuery, Windows};

use crate::loader::{config_from_matches, load_index};

pub fn run_depth(matches: &ArgMatches) -> Result<()> {
    let placements = matches
        .get_one::<String>("placements")
        .expect("A path to a placement file is required.");
    let contig_name = matches
        .get_one::<String>("contig")
        .expect("A contig name is required.");
    let resolution = *matches
        .get_one::<f64>("resolution")
        .expect("resolution has a default");
    let track_type: TrackType = matches
        .get_one::<String>("track")
        .expect("track has a default")
        .parse()
        .map_err(|e: String| anyhow!(e))?;

    let config = config_from_matches(matches)?;
    let mut loaded = load_index(Path::new(placements), config)?;
    let contig = *loaded
        .contigs
        .get(contig_name)
        .ok_or_else(|| anyhow!("No placements on contig {}", contig_name))?;

    // BED-style region, or the contig's extent
    let extent = loaded.index.contig(contig)?.extent;
    let start = matches.get_one::<i64>("start").copied();
    let end = matches.get_one::<i64>("end").map(|e| e - 1);
    let span = match (start.or(extent.map(|e| e.start)), end.or(extent.map(|e| e.end))) {
        (Some(start), Some(end)) => Span { start, end },
        _ => {
            return Err(anyhow!(
                "Contig {} holds no sequences; give --start and --end",
                contig_name
            ));
        }
    };

    let values = loaded
        .index
        .query_track(contig, span, track_type, resolution)
        .with_context(|| format!("Failed to compute {} track for {}", track_type, contig_name))?;

    let windows = Windows::over(span, resolution)
        .ok_or_else(|| anyhow!("Too many windows at resolution {}", resolution))?;

    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    write_track(&mut writer, contig_name, &windows, &values)?;
    writer.flush()?;

    Ok(())
}

/// Write one `contig start end value` row per window, 0-based half-open.
fn write_track<W: Write>(
    writer: &mut W,
    contig: &str,
    windows: &Windows,
    values: &[f64],
) -> Result<()> {
    for (i, value) in values.iter().enumerate() {
        let (lo, hi) = windows.bounds(i);
        writeln!(
            writer,
            "{}\t{}\t{}\t{}",
            contig,
            lo.floor() as i64,
            hi.ceil() as i64,
            value
        )?;
    }
    Ok(())
}
