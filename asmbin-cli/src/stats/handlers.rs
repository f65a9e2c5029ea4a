use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::Result;
use clap::ArgMatches;
use log::warn;

use asmbin_binindex::ContigStats;

use crate::loader::{config_from_matches, load_index};

pub fn run_stats(matches: &ArgMatches) -> Result<()> {
    let placements = matches
        .get_one::<String>("placements")
        .expect("A path to a placement file is required.");

    let config = config_from_matches(matches)?;
    let loaded = load_index(Path::new(placements), config)?;

    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    writeln!(writer, "contig\tstart\tend\tnseqs\titems\tbins\tdepth\tstatus")?;

    for name in loaded.contig_names() {
        let contig = loaded.contigs[name];
        let stats = loaded.index.contig_stats(contig)?;

        let problems = loaded.index.check_contig(contig)?;
        for problem in &problems {
            warn!("{}: {}", name, problem);
        }
        let status = match problems.len() {
            0 => "ok".to_string(),
            n => format!("{} problems", n),
        };

        writeln!(writer, "{}\t{}", stats_row(&stats), status)?;
    }
    writer.flush()?;

    Ok(())
}

/// Tab-separated stats columns; the extent is written 0-based half-open, or as
/// `.` for a contig without sequences.
fn stats_row(stats: &ContigStats) -> String {
    let (start, end) = match stats.extent {
        Some(e) => (e.start.to_string(), (e.end + 1).to_string()),
        None => (".".to_string(), ".".to_string()),
    };
    format!(
        "{}\t{}\t{}\t{}\t{}\t{}\t{}",
        stats.name, start, end, stats.nseqs, stats.items, stats.bins, stats.depth
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    use asmbin_core::models::Span;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(Some(Span::new(10, 99)), "ctg1\t10\t100\t3\t4\t5\t3")]
    #[case(None, "ctg1\t.\t.\t3\t4\t5\t3")]
    fn test_stats_row(#[case] extent: Option<Span>, #[case] expected: &str) {
        let stats = ContigStats {
            name: "ctg1".to_string(),
            extent,
            root_span: Span::new(0, 4095),
            nseqs: 3,
            items: 4,
            bins: 5,
            depth: 3,
        };
        assert_eq!(stats_row(&stats), expected);
    }
}
