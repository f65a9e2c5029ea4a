use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};
use flate2::read::MultiGzDecoder;
use log::warn;

use crate::errors::PlacementParseError;
use crate::models::{ItemKind, Span};

///
/// Get a reader for either a gzip'd or non-gzip'd file.
///
/// # Arguments
///
/// - path: path to the file to read
///
pub fn get_dynamic_reader(path: &Path) -> Result<BufReader<Box<dyn Read>>> {
    let is_gzipped = path.extension() == Some(OsStr::new("gz"));
    let file = File::open(path).with_context(|| format!("Failed to open file: {:?}", path))?;
    let file: Box<dyn Read> = match is_gzipped {
        true => Box::new(MultiGzDecoder::new(file)),
        false => Box::new(file),
    };

    let reader = BufReader::new(file);

    Ok(reader)
}

/// Like [`get_dynamic_reader`], but a path of `-` reads placements from stdin.
pub fn get_reader_or_stdin(path: &Path) -> Result<BufReader<Box<dyn Read>>> {
    if path == Path::new("-") {
        let stdin: Box<dyn Read> = Box::new(std::io::stdin());
        return Ok(BufReader::new(stdin));
    }
    get_dynamic_reader(path)
}

/// One line of a placement file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementRecord {
    pub contig: String,
    /// Inclusive span, converted from the file's half-open interval.
    pub span: Span,
    pub kind: ItemKind,
    /// Item identity, if the file provides one.
    pub id: Option<u64>,
}

///
/// Parse one BED-like placement line: `contig start end [kind [id]]`, tab separated.
///
/// Coordinates are 0-based half-open as in BED and come back as an inclusive
/// [`Span`]. `kind` is `seq` (the default) or `anno`.
///
pub fn parse_placement_line(line: &str) -> Result<PlacementRecord, PlacementParseError> {
    let mut fields = line.split('\t');

    let contig = fields
        .next()
        .filter(|s| !s.is_empty())
        .ok_or(PlacementParseError::MissingField("contig"))?;
    let start = parse_int(fields.next(), "start")?;
    let end = parse_int(fields.next(), "end")?;

    if end <= start {
        return Err(PlacementParseError::EmptyInterval { start, end });
    }

    let kind = match fields.next() {
        Some(s) if !s.is_empty() => s.parse().map_err(PlacementParseError::InvalidKind)?,
        _ => ItemKind::Sequence,
    };

    let id = match fields.next() {
        Some(s) if !s.is_empty() => Some(s.parse::<u64>().map_err(|_| {
            PlacementParseError::InvalidInteger {
                field: "id",
                value: s.to_string(),
            }
        })?),
        _ => None,
    };

    Ok(PlacementRecord {
        contig: contig.to_string(),
        span: Span::new(start, end - 1),
        kind,
        id,
    })
}

fn parse_int(field: Option<&str>, name: &'static str) -> Result<i64, PlacementParseError> {
    let value = field.ok_or(PlacementParseError::MissingField(name))?;
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| PlacementParseError::InvalidInteger {
            field: name,
            value: value.to_string(),
        })
}

///
/// Read every placement in a file. Comment (`#`), `track` and `browser` header lines
/// are skipped; malformed lines are logged and skipped. `-` reads stdin.
///
pub fn read_placements(path: &Path) -> Result<Vec<PlacementRecord>> {
    let reader = get_reader_or_stdin(path)?;
    let mut records = Vec::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        if line.is_empty()
            || line.starts_with('#')
            || line.starts_with("track")
            || line.starts_with("browser")
        {
            continue;
        }
        match parse_placement_line(&line) {
            Ok(record) => records.push(record),
            Err(e) => warn!("Skipping line {} of {:?}: {}", line_num + 1, path, e),
        }
    }

    Ok(records)
}
