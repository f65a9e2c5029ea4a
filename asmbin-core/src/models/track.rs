use std::fmt::{self, Display};
use std::str::FromStr;

use super::ItemKind;

/// The statistic a track holds.
#[derive(Eq, PartialEq, Hash, Debug, Clone, Copy)]
pub enum TrackType {
    /// Number of sequences covering each base.
    ReadDepth,
    /// Number of annotations covering each base.
    AnnotationDepth,
}

impl TrackType {
    pub const ALL: [TrackType; 2] = [TrackType::ReadDepth, TrackType::AnnotationDepth];

    /// Whether items of this kind contribute to the track.
    #[inline]
    pub fn counts(&self, kind: ItemKind) -> bool {
        match self {
            TrackType::ReadDepth => kind == ItemKind::Sequence,
            TrackType::AnnotationDepth => kind == ItemKind::Annotation,
        }
    }
}

impl FromStr for TrackType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "depth" | "read_depth" | "readdepth" => Ok(TrackType::ReadDepth),
            "anno" | "annotation_depth" | "annodepth" => Ok(TrackType::AnnotationDepth),
            _ => Err(format!("Unknown track type: {}", s)),
        }
    }
}

impl Display for TrackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackType::ReadDepth => write!(f, "depth"),
            TrackType::AnnotationDepth => write!(f, "anno"),
        }
    }
}

///
/// A cached, downsampled statistic for one bin.
///
/// `values[i]` is the mean per-base value over the i-th window of the bin's
/// local span, left to right in the bin's own orientation.
///
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub track_type: TrackType,
    /// Bases per value.
    pub bpv: f64,
    pub values: Vec<f64>,
    /// Bumped every time the values are recomputed.
    pub revision: u64,
}

impl Track {
    pub fn new(track_type: TrackType, bpv: f64, values: Vec<f64>) -> Self {
        Track {
            track_type,
            bpv,
            values,
            revision: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
