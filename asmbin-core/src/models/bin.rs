use super::{RangeTable, RecordId, Span, TrackType};

/// What a bin hangs off: another bin, or (for the root) the owning contig.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Parent {
    Bin(RecordId),
    Contig(RecordId),
}

/// Entry in a bin's track list: the type, whether the cached values may be
/// returned as they are, and the track record holding them.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct BinTrack {
    pub track_type: TrackType,
    pub valid: bool,
    pub rec: RecordId,
}

///
/// A node of a contig's interval tree.
///
/// Coordinates of everything stored in a bin (its ranges, its children's `pos`,
/// `start_used`/`end_used`) are in the bin's local frame, which runs from `0` to
/// `size - 1`. Where that frame sits in the contig depends on every `pos` and
/// `complemented` flag from here up to the root.
///
#[derive(Debug, Clone, PartialEq)]
pub struct Bin {
    /// Offset of the local origin in the parent's frame. Absolute for the root.
    pub pos: i64,
    pub size: i64,
    pub parent: Parent,
    pub child: [Option<RecordId>; 2],
    /// Local left-right sense is reversed relative to the parent.
    pub complemented: bool,
    pub ranges: RangeTable,
    /// Tightest known local span covered by placed items. Only ever widens.
    pub used: Option<Span>,
    /// Sequence items in this bin and all of its descendants.
    pub nseqs: i64,
    pub tracks: Vec<BinTrack>,
}

impl Bin {
    pub fn new_root(contig: RecordId, pos: i64, size: i64) -> Self {
        Self::new(Parent::Contig(contig), pos, size)
    }

    pub fn new_child(parent: RecordId, pos: i64, size: i64) -> Self {
        Self::new(Parent::Bin(parent), pos, size)
    }

    fn new(parent: Parent, pos: i64, size: i64) -> Self {
        Bin {
            pos,
            size,
            parent,
            child: [None, None],
            complemented: false,
            ranges: RangeTable::new(),
            used: None,
            nseqs: 0,
            tracks: Vec::new(),
        }
    }

    /// The bin's own span in its local frame: `[0, size - 1]`.
    #[inline]
    pub fn local_span(&self) -> Span {
        Span {
            start: 0,
            end: self.size - 1,
        }
    }

    /// The span this bin occupies in its parent's frame.
    #[inline]
    pub fn span_in_parent(&self) -> Span {
        Span {
            start: self.pos,
            end: self.pos + self.size - 1,
        }
    }

    pub fn start_used(&self) -> Option<i64> {
        self.used.map(|s| s.start)
    }

    pub fn end_used(&self) -> Option<i64> {
        self.used.map(|s| s.end)
    }

    /// Grow the used span to cover `span` (local coordinates).
    pub fn widen_used(&mut self, span: Span) {
        self.used = Some(match self.used {
            Some(used) => used.union(&span),
            None => span,
        });
    }

    pub fn is_root(&self) -> bool {
        matches!(self.parent, Parent::Contig(_))
    }

    pub fn has_children(&self) -> bool {
        self.child.iter().any(Option::is_some)
    }

    pub fn children(&self) -> impl Iterator<Item = RecordId> + '_ {
        self.child.iter().flatten().copied()
    }

    pub fn track(&self, track_type: TrackType) -> Option<&BinTrack> {
        self.tracks.iter().find(|t| t.track_type == track_type)
    }

    pub fn track_mut(&mut self, track_type: TrackType) -> Option<&mut BinTrack> {
        self.tracks.iter_mut().find(|t| t.track_type == track_type)
    }

    ///
    /// Mark cached tracks as stale. `None` means every type.
    ///
    /// The track records are kept; only the valid flag is cleared. Returns how many
    /// tracks went from valid to invalid.
    ///
    pub fn invalidate_tracks(&mut self, track_type: Option<TrackType>) -> usize {
        let mut flipped = 0;
        for t in self
            .tracks
            .iter_mut()
            .filter(|t| track_type.is_none_or(|tt| t.track_type == tt))
        {
            if t.valid {
                t.valid = false;
                flipped += 1;
            }
        }
        flipped
    }
}
