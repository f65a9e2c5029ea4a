use super::{RecordId, Span};

///
/// The coordinate space that owns a bin tree.
///
#[derive(Debug, Clone, PartialEq)]
pub struct Contig {
    pub name: String,
    /// Root of the bin tree. Replaced whenever the tree grows.
    pub root: RecordId,
    /// Used-data extent in absolute coordinates, `None` until the first sequence is
    /// placed.
    pub extent: Option<Span>,
    /// Changes whenever the whole contig is complemented, which moves every bin.
    pub layout_epoch: u64,
}

impl Contig {
    pub fn new(name: impl Into<String>, root: RecordId) -> Self {
        Contig {
            name: name.into(),
            root,
            extent: None,
            layout_epoch: 0,
        }
    }

    pub fn start(&self) -> Option<i64> {
        self.extent.map(|e| e.start)
    }

    pub fn end(&self) -> Option<i64> {
        self.extent.map(|e| e.end)
    }

    /// Width of the used extent, zero for an empty contig.
    pub fn len(&self) -> i64 {
        self.extent.map_or(0, |e| e.len())
    }

    pub fn is_empty(&self) -> bool {
        self.extent.is_none()
    }

    /// Grow the extent to cover `span`.
    pub fn widen_extent(&mut self, span: Span) {
        self.extent = Some(match self.extent {
            Some(extent) => extent.union(&span),
            None => span,
        });
    }
}
