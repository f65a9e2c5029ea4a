use std::fmt::{self, Display};
use std::str::FromStr;

use super::RecordId;

/// What kind of thing a range points at.
///
/// The two kinds are mutually exclusive: a range is either a sequence placement
/// or an annotation placement, never both.
#[derive(Eq, PartialEq, Hash, Debug, Clone, Copy)]
pub enum ItemKind {
    /// An aligned read or other sequence. Counted by the `nseqs` aggregates.
    Sequence,
    /// A tag or feature attached to a stretch of the contig.
    Annotation,
}

impl ItemKind {
    #[inline]
    pub fn is_sequence(&self) -> bool {
        matches!(self, ItemKind::Sequence)
    }
}

impl FromStr for ItemKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "seq" | "sequence" | "read" => Ok(ItemKind::Sequence),
            "anno" | "annotation" | "tag" => Ok(ItemKind::Annotation),
            _ => Err(format!("Unknown item kind: {}", s)),
        }
    }
}

impl Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::Sequence => write!(f, "seq"),
            ItemKind::Annotation => write!(f, "anno"),
        }
    }
}

/// The descriptor of an item being placed: its kind plus the record identity of
/// the item itself (the read or annotation record, which lives outside the index).
#[derive(Eq, PartialEq, Hash, Debug, Clone, Copy)]
pub struct Item {
    pub kind: ItemKind,
    pub rec: RecordId,
}

impl Item {
    pub fn new(kind: ItemKind, rec: RecordId) -> Self {
        Item { kind, rec }
    }

    pub fn sequence(rec: u64) -> Self {
        Item::new(ItemKind::Sequence, RecordId(rec))
    }

    pub fn annotation(rec: u64) -> Self {
        Item::new(ItemKind::Annotation, RecordId(rec))
    }
}

impl Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.kind, self.rec)
    }
}
