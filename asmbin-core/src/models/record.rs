use std::fmt::{self, Display};

use super::{Bin, Contig, Track};

/// Identity of a durable record in the object store.
#[derive(Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Clone, Copy)]
pub struct RecordId(pub u64);

impl RecordId {
    /// Never handed out by a store. Marks a reference that is not linked yet.
    pub const NONE: RecordId = RecordId(0);

    pub fn is_none(&self) -> bool {
        self.0 == 0
    }
}

impl From<u64> for RecordId {
    fn from(value: u64) -> Self {
        RecordId(value)
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Eq, PartialEq, Hash, Debug, Clone, Copy)]
pub enum RecordKind {
    Bin,
    Contig,
    Track,
}

impl Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Bin => write!(f, "bin"),
            RecordKind::Contig => write!(f, "contig"),
            RecordKind::Track => write!(f, "track"),
        }
    }
}

/// Every record kind the index keeps in the object store.
#[derive(Debug, Clone)]
pub enum Record {
    Bin(Bin),
    Contig(Contig),
    Track(Track),
}

impl Record {
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::Bin(_) => RecordKind::Bin,
            Record::Contig(_) => RecordKind::Contig,
            Record::Track(_) => RecordKind::Track,
        }
    }
}
