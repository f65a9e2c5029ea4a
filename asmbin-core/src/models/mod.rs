pub mod bin;
pub mod contig;
pub mod item;
pub mod range;
pub mod record;
pub mod span;
pub mod track;

// re-export for cleaner imports
pub use self::bin::{Bin, BinTrack, Parent};
pub use self::contig::Contig;
pub use self::item::{Item, ItemKind};
pub use self::range::{Range, RangeSlot, RangeTable};
pub use self::record::{Record, RecordId, RecordKind};
pub use self::span::Span;
pub use self::track::{Track, TrackType};
