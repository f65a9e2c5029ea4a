use std::cmp::{max, min};
use std::fmt::{self, Display};

/// Represent a closed coordinate range `[start, end]`.
/// Inclusive of both ends, so a single base is `Span { start: x, end: x }`.
#[derive(Eq, PartialEq, Hash, Debug, Clone, Copy)]
pub struct Span {
    pub start: i64,
    pub end: i64,
}

impl Span {
    /// Build a span, swapping the ends if they arrive reversed.
    #[inline]
    pub fn new(a: i64, b: i64) -> Self {
        Span {
            start: min(a, b),
            end: max(a, b),
        }
    }

    /// Number of bases covered.
    #[inline]
    pub fn len(&self) -> i64 {
        self.end - self.start + 1
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    /// Check if `other` lies entirely inside this span
    #[inline]
    pub fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    #[inline]
    pub fn contains_pos(&self, pos: i64) -> bool {
        self.start <= pos && pos <= self.end
    }

    /// Check if two spans share at least one base
    #[inline]
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// The shared part of two spans, if any.
    #[inline]
    pub fn intersect(&self, other: &Span) -> Option<Span> {
        let start = max(self.start, other.start);
        let end = min(self.end, other.end);
        (start <= end).then_some(Span { start, end })
    }

    /// Smallest span covering both.
    #[inline]
    pub fn union(&self, other: &Span) -> Span {
        Span {
            start: min(self.start, other.start),
            end: max(self.end, other.end),
        }
    }

    /// Number of bases shared with `other`, zero when disjoint.
    #[inline]
    pub fn overlap_len(&self, other: &Span) -> i64 {
        self.intersect(other).map_or(0, |s| s.len())
    }
}

impl Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}
