//! Conversions between a bin's local frame and absolute contig coordinates.
//!
//! Every bin frame relates to the contig by a map `abs = a * local + b` with
//! `a` either `+1` or `-1`. Going down the tree the map is extended with
//! [`Transform::enter`]; going up from a bin it is built with [`Transform::lift`].
//! Both produce the same map for the same bin.

use asmbin_core::models::{Bin, RecordId, Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transform {
    a: i64,
    b: i64,
}

impl Transform {
    /// The contig frame itself: the frame the root bin's `pos` lives in.
    pub const IDENTITY: Transform = Transform { a: 1, b: 0 };

    #[inline]
    pub fn to_absolute(&self, local: i64) -> i64 {
        self.a * local + self.b
    }

    #[inline]
    pub fn to_local(&self, abs: i64) -> i64 {
        // a is its own inverse
        self.a * (abs - self.b)
    }

    /// Map a local span to absolute coordinates. Ends swap in reversed frames.
    #[inline]
    pub fn span_to_absolute(&self, span: Span) -> Span {
        Span::new(self.to_absolute(span.start), self.to_absolute(span.end))
    }

    #[inline]
    pub fn span_to_local(&self, span: Span) -> Span {
        Span::new(self.to_local(span.start), self.to_local(span.end))
    }

    /// Whether the frame runs right-to-left relative to the contig.
    #[inline]
    pub fn complemented(&self) -> bool {
        self.a < 0
    }

    ///
    /// Given the map of a parent frame, return the map of `child`'s frame.
    ///
    #[inline]
    pub fn enter(&self, child: &Bin) -> Transform {
        if child.complemented {
            Transform {
                a: -self.a,
                b: self.a * (child.pos + child.size - 1) + self.b,
            }
        } else {
            Transform {
                a: self.a,
                b: self.a * child.pos + self.b,
            }
        }
    }

    ///
    /// Given the map from some descendant frame into `bin`'s frame, return the map
    /// from that descendant into the frame of `bin`'s parent.
    ///
    #[inline]
    pub fn lift(&self, bin: &Bin) -> Transform {
        if bin.complemented {
            Transform {
                a: -self.a,
                b: bin.pos + bin.size - 1 - self.b,
            }
        } else {
            Transform {
                a: self.a,
                b: bin.pos + self.b,
            }
        }
    }
}

///
/// A bin together with where it sits in its contig.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinLocation {
    pub bin: RecordId,
    pub contig: RecordId,
    /// Local-to-absolute map of the bin's frame.
    pub transform: Transform,
    pub size: i64,
}

impl BinLocation {
    /// The absolute span covered by the bin.
    #[inline]
    pub fn span(&self) -> Span {
        self.transform.span_to_absolute(Span {
            start: 0,
            end: self.size - 1,
        })
    }

    /// Absolute coordinate of the bin's leftmost base.
    #[inline]
    pub fn offset(&self) -> i64 {
        self.span().start
    }

    /// Parity of complemented flags from this bin up to the root.
    #[inline]
    pub fn complemented(&self) -> bool {
        self.transform.complemented()
    }

    /// Location of a child bin, given the child record.
    #[inline]
    pub fn child(&self, id: RecordId, child: &Bin) -> BinLocation {
        BinLocation {
            bin: id,
            contig: self.contig,
            transform: self.transform.enter(child),
            size: child.size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn bin(pos: i64, size: i64, complemented: bool) -> Bin {
        let mut bin = Bin::new_child(RecordId(1), pos, size);
        bin.complemented = complemented;
        bin
    }

    #[rstest]
    fn test_identity_root() {
        let root = bin(-100, 1000, false);
        let t = Transform::IDENTITY.enter(&root);
        assert_eq!(t.to_absolute(0), -100);
        assert_eq!(t.to_local(-100), 0);
        assert_eq!(t.complemented(), false);
    }

    #[rstest]
    fn test_complemented_root_reverses() {
        let root = bin(0, 100, true);
        let t = Transform::IDENTITY.enter(&root);
        assert_eq!(t.to_absolute(0), 99);
        assert_eq!(t.to_absolute(99), 0);
        assert_eq!(t.span_to_local(Span::new(10, 19)), Span::new(80, 89));
        assert_eq!(t.complemented(), true);
    }

    #[rstest]
    #[case(false, false)]
    #[case(false, true)]
    #[case(true, false)]
    #[case(true, true)]
    fn test_enter_and_lift_agree(#[case] root_comp: bool, #[case] child_comp: bool) {
        let root = bin(37, 1024, root_comp);
        let child = bin(512, 256, child_comp);
        let grandchild = bin(128, 128, false);

        let down = Transform::IDENTITY
            .enter(&root)
            .enter(&child)
            .enter(&grandchild);
        let up = Transform::IDENTITY
            .lift(&grandchild)
            .lift(&child)
            .lift(&root);

        assert_eq!(down, up);
        assert_eq!(down.complemented(), root_comp ^ child_comp);
        for x in [0, 5, 127] {
            assert_eq!(down.to_local(down.to_absolute(x)), x);
        }
    }

    #[rstest]
    fn test_location_span_is_absolute_left_edge() {
        let root = bin(0, 1024, true);
        let child = bin(0, 512, false);
        let root_loc = BinLocation {
            bin: RecordId(1),
            contig: RecordId(9),
            transform: Transform::IDENTITY.enter(&root),
            size: 1024,
        };
        let child_loc = root_loc.child(RecordId(2), &child);

        // local [0, 511] of a reversed root is the right half of the contig
        assert_eq!(child_loc.span(), Span::new(512, 1023));
        assert_eq!(child_loc.offset(), 512);
        assert_eq!(child_loc.complemented(), true);
    }
}
