use asmbin_core::models::Span;

/// Upper bound on the number of windows a single query may produce.
pub const MAX_WINDOWS: usize = 1 << 26;

/// `ceil(len / width)`, at least one; NaN for a NaN width.
///
/// Computed in floating point so spans wider than `i64::MAX` bases do not overflow.
pub fn window_count(span: Span, width: f64) -> f64 {
    let len = span.end as f64 - span.start as f64 + 1.0;
    (len / width).ceil().max(1.0)
}

///
/// Consecutive equal-width windows tiling a span of bases.
///
/// Bases are treated as unit cells, so base `x` occupies `[x, x + 1)` and a
/// window may start or end part-way through a base. The last window is clipped
/// to the end of the span.
///
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Windows {
    span: Span,
    width: f64,
    count: usize,
}

impl Windows {
    /// `count` windows of `width` bases starting at the left edge of `span`.
    pub fn new(span: Span, width: f64, count: usize) -> Self {
        Windows { span, width, count }
    }

    ///
    /// As many windows of `width` as it takes to cover `span`, or `None` if that
    /// would be more than [`MAX_WINDOWS`].
    ///
    pub fn over(span: Span, width: f64) -> Option<Self> {
        let count = window_count(span, width);
        if !(count <= MAX_WINDOWS as f64) {
            return None;
        }
        Some(Windows::new(span, width, count as usize))
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn count(&self) -> usize {
        self.count
    }

    fn origin(&self) -> f64 {
        self.span.start as f64
    }

    fn end(&self) -> f64 {
        self.span.end as f64 + 1.0
    }

    /// Half-open bounds of window `i`.
    pub fn bounds(&self, i: usize) -> (f64, f64) {
        let lo = self.origin() + i as f64 * self.width;
        let hi = if i + 1 == self.count {
            self.end()
        } else {
            (lo + self.width).min(self.end())
        };
        (lo, hi)
    }

    ///
    /// Spread `value` per base over `[lo, hi)`: every window overlapping it
    /// receives `value` times the length of the overlap.
    ///
    pub fn add(&self, sums: &mut [f64], lo: f64, hi: f64, value: f64) {
        let lo = lo.max(self.origin());
        let hi = hi.min(self.end());
        if hi <= lo {
            return;
        }

        let first = ((lo - self.origin()) / self.width).floor() as usize;
        for (i, sum) in sums.iter_mut().enumerate().skip(first) {
            let (wlo, whi) = self.bounds(i);
            if wlo >= hi {
                break;
            }
            let overlap = hi.min(whi) - lo.max(wlo);
            if overlap > 0.0 {
                *sum += value * overlap;
            }
        }
    }

    /// Add one per base for every base of an inclusive span.
    pub fn add_span(&self, sums: &mut [f64], span: &Span) {
        self.add(sums, span.start as f64, span.end as f64 + 1.0, 1.0);
    }

    /// Turn per-window sums into per-base means.
    pub fn means(&self, mut sums: Vec<f64>) -> Vec<f64> {
        for (i, sum) in sums.iter_mut().enumerate() {
            let (lo, hi) = self.bounds(i);
            if hi > lo {
                *sum /= hi - lo;
            }
        }
        sums
    }
}

///
/// Number of values in a bin track: the configured sample count, capped at the
/// bin width and rounded down to an even number, but never below two.
///
pub fn bin_samples(size: i64, samples: usize) -> usize {
    let capped = samples.min(size.max(0) as usize);
    (capped & !1).max(2)
}

/// Bases per value of a bin track.
pub fn bin_bpv(size: i64, samples: usize) -> f64 {
    size as f64 / bin_samples(size, samples) as f64
}
