use crate::{
    geom::{Point, Segment},
    Error,
};

/// An index into our segment arena.
///
/// Throughout this library, we assign identities to segments, so that we may
/// consider segments as different even if they have the same start- and end-points.
///
/// This index is used to identify a segment, whose data can be retrieved by looking
/// it up in [`Segments`]. (Of course, this index-as-identifier breaks down if there are
/// multiple `Segments` in flight. Just be careful not to mix them up.)
#[derive(Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Hash, serde::Serialize)]
pub struct SegIdx(pub usize);

impl std::fmt::Debug for SegIdx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "s_{}", self.0)
    }
}

impl std::fmt::Display for SegIdx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "s{}", self.0)
    }
}

/// An arena of line segments.
///
/// Segments are indexed by [`SegIdx`] and can be retrieved by indexing (i.e. with square brackets).
/// Every segment in here has passed validation: its endpoints are finite and
/// at least `eps` apart.
#[derive(Debug, Clone, Default)]
pub struct Segments {
    segs: Vec<Segment>,
    /// For each segment, stores true if the sweep-line order (left to right)
    /// is the same as the orientation it was drawn with.
    orientation: Vec<bool>,
    /// The position of each segment in the caller's input, which differs from
    /// its `SegIdx` when some inputs were filtered.
    input_idx: Vec<usize>,
}

fn check_point(p: &Point) -> Result<(), Error> {
    if p.x.is_nan() || p.y.is_nan() {
        Err(Error::NaN)
    } else if p.x.is_infinite() || p.y.is_infinite() {
        Err(Error::Infinity)
    } else {
        Ok(())
    }
}

fn check_line(idx: usize, p: &Point, q: &Point, eps: f64) -> Result<(), Error> {
    check_point(p)?;
    check_point(q)?;
    if p.close_to(q, eps) {
        return Err(Error::Degenerate(idx));
    }
    Ok(())
}

impl Segments {
    /// The number of line segments in this arena.
    pub fn len(&self) -> usize {
        self.segs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segs.is_empty()
    }

    /// Iterate over all indices that can be used to index into this arena.
    pub fn indices(&self) -> impl Iterator<Item = SegIdx> {
        (0..self.segs.len()).map(SegIdx)
    }

    /// Iterate over all segments in this arena.
    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.segs.iter()
    }

    /// Returns the starting point of the segment at `idx`, relative to the segment's original orientation.
    ///
    /// The endpoints of the segment itself are stored in sweep-line order
    /// (i.e. `left` is the smaller point), regardless of the direction it was
    /// drawn in. Use this method to retrieve the segment's original start point.
    pub fn oriented_start(&self, idx: SegIdx) -> &Point {
        if self.orientation[idx.0] {
            &self[idx].left
        } else {
            &self[idx].right
        }
    }

    /// Returns the ending point of the segment at `idx`, relative to the segment's original orientation.
    pub fn oriented_end(&self, idx: SegIdx) -> &Point {
        if self.orientation[idx.0] {
            &self[idx].right
        } else {
            &self[idx].left
        }
    }

    /// The index this segment had in the input it was built from.
    pub fn input_index(&self, idx: SegIdx) -> usize {
        self.input_idx[idx.0]
    }

    fn push_unchecked(&mut self, input_idx: usize, p: Point, q: Point) -> SegIdx {
        self.segs.push(Segment::new(p, q));
        self.orientation.push(p <= q);
        self.input_idx.push(input_idx);
        SegIdx(self.segs.len() - 1)
    }

    /// Builds an arena from line segments, rejecting the whole input if any
    /// segment has a non-finite coordinate or is shorter than `eps`.
    pub fn try_from_lines<P: Into<Point>>(
        lines: impl IntoIterator<Item = (P, P)>,
        eps: f64,
    ) -> Result<Self, Error> {
        let mut ret = Self::default();
        for (idx, (p, q)) in lines.into_iter().enumerate() {
            let (p, q) = (p.into(), q.into());
            check_line(idx, &p, &q, eps)?;
            ret.push_unchecked(idx, p, q);
        }
        Ok(ret)
    }

    /// Builds an arena from line segments, skipping the ones that
    /// [`Segments::try_from_lines`] would reject.
    pub fn from_lines_lossy<P: Into<Point>>(
        lines: impl IntoIterator<Item = (P, P)>,
        eps: f64,
    ) -> Self {
        let mut ret = Self::default();
        for (idx, (p, q)) in lines.into_iter().enumerate() {
            let (p, q) = (p.into(), q.into());
            match check_line(idx, &p, &q, eps) {
                Ok(()) => {
                    ret.push_unchecked(idx, p, q);
                }
                Err(e) => tracing::warn!(input = idx, "skipping segment: {e}"),
            }
        }
        ret
    }
}

impl std::ops::Index<SegIdx> for Segments {
    type Output = Segment;

    fn index(&self, index: SegIdx) -> &Self::Output {
        &self.segs[index.0]
    }
}

/// Drops non-finite points, logging each one.
pub(crate) fn finite_points(points: &[Point]) -> Vec<Point> {
    points
        .iter()
        .enumerate()
        .filter_map(|(idx, p)| match check_point(p) {
            Ok(()) => Some(*p),
            Err(e) => {
                tracing::warn!(input = idx, "skipping point: {e}");
                None
            }
        })
        .collect()
}
