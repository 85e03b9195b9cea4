//! Comparisons that depend on where the sweep line is.

use std::{cmp::Ordering, collections::BTreeSet};

use crate::{
    geom::Point,
    num::{cmp_eps, CheapOrderedFloat},
    segments::{SegIdx, Segments},
};

/// The position of the sweep line: infinitesimally to the right of `point`.
///
/// The order of segments in the status is only meaningful at a particular
/// position, so every comparison takes one explicitly.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct SweepPosition {
    pub point: Point,
}

impl SweepPosition {
    pub fn after(point: Point) -> Self {
        SweepPosition { point }
    }
}

/// Compares two segments by their height at the sweep line.
///
/// Segments whose heights are within `eps` of one another are considered to
/// meet at the sweep line, and are ordered by where they go next: the one
/// with the smaller slope is higher up (that is, first). Exact ties (overlapping segments) are broken by index, so
/// this only returns `Equal` for a segment and itself.
pub fn cmp_at(
    segments: &Segments,
    a: SegIdx,
    b: SegIdx,
    pos: &SweepPosition,
    eps: f64,
) -> Ordering {
    let (sa, sb) = (&segments[a], &segments[b]);
    let height = cmp_eps(sa.height_at(&pos.point), sb.height_at(&pos.point), eps);
    let slope = || CheapOrderedFloat::from(sa.slope()).cmp(&CheapOrderedFloat::from(sb.slope()));
    height.then_with(slope).then(a.cmp(&b))
}

/// A set of points, where points within `eps` of one another count as the same.
///
/// Iteration is in sweep-line order.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct Intersections {
    points: BTreeSet<Point>,
    #[serde(skip)]
    eps: f64,
}

impl Intersections {
    pub fn new(eps: f64) -> Self {
        Intersections {
            points: BTreeSet::new(),
            eps,
        }
    }

    /// Finds a point of ours that is within `eps` of `p`.
    pub fn find(&self, p: &Point) -> Option<Point> {
        find_close(self.points.range(search_range(p, self.eps)), p, self.eps).copied()
    }

    pub fn contains(&self, p: &Point) -> bool {
        self.find(p).is_some()
    }

    /// Adds `p`, unless we already have something close to it.
    ///
    /// Returns true if `p` was new.
    pub fn insert(&mut self, p: Point) -> bool {
        if self.contains(&p) {
            false
        } else {
            self.points.insert(p);
            true
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Point> + '_ {
        self.points.iter()
    }

    pub fn to_vec(&self) -> Vec<Point> {
        self.points.iter().copied().collect()
    }
}

/// The range of keys that could be within `eps` of `p`.
pub(crate) fn search_range(p: &Point, eps: f64) -> std::ops::RangeInclusive<Point> {
    let lo = Point {
        x: p.x - eps,
        y: f64::NEG_INFINITY,
    };
    let hi = Point {
        x: p.x + eps,
        y: f64::INFINITY,
    };
    lo..=hi
}

/// Picks the first candidate within `eps` of `p` (in both coordinates).
pub(crate) fn find_close<'a>(
    mut candidates: impl Iterator<Item = &'a Point>,
    p: &Point,
    eps: f64,
) -> Option<&'a Point> {
    candidates.find(|q| q.close_to(p, eps))
}
