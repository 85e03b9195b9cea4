//! The sweep-line intersection algorithm.
//!
//! This is the classic Bentley–Ottmann sweep. A vertical line moves from left
//! to right, stopping at segment endpoints and at crossings. The segments
//! currently crossing the line are kept in the status, ordered by height.
//! Two segments can only cross after they've been neighbors in the status,
//! so every time the status changes we check the new neighbors for a
//! crossing and add it to the queue.
//!
//! The sweep here knows nothing about drawing. It produces a [`SweepReport`]:
//! the list of decisions it made (as [`SweepEvent`]s) together with the
//! intersections it found. The
//! [`SegmentIntersection`](crate::algorithms::SegmentIntersection) driver
//! turns the report into steps.

mod order;
mod queue;

pub use order::{cmp_at, Intersections, SweepPosition};
pub use queue::{Event, EventKind, EventQueue};

use crate::{
    geom::Point,
    segments::{SegIdx, Segments},
    status::StatusLine,
    step::PseudocodeLine,
};

/// The pseudocode for the sweep. [`SweepEvent::line`] indexes into this.
pub const PSEUDOCODE: &[PseudocodeLine] = &[
    PseudocodeLine::new(
        "Q ← all endpoints, T ← ∅",
        "The event queue starts with the endpoints of every segment, sorted left to right. The status is empty.",
    ),
    PseudocodeLine::new(
        "while Q ≠ ∅: p ← pop(Q)",
        "Move the sweep line to the next event point.",
    ),
    PseudocodeLine::new(
        "U, L, C ← segments starting at, ending at, containing p",
        "Segments starting at p come with the event. The ones ending at or passing through p are next to each other in the status.",
    ),
    PseudocodeLine::new(
        "if |U ∪ L ∪ C| > 1: report p",
        "More than one segment touches p, so p is an intersection.",
    ),
    PseudocodeLine::new(
        "T ← T \\ (L ∪ C)",
        "Segments that end at p are done. Segments passing through p are taken out, because their order is about to change.",
    ),
    PseudocodeLine::new(
        "T ← T ∪ U ∪ C",
        "Put the segments starting at or passing through p back in, in their order just right of p.",
    ),
    PseudocodeLine::new(
        "if U ∪ C = ∅: FindNewEvent(left(p), right(p), p)",
        "Nothing continues past p, so the segments just above and below p become neighbors.",
    ),
    PseudocodeLine::new(
        "else: FindNewEvent at both ends of U ∪ C",
        "The highest and lowest of the reinserted segments have new neighbors.",
    ),
    PseudocodeLine::new(
        "return the reported points",
        "The queue is empty; every intersection has been found.",
    ),
];

/// How the sweep treats numbers.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SweepConfig {
    /// Points closer than this (in both coordinates) are the same point, and a
    /// point closer than this to a segment is on it.
    pub eps: f64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        SweepConfig { eps: 1e-9 }
    }
}

/// One decision taken by the sweep.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub enum SweepEvent {
    /// The queue was filled with endpoints.
    Initialized { queue: Vec<Point> },
    /// The sweep line moved to `point`.
    Popped { point: Point, kind: EventKind },
    /// The segments touching the current point, split by how they touch it.
    /// `interior` is in status order.
    Partitioned {
        point: Point,
        upper: Vec<SegIdx>,
        lower: Vec<SegIdx>,
        interior: Vec<SegIdx>,
    },
    /// The current point was found to be an intersection. `new` is false if
    /// it had been found before.
    Recorded { point: Point, new: bool },
    /// Segments were taken out of the status.
    Removed { segments: Vec<SegIdx> },
    /// Segments were put into the status. `status` is the whole status afterwards.
    Inserted {
        segments: Vec<SegIdx>,
        status: Vec<SegIdx>,
    },
    /// Two neighbors were checked for a future crossing.
    Tested {
        left: SegIdx,
        right: SegIdx,
        /// The crossing, if there is one at or after the current point. If it
        /// went into the queue, this is where the queue put it (which is
        /// within eps of where the segments cross).
        intersection: Option<Point>,
        /// Whether the crossing was added to the queue.
        enqueued: bool,
        /// Whether the crossing was new to the output.
        recorded: bool,
        /// Whether these neighbors met because nothing continues past the
        /// current point.
        across_gap: bool,
    },
    /// The queue ran dry.
    Finished { count: usize },
}

impl SweepEvent {
    /// The index into [`PSEUDOCODE`] of the line this event executes.
    pub fn line(&self) -> usize {
        match self {
            SweepEvent::Initialized { .. } => 0,
            SweepEvent::Popped { .. } => 1,
            SweepEvent::Partitioned { .. } => 2,
            SweepEvent::Recorded { .. } => 3,
            SweepEvent::Removed { .. } => 4,
            SweepEvent::Inserted { .. } => 5,
            SweepEvent::Tested { across_gap, .. } => {
                if *across_gap {
                    6
                } else {
                    7
                }
            }
            SweepEvent::Finished { .. } => 8,
        }
    }
}

/// Everything a sweep did, and what it found.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SweepReport {
    pub events: Vec<SweepEvent>,
    pub intersections: Intersections,
}

const STATUS_CHUNK: usize = 16;

/// The state of one sweep.
struct Sweeper<'a> {
    segments: &'a Segments,
    eps: f64,
    queue: EventQueue,
    status: StatusLine<SegIdx, STATUS_CHUNK>,
    output: Intersections,
    events: Vec<SweepEvent>,
    /// Segments that have left the status for good.
    ended: Vec<bool>,
}

impl<'a> Sweeper<'a> {
    fn new(segments: &'a Segments, config: &SweepConfig) -> Self {
        let eps = config.eps;
        let mut queue = EventQueue::new(eps);
        for idx in segments.indices() {
            let seg = &segments[idx];
            queue.push(seg.left, EventKind::LeftEndpoint, Some(idx));
            queue.push(seg.right, EventKind::RightEndpoint, Some(idx));
        }

        let events = vec![SweepEvent::Initialized {
            queue: queue.points(),
        }];
        Sweeper {
            segments,
            eps,
            queue,
            status: StatusLine::new(),
            output: Intersections::new(eps),
            events,
            ended: vec![false; segments.len()],
        }
    }

    fn height(&self, seg: SegIdx, p: &Point) -> f64 {
        self.segments[seg].height_at(p)
    }

    fn run(mut self) -> SweepReport {
        while let Some(event) = self.queue.pop() {
            self.process(event);
            #[cfg(feature = "slow-asserts")]
            self.check_status();
        }
        debug_assert!(self.status.is_empty());
        self.events.push(SweepEvent::Finished {
            count: self.output.len(),
        });
        tracing::debug!(
            segments = self.segments.len(),
            intersections = self.output.len(),
            "sweep finished"
        );
        SweepReport {
            events: self.events,
            intersections: self.output,
        }
    }

    fn process(&mut self, event: Event) {
        let p = event.point;
        let eps = self.eps;
        self.events.push(SweepEvent::Popped {
            point: p,
            kind: event.kind,
        });

        // Segments ending here leave wherever they are in the status, even if
        // they've drifted away from p.
        let mut removed = Vec::new();
        for &seg in &event.lower {
            self.ended[seg.0] = true;
            if let Some(idx) = self.status.position(&seg) {
                removed.push(self.status.remove(idx));
            }
        }

        // The segments passing through p are contiguous in the status.
        let lo = self
            .status
            .partition_point(|&s| self.segments[s].height_at(&p) < p.y - eps);
        let mut hi = lo;
        while let Some(&s) = self.status.get(hi) {
            if (self.height(s, &p) - p.y).abs() > eps {
                break;
            }
            hi += 1;
        }
        let touching: Vec<SegIdx> = (lo..hi).map(|_| self.status.remove(lo)).collect();
        removed.extend_from_slice(&touching);

        let (ending, interior): (Vec<SegIdx>, Vec<SegIdx>) = touching
            .into_iter()
            .partition(|&s| self.segments[s].right.close_to(&p, eps));
        for &seg in &ending {
            self.ended[seg.0] = true;
        }
        let mut lower = event.lower;
        lower.extend(ending);
        let upper: Vec<SegIdx> = event
            .upper
            .into_iter()
            .filter(|s| !self.ended[s.0])
            .collect();
        tracing::debug!(?p, ?upper, ?lower, ?interior, "partitioned");
        self.events.push(SweepEvent::Partitioned {
            point: p,
            upper: upper.clone(),
            lower: lower.clone(),
            interior: interior.clone(),
        });

        if upper.len() + lower.len() + interior.len() > 1 {
            let new = self.output.insert(p);
            self.events.push(SweepEvent::Recorded { point: p, new });
        }
        self.events.push(SweepEvent::Removed { segments: removed });

        let pos = SweepPosition::after(p);
        let mut inserted = upper;
        inserted.extend_from_slice(&interior);
        for &seg in &inserted {
            let idx = self.status.partition_point(|&s| {
                cmp_at(self.segments, s, seg, &pos, eps) == std::cmp::Ordering::Less
            });
            self.status.insert(idx, seg);
        }
        self.events.push(SweepEvent::Inserted {
            segments: inserted.clone(),
            status: self.status.iter().copied().collect(),
        });

        if inserted.is_empty() {
            if lo > 0 && lo < self.status.len() {
                self.find_new_event(self.status[lo - 1], self.status[lo], p, true);
            }
        } else {
            let positions = inserted.iter().filter_map(|s| self.status.position(s));
            let (first, last) = positions.fold((usize::MAX, 0), |(a, b), i| (a.min(i), b.max(i)));
            debug_assert_eq!(last + 1 - first, inserted.len());

            if first > 0 {
                self.find_new_event(self.status[first - 1], self.status[first], p, false);
            }
            if last + 1 < self.status.len() {
                self.find_new_event(self.status[last], self.status[last + 1], p, false);
            }
        }
    }

    fn find_new_event(&mut self, left: SegIdx, right: SegIdx, p: Point, across_gap: bool) {
        let eps = self.eps;
        let intersection = self.segments[left]
            .intersection(&self.segments[right], eps)
            .filter(|q| q.close_to(&p, eps) || *q > p);

        let mut enqueued = false;
        let mut recorded = false;
        let mut found = intersection;
        if let Some(q) = intersection {
            if !q.close_to(&p, eps) {
                let key = self.queue.push(q, EventKind::Intersection, None);
                tracing::debug!(?left, ?right, ?key, "new intersection event");
                enqueued = true;
                recorded = self.output.insert(key);
                found = Some(key);
            } else {
                recorded = self.output.insert(q);
            }
        }

        self.events.push(SweepEvent::Tested {
            left,
            right,
            intersection: found,
            enqueued,
            recorded,
            across_gap,
        });
    }

    #[cfg(feature = "slow-asserts")]
    fn check_status(&self) {
        let Some(SweepEvent::Popped { point, .. }) = self
            .events
            .iter()
            .rev()
            .find(|ev| matches!(ev, SweepEvent::Popped { .. }))
        else {
            return;
        };
        let status: Vec<_> = self.status.iter().copied().collect();
        for w in status.windows(2) {
            let (h0, h1) = (self.height(w[0], point), self.height(w[1], point));
            assert!(
                h0 <= h1 + 1e3 * self.eps,
                "status out of order at {point:?}: {:?} ({h0}) before {:?} ({h1})",
                w[0],
                w[1]
            );
        }
    }
}

/// Runs the sweep over `segments`.
pub fn sweep(segments: &Segments, config: &SweepConfig) -> SweepReport {
    Sweeper::new(segments, config).run()
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use proptest::prelude::*;

    use super::*;
    use crate::{geom::Segment, num::tests::Reasonable};

    fn segs(lines: &[((f64, f64), (f64, f64))]) -> Segments {
        Segments::try_from_lines(lines.iter().copied(), 1e-9).unwrap()
    }

    fn intersections(lines: &[((f64, f64), (f64, f64))]) -> Vec<Point> {
        sweep(&segs(lines), &SweepConfig::default())
            .intersections
            .to_vec()
    }

    #[test]
    fn empty() {
        let report = sweep(&Segments::default(), &SweepConfig::default());
        assert!(report.intersections.is_empty());
        assert_eq!(
            report.events,
            vec![
                SweepEvent::Initialized { queue: vec![] },
                SweepEvent::Finished { count: 0 }
            ]
        );
    }

    #[test]
    fn collinear_disjoint() {
        assert!(intersections(&[((0.0, 0.0), (1.0, 0.0)), ((2.0, 0.0), (3.0, 0.0))]).is_empty());
        assert!(intersections(&[((0.0, 0.0), (1.0, 1.0)), ((3.0, 3.0), (2.0, 2.0))]).is_empty());
    }

    #[test]
    fn parallel() {
        assert!(intersections(&[((0.0, 0.0), (10.0, 0.0)), ((0.0, 1.0), (10.0, 1.0))]).is_empty());
    }

    #[test]
    fn simple_crossing() {
        assert_eq!(
            intersections(&[((0.0, 0.0), (10.0, 10.0)), ((0.0, 10.0), (10.0, 0.0))]),
            vec![Point::new(5.0, 5.0)]
        );
    }

    #[test]
    fn shared_endpoint() {
        assert_eq!(
            intersections(&[((0.0, 0.0), (10.0, 0.0)), ((0.0, 0.0), (0.0, 10.0))]),
            vec![Point::new(0.0, 0.0)]
        );
        // Shared right endpoints count too.
        assert_eq!(
            intersections(&[((0.0, 0.0), (10.0, 5.0)), ((0.0, 10.0), (10.0, 5.0))]),
            vec![Point::new(10.0, 5.0)]
        );
    }

    #[test]
    fn t_junction() {
        assert_eq!(
            intersections(&[((0.0, 0.0), (10.0, 0.0)), ((5.0, 0.0), (5.0, 10.0))]),
            vec![Point::new(5.0, 0.0)]
        );
    }

    #[test]
    fn vertical_crossing() {
        assert_eq!(
            intersections(&[((0.0, 5.0), (10.0, 5.0)), ((5.0, 0.0), (5.0, 10.0))]),
            vec![Point::new(5.0, 5.0)]
        );
    }

    #[test]
    fn concurrent_lines_report_once() {
        // Three lines through (1.5, 3.5). The pairwise intersections don't
        // come out exactly the same, but they're within eps.
        let out = intersections(&[
            ((0.0, 0.0), (3.0, 7.0)),
            ((0.0, 7.0), (3.0, 0.0)),
            ((1.5, 0.0), (1.5, 7.0)),
        ]);
        assert_eq!(out.len(), 1);
        assert!(out[0].close_to(&Point::new(1.5, 3.5), 1e-9));
    }

    #[test]
    fn near_duplicates_merge() {
        let config = SweepConfig { eps: 1e-3 };
        // The vertical segment crosses the other two 1e-4 away from where
        // they cross each other.
        let s = Segments::try_from_lines(
            [
                ((0.0, 0.0), (10.0, 10.0)),
                ((0.0, 10.0), (10.0, 0.0)),
                ((5.0001, 0.0), (5.0001, 10.0)),
            ],
            config.eps,
        )
        .unwrap();
        let report = sweep(&s, &config);
        assert_eq!(report.intersections.to_vec(), vec![Point::new(5.0, 5.0)]);

        // The vertical's crossing is already known, but the sweep still has to
        // stop there to move the vertical past the other two.
        assert!(report.events.iter().any(|ev| matches!(
            ev,
            SweepEvent::Tested {
                intersection: Some(_),
                enqueued: true,
                recorded: false,
                ..
            }
        )));
        assert!(report
            .events
            .iter()
            .any(|ev| matches!(ev, SweepEvent::Recorded { new: false, .. })));
        assert!(left_in_status(&report).is_empty());
    }

    #[test]
    fn every_segment_ends() {
        // A crossing 1e-4 to the right of one that's already been swept
        // past. If the sweep didn't stop there, the vertical would be stuck
        // above the other segments.
        let config = SweepConfig { eps: 1e-3 };
        let s = Segments::try_from_lines(
            [
                ((0.0, 0.0), (10.0, 10.0)),
                ((0.0, 10.0), (10.0, 0.0)),
                ((5.0001, 0.0), (5.0001, 10.0)),
                ((5.0001, 10.0), (9.0, 10.0)),
            ],
            config.eps,
        )
        .unwrap();
        let report = sweep(&s, &config);
        assert!(left_in_status(&report).is_empty());
        assert_eq!(
            report.intersections.to_vec(),
            vec![Point::new(5.0, 5.0), Point::new(5.0001, 10.0)]
        );
    }

    #[test]
    fn star() {
        let report = sweep(
            &segs(&[
                ((0.0, 0.0), (10.0, 10.0)),
                ((0.0, 10.0), (10.0, 0.0)),
                ((0.0, 4.0), (10.0, 4.0)),
            ]),
            &SweepConfig::default(),
        );
        insta::assert_debug_snapshot!("star", report.intersections.to_vec());
    }

    #[test]
    fn crossing_events() {
        let report = sweep(
            &segs(&[((0.0, 0.0), (10.0, 10.0)), ((0.0, 10.0), (10.0, 0.0))]),
            &SweepConfig::default(),
        );
        // The crossing is found when the second segment comes in, and then
        // swept over.
        let found = report
            .events
            .iter()
            .find(|ev| matches!(ev, SweepEvent::Tested { .. }));
        assert_matches!(
            found,
            Some(SweepEvent::Tested {
                left: SegIdx(0),
                right: SegIdx(1),
                enqueued: true,
                recorded: true,
                across_gap: false,
                ..
            })
        );
        let swapped = report.events.iter().find_map(|ev| match ev {
            SweepEvent::Inserted { segments, status } if segments.len() == 2 => Some(status),
            _ => None,
        });
        assert_eq!(swapped, Some(&vec![SegIdx(1), SegIdx(0)]));
        assert_eq!(report.events.last().map(SweepEvent::line), Some(8));
        assert!(report
            .events
            .iter()
            .all(|ev| ev.line() < PSEUDOCODE.len()));
    }

    #[test]
    fn gap_closes() {
        // The middle segment ends, so the outer two become neighbors and
        // their crossing is found then.
        let report = sweep(
            &segs(&[
                ((0.0, 0.0), (10.0, 4.0)),
                ((0.0, 5.0), (2.0, 5.0)),
                ((0.0, 10.0), (10.0, 0.0)),
            ]),
            &SweepConfig::default(),
        );
        assert!(report.events.iter().any(|ev| matches!(
            ev,
            SweepEvent::Tested {
                across_gap: true,
                enqueued: true,
                ..
            }
        )));
        assert_eq!(report.intersections.len(), 1);
    }

    /// Replays the status changes in `report`, returning whatever is left.
    fn left_in_status(report: &SweepReport) -> Vec<SegIdx> {
        let mut status = Vec::new();
        for ev in &report.events {
            match ev {
                SweepEvent::Inserted { segments, .. } => status.extend_from_slice(segments),
                SweepEvent::Removed { segments } => status.retain(|s| !segments.contains(s)),
                _ => {}
            }
        }
        status
    }

    /// Every pair of segments, checked directly.
    fn naive(segments: &Segments, eps: f64) -> Intersections {
        let mut ret = Intersections::new(eps);
        for i in segments.indices() {
            for j in segments.indices().filter(|&j| j > i) {
                let (a, b): (&Segment, &Segment) = (&segments[i], &segments[j]);
                if let Some(p) = a.intersection(b, eps) {
                    ret.insert(p);
                }
                for end in [a.left, a.right] {
                    if b.contains(&end, eps) {
                        ret.insert(end);
                    }
                }
                for end in [b.left, b.right] {
                    if a.contains(&end, eps) {
                        ret.insert(end);
                    }
                }
            }
        }
        ret
    }

    proptest! {
        #[test]
        fn matches_naive(lines in proptest::collection::vec(
            ((f64::reasonable(), f64::reasonable()), (f64::reasonable(), f64::reasonable())),
            0..8,
        )) {
            let config = SweepConfig { eps: 1e-6 };
            let segments = Segments::from_lines_lossy(lines, config.eps);
            let swept = sweep(&segments, &config).intersections;
            let expected = naive(&segments, config.eps);
            prop_assert_eq!(swept.len(), expected.len());
            for p in expected.iter() {
                prop_assert!(swept.iter().any(|q| q.close_to(p, 1e-5)), "missing {:?}", p);
            }
        }

        #[test]
        fn grid_matches_naive(
            eps in prop_oneof![Just(1e-9), Just(1e-6), Just(1e-3)],
            lines in proptest::collection::vec(grid_line(), 0..10),
        ) {
            let config = SweepConfig { eps };
            // Nudged spokes cross 1e-4 away from the others, which only makes
            // them distinct crossings when eps is finer than that.
            let lines = lines.into_iter().map(|(a, b, nudge)| {
                let dy = if nudge && eps < 1e-4 { 1e-4 } else { 0.0 };
                ((a.0, a.1 + dy), (b.0, b.1 + dy))
            });
            let segments = Segments::from_lines_lossy(lines, eps);
            let report = sweep(&segments, &config);
            prop_assert!(left_in_status(&report).is_empty());

            let swept = report.intersections;
            let expected = naive(&segments, eps);
            let tol = 4.0 * eps;
            for p in expected.iter() {
                prop_assert!(swept.iter().any(|q| q.close_to(p, tol)), "missing {:?}", p);
            }
            for q in swept.iter() {
                prop_assert!(expected.iter().any(|p| p.close_to(q, tol)), "extra {:?}", q);
            }
        }
    }

    /// Lines on a small integer grid: arbitrary ones, verticals, and spokes
    /// through the middle (several of which cross at the same point). The
    /// flag asks for a spoke to be nudged off the grid.
    fn grid_line() -> impl Strategy<Value = ((f64, f64), (f64, f64), bool)> {
        let coord = || (0i32..=10).prop_map(f64::from);
        prop_oneof![
            ((coord(), coord()), (coord(), coord())).prop_map(|(a, b)| (a, b, false)),
            (coord(), coord(), coord()).prop_map(|(x, y0, y1)| ((x, y0), (x, y1), false)),
            (1i32..=5, -5i32..=5, any::<bool>()).prop_map(|(dx, dy, nudge)| {
                let (dx, dy) = (f64::from(dx), f64::from(dy));
                ((5.0 - dx, 5.0 - dy), (5.0 + dx, 5.0 + dy), nudge)
            }),
        ]
    }
}
