//! The event queue.

use std::collections::BTreeMap;

use super::order::{find_close, search_range};
use crate::{geom::Point, segments::SegIdx};

/// Why the sweep line needs to stop at a point.
///
/// A point can be several of these at once; it keeps the greatest one, in
/// the order they're declared here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub enum EventKind {
    /// Two segments were found to cross here.
    Intersection,
    /// Some segment ends here.
    RightEndpoint,
    /// Some segment starts here.
    LeftEndpoint,
}

/// A point where the sweep line stops.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Event {
    pub point: Point,
    pub kind: EventKind,
    /// The segments whose left endpoint is this point.
    pub upper: Vec<SegIdx>,
    /// The segments whose right endpoint is this point.
    pub lower: Vec<SegIdx>,
}

/// Events, in sweep-line order. Events that are within `eps` of one another
/// are merged.
#[derive(Clone, Debug, Default)]
pub struct EventQueue {
    events: BTreeMap<Point, Event>,
    eps: f64,
}

impl EventQueue {
    pub fn new(eps: f64) -> Self {
        EventQueue {
            events: BTreeMap::new(),
            eps,
        }
    }

    /// Adds an event, or merges it into an existing one close by.
    ///
    /// `seg` is the segment starting (for a left endpoint) or ending (for a
    /// right endpoint) here. Returns the point of the event that was added or
    /// merged into.
    pub fn push(&mut self, point: Point, kind: EventKind, seg: Option<SegIdx>) -> Point {
        let key = find_close(
            self.events.range(search_range(&point, self.eps)).map(|(k, _)| k),
            &point,
            self.eps,
        )
        .copied()
        .unwrap_or(point);

        let event = self.events.entry(key).or_insert_with(|| Event {
            point: key,
            kind,
            upper: Vec::new(),
            lower: Vec::new(),
        });
        event.kind = event.kind.max(kind);
        let list = match kind {
            EventKind::LeftEndpoint => Some(&mut event.upper),
            EventKind::RightEndpoint => Some(&mut event.lower),
            EventKind::Intersection => None,
        };
        if let (Some(list), Some(seg)) = (list, seg) {
            if !list.contains(&seg) {
                list.push(seg);
            }
        }
        key
    }

    pub fn pop(&mut self) -> Option<Event> {
        self.events.pop_first().map(|(_, ev)| ev)
    }

    /// Is there an event within `eps` of `p`?
    pub fn contains(&self, p: &Point) -> bool {
        find_close(
            self.events.range(search_range(p, self.eps)).map(|(k, _)| k),
            p,
            self.eps,
        )
        .is_some()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// The points of all events, in the order they'll be popped.
    pub fn points(&self) -> Vec<Point> {
        self.events.keys().copied().collect()
    }
}
