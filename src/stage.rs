//! A scene together with a logical clock.

use std::{cmp::Reverse, collections::BinaryHeap, time::Duration};

use crate::{
    action::Scheduled,
    scene::{Edit, ElementId, Scene},
};

#[derive(Clone, Debug)]
struct Pending {
    due: Duration,
    /// Breaks ties between edits that fall due at the same time, so they are
    /// applied in the order they were scheduled.
    seq: u64,
    element: ElementId,
    edit: Edit,
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        (self.due, self.seq) == (other.due, other.seq)
    }
}

impl Eq for Pending {}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.due, self.seq).cmp(&(other.due, other.seq))
    }
}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Owns the scene and applies scheduled edits to it as time passes.
///
/// Time is logical: it only moves when the host calls [`Stage::advance`],
/// which is how a single-threaded event loop (or a test) drives animations.
/// Edits with no delay are applied immediately.
#[derive(Clone, Debug, Default)]
pub struct Stage {
    scene: Scene,
    now: Duration,
    pending: BinaryHeap<Reverse<Pending>>,
    seq: u64,
}

impl Stage {
    pub fn new(scene: Scene) -> Self {
        Stage {
            scene,
            ..Default::default()
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn into_scene(self) -> Scene {
        self.scene
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    /// Are there edits waiting for their delay to pass?
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn perform(&mut self, scheduled: impl IntoIterator<Item = Scheduled>) {
        for s in scheduled {
            if s.delay.is_zero() {
                self.scene.apply(s.element, &s.edit);
            } else {
                self.seq += 1;
                self.pending.push(Reverse(Pending {
                    due: self.now + s.delay,
                    seq: self.seq,
                    element: s.element,
                    edit: s.edit,
                }));
            }
        }
    }

    /// Moves the clock forward, applying everything that falls due.
    pub fn advance(&mut self, elapsed: Duration) {
        self.advance_to(self.now + elapsed);
    }

    /// Moves the clock to `time` (if it is in the future), applying
    /// everything that falls due.
    pub fn advance_to(&mut self, time: Duration) {
        while let Some(Reverse(p)) = self.pending.peek() {
            if p.due > time {
                break;
            }
            if let Some(Reverse(p)) = self.pending.pop() {
                self.scene.apply(p.element, &p.edit);
            }
        }
        self.now = self.now.max(time);
    }

    /// Applies every pending edit right away, without moving the clock.
    ///
    /// Delays only exist to make things look nice. Before the next transition
    /// we settle all of them, so that the scene is always exactly what the
    /// steps up to the cursor say it should be.
    pub fn flush(&mut self) {
        while let Some(Reverse(p)) = self.pending.pop() {
            self.scene.apply(p.element, &p.edit);
        }
    }
}
