//! Algorithms that know how to explain themselves.
//!
//! Each algorithm here is a [`Driver`]: it runs on some input and, as it goes,
//! records a [`Trace`] of steps that a [`Navigator`](crate::Navigator) can play
//! back. The elements that the steps show and hide are allocated in a
//! [`Scene`] while the trace is computed.

use std::time::Duration;

use crate::{
    geom::Point,
    scene::{Color, Element, ElementId, Scene},
    step::{PseudocodeLine, Trace},
};

mod convex_hull;
mod intersection;
mod line_clipping;
mod point_in_polygon;
mod polygon_clipping;

pub use convex_hull::{convex_hull, ConvexHull};
pub use intersection::{find_intersections, SegmentIntersection};
pub use line_clipping::{clip_lines, outcode, LineClipping, LineClippingInput, Outcode};
pub use point_in_polygon::{point_in_polygon, winding_number, PointInPolygon, PointInPolygonInput};
pub use polygon_clipping::{clip_polygon, PolygonClipping, PolygonClippingInput};

/// The delay between the parts of a staggered animation, by default.
pub const DEFAULT_STAGGER: Duration = Duration::from_millis(60);

/// The radius of the dots we draw for points.
pub const POINT_RADIUS: f64 = 5.0;

/// An algorithm that produces a trace of its own execution.
pub trait Driver {
    /// The geometry the algorithm runs on.
    type Input;

    /// The pseudocode listing. The `line` of every step in a trace produced by
    /// [`Driver::compute_trace`] is an index into this.
    const PSEUDOCODE: &'static [PseudocodeLine];

    /// Runs the algorithm on `input`, adding the elements that the trace
    /// refers to into `scene`.
    ///
    /// This never fails: malformed input is dropped (with a warning), and
    /// even empty input gives a trace with one step.
    fn compute_trace(&self, input: &Self::Input, scene: &mut Scene) -> Trace;

    /// Runs the algorithm in a fresh scene.
    fn run(&self, input: &Self::Input) -> (Trace, Scene) {
        let mut scene = Scene::new();
        let trace = self.compute_trace(input, &mut scene);
        tracing::debug!(
            steps = trace.len(),
            elements = scene.len(),
            "computed a trace"
        );
        (trace, scene)
    }
}

/// Adds a visible dot for an input point.
fn add_dot(scene: &mut Scene, p: Point) -> ElementId {
    scene.add(Element::circle(p, POINT_RADIUS))
}

/// Adds a hidden dot, for an action to reveal.
fn hidden_dot(scene: &mut Scene, p: Point, color: Color) -> ElementId {
    scene.add_hidden(
        Element::circle(p, POINT_RADIUS)
            .with_fill(color)
            .with_stroke(color),
    )
}

/// Adds a hidden label just above `p`.
fn hidden_label(scene: &mut Scene, p: Point, text: impl Into<String>) -> ElementId {
    scene.add_hidden(Element::text(
        Point::new(p.x, p.y - 2.0 * POINT_RADIUS),
        text,
    ))
}

/// Formats a point for the explanatory text of a step.
fn fmt_point(p: &Point) -> String {
    format!("({:.1}, {:.1})", p.x, p.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Navigator, PlaybackConfig};

    /// Plays a trace forward and back and checks that the scene comes back
    /// to where it started, and that every step's line is in the listing.
    pub(crate) fn check_round_trip<D: Driver>(driver: &D, input: &D::Input) -> Trace {
        let (trace, scene) = driver.run(input);
        assert!(!trace.is_empty());
        assert!(trace.lines().iter().all(|&l| l < D::PSEUDOCODE.len()));

        let mut nav = Navigator::new(PlaybackConfig::default());
        nav.load(trace.clone(), scene);
        let start = nav.scene().unwrap().clone();
        for _ in 1..trace.len() {
            nav.forward();
        }
        assert_eq!(nav.cursor(), Some(trace.len() - 1));
        for _ in 1..trace.len() {
            nav.back();
        }
        nav.advance(Duration::from_secs(60));
        assert_eq!(nav.scene().unwrap(), &start);
        trace
    }

    #[test]
    fn fmt() {
        assert_eq!(fmt_point(&Point::new(1.0, 2.26)), "(1.0, 2.3)");
    }
}
