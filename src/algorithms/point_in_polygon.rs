use std::{f64::consts::PI, time::Duration};

use super::{Driver, DEFAULT_STAGGER, POINT_RADIUS};
use crate::{
    action::Action,
    geom::Point,
    scene::{Color, Element, Scene, Shape},
    segments::finite_points,
    step::{PseudocodeLine, Step, Trace},
};

const PSEUDOCODE: &[PseudocodeLine] = &[
    PseudocodeLine::new(
        "angle_sum = 0",
        "We'll add up the angles that we turn through while going around the polygon, as seen from the point we're testing. Call that point P0. We start at 0 radians.",
    ),
    PseudocodeLine::new(
        "for each edge (P1, P2):",
        "Take each edge of the polygon in order.",
    ),
    PseudocodeLine::new(
        "  angle_sum += angle(P1, P0, P2)",
        "Measure the angle between the two ends of the edge, as seen from P0, and add it to the sum.",
    ),
    PseudocodeLine::new(
        "winding_num = angle_sum / 2π",
        "The winding number is how many full turns we made. A full turn is 2π radians, so dividing the sum by 2π gives the number of turns.",
    ),
    PseudocodeLine::new(
        "return winding_num !≈ 0",
        "If the winding number is (close to) zero, the point is outside; otherwise it's inside. The check is approximate because adding up angles in floating point isn't exact.",
    ),
];

/// How close to zero a winding number has to be to count as zero.
const EPSILON: f64 = 0.0001;

/// How far below the point the running total is written.
const TEXT_OFFSET: f64 = 30.0;

/// The signed angle from `a` to `b`, as seen from `origin`.
///
/// The sign follows [`cross`](crate::geom::cross): positive angles turn
/// clockwise on screen.
fn angle(a: &Point, origin: &Point, b: &Point) -> f64 {
    let u = a.to_kurbo() - origin.to_kurbo();
    let v = b.to_kurbo() - origin.to_kurbo();
    u.cross(v).atan2(u.dot(v))
}

/// The edges of a polygon, including the one that closes it.
fn edges(polygon: &[Point]) -> impl Iterator<Item = (usize, usize)> + '_ {
    (0..polygon.len()).map(|i| (i, (i + 1) % polygon.len()))
}

/// A closed polygon and a point to test against it.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PointInPolygonInput {
    pub polygon: Vec<Point>,
    pub point: Point,
}

/// The winding number test for whether a point is in a polygon.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PointInPolygon {
    /// The delay between the polygon's points appearing.
    pub stagger: Duration,
}

impl Default for PointInPolygon {
    fn default() -> Self {
        PointInPolygon {
            stagger: DEFAULT_STAGGER,
        }
    }
}

impl Driver for PointInPolygon {
    type Input = PointInPolygonInput;

    const PSEUDOCODE: &'static [PseudocodeLine] = PSEUDOCODE;

    fn compute_trace(&self, input: &PointInPolygonInput, scene: &mut Scene) -> Trace {
        let mut trace = Trace::new();
        let polygon = finite_points(&input.polygon);
        let p0 = input.point;
        if !p0.is_finite() {
            tracing::warn!(point = ?p0, "the point to test isn't finite");
            trace.push(Step::new(0));
            return trace;
        }

        scene.add(Element::polygon(polygon.clone()));
        let pivot = scene.add(Element::circle(p0, POINT_RADIUS));
        if polygon.is_empty() {
            trace.push(Step::new(0));
            return trace;
        }

        let text = scene.add_hidden(Element::text(
            Point::new(p0.x, p0.y + TEXT_OFFSET),
            fmt_turns(0.0),
        ));
        let dots: Vec<_> = polygon
            .iter()
            .map(|p| scene.add_hidden(Element::circle(*p, POINT_RADIUS)))
            .collect();
        trace.push(
            Step::new(0)
                .with_action(Action::add(text))
                .with_action(Action::staggered(
                    dots.iter().map(|&d| Action::add(d)).collect(),
                    self.stagger,
                )),
        );
        trace.push(Step::new(1));

        let mut sum = 0.0;
        for (i, j) in edges(&polygon) {
            let (p1, p2) = (polygon[i], polygon[j]);
            let spoke = |scene: &mut Scene, p: Point| scene.add_hidden(Element::line(p0, p));
            let (line1, line2, moving) = (spoke(scene, p1), spoke(scene, p2), spoke(scene, p1));

            let highlight = [
                Action::refill(dots[i], Some(Color::BLACK), Some(Color::ORANGE)),
                Action::refill(dots[j], Some(Color::BLACK), Some(Color::ORANGE)),
                Action::add(line1),
                Action::add(line2),
                Action::add(moving),
            ];
            let cleanup = highlight.iter().filter_map(Action::reverse).collect();
            trace.push(Step {
                actions: highlight.into(),
                line: 1,
                extra_text: None,
            });

            let turn = angle(&p1, &p0, &p2);
            let before = sum;
            sum += turn;
            trace.push(
                Step::new(2)
                    .with_action(Action::retext(text, fmt_turns(before), fmt_turns(sum)))
                    .with_action(Action::reshape(
                        moving,
                        Shape::Line { from: p0, to: p1 },
                        Shape::Line { from: p0, to: p2 },
                    ))
                    .with_text(format!(
                        "The angle between the two points is {} radians.",
                        fmt_turns(turn)
                    )),
            );
            trace.push(Step {
                actions: cleanup,
                line: 2,
                extra_text: None,
            });
        }

        let winding = sum / (2.0 * PI);
        trace.push(
            Step::new(3)
                .with_action(Action::retext(
                    text,
                    fmt_turns(sum),
                    format!("{} / 2π = {:.2}", fmt_turns(sum), winding),
                ))
                .with_text(format!("The winding number is {winding:.2}.")),
        );

        let done = if winding.abs() < EPSILON {
            Step::new(4)
                .with_action(Action::refill(pivot, Some(Color::BLACK), Some(Color::RED)))
                .with_text("The winding number is 0, so the point is outside.")
        } else {
            Step::new(4)
                .with_action(Action::refill(pivot, Some(Color::BLACK), Some(Color::GREEN)))
                .with_text(format!(
                    "The winding number is {winding:.0}, so the point is inside."
                ))
        };
        trace.push(done);
        trace
    }
}

/// Writes an angle as a multiple of π.
fn fmt_turns(radians: f64) -> String {
    format!("{:.2}π", radians / PI)
}

/// The number of times `polygon` winds around `point`.
///
/// The sign depends on which way the polygon goes around: clockwise on
/// screen is positive.
pub fn winding_number(polygon: &[Point], point: &Point) -> f64 {
    let sum: f64 = edges(polygon)
        .map(|(i, j)| angle(&polygon[i], point, &polygon[j]))
        .sum();
    sum / (2.0 * PI)
}

/// Is `point` inside `polygon`, according to its winding number?
pub fn point_in_polygon(polygon: &[Point], point: &Point) -> bool {
    winding_number(polygon, point).abs() >= EPSILON
}
