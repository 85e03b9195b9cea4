use std::{
    collections::{BTreeMap, BTreeSet},
    time::Duration,
};

use super::{fmt_point, hidden_dot, Driver, DEFAULT_STAGGER, POINT_RADIUS};
use crate::{
    action::Action,
    geom::Point,
    scene::{Color, Element, ElementId, Scene, Shape},
    segments::{SegIdx, Segments},
    step::{PseudocodeLine, Step, Trace},
    sweep::{self, EventKind, SweepConfig, SweepEvent, SweepReport},
};

/// How far the sweep line sticks out above and below the segments.
const SWEEP_PADDING: f64 = 20.0;

/// Segments that the sweep hasn't reached.
const WAITING: Color = Color::BLACK;
/// Segments in the status.
const ACTIVE: Color = Color::CYAN;
/// Segments that the sweep is done with.
const DONE: Color = Color::GREY;

/// Bentley-Ottmann line segment intersection.
///
/// The sweep itself is [`sweep::sweep`]; this turns what it did into steps.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SegmentIntersection {
    pub sweep: SweepConfig,
    /// The delay between the initial queue markers appearing.
    pub stagger: Duration,
}

impl Default for SegmentIntersection {
    fn default() -> Self {
        SegmentIntersection {
            sweep: SweepConfig::default(),
            stagger: DEFAULT_STAGGER,
        }
    }
}

/// Keeps track of what the scene looks like at the end of the steps
/// produced so far, so that each new action knows what it's undoing.
struct Painter {
    stagger: Duration,
    lines: Vec<ElementId>,
    colors: Vec<Color>,
    /// Markers for the points in the event queue, keyed by the queue's keys.
    queued: BTreeMap<Point, ElementId>,
    sweep_line: ElementId,
    current: ElementId,
    /// Where the sweep line and the current point marker are, once they're shown.
    position: Option<Point>,
    /// The segments ending at the current point.
    lower: BTreeSet<SegIdx>,
    top: f64,
    bottom: f64,
}

impl Painter {
    fn new(segments: &Segments, stagger: Duration, scene: &mut Scene) -> Self {
        let lines: Vec<ElementId> = segments
            .segments()
            .map(|s| scene.add(Element::line(s.left, s.right).with_stroke(WAITING)))
            .collect();
        let (top, bottom) = segments.segments().fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(top, bottom), s| {
                (
                    top.min(s.left.y).min(s.right.y),
                    bottom.max(s.left.y).max(s.right.y),
                )
            },
        );
        let (top, bottom) = if top <= bottom { (top, bottom) } else { (0.0, 0.0) };
        let (top, bottom) = (top - SWEEP_PADDING, bottom + SWEEP_PADDING);

        let sweep_line = scene.add_hidden(
            Element::line(Point::new(0.0, top), Point::new(0.0, bottom))
                .with_stroke(Color::ORANGE)
                .with_width(2.0),
        );
        let current = scene.add_hidden(
            Element::circle(Point::new(0.0, 0.0), 2.0 * POINT_RADIUS)
                .without_fill()
                .with_stroke(Color::ORANGE)
                .with_width(2.0),
        );

        Painter {
            stagger,
            colors: vec![WAITING; lines.len()],
            lines,
            queued: BTreeMap::new(),
            sweep_line,
            current,
            position: None,
            lower: BTreeSet::new(),
            top,
            bottom,
        }
    }

    fn sweep_shape(&self, p: &Point) -> Shape {
        Shape::Line {
            from: Point::new(p.x, self.top),
            to: Point::new(p.x, self.bottom),
        }
    }

    fn marker_shape(p: &Point) -> Shape {
        Shape::Circle {
            center: *p,
            radius: 2.0 * POINT_RADIUS,
        }
    }

    /// Recolors a segment for good.
    fn recolor(&mut self, seg: SegIdx, to: Color) -> Option<Action> {
        let from = std::mem::replace(&mut self.colors[seg.0], to);
        (from != to).then(|| Action::recolor(self.lines[seg.0], from, to))
    }

    /// Colors a segment for the duration of one step.
    fn highlight(&self, seg: SegIdx, color: Color) -> Action {
        Action::highlight(self.lines[seg.0], self.colors[seg.0], color)
    }

    fn queue_marker(&mut self, scene: &mut Scene, p: Point) -> Option<Action> {
        if self.queued.contains_key(&p) {
            return None;
        }
        let dot = hidden_dot(scene, p, Color::BLUE);
        self.queued.insert(p, dot);
        Some(Action::add(dot))
    }

    fn names(segs: &[SegIdx]) -> String {
        if segs.is_empty() {
            "none".to_owned()
        } else {
            segs.iter()
                .map(SegIdx::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        }
    }

    fn step(&mut self, event: &SweepEvent, scene: &mut Scene) -> Step {
        let mut step = Step::new(event.line());
        match event {
            SweepEvent::Initialized { queue } => {
                let markers = queue
                    .iter()
                    .filter_map(|p| self.queue_marker(scene, *p))
                    .collect();
                step.push(Action::staggered(markers, self.stagger));
                step.extra_text = Some(format!(
                    "The queue starts with {} points, and the status is empty.",
                    queue.len()
                ));
            }
            SweepEvent::Popped { point, kind } => {
                match self.position.replace(*point) {
                    None => {
                        step.push(Action::reshape(
                            self.sweep_line,
                            self.sweep_shape(&Point::new(0.0, 0.0)),
                            self.sweep_shape(point),
                        ));
                        step.push(Action::add(self.sweep_line));
                        step.push(Action::reshape(
                            self.current,
                            Self::marker_shape(&Point::new(0.0, 0.0)),
                            Self::marker_shape(point),
                        ));
                        step.push(Action::add(self.current));
                    }
                    Some(old) => {
                        step.push(Action::reshape(
                            self.sweep_line,
                            self.sweep_shape(&old),
                            self.sweep_shape(point),
                        ));
                        step.push(Action::reshape(
                            self.current,
                            Self::marker_shape(&old),
                            Self::marker_shape(point),
                        ));
                    }
                }
                if let Some(marker) = self.queued.remove(point) {
                    step.push(Action::remove(marker));
                }
                let why = match kind {
                    EventKind::LeftEndpoint => "where a segment starts",
                    EventKind::RightEndpoint => "where a segment ends",
                    EventKind::Intersection => "where two segments cross",
                };
                step.extra_text = Some(format!("The sweep line moves to {}, {why}.", fmt_point(point)));
            }
            SweepEvent::Partitioned {
                upper,
                lower,
                interior,
                ..
            } => {
                for (segs, color) in [
                    (upper, Color::GREEN),
                    (lower, Color::RED),
                    (interior, Color::ORANGE),
                ] {
                    for &s in segs {
                        step.push(self.highlight(s, color));
                    }
                }
                self.lower = lower.iter().copied().collect();
                step.extra_text = Some(format!(
                    "U = {{{}}}, L = {{{}}}, C = {{{}}}.",
                    Self::names(upper),
                    Self::names(lower),
                    Self::names(interior)
                ));
            }
            SweepEvent::Recorded { point, new } => {
                if *new {
                    step.push(Action::add(hidden_dot(scene, *point, Color::RED)));
                    step.extra_text = Some(format!("{} is an intersection.", fmt_point(point)));
                } else {
                    step.extra_text = Some(format!(
                        "{} is an intersection, which we already knew.",
                        fmt_point(point)
                    ));
                }
            }
            SweepEvent::Removed { segments } => {
                for &s in segments {
                    let to = if self.lower.contains(&s) { DONE } else { WAITING };
                    step.actions.extend(self.recolor(s, to));
                }
            }
            SweepEvent::Inserted { segments, status } => {
                for &s in segments {
                    step.actions.extend(self.recolor(s, ACTIVE));
                }
                step.extra_text = Some(format!(
                    "From top to bottom, the status is: {}.",
                    Self::names(status)
                ));
            }
            SweepEvent::Tested {
                left,
                right,
                intersection,
                enqueued,
                recorded,
                ..
            } => {
                step.push(self.highlight(*left, Color::BLUE));
                step.push(self.highlight(*right, Color::BLUE));
                match intersection {
                    None => {
                        step.extra_text = Some(format!(
                            "{left} and {right} don't cross, at least not from here on."
                        ));
                    }
                    Some(q) => {
                        let flash = scene.add_hidden(
                            Element::circle(*q, 2.0 * POINT_RADIUS)
                                .without_fill()
                                .with_stroke(Color::BLUE)
                                .with_width(2.0),
                        );
                        step.push(Action::flash(flash));
                        if *enqueued {
                            step.actions.extend(self.queue_marker(scene, *q));
                        }
                        if *recorded {
                            step.push(Action::add(hidden_dot(scene, *q, Color::RED)));
                        }
                        step.extra_text = Some(format!(
                            "{left} and {right} cross at {}{}.",
                            fmt_point(q),
                            if *enqueued { ", so that goes in the queue" } else { "" }
                        ));
                    }
                }
            }
            SweepEvent::Finished { count } => {
                if self.position.take().is_some() {
                    step.push(Action::remove(self.sweep_line));
                    step.push(Action::remove(self.current));
                }
                for (_, marker) in std::mem::take(&mut self.queued) {
                    step.push(Action::remove(marker));
                }
                step.extra_text = Some(format!("We found {count} intersections."));
            }
        }
        step
    }
}

impl SegmentIntersection {
    fn segments(&self, lines: &[(Point, Point)]) -> Segments {
        Segments::from_lines_lossy(lines.iter().copied(), self.sweep.eps)
    }

    /// Draws a report that [`sweep::sweep`] made for `segments`.
    pub fn render(&self, segments: &Segments, report: &SweepReport, scene: &mut Scene) -> Trace {
        if segments.is_empty() {
            return std::iter::once(Step::new(0)).collect();
        }
        let mut painter = Painter::new(segments, self.stagger, scene);
        report
            .events
            .iter()
            .map(|ev| painter.step(ev, scene))
            .collect()
    }
}

impl Driver for SegmentIntersection {
    type Input = Vec<(Point, Point)>;

    const PSEUDOCODE: &'static [PseudocodeLine] = sweep::PSEUDOCODE;

    fn compute_trace(&self, input: &Self::Input, scene: &mut Scene) -> Trace {
        let segments = self.segments(input);
        let report = sweep::sweep(&segments, &self.sweep);
        self.render(&segments, &report, scene)
    }
}

/// All the points where two or more of `lines` touch, in sweep-line order.
///
/// Lines with non-finite or coincident endpoints are skipped.
pub fn find_intersections(lines: &[(Point, Point)]) -> Vec<Point> {
    let alg = SegmentIntersection::default();
    sweep::sweep(&alg.segments(lines), &alg.sweep)
        .intersections
        .to_vec()
}
