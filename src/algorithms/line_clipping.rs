use std::{
    fmt,
    ops::{BitAnd, BitOr, BitOrAssign},
};

use kurbo::Rect;

use super::{fmt_point, hidden_dot, hidden_label, Driver};
use crate::{
    action::Action,
    geom::Point,
    scene::{Color, Element, ElementId, Scene, Shape},
    step::{PseudocodeLine, Step, Trace},
};

const PSEUDOCODE: &[PseudocodeLine] = &[
    PseudocodeLine::new(
        "for each line",
        "We take the following sequence of steps for each line we have to process, so pick a line we haven't looked at yet.",
    ),
    PseudocodeLine::new(
        "  outcode1 = outcode(endpoint1)",
        "First, check which region one of the ends of the line is in, and give it an outcode. It doesn't matter which end goes first.",
    ),
    PseudocodeLine::new(
        "  outcode2 = outcode(endpoint2)",
        "Then do the same for the other end of the line.",
    ),
    PseudocodeLine::new(
        "  if outcode1 | outcode2 == 0",
        "The bitwise OR of the outcodes has a bit set if either end is outside the rectangle. The rectangle itself is all zeroes, so if the OR is zero then both ends are inside and we can accept the line as it is.",
    ),
    PseudocodeLine::new(
        "    goto next line",
        "The whole line is inside the rectangle. There's nothing left to do, so start on the next line.",
    ),
    PseudocodeLine::new(
        "  if outcode1 & outcode2 != 0",
        "Every bit of an outcode stands for one of the outside zones. If the bitwise AND has a bit set, both ends are outside on the same side, so the whole line is outside and we can reject it.",
    ),
    PseudocodeLine::new(
        "    delete line",
        "The line is outside the rectangle, so remove it entirely.",
    ),
    PseudocodeLine::new("    goto next line", "Then start on the next line."),
    PseudocodeLine::new(
        "  pick a point that's outside",
        "The line is neither fully inside nor fully outside, so part of it has to be clipped off. Pick an end whose outcode isn't zero. If both are outside, either one will do.",
    ),
    PseudocodeLine::new(
        "  replace it with the rectangle intersection point",
        "Find where the line crosses the border of the outside zone the point is in, and move the point there.",
    ),
    PseudocodeLine::new(
        "  back to start of loop",
        "We've clipped off part of the line, and what's left is a new line. Go back to the start of the loop with it.",
    ),
];

/// How far the guide lines along the rectangle's sides stick out.
const GUIDE_PADDING: f64 = 10_000.0;

/// Which of the nine zones around a rectangle a point is in.
///
/// Each bit is one side of the rectangle that the point is beyond. The
/// rectangle is in screen coordinates, so "top" means small `y`.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Outcode(u8);

impl Outcode {
    pub const INSIDE: Outcode = Outcode(0);
    pub const LEFT: Outcode = Outcode(1);
    pub const RIGHT: Outcode = Outcode(2);
    pub const BOTTOM: Outcode = Outcode(4);
    pub const TOP: Outcode = Outcode(8);

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn is_inside(self) -> bool {
        self.0 == 0
    }

    /// Are all of `other`'s bits set in `self`?
    pub fn contains(self, other: Outcode) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Outcode {
    type Output = Outcode;

    fn bitor(self, rhs: Outcode) -> Outcode {
        Outcode(self.0 | rhs.0)
    }
}

impl BitOrAssign for Outcode {
    fn bitor_assign(&mut self, rhs: Outcode) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Outcode {
    type Output = Outcode;

    fn bitand(self, rhs: Outcode) -> Outcode {
        Outcode(self.0 & rhs.0)
    }
}

/// Four binary digits, the way the bits are usually drawn.
impl fmt::Display for Outcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04b}", self.0)
    }
}

/// The outcode of `p` with respect to `rect`.
///
/// Points on the border count as inside.
pub fn outcode(rect: &Rect, p: &Point) -> Outcode {
    let r = rect.abs();
    let mut code = Outcode::INSIDE;
    if p.x < r.x0 {
        code |= Outcode::LEFT;
    } else if p.x > r.x1 {
        code |= Outcode::RIGHT;
    }
    if p.y < r.y0 {
        code |= Outcode::TOP;
    } else if p.y > r.y1 {
        code |= Outcode::BOTTOM;
    }
    code
}

/// Moves `outside` along the line towards `other`, until it hits the border
/// of one of the zones in `code`.
///
/// The coordinate that the border fixes is set exactly, so the new point
/// never ends up beyond that border again through rounding.
fn clip_to_border(rect: &Rect, outside: Point, other: Point, code: Outcode) -> Point {
    let r = rect.abs();
    // `other` is not beyond the border we pick (or the line would have been
    // rejected), so the denominators are non-zero.
    let at_y = |y: f64| {
        let t = (y - outside.y) / (other.y - outside.y);
        Point::new(outside.x + t * (other.x - outside.x), y)
    };
    let at_x = |x: f64| {
        let t = (x - outside.x) / (other.x - outside.x);
        Point::new(x, outside.y + t * (other.y - outside.y))
    };

    if code.contains(Outcode::TOP) {
        at_y(r.y0)
    } else if code.contains(Outcode::BOTTOM) {
        at_y(r.y1)
    } else if code.contains(Outcode::LEFT) {
        at_x(r.x0)
    } else {
        at_x(r.x1)
    }
}

/// A clipping rectangle and the lines to clip against it.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LineClippingInput {
    pub rect: Rect,
    pub lines: Vec<(Point, Point)>,
}

/// The Cohen-Sutherland line clipping algorithm.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LineClipping {
    /// How many times a single line may be clipped before we give up on it.
    ///
    /// Each round fixes one coordinate of one endpoint exactly, so four
    /// rounds are enough for any line.
    pub max_rounds: usize,
}

impl Default for LineClipping {
    fn default() -> Self {
        LineClipping { max_rounds: 16 }
    }
}

/// What happened to a line, once we're done with it.
type Clipped = Option<(Point, Point)>;

impl LineClipping {
    fn clip(&self, input: &LineClippingInput, scene: &mut Scene) -> (Trace, Vec<Clipped>) {
        let mut trace = Trace::new();
        trace.push(Step::new(0));

        let rect = input.rect.abs();
        if !rect.is_finite() {
            tracing::warn!(?rect, "clipping rectangle isn't finite");
            return (trace, vec![None; input.lines.len()]);
        }
        let (min, max) = (Point::from(rect.origin()), Point::new(rect.x1, rect.y1));
        scene.add(Element::rect(min, max).with_fill(Color::GREY));
        for (from, to) in [
            ((rect.x0, rect.y0 - GUIDE_PADDING), (rect.x0, rect.y1 + GUIDE_PADDING)),
            ((rect.x1, rect.y0 - GUIDE_PADDING), (rect.x1, rect.y1 + GUIDE_PADDING)),
            ((rect.x0 - GUIDE_PADDING, rect.y0), (rect.x1 + GUIDE_PADDING, rect.y0)),
            ((rect.x0 - GUIDE_PADDING, rect.y1), (rect.x1 + GUIDE_PADDING, rect.y1)),
        ] {
            scene.add(Element::line(from.into(), to.into()).with_stroke(Color::GREY));
        }

        let mut results = Vec::with_capacity(input.lines.len());
        for (idx, &(a, b)) in input.lines.iter().enumerate() {
            if !a.is_finite() || !b.is_finite() {
                tracing::warn!(input = idx, "skipping a line with a non-finite endpoint");
                results.push(None);
                continue;
            }
            let el = scene.add(Element::line(a, b));
            trace.push(Step::new(0).with_action(Action::recolor(el, Color::BLACK, Color::CYAN)));
            results.push(self.clip_line(&rect, el, (a, b), scene, &mut trace));
        }
        (trace, results)
    }

    /// Adds the steps for the body of the loop, for as many rounds as it takes.
    fn clip_line(
        &self,
        rect: &Rect,
        el: ElementId,
        mut line: (Point, Point),
        scene: &mut Scene,
        trace: &mut Trace,
    ) -> Clipped {
        for _ in 0..self.max_rounds {
            let (p, q) = line;
            let (c1, c2) = (outcode(rect, &p), outcode(rect, &q));
            let label1 = hidden_label(scene, p, c1.to_string());
            let label2 = hidden_label(scene, q, c2.to_string());
            let dot1 = hidden_dot(scene, p, Color::CYAN);
            let dot2 = hidden_dot(scene, q, Color::CYAN);
            let hide_labels = || [Action::remove(label1), Action::remove(label2)];

            trace.push(
                Step::new(1)
                    .with_action(Action::flash(dot1))
                    .with_action(Action::add(label1))
                    .with_text(format!("The outcode for this point is {c1}.")),
            );
            trace.push(
                Step::new(2)
                    .with_action(Action::flash(dot2))
                    .with_action(Action::add(label2))
                    .with_text(format!("The outcode for this point is {c2}.")),
            );
            trace.push(Step::new(3).with_text(format!(
                "The outcodes are {c1} and {c2}. Their bitwise OR is {}.",
                c1 | c2
            )));

            if (c1 | c2).is_inside() {
                let mut accept = Step::new(4).with_action(Action::recolor(el, Color::CYAN, Color::GREEN));
                accept.actions.extend(hide_labels());
                trace.push(accept);
                return Some(line);
            }

            trace.push(Step::new(5).with_text(format!(
                "The outcodes are {c1} and {c2}. Their bitwise AND is {}.",
                c1 & c2
            )));

            if !(c1 & c2).is_inside() {
                trace.push(Step::new(6).with_action(Action::remove(el)));
                let mut next = Step::new(7);
                next.actions.extend(hide_labels());
                trace.push(next);
                return None;
            }

            let (outside, other, code) = if !c1.is_inside() { (p, q, c1) } else { (q, p, c2) };
            let chosen = hidden_dot(scene, outside, Color::CYAN);
            trace.push(Step::new(8).with_action(Action::flash(chosen)));

            let clipped = clip_to_border(rect, outside, other, code);
            let next_line = if !c1.is_inside() { (clipped, q) } else { (p, clipped) };
            trace.push(
                Step::new(9)
                    .with_action(Action::reshape(
                        el,
                        Shape::Line { from: p, to: q },
                        Shape::Line {
                            from: next_line.0,
                            to: next_line.1,
                        },
                    ))
                    .with_text(format!(
                        "{} moves to {}.",
                        fmt_point(&outside),
                        fmt_point(&clipped)
                    )),
            );
            let mut again = Step::new(10);
            again.actions.extend(hide_labels());
            trace.push(again);
            line = next_line;
        }

        tracing::warn!(?line, rounds = self.max_rounds, "giving up on clipping a line");
        trace.push(
            Step::new(6)
                .with_action(Action::remove(el))
                .with_text("This line didn't settle, so we drop it."),
        );
        None
    }
}

impl Driver for LineClipping {
    type Input = LineClippingInput;

    const PSEUDOCODE: &'static [PseudocodeLine] = PSEUDOCODE;

    fn compute_trace(&self, input: &LineClippingInput, scene: &mut Scene) -> Trace {
        self.clip(input, scene).0
    }
}

/// Clips each line to `rect`, giving `None` for the lines that are entirely
/// outside of it.
pub fn clip_lines(rect: Rect, lines: &[(Point, Point)]) -> Vec<Option<(Point, Point)>> {
    let input = LineClippingInput {
        rect,
        lines: lines.to_vec(),
    };
    LineClipping::default().clip(&input, &mut Scene::new()).1
}
