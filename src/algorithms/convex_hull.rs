use std::{collections::BTreeMap, time::Duration};

use super::{add_dot, fmt_point, hidden_label, Driver, DEFAULT_STAGGER};
use crate::{
    action::Action,
    geom::{cross, Point},
    num::CheapOrderedFloat,
    scene::{Color, Element, ElementId, Scene},
    segments::finite_points,
    step::{PseudocodeLine, Step, Trace},
};

const PSEUDOCODE: &[PseudocodeLine] = &[
    PseudocodeLine::new(
        "stack ← empty stack",
        "The stack holds the points we currently believe are on the hull. When we're done, it holds exactly the hull.",
    ),
    PseudocodeLine::new(
        "P0 ← the lowest point",
        "Pick the point with the lowest position on screen; if there's a tie, the leftmost one. It is certainly on the hull. Call it P0.",
    ),
    PseudocodeLine::new(
        "sort the points by angle around P0",
        "Measure the angle from P0 to every other point, and sort the points by it.",
    ),
    PseudocodeLine::new(
        "push P0 and the first point",
        "The first two points of the sorted order start off the stack.",
    ),
    PseudocodeLine::new(
        "for each remaining point:",
        "Go through the rest of the points in sorted order.",
    ),
    PseudocodeLine::new(
        "  while |stack| > 1 and not left_turn(below(top), top, point):",
        "Check whether going from the top two points of the stack to the current point turns left (counter-clockwise).",
    ),
    PseudocodeLine::new(
        "    pop the stack",
        "It doesn't turn left, so the top of the stack would make the hull bend inwards. It can't be on the hull: remove it.",
    ),
    PseudocodeLine::new(
        "  push point",
        "All the turns are left turns again. Push the current point and move on.",
    ),
    PseudocodeLine::new(
        "close the hull back to P0",
        "The stack holds the hull, in counter-clockwise order.",
    ),
];

/// The Graham scan.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ConvexHull {
    /// The delay between the hull's points lighting up at the end.
    pub stagger: Duration,
    /// Points closer than this are merged.
    pub eps: f64,
}

impl Default for ConvexHull {
    fn default() -> Self {
        ConvexHull {
            stagger: DEFAULT_STAGGER,
            eps: 1e-9,
        }
    }
}

/// The hull edges that we've drawn so far, each allocated once.
#[derive(Default)]
struct Edges {
    ids: BTreeMap<(usize, usize), ElementId>,
    shown: BTreeMap<(usize, usize), bool>,
}

impl Edges {
    fn show(&mut self, scene: &mut Scene, points: &[Point], a: usize, b: usize) -> Option<Action> {
        let shown = self.shown.entry((a, b)).or_default();
        if *shown {
            return None;
        }
        *shown = true;
        let id = *self.ids.entry((a, b)).or_insert_with(|| {
            scene.add_hidden(
                Element::line(points[a], points[b])
                    .with_stroke(Color::ORANGE)
                    .with_width(2.0),
            )
        });
        Some(Action::add(id))
    }

    fn hide(&mut self, a: usize, b: usize) -> Option<Action> {
        match self.shown.get_mut(&(a, b)) {
            Some(shown) if *shown => {
                *shown = false;
                self.ids.get(&(a, b)).map(|&id| Action::remove(id))
            }
            _ => None,
        }
    }
}

impl ConvexHull {
    /// Runs the scan, returning the trace and the hull.
    fn scan(&self, input: &[Point], scene: &mut Scene) -> (Trace, Vec<Point>) {
        let mut points = finite_points(input);
        points.sort();
        points.dedup_by(|a, b| a.close_to(b, self.eps));
        let dots: Vec<ElementId> = points.iter().map(|p| add_dot(scene, *p)).collect();

        let mut trace = Trace::new();
        trace.push(Step::new(0));

        // The lowest point on screen has the largest y.
        let Some(pivot) = (0..points.len()).max_by(|&a, &b| {
            let (pa, pb) = (&points[a], &points[b]);
            CheapOrderedFloat::from(pa.y)
                .cmp(&CheapOrderedFloat::from(pb.y))
                .then(CheapOrderedFloat::from(pb.x).cmp(&CheapOrderedFloat::from(pa.x)))
        }) else {
            return (trace, Vec::new());
        };
        let p0 = points[pivot];
        let label = hidden_label(scene, p0, "0");
        trace.push(
            Step::new(1)
                .with_action(Action::add(label))
                .with_text(format!("P0 is {}.", fmt_point(&p0))),
        );

        // Angles are measured with y pointing up, so that sorting by angle
        // goes counter-clockwise on screen.
        let angle = |p: &Point| CheapOrderedFloat::from((p0.y - p.y).atan2(p.x - p0.x));
        let mut sorted: Vec<usize> = (0..points.len()).filter(|&i| i != pivot).collect();
        sorted.sort_by(|&a, &b| {
            let (pa, pb) = (&points[a], &points[b]);
            angle(pa).cmp(&angle(pb)).then(
                CheapOrderedFloat::from(p0.distance(pa))
                    .cmp(&CheapOrderedFloat::from(p0.distance(pb))),
            )
        });

        for (i, &idx) in sorted.iter().enumerate() {
            let p = points[idx];
            let beam = scene.add_hidden(Element::line(p0, p).with_width(3.0));
            let label = hidden_label(scene, p, (i + 1).to_string());
            trace.push(
                Step::new(2)
                    .with_action(Action::add(label))
                    .with_action(Action::flash(beam)),
            );
        }

        let Some((&first, rest)) = sorted.split_first() else {
            trace.push(Step::new(8).with_text("There is only one point, so it is the hull."));
            return (trace, vec![p0]);
        };

        let mut stack = vec![pivot, first];
        trace.push(
            Step::new(3)
                .with_action(Action::refill(dots[pivot], Some(Color::BLACK), Some(Color::ORANGE)))
                .with_action(Action::refill(dots[first], Some(Color::BLACK), Some(Color::ORANGE))),
        );

        let mut edges = Edges::default();
        for &idx in rest {
            trace.push(Step::new(4).with_action(Action::refill(
                dots[idx],
                Some(Color::BLACK),
                Some(Color::CYAN),
            )));

            while let [.., below, top] = stack[..] {
                let mut check = Step::new(5);
                check
                    .actions
                    .extend(edges.show(scene, &points, below, top));
                check.actions.extend(edges.show(scene, &points, top, idx));
                trace.push(check);

                if cross(&points[below], &points[top], &points[idx]) < 0.0 {
                    break;
                }
                let mut pop = Step::new(6).with_text(format!(
                    "{} is not on the hull.",
                    fmt_point(&points[top])
                ));
                pop.actions.extend(edges.hide(below, top));
                pop.actions.extend(edges.hide(top, idx));
                pop.push(Action::refill(dots[top], Some(Color::ORANGE), Some(Color::BLACK)));
                trace.push(pop);
                stack.pop();
            }

            let mut push = Step::new(7);
            if let Some(&top) = stack.last() {
                push.actions.extend(edges.show(scene, &points, top, idx));
            }
            push.push(Action::refill(dots[idx], Some(Color::CYAN), Some(Color::ORANGE)));
            trace.push(push);
            stack.push(idx);
        }

        let mut close = Step::new(8).with_text(format!("The hull has {} points.", stack.len()));
        if let Some(&last) = stack.last() {
            close.actions.extend(edges.show(scene, &points, last, pivot));
        }
        // Go around the hull once, in order.
        close.push(Action::staggered(
            stack
                .iter()
                .map(|&i| Action::refill(dots[i], Some(Color::ORANGE), Some(Color::GREEN)))
                .collect(),
            self.stagger,
        ));
        trace.push(close);

        let hull = stack.into_iter().map(|i| points[i]).collect();
        (trace, hull)
    }
}

impl Driver for ConvexHull {
    type Input = Vec<Point>;

    const PSEUDOCODE: &'static [PseudocodeLine] = PSEUDOCODE;

    fn compute_trace(&self, input: &Self::Input, scene: &mut Scene) -> Trace {
        self.scan(input, scene).0
    }
}

/// The convex hull of some points, in counter-clockwise order (as seen on
/// screen) starting from the lowest point.
///
/// Points on the hull's edges but not at its corners are left out.
pub fn convex_hull(points: &[Point]) -> Vec<Point> {
    ConvexHull::default().scan(points, &mut Scene::new()).1
}
