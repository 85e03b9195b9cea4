use std::time::Duration;

use kurbo::Rect;

use super::{fmt_point, hidden_dot, Driver, DEFAULT_STAGGER};
use crate::{
    action::Action,
    geom::Point,
    scene::{Color, Element, ElementId, Scene, Shape},
    segments::finite_points,
    step::{PseudocodeLine, Step, Trace},
};

const PSEUDOCODE: &[PseudocodeLine] = &[
    PseudocodeLine::new(
        "output ← polygon",
        "We clip the polygon against one side of the rectangle at a time. Before we start, the clipped polygon is just the polygon.",
    ),
    PseudocodeLine::new(
        "for each border of the rectangle:",
        "Take one of the rectangle's sides, and think of it as a line that goes on forever. Everything on the rectangle's side of it is inside.",
    ),
    PseudocodeLine::new(
        "  input ← output, output ← empty",
        "What we clipped so far is the input for this border, and we build a new output from scratch.",
    ),
    PseudocodeLine::new(
        "  for each edge (prev → cur) of input:",
        "Walk around the input polygon one edge at a time.",
    ),
    PseudocodeLine::new(
        "    if cur is inside:",
        "Check which side of the border the end of the edge is on.",
    ),
    PseudocodeLine::new(
        "      if prev is outside: add intersection(prev, cur)",
        "The edge comes in from outside, so the output has to start again where the edge crosses the border.",
    ),
    PseudocodeLine::new(
        "      add cur",
        "The end of the edge is inside, so it stays.",
    ),
    PseudocodeLine::new(
        "    else if prev is inside: add intersection(prev, cur)",
        "The edge leaves the inside, so the output follows it up to the border and no further.",
    ),
    PseudocodeLine::new(
        "return output",
        "Every border has had its turn. What's left is the part of the polygon inside the rectangle.",
    ),
];

/// How far the border lines stick out past the rectangle.
const BORDER_PADDING: f64 = 10_000.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Border {
    Left,
    Right,
    Bottom,
    Top,
}

impl Border {
    const ALL: [Border; 4] = [Border::Left, Border::Right, Border::Bottom, Border::Top];

    fn name(self) -> &'static str {
        match self {
            Border::Left => "left",
            Border::Right => "right",
            Border::Bottom => "bottom",
            Border::Top => "top",
        }
    }

    /// Points on the border count as inside.
    fn inside(self, r: &Rect, p: &Point) -> bool {
        match self {
            Border::Left => p.x >= r.x0,
            Border::Right => p.x <= r.x1,
            Border::Top => p.y >= r.y0,
            Border::Bottom => p.y <= r.y1,
        }
    }

    /// Where the line through `a` and `b` crosses the border. They must be on
    /// different sides of it.
    fn intersect(self, r: &Rect, a: &Point, b: &Point) -> Point {
        let at_x = |x: f64| {
            let t = (x - a.x) / (b.x - a.x);
            Point::new(x, a.y + t * (b.y - a.y))
        };
        let at_y = |y: f64| {
            let t = (y - a.y) / (b.y - a.y);
            Point::new(a.x + t * (b.x - a.x), y)
        };
        match self {
            Border::Left => at_x(r.x0),
            Border::Right => at_x(r.x1),
            Border::Top => at_y(r.y0),
            Border::Bottom => at_y(r.y1),
        }
    }

    fn guide(self, r: &Rect) -> (Point, Point) {
        let (x0, x1) = (r.x0 - BORDER_PADDING, r.x1 + BORDER_PADDING);
        let (y0, y1) = (r.y0 - BORDER_PADDING, r.y1 + BORDER_PADDING);
        match self {
            Border::Left => (Point::new(r.x0, y0), Point::new(r.x0, y1)),
            Border::Right => (Point::new(r.x1, y0), Point::new(r.x1, y1)),
            Border::Top => (Point::new(x0, r.y0), Point::new(x1, r.y0)),
            Border::Bottom => (Point::new(x0, r.y1), Point::new(x1, r.y1)),
        }
    }
}

/// A clipping rectangle and the polygon to clip against it.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PolygonClippingInput {
    pub rect: Rect,
    pub polygon: Vec<Point>,
}

/// The Sutherland-Hodgman polygon clipping algorithm.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PolygonClipping {
    /// The delay between the output's points disappearing when we move on
    /// to the next border.
    pub stagger: Duration,
}

impl Default for PolygonClipping {
    fn default() -> Self {
        PolygonClipping {
            stagger: DEFAULT_STAGGER,
        }
    }
}

/// The polygon being built for the current border, and the dots marking its
/// points.
struct Output {
    polygon: ElementId,
    points: Vec<Point>,
    dots: Vec<ElementId>,
}

impl Output {
    fn add(&mut self, scene: &mut Scene, p: Point) -> [Action; 2] {
        let before = Shape::Polygon(self.points.clone());
        self.points.push(p);
        let dot = hidden_dot(scene, p, Color::GREEN);
        self.dots.push(dot);
        [
            Action::reshape(self.polygon, before, Shape::Polygon(self.points.clone())),
            Action::add(dot),
        ]
    }

    /// Empties the output, giving back its points.
    fn clear(&mut self, stagger: Duration, actions: &mut Vec<Action>) -> Vec<Point> {
        let points = std::mem::take(&mut self.points);
        actions.push(Action::reshape(
            self.polygon,
            Shape::Polygon(points.clone()),
            Shape::Polygon(Vec::new()),
        ));
        let dots = std::mem::take(&mut self.dots);
        if !dots.is_empty() {
            actions.push(Action::staggered(
                dots.into_iter().map(Action::remove).collect(),
                stagger,
            ));
        }
        points
    }
}

impl PolygonClipping {
    fn clip(&self, input: &PolygonClippingInput, scene: &mut Scene) -> (Trace, Vec<Point>) {
        let mut trace = Trace::new();
        let rect = input.rect.abs();
        let polygon = finite_points(&input.polygon);
        if !rect.is_finite() {
            tracing::warn!(?rect, "clipping rectangle isn't finite");
            trace.push(Step::new(0));
            return (trace, Vec::new());
        }

        scene.add(
            Element::rect(Point::from(rect.origin()), Point::new(rect.x1, rect.y1))
                .with_fill(Color::GREY),
        );
        if polygon.is_empty() {
            trace.push(Step::new(0));
            return (trace, Vec::new());
        }

        let working = scene.add(Element::polygon(polygon.clone()));
        let mut output = Output {
            polygon: scene.add_hidden(
                Element::polygon(Vec::new())
                    .with_stroke(Color::GREEN)
                    .with_width(2.0),
            ),
            points: Vec::new(),
            dots: Vec::new(),
        };
        trace.push(Step::new(0).with_text(format!("The polygon has {} points.", polygon.len())));

        let mut input_points = polygon;
        let mut guide: Option<ElementId> = None;
        for (round, border) in Border::ALL.into_iter().enumerate() {
            let (from, to) = border.guide(&rect);
            let line = scene.add_hidden(
                Element::line(from, to)
                    .with_stroke(Color::ORANGE)
                    .with_width(2.0),
            );
            let mut pick = Step::new(1)
                .with_action(Action::add(line))
                .with_text(format!("Clip against the {} border.", border.name()));
            if let Some(old) = guide.replace(line) {
                pick.push(Action::remove(old));
            }
            trace.push(pick);

            let mut reset = Step::new(2);
            if round == 0 {
                reset.push(Action::add(output.polygon));
            } else {
                let previous = input_points;
                input_points = output.clear(self.stagger, &mut reset.actions);
                reset.push(Action::reshape(
                    working,
                    Shape::Polygon(previous),
                    Shape::Polygon(input_points.clone()),
                ));
            }
            trace.push(reset.with_text(format!("The input has {} points.", input_points.len())));

            self.clip_border(&rect, border, &input_points, &mut output, scene, &mut trace);
        }

        let mut finish = Step::new(8);
        if let Some(old) = guide {
            finish.push(Action::remove(old));
        }
        let result = output.clear(self.stagger, &mut finish.actions);
        finish.push(Action::remove(output.polygon));
        finish.push(Action::reshape(
            working,
            Shape::Polygon(input_points),
            Shape::Polygon(result.clone()),
        ));
        finish.push(Action::recolor(working, Color::BLACK, Color::GREEN));
        trace.push(finish.with_text(if result.is_empty() {
            "The polygon is entirely outside the rectangle.".to_owned()
        } else {
            format!("The clipped polygon has {} points.", result.len())
        }));
        (trace, result)
    }

    fn clip_border(
        &self,
        rect: &Rect,
        border: Border,
        input: &[Point],
        output: &mut Output,
        scene: &mut Scene,
        trace: &mut Trace,
    ) {
        let Some(&last) = input.last() else {
            return;
        };
        let mut prev = last;
        for &cur in input {
            let edge = scene.add_hidden(
                Element::line(prev, cur)
                    .with_stroke(Color::CYAN)
                    .with_width(3.0),
            );
            trace.push(Step::new(3).with_action(Action::flash(edge)).with_text(format!(
                "The edge from {} to {}.",
                fmt_point(&prev),
                fmt_point(&cur)
            )));

            let (prev_in, cur_in) = (border.inside(rect, &prev), border.inside(rect, &cur));
            let marker = hidden_dot(scene, cur, if cur_in { Color::GREEN } else { Color::RED });
            trace.push(
                Step::new(4)
                    .with_action(Action::flash(edge))
                    .with_action(Action::flash(marker))
                    .with_text(format!(
                        "{} is {}.",
                        fmt_point(&cur),
                        if cur_in { "inside" } else { "outside" }
                    )),
            );

            if cur_in {
                if !prev_in {
                    let p = border.intersect(rect, &prev, &cur);
                    trace.push(Step {
                        actions: output.add(scene, p).into(),
                        line: 5,
                        extra_text: Some(format!("The edge comes in at {}.", fmt_point(&p))),
                    });
                }
                trace.push(Step {
                    actions: output.add(scene, cur).into(),
                    line: 6,
                    extra_text: None,
                });
            } else if prev_in {
                let p = border.intersect(rect, &prev, &cur);
                trace.push(Step {
                    actions: output.add(scene, p).into(),
                    line: 7,
                    extra_text: Some(format!("The edge leaves at {}.", fmt_point(&p))),
                });
            }
            prev = cur;
        }
    }
}

impl Driver for PolygonClipping {
    type Input = PolygonClippingInput;

    const PSEUDOCODE: &'static [PseudocodeLine] = PSEUDOCODE;

    fn compute_trace(&self, input: &PolygonClippingInput, scene: &mut Scene) -> Trace {
        self.clip(input, scene).0
    }
}

/// Clips a polygon to a rectangle.
///
/// The result is empty if the polygon is entirely outside. A polygon vertex
/// that lies exactly on a border may come out twice in a row.
pub fn clip_polygon(rect: Rect, polygon: &[Point]) -> Vec<Point> {
    let input = PolygonClippingInput {
        rect,
        polygon: polygon.to_vec(),
    };
    PolygonClipping::default().clip(&input, &mut Scene::new()).1
}
