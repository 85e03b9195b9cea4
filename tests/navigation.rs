use std::time::Duration;

use arbitrary::Unstructured;
use geostep::{
    algorithms::{
        ConvexHull, LineClipping, LineClippingInput, PointInPolygon, PointInPolygonInput,
        PolygonClipping, PolygonClippingInput, SegmentIntersection,
    },
    Action, Color, Driver, Edit, Element, ElementId, Navigator, Point, Scene, Shape, Stage, Step,
    Trace, Transition,
};
use proptest::prelude::*;

const COLORS: [Color; 5] = [
    Color::BLACK,
    Color::RED,
    Color::GREEN,
    Color::BLUE,
    Color::ORANGE,
];

fn color(u: &mut Unstructured<'_>) -> arbitrary::Result<Color> {
    u.choose(&COLORS).copied()
}

/// A scene with a mix of shapes, some of them hidden.
fn scene(u: &mut Unstructured<'_>) -> arbitrary::Result<Scene> {
    let mut scene = Scene::new();
    let count = u.int_in_range(1..=6)?;
    for i in 0..count {
        let p = geostep::arbitrary::point(u)?;
        let el = match i % 3 {
            0 => Element::circle(p, 5.0),
            1 => Element::line(p, geostep::arbitrary::point(u)?),
            _ => Element::text(p, format!("label {i}")),
        }
        .with_stroke(color(u)?);
        if u.arbitrary()? {
            scene.add(el);
        } else {
            scene.add_hidden(el);
        }
    }
    Ok(scene)
}

/// An action on `id` that makes sense for what it looks like now.
fn action_on(scene: &Scene, id: ElementId, u: &mut Unstructured<'_>) -> arbitrary::Result<Action> {
    let Some(el) = scene.get(id) else {
        return Err(arbitrary::Error::IncorrectFormat);
    };
    Ok(match u.int_in_range(0..=5)? {
        0 if el.visible => Action::remove(id),
        0 => Action::add(id),
        1 => Action::recolor(id, el.stroke, color(u)?),
        2 => Action::refill(id, el.fill, Some(color(u)?)),
        3 => match &el.shape {
            Shape::Text { content, .. } => Action::retext(id, content.clone(), "something else"),
            shape => Action::reshape(
                id,
                shape.clone(),
                Shape::Circle {
                    center: geostep::arbitrary::point(u)?,
                    radius: 3.0,
                },
            ),
        },
        4 if el.visible => Action::highlight(id, el.stroke, color(u)?),
        _ => {
            if el.visible {
                Action::highlight(id, el.stroke, Color::CYAN)
            } else {
                Action::flash(id)
            }
        }
    })
}

/// A single action, or a staggered group of actions on distinct elements.
fn action(scene: &Scene, u: &mut Unstructured<'_>) -> arbitrary::Result<Action> {
    let ids: Vec<ElementId> = scene.elements().map(|(id, _)| id).collect();
    if u.arbitrary()? {
        let id = *u.choose(&ids)?;
        action_on(scene, id, u)
    } else {
        let mut children = Vec::new();
        for id in ids {
            if u.arbitrary()? {
                children.push(action_on(scene, id, u)?);
            }
        }
        Ok(Action::staggered(children, Duration::from_millis(10)))
    }
}

fn cross(stage: &mut Stage, action: &Action, transition: Transition) {
    let mut scheduled = Vec::new();
    action.schedule(transition, Duration::ZERO, &mut scheduled);
    stage.perform(scheduled);
    stage.flush();
}

fn actions_are_reversible(u: &mut Unstructured<'_>) -> arbitrary::Result<()> {
    let scene = scene(u)?;
    let action = action(&scene, u)?;

    for (there, back) in [
        (Transition::FromPrevious, Transition::ToPrevious),
        (Transition::FromNext, Transition::ToNext),
    ] {
        let mut stage = Stage::new(scene.clone());
        cross(&mut stage, &action, there);
        cross(&mut stage, &action, back);
        assert_eq!(stage.scene(), &scene, "{action:?} across {there:?}");
    }
    Ok(())
}

#[test]
fn reversibility() {
    arbtest::arbtest(actions_are_reversible);
}

#[test]
fn fan_out_keeps_list_order() {
    let mut scene = Scene::new();
    let ids: Vec<ElementId> = (0..5)
        .map(|i| scene.add_hidden(Element::circle(Point::new(i as f64, 0.0), 1.0)))
        .collect();
    let step = Step::new(0)
        .with_action(Action::add(ids[0]))
        .with_action(Action::staggered(
            vec![Action::add(ids[1]), Action::add(ids[2]), Action::add(ids[3])],
            Duration::from_millis(5),
        ))
        .with_action(Action::add(ids[4]));

    let order = |transition| {
        let mut scheduled = Vec::new();
        step.schedule(transition, &mut scheduled);
        scheduled.iter().map(|s| s.element).collect::<Vec<_>>()
    };

    assert_eq!(order(Transition::FromPrevious), ids);
    // Going back, the step's own list stays in order but the staggered
    // children run backwards.
    assert_eq!(
        order(Transition::ToPrevious),
        vec![ids[0], ids[3], ids[2], ids[1], ids[4]]
    );

    let mut scheduled = Vec::new();
    step.schedule(Transition::ToPrevious, &mut scheduled);
    assert!(scheduled.iter().all(|s| s.edit == Edit::Hide));
    let delays: Vec<_> = scheduled.iter().map(|s| s.delay.as_millis()).collect();
    assert_eq!(delays, vec![0, 0, 5, 10, 0]);
}

/// A trace that shows one more dot per step.
fn dots(n: usize) -> (Trace, Scene) {
    let mut scene = Scene::new();
    let mut trace = Trace::new();
    trace.push(Step::new(0));
    for i in 0..n {
        let id = scene.add_hidden(Element::circle(Point::new(i as f64, 0.0), 1.0));
        trace.push(Step::new(1).with_action(Action::add(id)));
    }
    (trace, scene)
}

proptest! {
    #[test]
    fn cursor_stays_in_bounds(n in 0usize..6, moves in proptest::collection::vec(any::<bool>(), 0..30)) {
        let (trace, scene) = dots(n);
        let mut nav = Navigator::default();
        nav.load(trace, scene);

        let mut expected = 0usize;
        for forward in moves {
            let h = if forward {
                expected = (expected + 1).min(n);
                nav.forward()
            } else {
                expected = expected.saturating_sub(1);
                nav.back()
            };
            prop_assert_eq!(h.map(|h| h.step), Some(expected));
            prop_assert_eq!(nav.scene().unwrap().visible().count(), expected);
        }
    }
}

fn check_round_trip<D: Driver>(driver: &D, input: &D::Input) {
    let (trace, scene) = driver.run(input);
    assert!(!trace.is_empty());
    assert!(trace.lines().iter().all(|&l| l < D::PSEUDOCODE.len()));

    let mut nav = Navigator::default();
    nav.load(trace.clone(), scene);
    let start = nav.scene().unwrap().clone();
    for _ in 1..trace.len() {
        nav.forward();
    }
    // One more is a no-op.
    assert_eq!(nav.forward().map(|h| h.step), Some(trace.len() - 1));
    for _ in 1..trace.len() {
        nav.back();
    }
    assert_eq!(nav.back().map(|h| h.step), Some(0));
    nav.advance(Duration::from_secs(60));
    assert_eq!(nav.scene().unwrap(), &start);
}

fn drivers_round_trip(u: &mut Unstructured<'_>) -> arbitrary::Result<()> {
    use geostep::arbitrary::{lines, point, polygon, rect};

    match u.int_in_range(0..=4)? {
        0 => check_round_trip(&SegmentIntersection::default(), &lines(u)?),
        1 => {
            let points = (0..u.int_in_range(0..=10)?)
                .map(|_| point(u))
                .collect::<arbitrary::Result<Vec<_>>>()?;
            check_round_trip(&ConvexHull::default(), &points);
        }
        2 => {
            let input = LineClippingInput {
                rect: rect(u)?,
                lines: lines(u)?,
            };
            check_round_trip(&LineClipping::default(), &input);
        }
        3 => {
            let input = PolygonClippingInput {
                rect: rect(u)?,
                polygon: polygon(u)?,
            };
            check_round_trip(&PolygonClipping::default(), &input);
        }
        _ => {
            let input = PointInPolygonInput {
                polygon: polygon(u)?,
                point: point(u)?,
            };
            check_round_trip(&PointInPolygon::default(), &input);
        }
    }
    Ok(())
}

#[test]
fn round_trip() {
    arbtest::arbtest(drivers_round_trip);
}

#[test]
fn empty_inputs() {
    let mut nav = Navigator::default();
    let (trace, scene) = SegmentIntersection::default().run(&Vec::new());
    assert_eq!(trace.len(), 1);
    nav.load(trace, scene);
    assert_eq!(nav.forward().map(|h| h.step), Some(0));
    assert_eq!(nav.back().map(|h| h.step), Some(0));
    assert!(!nav.play());
    nav.advance(Duration::from_secs(1));
    assert_eq!(nav.cursor(), Some(0));

    assert_eq!(ConvexHull::default().run(&Vec::new()).0.len(), 1);
    assert_eq!(
        PointInPolygon::default()
            .run(&PointInPolygonInput {
                polygon: Vec::new(),
                point: Point::new(0.0, 0.0),
            })
            .0
            .len(),
        1
    );
}
