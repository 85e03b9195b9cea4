//! Reversible actions.
//!
//! An [`Action`] describes what happens to the scene when a step boundary is
//! crossed, in each of the four possible ways. Actions don't touch the scene
//! directly; they [`schedule`](Action::schedule) [`Edit`]s, each with a delay,
//! and the [`Stage`](crate::Stage) applies them.
//!
//! The invariant that makes time travel work is that every action is its own
//! inverse across a single boundary: crossing it with
//! [`Transition::FromPrevious`] and then [`Transition::ToPrevious`] (or
//! [`Transition::FromNext`] and then [`Transition::ToNext`]) puts every element
//! it touches back the way it was.

use std::time::Duration;

use crate::scene::{Color, Edit, ElementId, Shape};

/// One of the four ways a step boundary can be crossed.
///
/// Moving the cursor forward from step `i` does `ToNext` on step `i` and then
/// `FromPrevious` on step `i + 1`. Moving backward does `ToPrevious` on step `i`
/// and then `FromNext` on step `i - 1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub enum Transition {
    /// Arriving at this step from the one before it.
    FromPrevious,
    /// Leaving this step for the one after it.
    ToNext,
    /// Leaving this step for the one before it.
    ToPrevious,
    /// Arriving at this step from the one after it.
    FromNext,
}

impl Transition {
    /// Is this part of moving the cursor forward?
    pub fn is_forward(self) -> bool {
        matches!(self, Transition::FromPrevious | Transition::ToNext)
    }
}

/// An edit that an action wants applied, and how long to wait before applying it.
#[derive(Clone, Debug, PartialEq)]
pub struct Scheduled {
    pub delay: Duration,
    pub element: ElementId,
    pub edit: Edit,
}

/// A reversible change to the scene.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub enum Action {
    /// Shows an element when arriving from the previous step, and hides it
    /// again when going back.
    ///
    /// The element should have been added to the scene hidden. To remove an
    /// element, reverse this (or use [`Action::remove`]).
    Add(ElementId),
    /// Applies `forward` when arriving from the previous step, and `backward`
    /// when going back to it.
    ///
    /// `backward` must undo `forward`; the constructors
    /// ([`Action::recolor`], [`Action::reshape`], etc.) take care of that.
    Transform {
        element: ElementId,
        forward: Vec<Edit>,
        backward: Vec<Edit>,
    },
    /// Applies `enter` whenever the step becomes current, from either side,
    /// and `exit` whenever it stops being current.
    ///
    /// This is for effects that only last as long as their step, like
    /// highlighting.
    Symmetric {
        element: ElementId,
        enter: Vec<Edit>,
        exit: Vec<Edit>,
    },
    /// Runs the children one after another, `interval` apart.
    ///
    /// Children run in list order when moving forward and in reverse list
    /// order when moving backward, so that a staggered reveal turns into a
    /// staggered un-reveal.
    Staggered {
        children: Vec<Action>,
        interval: Duration,
    },
    /// An entry-only action with its arrive and leave behavior swapped.
    Reversed(Box<Action>),
}

impl Action {
    pub fn add(element: ElementId) -> Self {
        Action::Add(element)
    }

    /// Hides an element when arriving from the previous step.
    pub fn remove(element: ElementId) -> Self {
        Action::Reversed(Box::new(Action::Add(element)))
    }

    pub fn transform(element: ElementId, forward: Vec<Edit>, backward: Vec<Edit>) -> Self {
        Action::Transform {
            element,
            forward,
            backward,
        }
    }

    /// Changes the stroke color from `from` to `to`.
    pub fn recolor(element: ElementId, from: Color, to: Color) -> Self {
        Self::transform(element, vec![Edit::Stroke(to)], vec![Edit::Stroke(from)])
    }

    /// Changes the fill color from `from` to `to`.
    pub fn refill(element: ElementId, from: Option<Color>, to: Option<Color>) -> Self {
        Self::transform(element, vec![Edit::Fill(to)], vec![Edit::Fill(from)])
    }

    /// Moves or reshapes an element.
    pub fn reshape(element: ElementId, from: Shape, to: Shape) -> Self {
        Self::transform(element, vec![Edit::Shape(to)], vec![Edit::Shape(from)])
    }

    /// Replaces the text of a text element.
    pub fn retext(element: ElementId, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::transform(
            element,
            vec![Edit::Text(to.into())],
            vec![Edit::Text(from.into())],
        )
    }

    pub fn symmetric(element: ElementId, enter: Vec<Edit>, exit: Vec<Edit>) -> Self {
        Action::Symmetric {
            element,
            enter,
            exit,
        }
    }

    /// Shows a (hidden) element for the duration of a single step.
    pub fn flash(element: ElementId) -> Self {
        Self::symmetric(element, vec![Edit::Show], vec![Edit::Hide])
    }

    /// Strokes a (visible) element with `color` for the duration of a single step.
    pub fn highlight(element: ElementId, normal: Color, color: Color) -> Self {
        Self::symmetric(element, vec![Edit::Stroke(color)], vec![Edit::Stroke(normal)])
    }

    pub fn staggered(children: Vec<Action>, interval: Duration) -> Self {
        Action::Staggered { children, interval }
    }

    /// Does this action only react to the "previous" side of its step?
    pub fn is_entry_only(&self) -> bool {
        match self {
            Action::Add(_) | Action::Transform { .. } => true,
            Action::Reversed(inner) => inner.is_entry_only(),
            Action::Symmetric { .. } | Action::Staggered { .. } => false,
        }
    }

    /// Returns the action that does on arrival what this one does on going back.
    ///
    /// This is how "undo this add" is made from an add: the reverse of
    /// [`Action::Add`] hides its element when arriving and shows it again when
    /// going back. Actions that react to the "next" side of their step
    /// (symmetric and staggered ones) have no reverse, and give `None`.
    pub fn reverse(&self) -> Option<Action> {
        if !self.is_entry_only() {
            return None;
        }
        Some(match self {
            Action::Reversed(inner) => (**inner).clone(),
            other => Action::Reversed(Box::new(other.clone())),
        })
    }

    /// Collects the edits for crossing a step boundary with `transition`,
    /// starting `delay` from now.
    pub fn schedule(&self, transition: Transition, delay: Duration, out: &mut Vec<Scheduled>) {
        let mut push = |element: ElementId, edits: &[Edit]| {
            out.extend(edits.iter().map(|edit| Scheduled {
                delay,
                element,
                edit: edit.clone(),
            }))
        };

        match self {
            Action::Add(element) => match transition {
                Transition::FromPrevious => push(*element, &[Edit::Show]),
                Transition::ToPrevious => push(*element, &[Edit::Hide]),
                Transition::ToNext | Transition::FromNext => {}
            },
            Action::Transform {
                element,
                forward,
                backward,
            } => match transition {
                Transition::FromPrevious => push(*element, forward),
                Transition::ToPrevious => push(*element, backward),
                Transition::ToNext | Transition::FromNext => {}
            },
            Action::Symmetric {
                element,
                enter,
                exit,
            } => match transition {
                Transition::FromPrevious | Transition::FromNext => push(*element, enter),
                Transition::ToPrevious | Transition::ToNext => push(*element, exit),
            },
            Action::Staggered { children, interval } => {
                let ordered: Box<dyn Iterator<Item = &Action>> = if transition.is_forward() {
                    Box::new(children.iter())
                } else {
                    Box::new(children.iter().rev())
                };
                for (i, child) in ordered.enumerate() {
                    let offset = interval.saturating_mul(i as u32);
                    child.schedule(transition, delay + offset, out);
                }
            }
            Action::Reversed(inner) => match transition {
                Transition::FromPrevious => inner.schedule(Transition::ToPrevious, delay, out),
                Transition::ToPrevious => inner.schedule(Transition::FromPrevious, delay, out),
                Transition::ToNext | Transition::FromNext => {}
            },
        }
    }

    /// Every element this action touches, in the order it first touches them.
    pub fn elements(&self) -> Vec<ElementId> {
        let mut ret = Vec::new();
        self.collect_elements(&mut ret);
        ret
    }

    fn collect_elements(&self, out: &mut Vec<ElementId>) {
        match self {
            Action::Add(element)
            | Action::Transform { element, .. }
            | Action::Symmetric { element, .. } => {
                if !out.contains(element) {
                    out.push(*element);
                }
            }
            Action::Staggered { children, .. } => {
                for c in children {
                    c.collect_elements(out);
                }
            }
            Action::Reversed(inner) => inner.collect_elements(out),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::{geom::Point, scene::Element, Scene};

    fn run(scene: &mut Scene, action: &Action, transition: Transition) {
        let mut out = Vec::new();
        action.schedule(transition, Duration::ZERO, &mut out);
        // Stable, so edits with the same delay keep their order.
        out.sort_by_key(|s| s.delay);
        for s in out {
            scene.apply(s.element, &s.edit);
        }
    }

    fn scene_with_dots(n: usize) -> (Scene, Vec<ElementId>) {
        let mut scene = Scene::new();
        let ids = (0..n)
            .map(|i| scene.add_hidden(Element::circle(Point::new(i as f64, 0.0), 3.0)))
            .collect();
        (scene, ids)
    }

    #[test]
    fn add_and_remove() {
        let (mut scene, ids) = scene_with_dots(1);
        let add = Action::add(ids[0]);
        run(&mut scene, &add, Transition::FromPrevious);
        assert!(scene.get(ids[0]).unwrap().visible);

        let remove = add.reverse().unwrap();
        assert_eq!(remove, Action::remove(ids[0]));
        run(&mut scene, &remove, Transition::FromPrevious);
        assert!(!scene.get(ids[0]).unwrap().visible);
        run(&mut scene, &remove, Transition::ToPrevious);
        assert!(scene.get(ids[0]).unwrap().visible);

        assert_eq!(remove.reverse(), Some(add));
    }

    #[test]
    fn only_entry_only_actions_reverse() {
        let (_, ids) = scene_with_dots(2);
        let recolor = Action::recolor(ids[0], Color::BLACK, Color::RED);
        assert_matches!(recolor.reverse(), Some(Action::Reversed(inner)) if *inner == recolor);

        assert_eq!(Action::flash(ids[0]).reverse(), None);
        assert_eq!(Action::highlight(ids[0], Color::BLACK, Color::RED).reverse(), None);
        let staggered = Action::staggered(
            vec![Action::add(ids[0]), Action::add(ids[1])],
            Duration::from_millis(5),
        );
        assert_eq!(staggered.reverse(), None);
        assert_eq!(Action::Reversed(Box::new(staggered)).reverse(), None);
    }

    #[test]
    fn entry_only_ignores_next() {
        let (mut scene, ids) = scene_with_dots(1);
        let before = scene.clone();
        for action in [
            Action::add(ids[0]),
            Action::remove(ids[0]),
            Action::recolor(ids[0], Color::BLACK, Color::RED),
        ] {
            run(&mut scene, &action, Transition::ToNext);
            run(&mut scene, &action, Transition::FromNext);
            assert_eq!(scene, before);
        }
    }

    #[test]
    fn symmetric_from_both_sides() {
        let (mut scene, ids) = scene_with_dots(1);
        let flash = Action::flash(ids[0]);
        run(&mut scene, &flash, Transition::FromNext);
        assert!(scene.get(ids[0]).unwrap().visible);
        run(&mut scene, &flash, Transition::ToNext);
        assert!(!scene.get(ids[0]).unwrap().visible);
        run(&mut scene, &flash, Transition::FromPrevious);
        assert!(scene.get(ids[0]).unwrap().visible);
        run(&mut scene, &flash, Transition::ToPrevious);
        assert!(!scene.get(ids[0]).unwrap().visible);
    }

    #[test]
    fn staggered_order() {
        let (_, ids) = scene_with_dots(3);
        let interval = Duration::from_millis(10);
        let action = Action::staggered(ids.iter().copied().map(Action::add).collect(), interval);

        let mut out = Vec::new();
        action.schedule(Transition::FromPrevious, Duration::ZERO, &mut out);
        let fwd: Vec<_> = out.iter().map(|s| (s.element, s.delay)).collect();
        assert_eq!(
            fwd,
            vec![
                (ids[0], Duration::ZERO),
                (ids[1], interval),
                (ids[2], interval * 2)
            ]
        );

        out.clear();
        action.schedule(Transition::ToPrevious, Duration::ZERO, &mut out);
        let back: Vec<_> = out.iter().map(|s| (s.element, s.delay)).collect();
        assert_eq!(
            back,
            vec![
                (ids[2], Duration::ZERO),
                (ids[1], interval),
                (ids[0], interval * 2)
            ]
        );
    }

    #[test]
    fn nested_delays_accumulate() {
        let (_, ids) = scene_with_dots(3);
        let interval = Duration::from_millis(10);
        let inner = Action::staggered(vec![Action::add(ids[1]), Action::add(ids[2])], interval);
        let outer = Action::staggered(vec![Action::add(ids[0]), inner], interval);

        let mut out = Vec::new();
        outer.schedule(Transition::FromPrevious, Duration::from_millis(5), &mut out);
        let delays: Vec<_> = out.iter().map(|s| s.delay.as_millis()).collect();
        assert_eq!(delays, vec![5, 15, 25]);
        assert_eq!(outer.elements(), ids);
    }

    #[test]
    fn reversible_round_trips() {
        let (mut scene, ids) = scene_with_dots(3);
        let text = scene.add(Element::text(Point::new(0.0, 0.0), "0"));
        let from = Shape::Circle {
            center: Point::new(0.0, 0.0),
            radius: 3.0,
        };
        let to = Shape::Circle {
            center: Point::new(5.0, 5.0),
            radius: 6.0,
        };
        let actions = vec![
            Action::add(ids[0]),
            Action::recolor(ids[1], Color::BLACK, Color::ORANGE),
            Action::refill(ids[1], Some(Color::BLACK), None),
            Action::reshape(ids[0], from, to),
            Action::retext(text, "0", "0.50π"),
            Action::flash(ids[2]),
            Action::staggered(
                vec![Action::add(ids[1]), Action::remove(ids[1])],
                Duration::from_millis(3),
            ),
        ];

        let original = scene.clone();
        for a in &actions {
            run(&mut scene, a, Transition::FromPrevious);
            run(&mut scene, a, Transition::ToPrevious);
            assert_eq!(scene, original, "{a:?}");

            run(&mut scene, a, Transition::FromNext);
            run(&mut scene, a, Transition::ToNext);
            if a.is_entry_only() {
                assert_eq!(scene, original, "{a:?}");
            }
        }
    }
}
