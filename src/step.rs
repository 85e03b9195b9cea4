use std::time::Duration;

use crate::action::{Action, Scheduled, Transition};

/// One line of an algorithm's pseudocode listing, with the explanation shown
/// while it is the active line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct PseudocodeLine {
    pub code: &'static str,
    pub explanation: &'static str,
}

impl PseudocodeLine {
    pub const fn new(code: &'static str, explanation: &'static str) -> Self {
        PseudocodeLine { code, explanation }
    }
}

/// A navigable unit of playback: some actions, the pseudocode line that is
/// active while this step is current, and optionally a note about this
/// particular step.
///
/// The actions of a step are conceptually simultaneous. They are still run in
/// list order, in both directions.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Step {
    pub actions: Vec<Action>,
    pub line: usize,
    pub extra_text: Option<String>,
}

impl Step {
    pub fn new(line: usize) -> Self {
        Step {
            actions: Vec::new(),
            line,
            extra_text: None,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.extra_text = Some(text.into());
        self
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    pub fn push(&mut self, action: Action) {
        self.actions.push(action);
    }

    /// Collects the edits of all our actions for `transition`.
    pub fn schedule(&self, transition: Transition, out: &mut Vec<Scheduled>) {
        for action in &self.actions {
            action.schedule(transition, Duration::ZERO, out);
        }
    }
}

/// The complete, ordered list of steps from one run of a driver.
///
/// Step 0 is the picture before the algorithm starts; a trace that a driver
/// hands out is never empty.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct Trace {
    steps: Vec<Step>,
}

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a step, returning its index.
    pub fn push(&mut self, step: Step) -> usize {
        self.steps.push(step);
        self.steps.len() - 1
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&Step> {
        self.steps.get(idx)
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// The pseudocode line of every step, in order.
    pub fn lines(&self) -> Vec<usize> {
        self.steps.iter().map(|s| s.line).collect()
    }
}

impl std::ops::Index<usize> for Trace {
    type Output = Step;

    fn index(&self, index: usize) -> &Self::Output {
        &self.steps[index]
    }
}

impl FromIterator<Step> for Trace {
    fn from_iter<I: IntoIterator<Item = Step>>(iter: I) -> Self {
        Trace {
            steps: iter.into_iter().collect(),
        }
    }
}
