//! Stepping through a trace.

use std::time::Duration;

use crate::{
    action::Transition,
    scene::Scene,
    stage::Stage,
    step::{Step, Trace},
};

/// How fast [`Navigator::play`] goes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PlaybackConfig {
    /// The time between two steps while playing.
    pub interval: Duration,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        PlaybackConfig {
            interval: Duration::from_millis(800),
        }
    }
}

/// What the UI needs to know about the current step.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Highlight {
    /// The index of the current step.
    pub step: usize,
    /// The pseudocode line of the current step.
    pub line: usize,
    pub extra_text: Option<String>,
}

#[derive(Debug)]
struct Session {
    trace: Trace,
    stage: Stage,
    cursor: usize,
    /// If we're playing, the time since the last tick.
    playing: Option<Duration>,
}

impl Session {
    fn highlight(&self) -> Highlight {
        let step = &self.trace[self.cursor];
        Highlight {
            step: self.cursor,
            line: step.line,
            extra_text: step.extra_text.clone(),
        }
    }

    fn at_end(&self) -> bool {
        self.cursor + 1 >= self.trace.len()
    }

    /// Crosses one step boundary: the exit transition of the current step,
    /// then the entry transition of the target.
    ///
    /// Returns false (and does nothing) at the ends of the trace.
    fn cross(&mut self, forward: bool) -> bool {
        let (target, exit, enter) = if forward {
            if self.at_end() {
                return false;
            }
            (self.cursor + 1, Transition::ToNext, Transition::FromPrevious)
        } else {
            if self.cursor == 0 {
                return false;
            }
            (self.cursor - 1, Transition::ToPrevious, Transition::FromNext)
        };

        // Settle whatever the previous transition was still animating, so that
        // edits from two different transitions never interleave.
        self.stage.flush();

        let mut scheduled = Vec::new();
        self.trace[self.cursor].schedule(exit, &mut scheduled);
        self.trace[target].schedule(enter, &mut scheduled);
        self.stage.perform(scheduled);
        self.cursor = target;
        tracing::trace!(cursor = self.cursor, forward, "crossed a step boundary");
        true
    }
}

/// A cursor into a trace, together with the scene the trace plays back against.
///
/// The cursor is always in `0..trace.len()`, and the scene always looks like
/// the entry transitions of steps `0..=cursor` have been applied in order
/// (modulo animations that are still running; see [`Navigator::advance`]).
///
/// There is no real timer in here: the host is expected to call
/// [`Navigator::advance`] from its event loop with the time that has passed.
#[derive(Debug, Default)]
pub struct Navigator {
    config: PlaybackConfig,
    session: Option<Session>,
}

impl Navigator {
    pub fn new(config: PlaybackConfig) -> Self {
        Navigator {
            config,
            session: None,
        }
    }

    /// Starts navigating `trace`, replacing whatever we had before.
    ///
    /// `scene` must be the scene that the trace's driver allocated its
    /// elements in. Step 0 is rendered right away.
    pub fn load(&mut self, mut trace: Trace, scene: Scene) -> Highlight {
        if trace.is_empty() {
            tracing::warn!("loaded an empty trace; adding an empty initial step");
            trace.push(Step::new(0));
        }

        let mut stage = Stage::new(scene);
        let mut scheduled = Vec::new();
        trace[0].schedule(Transition::FromPrevious, &mut scheduled);
        stage.perform(scheduled);
        stage.flush();

        tracing::debug!(steps = trace.len(), "loaded a trace");
        let session = self.session.insert(Session {
            trace,
            stage,
            cursor: 0,
            playing: None,
        });
        session.highlight()
    }

    /// Throws away the trace, the cursor and the scene.
    ///
    /// The scene is dropped rather than rewound, because it might contain
    /// things that no step knows about.
    pub fn reset(&mut self) {
        self.session = None;
    }

    /// Moves the cursor one step forward, if it isn't at the end already.
    pub fn forward(&mut self) -> Option<Highlight> {
        let session = self.session.as_mut()?;
        session.cross(true);
        Some(session.highlight())
    }

    /// Moves the cursor one step back, if it isn't at the start already.
    pub fn back(&mut self) -> Option<Highlight> {
        let session = self.session.as_mut()?;
        session.cross(false);
        Some(session.highlight())
    }

    /// Starts playing.
    ///
    /// Returns false if nothing happened: because we're already playing,
    /// because there's no trace, or because the cursor is already at the end.
    pub fn play(&mut self) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if session.playing.is_some() || session.at_end() {
            return false;
        }
        tracing::trace!(interval = ?self.config.interval, "play");
        session.playing = Some(Duration::ZERO);
        true
    }

    /// Stops playing. Animations that already started will still finish.
    pub fn pause(&mut self) {
        if let Some(session) = self.session.as_mut() {
            if session.playing.take().is_some() {
                tracing::trace!(cursor = session.cursor, "pause");
            }
        }
    }

    /// Toggles between playing and paused, returning whether we're now playing.
    pub fn play_pause(&mut self) -> bool {
        if self.is_playing() {
            self.pause();
            false
        } else {
            self.play()
        }
    }

    /// Changes the play interval. If we're playing, this takes effect from
    /// the next tick.
    pub fn set_interval(&mut self, interval: Duration) {
        self.config.interval = interval;
    }

    pub fn interval(&self) -> Duration {
        self.config.interval
    }

    pub fn is_playing(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.playing.is_some())
    }

    /// Lets `elapsed` time pass: runs delayed edits that fall due and, while
    /// playing, moves forward once per interval.
    ///
    /// Playing stops by itself when the cursor reaches the end.
    pub fn advance(&mut self, mut elapsed: Duration) {
        let interval = self.config.interval;
        let Some(session) = self.session.as_mut() else {
            return;
        };

        loop {
            match session.playing {
                Some(since_tick) if interval.saturating_sub(since_tick) <= elapsed => {
                    let until_tick = interval.saturating_sub(since_tick);
                    session.stage.advance(until_tick);
                    elapsed -= until_tick;

                    session.playing = Some(Duration::ZERO);
                    session.cross(true);
                    tracing::trace!(cursor = session.cursor, "play tick");
                    if session.at_end() {
                        session.playing = None;
                    }
                }
                Some(since_tick) => {
                    session.stage.advance(elapsed);
                    session.playing = Some(since_tick + elapsed);
                    break;
                }
                None => {
                    session.stage.advance(elapsed);
                    break;
                }
            }
        }
    }

    /// Is an animation still running?
    pub fn is_animating(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.stage.has_pending())
    }

    pub fn cursor(&self) -> Option<usize> {
        self.session.as_ref().map(|s| s.cursor)
    }

    /// The number of steps in the current trace (zero if there isn't one).
    pub fn len(&self) -> usize {
        self.session.as_ref().map_or(0, |s| s.trace.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn highlight(&self) -> Option<Highlight> {
        self.session.as_ref().map(Session::highlight)
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.session.as_ref().map(|s| s.stage.scene())
    }

    pub fn trace(&self) -> Option<&Trace> {
        self.session.as_ref().map(|s| &s.trace)
    }
}
