//! Test doubles shared by the unit tests.

use crate::animation::{Overwrite, Timeline, TimelineSpec, TweenId, TweenSpec};

/// One call observed by [`RecordingTimeline`].
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Resume,
    Pause,
    SetReversed(bool),
    Seek(f64),
    Invalidate,
    SetTimeScale(f64),
    Tween { target: f64, overwrite: Overwrite },
    KillTween(TweenId),
    KillTweens,
    Kill,
}

/// Timeline that applies every change instantly and records what was asked.
///
/// Tweens jump straight to their target; `advance` returns the cached start
/// offset unchanged.
#[derive(Debug)]
pub(crate) struct RecordingTimeline {
    pub(crate) spec: TimelineSpec,
    pub(crate) calls: Vec<Call>,
    pub(crate) start_reads: usize,
    paused: bool,
    reversed: bool,
    progress: f64,
    time_scale: f64,
    start: Option<f64>,
    next_tween: u64,
    killed: bool,
}

impl RecordingTimeline {
    /// Targets of every tween started so far.
    pub(crate) fn tween_targets(&self) -> Vec<f64> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Tween { target, .. } => Some(*target),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn count(&self, call: &Call) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }
}

impl Timeline for RecordingTimeline {
    fn from_spec(spec: TimelineSpec) -> Self {
        Self {
            spec,
            calls: Vec::new(),
            start_reads: 0,
            paused: spec.paused,
            reversed: spec.reversed,
            progress: 0.0,
            time_scale: 1.0,
            start: None,
            next_tween: 0,
            killed: false,
        }
    }

    fn resume(&mut self) {
        self.paused = false;
        self.calls.push(Call::Resume);
    }

    fn pause(&mut self) {
        self.paused = true;
        self.calls.push(Call::Pause);
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn set_reversed(&mut self, reversed: bool) {
        self.reversed = reversed;
        self.calls.push(Call::SetReversed(reversed));
    }

    fn is_reversed(&self) -> bool {
        self.reversed
    }

    fn seek(&mut self, time: f64) {
        self.calls.push(Call::Seek(time));
    }

    fn progress(&self) -> f64 {
        self.progress
    }

    fn set_progress(&mut self, progress: f64) {
        self.progress = progress;
    }

    fn invalidate(&mut self) {
        self.start = None;
        self.calls.push(Call::Invalidate);
    }

    fn time_scale(&self) -> f64 {
        self.time_scale
    }

    fn set_time_scale(&mut self, scale: f64) {
        self.time_scale = scale;
        self.calls.push(Call::SetTimeScale(scale));
    }

    fn tween_time_scale(&mut self, target: f64, spec: TweenSpec) -> TweenId {
        self.time_scale = target;
        self.calls.push(Call::Tween {
            target,
            overwrite: spec.overwrite,
        });
        self.next_tween += 1;
        TweenId(self.next_tween)
    }

    fn kill_tween(&mut self, id: TweenId) {
        self.calls.push(Call::KillTween(id));
    }

    fn kill_tweens(&mut self) {
        self.calls.push(Call::KillTweens);
    }

    fn advance(&mut self, _dt: f64, start: &dyn Fn() -> f64) -> Option<f64> {
        if self.killed {
            return None;
        }
        if self.start.is_none() {
            self.start_reads += 1;
        }
        Some(*self.start.get_or_insert_with(start))
    }

    fn kill(&mut self) {
        self.killed = true;
        self.calls.push(Call::Kill);
    }

    fn is_killed(&self) -> bool {
        self.killed
    }
}
