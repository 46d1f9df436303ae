//! The animation engine seam.
//!
//! The controller talks to its timeline only through [`Timeline`], so the
//! playback logic runs against [`super::LoopTimeline`] in production and
//! against lightweight fakes in tests.

use super::tween::{TweenId, TweenSpec};
use crate::util::EasingFunction;

/// How the timeline behaves at its end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Repeat {
    /// Jump back to the start and keep going.
    #[default]
    Loop,
    /// Play backwards, then forwards again, forever.
    Yoyo,
}

/// Construction parameters of a timeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineSpec {
    /// Seconds for one pass from start offset to zero.
    pub duration: f64,
    /// Timing curve of the pass.
    pub ease: EasingFunction,
    /// End-of-pass behaviour.
    pub repeat: Repeat,
    /// Start paused.
    pub paused: bool,
    /// Start reversed.
    pub reversed: bool,
}

/// A single-tween timeline moving an offset from a lazily evaluated start
/// value to zero.
pub trait Timeline {
    /// Build a timeline from `spec`.
    fn from_spec(spec: TimelineSpec) -> Self
    where
        Self: Sized;

    /// Resume playback.
    fn resume(&mut self);

    /// Pause playback. Speed tweens keep running.
    fn pause(&mut self);

    /// Whether playback is paused.
    fn is_paused(&self) -> bool;

    /// Set the play direction.
    fn set_reversed(&mut self, reversed: bool);

    /// Whether the timeline plays backwards.
    fn is_reversed(&self) -> bool;

    /// Jump to an absolute time in seconds.
    fn seek(&mut self, time: f64);

    /// Position within the repeat cycle, 0..=1.
    fn progress(&self) -> f64;

    /// Jump to a position within the repeat cycle, 0..=1.
    fn set_progress(&mut self, progress: f64);

    /// Forget the cached start offset; it is re-read on the next
    /// [`advance`](Self::advance).
    fn invalidate(&mut self);

    /// Playback rate multiplier.
    fn time_scale(&self) -> f64;

    /// Set the playback rate directly.
    fn set_time_scale(&mut self, scale: f64);

    /// Tween the playback rate toward `target`.
    fn tween_time_scale(&mut self, target: f64, spec: TweenSpec) -> TweenId;

    /// Kill one tween; unknown ids are ignored.
    fn kill_tween(&mut self, id: TweenId);

    /// Kill every running tween of this timeline.
    fn kill_tweens(&mut self);

    /// Advance by `dt` seconds of wall time and return the current offset.
    /// `start` is evaluated only when no start offset is cached. Returns
    /// `None` once killed.
    fn advance(&mut self, dt: f64, start: &dyn Fn() -> f64) -> Option<f64>;

    /// Stop for good and release tweens.
    fn kill(&mut self);

    /// Whether [`kill`](Self::kill) ran.
    fn is_killed(&self) -> bool;
}
