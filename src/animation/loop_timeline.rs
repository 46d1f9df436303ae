//! Built-in [`Timeline`] implementation.
//!
//! The playhead lives in "cycle space": `[0, duration]` for a loop and
//! `[0, 2 * duration]` for a yoyo, where the second half is the backward
//! pass. Time scale and direction are folded into one signed rate, so a
//! negative time scale (scroll-driven) plays backwards the same way
//! [`Timeline::set_reversed`] does.

use super::timeline::{Repeat, Timeline, TimelineSpec};
use super::tween::{Overwrite, ScalarTween, TweenId, TweenSpec};

/// Looping or yoyo timeline animating an offset from a start value to zero.
#[derive(Debug, Clone)]
pub struct LoopTimeline {
    spec: TimelineSpec,
    paused: bool,
    reversed: bool,
    playhead: f64,
    time_scale: f64,
    start: Option<f64>,
    tweens: Vec<ScalarTween>,
    next_tween: u64,
    killed: bool,
    reverse_completions: u64,
}

impl LoopTimeline {
    fn cycle(&self) -> f64 {
        match self.spec.repeat {
            Repeat::Loop => self.spec.duration,
            Repeat::Yoyo => self.spec.duration * 2.0,
        }
    }

    /// Time within the forward pass for the current playhead.
    fn local_time(&self) -> f64 {
        let duration = self.spec.duration;
        match self.spec.repeat {
            Repeat::Loop => self.playhead.min(duration),
            Repeat::Yoyo if self.playhead <= duration => self.playhead,
            Repeat::Yoyo => 2.0 * duration - self.playhead,
        }
    }

    /// Offset for the current playhead, given the start offset.
    fn offset_for(&self, start: f64) -> f64 {
        let duration = self.spec.duration;
        if duration <= 0.0 {
            return 0.0;
        }
        let eased = self.spec.ease.evaluate(self.local_time() / duration);
        start * (1.0 - eased)
    }

    fn step_tweens(&mut self, dt: f64) {
        for tween in &mut self.tweens {
            self.time_scale = tween.step(dt);
        }
        self.tweens.retain(|t| !t.is_done());
    }

    fn move_playhead(&mut self, delta: f64) {
        let cycle = self.cycle();
        if cycle <= 0.0 {
            return;
        }
        let next = self.playhead + delta;
        self.playhead = if next < 0.0 {
            // Reverse completion: snap to the loop point and carry on from
            // there, so a reversed track never shows the seam.
            self.reverse_completions += 1;
            (cycle + next).rem_euclid(cycle)
        } else if next > cycle {
            next.rem_euclid(cycle)
        } else {
            next
        };
    }

    /// Times the playhead crossed the start while going backwards.
    #[must_use]
    pub fn reverse_completions(&self) -> u64 {
        self.reverse_completions
    }

    /// Number of running tweens.
    #[must_use]
    pub fn active_tweens(&self) -> usize {
        self.tweens.len()
    }

    /// Cached start offset, if evaluated since the last invalidate.
    #[must_use]
    pub fn cached_start(&self) -> Option<f64> {
        self.start
    }
}

impl Timeline for LoopTimeline {
    fn from_spec(spec: TimelineSpec) -> Self {
        Self {
            spec,
            paused: spec.paused,
            reversed: spec.reversed,
            playhead: 0.0,
            time_scale: 1.0,
            start: None,
            tweens: Vec::new(),
            next_tween: 0,
            killed: false,
            reverse_completions: 0,
        }
    }

    fn resume(&mut self) {
        self.paused = false;
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn set_reversed(&mut self, reversed: bool) {
        self.reversed = reversed;
    }

    fn is_reversed(&self) -> bool {
        self.reversed
    }

    fn seek(&mut self, time: f64) {
        self.playhead = time.clamp(0.0, self.cycle().max(0.0));
    }

    fn progress(&self) -> f64 {
        let cycle = self.cycle();
        if cycle <= 0.0 {
            return 0.0;
        }
        self.playhead / cycle
    }

    fn set_progress(&mut self, progress: f64) {
        self.playhead = progress.clamp(0.0, 1.0) * self.cycle().max(0.0);
    }

    fn invalidate(&mut self) {
        self.start = None;
    }

    fn time_scale(&self) -> f64 {
        self.time_scale
    }

    fn set_time_scale(&mut self, scale: f64) {
        self.time_scale = scale;
    }

    fn tween_time_scale(&mut self, target: f64, spec: TweenSpec) -> TweenId {
        let id = TweenId(self.next_tween);
        self.next_tween += 1;

        match spec.overwrite {
            Overwrite::All => self.tweens.clear(),
            // Only tweens that already rendered conflict with a new one.
            Overwrite::Auto => self.tweens.retain(|t| !t.started),
            Overwrite::None => {}
        }

        if spec.duration <= 0.0 {
            self.time_scale = target;
        } else {
            self.tweens
                .push(ScalarTween::new(id, self.time_scale, target, spec));
        }
        id
    }

    fn kill_tween(&mut self, id: TweenId) {
        self.tweens.retain(|t| t.id != id);
    }

    fn kill_tweens(&mut self) {
        self.tweens.clear();
    }

    fn advance(&mut self, dt: f64, start: &dyn Fn() -> f64) -> Option<f64> {
        if self.killed {
            return None;
        }
        self.step_tweens(dt);
        if !self.paused {
            let direction = if self.reversed { -1.0 } else { 1.0 };
            self.move_playhead(dt * self.time_scale * direction);
        }
        let start = *self.start.get_or_insert_with(start);
        Some(self.offset_for(start))
    }

    fn kill(&mut self) {
        self.killed = true;
        self.paused = true;
        self.tweens.clear();
    }

    fn is_killed(&self) -> bool {
        self.killed
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::util::EasingFunction;

    fn spec(repeat: Repeat) -> TimelineSpec {
        TimelineSpec {
            duration: 10.0,
            ease: EasingFunction::Linear,
            repeat,
            paused: false,
            reversed: false,
        }
    }

    fn tween(duration: f64, overwrite: Overwrite) -> TweenSpec {
        TweenSpec {
            duration,
            ease: EasingFunction::Linear,
            overwrite,
        }
    }

    fn track_start() -> f64 {
        -300.0
    }

    #[test]
    fn offset_moves_from_start_to_zero() {
        let mut tl = LoopTimeline::from_spec(spec(Repeat::Loop));
        assert_eq!(tl.advance(0.0, &track_start), Some(-300.0));
        assert_eq!(tl.advance(5.0, &track_start), Some(-150.0));
        // Wraps to the start of the next pass.
        let x = tl.advance(6.0, &track_start).unwrap();
        assert!((x - -270.0).abs() < 1e-9);
    }

    #[test]
    fn paused_timeline_holds_position() {
        let mut tl = LoopTimeline::from_spec(TimelineSpec {
            paused: true,
            ..spec(Repeat::Loop)
        });
        assert_eq!(tl.advance(3.0, &track_start), Some(-300.0));
        tl.resume();
        let moved = tl.advance(2.0, &track_start).unwrap();
        assert!((moved - -240.0).abs() < 1e-9);
        tl.pause();
        assert_eq!(tl.advance(2.0, &track_start), Some(moved));
    }

    #[test]
    fn start_is_evaluated_lazily_and_cached() {
        let calls = Cell::new(0);
        let start = || {
            calls.set(calls.get() + 1);
            -100.0
        };
        let mut tl = LoopTimeline::from_spec(spec(Repeat::Loop));
        assert_eq!(calls.get(), 0);
        let _ = tl.advance(1.0, &start);
        let _ = tl.advance(1.0, &start);
        assert_eq!(calls.get(), 1);

        tl.invalidate();
        assert_eq!(tl.cached_start(), None);
        let _ = tl.advance(1.0, &start);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn reverse_completion_snaps_to_loop_point() {
        let mut tl = LoopTimeline::from_spec(TimelineSpec {
            reversed: true,
            ..spec(Repeat::Loop)
        });
        tl.seek(1.0);
        let _ = tl.advance(2.0, &track_start);
        assert_eq!(tl.reverse_completions(), 1);
        assert!((tl.progress() - 0.9).abs() < 1e-9);
        // Offset continues seamlessly from just before the loop point.
        let x = tl.advance(0.0, &track_start).unwrap();
        assert!((x - -30.0).abs() < 1e-9);
    }

    #[test]
    fn negative_time_scale_plays_backwards() {
        let mut tl = LoopTimeline::from_spec(spec(Repeat::Loop));
        tl.set_progress(0.5);
        tl.set_time_scale(-1.0);
        let _ = tl.advance(1.0, &track_start);
        assert!((tl.progress() - 0.4).abs() < 1e-9);
    }

    #[test]
    fn yoyo_goes_back_and_forth() {
        let mut tl = LoopTimeline::from_spec(spec(Repeat::Yoyo));
        assert_eq!(tl.advance(10.0, &track_start), Some(0.0));
        assert_eq!(tl.advance(5.0, &track_start), Some(-150.0));
        assert_eq!(tl.advance(5.0, &track_start), Some(-300.0));
        assert_eq!(tl.advance(5.0, &track_start), Some(-150.0));
    }

    #[test]
    fn seek_clamps_into_cycle() {
        let mut tl = LoopTimeline::from_spec(spec(Repeat::Loop));
        tl.seek(25.0);
        assert_eq!(tl.progress(), 1.0);
        tl.seek(-3.0);
        assert_eq!(tl.progress(), 0.0);
    }

    #[test]
    fn time_scale_tween_runs_while_paused() {
        let mut tl = LoopTimeline::from_spec(TimelineSpec {
            paused: true,
            ..spec(Repeat::Loop)
        });
        let _ = tl.tween_time_scale(3.0, tween(1.0, Overwrite::All));
        let _ = tl.advance(0.5, &track_start);
        assert_eq!(tl.time_scale(), 2.0);
        let _ = tl.advance(0.5, &track_start);
        assert_eq!(tl.time_scale(), 3.0);
        assert_eq!(tl.active_tweens(), 0);
    }

    #[test]
    fn overwrite_all_replaces_running_tween() {
        let mut tl = LoopTimeline::from_spec(spec(Repeat::Loop));
        let _ = tl.tween_time_scale(5.0, tween(1.0, Overwrite::All));
        let _ = tl.tween_time_scale(-5.0, tween(1.0, Overwrite::All));
        assert_eq!(tl.active_tweens(), 1);
        let _ = tl.advance(1.0, &track_start);
        assert_eq!(tl.time_scale(), -5.0);
    }

    #[test]
    fn overwrite_auto_kills_only_rendered_tweens() {
        let mut tl = LoopTimeline::from_spec(spec(Repeat::Loop));
        let _ = tl.tween_time_scale(5.0, tween(1.0, Overwrite::None));
        let _ = tl.advance(0.1, &track_start);
        let _ = tl.tween_time_scale(3.0, tween(1.0, Overwrite::None));

        // The first tween rendered, the second did not.
        let _ = tl.tween_time_scale(2.0, tween(1.0, Overwrite::Auto));
        assert_eq!(tl.active_tweens(), 2);
    }

    #[test]
    fn overwrite_none_stacks_tweens() {
        let mut tl = LoopTimeline::from_spec(spec(Repeat::Loop));
        let _ = tl.tween_time_scale(5.0, tween(1.0, Overwrite::None));
        let _ = tl.tween_time_scale(2.0, tween(1.0, Overwrite::None));
        assert_eq!(tl.active_tweens(), 2);
    }

    #[test]
    fn zero_duration_tween_applies_immediately() {
        let mut tl = LoopTimeline::from_spec(spec(Repeat::Loop));
        let _ = tl.tween_time_scale(4.0, tween(0.0, Overwrite::All));
        assert_eq!(tl.time_scale(), 4.0);
        assert_eq!(tl.active_tweens(), 0);
    }

    #[test]
    fn kill_tween_and_kill() {
        let mut tl = LoopTimeline::from_spec(spec(Repeat::Loop));
        let id = tl.tween_time_scale(5.0, tween(1.0, Overwrite::None));
        let _ = tl.tween_time_scale(2.0, tween(1.0, Overwrite::None));
        tl.kill_tween(id);
        assert_eq!(tl.active_tweens(), 1);

        tl.kill();
        assert!(tl.is_killed());
        assert_eq!(tl.active_tweens(), 0);
        assert_eq!(tl.advance(1.0, &track_start), None);
    }
}
