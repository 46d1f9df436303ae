//! Scroll-velocity driven speed.
//!
//! Every frame the plugin samples the page scroll position, turns the
//! distance scrolled since the previous frame into a target time scale and
//! tweens the reel's timeline toward it. When scrolling stops the speed
//! settles back to a slow creep in the last direction (or to a standstill
//! with `stop_on_end`).

use std::cell::RefCell;
use std::rc::Rc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{Plugin, PluginHost, PluginInstance};
use crate::animation::{FrameContext, Overwrite, Timeline, TweenId, TweenSpec};
use crate::error::ReelError;
use crate::util::EasingFunction;

/// Name under which the plugin is registered.
pub const NAME: &str = "scroller";

/// Options of the `scroller` plugin.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Scroller")]
#[serde(default)]
pub struct ScrollerOptions {
    /// Seconds each speed tween takes.
    #[schemars(range(min = 0.0))]
    pub speed: f64,
    /// Scroll distance per frame → time scale factor.
    pub multiplier: f64,
    /// Minimum time scale magnitude while moving, and the idle creep speed.
    pub threshold: f64,
    /// Timing curve of the speed tweens.
    pub ease: EasingFunction,
    /// Overwrite mode of the speed tweens.
    pub overwrite: Overwrite,
    /// Follow the scroll direction; when false the track always moves
    /// forward.
    pub both_direction: bool,
    /// Invert the scroll direction.
    pub reversed: bool,
    /// Come to a standstill when scrolling stops instead of creeping on.
    pub stop_on_end: bool,
}

impl Default for ScrollerOptions {
    fn default() -> Self {
        Self {
            speed: 1.0,
            multiplier: 0.5,
            threshold: 1.0,
            ease: EasingFunction::ExpoOut,
            overwrite: Overwrite::All,
            both_direction: true,
            reversed: false,
            stop_on_end: false,
        }
    }
}

impl ScrollerOptions {
    /// Check the options for values the speed mapping cannot work with.
    ///
    /// # Errors
    ///
    /// A description of the first offending value.
    pub fn validate(&self) -> Result<(), String> {
        if !self.speed.is_finite() || self.speed < 0.0 {
            return Err(format!("speed must be a non-negative number, got {}", self.speed));
        }
        if !self.multiplier.is_finite() {
            return Err("multiplier must be finite".to_owned());
        }
        if !self.stop_on_end && (self.threshold.is_nan() || self.threshold <= 0.0) {
            return Err(format!(
                "threshold must be greater than zero unless stop_on_end is set, got {}",
                self.threshold
            ));
        }
        Ok(())
    }

    fn tween(&self) -> TweenSpec {
        TweenSpec {
            duration: self.speed,
            ease: self.ease,
            overwrite: self.overwrite,
        }
    }
}

/// Velocity → time scale controller.
///
/// Kept separate from the frame callback so it can be driven directly.
#[derive(Debug, Clone)]
pub struct ScrollSpeed {
    options: ScrollerOptions,
    last_pos: f64,
    last_direction: f64,
    moving: bool,
    tween: Option<TweenId>,
}

impl ScrollSpeed {
    /// Controller starting from scroll position `position`, direction
    /// forward.
    #[must_use]
    pub fn new(options: ScrollerOptions, position: f64) -> Self {
        Self {
            options,
            last_pos: position,
            last_direction: 1.0,
            moving: false,
            tween: None,
        }
    }

    /// Process one frame with the scroll position sampled for it.
    ///
    /// A frame without scrolling keeps the previous direction instead of
    /// taking the sign of a zero velocity, so a paused track with a still
    /// page creeps on at `±threshold` rather than dropping to speed zero.
    /// While paused, any speed tween still in flight (including a settle
    /// tween) is killed before the speed is set directly.
    pub fn tick(&mut self, position: f64, paused: bool, timeline: &mut dyn Timeline) {
        let mut velocity = position - self.last_pos;
        if !self.options.both_direction {
            velocity = velocity.abs();
        }
        if self.options.reversed {
            velocity = -velocity;
        }
        // A zero velocity keeps the previous direction.
        let direction = if velocity > 0.0 {
            1.0
        } else if velocity < 0.0 {
            -1.0
        } else {
            self.last_direction
        };

        if paused {
            self.last_direction = direction;
            self.last_pos = position;
            if self.moving || self.tween.is_some() {
                timeline.kill_tweens();
                self.tween = None;
                self.moving = false;
            }
            timeline.set_time_scale(self.last_direction * self.options.threshold);
            return;
        }

        let threshold = self.options.threshold;
        if velocity != 0.0 {
            let delta = velocity * self.options.multiplier;
            let target = if delta > 0.0 {
                threshold.max(delta)
            } else {
                (-threshold).min(delta)
            };
            self.tween = Some(timeline.tween_time_scale(target, self.options.tween()));
            self.moving = true;
        } else if self.moving {
            let target = if self.options.stop_on_end {
                0.0
            } else {
                self.last_direction * threshold
            };
            timeline.kill_tweens();
            self.tween = Some(timeline.tween_time_scale(target, self.options.tween()));
            self.moving = false;
        }

        self.last_direction = direction;
        self.last_pos = position;
    }

    /// Kill the speed tween this controller started last, if any.
    pub fn release(&mut self, timeline: &mut dyn Timeline) {
        if let Some(id) = self.tween.take() {
            timeline.kill_tween(id);
        }
        self.moving = false;
    }

    /// Whether the last frame saw scrolling.
    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.moving
    }

    /// `1.0` or `-1.0`.
    #[must_use]
    pub fn last_direction(&self) -> f64 {
        self.last_direction
    }

    /// Options in use.
    #[must_use]
    pub fn options(&self) -> &ScrollerOptions {
        &self.options
    }
}

/// Custom scroll position source, replacing the host's page offset.
pub type ScrollProxy = Rc<dyn Fn() -> f64>;

/// Factory of the `scroller` plugin.
#[derive(Default)]
pub struct ScrollerPlugin {
    proxy: Option<ScrollProxy>,
}

impl ScrollerPlugin {
    /// Plugin reading the host's page scroll position.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Plugin reading the scroll position from `proxy` instead.
    #[must_use]
    pub fn with_scroll_proxy(proxy: impl Fn() -> f64 + 'static) -> Self {
        Self {
            proxy: Some(Rc::new(proxy)),
        }
    }

    fn parse(options: &serde_json::Value) -> Result<ScrollerOptions, ReelError> {
        let invalid = |reason: String| ReelError::InvalidPluginOptions {
            plugin: NAME.to_owned(),
            reason,
        };
        let parsed = match options {
            serde_json::Value::Null => ScrollerOptions::default(),
            value => ScrollerOptions::deserialize(value).map_err(|e| invalid(e.to_string()))?,
        };
        parsed.validate().map_err(invalid)?;
        Ok(parsed)
    }
}

impl std::fmt::Debug for ScrollerPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollerPlugin")
            .field("proxy", &self.proxy.is_some())
            .finish()
    }
}

impl Plugin for ScrollerPlugin {
    fn name(&self) -> &str {
        NAME
    }

    fn instantiate(
        &self,
        host: &mut PluginHost<'_>,
        options: &serde_json::Value,
    ) -> Result<PluginInstance, ReelError> {
        let options = Self::parse(options)?;
        let initial = self
            .proxy
            .as_ref()
            .map_or(host.scroll_position, |proxy| proxy());
        let state = Rc::new(RefCell::new(ScrollSpeed::new(options, initial)));

        let frame_state = Rc::clone(&state);
        let proxy = self.proxy.clone();
        let id = host.ticker.add(Box::new(move |frame: &mut FrameContext<'_>| {
            let position = proxy.as_ref().map_or(frame.scroll_position, |proxy| proxy());
            frame_state
                .borrow_mut()
                .tick(position, frame.paused, &mut *frame.timeline);
        }));
        log::debug!("scroller attached at scroll position {initial}");

        Ok(PluginInstance::with_teardown(move |host| {
            let _ = host.ticker.remove(id);
            state.borrow_mut().release(&mut *host.timeline);
        }))
    }
}
