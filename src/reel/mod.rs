//! The reel controller.
//!
//! A [`Reeller`] owns a [`CloneFiller`], a [`Timeline`] moving the wrapper
//! from a start offset to zero, the per-frame [`Ticker`] and the plugins
//! attached to it. The driver feeds it three signals: resize
//! ([`Reeller::on_resize`]), visibility ([`Reeller::on_visibility`]) and
//! frames ([`Reeller::tick`]).

mod playback;

pub use playback::PlaybackState;

use playback::PauseBits;

use crate::animation::{FrameContext, LoopTimeline, Repeat, Ticker, Timeline, TimelineSpec};
use crate::error::ReelError;
use crate::events::{Emitter, Event, HandlerId, HandlerResult};
use crate::fill::{CloneFiller, FillResult};
use crate::host::{ObserverSlot, Stage};
use crate::options::ReelOptions;
use crate::plugin::{PluginHost, PluginInstance, PluginRegistry};

/// Channels of [`ReelEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReelEventKind {
    /// Clones were re-planned.
    Update,
    /// Items were re-resolved.
    Refresh,
    /// Movement started.
    Resume,
    /// Movement stopped.
    Pause,
    /// Direction was set.
    Reverse,
    /// The timeline's start offset was dropped.
    Invalidate,
    /// The reel was destroyed.
    Destroy,
}

/// Events emitted by [`Reeller`].
#[derive(Debug, Clone, PartialEq)]
pub enum ReelEvent {
    /// Clones were re-planned.
    Update(FillResult),
    /// Items were re-resolved.
    Refresh,
    /// Movement started.
    Resume,
    /// Movement stopped.
    Pause,
    /// Direction was set; `true` means backwards.
    Reverse(bool),
    /// The timeline's start offset was dropped.
    Invalidate,
    /// The reel was destroyed.
    Destroy,
}

impl Event for ReelEvent {
    type Kind = ReelEventKind;

    fn kind(&self) -> ReelEventKind {
        match self {
            Self::Update(_) => ReelEventKind::Update,
            Self::Refresh => ReelEventKind::Refresh,
            Self::Resume => ReelEventKind::Resume,
            Self::Pause => ReelEventKind::Pause,
            Self::Reverse(_) => ReelEventKind::Reverse,
            Self::Invalidate => ReelEventKind::Invalidate,
            Self::Destroy => ReelEventKind::Destroy,
        }
    }
}

/// Offset the track starts from: minus the distance it travels per loop.
///
/// Without overflow clones only the part of the track wider than the
/// container travels; with them the items' own width does.
#[must_use]
pub fn start_offset(result: &FillResult, clones_overflow: bool) -> f64 {
    if clones_overflow {
        -result.items_width
    } else {
        -(result.full_width - result.container_width)
    }
}

/// Infinite marquee controller.
pub struct Reeller<H: Stage, T: Timeline = LoopTimeline> {
    filler: CloneFiller<H>,
    timeline: T,
    ticker: Ticker,
    options: ReelOptions,
    pause: PauseBits,
    visibility_observer: ObserverSlot,
    plugins: Vec<(String, PluginInstance)>,
    plugin_errors: Vec<ReelError>,
    destroyed: bool,
    events: Emitter<ReelEvent>,
}

impl<H: Stage> Reeller<H> {
    /// Build a reel on `host` driven by the built-in [`LoopTimeline`].
    ///
    /// Plugins named in `options.plugins` are looked up in `registry`.
    ///
    /// # Errors
    ///
    /// See [`with_timeline`](Self::with_timeline).
    pub fn new(host: H, options: ReelOptions, registry: &PluginRegistry) -> Result<Self, ReelError> {
        Self::with_timeline(host, options, registry)
    }
}

impl<H: Stage, T: Timeline> Reeller<H, T> {
    /// Build a reel driven by a timeline of type `T`.
    ///
    /// Plugin problems do not fail construction; they are logged and kept
    /// in [`plugin_errors`](Self::plugin_errors).
    ///
    /// # Errors
    ///
    /// [`ReelError::MissingContainer`] or [`ReelError::MissingWrapper`] when
    /// the track cannot be resolved.
    pub fn with_timeline(
        host: H,
        options: ReelOptions,
        registry: &PluginRegistry,
    ) -> Result<Self, ReelError> {
        let filler = CloneFiller::new(host, options.filler_options())?;
        let timeline = T::from_spec(TimelineSpec {
            duration: options.speed,
            ease: options.ease,
            repeat: if options.looped {
                Repeat::Loop
            } else {
                Repeat::Yoyo
            },
            paused: options.paused,
            reversed: options.reversed,
        });

        let mut reel = Self {
            filler,
            timeline,
            ticker: Ticker::new(),
            pause: PauseBits::initial(options.paused, options.auto_stop),
            options,
            visibility_observer: ObserverSlot::Idle,
            plugins: Vec::new(),
            plugin_errors: Vec::new(),
            destroyed: false,
            events: Emitter::new(),
        };

        reel.filler.host_mut().set_overflow_clip(true);
        reel.timeline.seek(reel.options.initial_seek);
        if reel.options.auto_stop {
            reel.filler.host_mut().connect_visibility();
            reel.visibility_observer = ObserverSlot::Connected;
        }
        reel.init_plugins(registry);
        Ok(reel)
    }

    fn init_plugins(&mut self, registry: &PluginRegistry) {
        let scroll_position = self.filler.host().scroll_position();
        for (name, options) in &self.options.plugins {
            let Some(plugin) = registry.get(name) else {
                let err = ReelError::UnknownPlugin(name.clone());
                log::error!("{err}");
                self.plugin_errors.push(err);
                continue;
            };
            let mut host = PluginHost {
                ticker: &mut self.ticker,
                timeline: &mut self.timeline,
                scroll_position,
            };
            match plugin.instantiate(&mut host, options) {
                Ok(instance) => {
                    log::debug!("plugin {name} attached");
                    self.plugins.push((name.clone(), instance));
                }
                Err(err) => {
                    log::error!("{err}");
                    self.plugin_errors.push(err);
                }
            }
        }
    }

    fn start_motion(&mut self) {
        self.filler.host_mut().set_idle_hints(false);
        self.timeline.resume();
        let _ = self.events.trigger(&ReelEvent::Resume);
    }

    fn stop_motion(&mut self) {
        self.filler.host_mut().set_idle_hints(true);
        self.timeline.pause();
        let _ = self.events.trigger(&ReelEvent::Pause);
    }

    /// Start moving. Clears an explicit pause as well as a visibility pause.
    pub fn resume(&mut self) {
        self.pause.resume();
        self.start_motion();
    }

    /// Stop moving until [`resume`](Self::resume) is called. Visibility
    /// changes do not restart the track.
    pub fn pause(&mut self) {
        self.pause.pause();
        self.stop_motion();
    }

    /// Set the direction and start moving.
    pub fn reverse(&mut self, reversed: bool) {
        self.timeline.set_reversed(reversed);
        self.resume();
        let _ = self.events.trigger(&ReelEvent::Reverse(reversed));
    }

    /// Drop the timeline's cached start offset; the next frame re-reads it
    /// from the current fill result.
    pub fn invalidate(&mut self) {
        self.timeline.invalidate();
        let _ = self.events.trigger(&ReelEvent::Invalidate);
    }

    fn after_update(&mut self) {
        self.invalidate();
        let result = self.filler.result().clone();
        let _ = self.events.trigger(&ReelEvent::Update(result));
    }

    /// Re-plan the clones. Does nothing once destroyed.
    pub fn update(&mut self) -> &FillResult {
        if self.destroyed {
            return self.filler.result();
        }
        let _ = self.filler.update();
        self.after_update();
        self.filler.result()
    }

    /// Drop every clone and re-resolve the items, then re-plan when
    /// `run_update` is set. Does nothing once destroyed.
    pub fn refresh(&mut self, run_update: bool) {
        if self.destroyed {
            return;
        }
        self.filler.refresh(false);
        let _ = self.events.trigger(&ReelEvent::Refresh);
        if run_update {
            let _ = self.update();
        }
    }

    /// Container resize signal. Returns whether the clones were re-planned.
    pub fn on_resize(&mut self) -> bool {
        if self.destroyed || !self.filler.on_resize() {
            return false;
        }
        self.after_update();
        true
    }

    /// Container visibility signal. Returns whether the track started or
    /// stopped because of it.
    pub fn on_visibility(&mut self, visible: bool) -> bool {
        if !self.visibility_observer.is_connected() {
            return false;
        }
        match self.pause.set_visible(visible) {
            Some(true) => {
                log::debug!("container hidden, pausing");
                self.stop_motion();
                true
            }
            Some(false) => {
                log::debug!("container visible, resuming");
                self.start_motion();
                true
            }
            None => false,
        }
    }

    /// Advance one frame of `dt` seconds: run the frame callbacks, move the
    /// timeline and apply the offset. Returns the applied offset.
    pub fn tick(&mut self, dt: f64) -> Option<f64> {
        if self.destroyed {
            return None;
        }
        let mut frame = FrameContext {
            scroll_position: self.filler.host().scroll_position(),
            paused: self.pause.is_paused(),
            timeline: &mut self.timeline,
        };
        self.ticker.run(&mut frame);

        let result = self.filler.result();
        let overflow = self.options.clones_overflow;
        let offset = self
            .timeline
            .advance(dt, &|| start_offset(result, overflow))?;
        self.filler.host_mut().set_offset(offset);
        Some(offset)
    }

    /// Tear everything down: visibility observer, plugins, timeline and
    /// filler. `remove_clones` removes the clones from the track,
    /// `clear_props` drops the clip and the translation. Later calls do
    /// nothing.
    pub fn destroy(&mut self, remove_clones: bool, clear_props: bool) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;

        if self.visibility_observer.release() {
            self.filler.host_mut().disconnect_visibility();
        }
        let scroll_position = self.filler.host().scroll_position();
        for (name, instance) in self.plugins.drain(..) {
            let mut host = PluginHost {
                ticker: &mut self.ticker,
                timeline: &mut self.timeline,
                scroll_position,
            };
            instance.destroy(&mut host);
            log::debug!("plugin {name} detached");
        }
        self.timeline.kill();
        self.filler.destroy(remove_clones);
        if clear_props {
            let host = self.filler.host_mut();
            host.set_overflow_clip(false);
            host.clear_motion();
        }
        let _ = self.events.trigger(&ReelEvent::Destroy);
    }

    /// Subscribe to `kind`.
    pub fn on(
        &mut self,
        kind: ReelEventKind,
        handler: impl FnMut(&ReelEvent) -> HandlerResult + 'static,
    ) -> HandlerId {
        self.events.on(kind, handler)
    }

    /// Unsubscribe one handler, or every handler of `kind` when `id` is
    /// `None`.
    pub fn off(&mut self, kind: ReelEventKind, id: Option<HandlerId>) {
        self.events.off(kind, id);
    }

    /// Whether the track is standing still, for any reason.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.pause.is_paused()
    }

    /// Whether [`pause`](Self::pause) holds the track.
    #[must_use]
    pub fn is_user_paused(&self) -> bool {
        self.pause.is_user_paused()
    }

    /// Current playback state.
    #[must_use]
    pub fn playback(&self) -> PlaybackState {
        PlaybackState {
            paused: self.pause.is_paused(),
            reversed: self.timeline.is_reversed(),
        }
    }

    /// Whether [`destroy`](Self::destroy) ran.
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Names of the attached plugins, in configuration order.
    pub fn plugin_names(&self) -> impl Iterator<Item = &str> {
        self.plugins.iter().map(|(name, _)| name.as_str())
    }

    /// Problems met while attaching plugins.
    #[must_use]
    pub fn plugin_errors(&self) -> &[ReelError] {
        &self.plugin_errors
    }

    /// The clone filler.
    #[must_use]
    pub fn filler(&self) -> &CloneFiller<H> {
        &self.filler
    }

    /// The host.
    #[must_use]
    pub fn host(&self) -> &H {
        self.filler.host()
    }

    /// The host, mutably (used by drivers to update host-side state).
    pub fn host_mut(&mut self) -> &mut H {
        self.filler.host_mut()
    }

    /// The timeline.
    #[must_use]
    pub fn timeline(&self) -> &T {
        &self.timeline
    }

    /// Options in use.
    #[must_use]
    pub fn options(&self) -> &ReelOptions {
        &self.options
    }
}

impl<H: Stage, T: Timeline> Drop for Reeller<H, T> {
    fn drop(&mut self) {
        if self.visibility_observer.release() {
            self.filler.host_mut().disconnect_visibility();
        }
    }
}

impl<H: Stage, T: Timeline> std::fmt::Debug for Reeller<H, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reeller")
            .field("filler", &self.filler)
            .field("playback", &self.playback())
            .field("plugins", &self.plugin_names().collect::<Vec<_>>())
            .field("destroyed", &self.destroyed)
            .finish_non_exhaustive()
    }
}
