//! Clone filling.
//!
//! [`CloneFiller`] keeps exactly enough clones after the base items so that
//! the track tiles without a visible gap when shifted by its loop distance.
//! The plan itself ([`compute_fill_plan`]) is recomputed from scratch on every
//! update; only the clone list is adjusted incrementally.

mod plan;

pub use plan::{compute_fill_plan, FillPolicy, FillResult};

use crate::error::ReelError;
use crate::events::{Emitter, Event, HandlerId, HandlerResult};
use crate::host::{ObserverSlot, TrackHost};
use crate::options::FillerOptions;

/// Channels of [`FillerEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FillerEventKind {
    /// A new plan was computed and applied.
    Update,
    /// Items were re-resolved and clones dropped.
    Refresh,
    /// The filler was destroyed.
    Destroy,
}

/// Events emitted by [`CloneFiller`].
#[derive(Debug, Clone, PartialEq)]
pub enum FillerEvent {
    /// A new plan was computed and applied.
    Update(FillResult),
    /// Items were re-resolved and clones dropped.
    Refresh,
    /// The filler was destroyed.
    Destroy,
}

impl Event for FillerEvent {
    type Kind = FillerEventKind;

    fn kind(&self) -> FillerEventKind {
        match self {
            Self::Update(_) => FillerEventKind::Update,
            Self::Refresh => FillerEventKind::Refresh,
            Self::Destroy => FillerEventKind::Destroy,
        }
    }
}

/// Pads a track with clones of its items.
pub struct CloneFiller<H: TrackHost> {
    host: H,
    options: FillerOptions,
    items: Vec<H::Node>,
    clones: Vec<H::Node>,
    result: FillResult,
    resize_observer: ObserverSlot,
    destroyed: bool,
    events: Emitter<FillerEvent>,
}

impl<H: TrackHost> CloneFiller<H> {
    /// Bind to the configured container, resolve the items and apply the
    /// first plan.
    ///
    /// # Errors
    ///
    /// Returns [`ReelError::MissingContainer`] when the container is unset
    /// or the host cannot resolve it, and [`ReelError::MissingWrapper`] when
    /// the wrapper does not resolve.
    pub fn new(mut host: H, options: FillerOptions) -> Result<Self, ReelError> {
        let container = options
            .container
            .as_deref()
            .ok_or_else(|| ReelError::MissingContainer("<unset>".to_owned()))?;
        host.bind(container, options.wrapper.as_deref())?;

        let mut filler = Self {
            host,
            options,
            items: Vec::new(),
            clones: Vec::new(),
            result: FillResult::default(),
            resize_observer: ObserverSlot::Idle,
            destroyed: false,
            events: Emitter::new(),
        };
        filler.refresh(false);
        if filler.options.auto_update {
            filler.host.connect_resize();
            filler.resize_observer = ObserverSlot::Connected;
        }
        let _ = filler.update();
        Ok(filler)
    }

    /// Width of every tracked item, margins included, in track order.
    #[must_use]
    pub fn measure(&self) -> Vec<f64> {
        self.items
            .iter()
            .map(|item| self.host.measure(item).outer_width())
            .collect()
    }

    /// Grow or shrink the clone list to `target` clones.
    ///
    /// New clones continue the item cycle where the existing clones stopped;
    /// surplus clones are removed from the tail.
    pub fn reconcile(&mut self, target: usize) {
        let current = self.clones.len();
        if target == current {
            return;
        }

        if target < current {
            for clone in self.clones.drain(target..).rev() {
                self.host.remove(&clone);
            }
            log::debug!("removed {} clones", current - target);
            return;
        }

        let item_count = self.items.len();
        if item_count == 0 {
            log::warn!("cannot add clones to a track without items");
            return;
        }
        let mut added = Vec::with_capacity(target - current);
        for i in current..target {
            let template = &self.items[i % item_count];
            match self.host.clone_item(template, &self.options.clone_class_name) {
                Ok(node) => added.push(node),
                Err(err) => {
                    log::error!("stopped adding clones: {err}");
                    break;
                }
            }
        }
        self.host.append(&added);
        log::debug!("added {} clones", added.len());
        self.clones.extend(added);
    }

    /// Drop every clone, re-resolve the items and reset the plan, then emit
    /// [`FillerEvent::Refresh`]. Runs [`update`](Self::update) afterwards when
    /// `run_update` is set. Does nothing once destroyed.
    pub fn refresh(&mut self, run_update: bool) {
        if self.destroyed {
            return;
        }
        for clone in self.clones.drain(..).rev() {
            self.host.remove(&clone);
        }
        self.items = self
            .host
            .query_items(self.options.item_selector.as_deref());
        self.result = FillResult::default();
        log::debug!("refreshed track with {} items", self.items.len());

        let _ = self.events.trigger(&FillerEvent::Refresh);
        if run_update {
            let _ = self.update();
        }
    }

    /// Measure, recompute the plan, reconcile the clones and emit
    /// [`FillerEvent::Update`]. Once destroyed, returns the last result
    /// untouched.
    ///
    /// The emitted result always describes the clones actually attached.
    pub fn update(&mut self) -> &FillResult {
        if self.destroyed {
            return &self.result;
        }
        let item_widths = self.measure();
        self.result = compute_fill_plan(
            self.host.container_width(),
            &item_widths,
            self.options.policy(),
        );
        self.reconcile(self.result.clones_count);
        if self.clones.len() < self.result.clones_count {
            log::warn!(
                "planned {} clones, only {} attached",
                self.result.clones_count,
                self.clones.len()
            );
            self.result.truncate_clones(self.clones.len());
        }

        let _ = self
            .events
            .trigger(&FillerEvent::Update(self.result.clone()));
        &self.result
    }

    /// Resize signal from the host. Updates when auto-update is connected;
    /// returns whether it did.
    pub fn on_resize(&mut self) -> bool {
        if !self.resize_observer.is_connected() {
            return false;
        }
        let _ = self.update();
        true
    }

    /// Disconnect the resize observer, optionally remove every clone, emit
    /// [`FillerEvent::Destroy`]. Later calls do nothing.
    pub fn destroy(&mut self, remove_clones: bool) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;

        if remove_clones {
            self.reconcile(0);
        }
        if self.resize_observer.release() {
            self.host.disconnect_resize();
        }
        let _ = self.events.trigger(&FillerEvent::Destroy);
    }

    /// Subscribe to filler events.
    pub fn on(
        &mut self,
        kind: FillerEventKind,
        handler: impl FnMut(&FillerEvent) -> HandlerResult + 'static,
    ) -> HandlerId {
        self.events.on(kind, handler)
    }

    /// Unsubscribe one handler, or all handlers of `kind`.
    pub fn off(&mut self, kind: FillerEventKind, id: Option<HandlerId>) {
        self.events.off(kind, id);
    }

    /// Latest plan (empty right after a refresh).
    #[must_use]
    pub fn result(&self) -> &FillResult {
        &self.result
    }

    /// Number of clones currently attached.
    #[must_use]
    pub fn clones_count(&self) -> usize {
        self.clones.len()
    }

    /// Number of base items.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Options this filler was built with.
    #[must_use]
    pub fn options(&self) -> &FillerOptions {
        &self.options
    }

    /// Whether [`destroy`](Self::destroy) ran.
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// The host environment.
    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable host access, for drivers that change the environment (resize
    /// the container, move the scroll position).
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}

impl<H: TrackHost> Drop for CloneFiller<H> {
    fn drop(&mut self) {
        if self.resize_observer.release() {
            self.host.disconnect_resize();
        }
    }
}

impl<H: TrackHost> std::fmt::Debug for CloneFiller<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloneFiller")
            .field("items", &self.items.len())
            .field("clones", &self.clones.len())
            .field("result", &self.result)
            .field("resize_observer", &self.resize_observer)
            .field("destroyed", &self.destroyed)
            .finish()
    }
}
