//! Per-frame callback registry.

use super::Timeline;

/// What a frame callback may look at and touch.
pub struct FrameContext<'a> {
    /// Vertical page scroll offset sampled for this frame.
    pub scroll_position: f64,
    /// Whether the reel is paused (by the user or by visibility).
    pub paused: bool,
    /// The reel's timeline. Callbacks only adjust its speed.
    pub timeline: &'a mut dyn Timeline,
}

/// Callback run once per frame.
pub type TickCallback = Box<dyn FnMut(&mut FrameContext<'_>)>;

/// Handle of a registered callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickerId(u64);

/// Ordered list of frame callbacks.
#[derive(Default)]
pub struct Ticker {
    callbacks: Vec<(TickerId, TickCallback)>,
    next_id: u64,
}

impl Ticker {
    /// Empty ticker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback; it runs after the ones already registered.
    pub fn add(&mut self, callback: TickCallback) -> TickerId {
        let id = TickerId(self.next_id);
        self.next_id += 1;
        self.callbacks.push((id, callback));
        id
    }

    /// Unregister a callback. Returns whether it was registered.
    pub fn remove(&mut self, id: TickerId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(existing, _)| *existing != id);
        self.callbacks.len() != before
    }

    /// Run every callback once, in registration order.
    pub fn run(&mut self, frame: &mut FrameContext<'_>) {
        for (_, callback) in &mut self.callbacks {
            callback(frame);
        }
    }

    /// Number of registered callbacks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    /// Whether no callback is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

impl std::fmt::Debug for Ticker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ticker")
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}
