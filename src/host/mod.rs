//! The environment a reel runs in.
//!
//! [`TrackHost`] is everything the clone filler needs from the document:
//! resolving the container, listing and measuring items, cloning and removing
//! nodes, and a resize observer. [`Stage`] adds what the controller needs on
//! top: visual properties on the wrapper, a visibility observer and the page
//! scroll position.
//!
//! Observers are modelled as connect/disconnect pairs. The host only has to
//! start or stop delivering signals; the driver feeds them back through
//! [`crate::Reeller::on_resize`] and [`crate::Reeller::on_visibility`].

pub mod memory;

pub use memory::{MemoryHost, MemoryNode};

use crate::error::ReelError;

/// Box size of a single item as laid out by the host.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ItemBox {
    /// Rendered width.
    pub width: f64,
    /// Left margin.
    pub margin_left: f64,
    /// Right margin.
    pub margin_right: f64,
}

impl ItemBox {
    /// Width the item occupies on the track, margins included.
    #[must_use]
    pub fn outer_width(&self) -> f64 {
        self.width + self.margin_left + self.margin_right
    }
}

/// Document access needed by [`crate::fill::CloneFiller`].
pub trait TrackHost {
    /// Handle to one node of the track.
    type Node: Clone;

    /// Resolve the container and the wrapper (the container itself when
    /// `wrapper` is `None`). Called once, at construction.
    ///
    /// # Errors
    ///
    /// [`ReelError::MissingContainer`] or [`ReelError::MissingWrapper`] when
    /// a selector does not resolve.
    fn bind(&mut self, container: &str, wrapper: Option<&str>) -> Result<(), ReelError>;

    /// Current container width.
    fn container_width(&self) -> f64;

    /// Items inside the container in document order. `None` selects the
    /// wrapper's direct children.
    fn query_items(&self, selector: Option<&str>) -> Vec<Self::Node>;

    /// Layout box of one item.
    fn measure(&self, node: &Self::Node) -> ItemBox;

    /// Deep-copy `item`, tagging the copy with `class_name`. The copy is not
    /// attached yet.
    ///
    /// # Errors
    ///
    /// [`ReelError::Host`] when the document refuses the copy.
    fn clone_item(&mut self, item: &Self::Node, class_name: &str)
        -> Result<Self::Node, ReelError>;

    /// Append nodes at the end of the wrapper, in order.
    fn append(&mut self, nodes: &[Self::Node]);

    /// Detach a node from the wrapper.
    fn remove(&mut self, node: &Self::Node);

    /// Start delivering container resize signals.
    fn connect_resize(&mut self);

    /// Stop delivering container resize signals.
    fn disconnect_resize(&mut self);
}

/// Visual and viewport access needed by [`crate::Reeller`].
pub trait Stage: TrackHost {
    /// Clip (or stop clipping) the container's overflow.
    fn set_overflow_clip(&mut self, clip: bool);

    /// Toggle the compositor hints used while the track moves. `idle = true`
    /// releases them.
    fn set_idle_hints(&mut self, idle: bool);

    /// Translate the wrapper horizontally.
    fn set_offset(&mut self, x: f64);

    /// Drop the translation and the compositor hints from the wrapper.
    fn clear_motion(&mut self);

    /// Start delivering container visibility signals.
    fn connect_visibility(&mut self);

    /// Stop delivering container visibility signals.
    fn disconnect_visibility(&mut self);

    /// Vertical page scroll offset.
    fn scroll_position(&self) -> f64;
}

/// Connection state of one host observer.
///
/// Guarantees a single disconnect no matter how many teardown paths run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ObserverSlot {
    /// Never connected.
    #[default]
    Idle,
    /// Delivering signals.
    Connected,
    /// Disconnected; stays so.
    Released,
}

impl ObserverSlot {
    /// Whether signals should currently be honoured.
    #[must_use]
    pub fn is_connected(self) -> bool {
        self == Self::Connected
    }

    /// Mark released; returns `true` only for the transition that actually
    /// needs a host disconnect.
    pub fn release(&mut self) -> bool {
        let was_connected = self.is_connected();
        if *self != Self::Idle {
            *self = Self::Released;
        }
        was_connected
    }
}
