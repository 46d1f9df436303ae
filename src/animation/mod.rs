//! Timeline engine driving the track offset.
//!
//! [`Timeline`] is the narrow interface the controller and plugins use;
//! [`LoopTimeline`] is the built-in engine. [`Ticker`] holds the per-frame
//! callbacks plugins register.

mod loop_timeline;
pub mod ticker;
pub mod timeline;
pub mod tween;

pub use loop_timeline::LoopTimeline;
pub use ticker::{FrameContext, TickCallback, Ticker, TickerId};
pub use timeline::{Repeat, Timeline, TimelineSpec};
pub use tween::{Overwrite, TweenId, TweenSpec};
