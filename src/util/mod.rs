//! Shared utilities: easing curves and frame timing.

pub mod easing;
pub mod frame_clock;

pub use easing::EasingFunction;
pub use frame_clock::FrameClock;
