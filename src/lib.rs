// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]
// Tests may unwrap.
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

//! Seamless infinite marquee.
//!
//! A reel is a horizontal track of items that scrolls forever. To make the
//! loop seamless the track is padded with clones of its items until it
//! covers the container, then a timeline moves it by exactly one loop
//! distance and starts over.
//!
//! # Key entry points
//!
//! - [`fill::CloneFiller`] - computes and maintains the clones
//! - [`Reeller`] - the controller: play, pause, reverse, auto-pause on
//!   visibility, plugins
//! - [`plugin::ScrollerPlugin`] - couples the speed to page scroll velocity
//! - [`options::ReelOptions`] - serde/TOML configuration with a JSON Schema
//!
//! # Architecture
//!
//! The document is reached only through the [`host::TrackHost`] and
//! [`host::Stage`] traits. [`host::MemoryHost`] runs everything headless;
//! the `web` feature adds a DOM implementation and a `requestAnimationFrame`
//! driver. The animation engine sits behind [`animation::Timeline`], with
//! [`animation::LoopTimeline`] as the built-in implementation.
//!
//! Everything is single-threaded. Resize, visibility and frame signals are
//! delivered by the driver through [`Reeller::on_resize`],
//! [`Reeller::on_visibility`] and [`Reeller::tick`].

pub mod animation;
pub mod error;
pub mod events;
pub mod fill;
pub mod host;
pub mod options;
pub mod plugin;
pub mod reel;
pub mod util;
#[cfg(feature = "web")]
pub mod web;

#[cfg(test)]
mod scenarios;
#[cfg(test)]
mod testing;

pub use error::ReelError;
pub use fill::{CloneFiller, FillResult};
pub use options::{FillerOptions, ReelOptions};
pub use plugin::{PluginRegistry, ScrollerPlugin};
pub use reel::{PlaybackState, ReelEvent, ReelEventKind, Reeller};
