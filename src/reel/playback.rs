//! Play/pause bookkeeping of a reel.

use serde::Serialize;

/// Externally visible playback state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PlaybackState {
    /// Whether the track is standing still.
    pub paused: bool,
    /// Whether the track moves backwards.
    pub reversed: bool,
}

/// The two reasons a track can be paused.
///
/// Visibility changes only ever touch their own bit, so hiding and showing
/// the container never undoes an explicit [`crate::Reeller::pause`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct PauseBits {
    user: bool,
    visibility: bool,
}

impl PauseBits {
    /// Initial bits. Under `auto_stop` a paused start waits for the container
    /// to become visible rather than for an explicit resume.
    pub(crate) fn initial(paused: bool, auto_stop: bool) -> Self {
        Self {
            user: paused && !auto_stop,
            visibility: paused && auto_stop,
        }
    }

    pub(crate) fn is_paused(self) -> bool {
        self.user || self.visibility
    }

    pub(crate) fn is_user_paused(self) -> bool {
        self.user
    }

    pub(crate) fn pause(&mut self) {
        self.user = true;
    }

    pub(crate) fn resume(&mut self) {
        self.user = false;
        self.visibility = false;
    }

    /// Apply a visibility change; returns `Some(paused)` when the effective
    /// state flipped.
    pub(crate) fn set_visible(&mut self, visible: bool) -> Option<bool> {
        let was = self.is_paused();
        self.visibility = !visible;
        let now = self.is_paused();
        (was != now).then_some(now)
    }
}
