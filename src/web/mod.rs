//! Browser backend (feature `web`).
//!
//! [`DomHost`] implements the host traits on real elements, [`RafLoop`]
//! supplies frames and [`WebReel`] wires them to a [`Reeller`]. Observer
//! callbacks only raise flags in [`Signals`]; the flags are drained at the
//! start of the next frame so the reel is never re-entered from a callback.
//!
//! [`JsReel`] exposes the whole thing to JavaScript.

mod dom;
mod raf;

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;

pub use dom::{DomHost, Signals};
pub use raf::RafLoop;

use crate::error::ReelError;
use crate::options::ReelOptions;
use crate::plugin::PluginRegistry;
use crate::reel::Reeller;
use crate::util::FrameClock;

/// Send `log` output to the browser console and panics to `console.error`.
pub fn init_logging(level: log::Level) {
    console_error_panic_hook::set_once();
    if let Err(err) = console_log::init_with_level(level) {
        log::warn!("logger already set: {err}");
    }
}

/// A reel on the page, driven by `requestAnimationFrame`.
pub struct WebReel {
    reel: Rc<RefCell<Reeller<DomHost>>>,
    raf: RafLoop,
}

impl WebReel {
    /// Build the reel and start the frame loop.
    ///
    /// # Errors
    ///
    /// Anything [`Reeller::new`] or [`DomHost::new`] reports.
    pub fn new(options: ReelOptions, registry: &PluginRegistry) -> Result<Self, ReelError> {
        let host = DomHost::new()?;
        let signals = host.signals();
        let reel = Rc::new(RefCell::new(Reeller::new(host, options, registry)?));

        let frame_reel = Rc::clone(&reel);
        let mut clock = FrameClock::default();
        let raf = RafLoop::new(move |_timestamp_ms| {
            let mut reel = frame_reel.borrow_mut();
            if signals.take_resize() {
                let _ = reel.on_resize();
            }
            if let Some(visible) = signals.take_visibility() {
                let _ = reel.on_visibility(visible);
            }
            let _ = reel.tick(clock.delta());
        });
        raf.start();
        Ok(Self { reel, raf })
    }

    /// Run `f` on the reel. Must not be called from a reel event handler.
    pub fn with<R>(&self, f: impl FnOnce(&mut Reeller<DomHost>) -> R) -> R {
        f(&mut self.reel.borrow_mut())
    }

    /// Stop the frame loop and destroy the reel.
    pub fn destroy(&self, remove_clones: bool, clear_props: bool) {
        self.raf.stop();
        self.reel.borrow_mut().destroy(remove_clones, clear_props);
    }
}

impl std::fmt::Debug for WebReel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebReel")
            .field("raf", &self.raf)
            .finish_non_exhaustive()
    }
}

fn js_error(err: &ReelError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// JavaScript handle of a [`WebReel`] with the built-in plugins.
#[wasm_bindgen(js_name = "Reeller")]
#[derive(Debug)]
pub struct JsReel {
    inner: WebReel,
}

#[wasm_bindgen(js_class = "Reeller")]
impl JsReel {
    /// Build from a JSON object of [`ReelOptions`].
    ///
    /// # Errors
    ///
    /// A string describing bad options or a missing container.
    #[wasm_bindgen(constructor)]
    pub fn new(options_json: &str) -> Result<JsReel, JsValue> {
        let options: ReelOptions = serde_json::from_str(options_json)
            .map_err(|e| js_error(&ReelError::OptionsParse(e.to_string())))?;
        let inner =
            WebReel::new(options, &PluginRegistry::with_builtins()).map_err(|e| js_error(&e))?;
        Ok(Self { inner })
    }

    /// Start moving.
    pub fn resume(&self) {
        self.inner.with(Reeller::resume);
    }

    /// Stop moving.
    pub fn pause(&self) {
        self.inner.with(Reeller::pause);
    }

    /// Set the direction and start moving.
    pub fn reverse(&self, reversed: bool) {
        self.inner.with(|reel| reel.reverse(reversed));
    }

    /// Re-plan the clones.
    pub fn update(&self) {
        self.inner.with(|reel| {
            let _ = reel.update();
        });
    }

    /// Re-resolve the items, then re-plan when `update` is set.
    pub fn refresh(&self, update: bool) {
        self.inner.with(|reel| reel.refresh(update));
    }

    /// Whether the track is standing still.
    #[wasm_bindgen(js_name = "isPaused")]
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.inner.with(|reel| reel.is_paused())
    }

    /// Tear down.
    pub fn destroy(&self, remove_clones: bool, clear_props: bool) {
        self.inner.destroy(remove_clones, clear_props);
    }
}
