//! Plugin registry and lifecycle.
//!
//! Plugins are looked up by name in an explicit [`PluginRegistry`] value that
//! is filled before any reel is built. A reel instantiates the plugins named
//! in its options, in configuration order, and tears them down when it is
//! destroyed. Teardown is an explicit capability ([`Teardown`]) rather than
//! an optional method.

pub mod scroller;

pub use scroller::{ScrollSpeed, ScrollerOptions, ScrollerPlugin};

use crate::animation::{Ticker, Timeline};
use crate::error::ReelError;

/// What a plugin can reach while it is created or torn down.
pub struct PluginHost<'a> {
    /// Per-frame callback registry of the reel.
    pub ticker: &'a mut Ticker,
    /// The reel's timeline.
    pub timeline: &'a mut dyn Timeline,
    /// Vertical page scroll offset at this moment.
    pub scroll_position: f64,
}

/// Teardown closure of a plugin instance.
pub type TeardownFn = Box<dyn FnOnce(&mut PluginHost<'_>)>;

/// Whether a plugin instance needs cleanup.
pub enum Teardown {
    /// Nothing to release.
    None,
    /// Run this once when the reel is destroyed.
    With(TeardownFn),
}

impl std::fmt::Debug for Teardown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => f.write_str("Teardown::None"),
            Self::With(_) => f.write_str("Teardown::With(..)"),
        }
    }
}

/// A live plugin attached to one reel.
#[derive(Debug)]
pub struct PluginInstance {
    teardown: Teardown,
}

impl PluginInstance {
    /// Instance with nothing to release.
    #[must_use]
    pub fn without_teardown() -> Self {
        Self {
            teardown: Teardown::None,
        }
    }

    /// Instance that runs `teardown` when the reel is destroyed.
    #[must_use]
    pub fn with_teardown(teardown: impl FnOnce(&mut PluginHost<'_>) + 'static) -> Self {
        Self {
            teardown: Teardown::With(Box::new(teardown)),
        }
    }

    /// Whether destroying this instance runs anything.
    #[must_use]
    pub fn has_teardown(&self) -> bool {
        matches!(self.teardown, Teardown::With(_))
    }

    /// Consume the instance, running its teardown if it has one.
    pub fn destroy(self, host: &mut PluginHost<'_>) {
        if let Teardown::With(teardown) = self.teardown {
            teardown(host);
        }
    }
}

/// A named plugin factory.
pub trait Plugin {
    /// Name used in the reel options' `plugins` map.
    fn name(&self) -> &str;

    /// Attach to a reel. `options` is this plugin's entry of the `plugins`
    /// map (`Null` when the entry carries no value).
    ///
    /// # Errors
    ///
    /// [`ReelError::InvalidPluginOptions`] when `options` are unusable.
    fn instantiate(
        &self,
        host: &mut PluginHost<'_>,
        options: &serde_json::Value,
    ) -> Result<PluginInstance, ReelError>;
}

/// Name → plugin table, in registration order.
#[derive(Default)]
pub struct PluginRegistry {
    plugins: Vec<Box<dyn Plugin>>,
}

impl PluginRegistry {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in plugins.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.plugins.push(Box::new(ScrollerPlugin::new()));
        registry
    }

    /// Add a plugin. A plugin with the same name is replaced in place.
    ///
    /// # Errors
    ///
    /// [`ReelError::InvalidPlugin`] for a blank name. That is a programming
    /// error, not a configuration problem.
    pub fn register(&mut self, plugin: impl Plugin + 'static) -> Result<(), ReelError> {
        let name = plugin.name();
        if name.trim().is_empty() {
            return Err(ReelError::InvalidPlugin(
                "plugin name is required".to_owned(),
            ));
        }
        match self.plugins.iter().position(|p| p.name() == name) {
            Some(index) => self.plugins[index] = Box::new(plugin),
            None => self.plugins.push(Box::new(plugin)),
        }
        Ok(())
    }

    /// Plugin registered under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn Plugin> {
        self.plugins
            .iter()
            .find(|p| p.name() == name)
            .map(|p| &**p)
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.plugins.iter().map(|p| p.name())
    }
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
