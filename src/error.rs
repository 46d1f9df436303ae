//! Crate-level error types.

use std::fmt;

/// Errors produced by the reel crate.
#[derive(Debug)]
pub enum ReelError {
    /// The container was not configured or could not be resolved by the host.
    MissingContainer(String),
    /// The wrapper selector did not resolve inside the container.
    MissingWrapper(String),
    /// A plugin was registered without a usable name.
    InvalidPlugin(String),
    /// Configuration names a plugin that was never registered.
    UnknownPlugin(String),
    /// A registered plugin rejected its configuration.
    InvalidPluginOptions {
        /// Plugin name as it appears in the configuration.
        plugin: String,
        /// Why the options were rejected.
        reason: String,
    },
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// The host environment failed an operation (e.g. a DOM call threw).
    Host(String),
}

impl fmt::Display for ReelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingContainer(selector) => {
                write!(f, "container not found: {selector}")
            }
            Self::MissingWrapper(selector) => {
                write!(f, "wrapper not found: {selector}")
            }
            Self::InvalidPlugin(msg) => write!(f, "invalid plugin: {msg}"),
            Self::UnknownPlugin(name) => write!(
                f,
                "plugin {name} not found, register it with PluginRegistry::register"
            ),
            Self::InvalidPluginOptions { plugin, reason } => {
                write!(f, "invalid options for plugin {plugin}: {reason}")
            }
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Host(msg) => write!(f, "host error: {msg}"),
        }
    }
}

impl std::error::Error for ReelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ReelError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
