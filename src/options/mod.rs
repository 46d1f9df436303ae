//! Reel configuration with TOML preset support.
//!
//! Every struct uses `#[serde(default)]`, so partial files only override the
//! keys they name and unknown keys are ignored.

mod fill;
mod reel;

use std::path::Path;

pub use fill::FillerOptions;
pub use reel::{PluginOptionsMap, ReelOptions};

use crate::error::ReelError;

impl ReelOptions {
    /// Generate JSON Schema describing the options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(ReelOptions)
    }

    /// Parse options from TOML text. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ReelError::OptionsParse`] on malformed TOML or bad values.
    pub fn from_toml(content: &str) -> Result<Self, ReelError> {
        toml::from_str(content).map_err(|e| ReelError::OptionsParse(e.to_string()))
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ReelError::Io`] if the file cannot be read, or
    /// [`ReelError::OptionsParse`] if it is not valid options TOML.
    pub fn load(path: &Path) -> Result<Self, ReelError> {
        let content = std::fs::read_to_string(path).map_err(ReelError::Io)?;
        Self::from_toml(&content)
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`ReelError::OptionsParse`] if serialization fails, or
    /// [`ReelError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ReelError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ReelError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ReelError::Io)?;
        }
        std::fs::write(path, content).map_err(ReelError::Io)
    }
}
