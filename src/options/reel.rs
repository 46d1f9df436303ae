use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::FillerOptions;
use crate::util::EasingFunction;

/// Plugin name → plugin options, in configuration order.
pub type PluginOptionsMap = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Reel")]
#[serde(default)]
/// Options of a [`crate::Reeller`]: the filler options plus motion and
/// plugins.
pub struct ReelOptions {
    /// Container selector.
    pub container: Option<String>,
    /// Inner element selector; the container itself when unset.
    pub wrapper: Option<String>,
    /// Items selector; the wrapper's direct children when unset.
    pub item_selector: Option<String>,
    /// Class name added to every clone.
    pub clone_class_name: String,
    /// Seconds for one full loop distance at time scale 1.
    #[schemars(title = "Speed", range(min = 0.1, max = 120.0), extend("step" = 0.5))]
    pub speed: f64,
    /// Timing curve of the track movement.
    pub ease: EasingFunction,
    /// Timeline position (seconds) applied right after construction.
    #[schemars(range(min = 0.0))]
    pub initial_seek: f64,
    /// Loop continuously; when false the track goes back and forth.
    #[serde(rename = "loop")]
    pub looped: bool,
    /// Start paused. With `auto_stop` the track still starts once visible.
    pub paused: bool,
    /// Start moving in reverse.
    pub reversed: bool,
    /// Pause while the container is off screen.
    pub auto_stop: bool,
    /// Re-run the fill plan when the container resizes.
    pub auto_update: bool,
    /// Cover the whole container with clones instead of only the remainder
    /// beyond the items' own width.
    pub clones_overflow: bool,
    /// Bring the clone count to a whole multiple of the item count.
    pub clones_finish: bool,
    /// Minimum number of clones.
    #[schemars(range(min = 0))]
    pub clones_min: usize,
    /// Options for plugins, keyed by registered plugin name.
    pub plugins: PluginOptionsMap,
}

impl ReelOptions {
    /// Options for the filler owned by the reel.
    #[must_use]
    pub fn filler_options(&self) -> FillerOptions {
        FillerOptions {
            container: self.container.clone(),
            wrapper: self.wrapper.clone(),
            item_selector: self.item_selector.clone(),
            clone_class_name: self.clone_class_name.clone(),
            auto_update: self.auto_update,
            clones_overflow: self.clones_overflow,
            clones_finish: self.clones_finish,
            clones_min: self.clones_min,
        }
    }
}

impl Default for ReelOptions {
    fn default() -> Self {
        Self {
            container: None,
            wrapper: None,
            item_selector: None,
            clone_class_name: "-clone".to_owned(),
            speed: 10.0,
            ease: EasingFunction::Linear,
            initial_seek: 10.0,
            looped: true,
            paused: true,
            reversed: false,
            auto_stop: true,
            auto_update: true,
            clones_overflow: true,
            clones_finish: false,
            clones_min: 0,
            plugins: PluginOptionsMap::new(),
        }
    }
}
