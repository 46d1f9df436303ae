use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::fill::FillPolicy;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Filler")]
#[serde(default)]
/// Options of a standalone [`crate::fill::CloneFiller`].
pub struct FillerOptions {
    /// Container selector.
    pub container: Option<String>,
    /// Inner element selector; the container itself when unset.
    pub wrapper: Option<String>,
    /// Items selector; the wrapper's direct children when unset.
    pub item_selector: Option<String>,
    /// Class name added to every clone.
    pub clone_class_name: String,
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
}

impl FillerOptions {
    /// Coverage policy described by these options.
    #[must_use]
    pub fn policy(&self) -> FillPolicy {
        FillPolicy {
            overflow: self.clones_overflow,
            finish_cycle: self.clones_finish,
            minimum_clones: self.clones_min,
        }
    }
}

impl Default for FillerOptions {
    fn default() -> Self {
        Self {
            container: None,
            wrapper: None,
            item_selector: None,
            clone_class_name: "-clone".to_owned(),
            auto_update: true,
            clones_overflow: false,
            clones_finish: false,
            clones_min: 0,
        }
    }
}
