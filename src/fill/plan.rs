//! Clone count computation.

use serde::{Deserialize, Serialize};

/// Coverage policy for the clone plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FillPolicy {
    /// Clones alone must cover the container (instead of only the part the
    /// items leave uncovered).
    pub overflow: bool,
    /// Clone count must be a whole multiple of the item count.
    pub finish_cycle: bool,
    /// Lower bound on the clone count.
    pub minimum_clones: usize,
}

/// Measurements and the clone plan derived from them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FillResult {
    /// Number of clones to keep after the items.
    pub clones_count: usize,
    /// Sum of the clones' widths.
    pub clones_width: f64,
    /// Container width at measurement time.
    pub container_width: f64,
    /// Width of each item, margins included, in track order.
    pub item_widths: Vec<f64>,
    /// Sum of `item_widths`.
    pub items_width: f64,
    /// `clones_width + items_width`.
    pub full_width: f64,
    /// Item index the last clone was taken from.
    pub last_index: usize,
}

impl FillResult {
    /// Shrink the plan to the first `count` clones, e.g. when the host
    /// could not create all of them. Larger counts leave the plan unchanged.
    pub fn truncate_clones(&mut self, count: usize) {
        let item_count = self.item_widths.len();
        if count >= self.clones_count || item_count == 0 {
            return;
        }
        self.clones_count = count;
        self.clones_width = (0..count).map(|i| self.item_widths[i % item_count]).sum();
        self.last_index = count.saturating_sub(1) % item_count;
        self.full_width = self.clones_width + self.items_width;
    }
}

/// Compute how many clones satisfy `policy` for a container of
/// `container_width`.
///
/// Clones are taken from the items in order, wrapping around. Iteration goes
/// on while the width target is unmet, the minimum is not reached, or (with
/// `finish_cycle`) the last cycle is incomplete, so the result may overshoot
/// the width target by up to one full cycle.
///
/// No items yields an empty plan. Items that add no width never satisfy a
/// positive width target, so for them only the count conditions apply.
#[must_use]
pub fn compute_fill_plan(
    container_width: f64,
    item_widths: &[f64],
    policy: FillPolicy,
) -> FillResult {
    let items_width: f64 = item_widths.iter().sum();
    let mut result = FillResult {
        container_width,
        item_widths: item_widths.to_vec(),
        items_width,
        full_width: items_width,
        ..FillResult::default()
    };

    let item_count = item_widths.len();
    if item_count == 0 {
        return result;
    }

    let target = if policy.overflow {
        container_width
    } else {
        container_width - items_width
    };
    let width_reachable = items_width > 0.0;

    while (width_reachable && result.clones_width < target)
        || result.clones_count < policy.minimum_clones
        || (policy.finish_cycle && result.clones_count % item_count != 0)
    {
        result.last_index = result.clones_count % item_count;
        result.clones_width += item_widths[result.last_index];
        result.clones_count += 1;
    }

    result.full_width = result.clones_width + result.items_width;
    result
}
