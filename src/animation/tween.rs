//! Time-scale tweens.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::util::EasingFunction;

/// What happens to running tweens when a new one starts on the same target.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Overwrite {
    /// Kill every running tween of the target immediately.
    #[default]
    All,
    /// When the new tween starts, kill the running tweens that already
    /// produced a value; tweens that have not rendered yet keep running.
    Auto,
    /// Leave running tweens alone; the latest started wins each frame.
    None,
}

/// Duration, curve and overwrite mode of a tween.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenSpec {
    /// Seconds; zero or less applies the target immediately.
    pub duration: f64,
    /// Timing curve.
    pub ease: EasingFunction,
    /// Overwrite mode.
    pub overwrite: Overwrite,
}

/// Handle of a running tween.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TweenId(pub(crate) u64);

/// A running interpolation of a scalar from `from` to `to`.
#[derive(Debug, Clone)]
pub(crate) struct ScalarTween {
    pub(crate) id: TweenId,
    pub(crate) from: f64,
    pub(crate) to: f64,
    pub(crate) spec: TweenSpec,
    pub(crate) elapsed: f64,
    /// Set once the tween produced its first value.
    pub(crate) started: bool,
}

impl ScalarTween {
    pub(crate) fn new(id: TweenId, from: f64, to: f64, spec: TweenSpec) -> Self {
        Self {
            id,
            from,
            to,
            spec,
            elapsed: 0.0,
            started: false,
        }
    }

    /// Advance by `dt` seconds and return the new value.
    pub(crate) fn step(&mut self, dt: f64) -> f64 {
        self.started = true;
        self.elapsed += dt;
        let t = self.elapsed / self.spec.duration;
        self.from + (self.to - self.from) * self.spec.ease.evaluate(t)
    }

    pub(crate) fn is_done(&self) -> bool {
        self.elapsed >= self.spec.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tween_reaches_target() {
        let spec = TweenSpec {
            duration: 1.0,
            ease: EasingFunction::Linear,
            overwrite: Overwrite::All,
        };
        let mut tween = ScalarTween::new(TweenId(0), 1.0, 5.0, spec);
        assert_eq!(tween.step(0.5), 3.0);
        assert!(!tween.is_done());
        assert_eq!(tween.step(0.75), 5.0);
        assert!(tween.is_done());
    }

    #[test]
    fn overwrite_names() {
        let parsed: Overwrite = serde_json::from_str("\"auto\"").unwrap();
        assert_eq!(parsed, Overwrite::Auto);
        assert_eq!(Overwrite::default(), Overwrite::All);
    }
}
