//! Easing functions for timeline and tween interpolation.
//!
//! Curves are addressed by the short names used in configuration files
//! (`"none"`, `"power2.out"`, `"expo.out"`, ...). Evaluation is branch-light
//! and allocation-free; it runs every frame for every active tween.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Easing function variants for animation curves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum EasingFunction {
    /// Linear interpolation (no easing). Named `none` or `linear`.
    Linear,
    /// Quadratic ease-in (slow start, fast end).
    QuadraticIn,
    /// Quadratic ease-out (fast start, slow end).
    QuadraticOut,
    /// Cubic ease-in-out.
    CubicInOut,
    /// Exponential ease-out; the default for speed tweens.
    ExpoOut,
    /// Exponential ease-in.
    ExpoIn,
    /// Square root ease-out (fast start, gradual slow).
    SqrtOut,
    /// Cubic Hermite interpolation with configurable control points.
    /// Formula: c1·3t(1-t)² + c2·3(1-t)t² + t³
    CubicHermite {
        /// First control point.
        c1: f64,
        /// Second control point.
        c2: f64,
    },
}

impl EasingFunction {
    /// Linear; the track itself moves at constant speed by default.
    pub const DEFAULT: EasingFunction = EasingFunction::Linear;

    /// Evaluate the easing function at time t.
    ///
    /// Input t is clamped to [0.0, 1.0].
    #[inline]
    #[must_use]
    pub fn evaluate(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);

        match self {
            Self::Linear => t,
            Self::QuadraticIn => t * t,
            Self::QuadraticOut => {
                let omt = 1.0 - t;
                1.0 - omt * omt
            }
            Self::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - u * u * u / 2.0
                }
            }
            Self::ExpoOut => {
                if t >= 1.0 {
                    1.0
                } else {
                    1.0 - 2f64.powf(-10.0 * t)
                }
            }
            Self::ExpoIn => {
                if t <= 0.0 {
                    0.0
                } else {
                    2f64.powf(10.0 * t - 10.0)
                }
            }
            Self::SqrtOut => t.sqrt(),
            Self::CubicHermite { c1, c2 } => {
                let omt = 1.0 - t;
                c1 * 3.0 * t * omt * omt + c2 * 3.0 * omt * t * t + t * t * t
            }
        }
    }
}

impl Default for EasingFunction {
    #[inline]
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Unrecognised easing name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEasing(pub String);

impl fmt::Display for UnknownEasing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown easing '{}'", self.0)
    }
}

impl std::error::Error for UnknownEasing {}

impl FromStr for EasingFunction {
    type Err = UnknownEasing;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        let parsed = match name {
            "none" | "linear" => Self::Linear,
            "power1.in" | "quad.in" => Self::QuadraticIn,
            "power1.out" | "quad.out" => Self::QuadraticOut,
            "power2.inOut" | "cubic.inOut" => Self::CubicInOut,
            "expo.out" => Self::ExpoOut,
            "expo.in" => Self::ExpoIn,
            "sqrt.out" => Self::SqrtOut,
            _ => return parse_hermite(name).ok_or_else(|| UnknownEasing(s.to_owned())),
        };
        Ok(parsed)
    }
}

/// `hermite(c1, c2)`
fn parse_hermite(name: &str) -> Option<EasingFunction> {
    let args = name.strip_prefix("hermite(")?.strip_suffix(')')?;
    let (c1, c2) = args.split_once(',')?;
    Some(EasingFunction::CubicHermite {
        c1: c1.trim().parse().ok()?,
        c2: c2.trim().parse().ok()?,
    })
}

impl fmt::Display for EasingFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => f.write_str("none"),
            Self::QuadraticIn => f.write_str("power1.in"),
            Self::QuadraticOut => f.write_str("power1.out"),
            Self::CubicInOut => f.write_str("power2.inOut"),
            Self::ExpoOut => f.write_str("expo.out"),
            Self::ExpoIn => f.write_str("expo.in"),
            Self::SqrtOut => f.write_str("sqrt.out"),
            Self::CubicHermite { c1, c2 } => write!(f, "hermite({c1}, {c2})"),
        }
    }
}

impl TryFrom<String> for EasingFunction {
    type Error = UnknownEasing;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EasingFunction> for String {
    fn from(value: EasingFunction) -> Self {
        value.to_string()
    }
}

impl JsonSchema for EasingFunction {
    fn schema_name() -> Cow<'static, str> {
        "Ease".into()
    }

    fn json_schema(_generator: &mut schemars::SchemaGenerator) -> schemars::Schema {
        schemars::json_schema!({
            "type": "string",
            "description": "Easing curve name, e.g. \"none\", \"expo.out\" or \"hermite(0.33, 1)\".",
        })
    }
}
