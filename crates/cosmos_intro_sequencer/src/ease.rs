// SPDX-License-Identifier: MIT OR Apache-2.0
//! Easing curves for tween progress.

use crate::tween::TweenError;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Which end of the curve is eased
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EaseDirection {
    /// Slow start
    In,
    /// Slow finish
    #[default]
    Out,
    /// Slow start and finish
    InOut,
}

impl EaseDirection {
    fn suffix(self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
            Self::InOut => "inOut",
        }
    }
}

/// Easing curve mapping linear progress `t` in `[0, 1]` to eased progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ease {
    /// Constant rate
    Linear,
    /// Polynomial curve of degree `power + 1` (`Power(2, _)` is cubic)
    Power(u8, EaseDirection),
    /// Sinusoidal curve
    Sine(EaseDirection),
}

impl Default for Ease {
    fn default() -> Self {
        Self::Power(1, EaseDirection::Out)
    }
}

impl Ease {
    /// `power2.in`
    pub const POWER2_IN: Ease = Ease::Power(2, EaseDirection::In);
    /// `power2.out`
    pub const POWER2_OUT: Ease = Ease::Power(2, EaseDirection::Out);
    /// `power2.inOut`
    pub const POWER2_IN_OUT: Ease = Ease::Power(2, EaseDirection::InOut);

    /// Evaluate the curve. Input is clamped, and the endpoints map exactly to 0 and 1.
    pub fn apply(self, t: f32) -> f32 {
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }

        match self {
            Ease::Linear => t,
            Ease::Power(power, direction) => {
                let exponent = i32::from(power) + 1;
                shape(direction, t, |x| x.powi(exponent))
            }
            Ease::Sine(direction) => shape(direction, t, |x| 1.0 - (x * PI * 0.5).cos()),
        }
    }
}

/// Derive out/in-out variants from an ease-in curve
fn shape(direction: EaseDirection, t: f32, ease_in: impl Fn(f32) -> f32) -> f32 {
    match direction {
        EaseDirection::In => ease_in(t),
        EaseDirection::Out => 1.0 - ease_in(1.0 - t),
        EaseDirection::InOut => {
            if t < 0.5 {
                ease_in(t * 2.0) * 0.5
            } else {
                1.0 - ease_in((1.0 - t) * 2.0) * 0.5
            }
        }
    }
}

impl fmt::Display for Ease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ease::Linear => write!(f, "none"),
            Ease::Power(power, direction) => write!(f, "power{}.{}", power, direction.suffix()),
            Ease::Sine(direction) => write!(f, "sine.{}", direction.suffix()),
        }
    }
}

impl FromStr for Ease {
    type Err = TweenError;

    /// Parses conventional names such as `"power2.inOut"`, `"sine.in"`,
    /// `"cubic.out"` or `"none"`. A bare family name eases out.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || TweenError::UnknownEase(s.to_string());
        let name = s.trim();
        if name == "none" || name == "linear" {
            return Ok(Ease::Linear);
        }

        let (family, direction) = match name.split_once('.') {
            Some((family, suffix)) => {
                let direction = match suffix {
                    "in" => EaseDirection::In,
                    "out" => EaseDirection::Out,
                    "inOut" => EaseDirection::InOut,
                    _ => return Err(unknown()),
                };
                (family, direction)
            }
            None => (name, EaseDirection::Out),
        };

        let power = match family {
            "sine" => return Ok(Ease::Sine(direction)),
            "power0" => return Ok(Ease::Linear),
            "power1" | "quad" => 1,
            "power2" | "cubic" => 2,
            "power3" | "quart" => 3,
            "power4" | "quint" | "strong" => 4,
            _ => return Err(unknown()),
        };
        Ok(Ease::Power(power, direction))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_endpoints_are_exact() {
        let eases = [
            Ease::Linear,
            Ease::POWER2_IN,
            Ease::POWER2_OUT,
            Ease::POWER2_IN_OUT,
            Ease::Sine(EaseDirection::InOut),
        ];
        for ease in eases {
            assert_eq!(ease.apply(0.0), 0.0, "{ease}");
            assert_eq!(ease.apply(1.0), 1.0, "{ease}");
            assert_eq!(ease.apply(1.5), 1.0, "{ease}");
        }
    }

    #[test]
    fn test_power2_is_cubic() {
        assert!((Ease::POWER2_IN.apply(0.5) - 0.125).abs() < EPS);
        assert!((Ease::POWER2_OUT.apply(0.5) - 0.875).abs() < EPS);
        assert!((Ease::POWER2_IN_OUT.apply(0.5) - 0.5).abs() < EPS);
        assert!((Ease::POWER2_IN_OUT.apply(0.25) - 0.0625).abs() < EPS);
    }

    #[test]
    fn test_ease_in_out_is_monotonic() {
        let mut last = 0.0;
        for i in 0..=100 {
            let value = Ease::POWER2_IN_OUT.apply(i as f32 / 100.0);
            assert!(value >= last);
            last = value;
        }
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("power2.inOut".parse::<Ease>().unwrap(), Ease::POWER2_IN_OUT);
        assert_eq!("power2.in".parse::<Ease>().unwrap(), Ease::POWER2_IN);
        assert_eq!("cubic".parse::<Ease>().unwrap(), Ease::POWER2_OUT);
        assert_eq!("none".parse::<Ease>().unwrap(), Ease::Linear);
        assert_eq!(
            "sine.out".parse::<Ease>().unwrap(),
            Ease::Sine(EaseDirection::Out)
        );
        assert!(matches!(
            "bounce.out".parse::<Ease>(),
            Err(TweenError::UnknownEase(_))
        ));
        assert!("power2.sideways".parse::<Ease>().is_err());
        assert_eq!(Ease::POWER2_IN_OUT.to_string(), "power2.inOut");
    }
}
