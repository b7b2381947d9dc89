//! Easing functions for reveal animations

use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Easing function type
///
/// Every curve is pinned to exactly `0.0` at `t <= 0` and `1.0` at `t >= 1`.
/// `EaseOutElastic` overshoots past 1.0 in between.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Easing {
    Linear,
    /// Cubic ease-out
    #[default]
    EaseOut,
    /// Quintic ease-out: fast start, very slow finish
    EaseOutStrong,
    /// Quadratic ease-in-out
    EaseInOut,
    EaseOutElastic,
    EaseOutBounce,
}

impl Easing {
    pub const ALL: [Easing; 6] = [
        Easing::Linear,
        Easing::EaseOut,
        Easing::EaseOutStrong,
        Easing::EaseInOut,
        Easing::EaseOutElastic,
        Easing::EaseOutBounce,
    ];

    /// Apply the easing function to a progress value (0.0 to 1.0)
    pub fn apply(&self, t: f32) -> f32 {
        // Endpoints are always exact
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }

        match self {
            Easing::Linear => t,
            Easing::EaseOut => 1.0 - (1.0 - t).powi(3),
            Easing::EaseOutStrong => 1.0 - (1.0 - t).powi(5),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::EaseOutElastic => {
                let c4 = (2.0 * PI) / 3.0;
                2f32.powf(-10.0 * t) * ((t * 10.0 - 0.75) * c4).sin() + 1.0
            }
            Easing::EaseOutBounce => bounce_out(t),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::EaseOut => "easeOut",
            Easing::EaseOutStrong => "easeOutStrong",
            Easing::EaseInOut => "easeInOut",
            Easing::EaseOutElastic => "easeOutElastic",
            Easing::EaseOutBounce => "easeOutBounce",
        }
    }
}

/// Four-segment bounce, indexed by `t / D1`
fn bounce_out(t: f32) -> f32 {
    const N1: f32 = 7.5625;
    const D1: f32 = 2.75;

    if t < 1.0 / D1 {
        N1 * t * t
    } else if t < 2.0 / D1 {
        let t = t - 1.5 / D1;
        N1 * t * t + 0.75
    } else if t < 2.5 / D1 {
        let t = t - 2.25 / D1;
        N1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / D1;
        N1 * t * t + 0.984375
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown easing name
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownEasing(pub String);

impl fmt::Display for UnknownEasing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown easing `{}`", self.0)
    }
}

impl std::error::Error for UnknownEasing {}

impl FromStr for Easing {
    type Err = UnknownEasing;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Easing::ALL
            .into_iter()
            .find(|easing| easing.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownEasing(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_are_exact() {
        for easing in Easing::ALL {
            assert_eq!(easing.apply(0.0), 0.0, "{easing} at 0");
            assert_eq!(easing.apply(1.0), 1.0, "{easing} at 1");
        }
    }

    #[test]
    fn test_out_of_range_input_is_clamped() {
        for easing in Easing::ALL {
            assert_eq!(easing.apply(-0.5), 0.0);
            assert_eq!(easing.apply(1.5), 1.0);
        }
    }

    #[test]
    fn test_known_values() {
        assert_eq!(Easing::Linear.apply(0.3), 0.3);
        assert!((Easing::EaseOut.apply(0.5) - 0.875).abs() < 1e-6);
        assert!((Easing::EaseOutStrong.apply(0.5) - 0.96875).abs() < 1e-6);
        assert!((Easing::EaseInOut.apply(0.25) - 0.125).abs() < 1e-6);
        assert!((Easing::EaseInOut.apply(0.75) - 0.875).abs() < 1e-6);
        // First bounce segment
        assert!((Easing::EaseOutBounce.apply(0.2) - 7.5625 * 0.04).abs() < 1e-6);
    }

    #[test]
    fn test_elastic_overshoots() {
        let peak = (1..100)
            .map(|i| Easing::EaseOutElastic.apply(i as f32 / 100.0))
            .fold(f32::MIN, f32::max);
        assert!(peak > 1.0, "elastic should overshoot, peak was {peak}");
    }

    #[test]
    fn test_bounce_stays_in_range() {
        for i in 0..=1000 {
            let v = Easing::EaseOutBounce.apply(i as f32 / 1000.0);
            assert!((0.0..=1.0 + 1e-5).contains(&v));
        }
    }

    #[test]
    fn test_deterministic() {
        for easing in Easing::ALL {
            assert_eq!(easing.apply(0.37), easing.apply(0.37));
        }
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("easeOutBounce".parse::<Easing>(), Ok(Easing::EaseOutBounce));
        assert_eq!("LINEAR".parse::<Easing>(), Ok(Easing::Linear));
        assert!("springy".parse::<Easing>().is_err());
        for easing in Easing::ALL {
            assert_eq!(easing.to_string().parse::<Easing>(), Ok(easing));
        }
    }
}
