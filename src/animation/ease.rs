use std::f64::consts::{FRAC_PI_2, TAU};
use std::fmt;
use std::str::FromStr;

use crate::foundation::error::TweenreelError;

const DEFAULT_BACK_OVERSHOOT: f64 = 1.70158;
const ELASTIC_PERIOD: f64 = 0.3;

/// Which half of a curve family is used.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EaseDir {
    In,
    Out,
    InOut,
}

/// Easing curve applied to tween progress.
///
/// Serialized as the usual dotted names (`"power2.inOut"`, `"back.out(1.7)"`, `"steps(4)"`).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Ease {
    Linear,
    /// `power` 1..=4; `power1` is quadratic.
    Power { power: u8, dir: EaseDir },
    Sine(EaseDir),
    Expo(EaseDir),
    Circ(EaseDir),
    Back { dir: EaseDir, overshoot: f64 },
    Bounce(EaseDir),
    Elastic(EaseDir),
    Steps(u32),
}

impl Default for Ease {
    fn default() -> Self {
        Self::Power {
            power: 1,
            dir: EaseDir::Out,
        }
    }
}

impl Ease {
    /// Map linear progress to eased progress. Endpoints are exact: `0 -> 0`, `1 -> 1`.
    pub fn apply(self, t: f64) -> f64 {
        if t.is_nan() || t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        match self {
            Self::Linear => t,
            Self::Steps(n) => {
                let n = f64::from(n.max(1));
                (t * n).floor() / n
            }
            Self::Power { dir, .. }
            | Self::Sine(dir)
            | Self::Expo(dir)
            | Self::Circ(dir)
            | Self::Back { dir, .. }
            | Self::Bounce(dir)
            | Self::Elastic(dir) => match dir {
                EaseDir::In => self.ease_in(t),
                EaseDir::Out => 1.0 - self.ease_in(1.0 - t),
                EaseDir::InOut => {
                    if t < 0.5 {
                        self.ease_in(2.0 * t) / 2.0
                    } else {
                        1.0 - self.ease_in(2.0 * (1.0 - t)) / 2.0
                    }
                }
            },
        }
    }

    fn ease_in(self, t: f64) -> f64 {
        match self {
            Self::Linear | Self::Steps(_) => t,
            Self::Power { power, .. } => t.powi(i32::from(power) + 1),
            Self::Sine(_) => 1.0 - (t * FRAC_PI_2).cos(),
            Self::Expo(_) => {
                if t == 0.0 {
                    0.0
                } else {
                    2f64.powf(10.0 * (t - 1.0))
                }
            }
            Self::Circ(_) => 1.0 - (1.0 - t * t).max(0.0).sqrt(),
            Self::Back { overshoot: s, .. } => t * t * ((s + 1.0) * t - s),
            Self::Bounce(_) => 1.0 - bounce_out(1.0 - t),
            Self::Elastic(_) => 1.0 - elastic_out(1.0 - t),
        }
    }
}

fn bounce_out(t: f64) -> f64 {
    const N1: f64 = 7.5625;
    const D1: f64 = 2.75;
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
        N1 * t * t + 0.984_375
    }
}

fn elastic_out(t: f64) -> f64 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    let shift = ELASTIC_PERIOD / 4.0;
    2f64.powf(-10.0 * t) * ((t - shift) * TAU / ELASTIC_PERIOD).sin() + 1.0
}

fn parse_dir(s: Option<&str>) -> Result<EaseDir, TweenreelError> {
    match s {
        None | Some("out") => Ok(EaseDir::Out),
        Some("in") => Ok(EaseDir::In),
        Some("inOut") => Ok(EaseDir::InOut),
        Some(other) => Err(TweenreelError::animation(format!(
            "unknown ease direction '{other}'"
        ))),
    }
}

fn dir_str(dir: EaseDir) -> &'static str {
    match dir {
        EaseDir::In => "in",
        EaseDir::Out => "out",
        EaseDir::InOut => "inOut",
    }
}

impl FromStr for Ease {
    type Err = TweenreelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (head, arg) = match s.find('(') {
            Some(open) => {
                let close = s.strip_suffix(')').ok_or_else(|| {
                    TweenreelError::animation(format!("unterminated ease argument in '{s}'"))
                })?;
                (&s[..open], Some(close[open + 1..].trim()))
            }
            None => (s, None),
        };
        let (family, dir) = match head.split_once('.') {
            Some((f, d)) => (f, Some(d)),
            None => (head, None),
        };

        let power = |power: u8| -> Result<Ease, TweenreelError> {
            Ok(Ease::Power {
                power,
                dir: parse_dir(dir)?,
            })
        };

        match family {
            "none" | "linear" | "power0" => Ok(Self::Linear),
            "power1" | "quad" => power(1),
            "power2" | "cubic" => power(2),
            "power3" | "quart" => power(3),
            "power4" | "quint" | "strong" => power(4),
            "sine" => Ok(Self::Sine(parse_dir(dir)?)),
            "expo" => Ok(Self::Expo(parse_dir(dir)?)),
            "circ" => Ok(Self::Circ(parse_dir(dir)?)),
            "bounce" => Ok(Self::Bounce(parse_dir(dir)?)),
            "elastic" => Ok(Self::Elastic(parse_dir(dir)?)),
            "back" => {
                let overshoot = match arg {
                    Some(a) if !a.is_empty() => a.parse::<f64>().map_err(|_| {
                        TweenreelError::animation(format!("invalid back overshoot '{a}'"))
                    })?,
                    _ => DEFAULT_BACK_OVERSHOOT,
                };
                Ok(Self::Back {
                    dir: parse_dir(dir)?,
                    overshoot,
                })
            }
            "steps" => {
                let n = arg
                    .and_then(|a| a.parse::<u32>().ok())
                    .filter(|n| *n > 0)
                    .ok_or_else(|| {
                        TweenreelError::animation(format!("steps ease needs a positive count: '{s}'"))
                    })?;
                Ok(Self::Steps(n))
            }
            _ => Err(TweenreelError::animation(format!("unknown ease '{s}'"))),
        }
    }
}

impl TryFrom<String> for Ease {
    type Error = TweenreelError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Ease> for String {
    fn from(e: Ease) -> Self {
        e.to_string()
    }
}

impl fmt::Display for Ease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Linear => f.write_str("none"),
            Self::Power { power, dir } => write!(f, "power{power}.{}", dir_str(dir)),
            Self::Sine(dir) => write!(f, "sine.{}", dir_str(dir)),
            Self::Expo(dir) => write!(f, "expo.{}", dir_str(dir)),
            Self::Circ(dir) => write!(f, "circ.{}", dir_str(dir)),
            Self::Back { dir, overshoot } => write!(f, "back.{}({overshoot})", dir_str(dir)),
            Self::Bounce(dir) => write!(f, "bounce.{}", dir_str(dir)),
            Self::Elastic(dir) => write!(f, "elastic.{}", dir_str(dir)),
            Self::Steps(n) => write!(f, "steps({n})"),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
