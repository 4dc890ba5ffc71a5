use std::fmt;
use std::str::FromStr;

use crate::foundation::error::{TweenreelError, TweenreelResult};

pub trait Lerp: Sized {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

/// Straight (non-premultiplied) RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }
}

impl Lerp for Rgba8 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        fn lerp_u8(a: u8, b: u8, t: f64) -> u8 {
            let a = f64::from(a);
            let b = f64::from(b);
            (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
        }

        Self {
            r: lerp_u8(a.r, b.r, t),
            g: lerp_u8(a.g, b.g, t),
            b: lerp_u8(a.b, b.b, t),
            a: lerp_u8(a.a, b.a, t),
        }
    }
}

impl FromStr for Rgba8 {
    type Err = TweenreelError;

    /// Accepts `#rgb`, `#rrggbb` and `#rrggbbaa`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || TweenreelError::validation(format!("invalid hex color '{s}'"));
        let hex = s.trim().strip_prefix('#').ok_or_else(bad)?;
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(bad());
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| bad());
        match hex.len() {
            3 => {
                let nib = |i: usize| {
                    u8::from_str_radix(&hex[i..i + 1], 16)
                        .map(|v| v * 17)
                        .map_err(|_| bad())
                };
                Ok(Self::new(nib(0)?, nib(1)?, nib(2)?, 255))
            }
            6 => Ok(Self::new(byte(0)?, byte(2)?, byte(4)?, 255)),
            8 => Ok(Self::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => Err(bad()),
        }
    }
}

impl fmt::Display for Rgba8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(
                f,
                "#{:02x}{:02x}{:02x}{:02x}",
                self.r, self.g, self.b, self.a
            )
        }
    }
}

/// An animatable element property value.
///
/// JSON form: numbers stay numbers, `"#..."` strings that parse as hex colors become
/// [`PropValue::Color`], any other string is [`PropValue::Text`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(from = "RawPropValue", into = "RawPropValue")]
pub enum PropValue {
    Number(f64),
    Color(Rgba8),
    /// Discrete; switches to the target when a tween completes.
    Text(String),
}

#[derive(serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
enum RawPropValue {
    Number(f64),
    Str(String),
}

impl From<RawPropValue> for PropValue {
    fn from(raw: RawPropValue) -> Self {
        match raw {
            RawPropValue::Number(n) => Self::Number(n),
            RawPropValue::Str(s) => match s.parse::<Rgba8>() {
                Ok(c) if s.starts_with('#') => Self::Color(c),
                _ => Self::Text(s),
            },
        }
    }
}

impl From<PropValue> for RawPropValue {
    fn from(v: PropValue) -> Self {
        match v {
            PropValue::Number(n) => Self::Number(n),
            PropValue::Color(c) => Self::Str(c.to_string()),
            PropValue::Text(s) => Self::Str(s),
        }
    }
}

impl From<f64> for PropValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<Rgba8> for PropValue {
    fn from(c: Rgba8) -> Self {
        Self::Color(c)
    }
}

impl From<&str> for PropValue {
    fn from(s: &str) -> Self {
        RawPropValue::Str(s.to_string()).into()
    }
}

impl PropValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::Color(_) => "color",
            Self::Text(_) => "text",
        }
    }

    /// Fails when `self` and `other` cannot be tweened into each other.
    pub fn check_compatible(&self, other: &Self, prop: &str) -> TweenreelResult<()> {
        if std::mem::discriminant(self) == std::mem::discriminant(other) {
            return Ok(());
        }
        Err(TweenreelError::animation(format!(
            "property '{prop}' cannot tween from a {} to a {}",
            self.kind_name(),
            other.kind_name()
        )))
    }
}

impl Lerp for PropValue {
    /// Exact at the endpoints; numbers and colors extrapolate outside `[0, 1]`.
    /// Text and mismatched kinds switch only at `t == 1`.
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        if t == 0.0 {
            return a.clone();
        }
        if t == 1.0 {
            return b.clone();
        }
        match (a, b) {
            (Self::Number(x), Self::Number(y)) => Self::Number(f64::lerp(x, y, t)),
            (Self::Color(x), Self::Color(y)) => Self::Color(Rgba8::lerp(x, y, t)),
            _ => a.clone(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/value.rs"]
mod tests;
