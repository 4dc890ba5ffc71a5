use std::fmt;
use std::str::FromStr;

use crate::foundation::error::{TweenreelError, TweenreelResult};

/// Where a child is placed on its timeline.
///
/// String forms: `"+=1"` / `"-=0.5"` (relative to the timeline end), `"<"` / `"<0.2"` (previous
/// child's start), `">"` / `">-0.1"` (previous child's end), `"intro"` / `"intro+=0.3"` (label),
/// or a plain number of seconds.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawPosition", into = "RawPosition")]
pub enum Position {
    /// Offset from the current end of the timeline. `End(0.0)` is the default.
    End(f64),
    /// Absolute time in seconds.
    At(f64),
    PrevStart(f64),
    PrevEnd(f64),
    Label { name: String, offset: f64 },
}

impl Default for Position {
    fn default() -> Self {
        Self::End(0.0)
    }
}

/// Where previously placed children sit; the input [`Position::resolve`] needs.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Cursor {
    pub(crate) end: f64,
    pub(crate) prev_start: f64,
    pub(crate) prev_end: f64,
}

impl Position {
    /// Resolve to seconds. Unknown labels are configuration errors; negative results clamp to 0.
    pub(crate) fn resolve(
        &self,
        cursor: Cursor,
        label: impl Fn(&str) -> Option<f64>,
    ) -> TweenreelResult<f64> {
        let t = match self {
            Self::End(off) => cursor.end + off,
            Self::At(t) => *t,
            Self::PrevStart(off) => cursor.prev_start + off,
            Self::PrevEnd(off) => cursor.prev_end + off,
            Self::Label { name, offset } => {
                label(name).ok_or_else(|| {
                    TweenreelError::config(format!("unknown timeline label '{name}'"))
                })? + offset
            }
        };
        if !t.is_finite() {
            return Err(TweenreelError::animation(format!(
                "position '{self}' is not finite"
            )));
        }
        Ok(t.max(0.0))
    }
}

fn parse_offset(s: &str, whole: &str) -> TweenreelResult<f64> {
    let bad = || TweenreelError::animation(format!("invalid position '{whole}'"));
    let s = s.trim();
    if s.is_empty() {
        return Ok(0.0);
    }
    let (sign, rest) = if let Some(r) = s.strip_prefix("+=") {
        (1.0, r)
    } else if let Some(r) = s.strip_prefix("-=") {
        (-1.0, r)
    } else {
        (1.0, s)
    };
    let v = rest.trim().parse::<f64>().map_err(|_| bad())?;
    if !v.is_finite() {
        return Err(bad());
    }
    Ok(sign * v)
}

impl FromStr for Position {
    type Err = TweenreelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        if t.is_empty() {
            return Ok(Self::default());
        }
        if let Some(rest) = t.strip_prefix('<') {
            return Ok(Self::PrevStart(parse_offset(rest, s)?));
        }
        if let Some(rest) = t.strip_prefix('>') {
            return Ok(Self::PrevEnd(parse_offset(rest, s)?));
        }
        if t.starts_with("+=") || t.starts_with("-=") {
            return Ok(Self::End(parse_offset(t, s)?));
        }
        if let Ok(v) = t.parse::<f64>() {
            return Ok(Self::At(v));
        }
        let split = t.find("+=").or_else(|| t.find("-="));
        let (name, offset) = match split {
            Some(i) => (&t[..i], parse_offset(&t[i..], s)?),
            None => (t, 0.0),
        };
        let name = name.trim();
        if name.is_empty() || name.contains(char::is_whitespace) {
            return Err(TweenreelError::animation(format!("invalid position '{s}'")));
        }
        Ok(Self::Label {
            name: name.to_string(),
            offset,
        })
    }
}

fn fmt_offset(f: &mut fmt::Formatter<'_>, off: f64) -> fmt::Result {
    if off > 0.0 {
        write!(f, "+={off}")
    } else if off < 0.0 {
        write!(f, "-={}", -off)
    } else {
        Ok(())
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::End(off) if *off == 0.0 => f.write_str("+=0"),
            Self::End(off) => fmt_offset(f, *off),
            Self::At(t) => write!(f, "{t}"),
            Self::PrevStart(off) => {
                f.write_str("<")?;
                fmt_offset(f, *off)
            }
            Self::PrevEnd(off) => {
                f.write_str(">")?;
                fmt_offset(f, *off)
            }
            Self::Label { name, offset } => {
                f.write_str(name)?;
                fmt_offset(f, *offset)
            }
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
enum RawPosition {
    Seconds(f64),
    Text(String),
}

impl TryFrom<RawPosition> for Position {
    type Error = TweenreelError;

    fn try_from(raw: RawPosition) -> Result<Self, Self::Error> {
        match raw {
            RawPosition::Seconds(t) => Ok(Self::At(t)),
            RawPosition::Text(s) => s.parse(),
        }
    }
}

impl From<Position> for RawPosition {
    fn from(p: Position) -> Self {
        match p {
            Position::At(t) => Self::Seconds(t),
            other => Self::Text(other.to_string()),
        }
    }
}

/// Anything accepted where a timeline position is expected.
pub trait IntoPosition {
    fn into_position(self) -> TweenreelResult<Position>;
}

impl IntoPosition for Position {
    fn into_position(self) -> TweenreelResult<Position> {
        Ok(self)
    }
}

impl IntoPosition for f64 {
    fn into_position(self) -> TweenreelResult<Position> {
        Ok(Position::At(self))
    }
}

impl IntoPosition for &str {
    fn into_position(self) -> TweenreelResult<Position> {
        self.parse()
    }
}

impl IntoPosition for String {
    fn into_position(self) -> TweenreelResult<Position> {
        self.parse()
    }
}

impl IntoPosition for Option<Position> {
    fn into_position(self) -> TweenreelResult<Position> {
        Ok(self.unwrap_or_default())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/position.rs"]
mod tests;
