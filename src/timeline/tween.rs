use std::collections::BTreeMap;

use crate::{
    animation::ease::Ease,
    animation::value::PropValue,
    foundation::error::{TweenreelError, TweenreelResult},
    scene::element::ElementId,
};

pub(crate) const DEFAULT_DURATION: f64 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TweenKind {
    /// Current value -> given values.
    To,
    /// Given values -> current value.
    From,
    /// Given `from` values -> given `to` values.
    FromTo,
    /// Zero-duration jump to the given values.
    Set,
}

impl TweenKind {
    pub(crate) fn immediate_render_default(self) -> bool {
        matches!(self, Self::From | Self::FromTo)
    }
}

/// Order in which staggered targets start.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaggerFrom {
    #[default]
    Start,
    End,
    Center,
}

/// Per-target start offsets for multi-target tweens.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(from = "RawStagger")]
pub struct Stagger {
    pub each: f64,
    pub from: StaggerFrom,
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum RawStagger {
    Each(f64),
    Full {
        each: f64,
        #[serde(default)]
        from: StaggerFrom,
    },
}

impl From<RawStagger> for Stagger {
    fn from(raw: RawStagger) -> Self {
        match raw {
            RawStagger::Each(each) => Self {
                each,
                from: StaggerFrom::Start,
            },
            RawStagger::Full { each, from } => Self { each, from },
        }
    }
}

impl Stagger {
    pub fn each(each: f64) -> Self {
        Self {
            each,
            from: StaggerFrom::Start,
        }
    }

    pub(crate) fn offset(&self, index: usize, count: usize) -> f64 {
        let last = count.saturating_sub(1) as f64;
        let i = index as f64;
        let slots = match self.from {
            StaggerFrom::Start => i,
            StaggerFrom::End => last - i,
            StaggerFrom::Center => (i - last / 2.0).abs(),
        };
        slots * self.each
    }
}

/// Tween settings plus the animated property values, in the usual flat form:
/// `{ "opacity": 1, "x": 120, "duration": 0.8, "ease": "power2.out", "stagger": 0.1 }`.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TweenVars {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ease: Option<Ease>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stagger: Option<Stagger>,
    /// Extra plays after the first one.
    #[serde(default)]
    pub repeat: u32,
    #[serde(default)]
    pub yoyo: bool,
    #[serde(default, rename = "repeatDelay")]
    pub repeat_delay: f64,
    #[serde(
        default,
        rename = "immediateRender",
        skip_serializing_if = "Option::is_none"
    )]
    pub immediate_render: Option<bool>,
    #[serde(flatten)]
    pub props: BTreeMap<String, PropValue>,
}

impl TweenVars {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prop(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }

    pub fn duration(mut self, secs: f64) -> Self {
        self.duration = Some(secs);
        self
    }

    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = Some(ease);
        self
    }

    pub fn stagger(mut self, stagger: Stagger) -> Self {
        self.stagger = Some(stagger);
        self
    }

    pub fn repeat(mut self, count: u32) -> Self {
        self.repeat = count;
        self
    }

    pub fn yoyo(mut self, yoyo: bool) -> Self {
        self.yoyo = yoyo;
        self
    }

    pub fn repeat_delay(mut self, secs: f64) -> Self {
        self.repeat_delay = secs;
        self
    }

    pub fn immediate_render(mut self, on: bool) -> Self {
        self.immediate_render = Some(on);
        self
    }

    pub(crate) fn validate(&self) -> TweenreelResult<()> {
        if let Some(d) = self.duration
            && !(d.is_finite() && d >= 0.0)
        {
            return Err(TweenreelError::animation(format!(
                "tween duration must be finite and >= 0, got {d}"
            )));
        }
        if !(self.repeat_delay.is_finite() && self.repeat_delay >= 0.0) {
            return Err(TweenreelError::animation(
                "repeatDelay must be finite and >= 0",
            ));
        }
        if let Some(s) = self.stagger
            && !(s.each.is_finite() && s.each >= 0.0)
        {
            return Err(TweenreelError::animation(
                "stagger must be finite and >= 0",
            ));
        }
        Ok(())
    }
}

/// Timeline-wide fallbacks for tween `duration` and `ease`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TweenDefaults {
    #[serde(default = "default_duration")]
    pub duration: f64,
    #[serde(default)]
    pub ease: Ease,
}

fn default_duration() -> f64 {
    DEFAULT_DURATION
}

impl TweenDefaults {
    pub(crate) fn validate(&self) -> TweenreelResult<()> {
        if !(self.duration.is_finite() && self.duration >= 0.0) {
            return Err(TweenreelError::animation(format!(
                "default tween duration must be finite and >= 0, got {}",
                self.duration
            )));
        }
        Ok(())
    }
}

impl Default for TweenDefaults {
    fn default() -> Self {
        Self {
            duration: DEFAULT_DURATION,
            ease: Ease::default(),
        }
    }
}

/// Elements a tween animates: explicit handles, or a selector resolved inside the scope.
#[derive(Clone, Debug, PartialEq)]
pub enum Targets {
    Handles(Vec<ElementId>),
    Selector(String),
}

impl From<ElementId> for Targets {
    fn from(id: ElementId) -> Self {
        Self::Handles(vec![id])
    }
}

impl From<Vec<ElementId>> for Targets {
    fn from(ids: Vec<ElementId>) -> Self {
        Self::Handles(ids)
    }
}

impl From<&[ElementId]> for Targets {
    fn from(ids: &[ElementId]) -> Self {
        Self::Handles(ids.to_vec())
    }
}

impl From<&str> for Targets {
    fn from(s: &str) -> Self {
        Self::Selector(s.to_string())
    }
}

impl From<String> for Targets {
    fn from(s: String) -> Self {
        Self::Selector(s)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/tween.rs"]
mod tests;
