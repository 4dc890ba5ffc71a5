use std::collections::BTreeMap;

use crate::{
    animation::value::PropValue,
    foundation::core::{Canvas, Fps},
    foundation::error::{TweenreelError, TweenreelResult},
    scene::element::ElementDesc,
    scene::selector::Selector,
    timeline::builder::Timeline,
    timeline::position::Position,
    timeline::tween::{TweenDefaults, TweenVars},
};

/// What a composition reports about itself to the code rendering it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct VideoConfig {
    pub fps: Fps,
    pub width: u32,
    pub height: u32,
    pub duration_in_frames: u64,
}

impl VideoConfig {
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// A registered composition: video settings plus the element tree it renders.
///
/// JSON shape:
///
/// ```json
/// { "id": "intro", "fps": 30, "width": 1280, "height": 720, "duration_in_frames": 90,
///   "root": { "tag": "div", "children": [ ... ], "timeline": { "steps": [ ... ] } } }
/// ```
pub struct CompositionDef {
    /// Unique key inside a project.
    pub id: String,
    /// Either `30` or `{ "num": 30000, "den": 1001 }`.
    #[serde(deserialize_with = "de_fps")]
    pub fps: Fps,
    pub width: u32,
    pub height: u32,
    #[serde(alias = "durationInFrames")]
    pub duration_in_frames: u64,
    pub root: NodeDef,
}

impl CompositionDef {
    pub fn video_config(&self) -> VideoConfig {
        VideoConfig {
            fps: self.fps,
            width: self.width,
            height: self.height,
            duration_in_frames: self.duration_in_frames,
        }
    }

    pub fn validate(&self) -> TweenreelResult<()> {
        if self.id.trim().is_empty() {
            return Err(TweenreelError::validation("composition id must be non-empty"));
        }
        if self.id.contains(char::is_whitespace) {
            return Err(TweenreelError::validation(format!(
                "composition id '{}' must not contain whitespace",
                self.id
            )));
        }
        Fps::new(self.fps.num, self.fps.den)?;
        if self.width == 0 || self.height == 0 {
            return Err(TweenreelError::validation("width/height must be > 0"));
        }
        if self.duration_in_frames == 0 {
            return Err(TweenreelError::validation(
                "duration_in_frames must be > 0",
            ));
        }
        self.root.validate()
    }
}

/// One element of a composition tree.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NodeDef {
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Initial property values (`opacity`, `x`, `color`, ...).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub props: BTreeMap<String, PropValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeDef>,
    /// Animation scoped to this node's subtree.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeline: Option<TimelineDef>,
    /// Frame window in which this subtree exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<SequenceDef>,
}

impl NodeDef {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub(crate) fn element_desc(&self) -> ElementDesc {
        ElementDesc {
            tag: self.tag.clone(),
            name: self.name.clone(),
            classes: self.classes.clone(),
            text: self.text.clone(),
            props: self.props.clone(),
        }
    }

    fn validate(&self) -> TweenreelResult<()> {
        if self.tag.trim().is_empty() {
            return Err(TweenreelError::validation("node tag must be non-empty"));
        }
        if let Some(seq) = &self.sequence
            && seq.duration_in_frames == Some(0)
        {
            return Err(TweenreelError::validation(format!(
                "sequence on '{}' must last at least one frame",
                self.label()
            )));
        }
        if let Some(tl) = &self.timeline {
            tl.validate()?;
        }
        for child in &self.children {
            child.validate()?;
        }
        Ok(())
    }

    fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.tag)
    }
}

/// Frame window of a subtree, relative to the parent's frame.
///
/// Inside the window the subtree sees `frame - from`; outside it is not mounted at all.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SequenceDef {
    #[serde(default)]
    pub from: i64,
    #[serde(
        default,
        alias = "durationInFrames",
        skip_serializing_if = "Option::is_none"
    )]
    pub duration_in_frames: Option<u64>,
}

impl SequenceDef {
    /// Frame seen by the subtree, or `None` outside the window.
    pub fn local_frame(&self, parent_frame: i64) -> Option<i64> {
        let local = parent_frame.checked_sub(self.from)?;
        if local < 0 {
            return None;
        }
        match self.duration_in_frames {
            Some(d) if local.unsigned_abs() >= d => None,
            _ => Some(local),
        }
    }
}

/// Serialized timeline: defaults plus an ordered list of steps.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimelineDef {
    #[serde(default)]
    pub defaults: TweenDefaults,
    #[serde(default)]
    pub steps: Vec<StepDef>,
}

/// One timeline call. `targets` are selectors resolved inside the owning node.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum StepDef {
    To {
        targets: String,
        vars: TweenVars,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        position: Option<Position>,
    },
    From {
        targets: String,
        vars: TweenVars,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        position: Option<Position>,
    },
    FromTo {
        targets: String,
        from: TweenVars,
        to: TweenVars,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        position: Option<Position>,
    },
    Set {
        targets: String,
        vars: TweenVars,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        position: Option<Position>,
    },
    Label {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        position: Option<Position>,
    },
}

impl TimelineDef {
    /// Replay the steps through the [`Timeline`] builder.
    pub fn to_timeline(&self) -> TweenreelResult<Timeline> {
        let mut tl = Timeline::with_defaults(self.defaults);
        for step in &self.steps {
            match step {
                StepDef::To {
                    targets,
                    vars,
                    position,
                } => tl.to(targets.as_str(), vars.clone(), position.clone())?,
                StepDef::From {
                    targets,
                    vars,
                    position,
                } => tl.from(targets.as_str(), vars.clone(), position.clone())?,
                StepDef::FromTo {
                    targets,
                    from,
                    to,
                    position,
                } => tl.from_to(targets.as_str(), from.clone(), to.clone(), position.clone())?,
                StepDef::Set {
                    targets,
                    vars,
                    position,
                } => tl.set(targets.as_str(), vars.clone(), position.clone())?,
                StepDef::Label { name, position } => tl.add_label(name.as_str(), position.clone())?,
            };
        }
        Ok(tl)
    }

    fn validate(&self) -> TweenreelResult<()> {
        self.defaults.validate()?;
        for step in &self.steps {
            let targets = match step {
                StepDef::To { targets, .. }
                | StepDef::From { targets, .. }
                | StepDef::FromTo { targets, .. }
                | StepDef::Set { targets, .. } => targets,
                StepDef::Label { .. } => continue,
            };
            targets.parse::<Selector>()?;
        }
        self.to_timeline().map(|_| ())
    }
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum RawFps {
    Whole(u32),
    Ratio { num: u32, den: u32 },
}

fn de_fps<'de, D>(d: D) -> Result<Fps, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let (num, den) = match <RawFps as serde::Deserialize>::deserialize(d)? {
        RawFps::Whole(n) => (n, 1),
        RawFps::Ratio { num, den } => (num, den),
    };
    Fps::new(num, den).map_err(serde::de::Error::custom)
}

#[cfg(test)]
#[path = "../../tests/unit/composition/model.rs"]
mod tests;
