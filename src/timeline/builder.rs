use std::collections::BTreeMap;

use crate::{
    animation::value::PropValue,
    foundation::error::{TweenreelError, TweenreelResult},
    timeline::position::{IntoPosition, Position},
    timeline::tween::{Targets, TweenDefaults, TweenKind, TweenVars},
};

#[derive(Clone, Debug)]
pub(crate) struct TweenOp {
    pub(crate) kind: TweenKind,
    pub(crate) targets: Targets,
    /// Explicit start values (`from_to` only).
    pub(crate) from_props: BTreeMap<String, PropValue>,
    pub(crate) vars: TweenVars,
    pub(crate) position: Position,
}

#[derive(Clone, Debug)]
pub(crate) enum TimelineOp {
    Tween(TweenOp),
    Label { name: String, position: Position },
    Nested { child: Timeline, position: Position },
}

/// An authored, not yet bound, tween timeline.
///
/// Building a `Timeline` touches no element: targets are resolved and start values captured
/// when a [`crate::TimelineBridge`] binds it to its scope. A timeline has no clock of its own;
/// once bound it can only be seeked.
///
/// ```
/// use tweenreel::{Ease, Timeline, TweenVars};
///
/// let mut tl = Timeline::new();
/// tl.from(".title", TweenVars::new().prop("opacity", 0.0).duration(1.0), "+=0")
///     .unwrap()
///     .to(".title", TweenVars::new().prop("y", -40.0).ease(Ease::Linear), "<0.5")
///     .unwrap();
/// assert_eq!(tl.len(), 2);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Timeline {
    pub(crate) defaults: TweenDefaults,
    pub(crate) ops: Vec<TimelineOp>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults(defaults: TweenDefaults) -> Self {
        Self {
            defaults,
            ops: Vec::new(),
        }
    }

    pub fn defaults(&self) -> TweenDefaults {
        self.defaults
    }

    /// Number of children (tweens, labels, nested timelines).
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn to(
        &mut self,
        targets: impl Into<Targets>,
        vars: TweenVars,
        position: impl IntoPosition,
    ) -> TweenreelResult<&mut Self> {
        self.push_tween(TweenKind::To, targets.into(), BTreeMap::new(), vars, position)
    }

    pub fn from(
        &mut self,
        targets: impl Into<Targets>,
        vars: TweenVars,
        position: impl IntoPosition,
    ) -> TweenreelResult<&mut Self> {
        self.push_tween(TweenKind::From, targets.into(), BTreeMap::new(), vars, position)
    }

    /// Only the property values of `from` are used; timing comes from `to`.
    pub fn from_to(
        &mut self,
        targets: impl Into<Targets>,
        from: TweenVars,
        to: TweenVars,
        position: impl IntoPosition,
    ) -> TweenreelResult<&mut Self> {
        self.push_tween(TweenKind::FromTo, targets.into(), from.props, to, position)
    }

    pub fn set(
        &mut self,
        targets: impl Into<Targets>,
        vars: TweenVars,
        position: impl IntoPosition,
    ) -> TweenreelResult<&mut Self> {
        let vars = TweenVars {
            duration: Some(0.0),
            ..vars
        };
        self.push_tween(TweenKind::Set, targets.into(), BTreeMap::new(), vars, position)
    }

    pub fn add_label(
        &mut self,
        name: impl Into<String>,
        position: impl IntoPosition,
    ) -> TweenreelResult<&mut Self> {
        let name = name.into();
        if name.trim().is_empty() || name.contains(char::is_whitespace) {
            return Err(TweenreelError::animation(format!(
                "invalid label name '{name}'"
            )));
        }
        let position = position.into_position()?;
        self.ops.push(TimelineOp::Label { name, position });
        Ok(self)
    }

    /// Place `child` as one block; its own positions and labels stay local to it.
    pub fn add(
        &mut self,
        child: Timeline,
        position: impl IntoPosition,
    ) -> TweenreelResult<&mut Self> {
        let position = position.into_position()?;
        self.ops.push(TimelineOp::Nested { child, position });
        Ok(self)
    }

    fn push_tween(
        &mut self,
        kind: TweenKind,
        targets: Targets,
        from_props: BTreeMap<String, PropValue>,
        vars: TweenVars,
        position: impl IntoPosition,
    ) -> TweenreelResult<&mut Self> {
        vars.validate()?;
        let position = position.into_position()?;
        self.ops.push(TimelineOp::Tween(TweenOp {
            kind,
            targets,
            from_props,
            vars,
            position,
        }));
        Ok(self)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/builder.rs"]
mod tests;
