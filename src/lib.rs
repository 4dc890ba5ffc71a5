//! tweenreel renders frame-driven motion compositions.
//!
//! A composition is a tree of elements plus tween timelines scoped to subtrees. The renderer is a
//! pure function of the frame number: for frame `N` every timeline is seeked to `N / fps` seconds
//! and the resulting element properties are captured as a [`FrameSnapshot`].
//!
//! # Pipeline overview
//!
//! 1. **Author**: build a [`Timeline`] in code or describe it as JSON ([`CompositionDef`]).
//! 2. **Mount**: a [`TimelineBridge`] invokes its factory once and binds the timeline to its
//!    [`ScopeHandle`], resolving selectors and capturing start values.
//! 3. **Seek**: every render positions the paused timeline at `frame / fps`. Frames can be
//!    rendered in any order, any number of times, on any number of workers.
//! 4. **Emit**: snapshots stream into a [`FrameSink`] (in memory or JSON lines).
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **No wall clock**: timelines never play; only the frame index moves them.
//! - **Deterministic**: a snapshot depends on the composition and the frame, nothing else.
#![forbid(unsafe_code)]

mod animation;
mod bridge;
mod composition;
mod encode;
mod foundation;
mod render;
mod scene;
mod timeline;

pub use animation::ease::{Ease, EaseDir};
pub use animation::value::{Lerp, PropValue, Rgba8};
pub use bridge::frame_bridge::{ScopeHandle, TimelineBridge, TimelineFactory};
pub use composition::model::{
    CompositionDef, NodeDef, SequenceDef, StepDef, TimelineDef, VideoConfig,
};
pub use composition::registry::{CompositionRegistry, ProjectDef};
pub use encode::sink::{FrameSink, InMemorySink, JsonLinesSink, SinkConfig};
pub use foundation::core::{Affine, Canvas, Fps, FrameIndex, FrameRange, Transform2D, Vec2};
pub use foundation::error::{TweenreelError, TweenreelResult};
pub use render::instance::Instance;
pub use render::session::{RenderSession, RenderSessionOpts, RenderStats};
pub use render::snapshot::{ElementSnapshot, FrameSnapshot};
pub use scene::element::{Element, ElementDesc, ElementId, Scene};
pub use scene::selector::Selector;
pub use timeline::bound::BoundTimeline;
pub use timeline::builder::Timeline;
pub use timeline::position::{IntoPosition, Position};
pub use timeline::tween::{Stagger, StaggerFrom, Targets, TweenDefaults, TweenKind, TweenVars};
