use crate::{
    foundation::core::{Fps, FrameIndex},
    foundation::error::{TweenreelError, TweenreelResult},
    scene::element::{ElementId, Scene},
    timeline::bound::BoundTimeline,
    timeline::builder::Timeline,
};

/// Zero-argument timeline factory. Must not read the current frame.
pub type TimelineFactory = Box<dyn FnMut() -> TweenreelResult<Timeline>>;

/// Reference to the root element that anchors a bridge's timeline.
///
/// Created detached by [`TimelineBridge::attach`]; the caller attaches it to the root of the
/// animated subtree before the bridge mounts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScopeHandle {
    root: Option<ElementId>,
}

impl ScopeHandle {
    pub fn attach_to(&mut self, root: ElementId) {
        self.root = Some(root);
    }

    pub fn detach(&mut self) {
        self.root = None;
    }

    pub fn element(&self) -> Option<ElementId> {
        self.root
    }

    pub fn is_attached(&self) -> bool {
        self.root.is_some()
    }
}

struct Live {
    timeline: BoundTimeline,
}

/// Owns one seekable timeline and keeps it in step with a frame-indexed renderer.
///
/// Lifecycle:
/// - [`mount`](Self::mount) invokes the factory once and binds the result to the scope. The
///   bound timeline has no clock, so it stays paused until seeked.
/// - [`render`](Self::render) seeks to `frame / fps` on every frame. Frames may arrive in any
///   order, any number of times; each seek recomputes state from scratch.
/// - [`set_deps`](Self::set_deps) / [`replace_factory`](Self::replace_factory) tear down and
///   rebuild.
/// - [`unmount`](Self::unmount) reverts every touched property and drops the timeline; later
///   renders are no-ops.
pub struct TimelineBridge {
    factory: TimelineFactory,
    scope: ScopeHandle,
    live: Option<Live>,
    deps: Option<u64>,
    builds: u64,
}

impl std::fmt::Debug for TimelineBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimelineBridge")
            .field("scope", &self.scope)
            .field("mounted", &self.live.is_some())
            .field("deps", &self.deps)
            .field("builds", &self.builds)
            .finish()
    }
}

impl TimelineBridge {
    /// Create a bridge around `factory`. Nothing is built until [`mount`](Self::mount).
    pub fn attach<F>(factory: F) -> Self
    where
        F: FnMut() -> TweenreelResult<Timeline> + 'static,
    {
        Self {
            factory: Box::new(factory),
            scope: ScopeHandle::default(),
            live: None,
            deps: None,
            builds: 0,
        }
    }

    pub fn scope(&self) -> ScopeHandle {
        self.scope
    }

    pub fn scope_mut(&mut self) -> &mut ScopeHandle {
        &mut self.scope
    }

    pub fn is_mounted(&self) -> bool {
        self.live.is_some()
    }

    /// How many times the factory has been invoked over the bridge's life.
    pub fn build_count(&self) -> u64 {
        self.builds
    }

    pub fn timeline(&self) -> Option<&BoundTimeline> {
        self.live.as_ref().map(|l| &l.timeline)
    }

    /// Build and bind the timeline. A no-op when already mounted.
    ///
    /// Fails with a configuration error when the scope is detached or dangling, or when the
    /// factory's targets cannot be resolved inside it. Nothing is retried.
    #[tracing::instrument(skip(self, scene), fields(scope = ?self.scope.root))]
    pub fn mount(&mut self, scene: &Scene) -> TweenreelResult<()> {
        if self.live.is_some() {
            return Ok(());
        }
        let root = self.scope.root.ok_or_else(|| {
            TweenreelError::config("scope handle must be attached to a root element before mount")
        })?;
        if !scene.contains(root) {
            return Err(TweenreelError::config(
                "scope handle refers to an element that is no longer in the scene",
            ));
        }

        self.builds += 1;
        let timeline = (self.factory)()?;
        let timeline = BoundTimeline::bind(&timeline, root, scene)?;
        tracing::debug!(
            builds = self.builds,
            duration = timeline.duration(),
            "timeline mounted"
        );
        self.live = Some(Live { timeline });
        Ok(())
    }

    /// Seek the live timeline to `frame / fps` seconds.
    ///
    /// Returns `false` without touching the scene when nothing is mounted.
    pub fn render(&self, scene: &mut Scene, frame: FrameIndex, fps: Fps) -> bool {
        let Some(live) = &self.live else {
            tracing::trace!(frame = frame.0, "seek skipped: no timeline mounted");
            return false;
        };
        live.timeline.seek(scene, fps.frame_to_secs(frame));
        true
    }

    /// Rebuild when `key` differs from the dependency key of the live timeline.
    pub fn set_deps(&mut self, scene: &mut Scene, key: u64) -> TweenreelResult<()> {
        if self.deps == Some(key) {
            return Ok(());
        }
        let was_mounted = self.live.is_some();
        self.deps = Some(key);
        if was_mounted {
            tracing::debug!(key, "dependencies changed; rebuilding timeline");
            self.unmount(scene);
            self.mount(scene)?;
        }
        Ok(())
    }

    /// Swap the factory; a mounted bridge is torn down and rebuilt with the new one.
    pub fn replace_factory<F>(&mut self, scene: &mut Scene, factory: F) -> TweenreelResult<()>
    where
        F: FnMut() -> TweenreelResult<Timeline> + 'static,
    {
        let was_mounted = self.live.is_some();
        self.unmount(scene);
        self.factory = Box::new(factory);
        if was_mounted {
            self.mount(scene)?;
        }
        Ok(())
    }

    /// Revert every property the timeline wrote and release it.
    pub fn unmount(&mut self, scene: &mut Scene) {
        if let Some(live) = self.live.take() {
            live.timeline.revert(scene);
            tracing::debug!("timeline torn down");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/bridge/frame_bridge.rs"]
mod tests;
