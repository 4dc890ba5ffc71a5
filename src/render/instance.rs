use crate::{
    bridge::frame_bridge::TimelineBridge,
    composition::model::{CompositionDef, NodeDef, SequenceDef, VideoConfig},
    foundation::core::{Fps, FrameIndex},
    foundation::error::{TweenreelError, TweenreelResult},
    foundation::math::{Fnv1a64, stable_hash64},
    render::snapshot::{ElementSnapshot, FrameSnapshot},
    scene::element::{ElementDesc, ElementId, Scene},
};

const TIMELINE_KEY_SEED: u64 = 0x7477_6565_6e72_6565;

/// Runtime twin of a [`NodeDef`]: the element while mounted, plus the node's bridge.
struct NodeRt {
    path: String,
    desc: ElementDesc,
    sequence: Option<SequenceDef>,
    timeline_key: u64,
    bridge: Option<TimelineBridge>,
    element: Option<ElementId>,
    /// Frame this subtree sees; `None` while unmounted.
    local: Option<i64>,
    children: Vec<NodeRt>,
}

impl NodeRt {
    fn build(def: &NodeDef, path: String) -> Self {
        let bridge = def.timeline.as_ref().map(|tl| {
            let tl = tl.clone();
            TimelineBridge::attach(move || tl.to_timeline())
        });
        let timeline_key = def
            .timeline
            .as_ref()
            .map_or(0, |tl| stable_hash64(TIMELINE_KEY_SEED, &format!("{tl:?}")));
        let children = def
            .children
            .iter()
            .enumerate()
            .map(|(i, child)| {
                let p = if path.is_empty() {
                    i.to_string()
                } else {
                    format!("{path}.{i}")
                };
                Self::build(child, p)
            })
            .collect();
        Self {
            path,
            desc: def.element_desc(),
            sequence: def.sequence,
            timeline_key,
            bridge,
            element: None,
            local: None,
            children,
        }
    }

    /// Insert or remove elements so the scene matches the windows open at `frame`.
    ///
    /// `slot` is the sibling position among mounted siblings, so remounted subtrees keep their
    /// document order.
    fn sync_structure(
        &mut self,
        scene: &mut Scene,
        parent: Option<ElementId>,
        slot: usize,
        frame: i64,
    ) -> TweenreelResult<()> {
        let local = match &self.sequence {
            Some(seq) => seq.local_frame(frame),
            None => Some(frame),
        };
        let Some(local) = local else {
            self.teardown(scene);
            return Ok(());
        };

        let element = match self.element {
            Some(el) => el,
            None => {
                let el = scene.insert_at(parent, slot, self.desc.clone())?;
                if let Some(bridge) = &mut self.bridge {
                    bridge.scope_mut().attach_to(el);
                }
                tracing::trace!(path = %self.path, "subtree mounted");
                self.element = Some(el);
                el
            }
        };
        self.local = Some(local);

        let mut next = 0;
        for child in &mut self.children {
            child.sync_structure(scene, Some(element), next, local)?;
            if child.element.is_some() {
                next += 1;
            }
        }
        Ok(())
    }

    /// Key that changes whenever the timeline or the set of mounted descendants does.
    fn structure_key(&self) -> u64 {
        let mut h = Fnv1a64::new(self.timeline_key);
        for child in &self.children {
            child.write_mounted(&mut h);
        }
        h.finish()
    }

    fn write_mounted(&self, h: &mut Fnv1a64) {
        h.write_u8(u8::from(self.element.is_some()));
        if self.element.is_some() {
            for child in &self.children {
                child.write_mounted(h);
            }
        }
    }

    /// Parents first, so an ancestor's timeline is rebound before descendants mount theirs.
    fn sync_bridges(&mut self, scene: &mut Scene) -> TweenreelResult<()> {
        if self.element.is_none() {
            return Ok(());
        }
        let key = self.structure_key();
        if let Some(bridge) = &mut self.bridge {
            bridge.set_deps(scene, key)?;
            bridge.mount(scene)?;
        }
        for child in &mut self.children {
            child.sync_bridges(scene)?;
        }
        Ok(())
    }

    fn seek(&self, scene: &mut Scene, fps: Fps) {
        let Some(local) = self.local else {
            return;
        };
        if let Some(bridge) = &self.bridge {
            bridge.render(scene, FrameIndex(local.unsigned_abs()), fps);
        }
        for child in &self.children {
            child.seek(scene, fps);
        }
    }

    fn teardown(&mut self, scene: &mut Scene) {
        if self.element.is_none() {
            return;
        }
        for child in &mut self.children {
            child.teardown(scene);
        }
        if let Some(bridge) = &mut self.bridge {
            bridge.unmount(scene);
            bridge.scope_mut().detach();
        }
        if let Some(el) = self.element.take()
            && let Err(e) = scene.remove(el)
        {
            tracing::warn!(path = %self.path, error = %e, "element vanished before teardown");
        }
        self.local = None;
        tracing::trace!(path = %self.path, "subtree unmounted");
    }

    fn collect(&self, scene: &Scene, out: &mut Vec<ElementSnapshot>) {
        let Some(id) = self.element else {
            return;
        };
        if let Some(el) = scene.get(id) {
            out.push(ElementSnapshot {
                path: self.path.clone(),
                tag: el.tag.clone(),
                name: el.name.clone(),
                text: el.text.clone(),
                props: el.props.clone(),
                transform: scene.transform(id).to_affine().as_coeffs(),
            });
        }
        for child in &self.children {
            child.collect(scene, out);
        }
    }

    fn build_count(&self) -> u64 {
        self.bridge.as_ref().map_or(0, TimelineBridge::build_count)
            + self.children.iter().map(Self::build_count).sum::<u64>()
    }

    fn mounted_bridges(&self) -> usize {
        usize::from(self.bridge.as_ref().is_some_and(TimelineBridge::is_mounted))
            + self
                .children
                .iter()
                .map(Self::mounted_bridges)
                .sum::<usize>()
    }
}

/// A composition mounted into its own [`Scene`], ready to render frames.
///
/// Every node with a timeline gets one [`TimelineBridge`] scoped to that node. Sequence windows
/// decide which subtrees exist on a frame: entering a window inserts the subtree and mounts its
/// bridges, leaving it unmounts them and removes the elements. The snapshot for a frame depends
/// only on the frame, not on which frames were rendered before.
pub struct Instance {
    id: String,
    video: VideoConfig,
    scene: Scene,
    root: NodeRt,
}

impl std::fmt::Debug for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Instance")
            .field("id", &self.id)
            .field("video", &self.video)
            .field("elements", &self.scene.len())
            .finish()
    }
}

impl Instance {
    #[tracing::instrument(skip(def), fields(id = %def.id))]
    pub fn new(def: &CompositionDef) -> TweenreelResult<Self> {
        def.validate()?;
        Ok(Self::from_validated(def))
    }

    pub(crate) fn from_validated(def: &CompositionDef) -> Self {
        Self {
            id: def.id.clone(),
            video: def.video_config(),
            scene: Scene::new(),
            root: NodeRt::build(&def.root, String::new()),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn video_config(&self) -> VideoConfig {
        self.video
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Total timeline factory invocations across all bridges.
    pub fn build_count(&self) -> u64 {
        self.root.build_count()
    }

    pub fn mounted_bridges(&self) -> usize {
        self.root.mounted_bridges()
    }

    /// Mount what `frame` needs, seek every live timeline, and snapshot the scene.
    #[tracing::instrument(level = "debug", skip(self), fields(id = %self.id, frame = frame.0))]
    pub fn render_frame(&mut self, frame: FrameIndex) -> TweenreelResult<FrameSnapshot> {
        if frame.0 >= self.video.duration_in_frames {
            return Err(TweenreelError::validation(format!(
                "frame {} is outside composition '{}' ({} frames)",
                frame.0, self.id, self.video.duration_in_frames
            )));
        }
        let f = i64::try_from(frame.0)
            .map_err(|_| TweenreelError::validation("frame index does not fit in i64"))?;

        self.root.sync_structure(&mut self.scene, None, 0, f)?;
        self.root.sync_bridges(&mut self.scene)?;
        self.root.seek(&mut self.scene, self.video.fps);

        let mut elements = Vec::with_capacity(self.scene.len());
        self.root.collect(&self.scene, &mut elements);
        Ok(FrameSnapshot { frame, elements })
    }

    /// Tear down every bridge and element. A later render mounts everything afresh.
    pub fn unmount(&mut self) {
        self.root.teardown(&mut self.scene);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/instance.rs"]
mod tests;
