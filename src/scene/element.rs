use std::collections::BTreeMap;

use crate::{
    animation::value::PropValue,
    foundation::core::{Transform2D, Vec2},
    foundation::error::{TweenreelError, TweenreelResult},
    scene::selector::Selector,
};

/// Generational handle to an element in a [`Scene`].
///
/// A handle outlives nothing: once its element is removed every lookup through it fails, even if
/// the slot is reused.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct ElementId {
    index: u32,
    generation: u32,
}

/// Authoring description of an element before insertion.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ElementDesc {
    pub tag: String,
    pub name: Option<String>,
    pub classes: Vec<String>,
    pub text: Option<String>,
    pub props: BTreeMap<String, PropValue>,
}

impl ElementDesc {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn prop(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }
}

/// A live element: its description plus tree links.
#[derive(Clone, Debug)]
pub struct Element {
    pub tag: String,
    pub name: Option<String>,
    pub classes: Vec<String>,
    pub text: Option<String>,
    pub props: BTreeMap<String, PropValue>,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

impl Element {
    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    pub fn children(&self) -> &[ElementId] {
        &self.children
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    element: Option<Element>,
}

/// Element arena. Stands in for the layout/styling engine: it only stores properties.
#[derive(Debug, Default)]
pub struct Scene {
    slots: Vec<Slot>,
    free: Vec<u32>,
    roots: Vec<ElementId>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `desc` as the last child of `parent` (or as a new root).
    pub fn insert(
        &mut self,
        parent: Option<ElementId>,
        desc: ElementDesc,
    ) -> TweenreelResult<ElementId> {
        self.insert_at(parent, usize::MAX, desc)
    }

    /// Insert `desc` at sibling position `index` (clamped to the number of siblings).
    pub fn insert_at(
        &mut self,
        parent: Option<ElementId>,
        index: usize,
        desc: ElementDesc,
    ) -> TweenreelResult<ElementId> {
        if let Some(p) = parent
            && !self.contains(p)
        {
            return Err(TweenreelError::validation(
                "cannot insert under a removed element",
            ));
        }

        let element = Element {
            tag: desc.tag,
            name: desc.name,
            classes: desc.classes,
            text: desc.text,
            props: desc.props,
            parent,
            children: Vec::new(),
        };

        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.element = Some(element);
                ElementId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = u32::try_from(self.slots.len())
                    .map_err(|_| TweenreelError::validation("scene element limit exceeded"))?;
                self.slots.push(Slot {
                    generation: 0,
                    element: Some(element),
                });
                ElementId {
                    index,
                    generation: 0,
                }
            }
        };

        let siblings = match parent {
            Some(p) => self.get_mut(p).map(|pe| &mut pe.children),
            None => Some(&mut self.roots),
        };
        if let Some(siblings) = siblings {
            siblings.insert(index.min(siblings.len()), id);
        }
        Ok(id)
    }

    /// Remove `id` and its whole subtree. Handles into the subtree become stale.
    pub fn remove(&mut self, id: ElementId) -> TweenreelResult<()> {
        let parent = self
            .get(id)
            .ok_or_else(|| TweenreelError::validation("element already removed"))?
            .parent;
        match parent {
            Some(p) => {
                if let Some(pe) = self.get_mut(p) {
                    pe.children.retain(|c| *c != id);
                }
            }
            None => self.roots.retain(|r| *r != id),
        }

        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            let slot = &mut self.slots[cur.index as usize];
            if let Some(el) = slot.element.take() {
                stack.extend(el.children);
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(cur.index);
            }
        }
        Ok(())
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.element.as_ref()
    }

    fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.element.as_mut()
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.element.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn prop(&self, id: ElementId, key: &str) -> Option<&PropValue> {
        self.get(id)?.props.get(key)
    }

    /// Returns `false` (and writes nothing) when `id` is stale.
    pub fn set_prop(&mut self, id: ElementId, key: &str, value: PropValue) -> bool {
        match self.get_mut(id) {
            Some(el) => {
                match el.props.get_mut(key) {
                    Some(slot) => *slot = value,
                    None => {
                        el.props.insert(key.to_string(), value);
                    }
                }
                true
            }
            None => false,
        }
    }

    pub fn remove_prop(&mut self, id: ElementId, key: &str) -> bool {
        match self.get_mut(id) {
            Some(el) => el.props.remove(key).is_some(),
            None => false,
        }
    }

    /// `true` if `id` is `root` or one of its descendants.
    pub fn is_within(&self, root: ElementId, id: ElementId) -> bool {
        let mut cur = Some(id);
        while let Some(c) = cur {
            if c == root {
                return self.contains(root);
            }
            cur = self.get(c).and_then(|e| e.parent);
        }
        false
    }

    /// Descendants of `root` in document (pre-)order, excluding `root` itself.
    pub fn descendants(&self, root: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        if let Some(el) = self.get(root) {
            let mut stack: Vec<ElementId> = el.children.iter().rev().copied().collect();
            while let Some(cur) = stack.pop() {
                out.push(cur);
                if let Some(e) = self.get(cur) {
                    stack.extend(e.children.iter().rev().copied());
                }
            }
        }
        out
    }

    /// All live elements in document order.
    pub fn walk(&self) -> Vec<ElementId> {
        let mut out = Vec::with_capacity(self.len());
        for root in &self.roots {
            out.push(*root);
            out.extend(self.descendants(*root));
        }
        out
    }

    /// Descendants of `root` matching `selector`, in document order.
    pub fn select(&self, root: ElementId, selector: &Selector) -> Vec<ElementId> {
        self.descendants(root)
            .into_iter()
            .filter(|id| self.get(*id).is_some_and(|e| selector.matches(e)))
            .collect()
    }

    /// Placement read from `x`, `y`, `rotation` (degrees), `scale`, `scaleX`, `scaleY`.
    pub fn transform(&self, id: ElementId) -> Transform2D {
        let num = |key: &str, default: f64| {
            self.prop(id, key)
                .and_then(PropValue::as_number)
                .unwrap_or(default)
        };
        let scale = num("scale", 1.0);
        Transform2D {
            translate: Vec2::new(num("x", 0.0), num("y", 0.0)),
            rotation_rad: num("rotation", 0.0).to_radians(),
            scale: Vec2::new(scale * num("scaleX", 1.0), scale * num("scaleY", 1.0)),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/element.rs"]
mod tests;
