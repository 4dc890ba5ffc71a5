use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::{
    composition::model::CompositionDef,
    foundation::error::{TweenreelError, TweenreelResult},
};

/// On-disk project file: `{ "compositions": [ ... ] }`.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct ProjectDef {
    pub compositions: Vec<CompositionDef>,
}

/// Validated, id-indexed set of compositions.
///
/// Ids are unique; registration order is kept for listing.
#[derive(Clone, Debug, Default)]
pub struct CompositionRegistry {
    comps: Vec<CompositionDef>,
    by_id: BTreeMap<String, usize>,
}

impl CompositionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_reader<R: std::io::Read>(r: R) -> TweenreelResult<Self> {
        let project: ProjectDef = serde_json::from_reader(r)
            .map_err(|e| TweenreelError::serde(format!("parse project JSON: {e}")))?;
        Self::from_project(project)
    }

    pub fn from_json(json: &str) -> TweenreelResult<Self> {
        Self::from_reader(json.as_bytes())
    }

    pub fn from_path(path: impl AsRef<Path>) -> TweenreelResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            TweenreelError::validation(format!("open project JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    #[tracing::instrument(skip(project), fields(count = project.compositions.len()))]
    pub fn from_project(project: ProjectDef) -> TweenreelResult<Self> {
        let mut reg = Self::new();
        for def in project.compositions {
            reg.register(def)?;
        }
        Ok(reg)
    }

    /// Validate and add `def`. Duplicate ids are rejected.
    pub fn register(&mut self, def: CompositionDef) -> TweenreelResult<()> {
        def.validate()?;
        if self.by_id.contains_key(&def.id) {
            return Err(TweenreelError::validation(format!(
                "duplicate composition id '{}'",
                def.id
            )));
        }
        self.by_id.insert(def.id.clone(), self.comps.len());
        self.comps.push(def);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&CompositionDef> {
        self.by_id.get(id).map(|&i| &self.comps[i])
    }

    /// Like [`get`](Self::get), but an unknown id is a configuration error.
    pub fn require(&self, id: &str) -> TweenreelResult<&CompositionDef> {
        self.get(id).ok_or_else(|| {
            TweenreelError::config(format!(
                "no composition '{id}' (known: {})",
                self.ids().collect::<Vec<_>>().join(", ")
            ))
        })
    }

    /// Ids in registration order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.comps.iter().map(|c| c.id.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompositionDef> {
        self.comps.iter()
    }

    pub fn len(&self) -> usize {
        self.comps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comps.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composition/registry.rs"]
mod tests;
