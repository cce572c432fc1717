//! Per-source cache of reducible meshes
//!
//! Building the graph and queue is the expensive part of a reduction, so a
//! host keeps one [`ReducibleMesh`] per source mesh and only moves its
//! quality level afterwards. Sources are keyed by whatever identifies them
//! on the host side (an asset id, a path...).

use crate::config::ReducerConfig;
use crate::info::MeshInfo;
use crate::reducible::{clamp_reduction_percent, ReducibleMesh};
use polyreduce_core::{Result, TriangleMesh};
use rayon::prelude::*;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::hash::Hash;
use tracing::info;

#[derive(Debug)]
pub struct MeshRegistry<K> {
    config: ReducerConfig,
    meshes: HashMap<K, ReducibleMesh>,
}

impl<K: Eq + Hash> Default for MeshRegistry<K> {
    fn default() -> Self {
        Self::new(ReducerConfig::default())
    }
}

impl<K: Eq + Hash> MeshRegistry<K> {
    pub fn new(config: ReducerConfig) -> Self {
        Self {
            config,
            meshes: HashMap::new(),
        }
    }

    pub fn config(&self) -> &ReducerConfig {
        &self.config
    }

    /// Entry for `key`, building it from `source()` on first use.
    ///
    /// A new entry starts at the configured reduction percentage. `source`
    /// is only called when the key is missing.
    pub fn get_or_insert_with<F>(&mut self, key: K, source: F) -> Result<&mut ReducibleMesh>
    where
        F: FnOnce() -> TriangleMesh,
    {
        match self.meshes.entry(key) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let mesh = ReducibleMesh::from_config(source(), &self.config)?;
                info!(mesh = %mesh.info(), "registered mesh");
                Ok(entry.insert(mesh))
            }
        }
    }

    pub fn get(&self, key: &K) -> Option<&ReducibleMesh> {
        self.meshes.get(key)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut ReducibleMesh> {
        self.meshes.get_mut(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.meshes.contains_key(key)
    }

    pub fn remove(&mut self, key: &K) -> Option<ReducibleMesh> {
        self.meshes.remove(key)
    }

    /// Drop every cached mesh, for instance when the host reloads its scene.
    pub fn clear(&mut self) {
        self.meshes.clear();
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.meshes.keys()
    }

    pub fn infos(&self) -> impl Iterator<Item = (&K, MeshInfo)> {
        self.meshes.iter().map(|(k, m)| (k, m.info()))
    }
}

impl<K: Eq + Hash + Send + Sync> MeshRegistry<K> {
    /// Move every registered mesh to `percent`, in parallel.
    ///
    /// Becomes the default for meshes registered afterwards.
    pub fn set_reduction_all(&mut self, percent: f32) -> Result<()> {
        let percent = clamp_reduction_percent(percent);

        self.meshes
            .par_iter_mut()
            .try_for_each(|(_, mesh)| mesh.set_reduction_percent(percent))?;

        self.config.reduction_percent = percent;
        Ok(())
    }
}
