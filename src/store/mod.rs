//! Persistence gateway for the farm records.
//!
//! The analytics and scheduling code never touches storage directly;
//! it receives read-only snapshots through the [`FarmStore`] trait, so
//! a different backend can be substituted without touching any of the
//! derivation logic. Two implementations ship: a single-document JSON
//! file store and a volatile in-memory store used by tests.

use crate::models::{
    Block, Farm, FertilizerRecord, GrowthRecord, HarvestRecord, IrrigationRecord, PestRecord,
    TaskSchedule, Tree,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Errors from the storage layer.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read data file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write data file {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed data file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// The whole farm dataset as one document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FarmData {
    #[serde(default)]
    pub farms: Vec<Farm>,
    #[serde(default)]
    pub blocks: Vec<Block>,
    #[serde(default)]
    pub trees: Vec<Tree>,
    #[serde(default)]
    pub growth_records: Vec<GrowthRecord>,
    #[serde(default)]
    pub fertilizer_records: Vec<FertilizerRecord>,
    #[serde(default)]
    pub irrigation_records: Vec<IrrigationRecord>,
    #[serde(default)]
    pub pest_records: Vec<PestRecord>,
    #[serde(default)]
    pub harvest_records: Vec<HarvestRecord>,
    #[serde(default)]
    pub tasks: Vec<TaskSchedule>,
}

impl FarmData {
    /// Next id for the given prefix, e.g. `next_id("tree")` -> "tree-4"
    /// when "tree-3" is the highest existing tree id.
    pub fn next_id(&self, prefix: &str) -> String {
        let max = self
            .all_ids()
            .filter_map(|id| id.strip_prefix(prefix)?.strip_prefix('-'))
            .filter_map(|n| n.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        format!("{}-{}", prefix, max + 1)
    }

    fn all_ids(&self) -> impl Iterator<Item = &str> {
        self.farms
            .iter()
            .map(|f| f.id.as_str())
            .chain(self.blocks.iter().map(|b| b.id.as_str()))
            .chain(self.trees.iter().map(|t| t.id.as_str()))
            .chain(self.tasks.iter().map(|t| t.id.as_str()))
    }

    pub fn find_tree(&self, id: &str) -> Option<&Tree> {
        self.trees.iter().find(|t| t.id == id)
    }

    /// Look a tree up by its human-readable code.
    pub fn find_tree_by_code(&self, code: &str) -> Option<&Tree> {
        self.trees.iter().find(|t| t.tree_code == code)
    }

    pub fn find_tree_by_code_mut(&mut self, code: &str) -> Option<&mut Tree> {
        self.trees.iter_mut().find(|t| t.tree_code == code)
    }

    /// Delete a tree and everything referencing it: all five record
    /// collections plus tasks attached to the tree. Returns the number
    /// of records and tasks removed alongside the tree, or `None` when
    /// no tree has that id.
    pub fn remove_tree(&mut self, tree_id: &str) -> Option<usize> {
        let before = self.trees.len();
        self.trees.retain(|t| t.id != tree_id);
        if self.trees.len() == before {
            return None;
        }

        let mut removed = 0;
        removed += retain_count(&mut self.growth_records, |r| r.tree_id != tree_id);
        removed += retain_count(&mut self.fertilizer_records, |r| r.tree_id != tree_id);
        removed += retain_count(&mut self.irrigation_records, |r| r.tree_id != tree_id);
        removed += retain_count(&mut self.pest_records, |r| r.tree_id != tree_id);
        removed += retain_count(&mut self.harvest_records, |r| r.tree_id != tree_id);
        removed += retain_count(&mut self.tasks, |t| t.tree_id.as_deref() != Some(tree_id));
        Some(removed)
    }

    pub fn find_task_mut(&mut self, id: &str) -> Option<&mut TaskSchedule> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    pub fn find_block(&self, id: &str) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }
}

fn retain_count<T>(items: &mut Vec<T>, keep: impl FnMut(&T) -> bool) -> usize {
    let before = items.len();
    items.retain(keep);
    before - items.len()
}

/// Read/write access to the farm dataset.
pub trait FarmStore {
    /// Current snapshot of the dataset.
    fn data(&self) -> &FarmData;

    /// Mutable access for record creation and updates.
    fn data_mut(&mut self) -> &mut FarmData;

    /// Flush pending mutations to the backend.
    fn commit(&mut self) -> Result<(), StoreError>;
}

/// File-backed store: the dataset lives in one JSON document, loaded on
/// open and rewritten on commit.
pub struct JsonStore {
    path: PathBuf,
    data: FarmData,
}

impl JsonStore {
    /// Open the store at `path`. A missing file yields an empty
    /// dataset; a present but malformed file is an error.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            debug!("No data file at {}, starting empty", path.display());
            return Ok(Self {
                path: path.to_path_buf(),
                data: FarmData::default(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|source| StoreError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let data: FarmData =
            serde_json::from_str(&content).map_err(|source| StoreError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        debug!(
            "Loaded {} trees, {} tasks from {}",
            data.trees.len(),
            data.tasks.len(),
            path.display()
        );
        Ok(Self {
            path: path.to_path_buf(),
            data,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FarmStore for JsonStore {
    fn data(&self) -> &FarmData {
        &self.data
    }

    fn data_mut(&mut self) -> &mut FarmData {
        &mut self.data
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.data).map_err(|source| {
            StoreError::Parse {
                path: self.path.clone(),
                source,
            }
        })?;
        std::fs::write(&self.path, json).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;
        info!("Saved data file: {}", self.path.display());
        Ok(())
    }
}

/// Volatile store. Commits succeed and persist nothing.
#[derive(Default)]
pub struct MemoryStore {
    data: FarmData,
}

impl MemoryStore {
    pub fn new(data: FarmData) -> Self {
        Self { data }
    }
}

impl FarmStore for MemoryStore {
    fn data(&self) -> &FarmData {
        &self.data
    }

    fn data_mut(&mut self) -> &mut FarmData {
        &mut self.data
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        Ok(())
    }
}
