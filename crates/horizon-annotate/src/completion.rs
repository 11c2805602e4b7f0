//! Tasks and completions.
//!
//! A [`Task`] carries the data being annotated; a [`Completion`] is one
//! annotation pass over it, holding the regions created so far and which of
//! them is currently highlighted.

use serde::Deserialize;
use serde_json::Value;
use slotmap::SlotMap;

use crate::error::{Error, Result};
use crate::region::{Region, RegionId};

/// A unit of work: an id plus the data object label templates read from.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Task {
    pub id: u64,
    #[serde(default)]
    pub data: Value,
}

impl Task {
    /// Create a task from its id and data object.
    pub fn new(id: u64, data: Value) -> Self {
        Self { id, data }
    }

    /// Parse a task from JSON of the form `{"id": 1, "data": {...}}`.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::config(format!("invalid task JSON: {e}")))
    }
}

/// One annotation pass over a task.
#[derive(Debug)]
pub struct Completion {
    regions: SlotMap<RegionId, Region>,
    highlighted: Option<RegionId>,
    editable: bool,
}

impl Default for Completion {
    fn default() -> Self {
        Self::new()
    }
}

impl Completion {
    /// Create an empty, editable completion.
    pub fn new() -> Self {
        Self {
            regions: SlotMap::with_key(),
            highlighted: None,
            editable: true,
        }
    }

    /// Whether user interaction may change labels.
    pub fn is_editable(&self) -> bool {
        self.editable
    }

    /// Lock or unlock the completion for editing.
    pub fn set_editable(&mut self, editable: bool) {
        self.editable = editable;
    }

    /// Add a region and return its id.
    pub fn add_region(&mut self, region: Region) -> RegionId {
        self.regions.insert(region)
    }

    /// Remove a region, clearing the highlight if it pointed at it.
    pub fn remove_region(&mut self, id: RegionId) -> Option<Region> {
        if self.highlighted == Some(id) {
            self.highlighted = None;
        }
        self.regions.remove(id)
    }

    /// Borrow a region.
    pub fn region(&self, id: RegionId) -> Option<&Region> {
        self.regions.get(id)
    }

    /// Iterate over all regions.
    pub fn regions(&self) -> impl Iterator<Item = (RegionId, &Region)> + '_ {
        self.regions.iter()
    }

    /// Make `id` the highlighted region. Returns `false` for unknown ids.
    pub fn highlight(&mut self, id: RegionId) -> bool {
        if self.regions.contains_key(id) {
            self.highlighted = Some(id);
            true
        } else {
            false
        }
    }

    /// Clear the highlight.
    pub fn unhighlight(&mut self) {
        self.highlighted = None;
    }

    /// The region currently under interaction, if any.
    pub fn highlighted(&self) -> Option<RegionId> {
        self.highlighted
    }

    /// Mutable access to the highlighted region.
    pub fn highlighted_mut(&mut self) -> Option<&mut Region> {
        self.highlighted.and_then(|id| self.regions.get_mut(id))
    }
}
