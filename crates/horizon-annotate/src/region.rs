//! Annotation regions and their label assignments.

use std::collections::BTreeMap;

use slotmap::new_key_type;

new_key_type! {
    /// Identifier of a region within a [`Completion`](crate::Completion).
    pub struct RegionId;
}

/// Snapshot of a labels container's selection, handed to a region after a
/// toggle so it can reconcile its own assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSelection {
    /// Name of the labels container.
    pub group: String,
    /// Resolved values of the selected labels, in tree order.
    pub values: Vec<String>,
}

/// An annotated span or area of the underlying data.
///
/// The region keeps, per labels container, the values currently assigned to
/// it. Geometry and the data it points into belong to the object tags and
/// are not modelled here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Region {
    to_name: String,
    labels: BTreeMap<String, Vec<String>>,
}

impl Region {
    /// Create an unlabeled region on the object tag named `to_name`.
    pub fn new(to_name: impl Into<String>) -> Self {
        Self {
            to_name: to_name.into(),
            labels: BTreeMap::new(),
        }
    }

    /// Name of the object tag this region annotates.
    pub fn to_name(&self) -> &str {
        &self.to_name
    }

    /// Values assigned by the container named `group`.
    pub fn labels(&self, group: &str) -> &[String] {
        self.labels.get(group).map(Vec::as_slice).unwrap_or_default()
    }

    /// Whether any container currently assigns at least one value.
    pub fn is_labeled(&self) -> bool {
        self.labels.values().any(|values| !values.is_empty())
    }

    /// Replace the assignment for one container with its current selection.
    ///
    /// An empty selection is stored as such: the region keeps no label from
    /// that container.
    pub fn update_single_state(&mut self, selection: &LabelSelection) {
        tracing::debug!(
            target: "horizon_annotate::region",
            group = %selection.group,
            values = ?selection.values,
            "reconciling region labels"
        );
        self.labels
            .insert(selection.group.clone(), selection.values.clone());
    }
}
