//! The labeling document: the tag tree of one annotation interface plus the
//! completion being edited.
//!
//! ```
//! use horizon_annotate::{Document, Task, ToggleOutcome};
//! use serde_json::json;
//!
//! let mut doc = Document::from_config(
//!     r#"<View>
//!          <Labels name="type" toName="txt">
//!            <Label value="$first" />
//!            <Label value="Other" />
//!          </Labels>
//!        </View>"#,
//! )?;
//! doc.update_values(&Task::new(1, json!({"first": "Brand"})));
//!
//! let brand = doc.labels("type")?[0];
//! assert_eq!(doc.toggle_selected(brand)?, ToggleOutcome::Selected);
//! assert_eq!(doc.selected_values("type")?, vec!["Brand"]);
//! # Ok::<(), horizon_annotate::Error>(())
//! ```

use horizon_annotate_core::logging::span_names;
use horizon_annotate_core::{ObjectId, ObjectTree, ObjectTreeDebug, PerfSpan};

use crate::completion::{Completion, Task};
use crate::config;
use crate::error::{Error, Result};
use crate::hotkey::HotkeyAllocator;
use crate::settings::Settings;
use crate::tags::{self, Label, LabelContainer, LabelGroupRef, Tag, ToggleOutcome};
use crate::template::{DollarTemplate, TemplateEvaluator};

/// A labeling interface and the completion it edits.
pub struct Document {
    tree: ObjectTree<Tag>,
    root: Option<ObjectId>,
    completion: Completion,
    settings: Settings,
    evaluator: Box<dyn TemplateEvaluator>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// An empty document with default settings.
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            tree: ObjectTree::new(),
            root: None,
            completion: Completion::new(),
            settings,
            evaluator: Box::new(DollarTemplate),
        }
    }

    /// Build a document from a labeling config and assign hotkeys.
    pub fn from_config(xml: &str) -> Result<Self> {
        Self::from_config_with_settings(xml, Settings::default())
    }

    pub fn from_config_with_settings(xml: &str, settings: Settings) -> Result<Self> {
        let _perf = PerfSpan::new(span_names::CONFIG);
        let mut document = Self::with_settings(settings);
        config::load(&mut document, xml)?;
        document.assign_hotkeys();
        Ok(document)
    }

    /// Replace the template evaluator used by [`update_values`](Self::update_values).
    pub fn set_evaluator(&mut self, evaluator: impl TemplateEvaluator + 'static) {
        self.evaluator = Box::new(evaluator);
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// First top-level tag, if any.
    pub fn root(&self) -> Option<ObjectId> {
        self.root
    }

    pub fn tree(&self) -> &ObjectTree<Tag> {
        &self.tree
    }

    pub fn completion(&self) -> &Completion {
        &self.completion
    }

    pub fn completion_mut(&mut self) -> &mut Completion {
        &mut self.completion
    }

    // =========================================================================
    // Building
    // =========================================================================

    /// Add a tag under `parent`, or at the top level when `parent` is `None`.
    ///
    /// The tag is registered in the tree under its display name: a view's
    /// `name`, a container's group name or a label's configured value.
    /// Labels are leaves, so a `parent` that is a label is rejected.
    pub fn add_tag(&mut self, parent: Option<ObjectId>, tag: impl Into<Tag>) -> Result<ObjectId> {
        let tag = tag.into();
        if let Some(parent) = parent.filter(|&p| matches!(self.tree.get(p), Some(Tag::Label(_)))) {
            return Err(Error::NestedInLabel { parent });
        }
        let name = tag.display_name();
        let id = match parent {
            Some(parent) => self.tree.insert_child(parent, tag)?,
            None => {
                let id = self.tree.insert(tag);
                self.root.get_or_insert(id);
                id
            }
        };
        self.tree.set_object_name(id, name)?;
        Ok(id)
    }

    /// Add a labels container.
    pub fn add_labels<C>(&mut self, parent: Option<ObjectId>, container: C) -> Result<ObjectId>
    where
        C: LabelContainer + Into<Tag>,
    {
        self.add_tag(parent, container)
    }

    /// Add a label under `parent`.
    pub fn add_label(&mut self, parent: ObjectId, label: Label) -> Result<ObjectId> {
        self.add_tag(Some(parent), label)
    }

    /// Remove a tag and everything below it. Returns the number of tags removed.
    pub fn destroy(&mut self, id: ObjectId) -> Result<usize> {
        let removed = self.tree.destroy(id)?;
        if self.root == Some(id) {
            self.root = self.tree.root_objects().next();
        }
        Ok(removed)
    }

    /// Give every label without a hotkey the next free key.
    pub fn assign_hotkeys(&mut self) {
        let mut keys = HotkeyAllocator::new();
        let labels = self.label_order();
        for key in labels.iter().filter_map(|(_, label)| label.hotkey()) {
            keys.reserve(&key);
        }
        for (_, label) in labels {
            if label.hotkey().is_none() {
                match keys.next_key() {
                    Some(key) => label.set_hotkey(key),
                    None => break,
                }
            }
        }
    }

    /// Labels in document order.
    fn label_order(&self) -> Vec<(ObjectId, &Label)> {
        let mut labels = Vec::new();
        for root in self.tree.root_objects() {
            let Ok(ids) = self.tree.depth_first_preorder(root) else {
                continue;
            };
            labels.extend(
                ids.into_iter()
                    .filter_map(|id| self.label(id).map(|label| (id, label))),
            );
        }
        labels
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// The label with the given id.
    pub fn label(&self, id: ObjectId) -> Option<&Label> {
        self.tree.get(id).and_then(Tag::as_label)
    }

    /// Handle to the container with the given id.
    pub fn group(&self, id: ObjectId) -> Result<LabelGroupRef<'_>> {
        LabelGroupRef::new(&self.tree, id)
    }

    /// Handle to the container governing `label`.
    pub fn group_of(&self, label: ObjectId) -> Result<LabelGroupRef<'_>> {
        LabelGroupRef::resolve(&self.tree, label)
    }

    /// Handle to the first container named `name`, in document order.
    pub fn find_group(&self, name: &str) -> Option<LabelGroupRef<'_>> {
        self.tree
            .root_objects()
            .filter_map(|root| self.tree.depth_first_preorder(root).ok())
            .flatten()
            .find(|&id| {
                self.tree
                    .get(id)
                    .and_then(Tag::as_label_container)
                    .is_some_and(|c| c.group().name() == name)
            })
            .and_then(|id| self.group(id).ok())
    }

    fn named_group(&self, name: &str) -> Result<LabelGroupRef<'_>> {
        self.find_group(name)
            .ok_or_else(|| Error::config(format!("no labels container named '{name}'")))
    }

    /// Ids of the labels governed by the container named `group`.
    pub fn labels(&self, group: &str) -> Result<Vec<ObjectId>> {
        Ok(self
            .named_group(group)?
            .labels()
            .into_iter()
            .map(|(id, _)| id)
            .collect())
    }

    /// Resolved values of the selected labels of the container named `group`.
    pub fn selected_values(&self, group: &str) -> Result<Vec<String>> {
        Ok(self.named_group(group)?.selected_values())
    }

    /// Render the tag tree for debugging.
    pub fn dump_tree(&self) -> String {
        ObjectTreeDebug::new()
            .format_all(&self.tree)
            .unwrap_or_default()
    }

    // =========================================================================
    // Interaction
    // =========================================================================

    /// Toggle a label under its container's policy.
    pub fn toggle_selected(&mut self, label: ObjectId) -> Result<ToggleOutcome> {
        let _perf = PerfSpan::new(span_names::TOGGLE);
        tags::toggle_selected(&self.tree, &mut self.completion, label)
    }

    /// Set a label's selection directly, without applying the container's
    /// policy or touching any region. Returns `true` if the state changed.
    pub fn set_selected(&mut self, label: ObjectId, selected: bool) -> Result<bool> {
        let label = self.label(label).ok_or(Error::NotALabel(label))?;
        Ok(label.set_selected(selected))
    }

    /// A click on a label. Ignored while the completion is read-only.
    pub fn click(&mut self, label: ObjectId) -> Result<Option<ToggleOutcome>> {
        if !self.completion.is_editable() {
            tracing::debug!(target: "horizon_annotate::document", ?label, "click ignored, completion is read-only");
            return Ok(None);
        }
        self.toggle_selected(label).map(Some)
    }

    /// A hotkey press. Toggles the first label in document order bound to
    /// `key`, if any.
    pub fn on_hotkey(&mut self, key: &str) -> Result<Option<ToggleOutcome>> {
        if !self.settings.enable_hotkeys {
            return Ok(None);
        }
        let target = self.label_order().into_iter().find_map(|(id, label)| {
            label
                .hotkey()
                .filter(|hotkey| hotkey.eq_ignore_ascii_case(key))
                .map(|_| id)
        });
        match target {
            Some(label) => self.toggle_selected(label).map(Some),
            None => Ok(None),
        }
    }

    /// Recompute every label's resolved value from the task data.
    pub fn update_values(&self, task: &Task) {
        let _perf = PerfSpan::new(span_names::UPDATE_VALUES);
        let mut count = 0usize;
        for (_, tag) in self.tree.iter() {
            if let Some(label) = tag.as_label() {
                label.update_value(&task.data, self.evaluator.as_ref());
                count += 1;
            }
        }
        tracing::debug!(target: "horizon_annotate::document", task = task.id, labels = count, "label values updated");
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("objects", &self.tree.object_count())
            .field("root", &self.root)
            .field("completion", &self.completion)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
