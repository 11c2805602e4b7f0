//! The `<Label>` tag: one selectable classification value.
//!
//! ```xml
//! <View>
//!   <Labels name="type" toName="txt-1">
//!     <Label alias="B" value="Brand" />
//!     <Label alias="P" value="Product" />
//!   </Labels>
//!   <Text name="txt-1" value="$text" />
//! </View>
//! ```
//!
//! A label's configured `value` is a template; its resolved value is
//! recomputed from the task data on every task load. A label without an
//! explicit background gets a color derived from its value the first time
//! one is known, and keeps it for the rest of its life.

use horizon_annotate_core::{ObjectId, ObjectTree, Property, Signal};
use serde_json::Value;

use super::{LabelGroupRef, Tag};
use crate::color::{color_for, Background};
use crate::completion::Completion;
use crate::error::{Error, Result};
use crate::template::{resolve, TemplateEvaluator};

/// Attributes of a `<Label>` as written in the labeling config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelAttrs {
    /// Label text, possibly a template such as `"$category"`.
    pub value: Option<String>,
    /// Whether the label starts out selected.
    pub selected: bool,
    pub alias: Option<String>,
    /// Keyboard shortcut; allocated automatically when absent.
    pub hotkey: Option<String>,
    /// Show the alias next to the label text.
    pub show_alias: bool,
    /// CSS style of the alias.
    pub alias_style: String,
    /// Text size hint.
    pub size: String,
    /// Background of an active label; derived from the value when absent.
    pub background: Option<String>,
    /// Text color of an active label.
    pub selected_color: String,
}

impl Default for LabelAttrs {
    fn default() -> Self {
        Self {
            value: None,
            selected: false,
            alias: None,
            hotkey: None,
            show_alias: false,
            alias_style: "opacity: 0.6".to_string(),
            size: "medium".to_string(),
            background: None,
            selected_color: "white".to_string(),
        }
    }
}

impl LabelAttrs {
    /// Default attributes with the given value.
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::default()
        }
    }
}

/// Result of a toggle request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The label was the only one assigned to the highlighted region and
    /// stayed selected.
    Kept,
    /// The label is now selected.
    Selected,
    /// The label is now unselected.
    Deselected,
}

/// A selectable tag representing one classification value.
#[derive(Debug)]
pub struct Label {
    value: Option<String>,
    resolved_value: Property<String>,
    selected: Property<bool>,
    alias: Option<String>,
    hotkey: Property<Option<String>>,
    show_alias: bool,
    alias_style: String,
    size: String,
    background: Property<Background>,
    selected_color: String,

    /// Emitted with the new state whenever the selection changes.
    pub selected_changed: Signal<bool>,
    /// Emitted with the new resolved value whenever it changes.
    pub value_changed: Signal<String>,
}

impl Label {
    /// Create a label from its config attributes.
    ///
    /// Unless the config gave an explicit background, a color is derived
    /// right away from the static value.
    pub fn new(attrs: LabelAttrs) -> Self {
        let background = attrs
            .background
            .map_or(Background::Unset, Background::Explicit);

        let label = Self {
            value: attrs.value,
            resolved_value: Property::new(String::new()),
            selected: Property::new(attrs.selected),
            alias: attrs.alias,
            hotkey: Property::new(attrs.hotkey),
            show_alias: attrs.show_alias,
            alias_style: attrs.alias_style,
            size: attrs.size,
            background: Property::new(background),
            selected_color: attrs.selected_color,
            selected_changed: Signal::new(),
            value_changed: Signal::new(),
        };

        let seed = label.resolved_value.with(|resolved| {
            if resolved.is_empty() {
                label.value.clone().unwrap_or_default()
            } else {
                resolved.clone()
            }
        });
        label.update_background_color(&seed);
        label
    }

    /// The configured (template) value.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// The value resolved against the current task; `""` before the first task load.
    pub fn resolved_value(&self) -> String {
        self.resolved_value.get()
    }

    pub fn is_selected(&self) -> bool {
        self.selected.get()
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn hotkey(&self) -> Option<String> {
        self.hotkey.get()
    }

    pub fn show_alias(&self) -> bool {
        self.show_alias
    }

    pub fn alias_style(&self) -> &str {
        &self.alias_style
    }

    pub fn size(&self) -> &str {
        &self.size
    }

    pub fn background(&self) -> Background {
        self.background.get()
    }

    pub fn selected_color(&self) -> &str {
        &self.selected_color
    }

    /// Set the selection state directly, bypassing the container policy.
    ///
    /// Returns `true` if the state changed.
    pub(crate) fn set_selected(&self, selected: bool) -> bool {
        let changed = self.selected.set(selected);
        if changed {
            self.selected_changed.emit(selected);
        }
        changed
    }

    pub(crate) fn set_hotkey(&self, hotkey: impl Into<String>) {
        self.hotkey.set(Some(hotkey.into()));
    }

    /// Give the label an explicit background, replacing any derived one.
    pub fn set_background(&self, css: impl Into<String>) {
        self.background.set(Background::Explicit(css.into()));
    }

    /// Recompute the resolved value from task data.
    ///
    /// A missing value or a failed evaluation resolves to `""`. Idempotent:
    /// the result depends only on the configured value and `data`.
    pub fn update_value(&self, data: &Value, evaluator: &dyn TemplateEvaluator) {
        let resolved = resolve(evaluator, self.value.as_deref(), data);
        if self.resolved_value.set(resolved.clone()) {
            self.value_changed.emit(resolved.clone());
        }
        self.update_background_color(&resolved);
    }

    /// Derive the background from `seed` if no color was chosen yet.
    ///
    /// Returns `true` if the background was assigned by this call.
    pub(crate) fn update_background_color(&self, seed: &str) -> bool {
        self.background
            .set_if(Background::is_unset, Background::Derived(color_for(seed)))
    }
}

/// Toggle `label` according to its container's policy.
///
/// 1. The governing container is found by walking up from the label. A
///    label that container does not govern is rejected before anything
///    changes.
/// 2. With a highlighted region, re-clicking the region's only label is
///    ignored so the region never loses its last label. With two or more
///    selected labels the check does not apply.
/// 3. Multiple choice flips the label. Single choice unselects everything
///    and then selects the label if it was not selected before.
/// 4. The highlighted region, if any, takes over the container's new
///    selection.
pub(crate) fn toggle_selected(
    tree: &ObjectTree<Tag>,
    completion: &mut Completion,
    label_id: ObjectId,
) -> Result<ToggleOutcome> {
    let group = LabelGroupRef::resolve(tree, label_id)?;
    let label = tree
        .get(label_id)
        .and_then(Tag::as_label)
        .ok_or(Error::NotALabel(label_id))?;
    if !group.labels().iter().any(|&(id, _)| id == label_id) {
        return Err(Error::ForeignLabel {
            label: label_id,
            container: group.id(),
        });
    }
    let was_selected = label.is_selected();
    let has_highlight = completion.highlighted().is_some();

    let _span = tracing::debug_span!(
        target: "horizon_annotate::label",
        "toggle",
        label = ?label_id,
        group = group.name(),
        was_selected
    )
    .entered();

    if has_highlight {
        if let [(_, only)] = group.selected_labels().as_slice() {
            if only.resolved_value() == label.resolved_value() {
                tracing::debug!(target: "horizon_annotate::label", "keeping last label of highlighted region");
                return Ok(ToggleOutcome::Kept);
            }
        }
    }

    if group.should_be_unselected() {
        group.unselect_all();
        if !was_selected {
            group.select(label_id)?;
        }
    } else {
        group.set_selected(label_id, !was_selected)?;
    }

    if let Some(region) = completion.highlighted_mut() {
        region.update_single_state(&group.selection());
    }

    let outcome = if was_selected {
        ToggleOutcome::Deselected
    } else {
        ToggleOutcome::Selected
    };
    tracing::debug!(target: "horizon_annotate::label", ?outcome, "label toggled");
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::DollarTemplate;
    use parking_lot::Mutex;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_defaults() {
        let label = Label::new(LabelAttrs::with_value("Brand"));
        assert_eq!(label.value(), Some("Brand"));
        assert_eq!(label.resolved_value(), "");
        assert!(!label.is_selected());
        assert_eq!(label.alias(), None);
        assert_eq!(label.hotkey(), None);
        assert!(!label.show_alias());
        assert_eq!(label.alias_style(), "opacity: 0.6");
        assert_eq!(label.size(), "medium");
        assert_eq!(label.selected_color(), "white");
    }

    #[test]
    fn test_creation_derives_background_from_value() {
        let label = Label::new(LabelAttrs::with_value("Brand"));
        assert_eq!(label.background(), Background::Derived(color_for("Brand")));
    }

    #[test]
    fn test_creation_without_value_uses_empty_seed() {
        let label = Label::new(LabelAttrs::default());
        assert_eq!(label.background(), Background::Derived(color_for("")));
    }

    #[test]
    fn test_explicit_background_is_kept() {
        let label = Label::new(LabelAttrs {
            background: Some("#ff0000".into()),
            ..LabelAttrs::with_value("Brand")
        });
        label.update_value(&json!({}), &DollarTemplate);
        assert_eq!(label.background(), Background::Explicit("#ff0000".into()));
        assert!(!label.update_background_color("anything"));
    }

    #[test]
    fn test_background_assigned_once() {
        let label = Label::new(LabelAttrs::with_value("$kind"));
        let derived = label.background();
        assert_eq!(derived, Background::Derived(color_for("$kind")));

        label.update_value(&json!({"kind": "Person"}), &DollarTemplate);
        label.update_value(&json!({"kind": "Place"}), &DollarTemplate);
        assert_eq!(label.background(), derived);
    }

    #[test]
    fn test_update_value_resolves_template() {
        let label = Label::new(LabelAttrs::with_value("$kind"));
        label.update_value(&json!({"kind": "Person"}), &DollarTemplate);
        assert_eq!(label.resolved_value(), "Person");

        label.update_value(&json!({"kind": "Place"}), &DollarTemplate);
        assert_eq!(label.resolved_value(), "Place");
    }

    #[test]
    fn test_update_value_is_idempotent() {
        let label = Label::new(LabelAttrs::with_value("$kind"));
        let data = json!({"kind": "Person"});
        let changes = Arc::new(Mutex::new(Vec::new()));
        let changes_clone = changes.clone();
        label.value_changed.connect(move |value| changes_clone.lock().push(value.clone()));

        label.update_value(&data, &DollarTemplate);
        let background = label.background();
        label.update_value(&data, &DollarTemplate);

        assert_eq!(label.resolved_value(), "Person");
        assert_eq!(label.background(), background);
        assert_eq!(*changes.lock(), vec!["Person".to_string()]);
    }

    #[test]
    fn test_failed_template_resolves_empty() {
        let label = Label::new(LabelAttrs::with_value("$missing"));
        label.update_value(&json!({"kind": "Person"}), &DollarTemplate);
        assert_eq!(label.resolved_value(), "");
    }

    #[test]
    fn test_set_selected_emits_on_change_only() {
        let label = Label::new(LabelAttrs::with_value("Brand"));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        label.selected_changed.connect(move |&s| seen_clone.lock().push(s));

        assert!(label.set_selected(true));
        assert!(!label.set_selected(true));
        assert!(label.set_selected(false));
        assert_eq!(*seen.lock(), vec![true, false]);
    }

    #[test]
    fn test_set_background_overrides_derived() {
        let label = Label::new(LabelAttrs::with_value("Brand"));
        label.set_background("teal");
        assert_eq!(label.background(), Background::Explicit("teal".into()));
        assert_ne!(label.background().css(), Some(color_for("Brand").to_hex()));
        assert_eq!(label.background().css().as_deref(), Some("teal"));
    }

    #[test]
    fn test_toggle_rejects_ungoverned_label_without_side_effects() {
        use crate::region::Region;
        use crate::tags::{LabelGroup, Labels};

        let mut tree = ObjectTree::new();
        let group = tree.insert(Tag::from(Labels::new(LabelGroup::new("type", "txt"))));
        let a = Label::new(LabelAttrs {
            selected: true,
            ..LabelAttrs::with_value("A")
        });
        a.update_value(&json!({}), &DollarTemplate);
        let a = tree.insert_child(group, Tag::Label(a)).unwrap();
        let b = Label::new(LabelAttrs::with_value("B"));
        b.update_value(&json!({}), &DollarTemplate);
        let b = tree.insert_child(a, Tag::Label(b)).unwrap();

        let mut completion = Completion::new();
        let region = completion.add_region(Region::new("txt"));
        completion.highlight(region);

        let result = toggle_selected(&tree, &mut completion, b);
        assert!(matches!(
            result,
            Err(Error::ForeignLabel { label, container }) if label == b && container == group
        ));
        assert!(tree.get(a).and_then(Tag::as_label).unwrap().is_selected());
        assert!(!tree.get(b).and_then(Tag::as_label).unwrap().is_selected());
        assert!(!completion.region(region).unwrap().is_labeled());
    }

    #[test]
    fn test_preselected_and_hotkey_from_attrs() {
        let label = Label::new(LabelAttrs {
            selected: true,
            hotkey: Some("b".into()),
            ..LabelAttrs::with_value("Brand")
        });
        assert!(label.is_selected());
        assert_eq!(label.hotkey().as_deref(), Some("b"));
        label.set_hotkey("x");
        assert_eq!(label.hotkey().as_deref(), Some("x"));
    }
}
