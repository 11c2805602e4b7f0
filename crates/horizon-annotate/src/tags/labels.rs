//! Labels containers.
//!
//! A container governs every label below it in the document tree (up to the
//! next nested container). It decides whether its labels are mutually
//! exclusive and is the only place that mutates label selection: labels
//! never reach into their siblings, they go through [`LabelGroupRef`].
//!
//! There is one container type per annotation shape. They share
//! [`LabelGroup`] and expose it through the [`LabelContainer`] capability,
//! which is what a label looks for when it walks up its ownership chain.

use std::fmt;
use std::str::FromStr;

use horizon_annotate_core::{ObjectError, ObjectId, ObjectTree};

use super::{Label, Tag};
use crate::error::{Error, Result};
use crate::region::LabelSelection;

/// Selection policy of a labels container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Choice {
    /// At most one label selected at a time.
    #[default]
    Single,
    /// Any number of labels may be selected.
    Multiple,
}

impl FromStr for Choice {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(Choice::Single),
            "multiple" => Ok(Choice::Multiple),
            other => Err(format!("expected 'single' or 'multiple', got '{other}'")),
        }
    }
}

/// The closed set of container kinds, one per annotation shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelsKind {
    Labels,
    EllipseLabels,
    RectangleLabels,
    PolygonLabels,
    KeyPointLabels,
    BrushLabels,
    HyperTextLabels,
}

impl LabelsKind {
    /// All kinds, in declaration order.
    pub const ALL: [LabelsKind; 7] = [
        LabelsKind::Labels,
        LabelsKind::EllipseLabels,
        LabelsKind::RectangleLabels,
        LabelsKind::PolygonLabels,
        LabelsKind::KeyPointLabels,
        LabelsKind::BrushLabels,
        LabelsKind::HyperTextLabels,
    ];

    /// Element name used in labeling configs.
    pub fn tag_name(self) -> &'static str {
        match self {
            LabelsKind::Labels => "Labels",
            LabelsKind::EllipseLabels => "EllipseLabels",
            LabelsKind::RectangleLabels => "RectangleLabels",
            LabelsKind::PolygonLabels => "PolygonLabels",
            LabelsKind::KeyPointLabels => "KeyPointLabels",
            LabelsKind::BrushLabels => "BrushLabels",
            LabelsKind::HyperTextLabels => "HyperTextLabels",
        }
    }

    /// Look up a kind by element name, ignoring ASCII case.
    pub fn from_tag_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.tag_name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for LabelsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag_name())
    }
}

/// State shared by every container kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelGroup {
    name: String,
    to_name: String,
    choice: Choice,
    show_inline: bool,
}

impl LabelGroup {
    /// Create a single-choice group named `name` that annotates `to_name`.
    pub fn new(name: impl Into<String>, to_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            to_name: to_name.into(),
            choice: Choice::Single,
            show_inline: true,
        }
    }

    /// Set the selection policy.
    pub fn with_choice(mut self, choice: Choice) -> Self {
        self.choice = choice;
        self
    }

    /// Set whether labels render on one line.
    pub fn with_show_inline(mut self, show_inline: bool) -> Self {
        self.show_inline = show_inline;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn to_name(&self) -> &str {
        &self.to_name
    }

    pub fn choice(&self) -> Choice {
        self.choice
    }

    pub fn show_inline(&self) -> bool {
        self.show_inline
    }
}

/// Capability of a tag that governs labels.
pub trait LabelContainer: fmt::Debug + Send + Sync {
    /// Shared container state.
    fn group(&self) -> &LabelGroup;

    /// Which shape this container annotates.
    fn kind(&self) -> LabelsKind;

    /// `true` when selecting a label must unselect the others.
    fn should_be_unselected(&self) -> bool {
        self.group().choice() == Choice::Single
    }
}

/// Stroke and fill defaults for regions drawn with a shape container.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeStyle {
    pub stroke_width: u32,
    pub opacity: f32,
    pub fill_color: Option<String>,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            stroke_width: 1,
            opacity: 0.6,
            fill_color: None,
        }
    }
}

/// Generic labels for text spans.
#[derive(Debug, Clone)]
pub struct Labels {
    pub group: LabelGroup,
}

/// Labels for ellipse regions.
#[derive(Debug, Clone)]
pub struct EllipseLabels {
    pub group: LabelGroup,
    pub style: ShapeStyle,
}

/// Labels for rectangle regions.
#[derive(Debug, Clone)]
pub struct RectangleLabels {
    pub group: LabelGroup,
    pub style: ShapeStyle,
}

/// Labels for polygon regions.
#[derive(Debug, Clone)]
pub struct PolygonLabels {
    pub group: LabelGroup,
    pub style: ShapeStyle,
    /// Vertex handle size: `"small"`, `"medium"` or `"large"`.
    pub point_size: String,
    /// Vertex handle shape: `"circle"` or `"rectangle"`.
    pub point_style: String,
}

/// Labels for key points.
#[derive(Debug, Clone)]
pub struct KeyPointLabels {
    pub group: LabelGroup,
    pub style: ShapeStyle,
}

/// Labels for brush masks.
#[derive(Debug, Clone)]
pub struct BrushLabels {
    pub group: LabelGroup,
}

/// Labels for spans of HTML content.
#[derive(Debug, Clone)]
pub struct HyperTextLabels {
    pub group: LabelGroup,
}

impl Labels {
    pub fn new(group: LabelGroup) -> Self {
        Self { group }
    }
}

impl EllipseLabels {
    pub fn new(group: LabelGroup) -> Self {
        Self {
            group,
            style: ShapeStyle::default(),
        }
    }
}

impl RectangleLabels {
    pub fn new(group: LabelGroup) -> Self {
        Self {
            group,
            style: ShapeStyle::default(),
        }
    }
}

impl PolygonLabels {
    pub fn new(group: LabelGroup) -> Self {
        Self {
            group,
            style: ShapeStyle::default(),
            point_size: "small".to_string(),
            point_style: "circle".to_string(),
        }
    }
}

impl KeyPointLabels {
    pub fn new(group: LabelGroup) -> Self {
        Self {
            group,
            style: ShapeStyle::default(),
        }
    }
}

impl BrushLabels {
    pub fn new(group: LabelGroup) -> Self {
        Self { group }
    }
}

impl HyperTextLabels {
    pub fn new(group: LabelGroup) -> Self {
        Self { group }
    }
}

macro_rules! impl_label_container {
    ($($ty:ident),* $(,)?) => {
        $(
            impl LabelContainer for $ty {
                fn group(&self) -> &LabelGroup {
                    &self.group
                }

                fn kind(&self) -> LabelsKind {
                    LabelsKind::$ty
                }
            }
        )*
    };
}

impl_label_container!(
    Labels,
    EllipseLabels,
    RectangleLabels,
    PolygonLabels,
    KeyPointLabels,
    BrushLabels,
    HyperTextLabels,
);

/// Borrowed view of one container inside a document tree.
///
/// This is the container's API over its labels: reading the selection and
/// changing it. All calls are synchronous; a sequence such as
/// "unselect all, then select one" is complete before the caller continues.
#[derive(Clone, Copy)]
pub struct LabelGroupRef<'a> {
    tree: &'a ObjectTree<Tag>,
    id: ObjectId,
    container: &'a dyn LabelContainer,
}

impl<'a> LabelGroupRef<'a> {
    /// View the container with the given id.
    pub fn new(tree: &'a ObjectTree<Tag>, id: ObjectId) -> Result<Self> {
        let container = tree
            .get(id)
            .ok_or(Error::Object(ObjectError::InvalidObjectId))?
            .as_label_container()
            .ok_or(Error::NotALabelContainer(id))?;
        Ok(Self {
            tree,
            id,
            container,
        })
    }

    /// Find the container governing `label` by walking its ancestors.
    pub fn resolve(tree: &'a ObjectTree<Tag>, label: ObjectId) -> Result<Self> {
        match tree.get(label) {
            Some(Tag::Label(_)) => {}
            Some(_) => return Err(Error::NotALabel(label)),
            None => return Err(Error::Object(ObjectError::InvalidObjectId)),
        }
        let id = tree
            .find_ancestor(label, Tag::is_label_container)?
            .ok_or(Error::NoLabelContainer { label })?;
        Self::new(tree, id)
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn container(&self) -> &'a dyn LabelContainer {
        self.container
    }

    pub fn name(&self) -> &'a str {
        self.container.group().name()
    }

    pub fn should_be_unselected(&self) -> bool {
        self.container.should_be_unselected()
    }

    /// Labels governed by this container, in tree order.
    ///
    /// Labels below a nested container belong to that container instead.
    pub fn labels(&self) -> Vec<(ObjectId, &'a Label)> {
        let mut result = Vec::new();
        self.collect_labels(self.id, &mut result);
        result
    }

    fn collect_labels(&self, id: ObjectId, result: &mut Vec<(ObjectId, &'a Label)>) {
        let Ok(children) = self.tree.children(id) else {
            return;
        };
        for &child in children {
            match self.tree.get(child) {
                Some(Tag::Label(label)) => result.push((child, label)),
                Some(tag) if tag.is_label_container() => {}
                Some(_) => self.collect_labels(child, result),
                None => {}
            }
        }
    }

    /// Governed labels that are currently selected, in tree order.
    pub fn selected_labels(&self) -> Vec<(ObjectId, &'a Label)> {
        self.labels()
            .into_iter()
            .filter(|(_, label)| label.is_selected())
            .collect()
    }

    /// Resolved values of the selected labels.
    pub fn selected_values(&self) -> Vec<String> {
        self.selected_labels()
            .into_iter()
            .map(|(_, label)| label.resolved_value())
            .collect()
    }

    /// Unselect every governed label.
    pub fn unselect_all(&self) {
        for (_, label) in self.labels() {
            label.set_selected(false);
        }
    }

    /// Select one governed label without touching the others.
    pub fn select(&self, label: ObjectId) -> Result<()> {
        self.set_selected(label, true).map(|_| ())
    }

    /// Set the selection of one governed label. Returns `true` if it changed.
    pub fn set_selected(&self, label: ObjectId, selected: bool) -> Result<bool> {
        let (_, target) = self
            .labels()
            .into_iter()
            .find(|(id, _)| *id == label)
            .ok_or(Error::ForeignLabel {
                label,
                container: self.id,
            })?;
        Ok(target.set_selected(selected))
    }

    /// Snapshot of the current selection for region reconciliation.
    pub fn selection(&self) -> LabelSelection {
        LabelSelection {
            group: self.name().to_string(),
            values: self.selected_values(),
        }
    }
}

impl fmt::Debug for LabelGroupRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LabelGroupRef")
            .field("id", &self.id)
            .field("kind", &self.container.kind())
            .field("name", &self.name())
            .finish()
    }
}
