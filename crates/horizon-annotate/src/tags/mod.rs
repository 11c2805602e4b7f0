//! Control and layout tags of a labeling document.
//!
//! Every node of a [`Document`](crate::Document) tree is a [`Tag`]. Labels
//! are leaves; labels containers govern the labels below them; every other
//! element of the labeling config becomes a [`View`] that only groups its
//! children.

mod label;
mod labels;
mod view;

pub use label::{Label, LabelAttrs, ToggleOutcome};
pub use labels::{
    BrushLabels, Choice, EllipseLabels, HyperTextLabels, KeyPointLabels, LabelContainer,
    LabelGroup, LabelGroupRef, Labels, LabelsKind, PolygonLabels, RectangleLabels, ShapeStyle,
};
pub use view::View;

pub(crate) use label::toggle_selected;

use horizon_annotate_core::Object;

/// A node of the labeling document tree.
#[derive(Debug)]
pub enum Tag {
    View(View),
    Labels(Labels),
    EllipseLabels(EllipseLabels),
    RectangleLabels(RectangleLabels),
    PolygonLabels(PolygonLabels),
    KeyPointLabels(KeyPointLabels),
    BrushLabels(BrushLabels),
    HyperTextLabels(HyperTextLabels),
    Label(Label),
}

impl Tag {
    /// The label payload, if this tag is a label.
    pub fn as_label(&self) -> Option<&Label> {
        match self {
            Tag::Label(label) => Some(label),
            _ => None,
        }
    }

    /// The container capability, if this tag governs labels.
    pub fn as_label_container(&self) -> Option<&dyn LabelContainer> {
        match self {
            Tag::Labels(c) => Some(c),
            Tag::EllipseLabels(c) => Some(c),
            Tag::RectangleLabels(c) => Some(c),
            Tag::PolygonLabels(c) => Some(c),
            Tag::KeyPointLabels(c) => Some(c),
            Tag::BrushLabels(c) => Some(c),
            Tag::HyperTextLabels(c) => Some(c),
            Tag::View(_) | Tag::Label(_) => None,
        }
    }

    /// Whether this tag governs labels.
    pub fn is_label_container(&self) -> bool {
        self.as_label_container().is_some()
    }

    /// The name this tag is registered under in the document tree.
    pub(crate) fn display_name(&self) -> String {
        match self {
            Tag::View(view) => view.name().unwrap_or_default().to_string(),
            Tag::Label(label) => label.value().unwrap_or_default().to_string(),
            container => container
                .as_label_container()
                .map(|c| c.group().name().to_string())
                .unwrap_or_default(),
        }
    }
}

impl Object for Tag {
    fn type_name(&self) -> &'static str {
        match self {
            Tag::View(_) => "View",
            Tag::Label(_) => "Label",
            container => container
                .as_label_container()
                .map_or("Labels", |c| c.kind().tag_name()),
        }
    }
}

impl From<View> for Tag {
    fn from(view: View) -> Self {
        Tag::View(view)
    }
}

impl From<Label> for Tag {
    fn from(label: Label) -> Self {
        Tag::Label(label)
    }
}

impl From<Labels> for Tag {
    fn from(labels: Labels) -> Self {
        Tag::Labels(labels)
    }
}

impl From<EllipseLabels> for Tag {
    fn from(labels: EllipseLabels) -> Self {
        Tag::EllipseLabels(labels)
    }
}

impl From<RectangleLabels> for Tag {
    fn from(labels: RectangleLabels) -> Self {
        Tag::RectangleLabels(labels)
    }
}

impl From<PolygonLabels> for Tag {
    fn from(labels: PolygonLabels) -> Self {
        Tag::PolygonLabels(labels)
    }
}

impl From<KeyPointLabels> for Tag {
    fn from(labels: KeyPointLabels) -> Self {
        Tag::KeyPointLabels(labels)
    }
}

impl From<BrushLabels> for Tag {
    fn from(labels: BrushLabels) -> Self {
        Tag::BrushLabels(labels)
    }
}

impl From<HyperTextLabels> for Tag {
    fn from(labels: HyperTextLabels) -> Self {
        Tag::HyperTextLabels(labels)
    }
}
