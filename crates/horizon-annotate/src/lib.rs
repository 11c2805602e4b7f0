//! Horizon Annotate - labeling controls for data annotation interfaces.
//!
//! This is the main umbrella crate. It builds a labeling [`Document`] from an
//! XML labeling config and implements label selection: toggling under a
//! container's single/multiple choice policy, reconciling the highlighted
//! region, resolving templated label values against task data and deriving
//! stable label colors.
//!
//! # Example
//!
//! ```
//! use horizon_annotate::{Document, Region, Task};
//! use serde_json::json;
//!
//! let mut doc = Document::from_config(
//!     r#"<View>
//!          <Labels name="type" toName="txt-1">
//!            <Label alias="B" value="Brand" />
//!            <Label alias="P" value="Product" />
//!          </Labels>
//!          <Text name="txt-1" value="$text" />
//!        </View>"#,
//! )?;
//! doc.update_values(&Task::new(1, json!({"text": "Hello"})));
//!
//! let region = doc.completion_mut().add_region(Region::new("txt-1"));
//! doc.completion_mut().highlight(region);
//!
//! let labels = doc.labels("type")?;
//! doc.click(labels[0])?;
//! doc.click(labels[1])?;
//!
//! assert_eq!(doc.selected_values("type")?, vec!["Product"]);
//! assert_eq!(doc.completion().region(region).unwrap().labels("type"), ["Product"]);
//! # Ok::<(), horizon_annotate::Error>(())
//! ```

pub use horizon_annotate_core::*;

pub mod color;
mod completion;
mod config;
mod document;
mod error;
pub mod hotkey;
mod region;
mod settings;
pub mod tags;
pub mod template;

pub use color::{color_for, Background, Color};
pub use completion::{Completion, Task};
pub use document::Document;
pub use error::{Error, Result};
pub use hotkey::HotkeyAllocator;
pub use region::{LabelSelection, Region, RegionId};
pub use settings::Settings;
pub use tags::{
    Choice, Label, LabelAttrs, LabelContainer, LabelGroup, LabelGroupRef, LabelsKind, Tag,
    ToggleOutcome,
};
pub use template::{DollarTemplate, TemplateError, TemplateEvaluator};
