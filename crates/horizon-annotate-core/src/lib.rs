//! Core systems for Horizon Annotate.
//!
//! This crate provides the foundations the annotation tags are built on:
//!
//! - **Object Tree**: Arena-backed parent-child ownership, naming, and
//!   ancestor walks used to resolve which container governs a tag
//! - **Property System**: Reactive properties with change detection
//! - **Signal/Slot System**: Synchronous change notification
//! - **Logging**: Tracing targets, tree dumps, and performance spans
//!
//! # Example
//!
//! ```
//! use horizon_annotate_core::{Object, ObjectTree, Property, Signal};
//!
//! struct Tag {
//!     selected: Property<bool>,
//!     selected_changed: Signal<bool>,
//! }
//!
//! impl Object for Tag {
//!     fn type_name(&self) -> &'static str {
//!         "Tag"
//!     }
//! }
//!
//! let mut tree = ObjectTree::new();
//! let id = tree.insert(Tag {
//!     selected: Property::new(false),
//!     selected_changed: Signal::new(),
//! });
//!
//! let tag = tree.get(id).unwrap();
//! if tag.selected.set(true) {
//!     tag.selected_changed.emit(true);
//! }
//! ```

pub mod logging;
pub mod object;
pub mod property;
pub mod signal;

pub use logging::{ObjectTreeDebug, PerfSpan, TreeFormatOptions, TreeStyle};
pub use object::{Object, ObjectError, ObjectId, ObjectResult, ObjectTree};
pub use property::Property;
pub use signal::{ConnectionGuard, ConnectionId, Signal};
