//! Logging and debugging facilities for Horizon Annotate.
//!
//! This module provides:
//! - Target names for the `tracing` instrumentation used across the crates
//! - Debug visualization for object trees
//! - Performance tracing hooks
//!
//! # Tracing Integration
//!
//! Horizon Annotate uses the `tracing` crate for instrumentation. To see logs,
//! install a subscriber in the hosting application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("horizon_annotate=debug")
//!     .init();
//! ```

use std::fmt::Write as FmtWrite;

use crate::object::{Object, ObjectId, ObjectResult, ObjectTree};

/// Span names used throughout Horizon Annotate for tracing.
pub mod span_names {
    /// Label toggle span.
    pub const TOGGLE: &str = "horizon_annotate::toggle";
    /// Task value resolution span.
    pub const UPDATE_VALUES: &str = "horizon_annotate::update_values";
    /// Config loading span.
    pub const CONFIG: &str = "horizon_annotate::config";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "horizon_annotate_core";
    /// Object tree target.
    pub const OBJECT: &str = "horizon_annotate_core::object";
    /// Signal system target.
    pub const SIGNAL: &str = "horizon_annotate_core::signal";
    /// Label selection state machine target.
    pub const LABEL: &str = "horizon_annotate::label";
    /// Labeling config target.
    pub const CONFIG: &str = "horizon_annotate::config";
    /// Document-level events (clicks, hotkeys, task loads).
    pub const DOCUMENT: &str = "horizon_annotate::document";
}

/// Style options for object tree visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeStyle {
    /// ASCII characters for tree branches.
    Ascii,
    /// Unicode box-drawing characters.
    #[default]
    Unicode,
}

/// Configuration for object tree debug output.
#[derive(Debug, Clone)]
pub struct TreeFormatOptions {
    /// The style of tree visualization.
    pub style: TreeStyle,
    /// Whether to show object IDs.
    pub show_ids: bool,
    /// Whether to show type names.
    pub show_types: bool,
    /// Maximum depth to traverse (None for unlimited).
    pub max_depth: Option<usize>,
}

impl Default for TreeFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            show_ids: true,
            show_types: true,
            max_depth: None,
        }
    }
}

impl TreeFormatOptions {
    /// Create options for minimal output.
    pub fn minimal() -> Self {
        Self {
            show_ids: false,
            show_types: false,
            ..Default::default()
        }
    }
}

/// Debug utility for visualizing an [`ObjectTree`].
#[derive(Debug, Clone, Default)]
pub struct ObjectTreeDebug {
    options: TreeFormatOptions,
}

impl ObjectTreeDebug {
    /// Create a new debug visualizer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a debug visualizer with custom options.
    pub fn with_options(options: TreeFormatOptions) -> Self {
        Self { options }
    }

    /// Format every root of the tree and its descendants.
    pub fn format_all<T: Object>(&self, tree: &ObjectTree<T>) -> ObjectResult<String> {
        let mut output = String::new();
        let _ = writeln!(output, "Object Tree ({} total objects):", tree.object_count());

        let roots: Vec<ObjectId> = tree.root_objects().collect();
        if roots.is_empty() {
            output.push_str("  (empty)\n");
        }
        for root in roots {
            self.format_subtree_into(tree, root, 0, &mut Vec::new(), &mut output)?;
        }
        Ok(output)
    }

    /// Format a subtree starting from a specific node.
    pub fn format_subtree<T: Object>(
        &self,
        tree: &ObjectTree<T>,
        root: ObjectId,
    ) -> ObjectResult<String> {
        let mut output = String::new();
        self.format_subtree_into(tree, root, 0, &mut Vec::new(), &mut output)?;
        Ok(output)
    }

    /// `last_flags[d]` records whether the ancestor at depth `d + 1` was the
    /// last of its siblings, which decides between a branch and a blank.
    fn format_subtree_into<T: Object>(
        &self,
        tree: &ObjectTree<T>,
        id: ObjectId,
        depth: usize,
        last_flags: &mut Vec<bool>,
        output: &mut String,
    ) -> ObjectResult<()> {
        if self.options.max_depth.is_some_and(|max| depth > max) {
            return Ok(());
        }

        output.push_str(&self.build_prefix(last_flags));

        let name = tree.object_name(id)?;
        output.push_str(if name.is_empty() { "(unnamed)" } else { name });

        if self.options.show_ids {
            let _ = write!(output, " [{:?}]", id);
        }
        if self.options.show_types {
            let _ = write!(output, " ({})", tree.type_name(id)?);
        }
        output.push('\n');

        let children = tree.children(id)?;
        let child_count = children.len();
        for (i, &child_id) in children.iter().enumerate() {
            last_flags.push(i + 1 == child_count);
            self.format_subtree_into(tree, child_id, depth + 1, last_flags, output)?;
            last_flags.pop();
        }
        Ok(())
    }

    fn build_prefix(&self, last_flags: &[bool]) -> String {
        let Some((&is_last, ancestors)) = last_flags.split_last() else {
            return String::new();
        };

        let (branch, tee, corner) = match self.options.style {
            TreeStyle::Ascii => ("|   ", "+-- ", "`-- "),
            TreeStyle::Unicode => ("\u{2502}   ", "\u{251c}\u{2500}\u{2500} ", "\u{2514}\u{2500}\u{2500} "),
        };

        let mut prefix = String::new();
        for &ancestor_last in ancestors {
            prefix.push_str(if ancestor_last { "    " } else { branch });
        }
        prefix.push_str(if is_last { corner } else { tee });
        prefix
    }
}

/// A guard that keeps a tracing span entered until dropped.
///
/// Used to time whole operations such as a task load.
#[derive(Debug)]
pub struct PerfSpan {
    _span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: "horizon_annotate::perf", "perf", operation = name);
        Self {
            _span: span.entered(),
        }
    }
}
