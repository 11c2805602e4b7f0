//! Object tree for Horizon Annotate.
//!
//! Provides arena-backed ownership for annotation tags:
//! - Stable object identifiers via slotmap keys
//! - Parent-child ownership with cascade destroy
//! - Object naming and lookup
//! - Ancestor walks used for capability resolution (a label finding the
//!   container that governs it)
//!
//! # Key Types
//!
//! - [`Object`] - Trait implemented by every payload stored in the tree
//! - [`ObjectId`] - Unique stable identifier for each node
//! - [`ObjectTree`] - The arena owning every node and its relationships
//!
//! # Example
//!
//! ```
//! use horizon_annotate_core::{Object, ObjectTree};
//!
//! enum Node {
//!     Group,
//!     Item,
//! }
//!
//! impl Object for Node {
//!     fn type_name(&self) -> &'static str {
//!         match self {
//!             Node::Group => "Group",
//!             Node::Item => "Item",
//!         }
//!     }
//! }
//!
//! let mut tree = ObjectTree::new();
//! let group = tree.insert(Node::Group);
//! let item = tree.insert_child(group, Node::Item).unwrap();
//!
//! let owner = tree
//!     .find_ancestor(item, |node| matches!(node, Node::Group))
//!     .unwrap();
//! assert_eq!(owner, Some(group));
//! ```

use std::fmt;

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// A unique identifier for a node in an [`ObjectTree`].
    ///
    /// `ObjectId`s are stable handles that remain valid even as the tree changes.
    /// They become invalid when the node is destroyed, and are never reused
    /// for a different node of the same tree.
    pub struct ObjectId;
}

impl ObjectId {
    /// Convert the ObjectId to a raw u64 value.
    ///
    /// The raw value can be converted back using [`ObjectId::from_raw`].
    #[inline]
    pub fn as_raw(self) -> u64 {
        use slotmap::Key;
        self.data().as_ffi()
    }

    /// Create an ObjectId from a raw u64 value.
    ///
    /// This does not check whether the id exists in any tree.
    #[inline]
    pub fn from_raw(raw: u64) -> Self {
        Self::from(slotmap::KeyData::from_ffi(raw))
    }
}

/// Errors that can occur during object tree operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectError {
    /// The object ID is invalid or has been destroyed.
    InvalidObjectId,
    /// Attempted to set an object as its own parent/ancestor.
    CircularParentage,
}

impl fmt::Display for ObjectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidObjectId => write!(f, "Invalid or destroyed object ID"),
            Self::CircularParentage => {
                write!(f, "Cannot set an object as its own parent or ancestor")
            }
        }
    }
}

impl std::error::Error for ObjectError {}

/// Result type for object operations.
pub type ObjectResult<T> = std::result::Result<T, ObjectError>;

/// Trait implemented by payloads stored in an [`ObjectTree`].
pub trait Object {
    /// Short type name used by debug output and tracing.
    fn type_name(&self) -> &'static str;
}

/// Internal data stored in the arena for each node.
struct ObjectData<T> {
    /// Human-readable name for debugging and lookup.
    name: String,
    /// Parent node (if any).
    parent: Option<ObjectId>,
    /// Child nodes (owned), in insertion order.
    children: Vec<ObjectId>,
    payload: T,
}

/// Arena owning a forest of nodes and their parent-child relationships.
///
/// Destroying a node destroys its whole subtree, so a container that owns
/// a set of children takes them with it.
pub struct ObjectTree<T> {
    objects: SlotMap<ObjectId, ObjectData<T>>,
    /// Parentless nodes, in the order they became roots.
    roots: Vec<ObjectId>,
}

impl<T> ObjectTree<T> {
    /// Create a new empty tree.
    pub fn new() -> Self {
        Self {
            objects: SlotMap::with_key(),
            roots: Vec::new(),
        }
    }

    /// Insert a new root node and return its ID.
    pub fn insert(&mut self, payload: T) -> ObjectId {
        let id = self.objects.insert(ObjectData {
            name: String::new(),
            parent: None,
            children: Vec::new(),
            payload,
        });
        self.roots.push(id);
        tracing::trace!(target: "horizon_annotate_core::object", ?id, "inserted object");
        id
    }

    /// Insert a new node as the last child of `parent`.
    pub fn insert_child(&mut self, parent: ObjectId, payload: T) -> ObjectResult<ObjectId> {
        if !self.objects.contains_key(parent) {
            return Err(ObjectError::InvalidObjectId);
        }
        let id = self.insert(payload);
        self.set_parent(id, Some(parent))?;
        Ok(id)
    }

    /// Remove a node and all its descendants, returning how many nodes were removed.
    #[tracing::instrument(skip(self), target = "horizon_annotate_core::object", level = "trace")]
    pub fn destroy(&mut self, id: ObjectId) -> ObjectResult<usize> {
        let descendants = self.collect_descendants(id)?;
        tracing::trace!(target: "horizon_annotate_core::object", ?id, descendant_count = descendants.len(), "destroying subtree");

        match self.objects.get(id).and_then(|d| d.parent) {
            Some(parent_id) => {
                if let Some(parent_data) = self.objects.get_mut(parent_id) {
                    parent_data.children.retain(|&child| child != id);
                }
            }
            None => self.roots.retain(|&root| root != id),
        }

        let removed = descendants.len() + 1;
        for child_id in descendants {
            self.objects.remove(child_id);
        }
        self.objects.remove(id);

        Ok(removed)
    }

    /// Collect all descendant IDs, children before parents.
    fn collect_descendants(&self, id: ObjectId) -> ObjectResult<Vec<ObjectId>> {
        let mut result = Vec::new();
        self.collect_descendants_recursive(id, &mut result)?;
        Ok(result)
    }

    fn collect_descendants_recursive(
        &self,
        id: ObjectId,
        result: &mut Vec<ObjectId>,
    ) -> ObjectResult<()> {
        let data = self.objects.get(id).ok_or(ObjectError::InvalidObjectId)?;
        for &child_id in &data.children {
            self.collect_descendants_recursive(child_id, result)?;
            result.push(child_id);
        }
        Ok(())
    }

    /// Check if a node exists in the tree.
    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(id)
    }

    /// Borrow the payload of a node.
    pub fn get(&self, id: ObjectId) -> Option<&T> {
        self.objects.get(id).map(|d| &d.payload)
    }

    /// Mutably borrow the payload of a node.
    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut T> {
        self.objects.get_mut(id).map(|d| &mut d.payload)
    }

    /// Set the parent of a node.
    ///
    /// This handles removing from the old parent and appending to the new one.
    /// Passing `None` makes the node a root.
    pub fn set_parent(&mut self, id: ObjectId, new_parent: Option<ObjectId>) -> ObjectResult<()> {
        if !self.objects.contains_key(id) {
            return Err(ObjectError::InvalidObjectId);
        }

        if let Some(parent_id) = new_parent {
            if !self.objects.contains_key(parent_id) {
                return Err(ObjectError::InvalidObjectId);
            }
            if self.is_ancestor_of(id, parent_id) {
                return Err(ObjectError::CircularParentage);
            }
        }

        let old_parent = self.objects.get(id).and_then(|d| d.parent);
        match old_parent {
            Some(old_parent_id) => {
                if let Some(parent_data) = self.objects.get_mut(old_parent_id) {
                    parent_data.children.retain(|&child| child != id);
                }
            }
            None => self.roots.retain(|&root| root != id),
        }
        if new_parent.is_none() {
            self.roots.push(id);
        }

        if let Some(data) = self.objects.get_mut(id) {
            data.parent = new_parent;
        }

        if let Some(parent_id) = new_parent {
            if let Some(parent_data) = self.objects.get_mut(parent_id) {
                parent_data.children.push(id);
            }
        }

        Ok(())
    }

    /// Check if `potential_ancestor` is `id` or one of its ancestors.
    fn is_ancestor_of(&self, potential_ancestor: ObjectId, id: ObjectId) -> bool {
        let mut current = Some(id);
        while let Some(current_id) = current {
            if current_id == potential_ancestor {
                return true;
            }
            current = self.objects.get(current_id).and_then(|d| d.parent);
        }
        false
    }

    /// Get the parent of a node.
    pub fn parent(&self, id: ObjectId) -> ObjectResult<Option<ObjectId>> {
        self.objects
            .get(id)
            .map(|d| d.parent)
            .ok_or(ObjectError::InvalidObjectId)
    }

    /// Get the children of a node.
    pub fn children(&self, id: ObjectId) -> ObjectResult<&[ObjectId]> {
        self.objects
            .get(id)
            .map(|d| d.children.as_slice())
            .ok_or(ObjectError::InvalidObjectId)
    }

    /// Get the node's name.
    pub fn object_name(&self, id: ObjectId) -> ObjectResult<&str> {
        self.objects
            .get(id)
            .map(|d| d.name.as_str())
            .ok_or(ObjectError::InvalidObjectId)
    }

    /// Set the node's name.
    pub fn set_object_name(&mut self, id: ObjectId, name: impl Into<String>) -> ObjectResult<()> {
        self.objects
            .get_mut(id)
            .map(|d| d.name = name.into())
            .ok_or(ObjectError::InvalidObjectId)
    }

    /// Find a direct child by name.
    pub fn find_child_by_name(&self, id: ObjectId, name: &str) -> ObjectResult<Option<ObjectId>> {
        let children = self.children(id)?;
        Ok(children
            .iter()
            .copied()
            .find(|&child_id| self.objects.get(child_id).is_some_and(|d| d.name == name)))
    }

    /// Get all ancestors of a node, nearest first.
    pub fn ancestors(&self, id: ObjectId) -> ObjectResult<Vec<ObjectId>> {
        let mut result = Vec::new();
        let mut current = self.parent(id)?;
        while let Some(ancestor_id) = current {
            result.push(ancestor_id);
            current = self.objects.get(ancestor_id).and_then(|d| d.parent);
        }
        Ok(result)
    }

    /// Walk the ownership chain upward and return the nearest ancestor whose
    /// payload satisfies `predicate`.
    ///
    /// The node itself is not considered.
    pub fn find_ancestor<F>(&self, id: ObjectId, predicate: F) -> ObjectResult<Option<ObjectId>>
    where
        F: Fn(&T) -> bool,
    {
        let mut current = self.parent(id)?;
        while let Some(ancestor_id) = current {
            let data = self
                .objects
                .get(ancestor_id)
                .ok_or(ObjectError::InvalidObjectId)?;
            if predicate(&data.payload) {
                return Ok(Some(ancestor_id));
            }
            current = data.parent;
        }
        Ok(None)
    }

    /// All nodes of the subtree rooted at `id` in depth-first pre-order,
    /// including `id` itself.
    pub fn depth_first_preorder(&self, id: ObjectId) -> ObjectResult<Vec<ObjectId>> {
        let mut result = Vec::new();
        self.depth_first_preorder_recursive(id, &mut result)?;
        Ok(result)
    }

    fn depth_first_preorder_recursive(
        &self,
        id: ObjectId,
        result: &mut Vec<ObjectId>,
    ) -> ObjectResult<()> {
        let data = self.objects.get(id).ok_or(ObjectError::InvalidObjectId)?;
        result.push(id);
        for &child_id in &data.children {
            self.depth_first_preorder_recursive(child_id, result)?;
        }
        Ok(())
    }

    /// Get the index of a node among its siblings.
    ///
    /// Returns `None` for root nodes.
    pub fn sibling_index(&self, id: ObjectId) -> ObjectResult<Option<usize>> {
        let Some(parent_id) = self.parent(id)? else {
            return Ok(None);
        };
        let siblings = self.children(parent_id)?;
        Ok(siblings.iter().position(|&sibling| sibling == id))
    }

    /// Get the number of nodes in the tree.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Iterate over all root nodes (nodes with no parent), oldest first.
    pub fn root_objects(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.roots.iter().copied()
    }

    /// Iterate over every node and its payload in arena order.
    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &T)> + '_ {
        self.objects.iter().map(|(id, data)| (id, &data.payload))
    }
}

impl<T: Object> ObjectTree<T> {
    /// Get the type name of a node's payload.
    pub fn type_name(&self, id: ObjectId) -> ObjectResult<&'static str> {
        self.get(id)
            .map(Object::type_name)
            .ok_or(ObjectError::InvalidObjectId)
    }
}

impl<T> Default for ObjectTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for ObjectTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectTree")
            .field("object_count", &self.objects.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum TestNode {
        Container(&'static str),
        Leaf(i32),
    }

    impl Object for TestNode {
        fn type_name(&self) -> &'static str {
            match self {
                TestNode::Container(_) => "Container",
                TestNode::Leaf(_) => "Leaf",
            }
        }
    }

    #[test]
    fn test_object_creation() {
        let mut tree = ObjectTree::new();
        let id = tree.insert(TestNode::Leaf(42));
        assert!(tree.contains(id));
        assert_eq!(tree.get(id), Some(&TestNode::Leaf(42)));
        assert_eq!(tree.type_name(id).unwrap(), "Leaf");
    }

    #[test]
    fn test_object_name() {
        let mut tree = ObjectTree::new();
        let id = tree.insert(TestNode::Leaf(1));
        tree.set_object_name(id, "brand").unwrap();
        assert_eq!(tree.object_name(id).unwrap(), "brand");
    }

    #[test]
    fn test_parent_child() {
        let mut tree = ObjectTree::new();
        let parent = tree.insert(TestNode::Container("group"));
        let child = tree.insert_child(parent, TestNode::Leaf(1)).unwrap();

        assert_eq!(tree.parent(child).unwrap(), Some(parent));
        assert_eq!(tree.children(parent).unwrap(), &[child]);
        assert_eq!(tree.sibling_index(child).unwrap(), Some(0));
        assert_eq!(tree.sibling_index(parent).unwrap(), None);
    }

    #[test]
    fn test_find_child_by_name() {
        let mut tree = ObjectTree::new();
        let parent = tree.insert(TestNode::Container("group"));
        let child = tree.insert_child(parent, TestNode::Leaf(1)).unwrap();
        tree.set_object_name(child, "product").unwrap();

        assert_eq!(tree.find_child_by_name(parent, "product").unwrap(), Some(child));
        assert_eq!(tree.find_child_by_name(parent, "missing").unwrap(), None);
    }

    #[test]
    fn test_cascade_destroy() {
        let mut tree = ObjectTree::new();
        let root = tree.insert(TestNode::Container("view"));
        let group = tree.insert_child(root, TestNode::Container("labels")).unwrap();
        let a = tree.insert_child(group, TestNode::Leaf(1)).unwrap();
        let b = tree.insert_child(group, TestNode::Leaf(2)).unwrap();

        assert_eq!(tree.destroy(group).unwrap(), 3);
        assert!(!tree.contains(group));
        assert!(!tree.contains(a));
        assert!(!tree.contains(b));
        assert!(tree.children(root).unwrap().is_empty());
        assert_eq!(tree.object_count(), 1);
    }

    #[test]
    fn test_destroy_invalid_id() {
        let mut tree: ObjectTree<TestNode> = ObjectTree::new();
        let id = tree.insert(TestNode::Leaf(1));
        tree.destroy(id).unwrap();
        assert_eq!(tree.destroy(id), Err(ObjectError::InvalidObjectId));
    }

    #[test]
    fn test_circular_parentage_rejected() {
        let mut tree = ObjectTree::new();
        let a = tree.insert(TestNode::Container("a"));
        let b = tree.insert_child(a, TestNode::Container("b")).unwrap();

        assert_eq!(tree.set_parent(a, Some(b)), Err(ObjectError::CircularParentage));
        assert_eq!(tree.set_parent(a, Some(a)), Err(ObjectError::CircularParentage));
    }

    #[test]
    fn test_reparenting() {
        let mut tree = ObjectTree::new();
        let first = tree.insert(TestNode::Container("first"));
        let second = tree.insert(TestNode::Container("second"));
        let leaf = tree.insert_child(first, TestNode::Leaf(7)).unwrap();

        tree.set_parent(leaf, Some(second)).unwrap();
        assert!(tree.children(first).unwrap().is_empty());
        assert_eq!(tree.children(second).unwrap(), &[leaf]);
    }

    #[test]
    fn test_ancestors_nearest_first() {
        let mut tree = ObjectTree::new();
        let root = tree.insert(TestNode::Container("root"));
        let mid = tree.insert_child(root, TestNode::Container("mid")).unwrap();
        let leaf = tree.insert_child(mid, TestNode::Leaf(0)).unwrap();

        assert_eq!(tree.ancestors(leaf).unwrap(), vec![mid, root]);
    }

    #[test]
    fn test_find_ancestor_skips_self_and_non_matching() {
        let mut tree = ObjectTree::new();
        let root = tree.insert(TestNode::Container("labels"));
        let view = tree.insert_child(root, TestNode::Container("view")).unwrap();
        let leaf = tree.insert_child(view, TestNode::Leaf(0)).unwrap();

        let found = tree
            .find_ancestor(leaf, |node| matches!(node, TestNode::Container("labels")))
            .unwrap();
        assert_eq!(found, Some(root));

        let none = tree
            .find_ancestor(root, |node| matches!(node, TestNode::Container(_)))
            .unwrap();
        assert_eq!(none, None);
    }

    #[test]
    fn test_depth_first_preorder() {
        let mut tree = ObjectTree::new();
        let root = tree.insert(TestNode::Container("root"));
        let a = tree.insert_child(root, TestNode::Container("a")).unwrap();
        let a1 = tree.insert_child(a, TestNode::Leaf(1)).unwrap();
        let b = tree.insert_child(root, TestNode::Leaf(2)).unwrap();

        assert_eq!(tree.depth_first_preorder(root).unwrap(), vec![root, a, a1, b]);
    }

    #[test]
    fn test_object_id_raw_roundtrip() {
        let mut tree = ObjectTree::new();
        let id = tree.insert(TestNode::Leaf(3));
        assert_eq!(ObjectId::from_raw(id.as_raw()), id);
    }

    #[test]
    fn test_root_objects() {
        let mut tree = ObjectTree::new();
        let a = tree.insert(TestNode::Container("a"));
        let _child = tree.insert_child(a, TestNode::Leaf(1)).unwrap();
        let b = tree.insert(TestNode::Container("b"));

        assert_eq!(tree.root_objects().collect::<Vec<_>>(), vec![a, b]);
    }

    #[test]
    fn test_root_order_survives_slot_reuse() {
        let mut tree = ObjectTree::new();
        let first = tree.insert(TestNode::Container("first"));
        let second = tree.insert(TestNode::Container("second"));
        tree.destroy(first).unwrap();
        // The freed slot is handed to the newest root.
        let third = tree.insert(TestNode::Container("third"));

        assert_eq!(tree.root_objects().collect::<Vec<_>>(), vec![second, third]);
    }

    #[test]
    fn test_reparenting_updates_roots() {
        let mut tree = ObjectTree::new();
        let a = tree.insert(TestNode::Container("a"));
        let b = tree.insert(TestNode::Container("b"));
        tree.set_parent(a, Some(b)).unwrap();
        assert_eq!(tree.root_objects().collect::<Vec<_>>(), vec![b]);

        tree.set_parent(a, None).unwrap();
        tree.set_parent(a, None).unwrap();
        assert_eq!(tree.root_objects().collect::<Vec<_>>(), vec![b, a]);
    }
}
