//! The mutable, ordered, attributed document tree.

use crate::{Error, QualifiedName, Result};
use indexmap::IndexMap;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// A handle to one element of a document tree.
///
/// Cloning a `Node` clones the handle, not the element: every clone observes
/// the same name, attributes, children, and text. Children are owned by their
/// parent; the parent link is weak and only used for navigation.
///
/// The tree is not synchronized. It is meant to be assembled by one writer
/// and then read; callers that share a tree across threads must wrap it in
/// their own lock.
#[derive(Clone)]
pub struct Node(Rc<RefCell<NodeData>>);

struct NodeData {
    name: QualifiedName,
    attributes: IndexMap<String, String>,
    children: Vec<Node>,
    parent: Weak<RefCell<NodeData>>,
    text: Option<String>,
    /// Set when the node was removed from a parent, cleared when re-attached.
    detached: bool,
}

impl Node {
    /// Create a root element with no attributes, children, or text.
    pub fn new(name: QualifiedName) -> Self {
        Node(Rc::new(RefCell::new(NodeData {
            name,
            attributes: IndexMap::new(),
            children: Vec::new(),
            parent: Weak::new(),
            text: None,
            detached: false,
        })))
    }

    pub fn qualified_name(&self) -> QualifiedName {
        self.0.borrow().name.clone()
    }

    pub fn local_name(&self) -> String {
        self.0.borrow().name.local_name().to_string()
    }

    /// Rename this element in place.
    pub fn set_qualified_name(&self, name: QualifiedName) {
        self.0.borrow_mut().name = name;
    }

    /// Whether two handles refer to the same element.
    pub fn ptr_eq(&self, other: &Node) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    // Attributes

    pub fn attribute(&self, name: &str) -> Option<String> {
        self.0.borrow().attributes.get(name).cloned()
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.0.borrow().attributes.contains_key(name)
    }

    /// Set or remove (`None`) an attribute, returning the previous value.
    ///
    /// Overwriting keeps the attribute's original position.
    pub fn set_attribute(&self, name: &str, value: Option<&str>) -> Option<String> {
        let mut data = self.0.borrow_mut();
        match value {
            Some(value) => data.attributes.insert(name.to_string(), value.to_string()),
            None => data.attributes.shift_remove(name),
        }
    }

    /// All attributes in document order.
    pub fn attributes(&self) -> Vec<(String, String)> {
        self.0
            .borrow()
            .attributes
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    // Text

    pub fn text(&self) -> Option<String> {
        self.0.borrow().text.clone()
    }

    pub fn set_text(&self, text: Option<&str>) {
        self.0.borrow_mut().text = text.map(str::to_string);
    }

    // Children

    /// Child elements in document order.
    pub fn children(&self) -> Vec<Node> {
        self.0.borrow().children.clone()
    }

    pub fn child_count(&self) -> usize {
        self.0.borrow().children.len()
    }

    pub fn child(&self, index: usize) -> Option<Node> {
        self.0.borrow().children.get(index).cloned()
    }

    /// Position of `child` among this element's children.
    pub fn index_of(&self, child: &Node) -> Option<usize> {
        self.0.borrow().children.iter().position(|c| c.ptr_eq(child))
    }

    /// Append `child` as the last child, moving it out of its current parent.
    pub fn append_child(&self, child: &Node) -> Result<()> {
        let len = self.child_count();
        self.insert_child(len, child)
    }

    /// Insert `child` at `index` (clamped to the child count), moving it out of
    /// its current parent.
    pub fn insert_child(&self, index: usize, child: &Node) -> Result<()> {
        self.check_can_adopt(child)?;
        child.unlink();
        child.attach_to(self);
        let mut data = self.0.borrow_mut();
        let index = index.min(data.children.len());
        data.children.insert(index, child.clone());
        Ok(())
    }

    /// Put `new` in the position held by `old`.
    ///
    /// Returns `false` (and changes nothing) when `old` is not a child of this
    /// element. The replaced node is detached.
    pub fn replace_child(&self, old: &Node, new: &Node) -> Result<bool> {
        if self.index_of(old).is_none() {
            return Ok(false);
        }
        if old.ptr_eq(new) {
            return Ok(true);
        }
        self.check_can_adopt(new)?;
        new.unlink();
        // `new` may have been an earlier sibling, so look the slot up again.
        let Some(index) = self.index_of(old) else {
            return Ok(false);
        };
        new.attach_to(self);
        self.0.borrow_mut().children[index] = new.clone();
        old.mark_detached();
        tracing::trace!(
            parent = %self.qualified_name(),
            old = %old.qualified_name(),
            new = %new.qualified_name(),
            index,
            "Replaced child"
        );
        Ok(true)
    }

    /// Remove `child` from this element. Returns whether it was a child.
    pub fn remove_child(&self, child: &Node) -> bool {
        let removed = {
            let mut data = self.0.borrow_mut();
            let before = data.children.len();
            data.children.retain(|c| !c.ptr_eq(child));
            data.children.len() != before
        };
        if removed {
            child.mark_detached();
            tracing::trace!(
                parent = %self.qualified_name(),
                child = %child.qualified_name(),
                "Removed child"
            );
        }
        removed
    }

    // Navigation

    pub fn parent(&self) -> Option<Node> {
        self.0.borrow().parent.upgrade().map(Node)
    }

    /// The topmost ancestor (this node if it has no parent).
    pub fn root(&self) -> Node {
        let mut current = self.clone();
        while let Some(parent) = current.parent() {
            current = parent;
        }
        current
    }

    /// Whether this node was removed from the tree it used to belong to.
    ///
    /// Nodes created as roots are not detached. A node inside a removed
    /// subtree is detached as well, since its root is. So is a node whose
    /// ancestors were all dropped while it was still held: it no longer has a
    /// document, but it was never a root either.
    pub fn is_detached(&self) -> bool {
        let root = self.root();
        let data = root.0.borrow();
        data.detached || !data.parent.ptr_eq(&Weak::new())
    }

    /// Whether `self` is `other` or one of its ancestors.
    pub fn is_ancestor_or_self(&self, other: &Node) -> bool {
        let mut current = Some(other.clone());
        while let Some(node) = current {
            if node.ptr_eq(self) {
                return true;
            }
            current = node.parent();
        }
        false
    }

    /// Copy this subtree into a new, parentless tree.
    pub fn deep_clone(&self) -> Node {
        let data = self.0.borrow();
        let copy = Node::new(data.name.clone());
        {
            let mut copy_data = copy.0.borrow_mut();
            copy_data.attributes = data.attributes.clone();
            copy_data.text = data.text.clone();
        }
        for child in &data.children {
            let child_copy = child.deep_clone();
            child_copy.attach_to(&copy);
            copy.0.borrow_mut().children.push(child_copy);
        }
        copy
    }

    fn check_can_adopt(&self, child: &Node) -> Result<()> {
        if child.is_ancestor_or_self(self) {
            return Err(Error::InvalidStructure {
                message: format!(
                    "cannot make <{}> a child of itself or of its own descendant",
                    child.local_name()
                ),
            });
        }
        Ok(())
    }

    /// Remove this node from its parent's child list without marking it detached.
    fn unlink(&self) {
        if let Some(parent) = self.parent() {
            parent.0.borrow_mut().children.retain(|c| !c.ptr_eq(self));
        }
        self.0.borrow_mut().parent = Weak::new();
    }

    fn attach_to(&self, parent: &Node) {
        let mut data = self.0.borrow_mut();
        data.parent = Rc::downgrade(&parent.0);
        data.detached = false;
    }

    fn mark_detached(&self) {
        let mut data = self.0.borrow_mut();
        data.parent = Weak::new();
        data.detached = true;
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.0.borrow();
        f.debug_struct("Node")
            .field("name", &data.name.to_string())
            .field("attributes", &data.attributes)
            .field("text", &data.text)
            .field("children", &data.children)
            .finish()
    }
}
