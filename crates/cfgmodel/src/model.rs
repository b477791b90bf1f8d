//! The typed-model base: one model object projected over one tree element.
//!
//! # Design
//!
//! - [`BaseModel`] pairs a backing [`Node`] with the shared [`Descriptor`].
//!   It copies nothing: reads and writes go straight to the tree, so two
//!   models over the same element always agree.
//! - [`Model`] provides the generic accessors (attributes, text, children,
//!   parent) to every domain type; a domain type only says where its
//!   `BaseModel` lives.
//! - Parents are never stored. [`Model::model_parent`] walks one level up the
//!   tree and wraps what it finds, so re-parenting an element can't leave a
//!   stale parent model behind.
//! - Operations on a model whose element was removed from its document fail
//!   with [`ModelError::Detached`]; reading the qualified name never fails.

use crate::descriptor::{Descriptor, ModelKind};
use crate::{ModelError, Result};
use cfgmodel_tree::{Node, QualifiedName, validate_name};
use std::cell::RefCell;
use std::fmt;
use std::sync::Arc;

/// Attribute holding a model's name.
pub const NAME: &str = "name";

/// One tree element plus the descriptor it is interpreted with.
///
/// A model also holds the root of the document its element belonged to when
/// it was wrapped, so a child model stays navigable after the handle it was
/// reached through is dropped.
#[derive(Clone)]
pub struct BaseModel {
    node: Node,
    document: Node,
    descriptor: Arc<Descriptor>,
}

impl BaseModel {
    /// Wrap an existing element.
    pub fn new(node: Node, descriptor: Arc<Descriptor>) -> Self {
        let document = node.root();
        Self {
            node,
            document,
            descriptor,
        }
    }

    /// Create a new, parentless element named `local_name`, namespaced per the descriptor.
    pub fn create(descriptor: Arc<Descriptor>, local_name: &str) -> Result<Self> {
        let name = descriptor.qualified_name(local_name)?;
        Ok(Self::new(Node::new(name), descriptor))
    }

    /// The backing element.
    pub fn node(&self) -> &Node {
        &self.node
    }

    pub fn descriptor(&self) -> &Arc<Descriptor> {
        &self.descriptor
    }

    /// Root of the document the element belonged to when it was wrapped.
    pub fn document(&self) -> &Node {
        &self.document
    }

    /// Re-check this element against `expected` before handing it to a typed wrapper.
    pub(crate) fn expect_kind(self, expected: ModelKind) -> Result<Self> {
        let found = self.model_kind();
        if found != expected {
            return Err(ModelError::UnexpectedKind {
                expected,
                found: self.node.local_name(),
            });
        }
        Ok(self)
    }

    /// Like [`BaseModel::expect_kind`], and also require the parent (if any) to
    /// be of `parent_kind`, or not of it when `parent_must_match` is false.
    pub(crate) fn expect_kind_under(
        self,
        expected: ModelKind,
        parent_kind: ModelKind,
        parent_must_match: bool,
    ) -> Result<Self> {
        let base = self.expect_kind(expected)?;
        if let Some(parent) = base.node.parent() {
            let is_match = base.descriptor.kind_of(&parent.local_name()) == parent_kind;
            if is_match != parent_must_match {
                return Err(ModelError::UnexpectedKind {
                    expected,
                    found: format!("{} under <{}>", base.node.local_name(), parent.local_name()),
                });
            }
        }
        Ok(base)
    }
}

impl fmt::Debug for BaseModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaseModel")
            .field("name", &self.node.qualified_name().to_string())
            .field("document", &self.document.qualified_name().to_string())
            .finish_non_exhaustive()
    }
}

/// Generic accessors shared by every model type.
pub trait Model {
    /// The element and descriptor this model projects.
    fn base(&self) -> &BaseModel;

    /// Namespace and local name of the backing element.
    fn qualified_name(&self) -> QualifiedName {
        self.base().node().qualified_name()
    }

    /// The kind the descriptor binds this element's name to.
    fn model_kind(&self) -> ModelKind {
        let base = self.base();
        base.descriptor().kind_of(&base.node().local_name())
    }

    fn is_detached(&self) -> bool {
        self.base().node().is_detached()
    }

    /// Whether both models project the same element.
    fn same_node(&self, other: &dyn Model) -> bool {
        self.base().node().ptr_eq(other.base().node())
    }

    /// Fail with [`ModelError::Detached`] if the element left its document.
    fn ensure_attached(&self) -> Result<()> {
        if self.is_detached() {
            return Err(ModelError::Detached {
                name: self.base().node().local_name(),
            });
        }
        Ok(())
    }

    /// Read an attribute; an unset attribute is `Ok(None)`.
    fn model_attribute(&self, name: &str) -> Result<Option<String>> {
        self.ensure_attached()?;
        Ok(self.base().node().attribute(name))
    }

    /// Write an attribute; `None` removes it.
    fn set_model_attribute(&self, name: &str, value: Option<&str>) -> Result<&Self>
    where
        Self: Sized,
    {
        self.ensure_attached()?;
        validate_attribute_name(name)?;
        self.base().node().set_attribute(name, value);
        Ok(self)
    }

    fn model_text(&self) -> Result<Option<String>> {
        self.ensure_attached()?;
        Ok(self.base().node().text())
    }

    fn set_model_text(&self, text: Option<&str>) -> Result<&Self>
    where
        Self: Sized,
    {
        self.ensure_attached()?;
        self.base().node().set_text(text);
        Ok(self)
    }

    /// All child elements, in document order, as untyped models.
    fn model_children(&self) -> Result<Vec<BaseModel>> {
        self.ensure_attached()?;
        let base = self.base();
        Ok(base
            .node()
            .children()
            .into_iter()
            .map(|node| BaseModel::new(node, Arc::clone(base.descriptor())))
            .collect())
    }

    /// Children whose local name starts with `prefix`, in document order.
    fn child_models_starts_with(&self, prefix: &str) -> Result<Vec<BaseModel>> {
        validate_name(prefix)?;
        Ok(self
            .model_children()?
            .into_iter()
            .filter(|child| child.node().local_name().starts_with(prefix))
            .collect())
    }

    /// The first child whose local name starts with `prefix`.
    ///
    /// Several matching children are not an error: the first in document
    /// order wins.
    fn first_child_model_starts_with(&self, prefix: &str) -> Result<Option<BaseModel>> {
        Ok(self.child_models_starts_with(prefix)?.into_iter().next())
    }

    /// The first child starting with `prefix` whose `name` attribute is `name`.
    fn named_child_model(&self, prefix: &str, name: &str) -> Result<Option<BaseModel>> {
        Ok(self
            .child_models_starts_with(prefix)?
            .into_iter()
            .find(|child| child.node().attribute(NAME).as_deref() == Some(name)))
    }

    /// Put `child` in the slot of the existing child of the same kind, or
    /// append it when there is none.
    ///
    /// The slot is found by model kind when the descriptor binds the child's
    /// name, otherwise by qualified name. A child that currently lives
    /// elsewhere is moved here.
    fn set_child_model(&self, child: &BaseModel) -> Result<()> {
        self.ensure_attached()?;
        let base = self.base();
        let node = base.node();
        let new = child.node();
        let kind = base.descriptor().kind_of(&new.local_name());
        let name = new.qualified_name();

        let existing = node.children().into_iter().find(|c| match kind {
            ModelKind::Unknown => c.qualified_name() == name,
            kind => base.descriptor().kind_of(&c.local_name()) == kind,
        });

        match existing {
            Some(old) if old.ptr_eq(new) => {}
            Some(old) => {
                node.replace_child(&old, new)?;
                tracing::debug!(
                    parent = %node.qualified_name(),
                    old = %old.qualified_name(),
                    new = %name,
                    "Replaced child model"
                );
            }
            None => {
                node.append_child(new)?;
                tracing::debug!(parent = %node.qualified_name(), child = %name, "Added child model");
            }
        }
        Ok(())
    }

    /// Append `child` after the existing children, for repeatable children.
    fn add_child_model(&self, child: &BaseModel) -> Result<()> {
        self.ensure_attached()?;
        self.base().node().append_child(child.node())?;
        Ok(())
    }

    /// Remove every child whose local name starts with `prefix`.
    fn remove_child_models(&self, prefix: &str) -> Result<usize> {
        let removed = self.child_models_starts_with(prefix)?;
        let node = self.base().node();
        for child in &removed {
            node.remove_child(child.node());
        }
        Ok(removed.len())
    }

    /// The parent element wrapped as an untyped model; `None` at the root.
    fn model_parent(&self) -> Result<Option<BaseModel>> {
        self.ensure_attached()?;
        let base = self.base();
        Ok(base
            .node()
            .parent()
            .map(|parent| BaseModel::new(parent, Arc::clone(base.descriptor()))))
    }

    /// The part of the local name after `prefix.` (`java` for `interface.java`).
    fn type_suffix(&self, prefix: &str) -> Option<String> {
        let local = self.base().node().local_name();
        local
            .strip_prefix(prefix)
            .and_then(|rest| rest.strip_prefix('.'))
            .filter(|suffix| !suffix.is_empty())
            .map(str::to_string)
    }
}

impl Model for BaseModel {
    fn base(&self) -> &BaseModel {
        self
    }
}

/// A model identified among its siblings by its `name` attribute.
pub trait NamedModel: Model {
    fn name(&self) -> Result<Option<String>> {
        self.model_attribute(NAME)
    }

    fn set_name(&self, name: Option<&str>) -> Result<&Self>
    where
        Self: Sized,
    {
        self.set_model_attribute(NAME, name)
    }

    /// The name, falling back to the element's local name when unnamed.
    fn display_name(&self) -> Result<String> {
        Ok(self
            .name()?
            .unwrap_or_else(|| self.base().node().local_name()))
    }

    /// Whether this model is named `name`.
    fn has_name(&self, name: &str) -> Result<bool> {
        Ok(self.name()?.as_deref() == Some(name))
    }
}

/// Attribute names are a local name, optionally behind one `prefix:`.
fn validate_attribute_name(name: &str) -> Result<()> {
    match name.split_once(':') {
        Some((prefix, local)) => {
            validate_name(prefix)?;
            validate_name(local)?;
        }
        None => validate_name(name)?,
    }
    Ok(())
}

/// Memoized lookup of a singleton typed child.
///
/// Filled on first access and replaced by the owner's setter. Edits that
/// bypass the setter are not tracked, except that a cached child which is no
/// longer a child of the owner counts as a miss.
#[derive(Debug, Clone)]
pub(crate) struct ChildCache<T> {
    slot: RefCell<Option<T>>,
}

impl<T> Default for ChildCache<T> {
    fn default() -> Self {
        Self {
            slot: RefCell::new(None),
        }
    }
}

impl<T: Model + Clone> ChildCache<T> {
    pub(crate) fn get_or_find(
        &self,
        owner: &BaseModel,
        prefix: &str,
        wrap: impl FnOnce(BaseModel) -> Result<T>,
    ) -> Result<Option<T>> {
        owner.ensure_attached()?;
        if let Some(cached) = self.slot.borrow().as_ref() {
            let still_child = cached
                .base()
                .node()
                .parent()
                .is_some_and(|parent| parent.ptr_eq(owner.node()));
            if still_child {
                return Ok(Some(cached.clone()));
            }
        }

        let found = owner
            .first_child_model_starts_with(prefix)?
            .map(wrap)
            .transpose()?;
        tracing::trace!(
            owner = %owner.qualified_name(),
            prefix,
            found = found.is_some(),
            "Resolved cached child"
        );
        self.set(found.clone());
        Ok(found)
    }

    /// Install `child` in the owner's slot for `prefix` (or clear the slot)
    /// and point the cache at it.
    pub(crate) fn replace(&self, owner: &BaseModel, prefix: &str, child: Option<&T>) -> Result<()> {
        match child {
            Some(child) => owner.set_child_model(child.base())?,
            None => {
                owner.remove_child_models(prefix)?;
            }
        }
        self.set(child.cloned());
        tracing::trace!(owner = %owner.qualified_name(), prefix, "Reset cached child");
        Ok(())
    }

    fn set(&self, value: Option<T>) {
        *self.slot.borrow_mut() = value;
    }
}

/// Implement [`Model`] for types that keep their `BaseModel` in a `base` field.
macro_rules! impl_model {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::model::Model for $ty {
                fn base(&self) -> &$crate::model::BaseModel {
                    &self.base
                }
            }
        )+
    };
}

pub(crate) use impl_model;
