//! Composite-level services and references, which promote component-level ones.
//!
//! A `promote` attribute names its targets as `Component/name`, or a bare
//! `Component` standing for that component's first reference or service.
//! References may promote several targets (space separated); a service
//! promotes one.

use super::{
    BINDING, BindingModel, ComponentReferenceModel, ComponentServiceModel, CompositeModel,
    INTERFACE, InterfaceModel, MULTIPLICITY, PROMOTE, REFERENCE, SECURITY, SERVICE,
    typed_children,
};
use crate::Result;
use crate::descriptor::{Descriptor, ModelKind};
use crate::model::{BaseModel, ChildCache, Model, NamedModel, impl_model};
use crate::policy::PolicyRequirements;
use std::sync::Arc;

/// A reference exposed by the composite to the outside world.
#[derive(Debug, Clone)]
pub struct CompositeReferenceModel {
    base: BaseModel,
    interface: ChildCache<InterfaceModel>,
}

/// A service exposed by the composite to the outside world.
#[derive(Debug, Clone)]
pub struct CompositeServiceModel {
    base: BaseModel,
    interface: ChildCache<InterfaceModel>,
}

impl_model!(CompositeReferenceModel, CompositeServiceModel);

impl NamedModel for CompositeReferenceModel {}
impl NamedModel for CompositeServiceModel {}

impl PolicyRequirements for CompositeReferenceModel {}
impl PolicyRequirements for CompositeServiceModel {}

/// Split `Component/name` into its two halves.
fn split_target(target: &str) -> (&str, Option<&str>) {
    match target.split_once('/') {
        Some((component, name)) => (component, Some(name)),
        None => (target, None),
    }
}

impl CompositeReferenceModel {
    pub fn new(descriptor: Arc<Descriptor>) -> Result<Self> {
        Self::wrap(BaseModel::create(descriptor, REFERENCE)?)
    }

    /// Wrap a `reference` element that is not inside a component.
    pub fn wrap(base: BaseModel) -> Result<Self> {
        Ok(Self {
            base: base.expect_kind_under(ModelKind::Reference, ModelKind::Component, false)?,
            interface: ChildCache::default(),
        })
    }

    pub fn composite(&self) -> Result<Option<CompositeModel>> {
        self.model_parent()?.map(CompositeModel::wrap).transpose()
    }

    /// The raw `promote` attribute.
    pub fn promote(&self) -> Result<Option<String>> {
        self.model_attribute(PROMOTE)
    }

    pub fn set_promote(&self, promote: Option<&str>) -> Result<&Self> {
        self.set_model_attribute(PROMOTE, promote)
    }

    /// The individual promotion targets, in attribute order.
    pub fn promotes(&self) -> Result<Vec<String>> {
        Ok(match self.promote()? {
            Some(value) => value.split_whitespace().map(str::to_string).collect(),
            None => Vec::new(),
        })
    }

    /// The first promotion target, as shown to management clients.
    pub fn promoted_reference(&self) -> Result<Option<String>> {
        Ok(self.promotes()?.into_iter().next())
    }

    /// Component references named by `promote`, found among the sibling
    /// components.
    ///
    /// Each target is `Component/reference`, or a bare `Component` standing
    /// for that component's first reference. Targets that match nothing are
    /// skipped and a reference reached twice is listed once.
    pub fn promoted_references(&self) -> Result<Vec<ComponentReferenceModel>> {
        let Some(composite) = self.composite()? else {
            return Ok(Vec::new());
        };

        let mut found: Vec<ComponentReferenceModel> = Vec::new();
        for target in self.promotes()? {
            let (component, reference) = split_target(&target);
            let Some(component) = composite.component(component)? else {
                continue;
            };
            let promoted = match reference {
                Some(reference) => component.reference(reference)?,
                None => component.references()?.into_iter().next(),
            };
            if let Some(promoted) = promoted
                && !found.iter().any(|r| r.same_node(&promoted))
            {
                found.push(promoted);
            }
        }
        tracing::trace!(
            reference = %self.display_name()?,
            promoted = found.len(),
            "Resolved promoted references"
        );
        Ok(found)
    }

    pub fn multiplicity(&self) -> Result<Option<String>> {
        self.model_attribute(MULTIPLICITY)
    }

    pub fn set_multiplicity(&self, multiplicity: Option<&str>) -> Result<&Self> {
        self.set_model_attribute(MULTIPLICITY, multiplicity)
    }

    pub fn security(&self) -> Result<Option<String>> {
        self.model_attribute(SECURITY)
    }

    pub fn set_security(&self, security: Option<&str>) -> Result<&Self> {
        self.set_model_attribute(SECURITY, security)
    }

    pub fn interface(&self) -> Result<Option<InterfaceModel>> {
        self.interface
            .get_or_find(&self.base, INTERFACE, InterfaceModel::wrap)
    }

    pub fn set_interface(&self, interface: Option<&InterfaceModel>) -> Result<&Self> {
        self.interface.replace(&self.base, INTERFACE, interface)?;
        Ok(self)
    }

    pub fn bindings(&self) -> Result<Vec<BindingModel>> {
        typed_children(&self.base, BINDING, BindingModel::wrap)
    }

    pub fn add_binding(&self, binding: &BindingModel) -> Result<&Self> {
        self.add_child_model(binding.base())?;
        Ok(self)
    }
}

impl CompositeServiceModel {
    pub fn new(descriptor: Arc<Descriptor>) -> Result<Self> {
        Self::wrap(BaseModel::create(descriptor, SERVICE)?)
    }

    /// Wrap a `service` element that is not inside a component.
    pub fn wrap(base: BaseModel) -> Result<Self> {
        Ok(Self {
            base: base.expect_kind_under(ModelKind::Service, ModelKind::Component, false)?,
            interface: ChildCache::default(),
        })
    }

    pub fn composite(&self) -> Result<Option<CompositeModel>> {
        self.model_parent()?.map(CompositeModel::wrap).transpose()
    }

    pub fn promote(&self) -> Result<Option<String>> {
        self.model_attribute(PROMOTE)
    }

    pub fn set_promote(&self, promote: Option<&str>) -> Result<&Self> {
        self.set_model_attribute(PROMOTE, promote)
    }

    /// The component service this service promotes, if it can be found.
    pub fn promoted_service(&self) -> Result<Option<ComponentServiceModel>> {
        let (Some(composite), Some(promote)) = (self.composite()?, self.promote()?) else {
            return Ok(None);
        };
        let (component, service) = split_target(promote.trim());
        let Some(component) = composite.component(component)? else {
            return Ok(None);
        };
        match service {
            Some(service) => component.service(service),
            None => Ok(component.services()?.into_iter().next()),
        }
    }

    pub fn security(&self) -> Result<Option<String>> {
        self.model_attribute(SECURITY)
    }

    pub fn set_security(&self, security: Option<&str>) -> Result<&Self> {
        self.set_model_attribute(SECURITY, security)
    }

    pub fn interface(&self) -> Result<Option<InterfaceModel>> {
        self.interface
            .get_or_find(&self.base, INTERFACE, InterfaceModel::wrap)
    }

    pub fn set_interface(&self, interface: Option<&InterfaceModel>) -> Result<&Self> {
        self.interface.replace(&self.base, INTERFACE, interface)?;
        Ok(self)
    }

    pub fn bindings(&self) -> Result<Vec<BindingModel>> {
        typed_children(&self.base, BINDING, BindingModel::wrap)
    }

    pub fn add_binding(&self, binding: &BindingModel) -> Result<&Self> {
        self.add_child_model(binding.base())?;
        Ok(self)
    }
}
