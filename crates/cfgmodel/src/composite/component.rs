//! Components and their own services and references.

use super::{
    BINDING, BindingModel, COMPONENT, CompositeModel, IMPLEMENTATION, INTERFACE,
    ImplementationModel, InterfaceModel, MULTIPLICITY, PROPERTY, PropertyModel, REFERENCE,
    SECURITY, SERVICE, typed_children, typed_named_child,
};
use crate::Result;
use crate::descriptor::{Descriptor, ModelKind};
use crate::model::{BaseModel, ChildCache, Model, NamedModel, impl_model};
use crate::policy::PolicyRequirements;
use std::sync::Arc;

/// A component: one implementation plus the services it offers and the
/// references it consumes.
#[derive(Debug, Clone)]
pub struct ComponentModel {
    base: BaseModel,
    implementation: ChildCache<ImplementationModel>,
}

/// A reference declared on a component.
#[derive(Debug, Clone)]
pub struct ComponentReferenceModel {
    base: BaseModel,
    interface: ChildCache<InterfaceModel>,
}

/// A service declared on a component.
#[derive(Debug, Clone)]
pub struct ComponentServiceModel {
    base: BaseModel,
    interface: ChildCache<InterfaceModel>,
}

impl_model!(ComponentModel, ComponentReferenceModel, ComponentServiceModel);

impl NamedModel for ComponentModel {}
impl NamedModel for ComponentReferenceModel {}
impl NamedModel for ComponentServiceModel {}

impl PolicyRequirements for ComponentReferenceModel {}
impl PolicyRequirements for ComponentServiceModel {}

impl ComponentModel {
    pub fn new(descriptor: Arc<Descriptor>) -> Result<Self> {
        Self::wrap(BaseModel::create(descriptor, COMPONENT)?)
    }

    pub fn wrap(base: BaseModel) -> Result<Self> {
        Ok(Self {
            base: base.expect_kind(ModelKind::Component)?,
            implementation: ChildCache::default(),
        })
    }

    /// The enclosing composite, or `None` for a free-standing component.
    pub fn composite(&self) -> Result<Option<CompositeModel>> {
        self.model_parent()?.map(CompositeModel::wrap).transpose()
    }

    pub fn implementation(&self) -> Result<Option<ImplementationModel>> {
        self.implementation
            .get_or_find(&self.base, IMPLEMENTATION, ImplementationModel::wrap)
    }

    /// Replace the implementation child; `None` removes it.
    pub fn set_implementation(&self, implementation: Option<&ImplementationModel>) -> Result<&Self> {
        self.implementation
            .replace(&self.base, IMPLEMENTATION, implementation)?;
        Ok(self)
    }

    pub fn services(&self) -> Result<Vec<ComponentServiceModel>> {
        typed_children(&self.base, SERVICE, ComponentServiceModel::wrap)
    }

    pub fn service(&self, name: &str) -> Result<Option<ComponentServiceModel>> {
        typed_named_child(&self.base, SERVICE, name, ComponentServiceModel::wrap)
    }

    pub fn add_service(&self, service: &ComponentServiceModel) -> Result<&Self> {
        self.add_child_model(service.base())?;
        Ok(self)
    }

    pub fn references(&self) -> Result<Vec<ComponentReferenceModel>> {
        typed_children(&self.base, REFERENCE, ComponentReferenceModel::wrap)
    }

    pub fn reference(&self, name: &str) -> Result<Option<ComponentReferenceModel>> {
        typed_named_child(&self.base, REFERENCE, name, ComponentReferenceModel::wrap)
    }

    pub fn add_reference(&self, reference: &ComponentReferenceModel) -> Result<&Self> {
        self.add_child_model(reference.base())?;
        Ok(self)
    }

    pub fn properties(&self) -> Result<Vec<PropertyModel>> {
        typed_children(&self.base, PROPERTY, PropertyModel::wrap)
    }
}

impl ComponentReferenceModel {
    pub fn new(descriptor: Arc<Descriptor>) -> Result<Self> {
        Self::wrap(BaseModel::create(descriptor, REFERENCE)?)
    }

    /// Wrap a `reference` element that sits under a component (or nowhere yet).
    pub fn wrap(base: BaseModel) -> Result<Self> {
        Ok(Self {
            base: base.expect_kind_under(ModelKind::Reference, ModelKind::Component, true)?,
            interface: ChildCache::default(),
        })
    }

    /// The owning component, re-wrapped from the parent element.
    pub fn component(&self) -> Result<Option<ComponentModel>> {
        self.model_parent()?.map(ComponentModel::wrap).transpose()
    }

    pub fn multiplicity(&self) -> Result<Option<String>> {
        self.model_attribute(MULTIPLICITY)
    }

    /// Set the multiplicity (`0..1`, `1..1`, `0..n`, `1..n`). Not validated.
    pub fn set_multiplicity(&self, multiplicity: Option<&str>) -> Result<&Self> {
        self.set_model_attribute(MULTIPLICITY, multiplicity)
    }

    pub fn security(&self) -> Result<Option<String>> {
        self.model_attribute(SECURITY)
    }

    pub fn set_security(&self, security: Option<&str>) -> Result<&Self> {
        self.set_model_attribute(SECURITY, security)
    }

    /// The first `interface.*` child. Cached after the first lookup.
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

impl ComponentServiceModel {
    pub fn new(descriptor: Arc<Descriptor>) -> Result<Self> {
        Self::wrap(BaseModel::create(descriptor, SERVICE)?)
    }

    /// Wrap a `service` element that sits under a component (or nowhere yet).
    pub fn wrap(base: BaseModel) -> Result<Self> {
        Ok(Self {
            base: base.expect_kind_under(ModelKind::Service, ModelKind::Component, true)?,
            interface: ChildCache::default(),
        })
    }

    pub fn component(&self) -> Result<Option<ComponentModel>> {
        self.model_parent()?.map(ComponentModel::wrap).transpose()
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ModelError;

    const XML: &str = r#"<composite xmlns="http://docs.oasis-open.org/ns/opencsa/sca/200912" name="orders">
  <component name="OrderComponent">
    <implementation.bean class="org.example.OrderBean"/>
    <service name="OrderService">
      <interface.java interface="org.example.OrderService"/>
    </service>
    <reference name="Warehouse" multiplicity="0..1" security="secured" requires="transaction">
      <interface.java interface="org.example.Warehouse"/>
      <interface.wsdl interface="warehouse.wsdl#Warehouse"/>
      <binding.sca/>
    </reference>
  </component>
</composite>"#;

    fn load() -> CompositeModel {
        CompositeModel::parse(XML, Arc::new(Descriptor::sca())).unwrap()
    }

    fn warehouse(composite: &CompositeModel) -> ComponentReferenceModel {
        composite
            .component("OrderComponent")
            .unwrap()
            .unwrap()
            .reference("Warehouse")
            .unwrap()
            .unwrap()
    }

    #[test]
    fn test_reference_accessors() {
        let reference = warehouse(&load());
        assert_eq!(reference.multiplicity().unwrap().as_deref(), Some("0..1"));
        assert_eq!(reference.security().unwrap().as_deref(), Some("secured"));
        assert!(reference.has_policy_requirement("transaction").unwrap());
        assert_eq!(reference.bindings().unwrap().len(), 1);
    }

    #[test]
    fn test_interface_is_first_match() {
        let interface = warehouse(&load()).interface().unwrap().unwrap();
        assert_eq!(interface.interface_type().as_deref(), Some("java"));
        assert_eq!(
            interface.interface().unwrap().as_deref(),
            Some("org.example.Warehouse")
        );
    }

    #[test]
    fn test_set_interface_updates_tree_and_cache() {
        let composite = load();
        let reference = warehouse(&composite);
        let old = reference.interface().unwrap().unwrap();

        let replacement = InterfaceModel::new(Arc::clone(reference.base().descriptor()), "wsdl").unwrap();
        replacement.set_interface(Some("new.wsdl#Warehouse")).unwrap();
        reference.set_interface(Some(&replacement)).unwrap();

        assert!(old.is_detached());
        assert!(reference.interface().unwrap().unwrap().same_node(&replacement));
        // Another view over the same element sees the new child too.
        let other = warehouse(&composite);
        assert_eq!(
            other.interface().unwrap().unwrap().interface().unwrap().as_deref(),
            Some("new.wsdl#Warehouse")
        );
    }

    #[test]
    fn test_clearing_interface() {
        let reference = warehouse(&load());
        reference.interface().unwrap();
        reference.set_interface(None).unwrap();
        assert!(reference.interface().unwrap().is_none());
        assert!(reference.first_child_model_starts_with(INTERFACE).unwrap().is_none());
    }

    #[test]
    fn test_cache_miss_after_out_of_band_removal() {
        let reference = warehouse(&load());
        let cached = reference.interface().unwrap().unwrap();
        reference.base().node().remove_child(cached.base().node());

        let refreshed = reference.interface().unwrap().unwrap();
        assert_eq!(refreshed.interface_type().as_deref(), Some("wsdl"));
    }

    #[test]
    fn test_parent_navigation() {
        let composite = load();
        let reference = warehouse(&composite);
        let component = reference.component().unwrap().unwrap();
        assert_eq!(component.name().unwrap().as_deref(), Some("OrderComponent"));
        assert!(component.composite().unwrap().unwrap().same_node(&composite));
    }

    #[test]
    fn test_component_implementation() {
        let composite = load();
        let component = composite.component("OrderComponent").unwrap().unwrap();
        let implementation = component.implementation().unwrap().unwrap();
        assert_eq!(implementation.implementation_type().as_deref(), Some("bean"));

        let camel = ImplementationModel::new(Arc::clone(component.base().descriptor()), "camel").unwrap();
        component.set_implementation(Some(&camel)).unwrap();
        assert!(implementation.is_detached());
        let children: Vec<_> = component
            .model_children()
            .unwrap()
            .iter()
            .map(|c| c.base().node().local_name())
            .collect();
        assert_eq!(children, vec!["implementation.camel", "service", "reference"]);
    }

    #[test]
    fn test_service_lookup() {
        let component = load().component("OrderComponent").unwrap().unwrap();
        let service = component.service("OrderService").unwrap().unwrap();
        assert_eq!(
            service.interface().unwrap().unwrap().interface().unwrap().as_deref(),
            Some("org.example.OrderService")
        );
        assert!(service.component().unwrap().unwrap().same_node(&component));
    }

    #[test]
    fn test_build_component_programmatically() {
        let descriptor = Arc::new(Descriptor::sca());
        let composite = CompositeModel::new(Arc::clone(&descriptor)).unwrap();
        let component = ComponentModel::new(Arc::clone(&descriptor)).unwrap();
        component.set_name(Some("C")).unwrap();
        let reference = ComponentReferenceModel::new(Arc::clone(&descriptor)).unwrap();
        reference.set_name(Some("R")).unwrap().set_multiplicity(Some("1..n")).unwrap();

        component.add_reference(&reference).unwrap();
        composite.add_component(&component).unwrap();

        insta::assert_snapshot!(
            composite.to_xml().unwrap(),
            @r#"<composite xmlns="http://docs.oasis-open.org/ns/opencsa/sca/200912"><component name="C"><reference name="R" multiplicity="1..n"/></component></composite>"#
        );
    }

    #[test]
    fn test_wrap_checks_parent_kind() {
        let composite = CompositeModel::parse(
            r#"<composite><reference name="top"/></composite>"#,
            Arc::new(Descriptor::sca()),
        )
        .unwrap();
        let element = composite.first_child_model_starts_with(REFERENCE).unwrap().unwrap();
        let err = ComponentReferenceModel::wrap(element).unwrap_err();
        assert!(matches!(err, ModelError::UnexpectedKind { expected: ModelKind::Reference, .. }));
    }
}
