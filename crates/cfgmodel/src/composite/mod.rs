//! Domain models for the composite assembly vocabulary.
//!
//! A composite holds components, each with an implementation and its own
//! services and references. Composite-level services and references promote
//! component-level ones by name. Interfaces, bindings, and implementations
//! are singleton or repeated children whose local name carries a type suffix
//! (`interface.java`, `binding.sca`).

mod component;
mod parts;
mod promotion;

pub use component::{ComponentModel, ComponentReferenceModel, ComponentServiceModel};
pub use parts::{BindingModel, ImplementationModel, InterfaceModel, PropertyModel};
pub use promotion::{CompositeReferenceModel, CompositeServiceModel};

use crate::Result;
use crate::descriptor::{Descriptor, ModelKind};
use crate::model::{BaseModel, Model, NamedModel, impl_model};
use cfgmodel_property::MapPropertyResolver;
use std::sync::Arc;

pub const COMPOSITE: &str = "composite";
pub const COMPONENT: &str = "component";
pub const SERVICE: &str = "service";
pub const REFERENCE: &str = "reference";
pub const PROPERTY: &str = "property";
pub const INTERFACE: &str = "interface";
pub const BINDING: &str = "binding";
pub const IMPLEMENTATION: &str = "implementation";

pub const TARGET_NAMESPACE: &str = "targetNamespace";
pub const MULTIPLICITY: &str = "multiplicity";
pub const SECURITY: &str = "security";
pub const PROMOTE: &str = "promote";

/// Wrap every child starting with `prefix`.
fn typed_children<T>(
    owner: &BaseModel,
    prefix: &str,
    wrap: impl Fn(BaseModel) -> Result<T>,
) -> Result<Vec<T>> {
    owner
        .child_models_starts_with(prefix)?
        .into_iter()
        .map(wrap)
        .collect()
}

/// Wrap the first child starting with `prefix` named `name`.
fn typed_named_child<T>(
    owner: &BaseModel,
    prefix: &str,
    name: &str,
    wrap: impl FnOnce(BaseModel) -> Result<T>,
) -> Result<Option<T>> {
    owner.named_child_model(prefix, name)?.map(wrap).transpose()
}

/// The root of an assembly document.
#[derive(Debug, Clone)]
pub struct CompositeModel {
    base: BaseModel,
}

impl_model!(CompositeModel);
impl NamedModel for CompositeModel {}

impl CompositeModel {
    pub fn new(descriptor: Arc<Descriptor>) -> Result<Self> {
        Self::wrap(BaseModel::create(descriptor, COMPOSITE)?)
    }

    pub fn wrap(base: BaseModel) -> Result<Self> {
        Ok(Self {
            base: base.expect_kind(ModelKind::Composite)?,
        })
    }

    /// Parse `xml` and wrap its root element.
    pub fn parse(xml: &str, descriptor: Arc<Descriptor>) -> Result<Self> {
        let root = cfgmodel_tree::parse(xml)?;
        Self::wrap(BaseModel::new(root, descriptor))
    }

    pub fn to_xml(&self) -> Result<String> {
        self.ensure_attached()?;
        Ok(cfgmodel_tree::write(self.base.node())?)
    }

    pub fn to_xml_pretty(&self, indent: usize) -> Result<String> {
        self.ensure_attached()?;
        Ok(cfgmodel_tree::write_pretty(self.base.node(), indent)?)
    }

    pub fn target_namespace(&self) -> Result<Option<String>> {
        self.model_attribute(TARGET_NAMESPACE)
    }

    pub fn set_target_namespace(&self, namespace: Option<&str>) -> Result<&Self> {
        self.set_model_attribute(TARGET_NAMESPACE, namespace)
    }

    pub fn components(&self) -> Result<Vec<ComponentModel>> {
        typed_children(&self.base, COMPONENT, ComponentModel::wrap)
    }

    pub fn component(&self, name: &str) -> Result<Option<ComponentModel>> {
        typed_named_child(&self.base, COMPONENT, name, ComponentModel::wrap)
    }

    pub fn add_component(&self, component: &ComponentModel) -> Result<&Self> {
        self.add_child_model(component.base())?;
        Ok(self)
    }

    pub fn services(&self) -> Result<Vec<CompositeServiceModel>> {
        typed_children(&self.base, SERVICE, CompositeServiceModel::wrap)
    }

    pub fn service(&self, name: &str) -> Result<Option<CompositeServiceModel>> {
        typed_named_child(&self.base, SERVICE, name, CompositeServiceModel::wrap)
    }

    pub fn add_service(&self, service: &CompositeServiceModel) -> Result<&Self> {
        self.add_child_model(service.base())?;
        Ok(self)
    }

    pub fn references(&self) -> Result<Vec<CompositeReferenceModel>> {
        typed_children(&self.base, REFERENCE, CompositeReferenceModel::wrap)
    }

    pub fn reference(&self, name: &str) -> Result<Option<CompositeReferenceModel>> {
        typed_named_child(&self.base, REFERENCE, name, CompositeReferenceModel::wrap)
    }

    pub fn add_reference(&self, reference: &CompositeReferenceModel) -> Result<&Self> {
        self.add_child_model(reference.base())?;
        Ok(self)
    }

    pub fn properties(&self) -> Result<Vec<PropertyModel>> {
        typed_children(&self.base, PROPERTY, PropertyModel::wrap)
    }

    pub fn add_property(&self, property: &PropertyModel) -> Result<&Self> {
        self.add_child_model(property.base())?;
        Ok(self)
    }

    /// A resolver over this composite's `<property>` children.
    ///
    /// Properties without a name or a value are skipped. When a name repeats,
    /// the first property in document order wins.
    pub fn property_resolver(&self) -> Result<MapPropertyResolver> {
        let mut resolver = MapPropertyResolver::new();
        for property in self.properties()? {
            let (Some(name), Some(value)) = (property.name()?, property.value()?) else {
                continue;
            };
            if resolver.get(&name).is_none() {
                resolver.insert(name, value);
            }
        }
        let composite = self.display_name()?;
        tracing::debug!(
            composite = %composite,
            properties = resolver.len(),
            "Collected composite properties"
        );
        Ok(resolver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cfgmodel_property::PropertyResolver;

    const XML: &str = r#"<composite xmlns="http://docs.oasis-open.org/ns/opencsa/sca/200912" name="orders" targetNamespace="urn:orders">
  <service name="OrderService" promote="OrderComponent/OrderService"/>
  <component name="OrderComponent">
    <service name="OrderService"/>
  </component>
  <component name="InventoryComponent"/>
  <reference name="Warehouse" promote="OrderComponent/Warehouse"/>
  <property name="host" value="localhost"/>
  <property name="port">8080</property>
  <property name="host" value="ignored"/>
  <property value="unnamed"/>
</composite>"#;

    fn load() -> CompositeModel {
        CompositeModel::parse(XML, Arc::new(Descriptor::sca())).unwrap()
    }

    #[test]
    fn test_wraps_root() {
        let composite = load();
        assert_eq!(composite.name().unwrap().as_deref(), Some("orders"));
        assert_eq!(composite.target_namespace().unwrap().as_deref(), Some("urn:orders"));
    }

    #[test]
    fn test_rejects_non_composite_root() {
        let err = CompositeModel::parse("<component/>", Arc::new(Descriptor::sca())).unwrap_err();
        assert_eq!(err.to_string(), "Expected a composite element, found <component>");
    }

    #[test]
    fn test_children_by_kind() {
        let composite = load();
        let components: Vec<_> = composite
            .components()
            .unwrap()
            .iter()
            .map(|c| c.name().unwrap().unwrap_or_default())
            .collect();
        assert_eq!(components, vec!["OrderComponent", "InventoryComponent"]);
        assert_eq!(composite.services().unwrap().len(), 1);
        assert_eq!(composite.references().unwrap().len(), 1);
        assert!(composite.component("InventoryComponent").unwrap().is_some());
        assert!(composite.reference("Nope").unwrap().is_none());
    }

    #[test]
    fn test_property_resolver_first_wins() {
        let resolver = load().property_resolver().unwrap();
        assert_eq!(resolver.resolve_property("host").as_deref(), Some("localhost"));
        assert_eq!(resolver.resolve_property("port").as_deref(), Some("8080"));
        assert_eq!(resolver.len(), 2);
    }

    #[test]
    fn test_whitespace_property_value_is_kept() {
        let composite = CompositeModel::parse(
            r#"<composite name="c"><property name="sep"> </property></composite>"#,
            Arc::new(Descriptor::sca()),
        )
        .unwrap();
        let resolver = composite.property_resolver().unwrap();
        assert_eq!(resolver.resolve_property("sep").as_deref(), Some(" "));
    }

    #[test]
    fn test_new_composite_is_namespaced() {
        let composite = CompositeModel::new(Arc::new(Descriptor::sca())).unwrap();
        composite.set_name(Some("fresh")).unwrap();
        insta::assert_snapshot!(
            composite.to_xml().unwrap(),
            @r#"<composite name="fresh" xmlns="http://docs.oasis-open.org/ns/opencsa/sca/200912"/>"#
        );
    }
}
