//! Leaf models: interfaces, bindings, implementations, and properties.

use super::{BINDING, IMPLEMENTATION, INTERFACE, PROPERTY};
use crate::Result;
use crate::descriptor::{Descriptor, ModelKind};
use crate::model::{BaseModel, Model, NamedModel, impl_model};
use std::sync::Arc;

/// Attribute naming the interface contract (a class name, WSDL port type, ...).
const INTERFACE_ATTR: &str = "interface";
const URI: &str = "uri";
const VALUE: &str = "value";

/// An `interface.<type>` element.
#[derive(Debug, Clone)]
pub struct InterfaceModel {
    base: BaseModel,
}

/// A `binding.<type>` element.
#[derive(Debug, Clone)]
pub struct BindingModel {
    base: BaseModel,
}

/// An `implementation.<type>` element.
#[derive(Debug, Clone)]
pub struct ImplementationModel {
    base: BaseModel,
}

/// A named `<property>` whose value is its `value` attribute or its text.
#[derive(Debug, Clone)]
pub struct PropertyModel {
    base: BaseModel,
}

impl_model!(InterfaceModel, BindingModel, ImplementationModel, PropertyModel);

impl NamedModel for BindingModel {}
impl NamedModel for PropertyModel {}

/// `prefix.suffix`, or just `prefix` when the suffix is empty.
fn typed_local_name(prefix: &str, suffix: &str) -> String {
    if suffix.is_empty() {
        prefix.to_string()
    } else {
        format!("{}.{}", prefix, suffix)
    }
}

impl InterfaceModel {
    /// Create an `interface.<interface_type>` element.
    pub fn new(descriptor: Arc<Descriptor>, interface_type: &str) -> Result<Self> {
        Self::wrap(BaseModel::create(
            descriptor,
            &typed_local_name(INTERFACE, interface_type),
        )?)
    }

    pub fn wrap(base: BaseModel) -> Result<Self> {
        Ok(Self {
            base: base.expect_kind(ModelKind::Interface)?,
        })
    }

    /// `java` for `interface.java`.
    pub fn interface_type(&self) -> Option<String> {
        self.type_suffix(INTERFACE)
    }

    pub fn interface(&self) -> Result<Option<String>> {
        self.model_attribute(INTERFACE_ATTR)
    }

    pub fn set_interface(&self, interface: Option<&str>) -> Result<&Self> {
        self.set_model_attribute(INTERFACE_ATTR, interface)
    }
}

impl BindingModel {
    /// Create a `binding.<binding_type>` element.
    pub fn new(descriptor: Arc<Descriptor>, binding_type: &str) -> Result<Self> {
        Self::wrap(BaseModel::create(
            descriptor,
            &typed_local_name(BINDING, binding_type),
        )?)
    }

    pub fn wrap(base: BaseModel) -> Result<Self> {
        Ok(Self {
            base: base.expect_kind(ModelKind::Binding)?,
        })
    }

    pub fn binding_type(&self) -> Option<String> {
        self.type_suffix(BINDING)
    }

    pub fn uri(&self) -> Result<Option<String>> {
        self.model_attribute(URI)
    }

    pub fn set_uri(&self, uri: Option<&str>) -> Result<&Self> {
        self.set_model_attribute(URI, uri)
    }
}

impl ImplementationModel {
    /// Create an `implementation.<implementation_type>` element.
    pub fn new(descriptor: Arc<Descriptor>, implementation_type: &str) -> Result<Self> {
        Self::wrap(BaseModel::create(
            descriptor,
            &typed_local_name(IMPLEMENTATION, implementation_type),
        )?)
    }

    pub fn wrap(base: BaseModel) -> Result<Self> {
        Ok(Self {
            base: base.expect_kind(ModelKind::Implementation)?,
        })
    }

    pub fn implementation_type(&self) -> Option<String> {
        self.type_suffix(IMPLEMENTATION)
    }
}

impl PropertyModel {
    pub fn new(descriptor: Arc<Descriptor>) -> Result<Self> {
        Self::wrap(BaseModel::create(descriptor, PROPERTY)?)
    }

    pub fn wrap(base: BaseModel) -> Result<Self> {
        Ok(Self {
            base: base.expect_kind(ModelKind::Property)?,
        })
    }

    /// The `value` attribute, else the trimmed text content. A body that is
    /// only whitespace is returned as written.
    pub fn value(&self) -> Result<Option<String>> {
        if let Some(value) = self.model_attribute(VALUE)? {
            return Ok(Some(value));
        }
        // Surrounding whitespace is layout, unless it is the whole value.
        Ok(self.model_text()?.map(|text| match text.trim() {
            "" => text,
            trimmed => trimmed.to_string(),
        }))
    }

    /// Write the value as the `value` attribute; `None` clears both forms.
    pub fn set_value(&self, value: Option<&str>) -> Result<&Self> {
        if value.is_none() {
            self.set_model_text(None)?;
        }
        self.set_model_attribute(VALUE, value)
    }
}
