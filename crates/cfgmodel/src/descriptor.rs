//! Schema descriptors: default namespaces and type bindings by name prefix.
//!
//! A [`Descriptor`] is attached when models are created and is shared (via
//! `Arc`) by every model over the same document. It answers two questions
//! about a local name such as `interface.java`:
//!
//! - which namespace a freshly created element with that name belongs in, and
//! - which [`ModelKind`] the element projects to.
//!
//! Both use the longest matching prefix, so `binding.sca` can be bound more
//! specifically than `binding`.
//!
//! Descriptors can be built in code or read from TOML:
//!
//! ```toml
//! extends = "sca"
//!
//! [namespaces]
//! "binding.rest" = "urn:example:rest"
//!
//! [bindings]
//! "binding.rest" = "binding"
//! ```

use crate::{ModelError, Result};
use cfgmodel_tree::QualifiedName;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Namespace of the SCA 1.1 assembly vocabulary.
pub const SCA_NAMESPACE: &str = "http://docs.oasis-open.org/ns/opencsa/sca/200912";

/// The model type an element projects to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModelKind {
    Composite,
    Component,
    /// A service; component-level or composite-level depending on the parent.
    Service,
    /// A reference; component-level or composite-level depending on the parent.
    Reference,
    Interface,
    Binding,
    Implementation,
    Property,
    Unknown,
}

impl ModelKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ModelKind::Composite => "composite",
            ModelKind::Component => "component",
            ModelKind::Service => "service",
            ModelKind::Reference => "reference",
            ModelKind::Interface => "interface",
            ModelKind::Binding => "binding",
            ModelKind::Implementation => "implementation",
            ModelKind::Property => "property",
            ModelKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        let kind = match s {
            "composite" => ModelKind::Composite,
            "component" => ModelKind::Component,
            "service" => ModelKind::Service,
            "reference" => ModelKind::Reference,
            "interface" => ModelKind::Interface,
            "binding" => ModelKind::Binding,
            "implementation" => ModelKind::Implementation,
            "property" => ModelKind::Property,
            "unknown" => ModelKind::Unknown,
            _ => return Err(ModelError::invalid_name(s, "not a known model kind")),
        };
        Ok(kind)
    }
}

/// Immutable mapping from local-name prefixes to namespaces and model kinds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Descriptor {
    namespaces: IndexMap<String, String>,
    bindings: IndexMap<String, ModelKind>,
}

/// Builder for [`Descriptor`].
#[derive(Debug, Clone, Default)]
pub struct DescriptorBuilder {
    descriptor: Descriptor,
}

/// On-disk form of a descriptor.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DescriptorFile {
    #[serde(default)]
    extends: Option<String>,
    #[serde(default)]
    namespaces: IndexMap<String, String>,
    #[serde(default)]
    bindings: IndexMap<String, String>,
}

impl Descriptor {
    pub fn builder() -> DescriptorBuilder {
        DescriptorBuilder::default()
    }

    /// The SCA assembly vocabulary: composites, components, services,
    /// references, properties, interfaces, bindings, and implementations, all
    /// in [`SCA_NAMESPACE`].
    pub fn sca() -> Self {
        let kinds = [
            ("composite", ModelKind::Composite),
            ("component", ModelKind::Component),
            ("service", ModelKind::Service),
            ("reference", ModelKind::Reference),
            ("property", ModelKind::Property),
            ("interface", ModelKind::Interface),
            ("binding", ModelKind::Binding),
            ("implementation", ModelKind::Implementation),
        ];
        kinds
            .into_iter()
            .fold(Self::builder(), |builder, (prefix, kind)| {
                builder.namespace(prefix, SCA_NAMESPACE).binding(prefix, kind)
            })
            .build()
    }

    /// Read a descriptor from TOML.
    ///
    /// `extends = "sca"` starts from [`Descriptor::sca`]; entries in the file
    /// are added on top.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: DescriptorFile =
            toml::from_str(content).map_err(|e| ModelError::InvalidDescriptor {
                message: e.to_string(),
            })?;

        let mut builder = match file.extends.as_deref() {
            None => Self::builder(),
            Some("sca") => Self::sca().to_builder(),
            Some(other) => {
                return Err(ModelError::InvalidDescriptor {
                    message: format!("unknown base descriptor '{}'", other),
                });
            }
        };
        for (prefix, uri) in &file.namespaces {
            builder = builder.namespace(prefix, uri);
        }
        for (prefix, kind) in &file.bindings {
            builder = builder.binding(prefix, kind.parse()?);
        }
        Ok(builder.build())
    }

    pub fn to_builder(&self) -> DescriptorBuilder {
        DescriptorBuilder {
            descriptor: self.clone(),
        }
    }

    /// Default namespace for a new element named `local_name`.
    pub fn namespace_for(&self, local_name: &str) -> Option<&str> {
        longest_prefix(&self.namespaces, local_name).map(String::as_str)
    }

    /// Model kind bound to `local_name`, or [`ModelKind::Unknown`].
    pub fn kind_of(&self, local_name: &str) -> ModelKind {
        longest_prefix(&self.bindings, local_name)
            .copied()
            .unwrap_or(ModelKind::Unknown)
    }

    /// Qualified name for a new element, namespaced per this descriptor.
    pub fn qualified_name(&self, local_name: &str) -> Result<QualifiedName> {
        Ok(QualifiedName::new(self.namespace_for(local_name), local_name)?)
    }
}

impl DescriptorBuilder {
    /// Map names starting with `prefix` to namespace `uri`.
    pub fn namespace(mut self, prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        self.descriptor
            .namespaces
            .insert(prefix.into(), uri.into());
        self
    }

    /// Map names starting with `prefix` to `kind`.
    pub fn binding(mut self, prefix: impl Into<String>, kind: ModelKind) -> Self {
        self.descriptor.bindings.insert(prefix.into(), kind);
        self
    }

    pub fn build(self) -> Descriptor {
        self.descriptor
    }
}

fn longest_prefix<'a, V>(map: &'a IndexMap<String, V>, name: &str) -> Option<&'a V> {
    map.iter()
        .filter(|(prefix, _)| name.starts_with(prefix.as_str()))
        .max_by_key(|(prefix, _)| prefix.len())
        .map(|(_, value)| value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sca_kinds() {
        let desc = Descriptor::sca();
        assert_eq!(desc.kind_of("composite"), ModelKind::Composite);
        assert_eq!(desc.kind_of("component"), ModelKind::Component);
        assert_eq!(desc.kind_of("interface.java"), ModelKind::Interface);
        assert_eq!(desc.kind_of("binding.sca"), ModelKind::Binding);
        assert_eq!(desc.kind_of("implementation.bpel"), ModelKind::Implementation);
        assert_eq!(desc.kind_of("wire"), ModelKind::Unknown);
    }

    #[test]
    fn test_namespace_for_new_elements() {
        let desc = Descriptor::sca();
        let name = desc.qualified_name("reference").unwrap();
        assert_eq!(name.namespace(), Some(SCA_NAMESPACE));
        assert_eq!(desc.namespace_for("unrelated"), None);
    }

    #[test]
    fn test_longest_prefix_wins() {
        let desc = Descriptor::sca()
            .to_builder()
            .namespace("binding.rest", "urn:rest")
            .build();
        assert_eq!(desc.namespace_for("binding.rest"), Some("urn:rest"));
        assert_eq!(desc.namespace_for("binding.soap"), Some(SCA_NAMESPACE));
    }

    #[test]
    fn test_qualified_name_rejects_bad_names() {
        let desc = Descriptor::sca();
        assert!(matches!(
            desc.qualified_name("interface java"),
            Err(ModelError::InvalidName { .. })
        ));
    }

    #[test]
    fn test_from_toml_extends_sca() {
        let desc = Descriptor::from_toml_str(
            r#"
extends = "sca"

[namespaces]
"binding.rest" = "urn:example:rest"

[bindings]
"transform" = "unknown"
"switchyard" = "composite"
"#,
        )
        .unwrap();

        assert_eq!(desc.namespace_for("binding.rest"), Some("urn:example:rest"));
        assert_eq!(desc.kind_of("switchyard"), ModelKind::Composite);
        assert_eq!(desc.kind_of("component"), ModelKind::Component);
    }

    #[test]
    fn test_from_toml_empty_base() {
        let desc = Descriptor::from_toml_str("[bindings]\nnode = \"component\"\n").unwrap();
        assert_eq!(desc.kind_of("node"), ModelKind::Component);
        assert_eq!(desc.kind_of("component"), ModelKind::Unknown);
    }

    #[test]
    fn test_from_toml_unknown_kind() {
        let err = Descriptor::from_toml_str("[bindings]\nx = \"widget\"\n").unwrap_err();
        assert!(matches!(err, ModelError::InvalidName { name, .. } if name == "widget"));
    }

    #[test]
    fn test_from_toml_rejects_unknown_base_and_fields() {
        assert!(matches!(
            Descriptor::from_toml_str("extends = \"xsd\"\n"),
            Err(ModelError::InvalidDescriptor { .. })
        ));
        assert!(matches!(
            Descriptor::from_toml_str("colour = 1\n"),
            Err(ModelError::InvalidDescriptor { .. })
        ));
    }
}
