//! Typed configuration models projected over a generic document tree.
//!
//! A model object wraps one element of a [`cfgmodel_tree::Node`] tree and
//! exposes domain accessors for it (`multiplicity()`, `interface()`,
//! `policy_requirements()`) while every read and write goes straight to the
//! tree. Any number of models can view the same element; they never hold
//! copies, so they always agree.
//!
//! # Architecture
//!
//! - [`Descriptor`]: maps local-name prefixes to default namespaces and
//!   [`ModelKind`]s; shared by every model over one document
//! - [`BaseModel`], [`Model`], [`NamedModel`]: the generic projection
//!   (attributes, children by prefix, parent navigation)
//! - [`composite`]: the assembly vocabulary (composites, components, services,
//!   references, interfaces, bindings, implementations, properties)
//! - [`policy`]: the `requires` attribute codec and [`PolicyRequirements`]
//! - [`management`]: serializable read-only summaries for monitoring facades
//!
//! # Example
//!
//! ```rust
//! use cfgmodel::{CompositeModel, Descriptor, NamedModel, PolicyRequirements};
//! use std::sync::Arc;
//!
//! let composite = CompositeModel::parse(
//!     r#"<composite name="orders">
//!          <component name="OrderComponent">
//!            <reference name="Warehouse" requires="transaction"/>
//!          </component>
//!        </composite>"#,
//!     Arc::new(Descriptor::sca()),
//! )?;
//!
//! let reference = composite
//!     .component("OrderComponent")?
//!     .and_then(|component| component.reference("Warehouse").transpose())
//!     .transpose()?
//!     .expect("reference exists");
//!
//! reference.add_policy_requirement("security")?;
//! assert!(reference.has_policy_requirement("transaction")?);
//! assert_eq!(reference.name()?.as_deref(), Some("Warehouse"));
//! assert!(composite.to_xml()?.contains(r#"requires="security transaction""#));
//! # Ok::<(), cfgmodel::ModelError>(())
//! ```

pub mod composite;
pub mod descriptor;
pub mod error;
pub mod management;
pub mod model;
pub mod policy;

pub use composite::{
    BindingModel, ComponentModel, ComponentReferenceModel, ComponentServiceModel, CompositeModel,
    CompositeReferenceModel, CompositeServiceModel, ImplementationModel, InterfaceModel,
    PropertyModel,
};
pub use descriptor::{Descriptor, DescriptorBuilder, ModelKind, SCA_NAMESPACE};
pub use error::{ModelError, Result};
pub use management::{
    BindingSummary, CompositeSummary, MessageMetrics, MetricsSource, ReferenceSummary,
    ServiceSummary,
};
pub use model::{BaseModel, Model, NamedModel};
pub use policy::{PolicyRequirements, get_requires, set_requires};
