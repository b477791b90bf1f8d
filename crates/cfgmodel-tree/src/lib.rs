//! Ordered, attributed document trees with qualified names.
//!
//! This crate is the generic layer underneath the typed configuration models in
//! `cfgmodel`. A [`Node`] is a shared handle to one element: it has a
//! [`QualifiedName`], an ordered attribute map, ordered children, optional text,
//! and a weak link to its parent. Several handles (and several typed views) can
//! point at the same element and all of them observe each other's writes.
//!
//! # Overview
//!
//! The main types are:
//! - [`Node`]: An element with attributes, children, text, and a parent link
//! - [`QualifiedName`]: Namespace URI + local name (with an optional markup prefix)
//! - [`parse`] / [`write`]: Reading and writing the tree as XML via quick-xml
//!
//! # Example
//!
//! ```rust
//! use cfgmodel_tree::parse;
//!
//! let root = parse(r#"<composite name="orders">
//!   <component name="OrderService">
//!     <reference name="inventory" multiplicity="1..1"/>
//!   </component>
//! </composite>"#).unwrap();
//!
//! let component = root.child(0).unwrap();
//! let reference = component.child(0).unwrap();
//! assert_eq!(reference.attribute("multiplicity").as_deref(), Some("1..1"));
//! assert!(reference.parent().unwrap().ptr_eq(&component));
//! ```

pub mod error;
pub mod name;
pub mod node;
pub mod parser;
pub mod writer;

// Re-export main types
pub use error::{Error, Result};
pub use name::{QualifiedName, XML_NAMESPACE, validate_name};
pub use node::Node;
pub use parser::parse;
pub use writer::{write, write_pretty, write_to};
