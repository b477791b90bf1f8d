//! Property resolution for configuration values.
//!
//! A [`PropertyResolver`] answers "what is the value of key K?" from one
//! source. [`CompoundPropertyResolver`] chains sources so the first one that
//! knows a key wins, and keeps the chain flat however it was assembled.
//! [`replace_properties`] is the substitution call site: it rewrites `${key}`
//! and `${key:default}` tokens found in attribute or text values.
//!
//! # Example
//!
//! ```rust
//! use cfgmodel_property::{
//!     CompoundPropertyResolver, MapPropertyResolver, PropertyResolver, replace_properties,
//! };
//! use std::sync::Arc;
//!
//! let overrides: Arc<dyn PropertyResolver> =
//!     Arc::new(MapPropertyResolver::new().with("port", "9090"));
//! let defaults: Arc<dyn PropertyResolver> = Arc::new(
//!     MapPropertyResolver::new()
//!         .with("host", "localhost")
//!         .with("port", "8080"),
//! );
//!
//! let resolver = CompoundPropertyResolver::compact([overrides, defaults]);
//! assert_eq!(
//!     replace_properties("${host}:${port}", resolver.as_ref()),
//!     "localhost:9090"
//! );
//! ```

mod compound;
mod sources;
mod substitute;
mod traits;

pub use compound::CompoundPropertyResolver;
pub use sources::{EnvPropertyResolver, FnPropertyResolver, MapPropertyResolver};
pub use substitute::{has_properties, replace_properties};
pub use traits::PropertyResolver;
