//! The PropertyResolver trait.

use crate::compound::CompoundPropertyResolver;

/// A single source of property values.
///
/// Resolvers are lookups, not stores: resolving the same key twice against an
/// unchanged source gives the same answer. A miss (`None`) is an ordinary
/// outcome and callers are expected to fall through to another source or a
/// default.
///
/// # Thread Safety
///
/// Resolvers must be `Send + Sync` so that a composed resolver can be shared
/// behind an `Arc` by everything that substitutes properties.
///
/// # Example
///
/// ```
/// use cfgmodel_property::PropertyResolver;
///
/// struct Fixed;
///
/// impl PropertyResolver for Fixed {
///     fn resolve_property(&self, key: &str) -> Option<String> {
///         (key == "port").then(|| "8080".to_string())
///     }
/// }
///
/// assert_eq!(Fixed.resolve_property("port").as_deref(), Some("8080"));
/// assert_eq!(Fixed.resolve_optional(None), None);
/// ```
pub trait PropertyResolver: Send + Sync {
    /// Look up `key` in this source.
    fn resolve_property(&self, key: &str) -> Option<String>;

    /// Look up a key that may itself be absent.
    ///
    /// An absent key resolves to `None` without consulting the source.
    fn resolve_optional(&self, key: Option<&str>) -> Option<String> {
        key.and_then(|key| self.resolve_property(key))
    }

    /// Short label used in logs and `Debug` output.
    fn kind(&self) -> &'static str {
        "custom"
    }

    /// Downcast hook used to inline nested compounds instead of nesting them.
    fn as_compound(&self) -> Option<&CompoundPropertyResolver> {
        None
    }
}

impl std::fmt::Debug for dyn PropertyResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertyResolver")
            .field("kind", &self.kind())
            .finish()
    }
}
