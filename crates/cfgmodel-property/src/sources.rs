//! Leaf property sources.

use crate::PropertyResolver;
use indexmap::IndexMap;

/// Properties held in an ordered in-memory map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapPropertyResolver {
    properties: IndexMap<String, String>,
}

impl MapPropertyResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a property, replacing any earlier value for the same key.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.properties.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for MapPropertyResolver
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            properties: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl PropertyResolver for MapPropertyResolver {
    fn resolve_property(&self, key: &str) -> Option<String> {
        self.properties.get(key).cloned()
    }

    fn kind(&self) -> &'static str {
        "map"
    }
}

/// Properties read from the process environment.
///
/// With a key prefix (for example `env.`), only keys carrying that prefix are
/// answered and the prefix is stripped before the variable lookup, so
/// `${env.HOME}` reads `HOME`.
#[derive(Debug, Clone, Default)]
pub struct EnvPropertyResolver {
    key_prefix: Option<String>,
}

impl EnvPropertyResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key_prefix(prefix: impl Into<String>) -> Self {
        Self {
            key_prefix: Some(prefix.into()),
        }
    }
}

impl PropertyResolver for EnvPropertyResolver {
    fn resolve_property(&self, key: &str) -> Option<String> {
        let name = match &self.key_prefix {
            Some(prefix) => key.strip_prefix(prefix.as_str())?,
            None => key,
        };
        if name.is_empty() {
            return None;
        }
        std::env::var(name).ok()
    }

    fn kind(&self) -> &'static str {
        "env"
    }
}

/// Properties computed by a closure.
pub struct FnPropertyResolver<F> {
    resolve: F,
}

impl<F> FnPropertyResolver<F>
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    pub fn new(resolve: F) -> Self {
        Self { resolve }
    }
}

impl<F> PropertyResolver for FnPropertyResolver<F>
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    fn resolve_property(&self, key: &str) -> Option<String> {
        (self.resolve)(key)
    }

    fn kind(&self) -> &'static str {
        "fn"
    }
}
