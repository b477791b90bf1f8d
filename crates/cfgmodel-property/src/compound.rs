//! Ordered composition of property resolvers.
//!
//! A [`CompoundPropertyResolver`] consults its sources in construction order
//! and returns the first hit. Composition is flat: adding a compound inlines
//! its sources, so a lookup never walks more than one level of compounding no
//! matter how the composition was assembled.

use crate::PropertyResolver;
use std::sync::Arc;

/// Resolves properties from multiple sources, first match wins.
#[derive(Debug, Default)]
pub struct CompoundPropertyResolver {
    /// Leaf sources, unique by identity, never a compound.
    resolvers: Vec<Arc<dyn PropertyResolver>>,
}

impl CompoundPropertyResolver {
    /// Build a compound from candidate sources.
    ///
    /// `None` entries are skipped, a source already present (by `Arc`
    /// identity) is skipped, and a compound candidate contributes its own
    /// sources in order instead of being nested.
    ///
    /// A compound is immutable once built and only becomes shareable after
    /// construction, so it can never appear among its own sources.
    pub fn new<I, R>(resolvers: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Option<Arc<dyn PropertyResolver>>>,
    {
        let mut compound = Self::default();
        for resolver in resolvers {
            if let Some(resolver) = resolver.into() {
                compound.add_resolver(resolver);
            }
        }
        compound
    }

    /// Build a compound, then drop the wrapper if only one source remains.
    ///
    /// The result is never absent: with no usable sources it is an empty
    /// compound that resolves every key to `None`.
    ///
    /// ```
    /// use cfgmodel_property::{CompoundPropertyResolver, MapPropertyResolver, PropertyResolver};
    /// use std::sync::Arc;
    ///
    /// let only: Arc<dyn PropertyResolver> = Arc::new(MapPropertyResolver::new().with("a", "1"));
    /// let compact = CompoundPropertyResolver::compact([None, Some(only.clone()), None]);
    /// assert!(Arc::ptr_eq(&compact, &only));
    /// ```
    pub fn compact<I, R>(resolvers: I) -> Arc<dyn PropertyResolver>
    where
        I: IntoIterator<Item = R>,
        R: Into<Option<Arc<dyn PropertyResolver>>>,
    {
        let mut compound = Self::new(resolvers);
        if compound.resolvers.len() == 1 {
            if let Some(only) = compound.resolvers.pop() {
                tracing::trace!(kind = only.kind(), "Compacted resolver to its only source");
                return only;
            }
        }
        Arc::new(compound)
    }

    fn add_resolver(&mut self, resolver: Arc<dyn PropertyResolver>) {
        if self.contains(&resolver) {
            return;
        }
        match resolver.as_compound() {
            Some(nested) => {
                tracing::trace!(
                    sources = nested.resolvers.len(),
                    "Flattening nested compound resolver"
                );
                for inner in &nested.resolvers {
                    self.add_resolver(Arc::clone(inner));
                }
            }
            None => self.resolvers.push(resolver),
        }
    }

    fn contains(&self, resolver: &Arc<dyn PropertyResolver>) -> bool {
        self.resolvers.iter().any(|r| Arc::ptr_eq(r, resolver))
    }

    /// The flattened sources, in lookup order.
    pub fn resolvers(&self) -> &[Arc<dyn PropertyResolver>] {
        &self.resolvers
    }

    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }
}

impl PropertyResolver for CompoundPropertyResolver {
    fn resolve_property(&self, key: &str) -> Option<String> {
        self.resolvers
            .iter()
            .find_map(|resolver| resolver.resolve_property(key))
    }

    fn kind(&self) -> &'static str {
        "compound"
    }

    fn as_compound(&self) -> Option<&CompoundPropertyResolver> {
        Some(self)
    }
}
