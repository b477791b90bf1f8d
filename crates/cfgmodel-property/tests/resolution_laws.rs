//! Property-based checks of compound resolution.

use cfgmodel_property::{CompoundPropertyResolver, MapPropertyResolver, PropertyResolver};
use proptest::collection::{btree_map, vec};
use proptest::prelude::*;
use std::collections::BTreeMap;
use std::sync::Arc;

fn gen_source() -> impl Strategy<Value = BTreeMap<String, String>> {
    btree_map("[a-e]", "[a-z0-9]{0,4}", 0..4)
}

fn to_resolver(source: &BTreeMap<String, String>) -> Arc<dyn PropertyResolver> {
    Arc::new(
        source
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect::<MapPropertyResolver>(),
    )
}

/// Reference semantics: the first source that has the key.
fn expected(sources: &[BTreeMap<String, String>], key: &str) -> Option<String> {
    sources.iter().find_map(|s| s.get(key).cloned())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The compound answers with the first non-absent source.
    #[test]
    fn test_first_non_absent_source_wins(sources in vec(gen_source(), 1..5), key in "[a-f]") {
        let resolvers: Vec<_> = sources.iter().map(to_resolver).collect();
        let compound = CompoundPropertyResolver::new(resolvers);
        prop_assert_eq!(compound.resolve_property(&key), expected(&sources, &key));
    }

    /// Splitting the sources into a nested compound plus the rest changes nothing.
    #[test]
    fn test_nesting_is_equivalent_to_flat(
        sources in vec(gen_source(), 2..6),
        split in 1usize..5,
        key in "[a-f]",
    ) {
        let split = split.min(sources.len() - 1);
        let resolvers: Vec<_> = sources.iter().map(to_resolver).collect();

        let head: Arc<dyn PropertyResolver> =
            Arc::new(CompoundPropertyResolver::new(resolvers[..split].to_vec()));
        let mut nested_input = vec![head];
        nested_input.extend(resolvers[split..].iter().cloned());
        let nested = CompoundPropertyResolver::new(nested_input);
        let flat = CompoundPropertyResolver::new(resolvers.clone());

        prop_assert_eq!(nested.len(), flat.len());
        prop_assert!(nested.resolvers().iter().all(|r| r.as_compound().is_none()));
        prop_assert_eq!(nested.resolve_property(&key), flat.resolve_property(&key));
    }

    /// Compacting behaves exactly like the uncompacted compound.
    #[test]
    fn test_compact_preserves_resolution(sources in vec(gen_source(), 0..4), key in "[a-f]") {
        let resolvers: Vec<_> = sources.iter().map(to_resolver).collect();
        let compact = CompoundPropertyResolver::compact(resolvers.clone());
        let compound = CompoundPropertyResolver::new(resolvers);
        prop_assert_eq!(compact.resolve_property(&key), compound.resolve_property(&key));
    }
}
