//! In-place `${key}` substitution across a whole tree.

use cfgmodel_property::{PropertyResolver, has_properties, replace_properties};
use cfgmodel_tree::Node;

/// Rewrite property tokens in every attribute value and text below `node`.
///
/// Returns the number of values that changed.
pub fn substitute_tree(node: &Node, resolver: &dyn PropertyResolver) -> usize {
    let mut changed = 0;

    for (name, value) in node.attributes() {
        if let Some(replaced) = substitute(&value, resolver) {
            node.set_attribute(&name, Some(&replaced));
            changed += 1;
        }
    }
    if let Some(replaced) = node.text().and_then(|text| substitute(&text, resolver)) {
        node.set_text(Some(&replaced));
        changed += 1;
    }

    for child in node.children() {
        changed += substitute_tree(&child, resolver);
    }
    changed
}

fn substitute(value: &str, resolver: &dyn PropertyResolver) -> Option<String> {
    if !has_properties(value) {
        return None;
    }
    let replaced = replace_properties(value, resolver);
    (replaced != value).then_some(replaced)
}
