//! `${key}` token substitution.

use crate::PropertyResolver;

/// Replace `${key}` and `${key:default}` tokens in `text`.
///
/// Each token is resolved against `resolver`; a miss falls back to the
/// default after the first `:`, and a miss with no default leaves the token
/// as written. An unterminated `${` and everything after it are copied
/// unchanged. Substituted values are not scanned again.
///
/// ```
/// use cfgmodel_property::{MapPropertyResolver, replace_properties};
///
/// let props = MapPropertyResolver::new().with("host", "example.org");
/// assert_eq!(
///     replace_properties("http://${host}:${port:8080}/${path}", &props),
///     "http://example.org:8080/${path}"
/// );
/// ```
pub fn replace_properties(text: &str, resolver: &dyn PropertyResolver) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];
        let Some(close) = after_open.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };

        let token = &after_open[..close];
        let (key, default) = match token.split_once(':') {
            Some((key, default)) => (key, Some(default)),
            None => (token, None),
        };

        match resolver.resolve_property(key) {
            Some(value) => out.push_str(&value),
            None => match default {
                Some(default) => out.push_str(default),
                None => {
                    tracing::trace!(key, "Unresolved property left in place");
                    out.push_str(&rest[start..start + 2 + close + 1]);
                }
            },
        }
        rest = &after_open[close + 1..];
    }

    out.push_str(rest);
    out
}

/// Whether `text` contains at least one `${...}` token.
pub fn has_properties(text: &str) -> bool {
    text.find("${")
        .is_some_and(|start| text[start + 2..].contains('}'))
}
