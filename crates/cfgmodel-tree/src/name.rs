//! Qualified names (namespace URI + local name).

use crate::{Error, Result};
use std::fmt;
use std::hash::{Hash, Hasher};

/// The namespace bound to the reserved `xml` prefix.
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// A namespace-qualified element name.
///
/// Two names are equal when their namespace and local name are equal; the
/// prefix is presentation only and is kept so that documents can be written
/// back the way they were read.
#[derive(Debug, Clone)]
pub struct QualifiedName {
    namespace: Option<String>,
    local_name: String,
    prefix: Option<String>,
}

impl QualifiedName {
    /// Create a name in the given namespace.
    pub fn new(namespace: Option<&str>, local_name: &str) -> Result<Self> {
        validate_name(local_name)?;
        Ok(Self {
            namespace: namespace.filter(|ns| !ns.is_empty()).map(str::to_string),
            local_name: local_name.to_string(),
            prefix: None,
        })
    }

    /// Create a name with no namespace.
    pub fn local(local_name: &str) -> Result<Self> {
        Self::new(None, local_name)
    }

    /// Parse Clark notation: `{uri}local` or a bare `local`.
    pub fn parse(text: &str) -> Result<Self> {
        match text.strip_prefix('{') {
            Some(rest) => {
                let close = rest
                    .find('}')
                    .ok_or_else(|| Error::invalid_name(text, "missing '}' after namespace"))?;
                let (namespace, local) = (&rest[..close], &rest[close + 1..]);
                Self::new(Some(namespace), local)
            }
            None => Self::local(text),
        }
    }

    /// Attach a presentation prefix (e.g. `sca` in `<sca:composite>`).
    pub fn with_prefix(mut self, prefix: Option<&str>) -> Self {
        self.prefix = prefix.filter(|p| !p.is_empty()).map(str::to_string);
        self
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// The name as it appears in markup: `prefix:local` or `local`.
    pub fn markup_name(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}:{}", prefix, self.local_name),
            None => self.local_name.clone(),
        }
    }
}

impl PartialEq for QualifiedName {
    fn eq(&self, other: &Self) -> bool {
        self.namespace == other.namespace && self.local_name == other.local_name
    }
}

impl Eq for QualifiedName {}

impl Hash for QualifiedName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.namespace.hash(state);
        self.local_name.hash(state);
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{}}}{}", ns, self.local_name),
            None => f.write_str(&self.local_name),
        }
    }
}

/// Check that `name` can be used as an element or attribute local name.
pub fn validate_name(name: &str) -> Result<()> {
    let Some(first) = name.chars().next() else {
        return Err(Error::invalid_name(name, "name is empty"));
    };
    if first.is_ascii_digit() || first == '-' || first == '.' {
        return Err(Error::invalid_name(
            name,
            "name must not start with a digit, '-' or '.'",
        ));
    }
    if let Some(bad) = name.chars().find(|c| is_forbidden(*c)) {
        return Err(Error::invalid_name(
            name,
            format!("character {:?} is not allowed", bad),
        ));
    }
    Ok(())
}

fn is_forbidden(c: char) -> bool {
    c.is_whitespace() || matches!(c, ':' | '{' | '}' | '<' | '>' | '/' | '=' | '"' | '\'' | '&')
}
