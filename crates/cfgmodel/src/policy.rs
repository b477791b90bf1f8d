//! Policy requirements packed into one `requires` attribute.
//!
//! The attribute value is a whitespace-delimited token list. Reading collapses
//! duplicates; writing emits the tokens sorted and space-separated so the same
//! set always produces the same text. An empty set removes the attribute.

use crate::model::Model;
use crate::{ModelError, Result};
use std::collections::BTreeSet;

/// Attribute holding the requirement names.
pub const REQUIRES: &str = "requires";

/// Decode the requirement set of `model`. A missing attribute is the empty set.
pub fn get_requires<M: Model + ?Sized>(model: &M) -> Result<BTreeSet<String>> {
    Ok(match model.model_attribute(REQUIRES)? {
        Some(value) => decode(&value),
        None => BTreeSet::new(),
    })
}

/// Encode `requirements` onto `model`, replacing whatever was there.
pub fn set_requires<M, I, S>(model: &M, requirements: I) -> Result<()>
where
    M: Model + ?Sized,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut tokens = BTreeSet::new();
    for requirement in requirements {
        let token = requirement.as_ref();
        validate_token(token)?;
        tokens.insert(token.to_string());
    }

    model.ensure_attached()?;
    let node = model.base().node();
    if tokens.is_empty() {
        node.set_attribute(REQUIRES, None);
    } else {
        let encoded = encode(&tokens);
        node.set_attribute(REQUIRES, Some(encoded.as_str()));
    }
    Ok(())
}

fn decode(value: &str) -> BTreeSet<String> {
    value.split_whitespace().map(str::to_string).collect()
}

fn encode(tokens: &BTreeSet<String>) -> String {
    tokens.iter().map(String::as_str).collect::<Vec<_>>().join(" ")
}

fn validate_token(token: &str) -> Result<()> {
    if token.is_empty() {
        return Err(ModelError::invalid_name(token, "policy requirement is empty"));
    }
    if token.chars().any(char::is_whitespace) {
        return Err(ModelError::invalid_name(
            token,
            "policy requirement contains whitespace",
        ));
    }
    Ok(())
}

/// Requirement accessors for models that carry a `requires` attribute.
pub trait PolicyRequirements: Model {
    fn policy_requirements(&self) -> Result<BTreeSet<String>> {
        get_requires(self)
    }

    /// Replace the whole set.
    fn set_policy_requirements<I, S>(&self, requirements: I) -> Result<()>
    where
        Self: Sized,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        set_requires(self, requirements)
    }

    /// Read, insert, and write back. Not atomic: concurrent writers lose updates.
    fn add_policy_requirement(&self, requirement: &str) -> Result<()> {
        let mut requirements = get_requires(self)?;
        if requirements.insert(requirement.to_string()) {
            set_requires(self, &requirements)?;
        } else {
            validate_token(requirement)?;
        }
        Ok(())
    }

    fn remove_policy_requirement(&self, requirement: &str) -> Result<bool> {
        let mut requirements = get_requires(self)?;
        let removed = requirements.remove(requirement);
        if removed {
            set_requires(self, &requirements)?;
        }
        Ok(removed)
    }

    fn has_policy_requirement(&self, requirement: &str) -> Result<bool> {
        Ok(get_requires(self)?.contains(requirement))
    }
}
