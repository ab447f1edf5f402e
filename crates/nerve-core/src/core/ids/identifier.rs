use serde::{Deserialize, Serialize};
use std::fmt;

/// Well-known namespaces used by the top-level identifier manager.
pub mod namespace {
    /// Parameter groups, one per loaded template.
    pub const PARAMETERS: &str = "par";
    /// Geometry part primitives.
    pub const PART: &str = "part";
    /// Material definitions.
    pub const MATERIAL: &str = "mat";
    /// Part instances placed into the model geometry.
    pub const PART_INSTANCE: &str = "pi";
    /// Numerical interpolation results.
    pub const INTERPOLATION: &str = "interp";
    /// Point current sources attached to contact instances.
    pub const CURRENT_SOURCE: &str = "pcs";
}

/// An opaque, namespaced name for one object in the external model.
///
/// Identifiers are rendered as the namespace prefix immediately followed by
/// the decimal counter value, e.g. `par3`. Namespaces are expected to be
/// alphabetic so that the prefix can be recovered from the rendered form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    pub(crate) fn new(namespace: &str, index: u64) -> Self {
        Self(format!("{namespace}{index}"))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the namespace prefix of this identifier.
    ///
    /// # Return
    ///
    /// The leading non-digit portion of the rendered identifier.
    pub fn namespace(&self) -> &str {
        self.0.trim_end_matches(|c: char| c.is_ascii_digit())
    }

    /// Returns the counter value encoded in this identifier, if any.
    pub fn index(&self) -> Option<u64> {
        self.0[self.namespace().len()..].parse().ok()
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_namespace_followed_by_index() {
        let id = Identifier::new(namespace::PARAMETERS, 3);
        assert_eq!(id.as_str(), "par3");
        assert_eq!(id.to_string(), "par3");
    }

    #[test]
    fn namespace_and_index_are_recoverable() {
        let id = Identifier::new(namespace::INTERPOLATION, 42);
        assert_eq!(id.namespace(), "interp");
        assert_eq!(id.index(), Some(42));
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = Identifier::new(namespace::PART_INSTANCE, 0);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"pi0\"");
        let back: Identifier = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
