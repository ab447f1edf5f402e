use super::identifier::Identifier;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentifierError {
    #[error(
        "Pseudonym '{pseudonym}' is already bound to '{existing}'; refusing to rebind it in namespace '{namespace}'"
    )]
    DuplicatePseudonym {
        pseudonym: String,
        existing: Identifier,
        namespace: String,
    },

    #[error("Pseudonym '{0}' is not bound to any identifier")]
    UnknownPseudonym(String),

    #[error("A child scope named '{0}' is already registered")]
    DuplicateScope(String),
}

/// A position in the manager's issue log, used to report what was minted
/// after a given point in a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Checkpoint(usize);

/// Allocates unique, namespaced identifiers and binds human-readable
/// pseudonyms to them.
///
/// Each namespace has its own monotonically increasing counter starting at
/// zero, so identifiers are never reused for the lifetime of the manager.
/// A pseudonym may be bound at most once; attempts to rebind fail loudly.
///
/// Child managers scope the internal features of a single part primitive.
/// They are owned exclusively by this manager's scope registry, keyed by the
/// type name, and are never shared. A completed material registers an empty
/// scope, so a registered scope means the named thing exists in the model.
#[derive(Debug, Clone, Default)]
pub struct IdentifierManager {
    /// Next counter value per namespace.
    counters: HashMap<String, u64>,
    /// Pseudonym bindings; immutable once inserted.
    pseudonyms: HashMap<String, Identifier>,
    /// Every identifier minted by this manager, in issue order.
    issued: Vec<Identifier>,
    /// Child managers keyed by the name of the thing they scope.
    scopes: HashMap<String, IdentifierManager>,
}

impl IdentifierManager {
    /// Creates an empty manager with no counters, bindings, or scopes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a fresh identifier in `namespace`.
    ///
    /// # Arguments
    ///
    /// * `namespace` - The namespace prefix, e.g. `"par"`.
    ///
    /// # Return
    ///
    /// The next identifier in the namespace. This operation never fails.
    pub fn next(&mut self, namespace: &str) -> Identifier {
        let counter = self.counters.entry(namespace.to_string()).or_insert(0);
        let id = Identifier::new(namespace, *counter);
        *counter += 1;
        self.issued.push(id.clone());
        id
    }

    /// Allocates a fresh identifier in `namespace` and binds `pseudonym` to it.
    ///
    /// # Arguments
    ///
    /// * `namespace` - The namespace prefix.
    /// * `pseudonym` - The human-chosen label to bind.
    ///
    /// # Return
    ///
    /// The newly allocated identifier.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError::DuplicatePseudonym`] if `pseudonym` is already
    /// bound. No counter is advanced in that case.
    pub fn next_named(
        &mut self,
        namespace: &str,
        pseudonym: &str,
    ) -> Result<Identifier, IdentifierError> {
        if let Some(existing) = self.pseudonyms.get(pseudonym) {
            return Err(IdentifierError::DuplicatePseudonym {
                pseudonym: pseudonym.to_string(),
                existing: existing.clone(),
                namespace: namespace.to_string(),
            });
        }
        let id = self.next(namespace);
        self.pseudonyms.insert(pseudonym.to_string(), id.clone());
        Ok(id)
    }

    /// Looks up the identifier bound to `pseudonym`.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError::UnknownPseudonym`] if nothing is bound.
    pub fn get(&self, pseudonym: &str) -> Result<&Identifier, IdentifierError> {
        self.pseudonyms
            .get(pseudonym)
            .ok_or_else(|| IdentifierError::UnknownPseudonym(pseudonym.to_string()))
    }

    /// Returns whether `pseudonym` is bound in this manager.
    pub fn has_pseudonym(&self, pseudonym: &str) -> bool {
        self.pseudonyms.contains_key(pseudonym)
    }

    /// Returns how many identifiers have been issued in `namespace`.
    pub fn issued_in(&self, namespace: &str) -> u64 {
        self.counters.get(namespace).copied().unwrap_or(0)
    }

    /// Returns every identifier minted so far, in issue order.
    pub fn issued(&self) -> &[Identifier] {
        &self.issued
    }

    /// Marks the current end of the issue log.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.issued.len())
    }

    /// Returns the identifiers minted after `checkpoint`, in issue order.
    pub fn issued_since(&self, checkpoint: Checkpoint) -> &[Identifier] {
        self.issued.get(checkpoint.0..).unwrap_or(&[])
    }

    /// Iterates over all pseudonym bindings in unspecified order.
    pub fn pseudonyms(&self) -> impl Iterator<Item = (&str, &Identifier)> {
        self.pseudonyms.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Takes ownership of a child manager under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError::DuplicateScope`] if a scope with that name
    /// already exists; the existing scope is left untouched.
    pub fn adopt_scope(
        &mut self,
        name: &str,
        child: IdentifierManager,
    ) -> Result<(), IdentifierError> {
        if self.scopes.contains_key(name) {
            return Err(IdentifierError::DuplicateScope(name.to_string()));
        }
        self.scopes.insert(name.to_string(), child);
        Ok(())
    }

    /// Returns the child manager registered under `name`.
    pub fn scope(&self, name: &str) -> Option<&IdentifierManager> {
        self.scopes.get(name)
    }
}
