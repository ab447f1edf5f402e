//! # Identifier Module
//!
//! Every object created in the external model receives a unique, stable,
//! human-traceable name. Names are a namespace prefix followed by a counter
//! (`par0`, `part3`, `pi12`), so repeated runs of the same build produce the
//! same names in the same order.
//!
//! ## Key Components
//!
//! - [`identifier`] - The [`Identifier`](identifier::Identifier) value type and well-known namespaces
//! - [`manager`] - The [`IdentifierManager`](manager::IdentifierManager) that mints identifiers,
//!   binds pseudonyms, and owns per-part child scopes
//!
//! ```ignore
//! use nervemodel::core::ids::{namespace, manager::IdentifierManager};
//!
//! let mut ids = IdentifierManager::new();
//! let part = ids.next_named(namespace::PART, "TubeCuff_Primitive")?;
//! assert_eq!(part.as_str(), "part0");
//! assert_eq!(ids.get("TubeCuff_Primitive")?, &part);
//! ```

pub mod identifier;
pub mod manager;

pub use identifier::{Identifier, namespace};
pub use manager::{Checkpoint, IdentifierError, IdentifierManager};
