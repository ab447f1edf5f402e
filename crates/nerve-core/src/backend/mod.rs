//! # Backend Module
//!
//! The modeling engine is an external collaborator. The orchestration only
//! ever talks to it through [`traits::ModelBackend`], which groups the
//! capabilities a build consumes: parameter groups, geometry parts,
//! materials, part instances, physics features, geometry finalization,
//! numerical interpolation, and saving the session.
//!
//! [`recording::RecordingBackend`] is a complete in-memory implementation
//! that keeps the resulting object graph and an ordered journal of every
//! operation, which can be saved as JSON and replayed against a live engine.

pub mod error;
pub mod recording;
pub mod traits;

pub use error::BackendError;
pub use recording::{Journal, NodeKind, Operation, RecordingBackend};
pub use traits::{ContourRole, ModelBackend};
