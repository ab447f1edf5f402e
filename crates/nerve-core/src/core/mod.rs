//! # Core Module
//!
//! Stateless building blocks shared by the engine and the workflows.
//!
//! - **Naming** ([`ids`]) - Namespaced identifiers, pseudonyms, and per-part scopes
//! - **Templates** ([`template`]) - Cuff templates, the master configuration, and their store
//! - **Fascicles** ([`fascicle`]) - Sample-derived fascicle geometry listed from disk
//! - **File I/O** ([`io`]) - Interpolation coordinates and extracted potentials as CSV

pub mod fascicle;
pub mod ids;
pub mod io;
pub mod template;
