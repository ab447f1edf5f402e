//! # Template Module
//!
//! Cuff templates and the master configuration, as the orchestration needs
//! them, plus the [`store::TemplateStore`] abstraction that resolves a name to
//! parsed data.
//!
//! ## Key Components
//!
//! - [`data`] - Parsed cuff template: parameter definitions and part instances
//! - [`master`] - Master configuration: cuff presets, sample location, material table
//! - [`store`] - Name-to-data resolution from a project tree or from memory

pub mod data;
pub mod master;
pub mod store;

pub use data::{InstanceDef, MaterialRef, ParamDef, TemplateData, group_label};
pub use master::MasterConfig;
pub use store::{FsTemplateStore, MemoryTemplateStore, TemplateError, TemplateStore};
