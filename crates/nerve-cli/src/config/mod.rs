//! Layered build settings: built-in defaults, then an optional TOML file,
//! then `-S key=value` assignments, then command-line flags.

pub mod builder;
pub mod defaults;
pub mod file;
pub mod models;
