//! # Workflows Module
//!
//! Top-level entry points that run a complete model build.
//!
//! ## Overview
//!
//! A workflow loads the project's master configuration, builds every cuff
//! preset it names, adds the sample's fascicles, finalizes the geometry,
//! applies stimulation currents, and saves the session. Each step reports
//! progress and the outcome of every step is gathered into one report.
//!
//! - **Build Workflow** ([`build`]) - The full master-configuration-driven build

pub mod build;
