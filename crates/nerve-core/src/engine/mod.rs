//! # Engine Module
//!
//! Stateful orchestration of a model build: what gets created in the backend,
//! in which order, and how often.
//!
//! ## Overview
//!
//! A build walks cuff templates and sample fascicles and turns them into an
//! ordered sequence of backend calls. Parameters are registered before any
//! primitive, primitives and materials are created at most once per model, and
//! instances are created every time they are listed. Failures that leave the
//! naming state consistent are folded into a [`result::BuildResult`]; naming
//! conflicts propagate as errors.
//!
//! ## Architecture
//!
//! - **Catalog** ([`catalog`]) - Idempotent primitive and material creation, and instance placement
//! - **Primitive Recipes** ([`primitives`]) - The static table of known part primitives
//! - **Planning** ([`plan`]) - The creation order derived from one template
//! - **Orchestration** ([`orchestrator`]) - Template and fascicle builds, current looping, potentials
//! - **Context** ([`context`]) - The backend session and its top-level identifier manager
//! - **Results** ([`result`]) - Per-call outcomes with the identifiers they committed
//! - **Configuration** ([`config`]) - Build settings and their builder
//! - **Progress Monitoring** ([`progress`]) - Progress events for front ends
//! - **Error Handling** ([`error`]) - Creation errors and the engine-wide error type

pub mod catalog;
pub mod config;
pub mod context;
pub mod error;
pub mod orchestrator;
pub mod plan;
pub mod primitives;
pub mod progress;
pub mod result;
