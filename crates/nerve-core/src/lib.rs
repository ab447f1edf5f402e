//! # NerveModel Core Library
//!
//! Identifier allocation and build orchestration for parametric nerve-cuff
//! simulation models assembled inside an external modeling engine.
//!
//! ## Architectural Philosophy
//!
//! The library follows a layered architecture so that the naming and ordering
//! logic can be exercised without a live modeling session.
//!
//! - **[`core`]: The Foundation.** Identifiers and the identifier manager,
//!   template and master-config data, fascicle geometry listing, and coordinate I/O.
//!
//! - **[`backend`]: The Collaborator Seam.** The abstract [`backend::ModelBackend`]
//!   trait the orchestration drives, plus an in-memory recording implementation.
//!
//! - **[`engine`]: The Logic Core.** The part catalog, build plans, and the
//!   orchestrator that decides what is created, in what order, exactly once.
//!
//! - **[`workflows`]: The Public API.** The complete model build pipeline, from
//!   master configuration to saved session.

pub mod backend;
pub mod core;
pub mod engine;
pub mod workflows;
