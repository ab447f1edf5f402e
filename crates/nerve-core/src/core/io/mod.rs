//! # I/O Module
//!
//! File formats exchanged with the outside world that are not templates.
//!
//! - [`coords`] - Interpolation coordinates in and extracted potentials out, as CSV
//!
//! These formats are library API for callers that drive a backend with a
//! field solver attached. The `nervemodel` binary only builds and saves
//! models, so it never reads coordinates and never exits with the
//! coordinate-file code.

pub mod coords;
