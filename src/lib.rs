// src/lib.rs
//! GL Sandbox geometry core
//!
//! Procedural shape generators, an interleaved vertex record format and a
//! vertex arena that batches shapes into shared device buffers.

pub mod config;
pub mod error;
pub mod gfx;
pub mod prelude;

// Re-export main types for convenience
pub use config::{ArenaConfig, DegeneratePolicy, HeightMapParams, ShapeStyle, ToroidHelixParams};
pub use error::{GeometryError, GeometryResult};
