//! # Scene Data
//!
//! The vertex record every generator writes: position, normal and RGBA colour
//! interleaved in ten floats.

pub mod vertex;

// Re-export main types
pub use vertex::{VertexRecord, STRIDE_BYTES, STRIDE_FLOATS};
