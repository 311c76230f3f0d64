//! # Prelude
//!
//! Commonly used types in one import.
//!
//! ```rust
//! use glsandbox::prelude::*;
//!
//! let mut arena = VertexArena::new(HostBackend::new());
//! let span = ellipse_body(&mut arena, 12, 1.0, 2.0, [1.0; 4]).unwrap();
//! assert_eq!(span.vertex_count, 72);
//! ```

// Re-export configuration and errors
pub use crate::config::{ArenaConfig, DegeneratePolicy, HeightMapParams, ShapeStyle, ToroidHelixParams};
pub use crate::error::{GeometryError, GeometryResult};

// Re-export generators
pub use crate::gfx::geometry::{
    cone, cylinder, ellipse_body, height_map, load_obj, sphere, surface_normal, toroid_helix,
    ConeGeometry, CylinderGeometry, DrawCall, MeshData, Primitive,
};

// Re-export arena, backends and uploaded shapes
pub use crate::gfx::object::{arena_draw_commands, DrawCommand, ShapeBuffers};
pub use crate::gfx::resources::{
    ArenaSpan, BufferBackend, BufferHandle, HostBackend, VertexArena, WgpuBackend, WriteWindow,
};
pub use crate::gfx::scene::vertex::{VertexRecord, STRIDE_FLOATS};

// Re-export common external dependencies
pub use cgmath::{InnerSpace, Vector3};
