//! # Graphics Module
//!
//! Everything between shape parameters and device buffers.
//!
//! ## Architecture Overview
//!
//! - **Geometry** ([`geometry`]) - Shape generators, surface normals and mesh data
//! - **Scene data** ([`scene`]) - The interleaved vertex record shared by all shapes
//! - **Resources** ([`resources`]) - The vertex arena and buffer backends
//! - **Objects** ([`object`]) - Uploaded shapes and the draws that replay them
//!
//! ## Usage
//!
//! ```rust
//! use glsandbox::gfx::geometry::cylinder;
//! use glsandbox::gfx::object::ShapeBuffers;
//! use glsandbox::gfx::resources::HostBackend;
//! use glsandbox::ShapeStyle;
//!
//! let mut backend = HostBackend::new();
//! let cyl = cylinder(16, 0.5, 2.0, [0.8, 0.2, 0.2, 1.0], &ShapeStyle::default()).unwrap();
//! let shape = ShapeBuffers::upload_cylinder(&cyl, &mut backend).unwrap();
//! assert_eq!(shape.vertex_buffer_count(), 2);
//! ```

pub mod geometry;
pub mod object;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use object::{DrawCommand, ShapeBuffers};
pub use resources::VertexArena;
