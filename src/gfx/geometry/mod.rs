//! # Procedural Geometry Generation
//!
//! Generators for parametric solids, each producing interleaved
//! [`VertexRecord`]s and, where the draw needs them, 16-bit indices.
//!
//! ## Supported Shapes
//!
//! - **Cylinder**: two capped fans plus an indexed triangle-strip barrel
//! - **Cone**: apex fan and base fan
//! - **Sphere**: UV grid drawn as one strip with degenerate links
//! - **Height map**: paraboloid grid drawn as one strip with degenerate links
//! - **Ellipse body**: squashed barrel written straight into a shared [`VertexArena`]
//! - **Toroidal helix**: tube swept along a helix wound around a torus, written into a shared arena
//!
//! ## Usage
//!
//! ```rust
//! use glsandbox::gfx::geometry::{cylinder, sphere};
//! use glsandbox::ShapeStyle;
//!
//! let style = ShapeStyle::default();
//! let cyl = cylinder(4, 1.0, 2.0, [1.0, 0.0, 0.0, 1.0], &style).unwrap();
//! assert_eq!(cyl.body.indices.len(), 10);
//!
//! let ball = sphere(8, 1.0, [0.0, 0.0, 1.0, 1.0], &style).unwrap();
//! assert_eq!(ball.vertex_count(), 81);
//! ```
//!
//! [`VertexArena`]: crate::gfx::resources::VertexArena

pub mod ellipse;
pub mod normal;
pub mod obj;
pub mod primitives;
pub mod toroid_helix;

pub use ellipse::{ellipse_body, ELLIPSE_X_FACTOR, ELLIPSE_Z_FACTOR};
pub use normal::{surface_normal, surface_normal_or, try_surface_normal};
pub use obj::load_obj;
pub use primitives::*;
pub use toroid_helix::toroid_helix;

use crate::error::{GeometryError, GeometryResult};
use crate::gfx::scene::vertex::{self, VertexRecord};

/// Primitive assembly mode of a draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Triangles,
    TriangleStrip,
    TriangleFan,
    Lines,
    LineStrip,
}

impl Primitive {
    /// The mode used when wireframe rendering is toggled on
    pub fn wireframe(self) -> Self {
        match self {
            Primitive::Triangles | Primitive::TriangleFan => Primitive::Lines,
            Primitive::TriangleStrip => Primitive::LineStrip,
            other => other,
        }
    }
}

/// One draw over a range of vertices (or indices, when `indexed`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawCall {
    pub mode: Primitive,
    pub first: u32,
    pub count: u32,
    pub indexed: bool,
}

impl DrawCall {
    pub fn arrays(mode: Primitive, first: usize, count: usize) -> Self {
        Self {
            mode,
            first: first as u32,
            count: count as u32,
            indexed: false,
        }
    }

    pub fn elements(mode: Primitive, count: usize) -> Self {
        Self {
            mode,
            first: 0,
            count: count as u32,
            indexed: true,
        }
    }
}

/// CPU-side geometry ready for upload: one vertex buffer, optional indices and
/// the draws that consume them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<VertexRecord>,
    /// 0-based indices into `vertices`; empty for non-indexed draws
    pub indices: Vec<u16>,
    pub draws: Vec<DrawCall>,
}

impl MeshData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Interleaved floats, [`STRIDE_FLOATS`](vertex::STRIDE_FLOATS) per vertex
    pub fn to_floats(&self) -> Vec<f32> {
        vertex::pack(&self.vertices)
    }

    /// Check that every index addresses an existing vertex
    pub fn validate_indices(&self) -> GeometryResult<()> {
        let vertex_count = self.vertices.len();
        if vertex_count > u16::MAX as usize + 1 {
            return Err(GeometryError::IndexOverflow { vertex_count });
        }
        match self.indices.iter().find(|&&i| i as usize >= vertex_count) {
            Some(&index) => Err(GeometryError::IndexOutOfRange {
                index: index as u32,
                vertex_count,
            }),
            None => Ok(()),
        }
    }
}

/// Convert a vertex position to a 16-bit index, failing past the u16 range
pub(crate) fn index_u16(index: usize) -> GeometryResult<u16> {
    u16::try_from(index).map_err(|_| GeometryError::IndexOverflow {
        vertex_count: index + 1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wireframe_modes() {
        assert_eq!(Primitive::TriangleFan.wireframe(), Primitive::Lines);
        assert_eq!(Primitive::TriangleStrip.wireframe(), Primitive::LineStrip);
        assert_eq!(Primitive::Triangles.wireframe(), Primitive::Lines);
    }

    #[test]
    fn test_validate_indices() {
        let v = VertexRecord::new([0.0; 3], [0.0; 3], [1.0; 4]);
        let mut mesh = MeshData::new();
        mesh.vertices = vec![v; 3];
        mesh.indices = vec![0, 1, 2];
        assert!(mesh.validate_indices().is_ok());

        mesh.indices.push(3);
        assert_eq!(
            mesh.validate_indices(),
            Err(GeometryError::IndexOutOfRange {
                index: 3,
                vertex_count: 3
            })
        );
        assert_eq!(mesh.to_floats().len(), 30);
    }

    #[test]
    fn test_index_u16_bounds() {
        assert_eq!(index_u16(65535), Ok(65535));
        assert!(index_u16(65536).is_err());
    }
}
