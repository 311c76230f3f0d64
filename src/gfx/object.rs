//! Uploaded shapes and the draw commands an external renderer replays.

use cgmath::{Matrix4, SquareMatrix, Vector3};

use super::geometry::{ConeGeometry, CylinderGeometry, DrawCall, MeshData, Primitive};
use super::resources::{BufferBackend, BufferHandle};
use crate::error::{GeometryError, GeometryResult};

/// One mesh living in device memory
#[derive(Debug)]
pub struct ShapePart<Buf> {
    pub vertex_buffer: Buf,
    pub index_buffer: Option<Buf>,
    pub vertex_count: usize,
    pub draws: Vec<DrawCall>,
}

/// A shape whose meshes have been uploaded, plus where it sits in the scene
#[derive(Debug)]
pub struct ShapeBuffers<Buf> {
    pub label: String,
    pub parts: Vec<ShapePart<Buf>>,
    pub transform: Matrix4<f32>,
}

/// A single draw, borrowing the buffers it reads from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand<'a, Buf> {
    pub vertex_buffer: &'a Buf,
    /// Set for indexed draws
    pub index_buffer: Option<&'a Buf>,
    pub mode: Primitive,
    pub first: u32,
    pub count: u32,
}

impl<Buf> ShapePart<Buf> {
    /// Upload one mesh; nothing stays allocated when this fails
    fn upload<B>(label: &str, mesh: &MeshData, backend: &mut B) -> GeometryResult<Self>
    where
        B: BufferBackend<Buffer = Buf>,
    {
        let vertex_buffer = backend.create_vertex_buffer(label, &mesh.to_floats())?;
        let index_buffer = if mesh.indices.is_empty() {
            None
        } else {
            match backend.create_index_buffer(&format!("{label} indices"), &mesh.indices) {
                Ok(buffer) => Some(buffer),
                Err(e) => {
                    backend.release_buffer(vertex_buffer);
                    return Err(e);
                }
            }
        };

        Ok(Self {
            vertex_buffer,
            index_buffer,
            vertex_count: mesh.vertex_count(),
            draws: mesh.draws.clone(),
        })
    }

    fn release<B>(self, backend: &mut B)
    where
        B: BufferBackend<Buffer = Buf>,
    {
        backend.release_buffer(self.vertex_buffer);
        if let Some(index_buffer) = self.index_buffer {
            backend.release_buffer(index_buffer);
        }
    }
}

impl<Buf> ShapeBuffers<Buf> {
    /// Upload `meshes` as the parts of one shape.
    ///
    /// Every mesh is validated before the first buffer is created, so bad
    /// input never reaches the backend. An allocation failure aborts the
    /// whole shape and releases the buffers already created for it.
    pub fn upload<B>(label: &str, meshes: &[&MeshData], backend: &mut B) -> GeometryResult<Self>
    where
        B: BufferBackend<Buffer = Buf>,
    {
        for (i, mesh) in meshes.iter().enumerate() {
            if mesh.vertices.is_empty() {
                return Err(GeometryError::BufferAllocation {
                    label: format!("{label} {i}"),
                    reason: "mesh has no vertices".to_string(),
                });
            }
            mesh.validate_indices()?;
        }

        let mut parts = Vec::with_capacity(meshes.len());
        for (i, mesh) in meshes.iter().enumerate() {
            match ShapePart::upload(&format!("{label} {i}"), mesh, backend) {
                Ok(part) => parts.push(part),
                Err(e) => {
                    log::warn!("upload of '{label}' failed, releasing {} parts", parts.len());
                    for part in parts {
                        part.release(backend);
                    }
                    return Err(e);
                }
            }
        }

        log::debug!("uploaded '{label}': {} buffers", parts.len());
        Ok(Self {
            label: label.to_string(),
            parts,
            transform: Matrix4::identity(),
        })
    }

    /// Free every buffer of the shape
    pub fn release<B>(self, backend: &mut B)
    where
        B: BufferBackend<Buffer = Buf>,
    {
        for part in self.parts {
            part.release(backend);
        }
    }

    /// Caps and barrel as two separate vertex buffers
    pub fn upload_cylinder<B>(cylinder: &CylinderGeometry, backend: &mut B) -> GeometryResult<Self>
    where
        B: BufferBackend<Buffer = Buf>,
    {
        Self::upload("Cylinder", &[&cylinder.caps, &cylinder.body], backend)
    }

    pub fn upload_cone<B>(cone: &ConeGeometry, backend: &mut B) -> GeometryResult<Self>
    where
        B: BufferBackend<Buffer = Buf>,
    {
        Self::upload("Cone", &[&cone.apex, &cone.base], backend)
    }

    pub fn set_translation(&mut self, translation: Vector3<f32>) {
        self.transform = Matrix4::from_translation(translation);
    }

    pub fn vertex_buffer_count(&self) -> usize {
        self.parts.len()
    }

    /// Draws for every part in upload order; `wireframe` swaps in line modes
    pub fn draw_commands(&self, wireframe: bool) -> Vec<DrawCommand<'_, Buf>> {
        self.parts
            .iter()
            .flat_map(|part| {
                part.draws.iter().map(move |draw| DrawCommand {
                    vertex_buffer: &part.vertex_buffer,
                    index_buffer: if draw.indexed {
                        part.index_buffer.as_ref()
                    } else {
                        None
                    },
                    mode: if wireframe { draw.mode.wireframe() } else { draw.mode },
                    first: draw.first,
                    count: draw.count,
                })
            })
            .collect()
    }
}

/// Draws for buffers flushed from a vertex arena; each is one triangle list
pub fn arena_draw_commands<Buf>(
    handles: &[BufferHandle<Buf>],
    wireframe: bool,
) -> Vec<DrawCommand<'_, Buf>> {
    let mode = if wireframe {
        Primitive::Triangles.wireframe()
    } else {
        Primitive::Triangles
    };
    handles
        .iter()
        .filter(|h| h.allocated)
        .map(|h| DrawCommand {
            vertex_buffer: &h.buffer,
            index_buffer: None,
            mode,
            first: 0,
            count: h.num_vertices as u32,
        })
        .collect()
}
