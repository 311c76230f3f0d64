//! # Vertex Data Structures
//!
//! The interleaved vertex record shared by every generator. All shapes write
//! records in exactly this field order, so a single vertex layout serves every
//! buffer the crate produces.

use std::mem;

/// Floats per position
pub const POSITION_FLOATS: usize = 3;
/// Floats per normal
pub const NORMAL_FLOATS: usize = 3;
/// Floats per RGBA colour
pub const COLOR_FLOATS: usize = 4;
/// Floats per vertex record
pub const STRIDE_FLOATS: usize = POSITION_FLOATS + NORMAL_FLOATS + COLOR_FLOATS;
/// Bytes per vertex record
pub const STRIDE_BYTES: usize = STRIDE_FLOATS * mem::size_of::<f32>();

/// A vertex with position, normal and colour.
///
/// # Memory Layout
///
/// `#[repr(C)]` keeps the fields tightly packed as ten consecutive `f32`s, so a
/// slice of records can be handed to the GPU with `bytemuck::cast_slice`.
///
/// # Examples
///
/// ```
/// use glsandbox::gfx::scene::vertex::VertexRecord;
///
/// let vertex = VertexRecord::new([0.0, 1.0, 0.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0, 1.0]);
/// assert_eq!(vertex.to_array()[6], 1.0);
/// ```
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct VertexRecord {
    /// Position [x, y, z]
    pub position: [f32; 3],
    /// Normal [nx, ny, nz], not necessarily unit length
    pub normal: [f32; 3],
    /// Colour [r, g, b, a]
    pub color: [f32; 4],
}

impl VertexRecord {
    pub fn new(position: [f32; 3], normal: [f32; 3], color: [f32; 4]) -> Self {
        Self {
            position,
            normal,
            color,
        }
    }

    /// Flatten into the on-wire float order
    pub fn to_array(&self) -> [f32; STRIDE_FLOATS] {
        let mut out = [0.0; STRIDE_FLOATS];
        self.write_to(&mut out);
        out
    }

    /// Write the record into the first [`STRIDE_FLOATS`] slots of `out`.
    ///
    /// Panics if `out` is shorter than one record.
    pub fn write_to(&self, out: &mut [f32]) {
        out[..STRIDE_FLOATS].copy_from_slice(bytemuck::cast_slice(std::slice::from_ref(self)));
    }

    /// Read a record back from a float slice, `None` if it is too short
    pub fn from_slice(floats: &[f32]) -> Option<Self> {
        let record = floats.get(..STRIDE_FLOATS)?;
        Some(*bytemuck::from_bytes::<VertexRecord>(bytemuck::cast_slice(record)))
    }

    /// Returns the vertex buffer layout for wgpu rendering.
    ///
    /// - Attribute 0: Position (Float32x3)
    /// - Attribute 1: Normal (Float32x3)
    /// - Attribute 2: Colour (Float32x4)
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
            0 => Float32x3,
            1 => Float32x3,
            2 => Float32x4,
        ];
        wgpu::VertexBufferLayout {
            array_stride: STRIDE_BYTES as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// Pack records into one interleaved float vector
pub fn pack(records: &[VertexRecord]) -> Vec<f32> {
    bytemuck::cast_slice(records).to_vec()
}

/// Unpack an interleaved float slice; trailing partial records are ignored
pub fn unpack(floats: &[f32]) -> Vec<VertexRecord> {
    floats
        .chunks_exact(STRIDE_FLOATS)
        .filter_map(VertexRecord::from_slice)
        .collect()
}
