//! # Buffer Backends
//!
//! The seam between CPU-side geometry and device memory. Generators and the
//! arena never talk to a graphics API directly; they hand finished float and
//! index slices to a [`BufferBackend`], which returns an opaque buffer.
//!
//! Two backends ship with the crate:
//!
//! - [`HostBackend`] keeps buffers in memory behind GL-style integer ids. It
//!   is what the tests use and can be told to fail allocations.
//! - [`WgpuBackend`] creates real `wgpu::Buffer`s on a device.

use wgpu::util::DeviceExt;

use crate::error::{GeometryError, GeometryResult};

/// Creates immutable device buffers from packed data
pub trait BufferBackend {
    /// Opaque handle to one device buffer
    type Buffer;

    /// Upload interleaved vertex floats
    fn create_vertex_buffer(&mut self, label: &str, data: &[f32]) -> GeometryResult<Self::Buffer>;

    /// Upload 16-bit indices
    fn create_index_buffer(&mut self, label: &str, data: &[u16]) -> GeometryResult<Self::Buffer>;

    /// Free a buffer this backend created
    fn release_buffer(&mut self, buffer: Self::Buffer);
}

/// Id of a buffer owned by a [`HostBackend`]; valid ids start at 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(pub u32);

/// Contents of a host-side buffer
#[derive(Debug, Clone, PartialEq)]
pub enum HostContents {
    Vertex(Vec<f32>),
    Index(Vec<u16>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct HostBuffer {
    pub id: BufferId,
    pub label: String,
    pub contents: HostContents,
}

/// In-memory backend that mimics GL buffer naming
#[derive(Debug, Default)]
pub struct HostBackend {
    buffers: Vec<HostBuffer>,
    next_id: u32,
    /// Number of allocations that still succeed; `None` means unlimited
    remaining_allocations: Option<usize>,
}

impl HostBackend {
    pub fn new() -> Self {
        Self {
            buffers: Vec::new(),
            next_id: 1,
            remaining_allocations: None,
        }
    }

    /// Backend whose allocations start failing after `count` successes
    pub fn failing_after(count: usize) -> Self {
        Self {
            remaining_allocations: Some(count),
            ..Self::new()
        }
    }

    pub fn buffer_count(&self) -> usize {
        self.buffers.len()
    }

    pub fn get(&self, id: BufferId) -> Option<&HostBuffer> {
        self.buffers.iter().find(|b| b.id == id)
    }

    /// Vertex floats of `id`, `None` for missing or index buffers
    pub fn vertex_data(&self, id: BufferId) -> Option<&[f32]> {
        match &self.get(id)?.contents {
            HostContents::Vertex(data) => Some(data),
            HostContents::Index(_) => None,
        }
    }

    /// Indices of `id`, `None` for missing or vertex buffers
    pub fn index_data(&self, id: BufferId) -> Option<&[u16]> {
        match &self.get(id)?.contents {
            HostContents::Index(data) => Some(data),
            HostContents::Vertex(_) => None,
        }
    }

    /// Destroy a buffer, returning whether it existed
    pub fn release(&mut self, id: BufferId) -> bool {
        let before = self.buffers.len();
        self.buffers.retain(|b| b.id != id);
        before != self.buffers.len()
    }

    fn allocate(&mut self, label: &str, contents: HostContents) -> GeometryResult<BufferId> {
        let empty = match &contents {
            HostContents::Vertex(data) => data.is_empty(),
            HostContents::Index(data) => data.is_empty(),
        };
        if empty {
            return Err(GeometryError::BufferAllocation {
                label: label.to_string(),
                reason: "buffer has no contents".to_string(),
            });
        }
        if let Some(remaining) = self.remaining_allocations.as_mut() {
            if *remaining == 0 {
                return Err(GeometryError::BufferAllocation {
                    label: label.to_string(),
                    reason: "no buffer name available".to_string(),
                });
            }
            *remaining -= 1;
        }

        let id = BufferId(self.next_id.max(1));
        self.next_id = id.0 + 1;
        self.buffers.push(HostBuffer {
            id,
            label: label.to_string(),
            contents,
        });
        Ok(id)
    }
}

impl BufferBackend for HostBackend {
    type Buffer = BufferId;

    fn create_vertex_buffer(&mut self, label: &str, data: &[f32]) -> GeometryResult<BufferId> {
        self.allocate(label, HostContents::Vertex(data.to_vec()))
    }

    fn create_index_buffer(&mut self, label: &str, data: &[u16]) -> GeometryResult<BufferId> {
        self.allocate(label, HostContents::Index(data.to_vec()))
    }

    fn release_buffer(&mut self, buffer: BufferId) {
        if !self.release(buffer) {
            log::warn!("release of unknown buffer {buffer:?}");
        }
    }
}

/// Backend creating `wgpu::Buffer`s on a device
pub struct WgpuBackend<'a> {
    device: &'a wgpu::Device,
}

impl<'a> WgpuBackend<'a> {
    pub fn new(device: &'a wgpu::Device) -> Self {
        Self { device }
    }

    fn create(
        &self,
        label: &str,
        contents: &[u8],
        usage: wgpu::BufferUsages,
    ) -> GeometryResult<wgpu::Buffer> {
        if contents.is_empty() {
            return Err(GeometryError::BufferAllocation {
                label: label.to_string(),
                reason: "buffer has no contents".to_string(),
            });
        }

        // allocation failures surface through the error scope, not the return value
        self.device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents,
                usage,
            });
        let validation = pollster::block_on(self.device.pop_error_scope());
        let out_of_memory = pollster::block_on(self.device.pop_error_scope());

        match validation.or(out_of_memory) {
            Some(err) => {
                buffer.destroy();
                Err(GeometryError::BufferAllocation {
                    label: label.to_string(),
                    reason: err.to_string(),
                })
            }
            None => Ok(buffer),
        }
    }
}

impl BufferBackend for WgpuBackend<'_> {
    type Buffer = wgpu::Buffer;

    fn create_vertex_buffer(&mut self, label: &str, data: &[f32]) -> GeometryResult<wgpu::Buffer> {
        self.create(label, bytemuck::cast_slice(data), wgpu::BufferUsages::VERTEX)
    }

    fn create_index_buffer(&mut self, label: &str, data: &[u16]) -> GeometryResult<wgpu::Buffer> {
        self.create(label, bytemuck::cast_slice(data), wgpu::BufferUsages::INDEX)
    }

    fn release_buffer(&mut self, buffer: wgpu::Buffer) {
        buffer.destroy();
    }
}
