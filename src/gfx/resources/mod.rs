//! GPU resource management
//!
//! The vertex arena that batches shapes before upload, and the backends that
//! turn packed data into device buffers.

pub mod arena;
pub mod backend;

// Re-export main types
pub use arena::{ArenaSpan, ArenaState, BufferHandle, VertexArena, WriteWindow};
pub use backend::{BufferBackend, BufferId, HostBackend, HostBuffer, HostContents, WgpuBackend};
