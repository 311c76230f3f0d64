//! # Vertex Arena
//!
//! An append-only staging allocator that batches vertex records from several
//! shapes before uploading them as one buffer.
//!
//! Callers [`reserve`](VertexArena::reserve) a [`WriteWindow`], write records
//! straight into the staging array through it and [`commit`](WriteWindow::commit)
//! the window. When a reservation no longer fits, the filled prefix is flushed
//! to a new backend buffer and the window starts over at offset zero.
//!
//! ```text
//! Empty -> Accumulating -> (flush) -> Flushed -> Accumulating -> ...
//! ```
//!
//! The arena is a plain owned value: create one per scene and pass it by
//! `&mut` to the generators that share it.

use super::backend::BufferBackend;
use crate::config::ArenaConfig;
use crate::error::{GeometryError, GeometryResult};
use crate::gfx::scene::vertex::{VertexRecord, STRIDE_FLOATS};

/// One flushed, immutable range of vertices living in a backend buffer
#[derive(Debug, Clone, PartialEq)]
pub struct BufferHandle<Buf> {
    pub buffer: Buf,
    pub num_vertices: usize,
    pub allocated: bool,
}

/// Where a committed window landed: the handle it will be flushed into and
/// its vertex range inside that buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArenaSpan {
    pub buffer_index: usize,
    pub first_vertex: usize,
    pub vertex_count: usize,
}

/// Coarse lifecycle state of an arena
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArenaState {
    /// Nothing written and nothing flushed
    Empty,
    /// Committed records wait in the staging array
    Accumulating,
    /// Everything written so far has been flushed
    Flushed,
}

/// Staging array, write cursor and the list of buffers flushed so far.
///
/// Generators append through [`reserve`](Self::reserve); the arena uploads
/// the committed prefix to `B` whenever a reservation would not fit, so
/// `total_vertices` always equals the flushed vertex counts plus
/// `cursor / STRIDE_FLOATS`.
pub struct VertexArena<B: BufferBackend> {
    backend: B,
    config: ArenaConfig,
    storage: Vec<f32>,
    cursor: usize,
    handles: Vec<BufferHandle<B::Buffer>>,
}

impl<B: BufferBackend> VertexArena<B> {
    /// Create an arena with the default staging capacity
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, ArenaConfig::default())
    }

    pub fn with_config(backend: B, config: ArenaConfig) -> Self {
        Self {
            backend,
            storage: vec![0.0; config.capacity_floats],
            config,
            cursor: 0,
            handles: Vec::new(),
        }
    }

    /// Staging capacity in floats
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Write position in floats; everything before it is committed
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Committed but not yet flushed floats
    pub fn staging(&self) -> &[f32] {
        &self.storage[..self.cursor]
    }

    pub fn handles(&self) -> &[BufferHandle<B::Buffer>] {
        &self.handles
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn state(&self) -> ArenaState {
        match (self.cursor, self.handles.is_empty()) {
            (0, true) => ArenaState::Empty,
            (0, false) => ArenaState::Flushed,
            _ => ArenaState::Accumulating,
        }
    }

    /// Vertices flushed to buffers plus vertices still staged
    pub fn total_vertices(&self) -> usize {
        self.flushed_vertices() + self.cursor / STRIDE_FLOATS
    }

    pub fn flushed_vertices(&self) -> usize {
        self.handles.iter().map(|h| h.num_vertices).sum()
    }

    /// Reserve room for at least `min_floats` floats.
    ///
    /// When `cursor + min_floats` stays below capacity the staging array is
    /// handed out as-is. Otherwise the committed prefix is flushed first and the
    /// window starts at offset zero. A request larger than the whole staging
    /// array is rejected.
    pub fn reserve(&mut self, min_floats: usize) -> GeometryResult<WriteWindow<'_, B>> {
        if min_floats > self.capacity() {
            log::warn!(
                "reservation of {min_floats} floats exceeds arena capacity {}",
                self.capacity()
            );
            return Err(GeometryError::WindowOverrun {
                reserved: self.capacity(),
                attempted: min_floats,
            });
        }

        if self.cursor + min_floats >= self.capacity() {
            self.flush()?;
        }

        let start = self.cursor;
        Ok(WriteWindow {
            arena: self,
            start,
            reserved: min_floats,
            written: 0,
        })
    }

    /// Reserve room for `count` whole vertex records
    pub fn reserve_records(&mut self, count: usize) -> GeometryResult<WriteWindow<'_, B>> {
        let floats = count
            .checked_mul(STRIDE_FLOATS)
            .ok_or(GeometryError::WindowOverrun {
                reserved: self.capacity(),
                attempted: usize::MAX,
            })?;
        self.reserve(floats)
    }

    /// Upload the committed range to a new backend buffer and reset the cursor.
    ///
    /// Returns `None` when nothing is staged. A backend failure is fatal for the
    /// staged data: it is propagated and the cursor is left untouched.
    pub fn flush(&mut self) -> GeometryResult<Option<&BufferHandle<B::Buffer>>> {
        if self.cursor == 0 {
            return Ok(None);
        }

        let label = format!("{} {}", self.config.label, self.handles.len());
        let buffer = match self
            .backend
            .create_vertex_buffer(&label, &self.storage[..self.cursor])
        {
            Ok(buffer) => buffer,
            Err(e) => {
                log::error!("arena flush failed: {e}");
                return Err(e);
            }
        };

        let num_vertices = self.cursor / STRIDE_FLOATS;
        log::debug!("flushed {num_vertices} vertices to '{label}'");

        self.handles.push(BufferHandle {
            buffer,
            num_vertices,
            allocated: true,
        });
        self.cursor = 0;
        Ok(self.handles.last())
    }

    /// Drop all staged data and hand back every flushed handle so the caller
    /// can release the device buffers.
    pub fn reset(&mut self) -> Vec<BufferHandle<B::Buffer>> {
        self.cursor = 0;
        std::mem::take(&mut self.handles)
    }

    /// Consume the arena, returning its backend and flushed handles
    pub fn into_parts(self) -> (B, Vec<BufferHandle<B::Buffer>>) {
        (self.backend, self.handles)
    }
}

/// A bounded write window into the arena's staging array.
///
/// Writes beyond the reserved size fail instead of corrupting neighbouring
/// data. Nothing becomes visible to the arena until [`commit`](Self::commit);
/// dropping an uncommitted window discards its writes.
pub struct WriteWindow<'a, B: BufferBackend> {
    arena: &'a mut VertexArena<B>,
    start: usize,
    reserved: usize,
    written: usize,
}

impl<B: BufferBackend> WriteWindow<'_, B> {
    /// Offset of the window inside the staging array
    pub fn start(&self) -> usize {
        self.start
    }

    pub fn reserved(&self) -> usize {
        self.reserved
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn remaining(&self) -> usize {
        self.reserved - self.written
    }

    /// Append raw floats
    pub fn write_floats(&mut self, floats: &[f32]) -> GeometryResult<()> {
        let attempted = self.written + floats.len();
        if attempted > self.reserved {
            log::warn!(
                "write window overrun: reserved {}, attempted {attempted}",
                self.reserved
            );
            return Err(GeometryError::WindowOverrun {
                reserved: self.reserved,
                attempted,
            });
        }
        let at = self.start + self.written;
        self.arena.storage[at..at + floats.len()].copy_from_slice(floats);
        self.written = attempted;
        Ok(())
    }

    /// Append one vertex record
    pub fn push(&mut self, vertex: &VertexRecord) -> GeometryResult<()> {
        self.write_floats(&vertex.to_array())
    }

    /// Floats written through this window so far
    pub fn contents(&self) -> &[f32] {
        &self.arena.storage[self.start..self.start + self.written]
    }

    /// Advance the arena cursor past the written records and return it.
    ///
    /// Fails if the window holds a partial record; the arena is then unchanged.
    pub fn commit(self) -> GeometryResult<usize> {
        if self.written % STRIDE_FLOATS != 0 {
            return Err(GeometryError::IncompleteRecord {
                floats: self.written,
            });
        }
        self.arena.cursor = self.start + self.written;
        Ok(self.arena.cursor)
    }

    /// Commit and report where the records ended up
    pub fn commit_span(self) -> GeometryResult<ArenaSpan> {
        let span = ArenaSpan {
            buffer_index: self.arena.handles.len(),
            first_vertex: self.start / STRIDE_FLOATS,
            vertex_count: self.written / STRIDE_FLOATS,
        };
        self.commit()?;
        Ok(span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::resources::backend::{BufferId, HostBackend};

    fn small_arena(capacity_floats: usize) -> VertexArena<HostBackend> {
        VertexArena::with_config(
            HostBackend::new(),
            ArenaConfig {
                capacity_floats,
                ..ArenaConfig::default()
            },
        )
    }

    fn vertex(x: f32) -> VertexRecord {
        VertexRecord::new([x, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 1.0, 1.0])
    }

    fn write_records(arena: &mut VertexArena<HostBackend>, count: usize) -> usize {
        let mut window = arena.reserve_records(count).unwrap();
        for i in 0..count {
            window.push(&vertex(i as f32)).unwrap();
        }
        window.commit().unwrap()
    }

    #[test]
    fn test_reserve_within_capacity_does_not_flush() {
        let mut arena = small_arena(100);
        assert_eq!(arena.state(), ArenaState::Empty);
        write_records(&mut arena, 3);
        let before = arena.staging().as_ptr();

        let window = arena.reserve(30).unwrap();
        assert_eq!(window.start(), 30);
        drop(window);

        assert!(arena.handles().is_empty());
        assert_eq!(arena.cursor(), 30);
        assert_eq!(arena.staging().as_ptr(), before);
        assert_eq!(arena.state(), ArenaState::Accumulating);
    }

    #[test]
    fn test_reserve_overflow_flushes_once() {
        let mut arena = small_arena(100);
        write_records(&mut arena, 6);

        let window = arena.reserve(40).unwrap();
        assert_eq!(window.start(), 0);
        drop(window);

        assert_eq!(arena.handles().len(), 1);
        assert_eq!(arena.handles()[0].num_vertices, 6);
        assert!(arena.handles()[0].allocated);
        assert_eq!(arena.cursor(), 0);
        assert_eq!(arena.state(), ArenaState::Flushed);
    }

    #[test]
    fn test_flush_round_trip() {
        let mut arena = small_arena(1000);
        let cursor = write_records(&mut arena, 7);
        assert_eq!(cursor, 70);

        let handle = arena.flush().unwrap().unwrap().clone();
        assert_eq!(handle.num_vertices, cursor / STRIDE_FLOATS);
        assert_eq!(handle.buffer, BufferId(1));

        let data = arena.backend().vertex_data(handle.buffer).unwrap();
        assert_eq!(data.len(), 70);
        assert_eq!(data[10], 1.0);
        assert!(arena.flush().unwrap().is_none());
    }

    #[test]
    fn test_total_vertices_accounting() {
        let mut arena = small_arena(50);
        let mut written = 0;
        for count in [2, 3, 4, 1, 2] {
            write_records(&mut arena, count);
            written += count;
            assert_eq!(arena.total_vertices(), written);
        }
        assert!(arena.handles().len() >= 2);
        assert_eq!(
            arena.flushed_vertices() + arena.cursor() / STRIDE_FLOATS,
            written
        );
    }

    #[test]
    fn test_window_overrun_rejected() {
        let mut arena = small_arena(100);
        let mut window = arena.reserve(10).unwrap();
        window.push(&vertex(1.0)).unwrap();
        assert_eq!(
            window.push(&vertex(2.0)),
            Err(GeometryError::WindowOverrun {
                reserved: 10,
                attempted: 20
            })
        );
        assert_eq!(window.commit(), Ok(10));

        assert!(matches!(
            arena.reserve(101),
            Err(GeometryError::WindowOverrun { .. })
        ));
    }

    #[test]
    fn test_partial_record_not_committed() {
        let mut arena = small_arena(100);
        let mut window = arena.reserve(20).unwrap();
        window.write_floats(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(
            window.commit(),
            Err(GeometryError::IncompleteRecord { floats: 3 })
        );
        assert_eq!(arena.cursor(), 0);
    }

    #[test]
    fn test_uncommitted_window_discarded() {
        let mut arena = small_arena(100);
        {
            let mut window = arena.reserve_records(2).unwrap();
            window.push(&vertex(1.0)).unwrap();
            assert_eq!(window.contents().len(), 10);
        }
        assert_eq!(arena.cursor(), 0);
        assert_eq!(arena.total_vertices(), 0);
    }

    #[test]
    fn test_flush_failure_is_fatal() {
        let mut arena = VertexArena::with_config(
            HostBackend::failing_after(0),
            ArenaConfig {
                capacity_floats: 40,
                ..ArenaConfig::default()
            },
        );
        write_records(&mut arena, 2);
        assert!(matches!(
            arena.reserve(30),
            Err(GeometryError::BufferAllocation { .. })
        ));
        // staged data survives the failed flush
        assert_eq!(arena.cursor(), 20);
    }

    #[test]
    fn test_commit_span_tracks_pending_buffer() {
        let mut arena = small_arena(100);
        write_records(&mut arena, 2);

        let mut window = arena.reserve_records(3).unwrap();
        for i in 0..3 {
            window.push(&vertex(i as f32)).unwrap();
        }
        let span = window.commit_span().unwrap();
        assert_eq!(
            span,
            ArenaSpan {
                buffer_index: 0,
                first_vertex: 2,
                vertex_count: 3
            }
        );
    }

    #[test]
    fn test_reserve_records_overflow_is_rejected() {
        let mut arena = small_arena(100);
        assert!(matches!(
            arena.reserve_records(usize::MAX / 2),
            Err(GeometryError::WindowOverrun { .. })
        ));
        assert_eq!(arena.state(), ArenaState::Empty);
    }

    #[test]
    fn test_reset_returns_handles() {
        let mut arena = small_arena(100);
        write_records(&mut arena, 2);
        arena.flush().unwrap();
        write_records(&mut arena, 1);

        let handles = arena.reset();
        assert_eq!(handles.len(), 1);
        assert_eq!(arena.state(), ArenaState::Empty);
        assert_eq!(arena.total_vertices(), 0);
    }
}
