//! Elliptical barrel written straight into a shared arena.
//!
//! Each slice is a quad split into two triangles, so the body is drawn as
//! plain triangles with `6 * slices` vertices and no indices. There are no
//! caps.

use std::f32::consts::TAU;

use super::primitives::MIN_SLICES;
use crate::error::{check_color, check_finite, check_positive, check_slices, GeometryResult};
use crate::gfx::resources::{ArenaSpan, BufferBackend, VertexArena};
use crate::gfx::scene::vertex::{VertexRecord, STRIDE_FLOATS};

/// Squash applied to the X axis of the cross section
pub const ELLIPSE_X_FACTOR: f32 = 2.0 / 9.0;
/// Squash applied to the Z axis of the cross section
pub const ELLIPSE_Z_FACTOR: f32 = 1.0;

/// Point on the ellipse rim at angle `a`, height `y`
fn rim_point(radius: f32, a: f32, y: f32) -> [f32; 3] {
    [
        radius * a.cos() * ELLIPSE_X_FACTOR,
        y,
        -radius * a.sin() * ELLIPSE_Z_FACTOR,
    ]
}

/// Append an elliptical barrel to `arena`.
///
/// Each normal is the squashed rim point itself with `y = 0`, so it points
/// outward in the XZ plane with a magnitude set by the radius alone.
/// Returns the span the records occupy.
pub fn ellipse_body<B: BufferBackend>(
    arena: &mut VertexArena<B>,
    slices: u32,
    radius: f32,
    height: f32,
    color: [f32; 4],
) -> GeometryResult<ArenaSpan> {
    check_slices(slices, MIN_SLICES)?;
    check_positive("radius", radius)?;
    check_finite("height", height)?;
    check_color(color)?;

    let half = height / 2.0;
    let records = 6 * slices as usize;
    let mut window = arena.reserve(records * STRIDE_FLOATS)?;

    for i in 0..slices {
        let a1 = i as f32 / slices as f32 * TAU;
        let a2 = (i + 1) as f32 / slices as f32 * TAU;

        let top1 = rim_point(radius, a1, half);
        let bottom1 = rim_point(radius, a1, -half);
        let top2 = rim_point(radius, a2, half);
        let bottom2 = rim_point(radius, a2, -half);

        let n1 = rim_point(radius, a1, 0.0);
        let n2 = rim_point(radius, a2, 0.0);

        window.push(&VertexRecord::new(top1, n1, color))?;
        window.push(&VertexRecord::new(bottom1, n1, color))?;
        window.push(&VertexRecord::new(bottom2, n2, color))?;

        window.push(&VertexRecord::new(top1, n1, color))?;
        window.push(&VertexRecord::new(bottom2, n2, color))?;
        window.push(&VertexRecord::new(top2, n2, color))?;
    }

    let span = window.commit_span()?;
    log::debug!("ellipse body: {} vertices at {:?}", span.vertex_count, span);
    Ok(span)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ArenaConfig;
    use crate::error::GeometryError;
    use crate::gfx::resources::HostBackend;

    const GREEN: [f32; 4] = [0.0, 1.0, 0.0, 1.0];

    #[test]
    fn test_ellipse_three_slices() {
        let mut arena = VertexArena::new(HostBackend::new());
        let span = ellipse_body(&mut arena, 3, 1.0, 2.0, GREEN).unwrap();

        assert_eq!(span.vertex_count, 18);
        assert_eq!(span.first_vertex, 0);
        assert_eq!(arena.cursor(), 180);

        let staged = arena.staging();
        let first = VertexRecord::from_slice(&staged[..STRIDE_FLOATS]).unwrap();
        assert!((first.position[0] - ELLIPSE_X_FACTOR).abs() < 1e-6);
        assert_eq!(first.position[1], 1.0);
        assert_eq!(first.color, GREEN);
        // normal is the rim point flattened onto y = 0, with no brightness factor
        assert_eq!(first.normal, [first.position[0], 0.0, first.position[2]]);
    }

    #[test]
    fn test_ellipse_appends_after_existing_records() {
        let mut arena = VertexArena::new(HostBackend::new());
        ellipse_body(&mut arena, 4, 1.0, 1.0, GREEN).unwrap();
        let span = ellipse_body(&mut arena, 4, 2.0, 1.0, GREEN).unwrap();

        assert_eq!(span.first_vertex, 24);
        assert_eq!(arena.total_vertices(), 48);
    }

    #[test]
    fn test_ellipse_flushes_when_full() {
        let config = ArenaConfig {
            capacity_floats: 200,
            ..ArenaConfig::default()
        };
        let mut arena = VertexArena::with_config(HostBackend::new(), config);

        ellipse_body(&mut arena, 3, 1.0, 1.0, GREEN).unwrap();
        let span = ellipse_body(&mut arena, 3, 1.0, 1.0, GREEN).unwrap();

        assert_eq!(arena.handles().len(), 1);
        assert_eq!(arena.handles()[0].num_vertices, 18);
        assert_eq!(span.buffer_index, 1);
        assert_eq!(span.first_vertex, 0);
    }

    #[test]
    fn test_ellipse_rejects_bad_input() {
        let mut arena = VertexArena::new(HostBackend::new());
        assert!(matches!(
            ellipse_body(&mut arena, 2, 1.0, 1.0, GREEN),
            Err(GeometryError::InvalidSlices { .. })
        ));
        assert!(ellipse_body(&mut arena, 3, 0.0, 1.0, GREEN).is_err());
        assert_eq!(arena.cursor(), 0);
    }
}
