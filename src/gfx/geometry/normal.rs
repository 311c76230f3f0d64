//! # Surface Normals
//!
//! Triangle normals from the cross product of two edges. For a triangle
//! `p1, p2, p3` with `U = p2 - p1` and `V = p3 - p1` the normal is `U x V`,
//! so the winding order decides which side the normal points to.
//!
//! Every function here is pure. Concurrent callers never share scratch state.

use cgmath::{InnerSpace, Vector3};

use crate::config::DegeneratePolicy;
use crate::error::{GeometryError, GeometryResult};

/// Cross products shorter than this are treated as zero-area triangles
const DEGENERATE_EPSILON: f32 = 1e-12;

/// Scale `v` to unit length.
///
/// A zero vector has no direction; the result then has NaN components. Use
/// [`try_surface_normal`] when the input may be degenerate.
pub fn normalize(v: Vector3<f32>) -> Vector3<f32> {
    v / v.magnitude()
}

/// Raw (unnormalized) cross product `(p2 - p1) x (p3 - p1)`
pub fn cross_edges(p1: [f32; 3], p2: [f32; 3], p3: [f32; 3]) -> Vector3<f32> {
    let p1 = Vector3::from(p1);
    let u = Vector3::from(p2) - p1;
    let v = Vector3::from(p3) - p1;
    u.cross(v)
}

/// Unit normal of the triangle `p1, p2, p3`.
///
/// Collinear or repeated points produce non-finite components.
pub fn surface_normal(p1: [f32; 3], p2: [f32; 3], p3: [f32; 3]) -> Vector3<f32> {
    normalize(cross_edges(p1, p2, p3))
}

/// Unit normal of the triangle, or [`GeometryError::DegenerateTriangle`]
/// when the triangle has no area.
pub fn try_surface_normal(
    p1: [f32; 3],
    p2: [f32; 3],
    p3: [f32; 3],
) -> GeometryResult<Vector3<f32>> {
    let n = cross_edges(p1, p2, p3);
    let len2 = n.magnitude2();
    if !len2.is_finite() || len2 <= DEGENERATE_EPSILON {
        return Err(GeometryError::DegenerateTriangle);
    }
    Ok(n / len2.sqrt())
}

/// Unit normal of the triangle with degenerate input resolved by `policy`
pub fn surface_normal_or(
    p1: [f32; 3],
    p2: [f32; 3],
    p3: [f32; 3],
    policy: DegeneratePolicy,
) -> GeometryResult<Vector3<f32>> {
    match try_surface_normal(p1, p2, p3) {
        Ok(n) => Ok(n),
        Err(GeometryError::DegenerateTriangle) => match policy {
            DegeneratePolicy::Fail => Err(GeometryError::DegenerateTriangle),
            DegeneratePolicy::Fallback(fallback) => {
                log::debug!("degenerate triangle {p1:?} {p2:?} {p3:?}, using fallback normal");
                Ok(Vector3::from(fallback))
            }
        },
        Err(e) => Err(e),
    }
}
