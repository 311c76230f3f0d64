//! # Toroidal Helix
//!
//! A tube of radius `r3` swept along a helix that winds `wrap_factor` times
//! around a torus of radii `r1` (major) and `r2` (minor).
//!
//! The sweep is sampled on an `nx * ny` grid. For every longitudinal step
//! `phi` the helix point, its tangent and a radial direction give a local
//! frame; the tube circle is placed in the plane spanned by the radial
//! direction and `radial x tangent`. Each grid cell becomes two triangles with
//! flat per-triangle normals.

use std::time::Instant;

use cgmath::{InnerSpace, Vector3};

use super::normal::surface_normal_or;
use crate::config::{ShapeStyle, ToroidHelixParams};
use crate::error::{
    check_color, check_count, check_finite, check_non_negative, check_positive, GeometryResult,
};
use crate::gfx::resources::{ArenaSpan, BufferBackend, VertexArena, WriteWindow};
use crate::gfx::scene::vertex::VertexRecord;

fn check_params(params: &ToroidHelixParams) -> GeometryResult<()> {
    check_count(params.nx, 2)?;
    check_count(params.ny, 2)?;
    check_positive("r1", params.r1)?;
    check_positive("r2", params.r2)?;
    // a zero tube radius is accepted; every triangle is then degenerate
    check_non_negative("r3", params.r3)?;
    check_finite("wrap_factor", params.wrap_factor)?;
    check_positive("phi_step", params.phi_step)?;
    check_positive("theta_step", params.theta_step)
}

/// Sample the swept surface, row-major with `ny` points per longitudinal step
fn sample_grid(params: &ToroidHelixParams) -> Vec<[f32; 3]> {
    let (r1, r2, r3, f) = (params.r1, params.r2, params.r3, params.wrap_factor);
    let mut grid = Vec::with_capacity(params.nx * params.ny);

    for i in 0..params.nx {
        let phi = i as f32 * params.phi_step;
        let (sin_phi, cos_phi) = phi.sin_cos();
        let (sin_wrap, cos_wrap) = (f * phi).sin_cos();

        // point on the major circle
        let p1 = Vector3::new(r1 * sin_phi, r1 * cos_phi, 0.0);
        // point on the helix
        let p2 = Vector3::new(
            p1.x + r2 * sin_phi * cos_wrap,
            p1.y + r2 * cos_phi * cos_wrap,
            r2 * sin_wrap,
        );
        // d p2 / d phi
        let tangent = Vector3::new(
            r1 * cos_phi + r2 * cos_phi * cos_wrap - f * r2 * sin_phi * sin_wrap,
            -r1 * sin_phi - r2 * sin_phi * cos_wrap - f * r2 * cos_phi * sin_wrap,
            f * r2 * cos_wrap,
        )
        .normalize();
        let radial = (p2 - p1).normalize();
        let binormal = radial.cross(tangent);

        for j in 0..params.ny {
            let theta = j as f32 * params.theta_step;
            let (sin_theta, cos_theta) = theta.sin_cos();
            let p3 = (radial * cos_theta + binormal * sin_theta) * r3;
            grid.push((p2 + p3).into());
        }
    }
    grid
}

fn emit_triangle<B: BufferBackend>(
    window: &mut WriteWindow<'_, B>,
    [p1, p2, p3]: [[f32; 3]; 3],
    params: &ToroidHelixParams,
    color: [f32; 4],
    scale: f32,
) -> GeometryResult<()> {
    let normal: [f32; 3] = (surface_normal_or(p1, p2, p3, params.degenerate)? * scale).into();
    window.push(&VertexRecord::new(p1, normal, color))?;
    window.push(&VertexRecord::new(p2, normal, color))?;
    window.push(&VertexRecord::new(p3, normal, color))
}

/// Append the toroidal helix to `arena` as plain triangles.
///
/// Emits [`ToroidHelixParams::vertex_count`] records. With the default
/// parameters that is 12288 vertices, all reserved in a single window.
/// Zero-area triangles are resolved by `params.degenerate`; when that is
/// [`DegeneratePolicy::Fail`](crate::DegeneratePolicy::Fail) the window is
/// dropped and the arena is left as it was.
pub fn toroid_helix<B: BufferBackend>(
    arena: &mut VertexArena<B>,
    params: &ToroidHelixParams,
    color: [f32; 4],
    style: &ShapeStyle,
) -> GeometryResult<ArenaSpan> {
    check_params(params)?;
    check_color(color)?;

    let started = Instant::now();
    // reserve before sampling so an oversized grid is rejected without allocating it
    let mut window = arena.reserve_records(params.vertex_count())?;
    let grid = sample_grid(params);
    let at = |i: usize, j: usize| grid[i * params.ny + j];

    for i in 0..params.nx - 1 {
        for j in 0..params.ny - 1 {
            let scale = style.helix_normal_scale;
            emit_triangle(
                &mut window,
                [at(i, j), at(i + 1, j + 1), at(i, j + 1)],
                params,
                color,
                scale,
            )?;
            emit_triangle(
                &mut window,
                [at(i, j), at(i + 1, j), at(i + 1, j + 1)],
                params,
                color,
                scale,
            )?;
        }
    }
    let span = window.commit_span()?;

    log::info!(
        "toroid helix: {} vertices in {:.2?}",
        span.vertex_count,
        started.elapsed()
    );
    Ok(span)
}
