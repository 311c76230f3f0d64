//! Wavefront OBJ models converted to flat-shaded triangle lists.
//!
//! Parsing is handled by `tobj`. Every face is expanded to three vertices
//! carrying the face normal, so the result is drawn without indices and is
//! not limited by the 16-bit index range.

use std::path::Path;

use super::normal::surface_normal_or;
use super::{DrawCall, MeshData, Primitive};
use crate::config::{DegeneratePolicy, ShapeStyle};
use crate::error::{check_color, GeometryError, GeometryResult};
use crate::gfx::scene::vertex::VertexRecord;

/// Load every model in an OBJ file into one flat-shaded mesh.
///
/// Faces whose material defines an ambient colour (`Ka`) use it with full
/// opacity; all other faces use `color`. A missing or broken MTL file is not
/// an error. Zero-area faces are resolved by `degenerate`.
pub fn load_obj<P: AsRef<Path>>(
    path: P,
    color: [f32; 4],
    style: &ShapeStyle,
    degenerate: DegeneratePolicy,
) -> GeometryResult<MeshData> {
    check_color(color)?;
    let path = path.as_ref();

    let (models, materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )?;

    let materials = materials.unwrap_or_else(|e| {
        log::warn!("no usable materials for {}: {e}", path.display());
        Vec::new()
    });

    let mut mesh = MeshData::new();
    for model in &models {
        let model_color = model
            .mesh
            .material_id
            .and_then(|id| materials.get(id))
            .and_then(|m| m.ambient)
            .map(|[r, g, b]| [r, g, b, 1.0])
            .unwrap_or(color);

        let part = flat_shaded(
            &model.mesh.positions,
            &model.mesh.indices,
            model_color,
            style.obj_normal_scale,
            degenerate,
        )?;
        log::debug!("model '{}': {} triangles", model.name, part.vertex_count() / 3);
        mesh.vertices.extend(part.vertices);
    }

    if mesh.vertices.is_empty() {
        return Err(GeometryError::ObjLoad(format!(
            "{} contains no faces",
            path.display()
        )));
    }

    mesh.draws
        .push(DrawCall::arrays(Primitive::Triangles, 0, mesh.vertex_count()));
    log::info!(
        "loaded {}: {} models, {} vertices",
        path.display(),
        models.len(),
        mesh.vertex_count()
    );
    Ok(mesh)
}

/// Expand an indexed triangle list into flat-shaded vertices.
///
/// `positions` holds xyz triples and `indices` groups of three; a trailing
/// partial triangle is ignored. Zero-area faces are handled by `degenerate`.
pub fn flat_shaded(
    positions: &[f32],
    indices: &[u32],
    color: [f32; 4],
    normal_scale: f32,
    degenerate: DegeneratePolicy,
) -> GeometryResult<MeshData> {
    let vertex_count = positions.len() / 3;
    let position = |index: u32| -> GeometryResult<[f32; 3]> {
        let i = index as usize;
        if i >= vertex_count {
            return Err(GeometryError::IndexOutOfRange {
                index,
                vertex_count,
            });
        }
        Ok([positions[3 * i], positions[3 * i + 1], positions[3 * i + 2]])
    };

    let mut mesh = MeshData::new();
    mesh.vertices.reserve(indices.len() / 3 * 3);
    for tri in indices.chunks_exact(3) {
        let p1 = position(tri[0])?;
        let p2 = position(tri[1])?;
        let p3 = position(tri[2])?;
        let n = surface_normal_or(p1, p2, p3, degenerate)? * normal_scale;
        let n: [f32; 3] = n.into();

        mesh.vertices.push(VertexRecord::new(p1, n, color));
        mesh.vertices.push(VertexRecord::new(p2, n, color));
        mesh.vertices.push(VertexRecord::new(p3, n, color));
    }
    mesh.draws
        .push(DrawCall::arrays(Primitive::Triangles, 0, mesh.vertex_count()));
    Ok(mesh)
}
