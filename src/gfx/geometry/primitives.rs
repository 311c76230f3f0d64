//! # Primitive Shape Generation
//!
//! Self-contained generators that each return their own [`MeshData`]. Shapes
//! are Y-up and centred on the origin. Rim loops run `i = 0..=slices`, repeating
//! the start angle so the seam closes with matching normals.

use std::f32::consts::TAU;

use cgmath::{InnerSpace, Vector3};

use super::{index_u16, DrawCall, MeshData, Primitive};
use crate::config::{HeightMapParams, ShapeStyle};
use crate::error::{
    check_color, check_count, check_finite, check_positive, check_slices, GeometryError,
    GeometryResult,
};
use crate::gfx::scene::vertex::VertexRecord;

/// Smallest slice count that still encloses a volume
pub const MIN_SLICES: u32 = 3;

/// Angle of rim vertex `i` out of `slices`
fn rim_angle(i: u32, slices: u32) -> f32 {
    i as f32 / slices as f32 * TAU
}

fn check_shape(slices: u32, radius: f32, height: f32, color: [f32; 4]) -> GeometryResult<()> {
    check_slices(slices, MIN_SLICES)?;
    check_positive("radius", radius)?;
    check_finite("height", height)?;
    check_color(color)
}

/// Cylinder geometry: both caps share one buffer, the barrel has its own.
#[derive(Debug, Clone, PartialEq)]
pub struct CylinderGeometry {
    /// Top fan followed by bottom fan, drawn without indices
    pub caps: MeshData,
    /// Top rim then bottom rim with outward normals, drawn as an indexed strip
    pub body: MeshData,
}

/// Generate a capped cylinder along the Y axis
///
/// # Arguments
/// * `slices` - Number of segments around the rim (at least 3)
/// * `radius` - Rim radius
/// * `height` - Extent along Y, centred on the origin
/// * `color` - RGBA colour applied to every vertex
///
/// The caps contain `2 * (slices + 2)` vertices (a centre plus `slices + 1` rim
/// vertices each). The barrel holds the `2 * (slices + 1)` rim vertices and a
/// strip of `2 * (slices + 1)` indices pairing each top vertex with the bottom
/// vertex directly below it.
pub fn cylinder(
    slices: u32,
    radius: f32,
    height: f32,
    color: [f32; 4],
    style: &ShapeStyle,
) -> GeometryResult<CylinderGeometry> {
    check_shape(slices, radius, height, color)?;

    let half = height / 2.0;
    let up = [0.0, style.cap_normal_scale, 0.0];
    let down = [0.0, -style.cap_normal_scale, 0.0];
    let rim = slices as usize + 1;

    let mut caps = MeshData::new();
    caps.vertices.reserve(2 * (rim + 1));

    // top plate
    caps.vertices.push(VertexRecord::new([0.0, half, 0.0], up, color));
    for i in 0..=slices {
        let a = rim_angle(i, slices);
        caps.vertices
            .push(VertexRecord::new([radius * a.cos(), half, -radius * a.sin()], up, color));
    }

    // bottom plate
    caps.vertices.push(VertexRecord::new([0.0, -half, 0.0], down, color));
    for i in 0..=slices {
        let a = rim_angle(i, slices);
        caps.vertices
            .push(VertexRecord::new([radius * a.cos(), -half, radius * a.sin()], down, color));
    }
    caps.draws.push(DrawCall::arrays(Primitive::TriangleFan, 0, rim + 1));
    caps.draws.push(DrawCall::arrays(Primitive::TriangleFan, rim + 1, rim + 1));

    // barrel: same rim positions, normals pushed outward from the axis
    let mut body = MeshData::new();
    body.vertices.reserve(2 * rim);
    let top_rim = &caps.vertices[1..=rim];
    let bottom_rim = &caps.vertices[rim + 2..];
    for v in top_rim.iter().chain(bottom_rim) {
        let [x, _, z] = v.position;
        let normal = [x * style.body_normal_scale, 0.0, z * style.body_normal_scale];
        body.vertices.push(VertexRecord::new(v.position, normal, color));
    }

    // bottom rim vertex `slices - k` sits directly under top rim vertex `k`
    body.indices.reserve(2 * rim);
    for k in 0..rim {
        body.indices.push(index_u16(k)?);
        body.indices.push(index_u16(2 * rim - 1 - k)?);
    }
    body.draws
        .push(DrawCall::elements(Primitive::TriangleStrip, body.indices.len()));

    log::debug!(
        "cylinder: {} cap vertices, {} body vertices, {} body indices",
        caps.vertex_count(),
        body.vertex_count(),
        body.index_count()
    );

    Ok(CylinderGeometry { caps, body })
}

/// Cone geometry: two independently packed fans.
#[derive(Debug, Clone, PartialEq)]
pub struct ConeGeometry {
    pub apex: MeshData,
    pub base: MeshData,
}

/// Generate a cone along the Y axis with its tip at `+length / 2`
///
/// The apex fan carries `color`, the base fan `base_color`. Rim normals on the
/// apex fan are `(-cos a / radius, 0, -sin a / radius)`: a lateral direction
/// scaled by the inverse radius, not a true slant normal.
pub fn cone(
    slices: u32,
    radius: f32,
    length: f32,
    color: [f32; 4],
    base_color: [f32; 4],
    style: &ShapeStyle,
) -> GeometryResult<ConeGeometry> {
    check_shape(slices, radius, length, color)?;
    check_color(base_color)?;

    let half = length / 2.0;

    let mut apex = MeshData::new();
    apex.vertices
        .push(VertexRecord::new([0.0, half, 0.0], [0.0, 1.0, 0.0], color));
    for i in 0..=slices {
        let a = rim_angle(i, slices);
        let (sin, cos) = a.sin_cos();
        apex.vertices.push(VertexRecord::new(
            [radius * cos, -half, radius * sin],
            [-cos / radius, 0.0, -sin / radius],
            color,
        ));
    }
    apex.draws
        .push(DrawCall::arrays(Primitive::TriangleFan, 0, apex.vertices.len()));

    let down = [0.0, -style.cap_normal_scale, 0.0];
    let mut base = MeshData::new();
    base.vertices
        .push(VertexRecord::new([0.0, -half, 0.0], down, base_color));
    for i in 0..=slices {
        let a = rim_angle(i, slices);
        base.vertices.push(VertexRecord::new(
            [radius * a.cos(), -half, -radius * a.sin()],
            down,
            base_color,
        ));
    }
    base.draws
        .push(DrawCall::arrays(Primitive::TriangleFan, 0, base.vertices.len()));

    log::debug!(
        "cone: {} apex vertices, {} base vertices",
        apex.vertex_count(),
        base.vertex_count()
    );

    Ok(ConeGeometry { apex, base })
}

/// Generate a UV sphere as a single indexed triangle strip
///
/// Vertices form a `(slices + 1) x (slices + 1)` grid:
///
/// ```text
/// x = r * sin(step / 2 * i) * sin(step * j)
/// y = r * cos(step / 2 * i)
/// z = r * sin(step / 2 * i) * cos(step * j)
/// ```
///
/// with `step = 2 * PI / slices`. Each latitude band is a strip; consecutive
/// bands are joined by two repeated indices, giving
/// `slices * 2 * (slices + 1) + 2 * (slices - 1)` indices in total.
pub fn sphere(
    slices: u32,
    radius: f32,
    color: [f32; 4],
    style: &ShapeStyle,
) -> GeometryResult<MeshData> {
    check_shape(slices, radius, 0.0, color)?;

    let n = slices as usize;
    let row = n + 1;
    // the last grid index must still fit in 16 bits
    index_u16(row * row - 1)?;

    let step = TAU / slices as f32;
    let scale = style.sphere_normal_scale / radius;

    let mut mesh = MeshData::new();
    mesh.vertices.reserve(row * row);
    for i in 0..=slices {
        let lat = step / 2.0 * i as f32;
        let (sin_lat, cos_lat) = lat.sin_cos();
        let ring_color = match style.debug_last_ring {
            Some(marker) if i == slices => [marker[0], marker[1], marker[2], color[3]],
            _ => color,
        };
        for j in 0..=slices {
            let (sin_lon, cos_lon) = (step * j as f32).sin_cos();
            let p = [
                radius * sin_lat * sin_lon,
                radius * cos_lat,
                radius * sin_lat * cos_lon,
            ];
            mesh.vertices.push(VertexRecord::new(
                p,
                [p[0] * scale, p[1] * scale, p[2] * scale],
                ring_color,
            ));
        }
    }

    mesh.indices = degenerate_strip_indices(row, n + 1)?;
    mesh.draws
        .push(DrawCall::elements(Primitive::TriangleStrip, mesh.indices.len()));

    log::debug!(
        "sphere: {} vertices, {} indices",
        mesh.vertex_count(),
        mesh.index_count()
    );
    Ok(mesh)
}

/// Strip indices over a grid of `rows` rows of `row_len` vertices, one band per
/// pair of rows, with two degenerate indices linking consecutive bands.
fn degenerate_strip_indices(row_len: usize, rows: usize) -> GeometryResult<Vec<u16>> {
    let bands = rows.saturating_sub(1);
    let degenerates = 2 * bands.saturating_sub(1);
    let mut indices = Vec::with_capacity(bands * 2 * row_len + degenerates);

    for y in 0..bands {
        if y > 0 {
            // repeat the first vertex of this band
            indices.push(index_u16(y * row_len)?);
        }
        for x in 0..row_len {
            indices.push(index_u16(y * row_len + x)?);
            indices.push(index_u16((y + 1) * row_len + x)?);
        }
        if y + 1 < bands {
            // repeat the last vertex of this band
            indices.push(index_u16((y + 1) * row_len + row_len - 1)?);
        }
    }
    Ok(indices)
}

/// Generate a paraboloid height map `z = (x^2 + y^2) / 10` over a square grid
///
/// Normals come from the cross product of the two surface tangents and are
/// unit length. Colours ramp with the grid position.
pub fn height_map(params: &HeightMapParams) -> GeometryResult<MeshData> {
    let side = params.size_per_side;
    check_count(side, 2)?;
    check_finite("min_position", params.min_position)?;
    check_positive("position_range", params.position_range)?;
    let vertex_count = side
        .checked_mul(side)
        .ok_or(GeometryError::IndexOverflow {
            vertex_count: usize::MAX,
        })?;
    index_u16(vertex_count - 1)?;

    let mut mesh = MeshData::new();
    mesh.vertices.reserve(side * side);
    for y in 0..side {
        for x in 0..side {
            let x_ratio = x as f32 / (side - 1) as f32;
            let y_ratio = 1.0 - y as f32 / (side - 1) as f32;
            let px = params.min_position + x_ratio * params.position_range;
            let py = params.min_position + y_ratio * params.position_range;

            let tangent_x = Vector3::new(1.0, 0.0, 2.0 * px / 10.0);
            let tangent_y = Vector3::new(0.0, 1.0, 2.0 * py / 10.0);
            let normal = tangent_x.cross(tangent_y).normalize();

            mesh.vertices.push(VertexRecord::new(
                [px, py, (px * px + py * py) / 10.0],
                normal.into(),
                [x_ratio, y_ratio, 0.5, 1.0],
            ));
        }
    }

    mesh.indices = degenerate_strip_indices(side, side)?;
    mesh.draws
        .push(DrawCall::elements(Primitive::TriangleStrip, mesh.indices.len()));

    log::debug!(
        "height map: {} vertices, {} indices",
        mesh.vertex_count(),
        mesh.index_count()
    );
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
    const EPS: f32 = 1e-4;

    #[test]
    fn test_cylinder_generation() {
        let cyl = cylinder(4, 1.0, 2.0, RED, &ShapeStyle::default()).unwrap();

        // 1 centre + 5 rim per cap
        assert_eq!(cyl.caps.vertex_count(), 12);
        assert_eq!(cyl.caps.draws[0], DrawCall::arrays(Primitive::TriangleFan, 0, 6));
        assert_eq!(cyl.caps.draws[1], DrawCall::arrays(Primitive::TriangleFan, 6, 6));
        assert!(cyl.caps.indices.is_empty());

        assert_eq!(cyl.body.vertex_count(), 10);
        assert_eq!(cyl.body.indices.len(), 10);
        assert!(cyl.body.indices.iter().all(|&i| i < 10));
        assert!(cyl.body.validate_indices().is_ok());
        assert_eq!(cyl.body.draws, vec![DrawCall::elements(Primitive::TriangleStrip, 10)]);
    }

    #[test]
    fn test_cylinder_index_count_scales() {
        for n in [3u32, 7, 16, 64] {
            let cyl = cylinder(n, 0.5, 1.0, RED, &ShapeStyle::default()).unwrap();
            let rim = 2 * (n as usize + 1);
            assert_eq!(cyl.body.indices.len(), rim);
            assert!(cyl.body.indices.iter().all(|&i| (i as usize) < rim));
        }
    }

    #[test]
    fn test_cylinder_strip_pairs_are_vertical() {
        let cyl = cylinder(6, 2.0, 3.0, RED, &ShapeStyle::default()).unwrap();
        for pair in cyl.body.indices.chunks(2) {
            let top = cyl.body.vertices[pair[0] as usize];
            let bottom = cyl.body.vertices[pair[1] as usize];
            assert!((top.position[0] - bottom.position[0]).abs() < EPS);
            assert!((top.position[2] - bottom.position[2]).abs() < EPS);
            assert!((top.position[1] - 1.5).abs() < EPS);
            assert!((bottom.position[1] + 1.5).abs() < EPS);
        }
    }

    #[test]
    fn test_cylinder_normals() {
        let style = ShapeStyle::default();
        let cyl = cylinder(4, 1.0, 2.0, RED, &style).unwrap();
        assert_eq!(cyl.caps.vertices[0].normal, [0.0, 3.0, 0.0]);
        assert_eq!(cyl.caps.vertices[6].normal, [0.0, -3.0, 0.0]);
        // first rim vertex sits on +X
        let n = cyl.body.vertices[0].normal;
        assert!((n[0] - 7.0).abs() < EPS && n[1] == 0.0 && n[2].abs() < EPS);
        assert!(cyl.body.vertices.iter().all(|v| v.color == RED));
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        let style = ShapeStyle::default();
        assert_eq!(
            cylinder(2, 1.0, 1.0, RED, &style),
            Err(GeometryError::InvalidSlices { slices: 2, min: 3 })
        );
        assert!(matches!(
            cylinder(8, f32::NAN, 1.0, RED, &style),
            Err(GeometryError::InvalidDimension { name: "radius", .. })
        ));
        assert!(sphere(8, -1.0, RED, &style).is_err());
        assert!(cone(8, 1.0, 1.0, RED, [2.0, 0.0, 0.0, 1.0], &style).is_err());
    }

    #[test]
    fn test_cone_generation() {
        let blue = [0.0, 0.0, 1.0, 1.0];
        let cone = cone(8, 2.0, 4.0, RED, blue, &ShapeStyle::default()).unwrap();
        assert_eq!(cone.apex.vertex_count(), 10);
        assert_eq!(cone.base.vertex_count(), 10);
        assert_eq!(cone.apex.vertices[0].position, [0.0, 2.0, 0.0]);
        assert!(cone.base.vertices.iter().all(|v| v.color == blue));
        assert!(cone.base.vertices.iter().all(|v| v.normal[1] < 0.0));

        // inverse-radius lateral normal
        let n = cone.apex.vertices[1].normal;
        assert!((n[0] + 0.5).abs() < EPS && n[2].abs() < EPS);
        assert!(cone.apex.indices.is_empty() && cone.base.indices.is_empty());
        assert_eq!(cone.apex.draws[0].mode, Primitive::TriangleFan);
    }

    #[test]
    fn test_sphere_generation() {
        for n in [3u32, 4, 8, 20] {
            let s = sphere(n, 1.5, RED, &ShapeStyle::default()).unwrap();
            let n = n as usize;
            assert_eq!(s.vertex_count(), (n + 1) * (n + 1));
            assert_eq!(s.index_count(), n * 2 * (n + 1) + 2 * (n - 1));
            assert!(s.validate_indices().is_ok());
        }
    }

    #[test]
    fn test_sphere_geometry() {
        let style = ShapeStyle::unit_normals();
        let s = sphere(12, 2.0, RED, &style).unwrap();
        for v in &s.vertices {
            let p = Vector3::from(v.position);
            assert!((p.magnitude() - 2.0).abs() < 1e-3);
            assert!((Vector3::from(v.normal).magnitude() - 1.0).abs() < 1e-3);
        }
        // north pole first, south pole last
        assert!((s.vertices[0].position[1] - 2.0).abs() < EPS);
        assert!((s.vertices.last().unwrap().position[1] + 2.0).abs() < EPS);
    }

    #[test]
    fn test_sphere_debug_ring_is_opt_in() {
        let plain = sphere(4, 1.0, RED, &ShapeStyle::default()).unwrap();
        assert!(plain.vertices.iter().all(|v| v.color == RED));

        let marked = sphere(4, 1.0, RED, &ShapeStyle::default().with_debug_last_ring()).unwrap();
        let last_ring = &marked.vertices[20..];
        assert_eq!(last_ring.len(), 5);
        assert!(last_ring.iter().all(|v| v.color == [1.0, 1.0, 1.0, 1.0]));
        assert!(marked.vertices[..20].iter().all(|v| v.color == RED));
    }

    #[test]
    fn test_sphere_degenerate_links() {
        let s = sphere(3, 1.0, RED, &ShapeStyle::default()).unwrap();
        // band 0 is 8 indices, then the links repeat 7 (end of band 0) and 4 (start of band 1)
        assert_eq!(&s.indices[..8], &[0, 4, 1, 5, 2, 6, 3, 7]);
        assert_eq!(s.indices[8], 7);
        assert_eq!(s.indices[9], 4);
    }

    #[test]
    fn test_sphere_too_many_slices() {
        assert!(matches!(
            sphere(300, 1.0, RED, &ShapeStyle::default()),
            Err(GeometryError::IndexOverflow { .. })
        ));
    }

    #[test]
    fn test_height_map_generation() {
        let params = HeightMapParams::default();
        let map = height_map(&params).unwrap();
        assert_eq!(map.vertex_count(), 32 * 32);
        assert_eq!(map.index_count(), 31 * 2 * 32 + 2 * 30);
        assert!(map.validate_indices().is_ok());

        // top-left corner is (-5, 5)
        let corner = map.vertices[0];
        assert_eq!(corner.position[0], -5.0);
        assert_eq!(corner.position[1], 5.0);
        assert!((corner.position[2] - 5.0).abs() < EPS);
        assert!((Vector3::from(corner.normal).magnitude() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_height_map_rejects_oversized_grid() {
        // must not wrap to a small u32 before validation
        let params = HeightMapParams {
            size_per_side: (1 << 32) + 2,
            ..HeightMapParams::default()
        };
        assert!(matches!(
            height_map(&params),
            Err(GeometryError::IndexOverflow { .. })
        ));

        let params = HeightMapParams {
            size_per_side: 257,
            ..HeightMapParams::default()
        };
        assert!(matches!(
            height_map(&params),
            Err(GeometryError::IndexOverflow { .. })
        ));

        let params = HeightMapParams {
            size_per_side: 1,
            ..HeightMapParams::default()
        };
        assert_eq!(
            height_map(&params),
            Err(GeometryError::InvalidSlices { slices: 1, min: 2 })
        );
    }
}
