//! # Generator Configuration
//!
//! Tunable constants for the shape generators and the vertex arena. Every
//! struct here has a `Default` that reproduces the stock look of the shapes, so
//! most callers never construct one by hand.

use std::f32::consts::PI;

/// Normal scaling and debug colouring applied by the generators.
///
/// The lighting shaders these shapes were tuned for do not renormalize, so
/// normals are deliberately written with a magnitude above one to brighten the
/// diffuse term.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeStyle {
    /// Magnitude of the straight up/down normals on flat caps
    pub cap_normal_scale: f32,
    /// Multiplier applied to the rim position when deriving cylinder barrel normals
    pub body_normal_scale: f32,
    /// Multiplier applied to `position / radius` on spheres
    pub sphere_normal_scale: f32,
    /// Multiplier applied to per-triangle normals on the toroidal helix
    pub helix_normal_scale: f32,
    /// Multiplier applied to per-triangle normals of loaded models
    pub obj_normal_scale: f32,
    /// Colour override for the last latitude ring of a sphere (off by default)
    pub debug_last_ring: Option<[f32; 4]>,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            cap_normal_scale: 3.0,
            body_normal_scale: 7.0,
            sphere_normal_scale: 3.0,
            helix_normal_scale: 21.0,
            obj_normal_scale: 7.0,
            debug_last_ring: None,
        }
    }
}

impl ShapeStyle {
    /// Style with every scale set to 1.0, handy when unit normals are wanted
    pub fn unit_normals() -> Self {
        Self {
            cap_normal_scale: 1.0,
            body_normal_scale: 1.0,
            sphere_normal_scale: 1.0,
            helix_normal_scale: 1.0,
            obj_normal_scale: 1.0,
            debug_last_ring: None,
        }
    }

    /// Enable the white marker ring on the last sphere latitude
    pub fn with_debug_last_ring(mut self) -> Self {
        self.debug_last_ring = Some([1.0, 1.0, 1.0, 1.0]);
        self
    }
}

/// Sizing of the staging array owned by a [`VertexArena`](crate::gfx::resources::VertexArena)
#[derive(Debug, Clone, PartialEq)]
pub struct ArenaConfig {
    /// Capacity of the staging array in floats
    pub capacity_floats: usize,
    /// Label prefix given to flushed backend buffers
    pub label: String,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            capacity_floats: 150_000,
            label: "Arena Vertex Buffer".to_string(),
        }
    }
}

/// What the normal utility does when handed a zero-area triangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DegeneratePolicy {
    /// Abort the shape with [`GeometryError::DegenerateTriangle`](crate::GeometryError)
    Fail,
    /// Substitute this normal and carry on
    Fallback([f32; 3]),
}

impl Default for DegeneratePolicy {
    fn default() -> Self {
        DegeneratePolicy::Fallback([0.0, 1.0, 0.0])
    }
}

/// Parameters of the toroidal helix sweep
#[derive(Debug, Clone, PartialEq)]
pub struct ToroidHelixParams {
    /// Major radius of the torus
    pub r1: f32,
    /// Minor radius of the torus (helix offset from the major circle)
    pub r2: f32,
    /// Radius of the helix tube
    pub r3: f32,
    /// Number of helix wraps around the major circle
    pub wrap_factor: f32,
    /// Longitudinal steps along the sweep
    pub nx: usize,
    pub phi_step: f32,
    /// Steps around the tube cross section
    pub ny: usize,
    pub theta_step: f32,
    pub degenerate: DegeneratePolicy,
}

impl Default for ToroidHelixParams {
    fn default() -> Self {
        Self {
            r1: 8.0,
            r2: 4.0,
            r3: 1.0,
            wrap_factor: 8.0,
            nx: 129,
            phi_step: PI / 64.0,
            ny: 17,
            theta_step: PI / 8.0,
            degenerate: DegeneratePolicy::default(),
        }
    }
}

impl ToroidHelixParams {
    /// Number of vertex records the sweep emits
    pub fn vertex_count(&self) -> usize {
        // saturates so oversized grids fail the arena reservation instead of wrapping
        self.nx
            .saturating_sub(1)
            .saturating_mul(self.ny.saturating_sub(1))
            .saturating_mul(6)
    }
}

/// Parameters of the paraboloid height map
#[derive(Debug, Clone, PartialEq)]
pub struct HeightMapParams {
    pub size_per_side: usize,
    pub min_position: f32,
    pub position_range: f32,
}

impl Default for HeightMapParams {
    fn default() -> Self {
        Self {
            size_per_side: 32,
            min_position: -5.0,
            position_range: 10.0,
        }
    }
}
