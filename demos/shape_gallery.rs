//! Builds every shape, packs the arena-backed ones into shared buffers and
//! uploads the rest individually.
//!
//! Uses a wgpu device when one is available, otherwise the in-memory backend.
//! Run with `RUST_LOG=debug` to see per-shape detail.

use anyhow::{Context, Result};
use glsandbox::prelude::*;

const RED: [f32; 4] = [0.8, 0.1, 0.1, 1.0];
const GOLD: [f32; 4] = [0.9, 0.7, 0.2, 1.0];
const TEAL: [f32; 4] = [0.1, 0.6, 0.6, 1.0];

fn request_device() -> Option<(wgpu::Device, wgpu::Queue)> {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        ..Default::default()
    });

    let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
        power_preference: wgpu::PowerPreference::default(),
        compatible_surface: None,
        force_fallback_adapter: false,
    }))
    .map_err(|e| log::warn!("no adapter: {e}"))
    .ok()?;
    log::info!("using adapter {}", adapter.get_info().name);

    pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
        label: Some("Shape Gallery Device"),
        required_features: wgpu::Features::default(),
        required_limits: wgpu::Limits::downlevel_defaults(),
        memory_hints: wgpu::MemoryHints::default(),
        trace: wgpu::Trace::Off,
    }))
    .map_err(|e| log::warn!("no device: {e}"))
    .ok()
}

fn build_gallery<B: BufferBackend>(backend: &mut B) -> Result<usize> {
    let style = ShapeStyle::default();
    let mut draws = 0;

    let cyl = cylinder(32, 0.5, 2.0, RED, &style)?;
    let cyl = ShapeBuffers::upload_cylinder(&cyl, backend).context("uploading cylinder")?;
    draws += cyl.draw_commands(false).len();

    let cone_shape = cone(32, 0.6, 1.5, GOLD, TEAL, &style)?;
    let mut cone_shape = ShapeBuffers::upload_cone(&cone_shape, backend).context("uploading cone")?;
    cone_shape.set_translation(Vector3::new(2.0, 0.0, 0.0));
    draws += cone_shape.draw_commands(false).len();

    let ball = sphere(24, 1.0, TEAL, &style)?;
    let ball = ShapeBuffers::upload("Sphere", &[&ball], backend).context("uploading sphere")?;
    draws += ball.draw_commands(false).len();

    let terrain = height_map(&HeightMapParams::default())?;
    let terrain = ShapeBuffers::upload("Height Map", &[&terrain], backend)?;
    draws += terrain.draw_commands(true).len();

    Ok(draws)
}

fn build_arena<B: BufferBackend>(backend: B) -> Result<(usize, usize)> {
    let style = ShapeStyle::default();
    let mut arena = VertexArena::new(backend);

    for slices in [3, 8, 16] {
        let span = ellipse_body(&mut arena, slices, 1.0, 0.5, GOLD)?;
        log::debug!("ellipse with {slices} slices at {span:?}");
    }
    toroid_helix(&mut arena, &ToroidHelixParams::default(), RED, &style)?;
    arena.flush().context("flushing vertex arena")?;

    let draws = arena_draw_commands(arena.handles(), false).len();
    Ok((draws, arena.total_vertices()))
}

fn main() -> Result<()> {
    env_logger::init();

    let (draws, (arena_draws, arena_vertices)) = match request_device() {
        Some((device, _queue)) => {
            let mut backend = WgpuBackend::new(&device);
            let draws = build_gallery(&mut backend)?;
            (draws, build_arena(WgpuBackend::new(&device))?)
        }
        None => {
            log::info!("falling back to the host backend");
            let mut backend = HostBackend::new();
            let draws = build_gallery(&mut backend)?;
            (draws, build_arena(HostBackend::new())?)
        }
    };

    log::info!("gallery: {draws} shape draws");
    log::info!("arena: {arena_draws} buffers holding {arena_vertices} vertices");
    Ok(())
}
