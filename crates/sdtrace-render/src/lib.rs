//! sdtrace Render - wgpu compute backend
//!
//! Renders a flattened scene with the sdtrace kernel on any adapter wgpu can
//! find, without a window. Each frame follows a strict two-phase protocol:
//! every buffer is uploaded before the dispatch is recorded, and the host
//! blocks until the output is mapped back.
//!
//! ## Example
//!
//! ```rust,no_run
//! use sdtrace_core::prelude::*;
//! use sdtrace_render::{GpuTracer, init_headless};
//!
//! let (device, queue) = pollster::block_on(init_headless())?;
//! let tracer = GpuTracer::new(device, queue);
//!
//! let mut scene = Scene::default();
//! scene.append(Sphere::new(Vec3::new(0.0, 0.0, 5.0), 1.0, Vec3::ONE));
//! scene.add_light(Light::white(Vec3::ZERO));
//!
//! let frame = tracer.render_scene(&scene, &RenderSettings::default())?;
//! # Ok::<(), sdtrace_render::RenderError>(())
//! ```

mod error;
pub mod tracer;

// Re-export wgpu for users who need adapter or device types
pub use wgpu;

pub use error::RenderError;
pub use tracer::{GpuTracer, init_headless};
