//! # sdtrace Core
//!
//! CSG scenes built from signed distance functions, and a CPU sphere
//! tracer that renders them.
//!
//! A scene is a tree of [`sdf::List`] combinators over spheres, boxes and
//! crosses, clipped to an axis-aligned bounding volume and lit by point
//! lights. [`dispatch`] renders it on one thread or across a rayon pool;
//! the GPU backend lives in the `sdtrace-render` crate and shares the
//! scene and settings types defined here.
//!
//! ## Quick Start
//!
//! ```rust
//! use sdtrace_core::prelude::*;
//!
//! let mut scene = Scene::default();
//! scene.append(menger_sponge(Vec3::new(0.0, 0.0, 6.0), 3.0, 2, Vec3::ONE));
//! scene.add_light(Light::white(Vec3::new(-3.0, 4.0, 0.0)));
//!
//! let settings = RenderSettings { width: 32, height: 24, ..Default::default() };
//! let frame = render_sequential(&RenderContext::new(&scene, &settings));
//! assert_eq!(frame.pixels().len(), 32 * 24);
//! ```
//!
//! ## Conventions
//!
//! - **Coordinate system**: left-handed, Y-up, camera looks down +Z by default
//! - **Colors**: linear RGB in `[0, 1]`, gamma applied only on export
//! - **Precision**: `f32` throughout, matching the GPU kernel

pub mod camera;
pub mod dispatch;
pub mod frame;
pub mod scene;
pub mod sdf;
pub mod settings;
pub mod trace;

mod error;

pub use error::{Error, Result};

/// Prelude module for convenient imports
pub mod prelude {
    // Scene description
    pub use crate::camera::Camera;
    pub use crate::scene::{Light, Scene};
    pub use crate::sdf::{
        Aabb, Body, Box3, Cross, List, Mode, Sdf, Sphere, Surface, death_star, menger_sponge,
    };

    // Rendering
    pub use crate::dispatch::{render_parallel, render_sequential};
    pub use crate::frame::Frame;
    pub use crate::settings::RenderSettings;
    pub use crate::trace::{RenderContext, Trace, TraceState};

    // Math (re-export glam)
    pub use glam::Vec3;

    // Error handling
    pub use crate::{Error, Result};
}
