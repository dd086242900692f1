//! Sphere tracing and shading
//!
//! A ray starts `Marching` and ends in exactly one of three states:
//!
//! ```text
//!            sd < precision
//! Marching ─────────────────▶ Hit
//!    │  left clipping volume
//!    ├──────────────────────▶ Escaped
//!    │  iteration cap reached
//!    └──────────────────────▶ Exhausted
//! ```
//!
//! Only hits are shaded; every other outcome is the background color.

use crate::scene::{Light, Scene};
use crate::sdf::Surface;
use crate::settings::RenderSettings;
use glam::Vec3;

/// How a traced ray ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceState {
    Hit,
    Escaped,
    Exhausted,
}

/// Outcome of one sphere trace
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trace {
    pub state: TraceState,
    /// Where the ray stopped
    pub position: Vec3,
    /// Last surface evaluated along the ray
    pub surface: Surface,
    /// SDF evaluations performed
    pub iterations: u32,
}

impl Trace {
    pub fn is_hit(&self) -> bool {
        self.state == TraceState::Hit
    }
}

/// Everything needed to trace rays through one scene.
///
/// Borrowing the scene for the context's lifetime keeps it immutable while
/// any trace is in flight.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    scene: &'a Scene,
    settings: &'a RenderSettings,
}

impl<'a> RenderContext<'a> {
    pub fn new(scene: &'a Scene, settings: &'a RenderSettings) -> Self {
        Self { scene, settings }
    }

    pub fn scene(&self) -> &'a Scene {
        self.scene
    }

    pub fn settings(&self) -> &'a RenderSettings {
        self.settings
    }

    /// Step along `direction` by the scene distance until hit, escape or
    /// the iteration cap.
    pub fn march(&self, origin: Vec3, direction: Vec3) -> Trace {
        let mut position = origin;
        let mut surface = Surface::EMPTY;

        if !self.scene.contains(position) {
            return Trace {
                state: TraceState::Escaped,
                position,
                surface,
                iterations: 0,
            };
        }

        for iteration in 1..=self.settings.max_iterations {
            surface = self.scene.sdf(position);
            position += surface.distance * direction;

            if surface.distance < self.settings.precision {
                return Trace {
                    state: TraceState::Hit,
                    position,
                    surface,
                    iterations: iteration,
                };
            }
            if !self.scene.contains(position) {
                return Trace {
                    state: TraceState::Escaped,
                    position,
                    surface,
                    iterations: iteration,
                };
            }
        }

        Trace {
            state: TraceState::Exhausted,
            position,
            surface,
            iterations: self.settings.max_iterations,
        }
    }

    /// Unit surface normal at `p`, or `None` where the gradient vanishes
    /// or is not finite.
    pub fn normal(&self, p: Vec3) -> Option<Vec3> {
        self.scene
            .gradient(p, self.settings.normal_step)
            .try_normalize()
    }

    /// Whether something sits between `p` and `light`.
    ///
    /// A shadow ray that runs out of iterations short of the light counts
    /// as blocked; only leaving the bounds or passing the light lets it through.
    pub fn occluded(&self, light: &Light, p: Vec3, normal: Vec3) -> bool {
        let Some(direction) = (light.position - p).try_normalize() else {
            return false;
        };
        let origin = p + normal * (self.settings.precision + self.settings.offset);

        let trace = self.march(origin, direction);
        trace.state != TraceState::Escaped
            && (light.position - trace.position).dot(direction) > 0.0
    }

    /// Diffuse lighting term at `p`, clamped per channel to `[ambient, 1]`
    pub fn lighting(&self, p: Vec3, normal: Vec3) -> Vec3 {
        let mut lighting = Vec3::ZERO;
        for light in self.scene.lights() {
            if self.occluded(light, p, normal) {
                continue;
            }
            let Some(to_light) = (light.position - p).try_normalize() else {
                continue;
            };
            lighting += normal.dot(to_light).max(0.0) * light.color;
        }
        lighting.clamp(Vec3::splat(self.settings.ambient), Vec3::ONE)
    }

    /// Color of a finished trace
    pub fn shade(&self, trace: &Trace) -> Vec3 {
        let background = self.settings.background();
        if !trace.is_hit() {
            return background;
        }
        let Some(normal) = self.normal(trace.position) else {
            return background;
        };

        let color = self.lighting(trace.position, normal) * trace.surface.color;
        if color.is_finite() { color } else { background }
    }

    /// Trace and shade one primary ray
    pub fn radiance(&self, origin: Vec3, direction: Vec3) -> Vec3 {
        let trace = self.march(origin, direction);
        self.shade(&trace)
    }

    /// Averaged color of pixel `(x, y)` over the antialiasing grid
    pub fn sample_pixel(&self, x: u32, y: u32) -> Vec3 {
        let camera = self.scene.camera();
        let width = self.settings.width as f32;
        let height = self.settings.height as f32;
        let aspect = self.settings.aspect();
        let n = self.settings.antialiasing.max(1);
        let step = 1.0 / n as f32;

        let mut sum = Vec3::ZERO;
        for j in 0..n {
            for i in 0..n {
                let u = (x as f32 + (i as f32 + 0.5) * step) / width;
                let v = (y as f32 + (j as f32 + 0.5) * step) / height;
                let direction = camera.ray_direction(u, v, aspect);
                sum += self.radiance(camera.position, direction);
            }
        }
        sum / (n as f32 * n as f32)
    }
}
