//! Scene: the body tree, its lights, camera and clipping volume
//!
//! A scene is built once and then only read. Rendering borrows it
//! immutably, so any number of workers may evaluate it at the same time.

use crate::camera::Camera;
use crate::sdf::{Aabb, Body, List, Mode, Sdf, Surface};
use glam::Vec3;

/// Default clipping volume: a cube of edge 100 around the origin
pub const DEFAULT_BOUNDS_HALF_SIZE: f32 = 50.0;

/// Point light
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub position: Vec3,
    pub color: Vec3,
}

impl Light {
    pub fn new(position: Vec3, color: Vec3) -> Self {
        Self { position, color }
    }

    /// White light at `position`
    pub fn white(position: Vec3) -> Self {
        Self::new(position, Vec3::ONE)
    }
}

/// A complete renderable scene
#[derive(Debug, Clone)]
pub struct Scene {
    root: List,
    lights: Vec<Light>,
    bounds: Aabb,
    camera: Camera,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(Aabb::cube(DEFAULT_BOUNDS_HALF_SIZE))
    }
}

impl Scene {
    /// Empty scene (union root, no lights, default camera)
    pub fn new(bounds: Aabb) -> Self {
        Self {
            root: List::new(Mode::Union),
            lights: Vec::new(),
            bounds,
            camera: Camera::default(),
        }
    }

    /// Append a body to the root list
    pub fn append(&mut self, body: impl Into<Body>) {
        self.root.append(body);
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    pub fn set_bounds(&mut self, bounds: Aabb) {
        self.bounds = bounds;
    }

    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = camera;
    }

    pub fn root(&self) -> &List {
        &self.root
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Whether `p` lies in the clipping volume
    pub fn contains(&self, p: Vec3) -> bool {
        self.bounds.contains(p)
    }

    /// Combined SDF of the whole tree
    pub fn sdf(&self, p: Vec3) -> Surface {
        self.root.evaluate(p)
    }

    /// Central-difference gradient of the scene SDF with step `h`
    pub fn gradient(&self, p: Vec3, h: f32) -> Vec3 {
        let dx = Vec3::new(h, 0.0, 0.0);
        let dy = Vec3::new(0.0, h, 0.0);
        let dz = Vec3::new(0.0, 0.0, h);

        let dfdx = self.root.distance(p + dx) - self.root.distance(p - dx);
        let dfdy = self.root.distance(p + dy) - self.root.distance(p - dy);
        let dfdz = self.root.distance(p + dz) - self.root.distance(p - dz);

        Vec3::new(dfdx, dfdy, dfdz) / (2.0 * h)
    }
}

impl Sdf for Scene {
    fn surface(&self, p: Vec3) -> Surface {
        self.sdf(p)
    }
}
