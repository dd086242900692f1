//! Per-frame uniform block

use crate::error::PackError;
use crate::layout::MAX_LIGHTS;
use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use sdtrace_core::scene::{Light, Scene};
use sdtrace_core::settings::RenderSettings;

/// Light data sent to the GPU
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct LightUniform {
    pub position: [f32; 4],
    pub color: [f32; 4],
}

impl From<&Light> for LightUniform {
    fn from(light: &Light) -> Self {
        Self {
            position: light.position.extend(1.0).to_array(),
            color: light.color.extend(1.0).to_array(),
        }
    }
}

/// Uniform buffer data sent to the GPU.
///
/// Field order mirrors `FrameUniforms` in the kernel; every vector is a
/// full vec4 so the Rust and WGSL layouts agree without hidden padding.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct FrameUniforms {
    pub resolution: [u32; 2],
    pub max_iterations: u32,
    pub antialiasing: u32,
    pub ambient: f32,
    pub hit_precision: f32,
    pub shadow_offset: f32,
    pub normal_step: f32,
    pub light_count: u32,
    pub aspect: f32,
    pub half_height: f32,
    pub _pad0: u32,
    pub camera_position: [f32; 4],
    pub camera_forward: [f32; 4],
    pub camera_right: [f32; 4],
    pub camera_up: [f32; 4],
    pub bounds_min: [f32; 4],
    pub bounds_max: [f32; 4],
    pub background: [f32; 4],
    pub lights: [LightUniform; MAX_LIGHTS],
}

fn vec4(v: Vec3) -> [f32; 4] {
    v.extend(0.0).to_array()
}

impl FrameUniforms {
    pub fn new(scene: &Scene, settings: &RenderSettings) -> Result<Self, PackError> {
        let count = scene.lights().len();
        if count > MAX_LIGHTS {
            return Err(PackError::TooManyLights {
                count,
                max: MAX_LIGHTS,
            });
        }

        let mut lights = [LightUniform::default(); MAX_LIGHTS];
        for (slot, light) in lights.iter_mut().zip(scene.lights()) {
            *slot = light.into();
        }

        let camera = scene.camera();
        let bounds = scene.bounds();
        Ok(Self {
            resolution: [settings.width, settings.height],
            max_iterations: settings.max_iterations,
            antialiasing: settings.antialiasing.max(1),
            ambient: settings.ambient,
            hit_precision: settings.precision,
            shadow_offset: settings.offset,
            normal_step: settings.normal_step,
            light_count: count as u32,
            aspect: settings.aspect(),
            half_height: camera.half_height(),
            _pad0: 0,
            camera_position: vec4(camera.position),
            camera_forward: vec4(camera.forward()),
            camera_right: vec4(camera.right()),
            camera_up: vec4(camera.actual_up()),
            bounds_min: vec4(bounds.min),
            bounds_max: vec4(bounds.max),
            background: settings.background().extend(1.0).to_array(),
            lights,
        })
    }
}
