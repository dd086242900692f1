//! Compute-kernel sphere tracer

use crate::RenderError;
use glam::Vec3;
use sdtrace_core::frame::Frame;
use sdtrace_core::scene::Scene;
use sdtrace_core::settings::RenderSettings;
use sdtrace_sdf::{FrameUniforms, PackedScene, build_kernel, pack, workgroup_count};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};
use wgpu::util::DeviceExt;

/// Bytes per output pixel (`vec4<f32>`)
const PIXEL_BYTES: u64 = 16;

/// Size of the output buffer for a `width` x `height` frame, checked
/// against the device's storage-binding limit.
fn output_size(width: u32, height: u32, max_binding: u64) -> Result<u64, RenderError> {
    if width == 0 || height == 0 {
        return Err(RenderError::InvalidFrame(format!(
            "{width}x{height} has no pixels"
        )));
    }
    let size = u64::from(width) * u64::from(height) * PIXEL_BYTES;
    if size > max_binding {
        return Err(RenderError::InvalidFrame(format!(
            "{width}x{height} needs {size} bytes, device allows {max_binding}"
        )));
    }
    Ok(size)
}

fn storage_entry(binding: u32, read_only: bool) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only },
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

/// Sphere tracer running the sdtrace kernel on a wgpu device
pub struct GpuTracer {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    pipeline: wgpu::ComputePipeline,
    bind_group_layout: wgpu::BindGroupLayout,
}

impl GpuTracer {
    /// Compile the kernel and build the pipeline
    pub fn new(device: Arc<wgpu::Device>, queue: Arc<wgpu::Queue>) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Sphere Tracing Kernel"),
            source: wgpu::ShaderSource::Wgsl(build_kernel().into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Scene Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                storage_entry(1, true),
                storage_entry(2, true),
                storage_entry(3, false),
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Sphere Tracing Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("Sphere Tracing Pipeline"),
            layout: Some(&pipeline_layout),
            module: &shader,
            entry_point: Some("main"),
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            cache: None,
        });

        Self {
            device,
            queue,
            pipeline,
            bind_group_layout,
        }
    }

    /// Flatten `scene` and render it
    pub fn render_scene(
        &self,
        scene: &Scene,
        settings: &RenderSettings,
    ) -> Result<Frame, RenderError> {
        let packed = pack(scene.root())?;
        let uniforms = FrameUniforms::new(scene, settings)?;
        self.render(&packed, &uniforms)
    }

    /// Render an already flattened scene.
    ///
    /// Uploads everything, dispatches one invocation per pixel, then blocks
    /// until the output has been copied back.
    pub fn render(
        &self,
        packed: &PackedScene,
        uniforms: &FrameUniforms,
    ) -> Result<Frame, RenderError> {
        let [width, height] = uniforms.resolution;
        let max_binding = u64::from(self.device.limits().max_storage_buffer_binding_size);
        let output_bytes = output_size(width, height, max_binding)?;

        // Phase 1: upload
        let start = Instant::now();
        let uniform_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Frame Uniforms"),
                contents: bytemuck::bytes_of(uniforms),
                usage: wgpu::BufferUsages::UNIFORM,
            });
        let body_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Body Records"),
                contents: bytemuck::cast_slice(packed.bodies()),
                usage: wgpu::BufferUsages::STORAGE,
            });
        let node_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Tree Nodes"),
                contents: bytemuck::cast_slice(packed.nodes()),
                usage: wgpu::BufferUsages::STORAGE,
            });
        let output_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Output Pixels"),
            size: output_bytes,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });
        let staging_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Readback Buffer"),
            size: output_bytes,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Bind Group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: body_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: node_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: output_buffer.as_entire_binding(),
                },
            ],
        });
        let upload = start.elapsed();

        // Phase 2: dispatch and read back
        let start = Instant::now();
        let (groups_x, groups_y) = workgroup_count(width, height);
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Sphere Tracing Encoder"),
            });
        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("Sphere Tracing Pass"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            pass.dispatch_workgroups(groups_x, groups_y, 1);
        }
        encoder.copy_buffer_to_buffer(&output_buffer, 0, &staging_buffer, 0, output_bytes);
        self.queue.submit(std::iter::once(encoder.finish()));
        debug!(groups_x, groups_y, "Dispatched sphere tracing kernel");

        let buffer_slice = staging_buffer.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        self.device
            .poll(wgpu::PollType::Wait)
            .map_err(|e| RenderError::BufferMap(e.to_string()))?;
        rx.recv()
            .map_err(|e| RenderError::BufferMap(e.to_string()))?
            .map_err(|e| RenderError::BufferMap(e.to_string()))?;

        let texels: Vec<[f32; 4]> = {
            let data = buffer_slice.get_mapped_range();
            bytemuck::pod_collect_to_vec::<u8, [f32; 4]>(&data[..])
        };
        staging_buffer.unmap();
        let readback = start.elapsed();

        info!(
            upload_ms = upload.as_secs_f64() * 1e3,
            dispatch_ms = readback.as_secs_f64() * 1e3,
            "GPU frame {}x{}",
            width,
            height
        );

        let pixels = texels
            .into_iter()
            .map(|[r, g, b, _]| Vec3::new(r, g, b))
            .collect();
        Frame::from_pixels(width, height, pixels)
            .map_err(|e| RenderError::InvalidFrame(e.to_string()))
    }
}

/// Initialize WGPU for headless rendering (no window)
pub async fn init_headless() -> Result<(Arc<wgpu::Device>, Arc<wgpu::Queue>), RenderError> {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        ..Default::default()
    });

    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: None,
            force_fallback_adapter: false,
        })
        .await?;
    info!(adapter = %adapter.get_info().name, "Using GPU adapter");

    let (device, queue) = adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some("sdtrace Device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            memory_hints: wgpu::MemoryHints::default(),
            trace: wgpu::Trace::Off,
        })
        .await?;

    Ok((Arc::new(device), Arc::new(queue)))
}
