//! Headless GPU execution of the evaluation pass.
//!
//! [`GpuEvaluator`] runs the generated compute shader from [`wgsl`] against
//! a published [`FieldFrame`] and reads the per-point displacements back to
//! the CPU. It exists for hosts without their own render pipeline and for
//! parity checking the CPU fold against the shader; engines that already
//! draw the surface will usually bind the packed arrays into their own
//! pipelines instead and skip the readback entirely.

pub mod wgsl;

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use wgpu::util::DeviceExt;

use crate::error::GpuError;
use crate::field::FieldFrame;
use crate::packer::SENTINEL;
use crate::surface::SurfacePoint;

/// Uniform parameters for the displacement shader.
///
/// Layout matches the `FieldParams` struct in the generated WGSL.
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct FieldParamsGpu {
    trail_slots: u32,
    presence_slots: u32,
    point_count: u32,
    _pad0: u32,
    influence_radius: f32,
    hold_time: f32,
    fade_time: f32,
    strength: f32,
    presence_radius: f32,
    presence_strength: f32,
    _pad1: [f32; 2],
}

/// Headless compute-shader evaluator for the displacement field.
pub struct GpuEvaluator {
    device: wgpu::Device,
    queue: wgpu::Queue,
    pipeline: wgpu::ComputePipeline,
    bind_group_layout: wgpu::BindGroupLayout,
}

impl GpuEvaluator {
    /// Create an evaluator on the first compatible adapter.
    pub fn new() -> Result<Self, GpuError> {
        pollster::block_on(Self::new_async())
    }

    async fn new_async() -> Result<Self, GpuError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Trample Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Trample Displacement Shader"),
            source: wgpu::ShaderSource::Wgsl(wgsl::displacement_shader().into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Trample Bind Group Layout"),
            entries: &[
                storage_entry(0, true),
                storage_entry(1, true),
                storage_entry(2, true),
                storage_entry(3, true),
                storage_entry(4, false),
                wgpu::BindGroupLayoutEntry {
                    binding: 5,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Trample Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("Trample Displacement Pipeline"),
            layout: Some(&pipeline_layout),
            module: &shader,
            entry_point: Some("main"),
            compilation_options: Default::default(),
            cache: None,
        });

        Ok(Self {
            device,
            queue,
            pipeline,
            bind_group_layout,
        })
    }

    /// Evaluate every point against the frame on the GPU and read the
    /// displacements back.
    ///
    /// Results come back in point order and match
    /// [`FieldFrame::displacement_at`] up to floating-point reassociation.
    pub fn evaluate(
        &self,
        frame: &FieldFrame,
        points: &[SurfacePoint],
    ) -> Result<Vec<Vec2>, GpuError> {
        if points.is_empty() {
            return Ok(Vec::new());
        }

        let trail = frame.trail_slots();
        let trail_positions = self.upload(trail.raw_positions(), wgpu::BufferUsages::STORAGE);
        let trail_ages = self.upload(trail.raw_ages(), wgpu::BufferUsages::STORAGE);

        // The presence binding must exist even when the channel is off; a
        // single sentinel slot that the shader never loops over does.
        let (presence_data, presence_slots, presence_radius, presence_strength) =
            match (frame.presence_slots(), frame.presence_config()) {
                (Some(slots), Some(cfg)) => (
                    slots.raw_positions().to_vec(),
                    slots.len() as u32,
                    cfg.radius,
                    cfg.strength,
                ),
                _ => (vec![SENTINEL; 2], 0, 1.0, 0.0),
            };
        let presence_positions = self.upload(&presence_data, wgpu::BufferUsages::STORAGE);

        let point_positions: Vec<Vec2> = points.iter().map(|p| p.pos).collect();
        let point_buffer = self.upload(
            bytemuck::cast_slice(&point_positions),
            wgpu::BufferUsages::STORAGE,
        );

        let output_size = (points.len() * std::mem::size_of::<Vec2>()) as u64;
        let output_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Trample Output Buffer"),
            size: output_size,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });
        let staging_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Trample Staging Buffer"),
            size: output_size,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let cfg = frame.config();
        let params = FieldParamsGpu {
            trail_slots: trail.len() as u32,
            presence_slots,
            point_count: points.len() as u32,
            _pad0: 0,
            influence_radius: cfg.influence_radius,
            hold_time: cfg.hold_time,
            fade_time: cfg.fade_time,
            strength: cfg.strength,
            presence_radius,
            presence_strength,
            _pad1: [0.0; 2],
        };
        let params_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Trample Params Buffer"),
                contents: bytemuck::bytes_of(&params),
                usage: wgpu::BufferUsages::UNIFORM,
            });

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Trample Bind Group"),
            layout: &self.bind_group_layout,
            entries: &[
                bind_entry(0, &trail_positions),
                bind_entry(1, &trail_ages),
                bind_entry(2, &presence_positions),
                bind_entry(3, &point_buffer),
                bind_entry(4, &output_buffer),
                bind_entry(5, &params_buffer),
            ],
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Trample Encoder"),
            });
        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("Trample Displacement Pass"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            let workgroups = (points.len() as u32).div_ceil(wgsl::WORKGROUP_SIZE);
            pass.dispatch_workgroups(workgroups, 1, 1);
        }
        encoder.copy_buffer_to_buffer(&output_buffer, 0, &staging_buffer, 0, output_size);
        self.queue.submit(Some(encoder.finish()));

        let slice = staging_buffer.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        self.device.poll(wgpu::Maintain::Wait);
        rx.recv()
            .map_err(|_| GpuError::BufferMapping("map_async callback dropped".into()))?
            .map_err(|e| GpuError::BufferMapping(e.to_string()))?;

        let displacements = {
            let data = slice.get_mapped_range();
            let floats: Vec<f32> = bytemuck::pod_collect_to_vec(&data[..]);
            floats
                .chunks_exact(2)
                .map(|xz| Vec2::new(xz[0], xz[1]))
                .collect()
        };
        staging_buffer.unmap();

        Ok(displacements)
    }

    fn upload(&self, data: &[f32], usage: wgpu::BufferUsages) -> wgpu::Buffer {
        self.device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: None,
                contents: bytemuck::cast_slice(data),
                usage,
            })
    }
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

fn bind_entry<'a>(binding: u32, buffer: &'a wgpu::Buffer) -> wgpu::BindGroupEntry<'a> {
    wgpu::BindGroupEntry {
        binding,
        resource: buffer.as_entire_binding(),
    }
}
