use thiserror::Error;
use wgpu::util::DeviceExt;

use opm_volume::{Volume, VolumeError};

use crate::kernel::{shift_bias, unsheared_shape, UnshearError};

/// Threads per workgroup of the unshear shader. Must match the
/// `@workgroup_size` attribute in `shaders/unshear.wgsl`.
const WORKGROUP_SIZE: u32 = 256;

/// An error type for the accelerator backend.
#[derive(Error, Debug)]
pub enum GpuError {
    /// No adapter passed the non-software filter.
    #[error("No suitable GPU adapter found (only software renderers visible)")]
    NoSuitableAdapter,

    /// The device request failed (driver issue, unsupported limits).
    #[error("GPU device request failed: {0}")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),

    /// Mapping the readback buffer failed.
    #[error("GPU readback failed: {0}")]
    Readback(#[from] wgpu::BufferAsyncError),

    /// The readback completion callback never fired.
    #[error("GPU readback channel closed before completion")]
    ReadbackChannelClosed,

    /// The downloaded data did not form a valid volume.
    #[error("GPU readback produced an invalid volume: {0}")]
    InvalidVolume(#[from] VolumeError),
}

/// Selects a hardware adapter, rejecting software rasterizers.
///
/// Returns the adapter name when one is found. This is the capability probe
/// used by backend selection; it creates no device.
pub(crate) fn probe_adapter() -> Option<String> {
    let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
        backends: wgpu::Backends::PRIMARY,
        ..Default::default()
    });
    instance
        .enumerate_adapters(wgpu::Backends::PRIMARY)
        .into_iter()
        .find(|a| a.get_info().device_type != wgpu::DeviceType::Cpu)
        .map(|a| a.get_info().name)
}

/// The accelerator context: instance, device and queue.
///
/// Expensive to create; hold one for the lifetime of the process and pass
/// it to every upload, kernel and download call.
pub struct GpuContext {
    pub(crate) device: wgpu::Device,
    pub(crate) queue: wgpu::Queue,
    adapter_name: String,
    // Keeps the instance alive until device and queue are dropped.
    _instance: wgpu::Instance,
}

impl GpuContext {
    /// Acquires the first hardware adapter and opens a device on it.
    ///
    /// # Errors
    ///
    /// Returns an error if no non-software adapter exists or the device
    /// request fails.
    pub fn new() -> Result<Self, GpuError> {
        pollster::block_on(Self::init_async())
    }

    async fn init_async() -> Result<GpuContext, GpuError> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let adapter = instance
            .enumerate_adapters(wgpu::Backends::PRIMARY)
            .into_iter()
            .find(|a| a.get_info().device_type != wgpu::DeviceType::Cpu)
            .ok_or(GpuError::NoSuitableAdapter)?;

        let adapter_name = adapter.get_info().name;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("opm-unshear"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::default(),
                },
                None,
            )
            .await?;

        Ok(GpuContext {
            device,
            queue,
            adapter_name,
            _instance: instance,
        })
    }

    /// The name of the adapter backing this context.
    pub fn adapter_name(&self) -> &str {
        &self.adapter_name
    }
}

/// A volume resident in accelerator memory as a storage buffer.
///
/// Created by an explicit [`GpuVolume::upload`]; read back by an explicit
/// [`GpuVolume::download`]. The kernel itself never moves data across the
/// host/device boundary.
pub struct GpuVolume {
    pub(crate) buffer: wgpu::Buffer,
    /// The shape of the volume.
    pub shape: [usize; 3],
}

impl GpuVolume {
    /// Copies a host volume into a device-resident storage buffer.
    pub fn upload(ctx: &GpuContext, src: &Volume<f32>) -> Self {
        let buffer = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("GpuVolume"),
                contents: bytemuck::cast_slice(src.as_slice()),
                usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
            });
        Self {
            buffer,
            shape: src.shape,
        }
    }

    /// Reads the volume back to host memory.
    ///
    /// Blocks until all device work writing this buffer has completed, so a
    /// download immediately after a kernel call observes the kernel's
    /// output.
    pub fn download(&self, ctx: &GpuContext) -> Result<Volume<f32>, GpuError> {
        let size = self.buffer.size();
        let readback = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("GpuVolume::download"),
            size,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("GpuVolume::download"),
            });
        encoder.copy_buffer_to_buffer(&self.buffer, 0, &readback, 0, size);
        ctx.queue.submit(std::iter::once(encoder.finish()));

        let buf_slice = readback.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        buf_slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        ctx.device.poll(wgpu::Maintain::Wait);
        rx.recv().map_err(|_| GpuError::ReadbackChannelClosed)??;

        let mapped = buf_slice.get_mapped_range();
        let data: Vec<f32> = bytemuck::cast_slice(&mapped[..]).to_vec();
        drop(mapped);
        readback.unmap();

        Ok(Volume::from_shape_vec(self.shape, data)?)
    }
}

/// Uniform parameters of the unshear dispatch. The field order and types
/// must match the `Params` struct in `shaders/unshear.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct UnshearParams {
    in_shape: [u32; 3],
    sub_j: u32,
    out_shape: [u32; 3],
    sup_i: u32,
    numel: u32,
    row_elems: u32,
    slope: f32,
    shift_bias: f32,
}

/// Compiled compute pipeline for the unshear kernel.
///
/// Shader compilation is expensive; create the pipeline once per context
/// and reuse it for every volume.
pub struct GpuUnshear {
    pipeline: wgpu::ComputePipeline,
    bind_group_layout: wgpu::BindGroupLayout,
}

impl GpuUnshear {
    /// Compiles `shaders/unshear.wgsl` into a compute pipeline.
    pub fn new(ctx: &GpuContext) -> Self {
        let shader = ctx
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("unshear.wgsl"),
                source: wgpu::ShaderSource::Wgsl(include_str!("shaders/unshear.wgsl").into()),
            });

        let bind_group_layout =
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("GpuUnshear BGL"),
                    entries: &[
                        // Binding 0 - input volume (read-only storage)
                        wgpu::BindGroupLayoutEntry {
                            binding: 0,
                            visibility: wgpu::ShaderStages::COMPUTE,
                            ty: wgpu::BindingType::Buffer {
                                ty: wgpu::BufferBindingType::Storage { read_only: true },
                                has_dynamic_offset: false,
                                min_binding_size: None,
                            },
                            count: None,
                        },
                        // Binding 1 - output volume (writable storage)
                        wgpu::BindGroupLayoutEntry {
                            binding: 1,
                            visibility: wgpu::ShaderStages::COMPUTE,
                            ty: wgpu::BindingType::Buffer {
                                ty: wgpu::BufferBindingType::Storage { read_only: false },
                                has_dynamic_offset: false,
                                min_binding_size: None,
                            },
                            count: None,
                        },
                        // Binding 2 - dispatch parameters
                        wgpu::BindGroupLayoutEntry {
                            binding: 2,
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

        let pipeline_layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("GpuUnshear pipeline layout"),
                bind_group_layouts: &[&bind_group_layout],
                push_constant_ranges: &[],
            });

        let pipeline = ctx
            .device
            .create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                label: Some("unshear"),
                layout: Some(&pipeline_layout),
                module: &shader,
                entry_point: "unshear",
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                cache: None,
            });

        GpuUnshear {
            pipeline,
            bind_group_layout,
        }
    }

    /// Removes the scan shear from a device-resident volume.
    ///
    /// Numerically identical to the host backend: same output shape, same
    /// plane-offset bias, same linear interpolation with zero fill. Input
    /// and output stay in accelerator memory; the call submits the device
    /// work and returns, with queue ordering guaranteeing that any
    /// subsequent read of the output observes the completed kernel.
    ///
    /// # Errors
    ///
    /// Returns an error if `sub_j == sup_i` or either axis is out of range.
    pub fn unshear(
        &self,
        ctx: &GpuContext,
        src: &GpuVolume,
        sub_j: usize,
        sup_i: usize,
        slope: f32,
    ) -> Result<GpuVolume, UnshearError> {
        let out_shape = unsheared_shape(src.shape, sub_j, sup_i, slope)?;
        let numel = out_shape.iter().product::<usize>() as u32;
        let bias = shift_bias(slope, src.shape[sup_i]);

        // Zero-initialized by wgpu; the kernel overwrites every element.
        let out_buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("GpuUnshear::output"),
            size: (numel as u64).max(1) * std::mem::size_of::<f32>() as u64,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });

        // Large volumes exceed the 65535 workgroup limit per dispatch
        // dimension; split the linear index space over a 2D grid.
        let groups = numel.div_ceil(WORKGROUP_SIZE).max(1);
        let max_dim = ctx.device.limits().max_compute_workgroups_per_dimension;
        let groups_x = groups.min(max_dim);
        let groups_y = groups.div_ceil(groups_x);

        let params = UnshearParams {
            in_shape: [
                src.shape[0] as u32,
                src.shape[1] as u32,
                src.shape[2] as u32,
            ],
            sub_j: sub_j as u32,
            out_shape: [
                out_shape[0] as u32,
                out_shape[1] as u32,
                out_shape[2] as u32,
            ],
            sup_i: sup_i as u32,
            numel,
            row_elems: groups_x * WORKGROUP_SIZE,
            slope,
            shift_bias: bias,
        };
        let params_buffer = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("UnshearParams"),
                contents: bytemuck::bytes_of(&params),
                usage: wgpu::BufferUsages::UNIFORM,
            });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("GpuUnshear bind group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: src.buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: out_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: params_buffer.as_entire_binding(),
                },
            ],
        });

        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("GpuUnshear::unshear"),
            });
        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("unshear"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            pass.dispatch_workgroups(groups_x, groups_y, 1);
        }
        ctx.queue.submit(std::iter::once(encoder.finish()));

        Ok(GpuVolume {
            buffer: out_buffer,
            shape: out_shape,
        })
    }
}
