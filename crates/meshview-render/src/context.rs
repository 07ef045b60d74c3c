//! GPU device setup.

use std::sync::Arc;

use winit::window::Window;

use crate::error::{RenderError, RenderResult};

/// wgpu instance, adapter, device and queue.
///
/// Device and queue are shared between the compositor and the viewer thread.
pub struct GpuContext {
    /// The wgpu instance.
    pub instance: wgpu::Instance,
    /// The wgpu adapter.
    pub adapter: wgpu::Adapter,
    /// The wgpu device.
    pub device: Arc<wgpu::Device>,
    /// The wgpu queue.
    pub queue: Arc<wgpu::Queue>,
}

impl GpuContext {
    /// Creates a context able to present to `window`, together with the window surface.
    pub async fn new_windowed(
        window: Arc<Window>,
    ) -> RenderResult<(Self, wgpu::Surface<'static>)> {
        let instance = create_instance();
        let surface = instance.create_surface(window)?;
        let context = Self::from_instance(instance, Some(&surface), "meshview device").await?;
        Ok((context, surface))
    }

    /// Creates a context without any surface, for offscreen rendering.
    pub async fn new_headless() -> RenderResult<Self> {
        Self::from_instance(create_instance(), None, "meshview device (headless)").await
    }

    async fn from_instance(
        instance: wgpu::Instance,
        compatible_surface: Option<&wgpu::Surface<'static>>,
        label: &str,
    ) -> RenderResult<Self> {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface,
                force_fallback_adapter: false,
            })
            .await
            .map_err(|_| RenderError::AdapterCreationFailed)?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some(label),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::default(),
                experimental_features: wgpu::ExperimentalFeatures::default(),
            })
            .await?;

        let info = adapter.get_info();
        log::info!("using adapter {} ({:?})", info.name, info.backend);

        Ok(Self {
            instance,
            adapter,
            device: Arc::new(device),
            queue: Arc::new(queue),
        })
    }
}

fn create_instance() -> wgpu::Instance {
    wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        ..wgpu::InstanceDescriptor::default()
    })
}
