use std::sync::{Arc, Mutex};

use wgpu::SurfaceError;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::error::GraphicsError;

use super::surface;
use super::{GpuInit, SurfaceRecovery, SwapFrame};

/// Device, queue, swapchain and depth buffer of one window.
///
/// The surface keeps an `Arc` of the window alive, so a `Gpu` never outlives
/// the window it draws into.
pub struct Gpu {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth_format: wgpu::TextureFormat,
    depth_view: wgpu::TextureView,
    size: PhysicalSize<u32>,
    lost: Arc<Mutex<Option<String>>>,
}

impl Gpu {
    pub async fn new(window: Arc<Window>, init: GpuInit) -> Result<Self, GraphicsError> {
        let size = window.inner_size();
        if size.width == 0 || size.height == 0 {
            return Err(GraphicsError::Surface("window has zero size".into()));
        }

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .map_err(|e| GraphicsError::Surface(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: init.power_preference,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| GraphicsError::Adapter(e.to_string()))?;
        let info = adapter.get_info();
        log::info!("adapter: {} ({:?})", info.name, info.backend);

        let (device, queue) = open_device(&adapter, &init).await?;
        let lost = watch_device(&device);

        let config = surface_config(&surface.get_capabilities(&adapter), &init, size)?;
        surface.configure(&device, &config);
        let depth_view = surface::create_depth_view(&device, init.depth_format, size);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth_format: init.depth_format,
            depth_view,
            size,
            lost,
        })
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn depth_format(&self) -> wgpu::TextureFormat {
        self.depth_format
    }

    pub fn depth_view(&self) -> &wgpu::TextureView {
        &self.depth_view
    }

    /// Physical pixels; may be zero while the window is minimized.
    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    /// Set once the device-lost callback has fired.
    pub fn lost_reason(&self) -> Option<String> {
        self.lost.lock().ok().and_then(|slot| slot.clone())
    }

    /// Resizes the swapchain and depth buffer. A zero extent is only
    /// remembered; the surface keeps its previous configuration.
    pub fn resize(&mut self, size: PhysicalSize<u32>) {
        self.size = size;
        if size.width == 0 || size.height == 0 {
            return;
        }
        self.config.width = size.width;
        self.config.height = size.height;
        self.surface.configure(&self.device, &self.config);
        self.depth_view = surface::create_depth_view(&self.device, self.depth_format, size);
    }

    pub fn acquire_frame(&self) -> Result<SwapFrame, SurfaceError> {
        let texture = self.surface.get_current_texture()?;
        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("facet frame"),
            });
        Ok(SwapFrame::new(texture, encoder))
    }

    pub fn present(&self, frame: SwapFrame) {
        frame.present(&self.queue);
    }

    /// Decides how to continue after `acquire_frame` failed, reconfiguring
    /// the surface when it went stale.
    pub fn recover(&mut self, err: SurfaceError) -> SurfaceRecovery {
        let recovery = SurfaceRecovery::for_error(&err);
        log::warn!("surface error: {err} ({recovery:?})");
        if recovery == SurfaceRecovery::Reconfigure && self.size.width > 0 && self.size.height > 0 {
            self.surface.configure(&self.device, &self.config);
        }
        recovery
    }
}

async fn open_device(
    adapter: &wgpu::Adapter,
    init: &GpuInit,
) -> Result<(wgpu::Device, wgpu::Queue), GraphicsError> {
    adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some("facet device"),
            required_features: init.required_features,
            required_limits: init.required_limits.clone(),
            experimental_features: wgpu::ExperimentalFeatures::disabled(),
            memory_hints: wgpu::MemoryHints::Performance,
            trace: wgpu::Trace::Off,
        })
        .await
        .map_err(|e| GraphicsError::Device(e.to_string()))
}

/// Routes device loss and uncaptured validation errors into the log and
/// returns the slot the loss reason lands in.
fn watch_device(device: &wgpu::Device) -> Arc<Mutex<Option<String>>> {
    let lost = Arc::new(Mutex::new(None));
    let slot = Arc::clone(&lost);
    device.set_device_lost_callback(move |reason, message| {
        log::error!("device lost ({reason:?}): {message}");
        if let Ok(mut slot) = slot.lock() {
            *slot = Some(format!("{reason:?}: {message}"));
        }
    });
    device.on_uncaptured_error(Arc::new(|err: wgpu::Error| {
        log::error!("uncaptured wgpu error: {err}");
    }));
    lost
}

fn surface_config(
    caps: &wgpu::SurfaceCapabilities,
    init: &GpuInit,
    size: PhysicalSize<u32>,
) -> Result<wgpu::SurfaceConfiguration, GraphicsError> {
    let format = surface::pick_color_format(&caps.formats, init.prefer_srgb)
        .ok_or_else(|| GraphicsError::Surface("surface reports no color formats".into()))?;
    let alpha_mode = surface::pick_alpha_mode(&caps.alpha_modes, init.alpha_mode);
    log::debug!("surface {format:?}, alpha {alpha_mode:?}, depth {:?}", init.depth_format);

    Ok(wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format,
        width: size.width,
        height: size.height,
        present_mode: init.present_mode,
        alpha_mode,
        view_formats: Vec::new(),
        desired_maximum_frame_latency: init.desired_maximum_frame_latency,
    })
}
