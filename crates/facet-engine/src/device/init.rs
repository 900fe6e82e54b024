/// Options used when a window's GPU context is created.
#[derive(Debug, Clone)]
pub struct GpuInit {
    pub power_preference: wgpu::PowerPreference,

    /// Pick `Bgra8UnormSrgb`/`Rgba8UnormSrgb` when the surface offers one.
    pub prefer_srgb: bool,

    /// Fifo is the only mode every backend must support.
    pub present_mode: wgpu::PresentMode,

    /// Requested composite alpha; ignored when the surface does not list it.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    pub required_features: wgpu::Features,
    pub required_limits: wgpu::Limits,
    pub desired_maximum_frame_latency: u32,

    /// Depth attachment shared by every draw of the frame.
    pub depth_format: wgpu::TextureFormat,
}

impl GpuInit {
    /// Uncapped frame rate where the backend allows it.
    pub fn without_vsync(mut self) -> Self {
        self.present_mode = wgpu::PresentMode::AutoNoVsync;
        self
    }
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            power_preference: wgpu::PowerPreference::HighPerformance,
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
            depth_format: wgpu::TextureFormat::Depth32Float,
        }
    }
}
