/// Swapchain image acquired for one frame, plus the encoder recording into it.
///
/// Present it before acquiring the next one; the surface hands out a single
/// image at a time.
pub struct SwapFrame {
    texture: wgpu::SurfaceTexture,
    pub color: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}

impl SwapFrame {
    pub(crate) fn new(texture: wgpu::SurfaceTexture, encoder: wgpu::CommandEncoder) -> Self {
        let color = texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            texture,
            color,
            encoder,
        }
    }

    /// Submits the recorded pass and flips the image to the screen.
    pub(crate) fn present(self, queue: &wgpu::Queue) {
        let Self {
            texture,
            color,
            encoder,
        } = self;
        queue.submit(std::iter::once(encoder.finish()));
        drop(color);
        texture.present();
    }
}
