use winit::dpi::PhysicalSize;

/// What the renderer should do after failing to acquire a swapchain image.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceRecovery {
    /// The surface went stale and has to be configured again.
    Reconfigure,
    /// Drop this frame and try again on the next one.
    Skip,
    /// The device cannot continue.
    Abort,
}

impl SurfaceRecovery {
    pub fn for_error(err: &wgpu::SurfaceError) -> Self {
        match err {
            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => Self::Reconfigure,
            wgpu::SurfaceError::OutOfMemory => Self::Abort,
            wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other => Self::Skip,
        }
    }
}

const SRGB_FORMATS: [wgpu::TextureFormat; 2] = [
    wgpu::TextureFormat::Bgra8UnormSrgb,
    wgpu::TextureFormat::Rgba8UnormSrgb,
];

/// Picks the color format for the swapchain from what the surface supports.
pub(crate) fn pick_color_format(
    supported: &[wgpu::TextureFormat],
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    let srgb = SRGB_FORMATS
        .into_iter()
        .find(|f| prefer_srgb && supported.contains(f));
    srgb.or_else(|| supported.first().copied())
}

pub(crate) fn pick_alpha_mode(
    supported: &[wgpu::CompositeAlphaMode],
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    match requested {
        Some(mode) if supported.contains(&mode) => mode,
        _ => supported
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto),
    }
}

/// Depth attachment sized to the surface. Zero extents are bumped to one.
pub(crate) fn create_depth_view(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    size: PhysicalSize<u32>,
) -> wgpu::TextureView {
    device
        .create_texture(&wgpu::TextureDescriptor {
            label: Some("facet depth"),
            size: wgpu::Extent3d {
                width: size.width.max(1),
                height: size.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        })
        .create_view(&wgpu::TextureViewDescriptor::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::{CompositeAlphaMode, TextureFormat};

    #[test]
    fn srgb_format_wins_when_preferred() {
        let supported = [TextureFormat::Bgra8Unorm, TextureFormat::Rgba8UnormSrgb];
        assert_eq!(
            pick_color_format(&supported, true),
            Some(TextureFormat::Rgba8UnormSrgb)
        );
        assert_eq!(
            pick_color_format(&supported, false),
            Some(TextureFormat::Bgra8Unorm)
        );
        assert_eq!(pick_color_format(&[], true), None);
    }

    #[test]
    fn unsupported_alpha_request_falls_back() {
        let supported = [CompositeAlphaMode::Opaque];
        assert_eq!(
            pick_alpha_mode(&supported, Some(CompositeAlphaMode::PreMultiplied)),
            CompositeAlphaMode::Opaque
        );
        assert_eq!(pick_alpha_mode(&[], None), CompositeAlphaMode::Auto);
    }

    #[test]
    fn stale_surfaces_are_reconfigured() {
        assert_eq!(
            SurfaceRecovery::for_error(&wgpu::SurfaceError::Outdated),
            SurfaceRecovery::Reconfigure
        );
        assert_eq!(
            SurfaceRecovery::for_error(&wgpu::SurfaceError::Timeout),
            SurfaceRecovery::Skip
        );
        assert_eq!(
            SurfaceRecovery::for_error(&wgpu::SurfaceError::OutOfMemory),
            SurfaceRecovery::Abort
        );
    }
}
