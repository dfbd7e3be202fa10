use addonpack_platform::{CreationParams, DriverKind, FramePaint, PlatformError, Result};
use tracing::{debug, warn};

use crate::painter::RectPainter;

/// Surface configuration distilled from the device creation parameters.
#[derive(Clone, Debug)]
pub struct SurfaceOptions {
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
    pub srgb: bool,
    pub alpha: bool,
    pub force_legacy: bool,
    pub driver_kind: DriverKind,
}

impl SurfaceOptions {
    pub fn from_params(params: &CreationParams, width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            vsync: params.vsync,
            srgb: params.handle_srgb,
            alpha: params.alpha_channel,
            force_legacy: params.force_legacy_device,
            driver_kind: params.driver_kind,
        }
    }
}

/// Everything needed to put pixels on one native window.
///
/// The window surface can be swapped with [`reload_window`] while the
/// adapter, device and queue stay alive, which is what an embedded target
/// needs when the OS tears the native window down and hands out a new one.
///
/// [`reload_window`]: SurfaceContext::reload_window
pub struct SurfaceContext {
    instance: wgpu::Instance,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    painter: RectPainter,
}

impl SurfaceContext {
    pub fn new<T>(target: T, options: &SurfaceOptions) -> Result<Self>
    where
        T: Into<wgpu::SurfaceTarget<'static>> + Clone,
    {
        // Both driver kinds map onto wgpu's GL backend; the windowing
        // system decides between desktop GL and GLES underneath.
        let backends = match options.driver_kind {
            DriverKind::OpenGl | DriverKind::OpenGlEs => wgpu::Backends::GL,
        };

        let (instance, surface, adapter) = Self::pick_adapter(backends, target)?;

        let limits = if options.force_legacy {
            wgpu::Limits::downlevel_webgl2_defaults()
        } else {
            wgpu::Limits::downlevel_defaults()
        };

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("surface device"),
                required_features: wgpu::Features::empty(),
                required_limits: limits.using_resolution(adapter.limits()),
                memory_hints: wgpu::MemoryHints::default(),
            },
            None,
        ))
        .map_err(|e| PlatformError::Surface(e.to_string()))?;

        let capabilities = surface.get_capabilities(&adapter);
        let format = pick_format(&capabilities.formats, options.srgb);
        let alpha_mode = pick_alpha_mode(&capabilities.alpha_modes, options.alpha);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: options.width.max(1),
            height: options.height.max(1),
            present_mode: if options.vsync {
                wgpu::PresentMode::AutoVsync
            } else {
                wgpu::PresentMode::AutoNoVsync
            },
            desired_maximum_frame_latency: 2,
            alpha_mode,
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        debug!(?format, ?alpha_mode, backend = ?adapter.get_info().backend, "surface configured");

        let painter = RectPainter::new(&device, format);

        Ok(Self {
            instance,
            surface,
            device,
            queue,
            config,
            painter,
        })
    }

    /// Creates the instance and finds an adapter for the surface. If the
    /// requested backend has no compatible adapter, falls back to whatever
    /// the platform offers natively.
    fn pick_adapter<T>(
        backends: wgpu::Backends,
        target: T,
    ) -> Result<(wgpu::Instance, wgpu::Surface<'static>, wgpu::Adapter)>
    where
        T: Into<wgpu::SurfaceTarget<'static>> + Clone,
    {
        let attempt = |backends: wgpu::Backends, target: T| -> Result<_> {
            let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
                backends,
                ..Default::default()
            });
            let surface = instance
                .create_surface(target)
                .map_err(|e| PlatformError::Surface(e.to_string()))?;
            let adapter =
                pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
                    power_preference: wgpu::PowerPreference::LowPower,
                    force_fallback_adapter: false,
                    compatible_surface: Some(&surface),
                }));
            Ok((instance, surface, adapter))
        };

        match attempt(backends, target.clone())? {
            (instance, surface, Some(adapter)) => Ok((instance, surface, adapter)),
            _ if backends != wgpu::Backends::PRIMARY => {
                warn!("no adapter on the requested backend, retrying with the platform default");
                match attempt(wgpu::Backends::PRIMARY, target)? {
                    (instance, surface, Some(adapter)) => Ok((instance, surface, adapter)),
                    _ => Err(PlatformError::Surface("no compatible adapter".into())),
                }
            }
            _ => Err(PlatformError::Surface("no compatible adapter".into())),
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Matches the swapchain to a new drawable size. Zero-sized requests
    /// (a minimized window) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if (width, height) == (self.config.width, self.config.height) {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Rebinds to a fresh native window, keeping the device and queue.
    pub fn reload_window<T>(&mut self, target: T, width: u32, height: u32) -> Result<()>
    where
        T: Into<wgpu::SurfaceTarget<'static>>,
    {
        self.surface = self
            .instance
            .create_surface(target)
            .map_err(|e| PlatformError::Surface(e.to_string()))?;
        self.config.width = width.max(1);
        self.config.height = height.max(1);
        self.surface.configure(&self.device, &self.config);
        Ok(())
    }

    /// Renders one frame and presents it. A lost or outdated swapchain is
    /// reconfigured and the frame skipped; other transient errors skip the
    /// frame with a log line.
    pub fn present_frame(&mut self, paint: &FramePaint) {
        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                debug!("swapchain lost, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(e) => {
                warn!(error = %e, "skipping frame");
                return;
            }
        };

        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame encoder"),
            });

        self.painter.draw(
            &self.device,
            &mut encoder,
            &view,
            (self.config.width, self.config.height),
            paint,
        );

        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
    }
}

fn pick_format(formats: &[wgpu::TextureFormat], want_srgb: bool) -> wgpu::TextureFormat {
    formats
        .iter()
        .copied()
        .find(|f| f.is_srgb() == want_srgb)
        .or_else(|| formats.first().copied())
        .unwrap_or(wgpu::TextureFormat::Rgba8Unorm)
}

fn pick_alpha_mode(
    modes: &[wgpu::CompositeAlphaMode],
    want_alpha: bool,
) -> wgpu::CompositeAlphaMode {
    if want_alpha {
        for candidate in [
            wgpu::CompositeAlphaMode::PostMultiplied,
            wgpu::CompositeAlphaMode::PreMultiplied,
        ] {
            if modes.contains(&candidate) {
                return candidate;
            }
        }
    }
    modes
        .first()
        .copied()
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn srgb_preference_is_honored() {
        let formats = [
            wgpu::TextureFormat::Bgra8Unorm,
            wgpu::TextureFormat::Bgra8UnormSrgb,
        ];
        assert_eq!(pick_format(&formats, true), wgpu::TextureFormat::Bgra8UnormSrgb);
        assert_eq!(pick_format(&formats, false), wgpu::TextureFormat::Bgra8Unorm);
    }

    #[test]
    fn format_falls_back_to_first_supported() {
        let formats = [wgpu::TextureFormat::Bgra8Unorm];
        assert_eq!(pick_format(&formats, true), wgpu::TextureFormat::Bgra8Unorm);
    }

    #[test]
    fn alpha_mode_prefers_blending_when_requested() {
        let modes = [
            wgpu::CompositeAlphaMode::Opaque,
            wgpu::CompositeAlphaMode::PostMultiplied,
        ];
        assert_eq!(
            pick_alpha_mode(&modes, true),
            wgpu::CompositeAlphaMode::PostMultiplied
        );
        assert_eq!(pick_alpha_mode(&modes, false), wgpu::CompositeAlphaMode::Opaque);
    }
}
