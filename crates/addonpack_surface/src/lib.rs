//! GPU presentation for the platform backends.
//!
//! [`SurfaceContext`] owns the wgpu instance, adapter, device, queue and
//! swapchain configuration for one native window, and can rebind to a new
//! window while keeping the device and queue alive. Frames are described by
//! [`addonpack_platform::FramePaint`] and rendered by a small solid-color
//! rectangle pipeline.

mod painter;
mod surface;

pub use surface::{SurfaceContext, SurfaceOptions};
