//! Desktop backend for the device abstraction, built on winit.
//!
//! The event loop is pumped with a zero timeout from
//! [`Device::process_events`](addonpack_platform::Device::process_events),
//! so the caller keeps ownership of the frame loop and the queue drain
//! never blocks.

mod clipboard;
mod device;
mod input;
#[cfg(target_os = "linux")]
mod joystick;
mod output;

pub use clipboard::{Clipboard, SelectionReply, SelectionTarget};
pub use device::DesktopDevice;
