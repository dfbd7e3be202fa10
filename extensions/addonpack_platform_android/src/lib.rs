//! Android backend for the device abstraction.
//!
//! The real device pumps the activity's main event queue, folds lifecycle
//! callbacks into a [`addonpack_platform::LifecycleGate`] and refuses to
//! run frames until the activity is started, focused and resumed with a
//! live native window. On other targets a stub that fails at construction
//! keeps the workspace compiling.

pub mod input;

#[cfg(target_os = "android")]
mod device;
#[cfg(target_os = "android")]
mod sensors;
#[cfg(target_os = "android")]
pub use device::AndroidDevice;

#[cfg(not(target_os = "android"))]
mod stub;
#[cfg(not(target_os = "android"))]
pub use stub::AndroidDevice;
