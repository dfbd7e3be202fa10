//! Platform-independent device layer.
//!
//! A [`Device`](device::Device) owns one native window, drains its input
//! queue without blocking and delivers translated [`Event`](event::Event)s
//! synchronously to a single receiver. The concrete backends live in their
//! own crates; this one holds the event model and the bookkeeping they
//! share: click synthesis, auto-repeat collapsing, lifecycle gating and
//! frame pacing.

pub mod click;
pub mod clock;
pub mod device;
pub mod error;
pub mod event;
pub mod lifecycle;
pub mod main_loop;
pub mod paint;
pub mod repeat;

pub use click::ClickDetector;
pub use clock::{Clock, MonotonicClock};
pub use device::{
    CreationParams, Device, DeviceCore, DriverKind, EventReceiver, JoystickDescriptor, VideoMode,
};
pub use error::{PlatformError, Result};
pub use event::{
    AppCommand, ButtonStates, Event, EventKind, JoystickSnapshot, KeyEvent, KeyId, MotionVector,
    MouseAction, MouseButton, MouseEvent, SystemEvent, TouchEvent, TouchPhase, JOYSTICK_CHANNELS,
};
pub use lifecycle::LifecycleGate;
pub use main_loop::{FrameControl, FramePacer, MainLoop, MAX_FRAMES_PER_SECOND};
pub use paint::{Color, FramePaint, PaintRect};
pub use repeat::{KeyRepeatFilter, PendingKey};
