//! The device abstraction every platform backend implements, plus the
//! bookkeeping shared between backends.

use tracing::trace;

use crate::click::ClickDetector;
use crate::event::{Event, MouseAction, MouseEvent};
use crate::paint::FramePaint;

/// Which native GL flavour the presentation surface should sit on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverKind {
    OpenGl,
    OpenGlEs,
}

/// Everything a backend needs to bring a window and surface up.
#[derive(Clone, Debug)]
pub struct CreationParams {
    pub window_width: u32,
    pub window_height: u32,
    pub fullscreen: bool,
    pub vsync: bool,
    pub handle_srgb: bool,
    pub alpha_channel: bool,
    pub force_legacy_device: bool,
    pub joystick_support: bool,
    pub driver_kind: DriverKind,
}

impl Default for CreationParams {
    fn default() -> Self {
        Self {
            window_width: 800,
            window_height: 600,
            fullscreen: false,
            vsync: true,
            handle_srgb: false,
            alpha_channel: false,
            force_legacy_device: false,
            joystick_support: false,
            driver_kind: DriverKind::OpenGlEs,
        }
    }
}

/// One display mode of an output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VideoMode {
    pub width: u32,
    pub height: u32,
    /// Bits per pixel.
    pub depth: u32,
}

/// Static description of a connected joystick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JoystickDescriptor {
    pub id: u32,
    pub axes: u8,
    pub buttons: u8,
    pub name: String,
}

/// Receiver for translated events. At most one is registered at a time;
/// events arriving with none registered are dropped.
pub type EventReceiver = Box<dyn FnMut(&Event)>;

/// A platform window with an input queue and a presentation surface.
///
/// All methods are called from the thread that created the device. Event
/// delivery is synchronous: the receiver runs to completion inside
/// [`process_events`](Device::process_events) before the next event is
/// translated.
pub trait Device {
    /// Drains the native event queue without blocking, dispatching each
    /// translated event to the receiver. Returns `false` once the device
    /// is closing and the frame loop should stop.
    fn process_events(&mut self) -> bool;

    /// Asks the device to shut down. Takes effect on the next
    /// [`process_events`](Device::process_events).
    fn request_close(&mut self);

    fn set_event_receiver(&mut self, receiver: EventReceiver);

    fn set_window_caption(&mut self, text: &str);

    /// Switches to exclusive fullscreen on the preferred output (or back).
    /// Failure to switch is not an error; the device stays windowed.
    fn set_fullscreen(&mut self, fullscreen: bool);
    fn is_fullscreen(&self) -> bool;

    fn is_focused(&self) -> bool;
    fn is_minimized(&self) -> bool;

    /// Current drawable size in pixels.
    fn window_size(&self) -> (u32, u32);

    /// Display modes of the preferred output, queried once at startup.
    fn video_modes(&self) -> &[VideoMode];

    /// The output's mode at startup, restored when fullscreen ends.
    fn desktop_mode(&self) -> VideoMode;

    fn clipboard_content(&mut self) -> String;
    fn set_clipboard_content(&mut self, text: &str);

    fn set_cursor_visible(&mut self, visible: bool);
    fn is_cursor_visible(&self) -> bool;
    fn set_cursor_position(&mut self, x: i32, y: i32);
    fn cursor_position(&self) -> (i32, i32);

    fn joysticks(&self) -> Vec<JoystickDescriptor>;

    /// Starts accelerometer delivery at the requested sample interval.
    /// Returns whether samples will actually arrive; backends without the
    /// hardware report `false` and deliver nothing.
    fn activate_accelerometer(&mut self, _interval_us: u32) -> bool {
        false
    }

    fn deactivate_accelerometer(&mut self) {}

    /// Starts gyroscope delivery at the requested sample interval.
    /// Returns whether samples will actually arrive.
    fn activate_gyroscope(&mut self, _interval_us: u32) -> bool {
        false
    }

    fn deactivate_gyroscope(&mut self) {}

    /// Renders the described frame and presents it. Transient surface
    /// trouble skips the frame rather than failing the loop.
    fn present(&mut self, paint: &FramePaint);
}

/// State every backend carries: creation parameters, the registered
/// receiver, the click detector and the output description.
pub struct DeviceCore {
    pub params: CreationParams,
    pub clicks: ClickDetector,
    pub video_modes: Vec<VideoMode>,
    pub desktop_mode: VideoMode,
    receiver: Option<EventReceiver>,
}

impl DeviceCore {
    pub fn new(params: CreationParams) -> Self {
        let desktop_mode = VideoMode {
            width: params.window_width,
            height: params.window_height,
            depth: 24,
        };
        Self {
            params,
            clicks: ClickDetector::new(),
            video_modes: Vec::new(),
            desktop_mode,
            receiver: None,
        }
    }

    pub fn set_event_receiver(&mut self, receiver: EventReceiver) {
        self.receiver = Some(receiver);
    }

    /// Hands one event to the receiver, or drops it if none is registered.
    pub fn send_event(&mut self, event: &Event) {
        match self.receiver.as_mut() {
            Some(receiver) => receiver(event),
            None => trace!(kind = ?event.kind(), "event dropped, no receiver"),
        }
    }

    /// Dispatches a press or release, then the click or double-click it
    /// completes, as a second event at the same coordinates.
    pub fn dispatch_mouse(&mut self, event: MouseEvent, now_us: u64) {
        self.send_event(&Event::Mouse(event));
        if let Some(gesture) = self.clicks.classify(&event, now_us) {
            let mut synthesized = event;
            synthesized.action = gesture;
            self.send_event(&Event::Mouse(synthesized));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{ButtonStates, MouseButton};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn press(x: i32, y: i32) -> MouseEvent {
        MouseEvent {
            action: MouseAction::Pressed(MouseButton::Left),
            x,
            y,
            wheel: 0.0,
            shift: false,
            control: false,
            buttons: ButtonStates {
                left: true,
                ..ButtonStates::default()
            },
        }
    }

    fn release(x: i32, y: i32) -> MouseEvent {
        MouseEvent {
            action: MouseAction::Released(MouseButton::Left),
            x,
            y,
            wheel: 0.0,
            shift: false,
            control: false,
            buttons: ButtonStates::default(),
        }
    }

    #[test]
    fn events_without_receiver_are_dropped() {
        let mut core = DeviceCore::new(CreationParams::default());
        // Must not panic.
        core.dispatch_mouse(press(1, 1), 0);
    }

    #[test]
    fn raw_event_precedes_synthesized_click() {
        let mut core = DeviceCore::new(CreationParams::default());
        let log: Rc<RefCell<Vec<MouseAction>>> = Rc::default();
        let sink = Rc::clone(&log);
        core.set_event_receiver(Box::new(move |event| {
            if let Event::Mouse(m) = event {
                sink.borrow_mut().push(m.action);
            }
        }));

        core.dispatch_mouse(press(10, 10), 0);
        core.dispatch_mouse(release(10, 10), 40_000);

        assert_eq!(
            log.borrow().as_slice(),
            &[
                MouseAction::Pressed(MouseButton::Left),
                MouseAction::Released(MouseButton::Left),
                MouseAction::Click(MouseButton::Left),
            ]
        );
    }

    #[test]
    fn sensor_activation_defaults_to_unsupported() {
        struct Bare;
        impl Device for Bare {
            fn process_events(&mut self) -> bool {
                false
            }
            fn request_close(&mut self) {}
            fn set_event_receiver(&mut self, _receiver: EventReceiver) {}
            fn set_window_caption(&mut self, _text: &str) {}
            fn set_fullscreen(&mut self, _fullscreen: bool) {}
            fn is_fullscreen(&self) -> bool {
                false
            }
            fn is_focused(&self) -> bool {
                true
            }
            fn is_minimized(&self) -> bool {
                false
            }
            fn window_size(&self) -> (u32, u32) {
                (0, 0)
            }
            fn video_modes(&self) -> &[VideoMode] {
                &[]
            }
            fn desktop_mode(&self) -> VideoMode {
                VideoMode {
                    width: 0,
                    height: 0,
                    depth: 24,
                }
            }
            fn clipboard_content(&mut self) -> String {
                String::new()
            }
            fn set_clipboard_content(&mut self, _text: &str) {}
            fn set_cursor_visible(&mut self, _visible: bool) {}
            fn is_cursor_visible(&self) -> bool {
                true
            }
            fn set_cursor_position(&mut self, _x: i32, _y: i32) {}
            fn cursor_position(&self) -> (i32, i32) {
                (0, 0)
            }
            fn joysticks(&self) -> Vec<JoystickDescriptor> {
                Vec::new()
            }
            fn present(&mut self, _paint: &FramePaint) {}
        }

        let mut device = Bare;
        assert!(!device.activate_accelerometer(16_667));
        assert!(!device.activate_gyroscope(16_667));
        device.deactivate_accelerometer();
        device.deactivate_gyroscope();
    }

    #[test]
    fn default_params_match_windowed_defaults() {
        let params = CreationParams::default();
        assert_eq!((params.window_width, params.window_height), (800, 600));
        assert!(params.vsync);
        assert!(!params.fullscreen);
        assert_eq!(params.driver_kind, DriverKind::OpenGlEs);
    }
}
