//! Host-side stand-in so the workspace compiles on every target. The real
//! device lives behind `cfg(target_os = "android")`.

use addonpack_platform::{
    CreationParams, Device, EventReceiver, FramePaint, JoystickDescriptor, PlatformError, Result,
    VideoMode,
};

pub struct AndroidDevice {
    _private: (),
}

impl AndroidDevice {
    pub fn new(_params: CreationParams) -> Result<Self> {
        Err(PlatformError::Unsupported(
            "android device on a non-android target",
        ))
    }
}

impl Device for AndroidDevice {
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
        false
    }

    fn is_minimized(&self) -> bool {
        true
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
            depth: 0,
        }
    }

    fn clipboard_content(&mut self) -> String {
        String::new()
    }

    fn set_clipboard_content(&mut self, _text: &str) {}

    fn set_cursor_visible(&mut self, _visible: bool) {}

    fn is_cursor_visible(&self) -> bool {
        false
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
