//! Add-ons pack installer.
//!
//! A small windowed tool that copies assets bundled with the binary
//! into an already-installed game's data directory. The platform crates
//! provide the window, input and frame pacing; this crate owns the
//! installer state machine and the single screen in front of it.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use addonpack_platform::{Device, FrameControl, MainLoop, MonotonicClock};
use anyhow::Result;

pub mod assets;
pub mod install;
pub mod scene;

#[cfg(target_os = "android")]
mod android;

use assets::AssetSource;
use install::Installer;
use scene::Scene;

/// Wires the installer screen to a device and runs it until the user
/// closes the window.
pub fn run(
    device: &mut dyn Device,
    assets: Box<dyn AssetSource>,
    search_paths: &[PathBuf],
) -> Result<()> {
    let settings = assets
        .load("extract_settings.txt")
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .map(|text| install::parse_settings(&text))
        .unwrap_or_default();
    let destination = install::find_game_data_dir(search_paths);
    let installer = Installer::new(assets, destination, &settings);

    device.set_window_caption(&settings.title);
    let (width, height) = device.window_size();
    let scene = Rc::new(RefCell::new(Scene::new(
        installer,
        width as f32,
        height as f32,
    )));

    let receiver = Rc::clone(&scene);
    device.set_event_receiver(Box::new(move |event| {
        receiver.borrow_mut().on_event(event);
    }));

    let mut main_loop = MainLoop::new(MonotonicClock::default());
    main_loop.run(device, |device, dt| {
        // The scene borrow must end before any device call below: the
        // device may pump its native queue while switching state and
        // dispatch events into the receiver, which borrows the scene.
        let requests = {
            let mut scene = scene.borrow_mut();
            let (width, height) = device.window_size();
            scene.layout(width as f32, height as f32);
            scene.update(dt);
            scene.take_requests()
        };
        if requests.toggle_cursor {
            let visible = device.is_cursor_visible();
            device.set_cursor_visible(!visible);
        }
        if requests.toggle_fullscreen {
            let fullscreen = device.is_fullscreen();
            device.set_fullscreen(!fullscreen);
        }
        if requests.close {
            return FrameControl::Exit;
        }
        FrameControl::Render(scene.borrow_mut().paint())
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use addonpack_platform::{
        ButtonStates, Event, EventReceiver, FramePaint, JoystickDescriptor, KeyEvent, KeyId,
        MouseAction, MouseEvent, VideoMode,
    };

    use crate::assets::MemoryAssets;

    /// A device whose fullscreen switch pumps an event straight into the
    /// receiver, the way the desktop backend's confirmation poll does.
    struct PumpingDevice {
        receiver: Option<EventReceiver>,
        frames: u32,
        fullscreen: bool,
        fullscreen_calls: u32,
    }

    impl PumpingDevice {
        fn new() -> Self {
            Self {
                receiver: None,
                frames: 0,
                fullscreen: false,
                fullscreen_calls: 0,
            }
        }

        fn send(&mut self, event: &Event) {
            if let Some(receiver) = self.receiver.as_mut() {
                receiver(event);
            }
        }
    }

    impl Device for PumpingDevice {
        fn process_events(&mut self) -> bool {
            self.frames += 1;
            if self.frames == 1 {
                self.send(&Event::Key(KeyEvent {
                    id: KeyId::F,
                    text: None,
                    pressed: true,
                    shift: false,
                    control: false,
                }));
            }
            self.frames < 4
        }

        fn request_close(&mut self) {}

        fn set_event_receiver(&mut self, receiver: EventReceiver) {
            self.receiver = Some(receiver);
        }

        fn set_window_caption(&mut self, _text: &str) {}

        fn set_fullscreen(&mut self, fullscreen: bool) {
            self.fullscreen = fullscreen;
            self.fullscreen_calls += 1;
            self.send(&Event::Mouse(MouseEvent {
                action: MouseAction::Moved,
                x: 1,
                y: 1,
                wheel: 0.0,
                shift: false,
                control: false,
                buttons: ButtonStates::default(),
            }));
        }

        fn is_fullscreen(&self) -> bool {
            self.fullscreen
        }

        fn is_focused(&self) -> bool {
            true
        }

        fn is_minimized(&self) -> bool {
            false
        }

        fn window_size(&self) -> (u32, u32) {
            (800, 600)
        }

        fn video_modes(&self) -> &[VideoMode] {
            &[]
        }

        fn desktop_mode(&self) -> VideoMode {
            VideoMode {
                width: 800,
                height: 600,
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

    #[test]
    fn fullscreen_toggle_survives_events_arriving_mid_switch() {
        let mut device = PumpingDevice::new();
        let assets = Box::new(MemoryAssets::new(vec![]));
        run(&mut device, assets, &[]).unwrap();
        assert_eq!(device.fullscreen_calls, 1);
        assert!(device.fullscreen);
    }
}

#[cfg(test)]
pub(crate) mod test_dir {
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicU32, Ordering};

    static COUNTER: AtomicU32 = AtomicU32::new(0);

    /// A throwaway directory under the system temp dir, removed on drop.
    pub struct TestDir {
        path: PathBuf,
    }

    impl TestDir {
        pub fn new(tag: &str) -> Self {
            let path = std::env::temp_dir().join(format!(
                "addonpack_{tag}_{}_{}",
                std::process::id(),
                COUNTER.fetch_add(1, Ordering::Relaxed)
            ));
            std::fs::create_dir_all(&path).unwrap();
            Self { path }
        }

        pub fn path(&self) -> &Path {
            &self.path
        }

        pub fn write(&self, rel: &str, bytes: &[u8]) {
            let target = self.path.join(rel);
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent).unwrap();
            }
            std::fs::write(target, bytes).unwrap();
        }
    }

    impl Drop for TestDir {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.path);
        }
    }
}
