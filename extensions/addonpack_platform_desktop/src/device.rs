//! Desktop device: one winit window pumped without blocking.

use std::sync::Arc;
use std::time::Duration;

use addonpack_platform::{
    ButtonStates, Clock, CreationParams, Device, DeviceCore, Event, EventReceiver, FramePaint,
    JoystickDescriptor, KeyEvent, KeyRepeatFilter, MonotonicClock, MouseAction, MouseEvent,
    PendingKey, PlatformError, Result, VideoMode,
};
use addonpack_surface::{SurfaceContext, SurfaceOptions};
use tracing::{debug, info, warn};
use winit::application::ApplicationHandler;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::ModifiersState;
use winit::monitor::MonitorHandle;
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Fullscreen, Window, WindowId};

use crate::clipboard::{Clipboard, SelectionReply, SelectionTarget};
use crate::input;
#[cfg(target_os = "linux")]
use crate::joystick::JoystickManager;
use crate::output::{best_mode, pick_output, ModeCandidate, OutputInfo};

/// How long to wait for the window system to confirm an asynchronous
/// state change before giving up, in 1ms polls.
const CONFIRM_POLLS: u32 = 500;

pub struct DesktopDevice {
    event_loop: EventLoop<()>,
    state: WindowState,
}

/// Everything the pump callbacks touch. Split from the event loop so the
/// loop can borrow it mutably while being pumped.
struct WindowState {
    core: DeviceCore,
    clock: MonotonicClock,
    window: Option<Arc<Window>>,
    surface: Option<SurfaceContext>,
    monitor: Option<MonitorHandle>,
    repeat: KeyRepeatFilter,
    modifiers: ModifiersState,
    buttons: ButtonStates,
    cursor: (i32, i32),
    cursor_visible: bool,
    focused: bool,
    minimized: bool,
    occluded: bool,
    running: bool,
    init_error: Option<PlatformError>,
    clipboard: Clipboard,
    #[cfg(target_os = "linux")]
    joysticks: Option<JoystickManager>,
}

impl DesktopDevice {
    /// Creates the event loop and drives it until the window and surface
    /// exist. Fails if the window system refuses or never delivers them.
    pub fn new(params: CreationParams) -> Result<Self> {
        let event_loop =
            EventLoop::new().map_err(|e| PlatformError::EventLoop(e.to_string()))?;

        let mut device = Self {
            event_loop,
            state: WindowState::new(params),
        };

        for _ in 0..CONFIRM_POLLS {
            device.pump();
            if let Some(error) = device.state.init_error.take() {
                return Err(error);
            }
            if device.state.window.is_some() {
                break;
            }
            std::thread::sleep(Duration::from_millis(1));
        }
        if device.state.window.is_none() {
            return Err(PlatformError::WindowCreation(
                "window never became available".into(),
            ));
        }

        #[cfg(target_os = "linux")]
        if device.state.core.params.joystick_support {
            device.state.joysticks = Some(JoystickManager::activate());
        }

        if device.state.core.params.fullscreen {
            device.set_fullscreen(true);
        }

        Ok(device)
    }

    fn pump(&mut self) -> PumpStatus {
        self.event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.state)
    }

    /// Answers one selection request against the in-process clipboard.
    pub fn respond_selection(&self, target: SelectionTarget) -> SelectionReply {
        self.state.clipboard.respond(target)
    }
}

impl Device for DesktopDevice {
    fn process_events(&mut self) -> bool {
        if let PumpStatus::Exit(code) = self.pump() {
            debug!(code, "event loop exited");
            self.state.running = false;
        }
        // The native queue is dry for this cycle; a held key release is
        // genuine and must go out now.
        if let Some(event) = self.state.repeat.flush() {
            self.state.core.send_event(&Event::Key(event));
        }
        #[cfg(target_os = "linux")]
        self.state.poll_joysticks();
        self.state.running
    }

    fn request_close(&mut self) {
        self.state.running = false;
    }

    fn set_event_receiver(&mut self, receiver: EventReceiver) {
        self.state.core.set_event_receiver(receiver);
    }

    fn set_window_caption(&mut self, text: &str) {
        if let Some(window) = &self.state.window {
            window.set_title(text);
        }
    }

    fn set_fullscreen(&mut self, fullscreen: bool) {
        let Some(window) = self.state.window.clone() else {
            return;
        };
        if window.fullscreen().is_some() == fullscreen {
            return;
        }

        if fullscreen {
            let want = (
                self.state.core.params.window_width,
                self.state.core.params.window_height,
            );
            let exclusive = self.state.monitor.as_ref().and_then(|monitor| {
                let modes: Vec<_> = monitor.video_modes().collect();
                let candidates: Vec<ModeCandidate> = modes
                    .iter()
                    .map(|m| ModeCandidate {
                        width: m.size().width,
                        height: m.size().height,
                        refresh_mhz: m.refresh_rate_millihertz(),
                    })
                    .collect();
                best_mode(&candidates, want).map(|index| modes[index].clone())
            });
            match exclusive {
                Some(mode) => {
                    info!(
                        width = mode.size().width,
                        height = mode.size().height,
                        refresh_mhz = mode.refresh_rate_millihertz(),
                        "entering exclusive fullscreen"
                    );
                    window.set_fullscreen(Some(Fullscreen::Exclusive(mode)));
                }
                None => {
                    debug!("no matching display mode, falling back to borderless");
                    window.set_fullscreen(Some(Fullscreen::Borderless(
                        self.state.monitor.clone(),
                    )));
                }
            }
        } else {
            window.set_fullscreen(None);
        }

        // The switch is asynchronous. Poll for confirmation, then give up
        // quietly and stay in whatever state the window system left us.
        for _ in 0..CONFIRM_POLLS {
            self.pump();
            if window.fullscreen().is_some() == fullscreen {
                return;
            }
            std::thread::sleep(Duration::from_millis(1));
        }
        warn!(fullscreen, "fullscreen switch was not confirmed");
    }

    fn is_fullscreen(&self) -> bool {
        self.state
            .window
            .as_ref()
            .is_some_and(|w| w.fullscreen().is_some())
    }

    fn is_focused(&self) -> bool {
        self.state.focused
    }

    fn is_minimized(&self) -> bool {
        self.state.minimized || self.state.occluded
    }

    fn window_size(&self) -> (u32, u32) {
        match &self.state.window {
            Some(window) => {
                let size = window.inner_size();
                (size.width, size.height)
            }
            None => (0, 0),
        }
    }

    fn video_modes(&self) -> &[VideoMode] {
        &self.state.core.video_modes
    }

    fn desktop_mode(&self) -> VideoMode {
        self.state.core.desktop_mode
    }

    fn clipboard_content(&mut self) -> String {
        self.state.clipboard.content().to_owned()
    }

    fn set_clipboard_content(&mut self, text: &str) {
        self.state.clipboard.set_content(text);
    }

    fn set_cursor_visible(&mut self, visible: bool) {
        if let Some(window) = &self.state.window {
            window.set_cursor_visible(visible);
        }
        self.state.cursor_visible = visible;
    }

    fn is_cursor_visible(&self) -> bool {
        self.state.cursor_visible
    }

    fn set_cursor_position(&mut self, x: i32, y: i32) {
        if let Some(window) = &self.state.window {
            if window.set_cursor_position(PhysicalPosition::new(x, y)).is_ok() {
                self.state.cursor = (x, y);
            }
        }
    }

    fn cursor_position(&self) -> (i32, i32) {
        self.state.cursor
    }

    fn joysticks(&self) -> Vec<JoystickDescriptor> {
        #[cfg(target_os = "linux")]
        {
            return self
                .state
                .joysticks
                .as_ref()
                .map(|m| m.descriptors())
                .unwrap_or_default();
        }
        #[cfg(not(target_os = "linux"))]
        Vec::new()
    }

    fn present(&mut self, paint: &FramePaint) {
        if self.is_minimized() {
            return;
        }
        let size = self.window_size();
        if let Some(surface) = self.state.surface.as_mut() {
            surface.resize(size.0, size.1);
            surface.present_frame(paint);
        }
    }
}

impl WindowState {
    fn new(params: CreationParams) -> Self {
        Self {
            core: DeviceCore::new(params),
            clock: MonotonicClock::new(),
            window: None,
            surface: None,
            monitor: None,
            repeat: KeyRepeatFilter::new(),
            modifiers: ModifiersState::default(),
            buttons: ButtonStates::default(),
            cursor: (0, 0),
            cursor_visible: true,
            focused: false,
            minimized: false,
            occluded: false,
            running: true,
            init_error: None,
            clipboard: Clipboard::default(),
            #[cfg(target_os = "linux")]
            joysticks: None,
        }
    }

    /// Queries the outputs, picks one and records its modes.
    fn discover_outputs(&mut self, event_loop: &ActiveEventLoop) {
        let monitors: Vec<MonitorHandle> = event_loop.available_monitors().collect();
        let primary = event_loop.primary_monitor();
        let infos: Vec<OutputInfo> = monitors
            .iter()
            .map(|m| OutputInfo {
                position: {
                    let p = m.position();
                    (p.x, p.y)
                },
                is_primary: primary.as_ref() == Some(m),
            })
            .collect();

        let Some(index) = pick_output(&infos) else {
            debug!("no outputs reported");
            return;
        };
        let monitor = monitors[index].clone();

        self.core.video_modes = monitor
            .video_modes()
            .map(|m| VideoMode {
                width: m.size().width,
                height: m.size().height,
                depth: m.bit_depth() as u32,
            })
            .collect();
        let depth = self.core.video_modes.first().map(|m| m.depth).unwrap_or(24);
        self.core.desktop_mode = VideoMode {
            width: monitor.size().width,
            height: monitor.size().height,
            depth,
        };
        debug!(
            modes = self.core.video_modes.len(),
            name = monitor.name().as_deref().unwrap_or("unnamed"),
            "selected output"
        );
        self.monitor = Some(monitor);
    }

    fn now_us(&self) -> u64 {
        self.clock.now_us()
    }

    fn mouse_event(&self, action: MouseAction, wheel: f32) -> MouseEvent {
        MouseEvent {
            action,
            x: self.cursor.0,
            y: self.cursor.1,
            wheel,
            shift: self.modifiers.shift_key(),
            control: self.modifiers.control_key(),
            buttons: self.buttons,
        }
    }

    #[cfg(target_os = "linux")]
    fn poll_joysticks(&mut self) {
        let Some(manager) = self.joysticks.as_mut() else {
            return;
        };
        let core = &mut self.core;
        let activity = manager.poll(|snapshot| core.send_event(&Event::Joystick(snapshot)));
        if activity {
            tracing::trace!("joystick input this cycle");
        }
    }
}

impl ApplicationHandler for WindowState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        self.discover_outputs(event_loop);

        let params = &self.core.params;
        let attributes = Window::default_attributes()
            .with_title("addonpack")
            .with_inner_size(PhysicalSize::new(params.window_width, params.window_height))
            .with_transparent(params.alpha_channel);

        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.init_error = Some(PlatformError::WindowCreation(e.to_string()));
                return;
            }
        };

        let size = window.inner_size();
        let options = SurfaceOptions::from_params(&self.core.params, size.width, size.height);
        match SurfaceContext::new(Arc::clone(&window), &options) {
            Ok(surface) => self.surface = Some(surface),
            Err(e) => {
                self.init_error = Some(e);
                return;
            }
        }

        info!(width = size.width, height = size.height, "window created");
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                debug!("close requested");
                self.running = false;
            }
            WindowEvent::Resized(size) => {
                self.minimized = size.width == 0 || size.height == 0;
                if let Some(surface) = self.surface.as_mut() {
                    surface.resize(size.width, size.height);
                }
            }
            WindowEvent::Focused(focused) => self.focused = focused,
            WindowEvent::Occluded(occluded) => self.occluded = occluded,
            WindowEvent::ModifiersChanged(modifiers) => self.modifiers = modifiers.state(),
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = (position.x as i32, position.y as i32);
                let event = self.mouse_event(MouseAction::Moved, 0.0);
                self.core.send_event(&Event::Mouse(event));
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let Some(button) = input::mouse_button(button) else {
                    return;
                };
                let pressed = state == ElementState::Pressed;
                match button {
                    addonpack_platform::MouseButton::Left => self.buttons.left = pressed,
                    addonpack_platform::MouseButton::Middle => self.buttons.middle = pressed,
                    addonpack_platform::MouseButton::Right => self.buttons.right = pressed,
                }
                let action = if pressed {
                    MouseAction::Pressed(button)
                } else {
                    MouseAction::Released(button)
                };
                let event = self.mouse_event(action, 0.0);
                let now = self.now_us();
                self.core.dispatch_mouse(event, now);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let amount = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(position) => (position.y / 120.0) as f32,
                };
                if amount != 0.0 {
                    let event = self.mouse_event(MouseAction::Wheel, amount);
                    self.core.send_event(&Event::Mouse(event));
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                let pressed = event.state == ElementState::Pressed;
                // winit already collapses auto-repeat into flagged presses.
                if pressed && event.repeat {
                    return;
                }
                let id = input::key_id(&event.logical_key);
                if id == addonpack_platform::KeyId::Unknown {
                    debug!(logical = ?event.logical_key, "unmapped key");
                }
                let key = KeyEvent {
                    id,
                    text: if pressed {
                        event.text.as_ref().map(|t| t.to_string())
                    } else {
                        None
                    },
                    pressed,
                    shift: self.modifiers.shift_key(),
                    control: self.modifiers.control_key(),
                };
                let pending = PendingKey {
                    code: input::physical_code(event.physical_key),
                    time_us: self.now_us(),
                    event: key,
                };
                for ready in self.repeat.push(pending) {
                    self.core.send_event(&Event::Key(ready));
                }
            }
            _ => {}
        }
    }
}
