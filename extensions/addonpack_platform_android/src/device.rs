//! Android device: activity lifecycle, input queue and native window.

use std::time::Duration;

use addonpack_platform::{
    AppCommand, Clock, CreationParams, Device, DeviceCore, Event, EventReceiver, FramePaint,
    JoystickDescriptor, KeyEvent, LifecycleGate, MonotonicClock, MouseAction, PlatformError,
    Result, SystemEvent, TouchPhase, VideoMode,
};
use addonpack_surface::{SurfaceContext, SurfaceOptions};
use android_activity::input::{InputEvent, InputStatus, KeyAction, MotionAction};
use android_activity::{AndroidApp, MainEvent, PollEvent};
use ndk::native_window::NativeWindow;
use tracing::{debug, info, warn};

use crate::input::{self, BackKeyAction, PointerSample, TouchSynthesizer};
use crate::sensors::{SensorKind, Sensors};

pub struct AndroidDevice {
    app: AndroidApp,
    core: DeviceCore,
    gate: LifecycleGate,
    clock: MonotonicClock,
    touch: TouchSynthesizer,
    window: Option<NativeWindow>,
    surface: Option<SurfaceContext>,
    sensors: Option<Sensors>,
    running: bool,
}

impl AndroidDevice {
    /// Builds the device and blocks, pumping lifecycle events, until the
    /// activity is started, focused, resumed and has a native window.
    pub fn new(app: AndroidApp, params: CreationParams) -> Result<Self> {
        let mut device = Self {
            app,
            core: DeviceCore::new(params),
            gate: LifecycleGate::new(),
            clock: MonotonicClock::new(),
            touch: TouchSynthesizer::default(),
            window: None,
            surface: None,
            sensors: None,
            running: true,
        };
        // The process can outlive a previous entry into the app, so the
        // gate starts over regardless of prior state.
        device.gate.reset();

        while !(device.gate.runnable() && device.window.is_some()) {
            device.pump(None);
            if !device.running {
                return Err(PlatformError::WindowCreation(
                    "activity destroyed before becoming runnable".into(),
                ));
            }
        }

        device.sensors = Sensors::new();
        info!(
            sensors = device.sensors.is_some(),
            size = ?device.drawable_size(),
            "device ready"
        );
        Ok(device)
    }

    fn drawable_size(&self) -> (u32, u32) {
        match &self.window {
            Some(window) => (window.width() as u32, window.height() as u32),
            None => (0, 0),
        }
    }

    /// One pass over the activity's main event queue. `None` blocks until
    /// something arrives.
    fn pump(&mut self, timeout: Option<Duration>) {
        let app = self.app.clone();
        app.poll_events(timeout, |event| {
            if let PollEvent::Main(main) = event {
                self.on_main_event(main);
            }
        });
    }

    fn on_main_event(&mut self, event: MainEvent) {
        let command = match event {
            MainEvent::Start => AppCommand::Start,
            MainEvent::Resume { .. } => AppCommand::Resume,
            MainEvent::Pause => AppCommand::Pause,
            MainEvent::Stop => AppCommand::Stop,
            MainEvent::InitWindow { .. } => AppCommand::InitWindow,
            MainEvent::TerminateWindow { .. } => AppCommand::TermWindow,
            MainEvent::GainedFocus => AppCommand::GainedFocus,
            MainEvent::LostFocus => AppCommand::LostFocus,
            MainEvent::SaveState { .. } => AppCommand::SaveState,
            MainEvent::ConfigChanged { .. } => AppCommand::ConfigChanged,
            MainEvent::LowMemory => AppCommand::LowMemory,
            MainEvent::Destroy => AppCommand::Destroy,
            _ => return,
        };
        debug!(?command, "lifecycle");
        self.gate.apply(command);

        match command {
            AppCommand::InitWindow => {
                self.window = self.app.native_window();
                if let Err(e) = self.bind_window() {
                    warn!(error = %e, "could not bind the native window");
                }
            }
            AppCommand::TermWindow => {
                self.window = None;
            }
            AppCommand::Destroy => {
                self.running = false;
            }
            _ => {}
        }

        self.core.send_event(&Event::System(SystemEvent { command }));
    }

    /// Points the surface at the current native window, creating it on
    /// first use and rebinding after the OS recycled the window.
    fn bind_window(&mut self) -> Result<()> {
        let Some(window) = self.window.clone() else {
            return Ok(());
        };
        let (width, height) = self.drawable_size();
        match self.surface.as_mut() {
            None => {
                let options = SurfaceOptions::from_params(&self.core.params, width, height);
                self.surface = Some(SurfaceContext::new(window, &options)?);
                self.core.video_modes = vec![VideoMode {
                    width,
                    height,
                    depth: 32,
                }];
                self.core.desktop_mode = VideoMode {
                    width,
                    height,
                    depth: 32,
                };
            }
            Some(surface) => surface.reload_window(window, width, height)?,
        }
        Ok(())
    }

    fn drain_input(&mut self) {
        let app = self.app.clone();
        match app.input_events_iter() {
            Ok(mut iter) => loop {
                let more = iter.next(|event| self.on_input_event(event));
                if !more {
                    break;
                }
            },
            Err(e) => debug!(error = %e, "input queue unavailable"),
        }
    }

    fn on_input_event(&mut self, event: &InputEvent) -> InputStatus {
        match event {
            InputEvent::KeyEvent(key) => {
                let code = i32::from(key.key_code()) as u32;
                let pressed = key.action() == KeyAction::Down;
                let meta = key.meta_state();
                let shift = meta.shift_on();
                let control = meta.ctrl_on();

                let mut status = InputStatus::Unhandled;
                let mut deliver = true;

                if input::is_back_key(code) {
                    // One hardware press, one Escape.
                    deliver = input::back_key_action(pressed, key.repeat_count())
                        == BackKeyAction::Deliver;
                    status = InputStatus::Handled;
                } else if input::is_escape_key(code) {
                    // Claim Escape so the OS does not echo it back as Back.
                    status = InputStatus::Handled;
                }

                if deliver {
                    let text = if pressed {
                        input::key_text(code, shift)
                    } else {
                        None
                    };
                    self.core.send_event(&Event::Key(KeyEvent {
                        id: input::key_id(code),
                        text,
                        pressed,
                        shift,
                        control,
                    }));
                }
                status
            }
            InputEvent::MotionEvent(motion) => {
                let phase = match motion.action() {
                    MotionAction::Down | MotionAction::PointerDown => TouchPhase::Pressed,
                    MotionAction::Up | MotionAction::PointerUp | MotionAction::Cancel => {
                        TouchPhase::Released
                    }
                    MotionAction::Move => TouchPhase::Moved,
                    _ => return InputStatus::Unhandled,
                };

                // Moves report every pointer; up/down concern exactly one.
                let pointers: Vec<PointerSample> = if motion.action() == MotionAction::Move {
                    motion
                        .pointers()
                        .map(|p| PointerSample {
                            id: p.pointer_id(),
                            x: p.x() as i32,
                            y: p.y() as i32,
                        })
                        .collect()
                } else {
                    let p = motion.pointer_at_index(motion.pointer_index());
                    vec![PointerSample {
                        id: p.pointer_id(),
                        x: p.x() as i32,
                        y: p.y() as i32,
                    }]
                };

                let (touches, mouse) = self.touch.translate(phase, &pointers);
                for touch in touches {
                    self.core.send_event(&Event::Touch(touch));
                }
                if let Some(mouse) = mouse {
                    match mouse.action {
                        MouseAction::Pressed(_) | MouseAction::Released(_) => {
                            let now = self.clock.now_us();
                            self.core.dispatch_mouse(mouse, now);
                        }
                        _ => self.core.send_event(&Event::Mouse(mouse)),
                    }
                }
                InputStatus::Handled
            }
            _ => InputStatus::Unhandled,
        }
    }

    fn poll_sensors(&mut self) {
        let Some(sensors) = self.sensors.as_mut() else {
            return;
        };
        let core = &mut self.core;
        sensors.poll(|kind, vector| {
            let event = match kind {
                SensorKind::Accelerometer => Event::Accelerometer(vector),
                SensorKind::Gyroscope => Event::Gyroscope(vector),
            };
            core.send_event(&event);
        });
    }
}

impl Device for AndroidDevice {
    fn process_events(&mut self) -> bool {
        if !self.running {
            return false;
        }
        // While the activity is backgrounded there is no frame to produce,
        // so block until the OS has something to say.
        let timeout = if self.gate.runnable() {
            Some(Duration::ZERO)
        } else {
            None
        };
        self.pump(timeout);
        if !self.running {
            return false;
        }
        self.drain_input();
        self.poll_sensors();
        true
    }

    fn request_close(&mut self) {
        self.running = false;
    }

    fn set_event_receiver(&mut self, receiver: EventReceiver) {
        self.core.set_event_receiver(receiver);
    }

    fn set_window_caption(&mut self, _text: &str) {}

    fn set_fullscreen(&mut self, _fullscreen: bool) {}

    fn is_fullscreen(&self) -> bool {
        true
    }

    fn is_focused(&self) -> bool {
        self.gate.is_focused()
    }

    fn is_minimized(&self) -> bool {
        !self.gate.runnable()
    }

    fn window_size(&self) -> (u32, u32) {
        self.drawable_size()
    }

    fn video_modes(&self) -> &[VideoMode] {
        &self.core.video_modes
    }

    fn desktop_mode(&self) -> VideoMode {
        self.core.desktop_mode
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
        self.touch.cursor()
    }

    fn joysticks(&self) -> Vec<JoystickDescriptor> {
        Vec::new()
    }

    fn activate_accelerometer(&mut self, interval_us: u32) -> bool {
        match self.sensors.as_mut() {
            Some(sensors) => sensors.activate(SensorKind::Accelerometer, interval_us),
            None => false,
        }
    }

    fn deactivate_accelerometer(&mut self) {
        if let Some(sensors) = self.sensors.as_mut() {
            sensors.deactivate(SensorKind::Accelerometer);
        }
    }

    fn activate_gyroscope(&mut self, interval_us: u32) -> bool {
        match self.sensors.as_mut() {
            Some(sensors) => sensors.activate(SensorKind::Gyroscope, interval_us),
            None => false,
        }
    }

    fn deactivate_gyroscope(&mut self) {
        if let Some(sensors) = self.sensors.as_mut() {
            sensors.deactivate(SensorKind::Gyroscope);
        }
    }

    fn present(&mut self, paint: &FramePaint) {
        if !self.gate.runnable() {
            return;
        }
        let (width, height) = self.drawable_size();
        if let Some(surface) = self.surface.as_mut() {
            surface.resize(width, height);
            surface.present_frame(paint);
        }
    }
}
