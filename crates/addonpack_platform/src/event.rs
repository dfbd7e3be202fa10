//! Input and system event model shared by every device backend.
//!
//! Backends translate native window-system input into these types and hand
//! them to the registered receiver synchronously, in arrival order.

/// Coarse discriminant, useful for filtering without matching payloads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    Mouse,
    Key,
    Touch,
    Accelerometer,
    Gyroscope,
    Joystick,
    System,
}

/// A single input or lifecycle notification delivered by a device backend.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    Mouse(MouseEvent),
    Key(KeyEvent),
    Touch(TouchEvent),
    Accelerometer(MotionVector),
    Gyroscope(MotionVector),
    Joystick(JoystickSnapshot),
    System(SystemEvent),
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Mouse(_) => EventKind::Mouse,
            Event::Key(_) => EventKind::Key,
            Event::Touch(_) => EventKind::Touch,
            Event::Accelerometer(_) => EventKind::Accelerometer,
            Event::Gyroscope(_) => EventKind::Gyroscope,
            Event::Joystick(_) => EventKind::Joystick,
            Event::System(_) => EventKind::System,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

/// What happened to the pointer. `Click` and `DoubleClick` are synthesized
/// from press/release pairs by [`crate::click::ClickDetector`]; backends never
/// produce them directly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MouseAction {
    Pressed(MouseButton),
    Released(MouseButton),
    Moved,
    Wheel,
    Click(MouseButton),
    DoubleClick(MouseButton),
}

/// Buttons held at the time an event fired, regardless of which button the
/// event itself is about.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ButtonStates {
    pub left: bool,
    pub middle: bool,
    pub right: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MouseEvent {
    pub action: MouseAction,
    pub x: i32,
    pub y: i32,
    /// Signed scroll amount, positive away from the user. Zero for
    /// non-wheel actions.
    pub wheel: f32,
    pub shift: bool,
    pub control: bool,
    pub buttons: ButtonStates,
}

impl MouseEvent {
    pub fn button(&self) -> Option<MouseButton> {
        match self.action {
            MouseAction::Pressed(b)
            | MouseAction::Released(b)
            | MouseAction::Click(b)
            | MouseAction::DoubleClick(b) => Some(b),
            MouseAction::Moved | MouseAction::Wheel => None,
        }
    }
}

/// Device-independent key identity. Character keys map by label, not by
/// physical position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyId {
    Unknown,
    Num0,
    Num1,
    Num2,
    Num3,
    Num4,
    Num5,
    Num6,
    Num7,
    Num8,
    Num9,
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    Backspace,
    Tab,
    Clear,
    Return,
    Shift,
    LeftShift,
    RightShift,
    Control,
    LeftControl,
    RightControl,
    Alt,
    LeftAlt,
    RightAlt,
    Pause,
    CapsLock,
    Escape,
    Space,
    PageUp,
    PageDown,
    End,
    Home,
    Left,
    Up,
    Right,
    Down,
    Print,
    Insert,
    Delete,
    LeftSuper,
    RightSuper,
    Numpad0,
    Numpad1,
    Numpad2,
    Numpad3,
    Numpad4,
    Numpad5,
    Numpad6,
    Numpad7,
    Numpad8,
    Numpad9,
    Multiply,
    Add,
    Separator,
    Subtract,
    Decimal,
    Divide,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    NumLock,
    ScrollLock,
    Plus,
    Comma,
    Minus,
    Period,
    Oem1,
    Oem2,
    Oem3,
    Oem4,
    Oem5,
    Oem6,
    Oem7,
    Oem8,
    Oem102,
    LeftButton,
    RightButton,
    Select,
    VolumeDown,
    VolumeUp,
    MediaPlayPause,
    MediaStop,
    MediaNextTrack,
    MediaPrevTrack,
    VolumeMute,
    Snapshot,
    Play,
    Zoom,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    pub id: KeyId,
    /// Composed text produced by the press, if any. `None` for releases and
    /// for keys that compose nothing.
    pub text: Option<String>,
    pub pressed: bool,
    pub shift: bool,
    pub control: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TouchPhase {
    Pressed,
    Released,
    Moved,
}

/// One pointer of a multi-touch gesture. `id` is stable for the lifetime of
/// the contact.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TouchEvent {
    pub phase: TouchPhase,
    pub id: i32,
    pub x: i32,
    pub y: i32,
}

/// Accelerometer or gyroscope sample.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MotionVector {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

pub const JOYSTICK_CHANNELS: usize = 32;

/// Full state of one joystick after the pending raw reports have been
/// merged in. Emitted at most once per device per pump cycle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JoystickSnapshot {
    pub id: u32,
    pub buttons: [bool; JOYSTICK_CHANNELS],
    pub axes: [i32; JOYSTICK_CHANNELS],
}

impl JoystickSnapshot {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            buttons: [false; JOYSTICK_CHANNELS],
            axes: [0; JOYSTICK_CHANNELS],
        }
    }
}

/// Application lifecycle commands, reported by the embedded backend as the
/// OS drives the activity through its states.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppCommand {
    Start,
    Resume,
    Pause,
    Stop,
    InitWindow,
    TermWindow,
    GainedFocus,
    LostFocus,
    SaveState,
    ConfigChanged,
    LowMemory,
    Destroy,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SystemEvent {
    pub command: AppCommand,
}
