//! Translation from Android input to the device event model.
//!
//! Everything here works on plain numeric keycodes and pointer lists, so
//! the policies are testable off-device; the activity glue feeds it from
//! the real input queue.

use addonpack_platform::{
    ButtonStates, KeyId, MouseAction, MouseEvent, TouchEvent, TouchPhase,
};

// The AKEYCODE_* values the table below refers to.
const KEYCODE_SOFT_LEFT: u32 = 1;
const KEYCODE_SOFT_RIGHT: u32 = 2;
const KEYCODE_HOME: u32 = 3;
const KEYCODE_BACK: u32 = 4;
const KEYCODE_0: u32 = 7;
const KEYCODE_9: u32 = 16;
const KEYCODE_DPAD_UP: u32 = 19;
const KEYCODE_DPAD_DOWN: u32 = 20;
const KEYCODE_DPAD_LEFT: u32 = 21;
const KEYCODE_DPAD_RIGHT: u32 = 22;
const KEYCODE_DPAD_CENTER: u32 = 23;
const KEYCODE_VOLUME_UP: u32 = 24;
const KEYCODE_VOLUME_DOWN: u32 = 25;
const KEYCODE_CLEAR: u32 = 28;
const KEYCODE_A: u32 = 29;
const KEYCODE_Z: u32 = 54;
const KEYCODE_COMMA: u32 = 55;
const KEYCODE_PERIOD: u32 = 56;
const KEYCODE_ALT_LEFT: u32 = 57;
const KEYCODE_ALT_RIGHT: u32 = 58;
const KEYCODE_SHIFT_LEFT: u32 = 59;
const KEYCODE_SHIFT_RIGHT: u32 = 60;
const KEYCODE_TAB: u32 = 61;
const KEYCODE_SPACE: u32 = 62;
const KEYCODE_ENTER: u32 = 66;
const KEYCODE_DEL: u32 = 67;
const KEYCODE_GRAVE: u32 = 68;
const KEYCODE_MINUS: u32 = 69;
const KEYCODE_PLUS: u32 = 81;
const KEYCODE_MENU: u32 = 82;
const KEYCODE_MEDIA_PLAY_PAUSE: u32 = 85;
const KEYCODE_MEDIA_STOP: u32 = 86;
const KEYCODE_MEDIA_NEXT: u32 = 87;
const KEYCODE_MEDIA_PREVIOUS: u32 = 88;
const KEYCODE_PAGE_UP: u32 = 92;
const KEYCODE_PAGE_DOWN: u32 = 93;
const KEYCODE_ESCAPE: u32 = 111;
const KEYCODE_FORWARD_DEL: u32 = 112;
const KEYCODE_CTRL_LEFT: u32 = 113;
const KEYCODE_CTRL_RIGHT: u32 = 114;
const KEYCODE_CAPS_LOCK: u32 = 115;
const KEYCODE_SCROLL_LOCK: u32 = 116;
const KEYCODE_SYSRQ: u32 = 120;
const KEYCODE_BREAK: u32 = 121;
const KEYCODE_MOVE_HOME: u32 = 122;
const KEYCODE_MOVE_END: u32 = 123;
const KEYCODE_INSERT: u32 = 124;
const KEYCODE_MEDIA_PLAY: u32 = 126;
const KEYCODE_MEDIA_PAUSE: u32 = 127;
const KEYCODE_F1: u32 = 131;
const KEYCODE_F12: u32 = 142;
const KEYCODE_NUM_LOCK: u32 = 143;
const KEYCODE_NUMPAD_0: u32 = 144;
const KEYCODE_NUMPAD_9: u32 = 153;
const KEYCODE_NUMPAD_DIVIDE: u32 = 154;
const KEYCODE_NUMPAD_MULTIPLY: u32 = 155;
const KEYCODE_NUMPAD_SUBTRACT: u32 = 156;
const KEYCODE_NUMPAD_ADD: u32 = 157;
const KEYCODE_NUMPAD_COMMA: u32 = 159;
const KEYCODE_NUMPAD_ENTER: u32 = 160;
const KEYCODE_VOLUME_MUTE: u32 = 164;

const LETTERS: [KeyId; 26] = [
    KeyId::A,
    KeyId::B,
    KeyId::C,
    KeyId::D,
    KeyId::E,
    KeyId::F,
    KeyId::G,
    KeyId::H,
    KeyId::I,
    KeyId::J,
    KeyId::K,
    KeyId::L,
    KeyId::M,
    KeyId::N,
    KeyId::O,
    KeyId::P,
    KeyId::Q,
    KeyId::R,
    KeyId::S,
    KeyId::T,
    KeyId::U,
    KeyId::V,
    KeyId::W,
    KeyId::X,
    KeyId::Y,
    KeyId::Z,
];

const DIGITS: [KeyId; 10] = [
    KeyId::Num0,
    KeyId::Num1,
    KeyId::Num2,
    KeyId::Num3,
    KeyId::Num4,
    KeyId::Num5,
    KeyId::Num6,
    KeyId::Num7,
    KeyId::Num8,
    KeyId::Num9,
];

const NUMPAD: [KeyId; 10] = [
    KeyId::Numpad0,
    KeyId::Numpad1,
    KeyId::Numpad2,
    KeyId::Numpad3,
    KeyId::Numpad4,
    KeyId::Numpad5,
    KeyId::Numpad6,
    KeyId::Numpad7,
    KeyId::Numpad8,
    KeyId::Numpad9,
];

const FUNCTION: [KeyId; 12] = [
    KeyId::F1,
    KeyId::F2,
    KeyId::F3,
    KeyId::F4,
    KeyId::F5,
    KeyId::F6,
    KeyId::F7,
    KeyId::F8,
    KeyId::F9,
    KeyId::F10,
    KeyId::F11,
    KeyId::F12,
];

/// Maps a native keycode to the device-independent identity.
///
/// Volume up and down are crossed, carried over unchanged from the
/// shipping key table.
pub fn key_id(code: u32) -> KeyId {
    match code {
        KEYCODE_SOFT_LEFT => KeyId::LeftButton,
        KEYCODE_SOFT_RIGHT => KeyId::RightButton,
        KEYCODE_HOME => KeyId::Home,
        KEYCODE_BACK => KeyId::Escape,
        KEYCODE_0..=KEYCODE_9 => DIGITS[(code - KEYCODE_0) as usize],
        KEYCODE_DPAD_UP => KeyId::Up,
        KEYCODE_DPAD_DOWN => KeyId::Down,
        KEYCODE_DPAD_LEFT => KeyId::Left,
        KEYCODE_DPAD_RIGHT => KeyId::Right,
        KEYCODE_DPAD_CENTER => KeyId::Select,
        KEYCODE_VOLUME_UP => KeyId::VolumeDown,
        KEYCODE_VOLUME_DOWN => KeyId::VolumeUp,
        KEYCODE_CLEAR => KeyId::Clear,
        KEYCODE_A..=KEYCODE_Z => LETTERS[(code - KEYCODE_A) as usize],
        KEYCODE_COMMA => KeyId::Comma,
        KEYCODE_PERIOD => KeyId::Period,
        KEYCODE_ALT_LEFT | KEYCODE_ALT_RIGHT | KEYCODE_MENU => KeyId::Alt,
        KEYCODE_SHIFT_LEFT => KeyId::LeftShift,
        KEYCODE_SHIFT_RIGHT => KeyId::RightShift,
        KEYCODE_TAB => KeyId::Tab,
        KEYCODE_SPACE => KeyId::Space,
        KEYCODE_ENTER | KEYCODE_NUMPAD_ENTER => KeyId::Return,
        KEYCODE_DEL => KeyId::Backspace,
        KEYCODE_GRAVE => KeyId::Oem3,
        KEYCODE_MINUS => KeyId::Minus,
        KEYCODE_PLUS => KeyId::Plus,
        KEYCODE_MEDIA_PLAY_PAUSE | KEYCODE_MEDIA_PAUSE => KeyId::MediaPlayPause,
        KEYCODE_MEDIA_STOP => KeyId::MediaStop,
        KEYCODE_MEDIA_NEXT => KeyId::MediaNextTrack,
        KEYCODE_MEDIA_PREVIOUS => KeyId::MediaPrevTrack,
        KEYCODE_MEDIA_PLAY => KeyId::Play,
        KEYCODE_PAGE_UP => KeyId::PageUp,
        KEYCODE_PAGE_DOWN => KeyId::PageDown,
        KEYCODE_ESCAPE => KeyId::Escape,
        KEYCODE_FORWARD_DEL => KeyId::Delete,
        KEYCODE_CTRL_LEFT | KEYCODE_CTRL_RIGHT => KeyId::Control,
        KEYCODE_CAPS_LOCK => KeyId::CapsLock,
        KEYCODE_SCROLL_LOCK => KeyId::ScrollLock,
        KEYCODE_SYSRQ => KeyId::Snapshot,
        KEYCODE_BREAK => KeyId::Pause,
        KEYCODE_MOVE_HOME => KeyId::Home,
        KEYCODE_MOVE_END => KeyId::End,
        KEYCODE_INSERT => KeyId::Insert,
        KEYCODE_F1..=KEYCODE_F12 => FUNCTION[(code - KEYCODE_F1) as usize],
        KEYCODE_NUM_LOCK => KeyId::NumLock,
        KEYCODE_NUMPAD_0..=KEYCODE_NUMPAD_9 => NUMPAD[(code - KEYCODE_NUMPAD_0) as usize],
        KEYCODE_NUMPAD_DIVIDE => KeyId::Divide,
        KEYCODE_NUMPAD_MULTIPLY => KeyId::Multiply,
        KEYCODE_NUMPAD_SUBTRACT => KeyId::Subtract,
        KEYCODE_NUMPAD_ADD => KeyId::Add,
        KEYCODE_NUMPAD_COMMA => KeyId::Comma,
        KEYCODE_VOLUME_MUTE => KeyId::VolumeMute,
        _ => KeyId::Unknown,
    }
}

/// Composes the text a press produces, for the handful of keys on-screen
/// widgets care about.
pub fn key_text(code: u32, shift: bool) -> Option<String> {
    let c: char = match code {
        KEYCODE_A..=KEYCODE_Z => {
            let letter = (b'a' + (code - KEYCODE_A) as u8) as char;
            if shift {
                letter.to_ascii_uppercase()
            } else {
                letter
            }
        }
        KEYCODE_0..=KEYCODE_9 => (b'0' + (code - KEYCODE_0) as u8) as char,
        KEYCODE_BACK | KEYCODE_DEL => '\u{8}',
        KEYCODE_TAB => '\t',
        KEYCODE_ENTER => '\r',
        KEYCODE_SPACE => ' ',
        KEYCODE_COMMA => ',',
        KEYCODE_PERIOD => '.',
        _ => return None,
    };
    Some(c.to_string())
}

/// What to do with a back-key report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackKeyAction {
    /// Deliver it (as an Escape press) and report it handled.
    Deliver,
    /// Swallow it but still report it handled, so the OS does not act
    /// on it either.
    Swallow,
}

/// Back is delivered only as a fresh press; releases and auto-repeats are
/// swallowed to keep one hardware press from triggering twice.
pub fn back_key_action(pressed: bool, repeat_count: i32) -> BackKeyAction {
    if pressed && repeat_count == 0 {
        BackKeyAction::Deliver
    } else {
        BackKeyAction::Swallow
    }
}

pub fn is_back_key(code: u32) -> bool {
    code == KEYCODE_BACK
}

pub fn is_escape_key(code: u32) -> bool {
    code == KEYCODE_ESCAPE || code == KEYCODE_BACK
}

/// Fans one motion report out into per-pointer touch events and, for
/// pointer zero, a synthesized left-button mouse event at the same spot.
#[derive(Debug, Default)]
pub struct TouchSynthesizer {
    cursor: (i32, i32),
    mouse_pressed: bool,
}

/// One pointer of a motion report.
#[derive(Clone, Copy, Debug)]
pub struct PointerSample {
    pub id: i32,
    pub x: i32,
    pub y: i32,
}

impl TouchSynthesizer {
    pub fn cursor(&self) -> (i32, i32) {
        self.cursor
    }

    pub fn mouse_pressed(&self) -> bool {
        self.mouse_pressed
    }

    /// Translates the pointers a report touches. Returns the touch events
    /// in pointer order plus the mouse event pointer zero synthesizes.
    pub fn translate(
        &mut self,
        phase: TouchPhase,
        pointers: &[PointerSample],
    ) -> (Vec<TouchEvent>, Option<MouseEvent>) {
        let mut touches = Vec::with_capacity(pointers.len());
        let mut mouse = None;

        for pointer in pointers {
            touches.push(TouchEvent {
                phase,
                id: pointer.id,
                x: pointer.x,
                y: pointer.y,
            });

            if pointer.id != 0 {
                continue;
            }
            self.cursor = (pointer.x, pointer.y);
            let action = match phase {
                TouchPhase::Pressed => {
                    self.mouse_pressed = true;
                    MouseAction::Pressed(addonpack_platform::MouseButton::Left)
                }
                TouchPhase::Released => {
                    self.mouse_pressed = false;
                    MouseAction::Released(addonpack_platform::MouseButton::Left)
                }
                TouchPhase::Moved => MouseAction::Moved,
            };
            mouse = Some(MouseEvent {
                action,
                x: pointer.x,
                y: pointer.y,
                wheel: 0.0,
                shift: false,
                control: false,
                buttons: ButtonStates {
                    left: self.mouse_pressed,
                    middle: false,
                    right: false,
                },
            });
        }

        (touches, mouse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use addonpack_platform::MouseButton;

    #[test]
    fn letters_digits_and_dpad_map() {
        assert_eq!(key_id(KEYCODE_A), KeyId::A);
        assert_eq!(key_id(KEYCODE_Z), KeyId::Z);
        assert_eq!(key_id(KEYCODE_0), KeyId::Num0);
        assert_eq!(key_id(KEYCODE_9), KeyId::Num9);
        assert_eq!(key_id(KEYCODE_DPAD_LEFT), KeyId::Left);
        assert_eq!(key_id(9999), KeyId::Unknown);
    }

    #[test]
    fn volume_rocker_is_crossed() {
        assert_eq!(key_id(KEYCODE_VOLUME_UP), KeyId::VolumeDown);
        assert_eq!(key_id(KEYCODE_VOLUME_DOWN), KeyId::VolumeUp);
    }

    #[test]
    fn back_maps_to_escape() {
        assert_eq!(key_id(KEYCODE_BACK), KeyId::Escape);
        assert!(is_escape_key(KEYCODE_BACK));
        assert!(is_escape_key(KEYCODE_ESCAPE));
    }

    #[test]
    fn back_key_only_fires_on_a_fresh_press() {
        assert_eq!(back_key_action(true, 0), BackKeyAction::Deliver);
        assert_eq!(back_key_action(true, 3), BackKeyAction::Swallow);
        assert_eq!(back_key_action(false, 0), BackKeyAction::Swallow);
    }

    #[test]
    fn key_text_composes_characters() {
        assert_eq!(key_text(KEYCODE_A, false).as_deref(), Some("a"));
        assert_eq!(key_text(KEYCODE_A, true).as_deref(), Some("A"));
        assert_eq!(key_text(KEYCODE_0 + 5, false).as_deref(), Some("5"));
        assert_eq!(key_text(KEYCODE_ESCAPE, false), None);
    }

    #[test]
    fn every_pointer_gets_a_touch_event() {
        let mut synth = TouchSynthesizer::default();
        let pointers = [
            PointerSample { id: 1, x: 10, y: 10 },
            PointerSample { id: 2, x: 50, y: 60 },
        ];
        let (touches, mouse) = synth.translate(TouchPhase::Moved, &pointers);
        assert_eq!(touches.len(), 2);
        assert_eq!(touches[1].x, 50);
        assert!(mouse.is_none());
    }

    #[test]
    fn pointer_zero_synthesizes_the_mouse() {
        let mut synth = TouchSynthesizer::default();
        let down = [PointerSample { id: 0, x: 30, y: 40 }];
        let (touches, mouse) = synth.translate(TouchPhase::Pressed, &down);
        assert_eq!(touches.len(), 1);
        let mouse = mouse.unwrap();
        assert_eq!(mouse.action, MouseAction::Pressed(MouseButton::Left));
        assert_eq!((mouse.x, mouse.y), (30, 40));
        assert!(mouse.buttons.left);
        assert!(synth.mouse_pressed());

        let up = [PointerSample { id: 0, x: 31, y: 41 }];
        let (_, mouse) = synth.translate(TouchPhase::Released, &up);
        let mouse = mouse.unwrap();
        assert_eq!(mouse.action, MouseAction::Released(MouseButton::Left));
        assert!(!mouse.buttons.left);
        assert_eq!(synth.cursor(), (31, 41));
    }
}
