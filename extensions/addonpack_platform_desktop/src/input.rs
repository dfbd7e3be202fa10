//! Translation from winit input types to the device event model.

use addonpack_platform::{KeyId, MouseButton};
use winit::keyboard::{Key, NamedKey, PhysicalKey};

/// Maps a logical key to the device-independent identity. Character keys
/// map by their unshifted label; keys with no counterpart come back as
/// [`KeyId::Unknown`].
pub(crate) fn key_id(key: &Key) -> KeyId {
    match key {
        Key::Named(named) => named_key_id(*named),
        Key::Character(text) => character_key_id(text.as_str()),
        _ => KeyId::Unknown,
    }
}

fn named_key_id(named: NamedKey) -> KeyId {
    match named {
        NamedKey::Backspace => KeyId::Backspace,
        NamedKey::Tab => KeyId::Tab,
        NamedKey::Clear => KeyId::Clear,
        NamedKey::Enter => KeyId::Return,
        NamedKey::Shift => KeyId::Shift,
        NamedKey::Control => KeyId::Control,
        NamedKey::Alt => KeyId::Alt,
        NamedKey::Pause => KeyId::Pause,
        NamedKey::CapsLock => KeyId::CapsLock,
        NamedKey::Escape => KeyId::Escape,
        NamedKey::Space => KeyId::Space,
        NamedKey::PageUp => KeyId::PageUp,
        NamedKey::PageDown => KeyId::PageDown,
        NamedKey::End => KeyId::End,
        NamedKey::Home => KeyId::Home,
        NamedKey::ArrowLeft => KeyId::Left,
        NamedKey::ArrowUp => KeyId::Up,
        NamedKey::ArrowRight => KeyId::Right,
        NamedKey::ArrowDown => KeyId::Down,
        NamedKey::PrintScreen => KeyId::Snapshot,
        NamedKey::Insert => KeyId::Insert,
        NamedKey::Delete => KeyId::Delete,
        NamedKey::Super => KeyId::LeftSuper,
        NamedKey::F1 => KeyId::F1,
        NamedKey::F2 => KeyId::F2,
        NamedKey::F3 => KeyId::F3,
        NamedKey::F4 => KeyId::F4,
        NamedKey::F5 => KeyId::F5,
        NamedKey::F6 => KeyId::F6,
        NamedKey::F7 => KeyId::F7,
        NamedKey::F8 => KeyId::F8,
        NamedKey::F9 => KeyId::F9,
        NamedKey::F10 => KeyId::F10,
        NamedKey::F11 => KeyId::F11,
        NamedKey::F12 => KeyId::F12,
        NamedKey::NumLock => KeyId::NumLock,
        NamedKey::ScrollLock => KeyId::ScrollLock,
        NamedKey::Select => KeyId::Select,
        NamedKey::AudioVolumeDown => KeyId::VolumeDown,
        NamedKey::AudioVolumeUp => KeyId::VolumeUp,
        NamedKey::AudioVolumeMute => KeyId::VolumeMute,
        NamedKey::MediaPlayPause => KeyId::MediaPlayPause,
        NamedKey::MediaStop => KeyId::MediaStop,
        NamedKey::MediaTrackNext => KeyId::MediaNextTrack,
        NamedKey::MediaTrackPrevious => KeyId::MediaPrevTrack,
        NamedKey::ZoomToggle => KeyId::Zoom,
        _ => KeyId::Unknown,
    }
}

fn character_key_id(text: &str) -> KeyId {
    let mut chars = text.chars();
    let (Some(c), None) = (chars.next(), chars.next()) else {
        return KeyId::Unknown;
    };
    match c.to_ascii_lowercase() {
        '0' => KeyId::Num0,
        '1' => KeyId::Num1,
        '2' => KeyId::Num2,
        '3' => KeyId::Num3,
        '4' => KeyId::Num4,
        '5' => KeyId::Num5,
        '6' => KeyId::Num6,
        '7' => KeyId::Num7,
        '8' => KeyId::Num8,
        '9' => KeyId::Num9,
        'a' => KeyId::A,
        'b' => KeyId::B,
        'c' => KeyId::C,
        'd' => KeyId::D,
        'e' => KeyId::E,
        'f' => KeyId::F,
        'g' => KeyId::G,
        'h' => KeyId::H,
        'i' => KeyId::I,
        'j' => KeyId::J,
        'k' => KeyId::K,
        'l' => KeyId::L,
        'm' => KeyId::M,
        'n' => KeyId::N,
        'o' => KeyId::O,
        'p' => KeyId::P,
        'q' => KeyId::Q,
        'r' => KeyId::R,
        's' => KeyId::S,
        't' => KeyId::T,
        'u' => KeyId::U,
        'v' => KeyId::V,
        'w' => KeyId::W,
        'x' => KeyId::X,
        'y' => KeyId::Y,
        'z' => KeyId::Z,
        '*' => KeyId::Multiply,
        '=' | '+' => KeyId::Plus,
        ',' => KeyId::Comma,
        '-' | '_' => KeyId::Minus,
        '.' => KeyId::Period,
        ';' | ':' => KeyId::Oem1,
        '/' | '?' => KeyId::Oem2,
        '`' | '~' => KeyId::Oem3,
        '[' | '{' => KeyId::Oem4,
        '\\' | '|' => KeyId::Oem5,
        ']' | '}' => KeyId::Oem6,
        '\'' | '"' => KeyId::Oem7,
        '<' | '>' => KeyId::Oem102,
        _ => KeyId::Unknown,
    }
}

/// A stable numeric code for a physical key, used only to pair releases
/// with re-presses in the repeat filter. Equality is all that matters, so
/// hashing the key is enough.
pub(crate) fn physical_code(key: PhysicalKey) -> u32 {
    use std::hash::{Hash, Hasher};
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    key.hash(&mut hasher);
    hasher.finish() as u32
}

/// Maps a winit mouse button; buttons past the classic three are ignored.
pub(crate) fn mouse_button(button: winit::event::MouseButton) -> Option<MouseButton> {
    match button {
        winit::event::MouseButton::Left => Some(MouseButton::Left),
        winit::event::MouseButton::Middle => Some(MouseButton::Middle),
        winit::event::MouseButton::Right => Some(MouseButton::Right),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::SmolStr;

    #[test]
    fn letters_map_case_insensitively() {
        assert_eq!(key_id(&Key::Character(SmolStr::new("q"))), KeyId::Q);
        assert_eq!(key_id(&Key::Character(SmolStr::new("Q"))), KeyId::Q);
    }

    #[test]
    fn punctuation_maps_to_oem_ids() {
        assert_eq!(key_id(&Key::Character(SmolStr::new(";"))), KeyId::Oem1);
        assert_eq!(key_id(&Key::Character(SmolStr::new("\\"))), KeyId::Oem5);
        assert_eq!(key_id(&Key::Character(SmolStr::new("<"))), KeyId::Oem102);
    }

    #[test]
    fn named_keys_map() {
        assert_eq!(key_id(&Key::Named(NamedKey::Escape)), KeyId::Escape);
        assert_eq!(key_id(&Key::Named(NamedKey::Enter)), KeyId::Return);
        assert_eq!(key_id(&Key::Named(NamedKey::ArrowLeft)), KeyId::Left);
    }

    #[test]
    fn unmapped_input_becomes_unknown() {
        assert_eq!(key_id(&Key::Named(NamedKey::Fn)), KeyId::Unknown);
        assert_eq!(key_id(&Key::Character(SmolStr::new("ß"))), KeyId::Unknown);
    }

    #[test]
    fn physical_codes_pair_release_with_press() {
        use winit::keyboard::KeyCode;
        let a = physical_code(PhysicalKey::Code(KeyCode::KeyA));
        assert_eq!(a, physical_code(PhysicalKey::Code(KeyCode::KeyA)));
        assert_ne!(a, physical_code(PhysicalKey::Code(KeyCode::KeyB)));
    }

    #[test]
    fn extra_mouse_buttons_are_dropped() {
        assert_eq!(mouse_button(winit::event::MouseButton::Back), None);
        assert_eq!(
            mouse_button(winit::event::MouseButton::Left),
            Some(MouseButton::Left)
        );
    }
}
