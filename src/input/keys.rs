// Key translation - hardware key codes to engine keys
//
// The engine never sees winit key codes. Every physical key the game cares
// about maps to exactly one `Key`; everything else becomes `Key::Unknown`.

use serde::{Deserialize, Serialize};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Engine-neutral key identifier
///
/// Variant names double as the spelling used in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
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
    Return,
    Escape,
    Backspace,
    Tab,
    Space,
    Minus,
    Equals,
    LeftBracket,
    RightBracket,
    Backslash,
    Semicolon,
    Apostrophe,
    Grave,
    Comma,
    Period,
    Slash,
    CapsLock,
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
    PrintScreen,
    ScrollLock,
    Pause,
    Insert,
    Home,
    PageUp,
    Delete,
    End,
    PageDown,
    Right,
    Left,
    Down,
    Up,
    NumLock,
    KpDivide,
    KpMultiply,
    KpMinus,
    KpPlus,
    KpEnter,
    Kp0,
    Kp1,
    Kp2,
    Kp3,
    Kp4,
    Kp5,
    Kp6,
    Kp7,
    Kp8,
    Kp9,
    KpPeriod,
    LCtrl,
    LShift,
    LAlt,
    LSuper,
    RCtrl,
    RShift,
    RAlt,
    RSuper,
}

impl Key {
    /// Whether this is a real key rather than the unmapped sentinel
    #[inline]
    pub fn is_known(self) -> bool {
        self != Key::Unknown
    }
}

/// Translate a physical key into the engine key it stands for
///
/// Total and pure: unidentified keys and codes outside the supported set
/// yield `Key::Unknown`.
pub fn translate_key(physical_key: PhysicalKey) -> Key {
    match physical_key {
        PhysicalKey::Code(code) => translate_code(code),
        PhysicalKey::Unidentified(_) => Key::Unknown,
    }
}

/// Translate a key code into the engine key it stands for
pub fn translate_code(code: KeyCode) -> Key {
    match code {
        KeyCode::Digit0 => Key::Num0,
        KeyCode::Digit1 => Key::Num1,
        KeyCode::Digit2 => Key::Num2,
        KeyCode::Digit3 => Key::Num3,
        KeyCode::Digit4 => Key::Num4,
        KeyCode::Digit5 => Key::Num5,
        KeyCode::Digit6 => Key::Num6,
        KeyCode::Digit7 => Key::Num7,
        KeyCode::Digit8 => Key::Num8,
        KeyCode::Digit9 => Key::Num9,
        KeyCode::KeyA => Key::A,
        KeyCode::KeyB => Key::B,
        KeyCode::KeyC => Key::C,
        KeyCode::KeyD => Key::D,
        KeyCode::KeyE => Key::E,
        KeyCode::KeyF => Key::F,
        KeyCode::KeyG => Key::G,
        KeyCode::KeyH => Key::H,
        KeyCode::KeyI => Key::I,
        KeyCode::KeyJ => Key::J,
        KeyCode::KeyK => Key::K,
        KeyCode::KeyL => Key::L,
        KeyCode::KeyM => Key::M,
        KeyCode::KeyN => Key::N,
        KeyCode::KeyO => Key::O,
        KeyCode::KeyP => Key::P,
        KeyCode::KeyQ => Key::Q,
        KeyCode::KeyR => Key::R,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyT => Key::T,
        KeyCode::KeyU => Key::U,
        KeyCode::KeyV => Key::V,
        KeyCode::KeyW => Key::W,
        KeyCode::KeyX => Key::X,
        KeyCode::KeyY => Key::Y,
        KeyCode::KeyZ => Key::Z,
        KeyCode::Enter => Key::Return,
        KeyCode::Escape => Key::Escape,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Tab => Key::Tab,
        KeyCode::Space => Key::Space,
        KeyCode::Minus => Key::Minus,
        KeyCode::Equal => Key::Equals,
        KeyCode::BracketLeft => Key::LeftBracket,
        KeyCode::BracketRight => Key::RightBracket,
        KeyCode::Backslash => Key::Backslash,
        KeyCode::Semicolon => Key::Semicolon,
        KeyCode::Quote => Key::Apostrophe,
        KeyCode::Backquote => Key::Grave,
        KeyCode::Comma => Key::Comma,
        KeyCode::Period => Key::Period,
        KeyCode::Slash => Key::Slash,
        KeyCode::CapsLock => Key::CapsLock,
        KeyCode::F1 => Key::F1,
        KeyCode::F2 => Key::F2,
        KeyCode::F3 => Key::F3,
        KeyCode::F4 => Key::F4,
        KeyCode::F5 => Key::F5,
        KeyCode::F6 => Key::F6,
        KeyCode::F7 => Key::F7,
        KeyCode::F8 => Key::F8,
        KeyCode::F9 => Key::F9,
        KeyCode::F10 => Key::F10,
        KeyCode::F11 => Key::F11,
        KeyCode::F12 => Key::F12,
        KeyCode::PrintScreen => Key::PrintScreen,
        KeyCode::ScrollLock => Key::ScrollLock,
        KeyCode::Pause => Key::Pause,
        KeyCode::Insert => Key::Insert,
        KeyCode::Home => Key::Home,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::Delete => Key::Delete,
        KeyCode::End => Key::End,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::ArrowRight => Key::Right,
        KeyCode::ArrowLeft => Key::Left,
        KeyCode::ArrowDown => Key::Down,
        KeyCode::ArrowUp => Key::Up,
        KeyCode::NumLock => Key::NumLock,
        KeyCode::NumpadDivide => Key::KpDivide,
        KeyCode::NumpadMultiply => Key::KpMultiply,
        KeyCode::NumpadSubtract => Key::KpMinus,
        KeyCode::NumpadAdd => Key::KpPlus,
        KeyCode::NumpadEnter => Key::KpEnter,
        KeyCode::Numpad0 => Key::Kp0,
        KeyCode::Numpad1 => Key::Kp1,
        KeyCode::Numpad2 => Key::Kp2,
        KeyCode::Numpad3 => Key::Kp3,
        KeyCode::Numpad4 => Key::Kp4,
        KeyCode::Numpad5 => Key::Kp5,
        KeyCode::Numpad6 => Key::Kp6,
        KeyCode::Numpad7 => Key::Kp7,
        KeyCode::Numpad8 => Key::Kp8,
        KeyCode::Numpad9 => Key::Kp9,
        KeyCode::NumpadDecimal => Key::KpPeriod,
        KeyCode::ControlLeft => Key::LCtrl,
        KeyCode::ShiftLeft => Key::LShift,
        KeyCode::AltLeft => Key::LAlt,
        KeyCode::SuperLeft => Key::LSuper,
        KeyCode::ControlRight => Key::RCtrl,
        KeyCode::ShiftRight => Key::RShift,
        KeyCode::AltRight => Key::RAlt,
        KeyCode::SuperRight => Key::RSuper,
        _ => Key::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use winit::keyboard::NativeKeyCode;

    #[rustfmt::skip]
    const SUPPORTED: &[KeyCode] = &[
        KeyCode::Digit0, KeyCode::Digit1, KeyCode::Digit2, KeyCode::Digit3, KeyCode::Digit4,
        KeyCode::Digit5, KeyCode::Digit6, KeyCode::Digit7, KeyCode::Digit8, KeyCode::Digit9,
        KeyCode::KeyA, KeyCode::KeyB, KeyCode::KeyC, KeyCode::KeyD, KeyCode::KeyE,
        KeyCode::KeyF, KeyCode::KeyG, KeyCode::KeyH, KeyCode::KeyI, KeyCode::KeyJ,
        KeyCode::KeyK, KeyCode::KeyL, KeyCode::KeyM, KeyCode::KeyN, KeyCode::KeyO,
        KeyCode::KeyP, KeyCode::KeyQ, KeyCode::KeyR, KeyCode::KeyS, KeyCode::KeyT,
        KeyCode::KeyU, KeyCode::KeyV, KeyCode::KeyW, KeyCode::KeyX, KeyCode::KeyY,
        KeyCode::KeyZ, KeyCode::Enter, KeyCode::Escape, KeyCode::Backspace, KeyCode::Tab,
        KeyCode::Space, KeyCode::Minus, KeyCode::Equal, KeyCode::BracketLeft,
        KeyCode::BracketRight, KeyCode::Backslash, KeyCode::Semicolon, KeyCode::Quote,
        KeyCode::Backquote, KeyCode::Comma, KeyCode::Period, KeyCode::Slash,
        KeyCode::CapsLock, KeyCode::F1, KeyCode::F2, KeyCode::F3, KeyCode::F4, KeyCode::F5,
        KeyCode::F6, KeyCode::F7, KeyCode::F8, KeyCode::F9, KeyCode::F10, KeyCode::F11,
        KeyCode::F12, KeyCode::PrintScreen, KeyCode::ScrollLock, KeyCode::Pause,
        KeyCode::Insert, KeyCode::Home, KeyCode::PageUp, KeyCode::Delete, KeyCode::End,
        KeyCode::PageDown, KeyCode::ArrowRight, KeyCode::ArrowLeft, KeyCode::ArrowDown,
        KeyCode::ArrowUp, KeyCode::NumLock, KeyCode::NumpadDivide, KeyCode::NumpadMultiply,
        KeyCode::NumpadSubtract, KeyCode::NumpadAdd, KeyCode::NumpadEnter, KeyCode::Numpad0,
        KeyCode::Numpad1, KeyCode::Numpad2, KeyCode::Numpad3, KeyCode::Numpad4,
        KeyCode::Numpad5, KeyCode::Numpad6, KeyCode::Numpad7, KeyCode::Numpad8,
        KeyCode::Numpad9, KeyCode::NumpadDecimal, KeyCode::ControlLeft, KeyCode::ShiftLeft,
        KeyCode::AltLeft, KeyCode::SuperLeft, KeyCode::ControlRight, KeyCode::ShiftRight,
        KeyCode::AltRight, KeyCode::SuperRight,
    ];

    #[test]
    fn test_supported_codes_are_known() {
        for &code in SUPPORTED {
            assert!(translate_code(code).is_known(), "{:?} should be mapped", code);
        }
    }

    #[test]
    fn test_no_aliasing() {
        let keys: HashSet<Key> = SUPPORTED.iter().map(|&code| translate_code(code)).collect();
        assert_eq!(keys.len(), SUPPORTED.len());
    }

    #[test]
    fn test_translation_is_stable() {
        assert_eq!(translate_code(KeyCode::Numpad8), Key::Kp8);
        assert_eq!(translate_code(KeyCode::Numpad8), translate_code(KeyCode::Numpad8));
        assert_eq!(translate_code(KeyCode::Enter), Key::Return);
        assert_eq!(translate_code(KeyCode::Quote), Key::Apostrophe);
        assert_eq!(translate_code(KeyCode::SuperRight), Key::RSuper);
    }

    #[test]
    fn test_unmapped_codes_are_unknown() {
        assert_eq!(translate_code(KeyCode::MediaPlayPause), Key::Unknown);
        assert_eq!(translate_code(KeyCode::F13), Key::Unknown);
        assert_eq!(translate_code(KeyCode::IntlBackslash), Key::Unknown);
        assert_eq!(
            translate_key(PhysicalKey::Unidentified(NativeKeyCode::Unidentified)),
            Key::Unknown
        );
    }

    #[test]
    fn test_physical_key_wrapper() {
        assert_eq!(translate_key(PhysicalKey::Code(KeyCode::KeyE)), Key::E);
    }
}
