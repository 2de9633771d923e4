//! Catalogue of DOM `KeyboardEvent.code` names understood by the device.
//!
//! The device maps each of these to a USB HID usage on page 0x07.  Codes
//! outside this list are still forwarded by the translator (the identifier
//! is opaque), but the virtual keyboard only passes labels through when they
//! name a catalogued code.

/// Every key code the device's HID keyboard endpoint can emit.
pub const KNOWN_CODES: &[&str] = &[
    // Letters
    "KeyA", "KeyB", "KeyC", "KeyD", "KeyE", "KeyF", "KeyG", "KeyH", "KeyI", "KeyJ", "KeyK",
    "KeyL", "KeyM", "KeyN", "KeyO", "KeyP", "KeyQ", "KeyR", "KeyS", "KeyT", "KeyU", "KeyV",
    "KeyW", "KeyX", "KeyY", "KeyZ",
    // Digit row
    "Digit1", "Digit2", "Digit3", "Digit4", "Digit5", "Digit6", "Digit7", "Digit8", "Digit9",
    "Digit0",
    // Editing and whitespace
    "Enter", "Escape", "Backspace", "Tab", "Space",
    // Punctuation
    "Minus", "Equal", "BracketLeft", "BracketRight", "Backslash", "Semicolon", "Quote",
    "Backquote", "Comma", "Period", "Slash", "IntlBackslash", "IntlRo", "IntlYen",
    // Locks
    "CapsLock", "ScrollLock", "NumLock",
    // Function row
    "F1", "F2", "F3", "F4", "F5", "F6", "F7", "F8", "F9", "F10", "F11", "F12",
    "PrintScreen", "Pause",
    // Navigation
    "Insert", "Home", "PageUp", "Delete", "End", "PageDown", "ArrowRight", "ArrowLeft",
    "ArrowDown", "ArrowUp",
    // Numeric keypad
    "NumpadDivide", "NumpadMultiply", "NumpadSubtract", "NumpadAdd", "NumpadEnter", "Numpad1",
    "Numpad2", "Numpad3", "Numpad4", "Numpad5", "Numpad6", "Numpad7", "Numpad8", "Numpad9",
    "Numpad0", "NumpadDecimal",
    "ContextMenu",
    // Modifiers
    "ControlLeft", "ShiftLeft", "AltLeft", "MetaLeft", "ControlRight", "ShiftRight", "AltRight",
    "MetaRight",
];

/// Left Control.  Subject to AltGr disambiguation on Windows layouts.
pub const CONTROL_LEFT: &str = "ControlLeft";

/// Right Alt.  Windows reports AltGr as `ControlLeft` + `AltRight`.
pub const ALT_RIGHT: &str = "AltRight";

pub const META_LEFT: &str = "MetaLeft";
pub const META_RIGHT: &str = "MetaRight";

/// Returns `true` if `code` is in [`KNOWN_CODES`].
pub fn is_known_code(code: &str) -> bool {
    KNOWN_CODES.contains(&code)
}

/// Returns `true` for the OS (Windows / Command) keys.
pub fn is_meta(code: &str) -> bool {
    code == META_LEFT || code == META_RIGHT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue_has_no_duplicates() {
        let mut seen = std::collections::HashSet::new();
        for code in KNOWN_CODES {
            assert!(seen.insert(*code), "duplicate code {code}");
        }
    }

    #[test]
    fn test_special_keys_are_catalogued() {
        for code in [CONTROL_LEFT, ALT_RIGHT, META_LEFT, META_RIGHT] {
            assert!(is_known_code(code), "{code} missing");
        }
    }

    #[test]
    fn test_unknown_code_is_rejected() {
        assert!(!is_known_code("KeyÄ"));
        assert!(!is_known_code(""));
        assert!(!is_known_code("keya"), "lookup is case-sensitive");
    }
}
