//! On-screen keyboard button labels → key identifiers.
//!
//! Virtual keyboards label their buttons either with the character they
//! produce (`"a"`, `"A"`, `"!"`) or with a braced function name
//! (`"{backspace}"`, `"{ent}"`, `"{shift}"`).  Both forms resolve to the
//! physical key that produces them on a US layout; shift state is the
//! caller's business.
//!
//! A label that already is a catalogued DOM code (`"KeyA"`, `"Enter"`)
//! passes through unchanged.  Anything else resolves to `None`.

use std::collections::HashMap;

use super::{dom, KeyId};

/// Braced function labels.
const BRACED_LABELS: &[(&str, &str)] = &[
    ("{backspace}", "Backspace"),
    ("{bksp}", "Backspace"),
    ("{enter}", "Enter"),
    ("{ent}", "Enter"),
    ("{space}", "Space"),
    ("{tab}", "Tab"),
    ("{escape}", "Escape"),
    ("{esc}", "Escape"),
    ("{capslock}", "CapsLock"),
    ("{lock}", "CapsLock"),
    ("{shift}", "ShiftLeft"),
    ("{shiftleft}", "ShiftLeft"),
    ("{shiftright}", "ShiftRight"),
    ("{controlleft}", "ControlLeft"),
    ("{controlright}", "ControlRight"),
    ("{altleft}", "AltLeft"),
    ("{altright}", "AltRight"),
    ("{metaleft}", "MetaLeft"),
    ("{metaright}", "MetaRight"),
    ("{arrowup}", "ArrowUp"),
    ("{arrowdown}", "ArrowDown"),
    ("{arrowleft}", "ArrowLeft"),
    ("{arrowright}", "ArrowRight"),
    ("{insert}", "Insert"),
    ("{delete}", "Delete"),
    ("{home}", "Home"),
    ("{end}", "End"),
    ("{pageup}", "PageUp"),
    ("{pagedown}", "PageDown"),
    ("{prtscr}", "PrintScreen"),
    ("{scrolllock}", "ScrollLock"),
    ("{pause}", "Pause"),
    ("{numlock}", "NumLock"),
    ("{f1}", "F1"),
    ("{f2}", "F2"),
    ("{f3}", "F3"),
    ("{f4}", "F4"),
    ("{f5}", "F5"),
    ("{f6}", "F6"),
    ("{f7}", "F7"),
    ("{f8}", "F8"),
    ("{f9}", "F9"),
    ("{f10}", "F10"),
    ("{f11}", "F11"),
    ("{f12}", "F12"),
];

/// Punctuation labels, unshifted and shifted, on a US layout.
const SYMBOL_LABELS: &[(&str, &str)] = &[
    (" ", "Space"),
    ("-", "Minus"),
    ("_", "Minus"),
    ("=", "Equal"),
    ("+", "Equal"),
    ("[", "BracketLeft"),
    ("{", "BracketLeft"),
    ("]", "BracketRight"),
    ("}", "BracketRight"),
    ("\\", "Backslash"),
    ("|", "Backslash"),
    (";", "Semicolon"),
    (":", "Semicolon"),
    ("'", "Quote"),
    ("\"", "Quote"),
    ("`", "Backquote"),
    ("~", "Backquote"),
    (",", "Comma"),
    ("<", "Comma"),
    (".", "Period"),
    (">", "Period"),
    ("/", "Slash"),
    ("?", "Slash"),
];

/// Shifted digit-row symbols, indexed like `"1234567890"`.
const SHIFTED_DIGITS: &str = "!@#$%^&*()";

/// Lookup table from virtual keyboard button labels to [`KeyId`]s.
#[derive(Debug, Clone)]
pub struct VirtualKeyTable {
    entries: HashMap<String, KeyId>,
}

impl VirtualKeyTable {
    /// Builds the standard US-layout table.
    pub fn standard() -> Self {
        let mut entries = HashMap::new();

        for (label, code) in BRACED_LABELS.iter().chain(SYMBOL_LABELS) {
            entries.insert((*label).to_string(), KeyId::from(*code));
        }

        for letter in 'a'..='z' {
            let code = KeyId::new(format!("Key{}", letter.to_ascii_uppercase()));
            entries.insert(letter.to_string(), code.clone());
            entries.insert(letter.to_ascii_uppercase().to_string(), code);
        }

        for (digit, shifted) in "1234567890".chars().zip(SHIFTED_DIGITS.chars()) {
            let code = KeyId::new(format!("Digit{digit}"));
            entries.insert(digit.to_string(), code.clone());
            entries.insert(shifted.to_string(), code);
        }

        Self { entries }
    }

    /// Adds or replaces a single label mapping.
    pub fn with_entry(mut self, label: impl Into<String>, code: impl Into<KeyId>) -> Self {
        self.entries.insert(label.into(), code.into());
        self
    }

    /// Resolves a button label to a key identifier.
    pub fn resolve(&self, label: &str) -> Option<KeyId> {
        if let Some(code) = self.entries.get(label) {
            return Some(code.clone());
        }
        if dom::is_known_code(label) {
            return Some(KeyId::from(label));
        }
        None
    }

    /// Number of explicit label mappings (pass-through codes not counted).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for VirtualKeyTable {
    fn default() -> Self {
        Self::standard()
    }
}
