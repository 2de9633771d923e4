//! Input events consumed by the keyboard session.
//!
//! One JSON object per event, tagged by `"event"`:
//!
//! ```json
//! {"event":"key_down","code":"ControlLeft"}
//! {"event":"key_up","code":"ControlLeft"}
//! {"event":"virtual_press","button":"{shift}"}
//! {"event":"virtual_release","button":"{shift}"}
//! {"event":"release_all"}
//! {"event":"focus_lost"}
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum InputEvent {
    /// Physical key pressed; `code` is a DOM `KeyboardEvent.code`.
    KeyDown { code: String },
    /// Physical key released.
    KeyUp { code: String },
    /// On-screen keyboard button pressed; `button` is its label.
    VirtualPress { button: String },
    /// On-screen keyboard button released.
    VirtualRelease { button: String },
    /// Explicit request to release every key.
    ReleaseAll,
    /// The capture surface lost focus; keys held now will never see a key-up.
    FocusLost,
}

impl InputEvent {
    pub fn key_down(code: impl Into<String>) -> Self {
        InputEvent::KeyDown { code: code.into() }
    }

    pub fn key_up(code: impl Into<String>) -> Self {
        InputEvent::KeyUp { code: code.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_down_json_shape() {
        let ev: InputEvent = serde_json::from_str(r#"{"event":"key_down","code":"KeyA"}"#).unwrap();
        assert_eq!(ev, InputEvent::key_down("KeyA"));
    }

    #[test]
    fn test_virtual_press_json_shape() {
        let ev: InputEvent =
            serde_json::from_str(r#"{"event":"virtual_press","button":"{ent}"}"#).unwrap();
        assert_eq!(
            ev,
            InputEvent::VirtualPress {
                button: "{ent}".to_string()
            }
        );
    }

    #[test]
    fn test_unit_variants_need_only_the_tag() {
        let ev: InputEvent = serde_json::from_str(r#"{"event":"focus_lost"}"#).unwrap();
        assert_eq!(ev, InputEvent::FocusLost);
        let ev: InputEvent = serde_json::from_str(r#"{"event":"release_all"}"#).unwrap();
        assert_eq!(ev, InputEvent::ReleaseAll);
    }

    #[test]
    fn test_missing_field_is_an_error() {
        assert!(serde_json::from_str::<InputEvent>(r#"{"event":"key_up"}"#).is_err());
    }

    #[test]
    fn test_unknown_tag_is_an_error() {
        assert!(serde_json::from_str::<InputEvent>(r#"{"event":"mouse_move"}"#).is_err());
    }
}
