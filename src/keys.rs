use egui::Key;

use crate::config::UserSettings;
use crate::morse::Symbol;

/// What a key press asks the trainer to do
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    Symbol(Symbol),
    Finalize,
}

/// Resolved key bindings. Unknown key names fall back to the defaults.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyBindings {
    pub dot: Key,
    pub dash: Key,
    pub finalize: Key,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            dot: Key::Space,
            dash: Key::Minus,
            finalize: Key::Enter,
        }
    }
}

impl KeyBindings {
    pub fn from_settings(user: &UserSettings) -> Self {
        let defaults = Self::default();
        Self {
            dot: parse_key(&user.dot_key).unwrap_or(defaults.dot),
            dash: parse_key(&user.dash_key).unwrap_or(defaults.dash),
            finalize: parse_key(&user.finalize_key).unwrap_or(defaults.finalize),
        }
    }

    pub fn action_for(&self, key: Key) -> Option<KeyAction> {
        if key == self.dot {
            Some(KeyAction::Symbol(Symbol::Dot))
        } else if key == self.dash {
            Some(KeyAction::Symbol(Symbol::Dash))
        } else if key == self.finalize {
            Some(KeyAction::Finalize)
        } else {
            None
        }
    }

    /// Actions for fresh presses in this frame. Auto-repeat is ignored so
    /// holding a key keys one symbol.
    pub fn actions(&self, events: &[egui::Event]) -> Vec<KeyAction> {
        events
            .iter()
            .filter_map(|event| match event {
                egui::Event::Key {
                    key,
                    pressed: true,
                    repeat: false,
                    ..
                } => self.action_for(*key),
                _ => None,
            })
            .collect()
    }
}

fn parse_key(name: &str) -> Option<Key> {
    let key = Key::from_name(name.trim());
    if key.is_none() {
        log::warn!("Unknown key name {:?} in settings", name);
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_event(key: Key, pressed: bool, repeat: bool) -> egui::Event {
        egui::Event::Key {
            key,
            physical_key: None,
            pressed,
            repeat,
            modifiers: egui::Modifiers::NONE,
        }
    }

    #[test]
    fn test_default_bindings() {
        let bindings = KeyBindings::from_settings(&UserSettings::default());
        assert_eq!(bindings, KeyBindings::default());
        assert_eq!(
            bindings.action_for(Key::Space),
            Some(KeyAction::Symbol(Symbol::Dot))
        );
        assert_eq!(
            bindings.action_for(Key::Minus),
            Some(KeyAction::Symbol(Symbol::Dash))
        );
        assert_eq!(bindings.action_for(Key::Enter), Some(KeyAction::Finalize));
        assert_eq!(bindings.action_for(Key::A), None);
    }

    #[test]
    fn test_custom_and_unknown_names() {
        let user = UserSettings {
            dot_key: "Period".to_string(),
            dash_key: "NotAKey".to_string(),
            ..UserSettings::default()
        };
        let bindings = KeyBindings::from_settings(&user);
        assert_eq!(bindings.dot, Key::Period);
        assert_eq!(bindings.dash, Key::Minus);
    }

    #[test]
    fn test_actions_skip_repeats_and_releases() {
        let bindings = KeyBindings::default();
        let events = vec![
            key_event(Key::Space, true, false),
            key_event(Key::Space, true, true),
            key_event(Key::Space, false, false),
            key_event(Key::Minus, true, false),
            egui::Event::Text(" ".to_string()),
            key_event(Key::Enter, true, false),
        ];
        assert_eq!(
            bindings.actions(&events),
            vec![
                KeyAction::Symbol(Symbol::Dot),
                KeyAction::Symbol(Symbol::Dash),
                KeyAction::Finalize,
            ]
        );
    }
}
