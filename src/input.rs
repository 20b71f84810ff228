//! Gameplay key mapping
//!
//! Translates key presses into game actions using the configured bindings.
//! Every action fires once per key press; there is no auto-repeat of its own,
//! terminal key repeat is passed through as further presses.

use crate::game::GameState;
use crate::settings::Settings;
use crossterm::event::{KeyCode, KeyEvent};
use tracing::warn;

/// Input actions the game can process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Rotate,
    HardDrop,
}

impl Action {
    /// Apply this action to the game. Returns false if it was rejected.
    pub fn apply(self, game: &mut GameState) -> bool {
        match self {
            Action::MoveLeft => game.move_active_left(),
            Action::MoveRight => game.move_active_right(),
            Action::Rotate => game.rotate_active(),
            Action::HardDrop => {
                let active = game.active_tetromino().is_some() && !game.is_game_over();
                game.hard_drop();
                active
            }
        }
    }
}

/// Key bindings configuration - supports multiple keys per action
#[derive(Debug, Clone)]
pub struct KeyBindings {
    pub move_left: Vec<KeyCode>,
    pub move_right: Vec<KeyCode>,
    pub rotate: Vec<KeyCode>,
    pub hard_drop: Vec<KeyCode>,
}

impl KeyBindings {
    /// Parse a key string into KeyCode
    fn parse_key(s: &str) -> Option<KeyCode> {
        let lower = s.to_lowercase();
        let code = match lower.as_str() {
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "space" => KeyCode::Char(' '),
            "enter" => KeyCode::Enter,
            "tab" => KeyCode::Tab,
            _ => {
                let mut chars = lower.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c),
                    _ => return None,
                }
            }
        };
        Some(code)
    }

    /// Parse a list of key strings into KeyCodes, skipping unknown names
    fn parse_keys(keys: &[String]) -> Vec<KeyCode> {
        keys.iter()
            .filter_map(|s| {
                let code = Self::parse_key(s);
                if code.is_none() {
                    warn!(key = %s, "ignoring unknown key binding");
                }
                code
            })
            .collect()
    }

    /// Create keybindings from settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            move_left: Self::parse_keys(&settings.keys.move_left),
            move_right: Self::parse_keys(&settings.keys.move_right),
            rotate: Self::parse_keys(&settings.keys.rotate),
            hard_drop: Self::parse_keys(&settings.keys.hard_drop),
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// Maps gameplay key presses to actions
#[derive(Debug, Clone, Default)]
pub struct InputHandler {
    bindings: KeyBindings,
}

impl InputHandler {
    /// Create input handler from settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            bindings: KeyBindings::from_settings(settings),
        }
    }

    /// Look up the action bound to a key press
    pub fn action_for(&self, key: KeyEvent) -> Option<Action> {
        let code = normalize_key(key.code);
        let b = &self.bindings;

        if b.move_left.contains(&code) {
            Some(Action::MoveLeft)
        } else if b.move_right.contains(&code) {
            Some(Action::MoveRight)
        } else if b.rotate.contains(&code) {
            Some(Action::Rotate)
        } else if b.hard_drop.contains(&code) {
            Some(Action::HardDrop)
        } else {
            None
        }
    }
}

/// Normalize key codes for consistent handling
fn normalize_key(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tetromino::ShapeType;
    use crossterm::event::KeyModifiers;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_default_bindings() {
        let input = InputHandler::default();
        assert_eq!(input.action_for(press(KeyCode::Left)), Some(Action::MoveLeft));
        assert_eq!(input.action_for(press(KeyCode::Right)), Some(Action::MoveRight));
        assert_eq!(input.action_for(press(KeyCode::Char(' '))), Some(Action::Rotate));
        assert_eq!(input.action_for(press(KeyCode::Up)), Some(Action::Rotate));
        assert_eq!(input.action_for(press(KeyCode::Down)), Some(Action::HardDrop));
        assert_eq!(input.action_for(press(KeyCode::Char('x'))), None);
    }

    #[test]
    fn test_custom_bindings_are_case_insensitive() {
        let mut settings = Settings::default();
        settings.keys.move_left = vec!["A".to_string(), "bogus-key".to_string()];
        let input = InputHandler::from_settings(&settings);
        assert_eq!(input.action_for(press(KeyCode::Char('a'))), Some(Action::MoveLeft));
        assert_eq!(input.action_for(press(KeyCode::Char('A'))), Some(Action::MoveLeft));
        assert_eq!(input.action_for(press(KeyCode::Left)), None);
    }

    #[test]
    fn test_apply_actions() {
        let mut game = GameState::with_shapes(|| ShapeType::O);
        assert!(!Action::MoveLeft.apply(&mut game));
        game.spawn_tetromino();
        assert!(Action::MoveLeft.apply(&mut game));
        assert_eq!(game.active_tetromino().unwrap().x(), 3);
        assert!(Action::Rotate.apply(&mut game));
        assert!(Action::HardDrop.apply(&mut game));
        assert_eq!(game.score(), 4);
    }
}
