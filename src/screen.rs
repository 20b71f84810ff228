//! Screen navigation and the name entry buffer

/// Longest name accepted on the name entry screen
pub const MAX_NAME_LEN: usize = 20;

/// Top level screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Start,
    Game,
    GameOver,
    NameEntry,
    HighScores,
}

/// Tracks the current screen and the name being typed
#[derive(Debug, Clone)]
pub struct ScreenManager {
    current: Screen,
    player_name: String,
}

impl Default for ScreenManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ScreenManager {
    pub fn new() -> Self {
        Self {
            current: Screen::Start,
            player_name: String::new(),
        }
    }

    pub fn current(&self) -> Screen {
        self.current
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    /// Switch screens; entering name entry starts with an empty name
    pub fn transition_to(&mut self, screen: Screen) {
        self.current = screen;
        if screen == Screen::NameEntry {
            self.player_name.clear();
        }
    }

    /// Append a printable character while the name is short enough
    pub fn push_name_char(&mut self, c: char) -> bool {
        if c.is_control() || self.player_name.chars().count() >= MAX_NAME_LEN {
            return false;
        }
        self.player_name.push(c);
        true
    }

    /// Remove the last character
    pub fn pop_name_char(&mut self) {
        self.player_name.pop();
    }
}
