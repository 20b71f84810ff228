//! Application state: routes input by screen and drives the game clock

use crate::game::GameState;
use crate::high_scores::HighScores;
use crate::input::InputHandler;
use crate::screen::{Screen, ScreenManager};
use crate::settings::Settings;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::{info, warn};

/// How long the game over overlay stays up before moving on (seconds)
pub const GAME_OVER_OVERLAY_SECS: f64 = 2.0;

/// The whole application minus the terminal
pub struct App {
    game: GameState,
    screens: ScreenManager,
    input: InputHandler,
    high_scores: HighScores,
    settings: Settings,
    /// Seconds the game over overlay has been shown, if showing
    overlay_timer: Option<f64>,
    running: bool,
}

impl App {
    pub fn new(settings: Settings, high_scores: HighScores, game: GameState) -> Self {
        Self {
            game,
            screens: ScreenManager::new(),
            input: InputHandler::from_settings(&settings),
            high_scores,
            settings,
            overlay_timer: None,
            running: true,
        }
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    pub fn screens(&self) -> &ScreenManager {
        &self.screens
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn showing_game_over_overlay(&self) -> bool {
        self.overlay_timer.is_some()
    }

    /// Handle a key event for the current screen
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit();
            return;
        }

        // Input is ignored while the game over overlay is up
        if self.overlay_timer.is_some() {
            return;
        }

        match self.screens.current() {
            Screen::NameEntry => self.handle_name_key(key),
            _ if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) => self.quit(),
            Screen::Game => {
                if !self.game.is_game_over() {
                    if let Some(action) = self.input.action_for(key) {
                        action.apply(&mut self.game);
                    }
                }
            }
            screen => {
                if key.code == KeyCode::Char(' ') {
                    self.handle_menu_confirm(screen);
                }
            }
        }
    }

    /// Advance by `delta_time` seconds (one frame)
    pub fn tick(&mut self, delta_time: f64) {
        if let Some(elapsed) = self.overlay_timer.as_mut() {
            *elapsed += delta_time;
            if *elapsed >= GAME_OVER_OVERLAY_SECS {
                self.overlay_timer = None;
                let next = if self.high_scores.is_high_score(self.game.score()) {
                    Screen::NameEntry
                } else {
                    Screen::GameOver
                };
                self.screens.transition_to(next);
            }
            return;
        }

        if self.screens.current() != Screen::Game {
            return;
        }

        if !self.game.is_game_over() {
            self.game.update(delta_time);
        }

        if self.game.is_game_over() {
            info!(score = self.game.score(), "game over");
            self.overlay_timer = Some(0.0);
        }
    }

    fn handle_menu_confirm(&mut self, screen: Screen) {
        match screen {
            Screen::Start => self.start_game(),
            Screen::GameOver => self.screens.transition_to(Screen::HighScores),
            Screen::HighScores => self.screens.transition_to(Screen::Start),
            Screen::Game | Screen::NameEntry => {}
        }
    }

    fn handle_name_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.submit_name(),
            KeyCode::Backspace => self.screens.pop_name_char(),
            KeyCode::Char(c) => {
                self.screens.push_name_char(c);
            }
            _ => {}
        }
    }

    fn start_game(&mut self) {
        info!("starting new game");
        self.game.reset();
        self.game.spawn_tetromino();
        self.screens.transition_to(Screen::Game);
    }

    /// Record the typed name (if any) and go back to the start screen
    fn submit_name(&mut self) {
        let name = self.screens.player_name().trim().to_string();
        if !name.is_empty() {
            let score = self.game.score();
            match self.high_scores.add_score(&name, score) {
                Ok(()) => {
                    info!(%name, score, "recorded high score");
                    if let Err(e) = self.high_scores.save() {
                        warn!("could not save high scores: {e:#}");
                    }
                }
                Err(e) => warn!("could not record high score: {e:#}"),
            }
        }
        self.screens.transition_to(Screen::Start);
    }

    fn quit(&mut self) {
        self.running = false;
    }
}
