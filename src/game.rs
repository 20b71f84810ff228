//! Core game state and logic

use crate::playfield::Playfield;
use crate::randomizer::{RandomShapes, ShapeSource};
use crate::score;
use crate::tetromino::Tetromino;
use tracing::{debug, info};

/// Seconds between automatic fall steps
pub const FALL_INTERVAL: f64 = 0.5;

/// Spawn origin of every new tetromino
pub const SPAWN_X: i32 = 4;
pub const SPAWN_Y: i32 = 0;

/// The game state: playfield, falling piece, score and fall timer.
///
/// A fresh state has no active tetromino; call [`GameState::spawn_tetromino`]
/// to start. Once `game_over` is set every command is a no-op until
/// [`GameState::reset`].
pub struct GameState {
    /// Stopped blocks
    playfield: Playfield,
    /// Current falling piece, absent before the first spawn and after game over
    active_tetromino: Option<Tetromino>,
    score: u32,
    game_over: bool,
    /// Seconds accumulated since the last automatic fall
    fall_timer: f64,
    fall_interval: f64,
    /// Where new shapes come from
    shapes: Box<dyn ShapeSource>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Create an empty, inactive game with entropy-seeded shapes
    pub fn new() -> Self {
        Self::with_shapes(RandomShapes::new())
    }

    /// Create an empty, inactive game drawing shapes from `shapes`
    pub fn with_shapes(shapes: impl ShapeSource + 'static) -> Self {
        Self {
            playfield: Playfield::new(),
            active_tetromino: None,
            score: 0,
            game_over: false,
            fall_timer: 0.0,
            fall_interval: FALL_INTERVAL,
            shapes: Box::new(shapes),
        }
    }

    pub fn playfield(&self) -> &Playfield {
        &self.playfield
    }

    pub fn active_tetromino(&self) -> Option<&Tetromino> {
        self.active_tetromino.as_ref()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn fall_timer(&self) -> f64 {
        self.fall_timer
    }

    pub fn fall_interval(&self) -> f64 {
        self.fall_interval
    }

    /// Start over with an empty playfield. Does not spawn.
    pub fn reset(&mut self) {
        self.playfield = Playfield::new();
        self.active_tetromino = None;
        self.score = 0;
        self.game_over = false;
        self.fall_timer = 0.0;
        debug!("game reset");
    }

    /// Spawn a random tetromino at the spawn point.
    ///
    /// Returns `None` if the game is already over, or if the spawn point is
    /// blocked, in which case the game ends.
    pub fn spawn_tetromino(&mut self) -> Option<Tetromino> {
        if self.game_over {
            return None;
        }

        let shape = self.shapes.next_shape();
        let tetromino = Tetromino::at(shape, SPAWN_X, SPAWN_Y);

        if !self.playfield.is_valid_position(&tetromino) {
            info!(score = self.score, %shape, "spawn blocked, game over");
            self.end_game();
            return None;
        }

        debug!(%shape, "spawned tetromino");
        self.active_tetromino = Some(tetromino);
        Some(tetromino)
    }

    pub fn move_active_left(&mut self) -> bool {
        self.try_replace(|t| t.move_by(-1, 0))
    }

    pub fn move_active_right(&mut self) -> bool {
        self.try_replace(|t| t.move_by(1, 0))
    }

    /// Rotate clockwise in place. A blocked rotation is rejected outright,
    /// no alternative offsets are tried.
    pub fn rotate_active(&mut self) -> bool {
        self.try_replace(Tetromino::rotate_clockwise)
    }

    /// Drop the active tetromino as far as it goes and lock it
    pub fn hard_drop(&mut self) {
        if self.game_over {
            return;
        }
        let Some(mut tetromino) = self.active_tetromino else {
            return;
        };

        loop {
            let moved = tetromino.move_by(0, 1);
            if !self.playfield.is_valid_position(&moved) {
                break;
            }
            tetromino = moved;
        }

        self.active_tetromino = Some(tetromino);
        self.lock_tetromino();
    }

    /// Lock the active tetromino into the playfield, score it, clear rows and
    /// spawn the next piece (unless the stack reached the top row)
    pub fn lock_tetromino(&mut self) {
        if self.game_over {
            return;
        }
        let Some(tetromino) = self.active_tetromino.take() else {
            return;
        };

        self.playfield.add_tetromino(&tetromino);

        let complete_rows = self.playfield.get_complete_rows();
        if !complete_rows.is_empty() {
            self.playfield.clear_rows(&complete_rows);
        }
        self.score += score::lock_award(complete_rows.len());
        debug!(
            shape = %tetromino.shape_type(),
            x = tetromino.x(),
            y = tetromino.y(),
            rows_cleared = complete_rows.len(),
            score = self.score,
            "locked tetromino"
        );

        if self.playfield.is_game_over() {
            info!(score = self.score, "stack reached the top row, game over");
            self.end_game();
            return;
        }

        self.spawn_tetromino();
    }

    /// Advance the fall timer by `delta_time` seconds.
    ///
    /// At most one fall step (or one lock) happens per call; time beyond one
    /// interval is dropped, not carried into the next call.
    pub fn update(&mut self, delta_time: f64) {
        if self.game_over {
            return;
        }
        let Some(tetromino) = self.active_tetromino else {
            return;
        };

        self.fall_timer += delta_time;
        if self.fall_timer < self.fall_interval {
            return;
        }
        self.fall_timer = 0.0;

        let moved = tetromino.move_by(0, 1);
        if self.playfield.is_valid_position(&moved) {
            self.active_tetromino = Some(moved);
        } else {
            self.lock_tetromino();
        }
    }

    /// Check whether `tetromino` shifted by (dx, dy) fits the playfield
    pub fn can_move(&self, tetromino: &Tetromino, dx: i32, dy: i32) -> bool {
        self.playfield.is_valid_position(&tetromino.move_by(dx, dy))
    }

    /// Replace the active tetromino with `transform(active)` if the result fits
    fn try_replace(&mut self, transform: impl FnOnce(&Tetromino) -> Tetromino) -> bool {
        if self.game_over {
            return false;
        }
        let Some(tetromino) = &self.active_tetromino else {
            return false;
        };

        let candidate = transform(tetromino);
        if !self.playfield.is_valid_position(&candidate) {
            return false;
        }
        self.active_tetromino = Some(candidate);
        true
    }

    fn end_game(&mut self) {
        self.game_over = true;
        self.active_tetromino = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playfield::{Cell, PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH};
    use crate::tetromino::{Rgb, ShapeType};
    use proptest::prelude::*;

    const GRAY: Rgb = Rgb(128, 128, 128);

    fn game_with(shape: ShapeType) -> GameState {
        GameState::with_shapes(move || shape)
    }

    fn fill(game: &mut GameState, x: i32, y: i32) {
        game.playfield.set_cell(x, y, Cell::Filled(GRAY)).unwrap();
    }

    #[test]
    fn test_new_game_is_inactive() {
        let game = GameState::new();
        assert!(game.active_tetromino().is_none());
        assert_eq!(game.score(), 0);
        assert!(!game.is_game_over());
        assert_eq!(game.fall_timer(), 0.0);
        assert_eq!(game.fall_interval(), 0.5);
        assert!(game.playfield().is_empty());
    }

    #[test]
    fn test_spawn_position() {
        let mut game = GameState::new();
        let spawned = game.spawn_tetromino().unwrap();
        assert_eq!((spawned.x(), spawned.y(), spawned.rotation()), (4, 0, 0));
        assert_eq!(game.active_tetromino(), Some(&spawned));
    }

    #[test]
    fn test_move_left_and_right() {
        let mut game = game_with(ShapeType::O);
        game.spawn_tetromino();
        assert!(game.move_active_left());
        assert_eq!(game.active_tetromino().unwrap().x(), 3);
        assert!(game.move_active_right());
        assert!(game.move_active_right());
        assert_eq!(game.active_tetromino().unwrap().x(), 5);
    }

    #[test]
    fn test_move_blocked_by_wall() {
        let mut game = game_with(ShapeType::O);
        game.spawn_tetromino();
        for _ in 0..4 {
            assert!(game.move_active_left());
        }
        let before = *game.active_tetromino().unwrap();
        assert!(!game.move_active_left());
        assert_eq!(game.active_tetromino(), Some(&before));
    }

    #[test]
    fn test_move_blocked_by_stopped_block() {
        let mut game = game_with(ShapeType::O);
        game.spawn_tetromino();
        fill(&mut game, 6, 1);
        assert!(!game.move_active_right());
        assert_eq!(game.active_tetromino().unwrap().x(), 4);
    }

    #[test]
    fn test_commands_without_active_piece() {
        let mut game = GameState::new();
        assert!(!game.move_active_left());
        assert!(!game.move_active_right());
        assert!(!game.rotate_active());
        game.hard_drop();
        game.update(10.0);
        game.lock_tetromino();
        assert_eq!(game.score(), 0);
        assert!(game.playfield().is_empty());
        assert_eq!(game.fall_timer(), 0.0);
    }

    #[test]
    fn test_rotate() {
        let mut game = game_with(ShapeType::T);
        game.spawn_tetromino();
        assert!(game.rotate_active());
        let active = game.active_tetromino().unwrap();
        assert_eq!(active.rotation(), 1);
        assert_eq!((active.x(), active.y()), (4, 0));
    }

    #[test]
    fn test_rotation_rejected_without_kick() {
        let mut game = game_with(ShapeType::I);
        game.spawn_tetromino();
        // Upright I needs (5, 0..=3); block one of them
        fill(&mut game, 5, 2);
        assert!(!game.rotate_active());
        let active = game.active_tetromino().unwrap();
        assert_eq!((active.x(), active.y(), active.rotation()), (4, 0, 0));
    }

    #[test]
    fn test_single_lock_no_clear() {
        let mut game = GameState::new();
        game.spawn_tetromino();
        game.hard_drop();
        assert_eq!(game.score(), 4);
        assert!(!game.is_game_over());
        let next = game.active_tetromino().unwrap();
        assert_eq!((next.x(), next.y(), next.rotation()), (4, 0, 0));
        assert!(!game.playfield().is_empty());
    }

    #[test]
    fn test_hard_drop_rests_on_floor() {
        let mut game = game_with(ShapeType::O);
        game.spawn_tetromino();
        game.hard_drop();
        let color = Cell::Filled(ShapeType::O.color());
        for (x, y) in [(4, 18), (5, 18), (4, 19), (5, 19)] {
            assert_eq!(game.playfield().get_cell(x, y), Ok(color));
        }
    }

    #[test]
    fn test_hard_drop_rests_on_stack() {
        let mut game = game_with(ShapeType::O);
        fill(&mut game, 4, 10);
        game.spawn_tetromino();
        game.hard_drop();
        let color = Cell::Filled(ShapeType::O.color());
        assert_eq!(game.playfield().get_cell(4, 9), Ok(color));
        assert_eq!(game.playfield().get_cell(4, 8), Ok(color));
    }

    #[test]
    fn test_full_row_clear() {
        let mut game = game_with(ShapeType::O);
        for x in 0..9 {
            fill(&mut game, x, 19);
        }
        fill(&mut game, 0, 18);
        // Upright I occupying column 9
        game.active_tetromino = Some(Tetromino::new(ShapeType::I, 8, 0, 1).unwrap());
        game.hard_drop();

        assert_eq!(game.score(), 14);
        let field = game.playfield();
        // Row 19 now holds former row 18: the gray block and one I block
        assert_eq!(field.get_cell(0, 19), Ok(Cell::Filled(GRAY)));
        assert_eq!(field.get_cell(9, 19), Ok(Cell::Filled(ShapeType::I.color())));
        assert_eq!(field.get_cell(1, 19), Ok(Cell::Empty));
        assert_eq!(field.get_cell(9, 17), Ok(Cell::Filled(ShapeType::I.color())));
        assert_eq!(field.get_cell(9, 16), Ok(Cell::Empty));
        assert!(field.get_complete_rows().is_empty());
        assert!(!game.is_game_over());
    }

    #[test]
    fn test_double_clear_scores_per_row() {
        let mut game = game_with(ShapeType::O);
        for y in [18, 19] {
            for x in 0..8 {
                fill(&mut game, x, y);
            }
        }
        game.active_tetromino = Some(Tetromino::at(ShapeType::O, 8, 0));
        game.hard_drop();
        assert_eq!(game.score(), 4 + 20);
        // Only the newly spawned piece remains, nothing on the board
        assert!(game.playfield().is_empty());
    }

    #[test]
    fn test_spawn_blocked_ends_game() {
        let mut game = game_with(ShapeType::O);
        fill(&mut game, 4, 0);
        assert!(game.spawn_tetromino().is_none());
        assert!(game.is_game_over());
        assert!(game.active_tetromino().is_none());
    }

    #[test]
    fn test_top_out_detected() {
        let mut game = game_with(ShapeType::O);
        for y in 1..PLAYFIELD_HEIGHT as i32 {
            for x in 0..PLAYFIELD_WIDTH as i32 {
                if x != 0 {
                    fill(&mut game, x, y);
                }
            }
        }
        assert!(!game.playfield().is_game_over());
        fill(&mut game, 5, 0);
        assert!(game.playfield().is_game_over());
    }

    #[test]
    fn test_lock_in_top_row_ends_game() {
        let mut game = game_with(ShapeType::O);
        // Stack column 4 up to row 2 so the next O locks across rows 0-1
        for y in 2..PLAYFIELD_HEIGHT as i32 {
            fill(&mut game, 4, y);
        }
        game.spawn_tetromino();
        game.hard_drop();
        assert!(game.is_game_over());
        assert!(game.active_tetromino().is_none());
        assert_eq!(game.score(), 4);
    }

    #[test]
    fn test_frozen_after_game_over() {
        let mut game = game_with(ShapeType::O);
        fill(&mut game, 4, 0);
        game.spawn_tetromino();
        assert!(game.is_game_over());

        let field = game.playfield().clone();
        assert!(!game.move_active_left());
        assert!(!game.move_active_right());
        assert!(!game.rotate_active());
        game.hard_drop();
        game.update(5.0);
        game.lock_tetromino();
        assert!(game.spawn_tetromino().is_none());

        assert_eq!(game.score(), 0);
        assert_eq!(game.playfield(), &field);
        assert!(game.active_tetromino().is_none());
    }

    #[test]
    fn test_reset_after_game_over() {
        let mut game = game_with(ShapeType::O);
        game.spawn_tetromino();
        game.hard_drop();
        fill(&mut game, 4, 0);
        game.active_tetromino = None;
        game.spawn_tetromino();
        assert!(game.is_game_over());

        game.reset();
        assert!(!game.is_game_over());
        assert_eq!(game.score(), 0);
        assert!(game.playfield().is_empty());
        assert!(game.active_tetromino().is_none());
        assert!(game.spawn_tetromino().is_some());
    }

    #[test]
    fn test_update_accumulates_time() {
        let mut game = game_with(ShapeType::O);
        game.spawn_tetromino();
        game.update(0.25);
        assert_eq!(game.active_tetromino().unwrap().y(), 0);
        assert_eq!(game.fall_timer(), 0.25);
        game.update(0.25);
        assert_eq!(game.active_tetromino().unwrap().y(), 1);
        assert_eq!(game.fall_timer(), 0.0);
    }

    #[test]
    fn test_update_drops_excess_time() {
        let mut game = game_with(ShapeType::O);
        game.spawn_tetromino();
        game.update(100.0);
        assert_eq!(game.active_tetromino().unwrap().y(), 1);
        assert_eq!(game.fall_timer(), 0.0);
        game.update(0.1);
        assert_eq!(game.active_tetromino().unwrap().y(), 1);
    }

    #[test]
    fn test_update_locks_on_ground() {
        let mut game = game_with(ShapeType::O);
        game.active_tetromino = Some(Tetromino::at(ShapeType::O, 0, 18));
        game.update(0.5);
        assert_eq!(game.score(), 4);
        assert_eq!(
            game.playfield().get_cell(0, 19),
            Ok(Cell::Filled(ShapeType::O.color()))
        );
        let next = game.active_tetromino().unwrap();
        assert_eq!((next.x(), next.y()), (SPAWN_X, SPAWN_Y));
    }

    #[test]
    fn test_can_move() {
        let mut game = GameState::new();
        let piece = Tetromino::at(ShapeType::O, 0, 0);
        assert!(game.can_move(&piece, 1, 1));
        assert!(!game.can_move(&piece, -1, 0));
        fill(&mut game, 2, 0);
        assert!(!game.can_move(&piece, 1, 0));
        assert!(game.playfield().get_cell(0, 0) == Ok(Cell::Empty));
    }

    #[derive(Debug, Clone, Copy)]
    enum Command {
        Left,
        Right,
        Rotate,
        HardDrop,
        Update(f64),
    }

    fn any_command() -> impl Strategy<Value = Command> {
        prop_oneof![
            Just(Command::Left),
            Just(Command::Right),
            Just(Command::Rotate),
            Just(Command::HardDrop),
            (0.0f64..1.5).prop_map(Command::Update),
        ]
    }

    proptest! {
        #[test]
        fn score_never_decreases(seed: u64, commands in prop::collection::vec(any_command(), 1..200)) {
            let mut game = GameState::with_shapes(RandomShapes::with_seed(seed));
            game.spawn_tetromino();
            let mut last_score = game.score();
            for command in commands {
                let before = game.score();
                match command {
                    Command::Left => { game.move_active_left(); }
                    Command::Right => { game.move_active_right(); }
                    Command::Rotate => { game.rotate_active(); }
                    Command::HardDrop => game.hard_drop(),
                    Command::Update(dt) => game.update(dt),
                }
                prop_assert!(game.score() >= last_score);
                let gained = game.score() - before;
                prop_assert!(gained == 0 || (gained >= 4 && (gained - 4) % 10 == 0));
                if game.is_game_over() {
                    prop_assert!(game.active_tetromino().is_none());
                } else if let Some(active) = game.active_tetromino() {
                    prop_assert!(game.playfield().is_valid_position(active));
                }
                last_score = game.score();
            }
        }
    }
}
