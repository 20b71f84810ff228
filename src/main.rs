//! A classic terminal Tetris
//!
//! Ten by twenty field, seven tetrominoes, one fall step every half second.

// The core types carry a fuller API than the terminal front end calls
#![allow(dead_code)]

mod app;
mod game;
mod high_scores;
mod input;
mod playfield;
mod randomizer;
mod score;
mod screen;
mod settings;
mod tetromino;
mod ui;

use anyhow::Context;
use app::App;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use game::GameState;
use high_scores::HighScores;
use ratatui::{backend::CrosstermBackend, Terminal};
use settings::Settings;
use std::{
    io::{self, stdout},
    path::PathBuf,
    time::{Duration, Instant},
};

/// Target frame rate
const TARGET_FPS: u64 = 60;
const FRAME_DURATION: Duration = Duration::from_micros(1_000_000 / TARGET_FPS);

/// Get the temp directory used for logs, creating it if needed
fn tetris_temp_dir() -> PathBuf {
    let dir = std::env::temp_dir().join("tetris");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

fn main() -> anyhow::Result<()> {
    let session_id: u32 = rand::random();

    let log_dir = tetris_temp_dir();
    let log_file = format!("{:08x}.log", session_id);

    // Log to a file so the terminal UI stays clean
    let file_appender = tracing_appender::rolling::never(&log_dir, &log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tetris=debug".parse().context("invalid log directive")?),
        )
        .with_ansi(false)
        .init();

    tracing::info!(
        "tetris starting up, session={:08x}, log={}",
        session_id,
        log_dir.join(&log_file).display()
    );

    let settings = Settings::load();
    let high_scores = HighScores::load(settings.high_score_path());
    let mut app = App::new(settings, high_scores, GameState::new());

    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal before reporting anything
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;

    // Write the settings back so the file exists for editing
    if let Err(e) = app.settings().save() {
        tracing::warn!("could not save settings: {e:#}");
    }

    if result.is_ok() {
        println!("Thanks for playing! Final score: {}", app.game().score());
    }
    tracing::info!("tetris shutting down");

    result.context("terminal error")
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> io::Result<()> {
    let mut last_frame = Instant::now();

    while app.is_running() {
        terminal.draw(|frame| ui::render(frame, app))?;

        if event::poll(FRAME_DURATION)? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }

        let now = Instant::now();
        let delta = now.duration_since(last_frame).as_secs_f64();
        last_frame = now;
        app.tick(delta);
    }

    Ok(())
}
