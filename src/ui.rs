//! Terminal UI rendering with ratatui

use crate::app::App;
use crate::game::GameState;
use crate::high_scores::HighScoreEntry;
use crate::high_scores::MAX_SCORES;
use crate::playfield::{Cell, PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH};
use crate::screen::Screen;
use crate::tetromino::Rgb;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const EMPTY: &str = "  ";

/// Total width needed: board(22) + side panel(20) = 42
const GAME_WIDTH: u16 = 42;
/// Total height needed: board(20) + 2 for borders = 22
const GAME_HEIGHT: u16 = 22;

/// Names longer than this are cut in the high score table
const NAME_DISPLAY_LEN: usize = 15;

impl From<Rgb> for Color {
    fn from(Rgb(r, g, b): Rgb) -> Self {
        Color::Rgb(r, g, b)
    }
}

/// Render whichever screen is current
pub fn render(frame: &mut Frame, app: &App) {
    let screens = app.screens();
    match screens.current() {
        Screen::Start => render_start(frame, app.high_scores().top_scores(MAX_SCORES)),
        Screen::Game => {
            render_game(frame, app.game(), app.settings().visual.block_chars());
            if app.showing_game_over_overlay() {
                let area = frame.area();
                let subtitle = format!("Score: {}", app.game().score());
                render_overlay(frame, area, "GAME OVER", &subtitle);
            }
        }
        Screen::GameOver => render_game_over(frame, app.game().score()),
        Screen::NameEntry => render_name_entry(frame, app.game().score(), screens.player_name()),
        Screen::HighScores => render_high_scores(frame, app.high_scores().top_scores(MAX_SCORES)),
    }
}

/// Center a rect within another rect
fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

fn title_line(text: &str) -> Line<'_> {
    Line::styled(text, Style::default().fg(Color::Cyan).bold())
}

fn hint_line(text: &str) -> Line<'_> {
    Line::styled(text, Style::default().fg(Color::DarkGray))
}

/// Render the start screen: title, prompt and the current top scores
fn render_start(frame: &mut Frame, scores: &[HighScoreEntry]) {
    let area = center_rect(frame.area(), 44, 22);

    let mut lines = vec![
        Line::raw(""),
        title_line("T E T R I S"),
        Line::raw(""),
        Line::styled("Press SPACE to start", Style::default().fg(Color::Yellow)),
        Line::raw(""),
    ];
    if !scores.is_empty() {
        lines.push(Line::styled("HIGH SCORES", Style::default().fg(Color::Gray)));
        lines.extend(score_lines(scores));
        lines.push(Line::raw(""));
    }
    lines.push(hint_line("q / Esc to quit"));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let paragraph = Paragraph::new(lines).block(block).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

/// Rank, name and score rows for a high score table
fn score_lines(scores: &[HighScoreEntry]) -> Vec<Line<'static>> {
    scores
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let name: String = entry.name.chars().take(NAME_DISPLAY_LEN).collect();
            Line::from(vec![
                Span::styled(
                    format!("{:>3} {:<width$}", format!("{}.", i + 1), name, width = NAME_DISPLAY_LEN),
                    Style::default().fg(Color::White),
                ),
                Span::styled(format!("{:>8}", entry.score), Style::default().fg(Color::Yellow)),
            ])
        })
        .collect()
}

/// Render the playfield and side panel
pub fn render_game(frame: &mut Frame, game: &GameState, block_char: &str) {
    let game_area = center_rect(frame.area(), GAME_WIDTH, GAME_HEIGHT);

    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(22), // Board (10*2 + 2 for borders)
            Constraint::Length(20), // Score + controls
        ])
        .split(game_area);

    render_board(frame, layout[0], game, block_char);
    render_side_panel(frame, layout[1], game);
}

/// Render the playfield, row 0 at the top
fn render_board(frame: &mut Frame, area: Rect, game: &GameState, block_char: &str) {
    let block = Block::default()
        .title(" TETRIS ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let active = game.active_tetromino();
    let active_blocks = active.map(|t| t.absolute_blocks());

    let mut lines: Vec<Line> = Vec::with_capacity(PLAYFIELD_HEIGHT);
    for (y, row) in game.playfield().rows() {
        let mut spans = Vec::with_capacity(PLAYFIELD_WIDTH);
        for (x, cell) in row.iter().enumerate() {
            let is_active = active_blocks
                .is_some_and(|blocks| blocks.contains(&(x as i32, y as i32)));

            let span = match (is_active, active, cell) {
                (true, Some(t), _) => Span::styled(block_char, Style::default().fg(t.color().into())),
                (_, _, Cell::Filled(color)) => {
                    Span::styled(block_char, Style::default().fg((*color).into()))
                }
                _ => Span::styled(" .", Style::default().fg(Color::DarkGray)),
            };
            spans.push(span);
        }
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render score and controls
fn render_side_panel(frame: &mut Frame, area: Rect, game: &GameState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = vec![
        Line::from(Span::styled("SCORE", Style::default().fg(Color::Gray))),
        Line::from(Span::styled(
            format!("{}", game.score()),
            Style::default().fg(Color::Yellow).bold(),
        )),
        Line::raw(EMPTY),
        Line::from(Span::styled("CONTROLS", Style::default().fg(Color::Gray))),
        hint_line("←/→    Move"),
        hint_line("Space  Rotate"),
        hint_line("↓      Drop"),
        hint_line("q      Quit"),
    ];

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render the game over screen with the final score
fn render_game_over(frame: &mut Frame, score: u32) {
    let area = center_rect(frame.area(), 36, 9);
    let lines = vec![
        Line::raw(""),
        title_line("GAME OVER"),
        Line::raw(""),
        Line::styled(format!("Final Score: {score}"), Style::default().fg(Color::Yellow).bold()),
        Line::raw(""),
        hint_line("Press SPACE to continue"),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    frame.render_widget(Paragraph::new(lines).block(block).alignment(Alignment::Center), area);
}

/// Render the name entry screen for a new high score
fn render_name_entry(frame: &mut Frame, score: u32, name: &str) {
    let area = center_rect(frame.area(), 40, 12);
    let lines = vec![
        Line::raw(""),
        Line::styled("New High Score!", Style::default().fg(Color::Yellow).bold()),
        Line::styled(format!("Score: {score}"), Style::default().fg(Color::White)),
        Line::raw(""),
        Line::styled("Enter your name:", Style::default().fg(Color::White)),
        Line::from(vec![
            Span::styled(name.to_string(), Style::default().fg(Color::Yellow).bold()),
            Span::styled("_", Style::default().fg(Color::Yellow)),
        ]),
        Line::raw(""),
        hint_line("Press ENTER to submit"),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    frame.render_widget(Paragraph::new(lines).block(block).alignment(Alignment::Center), area);
}

/// Render the high score table
fn render_high_scores(frame: &mut Frame, scores: &[HighScoreEntry]) {
    let area = center_rect(frame.area(), 44, 18);
    let mut lines = vec![title_line("HIGH SCORES"), Line::raw("")];
    if scores.is_empty() {
        lines.push(Line::styled("No high scores yet!", Style::default().fg(Color::Gray)));
    } else {
        lines.extend(score_lines(scores));
    }
    lines.push(Line::raw(""));
    lines.push(hint_line("Press SPACE to return"));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    frame.render_widget(Paragraph::new(lines).block(block).alignment(Alignment::Center), area);
}

/// Render an overlay (for game over)
fn render_overlay(frame: &mut Frame, area: Rect, title: &str, subtitle: &str) {
    let popup_width = 24u16;
    let popup_height = 5u16;
    let popup_area = center_rect(area, popup_width, popup_height);

    // Clear the background
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let text = vec![
        Line::styled(title, Style::default().fg(Color::Yellow).bold()),
        Line::raw(""),
        Line::styled(subtitle, Style::default().fg(Color::Gray)),
    ];

    let paragraph = Paragraph::new(text).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}
