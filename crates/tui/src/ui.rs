//! Rendering for the performer page demo.
//!
//! Responsibilities:
//! - Draw the performer header, tab bar, and editor state.
//! - Show every bound combination with its stack depth and pause state.
//! - Draw the help overlay while it is open.
//!
//! Does NOT handle:
//! - State mutation; rendering only reads `App`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};

use crate::action::Tab;
use crate::app::App;

const HELP_TEXT: &str = r#"
Page:
  f       Toggle favourite
  r 0-5   Set rating (r 0 clears)
  a s l i m  Switch tab
  e       Edit performer
  p       Lock / unlock rating keys
  q       Quit

Editor:
  r 0-5   Set draft rating
  s s     Save (when changed)
  d d     Discard
  Esc     Close

Press any key to close.
"#;

/// Render the whole screen.
pub fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(6),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[1]);
    render_page(f, app, body[0]);
    render_bindings(f, app, body[1]);

    render_footer(f, app, chunks[2]);

    if app.help_open() {
        render_help(f);
    }
}

fn stars(rating: Option<u8>) -> String {
    let filled = usize::from(rating.unwrap_or(0).min(5));
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let performer = app.performer();
    let heart = if performer.favorite { "♥" } else { "♡" };
    let mut rating = Span::raw(stars(performer.rating));
    if app.rating_locked() {
        rating = rating.style(Style::default().fg(Color::DarkGray));
    }

    let tabs: Vec<Span> = Tab::ALL
        .iter()
        .flat_map(|(tab, key)| {
            let style = if *tab == app.tab() {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            [
                Span::styled(format!("[{key}] {}", tab.label()), style),
                Span::raw("  "),
            ]
        })
        .collect();

    let lines = vec![
        Line::from(vec![
            Span::styled(
                "Performer ",
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(heart, Style::default().fg(Color::Red)),
            Span::raw("  "),
            rating,
        ]),
        Line::from(tabs),
    ];

    let header = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
    f.render_widget(header, area);
}

fn render_page(f: &mut Frame, app: &App, area: Rect) {
    let text = match app.editor() {
        Some(editor) => {
            let state = if editor.is_dirty() { "unsaved" } else { "unchanged" };
            vec![
                Line::from(Span::styled(
                    "Editing",
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                )),
                Line::from(format!(
                    "Draft rating: {} ({state})",
                    stars(editor.draft_rating())
                )),
            ]
        }
        None => vec![Line::from(format!("{} tab", app.tab().label()))],
    };

    let title = if app.editor().is_some() { "Edit" } else { "View" };
    let page = Paragraph::new(text)
        .block(Block::default().title(title).borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    f.render_widget(page, area);
}

fn render_bindings(f: &mut Frame, app: &App, area: Rect) {
    let registry = app.registry();
    let items: Vec<ListItem> = registry
        .combinations()
        .into_iter()
        .map(|combo| {
            let depth = registry.depth(&combo);
            let paused = registry.is_paused(&combo);
            let mut line = format!("{combo:<6} x{depth}");
            if paused {
                line.push_str(" (paused)");
            }
            let style = if paused {
                Style::default().fg(Color::DarkGray)
            } else if depth > 1 {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };
            ListItem::new(line).style(style)
        })
        .collect();

    let list = List::new(items).block(Block::default().title("Bindings").borders(Borders::ALL));
    f.render_widget(list, area);
}

fn render_footer(f: &mut Frame, app: &App, area: Rect) {
    let history: Vec<&str> = app.history().collect();
    let mut spans = vec![Span::raw(format!("Recent: {}", history.join(", ")))];
    if let Some(status) = app.status() {
        spans.push(Span::raw("  |  "));
        spans.push(Span::styled(status, Style::default().fg(Color::Green)));
    }
    let footer = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title("? help"));
    f.render_widget(footer, area);
}

fn render_help(f: &mut Frame) {
    let area = centered_rect(60, 70, f.area());
    f.render_widget(Clear, area);
    let help = Paragraph::new(HELP_TEXT)
        .block(
            Block::default()
                .title("Help")
                .borders(Borders::ALL)
                .style(Style::default().fg(Color::Cyan)),
        )
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: false });
    f.render_widget(help, area);
}

/// Create a centered rectangle with the given percentage of the screen size.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
