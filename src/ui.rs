pub mod grid;
pub mod screen;

use std::time::Instant;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::{
    app::{App, POSITION_KEY, WORD_KEY},
    engine::{Channel, ResponseOutcome, SessionPhase},
};
use grid::{Grid, GRID_HEIGHT, GRID_WIDTH};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;
const BUTTON_WIDTH: u16 = 20;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.phase() {
            SessionPhase::Idle => render_idle(self, area, buf),
            SessionPhase::Playing => render_playing(self, area, buf, Instant::now()),
            SessionPhase::Result => render_result(self, area, buf),
        }
    }
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn italic() -> Style {
    Style::default().add_modifier(Modifier::ITALIC)
}

/// A `width` x `height` rect centered in `area`, clipped to fit.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_idle(app: &App, area: Rect, buf: &mut Buffer) {
    let s = &app.settings;
    let mut lines = vec![
        Line::from(Span::styled(
            format!("Dual {}-Back", s.lag),
            bold().fg(Color::Cyan),
        )),
        Line::from(""),
        Line::from(format!(
            "Watch the grid and the word. When the current one matches the one {} step{} back, press:",
            s.lag,
            if s.lag == 1 { "" } else { "s" }
        )),
        Line::from(vec![
            Span::styled(format!("({POSITION_KEY})"), bold()),
            Span::raw(" position match    "),
            Span::styled(format!("({WORD_KEY})"), bold()),
            Span::raw(" word match"),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::raw("N = "),
            Span::styled(s.lag.to_string(), bold().fg(Color::Yellow)),
            Span::styled("   (↑/↓ to change)", italic()),
        ]),
        Line::from(Span::styled(
            format!(
                "Words: {} | Trials: {} | Stimulus: {} ms | Gap: {} ms",
                s.pool_label(),
                s.trials,
                s.step_ms,
                s.gap_ms
            ),
            Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
        )),
        Line::from(""),
    ];

    if let Some(notice) = &app.notice {
        lines.push(Line::from(Span::styled(
            notice.clone(),
            bold().fg(Color::Red),
        )));
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(
        "(enter) start / (esc)ape",
        italic(),
    )));

    let height = lines.len() as u16;
    let body = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    let inner = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([Constraint::Min(0)])
        .split(area)[0];
    body.render(centered(inner, inner.width, height + 2), buf);
}

fn render_playing(app: &App, area: Rect, buf: &mut Buffer, now: Instant) {
    let session = &app.session;
    let Some(step) = session.current_step() else {
        return;
    };
    let lag = session.config().map_or(app.settings.lag, |c| c.lag);
    let visible = session.stimulus_visible(now);
    let responded = session.response_state();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1),           // title
            Constraint::Length(1),           // padding
            Constraint::Length(GRID_HEIGHT), // grid
            Constraint::Length(1),           // padding
            Constraint::Length(3),           // word
            Constraint::Length(1),           // padding
            Constraint::Length(3),           // buttons
            Constraint::Length(1),           // progress / hint
            Constraint::Min(0),
        ])
        .split(area);

    Paragraph::new(Span::styled(format!("Dual {lag}-Back"), bold()))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

    Grid {
        lit: visible.then_some(step.position),
    }
    .render(centered(chunks[2], GRID_WIDTH, GRID_HEIGHT), buf);

    let word = if visible { step.word.as_str() } else { "" };
    let word_width = (step.word.width() as u16).max(4) + 4;
    Paragraph::new(Span::styled(word, bold().fg(Color::Blue)))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL))
        .render(centered(chunks[4], word_width, 3), buf);

    let buttons = centered(chunks[6], BUTTON_WIDTH * 2 + 2, 3);
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(BUTTON_WIDTH),
            Constraint::Length(2),
            Constraint::Length(BUTTON_WIDTH),
        ])
        .split(buttons);
    for (channel, slot, color) in [
        (Channel::Position, halves[0], Color::Blue),
        (Channel::Word, halves[2], Color::Green),
    ] {
        let (label, key) = match channel {
            Channel::Position => ("position", POSITION_KEY),
            Channel::Word => ("word", WORD_KEY),
        };
        let style = if responded.has_responded(channel) {
            Style::default().fg(Color::DarkGray)
        } else {
            bold().fg(color)
        };
        Paragraph::new(format!("({key}) {label}"))
            .alignment(Alignment::Center)
            .style(style)
            .block(Block::default().borders(Borders::ALL))
            .render(slot, buf);
    }

    let footer = match app.last_response {
        Some((_, ResponseOutcome::Ignored)) => Span::styled(
            format!(
                "need {lag} earlier step{} before anything can match",
                if lag == 1 { "" } else { "s" }
            ),
            italic().fg(Color::Yellow),
        ),
        _ => Span::styled(
            format!("step {} / {}   (esc) stop", step.index + 1, step.total),
            Style::default().fg(Color::Gray),
        ),
    };
    Paragraph::new(footer)
        .alignment(Alignment::Center)
        .render(chunks[7], buf);
}

fn render_result(app: &App, area: Rect, buf: &mut Buffer) {
    let tally = app.session.tally();

    let row = |channel: Channel| {
        let rate = tally
            .hit_rate(channel)
            .map_or_else(|| "no targets".to_string(), |r| format!("{r:.0}% caught"));
        Line::from(vec![
            Span::styled(format!("{channel:<9}"), bold()),
            Span::styled(
                format!("hits {:>3}", tally.hits(channel)),
                bold().fg(Color::Green),
            ),
            Span::raw("   "),
            Span::styled(
                format!("misses {:>3}", tally.misses(channel)),
                Style::default().fg(Color::Red),
            ),
            Span::raw("   "),
            Span::styled(rate, italic()),
        ])
    };

    let lines = vec![
        Line::from(Span::styled("Session complete", bold().fg(Color::Cyan))),
        Line::from(""),
        row(Channel::Position),
        row(Channel::Word),
        Line::from(""),
        Line::from(Span::styled("(enter) back / (esc)ape", italic())),
    ];
    let height = lines.len() as u16;
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(centered(area, area.width, height), buf);
}
