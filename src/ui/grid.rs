use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Widget},
};

use crate::engine::Position;

pub const CELL_WIDTH: u16 = 7;
pub const CELL_HEIGHT: u16 = 3;
pub const GRID_WIDTH: u16 = CELL_WIDTH * 3;
pub const GRID_HEIGHT: u16 = CELL_HEIGHT * 3;

/// The 3x3 board with at most one lit cell.
pub struct Grid {
    pub lit: Option<Position>,
}

impl Widget for Grid {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(CELL_HEIGHT); 3])
            .split(area);

        for (r, row) in rows.iter().enumerate() {
            let cells = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(CELL_WIDTH); 3])
                .split(*row);

            for (c, cell) in cells.iter().enumerate() {
                let lit = self
                    .lit
                    .is_some_and(|p| p.row() as usize == r && p.col() as usize == c);
                let style = if lit {
                    Style::default().fg(Color::Blue).bg(Color::Blue)
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                Block::default()
                    .borders(Borders::ALL)
                    .style(style)
                    .render(*cell, buf);
            }
        }
    }
}
