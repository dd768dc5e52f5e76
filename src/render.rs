use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Widget},
};

use crate::config::GameConfig;
use crate::game::{Cell, Snapshot};

pub const HEAD_COLOR: Color = Color::Rgb(0, 255, 0);
pub const BODY_COLOR: Color = Color::Rgb(0, 200, 0);
pub const FOOD_COLOR: Color = Color::Rgb(255, 0, 0);
pub const BACKGROUND_COLOR: Color = Color::Black;

// Upper half block: foreground paints the even row, background the odd one
const HALF_BLOCK: &str = "▀";
const TITLE: &str = " T-Snake 3 ";

/// Terminal rows needed for `grid_height` cells, two per row.
fn arena_rows(grid_height: i32) -> u16 {
    ((grid_height + 1) / 2) as u16
}

/// Smallest terminal (columns, rows) that shows the whole arena plus the
/// score bar.
pub fn required_size(config: &GameConfig) -> (u16, u16) {
    (
        config.grid_width() as u16 + 2,
        arena_rows(config.grid_height()) + 3,
    )
}

impl Widget for Snapshot<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [score_area, field_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(arena_rows(self.grid_height) + 2),
        ])
        .areas(area);
        let [block_area] = Layout::horizontal([Constraint::Length(self.grid_width as u16 + 2)])
            .flex(Flex::Center)
            .areas(field_area);

        Line::from(format!(" Score: {}", self.score))
            .style(Style::new().add_modifier(Modifier::BOLD))
            .render(score_area, buf);

        let title = if self.running { TITLE } else { " Game Over " };
        let block = Block::bordered().title(title);
        let arena = block.inner(block_area);
        block.render(block_area, buf);

        let mut canvas = Canvas { area: arena, buf };
        canvas.clear();
        canvas.paint(self.food, FOOD_COLOR);
        for &cell in self.body() {
            canvas.paint(cell, BODY_COLOR);
        }
        // Head last so it stays visible on a collision
        canvas.paint(self.head(), HEAD_COLOR);
    }
}

struct Canvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl Canvas<'_> {
    fn clear(&mut self) {
        for y in self.area.top()..self.area.bottom() {
            for x in self.area.left()..self.area.right() {
                self.buf[(x, y)]
                    .set_symbol(HALF_BLOCK)
                    .set_fg(BACKGROUND_COLOR)
                    .set_bg(BACKGROUND_COLOR);
            }
        }
    }

    fn paint(&mut self, cell: Cell, color: Color) {
        let (Ok(dx), Ok(dy)) = (u16::try_from(cell.x), u16::try_from(cell.y / 2)) else {
            return;
        };
        if cell.y < 0 || dx >= self.area.width || dy >= self.area.height {
            return;
        }

        let target = &mut self.buf[(self.area.x + dx, self.area.y + dy)];
        if cell.y % 2 == 0 {
            target.set_fg(color);
        } else {
            target.set_bg(color);
        }
    }
}
