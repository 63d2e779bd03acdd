use std::iter;

use ox2048_engine::{BOARD_SIZE, Board};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::TileDisplay;

#[expect(clippy::cast_possible_truncation)]
const GRID_SIZE: u16 = BOARD_SIZE as u16;

#[derive(Debug)]
pub struct BoardDisplay<'a> {
    board: &'a Board,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(board: &'a Board) -> Self {
        Self { board, block: None }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        GRID_SIZE * (TileDisplay::WIDTH + 1) - 1
            + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        GRID_SIZE * TileDisplay::HEIGHT + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let horizontal = Layout::horizontal([Constraint::Length(TileDisplay::WIDTH); BOARD_SIZE])
            .flex(Flex::Center)
            .spacing(1);
        let vertical = Layout::vertical([Constraint::Length(TileDisplay::HEIGHT); BOARD_SIZE]);

        let grid_cells = area
            .layout::<BOARD_SIZE>(&vertical)
            .into_iter()
            .map(|row| row.layout::<BOARD_SIZE>(&horizontal));

        for (grid_row, row) in iter::zip(grid_cells, self.board.rows()) {
            for (grid_cell, &value) in iter::zip(grid_row, row) {
                TileDisplay::from_value(value).render(grid_cell, buf);
            }
        }
    }
}
