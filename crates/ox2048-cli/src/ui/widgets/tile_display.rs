use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Widget},
};

use crate::ui::widgets::style;

/// One cell of the board: a filled rectangle with the tile value in the middle.
#[derive(Debug)]
pub struct TileDisplay {
    style: Style,
    label: String,
}

impl TileDisplay {
    pub const WIDTH: u16 = 7;
    pub const HEIGHT: u16 = 3;

    pub fn from_value(value: u32) -> Self {
        if value == 0 {
            Self {
                style: style::EMPTY_TILE,
                label: "·".to_owned(),
            }
        } else {
            Self {
                style: style::tile(value),
                label: value.to_string(),
            }
        }
    }
}

impl Widget for TileDisplay {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &TileDisplay {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Block::new().style(self.style).render(area, buf);
        Line::styled(self.label.as_str(), self.style.add_modifier(Modifier::BOLD))
            .centered()
            .render(area.centered_vertically(Constraint::Length(1)), buf);
    }
}
