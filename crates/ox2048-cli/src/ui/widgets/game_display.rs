use ox2048_engine::Game;
use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Widget},
};

use crate::ui::widgets::{BoardDisplay, GameStatsDisplay, color, style};

/// Board and statistics side by side, with a banner once the game is over.
#[derive(Debug)]
pub struct GameDisplay<'a> {
    game: &'a Game,
    title: Option<String>,
}

impl<'a> GameDisplay<'a> {
    pub fn new(game: &'a Game) -> Self {
        Self { game, title: None }
    }

    pub fn title(self, title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..self
        }
    }
}

impl Widget for GameDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &GameDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let is_over = self.game.is_terminal();
        let border_style = if is_over { color::RED } else { color::WHITE };

        let mut board_block = Block::bordered()
            .border_style(border_style)
            .style(style::DEFAULT);
        if let Some(title) = &self.title {
            board_block = board_block.title(Line::from(title.as_str()).centered());
        }
        let board = BoardDisplay::new(self.game.board()).block(board_block);
        let stats = GameStatsDisplay::new(self.game).block(
            Block::bordered()
                .title(Line::from("STATS").centered())
                .padding(Padding::horizontal(1))
                .border_style(border_style)
                .style(style::DEFAULT),
        );

        let [board_column, stats_column] = Layout::horizontal([
            Constraint::Length(board.width()),
            Constraint::Length(stats.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);
        let [board_area] =
            Layout::vertical([Constraint::Length(board.height())]).areas(board_column);
        let [stats_area] =
            Layout::vertical([Constraint::Length(stats.height())]).areas(stats_column);

        let board_width = board.width();
        board.render(board_area, buf);
        stats.render(stats_area, buf);

        if is_over {
            let block = Block::new().style(style::GAME_OVER);
            let text = Text::styled("GAME OVER", style::GAME_OVER).centered();
            let area = board_area.centered(Constraint::Length(board_width), Constraint::Length(3));
            let inner = block.inner(area);
            Clear.render(area, buf);
            block.render(area, buf);
            text.render(inner.centered_vertically(Constraint::Length(1)), buf);
        }
    }
}
