use ratatui::{layout::Rect, widgets::Block as BlockWidget};

pub use self::{board_display::*, game_display::*, game_stats_display::*, tile_display::*};

mod board_display;
mod game_display;
mod game_stats_display;
mod tile_display;

mod color {
    use ratatui::style::Color;

    pub const RED: Color = Color::Rgb(255, 0, 0);
    pub const GRAY: Color = Color::Rgb(127, 127, 127);
    pub const DARK_GRAY: Color = Color::Rgb(60, 58, 50);
    pub const BLACK: Color = Color::Rgb(0, 0, 0);
    pub const WHITE: Color = Color::Rgb(255, 255, 255);
    pub const INK: Color = Color::Rgb(119, 110, 101);

    /// Tile backgrounds, indexed by `log2(value) - 1` (2, 4, ..., 2048).
    pub const TILES: [Color; 11] = [
        Color::Rgb(238, 228, 218),
        Color::Rgb(237, 224, 200),
        Color::Rgb(242, 177, 121),
        Color::Rgb(245, 149, 99),
        Color::Rgb(246, 124, 95),
        Color::Rgb(246, 94, 59),
        Color::Rgb(237, 207, 114),
        Color::Rgb(237, 204, 97),
        Color::Rgb(237, 200, 80),
        Color::Rgb(237, 197, 63),
        Color::Rgb(237, 194, 46),
    ];
}

pub mod style {
    use ratatui::style::{Color, Style};

    use crate::ui::widgets::color;

    const fn fg_bg(fg: Color, bg: Color) -> Style {
        Style::new().fg(fg).bg(bg)
    }

    pub const DEFAULT: Style = fg_bg(color::WHITE, color::BLACK);
    pub const HELP: Style = fg_bg(color::GRAY, color::BLACK);
    pub const EMPTY_TILE: Style = fg_bg(color::GRAY, color::DARK_GRAY);
    pub const GAME_OVER: Style = fg_bg(color::WHITE, color::RED);

    /// Style of a non-empty tile.
    pub fn tile(value: u32) -> Style {
        let rank = value.max(2).ilog2() as usize - 1;
        match color::TILES.get(rank) {
            Some(&bg) if rank < 2 => fg_bg(color::INK, bg),
            Some(&bg) => fg_bg(color::WHITE, bg),
            None => fg_bg(color::WHITE, color::BLACK),
        }
    }
}

fn block_vertical_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.height - inner_rect.height
}

fn block_horizontal_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.width - inner_rect.width
}
