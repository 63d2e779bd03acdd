use std::{io, net::SocketAddr, time::Duration};

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ox2048_engine::Direction;
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout},
    text::Text,
};

use crate::{
    remote::{NewGame, SharedGame},
    ui::widgets::{GameDisplay, style},
};

/// Remote moves show up after at most this long.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Move(Direction),
    Undo,
    Restart,
    Quit,
}

impl Action {
    fn from_key(code: KeyCode) -> Option<Self> {
        let action = match code {
            KeyCode::Left | KeyCode::Char('h' | 'a') => Self::Move(Direction::Left),
            KeyCode::Right | KeyCode::Char('l' | 'd') => Self::Move(Direction::Right),
            KeyCode::Up | KeyCode::Char('k' | 'w') => Self::Move(Direction::Up),
            KeyCode::Down | KeyCode::Char('j' | 's') => Self::Move(Direction::Down),
            KeyCode::Char('u') => Self::Undo,
            KeyCode::Char('r') => Self::Restart,
            KeyCode::Char('q') | KeyCode::Esc => Self::Quit,
            _ => return None,
        };
        Some(action)
    }
}

#[derive(Debug)]
pub struct PlayApp {
    game: SharedGame,
    new_game: NewGame,
    listen_addr: Option<SocketAddr>,
    is_exiting: bool,
}

impl PlayApp {
    pub fn new(game: SharedGame, new_game: NewGame, listen_addr: Option<SocketAddr>) -> Self {
        Self {
            game,
            new_game,
            listen_addr,
            is_exiting: false,
        }
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> io::Result<()> {
        while !self.is_exiting {
            terminal.draw(|frame| self.draw(frame))?;
            if event::poll(POLL_INTERVAL)? {
                self.handle_event(&event::read()?);
            }
        }
        Ok(())
    }

    fn draw(&self, frame: &mut Frame<'_>) {
        let game = self.game.lock();
        let title = match self.listen_addr {
            Some(addr) => format!("2048 @ {addr}"),
            None => "2048".to_owned(),
        };
        let display = GameDisplay::new(&game).title(title);
        let help_text = if game.is_terminal() {
            "Controls: U (Undo) | R (Restart) | Q (Quit)"
        } else {
            "Controls: ← → ↑ ↓ / HJKL / WASD (Move) | U (Undo) | R (Restart) | Q (Quit)"
        };
        let help_text = Text::from(help_text).style(style::HELP).centered();

        let [main_area, help_area] =
            Layout::vertical([Constraint::Length(14), Constraint::Length(1)])
                .areas::<2>(frame.area());
        frame.render_widget(display, main_area);
        frame.render_widget(help_text, help_area);
    }

    fn handle_event(&mut self, event: &Event) {
        let Some(key) = event.as_key_event() else {
            return;
        };
        if key.kind != KeyEventKind::Press {
            return;
        }
        let Some(action) = Action::from_key(key.code) else {
            return;
        };

        let mut game = self.game.lock();
        match action {
            Action::Move(direction) => _ = game.play(direction),
            Action::Undo => _ = game.undo(),
            Action::Restart => self.new_game.start(&mut game),
            Action::Quit => self.is_exiting = true,
        }
    }
}
