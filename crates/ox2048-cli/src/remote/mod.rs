//! Remote control over TCP.
//!
//! A line protocol that lets another program play a shared [`Game`]: one command per
//! line, one newline-terminated response per command. See [`protocol`] for the
//! commands, [`server`] for the tokio listener and [`client`] for the blocking
//! connection used by the auto player.

use std::sync::Arc;

use ox2048_engine::{DrawSeed, Game};
use parking_lot::Mutex;

pub(crate) mod client;
pub(crate) mod protocol;
pub(crate) mod server;

/// Port used when an address does not name one.
pub(crate) const DEFAULT_PORT: u16 = 2048;

/// Game shared between the terminal UI and remote-control connections.
pub(crate) type SharedGame = Arc<Mutex<Game>>;

/// How `start` begins the next game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NewGame {
    /// Reseed the tile draws from OS entropy.
    Reseed,
    /// Keep taking tiles from the current draws, so a seeded session replays as a whole.
    ContinueDraws,
}

impl NewGame {
    /// Sessions started from an explicit seed stay reproducible across games.
    pub(crate) fn for_seed(seed: Option<DrawSeed>) -> Self {
        if seed.is_some() {
            Self::ContinueDraws
        } else {
            Self::Reseed
        }
    }

    pub(crate) fn start(self, game: &mut Game) {
        match self {
            Self::Reseed => game.reset(),
            Self::ContinueDraws => game.restart(),
        }
    }
}
