//! Stateful game logic built on the pure [`core`](crate::core) types.
//!
//! - [`Game`] - Board, score, move counter and a single-slot undo history
//! - [`TileDraws`] - Replay-safe queue of raw random draws used for tile drops
//! - [`DrawSeed`] - Seed for deterministic tile drops
//!
//! # Game Flow
//!
//! 1. Create a [`Game`] (two tiles are dropped on an empty board)
//! 2. [`Game::play`] a direction: slide/merge, then drop one tile if anything moved
//! 3. Check [`Game::is_terminal`] once the board is full
//! 4. Optionally [`Game::undo`] the last move, or [`Game::reset`] / [`Game::restart`] to start over
//!
//! ```
//! use ox2048_engine::{Direction, Game};
//!
//! let mut game = Game::new();
//! while !game.is_terminal() {
//!     let moved = Direction::ALL
//!         .into_iter()
//!         .any(|dir| game.play(dir).moved());
//!     if !moved {
//!         break;
//!     }
//! }
//! assert!(game.board().is_full());
//! ```

pub use self::{game::*, tile_draws::*};

mod game;
mod tile_draws;
