//! Board engine for the 2048 sliding-tile puzzle.
//!
//! - [`core`] holds the pure data types: [`Board`], [`Direction`] and [`MoveOutcome`].
//! - [`engine`] holds the stateful pieces: [`Game`] (score, undo, reset) and the
//!   replay-safe random source [`TileDraws`].
//!
//! Every driver (key handler, remote-control server, auto player) goes through
//! [`Board::slide`], so slide and merge rules exist exactly once.

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown direction {input:?}")]
pub struct ParseDirectionError {
    input: String,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseBoardError {
    #[display("unexpected character {found:?} at offset {offset}")]
    UnexpectedChar { found: char, offset: usize },
    #[display("tile value out of range at offset {offset}")]
    TileOutOfRange { offset: usize },
    #[display("expected 16 tiles, found {found}")]
    TileCount { found: usize },
    #[display("invalid tile value {value}")]
    InvalidTile { value: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid seed {input:?}: expected 32 hex digits")]
pub struct ParseSeedError {
    input: String,
}
