//! Move scoring: the heuristics behind each playing strategy.
//!
//! A [`MoveScorer`] does two things for the [`DirectionEvaluator`]:
//!
//! 1. **Preferred order** - the order in which the four directions are tried. Ties
//!    between equally scored moves go to the direction tried first.
//! 2. **Move score** - a non-negative score for one simulated move. The evaluator adds
//!    1 to every score, so any valid move beats "no move found".
//!
//! # Strategies
//!
//! | Strategy | Order | Score |
//! |---|---|---|
//! | [`Strategy::Greedy`] | up, left, right, down | 0 (first valid move wins) |
//! | [`Strategy::MaxScore`] | up, left, right, down | merge score of the move |
//! | [`Strategy::Serpentine`] | re-ranked from the board | merge score + ordering bonus |
//!
//! ## Serpentine ordering
//!
//! The serpentine strategy tries to keep tiles sorted along a snake path: the top row
//! left to right, the second row right to left, the third row left to right and the
//! bottom row right to left. It rewards boards already close to that order and
//! re-ranks directions around the first "gap" on the path, see
//! [`SerpentineScorer::preferred_order`].
//!
//! [`DirectionEvaluator`]: crate::direction_evaluator::DirectionEvaluator

use std::fmt;

use ox2048_engine::{BOARD_SIZE, Board, CELL_COUNT, Direction, MoveOutcome, Position};
use serde::{Deserialize, Serialize};

/// Direction order shared by every strategy unless re-ranked.
pub const DEFAULT_ORDER: [Direction; Direction::LEN] = [
    Direction::Up,
    Direction::Left,
    Direction::Right,
    Direction::Down,
];

/// Scores simulated moves for the direction evaluator.
pub trait MoveScorer: fmt::Debug + Send + Sync {
    /// Returns the order in which directions are tried on `board`.
    fn preferred_order(&self, _board: &Board) -> [Direction; Direction::LEN] {
        DEFAULT_ORDER
    }

    /// Scores a move (higher is better).
    ///
    /// # Arguments
    /// * `board` - Board before the move
    /// * `outcome` - Result of sliding `board` in the direction being scored
    fn score_move(&self, board: &Board, outcome: &MoveOutcome) -> u64;
}

/// Takes the first direction that changes the board.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyScorer;

impl MoveScorer for GreedyScorer {
    fn score_move(&self, _board: &Board, _outcome: &MoveOutcome) -> u64 {
        0
    }
}

/// Takes the direction with the highest immediate merge score.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxScoreScorer;

impl MoveScorer for MaxScoreScorer {
    fn score_move(&self, _board: &Board, outcome: &MoveOutcome) -> u64 {
        outcome.score_delta()
    }
}

/// Merge score plus a bonus for keeping tiles sorted along the serpentine path.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerpentineScorer;

/// Snake path through the board, see the module documentation.
const SERPENTINE_PATH: [Position; CELL_COUNT] = serpentine_path();

const fn serpentine_path() -> [Position; CELL_COUNT] {
    let mut path = [Position::new(0, 0); CELL_COUNT];
    let mut i = 0;
    while i < CELL_COUNT {
        let row = i / BOARD_SIZE;
        let step = i % BOARD_SIZE;
        let col = if row % 2 == 0 {
            step
        } else {
            BOARD_SIZE - 1 - step
        };
        path[i] = Position::new(row, col);
        i += 1;
    }
    path
}

/// First point on the serpentine path where the board is not yet packed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PathGap {
    index: usize,
    is_empty_cell: bool,
}

impl SerpentineScorer {
    /// Finds the first empty cell on the path, or the first cell equal to its
    /// successor within the same path row.
    fn first_gap(board: &Board) -> Option<PathGap> {
        (0..CELL_COUNT).find_map(|index| {
            let value = board.tile(SERPENTINE_PATH[index]);
            if value == 0 {
                return Some(PathGap {
                    index,
                    is_empty_cell: true,
                });
            }
            let ends_row = index % BOARD_SIZE == BOARD_SIZE - 1;
            (!ends_row && board.tile(SERPENTINE_PATH[index + 1]) == value).then_some(PathGap {
                index,
                is_empty_cell: false,
            })
        })
    }

    /// Sum of every tile whose successor on the path is at least as large.
    #[must_use]
    pub fn ordering_bonus(board: &Board) -> u64 {
        SERPENTINE_PATH
            .windows(2)
            .map(|pair| (board.tile(pair[0]), board.tile(pair[1])))
            .filter(|(prev, next)| next >= prev)
            .map(|(prev, _)| u64::from(prev))
            .sum()
    }
}

impl MoveScorer for SerpentineScorer {
    /// Re-ranks the default order around the first gap on the path.
    ///
    /// - Gap in the second or fourth row: left and right swap, so the row gets
    ///   pushed towards the end the path enters it from.
    /// - Gap is an empty cell: the first horizontal direction goes first and up
    ///   second, so the hole is filled from the side.
    fn preferred_order(&self, board: &Board) -> [Direction; Direction::LEN] {
        let mut order = DEFAULT_ORDER;
        if let Some(gap) = Self::first_gap(board) {
            if (gap.index / BOARD_SIZE) % 2 == 1 {
                order[1] = Direction::Right;
                order[2] = Direction::Left;
            }
            if gap.is_empty_cell {
                order[0] = order[1];
                order[1] = Direction::Up;
            }
        }
        order
    }

    fn score_move(&self, board: &Board, outcome: &MoveOutcome) -> u64 {
        outcome.score_delta() + Self::ordering_bonus(board)
    }
}

/// The playing strategies offered to the auto player.
#[derive(
    Default, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Up, left, right or down, whichever works first.
    #[default]
    #[display("up")]
    Greedy,
    /// Biggest immediate score gain.
    #[display("score")]
    MaxScore,
    /// Keep tiles sorted along the serpentine path.
    #[display("lr")]
    Serpentine,
}

impl Strategy {
    pub const ALL: [Self; 3] = [Self::Greedy, Self::MaxScore, Self::Serpentine];
}

impl MoveScorer for Strategy {
    fn preferred_order(&self, board: &Board) -> [Direction; Direction::LEN] {
        match self {
            Self::Greedy => GreedyScorer.preferred_order(board),
            Self::MaxScore => MaxScoreScorer.preferred_order(board),
            Self::Serpentine => SerpentineScorer.preferred_order(board),
        }
    }

    fn score_move(&self, board: &Board, outcome: &MoveOutcome) -> u64 {
        match self {
            Self::Greedy => GreedyScorer.score_move(board, outcome),
            Self::MaxScore => MaxScoreScorer.score_move(board, outcome),
            Self::Serpentine => SerpentineScorer.score_move(board, outcome),
        }
    }
}
