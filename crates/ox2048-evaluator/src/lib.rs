//! Strategy evaluation and auto play for 2048 boards.
//!
//! This crate picks moves for a read-only [`Board`](ox2048_engine::Board) and drives whole
//! games with them:
//!
//! 1. **Move Scoring** ([`move_scorer`]) - Per-strategy heuristics: the order in which
//!    directions are tried and the score of one simulated move.
//!
//! 2. **Direction Evaluation** ([`direction_evaluator`]) - Simulates every direction on a
//!    copy of the board and selects the best one. Also plays single turns and full games.
//!
//! 3. **Statistics** ([`statistics`]) - Aggregates the results of many games (average,
//!    high score, best tile).
//!
//! # Architecture
//!
//! ```text
//! Playout Statistics (many games)
//!     ↓ fed by
//! Direction Evaluation (select best direction, play games)
//!     ↓ uses
//! Move Scoring (score a single simulated move)
//! ```
//!
//! Evaluation is pure: boards are copied before moves are simulated and the game's tile
//! draws are never consumed, so choosing a direction does not change which tiles appear.
//!
//! # Example
//!
//! ```
//! use ox2048_engine::Game;
//! use ox2048_evaluator::{
//!     direction_evaluator::DirectionEvaluator, move_scorer::Strategy,
//!     statistics::PlayoutStats,
//! };
//!
//! let evaluator = DirectionEvaluator::new(Strategy::Serpentine);
//! let mut stats = PlayoutStats::new();
//! for _ in 0..3 {
//!     let record = evaluator.play_game(&mut Game::new());
//!     stats.record_game(&record);
//! }
//! assert_eq!(stats.games(), 3);
//! assert!(stats.average() <= stats.high_score());
//! ```

pub mod direction_evaluator;
pub mod move_scorer;
pub mod statistics;
