use serde::Serialize;

use crate::direction_evaluator::GameRecord;

/// Aggregated results of many auto-played games.
///
/// Tracks the number of games, the total and best score, which game set the
/// best score (1-based) and the largest tile ever reached.
///
/// # Example
///
/// ```
/// use ox2048_evaluator::statistics::PlayoutStats;
///
/// let mut stats = PlayoutStats::new();
/// assert!(stats.record(1200, 128));
/// assert!(!stats.record(800, 256));
///
/// assert_eq!(stats.games(), 2);
/// assert_eq!(stats.average(), 1000);
/// assert_eq!(stats.high_score(), 1200);
/// assert_eq!(stats.high_score_game(), Some(1));
/// assert_eq!(stats.best_tile(), 256);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlayoutStats {
    games: u64,
    total_score: u64,
    high_score: u64,
    high_score_game: Option<u64>,
    best_tile: u32,
}

impl PlayoutStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            games: 0,
            total_score: 0,
            high_score: 0,
            high_score_game: None,
            best_tile: 0,
        }
    }

    /// Adds one finished game.
    ///
    /// Returns `true` if the game set a new high score. The first game with a
    /// non-zero score always does; later games must beat it strictly.
    pub fn record(&mut self, score: u64, max_tile: u32) -> bool {
        self.games += 1;
        self.total_score += score;
        self.best_tile = self.best_tile.max(max_tile);
        if score > self.high_score {
            self.high_score = score;
            self.high_score_game = Some(self.games);
            return true;
        }
        false
    }

    /// Like [`Self::record`], taking the result from a [`GameRecord`].
    pub fn record_game(&mut self, record: &GameRecord) -> bool {
        self.record(record.score, record.max_tile)
    }

    #[must_use]
    pub const fn games(&self) -> u64 {
        self.games
    }

    #[must_use]
    pub const fn total_score(&self) -> u64 {
        self.total_score
    }

    #[must_use]
    pub const fn high_score(&self) -> u64 {
        self.high_score
    }

    /// Number of the game that set the high score, counting from 1.
    #[must_use]
    pub const fn high_score_game(&self) -> Option<u64> {
        self.high_score_game
    }

    #[must_use]
    pub const fn best_tile(&self) -> u32 {
        self.best_tile
    }

    /// Integer mean score, or 0 before the first game.
    #[must_use]
    pub fn average(&self) -> u64 {
        self.total_score.checked_div(self.games).unwrap_or(0)
    }
}
