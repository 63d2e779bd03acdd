use rand::Rng as _;

use crate::core::{Board, Direction, MoveOutcome};

use super::tile_draws::{DrawSeed, TileDraws};

/// Number of tiles on a freshly reset board.
const INITIAL_TILES: usize = 2;

#[derive(Debug, Clone)]
struct Snapshot {
    board: Board,
    score: u64,
    moves: usize,
    draws: TileDraws,
}

/// A single 2048 game: board, score, tile source and one level of undo.
///
/// The game never injects a tile on its own inside [`Self::apply_move`]; use
/// [`Self::play`] for the usual "move, then drop a tile" step.
///
/// # Example
///
/// ```
/// use ox2048_engine::{Direction, Game};
///
/// let mut game = Game::new();
/// assert_eq!(game.board().count_empty(), 14);
///
/// let before = game.clone();
/// let outcome = game.play(Direction::Up);
/// if outcome.moved() {
///     game.undo();
///     assert_eq!(game.board(), before.board());
///     assert_eq!(game.score(), before.score());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    score: u64,
    moves: usize,
    draws: TileDraws,
    backup: Option<Box<Snapshot>>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Starts a game with tiles drawn from OS entropy.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Starts a game whose tile drops are fully determined by `seed`.
    #[must_use]
    pub fn with_seed(seed: DrawSeed) -> Self {
        Self::with_draws(TileDraws::with_seed(seed))
    }

    /// Starts a game that takes its tiles from `draws`.
    #[must_use]
    pub fn with_draws(draws: TileDraws) -> Self {
        let mut game = Self {
            board: Board::EMPTY,
            score: 0,
            moves: 0,
            draws,
            backup: None,
        };
        game.start();
        game
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns a copy of the current board.
    #[must_use]
    pub fn current_board(&self) -> Board {
        self.board
    }

    #[must_use]
    pub fn score(&self) -> u64 {
        self.score
    }

    /// Same as [`Self::score`], for callers that treat the game as a snapshot source.
    #[must_use]
    pub fn current_score(&self) -> u64 {
        self.score
    }

    /// Number of moves that changed the board since the last reset.
    #[must_use]
    pub fn moves(&self) -> usize {
        self.moves
    }

    #[must_use]
    pub fn draws(&self) -> &TileDraws {
        &self.draws
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.backup.is_some()
    }

    /// Whether no move can change the board any more.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.board.is_terminal()
    }

    /// Slides the board towards `direction` without dropping a new tile.
    ///
    /// If the board changes, the previous state is saved for [`Self::undo`] and
    /// the merge score is added. A move that changes nothing leaves both the game
    /// and the undo slot untouched.
    pub fn apply_move(&mut self, direction: Direction) -> MoveOutcome {
        let outcome = self.board.slide(direction);
        if outcome.moved() {
            self.backup = Some(Box::new(self.snapshot()));
            self.board = *outcome.board();
            self.score += outcome.score_delta();
            self.moves += 1;
        }
        outcome
    }

    /// Drops a 2 or a 4 on a random empty cell.
    ///
    /// Returns `false` without consuming a draw if the board is full.
    pub fn inject_random_tile(&mut self) -> bool {
        if self.board.is_full() {
            return false;
        }
        let raw = self.draws.pop_raw();
        self.board.drop_tile(raw).is_some()
    }

    /// Plays one turn: slides towards `direction` and, if anything moved, drops
    /// a new tile.
    pub fn play(&mut self, direction: Direction) -> MoveOutcome {
        self.draws.ensure(1);
        let outcome = self.apply_move(direction);
        if outcome.moved() {
            self.inject_random_tile();
        }
        outcome
    }

    /// Restores the state saved by the last successful move.
    ///
    /// Only one level is kept: undoing twice restores the same state. Returns
    /// `false` if nothing has been played since the last reset.
    pub fn undo(&mut self) -> bool {
        let Some(backup) = &self.backup else {
            return false;
        };
        let Snapshot {
            board,
            score,
            moves,
            draws,
        } = backup.as_ref().clone();
        self.board = board;
        self.score = score;
        self.moves = moves;
        self.draws = draws;
        true
    }

    /// Starts over with an empty board reseeded from OS entropy.
    pub fn reset(&mut self) {
        self.reset_with_seed(rand::rng().random());
    }

    /// Starts over with an empty board and tiles determined by `seed`.
    pub fn reset_with_seed(&mut self, seed: DrawSeed) {
        self.draws = TileDraws::with_seed(seed);
        self.start();
    }

    /// Starts over with an empty board, continuing the current tile draws.
    ///
    /// A series of games restarted this way is determined by the seed of the
    /// first one.
    pub fn restart(&mut self) {
        self.start();
    }

    fn start(&mut self) {
        self.board = Board::EMPTY;
        self.score = 0;
        self.moves = 0;
        self.backup = None;
        self.draws.ensure(INITIAL_TILES);
        for _ in 0..INITIAL_TILES {
            self.inject_random_tile();
        }
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board,
            score: self.score,
            moves: self.moves,
            draws: self.draws.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed(text: &str) -> DrawSeed {
        text.parse().unwrap()
    }

    const SEED: &str = "00112233445566778899aabbccddeeff";

    fn game_with_board(rows: [[u32; 4]; 4]) -> Game {
        let mut game = Game::with_seed(seed(SEED));
        game.board = Board::from_rows(rows);
        game
    }

    fn draws_of(game: &Game, count: usize) -> Vec<u32> {
        let mut draws = game.draws().clone();
        (0..count).map(|_| draws.pop_raw()).collect()
    }

    #[test]
    fn test_new_game_has_two_tiles() {
        for _ in 0..20 {
            let game = Game::new();
            assert_eq!(game.board().count_empty(), 14);
            assert!(game.board().tiles().all(|v| matches!(v, 0 | 2 | 4)));
            assert_eq!(game.score(), 0);
            assert_eq!(game.moves(), 0);
            assert!(!game.can_undo());
        }
    }

    #[test]
    fn test_initial_tiles_follow_draws() {
        let mut draws = TileDraws::with_seed(seed(SEED));
        draws.push_front_raw([1093, 1210]);
        let game = Game::with_draws(draws);

        let mut expected = Board::EMPTY;
        expected.drop_tile(1093);
        expected.drop_tile(1210);
        assert_eq!(*game.board(), expected);
    }

    #[test]
    fn test_apply_move_updates_score_without_dropping() {
        let mut game = game_with_board([[0; 4], [0; 4], [0; 4], [2, 2, 0, 0]]);
        let outcome = game.apply_move(Direction::Left);
        assert!(outcome.moved());
        assert_eq!(outcome.score_delta(), 4);
        assert_eq!(game.score(), 4);
        assert_eq!(game.moves(), 1);
        assert_eq!(game.board().rows()[3], [4, 0, 0, 0]);
        assert_eq!(game.board().count_empty(), 15);
    }

    #[test]
    fn test_current_board_is_a_snapshot() {
        let mut game = game_with_board([[0; 4], [0; 4], [0; 4], [2, 2, 0, 0]]);
        let snapshot = game.current_board();
        game.apply_move(Direction::Left);
        assert_eq!(snapshot.rows()[3], [2, 2, 0, 0]);
        assert_eq!(game.current_board(), *game.board());
        assert_eq!(game.current_score(), 4);
    }

    #[test]
    fn test_unchanged_move_keeps_state_and_backup() {
        let mut game = game_with_board([[0; 4], [0; 4], [0; 4], [2, 4, 2, 4]]);
        let before = *game.board();
        let outcome = game.apply_move(Direction::Left);
        assert!(!outcome.moved());
        assert_eq!(*game.board(), before);
        assert_eq!(game.moves(), 0);
        assert!(!game.can_undo());
    }

    #[test]
    fn test_play_drops_one_tile_after_move() {
        let mut game = game_with_board([[0; 4], [0; 4], [0; 4], [2, 2, 0, 0]]);
        let next_draw = draws_of(&game, 1)[0];

        game.play(Direction::Left);

        let mut expected = Board::from_rows([[0; 4], [0; 4], [0; 4], [4, 0, 0, 0]]);
        expected.drop_tile(next_draw);
        assert_eq!(*game.board(), expected);
        assert_eq!(game.board().count_empty(), 14);
    }

    #[test]
    fn test_play_without_movement_does_not_drop() {
        let mut game = game_with_board([[0; 4], [0; 4], [0; 4], [2, 4, 2, 4]]);
        let draws_before = draws_of(&game, 4);
        game.play(Direction::Down);
        assert_eq!(game.board().count_empty(), 12);
        assert_eq!(draws_of(&game, 4), draws_before);
    }

    #[test]
    fn test_inject_on_full_board_is_noop() {
        let rows = [[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]];
        let mut game = game_with_board(rows);
        let draws_before = draws_of(&game, 2);
        assert!(!game.inject_random_tile());
        assert_eq!(*game.board(), Board::from_rows(rows));
        assert_eq!(draws_of(&game, 2), draws_before);
        assert!(game.is_terminal());
    }

    #[test]
    fn test_last_empty_cell_fills_board() {
        let mut game = game_with_board([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 0]]);
        assert!(!game.is_terminal());
        assert!(game.inject_random_tile());
        assert!(game.board().is_full());
    }

    #[test]
    fn test_undo_roundtrip_for_every_direction() {
        let start = Game::with_seed(seed(SEED));
        let mut game = start.clone();
        for _ in 0..10 {
            game.play(Direction::Up);
            game.play(Direction::Left);
        }

        for dir in Direction::ALL {
            let before = game.clone();
            if !game.play(dir).moved() {
                continue;
            }
            assert!(game.undo());
            assert_eq!(game.board(), before.board(), "{dir}");
            assert_eq!(game.score(), before.score(), "{dir}");
            assert_eq!(game.moves(), before.moves(), "{dir}");
            assert_eq!(draws_of(&game, 8), draws_of(&before, 8), "{dir}");
        }
    }

    #[test]
    fn test_undo_replays_same_tile() {
        let mut game = game_with_board([[0; 4], [0; 4], [0; 4], [2, 2, 0, 0]]);
        game.play(Direction::Left);
        let after_first = *game.board();
        game.undo();
        game.play(Direction::Left);
        assert_eq!(*game.board(), after_first);
    }

    #[test]
    fn test_undo_keeps_single_level() {
        let mut game = game_with_board([[0; 4], [0; 4], [0; 4], [2, 2, 4, 0]]);
        game.apply_move(Direction::Left);
        let after_first = *game.board();
        game.apply_move(Direction::Right);

        assert!(game.undo());
        assert_eq!(*game.board(), after_first);
        assert!(game.undo());
        assert_eq!(*game.board(), after_first);
    }

    #[test]
    fn test_undo_before_first_move_is_noop() {
        let mut game = Game::with_seed(seed(SEED));
        let before = *game.board();
        assert!(!game.undo());
        assert_eq!(*game.board(), before);
    }

    #[test]
    fn test_reset_clears_state() {
        let mut game = game_with_board([[0; 4], [0; 4], [0; 4], [2, 2, 0, 0]]);
        game.play(Direction::Left);
        game.reset();
        assert_eq!(game.score(), 0);
        assert_eq!(game.moves(), 0);
        assert_eq!(game.board().count_empty(), 14);
        assert!(!game.can_undo());
    }

    #[test]
    fn test_restart_continues_draws() {
        let mut game = Game::with_seed(seed(SEED));
        game.play(Direction::Up);
        game.play(Direction::Left);
        let expected = {
            let mut board = Board::EMPTY;
            for raw in draws_of(&game, INITIAL_TILES) {
                board.drop_tile(raw);
            }
            board
        };

        game.restart();
        assert_eq!(*game.board(), expected);
        assert_eq!(game.score(), 0);
        assert_eq!(game.moves(), 0);
        assert!(!game.can_undo());
    }

    #[test]
    fn test_same_seed_same_game() {
        let moves = [
            Direction::Up,
            Direction::Left,
            Direction::Down,
            Direction::Right,
            Direction::Up,
            Direction::Up,
            Direction::Left,
        ];
        let mut game1 = Game::with_seed(seed(SEED));
        let mut game2 = Game::new();
        game2.play(Direction::Down);
        game2.reset_with_seed(seed(SEED));

        for _ in 0..20 {
            for dir in moves {
                game1.play(dir);
                game2.play(dir);
                assert_eq!(game1.board(), game2.board());
                assert_eq!(game1.score(), game2.score());
            }
        }
    }

    #[test]
    fn test_score_tracks_merges() {
        let mut game = Game::with_seed(seed(SEED));
        let mut expected = 0;
        for _ in 0..50 {
            for dir in Direction::ALL {
                let before = game.board().tile_sum();
                let outcome = game.play(dir);
                expected += outcome.score_delta();
                if outcome.moved() {
                    assert!(game.board().tile_sum() - before <= 4);
                }
            }
        }
        assert_eq!(game.score(), expected);
    }
}
