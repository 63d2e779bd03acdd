use std::{fmt, iter, str::FromStr};

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::ParseBoardError;

use super::{BOARD_SIZE, CELL_COUNT, direction::Direction};

/// Percentage of dropped tiles that are 2s (the rest are 4s).
const TWO_TILE_PERCENT: u32 = 90;

type Rows = [[u32; BOARD_SIZE]; BOARD_SIZE];

/// Cell coordinate on the board. Row 0 is the top row, column 0 the left column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    row: usize,
    col: usize,
}

impl Position {
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    #[must_use]
    pub const fn row(self) -> usize {
        self.row
    }

    #[must_use]
    pub const fn col(self) -> usize {
        self.col
    }
}

/// Result of pushing every tile of a board in one direction.
///
/// Produced by [`Board::slide`]; the source board is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    board: Board,
    moved: bool,
    score_delta: u64,
}

impl MoveOutcome {
    /// Board after sliding and merging (no tile injected yet).
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Whether any tile changed position or value.
    #[must_use]
    pub const fn moved(&self) -> bool {
        self.moved
    }

    /// Sum of the values of all tiles created by merges.
    #[must_use]
    pub const fn score_delta(&self) -> u64 {
        self.score_delta
    }
}

/// 4×4 grid of tile values, `0` meaning empty.
///
/// Every non-zero tile is a power of two of at least 2. Boards are small `Copy`
/// values, so simulating a move never touches the original.
///
/// The [`Display`](fmt::Display) and [`FromStr`] implementations use the
/// bracketed board notation of the remote-control protocol, rows from top to
/// bottom:
///
/// ```
/// use ox2048_engine::{Board, Direction};
///
/// let board: Board = "[[0 0 0 0] [0 0 0 0] [0 0 0 0] [2 2 0 0]]".parse().unwrap();
/// let outcome = board.slide(Direction::Left);
///
/// assert!(outcome.moved());
/// assert_eq!(outcome.score_delta(), 4);
/// assert_eq!(
///     outcome.board().to_string(),
///     "[[0 0 0 0] [0 0 0 0] [0 0 0 0] [4 0 0 0]]"
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Rows", into = "Rows")]
pub struct Board {
    rows: Rows,
}

const fn is_valid_tile(value: u32) -> bool {
    value == 0 || (value >= 2 && value.is_power_of_two())
}

/// Merged value of two tiles, if they can merge.
///
/// The largest tile (2^31) has no representable double and never merges.
const fn merged_tile(a: u32, b: u32) -> Option<u32> {
    if a == 0 || a != b {
        return None;
    }
    a.checked_add(b)
}

impl Board {
    pub const EMPTY: Self = Self {
        rows: [[0; BOARD_SIZE]; BOARD_SIZE],
    };

    /// Builds a board from rows listed top to bottom.
    ///
    /// # Panics
    ///
    /// Panics if a tile is neither 0 nor a power of two of at least 2.
    #[must_use]
    pub fn from_rows(rows: Rows) -> Self {
        match Self::try_from(rows) {
            Ok(board) => board,
            Err(e) => panic!("invalid board: {e}"),
        }
    }

    #[must_use]
    pub const fn rows(&self) -> &Rows {
        &self.rows
    }

    #[must_use]
    pub const fn tile(&self, pos: Position) -> u32 {
        self.rows[pos.row][pos.col]
    }

    pub(crate) const fn set_tile(&mut self, pos: Position, value: u32) {
        self.rows[pos.row][pos.col] = value;
    }

    /// Iterates over all tiles in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = u32> + '_ {
        self.rows.iter().flatten().copied()
    }

    /// Returns the empty cells in row-major order.
    #[must_use]
    pub fn empty_cells(&self) -> ArrayVec<Position, CELL_COUNT> {
        (0..BOARD_SIZE)
            .flat_map(|row| (0..BOARD_SIZE).map(move |col| Position::new(row, col)))
            .filter(|pos| self.tile(*pos) == 0)
            .collect()
    }

    #[must_use]
    pub fn count_empty(&self) -> usize {
        self.tiles().filter(|&value| value == 0).count()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.tiles().all(|value| value != 0)
    }

    #[must_use]
    pub fn max_tile(&self) -> u32 {
        self.tiles().max().unwrap_or(0)
    }

    #[must_use]
    pub fn tile_sum(&self) -> u64 {
        self.tiles().map(u64::from).sum()
    }

    /// Whether two horizontally or vertically adjacent tiles hold the same non-zero value.
    #[must_use]
    pub fn has_mergeable_pair(&self) -> bool {
        let rows = &self.rows;
        (0..BOARD_SIZE).any(|row| {
            (0..BOARD_SIZE).any(|col| {
                let value = rows[row][col];
                (col + 1 < BOARD_SIZE && merged_tile(value, rows[row][col + 1]).is_some())
                    || (row + 1 < BOARD_SIZE && merged_tile(value, rows[row + 1][col]).is_some())
            })
        })
    }

    /// Whether the game is over: the board is full and nothing can merge.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.is_full() && !self.has_mergeable_pair()
    }

    /// Pushes all tiles towards `direction`, merging equal neighbours.
    ///
    /// Each line is walked from the edge the tiles are pushed against. For every
    /// target slot the nearest non-empty tile behind it either moves into the slot
    /// (if the slot is empty) or merges into it (if equal); the walk then moves on
    /// to the next slot. A slot is therefore filled or merged at most once per move,
    /// so a merged tile never merges again and a tile that just slid into a slot is
    /// not merged in the same move.
    #[must_use]
    pub fn slide(&self, direction: Direction) -> MoveOutcome {
        let mut board = *self;
        let mut moved = false;
        let mut score_delta = 0;

        for index in 0..BOARD_SIZE {
            let cells = direction.line(index);
            let mut line = cells.map(|pos| self.tile(pos));
            let (line_moved, line_score) = slide_line(&mut line);
            if line_moved {
                moved = true;
                score_delta += line_score;
                for (pos, value) in iter::zip(cells, line) {
                    board.set_tile(pos, value);
                }
            }
        }

        MoveOutcome {
            board,
            moved,
            score_delta,
        }
    }

    /// Drops a 2 or a 4 on an empty cell chosen by a single raw draw.
    ///
    /// With `f` empty cells, the `(raw % f)`-th empty cell in row-major order is
    /// filled. The tile value is taken from the same draw after it has been
    /// decremented once per empty cell visited: 2 if that value modulo 100 is
    /// below 90, otherwise 4.
    ///
    /// Returns `None` (leaving the board untouched) if the board is full.
    pub fn drop_tile(&mut self, raw: u32) -> Option<Position> {
        let empty = self.empty_cells();
        if empty.is_empty() {
            return None;
        }

        #[expect(clippy::cast_possible_truncation)]
        let count = empty.len() as u32;
        let skip = raw % count;
        let pos = empty[skip as usize];
        let value = if raw.wrapping_sub(skip + 1) % 100 < TWO_TILE_PERCENT {
            2
        } else {
            4
        };
        self.set_tile(pos, value);
        Some(pos)
    }

    /// Returns a multi-line, right-aligned dump of the board.
    #[must_use]
    pub fn grid(&self) -> BoardGrid<'_> {
        BoardGrid { board: self }
    }
}

fn slide_line(line: &mut [u32; BOARD_SIZE]) -> (bool, u64) {
    let mut moved = false;
    let mut score = 0;

    for to in 0..BOARD_SIZE {
        let Some(from) = (to + 1..BOARD_SIZE).find(|&i| line[i] != 0) else {
            break;
        };
        if line[to] == 0 {
            line[to] = line[from];
            line[from] = 0;
            moved = true;
        } else if let Some(merged) = merged_tile(line[to], line[from]) {
            line[to] = merged;
            line[from] = 0;
            score += u64::from(line[to]);
            moved = true;
        }
    }

    (moved, score)
}

impl TryFrom<Rows> for Board {
    type Error = ParseBoardError;

    fn try_from(rows: Rows) -> Result<Self, Self::Error> {
        if let Some(&value) = rows.iter().flatten().find(|&&v| !is_valid_tile(v)) {
            return Err(ParseBoardError::InvalidTile { value });
        }
        Ok(Self { rows })
    }
}

impl From<Board> for Rows {
    fn from(board: Board) -> Self {
        board.rows
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            let [a, b, c, d] = row;
            write!(f, "[{a} {b} {c} {d}]")?;
        }
        f.write_str("]")
    }
}

impl FromStr for Board {
    type Err = ParseBoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tiles = Vec::with_capacity(CELL_COUNT);
        let mut chars = s.char_indices().peekable();

        while let Some((offset, ch)) = chars.next() {
            match ch {
                '[' | ']' | ' ' | '\t' | '\r' | '\n' => {}
                '0'..='9' => {
                    let mut end = offset + 1;
                    while let Some((i, _)) = chars.next_if(|(_, c)| c.is_ascii_digit()) {
                        end = i + 1;
                    }
                    let value = s[offset..end]
                        .parse::<u32>()
                        .map_err(|_| ParseBoardError::TileOutOfRange { offset })?;
                    tiles.push(value);
                }
                found => return Err(ParseBoardError::UnexpectedChar { found, offset }),
            }
        }

        let rows: [u32; CELL_COUNT] = tiles
            .try_into()
            .map_err(|tiles: Vec<u32>| ParseBoardError::TileCount { found: tiles.len() })?;
        let mut board = [[0; BOARD_SIZE]; BOARD_SIZE];
        for (dst, src) in iter::zip(board.iter_mut().flatten(), rows) {
            *dst = src;
        }
        Self::try_from(board)
    }
}

/// Multi-line view of a [`Board`], see [`Board::grid`].
#[derive(Debug)]
pub struct BoardGrid<'a> {
    board: &'a Board,
}

impl fmt::Display for BoardGrid<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.board.rows() {
            let [a, b, c, d] = row;
            writeln!(f, "{a:5} {b:5} {c:5} {d:5}")?;
        }
        Ok(())
    }
}
