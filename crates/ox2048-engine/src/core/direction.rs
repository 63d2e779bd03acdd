use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::ParseDirectionError;

use super::{BOARD_SIZE, board::Position};

/// Direction in which all tiles are pushed.
///
/// The textual form (used by the remote-control protocol and in logs) is the
/// lowercase variant name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub const LEN: usize = 4;
    pub const ALL: [Self; Self::LEN] = [Self::Left, Self::Right, Self::Up, Self::Down];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Up => "up",
            Self::Down => "down",
        }
    }

    /// Returns the cells of the `index`-th line parallel to this direction.
    ///
    /// The first position lies on the edge tiles are pushed against and the last
    /// one on the opposite edge.
    #[must_use]
    pub(crate) const fn line(self, index: usize) -> [Position; BOARD_SIZE] {
        let mut line = [Position::new(0, 0); BOARD_SIZE];
        let mut i = 0;
        while i < BOARD_SIZE {
            let far = i;
            let near = BOARD_SIZE - 1 - i;
            line[i] = match self {
                Self::Left => Position::new(index, far),
                Self::Right => Position::new(index, near),
                Self::Up => Position::new(far, index),
                Self::Down => Position::new(near, index),
            };
            i += 1;
        }
        line
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|dir| dir.as_str() == s)
            .ok_or_else(|| ParseDirectionError {
                input: s.to_owned(),
            })
    }
}
