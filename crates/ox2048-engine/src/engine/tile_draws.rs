use std::{collections::VecDeque, fmt, str::FromStr};

use rand::{
    Rng, RngCore as _, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ParseSeedError;

/// Draws are non-negative 31-bit integers.
const RAW_DRAW_MASK: u32 = 0x7fff_ffff;

/// Queue of raw random draws used to place new tiles.
///
/// Consumers pop draws from the front; a seeded generator appends new draws
/// whenever fewer are pending than an upcoming operation needs. Because the
/// pending draws and the generator state are plain values, cloning a
/// `TileDraws` captures everything needed to replay the same tiles later,
/// which is how [`Game::undo`](crate::Game::undo) restores randomness verbatim.
///
/// # Example
///
/// ```
/// use ox2048_engine::{DrawSeed, TileDraws};
///
/// let seed: DrawSeed = "0123456789abcdef0123456789abcdef".parse().unwrap();
/// let mut draws = TileDraws::with_seed(seed);
///
/// let saved = draws.clone();
/// let first = draws.pop_raw();
///
/// draws = saved;
/// assert_eq!(draws.pop_raw(), first);
/// ```
#[derive(Debug, Clone)]
pub struct TileDraws {
    rng: Pcg32,
    pending: VecDeque<u32>,
}

impl Default for TileDraws {
    fn default() -> Self {
        Self::new()
    }
}

/// Seed for deterministic tile placement.
///
/// 128-bit seed for the draw generator, written as 32 hex digits. Two games
/// started from the same seed and fed the same moves produce the same boards.
///
/// ```
/// use ox2048_engine::{DrawSeed, Game};
/// use rand::Rng as _;
///
/// let seed: DrawSeed = rand::rng().random();
///
/// let game1 = Game::with_seed(seed);
/// let game2 = Game::with_seed(seed);
/// assert_eq!(game1.board(), game2.board());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawSeed([u8; 16]);

impl fmt::Display for DrawSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl FromStr for DrawSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseSeedError {
            input: s.to_owned(),
        };
        if s.len() != 32 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(err());
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| err())?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for DrawSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DrawSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

impl Distribution<DrawSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> DrawSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        DrawSeed(seed)
    }
}

impl TileDraws {
    /// Creates a draw queue seeded from the OS entropy source.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed.
    #[must_use]
    pub fn with_seed(seed: DrawSeed) -> Self {
        Self {
            rng: Pcg32::from_seed(seed.0),
            pending: VecDeque::new(),
        }
    }

    /// Makes sure at least `count` draws are pending.
    pub fn ensure(&mut self, count: usize) {
        while self.pending.len() < count {
            let raw = self.rng.next_u32() & RAW_DRAW_MASK;
            self.pending.push_back(raw);
        }
    }

    /// Takes the next draw, generating one first if none is pending.
    pub fn pop_raw(&mut self) -> u32 {
        self.ensure(1);
        self.pending
            .pop_front()
            .unwrap_or_else(|| self.rng.next_u32() & RAW_DRAW_MASK)
    }

    /// Queues recorded draws in front of everything not yet consumed.
    ///
    /// Used to replay a known sequence of draws, e.g. one captured from
    /// another game.
    pub fn push_front_raw<I>(&mut self, draws: I)
    where
        I: IntoIterator<Item = u32>,
        I::IntoIter: DoubleEndedIterator,
    {
        for raw in draws.into_iter().rev() {
            self.pending.push_front(raw & RAW_DRAW_MASK);
        }
    }

    /// Returns the draws already generated but not yet consumed.
    pub fn pending(&self) -> impl Iterator<Item = u32> + '_ {
        self.pending.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed(byte: u8) -> DrawSeed {
        DrawSeed([byte; 16])
    }

    #[test]
    fn test_same_seed_same_draws() {
        let mut draws1 = TileDraws::with_seed(seed(0x42));
        let mut draws2 = TileDraws::with_seed(seed(0x42));
        for _ in 0..32 {
            assert_eq!(draws1.pop_raw(), draws2.pop_raw());
        }
    }

    #[test]
    fn test_draws_are_31_bit() {
        let mut draws = TileDraws::with_seed(seed(0xff));
        for _ in 0..256 {
            assert!(draws.pop_raw() <= RAW_DRAW_MASK);
        }
    }

    #[test]
    fn test_ensure_fills_lazily() {
        let mut draws = TileDraws::with_seed(seed(1));
        assert_eq!(draws.pending().count(), 0);
        draws.ensure(3);
        assert_eq!(draws.pending().count(), 3);
        draws.ensure(2);
        assert_eq!(draws.pending().count(), 3);

        let queued: Vec<_> = draws.pending().collect();
        assert_eq!(draws.pop_raw(), queued[0]);
        assert_eq!(draws.pending().collect::<Vec<_>>(), queued[1..]);
    }

    #[test]
    fn test_clone_replays_draws() {
        let mut draws = TileDraws::with_seed(seed(7));
        draws.ensure(2);
        let saved = draws.clone();
        let first: Vec<_> = (0..10).map(|_| draws.pop_raw()).collect();

        let mut restored = saved;
        let replayed: Vec<_> = (0..10).map(|_| restored.pop_raw()).collect();
        assert_eq!(first, replayed);
    }

    #[test]
    fn test_push_front_raw_preserves_order() {
        let mut draws = TileDraws::with_seed(seed(3));
        draws.ensure(1);
        let generated = draws.pending().next().unwrap();
        draws.push_front_raw([10, 20, 30]);
        assert_eq!(draws.pop_raw(), 10);
        assert_eq!(draws.pop_raw(), 20);
        assert_eq!(draws.pop_raw(), 30);
        assert_eq!(draws.pop_raw(), generated);
    }

    mod draw_seed_format {
        use super::*;

        #[test]
        fn test_known_value_sequential_bytes() {
            let seed = DrawSeed([
                0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF, 0xFE, 0xDC, 0xBA, 0x98, 0x76, 0x54,
                0x32, 0x10,
            ]);
            assert_eq!(seed.to_string(), "0123456789abcdeffedcba9876543210");
            let json = serde_json::to_string(&seed).unwrap();
            assert_eq!(json, "\"0123456789abcdeffedcba9876543210\"");
            assert_eq!(serde_json::from_str::<DrawSeed>(&json).unwrap(), seed);
        }

        #[test]
        fn test_parse_accepts_uppercase() {
            let seed: DrawSeed = "0123456789ABCDEFFEDCBA9876543210".parse().unwrap();
            assert_eq!(seed.to_string(), "0123456789abcdeffedcba9876543210");
        }

        #[test]
        fn test_parse_errors() {
            assert!("".parse::<DrawSeed>().is_err());
            assert!("0123456789abcdef0123456789abcde".parse::<DrawSeed>().is_err());
            assert!("0123456789abcdef0123456789abcdef0".parse::<DrawSeed>().is_err());
            assert!("+123456789abcdef0123456789abcdef".parse::<DrawSeed>().is_err());
            let err = "ghijklmnopqrstuvwxyzghijklmnopqr"
                .parse::<DrawSeed>()
                .unwrap_err();
            assert!(err.to_string().contains("expected 32 hex digits"));
            assert!(serde_json::from_str::<DrawSeed>("\"xyz\"").is_err());
        }

        #[test]
        fn test_random_seed_roundtrip() {
            let seed: DrawSeed = rand::rng().random();
            let parsed: DrawSeed = seed.to_string().parse().unwrap();
            assert_eq!(parsed, seed);
        }
    }
}
