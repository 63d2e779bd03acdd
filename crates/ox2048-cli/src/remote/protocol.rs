use std::str::FromStr;

use ox2048_engine::{Direction, Game};
use parking_lot::Mutex;

use super::NewGame;

/// Response to commands that change the game.
pub(crate) const OK: &str = "OK";

/// One remote-control command.
///
/// Commands are matched after trimming surrounding whitespace and an optional
/// leading `:`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RemoteCommand {
    /// Slide, then drop a tile if anything moved. Responds `OK`.
    Move(Direction),
    /// Responds with the board notation.
    Board,
    /// Responds with the decimal score.
    Score,
    /// Responds `1` if no move is possible, `0` otherwise.
    GameOver,
    /// Starts a new game as the server's [`NewGame`] policy says. Responds `OK`.
    Start,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown command {command:?}")]
pub(crate) struct UnknownCommandError {
    command: String,
}

impl FromStr for RemoteCommand {
    type Err = UnknownCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let command = s.trim();
        let command = command.strip_prefix(':').unwrap_or(command);
        let parsed = match command {
            "board" => Self::Board,
            "score" => Self::Score,
            "gameover" => Self::GameOver,
            "start" => Self::Start,
            _ => Self::Move(command.parse().map_err(|_| UnknownCommandError {
                command: command.to_owned(),
            })?),
        };
        Ok(parsed)
    }
}

impl RemoteCommand {
    /// Name of the command as sent on the wire, without the `:` prefix.
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Move(direction) => direction.as_str(),
            Self::Board => "board",
            Self::Score => "score",
            Self::GameOver => "gameover",
            Self::Start => "start",
        }
    }

    pub(crate) fn execute(self, game: &mut Game, new_game: NewGame) -> String {
        match self {
            Self::Move(direction) => {
                game.play(direction);
                OK.to_owned()
            }
            Self::Board => game.current_board().to_string(),
            Self::Score => game.current_score().to_string(),
            Self::GameOver => u8::from(game.is_terminal()).to_string(),
            Self::Start => {
                new_game.start(game);
                OK.to_owned()
            }
        }
    }
}

/// Answers one request line, holding the game lock only while the command runs.
pub(crate) fn respond(line: &str, game: &Mutex<Game>, new_game: NewGame) -> String {
    match line.parse::<RemoteCommand>() {
        Ok(command) => command.execute(&mut game.lock(), new_game),
        Err(err) => format!("ERROR {err}"),
    }
}

#[cfg(test)]
mod tests {
    use ox2048_engine::{Board, DrawSeed};

    use super::*;

    fn game() -> Mutex<Game> {
        let seed: DrawSeed = "00112233445566778899aabbccddeeff".parse().unwrap();
        Mutex::new(Game::with_seed(seed))
    }

    const SEEDED: NewGame = NewGame::ContinueDraws;

    fn parse(line: &str) -> Result<RemoteCommand, UnknownCommandError> {
        line.parse()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse("board"), Ok(RemoteCommand::Board));
        assert_eq!(parse(":score"), Ok(RemoteCommand::Score));
        assert_eq!(parse("  :gameover\r\n"), Ok(RemoteCommand::GameOver));
        assert_eq!(parse("start"), Ok(RemoteCommand::Start));
        assert_eq!(parse(":left"), Ok(RemoteCommand::Move(Direction::Left)));
        for direction in Direction::ALL {
            let command = RemoteCommand::Move(direction);
            assert_eq!(parse(command.as_str()), Ok(command));
        }
    }

    #[test]
    fn test_unknown_command() {
        let err = parse(":jump").unwrap_err();
        assert_eq!(err.to_string(), "unknown command \"jump\"");
        assert_eq!(respond("UP", &game(), SEEDED), "ERROR unknown command \"UP\"");
        assert_eq!(respond("", &game(), SEEDED), "ERROR unknown command \"\"");
    }

    #[test]
    fn test_board_and_score_responses() {
        let game = game();
        let board: Board = respond("board", &game, SEEDED).parse().unwrap();
        assert_eq!(board, *game.lock().board());
        assert_eq!(respond(":score", &game, SEEDED), "0");
        assert_eq!(respond("gameover", &game, SEEDED), "0");
    }

    #[test]
    fn test_move_plays_and_drops() {
        let game = game();
        let mut expected = game.lock().clone();
        expected.play(Direction::Down);
        assert_eq!(respond("down", &game, SEEDED), OK);
        assert_eq!(game.lock().board(), expected.board());
        assert_eq!(game.lock().score(), expected.score());
    }

    #[test]
    fn test_gameover_on_terminal_board() {
        let game = game();
        {
            let mut game = game.lock();
            while Direction::ALL
                .into_iter()
                .any(|direction| game.play(direction).moved())
            {}
        }
        assert_eq!(respond("gameover", &game, SEEDED), "1");
        for direction in Direction::ALL {
            let before = *game.lock().board();
            assert_eq!(respond(direction.as_str(), &game, SEEDED), OK);
            assert_eq!(*game.lock().board(), before);
        }
    }

    #[test]
    fn test_start_resets_game() {
        for new_game in [NewGame::Reseed, NewGame::ContinueDraws] {
            let game = game();
            for direction in Direction::ALL {
                respond(direction.as_str(), &game, new_game);
            }
            assert_eq!(respond(":start", &game, new_game), OK);
            let game = game.lock();
            assert_eq!(game.score(), 0);
            assert_eq!(game.moves(), 0);
            assert_eq!(game.board().count_empty(), 14);
        }
    }

    #[test]
    fn test_start_follows_new_game_policy() {
        let next_draws = |game: &Game| {
            let mut draws = game.draws().clone();
            (0..8).map(|_| draws.pop_raw()).collect::<Vec<_>>()
        };

        let seeded = game();
        respond("left", &seeded, SEEDED);
        let mut restarted = seeded.lock().clone();
        restarted.restart();
        respond("start", &seeded, NewGame::ContinueDraws);
        assert_eq!(seeded.lock().board(), restarted.board());
        assert_eq!(next_draws(&*seeded.lock()), next_draws(&restarted));

        let reseeded = game();
        respond("left", &reseeded, NewGame::Reseed);
        respond("start", &reseeded, NewGame::Reseed);
        assert_ne!(next_draws(&*reseeded.lock()), next_draws(&restarted));
    }
}
