use std::{
    io::{self, Write},
    net::SocketAddr,
    path::PathBuf,
};

use anyhow::Context as _;
use ox2048_engine::{Board, DrawSeed, Game};
use ox2048_evaluator::{
    direction_evaluator::{DirectionEvaluator, GameRecord},
    move_scorer::Strategy,
    statistics::PlayoutStats,
};
use serde::Serialize;

use crate::{
    remote::client::{self, RemoteBoard},
    util::Output,
};

#[derive(Default, Debug, Clone, clap::Args)]
#[group(multiple = false)]
struct StrategyArg {
    /// Move up, left, right or down, whichever works first
    #[clap(long)]
    up: bool,
    /// Take the move with the biggest immediate score gain
    #[clap(long)]
    score: bool,
    /// Keep numbers ordered per row: first row left to right, second row right to left, ...
    #[clap(long)]
    lr: bool,
}

impl StrategyArg {
    fn strategy(&self) -> Strategy {
        if self.lr {
            Strategy::Serpentine
        } else if self.score {
            Strategy::MaxScore
        } else {
            Strategy::Greedy
        }
    }
}

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct AutoPlayArg {
    #[clap(flatten)]
    strategy: StrategyArg,
    /// Print the average score periodically
    #[clap(long)]
    average: bool,
    /// Keep playing games until interrupted
    #[clap(long, conflicts_with = "games")]
    highscore: bool,
    /// Number of games to play
    #[clap(long, default_value_t = 1)]
    games: u64,
    /// Games between two average reports
    #[clap(long, default_value_t = 16384, value_parser = clap::value_parser!(u64).range(1..))]
    report_every: u64,
    /// Play against a remote-control server (port 2048 if none given)
    #[clap(long, value_name = "ADDR")]
    server: Option<String>,
    /// Seed for the tile draws of local games (32 hex digits)
    #[clap(long, conflicts_with = "server")]
    seed: Option<DrawSeed>,
    /// Write playout statistics as JSON to this file (`-` for stdout)
    #[clap(long, value_name = "PATH")]
    summary: Option<PathBuf>,
    /// Print the board before each move and log every decision
    #[clap(short, long)]
    verbose: bool,
}

impl AutoPlayArg {
    pub(crate) fn is_verbose(&self) -> bool {
        self.verbose
    }

    fn game_limit(&self) -> Option<u64> {
        (!self.highscore).then_some(self.games)
    }
}

#[derive(Debug, Serialize)]
struct AutoPlaySummary<'a> {
    strategy: Strategy,
    #[serde(skip_serializing_if = "Option::is_none")]
    server: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<DrawSeed>,
    average: u64,
    #[serde(flatten)]
    stats: &'a PlayoutStats,
}

/// Where games are played.
enum Table {
    /// `played` is false until the first game, which uses the tiles the game
    /// was created with.
    Local { game: Game, played: bool },
    Remote {
        server: String,
        addr: SocketAddr,
    },
}

impl Table {
    fn play_game(
        &mut self,
        evaluator: &DirectionEvaluator,
        verbose: bool,
    ) -> anyhow::Result<GameRecord> {
        match self {
            Self::Local { game, played } => {
                if *played {
                    game.restart();
                }
                *played = true;
                Ok(play_local(game, evaluator, verbose))
            }
            Self::Remote { server, addr } => play_remote(*addr, evaluator, verbose)
                .with_context(|| format!("failure to communicate {server}")),
        }
    }
}

pub(crate) fn run(arg: &AutoPlayArg) -> anyhow::Result<()> {
    let strategy = arg.strategy.strategy();
    let evaluator = DirectionEvaluator::new(strategy);

    let mut table = match &arg.server {
        Some(server) => {
            let addr = client::resolve(server)
                .with_context(|| format!("failure to communicate {server}"))?;
            Table::Remote {
                server: server.clone(),
                addr,
            }
        }
        None => Table::Local {
            game: arg.seed.map_or_else(Game::new, Game::with_seed),
            played: false,
        },
    };
    log::info!("playing with strategy {strategy}");

    let mut stats = PlayoutStats::new();
    let mut reporter = Reporter::new(io::stdout().lock(), arg);
    while arg.game_limit().is_none_or(|limit| stats.games() < limit) {
        let record = table.play_game(&evaluator, arg.verbose)?;
        let is_high_score = stats.record_game(&record);
        reporter.game_finished(&stats, &record, is_high_score)?;
    }
    reporter.finish(&stats)?;
    log::info!(
        "{} games, average {}, high score {}, best tile {}",
        stats.games(),
        stats.average(),
        stats.high_score(),
        stats.best_tile()
    );

    if let Some(path) = &arg.summary {
        let summary = AutoPlaySummary {
            strategy,
            server: arg.server.as_deref(),
            seed: arg.seed,
            average: stats.average(),
            stats: &stats,
        };
        Output::save_json(&summary, path)?;
    }
    Ok(())
}

/// Prints new high scores and, with `--average`, periodic averages.
struct Reporter<W> {
    out: W,
    average: bool,
    report_every: u64,
    last_reported: Option<u64>,
}

impl<W> Reporter<W>
where
    W: Write,
{
    fn new(out: W, arg: &AutoPlayArg) -> Self {
        Self {
            out,
            average: arg.average,
            report_every: arg.report_every,
            last_reported: None,
        }
    }

    /// A new high score prints `score S (G)` and the board. Otherwise every
    /// `report_every`-th game prints the average.
    fn game_finished(
        &mut self,
        stats: &PlayoutStats,
        record: &GameRecord,
        is_high_score: bool,
    ) -> io::Result<()> {
        if is_high_score {
            writeln!(self.out, "score {} ({})", record.score, stats.games())?;
            writeln!(self.out, "{}", record.board.grid())?;
        } else if self.average && stats.games() % self.report_every == 0 {
            self.report_average(stats)?;
        }
        Ok(())
    }

    /// Prints the final average unless it was just printed.
    fn finish(&mut self, stats: &PlayoutStats) -> io::Result<()> {
        if self.average && self.last_reported != Some(stats.games()) {
            self.report_average(stats)?;
        }
        self.out.flush()
    }

    fn report_average(&mut self, stats: &PlayoutStats) -> io::Result<()> {
        writeln!(self.out, "avg.  {}", stats.average())?;
        self.last_reported = Some(stats.games());
        Ok(())
    }
}

fn print_board(board: &Board) {
    println!("{}", board.grid());
}

fn play_local(game: &mut Game, evaluator: &DirectionEvaluator, verbose: bool) -> GameRecord {
    loop {
        if verbose {
            print_board(game.board());
        }
        if evaluator.play_turn(game).is_none() {
            break;
        }
    }
    GameRecord::from_game(game)
}

/// Plays one game on a remote board.
///
/// Moves are chosen on the board fetched from the server and mirrored on a local
/// copy; the game ends when the chosen move would not change that copy.
fn play_remote(
    addr: SocketAddr,
    evaluator: &DirectionEvaluator,
    verbose: bool,
) -> anyhow::Result<GameRecord> {
    let mut remote = RemoteBoard::connect(addr)?;
    remote.start()?;

    let mut moves = 0;
    let mut board = remote.board()?;
    loop {
        if verbose {
            print_board(&board);
        }
        let direction = evaluator.choose_direction(&board);
        log::debug!("move {direction}");
        let outcome = board.slide(direction);
        if !outcome.moved() {
            break;
        }
        remote.play(direction)?;
        moves += 1;
        board = remote.board()?;
    }

    let score = remote.score()?;
    if !remote.game_over()? {
        log::warn!("server does not consider the game over");
    }
    Ok(GameRecord {
        score,
        moves,
        max_tile: board.max_tile(),
        board,
    })
}
