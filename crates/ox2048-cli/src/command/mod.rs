use clap::{Parser, Subcommand};
use env_logger::Env;

use self::{auto_play::AutoPlayArg, play::PlayArg, serve::ServeArg};

mod auto_play;
mod play;
mod serve;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play in the terminal
    #[command(name = "play")]
    Play(#[clap(flatten)] PlayArg),
    /// Let a strategy play, locally or against a remote board
    #[command(name = "auto-play")]
    AutoPlay(#[clap(flatten)] AutoPlayArg),
    /// Serve a game over the remote-control protocol
    Serve(#[clap(flatten)] ServeArg),
}

impl Mode {
    /// Log filter used unless `RUST_LOG` is set.
    fn default_log_filter(&self) -> &'static str {
        match self {
            // log lines would corrupt the terminal UI
            Self::Play(_) => "off",
            Self::AutoPlay(arg) if arg.is_verbose() => "debug",
            Self::AutoPlay(_) | Self::Serve(_) => "info",
        }
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    let mode = args.mode.unwrap_or(Mode::Play(PlayArg::default()));

    env_logger::Builder::from_env(Env::default().default_filter_or(mode.default_log_filter()))
        .init();

    match mode {
        Mode::Play(arg) => play::run(&arg)?,
        Mode::AutoPlay(arg) => auto_play::run(&arg)?,
        Mode::Serve(arg) => serve::run(&arg)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory as _;
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn test_play_is_default_mode() {
        let args = CommandArgs::try_parse_from(["ox2048"]).unwrap();
        assert!(args.mode.is_none());
        let args = CommandArgs::try_parse_from([
            "ox2048",
            "play",
            "--seed",
            "0123456789abcdef0123456789abcdef",
        ])
        .unwrap();
        assert!(matches!(args.mode, Some(Mode::Play(_))));
    }

    #[test]
    fn test_log_filter_per_mode() {
        let parse = |argv: &[&str]| CommandArgs::try_parse_from(argv).unwrap().mode.unwrap();
        assert_eq!(parse(&["ox2048", "play"]).default_log_filter(), "off");
        assert_eq!(parse(&["ox2048", "serve"]).default_log_filter(), "info");
        assert_eq!(parse(&["ox2048", "auto-play"]).default_log_filter(), "info");
        assert_eq!(
            parse(&["ox2048", "auto-play", "-v"]).default_log_filter(),
            "debug"
        );
    }
}
