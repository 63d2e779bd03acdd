use std::{net::SocketAddr, sync::Arc};

use ox2048_engine::{DrawSeed, Game};
use parking_lot::Mutex;

use crate::{
    command::play::app::PlayApp,
    remote::{NewGame, server},
};

mod app;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Seed for the tile draws (32 hex digits)
    #[clap(long)]
    seed: Option<DrawSeed>,
    /// Also accept remote-control connections on this address
    #[clap(long, value_name = "ADDR")]
    listen: Option<SocketAddr>,
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg { seed, listen } = arg;

    let game = seed.map_or_else(Game::new, Game::with_seed);
    let game = Arc::new(Mutex::new(game));
    let new_game = NewGame::for_seed(*seed);

    let listen_addr = listen
        .map(|addr| server::spawn_background(addr, Arc::clone(&game), new_game))
        .transpose()?;

    let mut app = PlayApp::new(game, new_game, listen_addr);
    ratatui::run(|terminal| app.run(terminal))?;

    Ok(())
}
