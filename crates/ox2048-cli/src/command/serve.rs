use std::{net::SocketAddr, sync::Arc};

use anyhow::Context as _;
use ox2048_engine::{DrawSeed, Game};
use parking_lot::Mutex;
use tokio::net::TcpListener;

use crate::remote::{NewGame, server};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ServeArg {
    /// Address to accept remote-control connections on
    #[clap(long, default_value = "127.0.0.1:2048")]
    listen: SocketAddr,
    /// Seed for the tile draws (32 hex digits)
    #[clap(long)]
    seed: Option<DrawSeed>,
}

pub(crate) fn run(arg: &ServeArg) -> anyhow::Result<()> {
    let ServeArg { listen, seed } = arg;

    let game = seed.map_or_else(Game::new, Game::with_seed);
    let game = Arc::new(Mutex::new(game));

    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    runtime.block_on(async {
        let listener = TcpListener::bind(*listen)
            .await
            .with_context(|| format!("failed to listen on {listen}"))?;
        log::info!("serving 2048 on {}", listener.local_addr()?);
        server::serve(listener, game, NewGame::for_seed(*seed)).await?;
        anyhow::Ok(())
    })
}
