use std::{net::SocketAddr, str, sync::Arc, thread};

use anyhow::Context as _;
use ox2048_engine::Game;
use parking_lot::Mutex;
use tokio::{
    io::{self, AsyncReadExt as _, AsyncWriteExt as _},
    net::{TcpListener, TcpStream},
};

use super::{
    NewGame, SharedGame,
    protocol::{self, RemoteCommand},
};

/// Longest request kept. Further bytes up to the next newline are dropped.
const MAX_REQUEST_LEN: usize = 64;

const READ_CHUNK_LEN: usize = 512;

/// Accepts connections forever, serving each one on its own task.
pub(crate) async fn serve(
    listener: TcpListener,
    game: SharedGame,
    new_game: NewGame,
) -> io::Result<()> {
    loop {
        let (socket, peer) = listener.accept().await?;
        log::info!("{peer} connected");
        let game = Arc::clone(&game);
        tokio::spawn(async move {
            match handle_connection(socket, &game, new_game).await {
                Ok(()) => log::info!("{peer} disconnected"),
                Err(err) => log::warn!("{peer}: connection failed: {err}"),
            }
        });
    }
}

/// Splits received bytes into requests.
///
/// A request ends at a newline. Bytes left over at the end of a read also form a
/// request once they spell a complete command, so a client that sends `:start`
/// without a newline still gets its answer.
#[derive(Debug, Default)]
struct RequestFramer {
    pending: Vec<u8>,
}

impl RequestFramer {
    fn feed(&mut self, bytes: &[u8]) -> Vec<String> {
        let mut requests = Vec::new();
        for &byte in bytes {
            if byte == b'\n' {
                requests.extend(self.take());
            } else if self.pending.len() < MAX_REQUEST_LEN {
                self.pending.push(byte);
            }
        }
        if self.pending_is_command() {
            requests.extend(self.take());
        }
        requests
    }

    fn pending_is_command(&self) -> bool {
        str::from_utf8(&self.pending).is_ok_and(|s| s.parse::<RemoteCommand>().is_ok())
    }

    /// Takes the pending request, skipping blank ones.
    fn take(&mut self) -> Option<String> {
        let request = String::from_utf8_lossy(&self.pending).trim().to_owned();
        self.pending.clear();
        (!request.is_empty()).then_some(request)
    }
}

async fn handle_connection(
    socket: TcpStream,
    game: &Mutex<Game>,
    new_game: NewGame,
) -> io::Result<()> {
    let (mut reader, mut writer) = socket.into_split();
    let mut framer = RequestFramer::default();
    let mut chunk = [0; READ_CHUNK_LEN];
    loop {
        let len = reader.read(&mut chunk).await?;
        if len == 0 {
            return Ok(());
        }
        for request in framer.feed(&chunk[..len]) {
            let response = protocol::respond(&request, game, new_game);
            log::debug!("{request:?} -> {response:?}");
            writer.write_all(response.as_bytes()).await?;
            writer.write_all(b"\n").await?;
        }
    }
}

/// Binds `addr` and serves `game` from a background thread.
///
/// Binding happens before this returns, so address errors are reported to the
/// caller. Errors after that are only logged.
pub(crate) fn spawn_background(
    addr: SocketAddr,
    game: SharedGame,
    new_game: NewGame,
) -> anyhow::Result<SocketAddr> {
    let listener = std::net::TcpListener::bind(addr)
        .with_context(|| format!("failed to listen on {addr}"))?;
    listener.set_nonblocking(true)?;
    let local_addr = listener.local_addr()?;

    thread::Builder::new()
        .name("remote-control".to_owned())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(err) => {
                    log::error!("failed to start remote control: {err}");
                    return;
                }
            };
            let result = runtime.block_on(async move {
                let listener = TcpListener::from_std(listener)?;
                serve(listener, game, new_game).await
            });
            if let Err(err) = result {
                log::error!("remote control stopped: {err}");
            }
        })
        .context("failed to spawn remote-control thread")?;

    log::info!("remote control listening on {local_addr}");
    Ok(local_addr)
}
