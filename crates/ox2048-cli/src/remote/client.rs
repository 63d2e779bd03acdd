use std::{
    io::{BufRead as _, BufReader, Write as _},
    net::{IpAddr, SocketAddr, TcpStream, ToSocketAddrs as _},
};

use anyhow::{Context as _, bail};
use ox2048_engine::{Board, Direction};

use super::{
    DEFAULT_PORT,
    protocol::{OK, RemoteCommand},
};

/// Blocking connection to a remote-control server.
///
/// Every request is sent with the `:` prefix and waits for its one-line
/// response.
#[derive(Debug)]
pub(crate) struct RemoteBoard {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
}

/// Resolves `server`, adding the default port if it names none.
pub(crate) fn resolve(server: &str) -> anyhow::Result<SocketAddr> {
    if let Ok(addr) = server.parse::<SocketAddr>() {
        return Ok(addr);
    }
    if let Ok(ip) = server.parse::<IpAddr>() {
        return Ok(SocketAddr::new(ip, DEFAULT_PORT));
    }
    let mut addrs = if server.contains(':') {
        server.to_socket_addrs()
    } else {
        (server, DEFAULT_PORT).to_socket_addrs()
    }
    .with_context(|| format!("failed to resolve {server}"))?;
    addrs
        .next()
        .with_context(|| format!("no address found for {server}"))
}

impl RemoteBoard {
    pub(crate) fn connect(addr: SocketAddr) -> anyhow::Result<Self> {
        let writer = TcpStream::connect(addr)?;
        writer.set_nodelay(true)?;
        let reader = BufReader::new(writer.try_clone()?);
        Ok(Self { reader, writer })
    }

    fn request(&mut self, command: RemoteCommand) -> anyhow::Result<String> {
        let command = command.as_str();
        log::debug!("send :{command}");
        writeln!(self.writer, ":{command}")?;
        self.writer.flush()?;

        let mut response = String::new();
        if self.reader.read_line(&mut response)? == 0 {
            bail!("connection closed while waiting for {command:?}");
        }
        let response = response.trim_end().to_owned();
        log::debug!("recv {response}");
        if let Some(message) = response.strip_prefix("ERROR ") {
            bail!("server rejected {command:?}: {message}");
        }
        Ok(response)
    }

    fn expect_ok(&mut self, command: RemoteCommand) -> anyhow::Result<()> {
        let response = self.request(command)?;
        if response != OK {
            bail!("unexpected response to {:?}: {response:?}", command.as_str());
        }
        Ok(())
    }

    pub(crate) fn start(&mut self) -> anyhow::Result<()> {
        self.expect_ok(RemoteCommand::Start)
    }

    pub(crate) fn play(&mut self, direction: Direction) -> anyhow::Result<()> {
        self.expect_ok(RemoteCommand::Move(direction))
    }

    pub(crate) fn board(&mut self) -> anyhow::Result<Board> {
        let response = self.request(RemoteCommand::Board)?;
        let board = response
            .parse()
            .with_context(|| format!("malformed board notation {response:?}"))?;
        Ok(board)
    }

    pub(crate) fn score(&mut self) -> anyhow::Result<u64> {
        let response = self.request(RemoteCommand::Score)?;
        let score = response
            .parse()
            .with_context(|| format!("malformed score {response:?}"))?;
        Ok(score)
    }

    /// Asks whether the remote game is over.
    ///
    /// Only reports the answer; the server keeps the game until the next `start`.
    pub(crate) fn game_over(&mut self) -> anyhow::Result<bool> {
        match self.request(RemoteCommand::GameOver)?.as_str() {
            "1" => Ok(true),
            "0" => Ok(false),
            other => bail!("unexpected response to \"gameover\": {other:?}"),
        }
    }
}
