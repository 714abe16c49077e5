//! Join coordinator: registers participants during a self-extending window.
//!
//! The lobby accepts connections for a window of fixed duration, and every
//! successful registration resets the remaining time to the full duration.
//! The window therefore only closes once no new participant has appeared
//! for one whole window — an actively-joining lobby stays open.

use colored::Colorize;
use log::{info, warn};
use rand::Rng;
use std::io;
use std::net::SocketAddr;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::{timeout, Duration, Instant};

/// How long a freshly accepted connection gets to present its name.
const NAME_TIMEOUT: Duration = Duration::from_secs(5);
/// Port range drawn from when no fixed port is configured.
const EPHEMERAL_PORTS: std::ops::RangeInclusive<u16> = 49152..=65535;
/// Bind attempts before the session gives up.
const MAX_BIND_ATTEMPTS: u32 = 16;

/// A registered participant owning its half of the session stream.
///
/// The stream halves are owned exclusively; during a round the whole
/// participant moves into the task reading it, so no two tasks ever touch
/// the same socket.
pub struct Participant {
    pub name: String,
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl Participant {
    pub fn new(name: impl Into<String>, stream: TcpStream) -> Self {
        let (read_half, write_half) = stream.into_split();
        Participant {
            name: name.into(),
            reader: BufReader::new(read_half),
            writer: write_half,
        }
    }

    /// Sends one newline-terminated protocol line.
    pub async fn send_line(&mut self, text: &str) -> io::Result<()> {
        self.writer.write_all(text.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await
    }

    /// Reads one trimmed line within `wait`.
    ///
    /// Returns `None` on timeout, closed stream, or read error; callers
    /// treat all three as no-response.
    pub async fn recv_line(&mut self, wait: Duration) -> Option<String> {
        let mut line = String::new();
        match timeout(wait, self.reader.read_line(&mut line)).await {
            Ok(Ok(0)) => None,
            Ok(Ok(_)) => Some(line.trim().to_string()),
            Ok(Err(e)) => {
                warn!("Read error from {}: {}", self.name, e);
                None
            }
            Err(_) => None,
        }
    }
}

/// Reads the first line of a new connection as the display name.
async fn register(stream: TcpStream, addr: SocketAddr) -> io::Result<Participant> {
    let (read_half, write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);

    let mut line = String::new();
    let read = timeout(NAME_TIMEOUT, reader.read_line(&mut line))
        .await
        .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "no name within the deadline"))??;
    if read == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "connection closed before a name arrived",
        ));
    }

    let name = line.trim().to_string();
    if name.is_empty() {
        return Err(io::Error::new(io::ErrorKind::InvalidData, "empty name"));
    }

    info!("Registered participant {} from {}", name, addr);
    Ok(Participant {
        name,
        reader,
        writer: write_half,
    })
}

/// The host-side join listener.
pub struct Lobby {
    listener: TcpListener,
    port: u16,
}

impl Lobby {
    /// Binds the join listener.
    ///
    /// With a fixed port the bind is attempted once; otherwise fresh
    /// ephemeral ports are drawn until one binds, so a port already in use
    /// never fails the session.
    pub async fn bind(host: &str, port: Option<u16>) -> io::Result<Self> {
        if let Some(port) = port {
            let listener = TcpListener::bind((host, port)).await?;
            return Ok(Lobby { listener, port });
        }

        let mut attempts = 0;
        loop {
            let port = rand::thread_rng().gen_range(EPHEMERAL_PORTS);
            match TcpListener::bind((host, port)).await {
                Ok(listener) => return Ok(Lobby { listener, port }),
                Err(e) => {
                    attempts += 1;
                    if attempts >= MAX_BIND_ATTEMPTS {
                        return Err(e);
                    }
                    warn!("Port {} is already in use, trying another... ({})", port, e);
                }
            }
        }
    }

    /// The port participants are told to connect to.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Accepts joins until the window lapses with no new registration.
    ///
    /// A connection whose name never arrives is dropped without affecting
    /// the window; only a completed registration resets the deadline.
    pub async fn collect_participants(&mut self, window: Duration) -> Vec<Participant> {
        let mut participants = Vec::new();
        let mut deadline = Instant::now() + window;

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }

            match timeout(remaining, self.listener.accept()).await {
                // Window lapsed with no new join.
                Err(_) => break,
                Ok(Err(e)) => warn!("Failed to accept a connection: {}", e),
                Ok(Ok((stream, addr))) => match register(stream, addr).await {
                    Ok(participant) => {
                        println!(
                            "{}",
                            format!("{} ({}) joined the game.", participant.name, addr.ip())
                                .green()
                        );
                        participants.push(participant);
                        deadline = Instant::now() + window;
                    }
                    Err(e) => warn!("Dropping join attempt from {}: {}", addr, e),
                },
            }
        }

        participants
    }
}
