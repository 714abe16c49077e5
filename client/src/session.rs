//! Participant session: name registration, question prompts, and the
//! close handshake.

use colored::Colorize;
use log::{info, warn};
use shared::{parse_answer, CLIENT_ACK, CLOSING_NOTICE, QUESTION_PREFIX};
use std::io;
use std::net::IpAddr;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::time::{timeout, Duration, Instant};

/// One joined game session.
///
/// Reads server lines and reacts to the two phrases that matter: the
/// question prefix (prompt the user for an answer) and the closing notice
/// (acknowledge and leave). Everything else is printed as-is.
pub struct Session {
    server_lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
    stdin_lines: Lines<BufReader<Stdin>>,
    answer_timeout: Duration,
}

impl Session {
    /// Connects to the advertised endpoint and registers under `name`.
    pub async fn connect(
        host: IpAddr,
        port: u16,
        name: &str,
        answer_timeout: Duration,
    ) -> io::Result<Self> {
        let stream = TcpStream::connect((host, port)).await?;
        let (read_half, write_half) = stream.into_split();

        let mut session = Session {
            server_lines: BufReader::new(read_half).lines(),
            writer: write_half,
            stdin_lines: BufReader::new(tokio::io::stdin()).lines(),
            answer_timeout,
        };
        session.send_line(name).await?;
        info!("Registered as {} with {}:{}", name, host, port);
        Ok(session)
    }

    /// Runs until the host closes the session or the stream drops.
    pub async fn run(&mut self) -> io::Result<()> {
        println!("{}", "Game started. Waiting for question...".bright_yellow());

        while let Some(line) = self.server_lines.next_line().await? {
            if line.contains(CLOSING_NOTICE) {
                println!("{}", line.purple());
                self.send_line(CLIENT_ACK).await?;
                info!("Acknowledged closing notice");
                break;
            }

            if line.starts_with(QUESTION_PREFIX) {
                println!("{}", line.cyan());
                self.prompt_answer().await?;
            } else {
                println!("{}", line);
            }
        }

        Ok(())
    }

    async fn send_line(&mut self, text: &str) -> io::Result<()> {
        self.writer.write_all(text.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await
    }

    /// Prompts on stdin under the answer deadline and submits the first
    /// valid token; locally-invalid input re-prompts until time runs out.
    async fn prompt_answer(&mut self) -> io::Result<()> {
        let deadline = Instant::now() + self.answer_timeout;

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                println!("{}", "Time is up.".bright_red());
                return Ok(());
            }

            match timeout(remaining, self.stdin_lines.next_line()).await {
                Err(_) => {
                    println!("{}", "Time is up.".bright_red());
                    return Ok(());
                }
                Ok(Ok(Some(input))) => {
                    if parse_answer(&input).is_some() {
                        return self.send_line(input.trim()).await;
                    }
                    println!(
                        "{}",
                        "Invalid input. Please enter Y/T/1 for True, N/F/0 for False."
                            .bright_red()
                    );
                }
                // Stdin is gone; let the round time out on the host side.
                Ok(Ok(None)) => return Ok(()),
                Ok(Err(e)) => {
                    warn!("Could not read from stdin: {}", e);
                    return Ok(());
                }
            }
        }
    }
}
