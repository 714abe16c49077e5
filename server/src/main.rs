use clap::Parser;
use colored::Colorize;
use log::{error, warn};
use server::beacon::Beacon;
use server::game::{GameConfig, SessionOutcome, TriviaGame};
use server::lobby::{Lobby, Participant};
use server::questions;
use server::stats::Statistics;
use std::path::PathBuf;
use tokio::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Address to bind the join listener on
    #[arg(short = 'H', long, default_value = "0.0.0.0")]
    host: String,

    /// Fixed TCP port for joins (a random ephemeral port is drawn when omitted)
    #[arg(short, long)]
    port: Option<u16>,

    /// Join window in seconds; every successful join resets it
    #[arg(long, default_value = "10")]
    join_window: u64,

    /// Per-participant answer timeout in seconds
    #[arg(long, default_value = "10")]
    answer_timeout: u64,

    /// Path of the persisted statistics file
    #[arg(long, default_value = "statistics.json")]
    stats_file: PathBuf,
}

/// Supervisor states; any fault falls back to `Discovering`.
enum Phase {
    Discovering,
    Joining(Lobby, Beacon),
    Playing(Vec<Participant>),
    Closing(TriviaGame, SessionOutcome),
    Restarting,
}

#[tokio::main]
async fn main() {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();
    let mut stats = Statistics::load(&args.stats_file);

    let mut phase = Phase::Discovering;
    loop {
        phase = match phase {
            Phase::Discovering => match start_advertising(&args).await {
                Ok((lobby, beacon)) => Phase::Joining(lobby, beacon),
                Err(e) => {
                    error!("Could not open a lobby: {}", e);
                    Phase::Restarting
                }
            },

            Phase::Joining(mut lobby, beacon) => {
                let window = Duration::from_secs(args.join_window);
                let participants = lobby.collect_participants(window).await;
                beacon.stop().await;

                if participants.is_empty() {
                    println!("{}", "No players joined. Restarting...".bright_yellow());
                    Phase::Restarting
                } else {
                    Phase::Playing(participants)
                }
            }

            Phase::Playing(participants) => {
                let config = GameConfig {
                    answer_timeout: Duration::from_secs(args.answer_timeout),
                };
                let mut game = TriviaGame::new(participants, config);
                let outcome = game.play(questions::question_bank()).await;
                Phase::Closing(game, outcome)
            }

            Phase::Closing(game, outcome) => {
                let roster = game.roster();
                let rounds = game.close(&outcome).await;
                stats.record_session(&roster, &rounds, &outcome);
                if let Err(e) = stats.save(&args.stats_file) {
                    warn!("Failed to save statistics: {}", e);
                }
                Phase::Restarting
            }

            Phase::Restarting => Phase::Discovering,
        };
    }
}

async fn start_advertising(args: &Args) -> std::io::Result<(Lobby, Beacon)> {
    let lobby = Lobby::bind(&args.host, args.port).await?;
    println!(
        "{}",
        format!("Server started, listening on port {}", lobby.port()).bright_blue()
    );
    let beacon = Beacon::spawn(lobby.port()).await?;
    Ok((lobby, beacon))
}
