use clap::Parser;
use client::discovery;
use client::session::Session;
use colored::Colorize;
use log::error;
use rand::seq::SliceRandom;
use tokio::net::UdpSocket;
use tokio::time::Duration;

const FALLBACK_NAMES: &[&str] = &[
    "Alice", "Bob", "Charlie", "David", "Eve", "Frank", "Grace", "Heidi", "Ivan", "Judy",
];

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Display name to register with (a random one is drawn when omitted)
    #[arg(short, long)]
    name: Option<String>,

    /// Answer timeout in seconds, matching the host's round timeout
    #[arg(long, default_value = "10")]
    answer_timeout: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();
    let answer_timeout = Duration::from_secs(args.answer_timeout);

    let socket = discovery::offer_socket().await?;
    println!(
        "{}",
        "Client started, listening for offer requests...".bright_yellow()
    );

    loop {
        let name = args.name.clone().unwrap_or_else(random_name);
        if let Err(e) = play_once(&socket, &name, answer_timeout).await {
            error!("Session ended with an error: {}", e);
        }
    }
}

async fn play_once(
    socket: &UdpSocket,
    name: &str,
    answer_timeout: Duration,
) -> std::io::Result<()> {
    let (host, port) = discovery::listen_for_offers(socket).await?;
    let mut session = Session::connect(host, port, name, answer_timeout).await?;
    session.run().await
}

fn random_name() -> String {
    FALLBACK_NAMES
        .choose(&mut rand::thread_rng())
        .unwrap_or(&"Player")
        .to_string()
}
