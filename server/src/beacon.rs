//! Discovery beacon advertising the session endpoint over UDP broadcast.

use log::{debug, warn};
use shared::{encode_offer, UDP_BROADCAST_PORT};
use std::io;
use std::net::{Ipv4Addr, SocketAddr};
use tokio::net::UdpSocket;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration};

/// Cadence of offer broadcasts.
const OFFER_INTERVAL: Duration = Duration::from_secs(1);

/// Handle to the background broadcast task.
///
/// The beacon runs only for the duration of the join window; `stop` signals
/// the task and waits for it to exit so no offers are sent after the lobby
/// closes.
pub struct Beacon {
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl Beacon {
    /// Starts broadcasting offers for `advertised_port` to the LAN.
    pub async fn spawn(advertised_port: u16) -> io::Result<Self> {
        let target = SocketAddr::from((Ipv4Addr::BROADCAST, UDP_BROADCAST_PORT));
        Self::spawn_to(advertised_port, target).await
    }

    /// Starts broadcasting offers to an explicit destination address.
    pub async fn spawn_to(advertised_port: u16, target: SocketAddr) -> io::Result<Self> {
        let socket = UdpSocket::bind("0.0.0.0:0").await?;
        socket.set_broadcast(true)?;

        let (stop_tx, mut stop_rx) = watch::channel(false);
        let task = tokio::spawn(async move {
            let packet = encode_offer(advertised_port);
            let mut ticker = interval(OFFER_INTERVAL);

            loop {
                tokio::select! {
                    _ = stop_rx.changed() => break,
                    _ = ticker.tick() => {
                        // Best effort: packet loss is repaired by the next tick.
                        match socket.send_to(&packet, target).await {
                            Ok(_) => debug!("Offer broadcast sent for port {}", advertised_port),
                            Err(e) => warn!("Failed to send offer broadcast: {}", e),
                        }
                    }
                }
            }
        });

        Ok(Beacon { stop_tx, task })
    }

    /// Signals the beacon to stop and waits for the task to exit.
    pub async fn stop(self) {
        let _ = self.stop_tx.send(true);
        let _ = self.task.await;
    }
}
