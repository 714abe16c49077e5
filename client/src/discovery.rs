//! Offer listener: waits for a session advertisement on the LAN.

use colored::Colorize;
use log::debug;
use shared::{decode_offer, UDP_BROADCAST_PORT};
use std::io;
use std::net::IpAddr;
use tokio::net::UdpSocket;

/// Binds the broadcast-receive socket participants wait on.
pub async fn offer_socket() -> io::Result<UdpSocket> {
    UdpSocket::bind(("0.0.0.0", UDP_BROADCAST_PORT)).await
}

/// Blocks until a well-formed offer arrives, returning the host address
/// and its advertised TCP port.
///
/// Malformed or foreign datagrams are discarded silently — other beacons
/// and noise may share the network. The wait is unbounded by design: a
/// participant is always willing to wait for a session.
pub async fn listen_for_offers(socket: &UdpSocket) -> io::Result<(IpAddr, u16)> {
    let mut buf = [0u8; 64];
    loop {
        let (len, from) = socket.recv_from(&mut buf).await?;
        match decode_offer(&buf[..len]) {
            Some(port) => {
                println!(
                    "{}",
                    format!(
                        "Received offer from server at address {}, attempting to connect...",
                        from.ip()
                    )
                    .bright_blue()
                );
                return Ok((from.ip(), port));
            }
            None => debug!("Ignoring {} stray bytes from {}", len, from),
        }
    }
}
