//! Wake signaler — one best-effort magic packet per request.
//!
//! A magic packet is six 0xFF bytes followed by sixteen repetitions of the
//! target MAC, sent as a UDP broadcast. Delivery is fire-and-forget; the
//! only feedback a caller gets is whether the datagram left this machine.

use std::io;
use std::net::{IpAddr, SocketAddr};

use tokio::net::UdpSocket;

/// Why a wake request failed. Never fatal — the HTTP layer maps these to
/// error responses and registry state is untouched either way.
#[derive(Debug, thiserror::Error)]
pub enum WakeError {
    #[error("no hardware address provided")]
    Empty,
    #[error("malformed hardware address '{0}'")]
    Malformed(String),
    #[error("failed to send wake packet: {0}")]
    Send(#[from] io::Error),
}

pub struct WakeSender {
    dest: SocketAddr,
}

impl WakeSender {
    pub fn new(broadcast_addr: IpAddr, port: u16) -> Self {
        Self {
            dest: SocketAddr::new(broadcast_addr, port),
        }
    }

    /// Transmit one magic packet for `mac`.
    pub async fn wake(&self, mac: &str) -> Result<(), WakeError> {
        let mac = mac.trim();
        if mac.is_empty() {
            return Err(WakeError::Empty);
        }
        let octets = parse_mac(mac)?;
        let packet = magic_packet(octets);

        let socket = UdpSocket::bind("0.0.0.0:0").await?;
        socket.set_broadcast(true)?;
        socket.send_to(&packet, self.dest).await?;

        tracing::info!(mac = %mac, dest = %self.dest, "wake packet sent");
        Ok(())
    }
}

/// Parse "aa:bb:cc:dd:ee:ff" (or '-' separated) into octets.
fn parse_mac(mac: &str) -> Result<[u8; 6], WakeError> {
    let parts: Vec<&str> = mac.split([':', '-']).collect();
    if parts.len() != 6 {
        return Err(WakeError::Malformed(mac.to_string()));
    }
    let mut octets = [0u8; 6];
    for (i, part) in parts.iter().enumerate() {
        let decoded = hex::decode(part).map_err(|_| WakeError::Malformed(mac.to_string()))?;
        match decoded.as_slice() {
            [byte] => octets[i] = *byte,
            _ => return Err(WakeError::Malformed(mac.to_string())),
        }
    }
    Ok(octets)
}

/// 6 × 0xFF, then the MAC sixteen times — 102 bytes.
fn magic_packet(mac: [u8; 6]) -> [u8; 102] {
    let mut packet = [0xffu8; 102];
    for rep in 0..16 {
        packet[6 + rep * 6..6 + (rep + 1) * 6].copy_from_slice(&mac);
    }
    packet
}
