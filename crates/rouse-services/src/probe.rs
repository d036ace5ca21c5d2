//! Reachability probing — a single ICMP echo request per call.
//!
//! The prober and resolver consume the `ReachabilityProbe` trait; tests
//! substitute fakes, the daemon installs `IcmpProbe`.

use std::mem::MaybeUninit;
use std::net::{Ipv4Addr, SocketAddrV4};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use socket2::{Domain, Protocol, Socket, Type};

/// Liveness check against a single network address.
#[async_trait]
pub trait ReachabilityProbe: Send + Sync {
    /// Send one echo request. `Ok(true)` — the host replied within the
    /// timeout; `Ok(false)` — it did not; `Err` — the probe itself failed
    /// (unparseable address, socket or permission problem).
    async fn probe(&self, addr: &str, timeout: Duration) -> Result<bool>;
}

const ICMP_ECHO_REQUEST: u8 = 8;
const ICMP_ECHO_REPLY: u8 = 0;
const ICMP_DEST_UNREACHABLE: u8 = 3;
const ICMP_TIME_EXCEEDED: u8 = 11;

const ECHO_PAYLOAD: &[u8] = b"rouse-probe";

/// ICMP echo via an unprivileged datagram socket.
///
/// Uses `SOCK_DGRAM`/`IPPROTO_ICMP`, so no raw-socket capability is needed,
/// but `net.ipv4.ping_group_range` must cover the process group. The kernel
/// owns the echo identifier on these sockets and only delivers replies to
/// our own requests.
pub struct IcmpProbe;

#[async_trait]
impl ReachabilityProbe for IcmpProbe {
    async fn probe(&self, addr: &str, timeout: Duration) -> Result<bool> {
        let ip: Ipv4Addr = addr
            .trim()
            .parse()
            .with_context(|| format!("invalid IPv4 address '{addr}'"))?;

        // socket2 send/recv are blocking calls
        tokio::task::spawn_blocking(move || blocking_echo(ip, timeout))
            .await
            .context("probe task panicked")?
    }
}

fn blocking_echo(ip: Ipv4Addr, timeout: Duration) -> Result<bool> {
    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::ICMPV4))
        .context("failed to open ICMP socket — check net.ipv4.ping_group_range")?;
    socket
        .set_read_timeout(Some(timeout))
        .context("SO_RCVTIMEO")?;

    let dest = SocketAddrV4::new(ip, 0);
    let packet = echo_request(1);
    socket
        .send_to(&packet, &dest.into())
        .with_context(|| format!("echo send to {ip} failed"))?;

    let deadline = Instant::now() + timeout;
    let mut buf = [MaybeUninit::<u8>::uninit(); 128];
    loop {
        match socket.recv_from(&mut buf) {
            Ok((n, _)) if n > 0 => {
                // kernel filled the first n bytes
                let icmp_type = unsafe { buf[0].assume_init() };
                match icmp_type {
                    ICMP_ECHO_REPLY => return Ok(true),
                    ICMP_DEST_UNREACHABLE | ICMP_TIME_EXCEEDED => return Ok(false),
                    _ => {}
                }
            }
            Ok(_) => {}
            Err(e)
                if e.kind() == std::io::ErrorKind::WouldBlock
                    || e.kind() == std::io::ErrorKind::TimedOut =>
            {
                return Ok(false)
            }
            Err(e) => return Err(e).context("echo recv failed"),
        }

        // stray datagram — keep waiting for whatever remains of the window
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Ok(false);
        }
        socket
            .set_read_timeout(Some(remaining))
            .context("SO_RCVTIMEO")?;
    }
}

/// Build an echo request datagram: 8-byte ICMP header plus payload.
/// The identifier field is left zero — the kernel rewrites it on
/// unprivileged sockets.
fn echo_request(seq: u16) -> Vec<u8> {
    let mut packet = vec![ICMP_ECHO_REQUEST, 0, 0, 0, 0, 0, 0, 0];
    packet[6] = (seq >> 8) as u8;
    packet[7] = (seq & 0xff) as u8;
    packet.extend_from_slice(ECHO_PAYLOAD);

    let ck = checksum(&packet);
    packet[2] = (ck >> 8) as u8;
    packet[3] = (ck & 0xff) as u8;
    packet
}

/// RFC 1071 internet checksum.
fn checksum(data: &[u8]) -> u16 {
    let mut sum = 0u32;
    for chunk in data.chunks(2) {
        let word = if chunk.len() == 2 {
            u16::from_be_bytes([chunk[0], chunk[1]])
        } else {
            u16::from_be_bytes([chunk[0], 0])
        };
        sum = sum.wrapping_add(word as u32);
    }
    while sum >> 16 != 0 {
        sum = (sum & 0xffff) + (sum >> 16);
    }
    !(sum as u16)
}
