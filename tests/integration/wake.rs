//! Magic-packet delivery over loopback.

use rouse_services::{WakeError, WakeSender};
use std::time::Duration;
use tokio::net::UdpSocket;

#[tokio::test]
async fn magic_packet_arrives_intact() {
    let listener = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let sender = WakeSender::new("127.0.0.1".parse().unwrap(), port);
    sender.wake("aa:bb:cc:dd:ee:ff").await.unwrap();

    let mut buf = [0u8; 256];
    let (n, _) = tokio::time::timeout(Duration::from_secs(2), listener.recv_from(&mut buf))
        .await
        .expect("no packet within 2s")
        .unwrap();

    assert_eq!(n, 102);
    assert_eq!(&buf[..6], &[0xff; 6]);
    let mac = [0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff];
    for rep in 0..16 {
        assert_eq!(&buf[6 + rep * 6..6 + (rep + 1) * 6], &mac);
    }
}

#[tokio::test]
async fn dash_separated_mac_is_accepted() {
    let listener = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let sender = WakeSender::new("127.0.0.1".parse().unwrap(), port);
    sender.wake("01-02-03-04-05-06").await.unwrap();

    let mut buf = [0u8; 256];
    let (n, _) = tokio::time::timeout(Duration::from_secs(2), listener.recv_from(&mut buf))
        .await
        .expect("no packet within 2s")
        .unwrap();
    assert_eq!(n, 102);
    assert_eq!(&buf[6..12], &[1, 2, 3, 4, 5, 6]);
}

#[tokio::test]
async fn bad_input_never_transmits() {
    let listener = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let sender = WakeSender::new("127.0.0.1".parse().unwrap(), port);

    assert!(matches!(sender.wake("").await, Err(WakeError::Empty)));
    assert!(matches!(
        sender.wake("aa:bb").await,
        Err(WakeError::Malformed(_))
    ));

    // nothing should be waiting on the socket
    let mut buf = [0u8; 8];
    let got = tokio::time::timeout(Duration::from_millis(200), listener.recv_from(&mut buf)).await;
    assert!(got.is_err(), "unexpected datagram after rejected input");
}
