//! Resolver flow against the real /proc-style neighbor table parser.

use std::sync::Arc;
use std::time::Duration;

use rouse_services::{MacResolver, ProcNeighborTable, Resolution};

use crate::{temp_dir, ScriptedProbe};

const ARP_FIXTURE: &str = "\
IP address       HW type     Flags       HW address            Mask     Device
192.168.1.10     0x1         0x2         aa:bb:cc:dd:ee:ff     *        eth0
192.168.1.20     0x1         0x0         00:00:00:00:00:00     *        eth0
";

// per-test fixture files — these tests run in parallel
fn fixture_resolver(tag: &str, probe: ScriptedProbe) -> MacResolver {
    let dir = temp_dir("resolver");
    let path = dir.join(format!("arp-{tag}"));
    std::fs::write(&path, ARP_FIXTURE).unwrap();
    MacResolver::new(
        Arc::new(probe),
        Arc::new(ProcNeighborTable::with_path(path)),
        Duration::from_millis(1),
    )
}

#[tokio::test]
async fn resolves_through_parsed_table() {
    let resolver = fixture_resolver("ok", ScriptedProbe::uniform(true));
    assert_eq!(
        resolver.resolve("192.168.1.10").await,
        Resolution::Resolved("aa:bb:cc:dd:ee:ff".into())
    );
}

#[tokio::test]
async fn incomplete_table_entry_fails_cleanly() {
    let resolver = fixture_resolver("zero", ScriptedProbe::uniform(true));
    match resolver.resolve("192.168.1.20").await {
        Resolution::Failed(msg) => assert!(msg.contains("192.168.1.20")),
        other => panic!("expected failure, got {other:?}"),
    }
}

#[tokio::test]
async fn unknown_address_fails_cleanly() {
    let resolver = fixture_resolver("miss", ScriptedProbe::uniform(true));
    assert!(matches!(
        resolver.resolve("10.99.99.99").await,
        Resolution::Failed(_)
    ));
}

#[tokio::test]
async fn priming_probe_error_still_reaches_the_table() {
    // an unpingable host can still have a cached binding
    let resolver = fixture_resolver("err", ScriptedProbe::new(&[]));
    assert_eq!(
        resolver.resolve("192.168.1.10").await,
        Resolution::Resolved("aa:bb:cc:dd:ee:ff".into())
    );
}
