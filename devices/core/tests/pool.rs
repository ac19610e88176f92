use std::time::Duration;

use rgb_sync_core::mock::{MockDiscovery, MockProbe};
use rgb_sync_core::{
    ColorFrame, DeviceClass, DevicePool, LogicalKey, MouseKind, PoolConfig, Reconfigure, Rgb,
};
use tokio::runtime::Handle;

const KEYBOARD: DeviceClass = DeviceClass::Keyboard;
const MOUSE: DeviceClass = DeviceClass::Mouse(MouseKind::Standard);

async fn until(what: &str, mut done: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !done() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap_or_else(|_| panic!("timed out waiting for {what}"));
}

fn frame(color: Rgb) -> ColorFrame {
    ColorFrame::new().with(LogicalKey::Space, color)
}

fn painted(probe: &MockProbe, color: Rgb) -> bool {
    probe
        .frames()
        .iter()
        .any(|f| f.get(LogicalKey::Space) == Some(color))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn devices_are_ordered_by_class_then_name() {
    let mut discovery = MockDiscovery::new(&[
        ("zeta strip", DeviceClass::Generic),
        ("mouse", MOUSE),
        ("b keyboard", KEYBOARD),
        ("a keyboard", KEYBOARD),
        ("card", DeviceClass::Gpu),
    ]);
    let mut pool = DevicePool::new(Handle::current(), PoolConfig::default());
    assert_eq!(pool.initialize(&mut discovery), 5);

    let names: Vec<_> = pool.status().into_iter().map(|s| s.name).collect();
    assert_eq!(names, ["a keyboard", "b keyboard", "mouse", "card", "zeta strip"]);
    assert_eq!(pool.keyboard(), Some("a keyboard"));
    assert_eq!(
        pool.details(),
        "Connected devices: a keyboard, b keyboard, mouse, card, zeta strip"
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn disabled_classes_are_skipped() {
    let mut discovery = MockDiscovery::new(&[("kbd", KEYBOARD), ("mouse", MOUSE)]);
    let config = PoolConfig {
        mouse: false,
        ..Default::default()
    };
    let mut pool = DevicePool::new(Handle::current(), config);
    assert_eq!(pool.initialize(&mut discovery), 1);
    assert_eq!(pool.details(), "Connected devices: kbd");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn frames_reach_every_device() {
    let mut discovery = MockDiscovery::new(&[("kbd", KEYBOARD), ("mouse", MOUSE)]);
    let mut pool = DevicePool::new(Handle::current(), PoolConfig::default());
    pool.initialize(&mut discovery);

    let red = Rgb::new(255, 0, 0);
    assert_eq!(pool.publish(frame(red)), 2);

    let kbd = discovery.probe("kbd").unwrap();
    let mouse = discovery.probe("mouse").unwrap();
    until("both devices", || painted(&kbd, red) && painted(&mouse, red)).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn failed_device_is_contained_and_reaped() {
    let mut discovery = MockDiscovery::new(&[("broken", KEYBOARD), ("healthy", MOUSE)]);
    let mut pool = DevicePool::new(Handle::current(), PoolConfig::default());
    pool.initialize(&mut discovery);
    let broken = discovery.probe("broken").unwrap();
    let healthy = discovery.probe("healthy").unwrap();
    assert_eq!(pool.keyboard(), Some("broken"));

    broken.set_failing(true);
    pool.publish(frame(Rgb::new(1, 0, 0)));
    until("the failure", || pool.status().iter().any(|s| !s.connected)).await;
    until("the healthy device", || painted(&healthy, Rgb::new(1, 0, 0))).await;

    // the next publish skips and removes the failed device
    let green = Rgb::new(0, 255, 0);
    assert_eq!(pool.publish(frame(green)), 1);
    assert_eq!(pool.len(), 1);
    assert_eq!(pool.keyboard(), None);
    assert_eq!(broken.closed(), 1);
    assert_eq!(pool.details(), "Connected devices: healthy");

    until("the healthy device", || painted(&healthy, green)).await;
    assert_eq!(broken.attempts(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn disabling_removes_without_rediscovery() {
    let mut discovery = MockDiscovery::new(&[("kbd", KEYBOARD), ("mouse", MOUSE)]);
    let mut pool = DevicePool::new(Handle::current(), PoolConfig::default());
    pool.initialize(&mut discovery);

    let config = PoolConfig {
        mouse: false,
        ..Default::default()
    };
    assert_eq!(pool.apply_config(config.clone(), &mut discovery), Reconfigure::Removed(1));
    assert_eq!(discovery.calls(), 1);
    assert_eq!(discovery.probe("mouse").unwrap().closed(), 1);
    assert_eq!(discovery.probe("kbd").unwrap().closed(), 0);
    assert_eq!(pool.apply_config(config, &mut discovery), Reconfigure::Unchanged);

    // enabling anything restarts the whole pool
    assert_eq!(
        pool.apply_config(PoolConfig::default(), &mut discovery),
        Reconfigure::Restarted(2)
    );
    assert_eq!(discovery.calls(), 2);
    assert_eq!(discovery.probe("kbd").unwrap().closed(), 1);
    assert_eq!(pool.keyboard(), Some("kbd"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn shutdown_releases_everything() {
    let mut discovery = MockDiscovery::new(&[("kbd", KEYBOARD), ("mouse", MOUSE)]);
    let mut pool = DevicePool::new(Handle::current(), PoolConfig::default());
    pool.initialize(&mut discovery);
    pool.shutdown();
    pool.shutdown();

    assert!(pool.is_empty());
    assert_eq!(pool.details(), "No connected devices");
    assert_eq!(pool.performance(), "");
    assert_eq!(discovery.probe("kbd").unwrap().closed(), 1);
    assert_eq!(discovery.probe("mouse").unwrap().closed(), 1);
    assert_eq!(pool.publish(frame(Rgb::BLACK)), 0);
}
