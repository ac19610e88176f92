//! Test doubles for drivers and the scheduler.
//!
//! [`MockTransport`] records every report and can be told to fail, and
//! [`MockDevice`] is a device whose behavior is steered through a
//! [`MockProbe`] kept by the test after the device is moved away.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use crate::{
    ColorFrame, Device, DeviceClass, DeviceError, Discovery, PoolConfig, Result, Transport,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One transport call, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Feature(Vec<u8>),
    Output(Vec<u8>),
    Read(u8),
}

#[derive(Default)]
struct TransportState {
    log: Vec<Sent>,
    writes: usize,
    fail_on_write: Option<usize>,
    replies: HashMap<u8, VecDeque<Vec<u8>>>,
    default_replies: HashMap<u8, Vec<u8>>,
    fail_reads: bool,
}

/// Recording [`Transport`]. Clones share the same log and script.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<TransportState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the `n`th write (0 based, feature and output reports counted together)
    pub fn fail_on_write(&self, n: usize) {
        lock(&self.state).fail_on_write = Some(n);
    }

    /// Queue a one-shot reply for a feature report read
    pub fn push_reply(&self, report_id: u8, reply: Vec<u8>) {
        lock(&self.state)
            .replies
            .entry(report_id)
            .or_default()
            .push_back(reply);
    }

    /// Reply used for `report_id` once queued replies run out
    pub fn set_default_reply(&self, report_id: u8, reply: Vec<u8>) {
        lock(&self.state).default_replies.insert(report_id, reply);
    }

    pub fn fail_reads(&self, fail: bool) {
        lock(&self.state).fail_reads = fail;
    }

    pub fn log(&self) -> Vec<Sent> {
        lock(&self.state).log.clone()
    }

    /// Output reports only
    pub fn outputs(&self) -> Vec<Vec<u8>> {
        lock(&self.state)
            .log
            .iter()
            .filter_map(|s| match s {
                Sent::Output(data) => Some(data.clone()),
                _ => None,
            })
            .collect()
    }

    /// Feature reports only
    pub fn features(&self) -> Vec<Vec<u8>> {
        lock(&self.state)
            .log
            .iter()
            .filter_map(|s| match s {
                Sent::Feature(data) => Some(data.clone()),
                _ => None,
            })
            .collect()
    }

    /// Number of reads of `report_id`
    pub fn reads(&self, report_id: u8) -> usize {
        lock(&self.state)
            .log
            .iter()
            .filter(|s| **s == Sent::Read(report_id))
            .count()
    }

    pub fn clear(&self) {
        lock(&self.state).log.clear();
    }

    fn write(&self, entry: Sent) -> Result<()> {
        let mut state = lock(&self.state);
        let n = state.writes;
        state.writes += 1;
        if state.fail_on_write == Some(n) {
            return Err(DeviceError::CommandFailed("mock transport failure"));
        }
        state.log.push(entry);
        Ok(())
    }
}

impl Transport for MockTransport {
    fn send_feature_report(&mut self, data: &[u8]) -> Result<()> {
        self.write(Sent::Feature(data.to_vec()))
    }

    fn read_feature_report(&mut self, report_id: u8, len: usize) -> Result<Vec<u8>> {
        let mut state = lock(&self.state);
        state.log.push(Sent::Read(report_id));
        if state.fail_reads {
            return Err(DeviceError::CommandFailed("mock read failure"));
        }
        let queued = state.replies.get_mut(&report_id).and_then(VecDeque::pop_front);
        let mut reply = match queued {
            Some(reply) => reply,
            None => state
                .default_replies
                .get(&report_id)
                .cloned()
                .unwrap_or_else(|| vec![report_id]),
        };
        reply.truncate(len);
        Ok(reply)
    }

    fn write_report(&mut self, data: &[u8]) -> Result<()> {
        self.write(Sent::Output(data.to_vec()))
    }
}

#[derive(Default)]
struct ProbeState {
    frames: Mutex<Vec<ColorFrame>>,
    attempts: AtomicUsize,
    closed: AtomicUsize,
    failing: AtomicBool,
    delay: Mutex<Duration>,
    held: Mutex<bool>,
    gate: Condvar,
    entered: AtomicUsize,
}

/// Test-side handle onto a [`MockDevice`]
#[derive(Clone, Default)]
pub struct MockProbe {
    state: Arc<ProbeState>,
}

impl MockProbe {
    /// Frames applied successfully, in order
    pub fn frames(&self) -> Vec<ColorFrame> {
        lock(&self.state.frames).clone()
    }

    /// Calls to `apply_frame`, including failed and cancelled ones
    pub fn attempts(&self) -> usize {
        self.state.attempts.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.state.closed.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, failing: bool) {
        self.state.failing.store(failing, Ordering::SeqCst);
    }

    /// Make every update take at least `delay`
    pub fn set_delay(&self, delay: Duration) {
        *lock(&self.state.delay) = delay;
    }

    /// Block updates inside `apply_frame` until [`Self::release`]
    pub fn hold(&self) {
        *lock(&self.state.held) = true;
    }

    pub fn release(&self) {
        *lock(&self.state.held) = false;
        self.state.gate.notify_all();
    }

    /// Wait until `n` updates have entered `apply_frame`
    pub fn wait_entered(&self, n: usize) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while self.state.entered.load(Ordering::SeqCst) < n {
            assert!(Instant::now() < deadline, "device was never updated");
            std::thread::sleep(Duration::from_millis(1));
        }
    }
}

/// Scriptable [`Device`]
pub struct MockDevice {
    name: String,
    class: DeviceClass,
    updates_per_second: f32,
    state: Arc<ProbeState>,
}

impl MockDevice {
    pub fn new(name: &str, class: DeviceClass) -> (Self, MockProbe) {
        let probe = MockProbe::default();
        (Self::with_probe(name, class, &probe), probe)
    }

    fn with_probe(name: &str, class: DeviceClass, probe: &MockProbe) -> Self {
        Self {
            name: name.to_string(),
            class,
            updates_per_second: 100.0,
            state: probe.state.clone(),
        }
    }
}

impl Device for MockDevice {
    fn name(&self) -> &str {
        &self.name
    }

    fn class(&self) -> DeviceClass {
        self.class
    }

    fn led_count(&self) -> usize {
        0
    }

    fn updates_per_second(&self) -> f32 {
        self.updates_per_second
    }

    fn apply_frame(&mut self, frame: &ColorFrame, cancel: &CancellationToken) -> Result<()> {
        let state = &self.state;
        state.attempts.fetch_add(1, Ordering::SeqCst);
        state.entered.fetch_add(1, Ordering::SeqCst);
        let start = Instant::now();

        let mut held = lock(&state.held);
        while *held {
            held = state.gate.wait(held).unwrap_or_else(PoisonError::into_inner);
        }
        drop(held);

        let delay = *lock(&state.delay);
        if let Some(rest) = delay.checked_sub(start.elapsed()) {
            std::thread::sleep(rest);
        }

        if cancel.is_cancelled() {
            return Err(DeviceError::Cancelled);
        }
        if state.failing.load(Ordering::SeqCst) {
            return Err(DeviceError::CommandFailed("mock device failure"));
        }
        lock(&state.frames).push(frame.clone());
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.state.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// [`Discovery`] returning a fixed set of mock devices on every call.
///
/// Each name keeps one probe across rediscoveries, so tests can follow a
/// device through a pool restart.
pub struct MockDiscovery {
    devices: Vec<(String, DeviceClass, MockProbe)>,
    calls: usize,
}

impl MockDiscovery {
    pub fn new(devices: &[(&str, DeviceClass)]) -> Self {
        Self {
            devices: devices
                .iter()
                .map(|&(name, class)| (name.to_string(), class, MockProbe::default()))
                .collect(),
            calls: 0,
        }
    }

    pub fn probe(&self, name: &str) -> Option<MockProbe> {
        self.devices
            .iter()
            .find(|(n, ..)| n == name)
            .map(|(.., probe)| probe.clone())
    }

    /// Number of times discovery ran
    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl Discovery for MockDiscovery {
    fn discover(&mut self, config: &PoolConfig) -> Vec<Box<dyn Device>> {
        self.calls += 1;
        self.devices
            .iter()
            .filter(|(_, class, _)| config.enables(*class))
            .map(|(name, class, probe)| {
                Box::new(MockDevice::with_probe(name, *class, probe)) as Box<dyn Device>
            })
            .collect()
    }
}
