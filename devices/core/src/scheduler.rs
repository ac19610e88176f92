//! Per-device update scheduler.
//!
//! Each device gets its own timer task. The renderer only ever touches the
//! pending frame slot, so a slow or stuck device cannot hold up publishing or
//! any other device.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{ColorFrame, Device, DeviceClass, DeviceError};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Outcome of a single timer fire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// A frame was encoded and transmitted
    Sent,
    /// Encode or transmit failed, the device is now disconnected
    Failed,
    /// Nothing was published since the last update
    Idle,
    /// Another update is still in flight, this fire was dropped
    Busy,
    /// The device failed earlier and is no longer updated
    Disconnected,
    /// The scheduler is shutting down
    Cancelled,
}

/// Point-in-time view of one scheduled device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceStatus {
    pub name: String,
    pub class: DeviceClass,
    pub connected: bool,
    /// Duration of the last update attempt
    pub elapsed: Duration,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

struct Shared {
    name: String,
    device: Mutex<Option<Box<dyn Device>>>,
    pending: Mutex<Option<Arc<ColorFrame>>>,
    in_flight: AtomicBool,
    connected: AtomicBool,
    elapsed_us: AtomicU64,
    cancel: CancellationToken,
}

/// Clears the in-flight flag when an update ends, even by unwinding.
/// A panicking device is treated like a failed write.
struct InFlight<'a>(&'a Shared);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            self.0.connected.store(false, Ordering::Release);
        }
        self.0.in_flight.store(false, Ordering::Release);
    }
}

impl Shared {
    fn tick(&self) -> Tick {
        if self.cancel.is_cancelled() {
            return Tick::Cancelled;
        }
        if !self.connected.load(Ordering::Acquire) {
            return Tick::Disconnected;
        }
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Tick::Busy;
        }
        let _guard = InFlight(self);

        let Some(frame) = lock(&self.pending).take() else {
            return Tick::Idle;
        };

        let mut device = lock(&self.device);
        let Some(device) = device.as_mut() else {
            return Tick::Cancelled;
        };

        let start = Instant::now();
        let result = device.apply_frame(&frame, &self.cancel);
        let elapsed = start.elapsed();
        self.elapsed_us
            .store(elapsed.as_micros() as u64, Ordering::Release);

        match result {
            Ok(()) => {
                debug!(device = %self.name, ?elapsed, "frame sent");
                Tick::Sent
            },
            Err(DeviceError::Cancelled) => Tick::Cancelled,
            Err(e) => {
                warn!(device = %self.name, "update failed, marking disconnected: {e}");
                self.connected.store(false, Ordering::Release);
                Tick::Failed
            },
        }
    }
}

/// Owns one device and updates it at a fixed rate with the latest frame.
pub struct UpdateScheduler {
    id: u64,
    class: DeviceClass,
    period: Duration,
    shared: Arc<Shared>,
    task: Option<JoinHandle<()>>,
}

impl UpdateScheduler {
    /// Take ownership of a device. The timer does not run until [`Self::start`].
    pub fn new(device: Box<dyn Device>, updates_per_second: f32) -> Self {
        // Whole milliseconds, never zero
        let millis = (1000.0 / updates_per_second.max(1.0)) as u64;
        Self {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            class: device.class(),
            period: Duration::from_millis(millis.max(1)),
            shared: Arc::new(Shared {
                name: device.name().to_string(),
                device: Mutex::new(Some(device)),
                pending: Mutex::new(None),
                in_flight: AtomicBool::new(false),
                connected: AtomicBool::new(true),
                elapsed_us: AtomicU64::new(0),
                cancel: CancellationToken::new(),
            }),
            task: None,
        }
    }

    /// Spawn the timer task on `runtime`. Each fire runs the blocking update on
    /// the blocking pool, so fires that land while a write is still in flight
    /// are dropped by [`Self::tick`].
    pub fn start(&mut self, runtime: &Handle) {
        if self.task.is_some() || self.shared.cancel.is_cancelled() {
            return;
        }
        let shared = self.shared.clone();
        let period = self.period;
        info!(device = %shared.name, ?period, "starting updates");
        self.task = Some(runtime.spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = shared.cancel.cancelled() => break,
                    _ = interval.tick() => {
                        if !shared.connected.load(Ordering::Acquire) {
                            break;
                        }
                        let shared = shared.clone();
                        tokio::task::spawn_blocking(move || shared.tick());
                    }
                }
            }
        }));
    }

    /// Store `frame` as the next frame to paint, replacing any unconsumed one
    pub fn publish(&self, frame: Arc<ColorFrame>) {
        *lock(&self.shared.pending) = Some(frame);
    }

    /// Run one update cycle on the calling thread
    pub fn tick(&self) -> Tick {
        self.shared.tick()
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.shared.name
    }

    pub fn class(&self) -> DeviceClass {
        self.class
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_connected(&self) -> bool {
        self.shared.connected.load(Ordering::Acquire)
    }

    /// Duration of the last update attempt, successful or not
    pub fn elapsed(&self) -> Duration {
        Duration::from_micros(self.shared.elapsed_us.load(Ordering::Acquire))
    }

    pub fn status(&self) -> DeviceStatus {
        DeviceStatus {
            name: self.shared.name.clone(),
            class: self.class,
            connected: self.is_connected(),
            elapsed: self.elapsed(),
        }
    }

    /// Stop the timer, wait out an in-flight update, then close and drop the
    /// device. Safe to call more than once.
    pub fn shutdown(&mut self) {
        self.shared.cancel.cancel();
        if let Some(task) = self.task.take() {
            task.abort();
        }
        let device = lock(&self.shared.device).take();
        if let Some(mut device) = device {
            if let Err(e) = device.close() {
                warn!(device = %self.shared.name, "failed to close device: {e}");
            }
            info!(device = %self.shared.name, "released");
        }
    }
}

impl Drop for UpdateScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}
