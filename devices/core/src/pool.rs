//! The set of active device schedulers.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::runtime::Handle;
use tracing::{info, warn};

use crate::{ColorFrame, DeviceClass, DeviceStatus, Discovery, MouseKind, UpdateScheduler};

/// Which device classes to drive, and how
#[derive(Debug, Clone, PartialEq)]
pub struct PoolConfig {
    pub keyboard: bool,
    pub mouse: bool,
    pub gpu: bool,
    /// Devices without a more specific class
    pub other: bool,
    /// Zone layout to assume for vendor mice
    pub mouse_preference: MouseKind,
    /// Per-device rate overrides, by device name
    pub rates: HashMap<String, f32>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            keyboard: true,
            mouse: true,
            gpu: true,
            other: true,
            mouse_preference: MouseKind::Standard,
            rates: HashMap::new(),
        }
    }
}

impl PoolConfig {
    pub fn enables(&self, class: DeviceClass) -> bool {
        match class {
            DeviceClass::Keyboard => self.keyboard,
            DeviceClass::Mouse(_) => self.mouse,
            DeviceClass::Gpu => self.gpu,
            DeviceClass::Generic => self.other,
        }
    }

    fn toggles(&self) -> [bool; 4] {
        [self.keyboard, self.mouse, self.gpu, self.other]
    }
}

/// What [`DevicePool::apply_config`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconfigure {
    Unchanged,
    /// Only disabled classes were dropped, other devices kept running
    Removed(usize),
    /// Everything was shut down and rediscovered
    Restarted(usize),
}

/// Owns every running [`UpdateScheduler`] and fans frames out to them.
///
/// A device that fails is removed on the next publish and stays gone until
/// the pool is initialized again.
pub struct DevicePool {
    runtime: Handle,
    config: PoolConfig,
    schedulers: Vec<UpdateScheduler>,
    keyboard: Option<u64>,
}

impl DevicePool {
    pub fn new(runtime: Handle, config: PoolConfig) -> Self {
        Self {
            runtime,
            config,
            schedulers: Vec::new(),
            keyboard: None,
        }
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Shut down any running devices, then discover and start every enabled
    /// device. Returns the number of devices started.
    pub fn initialize(&mut self, discovery: &mut dyn Discovery) -> usize {
        self.shutdown();

        let mut devices = discovery.discover(&self.config);
        devices.retain(|d| self.config.enables(d.class()));
        devices.sort_by(|a, b| {
            (a.class().sort_rank(), a.name()).cmp(&(b.class().sort_rank(), b.name()))
        });

        for device in devices {
            let rate = self
                .config
                .rates
                .get(device.name())
                .copied()
                .unwrap_or_else(|| device.updates_per_second());
            let mut scheduler = UpdateScheduler::new(device, rate);
            scheduler.start(&self.runtime);
            if self.keyboard.is_none() && scheduler.class() == DeviceClass::Keyboard {
                self.keyboard = Some(scheduler.id());
            }
            self.schedulers.push(scheduler);
        }

        info!("{}", self.details());
        self.schedulers.len()
    }

    /// Hand `frame` to every connected device, then drop devices that have
    /// failed. Returns how many devices the frame was given to.
    pub fn publish(&mut self, frame: impl Into<Arc<ColorFrame>>) -> usize {
        let frame = frame.into();
        let mut delivered = 0;
        for scheduler in self.schedulers.iter().filter(|s| s.is_connected()) {
            scheduler.publish(frame.clone());
            delivered += 1;
        }
        self.reap();
        delivered
    }

    fn reap(&mut self) {
        if self.schedulers.iter().all(UpdateScheduler::is_connected) {
            return;
        }
        let (live, dead): (Vec<_>, Vec<_>) = std::mem::take(&mut self.schedulers)
            .into_iter()
            .partition(UpdateScheduler::is_connected);
        self.schedulers = live;
        for mut scheduler in dead {
            warn!(device = scheduler.name(), "device disconnected, removing");
            if self.keyboard == Some(scheduler.id()) {
                self.keyboard = None;
            }
            scheduler.shutdown();
        }
    }

    /// Swap in a new configuration. Enabling anything rediscovers all devices;
    /// disabling only removes the affected classes.
    pub fn apply_config(
        &mut self,
        config: PoolConfig,
        discovery: &mut dyn Discovery,
    ) -> Reconfigure {
        if config == self.config {
            return Reconfigure::Unchanged;
        }
        let old = std::mem::replace(&mut self.config, config);

        let enabled = old
            .toggles()
            .iter()
            .zip(self.config.toggles())
            .any(|(was, now)| !was && now);
        if enabled
            || old.mouse_preference != self.config.mouse_preference
            || old.rates != self.config.rates
        {
            info!("device settings changed, restarting devices");
            return Reconfigure::Restarted(self.initialize(discovery));
        }

        let before = self.schedulers.len();
        let (keep, disabled): (Vec<_>, Vec<_>) = std::mem::take(&mut self.schedulers)
            .into_iter()
            .partition(|s| self.config.enables(s.class()));
        self.schedulers = keep;
        for mut scheduler in disabled {
            info!(device = scheduler.name(), "{} disabled", scheduler.class().as_str());
            if self.keyboard == Some(scheduler.id()) {
                self.keyboard = None;
            }
            scheduler.shutdown();
        }
        Reconfigure::Removed(before - self.schedulers.len())
    }

    /// Name of the device currently holding the keyboard role
    pub fn keyboard(&self) -> Option<&str> {
        let id = self.keyboard?;
        self.schedulers
            .iter()
            .find(|s| s.id() == id)
            .map(UpdateScheduler::name)
    }

    pub fn len(&self) -> usize {
        self.schedulers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schedulers.is_empty()
    }

    pub fn status(&self) -> Vec<DeviceStatus> {
        self.schedulers.iter().map(UpdateScheduler::status).collect()
    }

    /// Human readable list of connected devices
    pub fn details(&self) -> String {
        let names: Vec<_> = self
            .schedulers
            .iter()
            .filter(|s| s.is_connected())
            .map(UpdateScheduler::name)
            .collect();
        if names.is_empty() {
            "No connected devices".to_string()
        } else {
            format!("Connected devices: {}", names.join(", "))
        }
    }

    /// Last update duration per connected device, in whole milliseconds
    pub fn performance(&self) -> String {
        self.schedulers
            .iter()
            .filter(|s| s.is_connected())
            .map(|s| format!("{} {}ms", s.name(), s.elapsed().as_millis()))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Stop and release every device
    pub fn shutdown(&mut self) {
        for mut scheduler in self.schedulers.drain(..) {
            scheduler.shutdown();
        }
        self.keyboard = None;
    }
}

impl Drop for DevicePool {
    fn drop(&mut self) {
        self.shutdown();
    }
}
