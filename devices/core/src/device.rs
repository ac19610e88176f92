//! Core Device trait and related types.

use tokio_util::sync::CancellationToken;

use crate::{ColorFrame, Result};

/// Mouse sub-kinds with a different zone layout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MouseKind {
    #[default]
    Standard,
    /// Three individually addressable zones: logo, scroll wheel, front light
    Pugio,
}

/// Device class, used for enable toggles, status ordering and zone strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceClass {
    Generic,
    Keyboard,
    Mouse(MouseKind),
    Gpu,
}

impl DeviceClass {
    /// Ordering used when listing devices
    pub fn sort_rank(self) -> u8 {
        match self {
            DeviceClass::Keyboard => 1,
            DeviceClass::Mouse(_) => 2,
            DeviceClass::Gpu => 3,
            DeviceClass::Generic => u8::MAX,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DeviceClass::Generic => "other",
            DeviceClass::Keyboard => "keyboard",
            DeviceClass::Mouse(_) => "mouse",
            DeviceClass::Gpu => "gpu",
        }
    }
}

/// Static information about a device type for detection and the cli
#[derive(Debug, Clone, Copy)]
pub struct DeviceInfo {
    pub name: &'static str,
    pub cli_name: &'static str,
    pub class: DeviceClass,
    pub vendor_id: Option<u16>,
    pub product_ids: &'static [u16],
    /// Default scheduler rate
    pub updates_per_second: f32,
}

/// One connected lighting device, owned by exactly one scheduler.
///
/// `apply_frame` encodes the frame into the device's wire format and pushes
/// it through the transport. It is only ever called from the owning
/// scheduler, never concurrently with itself.
pub trait Device: Send {
    /// Stable display name
    fn name(&self) -> &str;

    fn class(&self) -> DeviceClass;

    /// Number of addressable LEDs
    fn led_count(&self) -> usize;

    fn updates_per_second(&self) -> f32;

    /// Encode and transmit a frame.
    ///
    /// Implementations check `cancel` after encoding and before writing the
    /// first report, returning [`DeviceError::Cancelled`](crate::DeviceError::Cancelled)
    /// without touching the transport.
    fn apply_frame(&mut self, frame: &ColorFrame, cancel: &CancellationToken) -> Result<()>;

    /// Release the device session. Called once before the transport is dropped.
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// External device enumeration. Returns every device of an enabled class that
/// opened and initialized successfully; failures are logged and skipped.
pub trait Discovery {
    fn discover(&mut self, config: &crate::PoolConfig) -> Vec<Box<dyn Device>>;
}
