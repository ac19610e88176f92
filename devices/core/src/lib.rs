//! Shared types and per-device update scheduling for rgb-sync drivers.
//!
//! This crate provides:
//! - `LogicalKey`, `Rgb` and `ColorFrame`, the hardware independent frame model
//! - The `Transport` and `Device` traits implemented by each driver crate
//! - `LedMap` for static key to LED index tables
//! - `UpdateScheduler` and `DevicePool`, which push the latest frame to every
//!   device at its own rate without letting one device stall another

mod device;
mod error;
mod frame;
mod keys;
mod leds;
mod pool;
mod scheduler;
mod transport;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use device::{Device, DeviceClass, DeviceInfo, Discovery, MouseKind};
pub use error::{DeviceError, Result};
pub use frame::{ColorFrame, Rgb};
pub use keys::LogicalKey;
pub use leds::LedMap;
pub use pool::{DevicePool, PoolConfig, Reconfigure};
pub use scheduler::{DeviceStatus, Tick, UpdateScheduler};
pub use transport::Transport;

/// Re-exported so drivers and the daemon share one token type
pub use tokio_util::sync::CancellationToken;
