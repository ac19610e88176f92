//! High level hidapi abstraction for Roccat Vulcan keyboard lighting
//!
//! The keyboard exposes two interfaces: a control interface taking feature
//! reports, used once for the handshake, and an LED interface taking the
//! color map as output reports.

use abi::HardwareMap;
use handshake::HandshakeConfig;
use hidapi::{HidApi, HidDevice};
use rgb_sync_core::{
    CancellationToken, ColorFrame, Device, DeviceClass, DeviceError, DeviceInfo, LedMap, Result,
    Transport,
};
use tracing::{info, warn};

pub mod abi;
pub mod handshake;
pub mod keymap;

pub mod consts {
    pub const VULCAN_VENDOR_ID: u16 = 0x1E7D;
    pub const VULCAN_PRODUCT_IDS: &[u16] = &[0x307A, 0x3098];
    pub const CONTROL_INTERFACE: i32 = 1;
    pub const LED_INTERFACE: i32 = 3;
}

/// Static device info for detection
pub static INFO: DeviceInfo = DeviceInfo {
    name: "Roccat Vulcan",
    cli_name: "roccat-vulcan",
    class: DeviceClass::Keyboard,
    vendor_id: Some(consts::VULCAN_VENDOR_ID),
    product_ids: consts::VULCAN_PRODUCT_IDS,
    updates_per_second: 25.0,
};

/// Whether an enumerated interface belongs to a Vulcan
pub fn is_vulcan(device: &hidapi::DeviceInfo) -> bool {
    device.vendor_id() == consts::VULCAN_VENDOR_ID
        && consts::VULCAN_PRODUCT_IDS.contains(&device.product_id())
}

/// High level abstraction for an initialized Roccat Vulcan
pub struct RoccatVulcan<C: Transport = HidDevice, L: Transport = HidDevice> {
    /// Only used for the handshake, held so the interface stays open
    _control: C,
    leds: L,
    keys: LedMap,
    map: HardwareMap,
    initialized: bool,
}

impl RoccatVulcan {
    /// Find both interfaces of the first Vulcan and run the handshake
    pub fn open(api: &HidApi, config: &HandshakeConfig) -> Result<Self> {
        let find = |interface| {
            api.device_list()
                .find(|d| is_vulcan(d) && d.interface_number() == interface)
                .ok_or(DeviceError::DeviceNotFound)
        };
        let control = find(consts::CONTROL_INTERFACE)?.open_device(api)?;
        let leds = find(consts::LED_INTERFACE)?.open_device(api)?;
        Self::connect(control, leds, config)
    }
}

impl<C: Transport, L: Transport> RoccatVulcan<C, L> {
    /// Run the handshake over already open interfaces. Fails unless every
    /// step was acknowledged.
    pub fn connect(mut control: C, leds: L, config: &HandshakeConfig) -> Result<Self> {
        if let Err(e) = handshake::handshake(&mut control, config) {
            warn!("roccat vulcan handshake failed: {e}");
            return Err(e);
        }
        info!("roccat vulcan initialized");
        Ok(Self {
            _control: control,
            leds,
            keys: keymap::led_map(),
            map: HardwareMap::default(),
            initialized: true,
        })
    }

    pub fn hardware_map(&self) -> &HardwareMap {
        &self.map
    }
}

impl<C: Transport, L: Transport> Device for RoccatVulcan<C, L> {
    fn name(&self) -> &str {
        INFO.name
    }

    fn class(&self) -> DeviceClass {
        INFO.class
    }

    fn led_count(&self) -> usize {
        abi::KEY_COUNT
    }

    fn updates_per_second(&self) -> f32 {
        INFO.updates_per_second
    }

    fn apply_frame(&mut self, frame: &ColorFrame, cancel: &CancellationToken) -> Result<()> {
        if !self.initialized {
            return Err(DeviceError::NotInitialized);
        }
        for (key, color) in frame.iter() {
            for &index in self.keys.leds(key) {
                self.map.set_key(index, color);
            }
        }
        if cancel.is_cancelled() {
            return Err(DeviceError::Cancelled);
        }
        for report in self.map.reports() {
            self.leds.write_report(&report)?;
        }
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if self.initialized {
            self.initialized = false;
            info!("roccat vulcan released");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rgb_sync_core::mock::MockTransport;
    use rgb_sync_core::{LogicalKey, Rgb};

    use super::handshake::{INFO_REPORT, STATUS_REPORT};
    use super::*;

    const FAST: HandshakeConfig = HandshakeConfig {
        max_attempts: 3,
        interval: Duration::ZERO,
    };

    fn control(ready: bool) -> MockTransport {
        let control = MockTransport::new();
        control.set_default_reply(INFO_REPORT, vec![INFO_REPORT; 8]);
        let status = if ready { 0x01 } else { 0x00 };
        control.set_default_reply(STATUS_REPORT, vec![STATUS_REPORT, status, 0x00]);
        control
    }

    fn keyboard() -> (RoccatVulcan<MockTransport, MockTransport>, MockTransport) {
        let leds = MockTransport::new();
        let keyboard = RoccatVulcan::connect(control(true), leds.clone(), &FAST).unwrap();
        (keyboard, leds)
    }

    #[test]
    fn unacknowledged_handshake_refuses_device() {
        let leds = MockTransport::new();
        let err = RoccatVulcan::connect(control(false), leds.clone(), &FAST)
            .err()
            .unwrap();
        assert!(matches!(err, DeviceError::HandshakeTimeout { attempts: 3 }));
        assert!(leds.log().is_empty());
    }

    #[test]
    fn frame_is_seven_output_reports() {
        let (mut keyboard, leds) = keyboard();
        let frame = ColorFrame::new()
            .with(LogicalKey::Escape, Rgb::new(255, 0, 0))
            .with(LogicalKey::Z, Rgb::new(0, 0, 255))
            .with(LogicalKey::Space, Rgb::new(9, 9, 9));
        keyboard
            .apply_frame(&frame, &CancellationToken::new())
            .unwrap();

        let reports = leds.outputs();
        assert_eq!(reports.len(), 7);
        assert!(reports.iter().all(|r| r.len() == 65 && r[0] == 0));
        assert_eq!(reports[0][1..5], [0xA1, 0x01, 0x01, 0xB4]);
        // escape is key 0, red at map offset 0
        assert_eq!(reports[0][5], 255);
        // z is key 7, blue at map offset 31
        assert_eq!(reports[0][5 + 31], 255);
        assert_eq!(keyboard.hardware_map().as_bytes().iter().filter(|&&b| b != 0).count(), 2);
    }

    #[test]
    fn same_frame_gives_same_reports() {
        let (mut keyboard, leds) = keyboard();
        let cancel = CancellationToken::new();
        let frame = ColorFrame::new()
            .with(LogicalKey::Escape, Rgb::new(255, 0, 0))
            .with(LogicalKey::Z, Rgb::new(7, 8, 9));

        keyboard.apply_frame(&frame, &cancel).unwrap();
        let first = leds.outputs();
        leds.clear();
        keyboard.apply_frame(&frame, &cancel).unwrap();
        assert_eq!(leds.outputs(), first);
        assert_eq!(first.len(), 7);
    }

    #[test]
    fn failed_write_fails_frame() {
        let (mut keyboard, leds) = keyboard();
        leds.fail_on_write(2);
        assert!(keyboard
            .apply_frame(&ColorFrame::new(), &CancellationToken::new())
            .is_err());
        assert_eq!(leds.outputs().len(), 2);
    }

    #[test]
    fn cancelled_frame_writes_nothing() {
        let (mut keyboard, leds) = keyboard();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = keyboard
            .apply_frame(&ColorFrame::filled(Rgb::new(1, 1, 1)), &cancel)
            .unwrap_err();
        assert!(matches!(err, DeviceError::Cancelled));
        assert!(leds.log().is_empty());
    }

    #[test]
    fn closed_keyboard_refuses_frames() {
        let (mut keyboard, leds) = keyboard();
        keyboard.close().unwrap();
        let err = keyboard
            .apply_frame(&ColorFrame::new(), &CancellationToken::new())
            .unwrap_err();
        assert!(matches!(err, DeviceError::NotInitialized));
        assert!(leds.log().is_empty());
    }
}
