//! High level hidapi abstraction for Drevo keyboard lighting

use bitmap::Bitmap;
use hidapi::{HidApi, HidDevice};
use rgb_sync_core::{
    CancellationToken, ColorFrame, Device, DeviceClass, DeviceError, DeviceInfo, LedMap, Result,
    Transport,
};
use tracing::{info, warn};

pub mod abi;
pub mod bitmap;
pub mod layouts;

pub mod consts {
    pub const DREVO_VENDOR_ID: u16 = 0x1A2C;

    /// Product ID and board layout number
    pub const PRODUCTS: &[(u16, u8)] = &[
        (0xB51F, 0),
        (0xB57E, 0),
        (0xB58E, 1),
        (0xB58F, 1),
        (0xB59E, 2),
        (0xB59F, 2),
        (0xB5BE, 3),
        (0xB5BF, 3),
    ];
    pub const PRODUCT_IDS: &[u16] = &[
        0xB51F, 0xB57E, 0xB58E, 0xB58F, 0xB59E, 0xB59F, 0xB5BE, 0xB5BF,
    ];

    /// Feature reports are only accepted on the fourth collection
    pub const LIGHTING_COLLECTION: &str = "col04";
}

/// Addressable LEDs, keys and lightbar
pub const LED_COUNT: usize = 128;

/// Static device info for detection
pub static INFO: DeviceInfo = DeviceInfo {
    name: "Drevo Keyboard",
    cli_name: "drevo",
    class: DeviceClass::Keyboard,
    vendor_id: Some(consts::DREVO_VENDOR_ID),
    product_ids: consts::PRODUCT_IDS,
    updates_per_second: 20.0,
};

/// Layout number for a product ID
pub fn layout_for(product_id: u16) -> Option<u8> {
    consts::PRODUCTS
        .iter()
        .find(|(pid, _)| *pid == product_id)
        .map(|&(_, layout)| layout)
}

/// Whether a hid interface is the one lighting commands go to
pub fn is_lighting_interface(device: &hidapi::DeviceInfo) -> bool {
    if device.vendor_id() != consts::DREVO_VENDOR_ID || layout_for(device.product_id()).is_none()
    {
        return false;
    }
    if cfg!(windows) {
        device
            .path()
            .to_string_lossy()
            .contains(consts::LIGHTING_COLLECTION)
    } else {
        // vendor defined usage page
        device.usage_page() >= 0xFF00
    }
}

/// High level abstraction for a connected Drevo keyboard
pub struct DrevoKeyboard<T: Transport = HidDevice> {
    transport: T,
    layout: u8,
    leds: LedMap,
    bitmap: Bitmap,
    connected: bool,
}

impl DrevoKeyboard<HidDevice> {
    /// Open the first Drevo keyboard found
    pub fn open(api: &HidApi) -> Result<Self> {
        let info = api
            .device_list()
            .find(|d| is_lighting_interface(d))
            .ok_or(DeviceError::DeviceNotFound)?;
        Self::open_device(api, info)
    }

    /// Open a specific enumerated interface
    pub fn open_device(api: &HidApi, info: &hidapi::DeviceInfo) -> Result<Self> {
        let layout = layout_for(info.product_id()).ok_or(DeviceError::DeviceNotFound)?;
        Self::connect(info.open_device(api)?, layout)
    }
}

impl<T: Transport> DrevoKeyboard<T> {
    /// Start a lighting session over an already open transport
    pub fn connect(mut transport: T, layout: u8) -> Result<Self> {
        let leds = layouts::led_map(layout).unwrap_or_else(|| {
            warn!("no key table for drevo layout {layout}, keys will stay dark");
            LedMap::default()
        });
        transport.send_feature_report(&abi::session_start())?;
        info!(layout, "drevo keyboard connected");
        Ok(Self {
            transport,
            layout,
            leds,
            bitmap: Bitmap::new(LED_COUNT),
            connected: true,
        })
    }

    pub fn layout(&self) -> u8 {
        self.layout
    }

    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }
}

impl<T: Transport> Device for DrevoKeyboard<T> {
    fn name(&self) -> &str {
        INFO.name
    }

    fn class(&self) -> DeviceClass {
        INFO.class
    }

    fn led_count(&self) -> usize {
        LED_COUNT
    }

    fn updates_per_second(&self) -> f32 {
        INFO.updates_per_second
    }

    fn apply_frame(&mut self, frame: &ColorFrame, cancel: &CancellationToken) -> Result<()> {
        if !self.connected {
            return Err(DeviceError::NotInitialized);
        }
        for (key, color) in frame.iter() {
            for &led in self.leds.leds(key) {
                self.bitmap.set_color(led, color);
            }
        }
        if cancel.is_cancelled() {
            return Err(DeviceError::Cancelled);
        }
        self.bitmap.send(&mut self.transport)
    }

    fn close(&mut self) -> Result<()> {
        if !self.connected {
            return Ok(());
        }
        self.connected = false;
        self.transport.send_feature_report(&abi::session_end())?;
        info!("drevo keyboard released");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rgb_sync_core::mock::MockTransport;
    use rgb_sync_core::{LogicalKey, Rgb};

    use super::*;

    fn keyboard(layout: u8) -> (DrevoKeyboard<MockTransport>, MockTransport) {
        let transport = MockTransport::new();
        let keyboard = DrevoKeyboard::connect(transport.clone(), layout).unwrap();
        (keyboard, transport)
    }

    #[test]
    fn product_table() {
        assert_eq!(layout_for(0xB51F), Some(0));
        assert_eq!(layout_for(0xB58F), Some(1));
        assert_eq!(layout_for(0xB5BE), Some(3));
        assert_eq!(layout_for(0x1234), None);
        assert!(consts::PRODUCT_IDS
            .iter()
            .all(|pid| layout_for(*pid).is_some()));
    }

    #[test]
    fn session_packets() {
        let (mut keyboard, transport) = keyboard(0);
        assert_eq!(transport.features(), vec![abi::session_start().to_vec()]);
        keyboard.close().unwrap();
        keyboard.close().unwrap();
        assert_eq!(transport.features(), vec![
            abi::session_start().to_vec(),
            abi::session_end().to_vec()
        ]);
    }

    #[test]
    fn frame_paints_keys_and_lightbar() {
        let (mut keyboard, transport) = keyboard(0);
        transport.clear();
        let red = Rgb::new(255, 0, 0);
        let frame = ColorFrame::new().with(LogicalKey::Escape, red);
        keyboard
            .apply_frame(&frame, &CancellationToken::new())
            .unwrap();

        let bytes = keyboard.bitmap().as_bytes();
        assert_eq!(&bytes[4..7], &[255, 0, 0]);
        assert_eq!(&bytes[4 + 3 * 87..4 + 3 * 88], &[255, 0, 0]);
        assert_eq!(transport.features().len(), 65);
    }

    #[test]
    fn same_frame_gives_same_reports() {
        let (mut keyboard, transport) = keyboard(0);
        let cancel = CancellationToken::new();
        let frame = ColorFrame::new()
            .with(LogicalKey::Escape, Rgb::new(255, 0, 0))
            .with(LogicalKey::Enter, Rgb::new(0, 128, 255));

        transport.clear();
        keyboard.apply_frame(&frame, &cancel).unwrap();
        let first = transport.features();
        transport.clear();
        keyboard.apply_frame(&frame, &cancel).unwrap();
        assert_eq!(transport.features(), first);
        assert_eq!(first.len(), 65);
    }

    #[test]
    fn absent_keys_keep_last_color() {
        let (mut keyboard, _) = keyboard(1);
        let cancel = CancellationToken::new();
        let blue = Rgb::new(0, 0, 255);
        keyboard
            .apply_frame(&ColorFrame::new().with(LogicalKey::Q, blue), &cancel)
            .unwrap();
        keyboard
            .apply_frame(&ColorFrame::new().with(LogicalKey::W, blue), &cancel)
            .unwrap();
        let bytes = keyboard.bitmap().as_bytes();
        // Q and W on the ISO table
        assert_eq!(&bytes[4 + 3 * 34..4 + 3 * 35], &[0, 0, 255]);
        assert_eq!(&bytes[4 + 3 * 35..4 + 3 * 36], &[0, 0, 255]);
    }

    #[test]
    fn cancelled_frame_writes_nothing() {
        let (mut keyboard, transport) = keyboard(0);
        transport.clear();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = keyboard
            .apply_frame(&ColorFrame::filled(Rgb::new(1, 2, 3)), &cancel)
            .unwrap_err();
        assert!(matches!(err, DeviceError::Cancelled));
        assert!(transport.log().is_empty());
    }

    #[test]
    fn unknown_layout_maps_nothing() {
        let (mut keyboard, transport) = keyboard(2);
        transport.clear();
        keyboard
            .apply_frame(&ColorFrame::filled(Rgb::new(1, 2, 3)), &CancellationToken::new())
            .unwrap();
        assert!(keyboard.bitmap().as_bytes()[4..].iter().all(|&b| b == 0));
        // the frame is still sent
        assert_eq!(transport.features().len(), 65);
    }

    #[test]
    fn closed_keyboard_refuses_frames() {
        let (mut keyboard, _) = keyboard(0);
        keyboard.close().unwrap();
        let err = keyboard
            .apply_frame(&ColorFrame::new(), &CancellationToken::new())
            .unwrap_err();
        assert!(matches!(err, DeviceError::NotInitialized));
    }
}
