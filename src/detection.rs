//! Device detection and selection logic.

use std::fmt;
use std::str::FromStr;

use bpaf::Bpaf;
use drevo::DrevoKeyboard;
use hidapi::HidApi;
use rgb_sync_core::{Device, DeviceInfo, Discovery, PoolConfig};
use roccat_vulcan::handshake::HandshakeConfig;
use roccat_vulcan::RoccatVulcan;
use tracing::{debug, info, warn};

/// Every device type rgb-sync can drive over hid
pub static SUPPORTED: [&DeviceInfo; 2] = [&drevo::INFO, &roccat_vulcan::INFO];

/// Supported device types
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Bpaf)]
#[bpaf(fallback(DeviceKind::Auto), group_help("Device selection:"))]
pub enum DeviceKind {
    /// Drive every supported device found (default)
    #[default]
    Auto,
    /// Only Drevo keyboards
    Drevo,
    /// Only the Roccat Vulcan
    RoccatVulcan,
}

impl FromStr for DeviceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "drevo" => Ok(Self::Drevo),
            "roccat-vulcan" => Ok(Self::RoccatVulcan),
            _ => Err(format!(
                "unknown device: {s}. Available: auto, drevo, roccat-vulcan"
            )),
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Drevo => write!(f, "drevo"),
            Self::RoccatVulcan => write!(f, "roccat-vulcan"),
        }
    }
}

impl DeviceKind {
    pub fn includes(&self, info: &DeviceInfo) -> bool {
        match self {
            Self::Auto => true,
            kind => kind.to_string() == info.cli_name,
        }
    }
}

/// Check if a HID device is one of the info's products
fn matches(device: &hidapi::DeviceInfo, info: &DeviceInfo) -> bool {
    info.vendor_id.is_none_or(|vid| device.vendor_id() == vid)
        && info.product_ids.contains(&device.product_id())
}

/// Keep the first item for every key, in order
fn first_per_key<T, K: PartialEq>(
    items: impl IntoIterator<Item = T>,
    key: impl Fn(&T) -> K,
) -> Vec<T> {
    let mut seen = Vec::new();
    items
        .into_iter()
        .filter(|item| {
            let k = key(item);
            if seen.contains(&k) {
                return false;
            }
            seen.push(k);
            true
        })
        .collect()
}

/// One supported device seen on the bus
#[derive(Debug, Clone)]
pub struct Detected {
    pub info: &'static DeviceInfo,
    pub product: String,
    pub product_id: u16,
}

/// Every supported device currently plugged in, one entry per product
pub fn detect(api: &HidApi, kind: DeviceKind) -> Vec<Detected> {
    let mut found: Vec<Detected> = Vec::new();
    for device in api.device_list() {
        let Some(info) = SUPPORTED
            .iter()
            .copied()
            .find(|info| kind.includes(info) && matches(device, info))
        else {
            continue;
        };
        if found
            .iter()
            .any(|d| d.info.cli_name == info.cli_name && d.product_id == device.product_id())
        {
            continue;
        }
        found.push(Detected {
            info,
            product: device.product_string().unwrap_or(info.name).to_string(),
            product_id: device.product_id(),
        });
    }
    found
}

/// [`Discovery`] over the platform hid layer
pub struct HidDiscovery {
    api: HidApi,
    kind: DeviceKind,
    handshake: HandshakeConfig,
}

impl HidDiscovery {
    pub fn new(kind: DeviceKind, handshake: HandshakeConfig) -> Result<Self, hidapi::HidError> {
        Ok(Self {
            api: HidApi::new()?,
            kind,
            handshake,
        })
    }

    pub fn set_handshake(&mut self, handshake: HandshakeConfig) {
        self.handshake = handshake;
    }

    fn open_drevo(&self, devices: &mut Vec<Box<dyn Device>>) {
        let interfaces = self
            .api
            .device_list()
            .filter(|d| drevo::is_lighting_interface(d));
        // one entry per top level usage can share a path
        for device in first_per_key(interfaces, |d| d.path().to_owned()) {
            match DrevoKeyboard::open_device(&self.api, device) {
                Ok(keyboard) => devices.push(Box::new(keyboard)),
                Err(e) => warn!("skipping drevo keyboard {:04x}: {e}", device.product_id()),
            }
        }
    }

    fn open_vulcan(&self, devices: &mut Vec<Box<dyn Device>>) {
        if !self.api.device_list().any(roccat_vulcan::is_vulcan) {
            return;
        }
        match RoccatVulcan::open(&self.api, &self.handshake) {
            Ok(keyboard) => devices.push(Box::new(keyboard)),
            Err(e) => warn!("skipping roccat vulcan: {e}"),
        }
    }
}

impl Discovery for HidDiscovery {
    fn discover(&mut self, config: &PoolConfig) -> Vec<Box<dyn Device>> {
        if let Err(e) = self.api.refresh_devices() {
            warn!("failed to refresh hid devices: {e}");
        }

        let mut devices = Vec::new();
        for info in SUPPORTED {
            if !self.kind.includes(info) {
                continue;
            }
            if !config.enables(info.class) {
                debug!("{} disabled, not probing", info.name);
                continue;
            }
            match info.cli_name {
                "drevo" => self.open_drevo(&mut devices),
                "roccat-vulcan" => self.open_vulcan(&mut devices),
                _ => {},
            }
        }
        info!("discovered {} device(s)", devices.len());
        devices
    }
}
