//! Errors shared by every device driver.

/// Errors that can occur while opening or updating a device
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    /// Device was not found
    #[error("device not found")]
    DeviceNotFound,

    /// A handshake report was rejected or answered with a short reply
    #[error("handshake failed at report {report_id:#04x}: {reason}")]
    Handshake { report_id: u8, reason: &'static str },

    /// The device never acknowledged a handshake step
    #[error("device did not acknowledge after {attempts} polls")]
    HandshakeTimeout { attempts: u32 },

    /// Color data was sent before the session was established
    #[error("device is not initialized")]
    NotInitialized,

    /// The transport accepted fewer bytes than the report length
    #[error("short write: {written} of {expected} bytes")]
    ShortWrite { expected: usize, written: usize },

    /// Command failed on the device
    #[error("command failed: {0}")]
    CommandFailed(&'static str),

    /// The batch was abandoned before any report was written
    #[error("update cancelled")]
    Cancelled,

    /// HID communication error
    #[error("hid error: {0}")]
    Hid(#[from] hidapi::HidError),

    /// Generic IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl DeviceError {
    /// Whether this error happened while bringing the device up, as opposed to
    /// while pushing a frame
    pub fn is_initialization(&self) -> bool {
        matches!(
            self,
            Self::DeviceNotFound | Self::Handshake { .. } | Self::HandshakeTimeout { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, DeviceError>;
