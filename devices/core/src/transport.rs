//! Blocking report transport used by device drivers.

use hidapi::HidDevice;

use crate::{DeviceError, Result};

/// Synchronous "send N bytes as a report" channel to one HID endpoint.
///
/// The first byte of every outgoing buffer is the report ID, matching the
/// hidapi convention. All calls block until the underlying I/O returns.
pub trait Transport: Send {
    /// Send a feature report
    fn send_feature_report(&mut self, data: &[u8]) -> Result<()>;

    /// Read a feature report of at most `len` bytes, including the report ID
    fn read_feature_report(&mut self, report_id: u8, len: usize) -> Result<Vec<u8>>;

    /// Send an output report on the interrupt channel
    fn write_report(&mut self, data: &[u8]) -> Result<()>;
}

impl Transport for HidDevice {
    fn send_feature_report(&mut self, data: &[u8]) -> Result<()> {
        HidDevice::send_feature_report(self, data)?;
        Ok(())
    }

    fn read_feature_report(&mut self, report_id: u8, len: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; len.max(1)];
        buf[0] = report_id;
        let read = self.get_feature_report(&mut buf)?;
        buf.truncate(read);
        Ok(buf)
    }

    fn write_report(&mut self, data: &[u8]) -> Result<()> {
        let written = self.write(data)?;
        if written < data.len() {
            return Err(DeviceError::ShortWrite {
                expected: data.len(),
                written,
            });
        }
        Ok(())
    }
}
