//! Persistent color bitmap, split into 8 byte feature reports for sending.
//!
//! The buffer is a 4 byte header followed by 3 bytes per LED. Each report
//! carries six consecutive buffer bytes: the first at offset 1, every later
//! one at offset 2 behind a zero byte. Concatenating the carried bytes gives
//! back the buffer exactly, so no byte is dropped or sent twice.

use rgb_sync_core::{Result, Rgb, Transport};

use crate::abi::{REPORT_ID, REPORT_LEN};

pub const HEADER: [u8; 4] = [0xF3, 0x01, 0x00, 0x7F];

/// Buffer bytes carried by one report
pub const CHUNK_LEN: usize = 6;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
    buf: Vec<u8>,
}

impl Bitmap {
    pub fn new(led_count: usize) -> Self {
        let mut this = Self {
            buf: vec![0; HEADER.len() + 3 * led_count],
        };
        this.reset();
        this
    }

    pub fn led_count(&self) -> usize {
        (self.buf.len() - HEADER.len()) / 3
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Zero every LED and restore the header
    pub fn reset(&mut self) {
        self.buf.fill(0);
        self.buf[..HEADER.len()].copy_from_slice(&HEADER);
    }

    /// Set one LED. Returns false and leaves the buffer untouched when
    /// `index` is out of range.
    pub fn set_color(&mut self, index: usize, color: Rgb) -> bool {
        if index >= self.led_count() {
            return false;
        }
        let offset = HEADER.len() + 3 * index;
        self.buf[offset..offset + 3].copy_from_slice(&color.to_bytes());
        true
    }

    pub fn report_count(&self) -> usize {
        self.buf.len().div_ceil(CHUNK_LEN)
    }

    /// Build report `n`. Bytes past the end of the buffer are zero.
    pub fn report(&self, n: usize) -> [u8; REPORT_LEN] {
        let mut report = [0u8; REPORT_LEN];
        report[0] = REPORT_ID;
        let start = (n * CHUNK_LEN).min(self.buf.len());
        let chunk = &self.buf[start..(start + CHUNK_LEN).min(self.buf.len())];
        let at = if n == 0 { 1 } else { 2 };
        report[at..at + chunk.len()].copy_from_slice(chunk);
        report
    }

    pub fn reports(&self) -> impl Iterator<Item = [u8; REPORT_LEN]> + '_ {
        (0..self.report_count()).map(|n| self.report(n))
    }

    /// Send every report in order, stopping at the first failure
    pub fn send<T: Transport + ?Sized>(&self, transport: &mut T) -> Result<()> {
        for report in self.reports() {
            transport.send_feature_report(&report)?;
        }
        Ok(())
    }
}
