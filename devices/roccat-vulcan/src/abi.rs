//! Hardware color map and its split into interrupt output reports.
//!
//! Keys are stored in blocks of 12: the red bytes of a block come first,
//! then the green bytes, then the blue bytes.

use rgb_sync_core::Rgb;

pub const KEY_COUNT: usize = 144;
pub const MAP_LEN: usize = 3 * 148;
pub const REPORT_LEN: usize = 65;
pub const REPORT_COUNT: usize = 7;

const BLOCK: usize = 12;
const HEADER: [u8; 4] = [0xA1, 0x01, 0x01, 0xB4];

/// Offset of a key's red byte. Green follows 12 bytes later, blue 24.
pub const fn red_offset(key: usize) -> usize {
    (key / BLOCK) * 3 * BLOCK + key % BLOCK
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HardwareMap([u8; MAP_LEN]);

impl Default for HardwareMap {
    fn default() -> Self {
        Self([0; MAP_LEN])
    }
}

impl HardwareMap {
    pub fn as_bytes(&self) -> &[u8; MAP_LEN] {
        &self.0
    }

    /// Set one key. Returns false for keys the hardware does not have.
    pub fn set_key(&mut self, key: usize, color: Rgb) -> bool {
        if key >= KEY_COUNT {
            return false;
        }
        let offset = red_offset(key);
        self.0[offset] = color.r;
        self.0[offset + BLOCK] = color.g;
        self.0[offset + 2 * BLOCK] = color.b;
        true
    }

    /// Output reports, report ID 0. The first carries the map header and 60
    /// bytes, the rest 64 bytes each.
    pub fn reports(&self) -> [[u8; REPORT_LEN]; REPORT_COUNT] {
        let mut reports = [[0u8; REPORT_LEN]; REPORT_COUNT];
        reports[0][1..5].copy_from_slice(&HEADER);
        reports[0][5..].copy_from_slice(&self.0[..60]);
        for (i, report) in reports.iter_mut().enumerate().skip(1) {
            report[1..].copy_from_slice(&self.0[64 * i - 4..64 * i + 60]);
        }
        reports
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn neighbouring_blocks_interleave() {
        let mut map = HardwareMap::default();
        map.set_key(0, Rgb::new(10, 20, 30));
        map.set_key(12, Rgb::new(40, 50, 60));
        map.set_key(1, Rgb::new(1, 2, 3));
        let bytes = map.as_bytes();
        assert_eq!((bytes[0], bytes[12], bytes[24]), (10, 20, 30));
        assert_eq!((bytes[36], bytes[48], bytes[60]), (40, 50, 60));
        assert_eq!((bytes[1], bytes[13], bytes[25]), (1, 2, 3));
    }

    #[test]
    fn last_key_fits() {
        assert_eq!(red_offset(KEY_COUNT - 1) + 24, 431);
        let mut map = HardwareMap::default();
        assert!(map.set_key(KEY_COUNT - 1, Rgb::new(1, 1, 1)));
        let before = map.clone();
        assert!(!map.set_key(KEY_COUNT, Rgb::new(1, 1, 1)));
        assert_eq!(map.as_bytes(), before.as_bytes());
    }

    #[test]
    fn report_framing() {
        let mut map = HardwareMap::default();
        map.0.iter_mut().enumerate().for_each(|(i, b)| *b = i as u8);
        let reports = map.reports();

        assert_eq!(reports[0][..5], [0x00, 0xA1, 0x01, 0x01, 0xB4]);
        assert_eq!(reports[0][5], 0);
        assert_eq!(reports[0][64], 59);
        assert_eq!(reports[1][0], 0x00);
        assert_eq!(reports[1][1], 60);
        assert_eq!(reports[6][64], (MAP_LEN - 1) as u8);
    }

    proptest! {
        #[test]
        fn reports_carry_whole_map(bytes in proptest::collection::vec(any::<u8>(), MAP_LEN)) {
            let mut map = HardwareMap::default();
            map.0.copy_from_slice(&bytes);
            let reports = map.reports();
            let mut payload = reports[0][5..].to_vec();
            for report in &reports[1..] {
                prop_assert_eq!(report[0], 0);
                payload.extend_from_slice(&report[1..]);
            }
            prop_assert_eq!(payload, bytes);
        }

        #[test]
        fn keys_never_collide(a in 0..KEY_COUNT, b in 0..KEY_COUNT) {
            prop_assume!(a != b);
            let mut map = HardwareMap::default();
            map.set_key(a, Rgb::new(1, 2, 3));
            let before = map.clone();
            map.set_key(b, Rgb::new(0, 0, 0));
            prop_assert_eq!(map, before);
        }
    }
}
