//! Published logical key positions. Only the left column of the board is
//! known so far, other keys are left untouched.

use rgb_sync_core::{LedMap, LogicalKey};

pub const KEYS: &[(LogicalKey, u16)] = &[
    (LogicalKey::Escape, 0),
    (LogicalKey::Tilde, 1),
    (LogicalKey::Tab, 2),
    (LogicalKey::LeftShift, 3),
    (LogicalKey::LeftControl, 4),
    (LogicalKey::Q, 5),
    (LogicalKey::A, 6),
    (LogicalKey::Z, 7),
];

pub fn led_map() -> LedMap {
    LedMap::from_tables(&[KEYS])
}
