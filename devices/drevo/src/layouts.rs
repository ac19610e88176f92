//! Logical key to bitmap index tables per board layout.

use rgb_sync_core::LedMap;
use rgb_sync_core::LogicalKey::{self, *};

/// Layout 0, US ANSI boards
pub const ANSI: &[(LogicalKey, u16)] = &[
    (Escape, 0),
    (F1, 1),
    (F2, 2),
    (F3, 3),
    (F4, 4),
    (F5, 5),
    (F6, 6),
    (F7, 7),
    (F8, 8),
    (F9, 9),
    (F10, 10),
    (F11, 11),
    (F12, 12),
    (PrintScreen, 13),
    (ScrollLock, 14),
    (PauseBreak, 15),
    (Tilde, 16),
    (One, 17),
    (Two, 18),
    (Three, 19),
    (Four, 20),
    (Five, 21),
    (Six, 22),
    (Seven, 23),
    (Eight, 24),
    (Nine, 25),
    (Zero, 26),
    (Minus, 27),
    (Equals, 28),
    (Backspace, 29),
    (Insert, 30),
    (Home, 31),
    (PageUp, 32),
    (Tab, 33),
    (Q, 34),
    (W, 35),
    (E, 36),
    (R, 37),
    (T, 38),
    (Y, 39),
    (U, 40),
    (I, 41),
    (O, 42),
    (P, 43),
    (OpenBracket, 44),
    (CloseBracket, 45),
    (Backslash, 46),
    (Delete, 47),
    (End, 48),
    (PageDown, 49),
    (CapsLock, 50),
    (A, 51),
    (S, 52),
    (D, 53),
    (F, 54),
    (G, 55),
    (H, 56),
    (J, 57),
    (K, 58),
    (L, 59),
    (Semicolon, 60),
    (Apostrophe, 61),
    (Enter, 62),
    (LeftShift, 63),
    (Z, 64),
    (X, 65),
    (C, 66),
    (V, 67),
    (B, 68),
    (N, 69),
    (M, 70),
    (Comma, 71),
    (Period, 72),
    (ForwardSlash, 73),
    (RightShift, 74),
    (ArrowUp, 75),
    (LeftControl, 76),
    (LeftWindows, 77),
    (LeftAlt, 78),
    (Space, 79),
    (RightAlt, 80),
    (ApplicationSelect, 81),
    (RightControl, 83),
    (ArrowLeft, 84),
    (ArrowDown, 85),
    (ArrowRight, 86),
    (Fn, 82),
];

/// Layout 1, ISO boards
pub const ISO: &[(LogicalKey, u16)] = &[
    (Escape, 0),
    (F1, 1),
    (F2, 2),
    (F3, 3),
    (F4, 4),
    (F5, 5),
    (F6, 6),
    (F7, 7),
    (F8, 8),
    (F9, 9),
    (F10, 10),
    (F11, 11),
    (F12, 12),
    (PrintScreen, 13),
    (ScrollLock, 14),
    (PauseBreak, 15),
    (Tilde, 16),
    (One, 17),
    (Two, 18),
    (Three, 19),
    (Four, 20),
    (Five, 21),
    (Six, 22),
    (Seven, 23),
    (Eight, 24),
    (Nine, 25),
    (Zero, 26),
    (Minus, 27),
    (Equals, 28),
    (Backspace, 29),
    (Insert, 30),
    (Home, 31),
    (PageUp, 32),
    (Tab, 33),
    (Q, 34),
    (W, 35),
    (E, 36),
    (R, 37),
    (T, 38),
    (Y, 39),
    (U, 40),
    (I, 41),
    (O, 42),
    (P, 43),
    (OpenBracket, 44),
    (CloseBracket, 45),
    (Delete, 47),
    (End, 48),
    (PageDown, 49),
    (CapsLock, 50),
    (A, 51),
    (S, 52),
    (D, 53),
    (F, 54),
    (G, 55),
    (H, 56),
    (J, 57),
    (K, 58),
    (L, 59),
    (Semicolon, 60),
    (Apostrophe, 61),
    (Hashtag, 62),
    (Enter, 46),
    (LeftShift, 63),
    (BackslashUk, 64),
    (Z, 65),
    (X, 66),
    (C, 67),
    (V, 68),
    (B, 69),
    (N, 70),
    (M, 71),
    (Comma, 72),
    (Period, 73),
    (ForwardSlash, 74),
    (RightShift, 75),
    (ArrowUp, 76),
    (LeftControl, 77),
    (LeftWindows, 78),
    (LeftAlt, 79),
    (Space, 80),
    (RightAlt, 81),
    (ApplicationSelect, 82),
    (RightControl, 84),
    (ArrowLeft, 85),
    (ArrowDown, 86),
    (ArrowRight, 87),
    (Fn, 83),
];

/// Layout 3, JIS boards
pub const JIS: &[(LogicalKey, u16)] = &[
    (Escape, 0),
    (F1, 1),
    (F2, 2),
    (F3, 3),
    (F4, 4),
    (F5, 5),
    (F6, 6),
    (F7, 7),
    (F8, 8),
    (F9, 9),
    (F10, 10),
    (F11, 11),
    (F12, 12),
    (PrintScreen, 13),
    (ScrollLock, 14),
    (PauseBreak, 15),
    (Tilde, 16),
    (One, 17),
    (Two, 18),
    (Three, 19),
    (Four, 20),
    (Five, 21),
    (Six, 22),
    (Seven, 23),
    (Eight, 24),
    (Nine, 25),
    (Zero, 26),
    (Minus, 27),
    (Equals, 28),
    (Backspace, 30),
    (Insert, 31),
    (Home, 32),
    (PageUp, 33),
    (Tab, 34),
    (Q, 35),
    (W, 36),
    (E, 37),
    (R, 38),
    (T, 39),
    (Y, 40),
    (U, 41),
    (I, 42),
    (O, 43),
    (P, 44),
    (OpenBracket, 45),
    (CloseBracket, 46),
    (Delete, 48),
    (End, 49),
    (PageDown, 50),
    (CapsLock, 51),
    (A, 52),
    (S, 53),
    (D, 54),
    (F, 55),
    (G, 56),
    (H, 57),
    (J, 58),
    (K, 59),
    (L, 60),
    (Semicolon, 61),
    (Apostrophe, 62),
    (Hashtag, 63),
    (Enter, 47),
    (LeftShift, 64),
    (BackslashUk, 75),
    (Z, 65),
    (X, 66),
    (C, 67),
    (V, 68),
    (B, 69),
    (N, 70),
    (M, 71),
    (Comma, 72),
    (Period, 73),
    (ForwardSlash, 74),
    (RightShift, 76),
    (ArrowUp, 77),
    (LeftControl, 78),
    (LeftWindows, 79),
    (LeftAlt, 80),
    (Space, 82),
    (RightAlt, 83),
    (ApplicationSelect, 85),
    (RightControl, 87),
    (ArrowLeft, 88),
    (ArrowDown, 89),
    (ArrowRight, 90),
    (Fn, 86),
    (JpnMuhenkan, 81),
    (JpnHenkan, 84),
    (JpnYen, 29),
];

/// Lightbar segments around layout 0 boards. The top edge runs from escape
/// across the function row, the rest follows the nearest key.
pub const ANSI_LIGHTBAR: &[(LogicalKey, u16)] = &[
    // bottom, right to left
    (LeftControl, 121),
    (LeftWindows, 120),
    (LeftAlt, 119),
    (Space, 115),
    (Space, 116),
    (Space, 117),
    (Space, 118),
    (RightAlt, 114),
    (ApplicationSelect, 113),
    (Fn, 112),
    (RightControl, 111),
    (ArrowLeft, 110),
    (ArrowDown, 109),
    (ArrowRight, 108),
    // top
    (Escape, 87),
    (F1, 88),
    (F2, 89),
    (F3, 90),
    (F4, 91),
    (F5, 92),
    (F6, 93),
    (F7, 94),
    (F8, 95),
    (F9, 96),
    (F10, 97),
    (F11, 98),
    (F12, 99),
    (PrintScreen, 100),
    // left
    (LeftControl, 122),
    (LeftShift, 123),
    (CapsLock, 124),
    (Tab, 125),
    (Tilde, 126),
    // right
    (PauseBreak, 102),
    (PageUp, 103),
    (PageDown, 104),
    (ArrowRight, 105),
    (ArrowRight, 106),
];

/// Build the LED map for a layout number, `None` when the layout has no
/// known table
pub fn led_map(layout: u8) -> Option<LedMap> {
    match layout {
        0 => Some(LedMap::from_tables(&[ANSI, ANSI_LIGHTBAR])),
        1 => Some(LedMap::from_tables(&[ISO])),
        3 => Some(LedMap::from_tables(&[JIS])),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::LED_COUNT;

    #[test]
    fn indices_fit_the_bitmap() {
        for table in [ANSI, ANSI_LIGHTBAR, ISO, JIS] {
            assert!(table.iter().all(|&(_, i)| (i as usize) < LED_COUNT));
        }
    }

    #[test]
    fn key_tables_never_share_an_index() {
        for table in [ANSI, ISO, JIS] {
            let unique: HashSet<_> = table.iter().map(|&(_, i)| i).collect();
            assert_eq!(unique.len(), table.len());
        }
    }

    #[test]
    fn lightbar_extends_keys() {
        let map = led_map(0).unwrap();
        assert_eq!(map.leds(Escape), &[0, 87]);
        assert_eq!(map.leds(Space), &[79, 115, 116, 117, 118]);
        assert_eq!(map.leds(ArrowRight), &[86, 108, 105, 106]);
        assert!(map.leds(NumLock).is_empty());
    }

    #[test]
    fn regional_keys() {
        let iso = led_map(1).unwrap();
        assert_eq!(iso.leds(Enter), &[46]);
        assert_eq!(iso.leds(BackslashUk), &[64]);
        let jis = led_map(3).unwrap();
        assert_eq!(jis.leds(JpnYen), &[29]);
        assert_eq!(jis.leds(JpnHenkan), &[84]);
        assert!(led_map(2).is_none());
    }
}
