//! Logical key to Aura keyboard key code table.

use rgb_sync_core::LogicalKey::{self, *};

/// Key codes understood by Aura keyboards. Codes above 255 address the
/// Fn key and the extra light zones.
pub const KEY_CODES: &[(LogicalKey, u16)] = &[
    (Escape, 1),
    (F1, 59),
    (F2, 60),
    (F3, 61),
    (F4, 62),
    (F5, 63),
    (F6, 64),
    (F7, 65),
    (F8, 66),
    (F9, 67),
    (F10, 68),
    (F11, 87),
    (F12, 88),
    (PrintScreen, 183),
    (ScrollLock, 70),
    (PauseBreak, 197),
    (Tilde, 41),
    (One, 2),
    (Two, 3),
    (Three, 4),
    (Four, 5),
    (Five, 6),
    (Six, 7),
    (Seven, 8),
    (Eight, 9),
    (Nine, 10),
    (Zero, 11),
    (Minus, 12),
    (Equals, 13),
    (Backspace, 14),
    (Insert, 210),
    (Home, 199),
    (PageUp, 201),
    (NumLock, 69),
    (NumSlash, 181),
    (NumAsterisk, 55),
    (NumMinus, 74),
    (Tab, 15),
    (Q, 16),
    (W, 17),
    (E, 18),
    (R, 19),
    (T, 20),
    (Y, 21),
    (U, 22),
    (I, 23),
    (O, 24),
    (P, 25),
    (OpenBracket, 26),
    (CloseBracket, 27),
    (Backslash, 43),
    (Delete, 211),
    (End, 207),
    (PageDown, 209),
    (NumSeven, 71),
    (NumEight, 72),
    (NumNine, 73),
    (NumPlus, 78),
    (CapsLock, 58),
    (A, 30),
    (S, 31),
    (D, 32),
    (F, 33),
    (G, 34),
    (H, 35),
    (J, 36),
    (K, 37),
    (L, 38),
    (Semicolon, 39),
    (Apostrophe, 40),
    (Hashtag, 3),
    (Enter, 28),
    (NumFour, 75),
    (NumFive, 76),
    (NumSix, 77),
    (LeftShift, 42),
    (BackslashUk, 43),
    (Z, 44),
    (X, 45),
    (C, 46),
    (V, 47),
    (B, 48),
    (N, 49),
    (M, 50),
    (Comma, 51),
    (Period, 52),
    (ForwardSlash, 53),
    (RightShift, 54),
    (ArrowUp, 200),
    (NumOne, 79),
    (NumTwo, 80),
    (NumThree, 81),
    (NumEnter, 156),
    (LeftControl, 29),
    (LeftWindows, 219),
    (LeftAlt, 56),
    (Space, 57),
    (RightAlt, 184),
    (ApplicationSelect, 221),
    (RightControl, 157),
    (ArrowLeft, 203),
    (ArrowDown, 208),
    (ArrowRight, 205),
    (NumZero, 82),
    (NumPeriod, 83),
    (Fn, 256),
    (Logo, 257),
    (AdditionalLight1, 258),
    (AdditionalLight2, 259),
];

pub fn key_code(key: LogicalKey) -> Option<u16> {
    KEY_CODES
        .iter()
        .find(|(k, _)| *k == key)
        .map(|&(_, code)| code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups() {
        assert_eq!(key_code(Escape), Some(1));
        assert_eq!(key_code(F11), Some(87));
        assert_eq!(key_code(NumEnter), Some(156));
        assert_eq!(key_code(AdditionalLight2), Some(259));
        assert_eq!(key_code(PeripheralLogo), None);
    }

    #[test]
    fn keys_are_listed_once() {
        for (i, (key, _)) in KEY_CODES.iter().enumerate() {
            assert!(!KEY_CODES[i + 1..].iter().any(|(k, _)| k == key), "{key}");
        }
    }
}
