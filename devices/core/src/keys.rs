//! Logical light positions shared by every device.

use std::fmt;
use std::str::FromStr;

macro_rules! logical_keys {
    [$(
        $( #[doc = $doc:literal] )*
        $name:ident => $id:literal,
    )+] => {
        /// A controllable light position, independent of any hardware layout.
        ///
        /// Devices translate these into their own LED indices through a
        /// [`LedMap`](crate::LedMap) or a vendor key code table.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum LogicalKey {
            $( $( #[doc = $doc] )* $name, )+
        }

        impl LogicalKey {
            /// Every logical key, in declaration order
            pub const ALL: &'static [LogicalKey] = &[ $( LogicalKey::$name, )+ ];

            /// Stable lowercase identifier, used by the cli and config
            pub const fn id(self) -> &'static str {
                match self {
                    $( LogicalKey::$name => $id, )+
                }
            }
        }
    };
}

logical_keys![
    Escape => "escape",
    F1 => "f1",
    F2 => "f2",
    F3 => "f3",
    F4 => "f4",
    F5 => "f5",
    F6 => "f6",
    F7 => "f7",
    F8 => "f8",
    F9 => "f9",
    F10 => "f10",
    F11 => "f11",
    F12 => "f12",
    PrintScreen => "print_screen",
    ScrollLock => "scroll_lock",
    PauseBreak => "pause_break",

    Tilde => "tilde",
    One => "1",
    Two => "2",
    Three => "3",
    Four => "4",
    Five => "5",
    Six => "6",
    Seven => "7",
    Eight => "8",
    Nine => "9",
    Zero => "0",
    Minus => "minus",
    Equals => "equals",
    Backspace => "backspace",
    Insert => "insert",
    Home => "home",
    PageUp => "page_up",
    NumLock => "num_lock",
    NumSlash => "num_slash",
    NumAsterisk => "num_asterisk",
    NumMinus => "num_minus",

    Tab => "tab",
    Q => "q",
    W => "w",
    E => "e",
    R => "r",
    T => "t",
    Y => "y",
    U => "u",
    I => "i",
    O => "o",
    P => "p",
    OpenBracket => "open_bracket",
    CloseBracket => "close_bracket",
    Backslash => "backslash",
    Delete => "delete",
    End => "end",
    PageDown => "page_down",
    NumSeven => "num_7",
    NumEight => "num_8",
    NumNine => "num_9",
    NumPlus => "num_plus",

    CapsLock => "caps_lock",
    A => "a",
    S => "s",
    D => "d",
    F => "f",
    G => "g",
    H => "h",
    J => "j",
    K => "k",
    L => "l",
    Semicolon => "semicolon",
    Apostrophe => "apostrophe",
    /// ISO key left of enter
    Hashtag => "hashtag",
    Enter => "enter",
    NumFour => "num_4",
    NumFive => "num_5",
    NumSix => "num_6",

    LeftShift => "left_shift",
    /// ISO key right of left shift
    BackslashUk => "backslash_uk",
    Z => "z",
    X => "x",
    C => "c",
    V => "v",
    B => "b",
    N => "n",
    M => "m",
    Comma => "comma",
    Period => "period",
    ForwardSlash => "forward_slash",
    RightShift => "right_shift",
    ArrowUp => "arrow_up",
    NumOne => "num_1",
    NumTwo => "num_2",
    NumThree => "num_3",
    NumEnter => "num_enter",

    LeftControl => "left_control",
    LeftWindows => "left_windows",
    LeftAlt => "left_alt",
    Space => "space",
    RightAlt => "right_alt",
    RightWindows => "right_windows",
    ApplicationSelect => "application_select",
    RightControl => "right_control",
    ArrowLeft => "arrow_left",
    ArrowDown => "arrow_down",
    ArrowRight => "arrow_right",
    NumZero => "num_0",
    NumPeriod => "num_period",
    Fn => "fn",

    /// JIS key left of space
    JpnMuhenkan => "jpn_muhenkan",
    /// JIS key right of space
    JpnHenkan => "jpn_henkan",
    /// JIS key left of backspace
    JpnYen => "jpn_yen",

    Logo => "logo",
    AdditionalLight1 => "additional_light_1",
    AdditionalLight2 => "additional_light_2",

    /// Whole-device color for peripherals without individual zones
    Peripheral => "peripheral",
    PeripheralLogo => "peripheral_logo",
    PeripheralScrollWheel => "peripheral_scroll_wheel",
    PeripheralFrontLight => "peripheral_front_light",
];

impl fmt::Display for LogicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for LogicalKey {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.to_lowercase();
        LogicalKey::ALL
            .iter()
            .copied()
            .find(|k| k.id() == s)
            .ok_or_else(|| format!("unknown key: {s}"))
    }
}
