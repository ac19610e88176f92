//! Color frames produced by the renderer.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::LogicalKey;

/// 24-bit color
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn to_bytes(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = String;
    fn from_str(code: &str) -> Result<Self, Self::Err> {
        let mut hex = code.trim_start_matches('#').to_string();
        match hex.len() {
            // Extend 3 character hex colors
            3 => hex = hex.chars().flat_map(|a| [a, a]).collect(),
            6 => {},
            l => return Err(format!("invalid hex length for {code}: {l}")),
        }
        let value =
            u32::from_str_radix(&hex, 16).map_err(|_| format!("invalid hex color: {code}"))?;
        Ok(Self::new((value >> 16) as u8, (value >> 8) as u8, value as u8))
    }
}

/// One complete snapshot of desired colors per logical key.
///
/// Keys missing from the frame carry no instruction for this cycle, so the
/// device keeps whatever it last displayed for them. Frames are shared
/// between schedulers behind an `Arc` and never mutated after publish.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColorFrame {
    colors: HashMap<LogicalKey, Rgb>,
}

impl ColorFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frame assigning `color` to every logical key
    pub fn filled(color: Rgb) -> Self {
        LogicalKey::ALL.iter().map(|&k| (k, color)).collect()
    }

    /// Set a key while building a frame
    pub fn with(mut self, key: LogicalKey, color: Rgb) -> Self {
        self.colors.insert(key, color);
        self
    }

    pub fn get(&self, key: LogicalKey) -> Option<Rgb> {
        self.colors.get(&key).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (LogicalKey, Rgb)> + '_ {
        self.colors.iter().map(|(k, c)| (*k, *c))
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

impl FromIterator<(LogicalKey, Rgb)> for ColorFrame {
    fn from_iter<I: IntoIterator<Item = (LogicalKey, Rgb)>>(iter: I) -> Self {
        Self {
            colors: iter.into_iter().collect(),
        }
    }
}
