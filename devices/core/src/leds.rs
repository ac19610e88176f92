//! Static logical key to device LED index tables.

use std::collections::HashMap;

use crate::LogicalKey;

/// Immutable mapping from logical keys to the LED slots of one device.
///
/// A key may drive several LEDs (lightbar segments) or none at all. Indices
/// are not checked against the device LED count here; encoders drop
/// out-of-range writes.
#[derive(Clone, Debug, Default)]
pub struct LedMap {
    entries: HashMap<LogicalKey, Vec<usize>>,
}

impl LedMap {
    /// Build a map from `(key, index)` pairs. Later tables extend earlier ones.
    pub fn from_tables(tables: &[&[(LogicalKey, u16)]]) -> Self {
        let mut entries: HashMap<LogicalKey, Vec<usize>> = HashMap::new();
        for &(key, index) in tables.iter().flat_map(|t| t.iter()) {
            let slots = entries.entry(key).or_default();
            if !slots.contains(&(index as usize)) {
                slots.push(index as usize);
            }
        }
        Self { entries }
    }

    /// LED indices for a key, empty when unmapped
    pub fn leds(&self, key: LogicalKey) -> &[usize] {
        self.entries.get(&key).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(LogicalKey, usize)> for LedMap {
    fn from_iter<I: IntoIterator<Item = (LogicalKey, usize)>>(iter: I) -> Self {
        let mut entries: HashMap<LogicalKey, Vec<usize>> = HashMap::new();
        for (key, index) in iter {
            entries.entry(key).or_default().push(index);
        }
        Self { entries }
    }
}
