//! Voltage-to-button classification
//!
//! The keypad is a resistor ladder: every button pulls the shared analog line
//! to its own voltage. A reading is mapped to a button by checking a table of
//! inclusive bands. The idle band is checked before the table, so the resting
//! voltage always reads as `Idle` even if a button band were to overlap it.

use crate::buttons::ButtonId;
use crate::config::bands;

/// Inclusive range of raw analog readings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Band {
    pub min: u16,
    pub max: u16,
}

impl Band {
    pub const fn new(min: u16, max: u16) -> Self {
        Self { min, max }
    }

    /// True if `sample` lies within `[min, max]`
    pub const fn contains(&self, sample: u16) -> bool {
        sample >= self.min && sample <= self.max
    }

    /// True if the two bands share at least one reading
    pub const fn overlaps(&self, other: &Band) -> bool {
        self.min <= other.max && other.min <= self.max
    }
}

/// A button and the band of readings it produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoltageRange {
    pub button: ButtonId,
    pub band: Band,
}

impl VoltageRange {
    pub const fn new(button: ButtonId, min: u16, max: u16) -> Self {
        Self {
            button,
            band: Band::new(min, max),
        }
    }
}

/// Classify a raw reading against the built-in band table
pub fn classify(sample: u16) -> ButtonId {
    classify_with(sample, &bands::IDLE, &bands::RANGES)
}

/// Classify a raw reading against an explicit idle band and range table
///
/// The idle band wins over everything; otherwise the first range containing
/// the sample decides. Readings outside every band are `Idle`.
pub fn classify_with(sample: u16, idle: &Band, ranges: &[VoltageRange]) -> ButtonId {
    if idle.contains(sample) {
        return ButtonId::Idle;
    }

    ranges
        .iter()
        .find(|r| r.band.contains(sample))
        .map(|r| r.button)
        .unwrap_or(ButtonId::Idle)
}
