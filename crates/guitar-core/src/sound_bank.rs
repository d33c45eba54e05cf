//! Explicit string-to-sample mapping table.
//!
//! The position of an entry in the bank is the string index, and every
//! index has one fixed slot (vertical strings 0..6, horizontal 6..12). Both the grid
//! layout generator (which reads the slot to place the segment) and the
//! playback dispatcher (which reads the sample name) walk the same table, so
//! geometry and sound can never drift apart.

use crate::constants::{DEFAULT_SAMPLE_NAMES, GRID_DIVISIONS, STRING_COUNT};
use crate::error::{GuitarError, Result};

/// Where a string sits on the 3x3 grid.
///
/// `column`/`row` pick one of the two inner grid lines (0 = left/top),
/// `band` picks one third of that line (0 = top/left).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StringSlot {
    Vertical { column: u8, band: u8 },
    Horizontal { row: u8, band: u8 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct SoundEntry {
    pub slot: StringSlot,
    pub sample: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SoundBank {
    entries: Vec<SoundEntry>,
}

impl SoundBank {
    pub fn new(entries: Vec<SoundEntry>) -> Result<Self> {
        if entries.len() != STRING_COUNT {
            return Err(GuitarError::InvalidSoundBank(format!(
                "expected {} entries, got {}",
                STRING_COUNT,
                entries.len()
            )));
        }
        // positions are fixed: columns first, then rows; only names vary
        for ((i, e), expected) in entries.iter().enumerate().zip(standard_slots()) {
            if e.slot != expected {
                return Err(GuitarError::InvalidSoundBank(format!(
                    "entry {} has slot {:?}, expected {:?}",
                    i, e.slot, expected
                )));
            }
        }
        Ok(Self { entries })
    }

    /// Standard layout with custom sample names: columns top-to-bottom, then rows left-to-right.
    pub fn with_samples<S: Into<String>>(samples: [S; STRING_COUNT]) -> Self {
        let entries = standard_slots()
            .into_iter()
            .zip(samples)
            .map(|(slot, sample)| SoundEntry {
                slot,
                sample: sample.into(),
            })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[SoundEntry] {
        &self.entries
    }

    pub fn sample(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|e| e.sample.as_str())
    }

    pub fn slot(&self, index: usize) -> Option<StringSlot> {
        self.entries.get(index).map(|e| e.slot)
    }
}

impl Default for SoundBank {
    fn default() -> Self {
        Self::with_samples(DEFAULT_SAMPLE_NAMES)
    }
}

fn standard_slots() -> Vec<StringSlot> {
    let lines = (GRID_DIVISIONS - 1) as u8;
    let bands = GRID_DIVISIONS as u8;
    let mut slots = Vec::with_capacity(STRING_COUNT);
    for column in 0..lines {
        for band in 0..bands {
            slots.push(StringSlot::Vertical { column, band });
        }
    }
    for row in 0..lines {
        for band in 0..bands {
            slots.push(StringSlot::Horizontal { row, band });
        }
    }
    slots
}
