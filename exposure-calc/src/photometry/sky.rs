//! Night sky background as a function of lunar phase

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Filter;

/// Lunar phase bucket used to select a sky brightness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoonPhase {
    New = 0,
    Half = 1,
    Full = 2,
}

impl MoonPhase {
    pub const ALL: [MoonPhase; 3] = [MoonPhase::New, MoonPhase::Half, MoonPhase::Full];

    /// Map the form index (new = 0, half = 1, full = 2) to a phase
    pub fn from_index(index: u8) -> Option<Self> {
        MoonPhase::ALL.get(index as usize).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for MoonPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoonPhase::New => write!(f, "new"),
            MoonPhase::Half => write!(f, "half"),
            MoonPhase::Full => write!(f, "full"),
        }
    }
}

/// Sky brightness in mag/arcsec² for a filter under the given moon.
///
/// Returns `None` where the table holds no measurement (stored as 0.0).
pub fn sky_brightness(filter: Filter, moon: MoonPhase) -> Option<f64> {
    let mag = filter.band().sky_brightness[moon.index()];
    (mag != 0.0).then_some(mag)
}
