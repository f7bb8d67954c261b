//! Photometric band catalog
//!
//! Central wavelengths and effective bandwidths are the 2020-09 LCO filter
//! values. Extinction coefficients are the Hayes & Latham values for a 2200 m
//! site. Sky brightness is in mag/arcsec² (Vega for UBVRI, AB for ugrizY).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EtcError;

/// Imaging filters known to the calculator.
///
/// Names are case-sensitive: `U` is Johnson U and `u` is Sloan u'.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Filter {
    JohnsonU,
    JohnsonB,
    JohnsonV,
    CousinsR,
    CousinsI,
    SloanU,
    SloanG,
    SloanR,
    SloanI,
    PanStarrsZ,
    PanStarrsY,
}

impl Filter {
    /// Number of filters, and the width of every per-filter table.
    pub const COUNT: usize = 11;

    /// All filters in catalog order.
    pub const ALL: [Filter; Filter::COUNT] = [
        Filter::JohnsonU,
        Filter::JohnsonB,
        Filter::JohnsonV,
        Filter::CousinsR,
        Filter::CousinsI,
        Filter::SloanU,
        Filter::SloanG,
        Filter::SloanR,
        Filter::SloanI,
        Filter::PanStarrsZ,
        Filter::PanStarrsY,
    ];

    /// Column index into per-filter tables
    pub fn index(self) -> usize {
        self as usize
    }

    /// Short filter name as used on observing forms
    pub fn name(self) -> &'static str {
        match self {
            Filter::JohnsonU => "U",
            Filter::JohnsonB => "B",
            Filter::JohnsonV => "V",
            Filter::CousinsR => "R",
            Filter::CousinsI => "I",
            Filter::SloanU => "u",
            Filter::SloanG => "g",
            Filter::SloanR => "r",
            Filter::SloanI => "i",
            Filter::PanStarrsZ => "Z",
            Filter::PanStarrsY => "Y",
        }
    }

    /// Static band constants for this filter
    pub fn band(self) -> &'static BandProfile {
        &BANDS[self.index()]
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Filter {
    type Err = EtcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Filter::ALL
            .iter()
            .copied()
            .find(|filter| filter.name() == s)
            .ok_or_else(|| EtcError::InvalidFilter(s.to_string()))
    }
}

/// Static photometric constants for one filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandProfile {
    /// Central wavelength in microns
    pub central_wavelength_um: f64,
    /// Effective bandwidth in microns
    pub bandwidth_um: f64,
    /// Atmospheric extinction in magnitudes per airmass
    pub extinction_mag_per_airmass: f64,
    /// Sky brightness in mag/arcsec² at new, half and full moon
    pub sky_brightness: [f64; 3],
}

/// Look up the band constants for a filter.
pub fn band(filter: Filter) -> &'static BandProfile {
    filter.band()
}

const fn profile(central: f64, width: f64, extinction: f64, sky: [f64; 3]) -> BandProfile {
    BandProfile {
        central_wavelength_um: central,
        bandwidth_um: width,
        extinction_mag_per_airmass: extinction,
        sky_brightness: sky,
    }
}

#[rustfmt::skip]
static BANDS: [BandProfile; Filter::COUNT] = [
    //       center  width  ext    [new,  half,  full]
    profile(0.350, 0.050, 0.54, [23.0, 20.0, 17.0]), // U
    profile(0.437, 0.107, 0.23, [22.5, 20.5, 17.8]), // B
    profile(0.549, 0.083, 0.12, [21.6, 20.3, 17.5]), // V
    profile(0.653, 0.137, 0.09, [20.6, 20.0, 17.4]), // R
    profile(0.789, 0.128, 0.04, [19.8, 18.8, 17.0]), // I
    profile(0.354, 0.057, 0.59, [23.5, 21.0, 18.0]), // u
    profile(0.476, 0.140, 0.14, [22.0, 20.3, 17.6]), // g
    profile(0.623, 0.135, 0.08, [21.1, 20.2, 17.5]), // r
    profile(0.760, 0.148, 0.06, [20.6, 19.7, 17.5]), // i
    profile(0.853, 0.113, 0.04, [20.2, 19.2, 16.8]), // Z
    profile(0.975, 0.118, 0.03, [19.4, 18.0, 16.5]), // Y
];
