//! Flux and noise model for aperture photometry.
//!
//! Converts a source magnitude and the sky surface brightness into electron
//! rates using the instrument's measured photometric zeropoint, then combines
//! them with dark current and read noise into a signal-to-noise estimate.
//!
//! # Model
//! For a zeropoint `Z` in log(e⁻/s):
//! - source rate: `10^(-0.4 (m + (X - 1) k - Z))` e⁻/s
//! - sky rate: `10^(-0.4 (m_sky - Z))` e⁻/s/arcsec²
//! - S/N: `N_obj / sqrt(N_obj + N_sky + N_dark + N_pix σ_read²)`
//!
//! The aperture pixel count is not quantised to whole pixels.

use log::warn;
use serde::{Deserialize, Serialize};

use super::psf::GaussianSeeing;
use super::{sky_brightness, Filter, MoonPhase};
use crate::error::EtcError;
use crate::hardware::Instrument;

/// Photometric aperture diameter in arcseconds.
pub const APERTURE_DIAMETER_ARCSEC: f64 = 3.0;

/// Circular photometric aperture projected onto the detector
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ApertureGeometry {
    /// Aperture diameter in arcseconds
    pub diameter_arcsec: f64,
    /// Aperture area in square arcseconds
    pub area_arcsec2: f64,
    /// Aperture area in (fractional) pixels
    pub pixels: f64,
}

impl ApertureGeometry {
    pub fn new(diameter_arcsec: f64, pixel_scale_arcsec: f64) -> Self {
        let area_arcsec2 = std::f64::consts::PI / 4.0 * diameter_arcsec * diameter_arcsec;
        Self {
            diameter_arcsec,
            area_arcsec2,
            pixels: area_arcsec2 / (pixel_scale_arcsec * pixel_scale_arcsec),
        }
    }
}

/// Calibration resolved for one instrument, filter, sky and airmass.
///
/// Everything the flux model needs apart from the source magnitude and the
/// exposure time.
#[derive(Debug, Clone, PartialEq)]
pub struct PhotometricSetup {
    pub instrument: Instrument,
    pub filter: Filter,
    /// Zeropoint in log(e⁻/s) at magnitude 0
    pub zeropoint: f64,
    /// Sky surface brightness in mag/arcsec²
    pub sky_brightness: f64,
    /// Extinction coefficient in mag per airmass
    pub extinction: f64,
    pub airmass: f64,
    pub pixel_scale_arcsec: f64,
    pub dark_current_e_p_s: f64,
    pub read_noise_e: f64,
    pub aperture: ApertureGeometry,
    pub seeing: GaussianSeeing,
}

impl PhotometricSetup {
    /// Pull the calibration for an observation out of the catalogs.
    ///
    /// # Errors
    /// `IncompleteCalibration` when the instrument has no zeropoint for the
    /// filter, or the sky table has no value for the filter and moon phase.
    pub fn resolve(
        instrument: Instrument,
        filter: Filter,
        moon: MoonPhase,
        airmass: f64,
    ) -> Result<Self, EtcError> {
        let profile = instrument.profile();

        let zeropoint = profile.zeropoint(filter).ok_or_else(|| {
            warn!("{instrument} has no zeropoint for filter {filter}");
            EtcError::IncompleteCalibration {
                instrument,
                filter,
                quantity: "zeropoint",
            }
        })?;

        let sky = sky_brightness(filter, moon).ok_or_else(|| {
            warn!("No sky brightness for filter {filter} at {moon} moon");
            EtcError::IncompleteCalibration {
                instrument,
                filter,
                quantity: "sky brightness",
            }
        })?;

        Ok(Self {
            instrument,
            filter,
            zeropoint,
            sky_brightness: sky,
            extinction: filter.band().extinction_mag_per_airmass,
            airmass,
            pixel_scale_arcsec: profile.pixel_scale_arcsec,
            dark_current_e_p_s: profile.dark_current_e_p_s,
            read_noise_e: profile.read_noise_e,
            aperture: ApertureGeometry::new(APERTURE_DIAMETER_ARCSEC, profile.pixel_scale_arcsec),
            seeing: GaussianSeeing::default(),
        })
    }

    /// Magnitudes of extinction above the zenith value
    pub fn airmass_correction(&self) -> f64 {
        (self.airmass - 1.0) * self.extinction
    }

    /// Electron rates for a source of the given (above-atmosphere) magnitude
    pub fn flux_model(&self, magnitude: f64) -> FluxModel {
        let effective_mag = magnitude + self.airmass_correction();
        let pixel_area = self.pixel_scale_arcsec * self.pixel_scale_arcsec;
        let sky_rate_per_arcsec2 = 10.0_f64.powf(-0.4 * (self.sky_brightness - self.zeropoint));

        FluxModel {
            object_rate: 10.0_f64.powf(-0.4 * (effective_mag - self.zeropoint)),
            sky_rate_per_arcsec2,
            sky_rate_per_pixel: sky_rate_per_arcsec2 * pixel_area,
            sky_rate_aperture: sky_rate_per_arcsec2 * self.aperture.area_arcsec2,
            dark_rate_aperture: self.aperture.pixels * self.dark_current_e_p_s,
            read_variance: self.aperture.pixels * self.read_noise_e * self.read_noise_e,
            peak_fraction: self.seeing.peak_pixel_fraction(self.pixel_scale_arcsec),
        }
    }
}

/// Electron rates for one source through one resolved setup
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluxModel {
    /// Source electrons per second in the aperture
    pub object_rate: f64,
    /// Sky electrons per second per square arcsecond
    pub sky_rate_per_arcsec2: f64,
    /// Sky electrons per second per pixel
    pub sky_rate_per_pixel: f64,
    /// Sky electrons per second in the aperture
    pub sky_rate_aperture: f64,
    /// Dark current electrons per second in the aperture
    pub dark_rate_aperture: f64,
    /// Read noise variance summed over the aperture (e⁻²)
    pub read_variance: f64,
    /// Fraction of source flux landing in the peak pixel
    pub peak_fraction: f64,
}

/// Electron counts accumulated over one exposure
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseBudget {
    pub object_electrons: f64,
    pub background_electrons: f64,
    pub sky_per_pixel: f64,
    pub dark_electrons: f64,
    pub read_variance: f64,
    /// Estimated peak pixel level: source share plus sky
    pub peak_dn: f64,
    pub signal_to_noise: f64,
}

impl FluxModel {
    /// Signal-to-noise ratio reached after `exposure_s` seconds
    pub fn signal_to_noise(&self, exposure_s: f64) -> f64 {
        let object = self.object_rate * exposure_s;
        let variance = object
            + self.sky_rate_aperture * exposure_s
            + self.dark_rate_aperture * exposure_s
            + self.read_variance;
        object / variance.sqrt()
    }

    /// Full electron budget for an exposure of `exposure_s` seconds
    pub fn budget(&self, exposure_s: f64) -> NoiseBudget {
        let object_electrons = self.object_rate * exposure_s;
        let sky_per_pixel = self.sky_rate_per_pixel * exposure_s;

        NoiseBudget {
            object_electrons,
            background_electrons: self.sky_rate_aperture * exposure_s,
            sky_per_pixel,
            dark_electrons: self.dark_rate_aperture * exposure_s,
            read_variance: self.read_variance,
            peak_dn: object_electrons * self.peak_fraction + sky_per_pixel,
            signal_to_noise: self.signal_to_noise(exposure_s),
        }
    }

    /// Exposure time in seconds at which the S/N equals `target_snr` exactly.
    ///
    /// Solves `O²t² - S²(O + B + D)t - S²R = 0` for its positive root, where
    /// `O`, `B`, `D` are the source, sky and dark rates and `R` the read
    /// variance. Returns infinity for a source with no flux.
    pub fn analytic_exposure(&self, target_snr: f64) -> f64 {
        let o = self.object_rate;
        if o <= 0.0 {
            return f64::INFINITY;
        }
        let s2 = target_snr * target_snr;
        let rate = o + self.sky_rate_aperture + self.dark_rate_aperture;
        let discriminant = s2 * s2 * rate * rate + 4.0 * o * o * s2 * self.read_variance;
        (s2 * rate + discriminant.sqrt()) / (2.0 * o * o)
    }
}
