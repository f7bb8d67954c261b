//! Flat solve result handed back to callers

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::SolveMode;
use crate::algo::round_to_tenth;
use crate::photometry::{NoiseBudget, PhotometricSetup};

/// Outcome of a single solve.
///
/// Computed quantities are rounded to 0.1. Configuration values are echoed
/// unrounded so a display can show what the calculation assumed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveResult {
    /// Which quantity was solved for
    pub mode: SolveMode,
    /// Achieved signal-to-noise ratio
    pub signal_to_noise: f64,
    /// Source magnitude (solved in magnitude mode, otherwise as requested)
    pub magnitude: f64,
    /// Exposure time in seconds; whole seconds when solved for
    pub exposure_seconds: f64,
    /// Source electrons in the aperture
    pub object_electrons: f64,
    /// Sky electrons in the aperture
    pub background_electrons: f64,
    /// Dark current electrons in the aperture
    pub dark_electrons: f64,
    /// Read noise variance over the aperture (e⁻²)
    pub read_noise_electrons: f64,
    /// Sky electrons per pixel
    pub sky_per_pixel: f64,
    /// Estimated peak pixel level
    pub peak_dn: f64,
    /// Aperture area in square arcseconds
    pub aperture_arcsec2: f64,
    /// Aperture area in pixels
    pub aperture_pixels: f64,

    /// Sky brightness used, mag/arcsec²
    pub sky_brightness: f64,
    /// Extinction coefficient used, mag/airmass
    pub extinction: f64,
    /// Pixel scale, arcsec/pixel
    pub pixel_scale: f64,
    /// Dark current, e⁻/pixel/s
    pub dark_current: f64,
    /// Read noise, e⁻
    pub read_noise: f64,
    /// Gain, e⁻/ADU
    pub gain: f64,
    /// Photometric aperture diameter, arcsec
    pub aperture_diameter: f64,
    /// Telescope collecting area, cm²
    pub collecting_area: f64,
    /// Filter central wavelength, µm
    pub central_wavelength: f64,
    /// Detector saturation limit, e⁻/pixel
    pub saturation_limit: f64,
}

impl SolveResult {
    pub(crate) fn assemble(
        mode: SolveMode,
        setup: &PhotometricSetup,
        magnitude: f64,
        exposure_seconds: f64,
        budget: &NoiseBudget,
    ) -> Self {
        let profile = setup.instrument.profile();
        Self {
            mode,
            signal_to_noise: round_to_tenth(budget.signal_to_noise),
            magnitude: round_to_tenth(magnitude),
            exposure_seconds,
            object_electrons: round_to_tenth(budget.object_electrons),
            background_electrons: round_to_tenth(budget.background_electrons),
            dark_electrons: round_to_tenth(budget.dark_electrons),
            read_noise_electrons: round_to_tenth(budget.read_variance),
            sky_per_pixel: round_to_tenth(budget.sky_per_pixel),
            peak_dn: round_to_tenth(budget.peak_dn),
            aperture_arcsec2: round_to_tenth(setup.aperture.area_arcsec2),
            aperture_pixels: round_to_tenth(setup.aperture.pixels),
            sky_brightness: setup.sky_brightness,
            extinction: setup.extinction,
            pixel_scale: setup.pixel_scale_arcsec,
            dark_current: setup.dark_current_e_p_s,
            read_noise: setup.read_noise_e,
            gain: profile.gain_e_per_adu,
            aperture_diameter: setup.aperture.diameter_arcsec,
            collecting_area: profile.collecting_area_cm2,
            central_wavelength: setup.filter.band().central_wavelength_um,
            saturation_limit: profile.saturation_limit_e,
        }
    }

    /// Exposure time as a `Duration`
    pub fn exposure_time(&self) -> Duration {
        Duration::from_secs_f64(self.exposure_seconds)
    }

    /// Output fields in display order, labelled for a results table
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Solved for", self.mode.to_string()),
            ("S/N", format!("{:.1}", self.signal_to_noise)),
            ("Magnitude", format!("{:.1}", self.magnitude)),
            ("Exposure time (s)", format!("{}", self.exposure_seconds)),
            ("Object (e-)", format!("{:.1}", self.object_electrons)),
            ("Background (e-)", format!("{:.1}", self.background_electrons)),
            ("Dark (e-)", format!("{:.1}", self.dark_electrons)),
            ("Read noise (e-^2)", format!("{:.1}", self.read_noise_electrons)),
            ("Sky per pixel (e-)", format!("{:.1}", self.sky_per_pixel)),
            ("Peak pixel", format!("{:.1}", self.peak_dn)),
            ("Aperture (arcsec^2)", format!("{:.1}", self.aperture_arcsec2)),
            ("Aperture (pixels)", format!("{:.1}", self.aperture_pixels)),
            ("Sky (mag/arcsec^2)", format!("{}", self.sky_brightness)),
            ("Extinction (mag/airmass)", format!("{}", self.extinction)),
            ("Pixel scale (arcsec)", format!("{}", self.pixel_scale)),
            ("Dark current (e-/pix/s)", format!("{}", self.dark_current)),
            ("Read noise (e-)", format!("{}", self.read_noise)),
            ("Gain (e-/ADU)", format!("{}", self.gain)),
            ("Aperture diameter (arcsec)", format!("{}", self.aperture_diameter)),
            ("Collecting area (cm^2)", format!("{}", self.collecting_area)),
            ("Central wavelength (um)", format!("{}", self.central_wavelength)),
            ("Saturation limit (e-)", format!("{}", self.saturation_limit)),
        ]
    }
}
