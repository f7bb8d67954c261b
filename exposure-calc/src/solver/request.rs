//! Typed observation request

use std::time::Duration;

use crate::error::EtcError;
use crate::hardware::Instrument;
use crate::photometry::{Filter, MoonPhase};

/// One observation to evaluate.
///
/// Of `target_snr`, `magnitude` and `exposure`, the values that are present
/// and positive decide which quantity gets solved for (see
/// [`SolveMode::select`](super::SolveMode::select)).
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationRequest {
    /// Desired signal-to-noise ratio
    pub target_snr: Option<f64>,
    /// Source magnitude above the atmosphere
    pub magnitude: Option<f64>,
    /// Requested exposure time
    pub exposure: Option<Duration>,
    pub instrument: Instrument,
    pub filter: Filter,
    pub moon_phase: MoonPhase,
    /// Airmass of the observation; values below 1 are accepted as given
    pub airmass: f64,
}

impl ObservationRequest {
    /// Request with no S/N, magnitude or exposure set
    pub fn new(instrument: Instrument, filter: Filter, moon_phase: MoonPhase, airmass: f64) -> Self {
        Self {
            target_snr: None,
            magnitude: None,
            exposure: None,
            instrument,
            filter,
            moon_phase,
            airmass,
        }
    }

    pub fn with_target_snr(mut self, target_snr: f64) -> Self {
        self.target_snr = Some(target_snr);
        self
    }

    pub fn with_magnitude(mut self, magnitude: f64) -> Self {
        self.magnitude = Some(magnitude);
        self
    }

    pub fn with_exposure(mut self, exposure: Duration) -> Self {
        self.exposure = Some(exposure);
        self
    }

    /// Requested exposure in seconds, if any
    pub fn exposure_seconds(&self) -> Option<f64> {
        self.exposure.map(|e| e.as_secs_f64())
    }

    /// Reject values no solve can use.
    ///
    /// Airmass must be finite and positive; S/N and magnitude, when present,
    /// must be finite. `Duration` already rules out negative exposures.
    pub fn validate(&self) -> Result<(), EtcError> {
        if let Some(snr) = self.target_snr {
            if !snr.is_finite() {
                return Err(EtcError::numeric("target S/N", snr, "must be a finite number"));
            }
        }
        if let Some(mag) = self.magnitude {
            if !mag.is_finite() {
                return Err(EtcError::numeric("magnitude", mag, "must be a finite number"));
            }
        }
        if !self.airmass.is_finite() || self.airmass <= 0.0 {
            return Err(EtcError::numeric(
                "airmass",
                self.airmass,
                "must be a positive number",
            ));
        }
        Ok(())
    }
}
