//! Exposure-time, limiting-magnitude and S/N solver.
//!
//! A request supplies two of {S/N, magnitude, exposure time}; the solver
//! finds the third.
//!
//! # Modes
//! - **Exposure time**: target S/N and magnitude given. Steps the exposure up
//!   one second at a time from 1 s and stops at the first whole second that
//!   reaches the target.
//! - **Magnitude**: target S/N and exposure given. Steps the trial magnitude
//!   down (brighter) from 30.0 in 0.1 mag increments and stops at the first
//!   one that reaches the target.
//! - **S/N**: anything else. A single evaluation at the given magnitude and
//!   exposure.
//!
//! The mode is picked once, before any calibration is looked up, and both
//! searches stop with [`EtcError::ConvergenceError`] at the ceilings in
//! [`SolverLimits`].

pub mod request;
pub mod result;

use std::fmt;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::config::SolverLimits;
use crate::error::EtcError;
use crate::photometry::{FluxModel, NoiseBudget, PhotometricSetup};

pub use request::ObservationRequest;
pub use result::SolveResult;

/// Faintest magnitude tried by the limiting-magnitude search
pub const FAINTEST_TRIAL_MAGNITUDE: f64 = 30.0;

/// Magnitude increment of the limiting-magnitude search
pub const MAGNITUDE_STEP: f64 = 0.1;

/// The unknown a solve determines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SolveMode {
    ExposureTime,
    Magnitude,
    SignalToNoise,
}

impl SolveMode {
    /// Decide which quantity a request asks for.
    ///
    /// Only positive values count as supplied. When S/N, magnitude and
    /// exposure are all given, exposure time is solved for.
    pub fn select(request: &ObservationRequest) -> SolveMode {
        Plan::for_request(request).mode()
    }
}

impl fmt::Display for SolveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveMode::ExposureTime => write!(f, "exposure time"),
            SolveMode::Magnitude => write!(f, "magnitude"),
            SolveMode::SignalToNoise => write!(f, "S/N"),
        }
    }
}

/// Mode together with the inputs it runs on
enum Plan {
    ExposureTime { target_snr: f64, magnitude: f64 },
    Magnitude { target_snr: f64, exposure_s: f64 },
    SignalToNoise,
}

impl Plan {
    fn for_request(request: &ObservationRequest) -> Plan {
        let positive = |value: Option<f64>| value.filter(|v| *v > 0.0);

        match (
            positive(request.target_snr),
            positive(request.magnitude),
            positive(request.exposure_seconds()),
        ) {
            (Some(target_snr), Some(magnitude), _) => Plan::ExposureTime {
                target_snr,
                magnitude,
            },
            (Some(target_snr), None, Some(exposure_s)) => Plan::Magnitude {
                target_snr,
                exposure_s,
            },
            _ => Plan::SignalToNoise,
        }
    }

    fn mode(&self) -> SolveMode {
        match self {
            Plan::ExposureTime { .. } => SolveMode::ExposureTime,
            Plan::Magnitude { .. } => SolveMode::Magnitude,
            Plan::SignalToNoise => SolveMode::SignalToNoise,
        }
    }
}

/// Solve a request under the default [`SolverLimits`].
pub fn solve(request: &ObservationRequest) -> Result<SolveResult, EtcError> {
    solve_with_limits(request, &SolverLimits::default())
}

/// Solve a request for whichever of S/N, magnitude or exposure time it leaves open.
///
/// # Errors
/// - `InvalidNumericInput` for non-finite inputs, a non-positive airmass, or an
///   S/N solve missing its magnitude or exposure
/// - `IncompleteCalibration` when the instrument has no zeropoint for the filter
/// - `ConvergenceError` when a search passes its ceiling in `limits`
pub fn solve_with_limits(
    request: &ObservationRequest,
    limits: &SolverLimits,
) -> Result<SolveResult, EtcError> {
    request.validate()?;

    let plan = Plan::for_request(request);
    let mode = plan.mode();
    debug!(
        "Solving for {mode}: {} / {} / {} moon / airmass {}",
        request.instrument, request.filter, request.moon_phase, request.airmass
    );

    let setup = PhotometricSetup::resolve(
        request.instrument,
        request.filter,
        request.moon_phase,
        request.airmass,
    )?;

    let (magnitude, exposure_s, budget) = match plan {
        Plan::ExposureTime {
            target_snr,
            magnitude,
        } => {
            let model = setup.flux_model(magnitude);
            let seconds = search_exposure(&model, target_snr, limits)?;
            debug!("Reached S/N {target_snr} after {seconds} s");
            (magnitude, seconds as f64, model.budget(seconds as f64))
        }
        Plan::Magnitude {
            target_snr,
            exposure_s,
        } => {
            let (magnitude, budget) = search_magnitude(&setup, target_snr, exposure_s, limits)?;
            debug!("Reached S/N {target_snr} at magnitude {magnitude:.1}");
            (magnitude, exposure_s, budget)
        }
        Plan::SignalToNoise => {
            let magnitude = request.magnitude.ok_or_else(|| {
                EtcError::numeric("magnitude", "", "required when solving for S/N")
            })?;
            let exposure_s = request.exposure_seconds().ok_or_else(|| {
                EtcError::numeric("exposure time", "", "required when solving for S/N")
            })?;
            let budget = setup.flux_model(magnitude).budget(exposure_s);
            (magnitude, exposure_s, budget)
        }
    };

    Ok(SolveResult::assemble(
        mode,
        &setup,
        magnitude,
        exposure_s,
        &budget,
    ))
}

/// First whole second, counting from 1, at which the S/N reaches the target
fn search_exposure(
    model: &FluxModel,
    target_snr: f64,
    limits: &SolverLimits,
) -> Result<u64, EtcError> {
    let mut seconds: u64 = 1;
    while model.signal_to_noise(seconds as f64) < target_snr {
        if seconds >= limits.max_exposure_seconds {
            warn!(
                "S/N {target_snr} not reached within {} s",
                limits.max_exposure_seconds
            );
            return Err(EtcError::ConvergenceError {
                mode: SolveMode::ExposureTime,
                iterations: seconds,
            });
        }
        seconds += 1;
    }
    Ok(seconds)
}

/// First magnitude, brightening from the faint end, at which the S/N reaches the target
fn search_magnitude(
    setup: &PhotometricSetup,
    target_snr: f64,
    exposure_s: f64,
    limits: &SolverLimits,
) -> Result<(f64, NoiseBudget), EtcError> {
    let mut step: u64 = 0;
    loop {
        let magnitude = FAINTEST_TRIAL_MAGNITUDE - MAGNITUDE_STEP * step as f64;
        if magnitude < limits.brightest_trial_magnitude - MAGNITUDE_STEP / 2.0 {
            warn!(
                "S/N {target_snr} not reached in {exposure_s} s for any magnitude down to {}",
                limits.brightest_trial_magnitude
            );
            return Err(EtcError::ConvergenceError {
                mode: SolveMode::Magnitude,
                iterations: step,
            });
        }

        let budget = setup.flux_model(magnitude).budget(exposure_s);
        if budget.signal_to_noise >= target_snr {
            return Ok((magnitude, budget));
        }
        step += 1;
    }
}

/// One point of an exposure-time curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub magnitude: f64,
    /// Whole seconds found by the stepping search, `None` past the ceiling
    pub exposure_seconds: Option<u64>,
    /// Exact continuous solution of the S/N equation
    pub analytic_seconds: f64,
}

/// Exposure time needed to reach `target_snr` at each of `magnitudes`.
///
/// Uses the instrument, filter, moon and airmass of `template`; its own S/N,
/// magnitude and exposure are ignored. Points that pass the exposure ceiling
/// are reported with no stepped exposure rather than failing the curve.
pub fn exposure_curve(
    template: &ObservationRequest,
    target_snr: f64,
    magnitudes: &[f64],
    limits: &SolverLimits,
) -> Result<Vec<CurvePoint>, EtcError> {
    template.validate()?;
    if !target_snr.is_finite() || target_snr <= 0.0 {
        return Err(EtcError::numeric("target S/N", target_snr, "must be positive"));
    }

    let setup = PhotometricSetup::resolve(
        template.instrument,
        template.filter,
        template.moon_phase,
        template.airmass,
    )?;

    magnitudes
        .iter()
        .map(|&magnitude| {
            let model = setup.flux_model(magnitude);
            let exposure_seconds = match search_exposure(&model, target_snr, limits) {
                Ok(seconds) => Some(seconds),
                Err(EtcError::ConvergenceError { .. }) => None,
                Err(e) => return Err(e),
            };
            Ok(CurvePoint {
                magnitude,
                exposure_seconds,
                analytic_seconds: model.analytic_exposure(target_snr),
            })
        })
        .collect()
}

/// One point of a signal-to-noise curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnrPoint {
    pub exposure_seconds: f64,
    pub signal_to_noise: f64,
    /// Estimated peak pixel level, for spotting saturation along the curve
    pub peak_dn: f64,
}

/// Signal-to-noise reached by a source of `magnitude` at each of `exposures` (seconds).
///
/// Uses the instrument, filter, moon and airmass of `template`; its own S/N,
/// magnitude and exposure are ignored. Points come back in the order given.
///
/// # Errors
/// `InvalidNumericInput` for a non-finite magnitude or an exposure that is not
/// positive or exceeds `limits.max_exposure_seconds`.
pub fn snr_curve(
    template: &ObservationRequest,
    magnitude: f64,
    exposures: &[f64],
    limits: &SolverLimits,
) -> Result<Vec<SnrPoint>, EtcError> {
    template.validate()?;
    if !magnitude.is_finite() {
        return Err(EtcError::numeric("magnitude", magnitude, "must be a finite number"));
    }
    if let Some(&bad) = exposures.iter().find(|&&t| t.is_nan() || t <= 0.0) {
        return Err(EtcError::numeric("exposure time", bad, "must be positive"));
    }
    let ceiling = limits.max_exposure_seconds as f64;
    if let Some(&long) = exposures.iter().find(|&&t| t > ceiling) {
        return Err(EtcError::numeric(
            "exposure time",
            long,
            "exceeds the exposure ceiling",
        ));
    }

    let setup = PhotometricSetup::resolve(
        template.instrument,
        template.filter,
        template.moon_phase,
        template.airmass,
    )?;
    let model = setup.flux_model(magnitude);
    debug!(
        "S/N curve for magnitude {magnitude} over {} exposures",
        exposures.len()
    );

    Ok(exposures
        .iter()
        .map(|&exposure_seconds| {
            let budget = model.budget(exposure_seconds);
            SnrPoint {
                exposure_seconds,
                signal_to_noise: budget.signal_to_noise,
                peak_dn: budget.peak_dn,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::Instrument;
    use approx::assert_relative_eq;
    use crate::photometry::{Filter, MoonPhase};
    use std::time::Duration;

    fn base() -> ObservationRequest {
        ObservationRequest::new(Instrument::Sinistro1m0, Filter::JohnsonV, MoonPhase::New, 1.2)
    }

    #[test]
    fn test_mode_selection() {
        let e = base().with_target_snr(20.0).with_magnitude(18.0);
        assert_eq!(SolveMode::select(&e), SolveMode::ExposureTime);

        let m = base()
            .with_target_snr(20.0)
            .with_exposure(Duration::from_secs(300));
        assert_eq!(SolveMode::select(&m), SolveMode::Magnitude);

        let s = base()
            .with_magnitude(18.0)
            .with_exposure(Duration::from_secs(300));
        assert_eq!(SolveMode::select(&s), SolveMode::SignalToNoise);
    }

    #[test]
    fn test_exposure_mode_takes_precedence() {
        let all = base()
            .with_target_snr(20.0)
            .with_magnitude(18.0)
            .with_exposure(Duration::from_secs(300));
        assert_eq!(SolveMode::select(&all), SolveMode::ExposureTime);
    }

    #[test]
    fn test_zero_values_count_as_unset() {
        let zero_snr = base()
            .with_target_snr(0.0)
            .with_magnitude(18.0)
            .with_exposure(Duration::from_secs(300));
        assert_eq!(SolveMode::select(&zero_snr), SolveMode::SignalToNoise);

        let zero_mag = base()
            .with_target_snr(20.0)
            .with_magnitude(0.0)
            .with_exposure(Duration::from_secs(300));
        assert_eq!(SolveMode::select(&zero_mag), SolveMode::Magnitude);

        let nothing = base().with_target_snr(20.0).with_exposure(Duration::ZERO);
        assert_eq!(SolveMode::select(&nothing), SolveMode::SignalToNoise);
    }

    #[test]
    fn test_search_exposure_returns_first_second() {
        let setup = PhotometricSetup::resolve(
            Instrument::Sinistro1m0,
            Filter::JohnsonV,
            MoonPhase::New,
            1.2,
        )
        .unwrap();
        let model = setup.flux_model(18.0);
        let seconds = search_exposure(&model, 20.0, &SolverLimits::default()).unwrap();
        assert_eq!(seconds, 9);
        assert!(model.signal_to_noise(8.0) < 20.0);
        assert!(model.signal_to_noise(9.0) >= 20.0);
    }

    #[test]
    fn test_search_exposure_minimum_is_one_second() {
        let setup = PhotometricSetup::resolve(
            Instrument::Spectral2m0,
            Filter::SloanR,
            MoonPhase::New,
            1.0,
        )
        .unwrap();
        let model = setup.flux_model(10.0);
        assert_eq!(
            search_exposure(&model, 5.0, &SolverLimits::default()).unwrap(),
            1
        );
    }

    #[test]
    fn test_search_exposure_ceiling() {
        let setup = PhotometricSetup::resolve(
            Instrument::Sinistro1m0,
            Filter::JohnsonV,
            MoonPhase::New,
            1.2,
        )
        .unwrap();
        let limits = SolverLimits {
            max_exposure_seconds: 5,
            ..SolverLimits::default()
        };
        assert_eq!(
            search_exposure(&setup.flux_model(18.0), 20.0, &limits),
            Err(EtcError::ConvergenceError {
                mode: SolveMode::ExposureTime,
                iterations: 5,
            })
        );
    }

    #[test]
    fn test_search_magnitude_ceiling() {
        let setup = PhotometricSetup::resolve(
            Instrument::Sinistro1m0,
            Filter::JohnsonV,
            MoonPhase::New,
            1.2,
        )
        .unwrap();
        let limits = SolverLimits {
            brightest_trial_magnitude: 25.0,
            ..SolverLimits::default()
        };
        // 30.0 down to 25.0 inclusive is 51 trials
        assert_eq!(
            search_magnitude(&setup, 20.0, 300.0, &limits).unwrap_err(),
            EtcError::ConvergenceError {
                mode: SolveMode::Magnitude,
                iterations: 51,
            }
        );
    }

    #[test]
    fn test_search_magnitude_inclusive_floor() {
        let setup = PhotometricSetup::resolve(
            Instrument::Sinistro1m0,
            Filter::JohnsonV,
            MoonPhase::New,
            1.2,
        )
        .unwrap();
        let limits = SolverLimits {
            brightest_trial_magnitude: 21.1,
            ..SolverLimits::default()
        };
        let (magnitude, _) = search_magnitude(&setup, 20.0, 300.0, &limits).unwrap();
        assert_eq!(crate::algo::round_to_tenth(magnitude), 21.1);
    }

    #[test]
    fn test_signal_to_noise_requires_inputs() {
        let missing_mag = base().with_exposure(Duration::from_secs(300));
        assert!(matches!(
            solve(&missing_mag),
            Err(EtcError::InvalidNumericInput {
                field: "magnitude",
                ..
            })
        ));

        let missing_exposure = base().with_magnitude(18.0);
        assert!(matches!(
            solve(&missing_exposure),
            Err(EtcError::InvalidNumericInput {
                field: "exposure time",
                ..
            })
        ));
    }

    #[test]
    fn test_validation_precedes_calibration() {
        let request = ObservationRequest {
            airmass: -1.0,
            ..ObservationRequest::new(Instrument::Muscat2m0, Filter::JohnsonU, MoonPhase::New, 1.0)
        }
        .with_magnitude(18.0)
        .with_exposure(Duration::from_secs(60));
        assert!(matches!(
            solve(&request),
            Err(EtcError::InvalidNumericInput { field: "airmass", .. })
        ));
    }

    #[test]
    fn test_exposure_curve() {
        let magnitudes = [14.0, 16.0, 18.0];
        let curve = exposure_curve(&base(), 20.0, &magnitudes, &SolverLimits::default()).unwrap();
        assert_eq!(curve.len(), 3);
        assert_eq!(curve[2].exposure_seconds, Some(9));
        for point in &curve {
            let stepped = point.exposure_seconds.unwrap() as f64;
            assert!(stepped >= point.analytic_seconds.ceil().max(1.0) - 1.0);
            assert!(stepped <= point.analytic_seconds.ceil().max(1.0) + 1.0);
        }
        assert!(curve[0].analytic_seconds < curve[1].analytic_seconds);
        assert!(curve[1].analytic_seconds < curve[2].analytic_seconds);
    }

    #[test]
    fn test_exposure_curve_marks_unreachable_points() {
        let limits = SolverLimits {
            max_exposure_seconds: 100,
            ..SolverLimits::default()
        };
        let curve = exposure_curve(&base(), 20.0, &[18.0, 23.0], &limits).unwrap();
        assert_eq!(curve[0].exposure_seconds, Some(9));
        assert_eq!(curve[1].exposure_seconds, None);
        assert!(curve[1].analytic_seconds > 100.0);
    }

    #[test]
    fn test_exposure_curve_rejects_bad_target() {
        assert!(exposure_curve(&base(), 0.0, &[18.0], &SolverLimits::default()).is_err());
    }

    #[test]
    fn test_snr_curve_is_non_decreasing() {
        let exposures = [1.0, 5.0, 10.0, 30.0, 60.0, 120.0, 180.0, 240.0, 300.0];
        let curve = snr_curve(&base(), 18.0, &exposures, &SolverLimits::default()).unwrap();

        assert_eq!(curve.len(), exposures.len());
        for pair in curve.windows(2) {
            assert!(pair[1].signal_to_noise >= pair[0].signal_to_noise);
            assert!(pair[1].peak_dn >= pair[0].peak_dn);
        }
        assert_eq!(curve[8].exposure_seconds, 300.0);
        assert_relative_eq!(curve[8].signal_to_noise, 187.1896, max_relative = 1e-6);
    }

    #[test]
    fn test_snr_curve_matches_single_solve() {
        let curve = snr_curve(&base(), 18.0, &[9.0], &SolverLimits::default()).unwrap();
        let solved = solve(&base().with_target_snr(20.0).with_magnitude(18.0)).unwrap();
        assert_eq!(
            crate::algo::round_to_tenth(curve[0].signal_to_noise),
            solved.signal_to_noise
        );
    }

    #[test]
    fn test_snr_curve_rejects_bad_exposures() {
        let limits = SolverLimits {
            max_exposure_seconds: 600,
            ..SolverLimits::default()
        };
        for exposures in [&[10.0, 0.0][..], &[-5.0][..], &[f64::NAN][..], &[601.0][..]] {
            assert!(matches!(
                snr_curve(&base(), 18.0, exposures, &limits),
                Err(EtcError::InvalidNumericInput {
                    field: "exposure time",
                    ..
                })
            ));
        }
        assert!(snr_curve(&base(), f64::INFINITY, &[10.0], &limits).is_err());
    }

    #[test]
    fn test_snr_curve_needs_calibration() {
        let muscat_u =
            ObservationRequest::new(Instrument::Muscat2m0, Filter::JohnsonU, MoonPhase::New, 1.0);
        assert!(matches!(
            snr_curve(&muscat_u, 18.0, &[60.0], &SolverLimits::default()),
            Err(EtcError::IncompleteCalibration { .. })
        ));
    }
}
