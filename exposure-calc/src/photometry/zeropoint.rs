//! Photometric zeropoints: catalog lookup and derivation from a measured star.

use std::time::Duration;

use super::Filter;
use crate::error::EtcError;
use crate::hardware::Instrument;

/// Catalog zeropoint in log(e⁻/s) at magnitude 0.
///
/// `None` means the instrument has no calibration for the filter (the
/// catalog stores these as 0.0).
pub fn zeropoint(instrument: Instrument, filter: Filter) -> Option<f64> {
    instrument.profile().zeropoint(filter)
}

/// Derive a zeropoint from a star of known catalog magnitude.
///
/// Inverts the flux model: the gain-corrected count rate of the star,
/// observed through `airmass` with extinction `extinction` mag/airmass, gives
/// `Z = m + (X - 1) k + 2.5 log10(counts · gain / t)`.
///
/// # Arguments
/// * `catalog_mag` - Magnitude of the star above the atmosphere
/// * `counts_adu` - Background-subtracted aperture sum in ADU
/// * `gain_e_per_adu` - Detector gain in e⁻/ADU
/// * `exposure` - Integration time
/// * `airmass` - Airmass of the observation
/// * `extinction` - Extinction coefficient in mag per airmass
///
/// # Errors
/// `InvalidNumericInput` if counts, gain or exposure are not positive.
pub fn measured_zeropoint(
    catalog_mag: f64,
    counts_adu: f64,
    gain_e_per_adu: f64,
    exposure: Duration,
    airmass: f64,
    extinction: f64,
) -> Result<f64, EtcError> {
    if counts_adu.is_nan() || counts_adu <= 0.0 {
        return Err(EtcError::numeric("counts", counts_adu, "must be positive"));
    }
    if gain_e_per_adu.is_nan() || gain_e_per_adu <= 0.0 {
        return Err(EtcError::numeric("gain", gain_e_per_adu, "must be positive"));
    }
    let seconds = exposure.as_secs_f64();
    if seconds <= 0.0 {
        return Err(EtcError::numeric("exposure", seconds, "must be positive"));
    }

    let electrons_per_s = counts_adu * gain_e_per_adu / seconds;
    let mag_at_airmass = catalog_mag + (airmass - 1.0) * extinction;
    Ok(mag_at_airmass + 2.5 * electrons_per_s.log10())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::photometry::{MoonPhase, PhotometricSetup};
    use approx::assert_relative_eq;

    #[test]
    fn test_catalog_lookup() {
        assert_eq!(zeropoint(Instrument::Spectral2m0, Filter::SloanR), Some(25.25));
        assert_eq!(zeropoint(Instrument::Muscat2m0, Filter::JohnsonB), None);
    }

    #[test]
    fn test_one_electron_per_second_star() {
        // A star producing 1 e-/s at zenith sits exactly at the zeropoint
        let zp = measured_zeropoint(23.5, 10.0, 1.0, Duration::from_secs(10), 1.0, 0.12).unwrap();
        assert_relative_eq!(zp, 23.5, epsilon = 1e-12);
    }

    #[test]
    fn test_gain_and_exposure_scaling() {
        // 100x more electrons per second is five magnitudes of zeropoint
        let base = measured_zeropoint(15.0, 1000.0, 1.0, Duration::from_secs(1), 1.0, 0.0).unwrap();
        let scaled = measured_zeropoint(15.0, 1000.0, 2.0, Duration::from_secs(20), 1.0, 0.0).unwrap();
        assert_relative_eq!(base, 22.5, epsilon = 1e-12);
        assert_relative_eq!(base - scaled, 2.5, epsilon = 1e-12);
    }

    #[test]
    fn test_inverts_flux_model() {
        let setup =
            PhotometricSetup::resolve(Instrument::Sinistro1m0, Filter::SloanG, MoonPhase::New, 1.6)
                .unwrap();
        let exposure = Duration::from_secs(30);
        let electrons = setup.flux_model(14.2).object_rate * exposure.as_secs_f64();
        let gain = Instrument::Sinistro1m0.profile().gain_e_per_adu;

        let zp = measured_zeropoint(
            14.2,
            electrons / gain,
            gain,
            exposure,
            setup.airmass,
            setup.extinction,
        )
        .unwrap();
        assert_relative_eq!(zp, setup.zeropoint, epsilon = 1e-9);
    }

    #[test]
    fn test_rejects_non_positive_inputs() {
        let t = Duration::from_secs(1);
        assert!(measured_zeropoint(10.0, 0.0, 1.0, t, 1.0, 0.1).is_err());
        assert!(measured_zeropoint(10.0, -5.0, 1.0, t, 1.0, 0.1).is_err());
        assert!(measured_zeropoint(10.0, 100.0, 0.0, t, 1.0, 0.1).is_err());
        assert!(measured_zeropoint(10.0, f64::NAN, 1.0, t, 1.0, 0.1).is_err());
        assert!(measured_zeropoint(10.0, 100.0, 1.0, Duration::ZERO, 1.0, 0.1).is_err());
    }
}
