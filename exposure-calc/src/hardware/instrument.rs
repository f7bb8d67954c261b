//! Telescope/instrument calibration catalog

use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::EtcError;
use crate::photometry::Filter;

/// The five telescope/camera combinations the calculator knows about.
///
/// Discriminants match the instrument ids used on the observing form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Instrument {
    /// 0.4 m telescope with SBIG camera
    Sbig0m4 = 0,
    /// 1.0 m telescope with Sinistro camera
    Sinistro1m0 = 1,
    /// 0.4 m / 0.35 m telescope with QHY camera
    Qhy0m4 = 2,
    /// 2.0 m telescope with Spectral camera
    Spectral2m0 = 3,
    /// 2.0 m telescope with MuSCAT3 multi-channel imager
    Muscat2m0 = 4,
}

impl Instrument {
    pub const ALL: [Instrument; 5] = [
        Instrument::Sbig0m4,
        Instrument::Sinistro1m0,
        Instrument::Qhy0m4,
        Instrument::Spectral2m0,
        Instrument::Muscat2m0,
    ];

    /// Resolve a form instrument id, failing fast outside 0..=4
    pub fn from_id(id: u8) -> Result<Self, EtcError> {
        Instrument::ALL
            .get(id as usize)
            .copied()
            .ok_or(EtcError::InvalidInstrument(id as i64))
    }

    pub fn id(self) -> u8 {
        self as u8
    }

    /// Static calibration constants for this instrument
    pub fn profile(self) -> &'static InstrumentProfile {
        match self {
            Instrument::Sbig0m4 => &models::SBIG_0M4,
            Instrument::Sinistro1m0 => &models::SINISTRO_1M0,
            Instrument::Qhy0m4 => &models::QHY_0M4,
            Instrument::Spectral2m0 => &models::SPECTRAL_2M0,
            Instrument::Muscat2m0 => &models::MUSCAT3_2M0,
        }
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.profile().name)
    }
}

/// Calibration constants for one telescope/camera combination
#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentProfile {
    /// Name of the telescope/camera combination
    pub name: String,
    /// Pixel scale in arcseconds per pixel
    pub pixel_scale_arcsec: f64,
    /// Gain in electrons per ADU
    pub gain_e_per_adu: f64,
    /// Read noise in electrons per pixel
    pub read_noise_e: f64,
    /// Dark current in electrons per pixel per second
    pub dark_current_e_p_s: f64,
    /// Saturation limit in electrons per unbinned pixel
    pub saturation_limit_e: f64,
    /// Collecting area in cm² (informational)
    pub collecting_area_cm2: f64,
    /// Photometric zeropoint per filter in log(e⁻/s) at magnitude 0.
    /// 0.0 marks a filter without data or not installed.
    zeropoints: [f64; Filter::COUNT],
}

impl InstrumentProfile {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        pixel_scale_arcsec: f64,
        gain_e_per_adu: f64,
        read_noise_e: f64,
        dark_current_e_p_s: f64,
        saturation_limit_e: f64,
        collecting_area_cm2: f64,
        zeropoints: [f64; Filter::COUNT],
    ) -> Self {
        Self {
            name: name.into(),
            pixel_scale_arcsec,
            gain_e_per_adu,
            read_noise_e,
            dark_current_e_p_s,
            saturation_limit_e,
            collecting_area_cm2,
            zeropoints,
        }
    }

    /// Zeropoint for a filter, or `None` if this instrument has no calibration for it
    pub fn zeropoint(&self, filter: Filter) -> Option<f64> {
        let zp = self.zeropoints[filter.index()];
        (zp != 0.0).then_some(zp)
    }

    /// Filters with a usable zeropoint
    pub fn supported_filters(&self) -> Vec<Filter> {
        Filter::ALL
            .into_iter()
            .filter(|filter| self.zeropoint(*filter).is_some())
            .collect()
    }
}

/// Calibrated instrument models
///
/// Zeropoints for ugriz reviewed 2023-02-01, Johnson 2023-02-02, all Sinistro
/// filters 2023-02-06. Y band not yet updated.
pub mod models {
    use super::*;

    #[rustfmt::skip]
    pub static SBIG_0M4: Lazy<InstrumentProfile> = Lazy::new(|| {
        InstrumentProfile::new(
            "0m4 SBIG",
            0.57, // arcsec/pixel
            1.6,  // e-/ADU
            14.0, // e- read noise
            0.02, // e-/pix/s
            65000.0 * 1.6,
            1200.0,
            // U     B     V     R     I     u      g     r     i      Z     Y
            [18.0, 20.3, 20.7, 21.2, 20.3, 16.11, 21.4, 21.5, 20.75, 19.4, 17.8],
        )
    });

    #[rustfmt::skip]
    pub static SINISTRO_1M0: Lazy<InstrumentProfile> = Lazy::new(|| {
        InstrumentProfile::new(
            "1m0 Sinistro",
            0.389,
            2.3,
            8.0,
            0.002,
            10000.0,
            6260.0,
            [21.4, 23.5, 23.5, 23.8, 23.2, 22.45, 24.3, 23.8, 23.5, 22.2, 20.3],
        )
    });

    // TODO: QHY zeropoints still need confirming against on-sky data
    #[rustfmt::skip]
    pub static QHY_0M4: Lazy<InstrumentProfile> = Lazy::new(|| {
        InstrumentProfile::new(
            "0m4 QHY",
            0.73,
            0.7,
            3.0,
            0.04,
            47000.0,
            660.0,
            [0.0, 21.4, 21.4, 21.2, 20.3, 17.5, 21.8, 21.2, 20.1, 18.4, 0.0],
        )
    });

    #[rustfmt::skip]
    pub static SPECTRAL_2M0: Lazy<InstrumentProfile> = Lazy::new(|| {
        InstrumentProfile::new(
            "2m0 Spectral",
            0.304,
            7.7,
            11.0,
            0.002,
            71000.0,
            27000.0,
            [21.3, 24.4, 24.6, 24.9, 24.1, 21.4, 25.4, 25.25, 24.75, 23.75, 21.6],
        )
    });

    /// MuSCAT3 carries only g, r, i and z channels
    #[rustfmt::skip]
    pub static MUSCAT3_2M0: Lazy<InstrumentProfile> = Lazy::new(|| {
        InstrumentProfile::new(
            "2m0 MuSCAT3",
            0.27,
            1.9,
            14.5,
            0.005,
            462000.0,
            27000.0,
            [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 25.4, 25.2, 24.5, 24.3, 0.0],
        )
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_id() {
        assert_eq!(Instrument::from_id(0).unwrap(), Instrument::Sbig0m4);
        assert_eq!(Instrument::from_id(4).unwrap(), Instrument::Muscat2m0);
        assert_eq!(
            Instrument::from_id(5),
            Err(EtcError::InvalidInstrument(5))
        );
        for instrument in Instrument::ALL {
            assert_eq!(Instrument::from_id(instrument.id()).unwrap(), instrument);
        }
    }

    #[test]
    fn test_predefined_instruments() {
        let sinistro = Instrument::Sinistro1m0.profile();
        assert_eq!(sinistro.name, "1m0 Sinistro");
        assert_eq!(sinistro.pixel_scale_arcsec, 0.389);
        assert_eq!(sinistro.gain_e_per_adu, 2.3);
        assert_eq!(sinistro.read_noise_e, 8.0);
        assert_eq!(sinistro.dark_current_e_p_s, 0.002);
        assert_eq!(sinistro.saturation_limit_e, 10000.0);
        assert_eq!(sinistro.collecting_area_cm2, 6260.0);
        assert_eq!(sinistro.zeropoint(Filter::JohnsonV), Some(23.5));

        let sbig = Instrument::Sbig0m4.profile();
        assert_eq!(sbig.saturation_limit_e, 104000.0);
        assert_eq!(sbig.zeropoint(Filter::SloanU), Some(16.11));
    }

    #[test]
    fn test_unsupported_filters_have_no_zeropoint() {
        let muscat = Instrument::Muscat2m0.profile();
        assert_eq!(muscat.zeropoint(Filter::JohnsonU), None);
        assert_eq!(
            muscat.supported_filters(),
            vec![
                Filter::SloanG,
                Filter::SloanR,
                Filter::SloanI,
                Filter::PanStarrsZ
            ]
        );

        let qhy = Instrument::Qhy0m4.profile();
        assert_eq!(qhy.zeropoint(Filter::JohnsonU), None);
        assert_eq!(qhy.zeropoint(Filter::PanStarrsY), None);
        assert_eq!(qhy.supported_filters().len(), 9);
    }

    #[test]
    fn test_larger_apertures_go_deeper() {
        let small = Instrument::Sbig0m4.profile();
        let large = Instrument::Spectral2m0.profile();
        for filter in Filter::ALL {
            assert!(large.zeropoint(filter) > small.zeropoint(filter));
        }
        assert!(large.collecting_area_cm2 > small.collecting_area_cm2);
    }

    #[test]
    fn test_display_uses_profile_name() {
        assert_eq!(Instrument::Muscat2m0.to_string(), "2m0 MuSCAT3");
    }
}
