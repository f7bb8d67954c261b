//! Gaussian seeing profile used for the peak-pixel estimate.

/// Ratio between the FWHM and sigma of a Gaussian, as tabulated for seeing.
pub const FWHM_TO_SIGMA: f64 = 2.354;

/// Seeing assumed for every observation, FWHM in arcseconds.
pub const DEFAULT_SEEING_FWHM_ARCSEC: f64 = 2.0;

/// Circularly symmetric Gaussian seeing disk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianSeeing {
    /// Full width at half maximum in arcseconds
    pub fwhm_arcsec: f64,
}

impl GaussianSeeing {
    pub fn with_fwhm(fwhm_arcsec: f64) -> Self {
        Self { fwhm_arcsec }
    }

    /// Gaussian sigma in arcseconds
    pub fn sigma(&self) -> f64 {
        self.fwhm_arcsec / FWHM_TO_SIGMA
    }

    /// Fraction of the source flux falling inside a circle of `radius_arcsec`.
    ///
    /// Evaluates `1 - exp(-R²/2σ²)`. The peak-pixel estimate approximates a
    /// square pixel by the circle inscribed in it, so the result is an
    /// enclosed fraction rather than an integral of the PSF over the pixel.
    pub fn radial_containment(&self, radius_arcsec: f64) -> f64 {
        let sigma = self.sigma();
        1.0 - (-(radius_arcsec * radius_arcsec) / (2.0 * sigma * sigma)).exp()
    }

    /// Fraction of flux expected in the brightest pixel of the given scale
    pub fn peak_pixel_fraction(&self, pixel_scale_arcsec: f64) -> f64 {
        self.radial_containment(pixel_scale_arcsec / 2.0)
    }
}

impl Default for GaussianSeeing {
    fn default() -> Self {
        Self::with_fwhm(DEFAULT_SEEING_FWHM_ARCSEC)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sigma_from_fwhm() {
        let seeing = GaussianSeeing::default();
        assert_relative_eq!(seeing.sigma(), 2.0 / 2.354, epsilon = 1e-12);
    }

    #[test]
    fn test_containment_limits() {
        let seeing = GaussianSeeing::default();
        assert_eq!(seeing.radial_containment(0.0), 0.0);
        assert_relative_eq!(seeing.radial_containment(100.0), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_containment_at_half_maximum() {
        // Half the flux of a 2-D Gaussian lies within the half-width at half maximum
        let seeing = GaussianSeeing::with_fwhm(2.354);
        let hwhm = (2.0 * 2.0_f64.ln()).sqrt();
        assert_relative_eq!(seeing.radial_containment(hwhm), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_containment_is_monotonic() {
        let seeing = GaussianSeeing::default();
        let mut previous = 0.0;
        for step in 1..50 {
            let fraction = seeing.radial_containment(step as f64 * 0.1);
            assert!(fraction > previous);
            previous = fraction;
        }
    }

    #[test]
    fn test_peak_fraction_for_sinistro_pixels() {
        let fraction = GaussianSeeing::default().peak_pixel_fraction(0.389);
        assert_relative_eq!(fraction, 0.025863334, epsilon = 1e-8);
    }

    #[test]
    fn test_better_seeing_concentrates_flux() {
        let good = GaussianSeeing::with_fwhm(1.0).peak_pixel_fraction(0.389);
        let poor = GaussianSeeing::with_fwhm(3.0).peak_pixel_fraction(0.389);
        assert!(good > poor);
    }
}
