//! Photometry models and utilities

pub mod band;
pub mod flux;
pub mod psf;
pub mod sky;
pub mod zeropoint;

pub use band::{band, BandProfile, Filter};
pub use flux::{ApertureGeometry, FluxModel, NoiseBudget, PhotometricSetup};
pub use psf::GaussianSeeing;
pub use sky::{sky_brightness, MoonPhase};
pub use zeropoint::{measured_zeropoint, zeropoint};
