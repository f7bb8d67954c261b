//! Exposure time calculator for ground-based imaging.
//!
//! Given a telescope/instrument, filter, moon phase and airmass, estimates the
//! signal-to-noise ratio, limiting magnitude or exposure time of an aperture
//! photometry measurement from measured photometric zeropoints.
//!
//! ```rust
//! use exposure_calc::hardware::Instrument;
//! use exposure_calc::photometry::{Filter, MoonPhase};
//! use exposure_calc::{solve, ObservationRequest, SolveMode};
//!
//! let request =
//!     ObservationRequest::new(Instrument::Sinistro1m0, Filter::JohnsonV, MoonPhase::New, 1.2)
//!         .with_target_snr(20.0)
//!         .with_magnitude(18.0);
//!
//! let result = solve(&request).unwrap();
//! assert_eq!(result.mode, SolveMode::ExposureTime);
//! assert_eq!(result.exposure_seconds, 9.0);
//! ```

pub mod algo;
pub mod config;
pub mod error;
pub mod form;
pub mod hardware;
pub mod photometry;
pub mod shared_args;
pub mod solver;

pub use config::SolverLimits;
pub use error::EtcError;
pub use solver::{solve, solve_with_limits, ObservationRequest, SolveMode, SolveResult};
