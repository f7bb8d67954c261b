use crate::config::SolverLimits;
use crate::hardware::Instrument;
use crate::photometry::{Filter, MoonPhase};
use crate::solver::ObservationRequest;
use clap::{Args, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

/// Parse a filter name for clap; names are case-sensitive (U vs u)
pub fn parse_filter(s: &str) -> Result<Filter, String> {
    s.trim().parse::<Filter>().map_err(|e| e.to_string())
}

/// Parse an exposure string with optional unit (e.g. "300", "300s", "1.5m", "2h")
fn parse_exposure(s: &str) -> Result<Duration, String> {
    let s = s.trim();

    let (num_str, scale) = if let Some(num) = s.strip_suffix('h') {
        (num, 3600.0)
    } else if let Some(num) = s.strip_suffix('m') {
        (num, 60.0)
    } else if let Some(num) = s.strip_suffix('s') {
        (num, 1.0)
    } else {
        // Bare numbers are seconds
        (s, 1.0)
    };

    let value: f64 = num_str
        .trim()
        .parse()
        .map_err(|_| format!("Invalid exposure value: {}", num_str))?;

    if !value.is_finite() || value < 0.0 {
        return Err("Exposure cannot be negative".to_string());
    }

    Duration::try_from_secs_f64(value * scale).map_err(|e| format!("Invalid exposure: {e}"))
}

/// Exposure time argument accepting seconds, minutes or hours
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExposureArg(pub Duration);

impl std::str::FromStr for ExposureArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_exposure(s).map(ExposureArg)
    }
}

impl std::fmt::Display for ExposureArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let seconds = self.0.as_secs_f64();
        if seconds.fract() == 0.0 {
            write!(f, "{}s", seconds as u64)
        } else {
            write!(f, "{:.3}s", seconds)
        }
    }
}

/// Telescope/instrument choices for the command line
#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
pub enum InstrumentModel {
    /// 0.4m telescope with SBIG camera (id 0)
    Sbig,
    /// 1.0m telescope with Sinistro camera (id 1) - Default
    Sinistro,
    /// 0.4m/0.35m telescope with QHY camera (id 2)
    Qhy,
    /// 2.0m telescope with Spectral camera (id 3)
    Spectral,
    /// 2.0m telescope with MuSCAT3 (id 4)
    Muscat3,
}

impl InstrumentModel {
    pub fn to_instrument(self) -> Instrument {
        match self {
            InstrumentModel::Sbig => Instrument::Sbig0m4,
            InstrumentModel::Sinistro => Instrument::Sinistro1m0,
            InstrumentModel::Qhy => Instrument::Qhy0m4,
            InstrumentModel::Spectral => Instrument::Spectral2m0,
            InstrumentModel::Muscat3 => Instrument::Muscat2m0,
        }
    }
}

/// Moon phase choices for the command line
#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
pub enum MoonArg {
    New,
    Half,
    Full,
}

impl From<MoonArg> for MoonPhase {
    fn from(arg: MoonArg) -> Self {
        match arg {
            MoonArg::New => MoonPhase::New,
            MoonArg::Half => MoonPhase::Half,
            MoonArg::Full => MoonPhase::Full,
        }
    }
}

/// Observing conditions shared by the calculator binaries
#[derive(Args, Debug, Clone)]
pub struct SharedObservationArgs {
    /// Telescope/instrument combination
    #[arg(long, value_enum, default_value_t = InstrumentModel::Sinistro)]
    pub instrument: InstrumentModel,

    /// Filter name: U, B, V, R, I, u, g, r, i, Z or Y (case-sensitive)
    #[arg(long, default_value = "V", value_parser = parse_filter)]
    pub filter: Filter,

    /// Moon phase setting the sky brightness
    #[arg(long, value_enum, default_value_t = MoonArg::New)]
    pub moon: MoonArg,

    /// Airmass of the observation
    #[arg(long, default_value_t = 1.2)]
    pub airmass: f64,

    /// JSON file overriding the solver iteration limits
    #[arg(long)]
    pub limits: Option<PathBuf>,
}

impl SharedObservationArgs {
    /// Request for these conditions with no S/N, magnitude or exposure set
    pub fn request(&self) -> ObservationRequest {
        ObservationRequest::new(
            self.instrument.to_instrument(),
            self.filter,
            self.moon.into(),
            self.airmass,
        )
    }

    /// Solver limits from `--limits`, or the defaults
    pub fn load_limits(&self) -> Result<SolverLimits, Box<dyn std::error::Error>> {
        match &self.limits {
            Some(path) => SolverLimits::load_from_file(path).map_err(
                |e| -> Box<dyn std::error::Error> {
                    format!("Failed to load limits from '{}': {}", path.display(), e).into()
                },
            ),
            None => Ok(SolverLimits::default()),
        }
    }
}
