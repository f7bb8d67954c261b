//! Exposure time calculator
//!
//! Supply two of S/N, magnitude and exposure time and the third is solved for.
//!
//! # Usage
//!
//! ```bash
//! # Exposure time to reach S/N 20 on an 18th magnitude star
//! cargo run --bin etc -- --snr 20 --magnitude 18 --instrument sinistro --filter V
//!
//! # Limiting magnitude at S/N 20 in 300 s under a full moon
//! cargo run --bin etc -- --snr 20 --exposure 300s --moon full
//!
//! # S/N for a 2 minute exposure, as JSON
//! cargo run --bin etc -- --magnitude 16.5 --exposure 2m --filter r --json
//!
//! # Evaluate a saved form submission
//! cargo run --bin etc -- --form request.json
//! ```

use clap::Parser;
use exposure_calc::form::{saturation_warning, FormInput};
use exposure_calc::shared_args::{ExposureArg, SharedObservationArgs};
use exposure_calc::{solve_with_limits, ObservationRequest, SolveResult};
use log::info;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Exposure Time Calculator",
    about = "Solves for S/N, limiting magnitude or exposure time of an imaging observation",
    long_about = None
)]
struct Args {
    #[command(flatten)]
    observation: SharedObservationArgs,

    /// Target signal-to-noise ratio
    #[arg(long)]
    snr: Option<f64>,

    /// Source magnitude
    #[arg(long)]
    magnitude: Option<f64>,

    /// Exposure time (e.g., "300", "300s", "1.5m")
    #[arg(long)]
    exposure: Option<ExposureArg>,

    /// JSON file holding form fields (S_N, mag, etime, itel, filter, moonp, air);
    /// replaces the observation flags above
    #[arg(long)]
    form: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

fn build_request(args: &Args) -> Result<ObservationRequest, Box<dyn std::error::Error>> {
    if let Some(path) = &args.form {
        info!("Reading form from {}", path.display());
        let contents = std::fs::read_to_string(path)?;
        let form: FormInput = serde_json::from_str(&contents)?;
        return Ok(form.parse()?);
    }

    let mut request = args.observation.request();
    request.target_snr = args.snr;
    request.magnitude = args.magnitude;
    request.exposure = args.exposure.map(|e| e.0);
    Ok(request)
}

fn print_table(result: &SolveResult) {
    for (label, value) in result.fields() {
        println!("{:<28} {}", label, value);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let request = build_request(&args)?;
    let limits = args.observation.load_limits()?;
    let result = solve_with_limits(&request, &limits)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("Exposure Time Calculator");
        println!("========================");
        println!(
            "{} / {} / {} moon / airmass {}",
            request.instrument, request.filter, request.moon_phase, request.airmass
        );
        println!();
        print_table(&result);
    }

    if let Some(warning) = saturation_warning(&result) {
        eprintln!();
        eprintln!("WARNING: {warning}");
    }

    Ok(())
}
