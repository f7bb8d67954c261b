//! Zero-point calculator from a measured calibration star
//!
//! Derives the photometric zeropoint (log e⁻/s at magnitude 0) of an
//! instrument/filter pair from the background-subtracted counts of a star with
//! a known catalog magnitude, and compares it with the value in the instrument
//! catalog.
//!
//! ```bash
//! cargo run --bin zero_point_calculator -- --catalog-mag 10.72 --counts 525248 \
//!     --exposure 10s --instrument sinistro --filter V --airmass 1.3
//! ```

use clap::Parser;
use exposure_calc::photometry::{measured_zeropoint, zeropoint};
use exposure_calc::shared_args::{ExposureArg, SharedObservationArgs};

#[derive(Parser, Debug)]
#[command(
    name = "Zero-Point Calculator",
    about = "Derives a photometric zeropoint (log e⁻/s at mag 0) from a calibration star",
    long_about = None
)]
struct Args {
    #[command(flatten)]
    observation: SharedObservationArgs,

    /// Catalog magnitude of the calibration star
    #[arg(long)]
    catalog_mag: f64,

    /// Background-subtracted aperture counts in ADU
    #[arg(long)]
    counts: f64,

    /// Exposure time of the calibration frame
    #[arg(long)]
    exposure: ExposureArg,

    /// Detector gain in e⁻/ADU (defaults to the instrument's catalog gain)
    #[arg(long)]
    gain: Option<f64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let request = args.observation.request();
    let profile = request.instrument.profile();
    let gain = args.gain.unwrap_or(profile.gain_e_per_adu);
    let extinction = request.filter.band().extinction_mag_per_airmass;

    let measured = measured_zeropoint(
        args.catalog_mag,
        args.counts,
        gain,
        args.exposure.0,
        request.airmass,
        extinction,
    )?;

    println!("Zero-Point Calculator");
    println!("=====================");
    println!("Instrument: {}", request.instrument);
    println!("Filter: {}", request.filter);
    println!("Catalog magnitude: {:.3}", args.catalog_mag);
    println!("Counts: {:.1} ADU in {}", args.counts, args.exposure);
    println!("Gain: {:.2} e⁻/ADU", gain);
    println!(
        "Airmass: {:.2} (extinction {:.2} mag/airmass)",
        request.airmass, extinction
    );
    println!();
    println!("Measured zeropoint: {:.3}", measured);

    match zeropoint(request.instrument, request.filter) {
        Some(catalog) => {
            println!("Catalog zeropoint:  {:.3}", catalog);
            println!("Difference:         {:+.3} mag", measured - catalog);
        }
        None => println!(
            "Catalog zeropoint:  none ({} has no {} calibration)",
            request.instrument, request.filter
        ),
    }

    Ok(())
}
