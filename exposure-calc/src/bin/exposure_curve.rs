//! Exposure and S/N curves for one instrument configuration
//!
//! Two views of the same flux model, each printed as a table and optionally
//! plotted:
//! - `exposure`: exposure needed to reach a fixed S/N over a range of source
//!   magnitudes, alongside the exact solution of the S/N equation
//! - `snr`: S/N reached by a source of fixed magnitude over a list of
//!   exposure times
//!
//! ```bash
//! cargo run --bin exposure_curve -- --instrument spectral --filter r \
//!     --output exposure_curve.svg exposure --snr 200 --bright 8 --faint 16 --step 1
//!
//! cargo run --bin exposure_curve -- --output snr_curve.svg \
//!     snr --magnitude 11.5 --exposures 1,5,10,30,60,120,180,240,300
//! ```

use clap::{Parser, Subcommand};
use exposure_calc::algo::stepped_range;
use exposure_calc::shared_args::SharedObservationArgs;
use exposure_calc::solver::{exposure_curve, snr_curve};
use exposure_calc::{ObservationRequest, SolverLimits};
use plotters::prelude::*;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "Exposure Curve",
    about = "Exposure time and S/N curves for one instrument configuration",
    long_about = None
)]
struct Cli {
    #[command(flatten)]
    observation: SharedObservationArgs,

    /// Output chart path (SVG); skipped when not given
    #[arg(long)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Exposure time needed to reach a fixed S/N across a range of magnitudes
    Exposure {
        /// Target signal-to-noise ratio
        #[arg(long, default_value_t = 200.0)]
        snr: f64,

        /// Brightest magnitude of the curve
        #[arg(long, default_value_t = 8.0)]
        bright: f64,

        /// Faintest magnitude of the curve
        #[arg(long, default_value_t = 16.0)]
        faint: f64,

        /// Magnitude step
        #[arg(long, default_value_t = 1.0)]
        step: f64,
    },

    /// S/N reached by a source of fixed magnitude across a list of exposure times
    Snr {
        /// Source magnitude
        #[arg(long, default_value_t = 11.5)]
        magnitude: f64,

        /// Exposure times in seconds, comma separated
        #[arg(
            long,
            value_delimiter = ',',
            default_values_t = [1.0, 5.0, 10.0, 30.0, 60.0, 120.0, 180.0, 240.0, 300.0]
        )]
        exposures: Vec<f64>,
    },
}

/// Axis labels and scaling for one chart
struct ChartLayout<'a> {
    title: &'a str,
    x_desc: &'a str,
    y_desc: &'a str,
    log_y: bool,
}

fn plot_series(
    series: &[(f64, f64)],
    layout: &ChartLayout,
    color: &RGBColor,
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    if series.is_empty() {
        return Err("No points to plot".into());
    }

    let (x_min, x_max) = series
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (x, _)| {
            (lo.min(*x), hi.max(*x))
        });
    let y_max = series.iter().map(|(_, y)| *y).fold(1.0, f64::max);
    let x_pad = ((x_max - x_min) * 0.05).max(0.5);
    let x_range = (x_min - x_pad)..(x_max + x_pad);

    let root = SVGBackend::new(path, (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut builder = ChartBuilder::on(&root);
    builder
        .caption(layout.title, ("sans-serif", 20))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(70);

    if layout.log_y {
        let mut chart =
            builder.build_cartesian_2d(x_range, (1.0..y_max * 2.0).log_scale())?;
        chart
            .configure_mesh()
            .x_desc(layout.x_desc)
            .y_desc(layout.y_desc)
            .draw()?;
        chart.draw_series(LineSeries::new(series.iter().copied(), color))?;
        chart.draw_series(
            series
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 4, color.filled())),
        )?;
    } else {
        let mut chart = builder.build_cartesian_2d(x_range, 0.0..y_max * 1.1)?;
        chart
            .configure_mesh()
            .x_desc(layout.x_desc)
            .y_desc(layout.y_desc)
            .draw()?;
        chart.draw_series(LineSeries::new(series.iter().copied(), color))?;
        chart.draw_series(
            series
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 4, color.filled())),
        )?;
    }

    root.present()?;
    Ok(())
}

fn run_exposure(
    template: &ObservationRequest,
    limits: &SolverLimits,
    target_snr: f64,
    magnitudes: &[f64],
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let points = exposure_curve(template, target_snr, magnitudes, limits)?;

    println!(
        "Exposure curve: {} / {} / {} moon / airmass {} / S/N {}",
        template.instrument, template.filter, template.moon_phase, template.airmass, target_snr
    );
    println!("{:<12} {:<16} {:<16}", "Magnitude", "Stepped (s)", "Analytic (s)");
    println!("{:-<44}", "");
    for point in &points {
        let stepped = match point.exposure_seconds {
            Some(seconds) => seconds.to_string(),
            None => format!("> {}", limits.max_exposure_seconds),
        };
        println!(
            "{:<12.2} {:<16} {:<16.2}",
            point.magnitude, stepped, point.analytic_seconds
        );
    }

    if let Some(path) = output {
        let series: Vec<(f64, f64)> = points
            .iter()
            .filter_map(|p| p.exposure_seconds.map(|s| (p.magnitude, s as f64)))
            .collect();
        if series.is_empty() {
            return Err("No point reached the target S/N within the exposure limit".into());
        }
        let title = format!(
            "{} {} - exposure for S/N {}",
            template.instrument, template.filter, target_snr
        );
        let layout = ChartLayout {
            title: &title,
            x_desc: "Magnitude",
            y_desc: "Exposure time (s)",
            log_y: true,
        };
        plot_series(&series, &layout, &BLUE, path)?;
        println!();
        println!("Chart written to {}", path.display());
    }

    Ok(())
}

fn run_snr(
    template: &ObservationRequest,
    limits: &SolverLimits,
    magnitude: f64,
    exposures: &[f64],
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let points = snr_curve(template, magnitude, exposures, limits)?;
    let saturation_limit = template.instrument.profile().saturation_limit_e;

    println!(
        "S/N curve: {} / {} / {} moon / airmass {} / magnitude {}",
        template.instrument, template.filter, template.moon_phase, template.airmass, magnitude
    );
    println!("{:<16} {:<12} {:<12}", "Exposure (s)", "S/N", "Peak");
    println!("{:-<40}", "");
    for point in &points {
        let flag = if point.peak_dn > saturation_limit {
            "  saturated"
        } else {
            ""
        };
        println!(
            "{:<16} {:<12.1} {:<12.1}{}",
            point.exposure_seconds, point.signal_to_noise, point.peak_dn, flag
        );
    }

    if let Some(path) = output {
        let series: Vec<(f64, f64)> = points
            .iter()
            .map(|p| (p.exposure_seconds, p.signal_to_noise))
            .collect();
        let title = format!(
            "{} {} - S/N at magnitude {}",
            template.instrument, template.filter, magnitude
        );
        let layout = ChartLayout {
            title: &title,
            x_desc: "Exposure time (s)",
            y_desc: "S/N",
            log_y: false,
        };
        plot_series(&series, &layout, &RED, path)?;
        println!();
        println!("Chart written to {}", path.display());
    }

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let template = cli.observation.request();
    let limits = cli.observation.load_limits()?;
    let output = cli.output.as_deref();

    match &cli.command {
        Commands::Exposure {
            snr,
            bright,
            faint,
            step,
        } => {
            let magnitudes = stepped_range(*bright, *faint, *step)?;
            run_exposure(&template, &limits, *snr, &magnitudes, output)
        }
        Commands::Snr {
            magnitude,
            exposures,
        } => run_snr(&template, &limits, *magnitude, exposures, output),
    }
}
