//! Plot the tanh distortion curve against its antiderivative approximation

use clap::Parser;
use std::path::PathBuf;
use synthgen::cli;
use synthgen::plot::{LinePlot, Series};
use synthgen::shaper::{antiderivative_approximation, sample_range, TanhShaper, TransferFunction};

const SAMPLES: usize = 20000;
const MAX_INPUT: f64 = 3.0;

#[derive(Debug, Parser)]
#[command(version, about = "Plot tanh distortion and its antiderivative anti-aliased output")]
struct Args {
    /// Steepness of the curve, greater than 0
    #[arg(allow_negative_numbers = true)]
    steepness: f64,
    /// SVG file to write
    #[arg(short, long, default_value = "distortion.svg")]
    output: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    synthgen::logging::init();
    let args: Args = cli::parse_args();

    let shaper = TanhShaper::new(args.steepness).unwrap_or_else(|e| cli::exit_invalid(e));
    let xs = sample_range(-MAX_INPUT, MAX_INPUT, SAMPLES);
    let fs: Vec<f64> = xs.iter().map(|&x| shaper.value(x)).collect();
    let approximations = antiderivative_approximation(&shaper, &xs);

    LinePlot::new(format!("tanh distortion, steepness={}", shaper.steepness()))
        .series(Series::from_columns("f(x)", &xs, &fs))
        .series(Series::from_columns("ADAA", &xs, &approximations))
        .write_svg(&args.output)?;
    Ok(())
}
