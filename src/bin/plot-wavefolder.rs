//! Plot the wavefolder curve against its antiderivative approximation

use clap::Parser;
use std::path::PathBuf;
use synthgen::cli;
use synthgen::plot::{LinePlot, Series};
use synthgen::shaper::{antiderivative_approximation, sample_range, TransferFunction, Wavefolder};

const SAMPLES: usize = 20000;

#[derive(Debug, Parser)]
#[command(version, about = "Plot the wavefolder and its antiderivative anti-aliased output")]
struct Args {
    /// Input range to drive the folder over, in (0, 5.5]
    #[arg(long, default_value_t = 5.0, allow_negative_numbers = true)]
    folding: f64,
    /// SVG file to write
    #[arg(short, long, default_value = "wavefolder.svg")]
    output: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    synthgen::logging::init();
    let args: Args = cli::parse_args();

    let folding = Wavefolder::check_folding(args.folding).unwrap_or_else(|e| cli::exit_invalid(e));
    let folder = Wavefolder::new();
    let xs = sample_range(-folding, folding, SAMPLES);
    let fs: Vec<f64> = xs.iter().map(|&x| folder.value(x)).collect();
    let approximations = antiderivative_approximation(&folder, &xs);

    LinePlot::new(format!("wavefolder, folding={}", folding))
        .series(Series::from_columns("f(x)", &xs, &fs))
        .series(Series::from_columns("ADAA", &xs, &approximations))
        .write_svg(&args.output)?;
    Ok(())
}
