//! Print the delay feedback curve's coefficients and plot the curve

use clap::Parser;
use std::path::PathBuf;
use synthgen::cli;
use synthgen::plot::{LinePlot, Series};
use synthgen::shaper::sample_range;
use synthgen::spline::{check_delay_feedback, CurveError, DelayFeedbackClosedForm, PresetError};

const SAMPLES: usize = 20000;
const WIDTH: f64 = 5.0;

#[derive(Debug, Parser)]
#[command(version, about = "Solve, check and plot the delay feedback saturation curve")]
struct Args {
    /// Slope of the curve at 0, between 0 and 1
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    beta: f64,
    /// SVG file to write
    #[arg(short, long, default_value = "spline.svg")]
    output: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    synthgen::logging::init();
    let args: Args = cli::parse_args();

    let curve = match check_delay_feedback(args.beta) {
        Ok(curve) => curve,
        Err(PresetError::Curve(e @ CurveError::InvalidParameter(_))) => cli::exit_invalid(e),
        Err(e) => return Err(e.into()),
    };
    let manual = DelayFeedbackClosedForm::new(args.beta);

    println!();
    println!("alpha = {}", manual.alpha);
    println!("beta = {}", manual.beta);
    println!();
    println!("A = {}", manual.a);
    println!("B = {}", manual.b);
    println!("C = {}", manual.c);
    println!("cf = {}", manual.cf);
    println!();
    println!("cg = {}", manual.cg);
    println!();

    let xs = sample_range(-WIDTH, WIDTH, SAMPLES);
    let column = |f: &dyn Fn(f64) -> f64| -> Vec<f64> { xs.iter().map(|&x| f(x)).collect() };

    let mut plot = LinePlot::new(format!("delay feedback curve, beta={}", args.beta))
        .series(Series::from_columns("0", &xs, &column(&|_| 0.0)))
        .series(Series::from_columns("x", &xs, &column(&|x| x)))
        .series(Series::from_columns("f(x)", &xs, &column(&|x| curve.value(x))))
        .series(Series::from_columns("F(x)", &xs, &column(&|x| curve.antiderivative(x))));
    for n in [5, 10, 25] {
        let ys = column(&|x| curve.iterate(x, n));
        plot = plot.series(Series::from_columns(format!("f^{}(x)", n), &xs, &ys));
    }
    plot.write_svg(&args.output)?;
    Ok(())
}
