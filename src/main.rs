//! Solve the plugin's waveshaper curves and print them as C++ constants

use clap::Parser;
use synthgen::cli;
use synthgen::spline::export::cpp_constants;
use synthgen::spline::{check_delay_feedback, soft_knee, CurveError, PresetError, Smoothness, SoftKnee};
use tracing::info;

#[derive(Debug, Parser)]
#[command(version, about = "Print C++ coefficient tables for the solved transfer curves")]
struct Args {
    /// Slope of the delay feedback curve at 0, between 0 and 1
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    beta: f64,
    /// End of the soft knee curve's linear region
    #[arg(long, default_value_t = 0.5, allow_negative_numbers = true)]
    gamma: f64,
    /// Soft knee curve value at 1.0 (default: halfway between gamma and 1)
    #[arg(long, allow_negative_numbers = true)]
    knee: Option<f64>,
    /// Make the soft knee curvature continuous too, using a quintic knee
    #[arg(long)]
    quintic: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    synthgen::logging::init();
    let args: Args = cli::parse_args();

    let delay_feedback = match check_delay_feedback(args.beta) {
        Ok(curve) => curve,
        Err(PresetError::Curve(e @ CurveError::InvalidParameter(_))) => cli::exit_invalid(e),
        Err(e) => return Err(e.into()),
    };

    let mut knee = SoftKnee::new(args.gamma);
    if let Some(level) = args.knee {
        knee.knee_level = level;
    }
    if args.quintic {
        knee.smoothness = Smoothness::C2;
    }
    let knee_curve = match soft_knee(knee) {
        Ok(curve) => curve,
        Err(e @ CurveError::InvalidParameter(_)) => cli::exit_invalid(e),
        Err(e) => return Err(e.into()),
    };

    println!("{}", cpp_constants("DELAY_FEEDBACK", &delay_feedback));
    println!("{}", cpp_constants("SOFT_KNEE", &knee_curve));

    info!(beta = args.beta, gamma = knee.gamma, knee_level = knee.knee_level, "printed curve constants");
    Ok(())
}
