//! Knob sprite sheet from a 5x resolution knob background

use clap::Parser;
use std::path::PathBuf;
use synthgen::cli;
use synthgen::raster::knob::{knob_states, DEFAULT_STAGES};
use tracing::info;

#[derive(Debug, Parser)]
#[command(version, about = "Render every knob position into a horizontal sprite sheet")]
struct Args {
    /// Knob background image, 5 times the final size
    background: PathBuf,
    /// Sprite sheet to write
    output: PathBuf,
    /// Number of knob positions
    #[arg(long, default_value_t = DEFAULT_STAGES)]
    stages: usize,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    synthgen::logging::init();
    let args: Args = cli::parse_args();
    if args.stages < 2 {
        cli::exit_invalid(format!("Need at least 2 stages, got: {}", args.stages));
    }

    let background = image::open(&args.background)?.to_rgba8();
    let sheet = knob_states(&background, args.stages)?;
    sheet.save(&args.output)?;
    info!(output = ?args.output, "wrote knob states");
    Ok(())
}
