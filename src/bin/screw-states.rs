use clap::Parser;
use std::path::PathBuf;
use synthgen::cli;
use synthgen::raster::screw::{screw_states, DEFAULT_STAGES};
use tracing::info;

#[derive(Debug, Parser)]
#[command(version, about = "Render a screw head sprite sheet")]
struct Args {
    /// Sprite sheet to write
    output: PathBuf,
    /// Number of slot positions
    #[arg(long, default_value_t = DEFAULT_STAGES)]
    stages: usize,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    synthgen::logging::init();
    let args: Args = cli::parse_args();
    if args.stages < 1 {
        cli::exit_invalid("Need at least 1 stage");
    }

    screw_states(args.stages)?.save(&args.output)?;
    info!(output = ?args.output, stages = args.stages, "wrote screw states");
    Ok(())
}
