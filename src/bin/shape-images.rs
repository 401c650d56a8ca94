//! Envelope shape, macro distortion and midpoint preview sheets

use clap::Parser;
use std::path::PathBuf;
use synthgen::cli;
use synthgen::raster::shapes::write_all;

#[derive(Debug, Parser)]
#[command(version, about = "Render the shape preview sprite sheets")]
struct Args {
    /// Directory to write the PNG sheets into
    out_dir: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    synthgen::logging::init();
    let args: Args = cli::parse_args();

    for path in write_all(&args.out_dir)? {
        println!("{}", path.display());
    }
    Ok(())
}
