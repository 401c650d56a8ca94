//! Cut the tab backgrounds out of a GUI mockup screenshot

use clap::Parser;
use std::path::PathBuf;
use synthgen::cli;
use synthgen::raster::tabs::write_tabs;

#[derive(Debug, Parser)]
#[command(version, about = "Crop tab backgrounds from a full GUI mockup")]
struct Args {
    /// Screenshot of the mockup with every tab stacked vertically
    mockup: PathBuf,
    /// Directory to write the PNG and BMP tab images into
    out_dir: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    synthgen::logging::init();
    let args: Args = cli::parse_args();

    let mockup = image::open(&args.mockup)?.to_rgb8();
    for path in write_tabs(&mockup, &args.out_dir)? {
        println!("{}", path.display());
    }
    Ok(())
}
