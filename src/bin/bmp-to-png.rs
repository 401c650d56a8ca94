use clap::Parser;
use std::path::PathBuf;
use synthgen::cli;
use synthgen::raster::convert;

#[derive(Debug, Parser)]
#[command(version, about = "Convert an image, the output format following the file extension")]
struct Args {
    source: PathBuf,
    destination: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    synthgen::logging::init();
    let args: Args = cli::parse_args();
    convert(&args.source, &args.destination)?;
    Ok(())
}
