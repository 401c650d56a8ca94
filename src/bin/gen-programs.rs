//! Bundle the preset files into the plugin's built-in program bank

use clap::Parser;
use std::fs;
use std::path::PathBuf;
use synthgen::cli;
use synthgen::codegen::programs::{generate, OUTPUT_FILE_NAME};
use tracing::info;

#[derive(Debug, Parser)]
#[command(version, about = "Generate programs.cpp from a directory of presets")]
struct Args {
    /// Directory of preset files
    presets_dir: PathBuf,
    /// C++ source directory holding the template and the bank header
    src_dir: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    synthgen::logging::init();
    let args: Args = cli::parse_args();

    let bank = generate(&args.presets_dir, &args.src_dir)?;
    let output = args.src_dir.join(OUTPUT_FILE_NAME);
    fs::write(&output, &bank.programs_cpp)?;
    info!(?output, programs = bank.programs, "wrote program bank");

    print!("{}", bank.readme);
    Ok(())
}
