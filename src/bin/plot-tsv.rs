//! Plot tab separated columns, the first column being x

use clap::Parser;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use synthgen::cli;
use synthgen::plot::{parse_tsv, tsv_plot};

#[derive(Debug, Parser)]
#[command(version, about = "Plot every column of a TSV file against the first one")]
struct Args {
    /// Input file, standard input if omitted
    input: Option<PathBuf>,
    /// SVG file to write
    #[arg(short, long, default_value = "plot.svg")]
    output: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    synthgen::logging::init();
    let args: Args = cli::parse_args();

    let (title, columns) = match &args.input {
        Some(path) => (path.display().to_string(), parse_tsv(BufReader::new(File::open(path)?))?),
        None => ("stdin".to_string(), parse_tsv(io::stdin().lock())?),
    };
    tsv_plot(&title, &columns)?.write_svg(&args.output)?;
    Ok(())
}
