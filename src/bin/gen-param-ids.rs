//! Print the `ParamId` enum body and accessor cases

use clap::Parser;
use std::path::PathBuf;
use synthgen::cli;
use synthgen::codegen::param_ids::{render, ParamTable};

#[derive(Debug, Parser)]
#[command(version, about = "Generate parameter ids and accessor switch cases")]
struct Args {
    /// JSON parameter table to use instead of the built-in one
    #[arg(long)]
    table: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    synthgen::logging::init();
    let args: Args = cli::parse_args();

    let table = ParamTable::load_or_built_in(args.table.as_deref())?;
    print!("{}", render(&table)?);
    Ok(())
}
