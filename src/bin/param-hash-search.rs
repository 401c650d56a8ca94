//! Search for a parameter name hash with few collisions

use clap::Parser;
use std::path::PathBuf;
use synthgen::cli;
use synthgen::codegen::hash_search::{search, SearchSpace};
use synthgen::codegen::param_ids::ParamTable;

#[derive(Debug, Parser)]
#[command(version, about = "Brute force multiplier and shift for the parameter name hash")]
struct Args {
    /// Multipliers tried are the odd numbers from 3 up to twice this
    #[arg(long, default_value_t = 100000)]
    max_multiplier: i64,
    /// Shifts tried are 0 up to (excluding) this
    #[arg(long, default_value_t = 23)]
    max_shift: u32,
    /// Hash table sizes to try
    #[arg(long = "modulus", default_values_t = [128])]
    moduli: Vec<i64>,
    /// JSON parameter table to use instead of the built-in one
    #[arg(long)]
    table: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    synthgen::logging::init();
    let args: Args = cli::parse_args();

    let space = SearchSpace {
        max_multiplier_index: args.max_multiplier,
        max_shift: args.max_shift,
        moduli: args.moduli,
    };
    if let Err(e) = space.validate() {
        cli::exit_invalid(e);
    }

    let names = ParamTable::load_or_built_in(args.table.as_deref())?.names()?;
    search(&names, &space, |improvement| println!("{}", improvement));
    Ok(())
}
