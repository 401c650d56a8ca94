use clap::Parser;
use synthgen::cli;
use synthgen::codegen::colors::{render, CONTROLLER_COLORS};

#[derive(Debug, Parser)]
#[command(version, about = "Print the GUI's controller color constants")]
struct Args {}

fn main() {
    synthgen::logging::init();
    let _: Args = cli::parse_args();
    print!("{}", render(&CONTROLLER_COLORS));
}
