use clap::Parser;
use synthgen::cli;
use synthgen::codegen::midi_notes::render;

#[derive(Debug, Parser)]
#[command(version, about = "Print MIDI note number constants")]
struct Args {}

fn main() {
    synthgen::logging::init();
    let _: Args = cli::parse_args();
    print!("{}", render());
}
