//! Argument handling shared by the binaries
//!
//! Exit codes: 0 for success and `--help`/`--version`, 1 for a missing
//! argument or a failed run, 2 for an invalid argument value.

use clap::error::ErrorKind;
use clap::Parser;
use std::fmt::Display;
use std::process;

pub const EXIT_USAGE: i32 = 1;
pub const EXIT_INVALID: i32 = 2;

/// Exit code for a clap parse outcome
pub fn exit_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        ErrorKind::MissingRequiredArgument
        | ErrorKind::MissingSubcommand
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => EXIT_USAGE,
        _ => EXIT_INVALID,
    }
}

/// Parse the process arguments, exiting on failure
///
/// The usage (or help) text is printed by clap, to stderr for errors.
pub fn parse_args<T: Parser>() -> T {
    match T::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            process::exit(exit_code(e.kind()));
        }
    }
}

/// Report an argument that parsed but is out of range
pub fn exit_invalid(message: impl Display) -> ! {
    eprintln!("{message}");
    process::exit(EXIT_INVALID);
}
