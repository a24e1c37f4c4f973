//! plynt's binary entry point.
//! Parses the command line, sets up logging and prints the command output.

use plynt::{
    cli::{execute, get_args},
    error::default_error_handler,
    logger::init_logger,
};

/// Main application entry point.
fn main() {
    let args = get_args();

    init_logger(args.verbose);

    match execute(&args.command) {
        Ok(output) => println!("{output}"),
        Err(err) => default_error_handler(err),
    }
}
