//! `qs` entry point.

use std::io::{self, Write};

use clap::Parser;
use quickstart_cli::{run, Args};

fn main() {
    let args = Args::parse();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let code = match run(&args, &mut out) {
        Ok(status) => status.exit_code(),
        Err(err) => {
            eprintln!("Error: {err:#}");
            1
        }
    };

    // `exit` skips destructors, so buffered output is flushed here.
    if let Err(err) = out.flush() {
        eprintln!("Error: failed to write output: {err}");
    }
    std::process::exit(code);
}
