//! `fio` Binary Entry Point
//!
//! Parses arguments, installs logging, runs one command and shuts the
//! collector runtime down so pending finalizers close their files.

use clap::Parser;
use frameworks_file_io_cli::{init_logging, run, FioArgs};
use infrastructure_gc_hooks::gc_runtime;
use std::io;
use std::process;
use tracing::debug;

fn main() {
    let args = FioArgs::parse();
    init_logging(args.verbose);

    let result = {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        run(&args.command, &mut out)
    };

    let finalized = gc_runtime().shutdown();
    debug!(finalized, "collector runtime shut down");

    if let Err(e) = result {
        eprintln!("fio: {}", e);
        process::exit(1);
    }
}
