//! Frameworks Layer: `fio` Command-Line Front End
//!
//! Provides a small command-line tool over the managed-code file facades,
//! used to exercise the file I/O core from a shell.
//!
//! ## Modules
//!
//! - **[`args`](args/index.html)**: clap argument definitions
//! - **[`commands`](commands/index.html)**: Command execution and the
//!   [`CliError`](commands::CliError) type
//! - **[`logging`](logging/index.html)**: `tracing-subscriber` setup
//!
//! ## See Also
//!
//! - [`api_facades`](../api_facades/index.html): The entry points every command calls

pub mod args;
pub mod commands;
pub mod logging;

pub use args::{Command, FioArgs};
pub use commands::{run, CliError};
pub use logging::init_logging;
