//! Command-Line Argument Parsing Module
//!
//! Uses clap for type-safe argument parsing.

use clap::{Parser, Subcommand};

/// `fio` command-line arguments
#[derive(Parser, Debug)]
#[command(name = "fio")]
#[command(about = "Blocking file I/O through the managed-runtime file core")]
pub struct FioArgs {
    /// Log every open, close and retried transfer (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print a file's contents
    Cat {
        /// File to read
        path: String,

        /// Decode as text, replacing invalid UTF-8
        #[arg(long)]
        text: bool,
    },

    /// Copy one file to another
    Copy {
        /// Source file
        src: String,

        /// Destination file
        dst: String,

        /// Stream in chunks of this many bytes instead of one whole-file read
        #[arg(long, value_parser = clap::value_parser!(i32).range(1..))]
        chunk: Option<i32>,

        /// Append to the destination instead of truncating it
        #[arg(long)]
        append: bool,
    },

    /// Write text to standard output through a stdio handle
    Echo {
        /// Text to write
        text: String,
    },

    /// Show the platform I/O profile this build uses
    Profile,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_copy_with_chunk() {
        let args = FioArgs::try_parse_from(["fio", "copy", "a", "b", "--chunk", "512"]).unwrap();
        assert_eq!(
            args.command,
            Command::Copy {
                src: "a".into(),
                dst: "b".into(),
                chunk: Some(512),
                append: false,
            }
        );
        assert!(!args.verbose);
    }

    #[test]
    fn test_chunk_must_be_positive() {
        assert!(FioArgs::try_parse_from(["fio", "copy", "a", "b", "--chunk", "0"]).is_err());
    }

    #[test]
    fn test_verbose_is_global() {
        let args = FioArgs::try_parse_from(["fio", "cat", "x", "--verbose"]).unwrap();
        assert!(args.verbose);
    }
}
