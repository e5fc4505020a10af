//! Command Execution
//!
//! Runs one parsed [`Command`] against the file facades. Output produced for
//! the user goes to the writer passed in; the `echo` command writes through a
//! standard-output file handle instead.

use crate::args::Command;
use adapters_file_io::ACTIVE_PROFILE;
use api_facades::{
    file_close, file_contents_bytes, file_contents_string, file_flush, file_open, file_read, file_stdout,
    file_write,
};
use entities_file_io::{FileError, ManagedBytes, ManagedString};
use std::io::Write;
use thiserror::Error;
use tracing::debug;

/// Failure of a `fio` command
#[derive(Debug, Error)]
pub enum CliError {
    /// File operation failed
    #[error("{0}")]
    File(#[from] FileError),
    /// Writing to the output stream failed
    #[error("writing output: {0}")]
    Output(#[from] std::io::Error),
    /// Data exceeds what a single transfer can address
    #[error("{0}: file too large for a single transfer")]
    TooLarge(String),
}

/// Run `command`, writing user-facing output to `out`
pub fn run(command: &Command, out: &mut dyn Write) -> Result<(), CliError> {
    match command {
        Command::Cat { path, text } => cat(path, *text, out),
        Command::Copy {
            src,
            dst,
            chunk,
            append,
        } => {
            let copied = match chunk {
                Some(chunk) => copy_streaming(src, dst, *chunk, *append)?,
                None => copy_whole(src, dst, *append)?,
            };
            writeln!(out, "copied {} bytes", copied)?;
            Ok(())
        }
        Command::Echo { text } => echo(text),
        Command::Profile => {
            writeln!(out, "profile: {}", ACTIVE_PROFILE)?;
            writeln!(out, "stream queries: {}", yes_no(ACTIVE_PROFILE.has_stream_queries()))?;
            writeln!(out, "standard streams: {}", yes_no(ACTIVE_PROFILE.has_stdio()))?;
            Ok(())
        }
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

fn cat(path: &str, text: bool, out: &mut dyn Write) -> Result<(), CliError> {
    let name = ManagedString::new(path);
    if text {
        let contents = file_contents_string(&name)?;
        out.write_all(contents.as_str().as_bytes())?;
    } else {
        let contents = file_contents_bytes(&name)?;
        out.write_all(contents.as_slice())?;
    }
    out.flush()?;
    Ok(())
}

fn destination_mode(append: bool) -> ManagedString {
    ManagedString::new(if append { "ab" } else { "wb" })
}

fn copy_whole(src: &str, dst: &str, append: bool) -> Result<usize, CliError> {
    let contents = file_contents_bytes(&ManagedString::new(src))?;
    let len = i32::try_from(contents.len()).map_err(|_| CliError::TooLarge(src.to_string()))?;

    let target = file_open(&ManagedString::new(dst), &destination_mode(append))?;
    let written = file_write(&target, &contents, 0, len)?;
    file_flush(&target)?;
    file_close(&target);
    Ok(written)
}

fn copy_streaming(src: &str, dst: &str, chunk: i32, append: bool) -> Result<usize, CliError> {
    let source = file_open(&ManagedString::new(src), &ManagedString::new("rb"))?;
    let target = file_open(&ManagedString::new(dst), &destination_mode(append))?;
    let mut buf = ManagedBytes::zeroed(chunk as usize);
    let mut total = 0;

    loop {
        let n = file_read(&source, &mut buf, 0, chunk)?;
        if n == 0 {
            break;
        }
        // n <= chunk, so it fits
        total += file_write(&target, &buf, 0, n as i32)?;
        debug!(n, total, "copied chunk");
    }

    file_flush(&target)?;
    file_close(&source);
    file_close(&target);
    Ok(total)
}

fn echo(text: &str) -> Result<(), CliError> {
    let out = file_stdout()?;
    let mut line = text.as_bytes().to_vec();
    line.push(b'\n');
    let len = i32::try_from(line.len()).map_err(|_| CliError::TooLarge("text".to_string()))?;
    file_write(&out, &ManagedBytes::from_vec(line), 0, len)?;
    file_flush(&out)?;
    Ok(())
}
