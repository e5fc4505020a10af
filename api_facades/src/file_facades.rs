//! File Facades
//!
//! One function per managed-code file primitive. Handles are
//! [`FileHandle`]s over [`PlatformBackend`]; seek origins arrive as raw
//! integers (0 = set, 1 = current, 2 = end).

use adapters_file_io::PlatformBackend;
use entities_file_io::{ops, FileError, FileErrorKind, ManagedBytes, ManagedString, SeekMode};
use infrastructure_gc_hooks::{gc_runtime, Collector};
use std::sync::Arc;
use usecases_file_io::{read_contents_bytes, read_contents_string, FileHandle};

/// File handle type seen by managed code
pub type File = FileHandle<PlatformBackend>;

fn collector() -> Arc<dyn Collector> {
    gc_runtime()
}

/// Open `name` with a C-style mode string
pub fn file_open(name: &ManagedString, mode: &ManagedString) -> Result<File, FileError> {
    File::open(collector(), name, mode.as_str())
}

/// Close a handle; never fails
pub fn file_close(handle: &File) {
    handle.close();
}

/// Display name of an open handle
pub fn file_name(handle: &File) -> Result<ManagedString, FileError> {
    handle.name()
}

/// Write `len` bytes of `buf` from `offset`
pub fn file_write(handle: &File, buf: &ManagedBytes, offset: i32, len: i32) -> Result<usize, FileError> {
    handle.write(buf, offset, len)
}

/// Read up to `len` bytes into `buf` at `offset`
pub fn file_read(handle: &File, buf: &mut ManagedBytes, offset: i32, len: i32) -> Result<usize, FileError> {
    handle.read(buf, offset, len)
}

/// Write one byte; values outside 0..=255 are ignored
pub fn file_write_char(handle: &File, value: i32) -> Result<(), FileError> {
    handle.write_char(value)
}

/// Read one byte
pub fn file_read_char(handle: &File) -> Result<i32, FileError> {
    handle.read_char().map(i32::from)
}

/// Reposition the file; `kind` is the raw seek origin
pub fn file_seek(handle: &File, pos: i64, kind: i32) -> Result<(), FileError> {
    match SeekMode::from_raw(kind) {
        Some(mode) => handle.seek(pos, mode),
        None => {
            let name = handle.name().map_err(|_| FileError::bad_handle(ops::SEEK))?;
            Err(FileError::new(FileErrorKind::Seek, ops::SEEK, name))
        }
    }
}

/// Current position
pub fn file_tell(handle: &File) -> Result<i64, FileError> {
    handle.tell()
}

/// Whether the end-of-file condition is set
pub fn file_eof(handle: &File) -> Result<bool, FileError> {
    handle.eof()
}

/// Push buffered output to the platform
pub fn file_flush(handle: &File) -> Result<(), FileError> {
    handle.flush()
}

/// Whole file as text
pub fn file_contents_string(name: &ManagedString) -> Result<ManagedString, FileError> {
    read_contents_string::<PlatformBackend>(collector().as_ref(), name)
}

/// Whole file as bytes
pub fn file_contents_bytes(name: &ManagedString) -> Result<ManagedBytes, FileError> {
    read_contents_bytes::<PlatformBackend>(collector().as_ref(), name)
}

/// Handle on standard input; not owned, so finalization leaves it open
pub fn file_stdin() -> Result<File, FileError> {
    File::stdin(collector())
}

/// Handle on standard output
pub fn file_stdout() -> Result<File, FileError> {
    File::stdout(collector())
}

/// Handle on standard error
pub fn file_stderr() -> Result<File, FileError> {
    File::stderr(collector())
}
