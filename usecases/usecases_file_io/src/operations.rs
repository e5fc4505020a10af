//! File Operations
//!
//! Transfers, positioning and flushing on an open [`FileHandle`]. Each call
//! checks for a closed handle first, then validates buffer bounds, and only
//! then enters a GC-free zone around the platform call.

use crate::handle::FileHandle;
use adapters_file_io::FileBackend;
use entities_file_io::{ops, FileError, ManagedBytes, SeekMode};
use infrastructure_gc_hooks::blocking;
use std::ops::Range;

/// Byte range `offset..offset + len` if it lies inside a buffer of
/// `buffer_len` bytes
pub fn window(buffer_len: usize, offset: i32, len: i32) -> Option<Range<usize>> {
    let start = usize::try_from(offset).ok()?;
    let len = usize::try_from(len).ok()?;
    let end = start.checked_add(len)?;
    if end > buffer_len {
        return None;
    }
    Some(start..end)
}

impl<B: FileBackend> FileHandle<B> {
    /// Read up to `len` bytes into `buf` at `offset`
    ///
    /// Returns 0 without touching the file when the range falls outside the
    /// buffer or is empty, and 0 at end of file.
    pub fn read(&self, buf: &mut ManagedBytes, offset: i32, len: i32) -> Result<usize, FileError> {
        self.with_descriptor(ops::READ, |fd, collector| {
            let range = match window(buf.len(), offset, len) {
                Some(range) if !range.is_empty() => range,
                _ => return Ok(0),
            };
            let target = &mut buf.as_mut_slice()[range];
            blocking(collector, || B::read(fd, target))
        })
    }

    /// Write `len` bytes of `buf` starting at `offset`
    ///
    /// Returns 0 without touching the file when the range falls outside the
    /// buffer.
    pub fn write(&self, buf: &ManagedBytes, offset: i32, len: i32) -> Result<usize, FileError> {
        self.with_descriptor(ops::WRITE, |fd, collector| {
            let range = match window(buf.len(), offset, len) {
                Some(range) if !range.is_empty() => range,
                _ => return Ok(0),
            };
            let source = &buf.as_slice()[range];
            blocking(collector, || B::write(fd, source))
        })
    }

    /// Read one byte; end of file is an error
    pub fn read_char(&self) -> Result<u8, FileError> {
        self.with_descriptor(ops::READ_CHAR, |fd, collector| {
            blocking(collector, || B::read_char(fd))
        })
    }

    /// Write one byte; values outside 0..=255 are ignored
    pub fn write_char(&self, value: i32) -> Result<(), FileError> {
        self.with_descriptor(ops::WRITE_CHAR, |fd, collector| {
            let Ok(byte) = u8::try_from(value) else {
                return Ok(());
            };
            blocking(collector, || B::write_char(fd, byte))
        })
    }

    /// Reposition the file
    pub fn seek(&self, pos: i64, mode: SeekMode) -> Result<(), FileError> {
        self.with_descriptor(ops::SEEK, |fd, collector| {
            blocking(collector, || B::seek(fd, pos, mode))
        })
    }

    /// Current position
    pub fn tell(&self) -> Result<i64, FileError> {
        self.with_descriptor(ops::TELL, |fd, collector| blocking(collector, || B::tell(fd)))
    }

    /// Whether the end-of-file condition is set
    pub fn eof(&self) -> Result<bool, FileError> {
        self.with_descriptor(ops::EOF, |fd, _| Ok(B::eof(fd)))
    }

    /// Push buffered output to the platform
    pub fn flush(&self) -> Result<(), FileError> {
        self.with_descriptor(ops::FLUSH, |fd, collector| blocking(collector, || B::flush(fd)))
    }
}
