//! Backend Trait
//!
//! The blocking primitives one platform I/O model provides. Implementations
//! must not touch managed memory or the collector: they run inside a
//! GC-free zone entered by the caller.

use entities_file_io::{IoFailure, Profile, SeekMode};

/// Blocking platform primitives for one I/O model
///
/// All operations are associated functions; the backend type itself carries
/// no state. Per-file state lives in [`FileBackend::Descriptor`].
pub trait FileBackend: Send + Sync + 'static {
    /// Open platform file
    type Descriptor: Send + 'static;

    /// I/O model implemented
    const PROFILE: Profile;

    /// Open `name` with a C-style mode string (`"rb"`, `"w+"`, ...)
    fn open(name: &str, mode: &str) -> Result<Self::Descriptor, IoFailure>;

    /// Read up to `buf.len()` bytes; `Ok(0)` at end of stream
    fn read(fd: &mut Self::Descriptor, buf: &mut [u8]) -> Result<usize, IoFailure>;

    /// Write all of `buf`
    fn write(fd: &mut Self::Descriptor, buf: &[u8]) -> Result<usize, IoFailure>;

    /// Read one byte; end of stream is a failure
    fn read_char(fd: &mut Self::Descriptor) -> Result<u8, IoFailure>;

    /// Write one byte
    fn write_char(fd: &mut Self::Descriptor, byte: u8) -> Result<(), IoFailure>;

    /// Reposition the file
    fn seek(fd: &mut Self::Descriptor, pos: i64, mode: SeekMode) -> Result<(), IoFailure>;

    /// Current position
    fn tell(fd: &mut Self::Descriptor) -> Result<i64, IoFailure>;

    /// Whether the end-of-file condition is set
    fn eof(fd: &mut Self::Descriptor) -> bool;

    /// Push buffered output to the platform
    fn flush(fd: &mut Self::Descriptor) -> Result<(), IoFailure>;

    /// Release the descriptor; a failing close is logged and ignored
    fn close(fd: Self::Descriptor);

    /// Open `name` for a whole-file read and report its length
    ///
    /// The descriptor is positioned at the start of the file.
    fn open_contents(name: &str) -> Result<(Self::Descriptor, usize), IoFailure>;

    /// Fill `buf` completely from a descriptor returned by
    /// [`FileBackend::open_contents`]
    fn read_contents(fd: &mut Self::Descriptor, buf: &mut [u8]) -> Result<(), IoFailure>;

    /// Process standard input
    fn stdin() -> Result<Self::Descriptor, IoFailure>;

    /// Process standard output
    fn stdout() -> Result<Self::Descriptor, IoFailure>;

    /// Process standard error
    fn stderr() -> Result<Self::Descriptor, IoFailure>;
}
