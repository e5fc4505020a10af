//! Buffered Stream Backend
//!
//! Files are C stdio streams. The platform buffers, tracks the position and
//! keeps the end-of-file and error indicators; this backend only adds the
//! interrupted-call retry around bulk and single-byte transfers.
//!
//! Paths reach `fopen` through a [`PathEncoding`]. [`Utf8Paths`] passes the
//! name as a NUL-terminated narrow string. On Windows, `WidePaths` converts
//! name and mode to UTF-16 and opens with `_wfopen`.
//!
//! The three standard streams are opened once per process and shared by
//! every handle on them, so buffered input and output stay in order across
//! handles. Closing a standard-stream handle flushes the shared stream but
//! leaves it open for the other handles.

use crate::backend::FileBackend;
use crate::retry::{transfer, ShortTransfer, Stall};
use entities_file_io::{ops, FileErrorKind, IoFailure, Profile, SeekMode};
use lazy_static::lazy_static;
use libc::{c_int, c_long, c_void, FILE};
use parking_lot::Mutex;
use std::ffi::CString;
use std::marker::PhantomData;
use std::ptr::NonNull;
use tracing::{debug, trace};

/// An open C stdio stream
#[derive(Debug)]
pub struct Stream {
    raw: NonNull<FILE>,
    shared: bool,
}

// An owned stream is only used by the thread holding the handle lock. Shared
// standard streams rely on the stream lock stdio takes inside every call.
unsafe impl Send for Stream {}

lazy_static! {
    /// Standard streams by descriptor number, opened on first use
    static ref STANDARD_STREAMS: Mutex<[Option<Stream>; 3]> = Mutex::new([None, None, None]);
}

impl Stream {
    fn from_raw(raw: *mut FILE) -> Option<Self> {
        NonNull::new(raw).map(|raw| Self { raw, shared: false })
    }

    fn share(&self) -> Self {
        Self {
            raw: self.raw,
            shared: true,
        }
    }

    fn as_ptr(&self) -> *mut FILE {
        self.raw.as_ptr()
    }

    /// Classify a call that moved no bytes
    fn stall(&self) -> Stall {
        let stream = self.as_ptr();
        unsafe {
            if libc::ferror(stream) != 0 {
                let code = last_os_error_code();
                if code == Some(libc::EINTR) {
                    libc::clearerr(stream);
                    return Stall::Interrupted;
                }
                return Stall::Failed(code);
            }
            if libc::feof(stream) != 0 {
                return Stall::EndOfStream;
            }
        }
        Stall::Failed(last_os_error_code())
    }
}

#[cfg(unix)]
fn last_os_error_code() -> Option<i32> {
    match nix::errno::Errno::last() {
        nix::errno::Errno::UnknownErrno => None,
        errno => Some(errno as i32),
    }
}

#[cfg(not(unix))]
fn last_os_error_code() -> Option<i32> {
    std::io::Error::last_os_error()
        .raw_os_error()
        .filter(|code| *code != 0)
}

#[cfg(unix)]
fn unbuffer(stream: &Stream) {
    unsafe {
        libc::setvbuf(stream.as_ptr(), std::ptr::null_mut(), libc::_IONBF, 0);
    }
}

#[cfg(not(unix))]
fn unbuffer(_stream: &Stream) {}

fn failure(kind: FileErrorKind, operation: &'static str, stall: Stall) -> IoFailure {
    match stall {
        Stall::Failed(Some(code)) => IoFailure::with_os_error(kind, operation, code),
        _ => IoFailure::new(kind, operation),
    }
}

/// How file names and modes are handed to `fopen`
pub trait PathEncoding: Send + Sync + 'static {
    /// I/O model the encoding belongs to
    const PROFILE: Profile;

    /// Open a stream; null when the platform refused
    fn fopen(name: &str, mode: &str) -> Result<*mut FILE, IoFailure>;
}

/// Narrow paths, passed through as bytes
#[derive(Debug, Clone, Copy, Default)]
pub struct Utf8Paths;

impl PathEncoding for Utf8Paths {
    const PROFILE: Profile = Profile::Buffered;

    fn fopen(name: &str, mode: &str) -> Result<*mut FILE, IoFailure> {
        let (name, mode) = match (CString::new(name), CString::new(mode)) {
            (Ok(name), Ok(mode)) => (name, mode),
            _ => return Err(IoFailure::new(FileErrorKind::Open, ops::OPEN)),
        };
        Ok(unsafe { libc::fopen(name.as_ptr(), mode.as_ptr()) })
    }
}

/// Wide-character paths for platforms whose narrow `fopen` is not UTF-8
#[cfg(windows)]
#[derive(Debug, Clone, Copy, Default)]
pub struct WidePaths;

#[cfg(windows)]
impl WidePaths {
    fn encode(text: &str) -> Option<Vec<u16>> {
        use std::os::windows::ffi::OsStrExt;

        let mut wide: Vec<u16> = std::ffi::OsStr::new(text).encode_wide().collect();
        if wide.contains(&0) {
            return None;
        }
        wide.push(0);
        Some(wide)
    }
}

#[cfg(windows)]
impl PathEncoding for WidePaths {
    const PROFILE: Profile = Profile::WideBuffered;

    fn fopen(name: &str, mode: &str) -> Result<*mut FILE, IoFailure> {
        let (name, mode) = match (Self::encode(name), Self::encode(mode)) {
            (Some(name), Some(mode)) => (name, mode),
            _ => return Err(IoFailure::new(FileErrorKind::Open, ops::OPEN)),
        };
        Ok(unsafe { libc::wfopen(name.as_ptr(), mode.as_ptr()) })
    }
}

/// Backend over C stdio streams
#[derive(Debug, Clone, Copy, Default)]
pub struct BufferedBackend<P: PathEncoding> {
    _paths: PhantomData<P>,
}

/// The process-wide stream on standard descriptor `fd`
fn standard(fd: c_int, mode: &'static str, operation: &'static str) -> Result<Stream, IoFailure> {
    let mut streams = STANDARD_STREAMS.lock();
    let slot = streams
        .get_mut(fd as usize)
        .ok_or_else(|| IoFailure::new(FileErrorKind::Open, operation))?;
    if let Some(stream) = slot {
        return Ok(stream.share());
    }

    let mode = CString::new(mode).map_err(|_| IoFailure::new(FileErrorKind::Open, operation))?;
    let raw = unsafe { libc::fdopen(fd, mode.as_ptr()) };
    let stream = Stream::from_raw(raw)
        .ok_or_else(|| IoFailure::last_os_error(FileErrorKind::Open, operation))?
        .share();
    if fd == 2 {
        unbuffer(&stream);
    }
    debug!(fd, "standard stream opened");
    *slot = Some(stream.share());
    Ok(stream)
}

impl<P: PathEncoding> FileBackend for BufferedBackend<P> {
    type Descriptor = Stream;

    const PROFILE: Profile = P::PROFILE;

    fn open(name: &str, mode: &str) -> Result<Stream, IoFailure> {
        let raw = P::fopen(name, mode)?;
        Stream::from_raw(raw).ok_or_else(|| IoFailure::last_os_error(FileErrorKind::Open, ops::OPEN))
    }

    fn read(fd: &mut Stream, buf: &mut [u8]) -> Result<usize, IoFailure> {
        let stream = fd.as_ptr();
        let len = buf.len();
        let base = buf.as_mut_ptr();
        transfer(
            len,
            ShortTransfer::AcceptPartial,
            |done| unsafe { libc::fread(base.add(done) as *mut c_void, 1, len - done, stream) },
            || fd.stall(),
        )
        .map_err(|stall| failure(FileErrorKind::Read, ops::READ, stall))
    }

    fn write(fd: &mut Stream, buf: &[u8]) -> Result<usize, IoFailure> {
        let stream = fd.as_ptr();
        let len = buf.len();
        let base = buf.as_ptr();
        transfer(
            len,
            ShortTransfer::RequireAll,
            |done| unsafe { libc::fwrite(base.add(done) as *const c_void, 1, len - done, stream) },
            || fd.stall(),
        )
        .map_err(|stall| failure(FileErrorKind::Write, ops::WRITE, stall))
    }

    fn read_char(fd: &mut Stream) -> Result<u8, IoFailure> {
        let stream = fd.as_ptr();
        let mut byte = 0u8;
        let target = &mut byte as *mut u8;
        transfer(
            1,
            ShortTransfer::RequireAll,
            |_| unsafe { libc::fread(target as *mut c_void, 1, 1, stream) },
            || fd.stall(),
        )
        .map_err(|stall| failure(FileErrorKind::Read, ops::READ_CHAR, stall))?;
        Ok(byte)
    }

    fn write_char(fd: &mut Stream, byte: u8) -> Result<(), IoFailure> {
        let stream = fd.as_ptr();
        let source = &byte as *const u8;
        transfer(
            1,
            ShortTransfer::RequireAll,
            |_| unsafe { libc::fwrite(source as *const c_void, 1, 1, stream) },
            || fd.stall(),
        )
        .map_err(|stall| failure(FileErrorKind::Write, ops::WRITE_CHAR, stall))?;
        Ok(())
    }

    fn seek(fd: &mut Stream, pos: i64, mode: SeekMode) -> Result<(), IoFailure> {
        let offset = c_long::try_from(pos).map_err(|_| IoFailure::new(FileErrorKind::Seek, ops::SEEK))?;
        let whence = match mode {
            SeekMode::Set => libc::SEEK_SET,
            SeekMode::Cur => libc::SEEK_CUR,
            SeekMode::End => libc::SEEK_END,
        };
        if unsafe { libc::fseek(fd.as_ptr(), offset, whence) } != 0 {
            return Err(IoFailure::last_os_error(FileErrorKind::Seek, ops::SEEK));
        }
        Ok(())
    }

    fn tell(fd: &mut Stream) -> Result<i64, IoFailure> {
        let pos = unsafe { libc::ftell(fd.as_ptr()) };
        if pos < 0 {
            return Err(IoFailure::last_os_error(FileErrorKind::Tell, ops::TELL));
        }
        Ok(i64::from(pos))
    }

    fn eof(fd: &mut Stream) -> bool {
        unsafe { libc::feof(fd.as_ptr()) != 0 }
    }

    fn flush(fd: &mut Stream) -> Result<(), IoFailure> {
        if unsafe { libc::fflush(fd.as_ptr()) } != 0 {
            return Err(IoFailure::last_os_error(FileErrorKind::Flush, ops::FLUSH));
        }
        Ok(())
    }

    fn close(fd: Stream) {
        if fd.shared {
            if unsafe { libc::fflush(fd.as_ptr()) } != 0 {
                debug!(error = ?last_os_error_code(), "standard stream flush failed; ignored");
            }
            return;
        }
        if unsafe { libc::fclose(fd.as_ptr()) } != 0 {
            debug!(error = ?last_os_error_code(), "fclose failed; ignored");
        }
    }

    fn open_contents(name: &str) -> Result<(Stream, usize), IoFailure> {
        let raw = P::fopen(name, "rb")?;
        let stream = Stream::from_raw(raw)
            .ok_or_else(|| IoFailure::last_os_error(FileErrorKind::Open, ops::CONTENTS))?;
        let len = unsafe {
            if libc::fseek(stream.as_ptr(), 0, libc::SEEK_END) != 0 {
                -1
            } else {
                libc::ftell(stream.as_ptr())
            }
        };
        let len = match usize::try_from(len) {
            Ok(len) => len,
            Err(_) => {
                let failure = IoFailure::last_os_error(FileErrorKind::Read, ops::CONTENTS);
                Self::close(stream);
                return Err(failure);
            }
        };
        unsafe { libc::rewind(stream.as_ptr()) };
        trace!(name, len, "whole-file read sized");
        Ok((stream, len))
    }

    fn read_contents(fd: &mut Stream, buf: &mut [u8]) -> Result<(), IoFailure> {
        let stream = fd.as_ptr();
        let len = buf.len();
        let base = buf.as_mut_ptr();
        transfer(
            len,
            ShortTransfer::RequireAll,
            |done| unsafe { libc::fread(base.add(done) as *mut c_void, 1, len - done, stream) },
            || fd.stall(),
        )
        .map_err(|stall| failure(FileErrorKind::Read, ops::CONTENTS, stall))?;
        Ok(())
    }

    fn stdin() -> Result<Stream, IoFailure> {
        standard(0, "r", ops::STDIN)
    }

    fn stdout() -> Result<Stream, IoFailure> {
        standard(1, "w", ops::STDOUT)
    }

    fn stderr() -> Result<Stream, IoFailure> {
        standard(2, "w", ops::STDERR)
    }
}
