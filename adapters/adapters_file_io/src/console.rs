//! Raw Descriptor Backend
//!
//! The console I/O model: unbuffered descriptors with no position or
//! end-of-file queries. The descriptor caches the position and the file size
//! itself. Every transfer must move exactly the requested length.
//!
//! Files are always opened read-write without creation, whatever mode
//! string is passed. Only absolute seeks are supported and the standard
//! streams are not available.

use crate::backend::FileBackend;
use entities_file_io::{ops, FileErrorKind, IoFailure, Profile, SeekMode};
use nix::errno::Errno;
use nix::fcntl::{open, OFlag};
use nix::sys::stat::{fstat, Mode};
use nix::unistd::{close, lseek, read, write, Whence};
use std::os::unix::io::RawFd;
use tracing::debug;

/// Open descriptor with its cached position and size
#[derive(Debug)]
pub struct ConsoleDescriptor {
    fd: RawFd,
    seek_pos: i64,
    file_size: i64,
}

impl ConsoleDescriptor {
    /// Cached position
    pub fn position(&self) -> i64 {
        self.seek_pos
    }

    /// Cached file size
    pub fn size(&self) -> i64 {
        self.file_size
    }

    fn advance(&mut self, moved: usize) {
        self.seek_pos += moved as i64;
        self.file_size = self.file_size.max(self.seek_pos);
    }
}

fn os_failure(kind: FileErrorKind, operation: &'static str, errno: Errno) -> IoFailure {
    IoFailure::with_os_error(kind, operation, errno as i32)
}

fn open_sized(name: &str, oflag: OFlag, operation: &'static str) -> Result<ConsoleDescriptor, IoFailure> {
    let fd = open(name, oflag, Mode::from_bits_truncate(0o777))
        .map_err(|errno| os_failure(FileErrorKind::Open, operation, errno))?;
    match fstat(fd) {
        Ok(stat) => Ok(ConsoleDescriptor {
            fd,
            seek_pos: 0,
            file_size: stat.st_size as i64,
        }),
        Err(errno) => {
            let _ = close(fd);
            Err(os_failure(FileErrorKind::Open, operation, errno))
        }
    }
}

/// Exact-length read; anything short is a failure
///
/// Bytes moved by a short read still advance the cached position, so it
/// keeps matching the descriptor.
fn read_exact(fd: &mut ConsoleDescriptor, buf: &mut [u8], operation: &'static str) -> Result<(), IoFailure> {
    match read(fd.fd, buf) {
        Ok(n) => {
            fd.advance(n);
            if n == buf.len() {
                Ok(())
            } else {
                Err(IoFailure::new(FileErrorKind::Read, operation))
            }
        }
        Err(errno) => Err(os_failure(FileErrorKind::Read, operation, errno)),
    }
}

fn write_exact(fd: &mut ConsoleDescriptor, buf: &[u8], operation: &'static str) -> Result<(), IoFailure> {
    match write(fd.fd, buf) {
        Ok(n) => {
            fd.advance(n);
            if n == buf.len() {
                Ok(())
            } else {
                Err(IoFailure::new(FileErrorKind::Write, operation))
            }
        }
        Err(errno) => Err(os_failure(FileErrorKind::Write, operation, errno)),
    }
}

/// Backend over raw descriptors
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleBackend;

impl FileBackend for ConsoleBackend {
    type Descriptor = ConsoleDescriptor;

    const PROFILE: Profile = Profile::Console;

    fn open(name: &str, mode: &str) -> Result<ConsoleDescriptor, IoFailure> {
        debug!(name, mode, "console open ignores mode");
        open_sized(name, OFlag::O_RDWR, ops::OPEN)
    }

    fn read(fd: &mut ConsoleDescriptor, buf: &mut [u8]) -> Result<usize, IoFailure> {
        read_exact(fd, buf, ops::READ)?;
        Ok(buf.len())
    }

    fn write(fd: &mut ConsoleDescriptor, buf: &[u8]) -> Result<usize, IoFailure> {
        write_exact(fd, buf, ops::WRITE)?;
        Ok(buf.len())
    }

    fn read_char(fd: &mut ConsoleDescriptor) -> Result<u8, IoFailure> {
        let mut byte = [0u8; 1];
        read_exact(fd, &mut byte, ops::READ_CHAR)?;
        Ok(byte[0])
    }

    fn write_char(fd: &mut ConsoleDescriptor, byte: u8) -> Result<(), IoFailure> {
        write_exact(fd, &[byte], ops::WRITE_CHAR)
    }

    fn seek(fd: &mut ConsoleDescriptor, pos: i64, mode: SeekMode) -> Result<(), IoFailure> {
        if mode != SeekMode::Set {
            return Err(IoFailure::new(FileErrorKind::Unsupported, ops::SEEK));
        }
        let offset = libc::off_t::try_from(pos).map_err(|_| IoFailure::new(FileErrorKind::Seek, ops::SEEK))?;
        match lseek(fd.fd, offset, Whence::SeekSet) {
            Ok(landed) if i64::from(landed) == pos => {
                fd.seek_pos = pos;
                Ok(())
            }
            Ok(_) => Err(IoFailure::new(FileErrorKind::Seek, ops::SEEK)),
            Err(errno) => Err(os_failure(FileErrorKind::Seek, ops::SEEK, errno)),
        }
    }

    fn tell(fd: &mut ConsoleDescriptor) -> Result<i64, IoFailure> {
        Ok(fd.seek_pos)
    }

    fn eof(fd: &mut ConsoleDescriptor) -> bool {
        fd.seek_pos >= fd.file_size
    }

    fn flush(_fd: &mut ConsoleDescriptor) -> Result<(), IoFailure> {
        Ok(())
    }

    fn close(fd: ConsoleDescriptor) {
        if let Err(errno) = close(fd.fd) {
            debug!(%errno, "close failed; ignored");
        }
    }

    fn open_contents(name: &str) -> Result<(ConsoleDescriptor, usize), IoFailure> {
        let fd = open_sized(name, OFlag::O_RDONLY, ops::CONTENTS)?;
        match usize::try_from(fd.file_size) {
            Ok(len) => Ok((fd, len)),
            Err(_) => {
                Self::close(fd);
                Err(IoFailure::new(FileErrorKind::Read, ops::CONTENTS))
            }
        }
    }

    fn read_contents(fd: &mut ConsoleDescriptor, buf: &mut [u8]) -> Result<(), IoFailure> {
        let mut done = 0;
        while done < buf.len() {
            match read(fd.fd, &mut buf[done..]) {
                Ok(0) => return Err(IoFailure::new(FileErrorKind::Read, ops::CONTENTS)),
                Ok(n) => done += n,
                Err(errno) => return Err(os_failure(FileErrorKind::Read, ops::CONTENTS, errno)),
            }
        }
        fd.seek_pos += done as i64;
        Ok(())
    }

    fn stdin() -> Result<ConsoleDescriptor, IoFailure> {
        Err(IoFailure::new(FileErrorKind::Unsupported, ops::STDIN))
    }

    fn stdout() -> Result<ConsoleDescriptor, IoFailure> {
        Err(IoFailure::new(FileErrorKind::Unsupported, ops::STDOUT))
    }

    fn stderr() -> Result<ConsoleDescriptor, IoFailure> {
        Err(IoFailure::new(FileErrorKind::Unsupported, ops::STDERR))
    }
}
