//! Whole-File Reads
//!
//! Reads a file in one call. The platform is asked for the length first, the
//! result buffer is allocated outside any GC-free zone, and only then is the
//! file read into it.

use crate::error_bridge::raise;
use adapters_file_io::FileBackend;
use entities_file_io::{FileError, ManagedBytes, ManagedString};
use infrastructure_gc_hooks::{blocking, Collector};
use tracing::debug;

/// Contents of `name` as bytes; empty for a zero-length file
pub fn read_contents_bytes<B: FileBackend>(
    collector: &dyn Collector,
    name: &ManagedString,
) -> Result<ManagedBytes, FileError> {
    let (mut fd, len) =
        blocking(collector, || B::open_contents(name.as_str())).map_err(|failure| raise(collector, failure, name))?;
    if len == 0 {
        blocking(collector, || B::close(fd));
        return Ok(ManagedBytes::empty());
    }

    let mut bytes = ManagedBytes::zeroed(len);
    let target = bytes.as_mut_slice();
    blocking(collector, move || {
        let read = B::read_contents(&mut fd, target);
        B::close(fd);
        read
    })
    .map_err(|failure| raise(collector, failure, name))?;

    debug!(%name, len, "read whole file");
    Ok(bytes)
}

/// Contents of `name` as text; invalid UTF-8 is replaced
pub fn read_contents_string<B: FileBackend>(
    collector: &dyn Collector,
    name: &ManagedString,
) -> Result<ManagedString, FileError> {
    let bytes = read_contents_bytes::<B>(collector, name)?;
    Ok(ManagedString::from_utf8_lossy(bytes.as_slice()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use adapters_file_io::{BufferedBackend, Utf8Paths};
    use entities_file_io::FileErrorKind;
    use infrastructure_gc_hooks::GcRuntime;

    type Backend = BufferedBackend<Utf8Paths>;

    #[test]
    fn test_bytes_match_file() {
        let runtime = GcRuntime::new();
        let file = tempfile::NamedTempFile::new().unwrap();
        let data: Vec<u8> = (0..=255u8).cycle().take(70_000).collect();
        std::fs::write(file.path(), &data).unwrap();
        let name = ManagedString::new(file.path().to_str().unwrap());

        let bytes = read_contents_bytes::<Backend>(&runtime, &name).unwrap();
        assert_eq!(bytes.as_slice(), data.as_slice());
        assert_eq!(runtime.threads_in_zone(), 0);
    }

    #[test]
    fn test_empty_file() {
        let runtime = GcRuntime::new();
        let file = tempfile::NamedTempFile::new().unwrap();
        let name = ManagedString::new(file.path().to_str().unwrap());

        assert!(read_contents_bytes::<Backend>(&runtime, &name).unwrap().is_empty());
        assert!(read_contents_string::<Backend>(&runtime, &name).unwrap().is_empty());
    }

    #[test]
    fn test_text_is_decoded_lossily() {
        let runtime = GcRuntime::new();
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), b"ok \xff").unwrap();
        let name = ManagedString::new(file.path().to_str().unwrap());

        let text = read_contents_string::<Backend>(&runtime, &name).unwrap();
        assert_eq!(text.as_str(), "ok \u{fffd}");
    }

    #[test]
    fn test_missing_file() {
        let runtime = GcRuntime::new();
        let dir = tempfile::tempdir().unwrap();
        let name = ManagedString::new(dir.path().join("none").to_str().unwrap());

        let err = read_contents_bytes::<Backend>(&runtime, &name).unwrap_err();
        assert_eq!(err.kind(), FileErrorKind::Open);
        assert_eq!(err.name(), &name);
        assert!(!runtime.in_gc_free_zone());
    }
}
