//! File I/O Errors
//!
//! Two error types live here:
//!
//! - [`IoFailure`] is what a platform backend reports. It carries no managed
//!   data, so it can be produced while the calling thread is inside a GC-free
//!   zone.
//! - [`FileError`] is what managed code receives. It pairs the failing call
//!   site with the handle's display name and can be turned into the runtime's
//!   two-field error value.

use crate::managed::ManagedString;
use thiserror::Error;

/// Error categories surfaced to managed code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileErrorKind {
    /// The platform could not open the path
    Open,
    /// A read failed
    Read,
    /// A write failed
    Write,
    /// Repositioning failed
    Seek,
    /// The position query failed
    Tell,
    /// Flushing buffered output failed
    Flush,
    /// Operation attempted on a closed or wrong-type handle
    BadHandle,
    /// Operation not available on the active platform profile
    Unsupported,
}

impl FileErrorKind {
    /// Short name used in logs and diagnostics
    pub fn as_str(&self) -> &'static str {
        match self {
            FileErrorKind::Open => "open",
            FileErrorKind::Read => "read",
            FileErrorKind::Write => "write",
            FileErrorKind::Seek => "seek",
            FileErrorKind::Tell => "tell",
            FileErrorKind::Flush => "flush",
            FileErrorKind::BadHandle => "bad_handle",
            FileErrorKind::Unsupported => "unsupported",
        }
    }
}

/// Platform-level failure
///
/// `operation` is the fixed name of the call site that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{operation} failed ({kind:?}, os error {os_error:?})")]
pub struct IoFailure {
    /// Error category
    pub kind: FileErrorKind,
    /// Call site name, e.g. `file_read`
    pub operation: &'static str,
    /// Raw OS error code, when the platform reported one
    pub os_error: Option<i32>,
}

impl IoFailure {
    /// Create a failure without an OS error code
    pub fn new(kind: FileErrorKind, operation: &'static str) -> Self {
        Self {
            kind,
            operation,
            os_error: None,
        }
    }

    /// Create a failure with an explicit OS error code
    pub fn with_os_error(kind: FileErrorKind, operation: &'static str, code: i32) -> Self {
        Self {
            kind,
            operation,
            os_error: Some(code),
        }
    }

    /// Create a failure from the calling thread's last OS error
    pub fn last_os_error(kind: FileErrorKind, operation: &'static str) -> Self {
        Self {
            kind,
            operation,
            os_error: std::io::Error::last_os_error()
                .raw_os_error()
                .filter(|code| *code != 0),
        }
    }
}

/// Error raised to managed code
///
/// Displays as `<operation>: <name>`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{operation}: {name}")]
pub struct FileError {
    kind: FileErrorKind,
    operation: &'static str,
    name: ManagedString,
    os_error: Option<i32>,
}

impl FileError {
    /// Create an error
    pub fn new(kind: FileErrorKind, operation: &'static str, name: ManagedString) -> Self {
        Self {
            kind,
            operation,
            name,
            os_error: None,
        }
    }

    /// Attach a platform failure to a display name
    pub fn from_failure(failure: IoFailure, name: ManagedString) -> Self {
        Self {
            kind: failure.kind,
            operation: failure.operation,
            name,
            os_error: failure.os_error,
        }
    }

    /// Error for an operation attempted on a closed handle
    ///
    /// A closed handle has already dropped its display name, so the name field
    /// is empty.
    pub fn bad_handle(operation: &'static str) -> Self {
        Self::new(FileErrorKind::BadHandle, operation, ManagedString::empty())
    }

    /// Error category
    pub fn kind(&self) -> FileErrorKind {
        self.kind
    }

    /// Failing call site
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// Display name of the file involved
    pub fn name(&self) -> &ManagedString {
        &self.name
    }

    /// Raw OS error code, if any
    pub fn os_error(&self) -> Option<i32> {
        self.os_error
    }

    /// Convert into the runtime's two-field error value `[operation, name]`
    pub fn into_managed(self) -> [ManagedString; 2] {
        [ManagedString::new(self.operation), self.name]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_to_error() {
        let failure = IoFailure::with_os_error(FileErrorKind::Read, "file_read", 5);
        let error = FileError::from_failure(failure, ManagedString::new("log.txt"));

        assert_eq!(error.kind(), FileErrorKind::Read);
        assert_eq!(error.operation(), "file_read");
        assert_eq!(error.name().as_str(), "log.txt");
        assert_eq!(error.os_error(), Some(5));
        assert_eq!(error.to_string(), "file_read: log.txt");
    }

    #[test]
    fn test_into_managed_two_fields() {
        let error = FileError::new(FileErrorKind::Seek, "file_seek", ManagedString::new("a"));
        let [operation, name] = error.into_managed();
        assert_eq!(operation.as_str(), "file_seek");
        assert_eq!(name.as_str(), "a");
    }

    #[test]
    fn test_bad_handle_has_empty_name() {
        let error = FileError::bad_handle("file_tell");
        assert_eq!(error.kind(), FileErrorKind::BadHandle);
        assert!(error.name().is_empty());
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(FileErrorKind::Flush.as_str(), "flush");
        assert_eq!(FileErrorKind::Unsupported.as_str(), "unsupported");
    }
}
