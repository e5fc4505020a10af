//! Error Bridge
//!
//! Turns a platform [`IoFailure`] into the [`FileError`] raised to managed
//! code. Building the error allocates managed data, so it must happen after
//! the GC-free zone has been left.

use entities_file_io::{FileError, IoFailure, ManagedString};
use infrastructure_gc_hooks::Collector;
use tracing::debug;

/// Build the managed error for `failure` on the file called `name`
pub fn raise(collector: &dyn Collector, failure: IoFailure, name: &ManagedString) -> FileError {
    debug_assert!(
        !collector.in_gc_free_zone(),
        "file error raised inside a GC-free zone"
    );
    debug!(
        operation = failure.operation,
        kind = failure.kind.as_str(),
        os_error = ?failure.os_error,
        %name,
        "file operation failed"
    );
    FileError::from_failure(failure, name.clone())
}
