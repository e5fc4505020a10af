//! API Facades Layer
//!
//! Provides the file I/O entry points called from managed code. Each facade
//! binds the use-case layer to the build-time [`PlatformBackend`] and the
//! process-wide collector runtime.
//!
//! Failures are returned as [`FileError`]; managed code receives them as the
//! two-field `[operation, name]` value from [`FileError::into_managed`].
//!
//! [`PlatformBackend`]: adapters_file_io::PlatformBackend
//! [`FileError`]: entities_file_io::FileError
//! [`FileError::into_managed`]: entities_file_io::FileError::into_managed

pub mod file_facades;

pub use file_facades::*;
