//! Entities Layer: File I/O
//!
//! Provides the fundamental value types shared by every layer of the blocking
//! file I/O core of the managed runtime.
//!
//! ## Overview
//!
//! The `entities_file_io` crate sits at the bottom of the layered workspace. It
//! has no knowledge of the platform or of the collector; it only defines the
//! values that flow between them:
//!
//! - **[`managed`](managed/index.html)**: Opaque managed containers
//!   ([`ManagedString`], [`ManagedBytes`]) and object identities ([`ObjectId`])
//! - **[`error`](error/index.html)**: Error kinds, the platform-level
//!   [`IoFailure`] and the managed-level [`FileError`]
//! - **[`ops`](ops/index.html)**: Fixed call-site names carried by errors
//! - **[`seek`](seek/index.html)**: Seek origins as passed by managed code
//! - **[`profile`](profile/index.html)**: The three platform I/O models
//!
//! ## Usage
//!
//! ```rust
//! use entities_file_io::{FileError, FileErrorKind, IoFailure, ManagedString};
//!
//! let failure = IoFailure::new(FileErrorKind::Open, "file_open");
//! let error = FileError::from_failure(failure, ManagedString::new("missing.txt"));
//!
//! assert_eq!(error.kind(), FileErrorKind::Open);
//! assert_eq!(error.to_string(), "file_open: missing.txt");
//! ```
//!
//! ## See Also
//!
//! - [`infrastructure_gc_hooks`](../infrastructure_gc_hooks/index.html): Collector hooks
//! - [`adapters_file_io`](../adapters_file_io/index.html): Platform backends

/*
 * %CopyrightBegin%
 *
 * SPDX-License-Identifier: Apache-2.0
 *
 * Copyright Lee Barney 2025. All Rights Reserved.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 *
 * %CopyrightEnd%
 */

pub mod error;
pub mod managed;
pub mod ops;
pub mod profile;
pub mod seek;

pub use error::{FileError, FileErrorKind, IoFailure};
pub use managed::{ManagedBytes, ManagedString, ObjectId};
pub use profile::Profile;
pub use seek::SeekMode;
