//! Adapters Layer: Platform File Backends
//!
//! Provides the platform-facing half of the blocking file I/O core. Every
//! backend implements [`FileBackend`], a table of blocking primitives that
//! know nothing about the collector; callers wrap each call in a GC-free zone.
//!
//! ## Overview
//!
//! Three I/O models are supported:
//!
//! - **[`buffered`](buffered/index.html)**: C stdio streams. Reads and writes
//!   retry after interrupted system calls. Paths are handed to the platform
//!   through a [`PathEncoding`]: [`Utf8Paths`] everywhere, `WidePaths` on
//!   Windows.
//! - **[`console`](console/index.html)**: Raw descriptors with a position and
//!   size cached in the descriptor. Only absolute seeks; no standard streams.
//!   Unix only, selected with the `console-profile` feature.
//! - **[`retry`](retry/index.html)**: The shared transfer loop used by the
//!   buffered backend.
//!
//! [`PlatformBackend`] names the backend the build targets.
//!
//! ## Example
//!
//! ```rust,no_run
//! use adapters_file_io::{FileBackend, PlatformBackend};
//!
//! let mut fd = PlatformBackend::open("notes.txt", "rb").unwrap();
//! let mut buf = [0u8; 16];
//! let n = PlatformBackend::read(&mut fd, &mut buf).unwrap();
//! PlatformBackend::close(fd);
//! println!("read {} bytes", n);
//! ```
//!
//! ## See Also
//!
//! - [`entities_file_io`](../entities_file_io/index.html): Error and value types
//! - [`usecases_file_io`](../usecases_file_io/index.html): Handle lifecycle and operations

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

pub mod backend;
pub mod buffered;
#[cfg(unix)]
pub mod console;
pub mod platform;
pub mod retry;

pub use backend::FileBackend;
#[cfg(windows)]
pub use buffered::WidePaths;
pub use buffered::{BufferedBackend, PathEncoding, Stream, Utf8Paths};
#[cfg(unix)]
pub use console::{ConsoleBackend, ConsoleDescriptor};
pub use platform::{PlatformBackend, ACTIVE_PROFILE};
pub use retry::{transfer, ShortTransfer, Stall};
