//! Use Cases Layer: File I/O
//!
//! Provides the file handle object and the blocking operations managed code
//! performs on it:
//! - Handle creation, destruction and finalization
//! - Bulk and single-byte transfers with bounds checking
//! - Positioning, end-of-file and flush
//! - Whole-file reads as text or bytes
//!
//! Every platform call runs inside a GC-free zone; failures are turned into
//! [`FileError`](entities_file_io::FileError) values only after the zone has
//! been left.
//!
//! Generic over [`FileBackend`](adapters_file_io::FileBackend); the facades
//! bind it to the platform backend.
//!
//! Depends on the Entities, Infrastructure and Adapters layers.

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

pub mod contents;
pub mod error_bridge;
pub mod handle;
pub mod operations;

pub use contents::{read_contents_bytes, read_contents_string};
pub use error_bridge::raise;
pub use handle::FileHandle;
