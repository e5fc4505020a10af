//! Infrastructure Layer: Collector Hooks
//!
//! Provides the narrow interface between the file I/O core and the runtime's
//! garbage collector. The core never performs marking or barrier bookkeeping
//! itself; it only calls the hooks defined here.
//!
//! ## Overview
//!
//! - **[`collector`](collector/index.html)**: The [`Collector`] trait, the seam
//!   every upper layer talks to
//! - **[`safe_zone`](safe_zone/index.html)**: [`SafeZone`] guard bracketing
//!   blocking platform calls
//! - **[`barrier`](barrier/index.html)**: [`GcField`], a managed reference field
//!   whose every store goes through the write barrier
//! - **[`trace`](trace/index.html)**: Mark and visit contexts
//! - **[`finalizer`](finalizer/index.html)**: Registry of cleanup callbacks
//!   keyed by reachability
//! - **[`runtime`](runtime/index.html)**: [`GcRuntime`], the in-process
//!   collector used by the facades and the tests
//!
//! ## Safe Zones
//!
//! A thread inside a GC-free zone promises not to touch managed memory, so a
//! collection pass on another thread does not need to wait for it. Leaving the
//! zone blocks while a pass is finalizing.
//!
//! ```rust
//! use infrastructure_gc_hooks::{Collector, GcRuntime, SafeZone};
//!
//! let runtime = GcRuntime::new();
//! let zone = SafeZone::enter(&runtime);
//! assert!(runtime.in_gc_free_zone());
//! zone.exit();
//! assert!(!runtime.in_gc_free_zone());
//! ```
//!
//! ## See Also
//!
//! - [`entities_file_io`](../entities_file_io/index.html): Managed value containers
//! - [`usecases_file_io`](../usecases_file_io/index.html): The file handle built on these hooks

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

pub mod barrier;
pub mod collector;
pub mod finalizer;
pub mod runtime;
pub mod safe_zone;
pub mod trace;

pub use barrier::GcField;
pub use collector::{Collector, Finalizer, Reachability};
pub use finalizer::FinalizerRegistry;
pub use runtime::{gc_runtime, CollectionPhase, GcRuntime, GcRuntimeConfig};
pub use safe_zone::{blocking, SafeZone};
pub use trace::{MarkContext, Trace, VisitContext};
