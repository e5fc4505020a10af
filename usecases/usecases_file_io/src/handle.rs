//! File Handle
//!
//! The managed object wrapping one platform descriptor. A handle is created
//! by an open call or by one of the standard-stream constructors and is
//! destroyed either by an explicit close or by its finalizer once the
//! collector finds it unreachable.
//!
//! The descriptor and the display name live behind a per-handle mutex.
//! `descriptor == None` means the handle is closed; every operation except
//! close then fails with a bad-handle error.

use adapters_file_io::FileBackend;
use entities_file_io::{ops, FileError, IoFailure, ManagedString, ObjectId};
use infrastructure_gc_hooks::{blocking, Collector, GcField, MarkContext, Trace, VisitContext};
use parking_lot::Mutex;
use std::any::Any;
use std::fmt;
use std::sync::{Arc, Weak};
use tracing::debug;

use crate::error_bridge::raise;

pub(crate) struct HandleState<B: FileBackend> {
    pub(crate) descriptor: Option<B::Descriptor>,
    pub(crate) name: GcField,
    close_on_destroy: bool,
}

impl<B: FileBackend> HandleState<B> {
    /// Close the descriptor if owned or forced; a second call does nothing
    fn destroy(&mut self, force: bool, collector: &dyn Collector) {
        let Some(fd) = self.descriptor.take() else {
            return;
        };
        if force || self.close_on_destroy {
            debug!(name = %self.name.get(), force, "closing file");
            blocking(collector, || B::close(fd));
        }
        self.name.clear(collector);
    }
}

struct HandleObject<B: FileBackend> {
    id: ObjectId,
    state: Arc<Mutex<HandleState<B>>>,
    collector: Arc<dyn Collector>,
}

/// Open file, as seen by managed code
///
/// Clones share the same underlying object. The finalizer runs once every
/// clone has been dropped and the collector has run a pass.
pub struct FileHandle<B: FileBackend> {
    object: Arc<HandleObject<B>>,
}

impl<B: FileBackend> Clone for FileHandle<B> {
    fn clone(&self) -> Self {
        Self {
            object: Arc::clone(&self.object),
        }
    }
}

impl<B: FileBackend> FileHandle<B> {
    /// Wrap an open descriptor and register its finalizer
    pub fn create(
        collector: Arc<dyn Collector>,
        descriptor: B::Descriptor,
        name: ManagedString,
        close_on_destroy: bool,
    ) -> Self {
        let id = ObjectId::next();
        let state = Arc::new(Mutex::new(HandleState {
            descriptor: Some(descriptor),
            name: GcField::new(id, name, collector.as_ref()),
            close_on_destroy,
        }));
        let object = Arc::new(HandleObject {
            id,
            state: Arc::clone(&state),
            collector: Arc::clone(&collector),
        });

        let erased: Arc<dyn Any + Send + Sync> = object.clone();
        let probe = Arc::downgrade(&erased);
        drop(erased);

        let weak_collector: Weak<dyn Collector> = Arc::downgrade(&collector);
        collector.register_finalizer(
            id,
            probe,
            Box::new(move || {
                let Some(collector) = weak_collector.upgrade() else {
                    return;
                };
                // Only a shutdown pass can reach a handle that is mid-operation.
                // That operation holds the lock until its zone exit, which
                // waits for this pass, so a busy handle is left open.
                match state.try_lock() {
                    Some(mut state) => state.destroy(false, collector.as_ref()),
                    None => debug!(%id, "handle busy at finalization; left open"),
                }
            }),
        );

        Self { object }
    }

    /// Open `name` with a C-style mode string
    pub fn open(collector: Arc<dyn Collector>, name: &ManagedString, mode: &str) -> Result<Self, FileError> {
        let opened = blocking(collector.as_ref(), || B::open(name.as_str(), mode));
        match opened {
            Ok(fd) => {
                debug!(%name, mode, profile = B::PROFILE.as_str(), "opened file");
                Ok(Self::create(collector, fd, name.clone(), true))
            }
            Err(failure) => Err(raise(collector.as_ref(), failure, name)),
        }
    }

    /// Handle on the process's standard input
    pub fn stdin(collector: Arc<dyn Collector>) -> Result<Self, FileError> {
        Self::standard(collector, "stdin", B::stdin)
    }

    /// Handle on the process's standard output
    pub fn stdout(collector: Arc<dyn Collector>) -> Result<Self, FileError> {
        Self::standard(collector, "stdout", B::stdout)
    }

    /// Handle on the process's standard error
    pub fn stderr(collector: Arc<dyn Collector>) -> Result<Self, FileError> {
        Self::standard(collector, "stderr", B::stderr)
    }

    fn standard(
        collector: Arc<dyn Collector>,
        name: &str,
        wrap: fn() -> Result<B::Descriptor, IoFailure>,
    ) -> Result<Self, FileError> {
        let name = ManagedString::new(name);
        match blocking(collector.as_ref(), wrap) {
            Ok(fd) => Ok(Self::create(collector, fd, name, false)),
            Err(failure) => Err(raise(collector.as_ref(), failure, &name)),
        }
    }

    /// Close the handle; closing twice is a no-op
    pub fn close(&self) {
        self.object.state.lock().destroy(true, self.collector());
    }

    /// Display name; fails on a closed handle
    pub fn name(&self) -> Result<ManagedString, FileError> {
        let state = self.object.state.lock();
        if state.descriptor.is_none() {
            return Err(FileError::bad_handle(ops::NAME));
        }
        Ok(state.name.get().clone())
    }

    /// Whether the handle has been closed
    pub fn is_closed(&self) -> bool {
        self.object.state.lock().descriptor.is_none()
    }

    /// Identity used for the write barrier and finalizer registration
    pub fn id(&self) -> ObjectId {
        self.object.id
    }

    pub(crate) fn collector(&self) -> &dyn Collector {
        self.object.collector.as_ref()
    }

    /// Run `body` against the open descriptor
    ///
    /// `body` decides whether and how to enter a GC-free zone. Failures are
    /// bridged after it returns, so always outside the zone.
    pub(crate) fn with_descriptor<T>(
        &self,
        operation: &'static str,
        body: impl FnOnce(&mut B::Descriptor, &dyn Collector) -> Result<T, IoFailure>,
    ) -> Result<T, FileError> {
        let collector = self.collector();
        let mut guard = self.object.state.lock();
        let state = &mut *guard;
        let Some(fd) = state.descriptor.as_mut() else {
            return Err(FileError::bad_handle(operation));
        };
        body(fd, collector).map_err(|failure| raise(collector, failure, state.name.get()))
    }
}

impl<B: FileBackend> Trace for FileHandle<B> {
    fn mark(&self, ctx: &mut MarkContext) {
        self.object.state.lock().name.mark(ctx);
    }

    fn visit(&mut self, ctx: &mut VisitContext<'_>) {
        self.object.state.lock().name.visit(ctx);
    }
}

impl<B: FileBackend> fmt::Display for FileHandle<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fio:{}", self.object.state.lock().name.get())
    }
}

impl<B: FileBackend> fmt::Debug for FileHandle<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileHandle")
            .field("id", &self.object.id)
            .field("closed", &self.is_closed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adapters_file_io::{BufferedBackend, Utf8Paths};
    use entities_file_io::FileErrorKind;
    use infrastructure_gc_hooks::GcRuntime;
    use std::io::Write;

    type Handle = FileHandle<BufferedBackend<Utf8Paths>>;

    fn runtime() -> Arc<GcRuntime> {
        Arc::new(GcRuntime::new())
    }

    fn scratch(bytes: &[u8]) -> (tempfile::NamedTempFile, ManagedString) {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(bytes).unwrap();
        file.flush().unwrap();
        let name = ManagedString::new(file.path().to_str().unwrap());
        (file, name)
    }

    #[test]
    fn test_open_registers_finalizer_and_barriers_name() {
        let gc = runtime();
        let (_file, name) = scratch(b"x");
        let handle = Handle::open(gc.clone(), &name, "rb").unwrap();

        assert!(gc.has_finalizer(handle.id()));
        assert_eq!(gc.barrier_count(), 1);
        assert_eq!(handle.name().unwrap(), name);
        handle.close();
    }

    #[test]
    fn test_display_form() {
        let gc = runtime();
        let (_file, name) = scratch(b"");
        let handle = Handle::open(gc, &name, "rb").unwrap();
        assert_eq!(handle.to_string(), format!("fio:{}", name));
        handle.close();
        assert_eq!(handle.to_string(), "fio:");
    }

    #[test]
    fn test_open_failure_names_the_file() {
        let gc = runtime();
        let dir = tempfile::tempdir().unwrap();
        let name = ManagedString::new(dir.path().join("nope").to_str().unwrap());

        let err = Handle::open(gc.clone(), &name, "r").unwrap_err();
        assert_eq!(err.kind(), FileErrorKind::Open);
        assert_eq!(err.operation(), "file_open");
        assert_eq!(err.name(), &name);
        assert_eq!(gc.pending_finalizers(), 0);
    }

    #[test]
    fn test_close_is_idempotent_and_clears_name() {
        let gc = runtime();
        let (_file, name) = scratch(b"abc");
        let handle = Handle::open(gc.clone(), &name, "rb").unwrap();

        handle.close();
        handle.close();
        assert!(handle.is_closed());
        assert_eq!(gc.barrier_count(), 2);
        assert_eq!(handle.name().unwrap_err().kind(), FileErrorKind::BadHandle);
    }

    #[test]
    fn test_finalizer_closes_owned_handle() {
        let gc = runtime();
        let (file, name) = scratch(b"");
        let handle = Handle::open(gc.clone(), &name, "wb").unwrap();
        handle
            .with_descriptor(ops::WRITE, |fd, collector| {
                blocking(collector, || BufferedBackend::<Utf8Paths>::write(fd, b"pending"))
            })
            .unwrap();

        let id = handle.id();
        drop(handle);
        assert_eq!(gc.collect(), 1);
        assert!(!gc.has_finalizer(id));
        // fclose flushed the buffered bytes
        assert_eq!(std::fs::read(file.path()).unwrap(), b"pending");
    }

    #[test]
    fn test_finalizer_after_close_is_harmless() {
        let gc = runtime();
        let (_file, name) = scratch(b"abc");
        let handle = Handle::open(gc.clone(), &name, "rb").unwrap();
        handle.close();
        let barriers = gc.barrier_count();

        drop(handle);
        assert_eq!(gc.collect(), 1);
        assert_eq!(gc.barrier_count(), barriers);
    }

    #[test]
    fn test_clone_keeps_handle_reachable() {
        let gc = runtime();
        let (_file, name) = scratch(b"abc");
        let handle = Handle::open(gc.clone(), &name, "rb").unwrap();
        let alias = handle.clone();

        drop(handle);
        assert_eq!(gc.collect(), 0);
        assert!(!alias.is_closed());
        alias.close();
    }

    #[test]
    fn test_mark_and_visit_report_name() {
        let gc = runtime();
        let (_file, name) = scratch(b"abc");
        let mut handle = Handle::open(gc, &name, "rb").unwrap();

        let mut marks = MarkContext::new();
        handle.mark(&mut marks);
        assert!(marks.is_marked(&handle.name().unwrap()));

        let mut seen = Vec::new();
        let mut record = |value: &mut ManagedString| seen.push(value.to_string());
        let mut ctx = VisitContext::new(&mut record);
        handle.visit(&mut ctx);
        assert_eq!(ctx.visited(), 1);
        drop(ctx);
        assert_eq!(seen, vec![name.to_string()]);
        handle.close();
    }

    #[test]
    fn test_standard_stream_names() {
        let gc = runtime();
        let out = Handle::stdout(gc.clone()).unwrap();
        assert_eq!(out.name().unwrap(), "stdout");
        assert_eq!(out.to_string(), "fio:stdout");
        assert!(gc.has_finalizer(out.id()));
    }
}
