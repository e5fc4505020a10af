//! Managed Value Containers
//!
//! Opaque stand-ins for the runtime's managed string and byte-array objects.
//! The file I/O core never looks inside these beyond the construction and
//! access operations defined here.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_OBJECT_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a collector-visible object
///
/// Used as the owner argument of the write barrier and as the key under which
/// a finalizer is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u64);

impl ObjectId {
    /// Allocate a fresh, process-unique identity
    pub fn next() -> Self {
        Self(NEXT_OBJECT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the numeric value
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Managed string
///
/// Immutable and cheap to clone; clones share one allocation, which is what the
/// mark context reports as the string's identity.
#[derive(Clone)]
pub struct ManagedString(Arc<str>);

impl ManagedString {
    /// Create a managed string from UTF-8 text
    pub fn new(text: &str) -> Self {
        Self(Arc::from(text))
    }

    /// Create the empty string
    pub fn empty() -> Self {
        Self::new("")
    }

    /// Create a managed string from raw bytes, replacing invalid UTF-8 sequences
    pub fn from_utf8_lossy(bytes: &[u8]) -> Self {
        Self::new(&String::from_utf8_lossy(bytes))
    }

    /// Borrow the text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the string is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Address of the shared allocation
    ///
    /// Two managed strings with the same identity are the same object.
    pub fn identity(&self) -> usize {
        Arc::as_ptr(&self.0) as *const u8 as usize
    }
}

impl Default for ManagedString {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for ManagedString {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for ManagedString {}

impl PartialEq<str> for ManagedString {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for ManagedString {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl From<&str> for ManagedString {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for ManagedString {
    fn from(text: String) -> Self {
        Self(Arc::from(text))
    }
}

impl fmt::Debug for ManagedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl fmt::Display for ManagedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Managed byte array
///
/// Fixed length once created. Read and write operations address it with an
/// offset and a length supplied by managed code.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ManagedBytes(Vec<u8>);

impl ManagedBytes {
    /// Allocate a zero-filled array of `len` bytes
    pub fn zeroed(len: usize) -> Self {
        Self(vec![0; len])
    }

    /// Adopt an existing vector
    pub fn from_vec(data: Vec<u8>) -> Self {
        Self(data)
    }

    /// The zero-length array
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the array has no elements
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the contents
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Borrow the contents mutably
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.0
    }

    /// Release the underlying vector
    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl From<&[u8]> for ManagedBytes {
    fn from(data: &[u8]) -> Self {
        Self(data.to_vec())
    }
}

impl fmt::Debug for ManagedBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ManagedBytes(len={})", self.0.len())
    }
}
