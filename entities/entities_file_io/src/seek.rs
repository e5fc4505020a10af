//! Seek Origins
//!
//! Managed code passes the origin of a seek as a small integer, with the same
//! numbering as C's `SEEK_SET`, `SEEK_CUR` and `SEEK_END`.

/// Origin of a seek
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeekMode {
    /// Absolute position from the start of the file
    Set,
    /// Relative to the current position
    Cur,
    /// Relative to the end of the file
    End,
}

impl SeekMode {
    /// Decode the integer form used by managed code
    ///
    /// Returns `None` for anything outside `0..=2`.
    pub fn from_raw(kind: i32) -> Option<Self> {
        match kind {
            0 => Some(SeekMode::Set),
            1 => Some(SeekMode::Cur),
            2 => Some(SeekMode::End),
            _ => None,
        }
    }

    /// Integer form used by managed code
    pub fn as_raw(&self) -> i32 {
        match self {
            SeekMode::Set => 0,
            SeekMode::Cur => 1,
            SeekMode::End => 2,
        }
    }
}
