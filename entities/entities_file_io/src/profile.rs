//! Platform I/O Profiles

use std::fmt;

/// The platform I/O model a backend implements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Profile {
    /// Buffered standard-library streams with narrow (UTF-8) paths
    Buffered,
    /// Buffered standard-library streams with wide-character paths
    WideBuffered,
    /// Raw descriptor calls with manual position and size tracking
    Console,
}

impl Profile {
    /// Whether the platform offers position, EOF and buffering queries
    pub fn has_stream_queries(&self) -> bool {
        !matches!(self, Profile::Console)
    }

    /// Whether the standard streams can be wrapped in handles
    pub fn has_stdio(&self) -> bool {
        !matches!(self, Profile::Console)
    }

    /// Short name
    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Buffered => "buffered",
            Profile::WideBuffered => "wide-buffered",
            Profile::Console => "console",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
