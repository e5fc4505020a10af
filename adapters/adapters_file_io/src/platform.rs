//! Platform Backend Selection

use crate::backend::FileBackend;
use entities_file_io::Profile;

#[cfg(all(windows, feature = "console-profile"))]
compile_error!("the console profile is only available on unix targets");

/// Backend for the current build target
#[cfg(all(unix, not(feature = "console-profile")))]
pub type PlatformBackend = crate::buffered::BufferedBackend<crate::buffered::Utf8Paths>;

/// Backend for the current build target
#[cfg(all(unix, feature = "console-profile"))]
pub type PlatformBackend = crate::console::ConsoleBackend;

/// Backend for the current build target
#[cfg(windows)]
pub type PlatformBackend = crate::buffered::BufferedBackend<crate::buffered::WidePaths>;

/// I/O model of [`PlatformBackend`]
pub const ACTIVE_PROFILE: Profile = <PlatformBackend as FileBackend>::PROFILE;
