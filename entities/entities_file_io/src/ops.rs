//! Call-Site Names
//!
//! Fixed names identifying the operation that failed. They are the first
//! field of the error value handed to managed code.

pub const OPEN: &str = "file_open";
pub const NAME: &str = "file_name";
pub const READ: &str = "file_read";
pub const WRITE: &str = "file_write";
pub const READ_CHAR: &str = "file_read_char";
pub const WRITE_CHAR: &str = "file_write_char";
pub const SEEK: &str = "file_seek";
pub const TELL: &str = "file_tell";
pub const EOF: &str = "file_eof";
pub const FLUSH: &str = "file_flush";
pub const CONTENTS: &str = "file_contents";
pub const STDIN: &str = "file_stdin";
pub const STDOUT: &str = "file_stdout";
pub const STDERR: &str = "file_stderr";
