//! Interrupted-Call Retry Loop
//!
//! Moves `len` bytes through repeated platform calls. A call that moves
//! nothing is classified by the backend: an interrupted system call is
//! retried, anything else ends the transfer.

use tracing::trace;

/// How a transfer ending early is reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortTransfer {
    /// Return the bytes moved so far; fail only if nothing moved and the
    /// stream reported an error
    AcceptPartial,
    /// Anything short of `len` is a failure
    RequireAll,
}

/// Why a platform call moved no bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stall {
    /// Interrupted system call; the stream error state has been cleared
    Interrupted,
    /// End of stream
    EndOfStream,
    /// Stream error with the OS error code, if any
    Failed(Option<i32>),
}

/// Run a transfer of `len` bytes
///
/// `step` receives the number of bytes already moved and returns how many
/// more it moved. `stalled` is consulted whenever a step moves nothing.
pub fn transfer(
    len: usize,
    policy: ShortTransfer,
    mut step: impl FnMut(usize) -> usize,
    mut stalled: impl FnMut() -> Stall,
) -> Result<usize, Stall> {
    let mut done = 0;
    while done < len {
        let moved = step(done);
        if moved > 0 {
            done += moved;
            continue;
        }
        match stalled() {
            Stall::Interrupted => {
                trace!(done, len, "interrupted transfer, retrying");
            }
            stall => {
                return match policy {
                    ShortTransfer::AcceptPartial
                        if done > 0 || stall == Stall::EndOfStream =>
                    {
                        Ok(done)
                    }
                    _ => Err(stall),
                };
            }
        }
    }
    Ok(done)
}
